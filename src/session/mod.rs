//! Async session hosting: an actor that owns the game state and drives the
//! countdown clock.

pub mod actor;
pub mod messages;

pub use actor::{SessionActor, SessionClosed, SessionHandle};
pub use messages::SessionMessage;
