//! Game core - entities and the session state machine.

pub mod entities;
pub mod state_machine;

pub use entities::{
    DEFAULT_ROUND_SECONDS, GameSettings, MAX_SPIES, MIN_PLAYERS, Outcome, Phase, Player, PlayerId,
    Role, RoleCard, Seconds, SecretPair, format_clock,
};
pub use state_machine::{GameError, GameEvent, GameSession, PlayerView, SessionView};
