//! # Undercover
//!
//! Engine for a local "spy word" party game: everyone on one shared device
//! privately views a role — the secret word, or the spy card — then the
//! group discusses, votes someone out, and repeats until the spies are gone
//! or they reach parity with the civilians.
//!
//! The crate is the hidden-information core only: the roster, the role
//! assignment, the reveal protocol, the countdown, and the voting and
//! win-condition logic. Rendering, animation and localization live in
//! whatever presentation layer consumes this.
//!
//! ## Architecture
//!
//! One [`GameSession`] aggregate moves through six phases:
//!
//! - **Setup**: editing the roster and spy count
//! - **Reveal**: each player privately views their role in turn
//! - **Playing**: open discussion under a 5-minute countdown
//! - **Voting**: picking someone to eliminate
//! - **EliminationResult**: showing who was voted out
//! - **Summary**: the winning side (or a manual end) and the spy reveal
//!
//! Every transition is phase-gated and returns `Result<_, GameError>`;
//! invalid calls reject without touching state. Presentation hints
//! ([`GameEvent`]) queue on the session and are drained by the caller.
//!
//! For async hosts, [`session::SessionActor`] owns a `GameSession` on a
//! tokio task, serializes commands through a [`session::SessionHandle`],
//! and drives the countdown from a one-second interval.
//!
//! ## Example
//!
//! ```
//! use undercover::{BuiltinDeck, GameSession, Phase};
//!
//! let mut session = GameSession::new();
//! for name in ["ada", "bruno", "cleo"] {
//!     session.add_player(name);
//! }
//! session.start_round(&BuiltinDeck::new()).unwrap();
//! assert_eq!(session.phase(), Phase::Reveal);
//! ```

/// Core game logic, entities, and the session state machine.
pub mod game;
pub use game::{
    GameError, GameEvent, GameSession, GameSettings, Outcome, Phase, Player, PlayerId, Role,
    RoleCard, SecretPair, SessionView,
};

/// Word-list content source and the built-in deck.
pub mod content;
pub use content::{BuiltinDeck, Category, ContentError, ContentSource, load_categories};

/// Async session hosting (actor + handle).
pub mod session;
pub use session::{SessionActor, SessionHandle};
