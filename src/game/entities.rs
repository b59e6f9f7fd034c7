use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Type alias for whole seconds on the round clock.
pub type Seconds = u32;

/// Default length of the discussion countdown (5 minutes).
pub const DEFAULT_ROUND_SECONDS: Seconds = 300;

/// Minimum roster size required to start a round.
pub const MIN_PLAYERS: usize = 3;

/// Hard cap on the configurable spy count.
pub const MAX_SPIES: u8 = 2;

/// Opaque, session-stable player identifier.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PlayerId(Uuid);

impl PlayerId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player's hidden assignment for the current round.
///
/// `Unassigned` is the sentinel outside an active round; it carries no
/// meaning for gameplay and is what every role resets to on `reset_game`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Role {
    Unassigned,
    Civilian,
    Spy,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Unassigned => "unassigned",
            Self::Civilian => "civilian",
            Self::Spy => "spy",
        };
        write!(f, "{repr}")
    }
}

/// The phase tag for the session state machine.
///
/// Legal transitions:
/// `Setup -> Reveal -> Playing -> Voting -> EliminationResult`, then either
/// back to `Playing` (round continues) or on to `Summary` (a side won), and
/// `Summary -> Setup` via reset. `Playing -> Summary` directly models a
/// manual early end.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Phase {
    Setup,
    Reveal,
    Playing,
    Voting,
    EliminationResult,
    Summary,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Setup => "setup",
            Self::Reveal => "reveal",
            Self::Playing => "playing",
            Self::Voting => "voting",
            Self::EliminationResult => "elimination result",
            Self::Summary => "summary",
        };
        write!(f, "{repr}")
    }
}

/// Which side won the round. Absent when the game was ended manually.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Outcome {
    CiviliansWin,
    SpiesWin,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::CiviliansWin => "civilians win",
            Self::SpiesWin => "spies win",
        };
        write!(f, "{repr}")
    }
}

/// The category/word pair drawn for the current round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SecretPair {
    pub category: String,
    pub word: String,
}

/// What the current player sees when their role is revealed: spies get the
/// spy card, everyone else gets the secret word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoleCard {
    Spy,
    SecretWord(String),
}

/// A member of the roster.
///
/// Players are exclusively owned by the session; roster order is insertion
/// order and drives the reveal sequence.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub has_seen_role: bool,
    pub is_eliminated: bool,
}

impl Player {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.trim().to_string(),
            role: Role::Unassigned,
            has_seen_role: false,
            is_eliminated: false,
        }
    }

    /// Clear all per-round state, keeping identity.
    pub fn clear_round_state(&mut self) {
        self.role = Role::Unassigned;
        self.has_seen_role = false;
        self.is_eliminated = false;
    }

    #[must_use]
    pub fn is_active_spy(&self) -> bool {
        self.role == Role::Spy && !self.is_eliminated
    }

    #[must_use]
    pub fn is_active_civilian(&self) -> bool {
        self.role == Role::Civilian && !self.is_eliminated
    }
}

/// Game configuration settings.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    /// Requested spy count; the effective count is clamped to the roster
    /// size minus one at round start.
    pub spy_count: u8,
    pub round_seconds: Seconds,
    pub min_players: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(1, DEFAULT_ROUND_SECONDS, MIN_PLAYERS)
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(spy_count: u8, round_seconds: Seconds, min_players: usize) -> Self {
        Self {
            spy_count,
            round_seconds,
            min_players,
        }
    }
}

/// Render a second count as `M:SS` for the on-screen clock.
#[must_use]
pub fn format_clock(secs: Seconds) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
