//! Session actor message types.

use tokio::sync::oneshot;

use crate::game::{GameError, GameEvent, PlayerId, SessionView};

/// Commands that can be sent to a [`super::SessionActor`].
///
/// Every user-facing command carries a `oneshot` response channel; the tick
/// that drives the countdown is internal to the actor and has no message.
#[derive(Debug)]
pub enum SessionMessage {
    AddPlayer {
        name: String,
        response: oneshot::Sender<Option<PlayerId>>,
    },

    RemovePlayer {
        id: PlayerId,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    SetSpyCount {
        count: u8,
        response: oneshot::Sender<()>,
    },

    StartRound {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    RevealRole {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    AdvanceToNextPlayer {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    ToggleTimer {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    BeginVoting {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    CastVote {
        target: PlayerId,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    ContinueAfterElimination {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    EndGame {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    ResetGame {
        response: oneshot::Sender<Result<(), GameError>>,
    },

    /// Snapshot of the shared-screen state.
    GetView {
        response: oneshot::Sender<SessionView>,
    },

    /// Drain queued presentation hints.
    DrainEvents {
        response: oneshot::Sender<Vec<GameEvent>>,
    },

    /// Stop the actor loop.
    Shutdown,
}
