//! Session actor owning the game state and the one-second clock.
//!
//! The presentation layer talks to the session through a [`SessionHandle`];
//! the actor serializes every command and every clock tick onto one task, so
//! there is exactly one clock and a tick can never race a phase change. A
//! tick that arrives after the session has left open play lands in
//! `GameSession::tick`, which ignores it.

use std::time::Duration;

use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    time::interval,
};

use super::messages::SessionMessage;
use crate::{
    content::ContentSource,
    game::{GameError, GameEvent, GameSession, GameSettings, PlayerId, SessionView},
};

/// The handle's only failure mode: the actor task is gone.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("session is closed")]
pub struct SessionClosed;

/// Cloneable handle for sending commands to a running session.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
}

macro_rules! request {
    ($self:expr, $variant:ident $(, $field:ident : $value:expr)*) => {{
        let (response, rx) = oneshot::channel();
        $self
            .sender
            .send(SessionMessage::$variant { $($field: $value,)* response })
            .await
            .map_err(|_| SessionClosed)?;
        rx.await.map_err(|_| SessionClosed)
    }};
}

impl SessionHandle {
    pub async fn add_player(&self, name: &str) -> Result<Option<PlayerId>, SessionClosed> {
        request!(self, AddPlayer, name: name.to_string())
    }

    pub async fn remove_player(
        &self,
        id: PlayerId,
    ) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, RemovePlayer, id: id)
    }

    pub async fn set_spy_count(&self, count: u8) -> Result<(), SessionClosed> {
        request!(self, SetSpyCount, count: count)
    }

    pub async fn start_round(&self) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, StartRound)
    }

    pub async fn reveal_role(&self) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, RevealRole)
    }

    pub async fn advance_to_next_player(&self) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, AdvanceToNextPlayer)
    }

    pub async fn toggle_timer(&self) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, ToggleTimer)
    }

    pub async fn begin_voting(&self) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, BeginVoting)
    }

    pub async fn cast_vote(
        &self,
        target: PlayerId,
    ) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, CastVote, target: target)
    }

    pub async fn continue_after_elimination(
        &self,
    ) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, ContinueAfterElimination)
    }

    pub async fn end_game(&self) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, EndGame)
    }

    pub async fn reset_game(&self) -> Result<Result<(), GameError>, SessionClosed> {
        request!(self, ResetGame)
    }

    pub async fn view(&self) -> Result<SessionView, SessionClosed> {
        request!(self, GetView)
    }

    pub async fn drain_events(&self) -> Result<Vec<GameEvent>, SessionClosed> {
        request!(self, DrainEvents)
    }

    /// Ask the actor to stop. Any handle used afterwards sees
    /// [`SessionClosed`].
    pub async fn shutdown(&self) -> Result<(), SessionClosed> {
        self.sender
            .send(SessionMessage::Shutdown)
            .await
            .map_err(|_| SessionClosed)
    }
}

/// Actor owning one [`GameSession`] and its countdown clock.
pub struct SessionActor<C> {
    session: GameSession,
    content: C,
    inbox: mpsc::Receiver<SessionMessage>,
}

impl<C> SessionActor<C>
where
    C: ContentSource + Send + 'static,
{
    /// Create an actor and the handle for talking to it.
    pub fn new(settings: GameSettings, content: C) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(64);
        let actor = Self {
            session: GameSession::from(settings),
            content,
            inbox,
        };
        (actor, SessionHandle { sender })
    }

    /// Create an actor, spawn its loop onto the current runtime, and return
    /// the handle.
    pub fn spawn(settings: GameSettings, content: C) -> SessionHandle {
        let (actor, handle) = Self::new(settings, content);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the actor event loop until shutdown or until every handle is
    /// dropped.
    pub async fn run(mut self) {
        log::info!("session actor starting");
        let mut tick_interval = interval(Duration::from_secs(1));
        // The first tick of a tokio interval fires immediately; consume it
        // so the clock starts counting a full second from now.
        tick_interval.tick().await;

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    match message {
                        Some(SessionMessage::Shutdown) | None => break,
                        Some(message) => self.handle_message(message),
                    }
                }

                _ = tick_interval.tick() => {
                    self.session.tick();
                }
            }
        }
        log::info!("session actor closed");
    }

    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::AddPlayer { name, response } => {
                let _ = response.send(self.session.add_player(&name));
            }
            SessionMessage::RemovePlayer { id, response } => {
                let _ = response.send(self.session.remove_player(id));
            }
            SessionMessage::SetSpyCount { count, response } => {
                self.session.set_spy_count(count);
                let _ = response.send(());
            }
            SessionMessage::StartRound { response } => {
                let _ = response.send(self.session.start_round(&self.content));
            }
            SessionMessage::RevealRole { response } => {
                let _ = response.send(self.session.reveal_role());
            }
            SessionMessage::AdvanceToNextPlayer { response } => {
                let _ = response.send(self.session.advance_to_next_player());
            }
            SessionMessage::ToggleTimer { response } => {
                let _ = response.send(self.session.toggle_timer());
            }
            SessionMessage::BeginVoting { response } => {
                let _ = response.send(self.session.begin_voting());
            }
            SessionMessage::CastVote { target, response } => {
                let _ = response.send(self.session.cast_vote(target));
            }
            SessionMessage::ContinueAfterElimination { response } => {
                let _ = response.send(self.session.continue_after_elimination());
            }
            SessionMessage::EndGame { response } => {
                let _ = response.send(self.session.end_game());
            }
            SessionMessage::ResetGame { response } => {
                let _ = response.send(self.session.reset_game());
            }
            SessionMessage::GetView { response } => {
                let _ = response.send(self.session.snapshot());
            }
            SessionMessage::DrainEvents { response } => {
                let _ = response.send(self.session.drain_events().into());
            }
            // Intercepted by the run loop before dispatch.
            SessionMessage::Shutdown => {}
        }
    }
}
