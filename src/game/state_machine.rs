//! Session state machine for the spy/word party game.
//!
//! The whole core is one [`GameSession`] aggregate plus the transition
//! functions that mutate it. Each transition is gated on the phases it is
//! valid from and rejects everything else; derived quantities (remaining
//! spies, remaining civilians, the summary spy list) are recomputed from the
//! roster on every call and never cached.

use log::{debug, info};
use rand::{Rng, seq::IndexedRandom, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};
use thiserror::Error;

use super::entities::{
    GameSettings, Outcome, Phase, Player, PlayerId, Role, RoleCard, Seconds, SecretPair,
    format_clock,
};
use crate::content::ContentSource;

/// Errors that can occur during session transitions.
///
/// None of these are fatal; every variant is a rejection that leaves the
/// session unchanged.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("need {min}+ players to start a round")]
    InsufficientPlayers { min: usize },
    #[error("can't {action} during the {phase} phase")]
    InvalidPhase { action: String, phase: Phase },
    #[error("player does not exist")]
    PlayerNotFound,
    #[error("player is already eliminated")]
    AlreadyEliminated,
    #[error("current player hasn't seen their role yet")]
    RoleNotRevealed,
    #[error("content source has no categories")]
    NoContent,
}

/// Presentation hints that occur during gameplay.
///
/// These are fire-and-forget: the session queues them and the presentation
/// layer drains them, no return value expected.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameEvent {
    RoundStarted,
    SpyCaught(String),
    CivilianEliminated(String),
    TimeExpired,
    GameEnded,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::RoundStarted => "all roles seen, the round begins".to_string(),
            Self::SpyCaught(name) => format!("{name} was a spy"),
            Self::CivilianEliminated(name) => format!("{name} was not a spy"),
            Self::TimeExpired => "time is up".to_string(),
            Self::GameEnded => "the game ended without a verdict".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// Read-only snapshot of one roster entry, safe to hand to the shared
/// screen (no role information).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub has_seen_role: bool,
    pub is_eliminated: bool,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            has_seen_role: player.has_seen_role,
            is_eliminated: player.is_eliminated,
        }
    }
}

/// Serializable snapshot of everything the shared screen may show outside
/// of a private reveal.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    pub players: Vec<PlayerView>,
    pub clock: String,
    pub timer_running: bool,
    pub category: Option<String>,
    pub outcome: Option<Outcome>,
    pub last_voted: Option<PlayerView>,
}

/// The single mutable aggregate for one game of spy/word.
///
/// Created once with an empty roster in the setup phase, mutated in place by
/// every transition, and never destroyed; `reset_game` returns it to a clean
/// setup state with the roster preserved.
#[derive(Debug)]
pub struct GameSession {
    roster: Vec<Player>,
    phase: Phase,
    secret: Option<SecretPair>,
    reveal_idx: usize,
    role_visible: bool,
    remaining_secs: Seconds,
    timer_running: bool,
    last_voted: Option<PlayerId>,
    outcome: Option<Outcome>,
    settings: GameSettings,
    events: VecDeque<GameEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        let settings = GameSettings::default();
        settings.into()
    }
}

impl From<GameSettings> for GameSession {
    fn from(settings: GameSettings) -> Self {
        Self {
            roster: Vec::new(),
            phase: Phase::Setup,
            secret: None,
            reveal_idx: 0,
            role_visible: false,
            remaining_secs: settings.round_seconds,
            timer_running: false,
            last_voted: None,
            outcome: None,
            settings,
            events: VecDeque::new(),
        }
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn require_phase(&self, expected: Phase, action: &'static str) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                action: action.to_string(),
                phase: self.phase,
            })
        }
    }

    // ------------------------------------------------------------------
    // Roster management
    // ------------------------------------------------------------------

    /// Append a new player to the roster.
    ///
    /// A blank or whitespace-only name is a no-op and returns `None`.
    /// Duplicate names are allowed.
    pub fn add_player(&mut self, name: &str) -> Option<PlayerId> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        let player = Player::new(trimmed);
        let id = player.id;
        debug!("added player {} ({id})", player.name);
        self.roster.push(player);
        Some(id)
    }

    /// Remove a player from the roster. Only legal during setup; removing an
    /// id that isn't present is a no-op.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), GameError> {
        self.require_phase(Phase::Setup, "remove a player")?;
        if let Some(pos) = self.roster.iter().position(|p| p.id == id) {
            let player = self.roster.remove(pos);
            debug!("removed player {} ({id})", player.name);
        }
        Ok(())
    }

    /// Set the requested spy count, silently clamped into 1..=2.
    pub fn set_spy_count(&mut self, count: u8) {
        self.settings.spy_count = count.clamp(1, super::entities::MAX_SPIES);
    }

    // ------------------------------------------------------------------
    // Round start
    // ------------------------------------------------------------------

    /// Draw a category/word pair, assign roles, and enter the reveal phase.
    ///
    /// The effective spy count is `min(requested, roster - 1)` so at least
    /// one civilian always remains; spy seats are drawn without replacement
    /// and independently of player identity. Prior elimination and reveal
    /// state is cleared for every player.
    pub fn start_round(&mut self, content: &dyn ContentSource) -> Result<(), GameError> {
        self.require_phase(Phase::Setup, "start a round")?;
        if self.roster.len() < self.settings.min_players {
            return Err(GameError::InsufficientPlayers {
                min: self.settings.min_players,
            });
        }

        let mut rng = rand::rng();
        let category = content
            .categories()
            .choose(&mut rng)
            .ok_or(GameError::NoContent)?;
        let word = category.words.choose(&mut rng).ok_or(GameError::NoContent)?;
        self.secret = Some(SecretPair {
            category: category.name.clone(),
            word: word.clone(),
        });

        let spy_count = usize::from(self.settings.spy_count).min(self.roster.len() - 1);
        let spy_seats = draw_spy_seats(&mut rng, self.roster.len(), spy_count);
        for (idx, player) in self.roster.iter_mut().enumerate() {
            player.clear_round_state();
            player.role = if spy_seats.contains(&idx) {
                Role::Spy
            } else {
                Role::Civilian
            };
        }

        self.phase = Phase::Reveal;
        self.reveal_idx = 0;
        self.role_visible = false;
        self.remaining_secs = self.settings.round_seconds;
        self.timer_running = false;
        self.last_voted = None;
        self.outcome = None;
        // The secret word stays out of the logs on purpose.
        info!(
            "round started: {} players, {spy_count} spies, category {}",
            self.roster.len(),
            category.name
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reveal progression
    // ------------------------------------------------------------------

    /// Show the current player's role on screen.
    pub fn reveal_role(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::Reveal, "reveal a role")?;
        self.role_visible = true;
        Ok(())
    }

    /// Pass the device to the next player, or start open play after the
    /// last reveal.
    ///
    /// Rejected until the current player has actually seen their role, so a
    /// stray tap can never skip someone's reveal.
    pub fn advance_to_next_player(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::Reveal, "advance the reveal")?;
        if !self.role_visible {
            return Err(GameError::RoleNotRevealed);
        }
        self.roster[self.reveal_idx].has_seen_role = true;
        self.role_visible = false;
        if self.reveal_idx < self.roster.len() - 1 {
            self.reveal_idx += 1;
        } else {
            self.phase = Phase::Playing;
            self.timer_running = true;
            self.events.push_back(GameEvent::RoundStarted);
            info!("all roles seen, discussion begins");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Countdown timer
    // ------------------------------------------------------------------

    /// Pause or resume the countdown. Only legal during open play.
    pub fn toggle_timer(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::Playing, "toggle the timer")?;
        self.timer_running = !self.timer_running;
        Ok(())
    }

    /// Advance the clock by one second.
    ///
    /// A no-op unless the session is in open play with the timer running;
    /// this gate is what makes a stale tick harmless after a vote, a manual
    /// end, or a reset. Reaching zero stops the timer without forcing a
    /// phase change.
    pub fn tick(&mut self) {
        if self.phase != Phase::Playing || !self.timer_running || self.remaining_secs == 0 {
            return;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.timer_running = false;
            self.events.push_back(GameEvent::TimeExpired);
            info!("round clock expired");
        }
    }

    // ------------------------------------------------------------------
    // Voting & elimination
    // ------------------------------------------------------------------

    /// Open the vote. The clock is frozen for the duration because ticks
    /// only count down during open play.
    pub fn begin_voting(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::Playing, "open a vote")?;
        self.phase = Phase::Voting;
        Ok(())
    }

    /// Eliminate the voted player and show the result.
    pub fn cast_vote(&mut self, target: PlayerId) -> Result<(), GameError> {
        self.require_phase(Phase::Voting, "cast a vote")?;
        let player = self
            .roster
            .iter_mut()
            .find(|p| p.id == target)
            .ok_or(GameError::PlayerNotFound)?;
        if player.is_eliminated {
            return Err(GameError::AlreadyEliminated);
        }
        player.is_eliminated = true;
        let event = if player.role == Role::Spy {
            GameEvent::SpyCaught(player.name.clone())
        } else {
            GameEvent::CivilianEliminated(player.name.clone())
        };
        info!("{event}");
        self.events.push_back(event);
        self.last_voted = Some(target);
        self.timer_running = false;
        self.phase = Phase::EliminationResult;
        Ok(())
    }

    /// Resolve the elimination: declare a winner or continue the round.
    ///
    /// Spies need only parity, not a majority: one civilian against one spy
    /// is a spy win. On continuation the same secret and roles persist and
    /// there is no re-reveal.
    pub fn continue_after_elimination(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::EliminationResult, "continue the round")?;
        let spies = self.remaining_spies();
        let civilians = self.remaining_civilians();
        if spies == 0 {
            self.outcome = Some(Outcome::CiviliansWin);
            self.phase = Phase::Summary;
            info!("civilians win");
        } else if civilians <= spies {
            self.outcome = Some(Outcome::SpiesWin);
            self.phase = Phase::Summary;
            info!("spies win: {civilians} civilians vs {spies} spies");
        } else {
            self.last_voted = None;
            self.phase = Phase::Playing;
            self.timer_running = true;
            debug!("round continues: {civilians} civilians vs {spies} spies");
        }
        Ok(())
    }

    /// Forfeit/reveal-now: end the round with no winner declared.
    pub fn end_game(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::Playing, "end the game")?;
        self.timer_running = false;
        self.outcome = None;
        self.phase = Phase::Summary;
        self.events.push_back(GameEvent::GameEnded);
        info!("game ended manually");
        Ok(())
    }

    /// Return to setup for another round with the same group.
    ///
    /// Roster names and ids survive; roles, elimination flags, the secret,
    /// the outcome and the clock are all cleared to their initial values.
    pub fn reset_game(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::Summary, "reset the game")?;
        for player in &mut self.roster {
            player.clear_round_state();
        }
        self.secret = None;
        self.reveal_idx = 0;
        self.role_visible = false;
        self.remaining_secs = self.settings.round_seconds;
        self.timer_running = false;
        self.last_voted = None;
        self.outcome = None;
        self.phase = Phase::Setup;
        info!("session reset to setup");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read-only accessors & derived views
    // ------------------------------------------------------------------

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.roster
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// The player whose turn it is to view their role, during reveal.
    #[must_use]
    pub fn current_reveal_player(&self) -> Option<&Player> {
        if self.phase == Phase::Reveal {
            self.roster.get(self.reveal_idx)
        } else {
            None
        }
    }

    /// What the screen should show right now: `Some` only while the current
    /// player's role is deliberately revealed. This is the sole way role
    /// information leaves the session mid-round.
    #[must_use]
    pub fn current_role_card(&self) -> Option<RoleCard> {
        if self.phase != Phase::Reveal || !self.role_visible {
            return None;
        }
        let player = self.roster.get(self.reveal_idx)?;
        let secret = self.secret.as_ref()?;
        let card = match player.role {
            Role::Spy => RoleCard::Spy,
            _ => RoleCard::SecretWord(secret.word.clone()),
        };
        Some(card)
    }

    #[must_use]
    pub fn role_visible(&self) -> bool {
        self.role_visible
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Seconds {
        self.remaining_secs
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    /// The round clock rendered as `M:SS`.
    #[must_use]
    pub fn format_clock(&self) -> String {
        format_clock(self.remaining_secs)
    }

    #[must_use]
    pub fn secret(&self) -> Option<&SecretPair> {
        self.secret.as_ref()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    pub fn last_voted_player(&self) -> Option<&Player> {
        let id = self.last_voted?;
        self.roster.iter().find(|p| p.id == id)
    }

    /// Spies of the current round's assignment. Meaningful once the phase
    /// reaches summary; computed from the roster on demand.
    #[must_use]
    pub fn spies(&self) -> Vec<&Player> {
        self.roster.iter().filter(|p| p.role == Role::Spy).collect()
    }

    #[must_use]
    pub fn remaining_spies(&self) -> usize {
        self.roster.iter().filter(|p| p.is_active_spy()).count()
    }

    #[must_use]
    pub fn remaining_civilians(&self) -> usize {
        self.roster.iter().filter(|p| p.is_active_civilian()).count()
    }

    #[must_use]
    pub fn eliminated_count(&self) -> usize {
        self.roster.iter().filter(|p| p.is_eliminated).count()
    }

    /// Drain the queued presentation hints.
    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot everything the shared screen may show outside a reveal.
    #[must_use]
    pub fn snapshot(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            players: self.roster.iter().map(PlayerView::from).collect(),
            clock: self.format_clock(),
            timer_running: self.timer_running,
            category: self.secret.as_ref().map(|s| s.category.clone()),
            outcome: self.outcome,
            last_voted: self.last_voted_player().map(PlayerView::from),
        }
    }
}

/// Draw `count` distinct roster positions uniformly at random.
///
/// Partial Fisher-Yates over an index vector: same distribution as
/// draw-and-discard rejection sampling, guaranteed O(n).
fn draw_spy_seats<R: Rng + ?Sized>(rng: &mut R, roster_len: usize, count: usize) -> Vec<usize> {
    let mut seats: Vec<usize> = (0..roster_len).collect();
    seats.shuffle(rng);
    seats.truncate(count);
    seats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Category, ContentSource};
    use std::collections::HashSet;

    struct StubContent {
        categories: Vec<Category>,
    }

    impl StubContent {
        fn new() -> Self {
            Self {
                categories: vec![Category {
                    name: "fruit".to_string(),
                    words: vec!["mango".to_string()],
                }],
            }
        }
    }

    impl ContentSource for StubContent {
        fn categories(&self) -> &[Category] {
            &self.categories
        }
    }

    fn session_with_players(count: usize) -> GameSession {
        let mut session = GameSession::new();
        for i in 0..count {
            session.add_player(&format!("player{i}"));
        }
        session
    }

    fn run_full_reveal(session: &mut GameSession) {
        for _ in 0..session.players().len() {
            session.reveal_role().expect("reveal should be legal");
            session
                .advance_to_next_player()
                .expect("advance should be legal");
        }
    }

    /// Vote out the player at `idx`, returning the session to whatever the
    /// continuation decides.
    fn eliminate(session: &mut GameSession, idx: usize) {
        let id = session.players()[idx].id;
        session.begin_voting().expect("vote should open");
        session.cast_vote(id).expect("vote should land");
        session
            .continue_after_elimination()
            .expect("continuation should be legal");
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let mut session = GameSession::new();
        assert!(session.add_player("").is_none());
        assert!(session.add_player("   ").is_none());
        assert!(session.add_player("\t\n").is_none());
        assert!(session.players().is_empty());
    }

    #[test]
    fn test_duplicate_names_are_allowed() {
        let mut session = GameSession::new();
        let a = session.add_player("alice").expect("name is non-empty");
        let b = session.add_player("alice").expect("name is non-empty");
        assert_ne!(a, b);
        assert_eq!(session.players().len(), 2);
    }

    #[test]
    fn test_remove_player_only_during_setup() {
        let mut session = session_with_players(3);
        let id = session.players()[0].id;

        session.start_round(&StubContent::new()).unwrap();
        assert_eq!(
            session.remove_player(id),
            Err(GameError::InvalidPhase {
                action: "remove a player".to_string(),
                phase: Phase::Reveal,
            })
        );
        assert_eq!(session.players().len(), 3);
    }

    #[test]
    fn test_remove_missing_player_is_noop() {
        let mut session = session_with_players(2);
        session.remove_player(PlayerId::new()).unwrap();
        assert_eq!(session.players().len(), 2);
    }

    #[test]
    fn test_start_round_needs_three_players() {
        let mut session = session_with_players(2);
        assert_eq!(
            session.start_round(&StubContent::new()),
            Err(GameError::InsufficientPlayers { min: 3 })
        );
        assert_eq!(session.phase(), Phase::Setup);
    }

    #[test]
    fn test_start_round_assigns_exact_spy_count() {
        for n in 3..=8 {
            for k in 1..=2u8 {
                let mut session = session_with_players(n);
                session.set_spy_count(k);
                session.start_round(&StubContent::new()).unwrap();

                let spies: Vec<_> = session.spies().iter().map(|p| p.id).collect();
                let distinct: HashSet<_> = spies.iter().copied().collect();
                assert_eq!(spies.len(), usize::from(k).min(n - 1));
                assert_eq!(distinct.len(), spies.len());
                assert_eq!(session.phase(), Phase::Reveal);
                assert_eq!(session.remaining_secs(), 300);
                assert!(!session.timer_running());
            }
        }
    }

    #[test]
    fn test_spy_count_clamps_silently() {
        let mut session = session_with_players(3);
        session.set_spy_count(9);
        assert_eq!(session.settings().spy_count, 2);
        session.start_round(&StubContent::new()).unwrap();
        // Clamped again against roster size: 3 players can have at most 2 spies.
        assert_eq!(session.spies().len(), 2);
    }

    #[test]
    fn test_advance_without_reveal_is_rejected() {
        let mut session = session_with_players(3);
        session.start_round(&StubContent::new()).unwrap();

        assert_eq!(
            session.advance_to_next_player(),
            Err(GameError::RoleNotRevealed)
        );
        assert_eq!(session.phase(), Phase::Reveal);
        assert!(!session.players()[0].has_seen_role);
    }

    #[test]
    fn test_full_reveal_reaches_playing() {
        let mut session = session_with_players(4);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);

        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.timer_running());
        assert!(session.players().iter().all(|p| p.has_seen_role));
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::RoundStarted));
    }

    #[test]
    fn test_role_card_only_visible_after_reveal() {
        let mut session = session_with_players(3);
        session.start_round(&StubContent::new()).unwrap();

        assert!(session.current_role_card().is_none());
        session.reveal_role().unwrap();
        let card = session.current_role_card().expect("role is showing");
        match session.current_reveal_player().expect("reveal is active").role {
            Role::Spy => assert_eq!(card, RoleCard::Spy),
            _ => assert_eq!(card, RoleCard::SecretWord("mango".to_string())),
        }
        session.advance_to_next_player().unwrap();
        assert!(session.current_role_card().is_none());
    }

    #[test]
    fn test_tick_only_counts_down_in_play() {
        let mut session = session_with_players(3);
        session.start_round(&StubContent::new()).unwrap();

        // Reveal phase is untimed.
        session.tick();
        assert_eq!(session.remaining_secs(), 300);

        run_full_reveal(&mut session);
        session.tick();
        assert_eq!(session.remaining_secs(), 299);

        // Paused clock holds.
        session.toggle_timer().unwrap();
        session.tick();
        assert_eq!(session.remaining_secs(), 299);

        // Voting is untimed even with the running flag untouched.
        session.toggle_timer().unwrap();
        session.begin_voting().unwrap();
        session.tick();
        assert_eq!(session.remaining_secs(), 299);
    }

    #[test]
    fn test_clock_expiry_stops_timer() {
        let mut session = session_with_players(3);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);

        for _ in 0..300 {
            session.tick();
        }
        assert_eq!(session.remaining_secs(), 0);
        assert!(!session.timer_running());
        assert_eq!(session.format_clock(), "0:00");
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.drain_events().contains(&GameEvent::TimeExpired));

        // Further ticks are harmless.
        session.tick();
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn test_vote_rejections() {
        let mut session = session_with_players(4);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);
        session.begin_voting().unwrap();

        assert_eq!(
            session.cast_vote(PlayerId::new()),
            Err(GameError::PlayerNotFound)
        );

        let victim = session.players()[0].id;
        session.cast_vote(victim).unwrap();
        assert_eq!(session.phase(), Phase::EliminationResult);
        session.continue_after_elimination().unwrap();

        if session.phase() == Phase::Playing {
            session.begin_voting().unwrap();
            assert_eq!(
                session.cast_vote(victim),
                Err(GameError::AlreadyEliminated)
            );
        }
    }

    #[test]
    fn test_vote_records_last_voted_and_stops_timer() {
        let mut session = session_with_players(4);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);
        session.begin_voting().unwrap();

        let victim = session.players()[1].id;
        session.cast_vote(victim).unwrap();
        assert!(!session.timer_running());
        assert_eq!(
            session.last_voted_player().expect("just voted").id,
            victim
        );
    }

    #[test]
    fn test_spies_win_on_parity() {
        // 5 players, 1 spy: eliminating 3 civilians leaves 1 vs 1.
        let mut session = session_with_players(5);
        session.set_spy_count(1);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);

        let civilians: Vec<_> = session
            .players()
            .iter()
            .filter(|p| p.role == Role::Civilian)
            .map(|p| p.id)
            .collect();
        for id in civilians.iter().take(3) {
            session.begin_voting().unwrap();
            session.cast_vote(*id).unwrap();
            session.continue_after_elimination().unwrap();
        }

        assert_eq!(session.phase(), Phase::Summary);
        assert_eq!(session.outcome(), Some(Outcome::SpiesWin));
        assert_eq!(session.remaining_civilians(), 1);
        assert_eq!(session.remaining_spies(), 1);
    }

    #[test]
    fn test_civilians_win_when_spy_caught() {
        let mut session = session_with_players(4);
        session.set_spy_count(1);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);

        let spy = session.spies()[0].id;
        session.begin_voting().unwrap();
        session.cast_vote(spy).unwrap();
        assert!(session.drain_events().iter().any(|e| matches!(e, GameEvent::SpyCaught(_))));
        session.continue_after_elimination().unwrap();

        assert_eq!(session.phase(), Phase::Summary);
        assert_eq!(session.outcome(), Some(Outcome::CiviliansWin));
    }

    #[test]
    fn test_wrongful_elimination_continues_round() {
        let mut session = session_with_players(5);
        session.set_spy_count(1);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);
        let secret = session.secret().cloned();

        let civilian_idx = session
            .players()
            .iter()
            .position(|p| p.role == Role::Civilian)
            .expect("at least one civilian");
        eliminate(&mut session, civilian_idx);

        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.timer_running());
        assert!(session.last_voted_player().is_none());
        // Same word, same roles, no re-reveal.
        assert_eq!(session.secret().cloned(), secret);
        assert!(session.players().iter().all(|p| p.has_seen_role));
    }

    #[test]
    fn test_elimination_accounting() {
        let mut session = session_with_players(6);
        session.set_spy_count(2);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);

        let ids: Vec<_> = session.players().iter().map(|p| p.id).collect();
        for id in ids {
            if session.phase() != Phase::Playing {
                break;
            }
            session.begin_voting().unwrap();
            session.cast_vote(id).unwrap();
            session.continue_after_elimination().unwrap();
            assert_eq!(
                session.remaining_spies()
                    + session.remaining_civilians()
                    + session.eliminated_count(),
                6
            );
        }
    }

    #[test]
    fn test_end_game_declares_no_winner() {
        let mut session = session_with_players(3);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);

        session.end_game().unwrap();
        assert_eq!(session.phase(), Phase::Summary);
        assert_eq!(session.outcome(), None);
        assert!(!session.timer_running());
        assert!(session.drain_events().contains(&GameEvent::GameEnded));
    }

    #[test]
    fn test_summary_keeps_roles_until_reset() {
        let mut session = session_with_players(3);
        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);
        session.end_game().unwrap();

        assert_eq!(session.spies().len(), 1);
        assert!(session.secret().is_some());

        session.reset_game().unwrap();
        assert!(session.spies().is_empty());
        assert!(session.secret().is_none());
    }

    #[test]
    fn test_reset_round_trip() {
        let mut session = session_with_players(4);
        let before: Vec<_> = session
            .players()
            .iter()
            .map(|p| (p.id, p.name.clone()))
            .collect();

        session.start_round(&StubContent::new()).unwrap();
        run_full_reveal(&mut session);
        eliminate(&mut session, 0);
        if session.phase() == Phase::Playing {
            session.end_game().unwrap();
        }
        session.reset_game().unwrap();

        let after: Vec<_> = session
            .players()
            .iter()
            .map(|p| (p.id, p.name.clone()))
            .collect();
        assert_eq!(before, after);
        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(session.remaining_secs(), 300);
        assert!(!session.timer_running());
        assert!(session.outcome().is_none());
        assert!(session.last_voted_player().is_none());
        assert!(session
            .players()
            .iter()
            .all(|p| p.role == Role::Unassigned && !p.has_seen_role && !p.is_eliminated));

        // A fresh start behaves like a first-ever start on this roster.
        session.start_round(&StubContent::new()).unwrap();
        assert_eq!(session.phase(), Phase::Reveal);
        assert_eq!(session.spies().len(), 1);
    }

    #[test]
    fn test_draw_spy_seats_distinct_and_in_range() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let seats = draw_spy_seats(&mut rng, 7, 2);
            assert_eq!(seats.len(), 2);
            assert_ne!(seats[0], seats[1]);
            assert!(seats.iter().all(|&s| s < 7));
        }
    }

    #[test]
    fn test_snapshot_hides_secret_word() {
        let mut session = session_with_players(3);
        session.start_round(&StubContent::new()).unwrap();
        let view = session.snapshot();

        assert_eq!(view.phase, Phase::Reveal);
        assert_eq!(view.category.as_deref(), Some("fruit"));
        let json = serde_json::to_string(&view).expect("view serializes");
        assert!(!json.contains("mango"));
    }
}
