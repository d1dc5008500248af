//! Session state and the serialized game loop
//!
//! All mutable game state lives in one [`SessionState`] owned by a single
//! task. The four periodic sources (frame tick, spawn tick, one-second
//! countdown, room poll) and every external input (keystrokes, poll results,
//! shutdown) are funneled into one ordered stream of state-transition
//! messages, so no two transitions ever interleave.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::api::{ApiError, CompetitionClient, Participant, RoomStatusPayload};
use crate::config::{Alphabet, Config};
use crate::util::time;
use crate::words::WordPool;

use super::collision;
use super::entities::{Asteroid, Bullet, EntityId, IdGen, ShipStatus};
use super::field;
use super::input;
use super::scoreboard::Scoreboard;
use super::spawn::Spawner;

/// Points awarded per destroyed asteroid
pub const KILL_REWARD: u32 = 10;

/// Ship-disable duration when no difficulty has been received yet
pub const FALLBACK_DISABLE_SECS: u32 = 4;

/// Authoritative room state, as last polled.
///
/// A wire payload with out-of-range fields converts to the inactive state:
/// fail-closed for spawning, fail-open for display continuity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomState {
    pub is_active: bool,
    pub game_time_secs: u32,
    pub difficulty: Option<u8>,
}

impl RoomState {
    pub fn inactive() -> Self {
        Self { is_active: false, game_time_secs: 0, difficulty: None }
    }

    /// Validate a wire payload into domain state
    pub fn from_payload(payload: RoomStatusPayload) -> Self {
        let game_time = u32::try_from(payload.game_time).ok().filter(|t| *t > 0);
        let difficulty = u8::try_from(payload.difficulty).ok().filter(|d| (1..=5).contains(d));

        match (game_time, difficulty) {
            (Some(game_time_secs), Some(difficulty)) => Self {
                is_active: payload.is_active,
                game_time_secs,
                difficulty: Some(difficulty),
            },
            _ => {
                warn!(
                    game_time = payload.game_time,
                    difficulty = payload.difficulty,
                    "Out-of-range room status, treating as inactive"
                );
                Self::inactive()
            }
        }
    }
}

/// State-transition messages applied by the session dispatcher
#[derive(Debug)]
pub(crate) enum SessionMsg {
    Frame,
    SpawnTick,
    SecondTick,
    RoomStatus(RoomState),
    /// Transport failure on the room poll; last known state is retained
    RoomUnavailable,
    Roster(Vec<Participant>),
    Key(char),
    Shutdown,
}

/// Events published to renderers and other observers
#[derive(Debug, Clone)]
pub enum GameEvent {
    SessionStarted { seconds: u32 },
    SessionEnded,
    TimerTick { seconds_left: u32 },
    AsteroidSpawned { id: EntityId, word: String, x: f32, y: f32, radius: f32 },
    AsteroidEscaped { id: EntityId },
    AsteroidDestroyed { id: EntityId, word: String },
    ShotFired { bullet: EntityId, target: EntityId },
    ShipDisabled { seconds: u32 },
    ShipRestored,
    ScoreChanged { user: String, score: u32 },
    RosterUpdated { participants: Vec<Participant> },
}

/// The whole local game state for one competition session
pub struct SessionState {
    pub user_name: String,
    pub alphabet: Alphabet,
    /// Whether a round is running locally
    pub active: bool,
    /// Local session countdown, seconds
    pub time_left: u32,
    /// Difficulty from the last well-formed room status
    pub difficulty: Option<u8>,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub ship: ShipStatus,
    pub scoreboard: Scoreboard,
    pub words: WordPool,
    spawner: Spawner,
    ids: IdGen,
}

impl SessionState {
    pub fn new(user_name: String, alphabet: Alphabet, seed: u64) -> Self {
        Self {
            user_name,
            alphabet,
            active: false,
            time_left: 0,
            difficulty: None,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            ship: ShipStatus::Active,
            scoreboard: Scoreboard::new(),
            words: WordPool::new(Vec::new()),
            spawner: Spawner::new(ChaCha8Rng::seed_from_u64(seed)),
            ids: IdGen::new(),
        }
    }

    /// Dispatch one state-transition message
    pub(crate) fn apply(&mut self, msg: SessionMsg) -> Vec<GameEvent> {
        match msg {
            SessionMsg::Frame => self.step_frame(),
            SessionMsg::SpawnTick => self.spawn_tick(),
            SessionMsg::SecondTick => self.second_tick(),
            SessionMsg::RoomStatus(room) => self.apply_room_status(room),
            SessionMsg::RoomUnavailable => Vec::new(),
            SessionMsg::Roster(roster) => self.apply_roster(roster),
            SessionMsg::Key(c) => self.apply_key(c),
            // Termination is handled by the run loop
            SessionMsg::Shutdown => Vec::new(),
        }
    }

    /// Reconcile with a polled room status. A false-to-true edge starts a
    /// fresh round: countdown reset, entities cleared, ship restored.
    pub fn apply_room_status(&mut self, room: RoomState) -> Vec<GameEvent> {
        if let Some(difficulty) = room.difficulty {
            self.difficulty = Some(difficulty);
        }

        let mut events = Vec::new();
        if room.is_active && !self.active {
            self.active = true;
            self.time_left = room.game_time_secs;
            self.asteroids.clear();
            self.bullets.clear();
            self.ship = ShipStatus::Active;
            events.push(GameEvent::SessionStarted { seconds: self.time_left });
        } else if !room.is_active && self.active {
            self.active = false;
            events.push(GameEvent::SessionEnded);
        }
        events
    }

    pub fn apply_roster(&mut self, roster: Vec<Participant>) -> Vec<GameEvent> {
        self.scoreboard.apply_roster(&roster);
        vec![GameEvent::RosterUpdated { participants: roster }]
    }

    /// One simulation frame: integrate positions, prune out-of-bounds and
    /// spent entities, then resolve collisions on the settled positions.
    pub fn step_frame(&mut self) -> Vec<GameEvent> {
        if !self.active {
            return Vec::new();
        }
        let mut events = Vec::new();

        // Whole-population update; each entity reads only its own prior state
        for asteroid in &mut self.asteroids {
            asteroid.advance();
        }
        let mut kept = Vec::with_capacity(self.asteroids.len());
        for asteroid in self.asteroids.drain(..) {
            if field::in_bounds(asteroid.x, asteroid.y) {
                kept.push(asteroid);
            } else {
                events.push(GameEvent::AsteroidEscaped { id: asteroid.id });
            }
        }
        self.asteroids = kept;

        self.bullets.retain_mut(|bullet| bullet.advance());

        let resolution = collision::resolve_frame(&self.bullets, &self.asteroids);
        self.bullets.retain(|bullet| !resolution.spent_bullets.contains(&bullet.id));
        for id in &resolution.destroyed {
            if let Some(idx) = self.asteroids.iter().position(|a| a.id == *id) {
                let destroyed = self.asteroids.remove(idx);
                let score = self.scoreboard.add_points(&self.user_name, KILL_REWARD);
                events.push(GameEvent::AsteroidDestroyed {
                    id: destroyed.id,
                    word: destroyed.word,
                });
                events.push(GameEvent::ScoreChanged {
                    user: self.user_name.clone(),
                    score,
                });
            }
        }

        // Ship contact disables input for a difficulty-scaled duration.
        // The asteroid survives; re-contact while disabled is ignored.
        for asteroid in &self.asteroids {
            if collision::hits_ship(asteroid) {
                let seconds = self
                    .difficulty
                    .map(|d| u32::from(d) * 2)
                    .unwrap_or(FALLBACK_DISABLE_SECS);
                if self.ship.damage(seconds) {
                    events.push(GameEvent::ShipDisabled { seconds });
                }
            }
        }

        events
    }

    /// Spawn one asteroid while a round is running and the pool has words
    pub fn spawn_tick(&mut self) -> Vec<GameEvent> {
        if !self.active || self.words.is_empty() {
            return Vec::new();
        }
        let id = self.ids.next();
        match self.spawner.spawn(&self.words, id) {
            Some(asteroid) => {
                let event = GameEvent::AsteroidSpawned {
                    id: asteroid.id,
                    word: asteroid.word.clone(),
                    x: asteroid.x,
                    y: asteroid.y,
                    radius: asteroid.radius,
                };
                self.asteroids.push(asteroid);
                vec![event]
            }
            None => Vec::new(),
        }
    }

    /// Once-per-second countdowns: ship-disable first, then session time.
    /// Reaching zero ends the round locally, independent of the next poll.
    pub fn second_tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.ship.second_tick() {
            events.push(GameEvent::ShipRestored);
        }

        if self.active {
            self.time_left = self.time_left.saturating_sub(1);
            events.push(GameEvent::TimerTick { seconds_left: self.time_left });
            if self.time_left == 0 {
                self.active = false;
                events.push(GameEvent::SessionEnded);
            }
        }

        events
    }

    /// Match a keystroke to the nearest eligible asteroid and fire at it.
    /// A keystroke matching nothing is silently ignored.
    pub fn apply_key(&mut self, raw: char) -> Vec<GameEvent> {
        if !self.active || self.ship.is_disabled() {
            return Vec::new();
        }
        let Some(c) = input::normalize_key(raw, self.alphabet) else {
            return Vec::new();
        };
        let Some(idx) = input::select_target(&self.asteroids, c) else {
            return Vec::new();
        };

        let asteroid = &mut self.asteroids[idx];
        asteroid.typed += 1;

        // Target point is frozen here; the bullet never re-tracks
        let bullet = Bullet::fired_at(
            self.ids.next(),
            (field::SHIP_X, field::SHIP_Y),
            (asteroid.x, asteroid.y),
        );
        let event = GameEvent::ShotFired { bullet: bullet.id, target: asteroid.id };
        self.bullets.push(bullet);
        vec![event]
    }
}

/// Handle for feeding keystrokes into a running session and observing it.
///
/// Dropping every handle closes the session's message queue and ends the run
/// loop, which stops all periodic activity.
#[derive(Clone)]
pub struct SessionHandle {
    msg_tx: mpsc::Sender<SessionMsg>,
    event_tx: broadcast::Sender<GameEvent>,
}

impl SessionHandle {
    /// Forward one key event
    pub async fn keystroke(&self, c: char) {
        let _ = self.msg_tx.send(SessionMsg::Key(c)).await;
    }

    /// Stop the session and all of its timers
    pub async fn shutdown(&self) {
        let _ = self.msg_tx.send(SessionMsg::Shutdown).await;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.event_tx.subscribe()
    }
}

/// One competition session: joins the room, polls it, runs the simulation
pub struct GameSession {
    state: SessionState,
    client: CompetitionClient,
    msg_rx: mpsc::Receiver<SessionMsg>,
    /// Weak so that dropping every handle closes the queue
    msg_tx: mpsc::WeakSender<SessionMsg>,
    event_tx: broadcast::Sender<GameEvent>,
}

impl GameSession {
    pub fn new(config: &Config, client: CompetitionClient) -> (Self, SessionHandle) {
        let (msg_tx, msg_rx) = mpsc::channel(256);
        let (event_tx, _) = broadcast::channel(256);

        let handle = SessionHandle { msg_tx: msg_tx.clone(), event_tx: event_tx.clone() };
        let session = Self {
            state: SessionState::new(
                config.user_name.clone(),
                config.alphabet,
                rand::random::<u64>(),
            ),
            client,
            msg_rx,
            msg_tx: msg_tx.downgrade(),
            event_tx,
        };

        (session, handle)
    }

    /// Run the session until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        info!(user = %self.state.user_name, "Joining competition room");
        if let Err(err) = self.client.join().await {
            warn!(error = %err, "Join request failed, continuing with polls");
        }
        self.state.words = WordPool::load(&self.client).await;

        let mut frame = interval(time::frame_interval());
        frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut spawn = interval(time::SPAWN_INTERVAL);
        spawn.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut second = interval(time::COUNTDOWN_INTERVAL);
        second.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut poll = interval(time::POLL_INTERVAL);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let events = tokio::select! {
                _ = frame.tick() => self.state.apply(SessionMsg::Frame),
                _ = spawn.tick() => self.state.apply(SessionMsg::SpawnTick),
                _ = second.tick() => self.state.apply(SessionMsg::SecondTick),
                _ = poll.tick() => {
                    self.start_poll();
                    Vec::new()
                }
                msg = self.msg_rx.recv() => match msg {
                    Some(SessionMsg::Shutdown) | None => break,
                    Some(msg) => self.state.apply(msg),
                },
            };
            self.publish(events);
        }
        // Interval timers are dropped here; nothing periodic survives the loop

        info!("Competition session stopped");
    }

    /// Poll room status and roster without stalling the simulation; results
    /// re-enter the loop as ordinary messages.
    fn start_poll(&self) {
        let Some(tx) = self.msg_tx.upgrade() else { return };
        let client = self.client.clone();

        tokio::spawn(async move {
            match client.room_status().await {
                Ok(payload) => {
                    let room = RoomState::from_payload(payload);
                    let _ = tx.send(SessionMsg::RoomStatus(room)).await;
                }
                Err(ApiError::Parse(err)) => {
                    warn!(error = %err, "Malformed room status, treating as inactive");
                    let _ = tx.send(SessionMsg::RoomStatus(RoomState::inactive())).await;
                }
                Err(err) => {
                    warn!(error = %err, "Room status poll failed, retaining last state");
                    let _ = tx.send(SessionMsg::RoomUnavailable).await;
                }
            }

            match client.participants().await {
                Ok(roster) => {
                    let _ = tx.send(SessionMsg::Roster(roster)).await;
                }
                Err(err) => warn!(error = %err, "Roster poll failed"),
            }
        });
    }

    fn publish(&self, events: Vec<GameEvent>) {
        for event in events {
            if let GameEvent::ScoreChanged { user, score } = &event {
                if user == &self.state.user_name {
                    self.push_score(*score);
                }
            }
            let _ = self.event_tx.send(event);
        }
    }

    /// Best-effort score push; failures are logged, never retried
    fn push_score(&self, score: u32) {
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(err) = client.report_score(score).await {
                warn!(error = %err, score, "Score push failed");
            }
        });
    }
}
