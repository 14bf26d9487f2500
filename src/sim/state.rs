//! Session state
//!
//! Everything the tick pipeline reads and writes: entity collections, the
//! mode, level counters, the race clock and the match outcome. The random
//! stream is not stored here; callers pass it into every call that spends it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Bounds;
use super::bullet::Bullet;
use super::cpu::CpuBrain;
use super::meteor::Meteor;
use super::rules;
use super::ship::{HumanControl, Pilot, Seat, Ship};
use super::timer::Countdown;
use crate::settings::{ConfigError, Mode, SessionConfig};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Menu-escape toggles this; nothing moves
    Paused,
    /// Match resolved, see `Session::outcome`
    GameOver,
}

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every ship ran out of lives (Original / Cooperative)
    Defeat { level: u32 },
    Winner { seat: Seat, ship: u32 },
    Draw,
}

/// Entity kind tag shared by render output and events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Meteor,
    Bullet,
}

/// Things that happened during a tick, drained by the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { ship: u32 },
    MeteorSplit { meteor: u32, children: usize },
    MeteorDestroyed { meteor: u32 },
    ShipDestroyed { ship: u32 },
    ShipRespawned { ship: u32, lives_left: u32 },
    ShipEliminated { ship: u32 },
    LevelCleared { level: u32 },
    FieldReseeded { count: u32 },
    VersusReset,
    MatchOver { outcome: Outcome },
}

/// Monotonic entity id source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Additions made while a collection is being iterated, merged after the pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pending {
    pub meteors: Vec<Meteor>,
    pub bullets: Vec<Bullet>,
}

impl Pending {
    pub fn is_empty(&self) -> bool {
        self.meteors.is_empty() && self.bullets.is_empty()
    }
}

/// A running match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub mode: Mode,
    pub bounds: Bounds,
    /// Meteors seeded per field; grows by one each cleared level
    pub difficulty: u32,
    /// Fields cleared so far, starting at 1
    pub level: u32,
    /// Counts down in Race mode only
    pub race_clock: Option<Countdown>,
    pub phase: GamePhase,
    pub outcome: Option<Outcome>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ships in seat order
    pub ships: Vec<Ship>,
    pub meteors: Vec<Meteor>,
    pub bullets: Vec<Bullet>,
    pub(crate) pending: Pending,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) ids: IdAllocator,
}

impl Session {
    /// Start a match from `config`
    ///
    /// Invalid configuration is fatal here and never surfaces mid-match.
    pub fn new(config: &SessionConfig, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut session = Self {
            mode: config.mode,
            bounds: config.bounds,
            difficulty: config.difficulty.starting_meteors(),
            level: 1,
            race_clock: (config.mode == Mode::Race).then(|| Countdown::new(config.race_duration_secs)),
            phase: GamePhase::Playing,
            outcome: None,
            time_ticks: 0,
            ships: Vec::new(),
            meteors: Vec::new(),
            bullets: Vec::new(),
            pending: Pending::default(),
            events: Vec::new(),
            ids: IdAllocator::default(),
        };

        let first_pilot = if config.autopilot {
            Pilot::Cpu(CpuBrain::default())
        } else {
            Pilot::Human(HumanControl::default())
        };
        session.add_ship(Seat::One, first_pilot, config.lives);
        if config.mode.has_second_ship() {
            session.add_ship(Seat::Two, Pilot::Cpu(CpuBrain::default()), config.lives);
        }

        if config.mode == Mode::Versus {
            rules::place_for_versus(&mut session.ships, &session.bounds);
        } else {
            rules::seed_field(&mut session, rng);
        }

        log::info!(
            "Session started: mode={} difficulty={} lives={} ships={} meteors={}",
            session.mode.as_str(),
            session.difficulty,
            config.lives,
            session.ships.len(),
            session.meteors.len()
        );
        Ok(session)
    }

    fn add_ship(&mut self, seat: Seat, pilot: Pilot, lives: u32) {
        let id = self.ids.next();
        let ship = Ship::new(id, seat, self.spawn_point(), pilot, lives);
        self.ships.push(ship);
    }

    /// Where ships (re)appear outside Versus
    pub fn spawn_point(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next()
    }

    pub fn ship(&self, id: u32) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }

    pub fn ship_in_seat(&self, seat: Seat) -> Option<&Ship> {
        self.ships.iter().find(|s| s.seat == seat)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Seconds left on the race clock
    pub fn race_remaining(&self) -> Option<f32> {
        self.race_clock.as_ref().map(Countdown::remaining)
    }

    /// Take everything recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move spawned meteors and bullets into the live collections
    pub(crate) fn merge_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.meteors.append(&mut self.pending.meteors);
        self.bullets.append(&mut self.pending.bullets);
    }

    /// Resolve the match
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        log::info!("Match over ({}): {:?}", self.mode.as_str(), outcome);
        self.phase = GamePhase::GameOver;
        self.outcome = Some(outcome);
        self.events.push(GameEvent::MatchOver { outcome });
    }
}
