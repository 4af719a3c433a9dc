//! Run bookkeeping and simulation state types
//!
//! `RunState` holds what the player keeps between sessions (level, gems,
//! score, name) plus the current screen. `Stage` holds the bodies and course
//! for the level being played.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::course::{Course, CourseId, LevelConfig};
use super::player::PlayerBody;
use super::pursuer::Pursuer;
use crate::persistence::{DEFAULT_PLAYER_NAME, SaveData};

/// Active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Welcome,
    Auth,
    Tutorial,
    /// Active run
    Playing,
    /// Trap challenge in progress
    Trapped,
    LevelComplete,
    GameOver,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Welcome => "welcome",
            Screen::Auth => "auth",
            Screen::Tutorial => "tutorial",
            Screen::Playing => "playing",
            Screen::Trapped => "trapped",
            Screen::LevelComplete => "levelComplete",
            Screen::GameOver => "gameOver",
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// The pursuer reached the runner
    Caught,
    /// Ran into a spike without jumping
    Spike,
    /// Ran into a barrier without sliding
    Barrier,
    /// Wrong symbol in the trap challenge
    TrapFailed,
    /// Trap challenge clock ran out
    TrapTimeout,
}

/// Results shown when a level is finished
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: u32,
    pub gems: u32,
    pub score: u64,
    /// Seconds since the level started
    pub seconds: f64,
}

/// Whole-second countdown driven by tick time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub remaining: u32,
    accum: f32,
}

impl Countdown {
    pub fn new(secs: u32) -> Self {
        Self {
            remaining: secs,
            accum: 0.0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// Advance by `dt`; returns how many whole seconds elapsed
    pub fn update(&mut self, dt: f32) -> u32 {
        if self.is_done() {
            return 0;
        }
        self.accum += dt;
        let mut elapsed = 0;
        while self.accum >= 1.0 && self.remaining > 0 {
            self.accum -= 1.0;
            self.remaining -= 1;
            elapsed += 1;
        }
        elapsed
    }
}

/// Session bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub screen: Screen,
    /// Current level (>= 1)
    pub level: u32,
    pub gems: u32,
    pub score: u64,
    /// Simulation clock (seconds) when the current level started
    pub level_start_time: f64,
    /// Simulation clock (seconds since the session began)
    pub clock: f64,
    pub player_name: String,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            screen: Screen::Welcome,
            level: 1,
            gems: 0,
            score: 0,
            level_start_time: 0.0,
            clock: 0.0,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

impl RunState {
    /// Defaults overlaid with a restored save
    pub fn restored(save: Option<SaveData>) -> Self {
        let mut run = Self::default();
        if let Some(save) = save {
            let save = save.sanitized();
            run.player_name = save.player_name;
            run.level = save.level;
            run.gems = save.gems;
            run.score = save.score;
        }
        run
    }

    /// Persistable subset
    pub fn save_data(&self) -> SaveData {
        SaveData {
            player_name: self.player_name.clone(),
            level: self.level,
            gems: self.gems,
            score: self.score,
        }
    }

    /// Seconds spent on the current level
    pub fn level_elapsed(&self) -> f64 {
        self.clock - self.level_start_time
    }
}

/// Bodies and course for the level being played
#[derive(Debug, Clone)]
pub struct Stage {
    pub config: LevelConfig,
    pub player: PlayerBody,
    pub pursuer: Pursuer,
    pub course: Course,
    /// Hazards that no longer trigger during the current attempt: escaped
    /// traps and the hazard a continue resumed on top of
    pub cleared_hazards: Vec<CourseId>,
    /// Hazard that ended the last run, if one did
    pub fatal_hazard: Option<CourseId>,
}

impl Stage {
    pub fn new(config: LevelConfig, course: Course) -> Self {
        Self {
            player: PlayerBody::default(),
            pursuer: Pursuer::new(&config),
            config,
            course,
            cleared_hazards: Vec::new(),
            fatal_hazard: None,
        }
    }

    /// Put both bodies back at the start line
    pub fn reset_bodies(&mut self) {
        self.player.reset();
        self.pursuer.reset(&self.config);
        self.cleared_hazards.clear();
        self.fatal_hazard = None;
    }

    pub fn player_position(&self) -> Vec3 {
        self.player.position
    }
}
