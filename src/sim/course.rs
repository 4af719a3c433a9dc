//! Level configuration and procedural course layout
//!
//! A course is the set of hazards and gems laid out ahead of the runner for one
//! level. The shape (counts, spacing, bands) is fixed by the level index; exact
//! placements come from the session RNG.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::BoxExtent;
use crate::consts::LANES;

/// Hazard rows start this far ahead of the start line
pub const HAZARD_START_Z: f32 = -50.0;
/// Distance between hazard rows
pub const HAZARD_SPACING: f32 = 15.0;
/// Maximum backward jitter per hazard row
pub const HAZARD_JITTER: f32 = 10.0;
/// Hazard rows on level 0 (before per-level growth)
pub const HAZARD_BASE_COUNT: u32 = 50;
/// Additional hazard rows per level
pub const HAZARD_COUNT_PER_LEVEL: u32 = 10;
/// Hazard row cap
pub const HAZARD_MAX_COUNT: u32 = 100;

/// Gem rows start this far ahead of the start line
pub const GEM_START_Z: f32 = -20.0;
/// Distance between gem rows
pub const GEM_SPACING: f32 = 8.0;
/// Maximum backward jitter per gem row
pub const GEM_JITTER: f32 = 5.0;
/// Gem rows per level
pub const GEM_COUNT: u32 = 100;
/// Chance that a gem row actually holds a gem
pub const GEM_CHANCE: f32 = 0.6;
/// Sideways scatter around the lane centre (±)
pub const GEM_LANE_SCATTER: f32 = 1.0;
/// Lowest gem height
pub const GEM_MIN_HEIGHT: f32 = 1.5;
/// Height band above the lowest gem height
pub const GEM_HEIGHT_BAND: f32 = 2.0;
/// Gem half-extents
pub const GEM_EXTENT: BoxExtent = BoxExtent::new(0.5, 0.5, 0.5);

/// Per-level tuning, derived purely from the level index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level index (always >= 1)
    pub level: u32,
    /// Hazard rows considered by the generator
    pub hazard_rows: u32,
    /// Chance that a hazard row is populated (>= 1 means always)
    pub hazard_chance: f32,
    /// Gem rows considered by the generator
    pub gem_rows: u32,
    /// Chance that a gem row is populated
    pub gem_chance: f32,
    /// Runner forward speed (units/s)
    pub player_speed: f32,
    /// Pursuer base chase speed
    pub pursuer_speed: f32,
    /// Extra pursuer speed granted by the level
    pub pursuer_bonus: f32,
    /// Forward distance from the start line that completes the level
    pub completion_distance: f32,
}

impl LevelConfig {
    /// Build the config for a level; indices below 1 fall back to level 1
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let l = level as f32;
        Self {
            level,
            hazard_rows: (HAZARD_BASE_COUNT + HAZARD_COUNT_PER_LEVEL * level).min(HAZARD_MAX_COUNT),
            hazard_chance: 0.3 + 0.1 * l,
            gem_rows: GEM_COUNT,
            gem_chance: GEM_CHANCE,
            player_speed: (12.0 + 0.5 * l).min(20.0),
            pursuer_speed: (8.0 + 0.5 * l).min(16.0),
            pursuer_bonus: 0.5 * l,
            completion_distance: (400.0 + 100.0 * (l - 1.0)).min(1500.0),
        }
    }

    /// z coordinate the runner must pass to finish the level
    pub fn finish_z(&self) -> f32 {
        -self.completion_distance
    }
}

/// Identity of a generated entity; the level is part of the key so ids never
/// collide across regenerated courses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId {
    pub level: u32,
    pub index: u32,
}

/// Hazard types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Low block on the ground, jump over it
    Spike,
    /// Raised bar, slide under it
    Barrier,
    /// Flush plate that springs the trap challenge
    Trap,
}

impl HazardKind {
    pub const ALL: [HazardKind; 3] = [HazardKind::Spike, HazardKind::Barrier, HazardKind::Trap];

    /// Half-extents of this hazard
    pub fn extent(&self) -> BoxExtent {
        match self {
            HazardKind::Spike => BoxExtent::new(1.0, 0.5, 1.0),
            HazardKind::Barrier => BoxExtent::new(1.5, 1.0, 0.5),
            HazardKind::Trap => BoxExtent::new(1.5, 0.25, 1.5),
        }
    }

    /// Centre height of this hazard
    pub fn center_height(&self) -> f32 {
        match self {
            HazardKind::Spike => 0.5,
            HazardKind::Barrier => 2.5,
            HazardKind::Trap => 0.0,
        }
    }
}

/// A stationary hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: CourseId,
    pub kind: HazardKind,
    pub position: Vec3,
    pub extent: BoxExtent,
}

/// A collectible gem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gem {
    pub id: CourseId,
    pub position: Vec3,
    pub collected: bool,
}

/// Hazards and gems for one level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    /// Level this course was generated for
    pub level: u32,
    /// Hazards ordered by id
    pub hazards: Vec<Hazard>,
    /// Gems ordered by id
    pub gems: Vec<Gem>,
}

impl Course {
    /// Lay out a fresh course for the given level
    pub fn generate<R: Rng>(config: &LevelConfig, rng: &mut R) -> Self {
        let hazards = generate_hazards(config, rng);
        let gems = generate_gems(config, rng);
        log::info!(
            "Level {} course: {} hazards, {} gems, finish at z={}",
            config.level,
            hazards.len(),
            gems.len(),
            config.finish_z()
        );
        Self {
            level: config.level,
            hazards,
            gems,
        }
    }

    /// Gems still waiting to be collected
    pub fn remaining_gems(&self) -> impl Iterator<Item = &Gem> {
        self.gems.iter().filter(|g| !g.collected)
    }

    /// Look up a gem by id
    pub fn gem_mut(&mut self, id: CourseId) -> Option<&mut Gem> {
        self.gems.iter_mut().find(|g| g.id == id)
    }
}

fn pick_lane<R: Rng>(rng: &mut R) -> f32 {
    LANES[rng.random_range(0..LANES.len())]
}

fn generate_hazards<R: Rng>(config: &LevelConfig, rng: &mut R) -> Vec<Hazard> {
    let mut hazards = Vec::new();
    for i in 0..config.hazard_rows {
        let z = HAZARD_START_Z - i as f32 * HAZARD_SPACING - rng.random::<f32>() * HAZARD_JITTER;
        let lane = pick_lane(rng);

        // Chances of 1 or more always place
        if rng.random::<f32>() >= config.hazard_chance {
            continue;
        }

        let kind = HazardKind::ALL[rng.random_range(0..HazardKind::ALL.len())];
        let extent = kind.extent();
        if !extent.is_valid() {
            log::warn!("Skipping {:?} with degenerate extent {:?}", kind, extent);
            continue;
        }
        hazards.push(Hazard {
            id: CourseId {
                level: config.level,
                index: i,
            },
            kind,
            position: Vec3::new(lane, kind.center_height(), z),
            extent,
        });
    }
    hazards
}

fn generate_gems<R: Rng>(config: &LevelConfig, rng: &mut R) -> Vec<Gem> {
    let mut gems = Vec::new();
    for i in 0..config.gem_rows {
        let z = GEM_START_Z - i as f32 * GEM_SPACING - rng.random::<f32>() * GEM_JITTER;
        let lane = pick_lane(rng);

        if rng.random::<f32>() >= config.gem_chance {
            continue;
        }

        let x = lane + (rng.random::<f32>() - 0.5) * 2.0 * GEM_LANE_SCATTER;
        let y = GEM_MIN_HEIGHT + rng.random::<f32>() * GEM_HEIGHT_BAND;
        gems.push(Gem {
            id: CourseId {
                level: config.level,
                index: i,
            },
            position: Vec3::new(x, y, z),
            collected: false,
        });
    }
    gems
}
