//! The zombie that chases the runner
//!
//! Each tick the pursuer eases toward a point trailing the runner. Closing
//! along the run axis is twice as quick as correcting sideways.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::course::LevelConfig;
use crate::consts::*;
use crate::{lerp, planar_distance};

/// Pursuer state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub position: Vec3,
    /// Base chase speed for the current level
    pub base_speed: f32,
}

impl Default for Pursuer {
    fn default() -> Self {
        Self::new(&LevelConfig::for_level(1))
    }
}

impl Pursuer {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            position: Vec3::new(0.0, GROUND_HEIGHT, PURSUER_START_OFFSET),
            base_speed: config.pursuer_speed,
        }
    }

    /// Back behind the start line with the level's speed
    pub fn reset(&mut self, config: &LevelConfig) {
        *self = Self::new(config);
    }

    /// Place the pursuer at its start offset behind a runner at `z`
    pub fn respawn_behind(&mut self, z: f32) {
        self.position = Vec3::new(0.0, GROUND_HEIGHT, z + PURSUER_START_OFFSET);
    }

    /// Point the pursuer steers toward
    ///
    /// The trailing gap shrinks with the runner's pace: a runner at full level
    /// speed keeps the full gap, a stalled runner keeps none.
    pub fn chase_target(runner: Vec3, runner_speed: f32, config: &LevelConfig) -> Vec3 {
        let pace = if config.player_speed > 0.0 {
            (runner_speed / config.player_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Vec3::new(runner.x, GROUND_HEIGHT, runner.z + PURSUER_TRAIL_OFFSET * pace)
    }

    /// Advance one tick; returns true if the runner was caught
    pub fn update(&mut self, runner: Vec3, runner_speed: f32, config: &LevelConfig, dt: f32) -> bool {
        let target = Self::chase_target(runner, runner_speed, config);
        let follow = ((self.base_speed + config.pursuer_bonus) * dt).clamp(0.0, 1.0);

        self.position.x = lerp(self.position.x, target.x, follow * 0.5);
        self.position.z = lerp(self.position.z, target.z, follow);
        self.position.y = GROUND_HEIGHT;

        self.has_caught(runner)
    }

    /// Whether the runner is inside the catch radius
    pub fn has_caught(&self, runner: Vec3) -> bool {
        planar_distance(self.position, runner) < CATCH_RADIUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catches_stalled_runner() {
        let config = LevelConfig::for_level(1);
        let mut pursuer = Pursuer::new(&config);
        let runner = Vec3::new(0.0, GROUND_HEIGHT, 0.0);
        assert!(!pursuer.has_caught(runner));

        let mut caught = false;
        for _ in 0..600 {
            if pursuer.update(runner, 0.0, &config, SIM_DT) {
                caught = true;
                break;
            }
        }
        assert!(caught);
    }

    #[test]
    fn test_trails_full_speed_runner() {
        let config = LevelConfig::for_level(1);
        let mut pursuer = Pursuer::new(&config);
        let mut runner = Vec3::new(0.0, GROUND_HEIGHT, 0.0);

        for _ in 0..1200 {
            runner.z -= config.player_speed * SIM_DT;
            assert!(!pursuer.update(runner, config.player_speed, &config, SIM_DT));
        }
        let gap = pursuer.position.z - runner.z;
        assert!(gap >= PURSUER_TRAIL_OFFSET, "gap {}", gap);
        assert!(gap < PURSUER_TRAIL_OFFSET + 5.0, "gap {}", gap);
    }

    #[test]
    fn test_lateral_correction_is_slower() {
        let config = LevelConfig::for_level(1);
        let mut pursuer = Pursuer::new(&config);
        pursuer.position = Vec3::new(0.0, GROUND_HEIGHT, 10.0);
        let runner = Vec3::new(4.0, GROUND_HEIGHT, -10.0);
        pursuer.update(runner, 0.0, &config, SIM_DT);

        let lateral_progress = pursuer.position.x / 4.0;
        let forward_progress = (10.0 - pursuer.position.z) / 20.0;
        assert!((forward_progress - 2.0 * lateral_progress).abs() < 1e-4);
    }

    #[test]
    fn test_height_pinned() {
        let config = LevelConfig::for_level(2);
        let mut pursuer = Pursuer::new(&config);
        pursuer.position.y = 7.0;
        pursuer.update(Vec3::new(0.0, 5.0, -30.0), 0.0, &config, SIM_DT);
        assert_eq!(pursuer.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn test_long_step_does_not_overshoot() {
        let config = LevelConfig::for_level(5);
        let mut pursuer = Pursuer::new(&config);
        let runner = Vec3::new(0.0, GROUND_HEIGHT, -100.0);
        pursuer.update(runner, 0.0, &config, 10.0);
        assert!((pursuer.position.z - runner.z).abs() < 1e-3);
    }
}
