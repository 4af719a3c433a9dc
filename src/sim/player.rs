//! Runner body kinematics
//!
//! Lane movement, constant forward travel and the jump/slide state machine.
//! Jumping and sliding are mutually exclusive and may only start from the ground.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Abstract control intents sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub slide: bool,
}

/// A maneuver started during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    Jump,
    Slide,
}

/// The controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Centre position; x is the lane axis, -z is forward
    pub position: Vec3,
    /// Vertical velocity while airborne
    pub vertical_velocity: f32,
    pub is_jumping: bool,
    pub is_sliding: bool,
    /// Seconds left before the slide ends
    pub slide_time_remaining: f32,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, GROUND_HEIGHT, 0.0),
            vertical_velocity: 0.0,
            is_jumping: false,
            is_sliding: false,
            slide_time_remaining: 0.0,
        }
    }
}

impl PlayerBody {
    /// Back to the start line with no maneuver in flight
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Stand up at the given forward position, centred in the middle lane
    pub fn resume_at(&mut self, z: f32) {
        self.reset();
        self.position.z = z;
    }

    /// Whether the body rests at ground height
    pub fn on_ground(&self) -> bool {
        (self.position.y - GROUND_HEIGHT).abs() <= GROUND_EPSILON
    }

    /// Whether a jump or slide may start now
    pub fn can_maneuver(&self) -> bool {
        !self.is_jumping && !self.is_sliding && self.on_ground()
    }

    /// Advance one tick
    ///
    /// Returns the maneuver started this tick, if any. Jump wins when both
    /// jump and slide are requested together.
    pub fn update(&mut self, intents: &Intents, forward_speed: f32, dt: f32) -> Option<Maneuver> {
        // Lateral
        if intents.move_left {
            self.position.x -= LATERAL_SPEED * dt;
        }
        if intents.move_right {
            self.position.x += LATERAL_SPEED * dt;
        }
        self.position.x = self.position.x.clamp(-LATERAL_LIMIT, LATERAL_LIMIT);

        // Forward
        self.position.z -= forward_speed * dt;

        // Slide countdown
        if self.is_sliding {
            self.slide_time_remaining -= dt;
            if self.slide_time_remaining <= 0.0 {
                self.is_sliding = false;
                self.slide_time_remaining = 0.0;
                self.position.y = GROUND_HEIGHT;
            }
        }

        let mut started = None;
        if self.can_maneuver() {
            if intents.jump {
                self.is_jumping = true;
                self.vertical_velocity = JUMP_VELOCITY;
                started = Some(Maneuver::Jump);
            } else if intents.slide {
                self.is_sliding = true;
                self.slide_time_remaining = SLIDE_DURATION;
                self.position.y = SLIDE_HEIGHT;
                started = Some(Maneuver::Slide);
            }
        }

        if self.is_jumping {
            self.vertical_velocity -= GRAVITY * dt;
            self.position.y += self.vertical_velocity * dt;
            if self.position.y <= GROUND_HEIGHT {
                self.position.y = GROUND_HEIGHT;
                self.vertical_velocity = 0.0;
                self.is_jumping = false;
            }
        } else if !self.is_sliding {
            self.position.y = GROUND_HEIGHT;
        }

        started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = SIM_DT;

    fn jump() -> Intents {
        Intents {
            jump: true,
            ..Default::default()
        }
    }

    fn slide() -> Intents {
        Intents {
            slide: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_forward_travel() {
        let mut body = PlayerBody::default();
        for _ in 0..60 {
            body.update(&Intents::default(), 12.0, DT);
        }
        assert!((body.position.z + 12.0).abs() < 1e-3);
        assert_eq!(body.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn test_lateral_clamp() {
        let mut body = PlayerBody::default();
        let left = Intents {
            move_left: true,
            ..Default::default()
        };
        for _ in 0..120 {
            body.update(&left, 0.0, DT);
        }
        assert_eq!(body.position.x, -LATERAL_LIMIT);
    }

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let mut body = PlayerBody::default();
        assert_eq!(body.update(&jump(), 0.0, DT), Some(Maneuver::Jump));
        assert!(body.is_jumping);

        let flight_time = 2.0 * JUMP_VELOCITY / GRAVITY;
        let max_ticks = (flight_time / DT).ceil() as usize + 2;
        let mut apex = body.position.y;
        let mut ticks = 1;
        while body.is_jumping && ticks < max_ticks {
            body.update(&Intents::default(), 0.0, DT);
            apex = apex.max(body.position.y);
            ticks += 1;
        }

        assert!(!body.is_jumping, "still airborne after {} ticks", ticks);
        assert!(body.position.y <= GROUND_HEIGHT + GROUND_EPSILON);
        assert_eq!(body.vertical_velocity, 0.0);
        // Apex near v²/2g above ground
        let expected_apex = GROUND_HEIGHT + JUMP_VELOCITY * JUMP_VELOCITY / (2.0 * GRAVITY);
        assert!((apex - expected_apex).abs() < 0.5);
    }

    #[test]
    fn test_no_double_jump() {
        let mut body = PlayerBody::default();
        body.update(&jump(), 0.0, DT);
        for _ in 0..5 {
            body.update(&Intents::default(), 0.0, DT);
        }
        let vel_before = body.vertical_velocity;
        assert_eq!(body.update(&jump(), 0.0, DT), None);
        assert!(body.vertical_velocity < vel_before);
    }

    #[test]
    fn test_slide_blocked_mid_air() {
        let mut body = PlayerBody::default();
        body.update(&jump(), 0.0, DT);
        assert_eq!(body.update(&slide(), 0.0, DT), None);
        assert!(body.is_jumping);
        assert!(!body.is_sliding);
    }

    #[test]
    fn test_slide_countdown() {
        let mut body = PlayerBody::default();
        assert_eq!(body.update(&slide(), 0.0, DT), Some(Maneuver::Slide));
        assert_eq!(body.position.y, SLIDE_HEIGHT);

        // Jump is rejected while sliding
        assert_eq!(body.update(&jump(), 0.0, DT), None);
        assert!(!body.is_jumping);

        let mut ticks = 1;
        while body.is_sliding {
            body.update(&Intents::default(), 0.0, DT);
            ticks += 1;
            assert!(ticks < 100);
        }
        let expected = (SLIDE_DURATION / DT).round() as i32;
        assert!((ticks - expected).abs() <= 1);
        assert_eq!(body.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn test_reset_clears_slide_timer() {
        let mut body = PlayerBody::default();
        body.update(&slide(), 0.0, DT);
        body.position.z = -40.0;
        body.reset();
        assert!(!body.is_sliding);
        assert_eq!(body.slide_time_remaining, 0.0);
        assert_eq!(body.position, Vec3::new(0.0, GROUND_HEIGHT, 0.0));
    }

    #[test]
    fn test_resume_keeps_progress() {
        let mut body = PlayerBody::default();
        body.position = Vec3::new(3.0, 4.0, -120.0);
        body.is_jumping = true;
        body.resume_at(body.position.z);
        assert_eq!(body.position, Vec3::new(0.0, GROUND_HEIGHT, -120.0));
        assert!(!body.is_jumping);
    }
}
