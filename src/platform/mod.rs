//! Platform abstraction layer
//!
//! The simulation never talks to a device. Hosts plug in here:
//! - `InputProvider`: samples held controls into a `TickInput`
//! - `PresentationSink`: receives a `Frame` snapshot after each tick
//! - `IdentityProvider`: supplies a display name for sign-in
//!
//! plus seeding (`fresh_seed`) for browser and native builds.

use glam::Vec3;

use crate::audio::FeedbackSink;
use crate::consts::TRAP_SEQUENCE_LEN;
use crate::persistence::SaveStore;
use crate::sim::{Glyph, HazardKind, Screen, Session, TickInput};

/// Hazards and gems further ahead than this are not presented
pub const VIEW_AHEAD: f32 = 120.0;
/// Hazards and gems further behind than this are not presented
pub const VIEW_BEHIND: f32 = 30.0;

/// Abstract controls a host can map keys, buttons or touches onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Jump,
    Slide,
    Glyph(Glyph),
}

/// Samples per-tick input from the host
pub trait InputProvider {
    fn sample(&mut self) -> TickInput;
}

/// Receives a snapshot of the session after each tick
pub trait PresentationSink {
    fn present(&mut self, frame: &Frame);
}

/// Supplies a display name for sign-in
pub trait IdentityProvider {
    /// `None` when the user declined or the provider is unavailable
    fn display_name(&mut self) -> Option<String>;
}

/// Held-control state fed by host events
///
/// Movement controls stay on while held. Jump, slide and glyphs are
/// one-shot: they apply to the next sampled tick only.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    left: bool,
    right: bool,
    jump: bool,
    slide: bool,
    glyph: Option<Glyph>,
    /// Hand control to the autopilot
    pub autopilot: bool,
}

impl ControlState {
    /// No controls held, autopilot on or off
    pub fn with_autopilot(autopilot: bool) -> Self {
        Self {
            autopilot,
            ..Default::default()
        }
    }

    pub fn press(&mut self, control: Control) {
        match control {
            Control::Left => self.left = true,
            Control::Right => self.right = true,
            Control::Jump => self.jump = true,
            Control::Slide => self.slide = true,
            Control::Glyph(glyph) => self.glyph = Some(glyph),
        }
    }

    pub fn release(&mut self, control: Control) {
        match control {
            Control::Left => self.left = false,
            Control::Right => self.right = false,
            // One-shot controls clear when sampled
            Control::Jump | Control::Slide | Control::Glyph(_) => {}
        }
    }
}

impl InputProvider for ControlState {
    fn sample(&mut self) -> TickInput {
        let mut input = TickInput {
            glyph: self.glyph.take(),
            autopilot: self.autopilot,
            ..Default::default()
        };
        input.intents.move_left = self.left;
        input.intents.move_right = self.right;
        input.intents.jump = std::mem::take(&mut self.jump);
        input.intents.slide = std::mem::take(&mut self.slide);
        input
    }
}

/// Trap challenge as shown to the player
#[derive(Debug, Clone, PartialEq)]
pub struct TrapView {
    /// Whole sequence while revealing, otherwise only entered symbols
    pub visible: [Option<Glyph>; TRAP_SEQUENCE_LEN],
    pub revealing: bool,
    pub time_remaining: u32,
}

/// Read-only snapshot of what a host should draw
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub screen: Screen,
    pub level: u32,
    pub gems: u32,
    pub score: u64,
    pub player: Vec3,
    pub sliding: bool,
    pub pursuer: Vec3,
    /// Hazards within view, in course order
    pub hazards: Vec<(HazardKind, Vec3)>,
    /// Uncollected gems within view
    pub gem_positions: Vec<Vec3>,
    /// Whole seconds left on the get-ready countdown
    pub countdown: Option<u32>,
    pub trap: Option<TrapView>,
    /// Distance left to the finish line
    pub distance_remaining: f32,
}

impl Frame {
    pub fn capture<S: SaveStore, F: FeedbackSink>(session: &Session<S, F>) -> Self {
        let stage = &session.stage;
        let player = stage.player.position;
        let in_view = |p: Vec3| p.z > player.z - VIEW_AHEAD && p.z < player.z + VIEW_BEHIND;

        Self {
            screen: session.screen(),
            level: session.run.level,
            gems: session.run.gems,
            score: session.run.score,
            player,
            sliding: stage.player.is_sliding,
            pursuer: stage.pursuer.position,
            hazards: stage
                .course
                .hazards
                .iter()
                .filter(|h| in_view(h.position))
                .map(|h| (h.kind, h.position))
                .collect(),
            gem_positions: stage
                .course
                .remaining_gems()
                .filter(|g| in_view(g.position))
                .map(|g| g.position)
                .collect(),
            countdown: session
                .countdown
                .filter(|c| !c.is_done())
                .map(|c| c.remaining),
            trap: session.trap.as_ref().map(|t| TrapView {
                visible: t.visible_sequence(),
                revealing: t.revealing(),
                time_remaining: t.time_remaining,
            }),
            distance_remaining: (player.z - stage.config.finish_z()).max(0.0),
        }
    }
}

impl<S: SaveStore, F: FeedbackSink> Session<S, F> {
    /// Sign in with whatever name the provider supplies, falling back to a
    /// guest when it supplies none
    pub fn sign_in_with(&mut self, provider: &mut dyn IdentityProvider) -> bool {
        match provider.display_name() {
            Some(name) if self.sign_in(&name) => true,
            _ => {
                log::info!("No identity available, continuing as guest");
                self.sign_in_guest()
            }
        }
    }
}

/// Seed for a new session
#[cfg(target_arch = "wasm32")]
pub fn fresh_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed for a new session
#[cfg(not(target_arch = "wasm32"))]
pub fn fresh_seed() -> u64 {
    rand::random()
}
