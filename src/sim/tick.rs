//! Per-frame simulation tick
//!
//! While playing: runner step, pursuer step, then collisions against the
//! course, then the finish line. While trapped: the challenge clocks and any
//! entered symbol. Other screens only advance the session clock.

use super::collision::{BoxExtent, overlaps};
use super::course::{GEM_EXTENT, HazardKind};
use super::player::{Intents, Maneuver};
use super::session::Session;
use super::state::{GameOverCause, Screen};
use super::trap::{Glyph, TrapStatus};
use crate::audio::{FeedbackSink, SoundEffect};
use crate::persistence::SaveStore;

/// How far ahead the autopilot looks for hazards
const AUTOPILOT_LOOKAHEAD: f32 = 14.0;
/// Distance to a spike at which the autopilot jumps
const AUTOPILOT_JUMP_DISTANCE: f32 = 3.0;
/// Distance to a barrier at which the autopilot slides
const AUTOPILOT_SLIDE_DISTANCE: f32 = 2.5;
/// Lane-centring tolerance for the autopilot
const AUTOPILOT_LANE_TOLERANCE: f32 = 0.2;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intents
    pub intents: Intents,
    /// Trap challenge symbol entered this tick
    pub glyph: Option<Glyph>,
    /// Autopilot drives the runner and answers traps
    pub autopilot: bool,
}

/// Advance the session by one tick
pub fn tick<S: SaveStore, F: FeedbackSink>(session: &mut Session<S, F>, input: &TickInput, dt: f32) {
    session.run.clock += dt as f64;

    match session.screen() {
        Screen::Playing => step_playing(session, input, dt),
        Screen::Trapped => step_trapped(session, input, dt),
        _ => {}
    }
}

fn step_playing<S: SaveStore, F: FeedbackSink>(session: &mut Session<S, F>, input: &TickInput, dt: f32) {
    if !session.update_countdown(dt) {
        return;
    }

    let intents = if input.autopilot {
        autopilot_intents(session)
    } else {
        input.intents
    };

    // Runner
    let stage = &mut session.stage;
    let start_z = stage.player.position.z;
    let maneuver = stage.player.update(&intents, stage.config.player_speed, dt);
    let runner_speed = if dt > 0.0 {
        (start_z - stage.player.position.z) / dt
    } else {
        0.0
    };
    match maneuver {
        Some(Maneuver::Jump) => session.feedback.notify(SoundEffect::Jump),
        Some(Maneuver::Slide) => session.feedback.notify(SoundEffect::Slide),
        None => {}
    }

    // Pursuer
    let stage = &mut session.stage;
    if stage
        .pursuer
        .update(stage.player.position, runner_speed, &stage.config, dt)
    {
        session.game_over(GameOverCause::Caught);
        return;
    }

    // Hazards (first hit in course order wins)
    let player = session.stage.player.position;
    let (jumping, sliding) = (session.stage.player.is_jumping, session.stage.player.is_sliding);
    let runner = BoxExtent::runner();
    let hit = session
        .stage
        .course
        .hazards
        .iter()
        .filter(|h| !session.stage.cleared_hazards.contains(&h.id))
        .filter(|h| overlaps(player, runner, h.position, h.extent))
        .find_map(|h| match h.kind {
            HazardKind::Spike if !jumping => Some((h.id, Some(GameOverCause::Spike))),
            HazardKind::Barrier if !sliding => Some((h.id, Some(GameOverCause::Barrier))),
            HazardKind::Trap => Some((h.id, None)),
            _ => None,
        });
    match hit {
        Some((id, Some(cause))) => {
            session.hit_hazard(id, cause);
            return;
        }
        Some((id, None)) => {
            session.spring_trap(id);
            return;
        }
        None => {}
    }

    // Gems
    let touched: Vec<_> = session
        .stage
        .course
        .remaining_gems()
        .filter(|g| overlaps(player, runner, g.position, GEM_EXTENT))
        .map(|g| g.id)
        .collect();
    for id in touched {
        session.add_gem(id);
    }

    // Finish line
    if session.stage.player.position.z <= session.stage.config.finish_z() {
        session.complete_level();
    }
}

fn step_trapped<S: SaveStore, F: FeedbackSink>(session: &mut Session<S, F>, input: &TickInput, dt: f32) {
    session.update_trap(dt);
    if session.screen() != Screen::Trapped {
        return;
    }

    let glyph = if input.autopilot {
        autopilot_glyph(session)
    } else {
        input.glyph
    };
    if let Some(glyph) = glyph {
        session.submit_glyph(glyph);
    }
}

/// Dodge hazards in the runner's lane, otherwise hold or change lane
fn autopilot_intents<S: SaveStore, F: FeedbackSink>(session: &Session<S, F>) -> Intents {
    let stage = &session.stage;
    let player = &stage.player;
    let runner = BoxExtent::runner();
    let mut intents = Intents::default();

    let lane_of = |x: f32| {
        crate::consts::LANES
            .iter()
            .copied()
            .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()))
            .unwrap_or(0.0)
    };
    let mut target_lane = lane_of(player.position.x);

    // Nearest hazard ahead that shares the runner's lane
    let blocking = |lane: f32| {
        stage
            .course
            .hazards
            .iter()
            .filter(|h| !stage.cleared_hazards.contains(&h.id))
            .filter(|h| (h.position.x - lane).abs() < h.extent.width + runner.width)
            .map(|h| (h, player.position.z - h.position.z))
            .filter(|(_, ahead)| *ahead > -(runner.depth) && *ahead < AUTOPILOT_LOOKAHEAD)
            .min_by(|a, b| a.1.total_cmp(&b.1))
    };

    if let Some((hazard, ahead)) = blocking(target_lane) {
        match hazard.kind {
            HazardKind::Spike if ahead < AUTOPILOT_JUMP_DISTANCE => intents.jump = true,
            HazardKind::Barrier if ahead < AUTOPILOT_SLIDE_DISTANCE => intents.slide = true,
            HazardKind::Trap => {
                // Sidestep to the clearest neighbouring lane
                if let Some(lane) = crate::consts::LANES
                    .iter()
                    .copied()
                    .filter(|l| (l - target_lane).abs() > 0.0 && (l - target_lane).abs() <= 3.0)
                    .find(|l| blocking(*l).is_none_or(|(h, _)| h.kind != HazardKind::Trap))
                {
                    target_lane = lane;
                }
            }
            _ => {}
        }
    } else if let Some(lane) = stage
        .course
        .remaining_gems()
        .map(|g| (lane_of(g.position.x), player.position.z - g.position.z))
        .filter(|(_, ahead)| *ahead > AUTOPILOT_JUMP_DISTANCE && *ahead < AUTOPILOT_LOOKAHEAD)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(lane, _)| lane)
    {
        // Drift toward the nearest gem when its lane is clear
        if (lane - target_lane).abs() <= 3.0 && blocking(lane).is_none() {
            target_lane = lane;
        }
    }

    let offset = target_lane - player.position.x;
    if offset < -AUTOPILOT_LANE_TOLERANCE {
        intents.move_left = true;
    } else if offset > AUTOPILOT_LANE_TOLERANCE {
        intents.move_right = true;
    }
    intents
}

/// Answer the trap from the sequence shown during the reveal
fn autopilot_glyph<S: SaveStore, F: FeedbackSink>(session: &Session<S, F>) -> Option<Glyph> {
    let trap = session.trap.as_ref()?;
    if trap.status() != TrapStatus::Awaiting {
        return None;
    }
    trap.sequence.get(trap.expected_index).copied()
}
