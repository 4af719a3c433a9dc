//! Screen state machine and mutation commands
//!
//! Every change to the run goes through a command on `Session`. Commands that
//! touch level, gems or score write the save slot in the same call, and every
//! screen change is announced to the feedback sink.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::course::{Course, CourseId, LevelConfig};
use super::state::{Countdown, GameOverCause, LevelSummary, RunState, Screen, Stage};
use super::trap::{Glyph, TrapChallenge, TrapFailure, TrapStatus};
use crate::audio::{FeedbackSink, SoundEffect};
use crate::consts::{CONTINUE_COST, GEM_REWARD};
use crate::persistence::SaveStore;
use crate::settings::Settings;

/// Number of tutorial pages
pub const TUTORIAL_PAGES: usize = 5;
/// Name given to guests
pub const GUEST_NAME: &str = "Guest Player";

/// A single player's session: run bookkeeping, the active stage and the
/// collaborators it reports to
pub struct Session<S: SaveStore, F: FeedbackSink> {
    pub run: RunState,
    pub stage: Stage,
    /// Present only while the trap screen is active
    pub trap: Option<TrapChallenge>,
    /// Get-ready countdown; bodies stay frozen until it finishes
    pub countdown: Option<Countdown>,
    pub tutorial_page: usize,
    pub game_over_cause: Option<GameOverCause>,
    pub last_summary: Option<LevelSummary>,
    pub store: S,
    pub feedback: F,
    countdown_secs: u32,
    /// Trap that sprang the current challenge
    active_trap: Option<CourseId>,
    rng: Pcg32,
}

impl<S: SaveStore, F: FeedbackSink> Session<S, F> {
    /// Start a session, restoring progress from the store
    pub fn new(store: S, feedback: F, settings: &Settings, seed: u64) -> Self {
        let run = RunState::restored(store.load());
        let mut rng = Pcg32::seed_from_u64(seed);
        let config = LevelConfig::for_level(run.level);
        let course = Course::generate(&config, &mut rng);
        log::info!(
            "Session for {} at level {} ({} gems, score {})",
            run.player_name,
            run.level,
            run.gems,
            run.score
        );
        Self {
            run,
            stage: Stage::new(config, course),
            trap: None,
            countdown: None,
            tutorial_page: 0,
            game_over_cause: None,
            last_summary: None,
            store,
            feedback,
            countdown_secs: settings.countdown_secs,
            active_trap: None,
            rng,
        }
    }

    pub fn screen(&self) -> Screen {
        self.run.screen
    }

    /// True once the get-ready countdown has finished (or none is running)
    pub fn is_live(&self) -> bool {
        self.countdown.is_none_or(|c| c.is_done())
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.run.save_data()) {
            log::warn!("Could not save progress: {}", e);
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        let from = self.run.screen;
        log::info!("Screen {} -> {}", from.as_str(), screen.as_str());

        // Timers belong to the screen that owns them
        if from == Screen::Trapped {
            self.trap = None;
        }
        if from == Screen::Playing {
            self.countdown = None;
        }

        match screen {
            Screen::Playing => self.countdown = Some(Countdown::new(self.countdown_secs)),
            Screen::Tutorial => self.tutorial_page = 0,
            _ => {}
        }

        self.run.screen = screen;
        self.feedback.notify(SoundEffect::ScreenEnter(screen));
    }

    fn regenerate_course(&mut self) {
        self.stage.config = LevelConfig::for_level(self.run.level);
        self.stage.course = Course::generate(&self.stage.config, &mut self.rng);
        self.stage.reset_bodies();
    }

    // === Menus ===

    /// Welcome -> Auth
    pub fn start(&mut self) -> bool {
        if self.run.screen != Screen::Welcome {
            return false;
        }
        self.set_screen(Screen::Auth);
        true
    }

    /// Auth -> Welcome, Tutorial -> Auth
    pub fn back(&mut self) -> bool {
        match self.run.screen {
            Screen::Auth => self.set_screen(Screen::Welcome),
            Screen::Tutorial => self.set_screen(Screen::Auth),
            _ => return false,
        }
        true
    }

    /// Auth -> Tutorial under the given display name
    ///
    /// Any non-empty name is accepted; no verification happens here.
    pub fn sign_in(&mut self, name: &str) -> bool {
        let name = name.trim();
        if self.run.screen != Screen::Auth || name.is_empty() {
            return false;
        }
        self.run.player_name = name.to_string();
        self.persist();
        self.set_screen(Screen::Tutorial);
        true
    }

    /// Auth -> Tutorial as a guest
    pub fn sign_in_guest(&mut self) -> bool {
        self.sign_in(GUEST_NAME)
    }

    pub fn next_tutorial_page(&mut self) {
        if self.run.screen == Screen::Tutorial {
            self.tutorial_page = (self.tutorial_page + 1).min(TUTORIAL_PAGES - 1);
        }
    }

    pub fn previous_tutorial_page(&mut self) {
        if self.run.screen == Screen::Tutorial {
            self.tutorial_page = self.tutorial_page.saturating_sub(1);
        }
    }

    /// Tutorial -> Playing
    pub fn begin_run(&mut self) -> bool {
        if self.run.screen != Screen::Tutorial {
            return false;
        }
        self.stage.reset_bodies();
        self.run.level_start_time = self.run.clock;
        self.game_over_cause = None;
        self.set_screen(Screen::Playing);
        true
    }

    // === Run outcomes ===

    /// Collect a gem: +1 gem, +10 score. Returns false if the gem is unknown,
    /// belongs to another level, or was already collected.
    pub fn add_gem(&mut self, id: CourseId) -> bool {
        if id.level != self.run.level {
            return false;
        }
        match self.stage.course.gem_mut(id) {
            Some(gem) if !gem.collected => gem.collected = true,
            _ => return false,
        }
        self.run.gems += 1;
        self.run.score += GEM_REWARD;
        log::debug!("Gem {:?} collected ({} total)", id, self.run.gems);
        self.persist();
        self.feedback.notify(SoundEffect::GemCollect);
        true
    }

    /// Playing -> LevelComplete
    pub fn complete_level(&mut self) -> bool {
        if self.run.screen != Screen::Playing {
            return false;
        }
        let summary = LevelSummary {
            level: self.run.level,
            gems: self.run.gems,
            score: self.run.score,
            seconds: self.run.level_elapsed(),
        };
        log::info!(
            "Level {} complete in {:.1}s (score {})",
            summary.level,
            summary.seconds,
            summary.score
        );
        self.last_summary = Some(summary);
        self.set_screen(Screen::LevelComplete);
        true
    }

    /// LevelComplete -> Playing on the next level
    pub fn advance_level(&mut self) -> bool {
        if self.run.screen != Screen::LevelComplete {
            return false;
        }
        self.run.level += 1;
        self.regenerate_course();
        self.run.level_start_time = self.run.clock;
        self.persist();
        self.set_screen(Screen::Playing);
        true
    }

    /// Playing/Trapped -> GameOver
    pub fn game_over(&mut self, cause: GameOverCause) -> bool {
        if !matches!(self.run.screen, Screen::Playing | Screen::Trapped) {
            return false;
        }
        log::info!("Game over at level {}: {:?}", self.run.level, cause);
        self.game_over_cause = Some(cause);
        self.active_trap = None;
        self.set_screen(Screen::GameOver);
        true
    }

    /// GameOver -> Playing on the same level, keeping gems and score
    pub fn restart_level(&mut self) -> bool {
        if self.run.screen != Screen::GameOver {
            return false;
        }
        self.stage.reset_bodies();
        self.run.level_start_time = self.run.clock;
        self.game_over_cause = None;
        self.set_screen(Screen::Playing);
        true
    }

    /// GameOver -> Playing from where the run ended, for a gem fee
    pub fn continue_with_gems(&mut self) -> bool {
        if self.run.screen != Screen::GameOver || self.run.gems < CONTINUE_COST {
            return false;
        }
        self.run.gems -= CONTINUE_COST;
        // The body resumes inside whatever ended the run
        if let Some(id) = self.stage.fatal_hazard.take() {
            self.stage.cleared_hazards.push(id);
        }
        let z = self.stage.player.position.z;
        self.stage.player.resume_at(z);
        self.stage.pursuer.respawn_behind(z);
        self.game_over_cause = None;
        self.persist();
        self.set_screen(Screen::Playing);
        true
    }

    /// Back to the welcome screen with progress wiped
    pub fn reset_game(&mut self) {
        self.run.level = 1;
        self.run.gems = 0;
        self.run.score = 0;
        self.run.level_start_time = self.run.clock;
        self.regenerate_course();
        self.trap = None;
        self.countdown = None;
        self.game_over_cause = None;
        self.last_summary = None;
        self.active_trap = None;
        self.persist();
        self.set_screen(Screen::Welcome);
    }

    // === Trap challenge ===

    /// Playing -> GameOver by running into a hazard
    pub fn hit_hazard(&mut self, id: CourseId, cause: GameOverCause) -> bool {
        if self.run.screen != Screen::Playing || self.stage.cleared_hazards.contains(&id) {
            return false;
        }
        self.stage.fatal_hazard = Some(id);
        self.game_over(cause)
    }

    /// Playing -> Trapped by the given trap
    pub fn spring_trap(&mut self, id: CourseId) -> bool {
        if self.run.screen != Screen::Playing || self.stage.cleared_hazards.contains(&id) {
            return false;
        }
        self.set_screen(Screen::Trapped);
        self.trap = Some(TrapChallenge::new(&mut self.rng));
        self.active_trap = Some(id);
        true
    }

    /// Enter one symbol in the trap challenge
    pub fn submit_glyph(&mut self, glyph: Glyph) -> Option<TrapStatus> {
        if self.run.screen != Screen::Trapped {
            return None;
        }
        let trap = self.trap.as_mut()?;
        let before = trap.expected_index;
        let status = trap.submit(glyph);
        if trap.expected_index > before {
            self.feedback.notify(SoundEffect::GlyphAccepted);
        }
        self.resolve_trap(status);
        Some(status)
    }

    /// Advance the trap clocks
    pub(crate) fn update_trap(&mut self, dt: f32) {
        if let Some(trap) = self.trap.as_mut() {
            let status = trap.update(dt);
            self.resolve_trap(status);
        }
    }

    fn resolve_trap(&mut self, status: TrapStatus) {
        match status {
            TrapStatus::Escaped => {
                if let Some(id) = self.active_trap.take() {
                    self.stage.cleared_hazards.push(id);
                }
                log::info!("Escaped the trap");
                self.set_screen(Screen::Playing);
            }
            TrapStatus::Failed(TrapFailure::WrongGlyph) => {
                self.stage.fatal_hazard = self.active_trap;
                self.game_over(GameOverCause::TrapFailed);
            }
            TrapStatus::Failed(TrapFailure::Timeout) => {
                self.stage.fatal_hazard = self.active_trap;
                self.game_over(GameOverCause::TrapTimeout);
            }
            TrapStatus::Revealing | TrapStatus::Awaiting => {}
        }
    }

    /// Advance the get-ready countdown; returns true once play is live
    pub(crate) fn update_countdown(&mut self, dt: f32) -> bool {
        let Some(countdown) = self.countdown.as_mut() else {
            return true;
        };
        for _ in 0..countdown.update(dt) {
            self.feedback.notify(SoundEffect::CountdownTick);
        }
        self.is_live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, SaveData};

    type TestSession = Session<MemoryStore, Vec<SoundEffect>>;

    fn session() -> TestSession {
        Session::new(MemoryStore::new(), Vec::new(), &Settings::default(), 11)
    }

    fn playing() -> TestSession {
        let mut s = session();
        assert!(s.start());
        assert!(s.sign_in_guest());
        assert!(s.begin_run());
        s
    }

    #[test]
    fn test_menu_flow() {
        let mut s = session();
        assert_eq!(s.screen(), Screen::Welcome);
        assert!(!s.begin_run());
        assert!(s.start());
        assert_eq!(s.screen(), Screen::Auth);
        assert!(!s.sign_in("   "));
        assert!(s.back());
        assert_eq!(s.screen(), Screen::Welcome);
        s.start();
        assert!(s.sign_in("Google User"));
        assert_eq!(s.run.player_name, "Google User");
        assert_eq!(s.screen(), Screen::Tutorial);
        assert!(s.back());
        assert_eq!(s.screen(), Screen::Auth);
        s.sign_in_guest();
        assert!(s.begin_run());
        assert_eq!(s.screen(), Screen::Playing);
        assert!(s.countdown.is_some());
        assert!(s.feedback.contains(&SoundEffect::ScreenEnter(Screen::Playing)));
    }

    #[test]
    fn test_tutorial_pages_clamp() {
        let mut s = session();
        s.start();
        s.sign_in_guest();
        s.previous_tutorial_page();
        assert_eq!(s.tutorial_page, 0);
        for _ in 0..10 {
            s.next_tutorial_page();
        }
        assert_eq!(s.tutorial_page, TUTORIAL_PAGES - 1);
        s.back();
        s.sign_in_guest();
        assert_eq!(s.tutorial_page, 0);
    }

    #[test]
    fn test_gem_counts_once() {
        let mut s = playing();
        let id = s.stage.course.gems[0].id;
        let writes = s.store.writes;

        assert!(s.add_gem(id));
        assert_eq!(s.run.gems, 1);
        assert_eq!(s.run.score, GEM_REWARD);
        assert_eq!(s.store.writes, writes + 1);

        assert!(!s.add_gem(id));
        assert_eq!(s.run.gems, 1);
        assert_eq!(s.run.score, GEM_REWARD);
        assert_eq!(s.store.writes, writes + 1);
    }

    #[test]
    fn test_stale_level_gem_rejected() {
        let mut s = playing();
        let mut id = s.stage.course.gems[0].id;
        id.level += 1;
        assert!(!s.add_gem(id));
        assert_eq!(s.run.gems, 0);
    }

    #[test]
    fn test_advance_level_resets_and_persists() {
        let mut s = playing();
        let old_speed = s.stage.config.player_speed;
        s.stage.player.position.z = -300.0;
        s.stage.player.is_sliding = true;
        s.stage.player.slide_time_remaining = 0.4;

        assert!(s.complete_level());
        assert_eq!(s.last_summary.unwrap().level, 1);
        assert!(s.advance_level());

        assert_eq!(s.run.level, 2);
        assert_eq!(s.screen(), Screen::Playing);
        assert!(s.stage.config.player_speed > old_speed);
        assert_eq!(s.stage.course.level, 2);
        assert!(s.stage.course.gems.iter().all(|g| g.id.level == 2 && !g.collected));
        assert_eq!(s.stage.player.position.z, 0.0);
        assert!(!s.stage.player.is_sliding);
        assert_eq!(s.stage.player.slide_time_remaining, 0.0);
        assert_eq!(s.store.load().unwrap().level, 2);
    }

    #[test]
    fn test_restart_keeps_progress() {
        let mut s = playing();
        let id = s.stage.course.gems[0].id;
        s.add_gem(id);
        s.stage.player.position.z = -80.0;
        s.stage.player.is_jumping = true;

        assert!(s.game_over(GameOverCause::Spike));
        assert_eq!(s.game_over_cause, Some(GameOverCause::Spike));
        assert!(s.restart_level());

        assert_eq!(s.run.gems, 1);
        assert_eq!(s.run.score, GEM_REWARD);
        assert_eq!(s.run.level, 1);
        assert_eq!(s.stage.player.position.z, 0.0);
        assert!(!s.stage.player.is_jumping);
        // Collected gems stay collected within the level
        assert!(!s.add_gem(id));
    }

    #[test]
    fn test_reset_game_wipes_progress() {
        let mut s = playing();
        s.add_gem(s.stage.course.gems[0].id);
        s.game_over(GameOverCause::Caught);
        s.reset_game();

        assert_eq!(s.screen(), Screen::Welcome);
        assert_eq!(s.run.level, 1);
        assert_eq!(s.run.gems, 0);
        assert_eq!(s.run.score, 0);
        let saved = s.store.load().unwrap();
        assert_eq!((saved.level, saved.gems, saved.score), (1, 0, 0));
    }

    #[test]
    fn test_continue_costs_gems() {
        let mut s = playing();
        s.game_over(GameOverCause::Caught);
        assert!(!s.continue_with_gems());

        s.run.gems = CONTINUE_COST + 5;
        s.stage.player.position.z = -150.0;
        assert!(s.continue_with_gems());
        assert_eq!(s.run.gems, 5);
        assert_eq!(s.stage.player.position.z, -150.0);
        assert!(s.stage.pursuer.position.z > s.stage.player.position.z);
        assert_eq!(s.store.load().unwrap().gems, 5);
    }

    #[test]
    fn test_trap_escape_returns_to_play() {
        let mut s = playing();
        let trap_id = CourseId { level: 1, index: 999 };
        assert!(s.spring_trap(trap_id));
        assert_eq!(s.screen(), Screen::Trapped);
        assert!(s.countdown.is_none());

        s.trap = Some(TrapChallenge::with_sequence([
            Glyph::Red,
            Glyph::Green,
            Glyph::Blue,
            Glyph::Yellow,
            Glyph::Red,
            Glyph::Green,
        ]));
        // Rejected during reveal
        assert_eq!(s.submit_glyph(Glyph::Red), Some(TrapStatus::Revealing));
        s.update_trap(3.1);

        for glyph in [Glyph::Red, Glyph::Green, Glyph::Blue, Glyph::Yellow, Glyph::Red] {
            assert_eq!(s.submit_glyph(glyph), Some(TrapStatus::Awaiting));
        }
        assert_eq!(s.submit_glyph(Glyph::Green), Some(TrapStatus::Escaped));
        assert_eq!(s.screen(), Screen::Playing);
        assert!(s.trap.is_none());
        assert!(s.stage.cleared_hazards.contains(&trap_id));
        // Same trap cannot spring again this attempt
        assert!(!s.spring_trap(trap_id));
    }

    #[test]
    fn test_trap_wrong_glyph_ends_run() {
        let mut s = playing();
        s.spring_trap(CourseId { level: 1, index: 3 });
        s.trap = Some(TrapChallenge::with_sequence([Glyph::Blue; 6]));
        s.update_trap(3.5);
        assert_eq!(s.submit_glyph(Glyph::Blue), Some(TrapStatus::Awaiting));
        assert_eq!(
            s.submit_glyph(Glyph::Red),
            Some(TrapStatus::Failed(TrapFailure::WrongGlyph))
        );
        assert_eq!(s.screen(), Screen::GameOver);
        assert_eq!(s.game_over_cause, Some(GameOverCause::TrapFailed));
        assert!(s.trap.is_none());
    }

    #[test]
    fn test_trap_timeout_ends_run() {
        let mut s = playing();
        s.spring_trap(CourseId { level: 1, index: 3 });
        for _ in 0..61 {
            s.update_trap(1.0);
        }
        assert_eq!(s.screen(), Screen::GameOver);
        assert_eq!(s.game_over_cause, Some(GameOverCause::TrapTimeout));
    }

    #[test]
    fn test_restore_from_store() {
        let mut store = MemoryStore::new();
        store
            .save(&SaveData {
                player_name: "Returning".into(),
                level: 3,
                gems: 9,
                score: 90,
            })
            .unwrap();
        let s = Session::new(store, Vec::new(), &Settings::default(), 5);
        assert_eq!(s.run.level, 3);
        assert_eq!(s.run.gems, 9);
        assert_eq!(s.stage.config.level, 3);
        assert_eq!(s.stage.course.level, 3);
    }

    #[test]
    fn test_malformed_store_starts_fresh() {
        let store = MemoryStore::with_raw("{{{{");
        let s = Session::new(store, Vec::new(), &Settings::default(), 5);
        assert_eq!(s.run.level, 1);
        assert_eq!(s.run.gems, 0);
    }
}
