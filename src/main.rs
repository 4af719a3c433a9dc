//! Jungle Run entry point
//!
//! Native builds run a headless session against a JSON save file, driven by
//! the autopilot when settings enable it (always on first launch), and log
//! what a renderer would draw. Browser hosts embed the library and drive
//! `sim::tick` from their own frame loop.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use jungle_run::Settings;
    use jungle_run::audio::LogFeedback;
    use jungle_run::consts::{CONTINUE_COST, SIM_DT};
    use jungle_run::persistence::{JsonFileStore, PersistError};
    use jungle_run::platform::{
        ControlState, Frame, IdentityProvider, InputProvider, PresentationSink, fresh_seed,
    };
    use jungle_run::sim::{Screen, Session, tick};

    /// Levels to clear before the demo stops
    const DEMO_LEVELS: u32 = 3;
    /// Restarts allowed after a game over that gems cannot pay for
    const MAX_RESTARTS: u32 = 3;
    /// Hard stop (ten simulated minutes)
    const MAX_TICKS: u32 = 60 * 60 * 10;
    /// Log a frame summary every five simulated seconds
    const REPORT_INTERVAL: u32 = 60 * 5;

    /// Display name from `JUNGLE_RUN_PLAYER`
    struct EnvIdentity;

    impl IdentityProvider for EnvIdentity {
        fn display_name(&mut self) -> Option<String> {
            std::env::var("JUNGLE_RUN_PLAYER").ok()
        }
    }

    /// Logs a periodic summary instead of drawing
    #[derive(Default)]
    struct LogPresenter {
        frames: u32,
        last_screen: Option<Screen>,
    }

    impl PresentationSink for LogPresenter {
        fn present(&mut self, frame: &Frame) {
            self.frames += 1;
            let changed = self.last_screen != Some(frame.screen);
            self.last_screen = Some(frame.screen);
            if !changed && !self.frames.is_multiple_of(REPORT_INTERVAL) {
                return;
            }
            log::info!(
                "[{}] level {} gems {} score {} | runner z={:.1} x={:.1} pursuer gap {:.1} | {} hazards in view | {:.0} to go",
                frame.screen.as_str(),
                frame.level,
                frame.gems,
                frame.score,
                frame.player.z,
                frame.player.x,
                frame.pursuer.z - frame.player.z,
                frame.hazards.len(),
                frame.distance_remaining
            );
        }
    }

    fn data_dir() -> PathBuf {
        std::env::var_os("JUNGLE_RUN_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".jungle-run"))
    }

    pub fn run() -> Result<(), PersistError> {
        let dir = data_dir();
        std::fs::create_dir_all(&dir)?;
        let settings_path = dir.join("settings.json");
        let first_launch = !settings_path.exists();
        let mut settings = Settings::load_from(&settings_path);
        if first_launch {
            // Nothing reads a keyboard here, so a fresh install runs itself
            settings.autopilot = true;
        }
        if !settings.autopilot {
            log::warn!("Autopilot is off: the runner takes no input and will not dodge");
        }

        let store = JsonFileStore::new(&dir, &settings.save_slot);
        log::info!("Save slot: {}", store.path().display());

        let seed = fresh_seed();
        log::info!("Session seed: {}", seed);
        let mut session = Session::new(store, LogFeedback::new(&settings), &settings, seed);

        session.start();
        session.sign_in_with(&mut EnvIdentity);
        session.begin_run();

        let mut controls = ControlState::with_autopilot(settings.autopilot);
        let mut presenter = LogPresenter::default();
        let first_level = session.run.level;
        let mut restarts = 0;

        for _ in 0..MAX_TICKS {
            let input = controls.sample();
            tick(&mut session, &input, SIM_DT);
            presenter.present(&Frame::capture(&session));

            match session.screen() {
                Screen::LevelComplete => {
                    if let Some(summary) = session.last_summary {
                        log::info!(
                            "Cleared level {} in {:.1}s with {} gems",
                            summary.level,
                            summary.seconds,
                            summary.gems
                        );
                    }
                    if session.run.level + 1 - first_level >= DEMO_LEVELS {
                        break;
                    }
                    session.advance_level();
                }
                Screen::GameOver => {
                    log::info!("Run ended: {:?}", session.game_over_cause);
                    if session.run.gems >= CONTINUE_COST {
                        session.continue_with_gems();
                    } else if restarts < MAX_RESTARTS {
                        restarts += 1;
                        session.restart_level();
                    } else {
                        break;
                    }
                }
                _ => {}
            }
        }

        log::info!(
            "{} finished at level {} with {} gems and score {}",
            session.run.player_name,
            session.run.level,
            session.run.gems,
            session.run.score
        );
        settings.save_to(&settings_path)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Jungle Run (native) starting...");

    if let Err(e) = native::run() {
        log::error!("Jungle Run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}
