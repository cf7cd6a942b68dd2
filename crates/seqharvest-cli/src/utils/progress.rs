use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use seqharvest::core::io::silent::FlushOutcome;
use seqharvest::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct SpinnerState {
    pb: ProgressBar,
    phase: &'static str,
    accepted: u64,
}

impl SpinnerState {
    fn refresh_message(&self) {
        self.pb.set_message(format!(
            "{}: {} record(s), {} accepted",
            self.phase,
            self.pb.position(),
            self.accepted
        ));
    }
}

#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<SpinnerState>>,
}

impl CliProgressHandler {
    pub fn new(visible: bool) -> Self {
        let pb = ProgressBar::new_spinner()
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        });

        Self {
            state: Arc::new(Mutex::new(SpinnerState {
                pb,
                phase: "",
                accepted: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress spinner mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    guard.phase = name;
                    guard.accepted = 0;
                    guard.pb.reset();
                    guard.pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    guard.pb.set_message(name.to_string());
                }
                Progress::PhaseFinish => {
                    guard.pb.disable_steady_tick();
                    guard.pb.finish_with_message(format!("✓ {}", guard.phase));
                }
                Progress::RecordFlushed(outcome) => {
                    if outcome == FlushOutcome::Empty {
                        return;
                    }
                    guard.pb.inc(1);
                    if outcome == FlushOutcome::Accepted {
                        guard.accepted += 1;
                    }
                    guard.refresh_message();
                }
                Progress::Message(msg) => {
                    if !guard.pb.is_finished() {
                        guard.pb.println(format!("  {}", msg));
                    } else {
                        guard.pb.set_message(msg);
                    }
                }
            }
        })
    }

    /// Removes the spinner line from the terminal.
    pub fn clear(&self) {
        if let Ok(guard) = self.state.lock() {
            guard.pb.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }
}
