//! Terminal spinner for the dependency pipeline.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;

use expresso_core::{
    application::ports::ScaffoldObserver,
    domain::{CommandSpec, Stage},
};

const TICK: Duration = Duration::from_millis(100);

/// Shows one spinner line per running stage on stderr.
pub struct SpinnerObserver {
    bar: ProgressBar,
    color: bool,
}

impl SpinnerObserver {
    pub fn new(color: bool) -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
            bar.set_style(style);
        }
        Self { bar, color }
    }

    fn mark(&self, succeeded: bool) -> String {
        match (succeeded, self.color) {
            (true, true) => "\u{2713}".green().bold().to_string(),
            (true, false) => "\u{2713}".to_string(),
            (false, true) => "\u{2717}".red().bold().to_string(),
            (false, false) => "\u{2717}".to_string(),
        }
    }
}

impl ScaffoldObserver for SpinnerObserver {
    fn stage_started(&self, _stage: Stage, command: &CommandSpec) {
        self.bar.set_message(command.to_string());
        self.bar.enable_steady_tick(TICK);
    }

    fn stage_finished(&self, stage: Stage, succeeded: bool) {
        self.bar
            .println(format!("{} {}", self.mark(succeeded), self.bar.message()));

        if !succeeded || stage.next().is_none() {
            self.bar.finish_and_clear();
        }
    }
}

impl Drop for SpinnerObserver {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
