// ui.rs

use crate::event_loop::LineSink;
use crate::transport::{Position, SIXTEENTHS_PER_BAR};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::error;

fn create_sixteenth_progress(multi_progress: &MultiProgress) -> ProgressBar {
    let pb = multi_progress.add(ProgressBar::new(SIXTEENTHS_PER_BAR));
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} [{bar:32.cyan}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("⣀⣤⣦⣶⣷⣿ "),
    );
    pb.set_prefix("Bar");
    pb
}

fn create_transport_spinner(multi_progress: &MultiProgress) -> ProgressBar {
    let pb = multi_progress.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold.dim} {spinner} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix("Transport");
    pb
}

/// Live view of the song position, with monitor lines printed above it
pub struct PositionDisplay {
    multi_progress: MultiProgress,
    sixteenth_pb: ProgressBar,
    transport_pb: ProgressBar,
}

impl PositionDisplay {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A display that renders nothing
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);
        let sixteenth_pb = create_sixteenth_progress(&multi_progress);
        let transport_pb = create_transport_spinner(&multi_progress);

        PositionDisplay {
            multi_progress,
            sixteenth_pb,
            transport_pb,
        }
    }

    pub fn sixteenth_progress(&self) -> &ProgressBar {
        &self.sixteenth_pb
    }

    pub fn transport_spinner(&self) -> &ProgressBar {
        &self.transport_pb
    }
}

impl Default for PositionDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSink for PositionDisplay {
    fn emit(&mut self, line: &str) {
        if let Err(e) = self.multi_progress.println(line) {
            error!("Failed to print monitor line: {}", e);
        }
    }

    fn position_changed(&mut self, position: Position) {
        self.sixteenth_pb.set_position(position.sixteenth_in_bar());
        self.transport_pb.set_message(format!(
            "Bar {} | {} | {}",
            position.bar() + 1,
            position,
            if position.playing { "Playing" } else { "Stopped" }
        ));
        self.transport_pb.tick();
    }
}
