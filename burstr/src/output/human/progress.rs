use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// One bar over the run's cycles, drawn on stderr so stdout stays clean.
pub(crate) struct HumanProgress {
    pb: ProgressBar,
}

impl HumanProgress {
    pub(crate) fn new() -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr_with_hz(5));
        pb.set_style(bar_style());
        pb.set_prefix("cycles");
        Self { pb }
    }

    pub(crate) fn update(&self, cycle: u64, cycles: u64, message: String) {
        self.pb.set_length(cycles);
        self.pb.set_position(cycle.min(cycles));
        self.pb.set_message(message);
    }

    pub(crate) fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix} [ {bar:20.cyan/blue} ] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█░")
}
