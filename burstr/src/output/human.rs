use std::path::Path;
use std::sync::Arc;

use burstr_core::runner::{CycleProgress, ProgressFn, Report, RunConfig};

mod duration;
mod format;
mod progress;
mod summary;

use format::{format_latency_inline, format_rate, requests_per_sec};
use progress::HumanProgress;
use summary::render;

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput {
    progress: Arc<HumanProgress>,
}

impl HumanReadableOutput {
    pub(crate) fn new() -> Self {
        Self {
            progress: Arc::new(HumanProgress::new()),
        }
    }
}

impl OutputFormatter for HumanReadableOutput {
    fn print_header(&self, config: &RunConfig) {
        println!("target: {}", config.url);
        println!(
            "fan_out={} concurrency={} cycles={} timeout={}",
            config.fan_out,
            config.concurrency,
            config.cycles,
            config
                .request_timeout
                .map_or_else(|| "none".to_string(), |t| format!("{t:?}"))
        );
        println!();
    }

    fn progress(&self) -> Option<ProgressFn> {
        let progress = self.progress.clone();

        Some(Arc::new(move |p: CycleProgress| {
            let s = &p.stats;
            let message = format!(
                "ok={} err={} rps={} {}",
                s.success,
                s.error,
                format_rate(requests_per_sec(s.total, s.elapsed)),
                format_latency_inline(s.durations.as_ref())
            );
            progress.update(p.cycle, p.cycles, message);
        }))
    }

    fn print_summary(&self, report: &Report) -> anyhow::Result<()> {
        self.progress.finish();
        print!("{}", render(report));
        Ok(())
    }

    fn print_report_written(&self, path: &Path) {
        println!("\nreport: {}", path.display());
    }
}
