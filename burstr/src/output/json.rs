use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use burstr_core::runner::{CycleProgress, DurationStats, ProgressFn, Report, RunConfig};

use super::OutputFormatter;

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn print_header(&self, _config: &RunConfig) {}

    fn progress(&self) -> Option<ProgressFn> {
        Some(Arc::new(move |p: CycleProgress| {
            emit_json_line(&build_progress_line(&p));
        }))
    }

    fn print_summary(&self, report: &Report) -> anyhow::Result<()> {
        emit_json_line(&build_summary_line(report));
        Ok(())
    }

    fn print_report_written(&self, path: &Path) {
        emit_json_line(&JsonReportLine {
            kind: "report",
            path: path.display().to_string(),
        });
    }
}

/// Latencies in fractional milliseconds; all `None` when nothing succeeded.
#[derive(Debug, Default, Serialize)]
pub(crate) struct JsonLatency {
    pub latency_min_ms: Option<f64>,
    pub latency_avg_ms: Option<f64>,
    pub latency_max_ms: Option<f64>,
    pub latency_p50_ms: Option<f64>,
    pub latency_p90_ms: Option<f64>,
    pub latency_p99_ms: Option<f64>,
}

impl From<Option<&DurationStats>> for JsonLatency {
    fn from(d: Option<&DurationStats>) -> Self {
        let Some(d) = d else {
            return Self::default();
        };
        let ms = |v: std::time::Duration| Some(v.as_secs_f64() * 1000.0);
        Self {
            latency_min_ms: ms(d.min),
            latency_avg_ms: ms(d.avg),
            latency_max_ms: ms(d.max),
            latency_p50_ms: ms(d.p50),
            latency_p90_ms: ms(d.p90),
            latency_p99_ms: ms(d.p99),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonProgressLine {
    pub kind: &'static str,
    pub cycle: u64,
    pub cycles: u64,
    pub elapsed_secs: f64,
    pub cycle_elapsed_secs: f64,

    pub total_requests: u64,
    pub success: u64,
    pub errors: u64,

    #[serde(flatten)]
    pub latency: JsonLatency,

    pub status_codes: BTreeMap<u16, u64>,
    pub error_kinds: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub target_url: String,
    pub fan_out: u64,
    pub concurrency: u64,
    pub total_cycles: u64,
    pub elapsed_secs: f64,

    pub total_requests: u64,
    pub success: u64,
    pub errors: u64,

    #[serde(flatten)]
    pub latency: JsonLatency,

    pub status_codes: BTreeMap<u16, u64>,
    pub error_kinds: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize)]
struct JsonReportLine {
    kind: &'static str,
    path: String,
}

fn build_progress_line(p: &CycleProgress) -> JsonProgressLine {
    let s = &p.stats;
    JsonProgressLine {
        kind: "progress",
        cycle: p.cycle,
        cycles: p.cycles,
        elapsed_secs: p.run_elapsed.as_secs_f64(),
        cycle_elapsed_secs: s.elapsed.as_secs_f64(),
        total_requests: s.total,
        success: s.success,
        errors: s.error,
        latency: s.durations.as_ref().into(),
        status_codes: s.status_codes.clone(),
        error_kinds: s.error_kinds.clone(),
    }
}

fn build_summary_line(r: &Report) -> JsonSummaryLine {
    JsonSummaryLine {
        kind: "summary",
        target_url: r.target_url.clone(),
        fan_out: r.fan_out,
        concurrency: r.concurrency,
        total_cycles: r.total_cycles,
        elapsed_secs: r.elapsed.as_secs_f64(),
        total_requests: r.total,
        success: r.success,
        errors: r.error,
        latency: r.durations.as_ref().into(),
        status_codes: r.status_codes.clone(),
        error_kinds: r.error_kinds.clone(),
    }
}

fn emit_json_line<T: Serialize>(line: &T) {
    let mut out = std::io::stdout().lock();
    if serde_json::to_writer(&mut out, line).is_ok() {
        let _ = writeln!(out);
    }
}
