use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use burstr_core::runner::{CycleStats, DurationStats, Report};
use serde::Serialize;

/// Detailed report persisted after a run.
#[derive(Debug, Serialize)]
pub(crate) struct ReportFile {
    pub target_url: String,
    pub fan_out: u64,
    pub concurrency: u64,
    pub total_cycles: u64,
    pub total_requests: u64,
    pub success_count: u64,
    pub error_count: u64,
    #[serde(flatten)]
    pub durations: Option<DurationFields>,
    pub response_codes: BTreeMap<u16, u64>,
    pub error_kinds: BTreeMap<String, u64>,
    pub elapsed_sec: String,
    pub cycle_details: Vec<CycleDetail>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CycleDetail {
    pub cycle_number: u64,
    pub total_requests: u64,
    pub success_count: u64,
    pub error_count: u64,
    #[serde(flatten)]
    pub durations: Option<DurationFields>,
    pub response_codes: BTreeMap<u16, u64>,
    pub error_kinds: BTreeMap<String, u64>,
    pub elapsed_sec: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DurationFields {
    pub avg_duration_ms: String,
    pub avg_duration_sec: String,
    pub avg_duration_min: String,
    pub min_duration_ms: String,
    pub min_duration_sec: String,
    pub min_duration_min: String,
    pub max_duration_ms: String,
    pub max_duration_sec: String,
    pub max_duration_min: String,
    pub p50_duration_ms: String,
    pub p90_duration_ms: String,
    pub p99_duration_ms: String,
}

impl From<&DurationStats> for DurationFields {
    fn from(d: &DurationStats) -> Self {
        Self {
            avg_duration_ms: format_human(d.avg),
            avg_duration_sec: format_seconds(d.avg),
            avg_duration_min: format_minutes(d.avg),
            min_duration_ms: format_human(d.min),
            min_duration_sec: format_seconds(d.min),
            min_duration_min: format_minutes(d.min),
            max_duration_ms: format_human(d.max),
            max_duration_sec: format_seconds(d.max),
            max_duration_min: format_minutes(d.max),
            p50_duration_ms: format_human(d.p50),
            p90_duration_ms: format_human(d.p90),
            p99_duration_ms: format_human(d.p99),
        }
    }
}

impl From<&CycleStats> for CycleDetail {
    fn from(c: &CycleStats) -> Self {
        Self {
            cycle_number: c.cycle,
            total_requests: c.total,
            success_count: c.success,
            error_count: c.error,
            durations: c.durations.as_ref().map(DurationFields::from),
            response_codes: c.status_codes.clone(),
            error_kinds: c.error_kinds.clone(),
            elapsed_sec: format_seconds(c.elapsed),
        }
    }
}

impl From<&Report> for ReportFile {
    fn from(r: &Report) -> Self {
        Self {
            target_url: r.target_url.clone(),
            fan_out: r.fan_out,
            concurrency: r.concurrency,
            total_cycles: r.total_cycles,
            total_requests: r.total,
            success_count: r.success,
            error_count: r.error,
            durations: r.durations.as_ref().map(DurationFields::from),
            response_codes: r.status_codes.clone(),
            error_kinds: r.error_kinds.clone(),
            elapsed_sec: format_seconds(r.elapsed),
            cycle_details: r.cycles.iter().map(CycleDetail::from).collect(),
        }
    }
}

fn format_human(d: Duration) -> String {
    humantime::format_duration(d).to_string()
}

fn format_seconds(d: Duration) -> String {
    format!("{:.3} seconds", d.as_secs_f64())
}

fn format_minutes(d: Duration) -> String {
    format!("{:.3} minutes", d.as_secs_f64() / 60.0)
}

pub(crate) async fn write(path: &Path, report: &Report) -> anyhow::Result<()> {
    let body = serde_json::to_vec_pretty(&ReportFile::from(report))
        .context("failed to serialize report")?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create dir: {}", parent.display()))?;
    }

    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("failed to write report: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}
