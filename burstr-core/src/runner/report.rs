use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::RequestFailure;

use super::config::RunConfig;
use super::stats::{DurationStats, Tally};

/// Terminal result of one request attempt: a status code or a transport failure, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub id: u64,
    pub url: Arc<str>,
    pub result: Result<u16, RequestFailure>,
    pub elapsed: Duration,
}

impl RequestOutcome {
    pub fn status(&self) -> Option<u16> {
        self.result.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&RequestFailure> {
        self.result.as_ref().err()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// 1-based.
    pub cycle: u64,
    pub total: u64,
    pub success: u64,
    pub error: u64,
    /// `None` when no request in the cycle succeeded.
    pub durations: Option<DurationStats>,
    pub status_codes: BTreeMap<u16, u64>,
    pub error_kinds: BTreeMap<String, u64>,
    /// Wall clock from launching the first task to draining the last outcome.
    pub elapsed: Duration,
}

impl CycleStats {
    pub fn from_tally(cycle: u64, tally: &Tally, elapsed: Duration) -> Self {
        Self {
            cycle,
            total: tally.total,
            success: tally.success,
            error: tally.error,
            durations: tally.duration_stats(),
            status_codes: tally.status_codes.clone(),
            error_kinds: tally.error_kinds.clone(),
            elapsed,
        }
    }

    pub fn from_outcomes(cycle: u64, outcomes: &[RequestOutcome], elapsed: Duration) -> Self {
        Self::from_tally(cycle, &Tally::from_outcomes(outcomes), elapsed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub target_url: String,
    pub fan_out: u64,
    pub concurrency: u64,
    pub total_cycles: u64,
    pub total: u64,
    pub success: u64,
    pub error: u64,
    /// Computed once over every successful request of the run.
    pub durations: Option<DurationStats>,
    pub status_codes: BTreeMap<u16, u64>,
    pub error_kinds: BTreeMap<String, u64>,
    /// In cycle order.
    pub cycles: Vec<CycleStats>,
    pub elapsed: Duration,
}

/// Run-wide state owned by the run controller between cycles.
#[derive(Debug)]
pub(crate) struct ReportBuilder {
    target_url: String,
    fan_out: u64,
    concurrency: u64,
    tally: Tally,
    cycles: Vec<CycleStats>,
}

impl ReportBuilder {
    pub(crate) fn new(config: &RunConfig) -> Self {
        let capacity = usize::try_from(config.cycles).unwrap_or(0).min(1 << 16);
        Self {
            target_url: config.url.clone(),
            fan_out: config.fan_out,
            concurrency: config.concurrency,
            tally: Tally::default(),
            cycles: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push_cycle(&mut self, stats: CycleStats, tally: Tally) {
        self.cycles.push(stats);
        self.tally.merge(tally);
    }

    pub(crate) fn finish(self, elapsed: Duration) -> Report {
        let durations = self.tally.duration_stats();
        Report {
            target_url: self.target_url,
            fan_out: self.fan_out,
            concurrency: self.concurrency,
            total_cycles: self.cycles.len() as u64,
            total: self.tally.total,
            success: self.tally.success,
            error: self.tally.error,
            durations,
            status_codes: self.tally.status_codes,
            error_kinds: self.tally.error_kinds,
            cycles: self.cycles,
            elapsed,
        }
    }
}
