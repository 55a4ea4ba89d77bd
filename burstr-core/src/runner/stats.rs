use hdrhistogram::Histogram;
use std::collections::BTreeMap;
use std::time::Duration;

use super::report::RequestOutcome;

/// Latency summary over successful requests only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationStats {
    pub min: Duration,
    pub avg: Duration,
    pub max: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p99: Duration,
}

impl DurationStats {
    /// Returns `None` for an empty slice: no successful request, no latency to report.
    pub fn from_durations(durations: &[Duration]) -> Option<Self> {
        let min = *durations.iter().min()?;
        let max = *durations.iter().max()?;

        let sum_ns: u128 = durations.iter().map(Duration::as_nanos).sum();
        let avg_ns = sum_ns / durations.len() as u128;
        let avg = Duration::from_nanos(u64::try_from(avg_ns).unwrap_or(u64::MAX));

        // Microseconds, 3 sigfigs, sized to the slowest sample so nothing saturates.
        let as_us = |d: &Duration| u64::try_from(d.as_micros()).unwrap_or(u64::MAX).max(1);
        let high = as_us(&max).clamp(2, u64::MAX / 2);
        // low=1, 2 <= high <= u64::MAX/2 and sigfig=3 are always accepted by hdrhistogram.
        let mut hist = Histogram::<u64>::new_with_bounds(1, high, 3)
            .unwrap_or_else(|err| panic!("failed to init histogram: {err}"));
        for d in durations {
            hist.saturating_record(as_us(d));
        }
        // Histogram buckets report their upper edge, which can overshoot the observed max.
        let quantile =
            |q: f64| Duration::from_micros(hist.value_at_quantile(q)).clamp(min, max);

        Some(Self {
            min,
            avg,
            max,
            p50: quantile(0.50),
            p90: quantile(0.90),
            p99: quantile(0.99),
        })
    }
}

/// Order-independent fold over request outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: u64,
    pub success: u64,
    pub error: u64,
    /// Elapsed time of every successful request, in arrival order.
    pub durations: Vec<Duration>,
    pub status_codes: BTreeMap<u16, u64>,
    /// Transport failures keyed by error kind (`connect`, `timeout`, ...).
    pub error_kinds: BTreeMap<String, u64>,
}

impl Tally {
    pub fn from_outcomes(outcomes: &[RequestOutcome]) -> Self {
        let mut tally = Self::default();
        for outcome in outcomes {
            tally.record(outcome);
        }
        tally
    }

    pub fn record(&mut self, outcome: &RequestOutcome) {
        self.total += 1;
        match &outcome.result {
            Ok(status) => {
                self.success += 1;
                self.durations.push(outcome.elapsed);
                *self.status_codes.entry(*status).or_insert(0) += 1;
            }
            Err(failure) => {
                self.error += 1;
                *self.error_kinds.entry(failure.kind.to_string()).or_insert(0) += 1;
            }
        }
    }

    pub fn merge(&mut self, other: Tally) {
        self.total += other.total;
        self.success += other.success;
        self.error += other.error;
        self.durations.extend(other.durations);
        for (status, count) in other.status_codes {
            *self.status_codes.entry(status).or_insert(0) += count;
        }
        for (kind, count) in other.error_kinds {
            *self.error_kinds.entry(kind).or_insert(0) += count;
        }
    }

    pub fn duration_stats(&self) -> Option<DurationStats> {
        DurationStats::from_durations(&self.durations)
    }
}
