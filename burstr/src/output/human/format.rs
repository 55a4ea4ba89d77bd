use std::collections::BTreeMap;
use std::time::Duration;

use burstr_core::runner::DurationStats;

use super::duration::format_duration_single;

pub(crate) fn format_rate(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.0}")
    } else {
        "0".to_string()
    }
}

pub(crate) fn requests_per_sec(requests: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        requests as f64 / secs
    } else {
        0.0
    }
}

/// `200 OK`, or just the code when it has no canonical reason phrase.
pub(crate) fn format_status_label(code: u16) -> String {
    match http::StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("{code} {reason}"),
        None => code.to_string(),
    }
}

pub(crate) fn format_latency_inline(d: Option<&DurationStats>) -> String {
    match d {
        Some(d) => format!(
            "min={} avg={} max={} p50={} p90={} p99={}",
            format_duration_single(d.min),
            format_duration_single(d.avg),
            format_duration_single(d.max),
            format_duration_single(d.p50),
            format_duration_single(d.p90),
            format_duration_single(d.p99),
        ),
        None => "n/a".to_string(),
    }
}

/// Entries sorted by count (desc), then key.
pub(crate) fn sorted_by_count<K: Ord + Clone>(counts: &BTreeMap<K, u64>) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|(ak, ac), (bk, bc)| bc.cmp(ac).then_with(|| ak.cmp(bk)));
    entries
}
