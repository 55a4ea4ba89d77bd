use std::fmt::Write as _;

use burstr_core::runner::Report;

use super::duration::format_duration_single;
use super::format::*;

pub(crate) fn render(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("summary\n");
    writeln!(&mut out, "  target: {}", report.target_url).ok();
    writeln!(
        &mut out,
        "  cycles: {} (fan_out {}, concurrency {})",
        report.total_cycles, report.fan_out, report.concurrency
    )
    .ok();
    writeln!(
        &mut out,
        "  requests: {} (success {}, errors {})",
        report.total, report.success, report.error
    )
    .ok();
    writeln!(
        &mut out,
        "  elapsed: {} ({} req/s)",
        format_duration_single(report.elapsed),
        format_rate(requests_per_sec(report.total, report.elapsed))
    )
    .ok();
    writeln!(
        &mut out,
        "  latency: {}",
        format_latency_inline(report.durations.as_ref())
    )
    .ok();

    if !report.status_codes.is_empty() {
        out.push_str("  status codes:\n");
        for (code, count) in sorted_by_count(&report.status_codes) {
            writeln!(&mut out, "    {}: {count}", format_status_label(code)).ok();
        }
    }

    if !report.error_kinds.is_empty() {
        out.push_str("  errors:\n");
        for (kind, count) in sorted_by_count(&report.error_kinds) {
            writeln!(&mut out, "    {kind}: {count}").ok();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use burstr_core::runner::DurationStats;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn report() -> Report {
        Report {
            target_url: "http://localhost:8025/".to_string(),
            fan_out: 4,
            concurrency: 2,
            total_cycles: 2,
            total: 8,
            success: 6,
            error: 2,
            durations: None,
            status_codes: BTreeMap::from([(200, 5), (503, 1)]),
            error_kinds: BTreeMap::from([("connect".to_string(), 2)]),
            cycles: Vec::new(),
            elapsed: Duration::from_secs(2),
        }
    }

    #[test]
    fn renders_counts_and_breakdowns() {
        let text = render(&report());

        assert!(text.contains("target: http://localhost:8025/"), "{text}");
        assert!(text.contains("cycles: 2 (fan_out 4, concurrency 2)"), "{text}");
        assert!(text.contains("requests: 8 (success 6, errors 2)"), "{text}");
        assert!(text.contains("elapsed: 2s (4 req/s)"), "{text}");
        assert!(text.contains("200 OK: 5"), "{text}");
        assert!(text.contains("503 Service Unavailable: 1"), "{text}");
        assert!(text.contains("connect: 2"), "{text}");
    }

    #[test]
    fn latency_is_na_without_successes() {
        let mut r = report();
        assert!(render(&r).contains("latency: n/a"));

        let ms = Duration::from_millis;
        r.durations = Some(DurationStats {
            min: ms(10),
            avg: ms(30),
            max: ms(50),
            p50: ms(30),
            p90: ms(50),
            p99: ms(50),
        });
        let text = render(&r);
        assert!(text.contains("latency: min=10ms avg=30ms max=50ms"), "{text}");
    }
}
