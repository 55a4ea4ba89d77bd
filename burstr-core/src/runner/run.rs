use std::sync::Arc;

use tokio::time::Instant;

use crate::{HttpClient, HttpTransport, Transport};

use super::config::RunConfig;
use super::cycle::run_cycle;
use super::error::Result;
use super::gate::AdmissionGate;
use super::progress::{CycleProgress, ProgressFn};
use super::report::{CycleStats, Report, ReportBuilder};
use super::stats::Tally;

/// Drives `cycles` sequential cycles against one target and folds them into a [`Report`].
///
/// The admission gate is created once and shared by every cycle, so the
/// concurrency ceiling holds across the whole run.
#[derive(Debug)]
pub struct Runner<T> {
    config: RunConfig,
    transport: Arc<T>,
    gate: AdmissionGate,
    url: Arc<str>,
}

impl Runner<HttpTransport> {
    pub fn http(config: RunConfig) -> Result<Self> {
        let client = HttpClient::new(config.connect_timeout);
        let transport = HttpTransport::new(client, config.request_timeout);
        Self::new(config, transport)
    }
}

impl<T: Transport> Runner<T> {
    pub fn new(config: RunConfig, transport: T) -> Result<Self> {
        config.validate()?;

        let ceiling = usize::try_from(config.concurrency).unwrap_or(usize::MAX);
        let url: Arc<str> = Arc::from(config.url.as_str());

        Ok(Self {
            gate: AdmissionGate::new(ceiling),
            transport: Arc::new(transport),
            url,
            config,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every configured cycle. Request failures never abort the run; only an
    /// internal failure (a panicked request task) does.
    pub async fn run(&self, progress: Option<ProgressFn>) -> Result<Report> {
        let cfg = &self.config;
        tracing::info!(
            url = %cfg.url,
            fan_out = cfg.fan_out,
            concurrency = cfg.concurrency,
            cycles = cfg.cycles,
            "starting run"
        );

        let started = Instant::now();
        let mut report = ReportBuilder::new(cfg);

        for cycle in 1..=cfg.cycles {
            tracing::debug!(cycle, "starting cycle");
            let cycle_started = Instant::now();

            let outcomes = run_cycle(&self.transport, &self.gate, &self.url, cfg.fan_out).await?;
            let tally = Tally::from_outcomes(&outcomes);
            let stats = CycleStats::from_tally(cycle, &tally, cycle_started.elapsed());

            if stats.success == 0 {
                tracing::warn!(cycle, errors = stats.error, "cycle had no successful requests");
            }
            tracing::info!(
                cycle,
                success = stats.success,
                errors = stats.error,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "cycle finished"
            );

            if let Some(progress) = &progress {
                progress(CycleProgress {
                    cycle,
                    cycles: cfg.cycles,
                    stats: stats.clone(),
                    run_elapsed: started.elapsed(),
                });
            }

            report.push_cycle(stats, tally);
        }

        let report = report.finish(started.elapsed());
        tracing::info!(
            total = report.total,
            success = report.success,
            errors = report.error,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "run finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::HttpTransportErrorKind;
    use crate::runner::Error;
    use crate::runner::test_support::{Reply, ScriptedTransport};
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::time::Duration;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn config(fan_out: u64, concurrency: u64, cycles: u64) -> RunConfig {
        RunConfig {
            url: "http://127.0.0.1:9/".to_string(),
            fan_out,
            concurrency,
            cycles,
            ..RunConfig::default()
        }
    }

    fn status(status: u16, after: Duration) -> Reply {
        Reply::Status { status, after }
    }

    fn fail(after: Duration) -> Reply {
        Reply::Fail {
            kind: HttpTransportErrorKind::Connect,
            after,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn single_cycle_all_successful() {
        let transport = ScriptedTransport::new(
            [10, 20, 30, 40, 50]
                .into_iter()
                .map(|v| status(200, ms(v)))
                .collect(),
        );
        let runner = Runner::new(config(5, 2, 1), transport).unwrap();

        let report = runner.run(None).await.unwrap();
        let cycle = &report.cycles[0];

        assert_eq!(cycle.cycle, 1);
        assert_eq!((cycle.total, cycle.success, cycle.error), (5, 5, 0));
        let d = cycle.durations.unwrap();
        assert_eq!((d.min, d.avg, d.max), (ms(10), ms(30), ms(50)));
        assert_eq!(cycle.status_codes, BTreeMap::from([(200, 5)]));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_are_excluded_from_timings() {
        let transport = ScriptedTransport::new(vec![
            status(200, ms(10)),
            fail(ms(900)),
            status(200, ms(30)),
            fail(ms(800)),
        ]);
        let runner = Runner::new(config(4, 4, 1), transport).unwrap();

        let report = runner.run(None).await.unwrap();
        let cycle = &report.cycles[0];

        assert_eq!((cycle.total, cycle.success, cycle.error), (4, 2, 2));
        assert_eq!(cycle.status_codes, BTreeMap::from([(200, 2)]));
        assert_eq!(cycle.error_kinds, BTreeMap::from([("connect".to_string(), 2)]));
        let d = cycle.durations.unwrap();
        assert_eq!((d.min, d.avg, d.max), (ms(10), ms(20), ms(30)));
    }

    #[tokio::test(start_paused = true)]
    async fn cycles_are_reported_in_order() {
        let transport = ScriptedTransport::always(200, ms(5));
        let runner = Runner::new(config(10, 3, 3), transport).unwrap();

        let report = runner.run(None).await.unwrap();

        assert_eq!(report.total_cycles, 3);
        assert_eq!(report.total, 30);
        assert_eq!(report.success, 30);
        assert_eq!(
            report.cycles.iter().map(|c| c.cycle).collect::<Vec<_>>(),
            [1, 2, 3]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_totals_match_the_sum_of_cycles() {
        let transport = ScriptedTransport::new(vec![
            status(200, ms(3)),
            status(404, ms(7)),
            fail(ms(2)),
            status(500, ms(11)),
            fail(ms(1)),
            status(200, ms(5)),
            status(200, ms(9)),
        ]);
        // fan_out is coprime with the script length so cycles see different mixes.
        let runner = Runner::new(config(5, 2, 4), transport).unwrap();
        let report = runner.run(None).await.unwrap();

        let cycles = &report.cycles;
        assert_eq!(report.total, cycles.iter().map(|c| c.total).sum::<u64>());
        assert_eq!(report.success, cycles.iter().map(|c| c.success).sum::<u64>());
        assert_eq!(report.error, cycles.iter().map(|c| c.error).sum::<u64>());
        assert_eq!(report.total, report.success + report.error);

        for c in &report.cycles {
            assert_eq!(c.total, c.success + c.error);
            assert_eq!(c.status_codes.values().sum::<u64>(), c.success);
            match c.durations {
                Some(d) => assert!(d.min <= d.avg && d.avg <= d.max),
                None => assert_eq!(c.success, 0),
            }
        }
        assert_eq!(report.status_codes.values().sum::<u64>(), report.success);

        let d = report.durations.unwrap();
        assert_eq!(d.min, ms(3));
        assert_eq!(d.max, ms(11));
    }

    #[tokio::test(start_paused = true)]
    async fn all_failures_leave_durations_unset() {
        let transport = ScriptedTransport::new(vec![fail(ms(4))]);
        let runner = Runner::new(config(3, 1, 2), transport).unwrap();

        let report = runner.run(None).await.unwrap();

        assert_eq!((report.total, report.success, report.error), (6, 0, 6));
        assert_eq!(report.durations, None);
        assert!(report.status_codes.is_empty());
        assert!(report.cycles.iter().all(|c| c.durations.is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn next_cycle_starts_only_after_the_previous_one_drained() {
        let transport = ScriptedTransport::always(200, ms(3));
        let runner = Runner::new(config(8, 3, 4), transport).unwrap();

        let seen: Arc<Mutex<Vec<(u64, u64, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let progress: ProgressFn = {
            let seen = seen.clone();
            let transport = runner.transport.clone();
            Arc::new(move |p: CycleProgress| {
                seen.lock()
                    .unwrap()
                    .push((p.cycle, transport.calls(), transport.in_flight()));
            })
        };

        runner.run(Some(progress)).await.unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(1, 8, 0), (2, 16, 0), (3, 24, 0), (4, 32, 0)]);
        assert!(runner.transport.peak_in_flight() <= 3);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let err = Runner::new(config(0, 1, 1), ScriptedTransport::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidFanOut));
    }
}
