use std::sync::Arc;

use tokio::task::JoinSet;

use crate::Transport;

use super::error::Result;
use super::gate::AdmissionGate;
use super::report::RequestOutcome;
use super::task::execute_request;

/// Launches `fan_out` request tasks at once and waits for every one of them.
///
/// All tasks are spawned up front; the gate decides how many are on the wire.
/// Each task's outcome stays in its join handle until drained here, so there is
/// no intermediate queue to size. Outcomes come back in completion order.
pub async fn run_cycle<T: Transport>(
    transport: &Arc<T>,
    gate: &AdmissionGate,
    url: &Arc<str>,
    fan_out: u64,
) -> Result<Vec<RequestOutcome>> {
    let mut tasks = JoinSet::new();
    for id in 0..fan_out {
        let transport = transport.clone();
        let gate = gate.clone();
        let url = url.clone();
        tasks.spawn(async move { execute_request(transport.as_ref(), &gate, url, id).await });
    }

    let mut outcomes = Vec::with_capacity(usize::try_from(fan_out).unwrap_or(0));
    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined??);
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::runner::test_support::ScriptedTransport;
    use std::collections::BTreeSet;
    use std::time::Duration;

    const CEILING: u64 = 4;

    async fn run(fan_out: u64) -> (Vec<RequestOutcome>, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::always(200, Duration::from_millis(1)));
        let gate = AdmissionGate::new(CEILING as usize);
        let url: Arc<str> = Arc::from("http://x/");
        let outcomes = run_cycle(&transport, &gate, &url, fan_out).await.unwrap();
        (outcomes, transport)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn yields_exactly_one_outcome_per_task() {
        for fan_out in [0, 1, CEILING, 10 * CEILING] {
            let (outcomes, transport) = run(fan_out).await;

            assert_eq!(outcomes.len() as u64, fan_out);
            assert_eq!(transport.calls(), fan_out);

            let ids: BTreeSet<u64> = outcomes.iter().map(|o| o.id).collect();
            assert_eq!(ids, (0..fan_out).collect::<BTreeSet<_>>());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn overcommitted_cycle_respects_the_ceiling() {
        let (outcomes, transport) = run(100 * CEILING).await;

        assert_eq!(outcomes.len() as u64, 100 * CEILING);
        assert!(transport.peak_in_flight() <= CEILING as usize);
        assert_eq!(transport.in_flight(), 0);
    }

    #[tokio::test]
    async fn empty_cycle_returns_nothing() {
        let (outcomes, transport) = run(0).await;
        assert!(outcomes.is_empty());
        assert_eq!(transport.calls(), 0);
    }
}
