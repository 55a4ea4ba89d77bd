use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::{HttpTransportErrorKind, RequestFailure, Transport};

use super::report::RequestOutcome;

pub(crate) fn ok(id: u64, status: u16, elapsed: Duration) -> RequestOutcome {
    RequestOutcome {
        id,
        url: Arc::from("http://test.invalid/"),
        result: Ok(status),
        elapsed,
    }
}

pub(crate) fn failed(id: u64, elapsed: Duration) -> RequestOutcome {
    RequestOutcome {
        id,
        url: Arc::from("http://test.invalid/"),
        result: Err(RequestFailure::new(
            HttpTransportErrorKind::Connect,
            "connection refused",
        )),
        elapsed,
    }
}

/// What the fake transport does for the n-th call of a cycle.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Status { status: u16, after: Duration },
    Fail { kind: HttpTransportErrorKind, after: Duration },
}

/// Replies are picked by call index modulo the script length, so every cycle of
/// `fan_out == script.len()` replays the same script.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    script: Vec<Reply>,
    calls: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Reply>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    pub(crate) fn always(status: u16, after: Duration) -> Self {
        Self::new(vec![Reply::Status { status, after }])
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, _url: &str) -> Result<u16, RequestFailure> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let reply = match self.script.len() {
            0 => Reply::Status {
                status: 200,
                after: Duration::ZERO,
            },
            len => self.script[(n % len as u64) as usize].clone(),
        };

        let res = match reply {
            Reply::Status { status, after } => {
                tokio::time::sleep(after).await;
                Ok(status)
            }
            Reply::Fail { kind, after } => {
                tokio::time::sleep(after).await;
                Err(RequestFailure::new(kind, format!("scripted {kind} failure")))
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        res
    }
}
