use std::sync::Arc;

use tokio::time::Instant;

use crate::Transport;

use super::error::Result;
use super::gate::AdmissionGate;
use super::report::RequestOutcome;

/// Runs one request under the admission gate and reports how it ended.
///
/// The slot is held only around the transport call, and the elapsed time covers
/// exactly that call whether it succeeds or fails. A transport failure is an
/// outcome, not an `Err`; the only error here is a closed gate.
pub async fn execute_request<T: Transport>(
    transport: &T,
    gate: &AdmissionGate,
    url: Arc<str>,
    id: u64,
) -> Result<RequestOutcome> {
    let permit = gate.acquire().await?;

    let started = Instant::now();
    let result = transport.get(&url).await;
    let elapsed = started.elapsed();

    permit.release();

    if let Err(failure) = &result {
        tracing::debug!(id, kind = %failure.kind, error = %failure, "request failed");
    }

    Ok(RequestOutcome {
        id,
        url,
        result,
        elapsed,
    })
}
