use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::error::Result;

/// Ceiling on the number of requests in flight at once, shared by every cycle of a run.
///
/// Tasks waiting for a slot park in the semaphore's own wait list; queueing more
/// tasks on the gate costs nothing beyond the tasks themselves. Wakeup order is
/// not part of the contract.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    slots: Arc<Semaphore>,
}

/// A held slot. Dropping it (on any exit path) gives the slot back.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionPermit {
    pub fn release(self) {}
}

impl AdmissionGate {
    /// `ceiling` is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn new(ceiling: usize) -> Self {
        let ceiling = ceiling.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            slots: Arc::new(Semaphore::new(ceiling)),
        }
    }

    pub async fn acquire(&self) -> Result<AdmissionPermit> {
        let permit = self.slots.clone().acquire_owned().await?;
        Ok(AdmissionPermit { _permit: permit })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_admits_more_than_the_ceiling() {
        let gate = AdmissionGate::new(3);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..64 {
            let gate = gate.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            tasks.spawn(async move {
                let permit = gate.acquire().await.unwrap();
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                permit.release();
            });
        }
        while let Some(res) = tasks.join_next().await {
            res.unwrap();
        }

        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn dropping_a_permit_frees_its_slot() {
        let gate = AdmissionGate::new(1);
        let held = gate.acquire().await.unwrap();

        let blocked = tokio::time::timeout(Duration::from_millis(20), gate.acquire()).await;
        assert!(blocked.is_err(), "second acquire should wait for the slot");

        drop(held);
        let next = tokio::time::timeout(Duration::from_millis(200), gate.acquire()).await;
        assert!(next.is_ok(), "slot should be free after the permit is dropped");
    }

    #[tokio::test]
    async fn zero_ceiling_admits_exactly_one() {
        let gate = AdmissionGate::new(0);
        let _held = gate.acquire().await.unwrap();

        let second = tokio::time::timeout(Duration::from_millis(20), gate.acquire()).await;
        assert!(second.is_err(), "a zero ceiling behaves like a ceiling of one");
    }
}
