use std::sync::Arc;
use std::time::Duration;

use super::report::CycleStats;

#[derive(Debug, Clone)]
pub struct CycleProgress {
    pub cycle: u64,
    pub cycles: u64,
    pub stats: CycleStats,
    pub run_elapsed: Duration,
}

/// Called once after every completed cycle.
pub type ProgressFn = Arc<dyn Fn(CycleProgress) + Send + Sync + 'static>;
