mod config;
mod cycle;
mod error;
mod gate;
mod progress;
mod report;
mod run;
mod stats;
mod task;

#[cfg(test)]
mod test_support;

pub use config::{
    DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT, DEFAULT_CYCLES, DEFAULT_FAN_OUT, DEFAULT_URL,
    RunConfig,
};
pub use cycle::run_cycle;
pub use error::{Error, Result};
pub use gate::{AdmissionGate, AdmissionPermit};
pub use progress::{CycleProgress, ProgressFn};
pub use report::{CycleStats, Report, RequestOutcome};
pub use run::Runner;
pub use stats::{DurationStats, Tally};
pub use task::execute_request;
