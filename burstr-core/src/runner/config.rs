use std::time::Duration;

use super::error::{Error, Result};

pub const DEFAULT_URL: &str = "http://localhost:8025/";
pub const DEFAULT_FAN_OUT: u64 = 200;
pub const DEFAULT_CONCURRENCY: u64 = 50;
pub const DEFAULT_CYCLES: u64 = 3000;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Everything a run needs, fixed for the lifetime of the run.
///
/// `fan_out` is the number of request tasks launched per cycle and may exceed
/// `concurrency` (the in-flight ceiling) by any factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub url: String,
    pub fan_out: u64,
    pub concurrency: u64,
    pub cycles: u64,
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            fan_out: DEFAULT_FAN_OUT,
            concurrency: DEFAULT_CONCURRENCY,
            cycles: DEFAULT_CYCLES,
            request_timeout: None,
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url).map_err(|_| Error::InvalidUrl(self.url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(Error::InvalidUrl(self.url.clone()));
        }

        if self.fan_out == 0 {
            return Err(Error::InvalidFanOut);
        }
        if self.concurrency == 0 {
            return Err(Error::InvalidConcurrency);
        }
        if self.cycles == 0 {
            return Err(Error::InvalidCycles);
        }
        if self.request_timeout.is_some_and(|d| d.is_zero()) {
            return Err(Error::InvalidTimeout("request_timeout"));
        }
        if self.connect_timeout.is_some_and(|d| d.is_zero()) {
            return Err(Error::InvalidTimeout("connect_timeout"));
        }

        Ok(())
    }
}
