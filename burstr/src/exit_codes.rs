#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// At least one request failed and `--fail-on-errors` was set.
    RequestsFailed = 10,

    /// Invalid CLI/config/options (bad flags, unreadable config, invalid URL, etc.).
    InvalidInput = 30,

    /// Internal/runtime error (IO errors, a panicked request task).
    RuntimeError = 40,

    /// The run completed but the detailed report could not be written.
    ReportWriteFailed = 50,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn from_request_errors(fail_on_errors: bool, errors: u64) -> Self {
        if fail_on_errors && errors > 0 {
            Self::RequestsFailed
        } else {
            Self::Success
        }
    }
}
