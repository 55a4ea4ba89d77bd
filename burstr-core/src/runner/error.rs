pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("admission gate closed")]
    GateClosed(#[from] tokio::sync::AcquireError),

    #[error("invalid target url `{0}` (expected an absolute http:// or https:// URL)")]
    InvalidUrl(String),

    #[error("`fan_out` must be a positive integer")]
    InvalidFanOut,

    #[error("`concurrency` must be a positive integer")]
    InvalidConcurrency,

    #[error("`cycles` must be a positive integer")]
    InvalidCycles,

    #[error("`{0}` must be a positive duration")]
    InvalidTimeout(&'static str),
}
