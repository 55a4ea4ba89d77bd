mod transport;

pub mod runner;

pub use burstr_http::{HttpClient, HttpTransportErrorKind};
pub use transport::{HttpTransport, RequestFailure, Transport};
