use thiserror::Error;

/// Errors raised by the report registry and fan-out engine.
///
/// The variants line up with the taxonomy the rest of the proxy relies on:
/// [`Error::ReportNotFound`] is recoverable and reported back to a single
/// connection, everything else is fatal and must escape to the supervisor.
#[derive(Debug, Error)]
pub enum Error {
    /// A consumer asked for a report name with no current session.
    #[error("report '{0}' not found")]
    ReportNotFound(String),

    /// A producer violated the framing contract (bad first message, unknown
    /// frame type, or a `delta_list` before `new_report`).
    #[error("producer protocol violation: {0}")]
    ProducerProtocolViolation(String),

    /// A caller broke an invariant the engine relies on, e.g. enqueuing a
    /// delta on a connection that never registered a session.
    #[error("internal invariant violation: {0}")]
    InternalInvariantViolation(String),
}

impl Error {
    /// Whether this error should escape the endpoint and bring the whole
    /// process down, per the fail-fast propagation policy.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::ReportNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
