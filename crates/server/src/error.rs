use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors the HTTP layer can hand back to a client, as opposed to the fatal
/// errors that escape to the supervisor and terminate the process.
#[derive(Debug, Error)]
pub enum Error {
    #[error("report '{0}' not found")]
    ReportNotFound(String),

    #[error("failed to bind to {0}: {1}")]
    Bind(std::net::SocketAddr, #[source] std::io::Error),

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),
}

impl From<dpcore::Error> for Error {
    fn from(err: dpcore::Error) -> Self {
        match err {
            dpcore::Error::ReportNotFound(name) => Error::ReportNotFound(name),
            other => Error::Server(std::io::Error::other(other.to_string())),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::ReportNotFound(name) => {
                (StatusCode::NOT_FOUND, format!("report '{name}' not found")).into_response()
            }
            Error::Bind(..) | Error::Server(..) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
