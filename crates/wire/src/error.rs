use thiserror::Error;

/// Errors from decoding a raw text frame into a [`crate::ProducerFrame`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
