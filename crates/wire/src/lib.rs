//! The JSON frame shapes producers and consumers exchange with the proxy
//! over a WebSocket connection. Kept separate from `deltaproxy-core` so the
//! fan-out engine's tests never need to speak JSON or WebSocket.

mod error;
mod frames;

pub use error::{Error, Result};
pub use frames::{ConsumerFrame, ProducerFrame};

/// Decode a single text frame received from a producer connection.
pub fn decode_producer_frame(text: &str) -> Result<ProducerFrame> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a frame destined for a consumer connection as WebSocket text.
pub fn encode_consumer_frame(frame: &ConsumerFrame) -> String {
    serde_json::to_string(frame).expect("ConsumerFrame always serializes")
}
