//! Wire codec for client-server notifications.
//!
//! Frames are JSON text. The server may batch several notifications into a
//! single array frame; a lone object is a batch of one.

use curvy_core::{Inbound, Outbound};
use serde::Deserialize;
use thiserror::Error;

/// Codec error.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Empty frame")]
    Empty,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Frame {
    Batch(Vec<Inbound>),
    Single(Inbound),
}

/// Decode a server frame into its notifications, in order.
///
/// # Errors
/// Returns error if the frame is blank or not a valid notification.
pub fn decode_frame(text: &str) -> Result<Vec<Inbound>, ProtocolError> {
    if text.trim().is_empty() {
        return Err(ProtocolError::Empty);
    }

    match serde_json::from_str(text)? {
        Frame::Batch(batch) => Ok(batch),
        Frame::Single(msg) => Ok(vec![msg]),
    }
}

/// Encode one outbound notification.
///
/// # Errors
/// Returns error if serialization fails.
pub fn encode(msg: &Outbound) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

/// Encode several outbound notifications into one frame.
///
/// # Errors
/// Returns error if serialization fails.
pub fn encode_batch(batch: &[Outbound]) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(batch)?)
}
