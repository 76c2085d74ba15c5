//! JSON serialization adapter.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

/// Encodes request bodies and decodes response bodies.
///
/// `pretty` only changes the whitespace of outgoing bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.pretty)
    }

    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map_err(|e| ApiError::InvalidArgument(format!("failed to encode body: {e}")))
    }

    /// Decode into `T`. Unknown fields are ignored; missing required fields
    /// and type mismatches fail as a whole.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
