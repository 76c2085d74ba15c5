//! Maps HTTP responses onto success or a classified `ApiError`.
//!
//! Every operation ends in exactly one of: success, `Network`, `NotFound` /
//! `Http`, or `Decode`. Nothing here retries.

use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::trace;

use crate::codec::JsonCodec;
use crate::error::{ApiError, Result};
use crate::http::HttpResponse;

/// Turn any non-2xx status into an error, keeping the raw body.
pub fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    trace!(status = response.status, "classified as HTTP error");
    if response.status == 404 {
        return Err(ApiError::NotFound {
            body: response.body_text(),
        });
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body_text(),
    })
}

/// Decode the body of a response that should carry a value.
///
/// Statuses in `expected` always decode. Any other 2xx decodes when it has a
/// body and is a protocol error when it does not.
pub fn decode_body<T: DeserializeOwned>(
    codec: &JsonCodec,
    response: &HttpResponse,
    expected: &[u16],
) -> Result<T> {
    check_status(response)?;
    if !expected.contains(&response.status) && response.body.is_empty() {
        return Err(unexpected_empty(response.status));
    }
    codec.decode(&response.body)
}

/// Accept a response that carries no value.
///
/// Statuses in `expected` succeed whatever the body. Any other 2xx must
/// carry well-formed JSON to count as success.
pub fn expect_empty(codec: &JsonCodec, response: &HttpResponse, expected: &[u16]) -> Result<()> {
    check_status(response)?;
    if expected.contains(&response.status) {
        return Ok(());
    }
    if response.body.is_empty() {
        return Err(unexpected_empty(response.status));
    }
    codec.decode::<IgnoredAny>(&response.body).map(|_| ())
}

fn unexpected_empty(status: u16) -> ApiError {
    ApiError::Decode(format!("unexpected status {status} with empty body"))
}
