//! HTTP transport for index and payload fetching
//!
//! Both entry points perform exactly one GET and surface any failure
//! immediately — no retries, no partial results. A non-2xx status is an
//! error, never a value: callers cannot silently receive an error page
//! where a payload was expected.

use crate::error::{Result, TransportError};
use futures::StreamExt;
use tracing::{debug, info};

/// Fetch a URL and return the full response body
///
/// # Errors
///
/// Returns [`TransportError::Request`] when the request cannot be sent,
/// [`TransportError::Status`] on a non-2xx response, and
/// [`TransportError::Body`] when the body cannot be read to completion.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await.map_err(|e| {
        let reason = if e.is_connect() {
            format!("connection failed: {e}")
        } else {
            e.to_string()
        };
        TransportError::Request {
            url: url.to_string(),
            reason,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let body = response.bytes().await.map_err(|e| TransportError::Body {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    info!(url, bytes = body.len(), "fetched response body");
    Ok(body.to_vec())
}

/// Fetch a URL, accumulating the body chunk by chunk
///
/// Semantically identical to [`fetch`]; the body is drained from the
/// response byte stream instead of buffered in one read, so a large payload
/// archive never requires the client to stage the whole transfer twice.
///
/// # Errors
///
/// Same taxonomy as [`fetch`]; a failure mid-stream surfaces as
/// [`TransportError::Body`].
pub async fn fetch_streaming(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await.map_err(|e| {
        let reason = if e.is_connect() {
            format!("connection failed: {e}")
        } else {
            e.to_string()
        };
        TransportError::Request {
            url: url.to_string(),
            reason,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| TransportError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        body.extend_from_slice(&chunk);
        debug!(url, chunk = chunk.len(), total = body.len(), "payload chunk received");
    }

    info!(url, bytes = body.len(), "fetched streamed response body");
    Ok(body)
}
