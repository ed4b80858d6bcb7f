//! One-shot HTTP exchange with a remote backend.
//!
//! # Responsibilities
//! - Drive a single POST over a freshly connected socket
//! - Bound every phase of the exchange by the caller's timeout
//! - Surface non-200 answers as errors

use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::time;

use crate::net::connector;
use crate::remote::types::{FederationError, FederationResult};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// POST a form-encoded body to `http://<host><path>` and return the raw
/// response body.
pub(crate) async fn post_form(
    host: &str,
    path: &str,
    body: String,
    timeout: Duration,
) -> FederationResult<Bytes> {
    let stream = connector::connect_with_timeout(host, timeout)
        .await
        .map_err(|source| FederationError::Connect {
            host: host.to_string(),
            source,
        })?;

    let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await?;
    tokio::spawn(async move {
        if let Err(err) = conn.await {
            tracing::debug!(error = %err, "backend connection closed with error");
        }
    });

    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(HOST, host)
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Full::new(Bytes::from(body)))?;

    let response = time::timeout(timeout, sender.send_request(request))
        .await
        .map_err(|_| FederationError::Timeout(timeout))??;

    if response.status() != StatusCode::OK {
        return Err(FederationError::Status(response.status()));
    }

    let collected = time::timeout(timeout, response.into_body().collect())
        .await
        .map_err(|_| FederationError::Timeout(timeout))??;
    Ok(collected.to_bytes())
}
