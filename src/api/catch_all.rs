// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Catch-all resilience layer.
//!
//! The camera firmware is not under our control and treats any error
//! response as a hard failure that can abort the whole pairing or upload
//! flow. Every request no typed route matched therefore gets a benign
//! `200 {}`, and we log enough of it for offline analysis of endpoints the
//! emulation does not model yet.
//!
//! Registered as the router's explicit fallback, so it can never shadow a
//! typed route.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

/// Longest body prefix worth logging.
const BODY_LOG_LIMIT: usize = 200;

/// Fallback handler for any unmodeled method/path.
pub async fn handler(request: Request<Body>) -> Json<Value> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    // Reading the body can fail if the camera disconnects mid-request;
    // the answer is still 200.
    let preview = match to_bytes(request.into_body(), 64 * 1024).await {
        Ok(bytes) => {
            let end = bytes.len().min(BODY_LOG_LIMIT);
            String::from_utf8_lossy(&bytes[..end]).into_owned()
        }
        Err(_) => String::from("<unreadable>"),
    };

    warn!(%method, %uri, body = %preview, "unhandled endpoint");
    Json(json!({}))
}
