// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Read-only status dashboard over the session/upload store.
//!
//! Served on both listeners: the camera can reach it over HTTPS, and a
//! browser gets it warning-free over plain HTTP on the dashboard port.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::StatusResponse;
use crate::state::AppState;
use crate::uploads::UploadRecord;

/// Response of `GET /api/uploads`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadsResponse {
    pub uploads: Vec<UploadRecord>,
}

/// `GET /api/status`
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "Dashboard",
    responses((status = 200, description = "Server status", body = StatusResponse))
)]
pub async fn api_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let (total_uploads, total_size_bytes) = state.uploads.totals().await;
    Json(StatusResponse {
        status: "running".to_string(),
        uptime: format_uptime(state.started_at),
        total_uploads,
        total_size_bytes,
        paired_devices: state.auth.paired_count().await,
        pending_assets: state.uploads.pending_count().await,
    })
}

/// `GET /api/uploads`
#[utoipa::path(
    get,
    path = "/api/uploads",
    tag = "Dashboard",
    responses((status = 200, description = "Finalized uploads, newest first", body = UploadsResponse))
)]
pub async fn api_uploads(State(state): State<AppState>) -> Json<UploadsResponse> {
    Json(UploadsResponse {
        uploads: state.uploads.history(100).await,
    })
}

/// `GET /ca.crt` - the CA certificate the camera's host network must trust.
pub async fn ca_cert(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = state.config.cert_dir.join("ca.crt");
    match tokio::fs::read(&path).await {
        Ok(pem) => Ok((
            [
                (header::CONTENT_TYPE, "application/x-pem-file".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"ca.crt\"".to_string(),
                ),
            ],
            pem,
        )
            .into_response()),
        Err(_) => Err(ApiError::not_found("CA certificate not generated yet")),
    }
}

/// `GET /` - HTML status page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let (total_uploads, total_bytes) = state.uploads.totals().await;
    let paired = state.auth.paired_count().await > 0;
    let uptime = format_uptime(state.started_at);

    let mut rows = String::new();
    for record in state.uploads.history(50).await {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&record.name),
            human_size(record.size),
            escape_html(&record.directory),
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    if rows.is_empty() {
        rows = r#"<tr><td colspan="4" style="text-align:center;color:#888">No uploads yet</td></tr>"#
            .to_string();
    }

    let (pair_color, pair_text) = if paired {
        ("#4ade80", "Paired")
    } else {
        ("#888", "Waiting")
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>framedrop</title>
<style>
  * {{ margin:0; padding:0; box-sizing:border-box; }}
  body {{ font-family: -apple-system, system-ui, sans-serif; background:#111; color:#e5e5e5; padding:2rem; }}
  h1 {{ font-size:1.5rem; font-weight:600; margin-bottom:1.5rem; }}
  .status {{ display:flex; gap:2rem; margin-bottom:2rem; flex-wrap:wrap; }}
  .card {{ background:#1a1a1a; border:1px solid #333; border-radius:8px; padding:1rem 1.5rem; min-width:160px; }}
  .card .label {{ font-size:0.75rem; text-transform:uppercase; color:#888; margin-bottom:0.25rem; }}
  .card .value {{ font-size:1.25rem; font-weight:600; }}
  .dot {{ display:inline-block; width:8px; height:8px; border-radius:50%; margin-right:6px; }}
  table {{ width:100%; border-collapse:collapse; margin-top:1rem; }}
  th {{ text-align:left; font-size:0.75rem; text-transform:uppercase; color:#888; padding:0.5rem 1rem; border-bottom:1px solid #333; }}
  td {{ padding:0.5rem 1rem; border-bottom:1px solid #222; font-size:0.9rem; }}
  a {{ color:#60a5fa; text-decoration:none; }}
  .muted {{ color:#888; font-size:0.85rem; }}
</style>
</head><body>
<h1>framedrop</h1>
<div class="status">
  <div class="card"><div class="label">Server</div>
    <div class="value"><span class="dot" style="background:#4ade80"></span>Running</div></div>
  <div class="card"><div class="label">Camera</div>
    <div class="value"><span class="dot" style="background:{pair_color}"></span>{pair_text}</div></div>
  <div class="card"><div class="label">Uploads</div><div class="value">{total_uploads}</div></div>
  <div class="card"><div class="label">Total Size</div><div class="value">{total_size}</div></div>
  <div class="card"><div class="label">Uptime</div><div class="value">{uptime}</div></div>
</div>
<div style="display:flex; justify-content:space-between; align-items:baseline;">
  <h2 style="font-size:1.1rem">Recent Uploads</h2>
  <a href="/ca.crt">Download CA Certificate</a>
</div>
<table>
  <tr><th>Filename</th><th>Size</th><th>Folder</th><th>Date</th></tr>
  {rows}
</table>
<p class="muted" style="margin-top:2rem">framedrop &mdash; self-hosted Frame.io C2C emulator</p>
</body></html>"#,
        total_size = human_size(total_bytes),
    ))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn human_size(n: u64) -> String {
    if n < 1024 {
        return format!("{n} B");
    }
    let mut value = n as f64;
    for unit in ["KB", "MB", "GB", "TB"] {
        value /= 1024.0;
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
    }
    format!("{:.1} PB", value / 1024.0)
}

fn format_uptime(started_at: chrono::DateTime<Utc>) -> String {
    let secs = (Utc::now() - started_at).num_seconds().max(0);
    if secs < 60 {
        return format!("{secs}s");
    }
    if secs < 3600 {
        return format!("{}m", secs / 60);
    }
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    if hours < 24 {
        return format!("{hours}h {mins}m");
    }
    format!("{}d {}h", hours / 24, hours % 24)
}
