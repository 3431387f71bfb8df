// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Wire types for the emulated C2C API and the dashboard API.
//!
//! Request shapes are deliberately lenient (`#[serde(default)]` everywhere a
//! field can plausibly be absent): camera firmware revisions differ in what
//! they send, and a deserialization failure would surface as a device-side
//! error we cannot recover from.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---- Device authorization -------------------------------------------------

/// Form body of `POST /v2/auth/device/code`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeviceCodeForm {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scope: String,
}

/// Response of `POST /v2/auth/device/code`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: String,
    pub expires_in: u64,
    pub interval: u64,
}

/// Form body of `POST /v2/auth/token`.
///
/// Carries either a device code (initial pairing) or a refresh token,
/// depending on `grant_type`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenForm {
    #[serde(default)]
    pub grant_type: String,
    #[serde(default)]
    pub device_code: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Response of `POST /v2/auth/token`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub scope: String,
}

// ---- Account stubs --------------------------------------------------------

/// Minimal fake profile for `GET /v2/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub account_id: String,
}

/// Minimal fake account for `GET /v2/accounts/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
}

// ---- Assets ---------------------------------------------------------------

/// JSON body of `POST /v2/devices/assets`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateAssetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub filetype: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub is_realtime_upload: bool,
}

/// Response of `POST /v2/devices/assets`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssetResponse {
    pub id: String,
    pub name: String,
    pub filesize: Option<u64>,
    pub filetype: String,
    /// Ordered upload references, one per part, resolvable to this server.
    pub upload_urls: Vec<String>,
    pub is_realtime_upload: bool,
}

/// Response of `POST /v2/devices/assets/{id}/realtime-upload-parts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RealtimePartsResponse {
    pub upload_urls: Vec<String>,
}

// ---- Dashboard ------------------------------------------------------------

/// Response of `GET /api/status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub uptime: String,
    pub total_uploads: usize,
    pub total_size_bytes: u64,
    pub paired_devices: usize,
    pub pending_assets: usize,
}
