// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! OAuth 2.0 device-code grant endpoints the camera pairs through.

use axum::{extract::State, Form, Json};
use tracing::{info, warn};

use crate::auth::store::{DEVICE_CODE_TTL, POLL_INTERVAL_SECS, TOKEN_TTL};
use crate::auth::GrantError;
use crate::error::ApiError;
use crate::models::{DeviceCodeForm, DeviceCodeResponse, TokenForm, TokenResponse};
use crate::state::AppState;

/// Where the vendor app would send a human to enter the user code. Purely
/// cosmetic here: the camera displays it, but approval is automatic.
const VERIFICATION_URI: &str = "https://api.frame.io/device";

/// Scope string the vendor API reports on issued tokens.
const TOKEN_SCOPE: &str = "asset_create offline";

/// `POST /v2/auth/device/code` - camera requests a pairing code.
#[utoipa::path(
    post,
    path = "/v2/auth/device/code",
    tag = "Device Auth",
    responses(
        (status = 200, description = "Pairing code issued", body = DeviceCodeResponse),
        (status = 400, description = "Missing client_id")
    )
)]
pub async fn device_code(
    State(state): State<AppState>,
    Form(form): Form<DeviceCodeForm>,
) -> Result<Json<DeviceCodeResponse>, ApiError> {
    let authorization = state.auth.issue(&form.client_id, &form.scope).await?;

    info!(
        user_code = %authorization.user_code,
        client_id = %authorization.client_id,
        "device pairing requested, auto-approved (self-hosted mode)"
    );

    Ok(Json(DeviceCodeResponse {
        device_code: authorization.device_code,
        verification_uri: VERIFICATION_URI.to_string(),
        verification_uri_complete: format!(
            "{VERIFICATION_URI}?code={}",
            authorization.user_code
        ),
        user_code: authorization.user_code,
        expires_in: DEVICE_CODE_TTL.as_secs(),
        interval: POLL_INTERVAL_SECS,
    }))
}

/// `POST /v2/auth/token` - camera exchanges a device code for tokens, or
/// refreshes an existing token.
///
/// Grant types arrive as full URNs
/// (`urn:ietf:params:oauth:grant-type:device_code`), so matching is by
/// substring.
#[utoipa::path(
    post,
    path = "/v2/auth/token",
    tag = "Device Auth",
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid or consumed grant")
    )
)]
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let minted = if form.grant_type.contains("device_code") {
        let device_code = form.device_code.as_deref().unwrap_or_default();
        let token = state.auth.exchange(device_code).await?;
        info!(client_id = %token.client_id, "camera paired successfully");
        token
    } else if form.grant_type.contains("refresh_token") {
        let refresh_token = form.refresh_token.as_deref().unwrap_or_default();
        let token = state.auth.refresh(refresh_token).await?;
        info!(client_id = %token.client_id, "token refreshed");
        token
    } else {
        warn!(grant_type = %form.grant_type, "unknown grant_type");
        return Err(GrantError::UnsupportedGrantType.into());
    };

    Ok(Json(TokenResponse {
        access_token: minted.access_token,
        refresh_token: minted.refresh_token,
        token_type: "bearer".to_string(),
        expires_in: TOKEN_TTL.as_secs() as i64,
        scope: TOKEN_SCOPE.to_string(),
    }))
}
