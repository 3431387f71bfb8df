// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Asset registration endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::models::{AssetResponse, CreateAssetRequest, RealtimePartsResponse};
use crate::state::AppState;

/// `POST /v2/devices/assets` - camera declares a file and receives one
/// upload URL per part.
#[utoipa::path(
    post,
    path = "/v2/devices/assets",
    tag = "Assets",
    responses(
        (status = 200, description = "Asset registered", body = AssetResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn create_asset(
    Auth(_device): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateAssetRequest>,
) -> Json<AssetResponse> {
    Json(state.uploads.create_asset(request).await)
}

/// `POST /v2/devices/assets/{asset_id}/realtime-upload-parts` - streamed
/// (video) uploads request further upload URLs as they go.
#[utoipa::path(
    post,
    path = "/v2/devices/assets/{asset_id}/realtime-upload-parts",
    tag = "Assets",
    responses(
        (status = 200, description = "Additional upload references", body = RealtimePartsResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Unknown asset")
    )
)]
pub async fn realtime_upload_parts(
    Auth(_device): Auth,
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Json<RealtimePartsResponse>, ApiError> {
    let upload_urls = state.uploads.add_realtime_parts(&asset_id).await?;
    Ok(Json(RealtimePartsResponse { upload_urls }))
}
