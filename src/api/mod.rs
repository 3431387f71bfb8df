// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AccountResponse, AssetResponse, DeviceCodeResponse, ProfileResponse,
        RealtimePartsResponse, StatusResponse, TokenResponse,
    },
    state::AppState,
    uploads::UploadRecord,
};

pub mod account;
pub mod assets;
pub mod catch_all;
pub mod dashboard;
pub mod device_auth;
pub mod upload;

/// Camera-facing router, served over HTTPS.
///
/// Route order matters only for the fallback: the catch-all must run after
/// every typed route has had its chance to match, never before.
pub fn router(state: AppState) -> Router {
    let typed = Router::new()
        .route("/v2/auth/device/code", post(device_auth::device_code))
        .route("/v2/auth/token", post(device_auth::token))
        .route("/v2/me", get(account::me))
        .route("/v2/accounts/{account_id}", get(account::account))
        .route("/v2/devices/assets", post(assets::create_asset))
        .route(
            "/v2/devices/assets/{asset_id}/realtime-upload-parts",
            post(assets::realtime_upload_parts),
        )
        .route("/upload/{asset_id}", put(upload::upload_part))
        .route("/upload/{asset_id}/complete", post(upload::complete_upload))
        .merge(dashboard_routes())
        .fallback(catch_all::handler)
        .with_state(state);

    typed.layer(TraceLayer::new_for_http())
}

/// Browser-facing router, served over plain HTTP on the dashboard port.
pub fn dashboard_router(state: AppState) -> Router {
    Router::new()
        .merge(dashboard_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/ca.crt", get(dashboard::ca_cert))
        .route("/api/status", get(dashboard::api_status))
        .route("/api/uploads", get(dashboard::api_uploads))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        device_auth::device_code,
        device_auth::token,
        account::me,
        account::account,
        assets::create_asset,
        assets::realtime_upload_parts,
        dashboard::api_status,
        dashboard::api_uploads
    ),
    components(
        schemas(
            DeviceCodeResponse,
            TokenResponse,
            ProfileResponse,
            AccountResponse,
            AssetResponse,
            RealtimePartsResponse,
            StatusResponse,
            UploadRecord,
            dashboard::UploadsResponse
        )
    ),
    tags(
        (name = "Device Auth", description = "OAuth device-code pairing flow"),
        (name = "Account", description = "Fake profile/account stubs"),
        (name = "Assets", description = "Asset registration"),
        (name = "Dashboard", description = "Read-only status API")
    )
)]
struct ApiDoc;
