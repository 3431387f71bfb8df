// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! User/account stubs the camera calls after pairing to verify the
//! connection. The identities are fake; the camera only checks for a 200
//! with plausible fields.

use axum::{extract::Path, Json};

use crate::auth::Auth;
use crate::models::{AccountResponse, ProfileResponse};

/// `GET /v2/me`
#[utoipa::path(
    get,
    path = "/v2/me",
    tag = "Account",
    responses(
        (status = 200, description = "Fake profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn me(Auth(_device): Auth) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        id: "framedrop-user".to_string(),
        name: "framedrop".to_string(),
        email: "local@framedrop".to_string(),
        account_id: "framedrop-account".to_string(),
    })
}

/// `GET /v2/accounts/{account_id}`
#[utoipa::path(
    get,
    path = "/v2/accounts/{account_id}",
    tag = "Account",
    responses(
        (status = 200, description = "Fake account", body = AccountResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn account(Auth(_device): Auth, Path(account_id): Path<String>) -> Json<AccountResponse> {
    Json(AccountResponse {
        id: account_id,
        name: "framedrop".to_string(),
    })
}
