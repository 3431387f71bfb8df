// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Authentication and grant errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::ApiError;

/// Rejection produced by the [`Auth`](super::extractor::Auth) extractor.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No authorization header present.
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Header is present but not `Bearer <token>`.
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Token is unknown or has expired. The two cases are deliberately
    /// indistinguishable: an expired token is treated as nonexistent.
    #[error("Unknown or expired access token")]
    UnknownToken,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            error: self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Failure of a token-endpoint grant.
///
/// The `Display` strings are the OAuth error codes the camera expects in the
/// response body, so `to_string()` doubles as the wire representation.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum GrantError {
    /// Required request parameter missing or empty (e.g. `client_id`).
    #[error("invalid_request")]
    InvalidRequest,
    /// Device code or refresh token unknown, expired, or already consumed.
    #[error("invalid_grant")]
    InvalidGrant,
    /// Grant type is neither device-code nor refresh.
    #[error("unsupported_grant_type")]
    UnsupportedGrantType,
}

impl From<GrantError> for ApiError {
    fn from(err: GrantError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}
