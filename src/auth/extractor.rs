// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Axum extractor for authenticated devices.
//!
//! Use the `Auth` extractor in handlers to require a bearer token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(device): Auth) -> impl IntoResponse {
//!     // device.client_id identifies the paired camera
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{error::AuthError, AuthenticatedDevice};
use crate::state::AppState;

/// Extractor that resolves the `Authorization: Bearer` header against the
/// pairing/token store and rejects with 401 otherwise.
pub struct Auth(pub AuthenticatedDevice);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let client_id = state
            .auth
            .authenticate(token)
            .await
            .ok_or(AuthError::UnknownToken)?;

        Ok(Auth(AuthenticatedDevice { client_id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::Request;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = Config {
            upload_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        (AppState::new(config), dir)
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/v2/me");
        if let Some(v) = value {
            builder = builder.header(AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let (state, _dir) = test_state();
        let mut parts = parts_with_header(None);
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn non_bearer_header_is_rejected() {
        let (state, _dir) = test_state();
        let mut parts = parts_with_header(Some("Basic abc"));
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let (state, _dir) = test_state();
        let mut parts = parts_with_header(Some("Bearer nope"));
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::UnknownToken)));
    }

    #[tokio::test]
    async fn live_token_resolves_client_id() {
        let (state, _dir) = test_state();
        let auth = state.auth.issue("cam-1", "").await.unwrap();
        let token = state.auth.exchange(&auth.device_code).await.unwrap();

        let mut parts = parts_with_header(Some(&format!("Bearer {}", token.access_token)));
        let Auth(device) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(device.client_id, "cam-1");
    }
}
