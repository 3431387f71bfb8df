// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Device authorization: pairing state machine, token store, and the axum
//! extractor that gates authenticated endpoints.

pub mod error;
pub mod extractor;
pub mod store;

pub use error::{AuthError, GrantError};
pub use extractor::Auth;
pub use store::{AuthStore, DeviceAuthorization, Token};

/// A device that presented a live bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedDevice {
    pub client_id: String,
}
