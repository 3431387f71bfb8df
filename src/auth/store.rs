// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! # Pairing/Token Store and Device Authorization State Machine
//!
//! Implements the OAuth 2.0 device-code pairing flow the camera firmware
//! speaks, with the emulator's trust-everyone policy: every authorization is
//! approved automatically the moment it is issued (there is no human step on
//! a closed, single-tenant LAN).
//!
//! Authorization lifecycle: `PENDING → APPROVED → EXCHANGED` (terminal), or
//! `PENDING → EXPIRED` (terminal). With immediate auto-approval the PENDING
//! state is never observable from outside; the `approved` flag exists so the
//! exchange path still enforces it.
//!
//! Everything is memory-resident. Expiry is a hard boundary enforced lazily
//! on every lookup and by the periodic sweep; an expired entry behaves
//! identically to a nonexistent one. Nothing survives a restart - the camera
//! simply re-pairs.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::GrantError;

/// Lifetime of an unexchanged device code.
pub const DEVICE_CODE_TTL: Duration = Duration::from_secs(900);

/// Lifetime of an issued access token (one year; cameras refresh rarely).
pub const TOKEN_TTL: Duration = Duration::from_secs(31_536_000);

/// Polling interval the camera is told to use between token attempts.
pub const POLL_INTERVAL_SECS: u64 = 5;

/// A pending or approved device pairing request.
#[derive(Debug, Clone)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub client_id: String,
    pub scope: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub approved: bool,
}

/// An issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub client_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    /// device_code -> authorization
    device_codes: HashMap<String, DeviceAuthorization>,
    /// access_token -> token
    tokens: HashMap<String, Token>,
}

/// Sole owner of [`DeviceAuthorization`] and [`Token`] records.
pub struct AuthStore {
    device_ttl: chrono::Duration,
    token_ttl: chrono::Duration,
    inner: RwLock<Inner>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStore {
    pub fn new() -> Self {
        Self::with_ttls(DEVICE_CODE_TTL, TOKEN_TTL)
    }

    /// Custom lifetimes, used by tests to exercise expiry deterministically.
    pub fn with_ttls(device_ttl: Duration, token_ttl: Duration) -> Self {
        Self {
            device_ttl: chrono::Duration::from_std(device_ttl)
                .unwrap_or_else(|_| chrono::Duration::seconds(900)),
            token_ttl: chrono::Duration::from_std(token_ttl)
                .unwrap_or_else(|_| chrono::Duration::days(365)),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Issue a new device authorization for a pairing request.
    ///
    /// Always succeeds for a non-empty `client_id`. The authorization is
    /// auto-approved immediately (self-hosted mode has no approval UI).
    pub async fn issue(&self, client_id: &str, scope: &str) -> Result<DeviceAuthorization, GrantError> {
        if client_id.is_empty() {
            return Err(GrantError::InvalidRequest);
        }

        let now = Utc::now();
        let authorization = DeviceAuthorization {
            device_code: Uuid::new_v4().to_string(),
            user_code: format!("{}", rand::rng().random_range(100_000..=999_999)),
            client_id: client_id.to_string(),
            scope: scope.to_string(),
            created_at: now,
            expires_at: now + self.device_ttl,
            approved: true,
        };

        let mut inner = self.inner.write().await;
        inner
            .device_codes
            .insert(authorization.device_code.clone(), authorization.clone());
        Ok(authorization)
    }

    /// Exchange an approved device code for a token. Single use: the
    /// authorization is consumed, so a second exchange with the same code
    /// fails with `invalid_grant`.
    pub async fn exchange(&self, device_code: &str) -> Result<Token, GrantError> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        let authorization = match inner.device_codes.get(device_code) {
            Some(a) => a.clone(),
            None => return Err(GrantError::InvalidGrant),
        };
        if authorization.expires_at <= now {
            // Expired entries behave exactly like missing ones.
            inner.device_codes.remove(device_code);
            return Err(GrantError::InvalidGrant);
        }
        if !authorization.approved {
            return Err(GrantError::InvalidGrant);
        }

        inner.device_codes.remove(device_code);
        let token = self.mint(&authorization.client_id, now);
        inner.tokens.insert(token.access_token.clone(), token.clone());
        Ok(token)
    }

    /// Exchange a refresh token for a replacement token pair.
    ///
    /// The old access token is invalidated immediately; there is no grace
    /// window in which both are live.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token, GrantError> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        let old_key = inner
            .tokens
            .iter()
            .find(|(_, t)| t.refresh_token == refresh_token && t.expires_at > now)
            .map(|(k, _)| k.clone())
            .ok_or(GrantError::InvalidGrant)?;

        let old = inner.tokens.remove(&old_key).ok_or(GrantError::InvalidGrant)?;
        let token = self.mint(&old.client_id, now);
        inner.tokens.insert(token.access_token.clone(), token.clone());
        Ok(token)
    }

    /// Resolve a bearer token to the client it was issued to.
    ///
    /// Expired tokens are removed on the spot and resolve to `None`.
    pub async fn authenticate(&self, bearer: &str) -> Option<String> {
        let now = Utc::now();

        {
            let inner = self.inner.read().await;
            match inner.tokens.get(bearer) {
                Some(t) if t.expires_at > now => return Some(t.client_id.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Token exists but has expired; upgrade to a write lock to drop it.
        self.inner.write().await.tokens.remove(bearer);
        None
    }

    /// Drop every expired device code and token. Returns how many of each
    /// were removed.
    pub async fn sweep_expired(&self) -> (usize, usize) {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        let codes_before = inner.device_codes.len();
        inner.device_codes.retain(|_, a| a.expires_at > now);
        let tokens_before = inner.tokens.len();
        inner.tokens.retain(|_, t| t.expires_at > now);

        (
            codes_before - inner.device_codes.len(),
            tokens_before - inner.tokens.len(),
        )
    }

    /// Number of live tokens, i.e. completed pairings.
    pub async fn paired_count(&self) -> usize {
        let now = Utc::now();
        self.inner
            .read()
            .await
            .tokens
            .values()
            .filter(|t| t.expires_at > now)
            .count()
    }

    fn mint(&self, client_id: &str, now: DateTime<Utc>) -> Token {
        Token {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            issued_at: now,
            expires_at: now + self.token_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issue_rejects_empty_client_id() {
        let store = AuthStore::new();
        assert_eq!(
            store.issue("", "asset_create").await.unwrap_err(),
            GrantError::InvalidRequest
        );
    }

    #[tokio::test]
    async fn issued_codes_are_unique_and_auto_approved() {
        let store = AuthStore::new();
        let a = store.issue("cam", "asset_create").await.unwrap();
        let b = store.issue("cam", "asset_create").await.unwrap();
        assert_ne!(a.device_code, b.device_code);
        assert!(a.approved);
        assert_eq!(a.user_code.len(), 6);
    }

    #[tokio::test]
    async fn device_code_is_single_use() {
        let store = AuthStore::new();
        let auth = store.issue("cam", "").await.unwrap();

        let token = store.exchange(&auth.device_code).await.unwrap();
        assert_eq!(token.client_id, "cam");

        // Second exchange with the same code must fail.
        assert_eq!(
            store.exchange(&auth.device_code).await.unwrap_err(),
            GrantError::InvalidGrant
        );
    }

    #[tokio::test]
    async fn unknown_device_code_is_invalid_grant() {
        let store = AuthStore::new();
        assert_eq!(
            store.exchange("not-a-code").await.unwrap_err(),
            GrantError::InvalidGrant
        );
    }

    #[tokio::test]
    async fn expired_device_code_is_rejected() {
        let store = AuthStore::with_ttls(Duration::ZERO, TOKEN_TTL);
        let auth = store.issue("cam", "").await.unwrap();
        assert_eq!(
            store.exchange(&auth.device_code).await.unwrap_err(),
            GrantError::InvalidGrant
        );
    }

    #[tokio::test]
    async fn authenticate_resolves_live_tokens_only() {
        let store = AuthStore::new();
        let auth = store.issue("cam", "").await.unwrap();
        let token = store.exchange(&auth.device_code).await.unwrap();

        assert_eq!(
            store.authenticate(&token.access_token).await.as_deref(),
            Some("cam")
        );
        assert!(store.authenticate("bogus").await.is_none());
    }

    #[tokio::test]
    async fn expired_token_does_not_authenticate() {
        let store = AuthStore::with_ttls(DEVICE_CODE_TTL, Duration::ZERO);
        let auth = store.issue("cam", "").await.unwrap();
        let token = store.exchange(&auth.device_code).await.unwrap();
        assert!(store.authenticate(&token.access_token).await.is_none());
    }

    #[tokio::test]
    async fn refresh_invalidates_old_token_immediately() {
        let store = AuthStore::new();
        let auth = store.issue("cam", "").await.unwrap();
        let old = store.exchange(&auth.device_code).await.unwrap();

        let new = store.refresh(&old.refresh_token).await.unwrap();
        assert_ne!(new.access_token, old.access_token);
        assert_eq!(new.client_id, "cam");

        assert!(store.authenticate(&old.access_token).await.is_none());
        assert!(store.authenticate(&new.access_token).await.is_some());

        // The consumed refresh token cannot be replayed.
        assert_eq!(
            store.refresh(&old.refresh_token).await.unwrap_err(),
            GrantError::InvalidGrant
        );
    }

    #[tokio::test]
    async fn concurrent_pairings_are_all_trusted() {
        let store = AuthStore::new();
        let a = store.issue("cam-a", "").await.unwrap();
        let b = store.issue("cam-b", "").await.unwrap();
        let ta = store.exchange(&a.device_code).await.unwrap();
        let tb = store.exchange(&b.device_code).await.unwrap();

        assert_eq!(store.authenticate(&ta.access_token).await.as_deref(), Some("cam-a"));
        assert_eq!(store.authenticate(&tb.access_token).await.as_deref(), Some("cam-b"));
        assert_eq!(store.paired_count().await, 2);
    }

    #[tokio::test]
    async fn sweep_drops_expired_entries() {
        let store = AuthStore::with_ttls(Duration::ZERO, TOKEN_TTL);
        store.issue("cam", "").await.unwrap();
        let (codes, tokens) = store.sweep_expired().await;
        assert_eq!(codes, 1);
        assert_eq!(tokens, 0);
    }
}
