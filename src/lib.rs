// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! framedrop - Self-hosted Frame.io Camera-to-Cloud emulator
//!
//! Emulates the Frame.io C2C API so cameras with native C2C support upload
//! directly to a private server: device pairing (OAuth device-code grant),
//! asset registration, and chunked file upload with race-free reassembly.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router assembly (Axum)
//! - `auth` - device authorization state machine and pairing/token store
//! - `uploads` - asset/upload session manager and filesystem layout
//! - `sweeper` - background reclaim of abandoned sessions
//! - `tls` - certificate material for the HTTPS listener

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod sweeper;
pub mod tls;
pub mod uploads;
