// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Asset registration, chunked upload sessions, and finalized-file layout.

pub mod manager;
pub mod paths;
pub mod session;

pub use manager::{PartOutcome, UploadError, UploadManager, UploadRecord};
pub use paths::UploadPaths;
pub use session::UploadSession;
