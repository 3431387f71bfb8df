// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Chunk upload endpoints. These receive the actual file bytes, addressed
//! by the opaque references handed out at asset creation.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::uploads::UploadError;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// 1-based part index; a bare `/upload/{id}` means part 1.
    pub part: Option<u32>,
}

/// `PUT /upload/{asset_id}?part=N` - receive one chunk.
///
/// The body is streamed straight to the part's staging file; chunks can be
/// tens of megabytes and are never buffered whole in memory.
pub async fn upload_part(
    Path(asset_id): Path<String>,
    Query(query): Query<UploadQuery>,
    State(state): State<AppState>,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let part = query.part.unwrap_or(1);

    let outcome = state
        .uploads
        .write_part(&asset_id, part, body.into_data_stream())
        .await
        .map_err(|err| {
            match &err {
                UploadError::AlreadyFinalized => {
                    // Firmware retries after the fact; unexpected but non-fatal.
                    warn!(asset_id = %asset_id, part, "chunk write for finalized asset rejected");
                }
                UploadError::UnknownAsset | UploadError::UnknownPart => {
                    warn!(asset_id = %asset_id, part, error = %err, "chunk write rejected");
                }
                UploadError::Io(e) => {
                    // Storage failure loses data for this upload; say so loudly.
                    error!(asset_id = %asset_id, part, error = %e, "storage failure during chunk write");
                }
            }
            err
        })?;

    info!(
        asset_id = %asset_id,
        part,
        of = outcome.part_count,
        bytes = outcome.bytes,
        finalized = outcome.finalized,
        "received part"
    );
    Ok(StatusCode::OK)
}

/// `POST /upload/{asset_id}/complete` - realtime upload finished.
///
/// Mirrors the vendor API's leniency: completing an unknown or already
/// finalized asset still answers 200, since the camera treats any error as
/// a hard failure. Storage errors are the exception.
pub async fn complete_upload(
    Path(asset_id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    match state.uploads.complete_realtime(&asset_id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(UploadError::UnknownAsset | UploadError::AlreadyFinalized) => {
            warn!(asset_id = %asset_id, "completion signal for unknown or finalized asset");
            Ok(StatusCode::OK)
        }
        Err(UploadError::UnknownPart) => Ok(StatusCode::OK),
        Err(UploadError::Io(e)) => {
            error!(asset_id = %asset_id, error = %e, "storage failure during finalization");
            Err(UploadError::Io(e).into())
        }
    }
}
