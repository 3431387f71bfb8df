// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! In-memory state of one asset's upload.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::{MAX_PARTS, PART_SIZE};

/// Number of parts a declared filesize splits into.
///
/// Realtime (streamed) assets start with a single allocated part; further
/// references are appended on demand. Sized assets get `ceil(filesize /
/// PART_SIZE)`, clamped to at least one part and at most [`MAX_PARTS`].
pub fn part_count_for(filesize: Option<u64>, is_realtime: bool) -> u32 {
    match filesize {
        Some(size) if !is_realtime => {
            let parts = size.div_ceil(PART_SIZE).max(1);
            parts.min(u64::from(MAX_PARTS)) as u32
        }
        _ => 1,
    }
}

/// Tracks which parts of an asset have been received and whether the asset
/// has been assembled into its final file.
///
/// Part indices are 1-based on the wire (`?part=N`, matching the synthesized
/// upload URLs). A session is complete once every index in
/// `1..=part_count` has been received at least once; re-receiving a part
/// overwrites its bytes and does not count twice.
#[derive(Debug)]
pub struct UploadSession {
    pub id: String,
    /// Final filename, already reduced to its last path component.
    pub name: String,
    pub filetype: String,
    /// Size the camera declared at creation. Advisory only; the bytes we
    /// actually persisted are authoritative.
    pub declared_size: Option<u64>,
    /// Highest allocated part index. Grows for realtime assets.
    pub part_count: u32,
    /// part index -> bytes staged for that part (last write wins).
    pub received: HashMap<u32, u64>,
    pub is_realtime: bool,
    pub finalized: bool,
    pub created_at: DateTime<Utc>,
    /// Last time a part arrived; drives the stale-session sweep.
    pub last_activity: DateTime<Utc>,
}

impl UploadSession {
    pub fn new(
        id: String,
        name: String,
        filetype: String,
        declared_size: Option<u64>,
        is_realtime: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            filetype,
            declared_size,
            part_count: part_count_for(declared_size, is_realtime),
            received: HashMap::new(),
            is_realtime,
            finalized: false,
            created_at: now,
            last_activity: now,
        }
    }

    /// Whether a part index falls inside the allocated range.
    pub fn accepts_part(&self, part: u32) -> bool {
        part >= 1 && part <= self.part_count
    }

    /// All allocated parts received. Realtime sessions never auto-complete;
    /// the camera signals completion explicitly.
    pub fn is_complete(&self) -> bool {
        !self.is_realtime && self.received.len() as u32 >= self.part_count
    }

    /// Total bytes staged so far.
    pub fn received_bytes(&self) -> u64 {
        self.received.values().sum()
    }

    /// Part indices in ascending order, for assembly.
    pub fn received_parts_sorted(&self) -> Vec<u32> {
        let mut parts: Vec<u32> = self.received.keys().copied().collect();
        parts.sort_unstable();
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_count_is_ceiling_division() {
        assert_eq!(part_count_for(Some(1), false), 1);
        assert_eq!(part_count_for(Some(PART_SIZE), false), 1);
        assert_eq!(part_count_for(Some(PART_SIZE + 1), false), 2);
        assert_eq!(part_count_for(Some(PART_SIZE * 10), false), 10);
        assert_eq!(part_count_for(Some(PART_SIZE * 10 + 5), false), 11);
    }

    #[test]
    fn part_count_handles_edge_cases() {
        // No declared size: single part.
        assert_eq!(part_count_for(None, false), 1);
        // Zero bytes still needs one part.
        assert_eq!(part_count_for(Some(0), false), 1);
        // Realtime ignores the declared size.
        assert_eq!(part_count_for(Some(PART_SIZE * 100), true), 1);
        // Capped at MAX_PARTS.
        assert_eq!(part_count_for(Some(u64::MAX), false), MAX_PARTS);
    }

    #[test]
    fn completion_requires_every_part() {
        let mut session = UploadSession::new(
            "a1".into(),
            "A.JPG".into(),
            "image/jpeg".into(),
            Some(PART_SIZE * 2),
            false,
        );
        assert_eq!(session.part_count, 2);
        assert!(!session.is_complete());

        session.received.insert(2, 100);
        assert!(!session.is_complete());

        // Duplicate of part 2 does not complete the session.
        session.received.insert(2, 120);
        assert!(!session.is_complete());

        session.received.insert(1, 100);
        assert!(session.is_complete());
        assert_eq!(session.received_bytes(), 220);
        assert_eq!(session.received_parts_sorted(), vec![1, 2]);
    }

    #[test]
    fn realtime_sessions_never_auto_complete() {
        let mut session =
            UploadSession::new("a1".into(), "clip.mov".into(), "video/quicktime".into(), None, true);
        session.received.insert(1, 10);
        assert!(!session.is_complete());
    }

    #[test]
    fn accepts_part_bounds() {
        let session = UploadSession::new(
            "a1".into(),
            "A.JPG".into(),
            "image/jpeg".into(),
            Some(PART_SIZE * 3),
            false,
        );
        assert!(!session.accepts_part(0));
        assert!(session.accepts_part(1));
        assert!(session.accepts_part(3));
        assert!(!session.accepts_part(4));
    }
}
