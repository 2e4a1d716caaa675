/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

use crate::ids::VideoId;
use crate::time::now_secs;
use serde::Serialize;

/// The authoritative `(video, timestamp-at-instant, is_playing)` triple the
/// Room extrapolates playback position from.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    pub current_video_id: Option<VideoId>,
    pub external_ref: String,
    pub timestamp: f64,
    pub is_playing: bool,
    pub last_updated: f64,
}

impl SyncState {
    /// Effective playback position at the current wall-clock instant.
    pub fn extrapolated_timestamp(&self) -> f64 {
        if self.is_playing {
            self.timestamp + (now_secs() - self.last_updated)
        } else {
            self.timestamp
        }
    }

    pub fn to_wire(&self) -> SyncStateWire {
        SyncStateWire {
            current_video_id: self.current_video_id.clone(),
            external_ref: self.external_ref.clone(),
            timestamp: self.extrapolated_timestamp(),
            is_playing: self.is_playing,
            last_updated: self.last_updated,
        }
    }
}

/// Wire representation: `timestamp` is always the extrapolated value, never
/// the raw `timestamp-at-last-update` field.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStateWire {
    pub current_video_id: Option<VideoId>,
    pub external_ref: String,
    pub timestamp: f64,
    pub is_playing: bool,
    pub last_updated: f64,
}
