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

use crate::constants::{
    DEFAULT_MAX_VIDEOS_PER_USER, DEFAULT_SKIP_VOTE_THRESHOLD, MAX_MAX_VIDEOS_PER_USER,
    MAX_SKIP_VOTE_THRESHOLD, MIN_MAX_VIDEOS_PER_USER, MIN_SKIP_VOTE_THRESHOLD,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoomSettings {
    pub max_videos_per_user: u32,
    pub skip_vote_threshold: f64,
}

impl Default for RoomSettings {
    fn default() -> Self {
        RoomSettings {
            max_videos_per_user: DEFAULT_MAX_VIDEOS_PER_USER,
            skip_vote_threshold: DEFAULT_SKIP_VOTE_THRESHOLD,
        }
    }
}

/// Partial update accepted by `update_settings`; unset or out-of-range fields
/// are left untouched rather than rejected outright.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomSettingsPatch {
    pub max_videos_per_user: Option<u32>,
    pub skip_vote_threshold: Option<f64>,
}

impl RoomSettings {
    pub fn apply_patch(&mut self, patch: &RoomSettingsPatch) {
        if let Some(val) = patch.max_videos_per_user {
            if (MIN_MAX_VIDEOS_PER_USER..=MAX_MAX_VIDEOS_PER_USER).contains(&val) {
                self.max_videos_per_user = val;
            }
        }
        if let Some(val) = patch.skip_vote_threshold {
            if (MIN_SKIP_VOTE_THRESHOLD..=MAX_SKIP_VOTE_THRESHOLD).contains(&val) {
                self.skip_vote_threshold = val;
            }
        }
    }
}
