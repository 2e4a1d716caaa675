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

use crate::models::RoomSettingsPatch;
use serde::Deserialize;

/// The handshake frame. Parsed separately from `ClientFrame` because a
/// connection must send exactly one of these before anything else is
/// accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinFrame {
    #[serde(rename = "type")]
    pub frame_type: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub resume_user_id: Option<String>,
}

/// Every frame a session can send once it has joined a room.
///
/// Fields on known variants default rather than reject on missing/wrong
/// shape; validation of their *content* (empty url, out-of-range vote, ...)
/// happens in room state, not here. Anything whose `type` tag doesn't match
/// a known variant lands in `Unknown` and is dropped by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    AddVideo {
        #[serde(default)]
        url: String,
    },
    RemoveVideo {
        #[serde(default)]
        video_id: String,
    },
    ReorderQueue {
        #[serde(default)]
        video_ids: Vec<String>,
    },
    SkipVote {
        #[serde(default)]
        video_id: String,
    },
    ChatMessage {
        #[serde(default)]
        message: String,
    },
    Play,
    Pause {
        #[serde(default)]
        timestamp: f64,
    },
    Seek {
        #[serde(default)]
        timestamp: f64,
    },
    VideoEnded,
    SyncReport {
        #[serde(default)]
        timestamp: f64,
    },
    UpdateSettings {
        #[serde(default)]
        settings: RoomSettingsPatch,
    },
    #[serde(other)]
    Unknown,
}
