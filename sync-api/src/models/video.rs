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

use crate::ids::{UserId, VideoId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoKind {
    Provider,
    Direct,
}

#[derive(Debug, Clone, Serialize)]
pub struct Video {
    pub video_id: VideoId,
    pub external_ref: String,
    pub title: String,
    pub thumbnail: String,
    pub duration: f64,
    pub added_by: UserId,
    pub kind: VideoKind,
    pub source_url: String,
}
