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

use crate::constants::{SYSTEM_DISPLAY_NAME, SYSTEM_USER_ID};
use crate::ids::UserId;
use crate::time::now_secs;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub user_id: UserId,
    pub display_name: String,
    pub message: String,
    pub timestamp: f64,
    pub is_system: bool,
}

impl ChatMessage {
    pub fn user(user_id: UserId, display_name: String, message: String) -> Self {
        ChatMessage {
            user_id,
            display_name,
            message,
            timestamp: now_secs(),
            is_system: false,
        }
    }

    pub fn system(message: String) -> Self {
        ChatMessage {
            user_id: SYSTEM_USER_ID.to_string(),
            display_name: SYSTEM_DISPLAY_NAME.to_string(),
            message,
            timestamp: now_secs(),
            is_system: true,
        }
    }
}
