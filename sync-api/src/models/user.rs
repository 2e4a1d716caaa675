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

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Host,
    Viewer,
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Role,
    pub connected: bool,
    pub disconnected_at: Option<f64>,
}

impl User {
    pub fn new(user_id: UserId, display_name: String, role: Role) -> Self {
        User {
            user_id,
            display_name,
            role,
            connected: true,
            disconnected_at: None,
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self.role, Role::Host)
    }
}
