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
use crate::models::{ChatMessage, Role, RoomSettings, SyncStateWire, User, Video};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueAction {
    Add,
    Remove,
    Reorder,
    Advance,
}

/// Every frame a session can receive. Internally tagged on `type` so a
/// client never has to special-case the envelope before dispatching on it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    RoomState {
        room_id: String,
        your_user_id: UserId,
        your_role: Role,
        users: Vec<User>,
        queue: Vec<Video>,
        sync: SyncStateWire,
        settings: RoomSettings,
        chat_history: Vec<ChatMessage>,
        server_time: f64,
    },
    UserJoined {
        user: User,
    },
    UserLeft {
        user_id: UserId,
    },
    HostChanged {
        new_host_id: UserId,
        new_host_name: String,
    },
    QueueUpdated {
        queue: Vec<Video>,
        action: QueueAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        video: Option<Video>,
    },
    Sync {
        sync: SyncStateWire,
        server_time: f64,
    },
    SettingsUpdated {
        settings: RoomSettings,
    },
    SkipVoteUpdate {
        video_id: VideoId,
        votes: usize,
        required: usize,
        voters: Vec<UserId>,
    },
    #[serde(rename = "chat_message")]
    Chat {
        #[serde(flatten)]
        message: ChatMessage,
    },
    Error {
        code: &'static str,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_frame_tags_type() {
        let frame = ServerFrame::Error {
            code: "invalid_url",
            message: "could not parse url".into(),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "invalid_url");
    }

    #[test]
    fn chat_frame_flattens_message_fields() {
        let frame = ServerFrame::Chat {
            message: ChatMessage::system("hello".into()),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "chat_message");
        assert_eq!(json["is_system"], true);
        assert_eq!(json["message"], "hello");
    }
}
