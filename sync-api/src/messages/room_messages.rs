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

use actix::{Message as ActixMessage, Recipient};

use crate::error::RoomError;
use crate::ids::UserId;
use crate::messages::client_frame::ClientFrame;
use crate::messages::server_frame::ServerFrame;
use crate::models::{ChatMessage, Role, RoomSettings, SyncStateWire, User, Video};

/// A frame pushed down to one session's websocket. Every `Room` side effect
/// that needs to reach a client goes out through a `Recipient<Outbound>`
/// rather than the session reaching back into room state.
#[derive(ActixMessage, Debug, Clone)]
#[rtype(result = "()")]
pub struct Outbound(pub ServerFrame);

/// Snapshot handed back to a freshly joined (or resumed) session so it can
/// build its own `ServerFrame::RoomState`.
#[derive(Debug, Clone)]
pub struct JoinResult {
    pub user_id: UserId,
    pub role: Role,
    pub users: Vec<User>,
    pub queue: Vec<Video>,
    pub sync: SyncStateWire,
    pub settings: RoomSettings,
    pub chat_history: Vec<ChatMessage>,
}

#[derive(ActixMessage)]
#[rtype(result = "Result<JoinResult, RoomError>")]
pub struct Connect {
    pub display_name: String,
    pub resume_user_id: Option<UserId>,
    pub addr: Recipient<Outbound>,
}

#[derive(ActixMessage)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub user_id: UserId,
}

#[derive(ActixMessage)]
#[rtype(result = "()")]
pub struct Dispatch {
    pub user_id: UserId,
    pub frame: ClientFrame,
}

/// Driven by the room-wide heartbeat ticker; rebroadcasts extrapolated sync
/// state to everyone connected. Host-grace timers run on their own
/// `run_later` schedule, independent of this tick.
#[derive(ActixMessage)]
#[rtype(result = "()")]
pub struct HeartbeatTick;

#[derive(ActixMessage)]
#[rtype(result = "bool")]
pub struct IsEmpty;

/// Snapshot used to answer the HTTP room-listing endpoints without exposing
/// room internals outside the actor.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub host_name: Option<String>,
    pub connected_user_count: usize,
    pub queue_length: usize,
    pub current_video_title: Option<String>,
}

#[derive(ActixMessage)]
#[rtype(result = "RoomSnapshot")]
pub struct GetSnapshot;
