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

pub mod client_frame;
pub mod room_messages;
pub mod server_frame;

pub use client_frame::{ClientFrame, JoinFrame};
pub use room_messages::{
    Connect, Disconnect, Dispatch, GetSnapshot, HeartbeatTick, IsEmpty, JoinResult, Outbound,
    RoomSnapshot,
};
pub use server_frame::{QueueAction, ServerFrame};
