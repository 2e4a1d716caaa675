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

//! Wire-level value types shared by the room core and the dispatcher.

mod chat;
mod settings;
mod sync_state;
mod user;
mod video;

pub use chat::ChatMessage;
pub use settings::{RoomSettings, RoomSettingsPatch};
pub use sync_state::{SyncState, SyncStateWire};
pub use user::{Role, User};
pub use video::{Video, VideoKind};
