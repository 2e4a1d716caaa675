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
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Tunable constants. Defaults match the reference implementation; most are
//! overridable through [`crate::config::AppConfig`].

use std::time::Duration;

/// How often a room broadcasts its extrapolated sync state.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// How long a websocket session tolerates a missing pong before dropping the
/// connection.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Grace window after the host disconnects before the host role transfers.
pub const HOST_GRACE_PERIOD: Duration = Duration::from_secs(60);

/// Bounded chat history length, per room.
pub const CHAT_HISTORY_LIMIT: usize = 100;

/// Minimum room age before it is eligible for reaping once empty.
pub const ROOM_REAP_AGE: Duration = Duration::from_secs(30);

/// Chat messages are truncated to this many characters before escaping.
pub const MAX_MESSAGE_LENGTH: usize = 500;

/// Deadline for a single metadata oracle lookup.
pub const METADATA_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default per-user queue cap.
pub const DEFAULT_MAX_VIDEOS_PER_USER: u32 = 10;

/// Default fraction of connected users required to force-skip a video.
pub const DEFAULT_SKIP_VOTE_THRESHOLD: f64 = 0.5;

pub const MIN_MAX_VIDEOS_PER_USER: u32 = 1;
pub const MAX_MAX_VIDEOS_PER_USER: u32 = 50;
pub const MIN_SKIP_VOTE_THRESHOLD: f64 = 0.1;
pub const MAX_SKIP_VOTE_THRESHOLD: f64 = 1.0;

pub const DISPLAY_NAME_MAX_LEN: usize = 30;

/// Reserved user id used for system chat messages.
pub const SYSTEM_USER_ID: &str = "system";
pub const SYSTEM_DISPLAY_NAME: &str = "Sistema";

/// Close code sent when a socket targets a room that doesn't exist.
pub const CLOSE_CODE_ROOM_NOT_FOUND: u16 = 4004;
