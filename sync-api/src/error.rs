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

//! Stable error codes surfaced to clients. None of these are fatal to a room;
//! they are always delivered only to the originating socket.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomErrorKind {
    MissingType,
    UnknownType,
    InvalidJoin,
    InvalidUrl,
    QueueLimit,
    RemoveFailed,
    ReorderFailed,
    PlayFailed,
    PauseFailed,
    SeekFailed,
    ChatFailed,
    SettingsFailed,
}

impl RoomErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            RoomErrorKind::MissingType => "missing_type",
            RoomErrorKind::UnknownType => "unknown_type",
            RoomErrorKind::InvalidJoin => "invalid_join",
            RoomErrorKind::InvalidUrl => "invalid_url",
            RoomErrorKind::QueueLimit => "queue_limit",
            RoomErrorKind::RemoveFailed => "remove_failed",
            RoomErrorKind::ReorderFailed => "reorder_failed",
            RoomErrorKind::PlayFailed => "play_failed",
            RoomErrorKind::PauseFailed => "pause_failed",
            RoomErrorKind::SeekFailed => "seek_failed",
            RoomErrorKind::ChatFailed => "chat_failed",
            RoomErrorKind::SettingsFailed => "settings_failed",
        }
    }
}

/// An error produced by a room operation, bound to a human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct RoomError {
    #[serde(skip)]
    pub kind: RoomErrorKind,
    pub code: &'static str,
    pub message: String,
}

impl RoomError {
    pub fn new(kind: RoomErrorKind, message: impl Into<String>) -> Self {
        RoomError {
            kind,
            code: kind.code(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RoomError {}
