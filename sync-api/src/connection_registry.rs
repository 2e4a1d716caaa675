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

use std::collections::HashMap;

use actix::Recipient;

use crate::ids::UserId;
use crate::messages::{Outbound, ServerFrame};

/// Per-room registry of live session addresses, keyed by user id.
///
/// Lives inside the `Room` actor, so all of its methods run on the actor's
/// mailbox thread; no locking needed.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<UserId, Recipient<Outbound>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: UserId, addr: Recipient<Outbound>) {
        self.connections.insert(user_id, addr);
    }

    pub fn remove(&mut self, user_id: &str) {
        self.connections.remove(user_id);
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Best-effort send; a dead mailbox just means the disconnect cleanup
    /// hasn't run yet and is silently dropped, same as the teacher's
    /// broadcast-and-ignore-send-errors pattern.
    pub fn send_to(&self, user_id: &str, frame: ServerFrame) {
        if let Some(addr) = self.connections.get(user_id) {
            addr.do_send(Outbound(frame));
        }
    }

    pub fn broadcast(&self, frame: ServerFrame, exclude: Option<&str>) {
        for (uid, addr) in self.connections.iter() {
            if Some(uid.as_str()) == exclude {
                continue;
            }
            addr.do_send(Outbound(frame.clone()));
        }
    }

    pub fn broadcast_all(&self, frame: ServerFrame) {
        self.broadcast(frame, None);
    }
}
