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

//! Process-wide heartbeat driver: ticks every room's sync broadcast and
//! sweeps empty rooms, on one interval independent of any single
//! connection's liveness check.

use actix::Addr;
use tracing::warn;

use crate::messages::HeartbeatTick;
use crate::room_registry::{ListRoomAddrs, ReapEmptyRooms, RoomRegistry};

/// Runs until the process exits; cancelled implicitly when the enclosing
/// tokio task is aborted at shutdown.
pub async fn run(registry: Addr<RoomRegistry>, interval: std::time::Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        match registry.send(ListRoomAddrs).await {
            Ok(rooms) => {
                for (_room_id, addr) in rooms {
                    addr.do_send(HeartbeatTick);
                }
            }
            Err(err) => warn!(error = %err, "heartbeat tick: registry mailbox error"),
        }
        if let Err(err) = registry.send(ReapEmptyRooms).await {
            warn!(error = %err, "heartbeat tick: reap mailbox error");
        }
    }
}
