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

use actix::Addr;
use actix_web::{web, HttpResponse};
use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::ids::RoomId;
use crate::messages::GetSnapshot;
use crate::room::Room;
use crate::room_registry::{CreateRoom, ListRoomAddrs, RoomRegistry};

#[derive(Serialize)]
struct CreateRoomResponse {
    room_id: RoomId,
}

pub async fn create_room(registry: web::Data<Addr<RoomRegistry>>) -> HttpResponse {
    match registry.send(CreateRoom).await {
        Ok(room_id) => HttpResponse::Ok().json(CreateRoomResponse { room_id }),
        Err(err) => {
            warn!(error = %err, "room registry mailbox error on create");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Serialize)]
struct RoomListEntry {
    room_id: RoomId,
    host_name: Option<String>,
    user_count: usize,
    queue_length: usize,
    current_video: Option<String>,
}

/// Fans out a `GetSnapshot` query per room outside the registry actor; the
/// registry only ever hands back `Addr<Room>` values, never awaits anything
/// itself.
pub async fn list_rooms(registry: web::Data<Addr<RoomRegistry>>) -> HttpResponse {
    let addrs = match registry.send(ListRoomAddrs).await {
        Ok(addrs) => addrs,
        Err(err) => {
            warn!(error = %err, "room registry mailbox error on list");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let snapshots = join_all(addrs.into_iter().map(|(room_id, addr): (RoomId, Addr<Room>)| async move {
        addr.send(GetSnapshot).await.ok().map(|snapshot| (room_id, snapshot))
    }))
    .await;

    let entries: Vec<RoomListEntry> = snapshots
        .into_iter()
        .flatten()
        .filter(|(_, snapshot)| snapshot.connected_user_count > 0)
        .map(|(room_id, snapshot)| RoomListEntry {
            room_id,
            host_name: snapshot.host_name,
            user_count: snapshot.connected_user_count,
            queue_length: snapshot.queue_length,
            current_video: snapshot.current_video_title,
        })
        .collect();

    HttpResponse::Ok().json(entries)
}

#[derive(Serialize)]
struct RoomLookupResponse {
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    room_id: Option<RoomId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    queue_length: Option<usize>,
}

pub async fn get_room(
    registry: web::Data<Addr<RoomRegistry>>,
    path: web::Path<RoomId>,
) -> HttpResponse {
    let room_id = path.into_inner();
    let addr = match registry
        .send(crate::room_registry::GetRoom {
            room_id: room_id.clone(),
        })
        .await
    {
        Ok(addr) => addr,
        Err(err) => {
            warn!(error = %err, "room registry mailbox error on lookup");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let Some(addr) = addr else {
        return HttpResponse::Ok().json(RoomLookupResponse {
            exists: false,
            room_id: None,
            user_count: None,
            queue_length: None,
        });
    };

    match addr.send(GetSnapshot).await {
        Ok(snapshot) => HttpResponse::Ok().json(RoomLookupResponse {
            exists: true,
            room_id: Some(room_id),
            user_count: Some(snapshot.connected_user_count),
            queue_length: Some(snapshot.queue_length),
        }),
        Err(err) => {
            warn!(error = %err, "room mailbox error on snapshot");
            HttpResponse::InternalServerError().finish()
        }
    }
}
