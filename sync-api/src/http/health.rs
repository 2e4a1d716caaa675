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

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::room_registry::{RoomCount, RoomRegistry};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    rooms: usize,
}

pub async fn health(registry: web::Data<actix::Addr<RoomRegistry>>) -> HttpResponse {
    let rooms = registry.send(RoomCount).await.unwrap_or(0);
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        rooms,
    })
}
