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

//! Control-surface HTTP routes, mounted alongside the websocket route on the
//! same `actix-web` app.

pub mod health;
pub mod rooms;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health))
            .service(
                web::resource("/rooms")
                    .route(web::post().to(rooms::create_room))
                    .route(web::get().to(rooms::list_rooms)),
            )
            .route("/rooms/{room_id}", web::get().to(rooms::get_room)),
    );
}
