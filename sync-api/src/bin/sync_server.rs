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

use std::sync::Arc;

use actix::Actor;
use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use tracing::info;

use synctube_core::config::AppConfig;
use synctube_core::heartbeat;
use synctube_core::http::configure_routes;
use synctube_core::metadata::{MetadataOracle, OEmbedOracle};
use synctube_core::room_registry::RoomRegistry;
use synctube_core::session::ws_route;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    info!("start");

    let config = AppConfig::from_env();
    let oracle: Arc<dyn MetadataOracle> = Arc::new(OEmbedOracle::new());
    let registry = RoomRegistry::with_host_grace_period(oracle, config.host_grace_period).start();

    let heartbeat_registry = registry.clone();
    let heartbeat_interval = config.heartbeat_interval;
    tokio::spawn(async move {
        heartbeat::run(heartbeat_registry, heartbeat_interval).await;
    });

    let bind_addr = (config.bind_host.clone(), config.bind_port);
    let allowed_origins = config.allowed_origins.clone();

    info!(host = %bind_addr.0, port = bind_addr.1, "listening");

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::CONTENT_TYPE])
            .max_age(3600);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(web::Data::new(registry.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(cors)
            .configure(configure_routes)
            .route("/ws/{room_id}", web::get().to(ws_route))
    })
    .bind(bind_addr)?
    .run()
    .await
}
