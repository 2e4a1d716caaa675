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

//! Room coordination core for a synchronized group video-watching service.

pub mod config;
pub mod connection_registry;
pub mod constants;
pub mod error;
pub mod heartbeat;
pub mod http;
pub mod ids;
pub mod messages;
pub mod metadata;
pub mod models;
pub mod room;
pub mod room_registry;
pub mod session;
pub mod time;
