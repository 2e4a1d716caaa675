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

//! Per-connection websocket session. A thin transport adapter: all business
//! logic lives in the Room actor, this type only turns websocket frames into
//! `Dispatch` messages and `Outbound` frames back into websocket text.

use actix::clock::Instant;
use actix::{
    fut, Actor, ActorContext, ActorFutureExt, Addr, AsyncContext, ContextFutureSpawner, Handler,
    Recipient, StreamHandler,
};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::constants::{CLOSE_CODE_ROOM_NOT_FOUND, DISPLAY_NAME_MAX_LEN, HEARTBEAT_INTERVAL};
use crate::error::{RoomError, RoomErrorKind};
use crate::ids::{RoomId, UserId};
use crate::messages::{ClientFrame, Connect, Disconnect, Dispatch, JoinFrame, JoinResult, Outbound, ServerFrame};
use crate::room::Room;
use crate::room_registry::{GetRoom, RoomRegistry};
use crate::time::now_secs;

pub struct WsSession {
    room_id: RoomId,
    room_addr: Option<Addr<Room>>,
    user_id: Option<UserId>,
    heartbeat: Instant,
    client_timeout: std::time::Duration,
}

impl WsSession {
    fn new(room_id: RoomId, room_addr: Option<Addr<Room>>, client_timeout: std::time::Duration) -> Self {
        WsSession {
            room_id,
            room_addr,
            user_id: None,
            heartbeat: Instant::now(),
            client_timeout,
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let client_timeout = self.client_timeout;
        ctx.run_interval(HEARTBEAT_INTERVAL, move |act, ctx| {
            if Instant::now().duration_since(act.heartbeat) > client_timeout {
                debug!(room_id = %act.room_id, "client heartbeat timed out");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn reject_join(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let frame = ServerFrame::Error {
            code: "invalid_join",
            message: "first frame must be {type: \"join\", display_name: \"...\"}".to_string(),
        };
        if let Ok(json) = serde_json::to_string(&frame) {
            ctx.text(json);
        }
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Policy,
            description: Some("invalid join".to_string()),
        }));
        ctx.stop();
    }

    fn send_error(&self, err: RoomError, ctx: &mut ws::WebsocketContext<Self>) {
        let frame = ServerFrame::Error {
            code: err.code,
            message: err.message,
        };
        if let Ok(json) = serde_json::to_string(&frame) {
            ctx.text(json);
        }
    }

    fn handle_join(&mut self, raw: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let Ok(frame) = serde_json::from_str::<JoinFrame>(raw) else {
            self.reject_join(ctx);
            return;
        };
        if frame.frame_type != "join" {
            self.reject_join(ctx);
            return;
        }
        let display_name: String = frame
            .display_name
            .trim()
            .chars()
            .take(DISPLAY_NAME_MAX_LEN)
            .collect();
        if display_name.is_empty() {
            self.reject_join(ctx);
            return;
        }

        let Some(room_addr) = self.room_addr.clone() else {
            self.reject_join(ctx);
            return;
        };
        let resume_user_id = frame.resume_user_id.clone();
        let recipient: Recipient<Outbound> = ctx.address().recipient();

        let fut = async move {
            room_addr
                .send(Connect {
                    display_name,
                    resume_user_id,
                    addr: recipient,
                })
                .await
        };

        fut::wrap_future::<_, Self>(fut)
            .map(|res, act, ctx| match res {
                Ok(Ok(join_result)) => act.on_joined(join_result, ctx),
                Ok(Err(err)) => {
                    let frame = ServerFrame::Error {
                        code: err.code,
                        message: err.message,
                    };
                    if let Ok(json) = serde_json::to_string(&frame) {
                        ctx.text(json);
                    }
                    ctx.stop();
                }
                Err(_mailbox_closed) => ctx.stop(),
            })
            .wait(ctx);
    }

    fn on_joined(&mut self, result: JoinResult, ctx: &mut ws::WebsocketContext<Self>) {
        info!(room_id = %self.room_id, user_id = %result.user_id, "session joined");
        self.user_id = Some(result.user_id.clone());
        let frame = ServerFrame::RoomState {
            room_id: self.room_id.clone(),
            your_user_id: result.user_id,
            your_role: result.role,
            users: result.users,
            queue: result.queue,
            sync: result.sync,
            settings: result.settings,
            chat_history: result.chat_history,
            server_time: now_secs(),
        };
        if let Ok(json) = serde_json::to_string(&frame) {
            ctx.text(json);
        }
    }

    fn disconnect(&mut self) {
        if let (Some(user_id), Some(room_addr)) = (self.user_id.take(), self.room_addr.clone()) {
            room_addr.do_send(Disconnect { user_id });
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        if self.room_addr.is_none() {
            ctx.close(Some(ws::CloseReason {
                code: ws::CloseCode::Other(CLOSE_CODE_ROOM_NOT_FOUND),
                description: Some("Room not found".to_string()),
            }));
            ctx.stop();
            return;
        }
        self.start_heartbeat(ctx);
    }

    fn stopping(&mut self, _ctx: &mut Self::Context) -> actix::Running {
        self.disconnect();
        actix::Running::Stop
    }
}

impl Handler<Outbound> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        if let Ok(json) = serde_json::to_string(&msg.0) {
            ctx.text(json);
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, item: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match item {
            Ok(msg) => msg,
            Err(_) => {
                ctx.stop();
                return;
            }
        };

        match msg {
            ws::Message::Ping(bytes) => {
                self.heartbeat = Instant::now();
                ctx.pong(&bytes);
            }
            ws::Message::Pong(_) => {
                self.heartbeat = Instant::now();
            }
            ws::Message::Text(text) => {
                self.heartbeat = Instant::now();
                let Some(user_id) = self.user_id.clone() else {
                    self.handle_join(text.trim(), ctx);
                    return;
                };
                // Peek at `type` before the tagged-enum deserialize: a
                // missing/non-string tag fails `ClientFrame` parsing outright,
                // which would otherwise look identical to a dropped frame.
                let raw: Result<serde_json::Value, _> = serde_json::from_str(text.trim());
                let has_type = matches!(
                    &raw,
                    Ok(value) if value.get("type").and_then(|t| t.as_str()).is_some()
                );
                if !has_type {
                    self.send_error(
                        RoomError::new(RoomErrorKind::MissingType, "message is missing a \"type\" field"),
                        ctx,
                    );
                    return;
                }
                match serde_json::from_value::<ClientFrame>(raw.unwrap()) {
                    Ok(frame) => {
                        if let Some(room_addr) = self.room_addr.clone() {
                            room_addr.do_send(Dispatch { user_id, frame });
                        }
                    }
                    Err(_) => {
                        if let Some(room_addr) = self.room_addr.clone() {
                            room_addr.do_send(Dispatch {
                                user_id,
                                frame: ClientFrame::Unknown,
                            });
                        }
                    }
                }
            }
            ws::Message::Close(reason) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => {}
        }
    }
}

/// `GET /ws/{room_id}`. Looks up the room before upgrading; a socket for a
/// missing room still completes the handshake, then closes immediately with
/// code 4004 — a client sees a clean close, not a rejected upgrade.
pub async fn ws_route(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<RoomId>,
    registry: web::Data<Addr<RoomRegistry>>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, Error> {
    let room_id = path.into_inner();
    let room_addr = registry
        .send(GetRoom {
            room_id: room_id.clone(),
        })
        .await
        .unwrap_or(None);
    let session = WsSession::new(room_id, room_addr, config.client_timeout);
    ws::start(session, &req, stream)
}
