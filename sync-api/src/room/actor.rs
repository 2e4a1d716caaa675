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

//! Thin actix actor wrapping [`RoomState`]. All mutation happens on the
//! actor's mailbox thread, so the state behind it never needs a lock; the
//! one suspension point (fetching provider video metadata) is spawned
//! outside the synchronous mutation and re-enters through [`CommitVideo`],
//! which re-validates against current state rather than trusting whatever
//! was true before the await.

use std::sync::Arc;

use actix::{
    fut, Actor, ActorFutureExt, AsyncContext, Context, Handler, Message as ActixMessage,
    MessageResult,
};
use tracing::{debug, info};

use crate::connection_registry::ConnectionRegistry;
use crate::error::{RoomError, RoomErrorKind};
use crate::ids::{generate_user_id, UserId, VideoRef};
use crate::messages::{
    ClientFrame, Connect, Disconnect, Dispatch, HeartbeatTick, JoinResult, QueueAction, ServerFrame,
};
use crate::metadata::{MetadataOracle, VideoMeta};
use crate::models::{ChatMessage, Video};
use crate::room::state::{RemoveOutcome, RoomState, SkipVoteOutcome};
use crate::time::now_secs;

pub struct Room {
    state: RoomState,
    connections: ConnectionRegistry,
    oracle: Arc<dyn MetadataOracle>,
    host_grace_period: std::time::Duration,
}

impl Room {
    pub fn new(room_id: String, oracle: Arc<dyn MetadataOracle>, host_grace_period: std::time::Duration) -> Self {
        Room {
            state: RoomState::new(room_id),
            connections: ConnectionRegistry::new(),
            oracle,
            host_grace_period,
        }
    }

    fn send_error(&self, user_id: &str, err: RoomError) {
        self.connections.send_to(
            user_id,
            ServerFrame::Error {
                code: err.code,
                message: err.message,
            },
        );
    }

    fn broadcast_queue(&self, action: QueueAction, video: Option<Video>) {
        self.connections.broadcast_all(ServerFrame::QueueUpdated {
            queue: self.state.queue().to_vec(),
            action,
            video,
        });
    }

    fn broadcast_sync(&self) {
        self.connections.broadcast_all(ServerFrame::Sync {
            sync: self.state.sync().to_wire(),
            server_time: now_secs(),
        });
    }

    fn system_chat(&mut self, message: String) {
        let msg = ChatMessage::system(message);
        self.state.push_chat(msg.clone());
        self.connections
            .broadcast_all(ServerFrame::Chat { message: msg });
    }

    fn apply_advance(&mut self, action: QueueAction) {
        self.state.advance_queue();
        self.broadcast_queue(action, None);
        self.broadcast_sync();
    }

    fn arm_host_grace_timer(&mut self, ctx: &mut Context<Self>) {
        let generation = self.state.arm_host_grace();
        ctx.run_later(self.host_grace_period, move |act, ctx| {
            act.fire_host_grace(generation, ctx);
        });
    }

    fn fire_host_grace(&mut self, generation: u64, _ctx: &mut Context<Self>) {
        let Some(transfer) = self.state.transfer_host_if_still_disconnected(generation) else {
            return;
        };
        info!(
            room_id = %self.state.room_id,
            new_host = %transfer.new_host.user_id,
            "host transferred after grace period"
        );
        self.connections.broadcast_all(ServerFrame::HostChanged {
            new_host_id: transfer.new_host.user_id.clone(),
            new_host_name: transfer.new_host.display_name.clone(),
        });
        self.system_chat(format!("{} agora é o host.", transfer.new_host.display_name));
        if let Some(old_host) = &transfer.old_host {
            self.state.check_user_cleanup(&old_host.user_id);
        }
    }
}

impl Actor for Room {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        debug!(room_id = %self.state.room_id, "room actor started");
    }
}

impl Handler<Connect> for Room {
    type Result = MessageResult<Connect>;

    fn handle(&mut self, msg: Connect, _ctx: &mut Self::Context) -> Self::Result {
        let Connect {
            display_name,
            resume_user_id,
            addr,
        } = msg;

        let user = resume_user_id
            .as_deref()
            .and_then(|id| self.state.reconnect_user(id))
            .unwrap_or_else(|| self.state.add_user(generate_user_id(), &display_name));

        self.connections.insert(user.user_id.clone(), addr);

        self.connections.broadcast(
            ServerFrame::UserJoined { user: user.clone() },
            Some(&user.user_id),
        );
        self.system_chat_excluding(&user.user_id, format!("{} entrou na sala.", user.display_name));

        let result = JoinResult {
            user_id: user.user_id.clone(),
            role: user.role,
            users: self.state.users().cloned().collect(),
            queue: self.state.queue().to_vec(),
            sync: self.state.sync().to_wire(),
            settings: self.state.settings(),
            chat_history: self.state.chat_history(),
        };
        MessageResult(Ok(result))
    }
}

impl Room {
    fn system_chat_excluding(&mut self, exclude: &str, message: String) {
        let msg = ChatMessage::system(message);
        self.state.push_chat(msg.clone());
        self.connections
            .broadcast(ServerFrame::Chat { message: msg }, Some(exclude));
    }
}

impl Handler<Disconnect> for Room {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, ctx: &mut Self::Context) -> Self::Result {
        let Disconnect { user_id } = msg;
        let display_name = self
            .state
            .get_user(&user_id)
            .map(|u| u.display_name.clone())
            .unwrap_or_default();
        let was_host = self
            .state
            .get_host()
            .map(|h| h.user_id == user_id)
            .unwrap_or(false);

        self.connections.remove(&user_id);
        let needs_grace = self.state.disconnect_user(&user_id);
        if needs_grace {
            self.arm_host_grace_timer(ctx);
        }

        self.connections
            .broadcast_all(ServerFrame::UserLeft { user_id: user_id.clone() });
        self.system_chat(format!("{display_name} saiu da sala."));
        // The host stays in the roster until the grace timer resolves
        // (`fire_host_grace` cleans them up after transfer) so a reconnect
        // or the transfer's own host lookup still finds them.
        if !was_host {
            self.state.check_user_cleanup(&user_id);
        }
    }
}

impl Handler<HeartbeatTick> for Room {
    type Result = ();

    fn handle(&mut self, _msg: HeartbeatTick, _ctx: &mut Self::Context) -> Self::Result {
        if !self.connections.is_empty() {
            self.broadcast_sync();
        }
    }
}

impl Handler<crate::messages::IsEmpty> for Room {
    type Result = bool;

    fn handle(&mut self, _msg: crate::messages::IsEmpty, _ctx: &mut Self::Context) -> Self::Result {
        self.state.is_reapable(self.connections.len())
    }
}

impl Handler<crate::messages::GetSnapshot> for Room {
    type Result = MessageResult<crate::messages::GetSnapshot>;

    fn handle(
        &mut self,
        _msg: crate::messages::GetSnapshot,
        _ctx: &mut Self::Context,
    ) -> Self::Result {
        let current_video_title = self.state.sync().current_video_id.as_ref().and_then(|id| {
            self.state
                .queue()
                .iter()
                .find(|v| &v.video_id == id)
                .map(|v| v.title.clone())
        });
        MessageResult(crate::messages::RoomSnapshot {
            host_name: self.state.get_host().map(|u| u.display_name.clone()),
            connected_user_count: self.connections.len(),
            queue_length: self.state.queue().len(),
            current_video_title,
        })
    }
}

#[derive(ActixMessage)]
#[rtype(result = "()")]
struct CommitVideo {
    user_id: UserId,
    video_ref: VideoRef,
    meta: Option<VideoMeta>,
}

impl Handler<CommitVideo> for Room {
    type Result = ();

    fn handle(&mut self, msg: CommitVideo, _ctx: &mut Self::Context) -> Self::Result {
        let CommitVideo {
            user_id,
            video_ref,
            meta,
        } = msg;
        match self.state.commit_video(&user_id, video_ref, meta) {
            Ok(added) => {
                self.broadcast_queue(QueueAction::Add, Some(added.video.clone()));
                if added.became_current {
                    self.broadcast_sync();
                }
            }
            Err(err) => self.send_error(&user_id, err),
        }
    }
}

impl Handler<Dispatch> for Room {
    type Result = ();

    fn handle(&mut self, msg: Dispatch, ctx: &mut Self::Context) -> Self::Result {
        let Dispatch { user_id, frame } = msg;

        match frame {
            ClientFrame::AddVideo { url } => match self.state.validate_add_video(&user_id, &url) {
                Ok(video_ref @ VideoRef::Direct(_)) => {
                    ctx.notify(CommitVideo {
                        user_id,
                        video_ref,
                        meta: None,
                    });
                }
                Ok(video_ref @ VideoRef::Provider(_)) => {
                    let provider_ref = match &video_ref {
                        VideoRef::Provider(id) => id.clone(),
                        VideoRef::Direct(_) => unreachable!(),
                    };
                    let oracle = self.oracle.clone();
                    let fut = async move { oracle.fetch(&provider_ref).await };
                    let fut = fut::wrap_future::<_, Self>(fut).map(move |meta, _act, ctx| {
                        ctx.notify(CommitVideo {
                            user_id,
                            video_ref,
                            meta: Some(meta),
                        });
                    });
                    ctx.spawn(fut);
                }
                Err(err) => self.send_error(&user_id, err),
            },

            ClientFrame::RemoveVideo { video_id } => {
                match self.state.remove_video(&user_id, &video_id) {
                    Ok(RemoveOutcome::Removed { was_current: true }) => {
                        self.apply_advance(QueueAction::Advance);
                        self.broadcast_queue(QueueAction::Remove, None);
                    }
                    Ok(RemoveOutcome::Removed { was_current: false }) => {
                        self.broadcast_queue(QueueAction::Remove, None);
                    }
                    Err(err) => self.send_error(&user_id, err),
                }
            }

            ClientFrame::ReorderQueue { video_ids } => {
                match self.state.reorder_queue(&user_id, &video_ids) {
                    Ok(()) => self.broadcast_queue(QueueAction::Reorder, None),
                    Err(err) => self.send_error(&user_id, err),
                }
            }

            ClientFrame::SkipVote { video_id } => {
                match self.state.handle_skip_vote(&user_id, &video_id) {
                    SkipVoteOutcome::Ignored => {}
                    SkipVoteOutcome::InstantSkip => self.apply_advance(QueueAction::Advance),
                    SkipVoteOutcome::Recorded {
                        votes,
                        required,
                        voters,
                    } => {
                        self.connections.broadcast_all(ServerFrame::SkipVoteUpdate {
                            video_id,
                            votes,
                            required,
                            voters,
                        });
                    }
                    SkipVoteOutcome::ThresholdReached {
                        votes,
                        required,
                        voters,
                    } => {
                        self.connections.broadcast_all(ServerFrame::SkipVoteUpdate {
                            video_id,
                            votes,
                            required,
                            voters,
                        });
                        self.apply_advance(QueueAction::Advance);
                    }
                }
            }

            ClientFrame::ChatMessage { message } => match self.state.handle_chat(&user_id, &message) {
                Ok(msg) => self.connections.broadcast_all(ServerFrame::Chat { message: msg }),
                Err(err) => self.send_error(&user_id, err),
            },

            ClientFrame::Play => match self.state.play(&user_id) {
                Ok(()) => self.broadcast_sync(),
                Err(err) => self.send_error(&user_id, err),
            },

            ClientFrame::Pause { timestamp } => match self.state.pause(&user_id, timestamp) {
                Ok(()) => self.broadcast_sync(),
                Err(err) => self.send_error(&user_id, err),
            },

            ClientFrame::Seek { timestamp } => match self.state.seek(&user_id, timestamp) {
                Ok(()) => self.broadcast_sync(),
                Err(err) => self.send_error(&user_id, err),
            },

            ClientFrame::VideoEnded => self.apply_advance(QueueAction::Advance),

            ClientFrame::SyncReport { .. } => {
                // No server-side action; this is client-diagnostic telemetry.
            }

            ClientFrame::UpdateSettings { settings } => {
                match self.state.update_settings(&user_id, &settings) {
                    Ok(settings) => self
                        .connections
                        .broadcast_all(ServerFrame::SettingsUpdated { settings }),
                    Err(err) => self.send_error(&user_id, err),
                }
            }

            ClientFrame::Unknown => {
                self.send_error(
                    &user_id,
                    RoomError::new(RoomErrorKind::UnknownType, "Unknown message type"),
                );
            }
        }
    }
}
