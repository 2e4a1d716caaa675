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

//! Pure, transport-free room logic. No actix, no I/O, no suspension points:
//! every method here runs to completion synchronously so it can be unit
//! tested directly and exercised from the actor wrapper in `room::actor`
//! without risking state drift across an await.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::constants::{
    CHAT_HISTORY_LIMIT, DISPLAY_NAME_MAX_LEN, MAX_MESSAGE_LENGTH, ROOM_REAP_AGE,
};
use crate::error::{RoomError, RoomErrorKind};
use crate::ids::{generate_video_id, extract_video_ref, direct_video_title, UserId, VideoId, VideoRef};
use crate::metadata::VideoMeta;
use crate::models::{ChatMessage, Role, RoomSettings, RoomSettingsPatch, SyncState, User, Video, VideoKind};
use crate::time::now_secs;

/// What the actor should do after `add_video` commits a video.
#[derive(Debug, Clone)]
pub struct AddedVideo {
    pub video: Video,
    pub became_current: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { was_current: bool },
}

#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    /// Queue is now empty; sync state was reset.
    Empty,
    /// `video_id` is now playing from the start.
    Next(VideoId),
}

#[derive(Debug, Clone)]
pub enum SkipVoteOutcome {
    /// `video_id` didn't match the currently playing video, or the voter is
    /// unknown; nothing happened.
    Ignored,
    /// Host or the video's own requester always skips instantly.
    InstantSkip,
    /// Vote recorded but the threshold has not been reached yet.
    Recorded {
        votes: usize,
        required: usize,
        voters: Vec<UserId>,
    },
    /// Vote recorded and pushed the tally over the threshold.
    ThresholdReached {
        votes: usize,
        required: usize,
        voters: Vec<UserId>,
    },
}

#[derive(Debug, Clone)]
pub struct HostTransfer {
    pub old_host: Option<User>,
    pub new_host: User,
}

/// Core per-room state machine, ported field-for-field from the reference
/// room coordinator.
pub struct RoomState {
    pub room_id: String,
    users: HashMap<UserId, User>,
    queue: Vec<Video>,
    sync: SyncState,
    settings: RoomSettings,
    chat_history: VecDeque<ChatMessage>,
    skip_votes: HashSet<UserId>,
    created_at: f64,
    host_grace_generation: u64,
    host_grace_pending: bool,
}

impl RoomState {
    pub fn new(room_id: String) -> Self {
        RoomState {
            room_id,
            users: HashMap::new(),
            queue: Vec::new(),
            sync: SyncState::default(),
            settings: RoomSettings::default(),
            chat_history: VecDeque::with_capacity(CHAT_HISTORY_LIMIT),
            skip_votes: HashSet::new(),
            created_at: now_secs(),
            host_grace_generation: 0,
            host_grace_pending: false,
        }
    }

    // ---- User management -------------------------------------------------

    pub fn add_user(&mut self, user_id: UserId, display_name: &str) -> User {
        let role = if self.users.is_empty() {
            Role::Host
        } else {
            Role::Viewer
        };
        let name = truncate_display_name(display_name);
        let user = User::new(user_id.clone(), name, role);
        self.users.insert(user_id, user.clone());
        user
    }

    /// Reclaims a disconnected user's identity. Cancels any pending host
    /// grace timer if the reclaimed identity is the host.
    pub fn reconnect_user(&mut self, user_id: &str) -> Option<User> {
        let user = self.users.get_mut(user_id)?;
        if user.connected {
            return None;
        }
        user.connected = true;
        user.disconnected_at = None;
        let reconnected = user.clone();
        if reconnected.is_host() {
            self.cancel_host_grace();
        }
        Some(reconnected)
    }

    /// Marks a user disconnected. Returns `true` if a host-grace timer needs
    /// to be armed by the caller (the user was the host and no timer is
    /// already pending).
    pub fn disconnect_user(&mut self, user_id: &str) -> bool {
        let Some(user) = self.users.get_mut(user_id) else {
            return false;
        };
        user.connected = false;
        user.disconnected_at = Some(now_secs());
        user.is_host() && !self.host_grace_pending
    }

    fn user_has_queue_items(&self, user_id: &str) -> bool {
        self.queue.iter().any(|v| v.added_by == user_id)
    }

    /// Erases a disconnected user with nothing left in the queue. Returns
    /// `true` if the user was erased.
    pub fn check_user_cleanup(&mut self, user_id: &str) -> bool {
        let erase = match self.users.get(user_id) {
            Some(user) if !user.connected => !self.user_has_queue_items(user_id),
            _ => false,
        };
        if erase {
            self.users.remove(user_id);
            self.skip_votes.remove(user_id);
        }
        erase
    }

    pub fn get_host(&self) -> Option<&User> {
        self.users.values().find(|u| u.is_host())
    }

    pub fn get_user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    fn connected_users(&self) -> Vec<&User> {
        self.users.values().filter(|u| u.connected).collect()
    }

    fn is_host(&self, user_id: &str) -> bool {
        self.users.get(user_id).map(|u| u.is_host()).unwrap_or(false)
    }

    // ---- Host grace period -------------------------------------------

    /// Arms a new grace period, returning its generation token. Idempotent:
    /// a pending timer is not replaced.
    pub fn arm_host_grace(&mut self) -> u64 {
        self.host_grace_pending = true;
        self.host_grace_generation
    }

    pub fn cancel_host_grace(&mut self) {
        self.host_grace_pending = false;
        self.host_grace_generation += 1;
    }

    /// Whether a fired timer for `generation` is still the live one.
    pub fn host_grace_is_current(&self, generation: u64) -> bool {
        self.host_grace_pending && generation == self.host_grace_generation
    }

    /// Transfers host to the connected user with the lexicographically
    /// smallest id. No-op (returns `None`) if the host is connected again or
    /// there is nobody left to promote.
    pub fn transfer_host_if_still_disconnected(&mut self, generation: u64) -> Option<HostTransfer> {
        if !self.host_grace_is_current(generation) {
            return None;
        }
        let host_disconnected = match self.get_host() {
            Some(h) => !h.connected,
            None => false,
        };
        if !host_disconnected {
            self.host_grace_pending = false;
            return None;
        }

        let old_host_id = self.get_host().map(|h| h.user_id.clone());
        let mut connected: Vec<UserId> = self
            .connected_users()
            .into_iter()
            .map(|u| u.user_id.clone())
            .collect();
        connected.sort();

        let new_host_id = connected.into_iter().next()?;

        let old_host = old_host_id.and_then(|id| {
            self.users.get_mut(&id).map(|u| {
                u.role = Role::Viewer;
                u.clone()
            })
        });
        let new_host = {
            let u = self.users.get_mut(&new_host_id)?;
            u.role = Role::Host;
            u.clone()
        };
        self.host_grace_pending = false;
        Some(HostTransfer {
            old_host,
            new_host,
        })
    }

    // ---- Queue management ----------------------------------------------

    /// Synchronous half of `add_video`: resolves the pasted input to a video
    /// reference and checks the per-user queue cap *before* any network
    /// fetch is started.
    pub fn validate_add_video(&self, user_id: &str, url: &str) -> Result<VideoRef, RoomError> {
        let video_ref = extract_video_ref(url).ok_or_else(|| {
            RoomError::new(RoomErrorKind::InvalidUrl, "Invalid video URL")
        })?;
        self.check_queue_limit(user_id)?;
        Ok(video_ref)
    }

    fn check_queue_limit(&self, user_id: &str) -> Result<(), RoomError> {
        let count = self.queue.iter().filter(|v| v.added_by == user_id).count() as u32;
        if count >= self.settings.max_videos_per_user {
            return Err(RoomError::new(
                RoomErrorKind::QueueLimit,
                "You've reached the max videos per user",
            ));
        }
        Ok(())
    }

    /// Suspension-point-safe commit: re-checks the queue cap (it may have
    /// filled up while the metadata fetch was in flight) before mutating
    /// state. `meta` is only used for provider references; direct links
    /// derive their own title/thumbnail.
    pub fn commit_video(
        &mut self,
        user_id: &UserId,
        video_ref: VideoRef,
        meta: Option<VideoMeta>,
    ) -> Result<AddedVideo, RoomError> {
        self.check_queue_limit(user_id)?;

        let (external_ref, title, thumbnail, kind, source_url) = match video_ref {
            VideoRef::Provider(id) => {
                let meta = meta.unwrap_or_else(|| VideoMeta::fallback(&id));
                (id, meta.title, meta.thumbnail, VideoKind::Provider, String::new())
            }
            VideoRef::Direct(url) => {
                let title = direct_video_title(&url);
                (String::new(), title, String::new(), VideoKind::Direct, url)
            }
        };

        let video = Video {
            video_id: generate_video_id(),
            external_ref,
            title,
            thumbnail,
            duration: 0.0,
            added_by: user_id.clone(),
            kind,
            source_url,
        };
        self.queue.push(video.clone());

        let became_current = self.sync.current_video_id.is_none();
        if became_current {
            self.set_current_video(&video);
        }

        Ok(AddedVideo {
            video,
            became_current,
        })
    }

    pub fn remove_video(&mut self, user_id: &str, video_id: &str) -> Result<RemoveOutcome, RoomError> {
        let video = self
            .queue
            .iter()
            .find(|v| v.video_id == video_id)
            .cloned()
            .ok_or_else(|| RoomError::new(RoomErrorKind::RemoveFailed, "Video not found in queue"))?;

        let requester_is_host = self.is_host(user_id);
        if !requester_is_host && video.added_by != user_id {
            return Err(RoomError::new(
                RoomErrorKind::RemoveFailed,
                "Only the host or the requester can remove a video",
            ));
        }

        let was_current = self.sync.current_video_id.as_deref() == Some(video_id);
        self.queue.retain(|v| v.video_id != video_id);
        self.check_user_cleanup(&video.added_by);

        Ok(RemoveOutcome::Removed { was_current })
    }

    pub fn reorder_queue(&mut self, user_id: &str, video_ids: &[VideoId]) -> Result<(), RoomError> {
        if !self.is_host(user_id) {
            return Err(RoomError::new(
                RoomErrorKind::ReorderFailed,
                "Only the host can reorder the queue",
            ));
        }

        let current_ids: HashSet<&str> = self.queue.iter().map(|v| v.video_id.as_str()).collect();
        let requested_ids: HashSet<&str> = video_ids.iter().map(|s| s.as_str()).collect();
        if current_ids != requested_ids {
            return Err(RoomError::new(RoomErrorKind::ReorderFailed, "Video ID mismatch"));
        }

        let mut by_id: HashMap<String, Video> =
            self.queue.drain(..).map(|v| (v.video_id.clone(), v)).collect();
        let ordered = video_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();
        self.queue = ordered;
        Ok(())
    }

    fn set_current_video(&mut self, video: &Video) {
        self.sync = SyncState {
            current_video_id: Some(video.video_id.clone()),
            external_ref: video.external_ref.clone(),
            timestamp: 0.0,
            is_playing: true,
            last_updated: now_secs(),
        };
        self.skip_votes.clear();
    }

    /// Looks the current video up **by id**, not by queue slot 0: a host
    /// reorder can move the playing video anywhere in the list without
    /// disturbing playback.
    pub fn advance_queue(&mut self) -> AdvanceOutcome {
        if self.queue.is_empty() {
            self.sync = SyncState::default();
            return AdvanceOutcome::Empty;
        }

        let current_idx = self
            .sync
            .current_video_id
            .as_ref()
            .and_then(|id| self.queue.iter().position(|v| &v.video_id == id));

        if let Some(idx) = current_idx {
            let removed = self.queue.remove(idx);
            self.check_user_cleanup(&removed.added_by);
        }

        if let Some(next) = self.queue.first().cloned() {
            self.set_current_video(&next);
            AdvanceOutcome::Next(next.video_id)
        } else {
            self.sync = SyncState::default();
            AdvanceOutcome::Empty
        }
    }

    pub fn queue(&self) -> &[Video] {
        &self.queue
    }

    // ---- Playback controls (host only) ----------------------------------

    pub fn play(&mut self, user_id: &str) -> Result<(), RoomError> {
        self.require_host_and_current(user_id, RoomErrorKind::PlayFailed)?;
        self.sync.is_playing = true;
        self.sync.last_updated = now_secs();
        Ok(())
    }

    pub fn pause(&mut self, user_id: &str, timestamp: f64) -> Result<(), RoomError> {
        self.require_host_and_current(user_id, RoomErrorKind::PauseFailed)?;
        self.sync.is_playing = false;
        self.sync.timestamp = timestamp;
        self.sync.last_updated = now_secs();
        Ok(())
    }

    pub fn seek(&mut self, user_id: &str, timestamp: f64) -> Result<(), RoomError> {
        self.require_host_and_current(user_id, RoomErrorKind::SeekFailed)?;
        self.sync.timestamp = timestamp;
        self.sync.last_updated = now_secs();
        Ok(())
    }

    fn require_host_and_current(&self, user_id: &str, kind: RoomErrorKind) -> Result<(), RoomError> {
        if !self.is_host(user_id) {
            return Err(RoomError::new(kind, "Only the host can control playback"));
        }
        if self.sync.current_video_id.is_none() {
            return Err(RoomError::new(kind, "No video playing"));
        }
        Ok(())
    }

    pub fn sync(&self) -> &SyncState {
        &self.sync
    }

    // ---- Skip voting ------------------------------------------------------

    pub fn handle_skip_vote(&mut self, user_id: &str, video_id: &str) -> SkipVoteOutcome {
        if self.sync.current_video_id.as_deref() != Some(video_id) {
            return SkipVoteOutcome::Ignored;
        }
        let Some(user) = self.users.get(user_id) else {
            return SkipVoteOutcome::Ignored;
        };

        let is_requester = self
            .queue
            .iter()
            .find(|v| v.video_id == video_id)
            .map(|v| v.added_by == user_id)
            .unwrap_or(false);

        if user.is_host() || is_requester {
            return SkipVoteOutcome::InstantSkip;
        }

        self.skip_votes.insert(user_id.to_string());
        let connected_count = self.connected_users().len();
        let required = ((connected_count as f64 * self.settings.skip_vote_threshold) as usize).max(1);
        let votes = self.skip_votes.len();
        let voters: Vec<UserId> = self.skip_votes.iter().cloned().collect();

        if votes >= required {
            SkipVoteOutcome::ThresholdReached { votes, required, voters }
        } else {
            SkipVoteOutcome::Recorded { votes, required, voters }
        }
    }

    // ---- Chat ---------------------------------------------------------

    pub fn handle_chat(&mut self, user_id: &str, message: &str) -> Result<ChatMessage, RoomError> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| RoomError::new(RoomErrorKind::ChatFailed, "Unknown user"))?;

        let trimmed: String = message.trim().chars().take(MAX_MESSAGE_LENGTH).collect();
        let clean = html_escape(&trimmed);
        if clean.is_empty() {
            return Err(RoomError::new(RoomErrorKind::ChatFailed, "Empty message"));
        }

        let msg = ChatMessage::user(user_id.to_string(), user.display_name.clone(), clean);
        self.push_chat(msg.clone());
        Ok(msg)
    }

    pub fn push_chat(&mut self, msg: ChatMessage) {
        if self.chat_history.len() >= CHAT_HISTORY_LIMIT {
            self.chat_history.pop_front();
        }
        self.chat_history.push_back(msg);
    }

    pub fn chat_history(&self) -> Vec<ChatMessage> {
        self.chat_history.iter().cloned().collect()
    }

    // ---- Settings -------------------------------------------------------

    pub fn update_settings(
        &mut self,
        user_id: &str,
        patch: &RoomSettingsPatch,
    ) -> Result<RoomSettings, RoomError> {
        if !self.is_host(user_id) {
            return Err(RoomError::new(
                RoomErrorKind::SettingsFailed,
                "Only the host can change settings",
            ));
        }
        self.settings.apply_patch(patch);
        Ok(self.settings)
    }

    pub fn settings(&self) -> RoomSettings {
        self.settings
    }

    // ---- Lifecycle ------------------------------------------------------

    /// A room is reapable once it has no connections and no queue, and is
    /// old enough that this isn't just the window before the first join.
    pub fn is_reapable(&self, connection_count: usize) -> bool {
        if connection_count > 0 || !self.queue.is_empty() {
            return false;
        }
        now_secs() - self.created_at > ROOM_REAP_AGE.as_secs_f64()
    }
}

fn truncate_display_name(name: &str) -> String {
    name.trim().chars().take(DISPLAY_NAME_MAX_LEN).collect()
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> RoomState {
        RoomState::new("room01".to_string())
    }

    #[test]
    fn first_joiner_is_host_rest_are_viewers() {
        let mut r = room();
        let a = r.add_user("u1".into(), "ana");
        let b = r.add_user("u2".into(), "bea");
        assert_eq!(a.role, Role::Host);
        assert_eq!(b.role, Role::Viewer);
    }

    #[test]
    fn display_name_is_trimmed_and_capped() {
        let mut r = room();
        let long = "x".repeat(100);
        let u = r.add_user("u1".into(), &long);
        assert_eq!(u.display_name.len(), DISPLAY_NAME_MAX_LEN);
    }

    #[test]
    fn reconnect_rejects_unknown_and_already_connected() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        assert!(r.reconnect_user("ghost").is_none());
        assert!(r.reconnect_user("u1").is_none()); // still connected
    }

    #[test]
    fn reconnect_restores_disconnected_user_and_cancels_host_grace() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        assert!(r.disconnect_user("u1")); // host disconnected -> arm needed
        r.arm_host_grace();
        let user = r.reconnect_user("u1").expect("should reconnect");
        assert!(user.connected);
        assert!(!r.host_grace_is_current(r.host_grace_generation));
    }

    #[test]
    fn host_is_still_promotable_after_grace_if_cleanup_is_deferred() {
        // The caller must not run check_user_cleanup on a disconnecting host
        // until transfer_host_if_still_disconnected has resolved, or the
        // host vanishes from `users` before anyone can be promoted.
        let mut r = room();
        r.add_user("host".into(), "h");
        r.add_user("viewer".into(), "v");
        assert!(r.disconnect_user("host"));
        let gen = r.arm_host_grace();
        let transfer = r
            .transfer_host_if_still_disconnected(gen)
            .expect("viewer should be promoted");
        assert_eq!(transfer.new_host.user_id, "viewer");
        assert_eq!(transfer.old_host.unwrap().user_id, "host");
        // Only now is it safe to erase the old host if they left no videos.
        assert!(r.check_user_cleanup("host"));
        assert!(r.get_user("host").is_none());
    }

    #[test]
    fn disconnect_second_time_does_not_request_second_arm() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        assert!(r.disconnect_user("u1"));
        r.arm_host_grace();
        // already disconnected, calling again should still report false to
        // arm (host_grace_pending already true)
        assert!(!r.disconnect_user("u1"));
    }

    #[test]
    fn cleanup_erases_only_users_without_queue_items() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        r.disconnect_user("u1");
        assert!(r.check_user_cleanup("u1"));
        assert!(r.get_user("u1").is_none());
    }

    #[test]
    fn cleanup_keeps_disconnected_user_with_queue_items() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        r.commit_video(&"u1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap();
        r.disconnect_user("u1");
        assert!(!r.check_user_cleanup("u1"));
        assert!(r.get_user("u1").is_some());
    }

    #[test]
    fn host_transfer_picks_smallest_connected_id() {
        let mut r = room();
        r.add_user("aaa".into(), "host");
        r.add_user("bbb".into(), "bea");
        r.add_user("ccc".into(), "cid");
        r.disconnect_user("aaa");
        let gen = r.arm_host_grace();
        let transfer = r.transfer_host_if_still_disconnected(gen).expect("transfers");
        assert_eq!(transfer.new_host.user_id, "bbb");
        assert_eq!(r.get_user("bbb").unwrap().role, Role::Host);
    }

    #[test]
    fn host_transfer_noop_if_host_reconnected_before_deadline() {
        let mut r = room();
        r.add_user("aaa".into(), "host");
        r.add_user("bbb".into(), "bea");
        r.disconnect_user("aaa");
        let gen = r.arm_host_grace();
        r.reconnect_user("aaa");
        assert!(r.transfer_host_if_still_disconnected(gen).is_none());
        assert_eq!(r.get_user("aaa").unwrap().role, Role::Host);
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut r = room();
        r.add_user("aaa".into(), "host");
        r.add_user("bbb".into(), "bea");
        r.disconnect_user("aaa");
        let gen = r.arm_host_grace();
        r.cancel_host_grace();
        assert!(r.transfer_host_if_still_disconnected(gen).is_none());
    }

    #[test]
    fn first_video_added_becomes_current_automatically() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        let outcome = r
            .commit_video(&"u1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap();
        assert!(outcome.became_current);
        assert_eq!(r.sync().current_video_id.as_deref(), Some(outcome.video.video_id.as_str()));
        assert!(r.sync().is_playing);
    }

    #[test]
    fn second_video_added_does_not_replace_current() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        r.commit_video(&"u1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap();
        let outcome = r
            .commit_video(&"u1".to_string(), VideoRef::Provider("abcdefghijk".into()), None)
            .unwrap();
        assert!(!outcome.became_current);
    }

    #[test]
    fn queue_limit_is_enforced_per_user() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        for i in 0..10 {
            let id = format!("aaaaaaaaaa{i}");
            r.commit_video(&"u1".to_string(), VideoRef::Provider(id), None).unwrap();
        }
        let err = r
            .validate_add_video("u1", "aaaaaaaaaa9")
            .unwrap_err();
        assert_eq!(err.code, "queue_limit");
    }

    #[test]
    fn invalid_url_is_rejected() {
        let r = room();
        let err = r.validate_add_video("u1", "not a url at all").unwrap_err();
        assert_eq!(err.code, "invalid_url");
    }

    #[test]
    fn direct_video_link_is_recognized() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        let video_ref = r.validate_add_video("u1", "https://example.com/clip.mp4").unwrap();
        let outcome = r.commit_video(&"u1".to_string(), video_ref, None).unwrap();
        assert_eq!(outcome.video.kind, VideoKind::Direct);
        assert_eq!(outcome.video.source_url, "https://example.com/clip.mp4");
    }

    #[test]
    fn remove_video_by_host_succeeds_even_when_not_owner() {
        let mut r = room();
        r.add_user("host".into(), "h");
        r.add_user("v1".into(), "v");
        let first = r
            .commit_video(&"v1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap()
            .video;
        let second = r
            .commit_video(&"v1".to_string(), VideoRef::Provider("abcdefghijk".into()), None)
            .unwrap()
            .video;
        let outcome = r.remove_video("host", &second.video_id).unwrap();
        assert!(matches!(outcome, RemoveOutcome::Removed { was_current: false }));
        assert_eq!(r.queue().len(), 1);
        assert_eq!(r.queue()[0].video_id, first.video_id);
    }

    #[test]
    fn remove_video_by_non_owner_non_host_is_rejected() {
        let mut r = room();
        r.add_user("host".into(), "h");
        r.add_user("v1".into(), "v1");
        r.add_user("v2".into(), "v2");
        let video = r
            .commit_video(&"v1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap()
            .video;
        let err = r.remove_video("v2", &video.video_id).unwrap_err();
        assert_eq!(err.code, "remove_failed");
    }

    #[test]
    fn remove_nonexistent_video_is_rejected() {
        let mut r = room();
        r.add_user("host".into(), "h");
        let err = r.remove_video("host", "ghost").unwrap_err();
        assert_eq!(err.code, "remove_failed");
    }

    #[test]
    fn removing_current_video_reports_was_current() {
        let mut r = room();
        r.add_user("host".into(), "h");
        let video = r
            .commit_video(&"host".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap()
            .video;
        let outcome = r.remove_video("host", &video.video_id).unwrap();
        assert!(matches!(outcome, RemoveOutcome::Removed { was_current: true }));
        assert!(r.queue().is_empty());
    }

    #[test]
    fn reorder_rejects_id_set_mismatch() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        r.commit_video(&"u1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap();
        let err = r.reorder_queue("u1", &["nonexistent".to_string()]).unwrap_err();
        assert_eq!(err.code, "reorder_failed");
    }

    #[test]
    fn reorder_preserves_current_video_by_id_not_slot() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        let first = r
            .commit_video(&"u1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap()
            .video;
        let second = r
            .commit_video(&"u1".to_string(), VideoRef::Provider("abcdefghijk".into()), None)
            .unwrap()
            .video;
        // move the currently playing video (first) to slot 1
        r.reorder_queue("u1", &[second.video_id.clone(), first.video_id.clone()])
            .unwrap();
        assert_eq!(r.sync().current_video_id.as_deref(), Some(first.video_id.as_str()));
        assert_eq!(r.queue()[0].video_id, second.video_id);
    }

    #[test]
    fn advance_queue_moves_to_next_by_id_after_reorder() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        let first = r
            .commit_video(&"u1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap()
            .video;
        let second = r
            .commit_video(&"u1".to_string(), VideoRef::Provider("abcdefghijk".into()), None)
            .unwrap()
            .video;
        r.reorder_queue("u1", &[second.video_id.clone(), first.video_id.clone()])
            .unwrap();
        let outcome = r.advance_queue();
        assert!(matches!(outcome, AdvanceOutcome::Next(id) if id == second.video_id));
        assert_eq!(r.queue().len(), 1);
        assert_eq!(r.queue()[0].video_id, second.video_id);
    }

    #[test]
    fn advance_queue_empties_sync_when_queue_drained() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        r.commit_video(&"u1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap();
        let outcome = r.advance_queue();
        assert!(matches!(outcome, AdvanceOutcome::Empty));
        assert!(r.sync().current_video_id.is_none());
    }

    #[test]
    fn skip_vote_threshold_rounds_down_with_floor_of_one() {
        let mut r = room();
        r.add_user("host".into(), "h");
        r.add_user("v1".into(), "v1");
        r.add_user("v2".into(), "v2");
        r.add_user("v3".into(), "v3");
        let video = r
            .commit_video(&"host".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap()
            .video;
        // 4 connected users, 0.5 threshold -> required = 2
        let outcome = r.handle_skip_vote("v1", &video.video_id);
        assert!(matches!(
            outcome,
            SkipVoteOutcome::Recorded { votes: 1, required: 2, .. }
        ));
        let outcome = r.handle_skip_vote("v2", &video.video_id);
        match outcome {
            SkipVoteOutcome::ThresholdReached { votes: 2, required: 2, voters } => {
                assert_eq!(voters.len(), 2);
                assert!(voters.contains(&"v1".to_string()));
                assert!(voters.contains(&"v2".to_string()));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn host_skip_vote_is_instant() {
        let mut r = room();
        r.add_user("host".into(), "h");
        r.add_user("v1".into(), "v1");
        let video = r
            .commit_video(&"host".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap()
            .video;
        let outcome = r.handle_skip_vote("host", &video.video_id);
        assert!(matches!(outcome, SkipVoteOutcome::InstantSkip));
    }

    #[test]
    fn requester_skip_vote_is_instant_even_as_viewer() {
        let mut r = room();
        r.add_user("host".into(), "h");
        r.add_user("v1".into(), "v1");
        let video = r
            .commit_video(&"v1".to_string(), VideoRef::Provider("dQw4w9WgXcQ".into()), None)
            .unwrap()
            .video;
        let outcome = r.handle_skip_vote("v1", &video.video_id);
        assert!(matches!(outcome, SkipVoteOutcome::InstantSkip));
    }

    #[test]
    fn chat_message_is_escaped_and_truncated() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        let msg = r.handle_chat("u1", "<script>alert(1)</script>").unwrap();
        assert!(!msg.message.contains("<script>"));
        assert!(msg.message.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_chat_message_is_rejected() {
        let mut r = room();
        r.add_user("u1".into(), "ana");
        let err = r.handle_chat("u1", "   ").unwrap_err();
        assert_eq!(err.code, "chat_failed");
    }

    #[test]
    fn only_host_can_update_settings() {
        let mut r = room();
        r.add_user("host".into(), "h");
        r.add_user("v1".into(), "v");
        let patch = RoomSettingsPatch {
            max_videos_per_user: Some(5),
            skip_vote_threshold: None,
        };
        assert!(r.update_settings("v1", &patch).is_err());
        assert!(r.update_settings("host", &patch).is_ok());
        assert_eq!(r.settings().max_videos_per_user, 5);
    }

    #[test]
    fn out_of_range_setting_is_ignored_not_rejected() {
        let mut r = room();
        r.add_user("host".into(), "h");
        let patch = RoomSettingsPatch {
            max_videos_per_user: Some(999),
            skip_vote_threshold: None,
        };
        r.update_settings("host", &patch).unwrap();
        assert_eq!(r.settings().max_videos_per_user, 10); // unchanged
    }

    #[test]
    fn room_with_users_is_never_reapable() {
        let r = room();
        assert!(!r.is_reapable(1));
    }

    #[test]
    fn fresh_empty_room_is_not_reapable_yet() {
        let r = room();
        assert!(!r.is_reapable(0));
    }
}
