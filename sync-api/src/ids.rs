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

//! Short id generation and external-video-reference extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

pub type RoomId = String;
pub type UserId = String;
pub type VideoId = String;

pub fn generate_room_id() -> RoomId {
    hex_prefix(8)
}

pub fn generate_user_id() -> UserId {
    hex_prefix(12)
}

pub fn generate_video_id() -> VideoId {
    hex_prefix(10)
}

fn hex_prefix(len: usize) -> String {
    let hex = Uuid::new_v4().to_string().replace('-', "");
    hex[..len].to_string()
}

/// What kind of video reference a pasted URL resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoRef {
    /// A provider (e.g. YouTube) opaque 11-character id.
    Provider(String),
    /// A direct link to a video file.
    Direct(String),
}

static PROVIDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(
        r"(?:youtube\.com/watch\?.*v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)([a-zA-Z0-9_-]{11})",
    )
    .expect("static pattern compiles")]
});

static BARE_PROVIDER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("static pattern compiles"));

static DIRECT_VIDEO_EXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(mp4|webm|ogg|mov|mkv|avi)(\?.*)?$").expect("static pattern compiles")
});

/// Extract a playable video reference from user-pasted input.
///
/// Tries a provider URL/bare id first, then falls back to detecting a direct
/// video file link. Returns `None` when neither matches.
pub fn extract_video_ref(input: &str) -> Option<VideoRef> {
    let trimmed = input.trim();
    for pattern in PROVIDER_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(trimmed) {
            return Some(VideoRef::Provider(caps[1].to_string()));
        }
    }
    if BARE_PROVIDER_ID.is_match(trimmed) {
        return Some(VideoRef::Provider(trimmed.to_string()));
    }
    if (trimmed.starts_with("http://") || trimmed.starts_with("https://"))
        && DIRECT_VIDEO_EXT.is_match(trimmed)
    {
        return Some(VideoRef::Direct(trimmed.to_string()));
    }
    None
}

/// Best-effort display title for a direct video link: the URL's filename
/// stem, or the whole URL if none can be derived.
pub fn direct_video_title(url: &str) -> String {
    url.rsplit('/')
        .next()
        .and_then(|tail| tail.split('?').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(url)
        .to_string()
}

pub fn default_thumbnail_for(provider_ref: &str) -> String {
    format!("https://img.youtube.com/vi/{provider_ref}/mqdefault.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_expected_length_and_are_hex() {
        let room = generate_room_id();
        let user = generate_user_id();
        let video = generate_video_id();
        assert_eq!(room.len(), 8);
        assert_eq!(user.len(), 12);
        assert_eq!(video.len(), 10);
        assert!(room.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(user.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(video.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(generate_room_id(), generate_room_id());
    }

    #[test]
    fn extracts_provider_id_from_watch_url() {
        let r = extract_video_ref("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(r, Some(VideoRef::Provider("dQw4w9WgXcQ".to_string())));
    }

    #[test]
    fn extracts_provider_id_from_short_url() {
        let r = extract_video_ref("https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(r, Some(VideoRef::Provider("dQw4w9WgXcQ".to_string())));
    }

    #[test]
    fn extracts_bare_provider_id() {
        let r = extract_video_ref("dQw4w9WgXcQ");
        assert_eq!(r, Some(VideoRef::Provider("dQw4w9WgXcQ".to_string())));
    }

    #[test]
    fn extracts_direct_video_link() {
        let r = extract_video_ref("https://cdn.example.com/clips/holiday.mp4");
        assert_eq!(
            r,
            Some(VideoRef::Direct(
                "https://cdn.example.com/clips/holiday.mp4".to_string()
            ))
        );
    }

    #[test]
    fn rejects_garbage_input() {
        assert_eq!(extract_video_ref("not a url at all"), None);
        assert_eq!(extract_video_ref(""), None);
    }

    #[test]
    fn direct_title_uses_filename_stem() {
        assert_eq!(
            direct_video_title("https://cdn.example.com/clips/holiday.mp4?token=abc"),
            "holiday.mp4"
        );
    }
}
