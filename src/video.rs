// ABOUTME: Maps stored exercise video links to embeddable player URLs
// ABOUTME: Recognizes Vimeo and YouTube link shapes; anything else has no embed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Video reference resolution. Pure string/URL transform, no network access.

use url::Url;

/// Hosting provider recognized in a video link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoHost {
    /// vimeo.com
    Vimeo,
    /// youtube.com / youtu.be
    YouTube,
}

/// A resolved, embeddable video reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbed {
    /// Provider the id belongs to
    pub host: VideoHost,
    /// Provider-specific video id
    pub video_id: String,
}

impl VideoEmbed {
    /// Player URL for an iframe
    #[must_use]
    pub fn player_url(&self) -> String {
        match self.host {
            VideoHost::Vimeo => format!("https://player.vimeo.com/video/{}", self.video_id),
            VideoHost::YouTube => format!("https://www.youtube.com/embed/{}", self.video_id),
        }
    }
}

/// Resolve a stored video link. Unrecognized shapes yield `None`.
#[must_use]
pub fn resolve_video(link: &str) -> Option<VideoEmbed> {
    let trimmed = link.trim();
    if trimmed.is_empty() {
        return None;
    }
    let url = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{trimmed}")))
        .ok()?;
    let host = url.host_str()?.trim_start_matches("www.").to_lowercase();
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match host.as_str() {
        "vimeo.com" => segments
            .iter()
            .find(|seg| is_numeric_id(seg))
            .map(|id| embed(VideoHost::Vimeo, id)),
        "player.vimeo.com" => match segments.as_slice() {
            ["video", id, ..] if is_numeric_id(id) => Some(embed(VideoHost::Vimeo, id)),
            _ => None,
        },
        "youtube.com" | "m.youtube.com" => match segments.as_slice() {
            ["watch"] => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
                .filter(|id| is_opaque_id(id))
                .map(|id| embed(VideoHost::YouTube, &id)),
            ["embed" | "shorts" | "live", id, ..] if is_opaque_id(id) => {
                Some(embed(VideoHost::YouTube, id))
            }
            _ => None,
        },
        "youtu.be" => match segments.as_slice() {
            [id, ..] if is_opaque_id(id) => Some(embed(VideoHost::YouTube, id)),
            _ => None,
        },
        _ => None,
    }
}

/// Convenience: the player URL for a stored link, if any
#[must_use]
pub fn embed_url(link: Option<&str>) -> Option<String> {
    link.and_then(resolve_video).map(|v| v.player_url())
}

fn embed(host: VideoHost, id: &str) -> VideoEmbed {
    VideoEmbed {
        host,
        video_id: id.to_owned(),
    }
}

fn is_numeric_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_opaque_id(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vimeo_links() {
        assert_eq!(
            embed_url(Some("https://vimeo.com/123456789")).as_deref(),
            Some("https://player.vimeo.com/video/123456789")
        );
        assert_eq!(
            embed_url(Some("https://vimeo.com/channels/staffpicks/76979871")).as_deref(),
            Some("https://player.vimeo.com/video/76979871")
        );
        assert_eq!(
            embed_url(Some("https://player.vimeo.com/video/42?h=abc")).as_deref(),
            Some("https://player.vimeo.com/video/42")
        );
        assert_eq!(embed_url(Some("vimeo.com/987")).as_deref(), Some("https://player.vimeo.com/video/987"));
    }

    #[test]
    fn test_youtube_links() {
        assert_eq!(
            embed_url(Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10")).as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(
            embed_url(Some("https://youtu.be/dQw4w9WgXcQ")).as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(
            resolve_video("https://youtube.com/shorts/abc_DEF-1").map(|v| v.host),
            Some(VideoHost::YouTube)
        );
    }

    #[test]
    fn test_unrecognized_links_have_no_embed() {
        assert_eq!(embed_url(None), None);
        assert_eq!(embed_url(Some("")), None);
        assert_eq!(embed_url(Some("https://vimeo.com/about")), None);
        assert_eq!(embed_url(Some("https://example.com/video/123")), None);
        assert_eq!(embed_url(Some("https://www.youtube.com/watch")), None);
        assert_eq!(embed_url(Some("not a url at all")), None);
    }
}
