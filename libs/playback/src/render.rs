//! Render planning: which player the overlay mounts for a resolved reference

use common::MediaConfig;
use serde::Serialize;
use url::Url;

use crate::models::{MediaKind, MediaSlot};
use crate::resolver::{ResolvedMedia, SourceKind};

const YOUTUBE_EMBED_URL: &str = "https://www.youtube.com/embed/";

/// Native element used for files served from storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerElement {
    Audio,
    Video,
    Image,
}

impl PlayerElement {
    /// Element for a storage file opened through `slot` on an item of `kind`
    pub fn for_media(slot: MediaSlot, kind: MediaKind) -> Self {
        match (slot, kind) {
            (MediaSlot::Audio, _) => PlayerElement::Audio,
            (MediaSlot::Video, _) => PlayerElement::Video,
            (_, MediaKind::Audio) => PlayerElement::Audio,
            (_, MediaKind::Video) => PlayerElement::Video,
            (_, MediaKind::Photo) => PlayerElement::Image,
        }
    }
}

/// YouTube iframe player parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedParams {
    pub autoplay: bool,
    pub modest_branding: bool,
    pub related_videos: bool,
    pub controls: bool,
}

impl Default for EmbedParams {
    fn default() -> Self {
        Self {
            autoplay: true,
            modest_branding: true,
            related_videos: false,
            controls: true,
        }
    }
}

impl EmbedParams {
    pub fn from_config(config: &MediaConfig) -> Self {
        Self {
            autoplay: config.youtube_autoplay,
            ..Self::default()
        }
    }

    /// Append the player parameters to an embed URL
    pub fn apply(&self, embed_url: &str) -> String {
        let Ok(mut url) = Url::parse(embed_url) else {
            return embed_url.to_string();
        };

        url.query_pairs_mut()
            .append_pair("autoplay", flag(self.autoplay))
            .append_pair("modestbranding", flag(self.modest_branding))
            .append_pair("rel", flag(self.related_videos))
            .append_pair("controls", flag(self.controls));

        url.into()
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Bare YouTube iframe URL for a video id
pub fn youtube_embed_url(video_id: &str) -> String {
    format!("{}{}", YOUTUBE_EMBED_URL, video_id)
}

/// Renderer the overlay mounts for the active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "renderer", rename_all = "kebab-case")]
pub enum RenderPlan {
    /// YouTube iframe; `src` carries the player parameters
    YoutubeEmbed {
        video_id: String,
        embed_url: String,
        src: String,
    },
    /// Generic embeddable player for other platforms
    EmbeddedPlayer { source_kind: SourceKind, url: String },
    /// Native audio, video or image element for storage files
    NativeElement { element: PlayerElement, url: String },
    /// Empty state, nothing to load
    Unavailable,
}

impl RenderPlan {
    pub fn for_media(
        slot: MediaSlot,
        kind: MediaKind,
        resolved: &ResolvedMedia,
        params: &EmbedParams,
    ) -> Self {
        let Some(url) = resolved.canonical_url.clone() else {
            return RenderPlan::Unavailable;
        };

        match (resolved.source_kind, resolved.external_id.as_deref()) {
            (SourceKind::Youtube, Some(video_id)) => {
                let embed_url = youtube_embed_url(video_id);
                RenderPlan::YoutubeEmbed {
                    video_id: video_id.to_string(),
                    src: params.apply(&embed_url),
                    embed_url,
                }
            }
            (SourceKind::LocalFile, _) => RenderPlan::NativeElement {
                element: PlayerElement::for_media(slot, kind),
                url,
            },
            (SourceKind::None, _) => RenderPlan::Unavailable,
            (source_kind, _) => RenderPlan::EmbeddedPlayer { source_kind, url },
        }
    }

    /// URL the renderer loads, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            RenderPlan::YoutubeEmbed { src, .. } => Some(src),
            RenderPlan::EmbeddedPlayer { url, .. } => Some(url),
            RenderPlan::NativeElement { url, .. } => Some(url),
            RenderPlan::Unavailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;

    const BASE: &str = "https://cdn.example.com/storage";

    #[test]
    fn test_youtube_plan_uses_iframe() {
        let resolved = resolve(Some("https://youtu.be/XYZ987"), BASE);
        let plan = RenderPlan::for_media(
            MediaSlot::Video,
            MediaKind::Video,
            &resolved,
            &EmbedParams::default(),
        );

        assert_eq!(
            plan,
            RenderPlan::YoutubeEmbed {
                video_id: "XYZ987".to_string(),
                embed_url: "https://www.youtube.com/embed/XYZ987".to_string(),
                src: "https://www.youtube.com/embed/XYZ987?autoplay=1&modestbranding=1&rel=0&controls=1"
                    .to_string(),
            }
        );
    }

    #[test]
    fn test_embed_params_follow_config() {
        let config = MediaConfig {
            youtube_autoplay: false,
            ..MediaConfig::default()
        };

        let src = EmbedParams::from_config(&config).apply(&youtube_embed_url("abc"));
        assert!(src.contains("autoplay=0"));
    }

    #[test]
    fn test_local_files_use_native_elements() {
        let resolved = resolve(Some("dokumentasi/foto1.jpg"), BASE);
        let plan = RenderPlan::for_media(
            MediaSlot::File,
            MediaKind::Photo,
            &resolved,
            &EmbedParams::default(),
        );

        assert_eq!(
            plan,
            RenderPlan::NativeElement {
                element: PlayerElement::Image,
                url: "https://cdn.example.com/storage/dokumentasi/foto1.jpg".to_string(),
            }
        );
    }

    #[test]
    fn test_audio_slot_of_video_item_plays_audio() {
        assert_eq!(
            PlayerElement::for_media(MediaSlot::Audio, MediaKind::Video),
            PlayerElement::Audio
        );
    }

    #[test]
    fn test_external_and_missing_media() {
        let params = EmbedParams::default();
        let vimeo = resolve(Some("https://vimeo.com/12345"), BASE);

        assert_eq!(
            RenderPlan::for_media(MediaSlot::Embed, MediaKind::Video, &vimeo, &params),
            RenderPlan::EmbeddedPlayer {
                source_kind: SourceKind::Vimeo,
                url: "https://vimeo.com/12345".to_string(),
            }
        );

        let missing = resolve(None, BASE);
        let plan = RenderPlan::for_media(MediaSlot::Audio, MediaKind::Audio, &missing, &params);
        assert_eq!(plan, RenderPlan::Unavailable);
        assert_eq!(plan.url(), None);
    }
}
