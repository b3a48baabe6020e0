//! Media reference resolution
//!
//! Turns a raw stored reference into the URL a renderer can load. A
//! reference is either a path inside the backend's storage, joined to the
//! configured storage base URL, or an external URL pointing at a hosting
//! platform. Resolution never fails: malformed external URLs degrade to a
//! generic external source that still carries the original string.

use std::fmt;

use common::MediaConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::{Url, form_urlencoded};

use crate::models::{MediaItem, MediaKind, MediaSlot};

/// Substrings that mark a reference as external even without a scheme
const EXTERNAL_MARKERS: [&str; 5] = ["youtube", "youtu.be", "vimeo", "soundcloud", "spotify"];

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Where a resolved reference points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Youtube,
    Vimeo,
    Soundcloud,
    Spotify,
    GenericExternal,
    LocalFile,
    None,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Youtube => "youtube",
            SourceKind::Vimeo => "vimeo",
            SourceKind::Soundcloud => "soundcloud",
            SourceKind::Spotify => "spotify",
            SourceKind::GenericExternal => "generic-external",
            SourceKind::LocalFile => "local-file",
            SourceKind::None => "none",
        }
    }

    /// Label shown next to the player to tell visitors where media comes from
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Youtube => "YouTube",
            SourceKind::Vimeo => "Vimeo",
            SourceKind::Soundcloud => "SoundCloud",
            SourceKind::Spotify => "Spotify",
            SourceKind::GenericExternal => "External Source",
            SourceKind::LocalFile => "Storage",
            SourceKind::None => "Unavailable",
        }
    }

    pub fn is_external(self) -> bool {
        !matches!(self, SourceKind::LocalFile | SourceKind::None)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving a raw reference
///
/// `canonical_url` is absent exactly when `source_kind` is `None`, and
/// `external_id` is present exactly when `source_kind` is `Youtube`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMedia {
    pub source_kind: SourceKind,
    pub canonical_url: Option<String>,
    pub external_id: Option<String>,
}

impl ResolvedMedia {
    /// Nothing usable was stored
    pub fn none() -> Self {
        Self {
            source_kind: SourceKind::None,
            canonical_url: None,
            external_id: None,
        }
    }

    fn youtube(video_id: String) -> Self {
        let encoded: String = form_urlencoded::byte_serialize(video_id.as_bytes()).collect();
        Self {
            source_kind: SourceKind::Youtube,
            canonical_url: Some(format!("{}{}", YOUTUBE_WATCH_URL, encoded)),
            external_id: Some(video_id),
        }
    }

    fn url(source_kind: SourceKind, url: String) -> Self {
        Self {
            source_kind,
            canonical_url: Some(url),
            external_id: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.canonical_url.is_some()
    }

    /// Label for the player caption
    ///
    /// Like [`SourceKind::label`], but names Dailymotion links that
    /// classify as generic external sources.
    pub fn label(&self) -> &'static str {
        match (self.source_kind, self.canonical_url.as_deref()) {
            (SourceKind::GenericExternal, Some(url)) if url.contains("dailymotion") => {
                "Dailymotion"
            }
            (kind, _) => kind.label(),
        }
    }
}

/// Whether a raw reference points outside the backend's storage
///
/// Deliberately loose: any occurrence of a platform name counts, so a
/// local file called `my-youtube-cover.mp4` is treated as external.
pub fn is_external_reference(raw: &str) -> bool {
    raw.starts_with("http://")
        || raw.starts_with("https://")
        || EXTERNAL_MARKERS.iter().any(|marker| raw.contains(marker))
}

/// Resolve a raw reference against the storage base URL
pub fn resolve(raw: Option<&str>, storage_base_url: &str) -> ResolvedMedia {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return ResolvedMedia::none(),
    };

    if !is_external_reference(raw) {
        return ResolvedMedia::url(
            SourceKind::LocalFile,
            join_storage_path(storage_base_url, raw),
        );
    }

    if raw.contains("youtube") || raw.contains("youtu.be") {
        return match extract_youtube_id(raw) {
            Some(video_id) => ResolvedMedia::youtube(video_id),
            None => {
                debug!("No YouTube video id in {}, treating as external", raw);
                ResolvedMedia::url(SourceKind::GenericExternal, raw.to_string())
            }
        };
    }

    ResolvedMedia::url(classify_external(raw), raw.to_string())
}

/// Platform of a non-YouTube external reference
pub fn classify_external(raw: &str) -> SourceKind {
    if raw.contains("vimeo") {
        SourceKind::Vimeo
    } else if raw.contains("soundcloud") {
        SourceKind::Soundcloud
    } else if raw.contains("spotify") {
        SourceKind::Spotify
    } else {
        SourceKind::GenericExternal
    }
}

/// Extract the video id from a youtube.com or youtu.be URL
///
/// References stored without a scheme (`youtube.com/watch?v=...`) are
/// retried as https URLs.
pub fn extract_youtube_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw)
        .or_else(|_| Url::parse(&format!("https://{}", raw)))
        .ok()?;
    let host = url.host_str()?;

    let video_id = if host.contains("youtube.com") {
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
    } else if host.contains("youtu.be") {
        url.path_segments()
            .and_then(|mut segments| segments.next())
            .map(str::to_string)
    } else {
        None
    };

    video_id.filter(|id| !id.is_empty())
}

/// Join a storage-relative path to the storage base URL with a single `/`
///
/// An empty base yields a root-relative path (`/path`).
pub fn join_storage_path(storage_base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        storage_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Resolver bound to one storage base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReferenceResolver {
    storage_base_url: String,
}

impl MediaReferenceResolver {
    pub fn new(storage_base_url: impl Into<String>) -> Self {
        Self {
            storage_base_url: storage_base_url.into(),
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.storage_base_url.clone())
    }

    pub fn storage_base_url(&self) -> &str {
        &self.storage_base_url
    }

    pub fn resolve(&self, raw: Option<&str>) -> ResolvedMedia {
        resolve(raw, &self.storage_base_url)
    }

    /// Resolve the reference stored under `slot` of `item`
    pub fn resolve_slot(&self, item: &MediaItem, slot: MediaSlot) -> ResolvedMedia {
        self.resolve(item.raw_ref(slot))
    }

    /// Preview image for cards and tables
    ///
    /// Uses the explicit thumbnail when set; photos fall back to the
    /// uploaded file itself.
    pub fn resolve_thumbnail(&self, item: &MediaItem) -> ResolvedMedia {
        match item.thumbnail.as_deref() {
            Some(thumbnail) if !thumbnail.is_empty() => self.resolve(Some(thumbnail)),
            _ if item.kind == MediaKind::Photo => self.resolve_slot(item, MediaSlot::File),
            _ => ResolvedMedia::none(),
        }
    }
}
