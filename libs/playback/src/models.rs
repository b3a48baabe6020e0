//! Media models consumed by the resolver and the playback session

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catalog;

/// Opaque media identifier, only used for equality
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaId::Number(id) => write!(f, "{}", id),
            MediaId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for MediaId {
    fn from(id: i64) -> Self {
        MediaId::Number(id)
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        MediaId::Text(id.to_string())
    }
}

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        MediaId::Text(id)
    }
}

/// Declared intent of a media item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
    Photo,
}

/// Logical slot a raw reference is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSlot {
    Video,
    Audio,
    Embed,
    File,
}

impl MediaSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaSlot::Video => "video",
            MediaSlot::Audio => "audio",
            MediaSlot::Embed => "embed",
            MediaSlot::File => "file",
        }
    }
}

impl fmt::Display for MediaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media item handed to the player by the surrounding application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaId,
    pub title: String,
    pub kind: MediaKind,
    /// Raw references per slot: a storage-relative path or an external URL
    #[serde(default)]
    pub raw_refs: BTreeMap<MediaSlot, String>,
    /// Raw reference to a preview image
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl MediaItem {
    /// Create an item without any references
    pub fn new(id: impl Into<MediaId>, title: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            raw_refs: BTreeMap::new(),
            thumbnail: None,
        }
    }

    /// Store a raw reference under `slot`, absent values are skipped
    pub fn with_ref(mut self, slot: MediaSlot, raw: Option<impl Into<String>>) -> Self {
        if let Some(raw) = raw {
            self.raw_refs.insert(slot, raw.into());
        }
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<impl Into<String>>) -> Self {
        self.thumbnail = thumbnail.map(Into::into);
        self
    }

    /// Raw reference stored under `slot`, if any
    pub fn raw_ref(&self, slot: MediaSlot) -> Option<&str> {
        self.raw_refs.get(&slot).map(String::as_str)
    }

    /// Whether `slot` holds a non-empty reference
    pub fn has_ref(&self, slot: MediaSlot) -> bool {
        self.raw_ref(slot).is_some_and(|raw| !raw.is_empty())
    }

    /// Slot the overlay opens when the caller does not pick one
    ///
    /// Videos prefer a dedicated video reference, then an embed, then the
    /// uploaded file. Audio prefers the audio reference. Photos always use
    /// the uploaded file.
    pub fn default_slot(&self) -> MediaSlot {
        let candidates: &[MediaSlot] = match self.kind {
            MediaKind::Video => &[MediaSlot::Video, MediaSlot::Embed, MediaSlot::File],
            MediaKind::Audio => &[MediaSlot::Audio, MediaSlot::File],
            MediaKind::Photo => &[MediaSlot::File],
        };

        candidates
            .iter()
            .copied()
            .find(|slot| self.has_ref(*slot))
            .unwrap_or(candidates[0])
    }

    /// Whether any slot holds something the player could attempt
    pub fn is_playable(&self) -> bool {
        self.raw_refs.values().any(|raw| !raw.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slot_prefers_video() {
        let item = MediaItem::new(1, "Senja", MediaKind::Video)
            .with_ref(MediaSlot::Video, Some("https://youtu.be/abc"))
            .with_ref(MediaSlot::Audio, Some("audio/senja.mp3"));

        assert_eq!(item.default_slot(), MediaSlot::Video);
    }

    #[test]
    fn test_default_slot_falls_back_to_file_for_documentation_video() {
        let item = MediaItem::new(7, "Konser", MediaKind::Video)
            .with_ref(MediaSlot::Embed, Some(""))
            .with_ref(MediaSlot::File, Some("dokumentasi/konser.mp4"));

        assert_eq!(item.default_slot(), MediaSlot::File);
    }

    #[test]
    fn test_default_slot_without_refs() {
        let item = MediaItem::new("a", "Empty", MediaKind::Audio);
        assert_eq!(item.default_slot(), MediaSlot::Audio);
        assert!(!item.is_playable());
    }

    #[test]
    fn test_media_id_deserializes_numbers_and_strings() {
        let number: MediaId = serde_json::from_str("42").unwrap();
        let text: MediaId = serde_json::from_str("\"abc\"").unwrap();

        assert_eq!(number, MediaId::Number(42));
        assert_eq!(text, MediaId::Text("abc".to_string()));
        assert_eq!(number.to_string(), "42");
    }
}
