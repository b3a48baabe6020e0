//! Catalog records returned by the content API
//!
//! Field names follow the API's JSON payloads. Only the records that carry
//! playable media are modelled here; schedules and the CRUD plumbing around
//! them stay with the web application.
//!
//! Exports are decoded record by record. Nullable columns decode to their
//! defaults, and a record that still fails to decode is skipped with a
//! warning instead of rejecting the whole export.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{MediaItem, MediaKind, MediaSlot};

/// Category kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKind {
    #[serde(rename = "musik")]
    Music,
    #[serde(rename = "acara")]
    Event,
    #[serde(rename = "dokumentasi")]
    Documentation,
}

/// Category attached to musical works and schedules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nm_kategori")]
    pub name: String,
    pub slug: String,
    #[serde(rename = "deskripsi", default)]
    pub description: Option<String>,
    #[serde(rename = "jenis")]
    pub kind: CategoryKind,
    #[serde(rename = "aktif", default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Musical work published by the label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicalWork {
    pub id: i64,
    #[serde(rename = "judul")]
    pub title: String,
    #[serde(rename = "deskripsi", default)]
    pub description: Option<String>,
    #[serde(rename = "nm_artis")]
    pub artist: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(rename = "tgl_rilis", default)]
    pub release_date: Option<String>,
    #[serde(rename = "url_video", default)]
    pub video_url: Option<String>,
    #[serde(rename = "url_audio", default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "kategori", default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MusicalWork {
    /// Whether the work carries an audio or video reference
    pub fn is_playable(&self) -> bool {
        non_empty(&self.audio_url) || non_empty(&self.video_url)
    }
}

impl From<&MusicalWork> for MediaItem {
    fn from(work: &MusicalWork) -> Self {
        let kind = if non_empty(&work.video_url) {
            MediaKind::Video
        } else {
            MediaKind::Audio
        };

        MediaItem::new(work.id, work.title.clone(), kind)
            .with_ref(MediaSlot::Video, work.video_url.as_deref())
            .with_ref(MediaSlot::Audio, work.audio_url.as_deref())
            .with_thumbnail(work.thumbnail.as_deref())
    }
}

/// Documentation entry kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentationKind {
    #[serde(rename = "foto")]
    Photo,
    #[serde(rename = "video")]
    Video,
}

/// Photo or video documenting a work or an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Documentation {
    pub id: i64,
    #[serde(rename = "judul")]
    pub title: String,
    #[serde(rename = "deskripsi", default)]
    pub description: Option<String>,
    #[serde(rename = "jenis")]
    pub kind: DocumentationKind,
    /// Storage path of the uploaded file, empty for embed-only entries
    #[serde(rename = "file_dokumentasi", default, deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(rename = "url_embed", default)]
    pub embed_url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "tgl_dokumentasi", default)]
    pub documented_on: Option<String>,
    #[serde(rename = "lokasi", default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Documentation> for MediaItem {
    fn from(doc: &Documentation) -> Self {
        let kind = match doc.kind {
            DocumentationKind::Photo => MediaKind::Photo,
            DocumentationKind::Video => MediaKind::Video,
        };

        MediaItem::new(doc.id, doc.title.clone(), kind)
            .with_ref(MediaSlot::File, Some(doc.file.as_str()))
            .with_ref(MediaSlot::Embed, doc.embed_url.as_deref())
            .with_thumbnail(doc.thumbnail.as_deref())
    }
}

/// Pagination block used by list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedData<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Envelope every API response is wrapped in
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Raw records of a bare array, an enveloped array or an enveloped page
fn payload_rows(json: &str) -> CatalogResult<Vec<Value>> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(rows) => Ok(rows),
        envelope @ Value::Object(_) => {
            let response: ApiResponse<Value> = serde_json::from_value(envelope)?;
            match response.data {
                Value::Array(rows) => Ok(rows),
                page @ Value::Object(_) => {
                    let page: PaginatedData<Value> = serde_json::from_value(page)?;
                    Ok(page.data)
                }
                other => Err(CatalogError::Shape(format!(
                    "`data` holds {}",
                    json_type(&other)
                ))),
            }
        }
        other => Err(CatalogError::Shape(format!(
            "payload is {}",
            json_type(&other)
        ))),
    }
}

/// Decode each row on its own, skipping the ones that do not fit
///
/// Fails only when every row was rejected, with the first rejection.
fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> CatalogResult<Vec<T>> {
    let mut records = Vec::with_capacity(rows.len());
    let mut first_rejection = None;

    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value(row) {
            Ok(record) => records.push(record),
            Err(source) => {
                warn!("Skipping catalog record {}: {}", index, source);
                first_rejection.get_or_insert(CatalogError::Record { index, source });
            }
        }
    }

    match first_rejection {
        Some(rejection) if records.is_empty() => Err(rejection),
        _ => Ok(records),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Which catalog a payload holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Works,
    Documentation,
}

impl FromStr for CatalogKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "works" | "music" | "karya-musik" => Ok(CatalogKind::Works),
            "docs" | "documentation" | "dokumentasi" => Ok(CatalogKind::Documentation),
            other => Err(CatalogError::UnknownKind(other.to_string())),
        }
    }
}

/// Decoded catalog export
#[derive(Debug, Clone)]
pub enum Catalog {
    Works(Vec<MusicalWork>),
    Documentation(Vec<Documentation>),
}

impl Catalog {
    /// Decode a bare array, an enveloped array or an enveloped page
    pub fn from_json(kind: CatalogKind, json: &str) -> CatalogResult<Self> {
        let rows = payload_rows(json)?;
        let catalog = match kind {
            CatalogKind::Works => Catalog::Works(decode_rows(rows)?),
            CatalogKind::Documentation => Catalog::Documentation(decode_rows(rows)?),
        };
        Ok(catalog)
    }

    /// Project every record into a media item
    pub fn items(&self) -> Vec<MediaItem> {
        match self {
            Catalog::Works(works) => works.iter().map(MediaItem::from).collect(),
            Catalog::Documentation(docs) => docs.iter().map(MediaItem::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Catalog::Works(works) => works.len(),
            Catalog::Documentation(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Nullable column: `null` decodes like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 or `YYYY-MM-DD HH:MM:SS` (taken as UTC); anything else is dropped
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|naive| naive.and_utc())
        })
        .ok()
}
