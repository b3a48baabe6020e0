//! Catalog probing: resolve every stored reference and report the renderer

use common::MediaConfig;
use playback::{
    Catalog, EmbedParams, MediaId, MediaItem, MediaKind, MediaReferenceResolver, MediaSlot,
    RenderPlan, ResolvedMedia,
};
use serde::Serialize;

/// Resolution of one slot
#[derive(Debug, Clone, Serialize)]
pub struct SlotReport {
    pub slot: MediaSlot,
    pub resolved: ResolvedMedia,
    pub render: RenderPlan,
}

/// One output line per catalog item
#[derive(Debug, Clone, Serialize)]
pub struct ProbeRecord {
    pub id: MediaId,
    pub title: String,
    pub kind: MediaKind,
    pub default_slot: MediaSlot,
    /// Whether the default slot resolves to something loadable
    pub playable: bool,
    pub source_label: &'static str,
    pub thumbnail_url: Option<String>,
    pub slots: Vec<SlotReport>,
}

/// Resolves catalog items the way the player overlay would
#[derive(Debug, Clone)]
pub struct Prober {
    resolver: MediaReferenceResolver,
    embed_params: EmbedParams,
}

impl Prober {
    pub fn new(resolver: MediaReferenceResolver, embed_params: EmbedParams) -> Self {
        Self {
            resolver,
            embed_params,
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(
            MediaReferenceResolver::from_config(config),
            EmbedParams::from_config(config),
        )
    }

    pub fn probe_item(&self, item: &MediaItem) -> ProbeRecord {
        let slots: Vec<SlotReport> = item
            .raw_refs
            .keys()
            .map(|&slot| {
                let resolved = self.resolver.resolve_slot(item, slot);
                let render = RenderPlan::for_media(slot, item.kind, &resolved, &self.embed_params);
                SlotReport {
                    slot,
                    resolved,
                    render,
                }
            })
            .collect();

        let default_slot = item.default_slot();
        let default = self.resolver.resolve_slot(item, default_slot);

        ProbeRecord {
            id: item.id.clone(),
            title: item.title.clone(),
            kind: item.kind,
            default_slot,
            playable: default.is_available(),
            source_label: default.label(),
            thumbnail_url: self.resolver.resolve_thumbnail(item).canonical_url,
            slots,
        }
    }

    pub fn probe_catalog(&self, catalog: &Catalog) -> Vec<ProbeRecord> {
        catalog
            .items()
            .iter()
            .map(|item| self.probe_item(item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playback::{CatalogKind, SourceKind};

    const DOCS: &str = r#"[
        {"id": 1, "judul": "Panggung", "jenis": "foto", "file_dokumentasi": "dokumentasi/panggung.jpg"},
        {"id": 2, "judul": "Latihan", "jenis": "video", "file_dokumentasi": "",
         "url_embed": "https://www.youtube.com/watch?v=ABC123&t=30s", "thumbnail": "thumbs/latihan.jpg"}
    ]"#;

    fn prober() -> Prober {
        Prober::from_config(&MediaConfig::with_storage_base_url(
            "https://cdn.example.com/storage",
        ))
    }

    #[test]
    fn test_probe_documentation_catalog() {
        let catalog = Catalog::from_json(CatalogKind::Documentation, DOCS).unwrap();
        let records = prober().probe_catalog(&catalog);

        assert_eq!(records.len(), 2);

        let photo = &records[0];
        assert_eq!(photo.default_slot, MediaSlot::File);
        assert!(photo.playable);
        assert_eq!(photo.source_label, "Storage");
        assert_eq!(
            photo.thumbnail_url.as_deref(),
            Some("https://cdn.example.com/storage/dokumentasi/panggung.jpg")
        );

        let video = &records[1];
        assert_eq!(video.default_slot, MediaSlot::Embed);
        assert_eq!(video.source_label, "YouTube");
        let embed = video
            .slots
            .iter()
            .find(|report| report.slot == MediaSlot::Embed)
            .unwrap();
        assert_eq!(embed.resolved.source_kind, SourceKind::Youtube);
        assert_eq!(
            embed.render.url(),
            Some("https://www.youtube.com/embed/ABC123?autoplay=1&modestbranding=1&rel=0&controls=1")
        );

        let file = video
            .slots
            .iter()
            .find(|report| report.slot == MediaSlot::File)
            .unwrap();
        assert_eq!(file.render, RenderPlan::Unavailable);
    }

    #[test]
    fn test_record_serializes_as_json_line() {
        let item = MediaItem::new(4, "Sunyi", MediaKind::Audio);
        let record = prober().probe_item(&item);
        let line = serde_json::to_string(&record).unwrap();

        assert!(!record.playable);
        assert!(line.contains(r#""default_slot":"audio""#));
        assert!(line.contains(r#""source_label":"Unavailable""#));
        assert!(!line.contains('\n'));
    }
}
