//! Integration tests for reference resolution and the overlay session
//!
//! These tests drive the public API the way the website's player overlay
//! does: resolve catalog records, open the overlay, and deliver renderer
//! callbacks in and out of order.

use common::MediaConfig;
use playback::{
    Catalog, CatalogKind, IgnoredSignal, Key, MediaItem, MediaKind, MediaReferenceResolver,
    MediaSlot, Notice, PlaybackOverlay, PlaybackSessionController, SessionState, SignalOutcome,
    SourceKind, resolve,
};

const STORAGE: &str = "https://cdn.example.com/storage";

const WORKS: &str = r#"{
    "status": "success",
    "message": "Data karya musik",
    "data": {
        "data": [
            {
                "id": 1,
                "judul": "Fajar",
                "nm_artis": "Sora",
                "url_video": "https://www.youtube.com/watch?v=ABC123&t=30s",
                "url_audio": "karya/fajar.mp3"
            },
            {
                "id": 2,
                "judul": "Senja",
                "nm_artis": "Nadi",
                "url_audio": "karya/senja.mp3"
            }
        ],
        "current_page": 1,
        "last_page": 1,
        "per_page": 10,
        "total": 2
    }
}"#;

fn controller() -> PlaybackSessionController {
    PlaybackSessionController::new(MediaReferenceResolver::new(STORAGE))
}

#[test]
fn test_absent_references_resolve_to_none() {
    for raw in [None, Some("")] {
        let resolved = resolve(raw, STORAGE);
        assert_eq!(resolved.source_kind, SourceKind::None);
        assert_eq!(resolved.canonical_url, None);
        assert_eq!(resolved.external_id, None);
    }
}

#[test]
fn test_resolution_is_stable_for_canonical_external_urls() {
    for raw in [
        "https://www.youtube.com/watch?v=ABC123&t=30s",
        "https://youtu.be/XYZ987?si=abc",
        "https://vimeo.com/12345",
        "https://soundcloud.com/label/track",
        "https://open.spotify.com/track/1",
        "https://media.example.org/a.mp3",
    ] {
        let first = resolve(Some(raw), STORAGE);
        let second = resolve(first.canonical_url.as_deref(), STORAGE);

        assert_eq!(first.source_kind, second.source_kind, "{}", raw);
        assert_eq!(first.canonical_url, second.canonical_url, "{}", raw);
    }
}

#[test]
fn test_vimeo_url_is_kept_verbatim() {
    let resolved = resolve(Some("https://vimeo.com/12345"), STORAGE);

    assert_eq!(resolved.source_kind, SourceKind::Vimeo);
    assert_eq!(resolved.canonical_url.as_deref(), Some("https://vimeo.com/12345"));
    assert_eq!(resolved.external_id, None);
}

#[test]
fn test_catalog_works_open_on_their_default_slot() {
    let catalog = Catalog::from_json(CatalogKind::Works, WORKS).expect("Failed to decode works");
    let items = catalog.items();
    let mut overlay = PlaybackOverlay::from_config(&MediaConfig::with_storage_base_url(STORAGE));

    overlay.show(items[0].clone());
    let resolved = overlay.controller().resolved().cloned().expect("resolved media");
    assert_eq!(overlay.controller().requested_slot(), Some(MediaSlot::Video));
    assert_eq!(resolved.source_kind, SourceKind::Youtube);
    assert_eq!(
        resolved.canonical_url.as_deref(),
        Some("https://www.youtube.com/watch?v=ABC123")
    );

    overlay.show(items[1].clone());
    assert_eq!(overlay.controller().requested_slot(), Some(MediaSlot::Audio));
    assert_eq!(
        overlay
            .controller()
            .resolved()
            .and_then(|r| r.canonical_url.as_deref()),
        Some("https://cdn.example.com/storage/karya/senja.mp3")
    );
}

#[test]
fn test_superseded_load_cannot_complete_new_one() {
    let mut controller = controller();
    let item_a = MediaItem::new("a", "A", MediaKind::Audio)
        .with_ref(MediaSlot::Audio, Some("karya/a.mp3"));
    let item_b = MediaItem::new("b", "B", MediaKind::Audio)
        .with_ref(MediaSlot::Audio, Some("https://soundcloud.com/label/b"));

    let ticket_a = controller.open(item_a, MediaSlot::Audio);
    let ticket_b = controller.open(item_b, MediaSlot::Audio);

    assert_eq!(
        controller.on_ready(&ticket_a),
        SignalOutcome::Ignored(IgnoredSignal::Stale)
    );
    assert_eq!(
        controller.on_error(&ticket_a, Some("late".to_string())),
        SignalOutcome::Ignored(IgnoredSignal::Stale)
    );
    assert_eq!(controller.state(), SessionState::Loading);

    assert_eq!(controller.on_ready(&ticket_b), SignalOutcome::Applied);
    assert_eq!(controller.state(), SessionState::Ready);
    assert_eq!(
        controller.resolved().map(|r| r.source_kind),
        Some(SourceKind::Soundcloud)
    );
}

#[test]
fn test_missing_slot_is_reported_without_callback() {
    let mut overlay = PlaybackOverlay::from_config(&MediaConfig::with_storage_base_url(STORAGE));
    let photo = MediaItem::new(8, "Foto", MediaKind::Photo);

    overlay.show(photo);

    assert_eq!(overlay.controller().state(), SessionState::Error);
    assert_eq!(overlay.notice(), Notice::MediaUnavailable);
    assert!(overlay.handle_key(Key::Escape));
    assert_eq!(overlay.controller().state(), SessionState::Closed);
}
