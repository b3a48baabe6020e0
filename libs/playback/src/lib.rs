//! Media playback core for the label website
//!
//! This crate resolves stored media references into playable URLs and
//! drives the lifecycle of the player overlay:
//!
//! - [`resolver`] classifies a raw reference (storage path or external URL)
//!   and builds its canonical URL
//! - [`session`] owns the closed/loading/ready/error state machine and
//!   rejects callbacks from superseded loads
//! - [`render`] picks the renderer for a resolved reference
//! - [`overlay`] layers keyboard handling and UI notices on a session
//! - [`models`] holds the media item and the catalog records it is built from
//!
//! ```rust
//! use playback::{MediaItem, MediaKind, MediaSlot, PlaybackOverlay, SessionState};
//! use common::MediaConfig;
//!
//! let config = MediaConfig::with_storage_base_url("https://cdn.example.com/storage");
//! let mut overlay = PlaybackOverlay::from_config(&config);
//!
//! let item = MediaItem::new(1, "Langit Jingga", MediaKind::Audio)
//!     .with_ref(MediaSlot::Audio, Some("karya/langit.mp3"));
//! let ticket = overlay.show(item);
//! overlay.player_ready(&ticket);
//!
//! assert_eq!(overlay.controller().state(), SessionState::Ready);
//! ```

pub mod error;
pub mod models;
pub mod overlay;
pub mod render;
pub mod resolver;
pub mod session;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult, PlaybackFailure};
pub use models::catalog::{Catalog, CatalogKind, Documentation, MusicalWork};
pub use models::{MediaId, MediaItem, MediaKind, MediaSlot};
pub use overlay::{Key, Notice, PlaybackOverlay};
pub use render::{EmbedParams, PlayerElement, RenderPlan};
pub use resolver::{MediaReferenceResolver, ResolvedMedia, SourceKind, resolve};
pub use session::{
    IgnoredSignal, LoadTicket, PlaybackSession, PlaybackSessionController, SessionEvent,
    SessionObserver, SessionState, SignalOutcome,
};
