//! Player overlay: keyboard handling and UI notices on top of the controller

use std::time::Instant;

use common::MediaConfig;
use tracing::debug;

use crate::error::PlaybackFailure;
use crate::models::{MediaItem, MediaSlot};
use crate::render::{EmbedParams, RenderPlan};
use crate::resolver::ResolvedMedia;
use crate::session::{
    LoadTicket, PlaybackSessionController, SessionObserver, SessionState, SignalOutcome,
};

/// Keys the overlay reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Space,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.code` value
    pub fn from_code(code: &str) -> Self {
        match code {
            "Escape" => Key::Escape,
            "Space" => Key::Space,
            _ => Key::Other,
        }
    }
}

/// What the overlay should currently display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Hidden,
    Loading,
    Ready,
    /// The requested slot held nothing to play
    MediaUnavailable,
    /// The player failed; `url` is the attempted canonical URL
    PlaybackFailed { url: Option<String> },
    TimedOut { url: Option<String> },
}

/// One mounted player overlay
#[derive(Debug)]
pub struct PlaybackOverlay {
    controller: PlaybackSessionController,
    embed_params: EmbedParams,
    playing: bool,
}

impl PlaybackOverlay {
    pub fn new(controller: PlaybackSessionController, embed_params: EmbedParams) -> Self {
        Self {
            controller,
            embed_params,
            playing: false,
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(
            PlaybackSessionController::from_config(config),
            EmbedParams::from_config(config),
        )
    }

    pub fn controller(&self) -> &PlaybackSessionController {
        &self.controller
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.controller.subscribe(observer);
    }

    pub fn is_visible(&self) -> bool {
        self.controller.state().is_open()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Open the overlay on the item's default slot
    pub fn show(&mut self, item: MediaItem) -> LoadTicket {
        let slot = item.default_slot();
        self.show_slot(item, slot)
    }

    pub fn show_slot(&mut self, item: MediaItem, slot: MediaSlot) -> LoadTicket {
        self.playing = false;
        self.controller.open(item, slot)
    }

    pub fn hide(&mut self) {
        self.playing = false;
        self.controller.close();
    }

    /// Forward the renderer's ready callback
    pub fn player_ready(&mut self, ticket: &LoadTicket) -> SignalOutcome {
        let outcome = self.controller.on_ready(ticket);
        if outcome.is_applied() {
            self.playing = self.embed_params.autoplay;
        }
        outcome
    }

    /// Forward the renderer's error callback
    pub fn player_error(&mut self, ticket: &LoadTicket, reason: Option<String>) -> SignalOutcome {
        let outcome = self.controller.on_error(ticket, reason);
        if outcome.is_applied() {
            self.playing = false;
        }
        outcome
    }

    /// Periodic check for loads that never finish
    pub fn tick(&mut self, now: Instant) -> bool {
        self.controller.check_timeout(now)
    }

    /// Handle a key press, returning whether the overlay consumed it
    pub fn handle_key(&mut self, key: Key) -> bool {
        match (key, self.controller.state()) {
            (_, SessionState::Closed) => false,
            (Key::Escape, _) => {
                debug!("Escape pressed, closing overlay");
                self.hide();
                true
            }
            (Key::Space, SessionState::Ready) => {
                self.playing = !self.playing;
                true
            }
            _ => false,
        }
    }

    /// Renderer to mount for the current session
    pub fn render_plan(&self) -> RenderPlan {
        let (Some(item), Some(slot), Some(resolved)) = (
            self.controller.active_item(),
            self.controller.requested_slot(),
            self.controller.resolved(),
        ) else {
            return RenderPlan::Unavailable;
        };

        RenderPlan::for_media(slot, item.kind, resolved, &self.embed_params)
    }

    /// Label of the media source, for external sources only
    pub fn source_label(&self) -> Option<&'static str> {
        self.controller
            .resolved()
            .filter(|resolved| resolved.source_kind.is_external())
            .map(ResolvedMedia::label)
    }

    pub fn notice(&self) -> Notice {
        let url = || {
            self.controller
                .resolved()
                .and_then(|resolved| resolved.canonical_url.clone())
        };

        match self.controller.state() {
            SessionState::Closed => Notice::Hidden,
            SessionState::Loading => Notice::Loading,
            SessionState::Ready => Notice::Ready,
            SessionState::Error => match self.controller.failure() {
                Some(PlaybackFailure::TimedOut(_)) => Notice::TimedOut { url: url() },
                Some(PlaybackFailure::Playback { .. }) => Notice::PlaybackFailed { url: url() },
                Some(PlaybackFailure::NoMedia) | None => Notice::MediaUnavailable,
            },
        }
    }
}
