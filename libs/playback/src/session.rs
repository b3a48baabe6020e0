//! Playback session management for a single player overlay
//!
//! The controller resolves the requested reference synchronously on
//! `open` and then waits for the renderer to report readiness or failure.
//! Every load is tagged with a [`LoadTicket`]; renderer callbacks must hand
//! the ticket back so that signals from a superseded load are ignored.

use std::fmt;
use std::time::{Duration, Instant};

use common::MediaConfig;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::PlaybackFailure;
use crate::models::{MediaId, MediaItem, MediaSlot};
use crate::resolver::{MediaReferenceResolver, ResolvedMedia};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No overlay shown
    Closed,
    /// Waiting for the renderer to report readiness
    Loading,
    /// Renderer reported it can play
    Ready,
    /// Nothing to play, or the renderer failed
    Error,
}

impl SessionState {
    pub fn is_open(self) -> bool {
        self != SessionState::Closed
    }

    /// Whether the controller may move from `self` to `next`
    pub fn can_transition_to(self, next: SessionState) -> bool {
        match (self, next) {
            // open, including re-entrant open on an already open overlay
            (_, SessionState::Loading) => true,

            (SessionState::Loading, SessionState::Ready) => true,

            (SessionState::Loading, SessionState::Error) => true,
            (SessionState::Ready, SessionState::Error) => true,

            (SessionState::Loading, SessionState::Closed) => true,
            (SessionState::Ready, SessionState::Closed) => true,
            (SessionState::Error, SessionState::Closed) => true,

            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Closed => "closed",
            SessionState::Loading => "loading",
            SessionState::Ready => "ready",
            SessionState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Identity of one in-flight load
///
/// Issued by [`PlaybackSessionController::open`]. Two opens of the same
/// item still get distinct tickets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LoadTicket {
    pub item_id: MediaId,
    pub generation: u64,
}

/// Snapshot of the overlay's session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSession {
    pub state: SessionState,
    pub active_item: Option<MediaItem>,
    pub resolved: Option<ResolvedMedia>,
    pub requested_slot: Option<MediaSlot>,
    /// Set exactly when `state` is `Error`
    pub failure: Option<PlaybackFailure>,
    pub ticket: Option<LoadTicket>,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            state: SessionState::Closed,
            active_item: None,
            resolved: None,
            requested_slot: None,
            failure: None,
            ticket: None,
        }
    }
}

/// Why a renderer signal did not change the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredSignal {
    /// The overlay is closed
    Closed,
    /// The ticket belongs to a load that was closed or superseded
    Stale,
    /// The signal is not valid in the current state
    WrongState(SessionState),
}

/// Outcome of delivering a renderer signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Applied,
    Ignored(IgnoredSignal),
}

impl SignalOutcome {
    pub fn is_applied(self) -> bool {
        self == SignalOutcome::Applied
    }
}

/// Session events published to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StateChanged {
        old_state: SessionState,
        new_state: SessionState,
    },
}

/// Observer for session events
///
/// Observers run synchronously inside the transition and must not call
/// back into the controller.
pub trait SessionObserver {
    fn on_event(&self, event: &SessionEvent);
}

/// Owns the lifecycle of one player overlay
pub struct PlaybackSessionController {
    resolver: MediaReferenceResolver,
    session: PlaybackSession,
    generation: u64,
    load_timeout: Option<Duration>,
    loading_since: Option<Instant>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl fmt::Debug for PlaybackSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSessionController")
            .field("resolver", &self.resolver)
            .field("session", &self.session)
            .field("generation", &self.generation)
            .field("load_timeout", &self.load_timeout)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PlaybackSessionController {
    /// Create a closed controller
    pub fn new(resolver: MediaReferenceResolver) -> Self {
        Self {
            resolver,
            session: PlaybackSession::default(),
            generation: 0,
            load_timeout: None,
            loading_since: None,
            observers: Vec::new(),
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(MediaReferenceResolver::from_config(config)).with_load_timeout(config.load_timeout)
    }

    /// Report loads still pending after `timeout` as failed
    pub fn with_load_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn active_item(&self) -> Option<&MediaItem> {
        self.session.active_item.as_ref()
    }

    pub fn resolved(&self) -> Option<&ResolvedMedia> {
        self.session.resolved.as_ref()
    }

    pub fn requested_slot(&self) -> Option<MediaSlot> {
        self.session.requested_slot
    }

    pub fn failure(&self) -> Option<&PlaybackFailure> {
        self.session.failure.as_ref()
    }

    pub fn current_ticket(&self) -> Option<&LoadTicket> {
        self.session.ticket.as_ref()
    }

    pub fn resolver(&self) -> &MediaReferenceResolver {
        &self.resolver
    }

    /// Start loading `slot` of `item`
    ///
    /// Legal from any state; an open on an already open overlay supersedes
    /// the previous load. When the slot holds nothing usable the session
    /// goes straight to `Error` with [`PlaybackFailure::NoMedia`].
    pub fn open(&mut self, item: MediaItem, slot: MediaSlot) -> LoadTicket {
        let resolved = self.resolver.resolve_slot(&item, slot);

        self.generation += 1;
        let ticket = LoadTicket {
            item_id: item.id.clone(),
            generation: self.generation,
        };

        info!(
            "Opening {} of item {} ({})",
            slot, item.id, resolved.source_kind
        );

        let available = resolved.is_available();
        self.session.active_item = Some(item);
        self.session.resolved = Some(resolved);
        self.session.requested_slot = Some(slot);
        self.session.failure = None;
        self.session.ticket = Some(ticket.clone());
        self.loading_since = Some(Instant::now());
        self.transition(SessionState::Loading);

        if !available {
            self.fail(PlaybackFailure::NoMedia);
        }

        ticket
    }

    /// Renderer reported it can play
    pub fn on_ready(&mut self, ticket: &LoadTicket) -> SignalOutcome {
        if let Err(ignored) = self.check_ticket(ticket) {
            return self.ignore("ready", ignored);
        }

        if self.session.state != SessionState::Loading {
            return self.ignore("ready", IgnoredSignal::WrongState(self.session.state));
        }

        self.loading_since = None;
        self.transition(SessionState::Ready);
        SignalOutcome::Applied
    }

    /// Renderer reported a failure, while loading or during playback
    pub fn on_error(&mut self, ticket: &LoadTicket, reason: Option<String>) -> SignalOutcome {
        if let Err(ignored) = self.check_ticket(ticket) {
            return self.ignore("error", ignored);
        }

        match self.session.state {
            SessionState::Loading | SessionState::Ready => {
                if let Some(reason) = reason.as_deref() {
                    warn!("Player failed for item {}: {}", ticket.item_id, reason);
                }
                self.fail(PlaybackFailure::Playback { reason });
                SignalOutcome::Applied
            }
            state => self.ignore("error", IgnoredSignal::WrongState(state)),
        }
    }

    /// Report the pending load as failed once the timeout has elapsed
    ///
    /// Returns whether the session moved to `Error`. Without a configured
    /// timeout a load may stay pending forever.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        let (Some(timeout), Some(since)) = (self.load_timeout, self.loading_since) else {
            return false;
        };

        if self.session.state != SessionState::Loading
            || now.saturating_duration_since(since) < timeout
        {
            return false;
        }

        warn!("Load timed out after {:?}", timeout);
        self.fail(PlaybackFailure::TimedOut(timeout));
        true
    }

    /// Close the overlay, cancelling any pending load. Idempotent.
    pub fn close(&mut self) {
        if self.session.state == SessionState::Closed {
            return;
        }

        if self.session.state == SessionState::Loading {
            debug!("Closing while loading, pending load cancelled");
        }

        self.loading_since = None;
        self.session.active_item = None;
        self.session.resolved = None;
        self.session.requested_slot = None;
        self.session.failure = None;
        self.session.ticket = None;
        self.transition(SessionState::Closed);
    }

    fn check_ticket(&self, ticket: &LoadTicket) -> Result<(), IgnoredSignal> {
        match self.session.ticket.as_ref() {
            None => Err(IgnoredSignal::Closed),
            Some(current) if current != ticket => Err(IgnoredSignal::Stale),
            Some(_) => Ok(()),
        }
    }

    fn ignore(&self, signal: &str, reason: IgnoredSignal) -> SignalOutcome {
        debug!("Ignoring {} signal: {:?}", signal, reason);
        SignalOutcome::Ignored(reason)
    }

    fn fail(&mut self, failure: PlaybackFailure) {
        self.loading_since = None;
        self.session.failure = Some(failure);
        self.transition(SessionState::Error);
    }

    fn transition(&mut self, new_state: SessionState) {
        let old_state = self.session.state;
        if !old_state.can_transition_to(new_state) {
            warn!(
                "Rejected session transition from {} to {}",
                old_state, new_state
            );
            return;
        }

        self.session.state = new_state;
        debug!("Session state changed from {} to {}", old_state, new_state);

        let event = SessionEvent::StateChanged {
            old_state,
            new_state,
        };
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}
