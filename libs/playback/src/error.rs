//! Error types for the playback library

use std::time::Duration;

use thiserror::Error;

/// Errors raised while decoding catalog payloads
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The payload was not valid JSON or its envelope was malformed
    #[error("Catalog decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload is JSON but neither an array nor an API envelope
    #[error("Unexpected catalog shape: {0}")]
    Shape(String),

    /// A record could not be decoded
    #[error("Catalog record {index} is invalid: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The requested catalog kind is not one we know how to project
    #[error("Unknown catalog kind: {0}")]
    UnknownKind(String),
}

/// Type alias for Result with CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Why a playback session ended up in the error state
///
/// These never escape as `Err` values; the session keeps them so the
/// overlay can render the right message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackFailure {
    /// The requested slot had no usable reference
    #[error("Media not available")]
    NoMedia,

    /// The rendering technology reported a failure
    #[error("Could not play media")]
    Playback {
        /// Optional detail forwarded by the player
        reason: Option<String>,
    },

    /// The player never signalled readiness within the configured timeout
    #[error("Media did not load within {0:?}")]
    TimedOut(Duration),
}
