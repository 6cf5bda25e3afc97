//! Error types for the catalog.

use mobhouse_protocol::{DjId, EventId, MixId};

/// Errors from catalog lookups and admin edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("no DJ with id {0}")]
    UnknownDj(DjId),

    #[error("no mix with id {0}")]
    UnknownMix(MixId),

    #[error("no event with id {0}")]
    UnknownEvent(EventId),

    /// Every ticket for the event has been sold.
    #[error("{0} is sold out")]
    SoldOut(EventId),

    /// An admin form was missing a field or had an out-of-range value.
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    /// The highest id is already in use, so no new record can be added.
    #[error("no {0} ids left")]
    IdsExhausted(&'static str),

    /// A mix length that isn't `MM:SS` or `H:MM:SS`.
    #[error("invalid mix length {0:?}, expected MM:SS")]
    InvalidLength(String),
}
