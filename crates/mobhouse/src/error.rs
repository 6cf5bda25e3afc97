//! Unified error type for Mob House.

use mobhouse_catalog::CatalogError;
use mobhouse_gate::GateError;
use mobhouse_protocol::ProtocolError;
use mobhouse_session::{CredentialError, SessionError};

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum MobHouseError {
    /// Encoding or decoding a gate notification failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A form failed validation, or the identity provider failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The gate refused a request or has shut down.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Unknown item, sold-out event, or a bad admin form.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<CredentialError> for MobHouseError {
    fn from(err: CredentialError) -> Self {
        Self::Session(SessionError::from(err))
    }
}
