//! Error types for the gate layer.

use mobhouse_preview::PreviewError;
use mobhouse_session::SessionError;

/// Errors that can occur when talking to the session gate.
///
/// A denied privilege is not here: `require_privilege` answers
/// [`Access::Denied`](mobhouse_protocol::Access) as a normal value.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A preview was requested for a signed-in viewer. Play the content
    /// unrestricted instead.
    #[error("viewer is already authenticated; no preview needed")]
    AlreadyAuthenticated,

    /// The authenticator refused the credentials. Identity is unchanged.
    #[error("sign-in rejected: {0}")]
    Rejected(String),

    /// The authenticator itself failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The gate actor has shut down (the page was navigated away from).
    #[error("session gate is unavailable")]
    Unavailable,
}

impl From<PreviewError> for GateError {
    fn from(err: PreviewError) -> Self {
        match err {
            PreviewError::AlreadyAuthenticated => Self::AlreadyAuthenticated,
        }
    }
}
