//! Error types for the preview layer.

/// Errors that can occur when starting a preview.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    /// The viewer is signed in, so there is nothing to preview: play the
    /// content unrestricted instead.
    #[error("viewer is already authenticated; play without a preview")]
    AlreadyAuthenticated,
}
