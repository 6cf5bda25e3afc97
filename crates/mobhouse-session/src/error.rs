//! Error types for the session layer.

/// Errors that can occur while establishing a viewer's identity.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The sign-in or sign-up form failed local validation.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(#[from] CredentialError),

    /// The identity provider could not be reached or answered with
    /// garbage. Distinct from a rejection, which is a normal
    /// [`AuthOutcome`](crate::AuthOutcome).
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Problems found in a sign-in or sign-up form before submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// A required field was empty or only whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address has no `@`, or nothing on one side of it.
    #[error("email address is not valid")]
    InvalidEmail,

    /// Sign-up password and confirmation differ.
    #[error("passwords don't match")]
    PasswordMismatch,
}
