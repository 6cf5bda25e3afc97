//! Viewer identity for Mob House.
//!
//! This crate handles everything between "the viewer typed something
//! into the sign-in dialog" and "the gate knows who they are":
//!
//! 1. **Form validation** — [`SignInForm`] / [`SignUpForm`] turn raw input
//!    into [`Credentials`], rejecting mismatched passwords and blank
//!    fields locally so bad input never reaches the gate.
//! 2. **Authentication** — the [`Authenticator`] trait decides
//!    [`AuthOutcome::Authenticated`] or [`AuthOutcome::Rejected`].
//!    [`DemoAuthenticator`] accepts everyone after a short delay.
//! 3. **Identity state** — [`IdentityState`], the Anonymous ⇄
//!    Authenticated machine the gate owns.

#![allow(async_fn_in_trait)]

mod auth;
mod credentials;
mod error;
mod identity;

pub use auth::{AuthOutcome, Authenticator, DemoAuthenticator, Profile};
pub use credentials::{Credentials, SignInForm, SignUpForm};
pub use error::{CredentialError, SessionError};
pub use identity::{IdentityState, SessionConfig};
