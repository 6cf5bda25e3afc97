//! Authentication hook for establishing a viewer's identity.
//!
//! Mob House has no account backend of its own. The [`Authenticator`]
//! trait is the extension point where a real provider plugs in: it looks
//! at validated [`Credentials`] and answers [`AuthOutcome::Authenticated`]
//! or [`AuthOutcome::Rejected`]. The gate treats both as normal outcomes.
//!
//! [`DemoAuthenticator`] is what the site ships with: it waits for a
//! simulated round-trip and then accepts everyone.

use std::future::Future;

use mobhouse_protocol::{Identity, ViewerId};
use rand::Rng;

use crate::{Credentials, SessionConfig, SessionError};

/// The profile a successful authentication yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub viewer_id: ViewerId,
    pub display_name: String,
    pub email: String,
}

impl From<Profile> for Identity {
    fn from(profile: Profile) -> Self {
        Identity::Authenticated {
            viewer_id: profile.viewer_id,
            display_name: profile.display_name,
            email: profile.email,
        }
    }
}

/// What the identity provider decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The credentials are good; here's who the viewer is.
    Authenticated(Profile),
    /// The credentials were understood but refused.
    Rejected { reason: String },
}

/// Decides whether credentials identify a viewer.
///
/// `Send + Sync + 'static` because the gate handle holding it is cloned
/// into every component that can trigger a sign-in.
///
/// # Example
///
/// ```rust
/// use mobhouse_protocol::ViewerId;
/// use mobhouse_session::{AuthOutcome, Authenticator, Credentials, Profile, SessionError};
///
/// /// Only lets in addresses from one domain.
/// struct DomainAuthenticator;
///
/// impl Authenticator for DomainAuthenticator {
///     async fn authenticate(
///         &self,
///         credentials: &Credentials,
///     ) -> Result<AuthOutcome, SessionError> {
///         if credentials.email().ends_with("@mobhouse.example") {
///             Ok(AuthOutcome::Authenticated(Profile {
///                 viewer_id: ViewerId(1),
///                 display_name: credentials.email().to_string(),
///                 email: credentials.email().to_string(),
///             }))
///         } else {
///             Ok(AuthOutcome::Rejected { reason: "members only".into() })
///         }
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Checks the credentials.
    ///
    /// # Returns
    /// - `Ok(AuthOutcome::Authenticated)` — sign-in succeeded
    /// - `Ok(AuthOutcome::Rejected)` — credentials refused
    /// - `Err(SessionError::ProviderUnavailable)` — couldn't decide
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthOutcome, SessionError>> + Send;
}

/// Accepts every well-formed credential after `auth_latency`.
///
/// The display name is the sign-up name, or for a sign-in the part of
/// the email before the `@`.
#[derive(Debug, Clone, Default)]
pub struct DemoAuthenticator {
    config: SessionConfig,
}

impl DemoAuthenticator {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl Authenticator for DemoAuthenticator {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthOutcome, SessionError> {
        let latency = self.config.auth_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let display_name = match credentials.name() {
            Some(name) => name.to_string(),
            None => credentials
                .email()
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        };

        let profile = Profile {
            viewer_id: ViewerId(rand::rng().random()),
            display_name,
            email: credentials.email().to_string(),
        };

        tracing::debug!(
            viewer_id = %profile.viewer_id,
            sign_up = credentials.is_sign_up(),
            "demo authenticator accepted credentials"
        );

        Ok(AuthOutcome::Authenticated(profile))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{SignInForm, SignUpForm};

    fn instant_authenticator() -> DemoAuthenticator {
        DemoAuthenticator::new(SessionConfig { auth_latency_ms: 0 })
    }

    #[tokio::test]
    async fn test_demo_sign_in_uses_email_local_part_as_name() {
        let creds = SignInForm {
            email: "njeri@example.com".into(),
            password: "pw".into(),
        }
        .validate()
        .unwrap();

        let outcome = instant_authenticator().authenticate(&creds).await.unwrap();

        match outcome {
            AuthOutcome::Authenticated(profile) => {
                assert_eq!(profile.display_name, "njeri");
                assert_eq!(profile.email, "njeri@example.com");
            }
            other => panic!("expected Authenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_demo_sign_up_uses_given_name() {
        let creds = SignUpForm {
            name: "Njeri Wambui".into(),
            email: "njeri@example.com".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
        }
        .validate()
        .unwrap();

        let outcome = instant_authenticator().authenticate(&creds).await.unwrap();

        assert!(matches!(
            outcome,
            AuthOutcome::Authenticated(ref p) if p.display_name == "Njeri Wambui"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_authenticator_waits_configured_latency() {
        let auth = DemoAuthenticator::new(SessionConfig {
            auth_latency_ms: 1_000,
        });
        let creds = SignInForm {
            email: "a@b.c".into(),
            password: "pw".into(),
        }
        .validate()
        .unwrap();

        let start = tokio::time::Instant::now();
        auth.authenticate(&creds).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1_000));
    }

    #[test]
    fn test_profile_into_identity_is_authenticated() {
        let identity: Identity = Profile {
            viewer_id: ViewerId(3),
            display_name: "baraka".into(),
            email: "baraka@example.com".into(),
        }
        .into();

        assert!(identity.is_authenticated());
        assert_eq!(identity.display_name(), Some("baraka"));
    }
}
