//! `SiteConfig` and the `SiteBuilder` used to start a [`Site`].

use mobhouse_catalog::Catalog;
use mobhouse_gate::GateConfig;
use mobhouse_session::{Authenticator, DemoAuthenticator, SessionConfig};
use serde::{Deserialize, Serialize};

use crate::Site;

/// Everything needed to run the site. Loadable from any serde format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Builder for configuring and starting a [`Site`].
///
/// # Example
///
/// ```rust,no_run
/// use mobhouse::prelude::*;
///
/// # async fn run() {
/// let site = Site::builder()
///     .preview_window_secs(30)
///     .auth_latency_ms(0)
///     .build_demo();
/// # }
/// ```
pub struct SiteBuilder {
    config: SiteConfig,
    catalog: Option<Catalog>,
}

impl SiteBuilder {
    /// Creates a builder with default settings and the sample catalog.
    pub fn new() -> Self {
        Self {
            config: SiteConfig::default(),
            catalog: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: SiteConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the gate configuration.
    pub fn gate_config(mut self, config: GateConfig) -> Self {
        self.config.gate = config;
        self
    }

    /// Sets the anonymous preview window.
    pub fn preview_window_secs(mut self, secs: u64) -> Self {
        self.config.gate.preview.window_secs = secs;
        self
    }

    /// Sets the demo authenticator's simulated round-trip.
    pub fn auth_latency_ms(mut self, millis: u64) -> Self {
        self.config.session.auth_latency_ms = millis;
        self
    }

    /// Starts from this catalog instead of the sample lineup.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Starts the site with the given authenticator.
    ///
    /// Spawns the session gate, so it must be called from inside a Tokio
    /// runtime.
    pub fn build<A: Authenticator>(self, auth: A) -> Site<A> {
        let catalog = self.catalog.unwrap_or_else(Catalog::sample);
        Site::start(self.config.gate, auth, catalog)
    }

    /// Starts the site with the [`DemoAuthenticator`], configured from
    /// the session settings.
    pub fn build_demo(self) -> Site<DemoAuthenticator> {
        let auth = DemoAuthenticator::new(self.config.session.clone());
        self.build(auth)
    }
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters_update_config() {
        let builder = SiteBuilder::new()
            .preview_window_secs(42)
            .auth_latency_ms(5);

        assert_eq!(builder.config.gate.preview.window_secs, 42);
        assert_eq!(builder.config.session.auth_latency_ms, 5);
        assert_eq!(
            builder.config.gate.command_buffer,
            GateConfig::DEFAULT_COMMAND_BUFFER
        );
    }

    #[test]
    fn test_site_config_default_preview_is_five_minutes() {
        let config = SiteConfig::default();
        assert_eq!(config.gate.preview.window_secs, 300);
    }
}
