//! Engine configuration.
//!
//! `EngineConfig` controls how the [`ContainerEngine`](crate::ContainerEngine)
//! seeds its container table, whether cookie swaps are serialized per domain,
//! and which URLs it considers "web" pages at all.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gosub_containers::EngineConfig;
//! let cfg = EngineConfig::default();
//! assert!(cfg.serialize_swaps);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use gosub_containers::EngineConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EngineConfig::builder()
//!     .seed_default_containers(false)
//!     .new_tab_url("about:blank")
//!     .web_schemes(["https"])
//!     .build()?;
//! assert_eq!(cfg.web_schemes, vec!["https".to_string()]);
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `seed_default_containers`: write the built-in container set on first run (default: true).
//! - `serialize_swaps`: serialize swaps of the same domain behind a per-domain lock
//!   (default: true). When disabled, two overlapping swaps of one domain race on the
//!   ownership ledger and the last writer wins until the next event re-evaluates it.
//! - `new_tab_url`: URL used for container tabs opened without one (default: `chrome://newtab`).
//! - `web_schemes`: URL schemes subject to site policies and cookie swapping
//!   (default: `http`, `https`).
//! - `channel_capacity`: capacity of the command channel and event bus.

use crate::engine::errors::ConfigError;
use crate::engine::DEFAULT_CHANNEL_CAPACITY;

const DEFAULT_NEW_TAB_URL: &str = "chrome://newtab";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub seed_default_containers: bool,
    pub serialize_swaps: bool,
    pub new_tab_url: String,
    pub web_schemes: Vec<String>,
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed_default_containers: true,
            serialize_swaps: true,
            new_tab_url: DEFAULT_NEW_TAB_URL.to_string(),
            web_schemes: vec!["http".to_string(), "https".to_string()],
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    inner: EngineConfig,
}

impl EngineConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut EngineConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn seed_default_containers(self, on: bool) -> Self { self.map(|c| c.seed_default_containers = on) }
    pub fn serialize_swaps(self, on: bool) -> Self { self.map(|c| c.serialize_swaps = on) }
    pub fn new_tab_url<S: Into<String>>(self, url: S) -> Self { self.map(|c| c.new_tab_url = url.into()) }
    pub fn channel_capacity(self, n: usize) -> Self { self.map(|c| c.channel_capacity = n) }

    pub fn web_schemes<I, S>(self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schemes = schemes.into_iter().map(|s| s.into().to_ascii_lowercase()).collect();
        self.map(|c| c.web_schemes = schemes)
    }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut EngineConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

fn validate(c: &EngineConfig) -> Result<(), ConfigError> {
    if c.web_schemes.is_empty() {
        return Err(ConfigError::NoWebSchemes);
    }
    if c.channel_capacity == 0 {
        return Err(ConfigError::ZeroChannelCapacity);
    }
    if c.new_tab_url.trim().is_empty() {
        return Err(ConfigError::EmptyNewTabUrl);
    }
    Ok(())
}
