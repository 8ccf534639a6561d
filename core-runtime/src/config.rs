//! # Sync Configuration Module
//!
//! Provides configuration management for the catalog reconciliation tools.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `SyncConfig`
//! instance holding everything the remote-facing commands need: platform
//! credentials, the API endpoint, executor pacing and planner options. It
//! enforces fail-fast validation so a misconfigured run stops before the
//! first remote call.
//!
//! ## Required Settings
//!
//! - `Credentials` - API key and secret for the video platform
//!
//! ## Optional Settings (with defaults)
//!
//! - `api_base_url` - defaults to the public v1 endpoint
//! - `BackoffConfig` - executor pacing constants
//! - `PlannerConfig` - download/image URLs and text limits
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{Credentials, SyncConfig};
//!
//! let config = SyncConfig::builder()
//!     .credentials(Credentials::from_env()?)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! Missing credentials are reported as [`Error::CapabilityMissing`] so the
//! command line can exit with a distinct status.

use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Environment variable holding the platform API key
pub const API_KEY_ENV: &str = "JWPLAYER_API_KEY";

/// Environment variable holding the platform API secret
pub const API_SECRET_ENV: &str = "JWPLAYER_API_SECRET";

/// Default platform API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.jwplatform.com/v1";

/// Default legacy image server endpoint
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://sms.cam.ac.uk/image";

/// Maximum title/description length accepted by the platform
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 4096;

// ============================================================================
// Credentials
// ============================================================================

/// Platform API credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Read credentials from `JWPLAYER_API_KEY` / `JWPLAYER_API_SECRET`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| credentials_missing_error(name))
        };

        Ok(Self {
            api_key: fetch(API_KEY_ENV)?,
            api_secret: fetch(API_SECRET_ENV)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

fn credentials_missing_error(variable: &str) -> Error {
    Error::CapabilityMissing {
        capability: "Credentials".to_string(),
        message: format!(
            "{} is not set. Export both {} and {} (or put them in a .env file) \
             before running commands that talk to the platform.",
            variable, API_KEY_ENV, API_SECRET_ENV
        ),
    }
}

// ============================================================================
// Executor Pacing
// ============================================================================

/// Pacing constants for the job executor
///
/// One delay value is shared across a whole executor run. It shrinks by
/// `decay` after every success and grows by `growth` after every rate-limit
/// signal, clamped to `[min_delay, max_delay]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the first job
    pub initial_delay: Duration,
    /// Lower bound for the shared delay
    pub min_delay: Duration,
    /// Upper bound for the shared delay
    pub max_delay: Duration,
    /// Multiplier applied after a success (< 1)
    pub decay: f64,
    /// Multiplier applied after a rate-limit signal (> 1)
    pub growth: f64,
    /// Total attempts per job, including the first
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            min_delay: Duration::from_millis(10),
            max_delay: Duration::from_secs(2),
            decay: 0.8,
            growth: 2.0,
            max_attempts: 10,
        }
    }
}

impl BackoffConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_growth(mut self, growth: f64) -> Self {
        self.growth = growth;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Validates the pacing constants
    pub fn validate(&self) -> Result<()> {
        if self.min_delay > self.max_delay {
            return Err(Error::Config(
                "Minimum delay cannot exceed maximum delay".to_string(),
            ));
        }

        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(Error::Config(
                "Decay factor must be in the range (0, 1]".to_string(),
            ));
        }

        if !(self.growth >= 1.0 && self.growth.is_finite()) {
            return Err(Error::Config(
                "Growth factor must be a finite value of at least 1".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(Error::Config(
                "Max attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Planner Options
// ============================================================================

/// Options for building expected remote resources from catalog records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Prefix prepended to media filenames to form download URLs
    pub base_url: String,
    /// Prefix for legacy thumbnail URLs (`<image_base_url>/<image_id>.jpg`)
    pub image_base_url: String,
    /// Number of leading path components stripped from filenames
    pub strip_leading: usize,
    /// Titles and descriptions are truncated to this many characters
    pub max_text_length: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            strip_leading: 0,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }
}

impl PlannerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    pub fn with_strip_leading(mut self, components: usize) -> Self {
        self.strip_leading = components;
        self
    }

    pub fn with_max_text_length(mut self, length: usize) -> Self {
        self.max_text_length = length;
        self
    }

    /// Validates the planner options
    pub fn validate(&self) -> Result<()> {
        if self.max_text_length == 0 {
            return Err(Error::Config(
                "Maximum text length must be greater than 0".to_string(),
            ));
        }

        if self.image_base_url.trim().is_empty() {
            return Err(Error::Config("Image base URL cannot be empty".to_string()));
        }

        Ok(())
    }
}

// ============================================================================
// Top-level Configuration
// ============================================================================

/// Configuration for commands that talk to the video platform
///
/// Use [`SyncConfigBuilder`] to construct instances.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Platform credentials (required)
    pub credentials: Credentials,
    /// Platform API endpoint
    pub api_base_url: String,
    /// Executor pacing
    pub backoff: BackoffConfig,
    /// Planner options
    pub planner: PlannerConfig,
}

impl SyncConfig {
    /// Creates a new builder for constructing a `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(Error::Config(format!(
                "API base URL must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }

        self.backoff.validate()?;
        self.planner.validate()?;

        Ok(())
    }
}

/// Builder for constructing [`SyncConfig`] instances.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    credentials: Option<Credentials>,
    api_base_url: Option<String>,
    backoff: Option<BackoffConfig>,
    planner: Option<PlannerConfig>,
}

impl SyncConfigBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = Some(backoff);
        self
    }

    pub fn planner(mut self, planner: PlannerConfig) -> Self {
        self.planner = Some(planner);
        self
    }

    /// Builds the configuration, validating required settings.
    pub fn build(self) -> Result<SyncConfig> {
        let credentials = self
            .credentials
            .ok_or_else(|| credentials_missing_error(API_KEY_ENV))?;

        let config = SyncConfig {
            credentials,
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            backoff: self.backoff.unwrap_or_default(),
            planner: self.planner.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
