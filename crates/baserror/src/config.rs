//! Stack capture configuration
//!
//! Compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Environment variables (read once, on first capture)
//! 2. Library defaults
//!
//! # Example
//!
//! ```rust
//! use baserror::StackConfig;
//!
//! let config = StackConfig::new().stack_depth(5).scan_limit(20);
//! assert!(config.validate().is_ok());
//! ```

use std::sync::OnceLock;

use thiserror::Error;

use crate::env::{env_get, env_get_bool};

/// Library defaults.
pub mod defaults {
    /// Frames kept by `with_stack()`.
    pub const STACK_DEPTH: usize = 3;
    /// Frames examined while looking for the caller boundary.
    pub const SCAN_LIMIT: usize = 15;
    /// Whether stack capture runs at all.
    pub const CAPTURE: bool = true;

    /// Upper bound accepted for `stack_depth`.
    pub const MAX_STACK_DEPTH: usize = 256;
    /// Upper bound accepted for `scan_limit`.
    pub const MAX_SCAN_LIMIT: usize = 128;
}

/// Stack capture configuration with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
    /// Default number of frames captured by `with_stack()`
    pub stack_depth: usize,
    /// Maximum frames scanned for the library/caller boundary
    pub scan_limit: usize,
    /// Enable stack capture
    pub capture: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl StackConfig {
    /// Create config from defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `BASERR_STACK_DEPTH` - Frames kept by `with_stack()`
    /// - `BASERR_SCAN_LIMIT` - Frames scanned for the caller boundary
    /// - `BASERR_CAPTURE` - Enable stack capture (0/1)
    pub fn from_env() -> Self {
        Self {
            stack_depth: env_get("BASERR_STACK_DEPTH", defaults::STACK_DEPTH),
            scan_limit: env_get("BASERR_SCAN_LIMIT", defaults::SCAN_LIMIT),
            capture: env_get_bool("BASERR_CAPTURE", defaults::CAPTURE),
        }
    }

    /// Create config with explicit defaults (no env override).
    pub fn new() -> Self {
        Self {
            stack_depth: defaults::STACK_DEPTH,
            scan_limit: defaults::SCAN_LIMIT,
            capture: defaults::CAPTURE,
        }
    }

    // Builder methods

    pub fn stack_depth(mut self, depth: usize) -> Self {
        self.stack_depth = depth;
        self
    }

    pub fn scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = limit;
        self
    }

    pub fn capture(mut self, enable: bool) -> Self {
        self.capture = enable;
        self
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_depth == 0 {
            return Err(ConfigError::InvalidValue("stack_depth must be > 0"));
        }
        if self.stack_depth > defaults::MAX_STACK_DEPTH {
            return Err(ConfigError::InvalidValue("stack_depth must be <= 256"));
        }
        if self.scan_limit == 0 {
            return Err(ConfigError::InvalidValue("scan_limit must be > 0"));
        }
        if self.scan_limit > defaults::MAX_SCAN_LIMIT {
            return Err(ConfigError::InvalidValue("scan_limit must be <= 128"));
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    InvalidValue(&'static str),
}

static GLOBAL: OnceLock<StackConfig> = OnceLock::new();

/// Process-wide configuration, read from the environment on first use.
///
/// An invalid environment falls back to library defaults.
pub fn global() -> &'static StackConfig {
    GLOBAL.get_or_init(|| {
        let config = StackConfig::from_env();
        match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!(error = %err, ?config, "ignoring BASERR_* overrides");
                StackConfig::new()
            }
        }
    })
}
