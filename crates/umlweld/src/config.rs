//! Configuration types for diagram transformation.
//!
//! All types implement [`serde::Deserialize`] so configuration can be
//! loaded from external sources (the CLI loads TOML). Every field has a
//! default: reconstruct mode, lenient execution, non-fatal anomalies
//! recorded.
//!
//! # Example
//!
//! ```
//! # use umlweld::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.render().strict());
//! ```

use serde::Deserialize;

use crate::RenderMode;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates an [`AppConfig`] with the specified render configuration.
    pub fn new(render: RenderConfig) -> Self {
        Self { render }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }
}

/// Controls which rendering strategy runs and how anomalies are handled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// Default [`RenderMode`] when the caller does not pick one.
    #[serde(default)]
    mode: RenderMode,

    /// Abort on the first anomaly instead of collecting them.
    #[serde(default)]
    strict: bool,

    /// Render non-fatal anomalies best-effort without recording them.
    #[serde(default)]
    ignore_non_fatal: bool,
}

impl RenderConfig {
    /// Creates a [`RenderConfig`] with the specified settings.
    pub fn new(mode: RenderMode, strict: bool, ignore_non_fatal: bool) -> Self {
        Self {
            mode,
            strict,
            ignore_non_fatal,
        }
    }

    /// The default render mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Whether the first anomaly aborts a render.
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Whether non-fatal anomalies go unrecorded.
    pub fn ignore_non_fatal(&self) -> bool {
        self.ignore_non_fatal
    }
}
