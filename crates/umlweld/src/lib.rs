//! # umlweld
//!
//! A transformation engine for PlantUML class diagrams: parse a diagram
//! into a structured model, then re-render it canonically, deduplicate
//! repeated declarations, or union several diagrams into one.
//!
//! The central type is [`DiagramPipeline`], which ties the parser, the
//! render visitors, and the configuration together:
//!
//! ```
//! use umlweld::{DiagramPipeline, RenderMode};
//!
//! let pipeline = DiagramPipeline::default();
//! let diagram = pipeline.parse("@startuml\nclass Foo\nclass Foo\n@enduml\n")?;
//! let report = pipeline.render(&diagram, RenderMode::Deduplicate)?;
//! assert_eq!(report.text(), "@startuml\nclass Foo\n@enduml\n");
//! # Ok::<(), umlweld::WeldError>(())
//! ```
//!
//! Lower-level pieces are exposed for callers that need finer control:
//! the [`Reconstructor`] and [`Deduplicator`] visitors, the [`sum`]
//! union, and the re-exported [`model`], [`normalize`], and [`render`]
//! modules from the core crate.

pub mod config;
mod dedupe;
mod diagnostics;
mod error;
mod merge;
mod reconstruct;

use serde::Deserialize;

pub use dedupe::{Deduplicator, fold};
pub use diagnostics::{Anomaly, AnomalyKind, RenderFailure, VisitState};
pub use error::WeldError;
pub use merge::sum;
pub use reconstruct::Reconstructor;
pub use umlweld_core::{model, normalize, render};

use config::AppConfig;
use model::Diagram;
use normalize::normalize as normalize_text;

/// Which rendering strategy a [`DiagramPipeline::render`] call runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Re-render every declaration exactly once per node, duplicates kept.
    #[default]
    Reconstruct,
    /// Merge repeated declarations by identity, then render.
    Deduplicate,
}

/// The outcome of a successful render: the output text plus any
/// anomalies recorded along the way.
///
/// A lenient render succeeds even when the input holds unrecognized
/// members; the skipped pieces surface here as [`Anomaly`] records.
#[derive(Debug, Clone)]
pub struct RenderReport {
    text: String,
    errors: Vec<Anomaly>,
}

impl RenderReport {
    /// The rendered, normalized diagram text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the report and returns the rendered text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// `true` when any anomaly was recorded during the render.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All recorded anomalies in encounter order.
    pub fn errors(&self) -> &[Anomaly] {
        &self.errors
    }

    /// The fatal subset of the recorded anomalies.
    pub fn fatal_errors(&self) -> impl Iterator<Item = &Anomaly> {
        self.errors.iter().filter(|a| a.is_fatal())
    }
}

/// Parses and renders diagrams according to an [`AppConfig`].
///
/// The pipeline itself is stateless between calls; the render visitors
/// it builds are per-call, so one pipeline can serve any number of
/// documents.
#[derive(Debug, Clone, Default)]
pub struct DiagramPipeline {
    config: AppConfig,
}

impl DiagramPipeline {
    /// Creates a pipeline with the specified configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// The render mode the configuration selects by default.
    pub fn default_mode(&self) -> RenderMode {
        self.config.render().mode()
    }

    /// Normalizes and parses diagram source text.
    ///
    /// # Errors
    ///
    /// Returns [`WeldError::Parse`] when the source has structural
    /// problems; the error carries the normalized source so callers can
    /// report diagnostics with accurate positions.
    pub fn parse(&self, source: &str) -> Result<Diagram, WeldError> {
        let normalized = normalize_text(source);
        umlweld_parser::parse(&normalized)
            .map_err(|err| WeldError::new_parse_error(err, normalized))
    }

    /// Renders a diagram with the given mode under the configured
    /// execution flags.
    ///
    /// # Errors
    ///
    /// A strict configuration aborts on the first anomaly with
    /// [`WeldError::Reconstruction`]. Lenient renders always succeed;
    /// their anomalies land in the returned [`RenderReport`].
    pub fn render(&self, diagram: &Diagram, mode: RenderMode) -> Result<RenderReport, WeldError> {
        let render = self.config.render();
        match mode {
            RenderMode::Reconstruct => {
                let mut visitor = Reconstructor::new(render.strict(), render.ignore_non_fatal());
                let text = visitor.render(diagram)?;
                Ok(RenderReport {
                    text,
                    errors: visitor.errors().to_vec(),
                })
            }
            RenderMode::Deduplicate => {
                let mut visitor = Deduplicator::new(render.strict(), render.ignore_non_fatal());
                let text = visitor.render(diagram)?;
                Ok(RenderReport {
                    text,
                    errors: visitor.errors().to_vec(),
                })
            }
        }
    }

    /// Unions the given diagrams into one, in argument order, without
    /// deduplication.
    pub fn merge<'a>(&self, diagrams: impl IntoIterator<Item = &'a Diagram>) -> Diagram {
        sum(diagrams)
    }
}
