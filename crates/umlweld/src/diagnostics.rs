//! Render-time diagnostics: anomaly classification and execution modes.
//!
//! Every render call owns a private [`RenderDiagnostics`] accumulator, so
//! concurrent renders over unrelated diagrams need no synchronization. Two
//! independent flags fix the execution mode at construction:
//!
//! - `strict` — the first anomaly aborts the walk with a [`RenderFailure`];
//!   no partial text is returned.
//! - `ignore_non_fatal` — non-fatal anomalies are rendered best-effort
//!   without being recorded or blocking; fatal anomalies are always
//!   recorded.
//!
//! The accumulator moves `Clean → Visiting → {Clean | Faulted}` across a
//! walk. [`RenderDiagnostics::clear_errors`] resets to `Clean` without
//! discarding text the caller already received.

use std::fmt;

use thiserror::Error;

/// Classification of a reconstruction anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// The node cannot be rendered at all (an unparsed member line).
    Fatal,
    /// Enough structure survives for a best-effort line (an attribute
    /// missing its type).
    NonFatal,
}

/// A recorded reconstruction anomaly with its formatted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    kind: AnomalyKind,
    message: String,
}

impl Anomaly {
    fn new(kind: AnomalyKind, detail: &str) -> Self {
        Self {
            kind,
            message: format!("PlantUML Syntax error: {detail}"),
        }
    }

    pub fn kind(&self) -> AnomalyKind {
        self.kind
    }

    pub fn is_fatal(&self) -> bool {
        self.kind == AnomalyKind::Fatal
    }

    /// The formatted message, prefixed `PlantUML Syntax error:`.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Raised by the first anomaly in strict mode; aborts the whole render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderFailure {
    message: String,
}

impl RenderFailure {
    /// The formatted message of the anomaly that aborted the render.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Where a render walk currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitState {
    /// No walk in progress and no anomalies recorded.
    #[default]
    Clean,
    /// A walk is in progress.
    Visiting,
    /// The last walk recorded at least one anomaly.
    Faulted,
}

/// Per-render-call anomaly accumulator.
#[derive(Debug, Default)]
pub struct RenderDiagnostics {
    strict: bool,
    ignore_non_fatal: bool,
    state: VisitState,
    errors: Vec<Anomaly>,
}

impl RenderDiagnostics {
    /// Create an accumulator with the given execution-mode flags.
    pub fn new(strict: bool, ignore_non_fatal: bool) -> Self {
        Self {
            strict,
            ignore_non_fatal,
            state: VisitState::Clean,
            errors: Vec::new(),
        }
    }

    /// Mark the start of a walk.
    pub(crate) fn begin(&mut self) {
        self.state = VisitState::Visiting;
    }

    /// Mark the end of a walk; the state reflects whether anomalies were
    /// recorded along the way.
    pub(crate) fn finish(&mut self) {
        self.state = if self.errors.is_empty() {
            VisitState::Clean
        } else {
            VisitState::Faulted
        };
    }

    /// Record a fatal anomaly. Aborts in strict mode.
    pub(crate) fn fatal(&mut self, detail: impl Into<String>) -> Result<(), RenderFailure> {
        self.record(AnomalyKind::Fatal, &detail.into())
    }

    /// Record a non-fatal anomaly. Aborts in strict mode unless non-fatal
    /// anomalies are ignored, in which case it is a no-op.
    pub(crate) fn non_fatal(&mut self, detail: impl Into<String>) -> Result<(), RenderFailure> {
        if self.ignore_non_fatal {
            return Ok(());
        }
        self.record(AnomalyKind::NonFatal, &detail.into())
    }

    fn record(&mut self, kind: AnomalyKind, detail: &str) -> Result<(), RenderFailure> {
        let anomaly = Anomaly::new(kind, detail);
        let message = anomaly.message.clone();
        self.errors.push(anomaly);
        if self.strict {
            self.state = VisitState::Faulted;
            return Err(RenderFailure { message });
        }
        Ok(())
    }

    /// Append an already-formatted message as a non-fatal entry.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(Anomaly {
            kind: AnomalyKind::NonFatal,
            message: message.into(),
        });
    }

    /// `true` whenever any anomaly is recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All recorded anomalies in encounter order.
    pub fn errors(&self) -> &[Anomaly] {
        &self.errors
    }

    /// The subset of recorded anomalies classified fatal.
    pub fn fatal_errors(&self) -> impl Iterator<Item = &Anomaly> {
        self.errors.iter().filter(|a| a.is_fatal())
    }

    /// Drop all recorded anomalies and reset to `Clean`.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.state = VisitState::Clean;
    }

    pub fn state(&self) -> VisitState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_mode_accumulates_and_continues() {
        let mut diag = RenderDiagnostics::new(false, false);
        diag.begin();
        assert_eq!(diag.state(), VisitState::Visiting);

        diag.fatal("unrecognized member `???`").unwrap();
        diag.non_fatal("attribute `x` has no type").unwrap();
        diag.finish();

        assert_eq!(diag.state(), VisitState::Faulted);
        assert!(diag.has_errors());
        assert_eq!(diag.errors().len(), 2);
        assert_eq!(diag.fatal_errors().count(), 1);
        assert!(
            diag.errors()[0]
                .message()
                .starts_with("PlantUML Syntax error: ")
        );
    }

    #[test]
    fn strict_mode_aborts_on_first_anomaly() {
        let mut diag = RenderDiagnostics::new(true, false);
        diag.begin();
        let failure = diag.non_fatal("attribute `x` has no type").unwrap_err();
        assert_eq!(
            failure.message(),
            "PlantUML Syntax error: attribute `x` has no type"
        );
        assert_eq!(diag.state(), VisitState::Faulted);
    }

    #[test]
    fn strict_mode_can_exempt_non_fatal_anomalies() {
        let mut diag = RenderDiagnostics::new(true, true);
        diag.begin();
        assert!(diag.non_fatal("attribute `x` has no type").is_ok());
        assert!(!diag.has_errors());
        assert!(diag.fatal("unrecognized member").is_err());
    }

    #[test]
    fn ignore_non_fatal_still_records_fatal() {
        let mut diag = RenderDiagnostics::new(false, true);
        diag.begin();
        diag.non_fatal("minor").unwrap();
        diag.fatal("major").unwrap();
        diag.finish();

        assert_eq!(diag.errors().len(), 1);
        assert!(diag.errors()[0].is_fatal());
    }

    #[test]
    fn clear_errors_resets_to_clean() {
        let mut diag = RenderDiagnostics::new(false, false);
        diag.begin();
        diag.fatal("problem").unwrap();
        diag.finish();
        assert_eq!(diag.state(), VisitState::Faulted);

        diag.clear_errors();
        assert!(!diag.has_errors());
        assert_eq!(diag.state(), VisitState::Clean);
    }
}
