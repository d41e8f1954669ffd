//! Canonical re-rendering of a parsed diagram.
//!
//! The reconstructor walks a [`Diagram`] and emits normalized source text,
//! preserving every declaration exactly once per node. Emission order is
//! fixed regardless of source order: opening marker, classes, enums,
//! connections, hide declarations, closing marker, then a final
//! normalization pass. With pre-normalized canonical input this round-trips
//! byte-for-byte.

use log::debug;

use umlweld_core::{
    model::{ClassDecl, Connection, Diagram, EnumDecl, HideDecl, Member},
    normalize::normalize,
    render,
};

use crate::diagnostics::{Anomaly, RenderDiagnostics, RenderFailure, VisitState};

/// The plain reconstruction visitor.
///
/// Holds the per-call [`RenderDiagnostics`]; a fresh instance (or a
/// [`clear_errors`](Reconstructor::clear_errors) call) gives a clean slate.
#[derive(Debug, Default)]
pub struct Reconstructor {
    diag: RenderDiagnostics,
}

impl Reconstructor {
    /// Create a reconstructor with the given execution-mode flags.
    pub fn new(strict: bool, ignore_non_fatal: bool) -> Self {
        Self {
            diag: RenderDiagnostics::new(strict, ignore_non_fatal),
        }
    }

    /// A lenient reconstructor that records every anomaly.
    pub fn lenient() -> Self {
        Self::new(false, false)
    }

    /// Render the diagram to normalized text.
    ///
    /// # Errors
    ///
    /// In strict mode the first anomaly aborts with a [`RenderFailure`];
    /// no partial text is returned. Lenient renders always succeed and
    /// expose their anomalies via [`errors`](Reconstructor::errors).
    pub fn render(&mut self, diagram: &Diagram) -> Result<String, RenderFailure> {
        self.diag.begin();
        let mut out = String::from("@startuml\n");
        self.emit_classes(&mut out, &diagram.classes)?;
        self.emit_enums(&mut out, &diagram.enums);
        self.emit_connections(&mut out, &diagram.connections);
        self.emit_hides(&mut out, &diagram.hides);
        out.push_str("@enduml\n");
        self.diag.finish();
        debug!(anomalies = self.diag.errors().len(); "Reconstruction finished");
        Ok(normalize(&out))
    }

    pub(crate) fn emit_classes(
        &mut self,
        out: &mut String,
        classes: &[ClassDecl],
    ) -> Result<(), RenderFailure> {
        for class in classes {
            self.emit_class(out, class)?;
        }
        Ok(())
    }

    /// Emit one class: header line, then a brace block when any member
    /// renders. Attributes come first, then methods, each in source order;
    /// unparsed member lines produce a fatal anomaly and no output.
    fn emit_class(&mut self, out: &mut String, class: &ClassDecl) -> Result<(), RenderFailure> {
        let mut lines = Vec::new();
        for member in &class.members {
            if let Member::Attribute(attr) = member {
                if attr.ty.is_none() {
                    self.diag.non_fatal(format!(
                        "attribute `{}` in class `{}` has no type",
                        attr.name, class.name
                    ))?;
                }
                lines.push(render::attribute(attr));
            }
        }
        for member in &class.members {
            match member {
                Member::Attribute(_) => {}
                Member::Method(method) => lines.push(render::method(method)),
                Member::Unparsed(text) => self.diag.fatal(format!(
                    "unrecognized member `{}` in class `{}`",
                    text, class.name
                ))?,
            }
        }

        out.push_str(&render::class_header(class));
        if !lines.is_empty() {
            out.push_str(" {\n");
            for line in &lines {
                out.push_str(render::INDENT);
                out.push_str(line);
                out.push('\n');
            }
            out.push('}');
        }
        out.push('\n');
        Ok(())
    }

    pub(crate) fn emit_enums(&mut self, out: &mut String, enums: &[EnumDecl]) {
        for decl in enums {
            out.push_str(&render::enum_decl(decl));
            out.push('\n');
        }
    }

    pub(crate) fn emit_connections(&mut self, out: &mut String, connections: &[Connection]) {
        for conn in connections {
            out.push_str(&render::connection(conn));
            out.push('\n');
        }
    }

    pub(crate) fn emit_hides(&mut self, out: &mut String, hides: &[HideDecl]) {
        for decl in hides {
            out.push_str(&render::hide_decl(decl));
            out.push('\n');
        }
    }

    pub(crate) fn begin(&mut self) {
        self.diag.begin();
    }

    pub(crate) fn finish(&mut self) {
        self.diag.finish();
    }

    /// Append a caller-formatted message as a non-fatal anomaly.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.diag.add_error(message);
    }

    /// `true` whenever any anomaly was recorded.
    pub fn has_errors(&self) -> bool {
        self.diag.has_errors()
    }

    /// All recorded anomalies in encounter order.
    pub fn errors(&self) -> &[Anomaly] {
        self.diag.errors()
    }

    /// The fatal subset of the recorded anomalies.
    pub fn fatal_errors(&self) -> impl Iterator<Item = &Anomaly> {
        self.diag.fatal_errors()
    }

    /// Reset the accumulator without touching already-returned text.
    pub fn clear_errors(&mut self) {
        self.diag.clear_errors();
    }

    pub fn state(&self) -> VisitState {
        self.diag.state()
    }
}
