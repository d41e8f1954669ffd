//! Cross-document union of already-parsed diagrams.
//!
//! The sum operation appends each input diagram's declarations, collection
//! by collection, in argument order into a fresh diagram — equivalent to
//! textual concatenation with the inner markers stripped, re-parsed and
//! re-rendered. It never deduplicates; the supported workflow for "merge
//! two schemas without duplication" is to render the sum through the
//! deduplicator.

use log::debug;

use umlweld_core::model::Diagram;

/// Union two or more diagrams into a fresh one.
///
/// Inputs are cloned, never aliased; the result exclusively owns every
/// declaration. Declarations keep their per-collection argument order:
/// all of diagram 1's classes, then diagram 2's, and so on.
pub fn sum<'a>(diagrams: impl IntoIterator<Item = &'a Diagram>) -> Diagram {
    let mut out = Diagram::new();
    let mut inputs = 0usize;
    for diagram in diagrams {
        inputs += 1;
        out.classes.extend(diagram.classes.iter().cloned());
        out.enums.extend(diagram.enums.iter().cloned());
        out.connections.extend(diagram.connections.iter().cloned());
        out.hides.extend(diagram.hides.iter().cloned());
    }
    debug!(inputs, declarations = out.declaration_count(); "Summed diagrams");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use umlweld_core::model::{ClassDecl, ClassKind, HideDecl};

    #[test]
    fn declarations_keep_argument_order() {
        let first = Diagram {
            classes: vec![ClassDecl::new(ClassKind::Class, "Charachter")],
            ..Diagram::default()
        };
        let second = Diagram {
            classes: vec![ClassDecl::new(ClassKind::Class, "Weapon")],
            hides: vec![HideDecl {
                name: "Weapon".to_string(),
            }],
            ..Diagram::default()
        };

        let merged = sum([&first, &second]);
        let names: Vec<&str> = merged.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Charachter", "Weapon"]);
        assert_eq!(merged.hides.len(), 1);
    }

    #[test]
    fn sum_never_deduplicates() {
        let diagram = Diagram {
            classes: vec![ClassDecl::new(ClassKind::Class, "Foo")],
            ..Diagram::default()
        };
        let merged = sum([&diagram, &diagram]);
        assert_eq!(merged.classes.len(), 2);
    }

    #[test]
    fn sum_of_nothing_is_empty() {
        let none: [&Diagram; 0] = [];
        assert!(sum(none).is_empty());
    }
}
