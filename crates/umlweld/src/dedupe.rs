//! Deduplicating merge of repeated declarations within one diagram.
//!
//! The deduplicator folds the input diagram's four collections through
//! per-kind merge maps keyed by dedup identity, then renders the folded
//! diagram with the reconstructor's emission primitives. Its emission order
//! is **enums, classes, connections, hides** — intentionally different from
//! the plain reconstructor's classes-before-enums order; the two orders are
//! independent contracts.
//!
//! Merge identities:
//!
//! - classes and enums merge by name;
//! - attributes merge by exact rendered text, methods by exact rendered
//!   signature (overloads never merge);
//! - connections and hide declarations merge by exact rendered text.
//!
//! First-seen order is preserved everywhere; duplicates are dropped.

use indexmap::{IndexMap, IndexSet, map::Entry};
use log::debug;

use umlweld_core::{
    model::{ClassDecl, Connection, Diagram, EnumDecl, HideDecl},
    normalize::normalize,
    render,
};

use crate::diagnostics::{Anomaly, RenderFailure, VisitState};
use crate::reconstruct::Reconstructor;

/// The dedupe-then-render visitor.
///
/// Composes a [`Reconstructor`] for text assembly instead of overriding it;
/// only the fold step and the category order differ.
#[derive(Debug, Default)]
pub struct Deduplicator {
    recon: Reconstructor,
}

impl Deduplicator {
    /// Create a deduplicator with the given execution-mode flags.
    pub fn new(strict: bool, ignore_non_fatal: bool) -> Self {
        Self {
            recon: Reconstructor::new(strict, ignore_non_fatal),
        }
    }

    /// A lenient deduplicator that records every anomaly.
    pub fn lenient() -> Self {
        Self::new(false, false)
    }

    /// Fold the diagram and render the merged result to normalized text.
    ///
    /// # Errors
    ///
    /// Same contract as [`Reconstructor::render`]: strict mode aborts on
    /// the first anomaly, lenient mode records and continues.
    pub fn render(&mut self, diagram: &Diagram) -> Result<String, RenderFailure> {
        let folded = fold(diagram);
        debug!(
            before = diagram.declaration_count(),
            after = folded.declaration_count();
            "Folded repeated declarations"
        );

        self.recon.begin();
        let mut out = String::from("@startuml\n");
        self.recon.emit_enums(&mut out, &folded.enums);
        self.recon.emit_classes(&mut out, &folded.classes)?;
        self.recon.emit_connections(&mut out, &folded.connections);
        self.recon.emit_hides(&mut out, &folded.hides);
        out.push_str("@enduml\n");
        self.recon.finish();
        Ok(normalize(&out))
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.recon.add_error(message);
    }

    pub fn has_errors(&self) -> bool {
        self.recon.has_errors()
    }

    pub fn errors(&self) -> &[Anomaly] {
        self.recon.errors()
    }

    pub fn fatal_errors(&self) -> impl Iterator<Item = &Anomaly> {
        self.recon.fatal_errors()
    }

    pub fn clear_errors(&mut self) {
        self.recon.clear_errors();
    }

    pub fn state(&self) -> VisitState {
        self.recon.state()
    }
}

/// Build a new diagram with repeated declarations merged into their
/// first occurrence. The input is never mutated.
pub fn fold(diagram: &Diagram) -> Diagram {
    let mut classes: IndexMap<String, ClassDecl> = IndexMap::new();
    for class in &diagram.classes {
        match classes.entry(class.name.clone()) {
            Entry::Occupied(entry) => merge_class(entry.into_mut(), class),
            Entry::Vacant(entry) => {
                entry.insert(class.clone());
            }
        }
    }

    let mut enums: IndexMap<String, EnumDecl> = IndexMap::new();
    for decl in &diagram.enums {
        match enums.entry(decl.name.clone()) {
            Entry::Occupied(entry) => merge_enum(entry.into_mut(), decl),
            Entry::Vacant(entry) => {
                entry.insert(decl.clone());
            }
        }
    }

    let mut connections: IndexMap<String, Connection> = IndexMap::new();
    for conn in &diagram.connections {
        connections
            .entry(render::connection(conn))
            .or_insert_with(|| conn.clone());
    }

    let mut hides: IndexMap<String, HideDecl> = IndexMap::new();
    for decl in &diagram.hides {
        hides
            .entry(render::hide_decl(decl))
            .or_insert_with(|| decl.clone());
    }

    Diagram {
        classes: classes.into_values().collect(),
        enums: enums.into_values().collect(),
        connections: connections.into_values().collect(),
        hides: hides.into_values().collect(),
    }
}

/// Merge a repeated class declaration into the first-seen one.
///
/// The first occurrence fixes the kind; a conflicting kind on a later
/// declaration is not reconciled. Header clauses fill in only where the
/// first occurrence left them empty. Members union by rendered identity in
/// first-seen order.
fn merge_class(existing: &mut ClassDecl, dup: &ClassDecl) {
    if existing.extends.is_none() {
        existing.extends = dup.extends.clone();
    }
    for interface in &dup.implements {
        if !existing.implements.contains(interface) {
            existing.implements.push(interface.clone());
        }
    }
    if existing.stereotype.is_none() {
        existing.stereotype = dup.stereotype.clone();
    }

    let mut seen: IndexSet<String> = existing.members.iter().map(render::member_key).collect();
    for member in &dup.members {
        if seen.insert(render::member_key(member)) {
            existing.members.push(member.clone());
        }
    }
}

/// Merge a repeated enum declaration: items union by text.
fn merge_enum(existing: &mut EnumDecl, dup: &EnumDecl) {
    let mut seen: IndexSet<&str> = existing.items.iter().map(String::as_str).collect();
    let mut added = Vec::new();
    for item in &dup.items {
        if seen.insert(item) {
            added.push(item.clone());
        }
    }
    existing.items.extend(added);
}

#[cfg(test)]
mod tests {
    use super::*;
    use umlweld_core::model::{ClassKind, Member, Method, Param, TypeRef, Visibility};

    fn method(name: &str, params: &[(&str, &str)]) -> Member {
        Member::Method(Method {
            visibility: Visibility::Public,
            modifiers: Vec::new(),
            return_type: None,
            name: name.to_string(),
            params: params
                .iter()
                .map(|(ty, name)| Param {
                    ty: Some(TypeRef::Simple(ty.to_string())),
                    name: name.to_string(),
                })
                .collect(),
        })
    }

    fn class(name: &str, members: Vec<Member>) -> ClassDecl {
        let mut decl = ClassDecl::new(ClassKind::Class, name);
        decl.members = members;
        decl
    }

    #[test]
    fn duplicate_members_collapse() {
        let diagram = Diagram {
            classes: vec![
                class("Foo", vec![method("bar", &[])]),
                class("Foo", vec![method("bar", &[])]),
            ],
            ..Diagram::default()
        };
        let folded = fold(&diagram);
        assert_eq!(folded.classes.len(), 1);
        assert_eq!(folded.classes[0].members.len(), 1);
    }

    #[test]
    fn overloads_stay_distinct() {
        let diagram = Diagram {
            classes: vec![
                class(
                    "Foo",
                    vec![method("bar", &[("int", "a")]), method("bar", &[])],
                ),
                class(
                    "Foo",
                    vec![
                        method("bar", &[("string", "b")]),
                        method("bar", &[("int", "a"), ("string", "b")]),
                        method("bar", &[]),
                    ],
                ),
            ],
            ..Diagram::default()
        };
        let folded = fold(&diagram);
        assert_eq!(folded.classes[0].members.len(), 4);
    }

    #[test]
    fn first_seen_kind_wins_silently() {
        let first = class("Foo", Vec::new());
        let mut second = class("Foo", Vec::new());
        second.kind = ClassKind::Interface;

        let diagram = Diagram {
            classes: vec![first, second],
            ..Diagram::default()
        };
        let folded = fold(&diagram);
        assert_eq!(folded.classes[0].kind, ClassKind::Class);
    }

    #[test]
    fn enum_items_union_in_first_seen_order() {
        let diagram = Diagram {
            enums: vec![
                EnumDecl {
                    name: "Status".to_string(),
                    items: vec!["ACTIVE".to_string(), "INACTIVE".to_string()],
                },
                EnumDecl {
                    name: "Status".to_string(),
                    items: vec!["INACTIVE".to_string(), "SUSPENDED".to_string()],
                },
            ],
            ..Diagram::default()
        };
        let folded = fold(&diagram);
        assert_eq!(folded.enums.len(), 1);
        assert_eq!(folded.enums[0].items, vec!["ACTIVE", "INACTIVE", "SUSPENDED"]);
    }

    #[test]
    fn fold_is_idempotent() {
        let diagram = Diagram {
            classes: vec![
                class("Foo", vec![method("bar", &[]), method("baz", &[])]),
                class("Foo", vec![method("bar", &[])]),
            ],
            ..Diagram::default()
        };
        let once = fold(&diagram);
        let twice = fold(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn render_emits_enums_before_classes() {
        let diagram = Diagram {
            classes: vec![class("Foo", Vec::new())],
            enums: vec![EnumDecl {
                name: "Status".to_string(),
                items: Vec::new(),
            }],
            ..Diagram::default()
        };
        let text = Deduplicator::lenient().render(&diagram).unwrap();
        assert_eq!(text, "@startuml\nenum Status\nclass Foo\n@enduml\n");
    }

    #[test]
    fn empty_diagram_renders_markers_only() {
        let text = Deduplicator::lenient().render(&Diagram::new()).unwrap();
        assert_eq!(text, "@startuml\n@enduml\n");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fold_is_idempotent_for_any_class_list(
                names in prop::collection::vec("[A-Z][a-z]{0,6}", 0..12),
            ) {
                let diagram = Diagram {
                    classes: names
                        .iter()
                        .map(|name| ClassDecl::new(ClassKind::Class, name))
                        .collect(),
                    ..Diagram::default()
                };
                let once = fold(&diagram);
                let twice = fold(&once);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn folded_class_names_are_unique(
                names in prop::collection::vec("[A-Z][a-z]{0,3}", 0..20),
            ) {
                let diagram = Diagram {
                    classes: names
                        .iter()
                        .map(|name| ClassDecl::new(ClassKind::Class, name))
                        .collect(),
                    ..Diagram::default()
                };
                let folded = fold(&diagram);
                let unique: IndexSet<&str> =
                    folded.classes.iter().map(|c| c.name.as_str()).collect();
                prop_assert_eq!(unique.len(), folded.classes.len());
            }
        }
    }
}
