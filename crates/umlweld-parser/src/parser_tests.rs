//! Unit tests for the class-diagram parser.
//!
//! These tests verify that the line-oriented winnow parser handles every
//! recognized construct, collects structural diagnostics with the right
//! codes, and degrades malformed member lines to `Member::Unparsed` instead
//! of failing the parse.

use umlweld_core::model::{ClassKind, Diagram, Member, TypeRef, Visibility};

use crate::error::{ErrorCode, ParseError};
use crate::parse;

/// Wrap a body in the document markers and parse it.
fn parse_body(body: &str) -> Result<Diagram, ParseError> {
    parse(&format!("@startuml\n{body}@enduml\n"))
}

/// Parse a body and panic with the diagnostics on failure.
fn parse_body_ok(body: &str) -> Diagram {
    parse_body(body).unwrap_or_else(|err| panic!("expected parse to succeed, got: {err}"))
}

/// Assert that parsing fails and the first diagnostic carries `code`.
fn assert_fails_with(source: &str, code: ErrorCode) {
    let err = parse(source).expect_err("expected parsing to fail");
    assert_eq!(
        err.diagnostics()[0].code(),
        Some(code),
        "diagnostics: {:?}",
        err.diagnostics()
    );
}

mod markers {
    use super::*;

    #[test]
    fn empty_document() {
        let diagram = parse("@startuml\n@enduml\n").unwrap();
        assert!(diagram.is_empty());
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let diagram = parse("@startuml\n\n' a comment\n\nclass Foo\n@enduml\n").unwrap();
        assert_eq!(diagram.classes.len(), 1);
    }

    #[test]
    fn missing_startuml() {
        assert_fails_with("class Foo\n@enduml\n", ErrorCode::E101);
    }

    #[test]
    fn missing_enduml() {
        assert_fails_with("@startuml\nclass Foo\n", ErrorCode::E102);
    }

    #[test]
    fn empty_input_reports_missing_startuml() {
        assert_fails_with("", ErrorCode::E101);
    }

    #[test]
    fn content_after_enduml() {
        assert_fails_with("@startuml\n@enduml\nclass Foo\n", ErrorCode::E100);
    }

    #[test]
    fn diagnostics_flatten_to_line_and_column() {
        let source = "@startuml\n@enduml\nclass Foo\n";
        let err = parse(source).unwrap_err();
        let flat = err.to_syntax_errors(source);
        assert_eq!((flat[0].line, flat[0].column), (3, 1));
    }
}

mod classes {
    use super::*;

    #[test]
    fn bare_class_kinds() {
        let diagram = parse_body_ok("class Foo\nabstract class Bar\ninterface Baz\n");
        let kinds: Vec<ClassKind> = diagram.classes.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ClassKind::Class,
                ClassKind::AbstractClass,
                ClassKind::Interface
            ]
        );
    }

    #[test]
    fn header_clauses() {
        let diagram =
            parse_body_ok("class Dog extends Animal implements Pet, Noisy <<entity(v1)>>\n");
        let class = &diagram.classes[0];
        assert_eq!(class.extends.as_deref(), Some("Animal"));
        assert_eq!(class.implements, vec!["Pet", "Noisy"]);
        let st = class.stereotype.as_ref().unwrap();
        assert_eq!(st.name, "entity");
        assert_eq!(st.args, vec!["v1"]);
    }

    #[test]
    fn empty_inline_body() {
        let diagram = parse_body_ok("class Foo {}\n");
        assert!(diagram.classes[0].members.is_empty());
    }

    #[test]
    fn attribute_members() {
        let diagram = parse_body_ok("class User {\n  + string name\n  - {static} int count\n}\n");
        let members = &diagram.classes[0].members;
        assert_eq!(members.len(), 2);

        let Member::Attribute(name) = &members[0] else {
            panic!("expected attribute, got {:?}", members[0]);
        };
        assert_eq!(name.visibility, Visibility::Public);
        assert_eq!(name.ty, Some(TypeRef::Simple("string".to_string())));
        assert_eq!(name.name, "name");

        let Member::Attribute(count) = &members[1] else {
            panic!("expected attribute, got {:?}", members[1]);
        };
        assert_eq!(count.modifiers, vec!["static"]);
    }

    #[test]
    fn attribute_without_type() {
        let diagram = parse_body_ok("class User {\n  + name\n}\n");
        let Member::Attribute(attr) = &diagram.classes[0].members[0] else {
            panic!("expected attribute");
        };
        assert_eq!(attr.ty, None);
        assert_eq!(attr.name, "name");
    }

    #[test]
    fn method_members() {
        let diagram = parse_body_ok(
            "class Repo {\n  + Order find(string id)\n  + {abstract} save(Order o, deep)\n}\n",
        );
        let members = &diagram.classes[0].members;

        let Member::Method(find) = &members[0] else {
            panic!("expected method");
        };
        assert_eq!(find.return_type, Some(TypeRef::Simple("Order".to_string())));
        assert_eq!(find.params.len(), 1);
        assert_eq!(find.params[0].name, "id");

        let Member::Method(save) = &members[1] else {
            panic!("expected method");
        };
        assert_eq!(save.return_type, None);
        assert_eq!(save.modifiers, vec!["abstract"]);
        assert_eq!(save.params[1].ty, None);
        assert_eq!(save.params[1].name, "deep");
    }

    #[test]
    fn generic_and_array_types() {
        let diagram =
            parse_body_ok("class Cache {\n  - Map<string, int[]> entries\n  + int[] keys()\n}\n");
        let members = &diagram.classes[0].members;

        let Member::Attribute(entries) = &members[0] else {
            panic!("expected attribute");
        };
        assert_eq!(
            entries.ty,
            Some(TypeRef::Template {
                name: "Map".to_string(),
                args: vec![
                    TypeRef::Simple("string".to_string()),
                    TypeRef::List(Box::new(TypeRef::Simple("int".to_string()))),
                ],
            })
        );

        let Member::Method(keys) = &members[1] else {
            panic!("expected method");
        };
        assert_eq!(
            keys.return_type,
            Some(TypeRef::List(Box::new(TypeRef::Simple("int".to_string()))))
        );
    }

    #[test]
    fn malformed_member_becomes_unparsed_not_parse_error() {
        let diagram = parse_body_ok("class Foo {\n  + bar()\n  ??? not a member\n}\n");
        let members = &diagram.classes[0].members;
        assert_eq!(members.len(), 2);
        assert_eq!(
            members[1],
            Member::Unparsed("??? not a member".to_string())
        );
    }

    #[test]
    fn unterminated_class_body() {
        assert_fails_with("@startuml\nclass Foo {\n  + bar()\n@enduml\n", ErrorCode::E104);
    }

    #[test]
    fn unterminated_block_label_covers_opening_through_end() {
        let source = "@startuml\nclass Foo {\n  + bar()\n@enduml\n";
        let err = parse(source).unwrap_err();
        let diag = &err.diagnostics()[0];

        // Primary label stretches from the opening header line to the point
        // where the block was found still open.
        let primary = &diag.labels()[0];
        assert!(primary.is_primary());
        assert_eq!(primary.span().start(), source.find("class").unwrap());
        assert_eq!(primary.span().end(), source.find("@enduml").unwrap() + "@enduml".len());

        let opened = &diag.labels()[1];
        assert!(!opened.is_primary());
        assert_eq!(opened.span().start(), source.find("class").unwrap());
    }

    #[test]
    fn repeated_declarations_are_appended() {
        let diagram = parse_body_ok("class Foo {\n  + bar()\n}\nclass Foo {\n  + baz()\n}\n");
        assert_eq!(diagram.classes.len(), 2);
        assert_eq!(diagram.classes[0].name, "Foo");
        assert_eq!(diagram.classes[1].name, "Foo");
    }
}

mod enums {
    use super::*;

    #[test]
    fn single_line_enum() {
        let diagram = parse_body_ok("enum Status{ACTIVE,INACTIVE}\n");
        let decl = &diagram.enums[0];
        assert_eq!(decl.name, "Status");
        assert_eq!(decl.items, vec!["ACTIVE", "INACTIVE"]);
    }

    #[test]
    fn block_enum_with_mixed_separators() {
        let diagram = parse_body_ok("enum Color {\n  RED, GREEN\n  BLUE\n}\n");
        assert_eq!(diagram.enums[0].items, vec!["RED", "GREEN", "BLUE"]);
    }

    #[test]
    fn itemless_enum() {
        let diagram = parse_body_ok("enum Unit\n");
        assert!(diagram.enums[0].items.is_empty());
    }

    #[test]
    fn unterminated_enum_body() {
        assert_fails_with("@startuml\nenum Color {\n  RED\n@enduml\n", ErrorCode::E104);
    }
}

mod connections {
    use super::*;

    #[test]
    fn plain_arrow() {
        let diagram = parse_body_ok("User --> Order\n");
        let conn = &diagram.connections[0];
        assert_eq!(conn.left.name, "User");
        assert_eq!(conn.connector, "-->");
        assert_eq!(conn.right.name, "Order");
        assert_eq!(conn.label, None);
    }

    #[test]
    fn connector_variants() {
        let diagram = parse_body_ok("A -- B\nA <|-- B\nA *-- B\nA o-- B\nA ..> B\n");
        let connectors: Vec<&str> = diagram
            .connections
            .iter()
            .map(|c| c.connector.as_str())
            .collect();
        assert_eq!(connectors, vec!["--", "<|--", "*--", "o--", "..>"]);
    }

    #[test]
    fn quoted_annotations_and_label() {
        let diagram = parse_body_ok("User \"1\" --> \"0..*\" Order : owns\n");
        let conn = &diagram.connections[0];
        assert_eq!(conn.left.label.as_deref(), Some("1"));
        assert_eq!(conn.right.label.as_deref(), Some("0..*"));
        assert_eq!(conn.label.as_deref(), Some("owns"));
    }

    #[test]
    fn unrecognized_declaration() {
        assert_fails_with("@startuml\nfrobnicate all the things\n@enduml\n", ErrorCode::E103);
    }

    #[test]
    fn valid_declarations_survive_a_bad_sibling() {
        let err = parse("@startuml\nclass Foo\n!!!\nclass Bar\n@enduml\n").unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
    }
}

mod hides {
    use super::*;

    #[test]
    fn hide_declaration() {
        let diagram = parse_body_ok("hide Foo\nhide empty members\n");
        assert_eq!(diagram.hides[0].name, "Foo");
        assert_eq!(diagram.hides[1].name, "empty members");
    }
}

mod properties {
    use super::*;

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn any_identifier_parses_as_class_name(name in "[A-Za-z_][A-Za-z0-9_]{0,16}") {
            // Keyword-led names collide with other productions, not class headers.
            prop_assume!(!["class", "abstract", "interface", "enum", "hide"].contains(&name.as_str()));
            let diagram = parse_body_ok(&format!("class {name}\n"));
            prop_assert_eq!(&diagram.classes[0].name, &name);
        }

        #[test]
        fn member_lines_never_fail_the_parse(line in "[a-zA-Z0-9 +\\-#{}()<>,\\[\\]]{0,32}") {
            prop_assume!(line.trim() != "}" && line.trim() != "@enduml");
            let result = parse_body(&format!("class Foo {{\n  {line}\n}}\n"));
            prop_assert!(result.is_ok());
        }
    }
}
