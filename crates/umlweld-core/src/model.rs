//! In-memory model of a parsed class diagram.
//!
//! A [`Diagram`] is the root entity produced by the parser and consumed by
//! every rendering strategy. It owns four ordered collections, each keyed by
//! first-occurrence insertion order. No entity is ever removed from a
//! collection; deduplication folds a repeated declaration into the
//! first-seen entry with the same key and drops the duplicate fields.
//!
//! Member lines that the parser cannot recognize are preserved verbatim as
//! [`Member::Unparsed`] so that reconstruction can classify them per the
//! configured error mode instead of failing the whole parse.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The root in-memory model of one parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    /// Class and interface declarations in first-occurrence order.
    pub classes: Vec<ClassDecl>,
    /// Enum declarations in first-occurrence order.
    pub enums: Vec<EnumDecl>,
    /// Connections in first-occurrence order.
    pub connections: Vec<Connection>,
    /// Hide declarations in first-occurrence order.
    pub hides: Vec<HideDecl>,
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the diagram holds no declarations of any kind.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.enums.is_empty()
            && self.connections.is_empty()
            && self.hides.is_empty()
    }

    /// Total number of top-level declarations across all four collections.
    pub fn declaration_count(&self) -> usize {
        self.classes.len() + self.enums.len() + self.connections.len() + self.hides.len()
    }
}

/// The declaration keyword of a [`ClassDecl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    /// `class`
    Class,
    /// `abstract class`
    AbstractClass,
    /// `interface`
    Interface,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKind::Class => write!(f, "class"),
            ClassKind::AbstractClass => write!(f, "abstract class"),
            ClassKind::Interface => write!(f, "interface"),
        }
    }
}

/// A class, abstract class, or interface declaration.
///
/// The `name` is the case-sensitive merge key: repeated declarations with
/// the same name are folded into the first occurrence during deduplication.
/// On a kind conflict the first-seen kind wins silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub kind: ClassKind,
    pub name: String,
    /// Single parent named by an inline `extends` clause.
    pub extends: Option<String>,
    /// Interfaces named by an inline `implements` clause, in source order.
    pub implements: Vec<String>,
    pub stereotype: Option<Stereotype>,
    /// Members interleaved as declared. Rendering emits all attributes
    /// first, then all methods, each group in source order.
    pub members: Vec<Member>,
}

impl ClassDecl {
    /// Create a member-less declaration of the given kind and name.
    pub fn new(kind: ClassKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            extends: None,
            implements: Vec::new(),
            stereotype: None,
            members: Vec::new(),
        }
    }
}

/// A stereotype annotation, rendered `<<name>>` or `<<name(a, b)>>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stereotype {
    pub name: String,
    /// Ordered argument list; empty means no parenthesized arguments.
    pub args: Vec<String>,
}

/// A single line inside a class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Member {
    Attribute(Attribute),
    Method(Method),
    /// A member line the parser could not recognize, preserved verbatim.
    ///
    /// Unparsed members carry no renderable structure; reconstruction
    /// classifies them as fatal anomalies.
    Unparsed(String),
}

/// Member visibility marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// `+`
    Public,
    /// `-`
    Private,
    /// `#`
    Protected,
    /// No marker in the source; renders as nothing.
    #[default]
    Unspecified,
}

impl Visibility {
    /// The source token for this visibility, empty when unspecified.
    pub fn token(self) -> &'static str {
        match self {
            Visibility::Public => "+",
            Visibility::Private => "-",
            Visibility::Protected => "#",
            Visibility::Unspecified => "",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A field declaration inside a class body.
///
/// `ty` is optional: a member line like `+ name` parses as an attribute
/// without a type. Such attributes render best-effort but are reported as
/// non-fatal anomalies during reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub visibility: Visibility,
    /// Brace-qualified tags (`{abstract}`, `{static}`, ...) without the
    /// braces, in source order.
    pub modifiers: Vec<String>,
    pub ty: Option<TypeRef>,
    pub name: String,
}

/// A method declaration inside a class body.
///
/// The dedup identity of a method is its full rendered signature, so
/// overloads differing only in parameter list never merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub visibility: Visibility,
    pub modifiers: Vec<String>,
    /// Absent for constructors and untyped declarations.
    pub return_type: Option<TypeRef>,
    pub name: String,
    pub params: Vec<Param>,
}

/// A single `type name` pair in a method parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Omitted when the source lists a bare parameter name.
    pub ty: Option<TypeRef>,
    pub name: String,
}

/// A type reference in attribute, return-type, or parameter position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    /// A bare identifier: `int`, `Order`.
    Simple(String),
    /// An array type, rendered `T[]`.
    List(Box<TypeRef>),
    /// A generic instantiation, rendered `Name<A, B>`.
    Template { name: String, args: Vec<TypeRef> },
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Simple(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "{inner}[]"),
            TypeRef::Template { name, args } => {
                write!(f, "{name}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
        }
    }
}

/// An enum declaration. `name` is the merge key; items merge as a
/// text-deduplicated set in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub items: Vec<String>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }
}

/// One side of a [`Connection`].
///
/// Quoted annotations sit between the name and the connector: the left
/// endpoint renders them after the name, the right endpoint before it. The
/// annotation nearest the name is stored as the label and a second one,
/// nearest the connector, as the multiplicity. The distinction is
/// presentational only, since connection identity is the exact rendered
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub label: Option<String>,
    pub multiplicity: Option<String>,
}

impl Endpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            multiplicity: None,
        }
    }
}

/// A relation between two instances, e.g. `User "1" --> "0..*" Order : owns`.
///
/// The connector is kept as the literal source token. Merge identity is the
/// exact rendered text of the whole connection: `A --> B` and `B --> A` are
/// distinct, as are semantically equivalent but differently written arrows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub left: Endpoint,
    /// Literal connector token, e.g. `-->`, `<|--`, `*--`, `--`.
    pub connector: String,
    pub right: Endpoint,
    /// Trailing `: text` segment, if any.
    pub label: Option<String>,
}

/// A `hide` statement. Identity is the exact rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideDecl {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diagram_reports_empty() {
        let diagram = Diagram::new();
        assert!(diagram.is_empty());
        assert_eq!(diagram.declaration_count(), 0);
    }

    #[test]
    fn declaration_count_spans_all_collections() {
        let mut diagram = Diagram::new();
        diagram.classes.push(ClassDecl::new(ClassKind::Class, "Foo"));
        diagram.enums.push(EnumDecl::new("Status"));
        diagram.hides.push(HideDecl {
            name: "Foo".to_string(),
        });
        assert!(!diagram.is_empty());
        assert_eq!(diagram.declaration_count(), 3);
    }

    #[test]
    fn class_kind_display() {
        assert_eq!(ClassKind::Class.to_string(), "class");
        assert_eq!(ClassKind::AbstractClass.to_string(), "abstract class");
        assert_eq!(ClassKind::Interface.to_string(), "interface");
    }

    #[test]
    fn visibility_tokens() {
        assert_eq!(Visibility::Public.token(), "+");
        assert_eq!(Visibility::Private.token(), "-");
        assert_eq!(Visibility::Protected.token(), "#");
        assert_eq!(Visibility::Unspecified.token(), "");
    }

    #[test]
    fn type_ref_display() {
        let list = TypeRef::List(Box::new(TypeRef::Simple("Order".to_string())));
        assert_eq!(list.to_string(), "Order[]");

        let template = TypeRef::Template {
            name: "Map".to_string(),
            args: vec![
                TypeRef::Simple("string".to_string()),
                TypeRef::List(Box::new(TypeRef::Simple("int".to_string()))),
            ],
        };
        assert_eq!(template.to_string(), "Map<string, int[]>");
    }
}
