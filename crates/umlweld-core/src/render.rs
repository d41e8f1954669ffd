//! Pure per-node rendering primitives.
//!
//! Every reconstruction strategy (plain reconstruction and
//! dedupe-then-render) assembles its output from these functions instead of
//! overriding visitor methods, so the exact spacing and ordering rules live
//! in one place. All functions are total over their node kind and return
//! text without a trailing newline; callers own line assembly.
//!
//! Spacing contract: segments that are present are separated by exactly one
//! space, absent segments contribute no space. The rendered text is also the
//! merge identity for members, connections, and hide declarations, so these
//! functions must stay byte-stable.

use crate::model::{
    Attribute, ClassDecl, Connection, Endpoint, EnumDecl, HideDecl, Member, Method, Param,
    Stereotype,
};

/// Indentation for lines inside a brace block.
pub const INDENT: &str = "  ";

/// Append `segment` to `line`, inserting a single separating space when both
/// sides are non-empty.
fn push_segment(line: &mut String, segment: &str) {
    if segment.is_empty() {
        return;
    }
    if !line.is_empty() {
        line.push(' ');
    }
    line.push_str(segment);
}

/// Render a stereotype: `<<name>>` or `<<name(a, b)>>`.
pub fn stereotype(st: &Stereotype) -> String {
    if st.args.is_empty() {
        format!("<<{}>>", st.name)
    } else {
        format!("<<{}({})>>", st.name, st.args.join(", "))
    }
}

/// Render an attribute line: `{vis} {mods} {type} {name}`.
pub fn attribute(attr: &Attribute) -> String {
    let mut line = String::new();
    push_segment(&mut line, attr.visibility.token());
    for tag in &attr.modifiers {
        push_segment(&mut line, &format!("{{{tag}}}"));
    }
    if let Some(ty) = &attr.ty {
        push_segment(&mut line, &ty.to_string());
    }
    push_segment(&mut line, &attr.name);
    line
}

/// Render a parameter: `type name`, or bare `name` when untyped.
pub fn param(p: &Param) -> String {
    match &p.ty {
        Some(ty) => format!("{ty} {}", p.name),
        None => p.name.clone(),
    }
}

/// Render a method line: `{vis} {mods} {ret} {name}({args})`.
pub fn method(m: &Method) -> String {
    let mut line = String::new();
    push_segment(&mut line, m.visibility.token());
    for tag in &m.modifiers {
        push_segment(&mut line, &format!("{{{tag}}}"));
    }
    if let Some(ret) = &m.return_type {
        push_segment(&mut line, &ret.to_string());
    }
    let args: Vec<String> = m.params.iter().map(param).collect();
    push_segment(&mut line, &format!("{}({})", m.name, args.join(", ")));
    line
}

/// The full rendered text of a method, used as its dedup identity.
///
/// Two declarations merge only when visibility, modifiers, return type,
/// name, and the entire parameter list render identically; overloads are
/// always kept as distinct entries.
pub fn method_signature(m: &Method) -> String {
    method(m)
}

/// The dedup key of any member: rendered text for attributes and methods,
/// the preserved raw text for unparsed lines.
pub fn member_key(member: &Member) -> String {
    match member {
        Member::Attribute(attr) => attribute(attr),
        Member::Method(m) => method(m),
        Member::Unparsed(text) => text.clone(),
    }
}

/// Render the single-line header of a class declaration:
/// `{kind} {name}{ extends X}{ implements Y, Z}{ <<stereotype>>}`.
pub fn class_header(class: &ClassDecl) -> String {
    let mut line = format!("{} {}", class.kind, class.name);
    if let Some(parent) = &class.extends {
        line.push_str(" extends ");
        line.push_str(parent);
    }
    if !class.implements.is_empty() {
        line.push_str(" implements ");
        line.push_str(&class.implements.join(", "));
    }
    if let Some(st) = &class.stereotype {
        line.push(' ');
        line.push_str(&stereotype(st));
    }
    line
}

/// Render an enum declaration.
///
/// `enum {name}` on its own when the item list is empty, otherwise a brace
/// block with one item per line.
pub fn enum_decl(decl: &EnumDecl) -> String {
    let mut out = format!("enum {}", decl.name);
    if !decl.items.is_empty() {
        out.push_str(" {");
        for item in &decl.items {
            out.push('\n');
            out.push_str(INDENT);
            out.push_str(item);
        }
        out.push_str("\n}");
    }
    out
}

/// Render the left side of a connection: name first, then its quoted
/// annotations in parse order.
fn endpoint_left(end: &Endpoint) -> String {
    let mut out = end.name.clone();
    for quoted in [&end.label, &end.multiplicity].into_iter().flatten() {
        out.push_str(" \"");
        out.push_str(quoted);
        out.push('"');
    }
    out
}

/// Render the right side of a connection: quoted annotations first,
/// mirroring the left side, then the name.
fn endpoint_right(end: &Endpoint) -> String {
    let mut out = String::new();
    for quoted in [&end.multiplicity, &end.label].into_iter().flatten() {
        out.push('"');
        out.push_str(quoted);
        out.push_str("\" ");
    }
    out.push_str(&end.name);
    out
}

/// Render a connection line: `{left} {connector} {right}{ : label}`.
///
/// The result is also the connection's merge identity; no semantic
/// normalization happens here (`A --> B` and `B <-- A` stay distinct).
pub fn connection(conn: &Connection) -> String {
    let mut line = format!(
        "{} {} {}",
        endpoint_left(&conn.left),
        conn.connector,
        endpoint_right(&conn.right)
    );
    if let Some(label) = &conn.label {
        line.push_str(" : ");
        line.push_str(label);
    }
    line
}

/// Render a hide declaration: `hide {name}`.
pub fn hide_decl(decl: &HideDecl) -> String {
    format!("hide {}", decl.name)
}
