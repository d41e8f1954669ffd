//! Line-oriented parser for the PlantUML class-diagram dialect.
//!
//! The dialect is strictly line-structured: every declaration starts on its
//! own line and brace blocks open at the end of a header line and close on a
//! line of their own. The driver walks the source line by line with a small
//! state machine (preamble, body, class body, enum body, epilogue) and hands
//! each line to a winnow parser for its production. The public entry point
//! is [`parse_document`].
//!
//! Error handling is two-layered, matching the reconstruction contract:
//! document-structure problems (bad markers, unrecognized declarations,
//! unterminated blocks) become [`Diagnostic`]s collected across the whole
//! pass, while a member line inside a valid class body that fits no member
//! production degrades to [`Member::Unparsed`] and is left for render-time
//! classification.

use log::debug;
use winnow::{
    Parser,
    ascii::{space0, space1},
    combinator::{alt, delimited, eof, opt, preceded, repeat, separated, terminated},
    error::ModalResult,
    token::{one_of, rest, take_while},
};

use umlweld_core::model::{
    Attribute, ClassDecl, ClassKind, Connection, Diagram, Endpoint, EnumDecl, HideDecl, Member,
    Method, Param, Stereotype, TypeRef, Visibility,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// One source line with its byte span (terminator excluded).
#[derive(Debug, Clone, Copy)]
struct Line<'src> {
    text: &'src str,
    span: Span,
}

/// Split the source into lines with spans, stripping `\n` and `\r\n`.
fn lines(source: &str) -> impl Iterator<Item = Line<'_>> {
    source.split_inclusive('\n').scan(0usize, |offset, raw| {
        let start = *offset;
        *offset += raw.len();
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);
        Some(Line {
            text,
            span: Span::new(start..start + text.len()),
        })
    })
}

/// Returns `true` for lines that carry no declaration content.
fn is_skippable(text: &str) -> bool {
    text.is_empty() || text.starts_with('\'')
}

/// Where the line walker currently is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the `@startuml` marker.
    Preamble,
    /// Between the markers, at the top level.
    Body,
    /// Inside the `{` block of `classes[idx]`.
    ClassBody(usize),
    /// Inside the `{` block of `enums[idx]`.
    EnumBody(usize),
    /// After the `@enduml` marker.
    Epilogue,
}

/// Parse a complete document into a [`Diagram`].
///
/// Repeated declarations are appended as-is; merging them is a rendering
/// strategy, not a parsing concern. Returns `Err` when any error-severity
/// diagnostic was collected, carrying the full list.
pub(crate) fn parse_document(source: &str) -> Result<Diagram, ParseError> {
    let mut collector = DiagnosticCollector::new();
    let mut diagram = Diagram::new();
    let mut state = State::Preamble;
    let mut block_open_span = Span::default();
    let mut last_span = Span::default();

    for line in lines(source) {
        let text = line.text.trim();
        last_span = line.span;
        if is_skippable(text) {
            continue;
        }

        if state == State::Preamble {
            if text == "@startuml" {
                state = State::Body;
                continue;
            }
            collector.report(
                Diagnostic::error("missing `@startuml` marker")
                    .with_code(ErrorCode::E101)
                    .with_label(line.span, "content before the opening marker")
                    .with_help("open the diagram with a literal `@startuml` line"),
            );
            state = State::Body;
            // Recover: treat this line as the first body line.
        }

        match state {
            State::Preamble => unreachable!("preamble handled above"),
            State::Body => match text {
                "@enduml" => state = State::Epilogue,
                _ => {
                    state = body_line(&mut diagram, &mut collector, line, text);
                    if matches!(state, State::ClassBody(_) | State::EnumBody(_)) {
                        block_open_span = line.span;
                    }
                }
            },
            State::ClassBody(idx) => {
                if text == "}" {
                    state = State::Body;
                } else if text == "@enduml" {
                    report_unterminated(&mut collector, block_open_span, line.span);
                    state = State::Epilogue;
                } else {
                    let member = member_line
                        .parse(text)
                        .unwrap_or_else(|_| Member::Unparsed(text.to_string()));
                    diagram.classes[idx].members.push(member);
                }
            }
            State::EnumBody(idx) => {
                if text == "}" {
                    state = State::Body;
                } else if text == "@enduml" {
                    report_unterminated(&mut collector, block_open_span, line.span);
                    state = State::Epilogue;
                } else {
                    diagram.enums[idx].items.extend(enum_items(text));
                }
            }
            State::Epilogue => {
                collector.report(
                    Diagnostic::error("content after `@enduml` marker")
                        .with_code(ErrorCode::E100)
                        .with_label(line.span, "nothing may follow the closing marker"),
                );
            }
        }
    }

    let end = Span::new(last_span.end()..last_span.end());
    match state {
        State::Preamble => {
            collector.report(
                Diagnostic::error("missing `@startuml` marker")
                    .with_code(ErrorCode::E101)
                    .with_label(end, "document has no opening marker")
                    .with_help("open the diagram with a literal `@startuml` line"),
            );
        }
        State::Body => {
            collector.report(
                Diagnostic::error("missing `@enduml` marker")
                    .with_code(ErrorCode::E102)
                    .with_label(end, "document ends here")
                    .with_help("close the diagram with a literal `@enduml` line"),
            );
        }
        State::ClassBody(_) | State::EnumBody(_) => {
            report_unterminated(&mut collector, block_open_span, end);
        }
        State::Epilogue => {}
    }

    debug!(
        classes = diagram.classes.len(),
        enums = diagram.enums.len(),
        connections = diagram.connections.len(),
        hides = diagram.hides.len();
        "Parsed document"
    );
    collector.finish(diagram)
}

fn report_unterminated(collector: &mut DiagnosticCollector, opened: Span, at: Span) {
    collector.report(
        Diagnostic::error("unterminated body block")
            .with_code(ErrorCode::E104)
            .with_label(opened.union(at), "block is still open here")
            .with_secondary_label(opened, "block opened here")
            .with_help("close the body with a `}` line"),
    );
}

/// Classify and apply one top-level body line, returning the next state.
fn body_line<'src>(
    diagram: &mut Diagram,
    collector: &mut DiagnosticCollector,
    line: Line<'src>,
    text: &'src str,
) -> State {
    if let Ok((class, has_block)) = class_header_line.parse(text) {
        diagram.classes.push(class);
        return if has_block {
            State::ClassBody(diagram.classes.len() - 1)
        } else {
            State::Body
        };
    }
    if let Ok((decl, body)) = enum_header_line.parse(text) {
        diagram.enums.push(decl);
        return if body == EnumBody::Open {
            State::EnumBody(diagram.enums.len() - 1)
        } else {
            State::Body
        };
    }
    if let Ok(decl) = hide_line.parse(text) {
        diagram.hides.push(decl);
        return State::Body;
    }
    if let Ok(conn) = connection_line.parse(text) {
        diagram.connections.push(conn);
        return State::Body;
    }

    let code = if text.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '@') {
        ErrorCode::E103
    } else {
        ErrorCode::E001
    };
    collector.report(
        Diagnostic::error(code.description())
            .with_code(code)
            .with_label(line.span, "not a class, enum, hide, or connection")
            .with_help("supported declarations: `class`, `abstract class`, `interface`, `enum`, `hide`, and connections"),
    );
    State::Body
}

/// Split an enum body line into items; commas and whitespace both separate.
fn enum_items(text: &str) -> Vec<String> {
    text.split(',')
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Line grammars
// ---------------------------------------------------------------------------

/// Parse an identifier: `[A-Za-z_][A-Za-z0-9_.]*`.
fn identifier<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    )
        .take()
        .parse_next(input)
}

/// Parse a type reference: `Name`, `Name<Args>`, with any number of `[]`
/// array suffixes.
fn type_ref(input: &mut &str) -> ModalResult<TypeRef> {
    let name = identifier.parse_next(input)?;
    let mut ty = match opt(template_args).parse_next(input)? {
        Some(args) => TypeRef::Template {
            name: name.to_string(),
            args,
        },
        None => TypeRef::Simple(name.to_string()),
    };
    while opt("[]").parse_next(input)?.is_some() {
        ty = TypeRef::List(Box::new(ty));
    }
    Ok(ty)
}

fn template_args(input: &mut &str) -> ModalResult<Vec<TypeRef>> {
    delimited(
        ('<', space0),
        separated(1.., type_ref, (space0, ',', space0)),
        (space0, '>'),
    )
    .parse_next(input)
}

/// Parse an optional `+`/`-`/`#` visibility marker.
fn visibility(input: &mut &str) -> ModalResult<Visibility> {
    opt(one_of(['+', '-', '#']))
        .map(|c| match c {
            Some('+') => Visibility::Public,
            Some('-') => Visibility::Private,
            Some('#') => Visibility::Protected,
            _ => Visibility::Unspecified,
        })
        .parse_next(input)
}

/// Parse zero or more `{tag}` modifiers, each followed by optional space.
fn modifier_list(input: &mut &str) -> ModalResult<Vec<String>> {
    repeat(
        0..,
        terminated(
            delimited('{', take_while(1.., |c: char| c != '}'), '}')
                .map(|tag: &str| tag.trim().to_string()),
            space0,
        ),
    )
    .parse_next(input)
}

/// Parse an optional leading type followed by a name.
///
/// With two identifier-ish tokens the first is the type; a single token is
/// just the name.
fn typed_name(input: &mut &str) -> ModalResult<(Option<TypeRef>, String)> {
    alt((
        (terminated(type_ref, space1), identifier).map(|(ty, name)| (Some(ty), name.to_string())),
        identifier.map(|name: &str| (None, name.to_string())),
    ))
    .parse_next(input)
}

fn param(input: &mut &str) -> ModalResult<Param> {
    typed_name
        .map(|(ty, name)| Param { ty, name })
        .parse_next(input)
}

fn param_list(input: &mut &str) -> ModalResult<Vec<Param>> {
    delimited(
        ('(', space0),
        separated(0.., param, (space0, ',', space0)),
        (space0, ')'),
    )
    .parse_next(input)
}

/// Parse a full member line: a method when a parameter list follows the
/// name, an attribute otherwise.
fn member_line(input: &mut &str) -> ModalResult<Member> {
    let (visibility, modifiers) =
        (terminated(visibility, space0), modifier_list).parse_next(input)?;
    let (ty, name) = typed_name.parse_next(input)?;
    let params = opt(preceded(space0, param_list)).parse_next(input)?;
    (space0, eof).parse_next(input)?;

    Ok(match params {
        Some(params) => Member::Method(Method {
            visibility,
            modifiers,
            return_type: ty,
            name,
            params,
        }),
        None => Member::Attribute(Attribute {
            visibility,
            modifiers,
            ty,
            name,
        }),
    })
}

fn stereotype(input: &mut &str) -> ModalResult<Stereotype> {
    let stereotype_arg = take_while(1.., |c: char| c != ',' && c != ')' && c != '>')
        .map(|arg: &str| arg.trim().to_string());
    delimited(
        ("<<", space0),
        (
            identifier.map(str::to_string),
            opt(delimited(
                ('(', space0),
                separated(1.., stereotype_arg, ','),
                (space0, ')'),
            )),
        ),
        (space0, ">>"),
    )
    .map(|(name, args)| Stereotype {
        name,
        args: args.unwrap_or_default(),
    })
    .parse_next(input)
}

/// Parse a class/interface header line. Returns the declaration and whether
/// a `{` body block follows on subsequent lines.
fn class_header_line(input: &mut &str) -> ModalResult<(ClassDecl, bool)> {
    let kind = alt((
        ("abstract", space1, "class").value(ClassKind::AbstractClass),
        "class".value(ClassKind::Class),
        "interface".value(ClassKind::Interface),
    ))
    .parse_next(input)?;
    let name = preceded(space1, identifier).parse_next(input)?;
    let mut class = ClassDecl::new(kind, name);

    loop {
        if let Some(parent) =
            opt(preceded((space1, "extends", space1), identifier)).parse_next(input)?
        {
            class.extends = Some(parent.to_string());
            continue;
        }
        let implements: Option<Vec<String>> = opt(preceded(
            (space1, "implements", space1),
            separated(1.., identifier.map(str::to_string), (space0, ',', space0)),
        ))
        .parse_next(input)?;
        if let Some(interfaces) = implements {
            class.implements.extend(interfaces);
            continue;
        }
        if let Some(st) = opt(preceded(space1, stereotype)).parse_next(input)? {
            class.stereotype = Some(st);
            continue;
        }
        break;
    }

    space0.parse_next(input)?;
    let has_block = alt((
        ('{', space0, '}', space0, eof).value(false),
        ('{', space0, eof).value(true),
        eof.value(false),
    ))
    .parse_next(input)?;
    Ok((class, has_block))
}

/// How an enum header line left its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumBody {
    /// No body, or the body opened and closed on the header line.
    Closed,
    /// A `{` block follows on subsequent lines.
    Open,
}

/// Parse an enum header line, including single-line forms such as
/// `enum Status{ACTIVE,INACTIVE}`.
fn enum_header_line(input: &mut &str) -> ModalResult<(EnumDecl, EnumBody)> {
    let name = delimited(("enum", space1), identifier, space0).parse_next(input)?;
    let mut decl = EnumDecl::new(name);

    let (items, body) = alt((
        delimited('{', take_while(0.., |c: char| c != '}'), ('}', space0, eof))
            .map(|inner: &str| (enum_items(inner), EnumBody::Closed)),
        ('{', space0, eof).value((Vec::new(), EnumBody::Open)),
        eof.value((Vec::new(), EnumBody::Closed)),
    ))
    .parse_next(input)?;
    decl.items = items;
    Ok((decl, body))
}

fn hide_line(input: &mut &str) -> ModalResult<HideDecl> {
    preceded(("hide", space1), rest)
        .verify(|name: &str| !name.trim().is_empty())
        .map(|name: &str| HideDecl {
            name: name.trim().to_string(),
        })
        .parse_next(input)
}

/// Parse a quoted annotation: `"1"`, `"0..*"`, `"owner"`.
fn quoted(input: &mut &str) -> ModalResult<String> {
    delimited('"', take_while(0.., |c: char| c != '"'), '"')
        .map(str::to_string)
        .parse_next(input)
}

/// Parse a connector token: two or more characters drawn from `-.<>|*o`,
/// containing at least one line character (`-` or `.`).
fn connector(input: &mut &str) -> ModalResult<String> {
    take_while(2.., |c: char| "-.<>|*o".contains(c))
        .verify(|token: &str| token.contains('-') || token.contains('.'))
        .map(str::to_string)
        .parse_next(input)
}

/// Parse a connection line:
/// `Left "label" "mult" <connector> "mult" "label" Right : text`.
fn connection_line(input: &mut &str) -> ModalResult<Connection> {
    let left_name = identifier.parse_next(input)?;
    let left_quotes: Vec<String> = repeat(0..=2, preceded(space1, quoted)).parse_next(input)?;

    let connector = delimited(space0, connector, space0).parse_next(input)?;

    let right_quotes: Vec<String> = repeat(0..=2, terminated(quoted, space0)).parse_next(input)?;
    let right_name = identifier.parse_next(input)?;

    let label = opt(preceded((space0, ':', space0), rest.map(str::trim)))
        .parse_next(input)?
        .filter(|text| !text.is_empty())
        .map(str::to_string);
    if label.is_none() {
        (space0, eof).parse_next(input)?;
    }

    let mut left = Endpoint::new(left_name);
    let mut left_quotes = left_quotes.into_iter();
    left.label = left_quotes.next();
    left.multiplicity = left_quotes.next();

    let mut right = Endpoint::new(right_name);
    let mut right_quotes = right_quotes.into_iter();
    match (right_quotes.next(), right_quotes.next()) {
        (Some(first), Some(second)) => {
            right.multiplicity = Some(first);
            right.label = Some(second);
        }
        (Some(first), None) => right.label = Some(first),
        _ => {}
    }

    Ok(Connection {
        left,
        connector,
        right,
        label,
    })
}
