//! Expands `@include('name')` and `@include('name', {key: value, ...})`.
//!
//! Each include is resolved, loaded and compiled through the whole pipeline
//! with the outer context extended by the inline data. Malformed inline data
//! is ignored and the include proceeds with the outer context only.

use std::borrow::Cow;

use crate::compile::scan::{self, Cursor};
use crate::compile::Compiler;
use crate::context::Context;
use crate::value::Map;
use crate::{Result, Value};

const INCLUDE: &str = "@include(";

/// A parsed `@include` marker.
struct Include {
    name: String,
    data: Option<Map<String, Value>>,
    /// The byte offset just past the closing parenthesis.
    end: usize,
}

pub(crate) fn expand<'a>(
    compiler: &Compiler<'_>,
    source: &'a str,
    ctx: &Context<'_>,
) -> Result<Cow<'a, str>> {
    let mut out = String::new();
    let mut last = 0;
    let mut pos = 0;

    while let Some(i) = scan::find(source, pos, INCLUDE) {
        let Some(include) = parse(source, i + INCLUDE.len()) else {
            pos = i + INCLUDE.len();
            continue;
        };

        let nested = compiler.descend(1)?;
        let template = compiler.load(&include.name)?;
        let ctx = ctx.extend(include.data.unwrap_or_default());
        let rendered = nested
            .compile(&template, &ctx)
            .map_err(|err| err.with_template_name(&include.name))?;

        out.push_str(&source[last..i]);
        out.push_str(&rendered);
        last = include.end;
        pos = last;
    }

    if last == 0 {
        return Ok(Cow::Borrowed(source));
    }
    out.push_str(&source[last..]);
    Ok(Cow::Owned(out))
}

/// Parses the arguments of an `@include` marker starting at `open`, just
/// after the opening parenthesis.
fn parse(source: &str, open: usize) -> Option<Include> {
    let mut c = Cursor::new(source, open);
    let name = c.string()?;
    if c.eat(")") {
        return Some(Include {
            name,
            data: None,
            end: c.pos(),
        });
    }
    if !c.eat(",") {
        return None;
    }
    let close = scan::closing_paren(source, open)?;
    let data = parse_record(&source[c.pos()..close]);
    if data.is_none() {
        log::debug!("ignoring malformed data for include `{name}`");
    }
    Some(Include {
        name,
        data,
        end: close + 1,
    })
}

/// Parses a record literal like `{title: 'Hello', count: 3, open: true}`.
///
/// Keys are bare identifiers. Values are quoted strings, `true`, `false` or
/// numbers.
fn parse_record(text: &str) -> Option<Map<String, Value>> {
    let mut c = Cursor::new(text, 0);
    let mut map = Map::new();
    if !c.eat("{") {
        return None;
    }
    loop {
        if c.eat("}") {
            break;
        }
        let key = c.ident()?;
        if !c.eat(":") {
            return None;
        }
        c.skip_ws();
        let value = match c.string() {
            Some(s) => Value::String(s),
            None => match c.ident() {
                Some("true") => Value::Bool(true),
                Some("false") => Value::Bool(false),
                Some(_) => return None,
                None => c.number()?,
            },
        };
        map.insert(key.to_owned(), value);
        if c.eat("}") {
            break;
        }
        if !c.eat(",") {
            return None;
        }
    }
    c.skip_ws();
    c.is_eof().then_some(map)
}
