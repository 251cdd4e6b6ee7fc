//! Expands `@foreach(expr as value[, key]) ... @endforeach` blocks.
//!
//! A loop body runs to the nearest `@endforeach`, so loops cannot be nested.
//! Lists iterate with their indices as keys, maps with their own keys in
//! insertion order. Any other value, or an expression that fails to
//! evaluate, expands to nothing.
//!
//! Text outside of loops is interpolated here too, so that the output of a
//! loop body is never interpolated a second time.

use std::borrow::Cow;

use crate::compile::{emit, render_body, scan};
use crate::context::Context;
use crate::expr;
use crate::value::Map;
use crate::Value;

const FOREACH: &str = "@foreach(";
const ENDFOREACH: &str = "@endforeach";

/// The parsed contents of the parentheses of a `@foreach`.
#[cfg_attr(internal_debug, derive(Debug))]
struct Header<'a> {
    expr: &'a str,
    value: &'a str,
    key: Option<&'a str>,
}

pub(crate) fn expand<'a>(source: &'a str, ctx: &Context<'_>) -> Cow<'a, str> {
    let mut out = String::new();
    let mut last = 0;
    let mut pos = 0;

    while let Some(i) = scan::find(source, pos, FOREACH) {
        let open = i + FOREACH.len();
        let Some(close) = scan::closing_paren(source, open) else {
            pos = open;
            continue;
        };
        let Some(header) = Header::parse(&source[open..close]) else {
            pos = open;
            continue;
        };
        let Some(end) = scan::find(source, close + 1, ENDFOREACH) else {
            break;
        };

        out.push_str(&emit::interpolate(&source[last..i], ctx));
        iterate(&header, &source[close + 1..end], ctx, &mut out);
        last = end + ENDFOREACH.len();
        pos = last;
    }

    if last == 0 {
        return emit::interpolate(source, ctx);
    }
    out.push_str(&emit::interpolate(&source[last..], ctx));
    Cow::Owned(out)
}

/// Renders the body once for every item of the loop source.
fn iterate(header: &Header<'_>, body: &str, ctx: &Context<'_>, out: &mut String) {
    let source = match expr::eval(header.expr, ctx) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("skipping loop over `{}`: {err}", header.expr);
            return;
        }
    };

    let mut render = |key: Value, value: &Value| {
        let mut vars = Map::new();
        vars.insert(header.value.to_owned(), value.clone());
        if let Some(name) = header.key {
            vars.insert(name.to_owned(), key);
        }
        out.push_str(&render_body(body, &ctx.extend(vars)));
    };

    match &*source {
        Value::List(list) => {
            for (i, item) in list.iter().enumerate() {
                render(Value::from(i), item);
            }
        }
        Value::Map(map) => {
            for (k, item) in map {
                render(Value::from(k.as_str()), item);
            }
        }
        value => {
            log::debug!(
                "skipping loop over `{}`: expected list or map, found {}",
                header.expr,
                value.human()
            );
        }
    }
}

impl<'a> Header<'a> {
    /// Parses `expr as value` or `expr as value, key`. The expression ends
    /// at the first `as` surrounded by whitespace.
    fn parse(text: &'a str) -> Option<Self> {
        let (expr, vars) = split_as(text)?;
        let (value, key) = match vars.split_once(',') {
            Some((value, key)) => (value.trim(), Some(key.trim())),
            None => (vars.trim(), None),
        };
        if !is_ident(value) || !key.map_or(true, is_ident) {
            return None;
        }
        Some(Self {
            expr: expr.trim(),
            value,
            key,
        })
    }
}

fn split_as(text: &str) -> Option<(&str, &str)> {
    let mut pos = 0;
    while let Some(i) = scan::find(text, pos, "as") {
        let before = text[..i].chars().next_back();
        let after = text[i + 2..].chars().next();
        if before.map_or(false, char::is_whitespace) && after.map_or(false, char::is_whitespace) {
            return Some((&text[..i], &text[i + 2..]));
        }
        pos = i + 2;
    }
    None
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().map_or(false, expr::is_ident_start) && chars.all(expr::is_ident)
}
