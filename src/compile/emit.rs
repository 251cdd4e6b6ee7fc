//! Interpolates `{{ expr }}` with HTML escaping and `{!! expr !!}` without.
//!
//! Both forms are found in one left to right scan, and emitted values are
//! never scanned again. An expression runs to the nearest end delimiter of
//! its own form. Expressions that fail to evaluate are replaced with nothing
//! and an unterminated begin delimiter is left as text.

use std::borrow::Cow;

use crate::compile::scan;
use crate::context::Context;
use crate::{expr, fmt};

/// The begin and end delimiters of each form, escaped first.
const DELIMITERS: [(&str, &str); 2] = [("{{", "}}"), ("{!!", "!!}")];

pub(crate) fn interpolate<'a>(source: &'a str, ctx: &Context<'_>) -> Cow<'a, str> {
    let begins = DELIMITERS.map(|(begin, _)| begin);
    let mut out = String::new();
    let mut last = 0;
    let mut pos = 0;

    while let Some((i, k)) = scan::find_any(source, pos, &begins) {
        let (begin, end) = DELIMITERS[k];
        let Some(j) = scan::find(source, i + begin.len(), end) else {
            pos = i + begin.len();
            continue;
        };
        out.push_str(&source[last..i]);

        let expr = &source[i + begin.len()..j];
        match expr::eval(expr, ctx) {
            Ok(value) if k == 0 => {
                let _ = fmt::escape_html(&mut out, &value.to_string());
            }
            Ok(value) => {
                let _ = fmt::default(&mut out, &value);
            }
            Err(err) => log::debug!("emitting nothing for `{}`: {err}", expr.trim()),
        }

        last = j + end.len();
        pos = last;
    }

    if last == 0 {
        return Cow::Borrowed(source);
    }
    out.push_str(&source[last..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Value;

    fn interpolate_with(source: &str, globals: &[(&str, &str)]) -> String {
        let globals = Value::Map(
            globals
                .iter()
                .map(|(k, v)| (String::from(*k), Value::from(*v)))
                .collect(),
        );
        let ctx = Context::root(&globals).unwrap();
        interpolate(source, &ctx).into_owned()
    }

    #[test]
    fn interpolate_both_forms_in_order() {
        let out = interpolate_with("{!! a !!} {{ b }} {{ a }}", &[("a", "<a>"), ("b", "<b>")]);
        assert_eq!(out, "<a> &lt;b&gt; &lt;a&gt;");
    }

    #[test]
    fn interpolate_does_not_rescan_output() {
        let out = interpolate_with("{{ a }}|{!! a !!}", &[("a", "{!! b !!}"), ("b", "<b>")]);
        assert_eq!(out, "{!! b !!}|{!! b !!}");
    }

    #[test]
    fn interpolate_unterminated_form_is_skipped() {
        let out = interpolate_with("{{ a {!! a !!}", &[("a", "x")]);
        assert_eq!(out, "{{ a x");
    }
}
