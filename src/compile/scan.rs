//! Helpers for locating directives in template text.
//!
//! Directives are found by plain substring search. Their arguments are read
//! with a small [`Cursor`] so that string literals can contain any of the
//! delimiters.

use crate::expr;
use crate::Value;

/// Returns the byte offset of the first `pat` in `text` at or after `from`.
pub(crate) fn find(text: &str, from: usize, pat: &str) -> Option<usize> {
    text.get(from..)?.find(pat).map(|i| from + i)
}

/// Returns the byte offset of the first of `pats` in `text` at or after
/// `from`, together with the index of the pattern that matched. When two
/// patterns match at the same offset the earlier one in `pats` wins.
pub(crate) fn find_any(text: &str, mut from: usize, pats: &[&str]) -> Option<(usize, usize)> {
    let first: Vec<u8> = pats.iter().filter_map(|p| p.bytes().next()).collect();
    loop {
        let j = from
            + text
                .get(from..)?
                .find(|c: char| c.is_ascii() && first.contains(&(c as u8)))?;
        if let Some(k) = pats.iter().position(|p| text[j..].starts_with(p)) {
            return Some((j, k));
        }
        from = j + 1;
    }
}

/// Finds the parenthesis closing the one opened just before `open`.
///
/// Nested parentheses are balanced and parentheses inside single or double
/// quoted strings are ignored. Returns the byte offset of the closing
/// parenthesis.
pub(crate) fn closing_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 1;
    let mut quote = None;
    let mut escaped = false;
    for (i, c) in text.get(open..)?.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open + i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// A cursor over the arguments of a directive.
#[cfg_attr(internal_debug, derive(Debug))]
pub(crate) struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }

    /// The current byte offset into the text.
    pub fn pos(&self) -> usize {
        self.pos
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.rest().is_empty()
    }

    pub fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consumes `pat` if the text continues with it, skipping any whitespace
    /// before it.
    pub fn eat(&mut self, pat: &str) -> bool {
        self.skip_ws();
        match self.rest().starts_with(pat) {
            true => {
                self.pos += pat.len();
                true
            }
            false => false,
        }
    }

    /// Consumes a single or double quoted string literal and returns its
    /// unescaped contents.
    pub fn string(&mut self) -> Option<String> {
        self.skip_ws();
        let rest = self.rest();
        let quote = rest.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
        let mut escaped = false;
        for (i, c) in rest.char_indices().skip(1) {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '\n' => return None,
                c if c == quote => {
                    let s = expr::unescape(&rest[..=i]).ok()?;
                    self.pos += i + 1;
                    return Some(s);
                }
                _ => {}
            }
        }
        None
    }

    /// Consumes an identifier.
    pub fn ident(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        if !rest.starts_with(expr::is_ident_start) {
            return None;
        }
        let n = rest.find(|c: char| !expr::is_ident(c)).unwrap_or(rest.len());
        self.pos += n;
        Some(&rest[..n])
    }

    /// Consumes a numeric literal, optionally negative.
    pub fn number(&mut self) -> Option<Value> {
        self.skip_ws();
        let rest = self.rest();
        let n = rest
            .char_indices()
            .find(|&(i, c)| {
                !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-') || c == 'e' || c == 'E')
            })
            .map_or(rest.len(), |(i, _)| i);
        let raw = &rest[..n];
        let value = match raw.parse::<i64>() {
            Ok(int) => Value::Integer(int),
            Err(_) if raw.starts_with(|c: char| c == '-' || c.is_ascii_digit()) => {
                Value::Float(raw.parse().ok()?)
            }
            Err(_) => return None,
        };
        self.pos += n;
        Some(value)
    }
}
