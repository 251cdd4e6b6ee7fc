//! Converting values to text for interpolation.
//!
//! `{!! expr !!}` writes the [`default`] string form of a value, `{{ expr }}`
//! additionally passes it through [`escape_html`].

use std::fmt;
use std::fmt::Write;

use crate::Value;

/// The default value formatter.
///
/// Values are formatted as follows:
/// - [`Value::None`]: empty string
/// - [`Value::Bool`]: `true` or `false`
/// - [`Value::Integer`]: the integer formatted using [`Display`][std::fmt::Display]
/// - [`Value::Float`]: the float formatted using [`Display`][std::fmt::Display],
///   except infinities which are `Infinity` and `-Infinity`. Magnitudes of at
///   least `1e21` or below `1e-6` use exponent notation such as `1e+21` and
///   `1.5e-7`, as JavaScript does.
/// - [`Value::String`]: the string, unescaped
/// - [`Value::List`]: each item formatted and joined with `,`, a `null` item
///   is an empty string
/// - [`Value::Map`]: `[object Object]`
pub fn default<W: Write + ?Sized>(f: &mut W, value: &Value) -> fmt::Result {
    match value {
        Value::None => Ok(()),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Integer(n) => write!(f, "{n}"),
        Value::Float(n) if n.is_infinite() => match n.is_sign_positive() {
            true => f.write_str("Infinity"),
            false => f.write_str("-Infinity"),
        },
        // Negative zero prints as `0`
        Value::Float(n) if *n == 0.0 => f.write_char('0'),
        Value::Float(n) if n.abs() >= 1e21 || n.abs() < 1e-6 => {
            let s = format!("{n:e}");
            match s.split_once('e') {
                Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
                _ => f.write_str(&s),
            }
        }
        Value::Float(n) => write!(f, "{n}"),
        Value::String(s) => f.write_str(s),
        Value::List(list) => {
            for (i, item) in list.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                default(f, item)?;
            }
            Ok(())
        }
        Value::Map(_) => f.write_str("[object Object]"),
    }
}

/// Escapes the characters `& < > " '` as HTML entities.
pub fn escape_html<W: Write + ?Sized>(f: &mut W, s: &str) -> fmt::Result {
    let mut last = 0;
    for (i, b) in s.bytes().enumerate() {
        let escaped = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#039;",
            _ => continue,
        };
        f.write_str(&s[last..i])?;
        f.write_str(escaped)?;
        last = i + 1;
    }
    f.write_str(&s[last..])
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        default(f, self)
    }
}
