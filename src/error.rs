use std::cmp::max;
use std::error::Error as StdError;
use std::fmt;
use std::io;

#[cfg(feature = "unicode")]
use unicode_width::UnicodeWidthStr;

use crate::loader::Location;
use crate::types::span::Span;

/// An error that can occur during compilation or expression evaluation.
///
/// Only failures to find or load a view, configuration mistakes and invalid
/// contexts abort a compile. Expression errors are absorbed while compiling
/// and are only returned by [`Engine::eval`][crate::Engine::eval].
pub struct Error {
    kind: ErrorKind,
    msg: String,
    name: Option<String>,
    pretty: Option<(String, Span)>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The expression could not be parsed.
    Syntax,
    /// The expression could not be evaluated.
    Eval,
    /// The resolver does not know the requested view.
    UnknownTemplate,
    /// The resolver found the view but could not read it.
    Load,
    /// A view was requested but the engine has no resolver.
    NoResolver,
    /// Layouts and includes nested deeper than the configured maximum.
    MaxIncludeDepth,
    /// The context was not a map.
    InvalidContext,
    /// The context could not be converted to a [`Value`][crate::Value].
    Serialize,
}

impl Error {
    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            name: None,
            pretty: None,
            source: None,
        }
    }

    fn spanned(kind: ErrorKind, msg: impl Into<String>, source: &str, span: Span) -> Self {
        Self {
            pretty: Some((source.to_owned(), span)),
            ..Self::new(kind, msg)
        }
    }

    pub(crate) fn syntax(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::spanned(ErrorKind::Syntax, msg, source, span.into())
    }

    pub(crate) fn eval(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::spanned(ErrorKind::Eval, msg, source, span.into())
    }

    /// Constructs the error a [`Resolver`][crate::Resolver] returns when no
    /// view exists with the given name.
    pub fn unknown_template(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(ErrorKind::UnknownTemplate, format!("unknown template `{name}`"))
    }

    /// Constructs the error a [`Resolver`][crate::Resolver] returns when a
    /// resolved view cannot be read.
    pub fn load(location: &Location, err: io::Error) -> Self {
        Self {
            source: Some(Box::new(err)),
            ..Self::new(
                ErrorKind::Load,
                format!(
                    "failed to load template from `{}`",
                    location.path().display()
                ),
            )
        }
    }

    pub(crate) fn no_resolver(name: &str) -> Self {
        Self::new(
            ErrorKind::NoResolver,
            format!("no resolver configured to load template `{name}`"),
        )
    }

    pub(crate) fn max_include_depth(max: usize) -> Self {
        Self::new(
            ErrorKind::MaxIncludeDepth,
            format!("reached maximum include depth ({max})"),
        )
    }

    pub(crate) fn invalid_context(found: &str) -> Self {
        Self::new(
            ErrorKind::InvalidContext,
            format!("expected map for context, found {found}"),
        )
    }

    /// Attaches the name of the view in which the error happened. The
    /// innermost view wins.
    pub(crate) fn with_template_name(mut self, name: &str) -> Self {
        if self.name.is_none() {
            self.name = Some(name.to_owned());
        }
        self
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the name of the view in which this error happened, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::new(ErrorKind::Serialize, msg.to_string())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn StdError + 'static))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pretty {
            Some((source, span)) => fmt_pretty(&self.msg, self.name(), source, *span, f),
            None => fmt::Display::fmt(self, f),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pretty {
            Some((source, span)) if f.alternate() => {
                return fmt_pretty(&self.msg, self.name(), source, *span, f);
            }
            Some((_, span)) => {
                write!(f, "{} between bytes {} and {}", self.msg, span.m, span.n)?;
            }
            None => write!(f, "{}", self.msg)?,
        }
        if let Some(name) = &self.name {
            write!(f, " in template `{name}`")?;
        }
        Ok(())
    }
}

fn fmt_pretty(
    msg: &str,
    name: Option<&str>,
    source: &str,
    span: Span,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let lines: Vec<_> = source.split_terminator('\n').collect();
    let (line, col) = to_line_col(&lines, span.m);
    let width = max(1, str_width(&source[span]));
    let code = lines.get(line).or(lines.last()).copied().unwrap_or("");

    let num = (line + 1).to_string();
    let pad = str_width(&num);
    let pipe = "|";
    let underline = "^".repeat(width);

    if let Some(name) = name {
        write!(f, "\n {0:pad$}--> {name}", "", pad = pad)?;
    }

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + width,
        msg = msg
    )
}

fn to_line_col(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;
    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            return (i, str_width(&line[..offset - n]));
        }
        n += len;
    }
    (
        lines.len().saturating_sub(1),
        lines.last().map(|l| str_width(l)).unwrap_or(0),
    )
}

#[cfg(feature = "unicode")]
fn str_width(s: &str) -> usize {
    s.width()
}

#[cfg(not(feature = "unicode"))]
fn str_width(s: &str) -> usize {
    s.chars().count()
}
