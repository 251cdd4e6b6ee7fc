use crate::types::span::Span;
use crate::{Error, Result};

/// A lexer that tokenizes an expression into distinct chunks so that the
/// parser doesn't have to operate on raw text.
///
/// The lexer is implemented as a fallible iterator. The parser should
/// repeatedly call the [`.next()?`][Lexer::next] method to return the next
/// non-whitespace token until [`None`] is returned.
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Lexer<'source> {
    /// The original expression source.
    pub source: &'source str,

    /// A cursor over the expression source.
    cursor: usize,

    /// The previous non-whitespace token. Digits directly after a member
    /// access operator are lexed as an index, e.g. `users.0`, instead of as
    /// a number.
    prev: Option<Token>,
}

/// The unit yielded by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `.`
    Dot,
    /// `?.`
    QuestionDot,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `?`
    Question,
    /// `??`
    QuestionQuestion,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `!`
    Bang,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqEq,
    /// `===`
    EqEqEq,
    /// `!=`
    BangEq,
    /// `!==`
    BangEqEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// Sequence of whitespace characters
    Whitespace,
    /// A keyword like `true` or `null`
    Keyword,
    /// A variable or property name
    Ident,
    /// An index into a list, e.g. the `0` in `users.0`
    Index,
    /// An integer or float literal, e.g. `19`, `0.5` or `1e3`
    Number,
    /// A string literal, e.g. `"Hello World!\n"` or `'single'`
    String,
}

/// Operators made up of punctuation, longest first so that the first match
/// is always the correct one.
const OPERATORS: &[(&str, Token)] = &[
    ("===", Token::EqEqEq),
    ("!==", Token::BangEqEq),
    ("==", Token::EqEq),
    ("!=", Token::BangEq),
    ("<=", Token::Le),
    (">=", Token::Ge),
    ("&&", Token::AndAnd),
    ("||", Token::OrOr),
    ("??", Token::QuestionQuestion),
    ("?.", Token::QuestionDot),
    ("!", Token::Bang),
    ("<", Token::Lt),
    (">", Token::Gt),
    ("?", Token::Question),
];

pub(crate) const KEYWORDS: &[&str] = &["true", "false", "null"];

impl<'source> Lexer<'source> {
    /// Construct a new lexer.
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            cursor: 0,
            prev: None,
        }
    }

    /// Returns the next non-whitespace token and its span.
    pub fn next(&mut self) -> Result<Option<(Token, Span)>> {
        loop {
            match self.lex()? {
                Some((tk, sp)) if !tk.is_whitespace() => return Ok(Some((tk, sp))),
                None => return Ok(None),
                _ => continue,
            }
        }
    }

    /// Returns the next token and span.
    fn lex(&mut self) -> Result<Option<(Token, Span)>> {
        let i = self.cursor;

        // We iterate over chars because that is nicer than operating on raw
        // bytes. The map call here fixes the index to be relative to the
        // actual expression source.
        let mut iter = self.source[i..].char_indices().map(|(d, c)| (i + d, c));

        let Some((i, c)) = iter.next() else {
            return Ok(None);
        };

        let (tk, j) = match c {
            // Single character to token mappings.
            '.' if self.is_number_start(i) => self.lex_number(i),
            '.' => (Token::Dot, i + 1),
            ',' => (Token::Comma, i + 1),
            ':' => (Token::Colon, i + 1),
            '(' => (Token::OpenParen, i + 1),
            ')' => (Token::CloseParen, i + 1),
            '[' => (Token::OpenBracket, i + 1),
            ']' => (Token::CloseBracket, i + 1),
            '+' => (Token::Plus, i + 1),
            '-' => (Token::Minus, i + 1),
            '*' => (Token::Star, i + 1),
            '/' => (Token::Slash, i + 1),
            '%' => (Token::Percent, i + 1),

            // Multi-character tokens with a distinct start character.
            '=' | '!' | '<' | '>' | '&' | '|' | '?' => self.lex_operator(i)?,
            '"' | '\'' => self.lex_string(iter, i, c)?,
            c if c.is_ascii_digit() => match self.prev {
                Some(Token::Dot | Token::QuestionDot) => self.lex_index(iter),
                _ => self.lex_number(i),
            },
            c if c.is_whitespace() => self.lex_whitespace(iter),
            c if is_ident_start(c) => self.lex_ident_or_keyword(iter, i),

            // Any other character...
            _ => {
                return Err(self.err_unexpected_character(i..(i + c.len_utf8())));
            }
        };

        if !tk.is_whitespace() {
            self.prev = Some(tk);
        }

        // Finally, we need to update the cursor.
        self.cursor = j;

        Ok(Some((tk, Span::from(i..j))))
    }

    /// Whether the `.` at `i` starts a float like `.5` rather than being a
    /// member access operator.
    fn is_number_start(&self, i: usize) -> bool {
        let follows_value = matches!(
            self.prev,
            Some(
                Token::Ident
                    | Token::Keyword
                    | Token::Index
                    | Token::Number
                    | Token::String
                    | Token::CloseParen
                    | Token::CloseBracket
            )
        );
        !follows_value && self.source[i + 1..].starts_with(|c: char| c.is_ascii_digit())
    }

    fn lex_operator(&mut self, i: usize) -> Result<(Token, usize)> {
        let rest = &self.source[i..];
        for &(op, tk) in OPERATORS {
            if !rest.starts_with(op) {
                continue;
            }
            // `a?.5:1` is a conditional with a float, not optional access.
            if tk == Token::QuestionDot && rest[2..].starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            return Ok((tk, i + op.len()));
        }
        Err(self.err_unexpected_character(i..i + 1))
    }

    fn lex_string<I>(&mut self, mut iter: I, i: usize, quote: char) -> Result<(Token, usize)>
    where
        I: Iterator<Item = (usize, char)> + Clone,
    {
        let mut curr = quote;
        loop {
            match iter.next() {
                None => {
                    return Err(self.err_undelimited_string(i..self.source.len()));
                }
                Some((j, '\r' | '\n')) => {
                    return Err(self.err_undelimited_string(i..j));
                }
                Some((j, c)) if c == quote && curr != '\\' => {
                    return Ok((Token::String, j + 1));
                }
                Some((_, '\\')) if curr == '\\' => {
                    // An escaped backslash, it can't escape the next quote.
                    curr = '\0';
                }
                Some((_, c)) => {
                    curr = c;
                }
            }
        }
    }

    fn lex_number(&mut self, i: usize) -> (Token, usize) {
        // A number is a run of digits, optionally followed by a fraction and
        // an exponent. The fraction and exponent must contain a digit, so
        // that `1.name` and `1e` are not swallowed.
        //
        // 1234.5678e+90
        // ^   ^    ^   ^
        // i   j    k   n
        let bytes = self.source.as_bytes();
        let digits = |mut n: usize| {
            while n < bytes.len() && bytes[n].is_ascii_digit() {
                n += 1;
            }
            n
        };

        let mut n = digits(i);
        if bytes.get(n) == Some(&b'.') && bytes.get(n + 1).map_or(false, u8::is_ascii_digit) {
            n = digits(n + 1);
        }
        if matches!(bytes.get(n), Some(b'e' | b'E')) {
            let k = match bytes.get(n + 1) {
                Some(b'+' | b'-') => n + 2,
                _ => n + 1,
            };
            if bytes.get(k).map_or(false, u8::is_ascii_digit) {
                n = digits(k);
            }
        }
        (Token::Number, n)
    }

    fn lex_index<I>(&mut self, iter: I) -> (Token, usize)
    where
        I: Iterator<Item = (usize, char)> + Clone,
    {
        (Token::Index, self.lex_while(iter, |c| c.is_ascii_digit()))
    }

    fn lex_whitespace<I>(&mut self, iter: I) -> (Token, usize)
    where
        I: Iterator<Item = (usize, char)> + Clone,
    {
        (Token::Whitespace, self.lex_while(iter, char::is_whitespace))
    }

    fn lex_ident_or_keyword<I>(&mut self, iter: I, i: usize) -> (Token, usize)
    where
        I: Iterator<Item = (usize, char)> + Clone,
    {
        let j = self.lex_while(iter, is_ident);
        let tk = match KEYWORDS.contains(&&self.source[i..j]) {
            true => Token::Keyword,
            false => Token::Ident,
        };
        (tk, j)
    }

    fn lex_while<I, P>(&mut self, mut iter: I, pred: P) -> usize
    where
        I: Iterator<Item = (usize, char)> + Clone,
        P: Fn(char) -> bool,
    {
        loop {
            match iter.clone().next() {
                Some((_, c)) if pred(c) => {
                    iter.next();
                }
                Some((j, _)) => return j,
                None => return self.source.len(),
            }
        }
    }

    fn err_unexpected_character(&self, span: impl Into<Span>) -> Error {
        Error::syntax("unexpected character", self.source, span)
    }

    fn err_undelimited_string(&self, span: impl Into<Span>) -> Error {
        Error::syntax("undelimited string", self.source, span)
    }
}

impl Token {
    pub fn human(&self) -> &'static str {
        match self {
            Self::Dot => "member access operator",
            Self::QuestionDot => "optional member access operator",
            Self::Comma => "comma",
            Self::Colon => "colon",
            Self::Question => "question mark",
            Self::QuestionQuestion => "`??`",
            Self::OpenParen => "`(`",
            Self::CloseParen => "`)`",
            Self::OpenBracket => "`[`",
            Self::CloseBracket => "`]`",
            Self::Bang => "`!`",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Star => "`*`",
            Self::Slash => "`/`",
            Self::Percent => "`%`",
            Self::EqEq => "`==`",
            Self::EqEqEq => "`===`",
            Self::BangEq => "`!=`",
            Self::BangEqEq => "`!==`",
            Self::Lt => "`<`",
            Self::Le => "`<=`",
            Self::Gt => "`>`",
            Self::Ge => "`>=`",
            Self::AndAnd => "`&&`",
            Self::OrOr => "`||`",
            Self::Whitespace => "whitespace",
            Self::Keyword => "keyword",
            Self::Ident => "identifier",
            Self::Index => "index",
            Self::Number => "number",
            Self::String => "string",
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

/// Removes the quotes from a string literal and handles escape characters.
///
/// On failure returns the byte offset of the unknown escape sequence.
pub(crate) fn unescape(raw: &str) -> std::result::Result<String, usize> {
    let inner = &raw[1..raw.len() - 1];
    if !inner.contains('\\') {
        return Ok(inner.to_owned());
    }
    let mut iter = inner.char_indices();
    let mut string = String::with_capacity(inner.len());
    while let Some((i, c)) = iter.next() {
        if c != '\\' {
            string.push(c);
            continue;
        }
        let c = match iter.next() {
            Some((_, 'n')) => '\n',
            Some((_, 'r')) => '\r',
            Some((_, 't')) => '\t',
            Some((_, '\\')) => '\\',
            Some((_, '"')) => '"',
            Some((_, '\'')) => '\'',
            _ => return Err(i + 1),
        };
        string.push(c);
    }
    Ok(string)
}

#[cfg(feature = "unicode")]
pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || unicode_ident::is_xid_start(c)
}

#[cfg(feature = "unicode")]
pub(crate) fn is_ident(c: char) -> bool {
    c == '$' || unicode_ident::is_xid_continue(c)
}

#[cfg(not(feature = "unicode"))]
pub(crate) fn is_ident_start(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '_' | '$')
}

#[cfg(not(feature = "unicode"))]
pub(crate) fn is_ident(c: char) -> bool {
    matches!(c, '0'..='9' | 'A'..='Z' | 'a'..='z' | '_' | '$')
}
