use std::fmt::Display;

use crate::expr::lex::{self, Lexer, Token};
use crate::types::ast;
use crate::types::span::Span;
use crate::{Error, Result, Value};

/// A parser that constructs an AST from a token stream.
///
/// The parser is a hand written recursive descent parser with one function
/// per precedence level. It sometimes needs to peek at the next token to
/// know how to proceed and uses the `peeked` buffer to do this.
pub struct Parser<'source> {
    /// A lexer that tokenizes the expression source.
    tokens: Lexer<'source>,

    /// Remember a peeked value, even if it was `None`
    peeked: Option<Option<(Token, Span)>>,
}

/// Binary operators at each precedence level, lowest binding first.
const LEVELS: &[&[(Token, ast::BinaryOp)]] = &[EQUALITY, RELATIONAL, ADDITIVE, MULTIPLICATIVE];

const EQUALITY: &[(Token, ast::BinaryOp)] = &[
    (Token::EqEqEq, ast::BinaryOp::StrictEq),
    (Token::BangEqEq, ast::BinaryOp::StrictNe),
    (Token::EqEq, ast::BinaryOp::Eq),
    (Token::BangEq, ast::BinaryOp::Ne),
];
const RELATIONAL: &[(Token, ast::BinaryOp)] = &[
    (Token::Lt, ast::BinaryOp::Lt),
    (Token::Le, ast::BinaryOp::Le),
    (Token::Gt, ast::BinaryOp::Gt),
    (Token::Ge, ast::BinaryOp::Ge),
];
const ADDITIVE: &[(Token, ast::BinaryOp)] = &[
    (Token::Plus, ast::BinaryOp::Add),
    (Token::Minus, ast::BinaryOp::Sub),
];
const MULTIPLICATIVE: &[(Token, ast::BinaryOp)] = &[
    (Token::Star, ast::BinaryOp::Mul),
    (Token::Slash, ast::BinaryOp::Div),
    (Token::Percent, ast::BinaryOp::Rem),
];

impl<'source> Parser<'source> {
    /// Construct a new parser.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: Lexer::new(source),
            peeked: None,
        }
    }

    /// Parses a complete expression, the entire source must be consumed.
    pub fn parse_expr_eof(mut self) -> Result<ast::Expr> {
        let expr = self.parse_expr()?;
        match self.next()? {
            Some((tk, span)) => Err(self.err_unexpected_token("end of expression", tk, span)),
            None => Ok(expr),
        }
    }

    /// Parses an expression.
    ///
    /// This is the lowest precedence level: `cond ? then : otherwise`. The
    /// ternary operator is right associative.
    fn parse_expr(&mut self) -> Result<ast::Expr> {
        let cond = self.parse_logical(ast::LogicalOp::Coalesce)?;
        if !self.is_next(Token::Question)? {
            return Ok(cond);
        }
        self.expect(Token::Question)?;
        let then = self.parse_expr()?;
        self.expect(Token::Colon)?;
        let otherwise = self.parse_expr()?;
        let span = cond.span().combine(otherwise.span());
        Ok(ast::Expr::Ternary(ast::Ternary {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
            span,
        }))
    }

    /// Parses the short-circuiting operators `??`, `||` and `&&` in
    /// increasing order of precedence.
    fn parse_logical(&mut self, op: ast::LogicalOp) -> Result<ast::Expr> {
        let (token, next) = match op {
            ast::LogicalOp::Coalesce => (Token::QuestionQuestion, Some(ast::LogicalOp::Or)),
            ast::LogicalOp::Or => (Token::OrOr, Some(ast::LogicalOp::And)),
            ast::LogicalOp::And => (Token::AndAnd, None),
        };
        let operand = |p: &mut Self| match next {
            Some(op) => p.parse_logical(op),
            None => p.parse_binary(0),
        };

        let mut lhs = operand(self)?;
        while self.is_next(token)? {
            self.expect(token)?;
            let rhs = operand(self)?;
            let span = lhs.span().combine(rhs.span());
            lhs = ast::Expr::Logical(ast::Logical {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            });
        }
        Ok(lhs)
    }

    /// Parses a left associative chain of binary operators at the given
    /// precedence level.
    fn parse_binary(&mut self, level: usize) -> Result<ast::Expr> {
        let ops = LEVELS[level];
        let operand = |p: &mut Self| match level + 1 < LEVELS.len() {
            true => p.parse_binary(level + 1),
            false => p.parse_unary(),
        };

        let mut lhs = operand(self)?;
        loop {
            let op = match self.peek()? {
                Some((tk, _)) => ops.iter().find(|(t, _)| *t == tk).map(|(_, op)| *op),
                None => None,
            };
            let Some(op) = op else {
                return Ok(lhs);
            };
            self.next()?;
            let rhs = operand(self)?;
            let span = lhs.span().combine(rhs.span());
            lhs = ast::Expr::Binary(ast::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            });
        }
    }

    /// Parses a prefix operator `!`, `-` or `+` or falls through to a
    /// postfix expression.
    fn parse_unary(&mut self) -> Result<ast::Expr> {
        let op = match self.peek()? {
            Some((Token::Bang, _)) => ast::UnaryOp::Not,
            Some((Token::Minus, _)) => ast::UnaryOp::Neg,
            Some((Token::Plus, _)) => ast::UnaryOp::Pos,
            _ => return self.parse_postfix(),
        };
        let (_, begin) = self.parse()?;
        let expr = self.parse_unary()?;
        let span = begin.combine(expr.span());
        Ok(ast::Expr::Unary(ast::Unary {
            op,
            expr: Box::new(expr),
            span,
        }))
    }

    /// Parses a primary expression followed by any number of property
    /// accesses, e.g. `user.names[0]?.first`.
    fn parse_postfix(&mut self) -> Result<ast::Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            let (op, access) = match self.peek()? {
                Some((Token::Dot, _)) => {
                    self.next()?;
                    (ast::AccessOp::Direct, self.parse_access()?)
                }
                Some((Token::QuestionDot, _)) => {
                    self.next()?;
                    let access = match self.is_next(Token::OpenBracket)? {
                        true => self.parse_computed()?,
                        false => self.parse_access()?,
                    };
                    (ast::AccessOp::Optional, access)
                }
                Some((Token::OpenBracket, _)) => (ast::AccessOp::Direct, self.parse_computed()?),
                _ => return Ok(expr),
            };
            let span = expr.span().combine(access.span());
            expr = ast::Expr::Member(ast::Member {
                receiver: Box::new(expr),
                op,
                access,
                span,
            });
        }
    }

    /// Parses a literal, a variable, a list literal or a parenthesized
    /// expression.
    fn parse_primary(&mut self) -> Result<ast::Expr> {
        let expr = match self.parse()? {
            (Token::Number, span) => ast::Expr::Literal(self.parse_literal_number(span)?),
            (Token::String, span) => ast::Expr::Literal(self.parse_literal_string(span)?),
            (Token::Keyword, span) => ast::Expr::Literal(self.parse_literal_keyword(span)),
            (Token::Ident, span) => ast::Expr::Var(ast::Ident { span }),
            (Token::OpenParen, _) => {
                let expr = self.parse_expr()?;
                self.expect(Token::CloseParen)?;
                expr
            }
            (Token::OpenBracket, begin) => ast::Expr::List(self.parse_list(begin)?),
            (tk, span) => {
                return Err(self.err_unexpected_token("expression", tk, span));
            }
        };
        Ok(expr)
    }

    /// Parses the items of a list literal, e.g. `[1, 'two', three]`. The
    /// opening bracket has already been consumed. A trailing comma is
    /// allowed.
    fn parse_list(&mut self, begin: Span) -> Result<ast::List> {
        let mut items = Vec::new();
        let end = loop {
            if self.is_next(Token::CloseBracket)? {
                break self.expect(Token::CloseBracket)?;
            }
            items.push(self.parse_expr()?);
            match self.parse()? {
                (Token::Comma, _) => continue,
                (Token::CloseBracket, span) => break span,
                (tk, span) => {
                    return Err(self.err_unexpected_token("comma or `]`", tk, span));
                }
            }
        };
        Ok(ast::List {
            items,
            span: begin.combine(end),
        })
    }

    /// Parses the part after a member access operator.
    fn parse_access(&mut self) -> Result<ast::Access> {
        match self.next()? {
            Some((Token::Ident | Token::Keyword, span)) => {
                Ok(ast::Access::Key(ast::Ident { span }))
            }
            Some((Token::Index, span)) => {
                let value = self.source()[span].parse().map_err(|_| {
                    Error::syntax("index out of range for usize", self.source(), span)
                })?;
                Ok(ast::Access::Index(ast::Index { value, span }))
            }
            Some((tk, span)) => Err(self.err_unexpected_token("identifier or index", tk, span)),
            None => Err(self.err_unexpected_eof("identifier or index")),
        }
    }

    /// Parses a computed property access, e.g. `[key]`.
    fn parse_computed(&mut self) -> Result<ast::Access> {
        self.expect(Token::OpenBracket)?;
        let expr = self.parse_expr()?;
        self.expect(Token::CloseBracket)?;
        Ok(ast::Access::Computed(Box::new(expr)))
    }

    /// Parses an integer, falling back to a float for fractions, exponents
    /// and integers too large for 64 bits.
    fn parse_literal_number(&self, span: Span) -> Result<ast::Literal> {
        let raw = &self.source()[span];
        if let Ok(int) = raw.parse::<i64>() {
            let value = Value::Integer(int);
            return Ok(ast::Literal { value, span });
        }
        let float: f64 = raw
            .parse()
            .map_err(|_| Error::syntax("invalid number literal", self.source(), span))?;
        let value = Value::Float(float);
        Ok(ast::Literal { value, span })
    }

    /// Parses a string literal and handles escape characters.
    fn parse_literal_string(&self, span: Span) -> Result<ast::Literal> {
        let value = lex::unescape(&self.source()[span]).map_err(|i| {
            let m = span.m + i;
            let n = self.source()[m..]
                .chars()
                .nth(1)
                .map_or(m + 1, |c| m + 1 + c.len_utf8());
            Error::syntax("unknown escape character", self.source(), m..n)
        })?;
        let value = Value::String(value);
        Ok(ast::Literal { value, span })
    }

    /// Parses one of `true`, `false` or `null`.
    fn parse_literal_keyword(&self, span: Span) -> ast::Literal {
        let value = match &self.source()[span] {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::None,
        };
        ast::Literal { value, span }
    }

    /// Parses any token.
    fn parse(&mut self) -> Result<(Token, Span)> {
        match self.next()? {
            Some((tk, sp)) => Ok((tk, sp)),
            None => Err(self.err_unexpected_eof("expression")),
        }
    }

    /// Parses the specified token and returns its span.
    fn expect(&mut self, exp: Token) -> Result<Span> {
        match self.next()? {
            Some((tk, span)) if tk == exp => Ok(span),
            Some((tk, span)) => Err(self.err_unexpected_token(exp.human(), tk, span)),
            None => Err(self.err_unexpected_eof(exp.human())),
        }
    }

    /// Returns `true` if the next token is equal to the provided one.
    fn is_next(&mut self, token: Token) -> Result<bool> {
        Ok(self.peek()?.map(|(tk, _)| tk == token).unwrap_or(false))
    }

    /// Returns a copy of the next token without affecting the result of the
    /// following `.next()` call.
    fn peek(&mut self) -> Result<Option<(Token, Span)>> {
        match self.peeked {
            Some(peeked) => Ok(peeked),
            None => {
                let peeked = self.tokens.next()?;
                self.peeked = Some(peeked);
                Ok(peeked)
            }
        }
    }

    /// Returns the next token and span in the stream.
    fn next(&mut self) -> Result<Option<(Token, Span)>> {
        match self.peeked.take() {
            Some(v) => Ok(v),
            None => self.tokens.next(),
        }
    }

    fn source(&self) -> &str {
        self.tokens.source
    }

    fn err_unexpected_eof(&self, exp: impl Display) -> Error {
        let n = self.source().len();
        Error::syntax(format!("expected {exp}, found EOF"), self.source(), n..n)
    }

    fn err_unexpected_token(&self, exp: impl Display, got: Token, span: Span) -> Error {
        let got = got.human();
        Error::syntax(format!("expected {exp}, found {got}"), self.source(), span)
    }
}
