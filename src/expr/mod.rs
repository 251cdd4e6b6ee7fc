//! The expression language used by conditions, loop sources and
//! interpolations.
//!
//! Expressions are parsed into an AST and evaluated against a [`Context`].
//! Evaluation has access to exactly the context's bindings and nothing else.
//! It is not a sandbox: templates are trusted code.

mod eval;
mod lex;
mod parse;

pub(crate) use crate::expr::lex::{is_ident, is_ident_start, unescape};

use crate::context::Context;
use crate::expr::eval::Evaluator;
use crate::expr::parse::Parser;
use crate::value::ValueCow;
use crate::Result;

/// Parses and evaluates an expression.
pub(crate) fn eval<'ctx>(source: &str, ctx: &'ctx Context<'ctx>) -> Result<ValueCow<'ctx>> {
    let expr = Parser::new(source).parse_expr_eof()?;
    Evaluator::new(source, ctx).eval(&expr)
}
