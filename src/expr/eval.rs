use std::cmp::Ordering;

use crate::context::Context;
use crate::types::ast;
use crate::types::span::Span;
use crate::value::ValueCow;
use crate::{Error, Result, Value};

/// Walks an expression tree, looking up variables in a context.
pub struct Evaluator<'source, 'ctx> {
    /// The expression source, used to look up identifiers and report errors.
    source: &'source str,
    ctx: &'ctx Context<'ctx>,
}

/// A property name or index, after evaluating a member access.
enum Key<'a> {
    Name(std::borrow::Cow<'a, str>),
    Index(usize),
}

/// A number, after coercing an operand of an arithmetic or relational
/// operator.
#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl<'source, 'ctx> Evaluator<'source, 'ctx> {
    pub fn new(source: &'source str, ctx: &'ctx Context<'ctx>) -> Self {
        Self { source, ctx }
    }

    pub fn eval(&self, expr: &ast::Expr) -> Result<ValueCow<'ctx>> {
        match expr {
            ast::Expr::Literal(lit) => Ok(ValueCow::Owned(lit.value.clone())),

            ast::Expr::List(list) => {
                let items = list
                    .items
                    .iter()
                    .map(|item| self.eval(item).map(ValueCow::into_owned))
                    .collect::<Result<_>>()?;
                Ok(ValueCow::Owned(Value::List(items)))
            }

            ast::Expr::Var(ident) => {
                let name = &self.source[ident.span];
                match self.ctx.lookup(name) {
                    Some(value) => Ok(ValueCow::Borrowed(value)),
                    None => Err(self.err(format!("`{name}` is not defined"), ident.span)),
                }
            }

            ast::Expr::Member(member) => {
                let value = self.eval_member(member)?;
                Ok(value.unwrap_or(ValueCow::Owned(Value::None)))
            }

            ast::Expr::Unary(unary) => {
                let value = self.eval(&unary.expr)?;
                let value = match unary.op {
                    ast::UnaryOp::Not => Value::Bool(!value.is_truthy()),
                    ast::UnaryOp::Pos => self.to_number(&value, unary.span)?.into(),
                    ast::UnaryOp::Neg => match self.to_number(&value, unary.span)? {
                        Number::Int(n) => match n.checked_neg() {
                            Some(n) => Value::Integer(n),
                            None => Value::Float(-(n as f64)),
                        },
                        Number::Float(n) => Value::Float(-n),
                    },
                };
                Ok(ValueCow::Owned(value))
            }

            ast::Expr::Logical(logical) => {
                let lhs = self.eval(&logical.lhs)?;
                let short = match logical.op {
                    ast::LogicalOp::And => !lhs.is_truthy(),
                    ast::LogicalOp::Or => lhs.is_truthy(),
                    ast::LogicalOp::Coalesce => !lhs.is_none(),
                };
                match short {
                    true => Ok(lhs),
                    false => self.eval(&logical.rhs),
                }
            }

            ast::Expr::Ternary(ternary) => match self.eval(&ternary.cond)?.is_truthy() {
                true => self.eval(&ternary.then),
                false => self.eval(&ternary.otherwise),
            },

            ast::Expr::Binary(binary) => {
                let lhs = self.eval(&binary.lhs)?;
                let rhs = self.eval(&binary.rhs)?;
                let value = self.eval_binary(binary, &lhs, &rhs)?;
                Ok(ValueCow::Owned(value))
            }
        }
    }

    /// Evaluates a chain of property accesses.
    ///
    /// Returns `None` if an optional access in the chain found `null`, in
    /// which case the rest of the chain is skipped.
    fn eval_member(&self, member: &ast::Member) -> Result<Option<ValueCow<'ctx>>> {
        let receiver = match &*member.receiver {
            ast::Expr::Member(inner) => match self.eval_member(inner)? {
                Some(value) => value,
                None => return Ok(None),
            },
            expr => self.eval(expr)?,
        };

        if member.op == ast::AccessOp::Optional && receiver.is_none() {
            return Ok(None);
        }

        let key = match &member.access {
            ast::Access::Key(ident) => Key::Name(self.source[ident.span].into()),
            ast::Access::Index(index) => Key::Index(index.value),
            ast::Access::Computed(expr) => match self.eval(expr)?.into_owned() {
                Value::Integer(n) => match usize::try_from(n) {
                    Ok(i) => Key::Index(i),
                    Err(_) => Key::Name(n.to_string().into()),
                },
                Value::String(s) => Key::Name(s.into()),
                value => Key::Name(value.to_string().into()),
            },
        };

        let span = member.access.span();
        let value = match receiver {
            ValueCow::Borrowed(value) => self.property(value, &key, span)?,
            ValueCow::Owned(value) => {
                ValueCow::Owned(self.property(&value, &key, span)?.into_owned())
            }
        };
        Ok(Some(value))
    }

    /// Looks up a property of a value.
    fn property<'v>(&self, value: &'v Value, key: &Key<'_>, span: Span) -> Result<ValueCow<'v>> {
        let found = match (value, key) {
            (Value::None, _) => {
                let key = match key {
                    Key::Name(name) => name.to_string(),
                    Key::Index(i) => i.to_string(),
                };
                return Err(self.err(format!("cannot read property `{key}` of null"), span));
            }

            (Value::Map(map), Key::Name(name)) => match map.get(&**name) {
                Some(value) => return Ok(ValueCow::Borrowed(value)),
                None if name == "length" => Some(Value::from(map.len())),
                None => None,
            },
            (Value::Map(map), Key::Index(i)) => match map.get(&i.to_string()) {
                Some(value) => return Ok(ValueCow::Borrowed(value)),
                None => None,
            },

            (Value::List(list), Key::Index(i)) => match list.get(*i) {
                Some(value) => return Ok(ValueCow::Borrowed(value)),
                None => None,
            },
            (Value::List(list), Key::Name(name)) => match name.parse::<usize>() {
                Ok(i) => match list.get(i) {
                    Some(value) => return Ok(ValueCow::Borrowed(value)),
                    None => None,
                },
                Err(_) if name == "length" => Some(Value::from(list.len())),
                Err(_) => None,
            },

            (Value::String(s), Key::Index(i)) => {
                s.chars().nth(*i).map(|c| Value::String(c.into()))
            }
            (Value::String(s), Key::Name(name)) if name == "length" => {
                Some(Value::from(s.chars().count()))
            }

            _ => None,
        };
        Ok(ValueCow::Owned(found.unwrap_or_default()))
    }

    fn eval_binary(&self, binary: &ast::Binary, lhs: &Value, rhs: &Value) -> Result<Value> {
        use ast::BinaryOp::*;

        let value = match binary.op {
            Add if matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)) => {
                Value::String(format!("{lhs}{rhs}"))
            }
            Add | Sub | Mul | Div | Rem => {
                let a = self.to_number(binary, lhs)?;
                let b = self.to_number(binary, rhs)?;
                arithmetic(binary.op, a, b)
            }
            StrictEq => Value::Bool(strict_eq(lhs, rhs)),
            StrictNe => Value::Bool(!strict_eq(lhs, rhs)),
            Eq => Value::Bool(loose_eq(lhs, rhs)),
            Ne => Value::Bool(!loose_eq(lhs, rhs)),
            Lt | Le | Gt | Ge => {
                let ord = match (lhs, rhs) {
                    (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                    _ => {
                        let a = self.to_number(binary, lhs)?;
                        let b = self.to_number(binary, rhs)?;
                        compare(a, b)
                    }
                };
                let bool = match ord {
                    Some(ord) => match binary.op {
                        Lt => ord == Ordering::Less,
                        Le => ord != Ordering::Greater,
                        Gt => ord == Ordering::Greater,
                        _ => ord != Ordering::Less,
                    },
                    // NaN is not ordered
                    None => false,
                };
                Value::Bool(bool)
            }
        };
        Ok(value)
    }

    /// Coerces an operand to a number. Lists and maps are an error.
    fn to_number(&self, binary: &ast::Binary, value: &Value) -> Result<Number> {
        match to_number(value) {
            Some(n) => Ok(n),
            None => {
                let msg = format!(
                    "expected number for `{}`, found {}",
                    binary.op.human(),
                    value.human()
                );
                Err(self.err(msg, binary.span))
            }
        }
    }

    fn err(&self, msg: String, span: Span) -> Error {
        Error::eval(msg, self.source, span)
    }
}

fn to_number(value: &Value) -> Option<Number> {
    let n = match value {
        Value::None => Number::Int(0),
        Value::Bool(b) => Number::Int(i64::from(*b)),
        Value::Integer(n) => Number::Int(*n),
        Value::Float(n) => Number::Float(*n),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Number::Int(0)
            } else if let Ok(n) = s.parse() {
                Number::Int(n)
            } else {
                Number::Float(s.parse().unwrap_or(f64::NAN))
            }
        }
        Value::List(_) | Value::Map(_) => return None,
    };
    Some(n)
}

/// Integer arithmetic is checked, falling back to floating point when the
/// result does not fit or the division is inexact.
fn arithmetic(op: ast::BinaryOp, a: Number, b: Number) -> Value {
    use ast::BinaryOp::*;

    if let (Number::Int(a), Number::Int(b)) = (a, b) {
        let int = match op {
            Add => a.checked_add(b),
            Sub => a.checked_sub(b),
            Mul => a.checked_mul(b),
            Div if a.checked_rem(b) == Some(0) => a.checked_div(b),
            Rem => a.checked_rem(b),
            _ => None,
        };
        if let Some(n) = int {
            return Value::Integer(n);
        }
    }

    let (a, b) = (a.as_f64(), b.as_f64());
    let float = match op {
        Add => a + b,
        Sub => a - b,
        Mul => a * b,
        Div => a / b,
        _ => a % b,
    };
    Value::Float(float)
}

fn compare(a: Number, b: Number) -> Option<Ordering> {
    match (a, b) {
        (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
        (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
    }
}

/// Equality without coercion, except that integers and floats compare by
/// numeric value.
fn strict_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
            *a as f64 == *b
        }
        _ => lhs == rhs,
    }
}

/// Equality that also equates numbers with numeric strings and booleans with
/// `0` and `1`.
fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    if strict_eq(lhs, rhs) {
        return true;
    }
    let scalar = |v: &Value| {
        matches!(
            v,
            Value::Bool(_) | Value::Integer(_) | Value::Float(_) | Value::String(_)
        )
    };
    if !scalar(lhs) || !scalar(rhs) {
        return false;
    }
    if let (Value::String(_), Value::String(_)) = (lhs, rhs) {
        return false;
    }
    match (to_number(lhs), to_number(rhs)) {
        (Some(a), Some(b)) => compare(a, b) == Some(Ordering::Equal),
        _ => false,
    }
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(n) => n,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(n) => Value::Integer(n),
            Number::Float(n) => Value::Float(n),
        }
    }
}
