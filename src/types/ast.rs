//! AST representing an expression.

use crate::types::span::Span;
use crate::Value;

#[cfg_attr(internal_debug, derive(Debug))]
pub enum Expr {
    Literal(Literal),
    List(List),
    Var(Ident),
    Member(Member),
    Unary(Unary),
    Binary(Binary),
    Logical(Logical),
    Ternary(Ternary),
}

#[cfg_attr(internal_debug, derive(Debug))]
pub struct Literal {
    pub value: Value,
    pub span: Span,
}

#[cfg_attr(internal_debug, derive(Debug))]
pub struct List {
    pub items: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Copy)]
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Ident {
    pub span: Span,
}

/// A property access, e.g. `user.name`, `users[0]` or `user?.name`.
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Member {
    pub receiver: Box<Expr>,
    pub op: AccessOp,
    pub access: Access,
    pub span: Span,
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(internal_debug, derive(Debug))]
pub enum AccessOp {
    Direct,
    Optional,
}

#[cfg_attr(internal_debug, derive(Debug))]
pub enum Access {
    Index(Index),
    Key(Ident),
    Computed(Box<Expr>),
}

#[derive(Clone, Copy)]
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Index {
    pub value: usize,
    pub span: Span,
}

#[cfg_attr(internal_debug, derive(Debug))]
pub struct Unary {
    pub op: UnaryOp,
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(internal_debug, derive(Debug))]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
}

#[cfg_attr(internal_debug, derive(Debug))]
pub struct Binary {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(internal_debug, derive(Debug))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A short-circuiting operator. These evaluate to one of their operands
/// rather than to a boolean.
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Logical {
    pub op: LogicalOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(internal_debug, derive(Debug))]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

#[cfg_attr(internal_debug, derive(Debug))]
pub struct Ternary {
    pub cond: Box<Expr>,
    pub then: Box<Expr>,
    pub otherwise: Box<Expr>,
    pub span: Span,
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(lit) => lit.span,
            Self::List(list) => list.span,
            Self::Var(ident) => ident.span,
            Self::Member(member) => member.span,
            Self::Unary(unary) => unary.span,
            Self::Binary(binary) => binary.span,
            Self::Logical(logical) => logical.span,
            Self::Ternary(ternary) => ternary.span,
        }
    }
}

impl Access {
    pub fn span(&self) -> Span {
        match self {
            Self::Index(index) => index.span,
            Self::Key(ident) => ident.span,
            Self::Computed(expr) => expr.span(),
        }
    }
}

impl BinaryOp {
    pub const fn human(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::StrictEq => "===",
            Self::StrictNe => "!==",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}
