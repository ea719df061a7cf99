#![forbid(unsafe_code)]

use rill_source::Span;

use crate::sort::Sort;
use crate::value::Value;

/// A logic expression. Immutable once built; clone freely.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    LengthOf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,

    Eq,
    Neq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    In,
    Subset,
    SubsetEq,
    Supset,
    SupsetEq,

    ListAppend,
    SetUnion,
    SetIntersection,
    SetDifference,

    Implies,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NaryOp {
    And,
    Or,
    Tuple,
    List,
    Set,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantKind {
    ForAll,
    Exists,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Constant(Value),
    Variable(String),

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    Nary {
        op: NaryOp,
        operands: Vec<Expr>,
    },

    /// Static tuple/record component access.
    Load {
        src: Box<Expr>,
        index: usize,
    },

    /// Dynamic list element access.
    IndexOf {
        src: Box<Expr>,
        index: Box<Expr>,
    },

    ListRange {
        start: Box<Expr>,
        end: Box<Expr>,
    },

    SubList {
        src: Box<Expr>,
        start: Box<Expr>,
        end: Box<Expr>,
    },

    ListUpdate {
        src: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
    },

    Quantifier {
        kind: QuantKind,
        vars: Vec<(Sort, String)>,
        body: Box<Expr>,
    },

    /// Uninterpreted function application; the argument is always a tuple.
    FunCall {
        name: String,
        arg: Box<Expr>,
    },
}

impl Expr {
    pub fn new(span: Span, kind: ExprKind) -> Self {
        Self { span, kind }
    }

    pub fn constant(value: Value, span: Span) -> Self {
        Self::new(span, ExprKind::Constant(value))
    }

    pub fn boolean(value: bool, span: Span) -> Self {
        Self::constant(Value::Bool(value), span)
    }

    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Self::new(span, ExprKind::Variable(name.into()))
    }

    pub fn unary(op: UnaryOp, operand: Expr, span: Span) -> Self {
        Self::new(
            span,
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
        )
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, span: Span) -> Self {
        Self::new(
            span,
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        )
    }

    pub fn nary(op: NaryOp, operands: Vec<Expr>, span: Span) -> Self {
        Self::new(span, ExprKind::Nary { op, operands })
    }

    /// Conjunction with `true` as the empty identity; a single fact stands
    /// on its own.
    pub fn and(mut facts: Vec<Expr>, span: Span) -> Self {
        match facts.len() {
            0 => Self::boolean(true, span),
            1 => facts.remove(0),
            _ => Self::nary(NaryOp::And, facts, span),
        }
    }

    /// Disjunction with `false` as the empty identity.
    pub fn or(mut alternatives: Vec<Expr>, span: Span) -> Self {
        match alternatives.len() {
            0 => Self::boolean(false, span),
            1 => alternatives.remove(0),
            _ => Self::nary(NaryOp::Or, alternatives, span),
        }
    }

    pub fn implies(lhs: Expr, rhs: Expr, span: Span) -> Self {
        Self::binary(BinaryOp::Implies, lhs, rhs, span)
    }

    pub fn not(operand: Expr, span: Span) -> Self {
        Self::unary(UnaryOp::Not, operand, span)
    }

    pub fn load(src: Expr, index: usize, span: Span) -> Self {
        Self::new(
            span,
            ExprKind::Load {
                src: Box::new(src),
                index,
            },
        )
    }

    pub fn index_of(src: Expr, index: Expr, span: Span) -> Self {
        Self::new(
            span,
            ExprKind::IndexOf {
                src: Box::new(src),
                index: Box::new(index),
            },
        )
    }

    pub fn list_range(start: Expr, end: Expr, span: Span) -> Self {
        Self::new(
            span,
            ExprKind::ListRange {
                start: Box::new(start),
                end: Box::new(end),
            },
        )
    }

    pub fn sub_list(src: Expr, start: Expr, end: Expr, span: Span) -> Self {
        Self::new(
            span,
            ExprKind::SubList {
                src: Box::new(src),
                start: Box::new(start),
                end: Box::new(end),
            },
        )
    }

    pub fn list_update(src: Expr, index: Expr, value: Expr, span: Span) -> Self {
        Self::new(
            span,
            ExprKind::ListUpdate {
                src: Box::new(src),
                index: Box::new(index),
                value: Box::new(value),
            },
        )
    }

    pub fn quantifier(kind: QuantKind, vars: Vec<(Sort, String)>, body: Expr, span: Span) -> Self {
        Self::new(
            span,
            ExprKind::Quantifier {
                kind,
                vars,
                body: Box::new(body),
            },
        )
    }

    pub fn forall(vars: Vec<(Sort, String)>, body: Expr, span: Span) -> Self {
        Self::quantifier(QuantKind::ForAll, vars, body, span)
    }

    pub fn exists(vars: Vec<(Sort, String)>, body: Expr, span: Span) -> Self {
        Self::quantifier(QuantKind::Exists, vars, body, span)
    }

    pub fn fun_call(name: impl Into<String>, arg: Expr, span: Span) -> Self {
        Self::new(
            span,
            ExprKind::FunCall {
                name: name.into(),
                arg: Box::new(arg),
            },
        )
    }
}
