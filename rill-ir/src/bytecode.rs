#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use rill_source::Span;

use crate::constant::Constant;
use crate::module::QualifiedName;
use crate::types::{FunctionType, Type};

/// Virtual register index, dense within a method body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reg(pub u32);

/// An ordered bytecode sequence. Loop and conditional bodies nest as
/// sub-blocks rather than jumping to labels.
pub type Block = Vec<Inst>;

#[derive(Clone, Debug, PartialEq)]
pub struct Inst {
    pub span: Span,
    pub kind: InstKind,
}

impl Inst {
    pub fn new(span: Span, kind: InstKind) -> Self {
        Self { span, kind }
    }
}

/// Comparators shared by `Assert`, `Assume` and `If`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Neq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    ElemOf,
    Subset,
    SubsetEq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithKind {
    Add,
    Sub,
    Mul,
    Div,
    Range,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListOpKind {
    Append,
    LeftAppend,
    RightAppend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOpKind {
    Union,
    LeftUnion,
    RightUnion,
    Intersection,
    LeftIntersection,
    RightIntersection,
    Difference,
    LeftDifference,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrOpKind {
    Append,
    LeftAppend,
    RightAppend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnArithKind {
    Neg,
    Numerator,
    Denominator,
}

/// One segment of an `Update` access path.
#[derive(Clone, Debug, PartialEq)]
pub enum LVal {
    Record {
        field: String,
        fields: BTreeMap<String, Type>,
    },
    List {
        index: Reg,
    },
    Map {
        key: Reg,
    },
    Str {
        index: Reg,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum InstKind {
    /// Check a comparison; emits a proof obligation unless translated in
    /// assume mode.
    Assert {
        op: Comparator,
        left: Reg,
        right: Reg,
        ty: Type,
        msg: String,
    },

    /// Add a comparison as a trusted path fact.
    Assume {
        op: Comparator,
        left: Reg,
        right: Reg,
        ty: Type,
    },

    Assign {
        target: Reg,
        operand: Reg,
    },

    /// Identical to `Assign` for verification purposes; the distinction
    /// matters only to ownership analysis upstream.
    Move {
        target: Reg,
        operand: Reg,
    },

    BinArith {
        kind: ArithKind,
        target: Reg,
        left: Reg,
        right: Reg,
        ty: Type,
    },

    BinList {
        kind: ListOpKind,
        target: Reg,
        left: Reg,
        right: Reg,
        ty: Type,
    },

    BinSet {
        kind: SetOpKind,
        target: Reg,
        left: Reg,
        right: Reg,
        ty: Type,
    },

    BinStr {
        kind: StrOpKind,
        target: Reg,
        left: Reg,
        right: Reg,
    },

    Convert {
        target: Reg,
        operand: Reg,
        from: Type,
        to: Type,
    },

    Const {
        target: Reg,
        constant: Constant,
    },

    Debug {
        operand: Reg,
    },

    Dereference {
        target: Reg,
        operand: Reg,
    },

    FieldLoad {
        target: Reg,
        operand: Reg,
        field: String,
        fields: BTreeMap<String, Type>,
    },

    /// Fork point: the comparison holds on the `then` arm, its inversion
    /// on the `else` arm; both arms continue into the block remainder.
    If {
        op: Comparator,
        left: Reg,
        right: Reg,
        ty: Type,
        then_blk: Block,
        else_blk: Block,
    },

    /// Runtime type test.
    IfIs {
        operand: Reg,
        test: Type,
        then_blk: Block,
        else_blk: Block,
    },

    IndexOf {
        target: Reg,
        left: Reg,
        right: Reg,
    },

    IndirectInvoke {
        target: Option<Reg>,
        operand: Reg,
        operands: Vec<Reg>,
    },

    Invoke {
        target: Option<Reg>,
        name: QualifiedName,
        sig: FunctionType,
        operands: Vec<Reg>,
    },

    /// Bitwise inversion.
    Invert {
        target: Reg,
        operand: Reg,
    },

    LengthOf {
        target: Reg,
        operand: Reg,
    },

    /// Condition-less loop over `body`; `modified` lists the registers the
    /// body may write.
    Loop {
        modified: Vec<Reg>,
        body: Block,
    },

    /// Iteration over a collection: `index` is the induction register,
    /// `source` the collection register, `ty` the collection's type.
    For {
        source: Reg,
        index: Reg,
        ty: Type,
        modified: Vec<Reg>,
        body: Block,
    },

    /// Leave the nearest enclosing loop.
    Exit,

    NewList {
        target: Reg,
        operands: Vec<Reg>,
    },

    NewMap {
        target: Reg,
        operands: Vec<(Reg, Reg)>,
    },

    NewObject {
        target: Reg,
        operand: Reg,
    },

    /// Field/operand pairs in bytecode-declared order; translation
    /// re-sorts them lexicographically by field name.
    NewRecord {
        target: Reg,
        fields: Vec<(String, Reg)>,
    },

    NewSet {
        target: Reg,
        operands: Vec<Reg>,
    },

    NewTuple {
        target: Reg,
        operands: Vec<Reg>,
    },

    Nop,

    Return {
        operand: Option<Reg>,
    },

    /// `operands` are source, start and end.
    SubList {
        target: Reg,
        operands: [Reg; 3],
    },

    SubStr {
        target: Reg,
        operands: [Reg; 3],
    },

    Throw {
        operand: Reg,
    },

    TryCatch {
        body: Block,
        catches: Vec<(Type, Block)>,
    },

    TupleLoad {
        target: Reg,
        operand: Reg,
        index: usize,
    },

    UnArith {
        kind: UnArithKind,
        target: Reg,
        operand: Reg,
    },

    /// Compound in-place mutation through an access path: `operand` holds
    /// the new value written at the end of `path`, `target` the structure
    /// being rebuilt.
    Update {
        target: Reg,
        operand: Reg,
        path: Vec<LVal>,
    },
}
