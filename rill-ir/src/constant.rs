#![forbid(unsafe_code)]

use num::{BigInt, BigRational};

/// Literal constants as they appear in `Const` bytecodes.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Byte(u8),
    Char(char),
    Integer(BigInt),
    Rational(BigRational),
    Str(String),
    List(Vec<Constant>),
    Set(Vec<Constant>),
    Map(Vec<(Constant, Constant)>),
    Tuple(Vec<Constant>),
}

impl Constant {
    pub fn integer(value: i64) -> Self {
        Constant::Integer(BigInt::from(value))
    }
}
