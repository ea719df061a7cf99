#![forbid(unsafe_code)]

use num::{BigInt, BigRational};

/// Semantic constant values.
///
/// Strings, lists and maps do not appear here: the converter encodes them
/// as `Set`s of index/key pairs before they reach the logic level.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(BigInt),
    Rational(BigRational),
    Set(Vec<Value>),
    Tuple(Vec<Value>),
}

impl Value {
    pub fn integer(value: i64) -> Self {
        Value::Integer(BigInt::from(value))
    }

    /// An index/element pair as used by the string, list and map encodings.
    pub fn pair(first: Value, second: Value) -> Self {
        Value::Tuple(vec![first, second])
    }
}
