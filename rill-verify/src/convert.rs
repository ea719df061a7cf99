#![forbid(unsafe_code)]

use num::BigInt;
use rill_ir::{Constant, Type};
use rill_logic::{Expr, Sort, Value};
use rill_source::Span;

/// Map a source type onto its logic sort.
///
/// Total over the closed type algebra; the match's exhaustiveness is the
/// safety net. `Reference` collapses to `Any`, a known soundness gap kept
/// for output compatibility.
pub fn convert_type(ty: &Type) -> Sort {
    match ty {
        Type::Any => Sort::Any,
        Type::Void => Sort::Void,
        Type::Bool => Sort::Bool,
        Type::Byte | Type::Char | Type::Int => Sort::Int,
        Type::Real => Sort::Real,
        Type::Str => Sort::Str,
        Type::Set(elem) => Sort::set(convert_type(elem)),
        Type::Map(key, value) => Sort::map(convert_type(key), convert_type(value)),
        Type::List(elem) => Sort::list(convert_type(elem)),
        Type::Tuple(elems) => Sort::Tuple(elems.iter().map(convert_type).collect()),
        // Field names drop out; lexicographic order is the BTreeMap's
        // iteration order, matching the field-index derivation.
        Type::Record(fields) => Sort::Tuple(fields.values().map(convert_type).collect()),
        Type::Reference(_) => Sort::Any,
    }
}

/// Tuple sort over a parameter list, as used for function prototypes.
pub fn convert_type_list(types: &[Type]) -> Sort {
    Sort::Tuple(types.iter().map(convert_type).collect())
}

/// Map a literal constant onto its semantic value.
///
/// Strings become sets of (index, char-code) pairs, lists sets of
/// (index, element) pairs, maps sets of (key, value) pairs. `Null`
/// approximates to integer zero.
pub fn convert_constant(constant: &Constant) -> Value {
    match constant {
        Constant::Null => Value::integer(0),
        Constant::Bool(b) => Value::Bool(*b),
        Constant::Byte(b) => Value::Integer(BigInt::from(*b)),
        Constant::Char(c) => Value::Integer(BigInt::from(*c as u32)),
        Constant::Integer(i) => Value::Integer(i.clone()),
        Constant::Rational(r) => Value::Rational(r.clone()),
        Constant::Str(s) => Value::Set(
            s.chars()
                .enumerate()
                .map(|(i, c)| {
                    Value::pair(
                        Value::Integer(BigInt::from(i)),
                        Value::Integer(BigInt::from(c as u32)),
                    )
                })
                .collect(),
        ),
        Constant::List(elems) => Value::Set(
            elems
                .iter()
                .enumerate()
                .map(|(i, elem)| {
                    Value::pair(Value::Integer(BigInt::from(i)), convert_constant(elem))
                })
                .collect(),
        ),
        Constant::Map(pairs) => Value::Set(
            pairs
                .iter()
                .map(|(k, v)| Value::pair(convert_constant(k), convert_constant(v)))
                .collect(),
        ),
        Constant::Set(elems) => Value::Set(elems.iter().map(convert_constant).collect()),
        Constant::Tuple(elems) => Value::Tuple(elems.iter().map(convert_constant).collect()),
    }
}

/// Convert an entry scope's parameter list into quantifiable
/// (sort, variable) pairs.
pub fn convert_parameters(params: &[(Type, String)]) -> Vec<(Sort, String)> {
    params
        .iter()
        .map(|(ty, var)| (convert_type(ty), var.clone()))
        .collect()
}

/// The `r{i}` variable expressions standing for a parameter list.
pub fn parameter_variables(params: &[(Type, String)], span: Span) -> Vec<Expr> {
    params
        .iter()
        .map(|(_, var)| Expr::variable(var.clone(), span))
        .collect()
}
