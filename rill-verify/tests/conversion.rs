use std::collections::BTreeMap;

use num::BigInt;
use rill_ir::{Constant, Type, field_index};
use rill_logic::{Sort, Value};
use rill_verify::{convert_constant, convert_type};

fn ab_record() -> Type {
    Type::Record(BTreeMap::from([
        ("a".to_string(), Type::Int),
        ("b".to_string(), Type::Bool),
    ]))
}

#[test]
fn records_collapse_to_name_sorted_tuples() {
    assert_eq!(
        convert_type(&ab_record()),
        Sort::Tuple(vec![Sort::Int, Sort::Bool])
    );
}

#[test]
fn field_indices_are_stable_across_derivations() {
    let Type::Record(fields) = ab_record() else {
        unreachable!()
    };
    let first = field_index(&fields, "b");
    let second = field_index(&fields, "b");
    assert_eq!(first, Some(1));
    assert_eq!(first, second);
    assert_eq!(field_index(&fields, "a"), Some(0));
    assert_eq!(field_index(&fields, "missing"), None);
}

#[test]
fn primitive_types_map_onto_their_sorts() {
    assert_eq!(convert_type(&Type::Any), Sort::Any);
    assert_eq!(convert_type(&Type::Void), Sort::Void);
    assert_eq!(convert_type(&Type::Bool), Sort::Bool);
    assert_eq!(convert_type(&Type::Byte), Sort::Int);
    assert_eq!(convert_type(&Type::Char), Sort::Int);
    assert_eq!(convert_type(&Type::Int), Sort::Int);
    assert_eq!(convert_type(&Type::Real), Sort::Real);
    assert_eq!(convert_type(&Type::Str), Sort::Str);
}

#[test]
fn compound_types_convert_structurally() {
    assert_eq!(
        convert_type(&Type::Set(Box::new(Type::Int))),
        Sort::set(Sort::Int)
    );
    assert_eq!(
        convert_type(&Type::Map(Box::new(Type::Str), Box::new(Type::Bool))),
        Sort::map(Sort::Str, Sort::Bool)
    );
    assert_eq!(
        convert_type(&Type::List(Box::new(ab_record()))),
        Sort::list(Sort::Tuple(vec![Sort::Int, Sort::Bool]))
    );
    assert_eq!(
        convert_type(&Type::Tuple(vec![Type::Int, Type::Real])),
        Sort::Tuple(vec![Sort::Int, Sort::Real])
    );
}

#[test]
fn references_collapse_to_any() {
    assert_eq!(convert_type(&Type::Reference(Box::new(Type::Int))), Sort::Any);
}

#[test]
fn string_constants_become_index_charcode_pairs() {
    assert_eq!(
        convert_constant(&Constant::Str("ab".to_string())),
        Value::Set(vec![
            Value::pair(Value::integer(0), Value::integer(97)),
            Value::pair(Value::integer(1), Value::integer(98)),
        ])
    );
}

#[test]
fn list_constants_become_index_element_pairs() {
    let list = Constant::List(vec![Constant::Bool(true), Constant::Bool(false)]);
    assert_eq!(
        convert_constant(&list),
        Value::Set(vec![
            Value::pair(Value::integer(0), Value::Bool(true)),
            Value::pair(Value::integer(1), Value::Bool(false)),
        ])
    );
}

#[test]
fn map_constants_become_key_value_pairs() {
    let map = Constant::Map(vec![(Constant::integer(1), Constant::Bool(true))]);
    assert_eq!(
        convert_constant(&map),
        Value::Set(vec![Value::pair(Value::integer(1), Value::Bool(true))])
    );
}

#[test]
fn null_approximates_to_integer_zero() {
    assert_eq!(convert_constant(&Constant::Null), Value::integer(0));
}

#[test]
fn chars_and_bytes_convert_to_their_codes() {
    assert_eq!(
        convert_constant(&Constant::Char('a')),
        Value::Integer(BigInt::from(97))
    );
    assert_eq!(
        convert_constant(&Constant::Byte(7)),
        Value::Integer(BigInt::from(7))
    );
}

#[test]
fn sets_and_tuples_convert_elementwise() {
    assert_eq!(
        convert_constant(&Constant::Set(vec![Constant::integer(3)])),
        Value::Set(vec![Value::integer(3)])
    );
    assert_eq!(
        convert_constant(&Constant::Tuple(vec![
            Constant::integer(3),
            Constant::Bool(true)
        ])),
        Value::Tuple(vec![Value::integer(3), Value::Bool(true)])
    );
}
