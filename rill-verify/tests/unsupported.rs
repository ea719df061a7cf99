mod common;

use common::{generate, inst, method};
use rill_ir::{InstKind, ModuleRegistry, Reg, Type, UnArithKind};
use rill_verify::VcError;

fn expect_unsupported(kind: InstKind) {
    let m = method(vec![Type::Int], vec![inst(kind)]);
    let err = generate(&ModuleRegistry::new(), &m).expect_err("expected failure");
    assert!(
        matches!(err, VcError::Unsupported { .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn unimplemented_bytecodes_are_flagged_not_skipped() {
    expect_unsupported(InstKind::Dereference {
        target: Reg(1),
        operand: Reg(0),
    });
    expect_unsupported(InstKind::IndirectInvoke {
        target: Some(Reg(1)),
        operand: Reg(0),
        operands: vec![],
    });
    expect_unsupported(InstKind::NewMap {
        target: Reg(1),
        operands: vec![],
    });
    expect_unsupported(InstKind::NewObject {
        target: Reg(1),
        operand: Reg(0),
    });
    expect_unsupported(InstKind::Throw { operand: Reg(0) });
    expect_unsupported(InstKind::Invert {
        target: Reg(1),
        operand: Reg(0),
    });
}

#[test]
fn type_tests_and_try_catch_are_flagged() {
    expect_unsupported(InstKind::IfIs {
        operand: Reg(0),
        test: Type::Int,
        then_blk: vec![],
        else_blk: vec![],
    });
    expect_unsupported(InstKind::TryCatch {
        body: vec![],
        catches: vec![],
    });
}

#[test]
fn rational_projections_are_flagged() {
    expect_unsupported(InstKind::UnArith {
        kind: UnArithKind::Numerator,
        target: Reg(1),
        operand: Reg(0),
    });
    expect_unsupported(InstKind::UnArith {
        kind: UnArithKind::Denominator,
        target: Reg(1),
        operand: Reg(0),
    });
}
