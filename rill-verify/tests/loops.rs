mod common;

use common::{inst, sp};
use rill_ir::{Comparator, Constant, Inst, InstKind, ModuleRegistry, Reg, Type};
use rill_logic::{BinaryOp, Expr, NaryOp, Sort, Value, VcFile};
use rill_verify::{PathLeaf, VcBranch, VcSession, VcTransformer};

/// Body assuming `index >= 0` about the induction register r1.
fn for_body() -> Vec<Inst> {
    vec![
        inst(InstKind::Const {
            target: Reg(2),
            constant: Constant::integer(0),
        }),
        inst(InstKind::Assume {
            op: Comparator::GtEq,
            left: Reg(1),
            right: Reg(2),
            ty: Type::Int,
        }),
    ]
}

fn run_single(block: Vec<Inst>, seed: &[(Reg, &str)]) -> PathLeaf {
    let registry = ModuleRegistry::new();
    let mut out = VcFile::new();
    let mut session = VcSession::new();
    let mut tx = VcTransformer::new(&registry, &mut out, &mut session, false);

    let mut branch = VcBranch::new();
    for (reg, name) in seed {
        branch.write(*reg, Expr::variable(*name, sp()));
    }
    let mut leaves = tx.transform_body(&block, branch).expect("transform");
    assert_eq!(leaves.len(), 1, "expected a single path");
    leaves.remove(0)
}

fn guarded_body(index: Expr) -> Expr {
    Expr::implies(
        Expr::binary(BinaryOp::In, index, Expr::variable("s", sp()), sp()),
        Expr::binary(
            BinaryOp::GtEq,
            Expr::variable("r1", sp()),
            Expr::constant(Value::integer(0), sp()),
            sp(),
        ),
        sp(),
    )
}

#[test]
fn for_scope_closes_universally_on_fallthrough() {
    let block = vec![inst(InstKind::For {
        source: Reg(0),
        index: Reg(1),
        ty: Type::Set(Box::new(Type::Int)),
        modified: vec![],
        body: for_body(),
    })];
    let leaf = run_single(block, &[(Reg(0), "s")]);

    let expected = Expr::forall(
        vec![(Sort::Int, "r1".to_string())],
        guarded_body(Expr::variable("r1", sp())),
        sp(),
    );
    assert_eq!(leaf.branch.facts(), vec![&expected]);
}

#[test]
fn for_scope_closes_existentially_on_exit() {
    let mut body = for_body();
    body.push(inst(InstKind::Exit));
    let block = vec![inst(InstKind::For {
        source: Reg(0),
        index: Reg(1),
        ty: Type::Set(Box::new(Type::Int)),
        modified: vec![],
        body,
    })];
    let leaf = run_single(block, &[(Reg(0), "s")]);

    let expected = Expr::exists(
        vec![(Sort::Int, "r1".to_string())],
        guarded_body(Expr::variable("r1", sp())),
        sp(),
    );
    assert_eq!(leaf.branch.facts(), vec![&expected]);
}

#[test]
fn list_sources_bind_an_auxiliary_index_variable() {
    let block = vec![inst(InstKind::For {
        source: Reg(0),
        index: Reg(1),
        ty: Type::List(Box::new(Type::Int)),
        modified: vec![],
        body: for_body(),
    })];
    let leaf = run_single(block, &[(Reg(0), "s")]);

    // Lists iterate (position, element) pairs; the loop binds the element
    // and the session mints the position variable.
    let index = Expr::nary(
        NaryOp::Tuple,
        vec![Expr::variable("i0", sp()), Expr::variable("r1", sp())],
        sp(),
    );
    let expected = Expr::forall(
        vec![(Sort::Int, "i0".to_string()), (Sort::Int, "r1".to_string())],
        guarded_body(index),
        sp(),
    );
    assert_eq!(leaf.branch.facts(), vec![&expected]);
}

#[test]
fn loop_exit_merges_body_facts_into_the_parent() {
    let block = vec![inst(InstKind::Loop {
        modified: vec![],
        body: vec![
            inst(InstKind::Const {
                target: Reg(2),
                constant: Constant::integer(0),
            }),
            inst(InstKind::Assume {
                op: Comparator::GtEq,
                left: Reg(1),
                right: Reg(2),
                ty: Type::Int,
            }),
            inst(InstKind::Exit),
        ],
    })];
    let leaf = run_single(block, &[(Reg(1), "x")]);

    let expected = Expr::binary(
        BinaryOp::GtEq,
        Expr::variable("x", sp()),
        Expr::constant(Value::integer(0), sp()),
        sp(),
    );
    assert_eq!(leaf.branch.facts(), vec![&expected]);
}

#[test]
fn loop_fallthrough_contributes_nothing() {
    let block = vec![inst(InstKind::Loop {
        modified: vec![],
        body: vec![
            inst(InstKind::Const {
                target: Reg(2),
                constant: Constant::integer(0),
            }),
            inst(InstKind::Assume {
                op: Comparator::GtEq,
                left: Reg(1),
                right: Reg(2),
                ty: Type::Int,
            }),
        ],
    })];
    let leaf = run_single(block, &[(Reg(1), "x")]);
    assert!(leaf.branch.facts().is_empty());
}

#[test]
fn assertion_inside_for_scope_is_membership_guarded() {
    let block = vec![inst(InstKind::For {
        source: Reg(0),
        index: Reg(1),
        ty: Type::Set(Box::new(Type::Int)),
        modified: vec![Reg(5)],
        body: vec![
            inst(InstKind::Const {
                target: Reg(2),
                constant: Constant::integer(0),
            }),
            inst(InstKind::Assert {
                op: Comparator::Gt,
                left: Reg(1),
                right: Reg(2),
                ty: Type::Int,
                msg: "element positive".to_string(),
            }),
        ],
    })];

    let registry = ModuleRegistry::new();
    let mut out = VcFile::new();
    let mut session = VcSession::new();
    let mut tx = VcTransformer::new(&registry, &mut out, &mut session, false);
    let mut branch = VcBranch::new();
    branch.write(Reg(0), Expr::variable("s", sp()));
    tx.transform_body(&block, branch).expect("transform");

    let obligations: Vec<_> = out.obligations().collect();
    assert_eq!(obligations.len(), 1);

    let expected = Expr::forall(
        vec![(Sort::Int, "r1".to_string()), (Sort::Int, "r5".to_string())],
        Expr::implies(
            Expr::binary(
                BinaryOp::In,
                Expr::variable("r1", sp()),
                Expr::variable("s", sp()),
                sp(),
            ),
            Expr::implies(
                Expr::boolean(true, sp()),
                Expr::binary(
                    BinaryOp::Gt,
                    Expr::variable("r1", sp()),
                    Expr::constant(Value::integer(0), sp()),
                    sp(),
                ),
                sp(),
            ),
            sp(),
        ),
        sp(),
    );
    assert_eq!(obligations[0].1, &expected);
}
