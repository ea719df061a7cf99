#![allow(dead_code)]

use rill_ir::{Block, FunctionType, Inst, InstKind, MethodCase, MethodDecl, ModuleRegistry, Type};
use rill_logic::VcFile;
use rill_source::{Span, span};
use rill_verify::{VcGenerator, VcResult};

pub fn sp() -> Span {
    span(0, 1)
}

pub fn inst(kind: InstKind) -> Inst {
    Inst::new(sp(), kind)
}

pub fn method(params: Vec<Type>, body: Block) -> MethodDecl {
    method_with(params, None, body)
}

pub fn method_with(params: Vec<Type>, precondition: Option<Block>, body: Block) -> MethodDecl {
    MethodDecl {
        name: "test".to_string(),
        span: sp(),
        ty: FunctionType::new(params, Type::Void),
        cases: vec![MethodCase {
            precondition,
            postcondition: None,
            body,
        }],
    }
}

pub fn generate(registry: &ModuleRegistry, method: &MethodDecl) -> VcResult<VcFile> {
    let mut out = VcFile::new();
    let mut generator = VcGenerator::new(registry);
    generator.transform_method_case(method, &method.cases[0], &mut out)?;
    Ok(out)
}
