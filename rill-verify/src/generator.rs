#![forbid(unsafe_code)]

use rill_ir::{CompiledUnit, MethodCase, MethodDecl, ModuleRegistry, Reg, Type};
use rill_logic::{Expr, VcFile};

use crate::branch::{ScopeKind, VcBranch};
use crate::convert::parameter_variables;
use crate::error::VcResult;
use crate::session::VcSession;
use crate::transformer::VcTransformer;

/// Per-unit driver: seeds an entry branch for each method case and runs
/// the transformer over its body, appending obligations to `out`.
pub struct VcGenerator<'r> {
    registry: &'r ModuleRegistry,
    session: VcSession,
}

impl<'r> VcGenerator<'r> {
    pub fn new(registry: &'r ModuleRegistry) -> Self {
        Self {
            registry,
            session: VcSession::new(),
        }
    }

    pub fn generate_unit(&mut self, unit: &CompiledUnit, out: &mut VcFile) -> VcResult<()> {
        for method in &unit.methods {
            for case in &method.cases {
                self.transform_method_case(method, case, out)?;
            }
        }
        Ok(())
    }

    pub fn transform_method_case(
        &mut self,
        method: &MethodDecl,
        case: &MethodCase,
        out: &mut VcFile,
    ) -> VcResult<()> {
        tracing::debug!(method = %method.name, "generating verification conditions");
        let span = method.span;

        let params: Vec<(Type, String)> = method
            .ty
            .params
            .iter()
            .enumerate()
            .map(|(i, ty)| (ty.clone(), format!("r{i}")))
            .collect();

        let mut branch = VcBranch::new();
        branch.push_scope(ScopeKind::Entry {
            params: params.clone(),
        });
        for (i, (_, var)) in params.iter().enumerate() {
            branch.write(Reg(i as u32), Expr::variable(var.clone(), span));
        }

        let mut transformer =
            VcTransformer::new(self.registry, out, &mut self.session, false);

        // The method may rely on its own precondition; assume it over the
        // parameter variables before walking the body.
        if let Some(pre) = &case.precondition {
            let args = parameter_variables(&params, span);
            let fact = transformer.transform_external_block(pre, args, span)?;
            branch.add(fact);
        }

        transformer.transform_body(&case.body, branch)?;
        Ok(())
    }
}
