#![forbid(unsafe_code)]

use rill_ir::{Block, FunctionType, MethodDecl, ModuleRegistry, QualifiedName};
use rill_source::Span;

use crate::error::{VcError, VcResult};

fn lookup_method<'r>(
    registry: &'r ModuleRegistry,
    name: &QualifiedName,
    sig: &FunctionType,
    span: Span,
) -> VcResult<&'r MethodDecl> {
    let unit = registry.get(&name.module).ok_or_else(|| VcError::Resolution {
        name: name.module.to_string(),
        span,
    })?;
    unit.method(&name.name, sig).ok_or_else(|| VcError::Resolution {
        name: name.to_string(),
        span,
    })
}

/// Precondition block of the named callable's first declared case, or
/// `None` when it declares none. Absence means "nothing to assume".
pub fn find_precondition<'r>(
    registry: &'r ModuleRegistry,
    name: &QualifiedName,
    sig: &FunctionType,
    span: Span,
) -> VcResult<Option<&'r Block>> {
    let method = lookup_method(registry, name, sig, span)?;
    Ok(method.first_case().and_then(|c| c.precondition.as_ref()))
}

/// Postcondition block of the named callable's first declared case, or
/// `None` when it declares none.
pub fn find_postcondition<'r>(
    registry: &'r ModuleRegistry,
    name: &QualifiedName,
    sig: &FunctionType,
    span: Span,
) -> VcResult<Option<&'r Block>> {
    let method = lookup_method(registry, name, sig, span)?;
    Ok(method.first_case().and_then(|c| c.postcondition.as_ref()))
}
