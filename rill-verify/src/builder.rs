#![forbid(unsafe_code)]

use rill_ir::Type;
use rill_logic::{BinaryOp, Expr, NaryOp, QuantKind, Sort};
use rill_source::Span;

use crate::branch::{ScopeKind, VcBranch};
use crate::convert::{convert_parameters, convert_type};
use crate::error::{VcError, VcResult};
use crate::session::VcSession;

/// Quantified binders for a `for` scope, plus the expression standing for
/// the bound position in the membership guard.
///
/// List-like sources iterate (index, element) pairs, but the loop only
/// binds the element; the auxiliary integer index variable is minted here
/// and tupled with it.
pub(crate) fn for_scope_binders(
    collection_ty: &Type,
    index_var: &str,
    session: &mut VcSession,
    span: Span,
) -> VcResult<(Vec<(Sort, String)>, Expr)> {
    let elem_ty = collection_ty
        .element_type()
        .ok_or_else(|| VcError::internal("for loop over a non-collection type", span))?;
    let elem_sort = convert_type(&elem_ty);

    if collection_ty.is_list_like() {
        let aux = session.fresh_index_var();
        let index = Expr::nary(
            NaryOp::Tuple,
            vec![
                Expr::variable(aux.clone(), span),
                Expr::variable(index_var, span),
            ],
            span,
        );
        Ok((
            vec![(Sort::Int, aux), (elem_sort, index_var.to_string())],
            index,
        ))
    } else {
        Ok((
            vec![(elem_sort, index_var.to_string())],
            Expr::variable(index_var, span),
        ))
    }
}

/// Close a `for` scope into a single quantified formula.
///
/// `ForAll` models the scope ending normally (the loop fixes its facts for
/// every iteration); `Exists` models an explicit exit (some iteration's
/// facts witness the continuation). The body is identical either way:
/// `index ∈ source ⟹ AND(scope facts)`.
pub(crate) fn close_for_scope(
    kind: QuantKind,
    source: &Expr,
    collection_ty: &Type,
    index_var: &str,
    constraints: Vec<Expr>,
    session: &mut VcSession,
    span: Span,
) -> VcResult<Expr> {
    let root = Expr::and(constraints, span);
    let (vars, index) = for_scope_binders(collection_ty, index_var, session, span)?;
    let guard = Expr::binary(BinaryOp::In, index, source.clone(), span);
    let body = Expr::implies(guard, root, span);
    Ok(Expr::quantifier(kind, vars, body, span))
}

/// Wrap a core implication in the quantifiers its scope stack implies,
/// walking from `depth` to the top so each level wraps the one above.
///
/// Modified loop registers quantify at `Int`; their declared types are not
/// recorded in the loop bytecode.
pub fn build_assertion(
    depth: usize,
    implication: Expr,
    branch: &VcBranch,
    session: &mut VcSession,
    span: Span,
) -> VcResult<Expr> {
    if depth >= branch.n_scopes() {
        return Ok(implication);
    }
    let contents = build_assertion(depth + 1, implication, branch, session, span)?;

    match &branch.scope(depth).kind {
        ScopeKind::Entry { params } => {
            let vars = convert_parameters(params);
            if vars.is_empty() {
                Ok(contents)
            } else {
                Ok(Expr::forall(vars, contents, span))
            }
        }
        ScopeKind::For {
            source,
            collection_ty,
            index_var,
            modified,
        } => {
            let (mut vars, index) = for_scope_binders(collection_ty, index_var, session, span)?;
            for reg in modified {
                vars.push((Sort::Int, format!("r{}", reg.0)));
            }
            let guard = Expr::binary(BinaryOp::In, index, source.clone(), span);
            let body = Expr::implies(guard, contents, span);
            Ok(Expr::forall(vars, body, span))
        }
        ScopeKind::Loop { modified } => {
            let vars: Vec<(Sort, String)> = modified
                .iter()
                .map(|reg| (Sort::Int, format!("r{}", reg.0)))
                .collect();
            if vars.is_empty() {
                Ok(contents)
            } else {
                Ok(Expr::forall(vars, contents, span))
            }
        }
        ScopeKind::Try => Ok(contents),
    }
}
