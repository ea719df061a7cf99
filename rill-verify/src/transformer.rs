#![forbid(unsafe_code)]

use rill_ir::{
    ArithKind, Comparator, Inst, InstKind, LVal, ListOpKind, ModuleRegistry, Reg, SetOpKind,
    StrOpKind, Type, UnArithKind, field_index,
};
use rill_logic::{BinaryOp, Expr, ExprKind, NaryOp, QuantKind, UnaryOp, VcFile};
use rill_source::Span;

use crate::branch::{ScopeKind, VcBranch};
use crate::builder::{build_assertion, close_for_scope};
use crate::convert::{convert_constant, convert_type, convert_type_list};
use crate::error::{VcError, VcResult};
use crate::resolve::find_postcondition;
use crate::session::VcSession;

/// How one simulated path through a block ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathEnd {
    /// Ran off the end of the block.
    FellThrough,
    /// Hit a `Return`.
    Returned,
    /// Hit an `Exit`; consumed by the enclosing loop's walker.
    Exited,
}

#[derive(Debug)]
pub struct PathLeaf {
    pub branch: VcBranch,
    pub end: PathEnd,
}

/// Translates bytecode into logic constraints, one rule per opcode.
///
/// In assume mode (used when re-translating a contract block as a trusted
/// fact) `Assert` adds its test to the path instead of emitting an
/// obligation.
pub struct VcTransformer<'a> {
    registry: &'a ModuleRegistry,
    out: &'a mut VcFile,
    session: &'a mut VcSession,
    assume: bool,
}

impl<'a> VcTransformer<'a> {
    pub fn new(
        registry: &'a ModuleRegistry,
        out: &'a mut VcFile,
        session: &'a mut VcSession,
        assume: bool,
    ) -> Self {
        Self {
            registry,
            out,
            session,
            assume,
        }
    }

    /// Drive a branch through a method body, forking at conditionals.
    /// Returns the surviving path leaves; obligations are appended to the
    /// output file as they are met.
    pub fn transform_body(&mut self, block: &[Inst], branch: VcBranch) -> VcResult<Vec<PathLeaf>> {
        self.run_from(block, 0, branch, 0)
    }

    fn run_from(
        &mut self,
        block: &[Inst],
        at: usize,
        mut branch: VcBranch,
        loop_depth: usize,
    ) -> VcResult<Vec<PathLeaf>> {
        for i in at..block.len() {
            let inst = &block[i];
            let span = inst.span;
            match &inst.kind {
                InstKind::If {
                    op,
                    left,
                    right,
                    then_blk,
                    else_blk,
                    ..
                } => {
                    let test = self.build_test(*op, *left, *right, &branch, span)?;
                    let inverted = invert(&test)?;
                    let mut true_branch = branch.fork();
                    true_branch.add(test);
                    let mut false_branch = branch;
                    false_branch.add(inverted);

                    let mut leaves = Vec::new();
                    for (arm_branch, arm) in [(true_branch, then_blk), (false_branch, else_blk)] {
                        for leaf in self.run_from(arm, 0, arm_branch, loop_depth)? {
                            match leaf.end {
                                PathEnd::FellThrough => leaves.extend(self.run_from(
                                    block,
                                    i + 1,
                                    leaf.branch,
                                    loop_depth,
                                )?),
                                _ => leaves.push(leaf),
                            }
                        }
                    }
                    return Ok(leaves);
                }

                InstKind::IfIs { .. } => {
                    return Err(VcError::unsupported("runtime type test", span));
                }

                InstKind::Loop { modified, body } => {
                    let closed = self.run_loop(span, modified, body, branch, loop_depth)?;
                    return self.continue_after(block, i + 1, closed, loop_depth);
                }

                InstKind::For {
                    source,
                    index,
                    ty,
                    modified,
                    body,
                } => {
                    let closed =
                        self.run_for(span, *source, *index, ty, modified, body, branch, loop_depth)?;
                    return self.continue_after(block, i + 1, closed, loop_depth);
                }

                InstKind::TryCatch { .. } => {
                    return Err(VcError::unsupported("try-catch", span));
                }

                InstKind::Return { .. } => {
                    return Ok(vec![PathLeaf {
                        branch,
                        end: PathEnd::Returned,
                    }]);
                }

                InstKind::Exit => {
                    if loop_depth == 0 {
                        return Err(VcError::internal("exit outside of a loop", span));
                    }
                    return Ok(vec![PathLeaf {
                        branch,
                        end: PathEnd::Exited,
                    }]);
                }

                _ => self.step(inst, &mut branch)?,
            }
        }
        Ok(vec![PathLeaf {
            branch,
            end: PathEnd::FellThrough,
        }])
    }

    /// Resume block execution after a loop for every leaf that is still
    /// live; returned leaves propagate unchanged.
    fn continue_after(
        &mut self,
        block: &[Inst],
        at: usize,
        leaves: Vec<PathLeaf>,
        loop_depth: usize,
    ) -> VcResult<Vec<PathLeaf>> {
        let mut out = Vec::new();
        for leaf in leaves {
            match leaf.end {
                PathEnd::Returned => out.push(leaf),
                _ => out.extend(self.run_from(block, at, leaf.branch, loop_depth)?),
            }
        }
        Ok(out)
    }

    /// A condition-less loop contributes nothing when its body ends
    /// normally; an explicit exit merges the body's facts into the parent.
    fn run_loop(
        &mut self,
        span: Span,
        modified: &[Reg],
        body: &[Inst],
        mut branch: VcBranch,
        loop_depth: usize,
    ) -> VcResult<Vec<PathLeaf>> {
        branch.push_scope(ScopeKind::Loop {
            modified: modified.to_vec(),
        });
        let leaves = self.run_from(body, 0, branch, loop_depth + 1)?;

        let mut out = Vec::new();
        for leaf in leaves {
            let mut branch = leaf.branch;
            let scope = branch
                .pop_scope()
                .ok_or_else(|| VcError::internal("scope stack imbalance", span))?;
            match leaf.end {
                PathEnd::FellThrough => out.push(PathLeaf {
                    branch,
                    end: PathEnd::FellThrough,
                }),
                PathEnd::Exited => {
                    branch.add_all(scope.constraints);
                    out.push(PathLeaf {
                        branch,
                        end: PathEnd::FellThrough,
                    });
                }
                PathEnd::Returned => out.push(PathLeaf {
                    branch,
                    end: PathEnd::Returned,
                }),
            }
        }
        Ok(out)
    }

    /// A `for` loop closes into one quantified formula: universal on
    /// normal fallthrough, existential on explicit exit.
    #[allow(clippy::too_many_arguments)]
    fn run_for(
        &mut self,
        span: Span,
        source: Reg,
        index: Reg,
        ty: &Type,
        modified: &[Reg],
        body: &[Inst],
        mut branch: VcBranch,
        loop_depth: usize,
    ) -> VcResult<Vec<PathLeaf>> {
        let source_expr = branch.read(source, span)?;
        let index_var = format!("r{}", index.0);
        branch.write(index, Expr::variable(index_var.clone(), span));
        branch.push_scope(ScopeKind::For {
            source: source_expr,
            collection_ty: ty.clone(),
            index_var,
            modified: modified.to_vec(),
        });
        let leaves = self.run_from(body, 0, branch, loop_depth + 1)?;

        let mut out = Vec::new();
        for leaf in leaves {
            let mut branch = leaf.branch;
            let scope = branch
                .pop_scope()
                .ok_or_else(|| VcError::internal("scope stack imbalance", span))?;
            let ScopeKind::For {
                source,
                collection_ty,
                index_var,
                ..
            } = scope.kind
            else {
                return Err(VcError::internal("scope stack imbalance", span));
            };
            match leaf.end {
                PathEnd::Returned => out.push(PathLeaf {
                    branch,
                    end: PathEnd::Returned,
                }),
                end => {
                    let polarity = match end {
                        PathEnd::FellThrough => QuantKind::ForAll,
                        _ => QuantKind::Exists,
                    };
                    let formula = close_for_scope(
                        polarity,
                        &source,
                        &collection_ty,
                        &index_var,
                        scope.constraints,
                        self.session,
                        span,
                    )?;
                    branch.add(formula);
                    out.push(PathLeaf {
                        branch,
                        end: PathEnd::FellThrough,
                    });
                }
            }
        }
        Ok(out)
    }

    /// Translate one straight-line bytecode against the current branch.
    fn step(&mut self, inst: &Inst, branch: &mut VcBranch) -> VcResult<()> {
        let span = inst.span;
        match &inst.kind {
            InstKind::Assert {
                op,
                left,
                right,
                msg,
                ..
            } => {
                let test = self.build_test(*op, *left, *right, branch, span)?;
                if self.assume {
                    branch.add(test);
                } else {
                    let assumptions = branch.constraints(span);
                    let implication = Expr::implies(assumptions, test, span);
                    let assertion = build_assertion(0, implication, branch, self.session, span)?;
                    tracing::debug!(obligation = %msg, "emitting proof obligation");
                    self.out.add_assert(msg.clone(), assertion, span);
                }
            }

            InstKind::Assume {
                op, left, right, ..
            } => {
                let test = self.build_test(*op, *left, *right, branch, span)?;
                branch.add(test);
            }

            InstKind::Assign { target, operand } | InstKind::Move { target, operand } => {
                let value = branch.read(*operand, span)?;
                branch.write(*target, value);
            }

            InstKind::BinArith {
                kind,
                target,
                left,
                right,
                ..
            } => {
                let lhs = branch.read(*left, span)?;
                let rhs = branch.read(*right, span)?;
                let value = match kind {
                    ArithKind::Add => Expr::binary(BinaryOp::Add, lhs, rhs, span),
                    ArithKind::Sub => Expr::binary(BinaryOp::Sub, lhs, rhs, span),
                    ArithKind::Mul => Expr::binary(BinaryOp::Mul, lhs, rhs, span),
                    ArithKind::Div => Expr::binary(BinaryOp::Div, lhs, rhs, span),
                    ArithKind::Range => Expr::list_range(lhs, rhs, span),
                };
                branch.write(*target, value);
            }

            InstKind::BinList {
                kind,
                target,
                left,
                right,
                ..
            } => {
                let lhs = branch.read(*left, span)?;
                let rhs = branch.read(*right, span)?;
                let (lhs, rhs) = match kind {
                    ListOpKind::Append => (lhs, rhs),
                    ListOpKind::LeftAppend => (lhs, singleton(NaryOp::List, rhs, span)),
                    ListOpKind::RightAppend => (singleton(NaryOp::List, lhs, span), rhs),
                };
                branch.write(*target, Expr::binary(BinaryOp::ListAppend, lhs, rhs, span));
            }

            InstKind::BinStr {
                kind,
                target,
                left,
                right,
            } => {
                let lhs = branch.read(*left, span)?;
                let rhs = branch.read(*right, span)?;
                let (lhs, rhs) = match kind {
                    StrOpKind::Append => (lhs, rhs),
                    StrOpKind::LeftAppend => (lhs, singleton(NaryOp::List, rhs, span)),
                    StrOpKind::RightAppend => (singleton(NaryOp::List, lhs, span), rhs),
                };
                branch.write(*target, Expr::binary(BinaryOp::ListAppend, lhs, rhs, span));
            }

            InstKind::BinSet {
                kind,
                target,
                left,
                right,
                ..
            } => {
                let lhs = branch.read(*left, span)?;
                let rhs = branch.read(*right, span)?;
                let value = match kind {
                    SetOpKind::Union => Expr::binary(BinaryOp::SetUnion, lhs, rhs, span),
                    SetOpKind::LeftUnion => Expr::binary(
                        BinaryOp::SetUnion,
                        lhs,
                        singleton(NaryOp::Set, rhs, span),
                        span,
                    ),
                    SetOpKind::RightUnion => Expr::binary(
                        BinaryOp::SetUnion,
                        singleton(NaryOp::Set, lhs, span),
                        rhs,
                        span,
                    ),
                    SetOpKind::Intersection => {
                        Expr::binary(BinaryOp::SetIntersection, lhs, rhs, span)
                    }
                    SetOpKind::LeftIntersection => Expr::binary(
                        BinaryOp::SetIntersection,
                        lhs,
                        singleton(NaryOp::Set, rhs, span),
                        span,
                    ),
                    SetOpKind::RightIntersection => Expr::binary(
                        BinaryOp::SetIntersection,
                        singleton(NaryOp::Set, lhs, span),
                        rhs,
                        span,
                    ),
                    SetOpKind::Difference => {
                        Expr::binary(BinaryOp::SetDifference, lhs, rhs, span)
                    }
                    SetOpKind::LeftDifference => Expr::binary(
                        BinaryOp::SetDifference,
                        lhs,
                        singleton(NaryOp::Set, rhs, span),
                        span,
                    ),
                };
                branch.write(*target, value);
            }

            // Coercions preserve the underlying value at the logic level.
            InstKind::Convert {
                target, operand, ..
            } => {
                let value = branch.read(*operand, span)?;
                branch.write(*target, value);
            }

            InstKind::Const { target, constant } => {
                branch.write(*target, Expr::constant(convert_constant(constant), span));
            }

            InstKind::Debug { .. } | InstKind::Nop => {}

            InstKind::Dereference { .. } => {
                return Err(VcError::unsupported("dereference", span));
            }

            InstKind::FieldLoad {
                target,
                operand,
                field,
                fields,
            } => {
                let index = field_index(fields, field).ok_or_else(|| {
                    VcError::internal(format!("record type has no field `{field}`"), span)
                })?;
                let src = branch.read(*operand, span)?;
                branch.write(*target, Expr::load(src, index, span));
            }

            InstKind::IndexOf {
                target,
                left,
                right,
            } => {
                let src = branch.read(*left, span)?;
                let index = branch.read(*right, span)?;
                branch.write(*target, Expr::index_of(src, index, span));
            }

            InstKind::IndirectInvoke { .. } => {
                return Err(VcError::unsupported("indirect invoke", span));
            }

            InstKind::Invoke {
                target,
                name,
                sig,
                operands,
            } => {
                // A void-target call contributes nothing to the path.
                if let Some(target) = target {
                    let mut args = Vec::with_capacity(operands.len());
                    for reg in operands {
                        args.push(branch.read(*reg, span)?);
                    }
                    let fname = name.identifier();
                    let arg_tuple = Expr::nary(NaryOp::Tuple, args.clone(), span);
                    branch.write(*target, Expr::fun_call(fname.clone(), arg_tuple, span));

                    self.out.declare_function(
                        fname,
                        convert_type_list(&sig.params),
                        convert_type(&sig.ret),
                    );

                    let registry = self.registry;
                    if let Some(post) = find_postcondition(registry, name, sig, span)? {
                        // Postcondition registers: result first, then the
                        // actual arguments.
                        let mut arguments = Vec::with_capacity(args.len() + 1);
                        arguments.push(branch.read(*target, span)?);
                        arguments.extend(args);
                        let constraint = self.transform_external_block(post, arguments, span)?;
                        branch.add(constraint);
                    }
                }
            }

            InstKind::Invert { .. } => {
                return Err(VcError::unsupported("bitwise inversion", span));
            }

            InstKind::LengthOf { target, operand } => {
                let src = branch.read(*operand, span)?;
                branch.write(*target, Expr::unary(UnaryOp::LengthOf, src, span));
            }

            InstKind::NewList { target, operands } => {
                let vals = self.read_all(operands, branch, span)?;
                branch.write(*target, Expr::nary(NaryOp::List, vals, span));
            }

            InstKind::NewMap { .. } => {
                return Err(VcError::unsupported("map construction", span));
            }

            InstKind::NewObject { .. } => {
                return Err(VcError::unsupported("object construction", span));
            }

            InstKind::NewRecord { target, fields } => {
                let mut sorted: Vec<&(String, Reg)> = fields.iter().collect();
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                let mut vals = Vec::with_capacity(sorted.len());
                for (_, reg) in sorted {
                    vals.push(branch.read(*reg, span)?);
                }
                branch.write(*target, Expr::nary(NaryOp::Tuple, vals, span));
            }

            InstKind::NewSet { target, operands } => {
                let vals = self.read_all(operands, branch, span)?;
                branch.write(*target, Expr::nary(NaryOp::Set, vals, span));
            }

            InstKind::NewTuple { target, operands } => {
                let vals = self.read_all(operands, branch, span)?;
                branch.write(*target, Expr::nary(NaryOp::Tuple, vals, span));
            }

            InstKind::SubList { target, operands } | InstKind::SubStr { target, operands } => {
                let src = branch.read(operands[0], span)?;
                let start = branch.read(operands[1], span)?;
                let end = branch.read(operands[2], span)?;
                branch.write(*target, Expr::sub_list(src, start, end, span));
            }

            InstKind::Throw { .. } => {
                return Err(VcError::unsupported("throw", span));
            }

            InstKind::TupleLoad {
                target,
                operand,
                index,
            } => {
                let src = branch.read(*operand, span)?;
                branch.write(*target, Expr::load(src, *index, span));
            }

            InstKind::UnArith {
                kind,
                target,
                operand,
            } => match kind {
                UnArithKind::Neg => {
                    let src = branch.read(*operand, span)?;
                    branch.write(*target, Expr::unary(UnaryOp::Neg, src, span));
                }
                UnArithKind::Numerator => {
                    return Err(VcError::unsupported("rational numerator", span));
                }
                UnArithKind::Denominator => {
                    return Err(VcError::unsupported("rational denominator", span));
                }
            },

            InstKind::Update {
                target,
                operand,
                path,
            } => {
                let result = branch.read(*operand, span)?;
                let source = branch.read(*target, span)?;
                let updated = self.update_helper(&mut path.iter(), source, result, branch, span)?;
                branch.write(*target, updated);
            }

            // Control flow is the block walker's job; reaching here is a
            // walker defect.
            InstKind::If { .. }
            | InstKind::IfIs { .. }
            | InstKind::Loop { .. }
            | InstKind::For { .. }
            | InstKind::TryCatch { .. }
            | InstKind::Return { .. }
            | InstKind::Exit => {
                return Err(VcError::internal(
                    "control-flow bytecode outside the block walker",
                    span,
                ));
            }
        }
        Ok(())
    }

    fn read_all(&self, operands: &[Reg], branch: &VcBranch, span: Span) -> VcResult<Vec<Expr>> {
        operands.iter().map(|reg| branch.read(*reg, span)).collect()
    }

    /// Rebuild the whole containing structure along an update path: every
    /// sibling component is carried over unchanged, the path component
    /// recurses one level deeper, and the final segment becomes the newly
    /// computed value.
    fn update_helper(
        &self,
        path: &mut std::slice::Iter<'_, LVal>,
        source: Expr,
        result: Expr,
        branch: &VcBranch,
        span: Span,
    ) -> VcResult<Expr> {
        let Some(lval) = path.next() else {
            return Ok(result);
        };
        match lval {
            LVal::Record { field, fields } => {
                let index = field_index(fields, field).ok_or_else(|| {
                    VcError::internal(format!("record type has no field `{field}`"), span)
                })?;
                let mut operands = Vec::with_capacity(fields.len());
                for i in 0..fields.len() {
                    if i == index {
                        operands.push(self.update_helper(
                            path,
                            Expr::load(source.clone(), index, span),
                            result.clone(),
                            branch,
                            span,
                        )?);
                    } else {
                        operands.push(Expr::load(source.clone(), i, span));
                    }
                }
                Ok(Expr::nary(NaryOp::Tuple, operands, span))
            }
            LVal::List { index } => {
                let index = branch.read(*index, span)?;
                let inner = self.update_helper(
                    path,
                    Expr::index_of(source.clone(), index.clone(), span),
                    result,
                    branch,
                    span,
                )?;
                Ok(Expr::list_update(source, index, inner, span))
            }
            LVal::Map { .. } => Err(VcError::unsupported("map element update", span)),
            LVal::Str { .. } => Err(VcError::unsupported("string element update", span)),
        }
    }

    /// Comparison test for an `Assert`, `Assume` or `If`.
    fn build_test(
        &self,
        op: Comparator,
        left: Reg,
        right: Reg,
        branch: &VcBranch,
        span: Span,
    ) -> VcResult<Expr> {
        let lhs = branch.read(left, span)?;
        let rhs = branch.read(right, span)?;
        let op = match op {
            Comparator::Eq => BinaryOp::Eq,
            Comparator::Neq => BinaryOp::Neq,
            Comparator::Lt => BinaryOp::Lt,
            Comparator::LtEq => BinaryOp::LtEq,
            Comparator::Gt => BinaryOp::Gt,
            Comparator::GtEq => BinaryOp::GtEq,
            Comparator::ElemOf => BinaryOp::In,
            Comparator::Subset => BinaryOp::Subset,
            Comparator::SubsetEq => BinaryOp::SubsetEq,
        };
        Ok(Expr::binary(op, lhs, rhs, span))
    }

    /// Re-translate a contract block as a constraint over the caller's
    /// expressions: `operands[i]` seeds register `i` of the block, and the
    /// block's accumulated facts come back as one formula (disjoined over
    /// path leaves when the block itself forks).
    pub fn transform_external_block(
        &mut self,
        block: &[Inst],
        operands: Vec<Expr>,
        span: Span,
    ) -> VcResult<Expr> {
        let mut master = VcBranch::new();
        for (i, operand) in operands.into_iter().enumerate() {
            master.write(Reg(i as u32), operand);
        }

        let saved = self.assume;
        self.assume = true;
        let result = self.run_from(block, 0, master, 0);
        self.assume = saved;

        let alternatives = result?
            .into_iter()
            .map(|leaf| leaf.branch.constraints(span))
            .collect();
        Ok(Expr::or(alternatives, span))
    }
}

/// Logical inversion of a comparison by syntactic operator flip.
///
/// Membership has no "not in" counterpart and inverts through an explicit
/// logical-not wrapper; anything that is not a comparison is a defect in
/// the caller.
pub fn invert(test: &Expr) -> VcResult<Expr> {
    let span = test.span;
    let ExprKind::Binary { op, lhs, rhs } = &test.kind else {
        return Err(VcError::internal("cannot invert a non-comparison test", span));
    };
    let flipped = match op {
        BinaryOp::Eq => BinaryOp::Neq,
        BinaryOp::Neq => BinaryOp::Eq,
        BinaryOp::GtEq => BinaryOp::Lt,
        BinaryOp::Gt => BinaryOp::LtEq,
        BinaryOp::LtEq => BinaryOp::Gt,
        BinaryOp::Lt => BinaryOp::GtEq,
        BinaryOp::Subset => BinaryOp::SupsetEq,
        BinaryOp::SubsetEq => BinaryOp::Supset,
        BinaryOp::Supset => BinaryOp::SubsetEq,
        BinaryOp::SupsetEq => BinaryOp::Subset,
        BinaryOp::In => return Ok(Expr::not(test.clone(), span)),
        other => {
            return Err(VcError::internal(
                format!("unknown comparator ({other:?})"),
                span,
            ));
        }
    };
    Ok(Expr::binary(
        flipped,
        (**lhs).clone(),
        (**rhs).clone(),
        span,
    ))
}

fn singleton(op: NaryOp, value: Expr, span: Span) -> Expr {
    Expr::nary(op, vec![value], span)
}
