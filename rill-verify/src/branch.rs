#![forbid(unsafe_code)]

use std::collections::HashMap;

use rill_ir::{Reg, Type};
use rill_logic::Expr;
use rill_source::Span;

use crate::error::{VcError, VcResult};

/// A lexical frame on a branch's scope stack.
///
/// Each scope accumulates the facts added while it was innermost; closing
/// a scope decides what (if anything) those facts become in the parent.
#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub constraints: Vec<Expr>,
}

#[derive(Clone, Debug)]
pub enum ScopeKind {
    /// Method entry: the declaration's formal parameters paired with the
    /// `r{i}` variables standing for them. Always the bottommost scope.
    Entry { params: Vec<(Type, String)> },

    /// A `for` loop: the source collection expression as read at entry,
    /// the collection's type, the induction variable's name, and the
    /// registers the body may modify.
    For {
        source: Expr,
        collection_ty: Type,
        index_var: String,
        modified: Vec<Reg>,
    },

    /// A condition-less loop.
    Loop { modified: Vec<Reg> },

    /// Reserved for exception-scoped reasoning; contributes nothing.
    Try,
}

/// One simulated control-flow path: register bindings, a scope stack and
/// the facts known to hold along the path.
///
/// Forked children never observe each other's writes.
#[derive(Clone, Debug, Default)]
pub struct VcBranch {
    env: HashMap<Reg, Expr>,
    facts: Vec<Expr>,
    scopes: Vec<Scope>,
}

impl VcBranch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expression currently bound to `reg`.
    ///
    /// Reading a register nothing has written is a defect in the input
    /// bytecode, not a recoverable condition.
    pub fn read(&self, reg: Reg, span: Span) -> VcResult<Expr> {
        self.env.get(&reg).cloned().ok_or_else(|| {
            VcError::internal(format!("read of unbound register r{}", reg.0), span)
        })
    }

    /// Rebind `reg`, replacing any prior binding.
    pub fn write(&mut self, reg: Reg, expr: Expr) {
        self.env.insert(reg, expr);
    }

    /// Append a fact to the innermost open scope (or the path root when
    /// translating a scope-less block).
    pub fn add(&mut self, fact: Expr) {
        match self.scopes.last_mut() {
            Some(scope) => scope.constraints.push(fact),
            None => self.facts.push(fact),
        }
    }

    pub fn add_all(&mut self, facts: impl IntoIterator<Item = Expr>) {
        for fact in facts {
            self.add(fact);
        }
    }

    /// Conjunction of every fact on the path, bottom scope first;
    /// `true` when none have been added.
    pub fn constraints(&self, span: Span) -> Expr {
        Expr::and(self.fact_list(), span)
    }

    /// All facts in path order, for inspection.
    pub fn facts(&self) -> Vec<&Expr> {
        let mut out: Vec<&Expr> = self.facts.iter().collect();
        for scope in &self.scopes {
            out.extend(scope.constraints.iter());
        }
        out
    }

    fn fact_list(&self) -> Vec<Expr> {
        self.facts().into_iter().cloned().collect()
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            constraints: Vec::new(),
        });
    }

    pub fn pop_scope(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    pub fn n_scopes(&self) -> usize {
        self.scopes.len()
    }

    /// Positional scope access; index 0 is the bottommost (entry) scope.
    pub fn scope(&self, index: usize) -> &Scope {
        &self.scopes[index]
    }

    /// Copy this branch at a conditional; the children diverge from here.
    pub fn fork(&self) -> Self {
        self.clone()
    }
}
