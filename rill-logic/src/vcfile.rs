#![forbid(unsafe_code)]

use rill_source::Span;

use crate::expr::Expr;
use crate::sort::Sort;

/// One emitted item: a proof obligation or a function prototype.
#[derive(Clone, Debug, PartialEq)]
pub enum VcItem {
    Assert {
        message: String,
        span: Span,
        formula: Expr,
    },
    Function {
        name: String,
        from: Sort,
        to: Sort,
    },
}

/// Append-only container of verification conditions for one translation.
///
/// The caller owns it for the duration of a method's translation; this
/// crate only appends. Serialization belongs downstream.
#[derive(Debug, Default)]
pub struct VcFile {
    items: Vec<VcItem>,
}

impl VcFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_assert(&mut self, message: impl Into<String>, formula: Expr, span: Span) {
        self.items.push(VcItem::Assert {
            message: message.into(),
            span,
            formula,
        });
    }

    /// Record a prototype unless one with the same name already exists.
    pub fn declare_function(&mut self, name: impl Into<String>, from: Sort, to: Sort) {
        let name = name.into();
        if !self.has_function(&name) {
            self.items.push(VcItem::Function { name, from, to });
        }
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, VcItem::Function { name: n, .. } if n == name))
    }

    pub fn items(&self) -> &[VcItem] {
        &self.items
    }

    pub fn obligations(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.items.iter().filter_map(|item| match item {
            VcItem::Assert {
                message, formula, ..
            } => Some((message.as_str(), formula)),
            _ => None,
        })
    }
}
