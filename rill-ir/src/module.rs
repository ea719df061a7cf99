#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use rill_source::Span;

use crate::bytecode::Block;
use crate::types::FunctionType;

/// Slash-separated module path, e.g. `std/collections`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        debug_assert!(!segments.is_empty());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Fully-qualified callable name, displayed as `module/path:name`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    pub module: ModulePath,
    pub name: String,
}

impl QualifiedName {
    pub fn new(module: ModulePath, name: impl Into<String>) -> Self {
        Self {
            module,
            name: name.into(),
        }
    }

    /// Flatten to an identifier usable as a logic-level function name.
    pub fn identifier(&self) -> String {
        self.to_string().replace([':', '/'], "_")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.name)
    }
}

/// One declared case of a method: optional contract blocks plus the body.
///
/// Contract blocks are bytecode like any other: their registers start at 0
/// (for postconditions, register 0 is the result and parameters follow).
#[derive(Clone, Debug, PartialEq)]
pub struct MethodCase {
    pub precondition: Option<Block>,
    pub postcondition: Option<Block>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub span: Span,
    pub ty: FunctionType,
    pub cases: Vec<MethodCase>,
}

impl MethodDecl {
    /// Contract lookups take the first declared case.
    pub fn first_case(&self) -> Option<&MethodCase> {
        self.cases.first()
    }
}

/// A compiled module: the unit of namespace resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledUnit {
    pub path: ModulePath,
    pub methods: Vec<MethodDecl>,
}

impl CompiledUnit {
    pub fn method(&self, name: &str, sig: &FunctionType) -> Option<&MethodDecl> {
        self.methods
            .iter()
            .find(|m| m.name == name && &m.ty == sig)
    }
}

/// Read-only namespace of compiled units, keyed by module path.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    units: BTreeMap<ModulePath, CompiledUnit>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: CompiledUnit) {
        self.units.insert(unit.path.clone(), unit);
    }

    pub fn get(&self, path: &ModulePath) -> Option<&CompiledUnit> {
        self.units.get(path)
    }
}
