#![forbid(unsafe_code)]

use miette::SourceSpan;

/// Source attribution carried by every bytecode instruction and logic
/// expression, so diagnostics and emitted obligations can point back at
/// the code they came from.
pub type Span = SourceSpan;

pub fn span(start: usize, len: usize) -> Span {
    SourceSpan::new(start.into(), len)
}
