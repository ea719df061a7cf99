#![forbid(unsafe_code)]

use miette::Diagnostic;
use rill_source::Span;
use thiserror::Error;

/// Failures during verification-condition generation.
///
/// All three kinds abort the current method's translation; none are
/// transient. `InternalFailure` means an earlier compiler stage (or this
/// one) has a defect; `Resolution` means a referenced module could not be
/// found; `Unsupported` marks constructs this stage refuses to translate
/// rather than silently under-constrain.
#[derive(Debug, Error, Diagnostic)]
pub enum VcError {
    #[error("internal failure: {message}")]
    #[diagnostic(code(rill::verify::internal))]
    InternalFailure {
        message: String,
        #[label]
        span: Span,
    },

    #[error("unable to resolve `{name}`")]
    #[diagnostic(code(rill::verify::resolution))]
    Resolution {
        name: String,
        #[label]
        span: Span,
    },

    #[error("unsupported construct: {construct}")]
    #[diagnostic(code(rill::verify::unsupported))]
    Unsupported {
        construct: &'static str,
        #[label]
        span: Span,
    },
}

impl VcError {
    pub fn internal(message: impl Into<String>, span: Span) -> Self {
        VcError::InternalFailure {
            message: message.into(),
            span,
        }
    }

    pub fn unsupported(construct: &'static str, span: Span) -> Self {
        VcError::Unsupported { construct, span }
    }
}

pub type VcResult<T> = Result<T, VcError>;
