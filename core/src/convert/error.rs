use miette::Diagnostic;
use thiserror::Error;

use crate::ops::UnmappedOperator;
use crate::span::Span;
use crate::tree::{Category, Kind, TreeError};

/// Why an external tree could not be converted.
///
/// Conversion stops at the first error; nothing is retried and no default
/// is substituted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConvertError {
    #[error("{operator}")]
    #[diagnostic(
        code(transir::convert::unmapped_operator),
        help("extend `Operator` with this symbol before translating this source")
    )]
    UnmappedOperator {
        operator: UnmappedOperator,
        span: Option<Span>,
    },

    #[error("expected {expected:?} here, but the source node converts to {found:?}")]
    #[diagnostic(code(transir::convert::malformed_source))]
    MalformedSource {
        expected: Category,
        found: Kind,
        span: Option<Span>,
    },

    #[error("source tree nests deeper than the maximum of {max_depth} levels")]
    #[diagnostic(
        code(transir::convert::too_deep),
        help("raise `ConvertOptions::max_depth` or split the input")
    )]
    TooDeep {
        max_depth: usize,
        span: Option<Span>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tree(#[from] TreeError),
}

impl ConvertError {
    /// Source range of the external node the error is about, when known.
    pub fn span(&self) -> Option<&Span> {
        match self {
            ConvertError::UnmappedOperator { span, .. }
            | ConvertError::MalformedSource { span, .. }
            | ConvertError::TooDeep { span, .. } => span.as_ref(),
            ConvertError::Tree(_) => None,
        }
    }
}
