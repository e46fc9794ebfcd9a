use thiserror::Error;

/// Errors raised by the algebra, the polynomial engine and the text parser.
///
/// All errors are synchronous: they are returned by the call that triggered
/// them and nothing is retried.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AlgebraError {
    /// Operands have non-conformable dimensions, or a matrix would be empty.
    #[error("shape error: {0}")]
    Shape(String),

    /// Forced reciprocal of a singular matrix or of a zero value.
    ///
    /// Callers that can recover use [`Matrix::inverse`](crate::Matrix::inverse),
    /// which reports a singular matrix as `Ok(None)` instead.
    #[error("non-invertible value:\n{0}")]
    SingularMatrix(String),

    /// Malformed polynomial text.
    #[error("parse error at '{fragment}': {message}")]
    Parse {
        /// The part of the input where parsing failed.
        fragment: String,
        /// What the parser expected.
        message: String,
    },

    /// No combination rule exists for the two operand variants.
    #[error("{op} of {lhs} and {rhs} is not implemented")]
    Dispatch {
        /// `"addition"` or `"multiplication"`, or `"construction"` for mixed matrices.
        op: &'static str,
        /// Variant name of the left operand.
        lhs: &'static str,
        /// Variant name of the right operand.
        rhs: &'static str,
    },

    /// The result exists mathematically but has no representation here
    /// (e.g. the reciprocal of a multi-term polynomial).
    #[error("not representable: {0}")]
    NotRepresentable(String),
}

impl AlgebraError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        AlgebraError::Shape(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AlgebraError>;
