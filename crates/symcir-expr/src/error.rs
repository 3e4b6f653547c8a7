//! Error types for the expression engine.

use thiserror::Error;

/// Errors that can occur while building or transforming expressions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Malformed expression text.
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// The transform tables do not cover this expression shape.
    #[error("unsupported expression for {transform} transform: {expr}")]
    UnsupportedTransform { transform: &'static str, expr: String },

    /// The expression cannot be split into real and imaginary parts.
    #[error("cannot split {0} into real and imaginary parts")]
    ComplexSplit(String),

    /// Numeric evaluation hit a symbol with no binding.
    #[error("no value bound for symbol {0}")]
    UnboundSymbol(String),

    /// Numeric evaluation hit a non-evaluable atom.
    #[error("cannot evaluate {0} numerically")]
    NotEvaluable(String),
}

/// Result type for expression engine operations.
pub type Result<T> = std::result::Result<T, Error>;
