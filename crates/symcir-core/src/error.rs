//! Error types for domain-tagged expressions and superpositions.

use thiserror::Error;

/// Errors raised while constructing, combining, or decomposing
/// domain-tagged quantities.
#[derive(Error, Debug)]
pub enum Error {
    /// A payload references a variable its domain forbids.
    #[error("{domain}-domain expression may not contain '{var}': {expr}")]
    DomainViolation {
        domain: &'static str,
        var: String,
        expr: String,
    },

    /// A value could not be assigned to any signal kind.
    #[error("cannot classify {what} for superposition: {value}")]
    Unclassifiable { what: &'static str, value: String },

    /// The operation is not defined for these operand types.
    #[error("unsupported operation: {op} ({detail})")]
    UnsupportedOperation { op: &'static str, detail: String },

    /// A time-domain payload is not a single sinusoid.
    #[error("not a phasor-convertible expression: {0}")]
    NotPhasor(String),

    /// Noise quantities have no deterministic time realization.
    #[error("noise expression has no {0} representation")]
    NoiseRealization(&'static str),

    #[error(transparent)]
    Expr(#[from] symcir_expr::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
