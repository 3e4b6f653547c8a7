//! Signal-representation core for symbolic linear-circuit analysis.
//!
//! Builds on the `symcir-expr` engine with three layers: the domain variable
//! registry (`t`, `s`, `f`, `omega` as process-wide singletons), domain- and
//! quantity-tagged expression wrappers with transform operations, and the
//! [`Superposition`] container that splits a signal into dc + AC phasors +
//! transient + noise components and keeps them consistent under addition and
//! frequency-domain transfer.

pub mod domain;
mod error;
pub mod registry;
pub mod superposition;

pub use domain::{Domain, DomainExpr, Inference, Quantity};
pub use error::{Error, Result};
pub use superposition::{Kind, MulOperand, Superposition, Value};
