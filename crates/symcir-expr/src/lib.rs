//! Restricted symbolic expression engine for symcir.
//!
//! Provides the algebra the circuit layer depends on: an immutable canonical
//! expression tree, a parser with auto-symbol creation against a caller-owned
//! symbol table, simplification, numeric evaluation, and table-driven
//! one-sided Laplace and Fourier transforms over the closed class of signals
//! linear circuits produce. It is deliberately not a general-purpose CAS:
//! shapes outside its tables fail loudly instead of being approximated.

pub mod acdc;
pub mod complex;
mod error;
pub mod eval;
mod expr;
pub mod lexer;
mod parser;
mod simplify;
mod symbol;

pub mod fourier;
pub mod laplace;

pub use complex::{ComplexParts, complex_parts, magnitude};
pub use error::{Error, Result};
pub use eval::{Bindings, eval, eval_at};
pub use expr::{Expr, Func, cmp_expr};
pub use fourier::{fourier_transform, inverse_fourier_transform};
pub use laplace::{inverse_laplace, laplace_transform};
pub use parser::{is_builtin, parse, symbols_find};
pub use simplify::{equivalent, expand, simplify};
pub use symbol::{Assumptions, Symbol, SymbolTable, canonical_name};
