//! Symbolic linear-circuit signal analysis.
//!
//! Re-exports the expression engine and the signal-representation core as a
//! single surface: parse a source expression, file it into a voltage or
//! current [`Superposition`], and extract dc, phasor, transient, and noise
//! components or full time/Laplace/Fourier images.
//!
//! ```
//! use symcir::{Expr, Superposition};
//!
//! let v = Superposition::voltage_of("cos(3*t) + exp(-4*t) + 5").unwrap();
//! assert_eq!(*v.dc().unwrap().expr(), Expr::from(5.0));
//! assert_eq!(v.ac_keys().unwrap(), vec![Expr::from(3.0)]);
//! ```

pub use symcir_core::{
    Domain, DomainExpr, Error, Inference, Kind, MulOperand, Quantity, Result, Superposition,
    Value, registry,
};
pub use symcir_expr::{
    Assumptions, Expr, Func, Symbol, SymbolTable, canonical_name, equivalent, simplify,
};

/// Engine-level building blocks for callers that need to go below the
/// wrapper layer.
pub mod engine {
    pub use symcir_expr::{
        Bindings, ComplexParts, acdc, complex_parts, eval, eval_at, expand, fourier_transform,
        inverse_fourier_transform, inverse_laplace, laplace_transform, magnitude, parse,
        symbols_find,
    };
}
