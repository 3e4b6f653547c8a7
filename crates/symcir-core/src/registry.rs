//! Domain variable registry.
//!
//! The four transform variables are process-wide singletons so every payload
//! in every container refers to the same `t`, `s`, `f`, and `omega`. User
//! symbols, by contrast, live in caller-owned [`SymbolTable`]s threaded
//! through each parse.

use once_cell::sync::Lazy;

use symcir_expr::{Assumptions, Expr, Symbol, SymbolTable};

use crate::error::Result;

/// The time variable `t` (real).
pub static TIME: Lazy<Symbol> = Lazy::new(|| Symbol::new("t", Assumptions::real()));

/// The Laplace variable `s` (complex).
pub static LAPLACE: Lazy<Symbol> = Lazy::new(|| Symbol::new("s", Assumptions::complex()));

/// The ordinary frequency variable `f` (real).
pub static FREQUENCY: Lazy<Symbol> = Lazy::new(|| Symbol::new("f", Assumptions::real()));

/// The angular frequency variable `omega` (real).
pub static OMEGA: Lazy<Symbol> = Lazy::new(|| Symbol::new("omega", Assumptions::real()));

/// True if the name is one of the reserved domain variables.
pub fn is_domain_var(name: &str) -> bool {
    matches!(name, "t" | "s" | "f" | "omega")
}

/// Parse source text against a caller-owned symbol table, with the domain
/// variables pre-seeded so they never pick up user assumptions.
pub fn parse(src: &str, table: &mut SymbolTable) -> Result<Expr> {
    for sym in [&*TIME, &*LAPLACE, &*FREQUENCY, &*OMEGA] {
        table
            .entry(sym.name().to_string())
            .or_insert_with(|| sym.clone());
    }
    Ok(symcir_expr::parse(src, table, Assumptions::default())?)
}

/// Canonical free-symbol names of source text, without touching any table.
pub fn find_free_symbols(src: &str) -> Result<Vec<String>> {
    Ok(symcir_expr::symbols_find(src)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_vars_are_reserved() {
        assert!(is_domain_var("s"));
        assert!(is_domain_var("omega"));
        assert!(!is_domain_var("R_1"));
    }

    #[test]
    fn test_parse_seeds_domain_symbols() {
        let mut table = SymbolTable::new();
        let expr = parse("exp(-4*t)", &mut table).unwrap();
        assert!(expr.depends_on(&TIME));
        assert!(!table.get("t").unwrap().assumptions().positive);
    }

    #[test]
    fn test_free_symbols_canonical() {
        let names = find_free_symbols("R1*cos(omega*t)").unwrap();
        assert_eq!(names, vec!["R_1", "omega", "t"]);
    }
}
