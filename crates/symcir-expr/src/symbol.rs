//! Symbols, symbol assumptions, and name canonicalization.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Assumptions attached to a symbol at creation time.
///
/// Symbols default to positive unless declared real, mirroring the
/// convention for component values (R, C, L are positive quantities).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assumptions {
    /// The symbol takes real values.
    pub real: bool,
    /// The symbol takes positive real values.
    pub positive: bool,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            real: false,
            positive: true,
        }
    }
}

impl Assumptions {
    /// A real-valued symbol (not necessarily positive).
    pub fn real() -> Self {
        Self {
            real: true,
            positive: false,
        }
    }

    /// A complex-valued symbol with no further assumptions.
    pub fn complex() -> Self {
        Self {
            real: false,
            positive: false,
        }
    }

    /// True if the symbol is known to be real.
    pub fn is_real(&self) -> bool {
        self.real || self.positive
    }
}

/// A named symbol.
///
/// Identity is the canonical name: two symbols with the same name compare
/// equal regardless of assumptions, so a caller-owned [`SymbolTable`] must be
/// shared across related parses to keep assumptions consistent.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: Arc<str>,
    assumptions: Assumptions,
}

impl Symbol {
    /// Create a symbol with the given name and assumptions.
    ///
    /// The name is canonicalized first (see [`canonical_name`]).
    pub fn new(name: &str, assumptions: Assumptions) -> Self {
        Self {
            name: Arc::from(canonical_name(name).as_str()),
            assumptions,
        }
    }

    /// The canonical symbol name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The assumptions declared at creation.
    pub fn assumptions(&self) -> Assumptions {
        self.assumptions
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Caller-owned table of symbols created during parsing, keyed by canonical
/// name in insertion order.
///
/// Passing the same table to every related parse guarantees two textually
/// identical free variables resolve to the same symbol.
pub type SymbolTable = IndexMap<String, Symbol>;

static SUB_SUPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([_^])\{(\w+)\}").unwrap());

// Component-style names: a reference designator letter followed by a suffix.
static CPT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(C|E|F|G|H|I|L|R|V|Y|Z)([\w']+)$").unwrap());

/// Convert a symbol name to canonical underscore form.
///
/// `R_{out}` becomes `R_out` and `R1` becomes `R_1`, so user-typed variants
/// refer to the same symbol.
pub fn canonical_name(name: &str) -> String {
    let name = SUB_SUPER.replace_all(name, "$1$2").into_owned();

    if name.contains('_') {
        return name;
    }

    if let Some(caps) = CPT_NAME.captures(&name) {
        return format!("{}_{}", &caps[1], &caps[2]);
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_subscript_braces() {
        assert_eq!(canonical_name("R_{out}"), "R_out");
        assert_eq!(canonical_name("V^{max}"), "V^max");
    }

    #[test]
    fn test_canonical_trailing_digits() {
        assert_eq!(canonical_name("R1"), "R_1");
        assert_eq!(canonical_name("C22"), "C_22");
    }

    #[test]
    fn test_canonical_leaves_plain_names() {
        assert_eq!(canonical_name("omega"), "omega");
        assert_eq!(canonical_name("R"), "R");
        assert_eq!(canonical_name("R_1"), "R_1");
        assert_eq!(canonical_name("alpha"), "alpha");
    }

    #[test]
    fn test_symbol_identity_by_name() {
        let a = Symbol::new("R1", Assumptions::default());
        let b = Symbol::new("R_1", Assumptions::real());
        assert_eq!(a, b);
    }
}
