//! Output formatting for superpositions and domain expressions.

use symcir::{DomainExpr, Superposition};

/// Print a section header with an underline.
pub fn print_header(title: &str) {
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    println!();
}

/// Print every component of a superposition, one row per kind.
pub fn print_superposition(sup: &Superposition) {
    if sup.is_empty() {
        println!("  (zero)");
        println!();
        return;
    }
    for (kind, part) in sup.components() {
        print_component(&kind.to_string(), part);
    }
    println!();
}

/// Print one labeled component with its units when it has any.
pub fn print_component(label: &str, part: &DomainExpr) {
    let units = part.units();
    if units.is_empty() {
        println!("  {label:>10}  {part}");
    } else {
        println!("  {label:>10}  {part}  [{units}]");
    }
}
