//! Expansion and simplification passes.
//!
//! The canonicalizing constructors in [`crate::expr`] already fold constants
//! and collect like terms; this module adds distribution of products over
//! sums so that cancelling differences reduce to exactly zero.

use crate::expr::{Expr, Func};

/// Distribute products and small integer powers over sums, rebuilding
/// through the canonical constructors.
pub fn expand(expr: &Expr) -> Expr {
    match expr {
        Expr::Num(_) | Expr::I | Expr::Sym(_) => expr.clone(),
        Expr::Add(terms) => Expr::sum(terms.iter().map(expand).collect()),
        Expr::Mul(factors) => {
            let expanded: Vec<Expr> = factors.iter().map(expand).collect();
            distribute(expanded)
        }
        Expr::Pow(base, exp) => {
            let base = expand(base);
            let exp = expand(exp);
            if let (Expr::Add(_), Some(n)) = (&base, exp.as_int()) {
                if (2..=4).contains(&n) {
                    let mut acc = base.clone();
                    for _ in 1..n {
                        acc = distribute(vec![acc, base.clone()]);
                    }
                    return acc;
                }
            }
            Expr::pow(base, exp)
        }
        Expr::Func(head, args) => {
            Expr::func(head.clone(), args.iter().map(expand).collect())
        }
    }
}

/// Multiply out a list of factors, distributing over any sums.
fn distribute(factors: Vec<Expr>) -> Expr {
    let mut terms: Vec<Expr> = vec![Expr::one()];
    for factor in factors {
        let factor_terms = factor.terms();
        let mut next = Vec::with_capacity(terms.len() * factor_terms.len());
        for t in &terms {
            for ft in &factor_terms {
                next.push(Expr::product(vec![t.clone(), ft.clone()]));
            }
        }
        terms = next;
    }
    Expr::sum(terms)
}

/// Simplify an expression.
///
/// Expands, then lets the canonical constructors collect what cancels. The
/// result of `simplify(a - b)` is exactly zero whenever the engine can prove
/// a and b equal.
pub fn simplify(expr: &Expr) -> Expr {
    let expanded = expand(expr);
    rebuild(&expanded)
}

fn rebuild(expr: &Expr) -> Expr {
    match expr {
        Expr::Num(_) | Expr::I | Expr::Sym(_) => expr.clone(),
        Expr::Add(terms) => Expr::sum(terms.iter().map(rebuild).collect()),
        Expr::Mul(factors) => Expr::product(factors.iter().map(rebuild).collect()),
        Expr::Pow(base, exp) => Expr::pow(rebuild(base), rebuild(exp)),
        Expr::Func(head, args) => match (head, args.as_slice()) {
            // exp(a)*... nested exponentials merge through the product pass;
            // here only exp(log(x)) collapses.
            (Func::Exp, [Expr::Func(Func::Log, inner)]) if inner.len() == 1 => {
                rebuild(&inner[0])
            }
            _ => Expr::func(head.clone(), args.iter().map(rebuild).collect()),
        },
    }
}

/// True when two expressions are provably equal: structurally identical, or
/// their difference simplifies to exactly zero.
pub fn equivalent(a: &Expr, b: &Expr) -> bool {
    if a == b {
        return true;
    }
    simplify(&(a.clone() - b.clone())).is_zero()
}
