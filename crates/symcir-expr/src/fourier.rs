//! Forward and inverse Fourier transforms over the toolkit's signal class.
//!
//! Sinusoids map to impulse pairs in frequency, constants to an impulse at
//! zero frequency, and causal decaying exponentials to first-order rational
//! spectra. The inverse merges conjugate exponential pairs back into real
//! sinusoids.

use std::f64::consts::TAU;

use crate::acdc::{linear_in, sinusoid_term};
use crate::error::{Error, Result};
use crate::expr::{Expr, Func};
use crate::simplify::{expand, simplify};
use crate::symbol::Symbol;

fn unsupported(transform: &'static str, expr: &Expr) -> Error {
    Error::UnsupportedTransform {
        transform,
        expr: expr.to_string(),
    }
}

/// Forward Fourier transform from `t` to ordinary frequency `f`.
pub fn fourier_transform(expr: &Expr, t: &Symbol, f: &Symbol) -> Result<Expr> {
    let expanded = expand(expr);
    let f_expr = Expr::Sym(f.clone());
    let mut out = Vec::new();

    for term in expanded.terms() {
        if !term.depends_on(t) {
            // DC maps to an impulse at zero frequency.
            out.push(term * Expr::dirac_delta(f_expr.clone()));
            continue;
        }
        out.push(fourier_term(&term, t, &f_expr)?);
    }
    Ok(simplify(&Expr::sum(out)))
}

fn fourier_term(term: &Expr, t: &Symbol, f_expr: &Expr) -> Result<Expr> {
    let t_expr = Expr::Sym(t.clone());

    // Sinusoid: impulse pair at +-omega/(2 pi).
    if let Some(sin) = sinusoid_term(term, t) {
        let f0 = sin.omega * Expr::from(1.0 / TAU);
        let positive = Expr::exp(Expr::I * sin.phase.clone())
            * Expr::dirac_delta(f_expr.clone() - f0.clone());
        let negative =
            Expr::exp(-(Expr::I * sin.phase)) * Expr::dirac_delta(f_expr.clone() + f0);
        return Ok(sin.amplitude * Expr::from(0.5) * (positive + negative));
    }

    // Remaining shapes: impulses, steps, causal exponentials.
    let mut coeff = Vec::new();
    let mut exp_rate: Option<Expr> = None;
    let mut gated = false;
    let mut delta = false;

    for factor in term.factors() {
        if !factor.depends_on(t) {
            coeff.push(factor);
            continue;
        }
        match &factor {
            Expr::Func(Func::DiracDelta, args) if args[0] == t_expr => delta = true,
            Expr::Func(Func::Heaviside, args) if args[0] == t_expr => gated = true,
            Expr::Func(Func::Exp, args) => {
                let (slope, offset) =
                    linear_in(&args[0], t).ok_or_else(|| unsupported("Fourier", term))?;
                if exp_rate.is_some() {
                    return Err(unsupported("Fourier", term));
                }
                if !offset.is_zero() {
                    coeff.push(Expr::exp(offset));
                }
                exp_rate = Some(slope);
            }
            _ => return Err(unsupported("Fourier", term)),
        }
    }
    let coeff = Expr::product(coeff);

    if delta {
        if exp_rate.is_some() {
            return Err(unsupported("Fourier", term));
        }
        return Ok(coeff);
    }

    if let Some(rate) = exp_rate {
        // Decaying exponential, causal either explicitly (step factor) or by
        // a negative numeric rate.
        let decaying = matches!(rate.as_num(), Some(a) if a < 0.0);
        if !gated && !decaying {
            return Err(unsupported("Fourier", term));
        }
        let denom = -rate + Expr::from(TAU) * Expr::I * f_expr.clone();
        return Ok(coeff * Expr::recip(denom));
    }

    if gated {
        // Unit step: delta(f)/2 + 1/(j 2 pi f).
        return Ok(coeff
            * (Expr::from(0.5) * Expr::dirac_delta(f_expr.clone())
                + Expr::recip(Expr::from(TAU) * Expr::I * f_expr.clone())));
    }

    Err(unsupported("Fourier", term))
}

/// Inverse Fourier transform from `f` back to `t`.
pub fn inverse_fourier_transform(expr: &Expr, f: &Symbol, t: &Symbol) -> Result<Expr> {
    let expanded = expand(expr);
    let t_expr = Expr::Sym(t.clone());
    let mut out = Vec::new();

    for term in expanded.terms() {
        out.push(inverse_term(&term, f, &t_expr)?);
    }
    Ok(simplify(&merge_conjugates(Expr::sum(out))))
}

fn inverse_term(term: &Expr, f: &Symbol, t_expr: &Expr) -> Result<Expr> {
    if !term.depends_on(f) {
        return Ok(term.clone() * Expr::dirac_delta(t_expr.clone()));
    }

    let mut coeff = Vec::new();
    let mut delta_arg: Option<Expr> = None;
    let mut rational: Option<Expr> = None;

    for factor in term.factors() {
        if !factor.depends_on(f) {
            coeff.push(factor);
            continue;
        }
        match &factor {
            Expr::Func(Func::DiracDelta, args) => {
                if delta_arg.is_some() {
                    return Err(unsupported("inverse Fourier", term));
                }
                delta_arg = Some(args[0].clone());
            }
            Expr::Pow(base, exp) if exp.as_int() == Some(-1) => {
                if rational.is_some() {
                    return Err(unsupported("inverse Fourier", term));
                }
                rational = Some((**base).clone());
            }
            _ => return Err(unsupported("inverse Fourier", term)),
        }
    }
    let coeff = Expr::product(coeff);

    if let Some(arg) = delta_arg {
        if rational.is_some() {
            return Err(unsupported("inverse Fourier", term));
        }
        // delta(f - f0) -> exp(j 2 pi f0 t)
        let (slope, offset) = linear_in(&arg, f).ok_or_else(|| unsupported("inverse Fourier", term))?;
        let f0 = simplify(&-(offset / slope.clone()));
        let scale = Expr::recip(Expr::abs(slope));
        return Ok(coeff
            * scale
            * Expr::exp(Expr::I * Expr::from(TAU) * f0 * t_expr.clone()));
    }

    if let Some(denom) = rational {
        // c/(a + j 2 pi f) -> c e^{-a t} for t > 0.
        let (slope, offset) =
            linear_in(&denom, f).ok_or_else(|| unsupported("inverse Fourier", term))?;
        let ratio = simplify(&(slope * Expr::recip(Expr::from(TAU) * Expr::I)));
        let r = ratio
            .as_num()
            .ok_or_else(|| unsupported("inverse Fourier", term))?;
        let a = simplify(&(offset * Expr::from(1.0 / r)));
        return Ok(coeff
            * Expr::from(1.0 / r)
            * Expr::exp(-(a * t_expr.clone())));
    }

    Err(unsupported("inverse Fourier", term))
}

/// Merge conjugate complex exponential pairs into real sinusoids:
/// `a e^{j u} + b e^{-j u}` becomes `(a+b) cos(u) + j (a-b) sin(u)`.
fn merge_conjugates(expr: Expr) -> Expr {
    let terms = expr.terms();
    // (angle, positive-rotation coeff, negative-rotation coeff)
    let mut rotations: Vec<(Expr, Vec<Expr>, Vec<Expr>)> = Vec::new();
    let mut rest = Vec::new();

    'terms: for term in terms {
        let mut coeff = Vec::new();
        let mut angle: Option<Expr> = None;
        for factor in term.factors() {
            if let Expr::Func(Func::Exp, args) = &factor {
                // Purely imaginary argument only; a real exponential factor
                // keeps the term out of the merge.
                let u = simplify(&(args[0].clone() * Expr::recip(Expr::I)));
                if angle.is_none() && is_real_free(&u) {
                    angle = Some(u);
                    continue;
                }
                rest.push(term.clone());
                continue 'terms;
            } else {
                coeff.push(factor);
            }
        }
        let Some(u) = angle else {
            rest.push(term);
            continue;
        };
        let c = Expr::product(coeff);
        let (u_norm, positive) = normalize_angle(u);
        if let Some(entry) = rotations.iter_mut().find(|(a, _, _)| *a == u_norm) {
            if positive {
                entry.1.push(c);
            } else {
                entry.2.push(c);
            }
        } else if positive {
            rotations.push((u_norm, vec![c], Vec::new()));
        } else {
            rotations.push((u_norm, Vec::new(), vec![c]));
        }
    }

    for (u, pos, neg) in rotations {
        let a = Expr::sum(pos);
        let b = Expr::sum(neg);
        rest.push(
            (a.clone() + b.clone()) * Expr::cos(u.clone())
                + Expr::I * (a - b) * Expr::sin(u),
        );
    }
    Expr::sum(rest)
}

/// True when an expression contains no imaginary unit.
fn is_real_free(expr: &Expr) -> bool {
    match expr {
        Expr::I => false,
        Expr::Num(_) | Expr::Sym(_) => true,
        Expr::Add(parts) | Expr::Mul(parts) | Expr::Func(_, parts) => {
            parts.iter().all(is_real_free)
        }
        Expr::Pow(b, e) => is_real_free(b) && is_real_free(e),
    }
}

/// Orient an angle so conjugate pairs share a key: flips the sign when the
/// leading coefficient is negative.
fn normalize_angle(u: Expr) -> (Expr, bool) {
    let leading = u
        .terms()
        .first()
        .map(|term| term.coeff_split().0)
        .unwrap_or(1.0);
    if leading < 0.0 { (-u, false) } else { (u, true) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Assumptions;

    fn syms() -> (Symbol, Symbol) {
        (
            Symbol::new("t", Assumptions::real()),
            Symbol::new("f", Assumptions::real()),
        )
    }

    fn t_expr() -> Expr {
        Expr::symbol(Symbol::new("t", Assumptions::real()))
    }

    fn f_expr() -> Expr {
        Expr::symbol(Symbol::new("f", Assumptions::real()))
    }

    #[test]
    fn test_fourier_of_constant() {
        let (t, f) = syms();
        let result = fourier_transform(&Expr::from(5.0), &t, &f).unwrap();
        assert_eq!(result, Expr::from(5.0) * Expr::dirac_delta(f_expr()));
    }

    #[test]
    fn test_fourier_of_impulse() {
        let (t, f) = syms();
        let result = fourier_transform(&Expr::dirac_delta(t_expr()), &t, &f).unwrap();
        assert!(result.is_one());
    }

    #[test]
    fn test_fourier_of_cosine_is_impulse_pair() {
        let (t, f) = syms();
        let x = Expr::cos(Expr::from(TAU) * t_expr());
        let result = fourier_transform(&x, &t, &f).unwrap();
        let expected = simplify(
            &(Expr::from(0.5)
                * (Expr::dirac_delta(f_expr() - Expr::from(1.0))
                    + Expr::dirac_delta(f_expr() + Expr::from(1.0)))),
        );
        assert_eq!(result, expected);
    }

    #[test]
    fn test_fourier_of_causal_exponential() {
        let (t, f) = syms();
        let x = Expr::exp(Expr::from(-4.0) * t_expr());
        let result = fourier_transform(&x, &t, &f).unwrap();
        let expected =
            simplify(&Expr::recip(Expr::from(4.0) + Expr::from(TAU) * Expr::I * f_expr()));
        assert_eq!(result, expected);
    }

    #[test]
    fn test_fourier_rejects_growing_exponential() {
        let (t, f) = syms();
        let x = Expr::exp(Expr::from(4.0) * t_expr());
        assert!(fourier_transform(&x, &t, &f).is_err());
    }

    #[test]
    fn test_round_trip_cosine() {
        let (t, f) = syms();
        let x = Expr::cos(Expr::from(TAU) * t_expr());
        let spectrum = fourier_transform(&x, &t, &f).unwrap();
        let back = inverse_fourier_transform(&spectrum, &f, &t).unwrap();
        assert_eq!(back, simplify(&x));
    }

    #[test]
    fn test_round_trip_constant() {
        let (t, f) = syms();
        let spectrum = fourier_transform(&Expr::from(3.0), &t, &f).unwrap();
        let back = inverse_fourier_transform(&spectrum, &f, &t).unwrap();
        assert_eq!(back, Expr::from(3.0));
    }

    #[test]
    fn test_inverse_of_rational_spectrum() {
        let (t, f) = syms();
        let x = Expr::recip(Expr::from(4.0) + Expr::from(TAU) * Expr::I * f_expr());
        let back = inverse_fourier_transform(&x, &f, &t).unwrap();
        assert_eq!(back, Expr::exp(Expr::from(-4.0) * t_expr()));
    }
}
