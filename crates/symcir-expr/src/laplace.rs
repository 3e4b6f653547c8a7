//! One-sided Laplace transform and its inverse.
//!
//! Table-driven over the closed signal class: polynomials, exponentials,
//! sinusoids and exponentially damped sinusoids, unit steps and impulses.
//! The inverse handles reciprocal powers of linear factors and single
//! quadratic denominators (complete-the-square for numeric coefficients,
//! pure `s^2 + w^2` for symbolic ones). Anything outside the tables fails
//! with [`Error::UnsupportedTransform`] rather than guessing.

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

fn factorial(n: i64) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

/// One-sided Laplace transform with 0- as the lower limit.
pub fn laplace_transform(expr: &Expr, t: &Symbol, s: &Symbol) -> Result<Expr> {
    let expanded = expand(expr);
    let mut out = Vec::new();
    for term in expanded.terms() {
        out.push(transform_term(&term, t, s)?);
    }
    Ok(simplify(&Expr::sum(out)))
}

/// The pieces of one additive time-domain term.
#[derive(Default)]
struct TermParts {
    coeff: Vec<Expr>,
    t_power: i64,
    exp_rate: Option<Expr>,
    trig: Option<(Func, Expr, Expr)>, // (head, omega, phase)
    delta: bool,
}

fn split_term(term: &Expr, t: &Symbol) -> Result<TermParts> {
    let mut parts = TermParts::default();
    let t_expr = Expr::Sym(t.clone());

    for factor in term.factors() {
        if !factor.depends_on(t) {
            parts.coeff.push(factor);
            continue;
        }
        match &factor {
            Expr::Sym(_) => parts.t_power += 1,
            Expr::Pow(base, exp) => {
                let n = exp.as_int();
                if **base == t_expr && matches!(n, Some(k) if k >= 1) {
                    parts.t_power += n.unwrap();
                } else {
                    return Err(unsupported("Laplace", term));
                }
            }
            Expr::Func(Func::Exp, args) => {
                let (slope, offset) = crate::acdc::linear_in(&args[0], t)
                    .ok_or_else(|| unsupported("Laplace", term))?;
                if parts.exp_rate.is_some() {
                    return Err(unsupported("Laplace", term));
                }
                if !offset.is_zero() {
                    parts.coeff.push(Expr::exp(offset));
                }
                parts.exp_rate = Some(slope);
            }
            Expr::Func(head @ (Func::Sin | Func::Cos), args) => {
                if parts.trig.is_some() {
                    return Err(unsupported("Laplace", term));
                }
                let (omega, phase) = crate::acdc::linear_in(&args[0], t)
                    .ok_or_else(|| unsupported("Laplace", term))?;
                parts.trig = Some((head.clone(), omega, phase));
            }
            Expr::Func(Func::Heaviside, args) if args[0] == t_expr => {
                // One-sided transform: u(t) is implicit.
            }
            Expr::Func(Func::DiracDelta, args) if args[0] == t_expr => {
                parts.delta = true;
            }
            _ => return Err(unsupported("Laplace", term)),
        }
    }
    Ok(parts)
}

fn transform_term(term: &Expr, t: &Symbol, s: &Symbol) -> Result<Expr> {
    let parts = split_term(term, t)?;
    let coeff = Expr::product(parts.coeff);
    let s_expr = Expr::Sym(s.clone());

    if parts.delta {
        if parts.t_power != 0 || parts.trig.is_some() || parts.exp_rate.is_some() {
            return Err(unsupported("Laplace", term));
        }
        return Ok(coeff);
    }

    // Shifted variable s - a for an exp(a*t) factor.
    let sp = match &parts.exp_rate {
        Some(a) => s_expr.clone() - a.clone(),
        None => s_expr,
    };

    if let Some((head, omega, phase)) = parts.trig {
        if parts.t_power != 0 {
            return Err(unsupported("Laplace", term));
        }
        let denom = Expr::recip(
            Expr::pow(sp.clone(), Expr::from(2.0)) + Expr::pow(omega.clone(), Expr::from(2.0)),
        );
        let numer = match head {
            Func::Cos => {
                sp * Expr::cos(phase.clone()) - omega.clone() * Expr::sin(phase)
            }
            Func::Sin => sp * Expr::sin(phase.clone()) + omega.clone() * Expr::cos(phase),
            _ => unreachable!(),
        };
        return Ok(coeff * numer * denom);
    }

    let n = parts.t_power;
    Ok(coeff * Expr::from(factorial(n)) * Expr::pow(sp, Expr::from(-(n + 1) as f64)))
}

/// Extract polynomial coefficients in `s` up to degree `max_deg`.
fn poly_coeffs(expr: &Expr, s: &Symbol, max_deg: usize) -> Option<Vec<Expr>> {
    let expanded = expand(expr);
    let mut coeffs = vec![Vec::new(); max_deg + 1];
    for term in expanded.terms() {
        let mut degree = 0usize;
        let mut rest = Vec::new();
        for factor in term.factors() {
            if !factor.depends_on(s) {
                rest.push(factor);
                continue;
            }
            match &factor {
                Expr::Sym(_) => degree += 1,
                Expr::Pow(base, exp) => {
                    if **base == Expr::Sym(s.clone()) {
                        match exp.as_int() {
                            Some(k) if k >= 1 => degree += k as usize,
                            _ => return None,
                        }
                    } else {
                        return None;
                    }
                }
                _ => return None,
            }
        }
        if degree > max_deg {
            return None;
        }
        coeffs[degree].push(Expr::product(rest));
    }
    Some(coeffs.into_iter().map(Expr::sum).collect())
}

/// Inverse Laplace transform, returning the causal time function in plain
/// form (no explicit unit-step factor).
pub fn inverse_laplace(expr: &Expr, s: &Symbol, t: &Symbol) -> Result<Expr> {
    let expanded = expand(expr);
    let mut out = Vec::new();
    for term in expanded.terms() {
        out.push(inverse_term(&term, s, t)?);
    }
    Ok(simplify(&Expr::sum(out)))
}

fn inverse_term(term: &Expr, s: &Symbol, t: &Symbol) -> Result<Expr> {
    let t_expr = Expr::Sym(t.clone());
    let mut coeff = Vec::new();
    let mut s_power: i64 = 0;
    // (denominator base, positive power)
    let mut denom: Option<(Expr, i64)> = None;

    for factor in term.factors() {
        if !factor.depends_on(s) {
            coeff.push(factor);
            continue;
        }
        match &factor {
            Expr::Sym(_) => s_power += 1,
            Expr::Pow(base, exp) => match exp.as_int() {
                Some(k) if **base == Expr::Sym(s.clone()) => s_power += k,
                Some(k) if k < 0 => {
                    if denom.is_some() {
                        return Err(unsupported("inverse Laplace", term));
                    }
                    denom = Some(((**base).clone(), -k));
                }
                _ => return Err(unsupported("inverse Laplace", term)),
            },
            _ => return Err(unsupported("inverse Laplace", term)),
        }
    }
    let coeff = Expr::product(coeff);

    let Some((base, n)) = denom else {
        // Pure powers of s: only s^0 (an impulse) and s^-n (a ramp) invert.
        return match s_power {
            0 => Ok(coeff * Expr::dirac_delta(t_expr)),
            k if k < 0 => {
                let m = -k;
                Ok(coeff
                    * Expr::pow(t_expr, Expr::from((m - 1) as f64))
                    * Expr::from(1.0 / factorial(m - 1)))
            }
            _ => Err(unsupported("inverse Laplace", term)),
        };
    };

    // Net numerator powers of s beyond the denominator factor.
    let k = s_power;
    let c2 = poly_coeffs(&base, s, 2).ok_or_else(|| unsupported("inverse Laplace", term))?;

    if c2[2].is_zero() {
        // Linear denominator (c1*s + c0)^n.
        let c0 = c2[0].clone();
        let c1 = c2[1].clone();
        if c1.is_zero() {
            return Err(unsupported("inverse Laplace", term));
        }
        let a = simplify(&(c0 / c1.clone()));
        let scale = Expr::pow(c1, Expr::from(-n as f64));
        let decay = Expr::exp(-(a.clone() * t_expr.clone()));
        return match (k, n) {
            (0, _) => Ok(coeff
                * scale
                * Expr::pow(t_expr, Expr::from((n - 1) as f64))
                * Expr::from(1.0 / factorial(n - 1))
                * decay),
            (1, 1) => Ok(coeff * scale * (Expr::dirac_delta(t_expr) - a * decay)),
            _ => Err(unsupported("inverse Laplace", term)),
        };
    }

    // Quadratic denominator, single power only.
    if n != 1 || !(0..=1).contains(&k) {
        return Err(unsupported("inverse Laplace", term));
    }
    let scale = coeff * Expr::recip(c2[2].clone());
    let b_coeff = simplify(&(c2[1].clone() / (Expr::from(2.0) * c2[2].clone())));
    let c_coeff = simplify(&(c2[0].clone() / c2[2].clone()));

    if let (Some(b), Some(c)) = (b_coeff.as_num(), c_coeff.as_num()) {
        return Ok(scale * invert_numeric_quadratic(b, c, k, &t_expr));
    }

    // Symbolic coefficients: only the undamped form s^2 + w^2.
    if !b_coeff.is_zero() {
        return Err(unsupported("inverse Laplace", term));
    }
    let w = Expr::sqrt(c_coeff);
    let arg = w.clone() * t_expr;
    match k {
        0 => Ok(scale * Expr::sin(arg) * Expr::recip(w)),
        1 => Ok(scale * Expr::cos(arg)),
        _ => unreachable!(),
    }
}

/// Invert `s^k / (s^2 + 2b s + (b^2 + delta))` for numeric coefficients.
fn invert_numeric_quadratic(b: f64, c: f64, k: i64, t_expr: &Expr) -> Expr {
    const TOL: f64 = 1e-12;
    let delta = c - b * b;
    let decay = Expr::exp(Expr::from(-b) * t_expr.clone());

    if delta > TOL {
        // Complex pole pair: damped sinusoid.
        let w = delta.sqrt();
        let arg = Expr::from(w) * t_expr.clone();
        match k {
            0 => decay * Expr::sin(arg) * Expr::from(1.0 / w),
            _ => decay * (Expr::cos(arg.clone()) - Expr::from(b / w) * Expr::sin(arg)),
        }
    } else if delta.abs() <= TOL {
        // Repeated real pole at -b.
        match k {
            0 => t_expr.clone() * decay,
            _ => decay * (Expr::one() - Expr::from(b) * t_expr.clone()),
        }
    } else {
        // Distinct real poles.
        let r = (-delta).sqrt();
        let p1 = -b + r;
        let p2 = -b - r;
        let e1 = Expr::exp(Expr::from(p1) * t_expr.clone());
        let e2 = Expr::exp(Expr::from(p2) * t_expr.clone());
        let span = Expr::from(1.0 / (p1 - p2));
        match k {
            0 => span * (e1 - e2),
            _ => span * (Expr::from(p1) * e1 - Expr::from(p2) * e2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Assumptions;

    fn syms() -> (Symbol, Symbol) {
        (
            Symbol::new("t", Assumptions::real()),
            Symbol::new("s", Assumptions::complex()),
        )
    }

    fn s_expr() -> Expr {
        Expr::symbol(Symbol::new("s", Assumptions::complex()))
    }

    fn t_expr() -> Expr {
        Expr::symbol(Symbol::new("t", Assumptions::real()))
    }

    #[test]
    fn test_laplace_of_constant() {
        let (t, s) = syms();
        let result = laplace_transform(&Expr::from(5.0), &t, &s).unwrap();
        assert_eq!(result, Expr::from(5.0) / s_expr());
    }

    #[test]
    fn test_laplace_of_exponential() {
        let (t, s) = syms();
        let x = Expr::exp(Expr::from(-4.0) * t_expr());
        let result = laplace_transform(&x, &t, &s).unwrap();
        assert_eq!(result, Expr::recip(s_expr() + Expr::from(4.0)));
    }

    #[test]
    fn test_laplace_of_cosine() {
        let (t, s) = syms();
        let x = Expr::cos(Expr::from(3.0) * t_expr());
        let result = laplace_transform(&x, &t, &s).unwrap();
        let expected = s_expr() * Expr::recip(Expr::pow(s_expr(), Expr::from(2.0)) + Expr::from(9.0));
        assert_eq!(result, simplify(&expected));
    }

    #[test]
    fn test_laplace_of_ramp() {
        let (t, s) = syms();
        let result = laplace_transform(&t_expr(), &t, &s).unwrap();
        assert_eq!(result, Expr::pow(s_expr(), Expr::from(-2.0)));
    }

    #[test]
    fn test_laplace_of_impulse() {
        let (t, s) = syms();
        let result = laplace_transform(&Expr::dirac_delta(t_expr()), &t, &s).unwrap();
        assert!(result.is_one());
    }

    #[test]
    fn test_laplace_of_damped_sine() {
        let (t, s) = syms();
        let x = Expr::exp(Expr::from(-2.0) * t_expr()) * Expr::sin(Expr::from(3.0) * t_expr());
        let result = laplace_transform(&x, &t, &s).unwrap();
        // 3 / ((s+2)^2 + 9) expanded
        let sp = s_expr() + Expr::from(2.0);
        let expected =
            simplify(&(Expr::from(3.0) / (Expr::pow(sp, Expr::from(2.0)) + Expr::from(9.0))));
        assert_eq!(result, expected);
    }

    #[test]
    fn test_laplace_rejects_unknown_shapes() {
        let (t, s) = syms();
        let x = Expr::func(Func::Log, vec![t_expr()]);
        assert!(matches!(
            laplace_transform(&x, &t, &s),
            Err(Error::UnsupportedTransform { .. })
        ));
    }

    #[test]
    fn test_inverse_of_pole() {
        let (t, s) = syms();
        let x = Expr::recip(s_expr() + Expr::from(4.0));
        let result = inverse_laplace(&x, &s, &t).unwrap();
        assert_eq!(result, Expr::exp(Expr::from(-4.0) * t_expr()));
    }

    #[test]
    fn test_inverse_of_dc_pole() {
        let (t, s) = syms();
        let x = Expr::from(5.0) / s_expr();
        let result = inverse_laplace(&x, &s, &t).unwrap();
        assert_eq!(result, Expr::from(5.0));
    }

    #[test]
    fn test_inverse_of_cosine_pair() {
        let (t, s) = syms();
        let x = s_expr() * Expr::recip(Expr::pow(s_expr(), Expr::from(2.0)) + Expr::from(9.0));
        let result = inverse_laplace(&x, &s, &t).unwrap();
        assert_eq!(result, Expr::cos(Expr::from(3.0) * t_expr()));
    }

    #[test]
    fn test_inverse_of_symbolic_undamped() {
        let (t, s) = syms();
        let w = Expr::symbol(Symbol::new("omega_0", Assumptions::default()));
        let x = s_expr()
            * Expr::recip(Expr::pow(s_expr(), Expr::from(2.0)) + Expr::pow(w.clone(), Expr::from(2.0)));
        let result = inverse_laplace(&x, &s, &t).unwrap();
        assert_eq!(result, Expr::cos(w * t_expr()));
    }

    #[test]
    fn test_inverse_of_damped_cosine() {
        let (t, s) = syms();
        // s / (s^2 + 2s + 5): complex pole pair at -1 +/- 2j.
        let x = s_expr()
            * Expr::recip(
                Expr::pow(s_expr(), Expr::from(2.0)) + Expr::from(2.0) * s_expr() + Expr::from(5.0),
            );
        let result = inverse_laplace(&x, &s, &t).unwrap();
        let arg = Expr::from(2.0) * t_expr();
        let expected = Expr::exp(Expr::from(-1.0) * t_expr())
            * (Expr::cos(arg.clone()) - Expr::from(0.5) * Expr::sin(arg));
        assert_eq!(result, simplify(&expected));
    }

    #[test]
    fn test_inverse_of_repeated_pole() {
        let (t, s) = syms();
        let x = Expr::recip(Expr::pow(s_expr() + Expr::from(2.0), Expr::from(2.0)));
        let result = inverse_laplace(&x, &s, &t).unwrap();
        let expected = t_expr() * Expr::exp(Expr::from(-2.0) * t_expr());
        assert_eq!(result, simplify(&expected));
    }

    #[test]
    fn test_round_trip_exponential() {
        let (t, s) = syms();
        let x = Expr::exp(Expr::from(-4.0) * t_expr());
        let forward = laplace_transform(&x, &t, &s).unwrap();
        let back = inverse_laplace(&forward, &s, &t).unwrap();
        assert_eq!(back, x);
    }

    #[test]
    fn test_round_trip_cosine() {
        let (t, s) = syms();
        let x = Expr::cos(Expr::from(3.0) * t_expr());
        let forward = laplace_transform(&x, &t, &s).unwrap();
        let back = inverse_laplace(&forward, &s, &t).unwrap();
        assert_eq!(back, simplify(&x));
    }
}
