//! Signal-form probes: DC, single-sinusoid AC, and causality checks.
//!
//! These classify time-domain payloads so the domain layer can pick the
//! right decomposition kind and disambiguate inverse transforms.

use crate::expr::{Expr, Func};
use crate::simplify::expand;
use crate::symbol::Symbol;

/// A sinusoidal additive term `amp * cos(omega*var + phase)` (sines are
/// normalized to cosines with a -pi/2 phase shift).
#[derive(Debug, Clone, PartialEq)]
pub struct SinusoidTerm {
    pub amplitude: Expr,
    pub phase: Expr,
    pub omega: Expr,
}

/// Amplitude, phase, and angular frequency of a pure AC signal.
#[derive(Debug, Clone, PartialEq)]
pub struct AcCheck {
    pub amplitude: Expr,
    pub phase: Expr,
    pub omega: Expr,
}

/// True if the expression has no dependence on the variable (a constant in
/// that domain).
pub fn is_dc(expr: &Expr, var: &Symbol) -> bool {
    !expr.depends_on(var)
}

/// Split an expression linear in `var` into `(slope, offset)`.
///
/// Returns `None` when any term depends on `var` other than as a plain
/// factor.
pub fn linear_in(expr: &Expr, var: &Symbol) -> Option<(Expr, Expr)> {
    let expanded = expand(expr);
    let mut slope = Vec::new();
    let mut offset = Vec::new();
    for term in expanded.terms() {
        if !term.depends_on(var) {
            offset.push(term);
            continue;
        }
        let mut rest = Vec::new();
        let mut var_count = 0;
        for factor in term.factors() {
            match &factor {
                Expr::Sym(s) if s == var => var_count += 1,
                f if f.depends_on(var) => return None,
                _ => rest.push(factor),
            }
        }
        if var_count != 1 {
            return None;
        }
        slope.push(Expr::product(rest));
    }
    Some((Expr::sum(slope), Expr::sum(offset)))
}

/// Match a single additive term against `amp * trig(omega*var + phase)`.
pub fn sinusoid_term(term: &Expr, var: &Symbol) -> Option<SinusoidTerm> {
    let mut amplitude = Vec::new();
    let mut trig: Option<(Func, Expr)> = None;

    for factor in term.factors() {
        match &factor {
            Expr::Func(head @ (Func::Sin | Func::Cos), args) if factor.depends_on(var) => {
                if trig.is_some() {
                    return None;
                }
                trig = Some((head.clone(), args[0].clone()));
            }
            f if f.depends_on(var) => return None,
            _ => amplitude.push(factor),
        }
    }

    let (head, arg) = trig?;
    let (omega, mut phase) = linear_in(&arg, var)?;
    if omega.is_zero() {
        return None;
    }
    if matches!(head, Func::Sin) {
        // sin(x) = cos(x - pi/2)
        phase = phase - Expr::from(std::f64::consts::FRAC_PI_2);
    }

    let mut amplitude = Expr::product(amplitude);
    // Normalize a negative angular frequency: cos(-w*t + p) = cos(w*t - p).
    let (omega_coeff, _) = omega.coeff_split();
    let (omega, phase) = if omega_coeff < 0.0 {
        (-omega, -phase)
    } else {
        (omega, phase)
    };
    // Fold a negative numeric amplitude into the phase.
    let (amp_coeff, amp_rest) = amplitude.coeff_split();
    let phase = if amp_coeff < 0.0 {
        amplitude = Expr::from(-amp_coeff) * amp_rest;
        phase + Expr::from(std::f64::consts::PI)
    } else {
        phase
    };

    Some(SinusoidTerm {
        amplitude,
        phase,
        omega,
    })
}

/// Match the whole expression against a single-frequency real sinusoid,
/// combining cosine and sine terms at the same angular frequency.
pub fn match_ac(expr: &Expr, var: &Symbol) -> Option<AcCheck> {
    let expanded = expand(expr);
    if !expanded.depends_on(var) {
        return None;
    }

    let mut omega: Option<Expr> = None;
    // Complex amplitude accumulated as a * e^{j*phase} = re + j*im.
    let mut re_parts = Vec::new();
    let mut im_parts = Vec::new();

    for term in expanded.terms() {
        let sin = sinusoid_term(&term, var)?;
        match &omega {
            None => omega = Some(sin.omega.clone()),
            Some(w) if *w == sin.omega => {}
            Some(_) => return None,
        }
        re_parts.push(sin.amplitude.clone() * Expr::cos(sin.phase.clone()));
        im_parts.push(sin.amplitude * Expr::sin(sin.phase));
    }

    let omega = omega?;
    let re = Expr::sum(re_parts);
    let im = Expr::sum(im_parts);

    let (amplitude, phase) = if let (Some(a), Some(b)) = (re.as_num(), im.as_num()) {
        (
            Expr::from(a.hypot(b)),
            Expr::from(if a == 0.0 && b == 0.0 { 0.0 } else { b.atan2(a) }),
        )
    } else if im.is_zero() {
        (re, Expr::zero())
    } else {
        (
            Expr::sqrt(
                Expr::pow(re.clone(), Expr::from(2.0)) + Expr::pow(im.clone(), Expr::from(2.0)),
            ),
            Expr::atan2(im, re),
        )
    };

    Some(AcCheck {
        amplitude,
        phase,
        omega,
    })
}

/// True if the expression is a pure sinusoid in `var`.
pub fn is_ac(expr: &Expr, var: &Symbol) -> bool {
    match_ac(expr, var).is_some()
}

/// True if the expression is zero for negative values of `var`: every term
/// depending on `var` carries a unit-step factor gated on `var`.
pub fn is_causal(expr: &Expr, var: &Symbol) -> bool {
    let expanded = expand(expr);
    let mut found = false;
    for term in expanded.terms() {
        if !term.depends_on(var) {
            return false;
        }
        let gated = term.factors().iter().any(|f| {
            matches!(f, Expr::Func(Func::Heaviside | Func::DiracDelta, args)
                     if args[0] == Expr::Sym(var.clone()))
        });
        if !gated {
            return false;
        }
        found = true;
    }
    found
}
