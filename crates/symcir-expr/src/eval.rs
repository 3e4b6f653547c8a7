//! Numeric evaluation of expressions at complex sample points.

use indexmap::IndexMap;
use num_complex::Complex64;
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::expr::{Expr, Func};
use crate::symbol::Symbol;

/// Symbol bindings for numeric evaluation.
pub type Bindings = IndexMap<String, Complex64>;

/// Evaluate an expression with the given symbol bindings.
pub fn eval(expr: &Expr, bindings: &Bindings) -> Result<Complex64> {
    match expr {
        Expr::Num(n) => Ok(Complex64::new(*n, 0.0)),
        Expr::I => Ok(Complex64::new(0.0, 1.0)),
        Expr::Sym(s) => bindings
            .get(s.name())
            .copied()
            .ok_or_else(|| Error::UnboundSymbol(s.name().to_string())),
        Expr::Add(terms) => {
            let mut acc = Complex64::zero();
            for term in terms {
                acc += eval(term, bindings)?;
            }
            Ok(acc)
        }
        Expr::Mul(factors) => {
            let mut acc = Complex64::new(1.0, 0.0);
            for factor in factors {
                acc *= eval(factor, bindings)?;
            }
            Ok(acc)
        }
        Expr::Pow(base, exp) => {
            let b = eval(base, bindings)?;
            let e = eval(exp, bindings)?;
            Ok(b.powc(e))
        }
        Expr::Func(head, args) => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval(arg, bindings)?);
            }
            apply(head, &values, expr)
        }
    }
}

fn apply(head: &Func, args: &[Complex64], expr: &Expr) -> Result<Complex64> {
    let x = args[0];
    Ok(match head {
        Func::Sin => x.sin(),
        Func::Cos => x.cos(),
        Func::Exp => x.exp(),
        Func::Log => x.ln(),
        Func::Abs => Complex64::new(x.norm(), 0.0),
        Func::Atan2 => Complex64::new(x.re.atan2(args[1].re), 0.0),
        Func::Heaviside => {
            if x.re > 0.0 {
                Complex64::new(1.0, 0.0)
            } else if x.re < 0.0 {
                Complex64::zero()
            } else {
                Complex64::new(0.5, 0.0)
            }
        }
        Func::DiracDelta | Func::User(_) => {
            return Err(Error::NotEvaluable(expr.to_string()));
        }
    })
}

/// Evaluate an expression at a vector of real sample points of one variable.
pub fn eval_at(expr: &Expr, var: &Symbol, samples: &[f64]) -> Result<Vec<Complex64>> {
    let mut bindings = Bindings::new();
    let mut out = Vec::with_capacity(samples.len());
    for &x in samples {
        bindings.insert(var.name().to_string(), Complex64::new(x, 0.0));
        out.push(eval(expr, &bindings)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Assumptions;

    #[test]
    fn test_eval_polynomial() {
        let x = Symbol::new("x", Assumptions::real());
        let e = Expr::pow(Expr::symbol(x.clone()), Expr::from(2.0)) + Expr::from(1.0);
        let values = eval_at(&e, &x, &[0.0, 1.0, 2.0]).unwrap();
        let re: Vec<f64> = values.iter().map(|v| v.re).collect();
        assert_eq!(re, vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_eval_unbound_symbol_fails() {
        let e = Expr::symbol(Symbol::new("R", Assumptions::default()));
        let err = eval(&e, &Bindings::new());
        assert!(matches!(err, Err(Error::UnboundSymbol(_))));
    }

    #[test]
    fn test_eval_imaginary() {
        let e = Expr::I * Expr::from(2.0);
        let v = eval(&e, &Bindings::new()).unwrap();
        assert_eq!(v, Complex64::new(0.0, 2.0));
    }

    #[test]
    fn test_eval_heaviside() {
        let t = Symbol::new("t", Assumptions::real());
        let e = Expr::heaviside(Expr::symbol(t.clone()));
        let values = eval_at(&e, &t, &[-1.0, 0.0, 1.0]).unwrap();
        let re: Vec<f64> = values.iter().map(|v| v.re).collect();
        assert_eq!(re, vec![0.0, 0.5, 1.0]);
    }
}
