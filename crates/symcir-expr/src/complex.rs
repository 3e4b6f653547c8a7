//! Splitting expressions into real and imaginary parts.
//!
//! Works over the closed class the toolkit needs: polynomials in the
//! imaginary unit, complex exponentials `exp(j*theta)`, and reciprocals of
//! complex linear forms. Symbols are taken as real (domain wrappers never
//! feed the complex Laplace variable through here).

use crate::error::{Error, Result};
use crate::expr::{Expr, Func};

/// Real and imaginary parts of an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexParts {
    pub re: Expr,
    pub im: Expr,
}

impl ComplexParts {
    fn real(re: Expr) -> Self {
        Self {
            re,
            im: Expr::zero(),
        }
    }

    fn mul(&self, other: &ComplexParts) -> ComplexParts {
        ComplexParts {
            re: self.re.clone() * other.re.clone() - self.im.clone() * other.im.clone(),
            im: self.re.clone() * other.im.clone() + self.im.clone() * other.re.clone(),
        }
    }

    fn recip(&self) -> ComplexParts {
        let norm = Expr::pow(self.re.clone(), Expr::from(2.0))
            + Expr::pow(self.im.clone(), Expr::from(2.0));
        ComplexParts {
            re: self.re.clone() / norm.clone(),
            im: -self.im.clone() / norm,
        }
    }

    /// Magnitude sqrt(re^2 + im^2).
    pub fn magnitude(&self) -> Expr {
        if self.im.is_zero() {
            return magnitude_of_real(&self.re);
        }
        if self.re.is_zero() {
            return magnitude_of_real(&self.im);
        }
        Expr::sqrt(
            Expr::pow(self.re.clone(), Expr::from(2.0))
                + Expr::pow(self.im.clone(), Expr::from(2.0)),
        )
    }
}

/// |x| for a real x, distributed over factors so positive ones fold away.
fn magnitude_of_real(re: &Expr) -> Expr {
    let (coeff, rest) = re.coeff_split();
    if coeff < 0.0 {
        return Expr::from(-coeff) * magnitude_of_real(&rest);
    }
    if rest.is_one() {
        return Expr::from(coeff);
    }
    let abs = Expr::product(rest.factors().into_iter().map(Expr::abs).collect());
    Expr::from(coeff) * abs
}

/// Split an expression into real and imaginary parts.
///
/// Fails with [`Error::ComplexSplit`] on shapes outside the supported class.
pub fn complex_parts(expr: &Expr) -> Result<ComplexParts> {
    match expr {
        Expr::Num(n) => Ok(ComplexParts::real(Expr::from(*n))),
        Expr::I => Ok(ComplexParts {
            re: Expr::zero(),
            im: Expr::one(),
        }),
        Expr::Sym(_) => Ok(ComplexParts::real(expr.clone())),
        Expr::Add(terms) => {
            let mut re = Vec::new();
            let mut im = Vec::new();
            for term in terms {
                let parts = complex_parts(term)?;
                re.push(parts.re);
                im.push(parts.im);
            }
            Ok(ComplexParts {
                re: Expr::sum(re),
                im: Expr::sum(im),
            })
        }
        Expr::Mul(factors) => {
            let mut acc = ComplexParts::real(Expr::one());
            for factor in factors {
                let parts = complex_parts(factor)?;
                acc = acc.mul(&parts);
            }
            Ok(acc)
        }
        Expr::Pow(base, exp) => {
            let n = exp
                .as_int()
                .ok_or_else(|| Error::ComplexSplit(expr.to_string()))?;
            let base_parts = complex_parts(base)?;
            if base_parts.im.is_zero() {
                return Ok(ComplexParts::real(expr.clone()));
            }
            let mut acc = ComplexParts::real(Expr::one());
            for _ in 0..n.abs() {
                acc = acc.mul(&base_parts);
            }
            if n < 0 { Ok(acc.recip()) } else { Ok(acc) }
        }
        Expr::Func(Func::Exp, args) if args.len() == 1 => {
            let arg_parts = complex_parts(&args[0])?;
            let scale = Expr::exp(arg_parts.re);
            Ok(ComplexParts {
                re: scale.clone() * Expr::cos(arg_parts.im.clone()),
                im: scale * Expr::sin(arg_parts.im),
            })
        }
        Expr::Func(_, args) => {
            // Real-valued function of real arguments.
            for arg in args {
                let parts = complex_parts(arg)?;
                if !parts.im.is_zero() {
                    return Err(Error::ComplexSplit(expr.to_string()));
                }
            }
            Ok(ComplexParts::real(expr.clone()))
        }
    }
}

/// Symbolic magnitude of a possibly-complex expression.
pub fn magnitude(expr: &Expr) -> Expr {
    match complex_parts(expr) {
        Ok(parts) => parts.magnitude(),
        Err(_) => Expr::abs(expr.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Assumptions, Symbol};

    fn sym(name: &str) -> Expr {
        Expr::symbol(Symbol::new(name, Assumptions::default()))
    }

    #[test]
    fn test_parts_of_linear_complex() {
        let a = sym("a");
        let e = a.clone() + Expr::from(2.0) * Expr::I;
        let parts = complex_parts(&e).unwrap();
        assert_eq!(parts.re, a);
        assert_eq!(parts.im, Expr::from(2.0));
    }

    #[test]
    fn test_parts_of_complex_exponential() {
        let th = sym("theta");
        let e = Expr::exp(Expr::I * th.clone());
        let parts = complex_parts(&e).unwrap();
        assert_eq!(parts.re, Expr::cos(th.clone()));
        assert_eq!(parts.im, Expr::sin(th));
    }

    #[test]
    fn test_parts_of_reciprocal() {
        // 1/(1 + j) = (1 - j)/2
        let e = Expr::recip(Expr::from(1.0) + Expr::I);
        let parts = complex_parts(&e).unwrap();
        assert_eq!(parts.re, Expr::from(0.5));
        assert_eq!(parts.im, Expr::from(-0.5));
    }

    #[test]
    fn test_magnitude_of_complex() {
        let e = Expr::from(3.0) + Expr::from(4.0) * Expr::I;
        assert_eq!(magnitude(&e), Expr::from(5.0));
    }

    #[test]
    fn test_magnitude_of_negative_real() {
        // R carries the positive assumption, so abs folds away.
        let r = sym("R");
        let e = Expr::from(-2.0) * r.clone();
        assert_eq!(magnitude(&e), Expr::from(2.0) * r);
    }
}
