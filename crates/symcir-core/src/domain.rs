//! Domain-tagged expression wrappers.
//!
//! A [`DomainExpr`] pairs an engine expression with the transform domain it
//! lives in and the physical quantity it measures. Construction validates
//! domain exclusivity (a time-domain payload may not mention `s`, and so on),
//! so an ill-domained expression cannot be represented at all.

use std::fmt;

use num_complex::Complex64;

use symcir_expr::{
    Bindings, Expr, Symbol, complex_parts, eval, eval_at, expand, fourier_transform,
    inverse_fourier_transform, inverse_laplace, laplace_transform, simplify,
};

use crate::error::{Error, Result};
use crate::registry::{FREQUENCY, LAPLACE, OMEGA, TIME};

/// The physical quantity a wrapped expression measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Generic,
    Voltage,
    Current,
    Impedance,
    Admittance,
    TransferFunction,
}

impl Quantity {
    pub fn label(&self) -> &'static str {
        match self {
            Quantity::Generic => "expression",
            Quantity::Voltage => "voltage",
            Quantity::Current => "current",
            Quantity::Impedance => "impedance",
            Quantity::Admittance => "admittance",
            Quantity::TransferFunction => "transfer function",
        }
    }
}

/// The transform domain of a wrapped expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Function of time `t`.
    Time,
    /// Function of the Laplace variable `s`.
    Laplace,
    /// Function of ordinary frequency `f`.
    Fourier,
    /// Function of angular frequency `omega`.
    AngularFourier,
    /// Constant in every domain.
    Const,
    /// Complex amplitude of a sinusoid at one angular frequency.
    Phasor { omega: Expr },
    /// One-sided spectral density of an independent noise source.
    Noise { nid: String },
}

impl Domain {
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Time => "time",
            Domain::Laplace => "laplace",
            Domain::Fourier => "fourier",
            Domain::AngularFourier => "angular fourier",
            Domain::Const => "constant",
            Domain::Phasor { .. } => "phasor",
            Domain::Noise { .. } => "noise",
        }
    }

    /// The independent variable of this domain, if it has one.
    pub fn var(&self) -> Option<&'static Symbol> {
        match self {
            Domain::Time => Some(&*TIME),
            Domain::Laplace => Some(&*LAPLACE),
            Domain::Fourier => Some(&*FREQUENCY),
            Domain::AngularFourier => Some(&*OMEGA),
            Domain::Const | Domain::Phasor { .. } | Domain::Noise { .. } => None,
        }
    }

    /// Domain variables a payload in this domain must not reference.
    fn forbidden(&self) -> Vec<&'static Symbol> {
        match self {
            Domain::Time => vec![&*LAPLACE, &*FREQUENCY],
            Domain::Laplace => vec![&*TIME, &*FREQUENCY],
            Domain::Fourier => vec![&*LAPLACE, &*TIME],
            Domain::AngularFourier => vec![&*LAPLACE, &*TIME, &*FREQUENCY],
            Domain::Const => vec![&*TIME, &*LAPLACE, &*FREQUENCY, &*OMEGA],
            Domain::Phasor { .. } | Domain::Noise { .. } => {
                vec![&*TIME, &*LAPLACE, &*FREQUENCY]
            }
        }
    }
}

/// Properties inferred from a time-domain payload, carried alongside its
/// Laplace image so a later inverse transform keeps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inference {
    pub dc: bool,
    pub ac: bool,
    pub causal: bool,
}

impl Inference {
    /// Properties of a sum: each flag survives only if both operands carry it.
    pub fn meet(self, other: Inference) -> Inference {
        Inference {
            dc: self.dc && other.dc,
            ac: self.ac && other.ac,
            causal: self.causal && other.causal,
        }
    }
}

/// An expression tagged with its domain and quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainExpr {
    expr: Expr,
    domain: Domain,
    quantity: Quantity,
    inference: Inference,
}

impl DomainExpr {
    /// Wrap an expression, rejecting payloads that reference a variable the
    /// domain forbids.
    pub fn new(expr: Expr, domain: Domain, quantity: Quantity) -> Result<Self> {
        for var in domain.forbidden() {
            if expr.depends_on(var) {
                return Err(Error::DomainViolation {
                    domain: domain.name(),
                    var: var.name().to_string(),
                    expr: expr.to_string(),
                });
            }
        }
        Ok(Self {
            expr,
            domain,
            quantity,
            inference: Inference::default(),
        })
    }

    /// The zero element of a domain.
    pub fn zero(domain: Domain, quantity: Quantity) -> Self {
        Self {
            expr: Expr::zero(),
            domain,
            quantity,
            inference: Inference::default(),
        }
    }

    /// A constant wrapper around a value free of all domain variables.
    pub fn constant(expr: Expr, quantity: Quantity) -> Result<Self> {
        Self::new(expr, Domain::Const, quantity)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn inference(&self) -> Inference {
        self.inference
    }

    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_inference(mut self, inference: Inference) -> Self {
        self.inference = inference;
        self
    }

    pub fn is_zero(&self) -> bool {
        self.expr.is_zero()
    }

    /// Display units for this quantity in this domain.
    pub fn units(&self) -> &'static str {
        let spectral = matches!(
            self.domain,
            Domain::Laplace | Domain::Fourier | Domain::AngularFourier
        );
        match self.quantity {
            Quantity::Voltage => match self.domain {
                Domain::Noise { .. } => "V/sqrt(Hz)",
                _ if spectral => "V/Hz",
                _ => "V",
            },
            Quantity::Current => match self.domain {
                Domain::Noise { .. } => "A/sqrt(Hz)",
                _ if spectral => "A/Hz",
                _ => "A",
            },
            Quantity::Impedance => match self.domain {
                Domain::Time => "ohms/s",
                _ => "ohms",
            },
            Quantity::Admittance => match self.domain {
                Domain::Time => "siemens/s",
                _ => "siemens",
            },
            Quantity::Generic | Quantity::TransferFunction => "",
        }
    }

    /// Infer dc / ac / causal properties of a time-domain payload.
    pub fn infer(&self) -> Inference {
        match self.domain {
            Domain::Time => Inference {
                dc: symcir_expr::acdc::is_dc(&self.expr, &TIME),
                ac: symcir_expr::acdc::is_ac(&self.expr, &TIME),
                causal: symcir_expr::acdc::is_causal(&self.expr, &TIME),
            },
            Domain::Const => Inference {
                dc: true,
                ..Inference::default()
            },
            _ => self.inference,
        }
    }

    /// Convert to the time domain.
    pub fn time(&self) -> Result<DomainExpr> {
        match &self.domain {
            Domain::Time => Ok(self.clone()),
            Domain::Const => DomainExpr::new(self.expr.clone(), Domain::Time, self.quantity),
            Domain::Laplace => {
                let expr = inverse_laplace(&self.expr, &LAPLACE, &TIME)?;
                Ok(DomainExpr::new(expr, Domain::Time, self.quantity)?
                    .with_inference(self.inference))
            }
            Domain::Fourier => {
                let expr = inverse_fourier_transform(&self.expr, &FREQUENCY, &TIME)?;
                DomainExpr::new(expr, Domain::Time, self.quantity)
            }
            Domain::AngularFourier => self.as_fourier()?.time(),
            Domain::Phasor { omega } => {
                // A e^{j p} at omega realizes as re*cos(w t) - im*sin(w t).
                let parts = complex_parts(&self.expr)?;
                let wt = omega.clone() * Expr::symbol(TIME.clone());
                let expr = simplify(
                    &(parts.re * Expr::cos(wt.clone()) - parts.im * Expr::sin(wt)),
                );
                DomainExpr::new(expr, Domain::Time, self.quantity)
            }
            Domain::Noise { .. } => Err(Error::NoiseRealization("time")),
        }
    }

    /// Convert to the Laplace domain.
    pub fn laplace(&self) -> Result<DomainExpr> {
        match &self.domain {
            Domain::Laplace => Ok(self.clone()),
            Domain::Time | Domain::Const => {
                let inference = self.infer();
                let expr = laplace_transform(&self.expr, &TIME, &LAPLACE)?;
                Ok(DomainExpr::new(expr, Domain::Laplace, self.quantity)?
                    .with_inference(inference))
            }
            Domain::Noise { .. } => Err(Error::NoiseRealization("laplace")),
            _ => self.time()?.laplace(),
        }
    }

    /// Convert to the Fourier domain.
    pub fn fourier(&self) -> Result<DomainExpr> {
        match &self.domain {
            Domain::Fourier => Ok(self.clone()),
            Domain::AngularFourier => self.as_fourier(),
            Domain::Time | Domain::Const => {
                let expr = fourier_transform(&self.expr, &TIME, &FREQUENCY)?;
                DomainExpr::new(expr, Domain::Fourier, self.quantity)
            }
            Domain::Noise { .. } => Err(Error::NoiseRealization("fourier")),
            _ => self.time()?.fourier(),
        }
    }

    /// Rewrite an angular-frequency payload in terms of ordinary frequency.
    fn as_fourier(&self) -> Result<DomainExpr> {
        let two_pi_f = Expr::from(std::f64::consts::TAU) * Expr::symbol(FREQUENCY.clone());
        let expr = self.expr.subs(&OMEGA, &two_pi_f);
        DomainExpr::new(expr, Domain::Fourier, self.quantity)
    }

    /// Convert a single-frequency sinusoid to its phasor.
    pub fn to_phasor(&self) -> Result<DomainExpr> {
        match &self.domain {
            Domain::Phasor { .. } => Ok(self.clone()),
            Domain::Time => {
                let check = symcir_expr::acdc::match_ac(&self.expr, &TIME)
                    .ok_or_else(|| Error::NotPhasor(self.expr.to_string()))?;
                let payload =
                    check.amplitude * Expr::exp(Expr::imaginary_unit() * check.phase);
                DomainExpr::new(
                    payload,
                    Domain::Phasor { omega: check.omega },
                    self.quantity,
                )
            }
            _ => Err(Error::NotPhasor(self.expr.to_string())),
        }
    }

    /// Evaluate numerically over samples of the domain variable.
    ///
    /// Constants are replicated across the sample vector; phasors and noise
    /// densities have no single evaluation variable and must be converted
    /// first.
    pub fn evaluate(&self, samples: &[f64]) -> Result<Vec<Complex64>> {
        match self.domain.var() {
            Some(var) => Ok(eval_at(&self.expr, var, samples)?),
            None if matches!(self.domain, Domain::Const) => {
                let value = eval(&self.expr, &Bindings::new())?;
                Ok(vec![value; samples.len()])
            }
            None => Err(Error::UnsupportedOperation {
                op: "evaluate",
                detail: format!("{} domain has no evaluation variable", self.domain.name()),
            }),
        }
    }

    /// Add another wrapper in the same domain and quantity.
    pub fn merge_add(&self, other: &DomainExpr) -> Result<DomainExpr> {
        if self.domain != other.domain || self.quantity != other.quantity {
            return Err(Error::UnsupportedOperation {
                op: "add",
                detail: format!(
                    "{} {} + {} {}",
                    self.domain.name(),
                    self.quantity.label(),
                    other.domain.name(),
                    other.quantity.label()
                ),
            });
        }
        Ok(DomainExpr::new(
            self.expr.clone() + other.expr.clone(),
            self.domain.clone(),
            self.quantity,
        )?
        .with_inference(self.inference.meet(other.inference)))
    }

    pub fn negate(&self) -> DomainExpr {
        Self {
            expr: -self.expr.clone(),
            domain: self.domain.clone(),
            quantity: self.quantity,
            inference: self.inference,
        }
    }

    /// Multiply the payload by a factor free of all domain variables.
    pub fn scale(&self, factor: &Expr) -> Result<DomainExpr> {
        for var in [&*TIME, &*LAPLACE, &*FREQUENCY, &*OMEGA] {
            if factor.depends_on(var) {
                return Err(Error::UnsupportedOperation {
                    op: "scale",
                    detail: format!("scale factor depends on '{}': {factor}", var.name()),
                });
            }
        }
        Ok(Self {
            expr: self.expr.clone() * factor.clone(),
            domain: self.domain.clone(),
            quantity: self.quantity,
            inference: Inference::default(),
        })
    }

    /// Simplify the payload in place of a new wrapper.
    pub fn simplified(&self) -> DomainExpr {
        Self {
            expr: simplify(&self.expr),
            domain: self.domain.clone(),
            quantity: self.quantity,
            inference: self.inference,
        }
    }

    /// Rewrite the payload in expanded canonical form.
    pub fn canonical(&self) -> DomainExpr {
        Self {
            expr: expand(&self.expr),
            domain: self.domain.clone(),
            quantity: self.quantity,
            inference: self.inference,
        }
    }
}

impl fmt::Display for DomainExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symcir_expr::{Assumptions, equivalent};

    fn t() -> Expr {
        Expr::symbol(TIME.clone())
    }

    fn s() -> Expr {
        Expr::symbol(LAPLACE.clone())
    }

    #[test]
    fn test_domain_exclusivity() {
        let err = DomainExpr::new(s(), Domain::Time, Quantity::Voltage);
        assert!(matches!(err, Err(Error::DomainViolation { .. })));

        let err = DomainExpr::new(t(), Domain::Const, Quantity::Voltage);
        assert!(matches!(err, Err(Error::DomainViolation { .. })));
    }

    #[test]
    fn test_laplace_round_trip() {
        let v = DomainExpr::new(
            Expr::exp(Expr::from(-4.0) * t()),
            Domain::Time,
            Quantity::Voltage,
        )
        .unwrap();
        let vs = v.laplace().unwrap();
        assert_eq!(*vs.domain(), Domain::Laplace);
        assert!(equivalent(vs.expr(), &Expr::recip(s() + Expr::from(4.0))));

        let back = vs.time().unwrap();
        assert!(equivalent(back.expr(), v.expr()));
    }

    #[test]
    fn test_phasor_of_cosine() {
        let v = DomainExpr::new(
            Expr::from(3.0) * Expr::cos(Expr::from(2.0) * t()),
            Domain::Time,
            Quantity::Voltage,
        )
        .unwrap();
        let ph = v.to_phasor().unwrap();
        assert_eq!(
            *ph.domain(),
            Domain::Phasor {
                omega: Expr::from(2.0)
            }
        );
        assert!(equivalent(ph.expr(), &Expr::from(3.0)));

        let back = ph.time().unwrap();
        assert!(equivalent(back.expr(), v.expr()));
    }

    #[test]
    fn test_phasor_time_of_quadrature_amplitude() {
        // (1 - j) at omega=5 realizes as cos(5t) + sin(5t).
        let payload = Expr::one() - Expr::imaginary_unit();
        let ph = DomainExpr::new(
            payload,
            Domain::Phasor {
                omega: Expr::from(5.0),
            },
            Quantity::Current,
        )
        .unwrap();
        let time = ph.time().unwrap();
        let five_t = Expr::from(5.0) * t();
        let expected = Expr::cos(five_t.clone()) + Expr::sin(five_t);
        assert!(equivalent(time.expr(), &expected));
    }

    #[test]
    fn test_constant_units_and_infer() {
        let r = Expr::symbol(Symbol::new("R", Assumptions::default()));
        let v = DomainExpr::constant(r, Quantity::Voltage).unwrap();
        assert_eq!(v.units(), "V");
        assert!(v.infer().dc);
    }

    #[test]
    fn test_causal_inference_survives_laplace() {
        let v = DomainExpr::new(
            Expr::exp(Expr::from(-2.0) * t()) * Expr::heaviside(t()),
            Domain::Time,
            Quantity::Voltage,
        )
        .unwrap();
        let vs = v.laplace().unwrap();
        assert!(vs.inference().causal);
    }

    #[test]
    fn test_scale_rejects_domain_vars() {
        let v = DomainExpr::new(t(), Domain::Time, Quantity::Voltage).unwrap();
        assert!(v.scale(&s()).is_err());
    }
}
