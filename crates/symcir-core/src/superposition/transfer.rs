//! Frequency-domain transfer: multiplying a superposition by a two-terminal
//! element's Laplace response, applied per component at that component's own
//! frequency.

use symcir_expr::{Expr, magnitude, simplify};

use crate::domain::{Domain, DomainExpr, Quantity};
use crate::error::{Error, Result};
use crate::registry::{LAPLACE, OMEGA};

use super::{Kind, Superposition, Value};

/// Right-hand operand of a superposition multiplication or division.
#[derive(Debug, Clone)]
pub enum MulOperand {
    /// A scalar free of all domain variables.
    Scalar(Expr),
    /// A Laplace-domain impedance, admittance, or transfer-function response.
    Response(DomainExpr),
    /// Another superposition. Never meaningful; rejected with guidance.
    Super(Superposition),
}

impl From<Expr> for MulOperand {
    fn from(expr: Expr) -> Self {
        MulOperand::Scalar(expr)
    }
}

impl From<f64> for MulOperand {
    fn from(x: f64) -> Self {
        MulOperand::Scalar(Expr::from(x))
    }
}

impl From<DomainExpr> for MulOperand {
    fn from(part: DomainExpr) -> Self {
        MulOperand::Response(part)
    }
}

impl From<Superposition> for MulOperand {
    fn from(sup: Superposition) -> Self {
        MulOperand::Super(sup)
    }
}

impl Superposition {
    /// Multiply by a scalar or a Laplace-domain response.
    ///
    /// Multiplying two full superpositions is electrically meaningless and
    /// fails; extract a component first.
    pub fn multiply(&self, rhs: impl Into<MulOperand>) -> Result<Superposition> {
        match rhs.into() {
            MulOperand::Scalar(factor) => self.scale(&factor),
            MulOperand::Response(response) => self.transfer_multiply(&response),
            MulOperand::Super(other) => Err(Error::UnsupportedOperation {
                op: "multiply",
                detail: format!(
                    "{} superposition * {} superposition; extract a component first",
                    self.quantity().label(),
                    other.quantity().label()
                ),
            }),
        }
    }

    /// Divide by a scalar or a Laplace-domain response.
    pub fn divide(&self, rhs: impl Into<MulOperand>) -> Result<Superposition> {
        match rhs.into() {
            MulOperand::Scalar(factor) => self.scale(&Expr::recip(factor)),
            MulOperand::Response(response) => self.transfer_divide(&response),
            MulOperand::Super(other) => Err(Error::UnsupportedOperation {
                op: "divide",
                detail: format!(
                    "{} superposition / {} superposition; extract a component first",
                    self.quantity().label(),
                    other.quantity().label()
                ),
            }),
        }
    }

    /// Apply a Laplace-domain response to every component at that
    /// component's own frequency.
    ///
    /// The dc component sees the response at zero frequency, each phasor
    /// sees it at `j*omega` for its own omega, noise densities see its
    /// magnitude at `j*omega`, and the `s` component multiplies directly.
    /// A raw `t` entry forces decomposition first unless the response is
    /// frequency-independent, in which case it multiplies in place.
    pub fn transfer_multiply(&self, response: &DomainExpr) -> Result<Superposition> {
        let (h, quantity) = transfer_factor(self.quantity(), response, "multiply")?;

        let depends_s = h.depends_on(&LAPLACE);
        let view = if depends_s && self.get(&Kind::TTransient).is_some() {
            self.decompose()?.clone()
        } else {
            self.clone()
        };

        let mut out = Superposition::with_symbols(quantity, view.symbols.clone());
        let j = Expr::imaginary_unit();
        for (kind, part) in view.components() {
            let payload = match kind {
                Kind::Dc => {
                    let h0 = simplify(&h.subs(&LAPLACE, &Expr::zero()));
                    if singular_at_zero(&h0) {
                        return Err(Error::UnsupportedOperation {
                            op: "transfer",
                            detail: format!("response {} is singular at dc", h),
                        });
                    }
                    part.expr().clone() * h0
                }
                Kind::Ac(omega) => {
                    let h_jw = h.subs(&LAPLACE, &(j.clone() * omega.clone()));
                    part.expr().clone() * h_jw
                }
                Kind::Noise(_) => {
                    let h_jw = h.subs(&LAPLACE, &(j.clone() * Expr::symbol(OMEGA.clone())));
                    part.expr().clone() * magnitude(&simplify(&h_jw))
                }
                Kind::STransient | Kind::TTransient => part.expr().clone() * h.clone(),
            };
            let part = DomainExpr::new(simplify(&payload), kind.domain(), quantity)?;
            out.add(Value::Wrapped(part))?;
        }
        Ok(out)
    }

    /// Apply the reciprocal response, flipping impedance and admittance.
    pub fn transfer_divide(&self, response: &DomainExpr) -> Result<Superposition> {
        let flipped = match response.quantity() {
            Quantity::Impedance => Quantity::Admittance,
            Quantity::Admittance => Quantity::Impedance,
            Quantity::TransferFunction => Quantity::TransferFunction,
            other => {
                return Err(Error::UnsupportedOperation {
                    op: "divide",
                    detail: format!(
                        "{} superposition / {} response",
                        self.quantity().label(),
                        other.label()
                    ),
                });
            }
        };
        let inverted = DomainExpr::new(
            Expr::recip(response.expr().clone()),
            response.domain().clone(),
            flipped,
        )?;
        self.transfer_multiply(&inverted)
    }
}

/// True if the expression carries a zero base raised to a negative power,
/// the residue of evaluating a response at a pole.
fn singular_at_zero(expr: &Expr) -> bool {
    match expr {
        Expr::Pow(base, exp) => {
            (base.is_zero() && matches!(exp.as_num(), Some(e) if e < 0.0))
                || singular_at_zero(base)
                || singular_at_zero(exp)
        }
        Expr::Add(terms) => terms.iter().any(singular_at_zero),
        Expr::Mul(factors) => factors.iter().any(singular_at_zero),
        Expr::Func(_, args) => args.iter().any(singular_at_zero),
        _ => false,
    }
}

/// Resolve the effective Laplace factor and the resulting quantity for a
/// transfer operation, applying Ohm's law to pick the direction.
fn transfer_factor(
    quantity: Quantity,
    response: &DomainExpr,
    op: &'static str,
) -> Result<(Expr, Quantity)> {
    if !matches!(response.domain(), Domain::Laplace | Domain::Const) {
        return Err(Error::UnsupportedOperation {
            op,
            detail: format!(
                "{} superposition {} {}-domain response",
                quantity.label(),
                if op == "multiply" { "*" } else { "/" },
                response.domain().name()
            ),
        });
    }
    let h = response.expr().clone();
    match (quantity, response.quantity()) {
        (Quantity::Voltage, Quantity::Admittance) => Ok((h, Quantity::Current)),
        (Quantity::Voltage, Quantity::Impedance) => Ok((Expr::recip(h), Quantity::Current)),
        (Quantity::Current, Quantity::Impedance) => Ok((h, Quantity::Voltage)),
        (Quantity::Current, Quantity::Admittance) => Ok((Expr::recip(h), Quantity::Voltage)),
        (q, Quantity::TransferFunction) => Ok((h, q)),
        (a, b) => Err(Error::UnsupportedOperation {
            op,
            detail: format!("{} superposition * {} response", a.label(), b.label()),
        }),
    }
}
