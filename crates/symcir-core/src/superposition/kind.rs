//! Signal-kind tags for superposition components.

use std::fmt;

use symcir_expr::Expr;

use crate::domain::Domain;

/// The kind of one independent component of a decomposed signal.
///
/// Kinds compare by value: two AC tags at the same angular frequency are the
/// same component regardless of how they were produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Constant (DC) component.
    Dc,
    /// Single-frequency sinusoid, keyed by its angular frequency.
    Ac(Expr),
    /// Transient expressed in the Laplace domain.
    STransient,
    /// Transient still expressed in the time domain (undecomposed).
    TTransient,
    /// Independent noise source, keyed by its identifier.
    Noise(String),
}

impl Kind {
    pub fn is_ac(&self) -> bool {
        matches!(self, Kind::Ac(_))
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, Kind::Noise(_))
    }

    /// The domain a payload of this kind lives in.
    pub fn domain(&self) -> Domain {
        match self {
            Kind::Dc => Domain::Const,
            Kind::Ac(omega) => Domain::Phasor {
                omega: omega.clone(),
            },
            Kind::STransient => Domain::Laplace,
            Kind::TTransient => Domain::Time,
            Kind::Noise(nid) => Domain::Noise { nid: nid.clone() },
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Dc => write!(f, "dc"),
            Kind::Ac(omega) => write!(f, "ac({omega})"),
            Kind::STransient => write!(f, "s"),
            Kind::TTransient => write!(f, "t"),
            Kind::Noise(nid) => write!(f, "n({nid})"),
        }
    }
}
