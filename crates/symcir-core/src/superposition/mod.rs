//! Superposition of independent signal components.
//!
//! A linear circuit's response splits into components that superpose without
//! interacting: a constant, one phasor per angular frequency, a transient
//! (kept in the s or t domain), and one spectral density per independent
//! noise source. [`Superposition`] stores one payload per [`Kind`], merges
//! same-kind additions symbolically, and lazily decomposes a raw time-domain
//! entry into dc + phasors + Laplace remainder, invalidating the cached
//! decomposition on every mutation.

mod kind;
mod transfer;

pub use kind::Kind;
pub use transfer::MulOperand;

use std::fmt;

use indexmap::IndexMap;
use num_complex::Complex64;
use once_cell::unsync::OnceCell;

use symcir_expr::{Expr, SymbolTable, canonical_name, equivalent, expand, simplify};

use crate::domain::{Domain, DomainExpr, Inference, Quantity};
use crate::error::{Error, Result};
use crate::registry::{self, OMEGA, TIME};

/// A value accepted by [`Superposition::add`].
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Text(String),
    Raw(Expr),
    Wrapped(DomainExpr),
    Super(Superposition),
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Value::Text(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Value::Text(src)
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Value::Raw(expr)
    }
}

impl From<DomainExpr> for Value {
    fn from(part: DomainExpr) -> Self {
        Value::Wrapped(part)
    }
}

impl From<Superposition> for Value {
    fn from(sup: Superposition) -> Self {
        Value::Super(sup)
    }
}

/// Additive decomposition of a signal, keyed by component kind.
#[derive(Debug, Clone)]
pub struct Superposition {
    quantity: Quantity,
    parts: IndexMap<Kind, DomainExpr>,
    symbols: SymbolTable,
    decomposition: OnceCell<Box<Superposition>>,
}

impl Superposition {
    /// An empty superposition of the given quantity, behaving as zero.
    pub fn new(quantity: Quantity) -> Self {
        Self::with_symbols(quantity, SymbolTable::new())
    }

    /// An empty superposition sharing an existing symbol table, so parses
    /// across related containers resolve to the same symbols.
    pub fn with_symbols(quantity: Quantity, symbols: SymbolTable) -> Self {
        Self {
            quantity,
            parts: IndexMap::new(),
            symbols,
            decomposition: OnceCell::new(),
        }
    }

    pub fn voltage() -> Self {
        Self::new(Quantity::Voltage)
    }

    pub fn current() -> Self {
        Self::new(Quantity::Current)
    }

    /// Build a superposition of a quantity from an initial value.
    pub fn of(quantity: Quantity, value: impl Into<Value>) -> Result<Self> {
        let mut sup = Self::new(quantity);
        sup.add(value)?;
        Ok(sup)
    }

    pub fn voltage_of(value: impl Into<Value>) -> Result<Self> {
        Self::of(Quantity::Voltage, value)
    }

    pub fn current_of(value: impl Into<Value>) -> Result<Self> {
        Self::of(Quantity::Current, value)
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The stored components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = (&Kind, &DomainExpr)> {
        self.parts.iter()
    }

    pub fn kinds(&self) -> Vec<Kind> {
        self.parts.keys().cloned().collect()
    }

    pub fn get(&self, kind: &Kind) -> Option<&DomainExpr> {
        self.parts.get(kind)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// True if every stored component is exactly zero (vacuously true when
    /// empty).
    pub fn is_zero(&self) -> bool {
        self.parts.values().all(|p| p.is_zero())
    }

    // ------------------------------------------------------------------
    // Mutation

    /// The single mutation entry point: classify a value by kind and merge
    /// it in, accumulating symbolically when the kind already exists.
    ///
    /// Exact zeros are ignored. Any actual merge invalidates the cached
    /// decomposition.
    pub fn add(&mut self, value: impl Into<Value>) -> Result<()> {
        self.add_value(value.into())
    }

    fn add_value(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Super(other) => {
                for (_, part) in other.parts {
                    self.add_value(Value::Wrapped(part))?;
                }
                Ok(())
            }
            Value::Number(x) => {
                if x == 0.0 {
                    return Ok(());
                }
                let part = DomainExpr::constant(Expr::from(x), self.quantity)?;
                self.add_value(Value::Wrapped(part))
            }
            Value::Text(src) => {
                let names = registry::find_free_symbols(&src)?;
                let domain = classify_domain(&names);
                let expr = registry::parse(&src, &mut self.symbols)?;
                if expr.is_zero() {
                    return Ok(());
                }
                let part = DomainExpr::new(expr, domain, self.quantity)?;
                self.add_value(Value::Wrapped(part))
            }
            Value::Raw(expr) => {
                if expr.is_zero() {
                    return Ok(());
                }
                let domain = classify_domain(&expr.free_symbols());
                let part = DomainExpr::new(expr, domain, self.quantity)?;
                self.add_value(Value::Wrapped(part))
            }
            Value::Wrapped(part) => {
                if part.is_zero() {
                    return Ok(());
                }
                let part = part.with_quantity(self.quantity);
                let (kind, part) = classify_wrapped(part)?;
                self.merge(kind, part)
            }
        }
    }

    fn merge(&mut self, kind: Kind, part: DomainExpr) -> Result<()> {
        self.decomposition = OnceCell::new();
        let merged = match self.parts.get(&kind) {
            Some(existing) => existing.merge_add(&part)?,
            None => {
                self.parts.insert(kind, part);
                return Ok(());
            }
        };
        if simplify(merged.expr()).is_zero() {
            self.parts.shift_remove(&kind);
        } else {
            self.parts.insert(kind, merged);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Decomposition

    /// Split any raw time-domain entry into dc + phasors + a Laplace-domain
    /// remainder, leaving every other kind untouched.
    ///
    /// Idempotent and cached: when no `t` entry exists the superposition is
    /// already its own decomposition, and a computed decomposition is reused
    /// until the next mutation.
    pub fn decompose(&self) -> Result<&Superposition> {
        if !self.parts.contains_key(&Kind::TTransient) {
            return Ok(self);
        }
        let boxed = self.decomposition.get_or_try_init(|| {
            let mut out = Superposition::with_symbols(self.quantity, self.symbols.clone());
            for (kind, part) in &self.parts {
                if *kind == Kind::TTransient {
                    out.decompose_time_entry(part)?;
                } else {
                    out.merge(kind.clone(), part.clone())?;
                }
            }
            log::debug!(
                "decomposed {} entries into kinds [{}]",
                self.parts.len(),
                out.parts
                    .keys()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            Ok::<_, Error>(Box::new(out))
        })?;
        Ok(boxed)
    }

    fn decompose_time_entry(&mut self, part: &DomainExpr) -> Result<()> {
        let expanded = expand(part.expr());
        let mut dc = Vec::new();
        let mut transient = Vec::new();

        for term in expanded.terms() {
            if !term.depends_on(&TIME) {
                dc.push(term);
            } else if symcir_expr::acdc::is_ac(&term, &TIME) {
                let phasor =
                    DomainExpr::new(term, Domain::Time, self.quantity)?.to_phasor()?;
                self.add_value(Value::Wrapped(phasor))?;
            } else {
                transient.push(term);
            }
        }

        let dc = Expr::sum(dc);
        if !dc.is_zero() {
            let part = DomainExpr::constant(dc, self.quantity)?;
            self.add_value(Value::Wrapped(part))?;
        }

        let remainder = Expr::sum(transient);
        if !remainder.is_zero() {
            let laplace = DomainExpr::new(remainder, Domain::Time, self.quantity)?.laplace()?;
            self.add_value(Value::Wrapped(laplace))?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection

    /// The component of a kind, or a zero placeholder in that kind's domain.
    ///
    /// Non-noise lookups see the decomposed view whenever a raw `t` entry is
    /// present and a different kind is requested; noise components are
    /// unaffected by decomposition and are looked up directly.
    pub fn select(&self, kind: &Kind) -> Result<DomainExpr> {
        let view = if !kind.is_noise()
            && *kind != Kind::TTransient
            && self.parts.contains_key(&Kind::TTransient)
        {
            self.decompose()?
        } else {
            self
        };
        Ok(view
            .parts
            .get(kind)
            .cloned()
            .unwrap_or_else(|| DomainExpr::zero(kind.domain(), self.quantity)))
    }

    /// The dc component.
    pub fn dc(&self) -> Result<DomainExpr> {
        self.select(&Kind::Dc)
    }

    /// The Laplace-domain transient component.
    pub fn s(&self) -> Result<DomainExpr> {
        self.select(&Kind::STransient)
    }

    /// The phasor at the symbolic angular frequency `omega`.
    pub fn w(&self) -> Result<DomainExpr> {
        self.select(&Kind::Ac(Expr::symbol(OMEGA.clone())))
    }

    /// All phasor components keyed by angular frequency.
    pub fn ac(&self) -> Result<IndexMap<Expr, DomainExpr>> {
        let view = self.decompose()?;
        let mut out = IndexMap::new();
        for (kind, part) in &view.parts {
            if let Kind::Ac(omega) = kind {
                out.insert(omega.clone(), part.clone());
            }
        }
        Ok(out)
    }

    /// The angular frequencies of all phasor components.
    pub fn ac_keys(&self) -> Result<Vec<Expr>> {
        Ok(self.ac()?.keys().cloned().collect())
    }

    /// The identifiers of all stored noise components.
    pub fn noise_keys(&self) -> Vec<String> {
        self.parts
            .keys()
            .filter_map(|k| match k {
                Kind::Noise(nid) => Some(nid.clone()),
                _ => None,
            })
            .collect()
    }

    /// Total noise density: the quadrature sum over all independent noise
    /// components, `sqrt(a^2 + b^2 + ...)`.
    pub fn n(&self) -> Result<DomainExpr> {
        let squares: Vec<Expr> = self
            .parts
            .iter()
            .filter(|(k, _)| k.is_noise())
            .map(|(_, p)| Expr::pow(p.expr().clone(), Expr::from(2.0)))
            .collect();
        let total = if squares.is_empty() {
            Expr::zero()
        } else {
            Expr::sqrt(Expr::sum(squares))
        };
        DomainExpr::new(
            total,
            Domain::Noise {
                nid: "total".to_string(),
            },
            self.quantity,
        )
    }

    // ------------------------------------------------------------------
    // Aggregation

    /// The full time-domain signal: the sum of every component's time image,
    /// skipping noise (which has no deterministic realization).
    pub fn time(&self) -> Result<DomainExpr> {
        let mut terms = Vec::new();
        for (kind, part) in &self.parts {
            if !kind.is_noise() {
                terms.push(part.time()?.expr().clone());
            }
        }
        DomainExpr::new(simplify(&Expr::sum(terms)), Domain::Time, self.quantity)
    }

    /// The full Laplace-domain signal, summed componentwise.
    pub fn laplace(&self) -> Result<DomainExpr> {
        let mut terms = Vec::new();
        let mut inference: Option<Inference> = None;
        for (kind, part) in &self.parts {
            if !kind.is_noise() {
                let image = part.laplace()?;
                // A flag holds for the sum only if every component has it.
                inference = Some(match inference {
                    Some(acc) => acc.meet(image.inference()),
                    None => image.inference(),
                });
                terms.push(image.expr().clone());
            }
        }
        Ok(DomainExpr::new(
            simplify(&Expr::sum(terms)),
            Domain::Laplace,
            self.quantity,
        )?
        .with_inference(inference.unwrap_or_default()))
    }

    /// The full Fourier-domain signal, via the time aggregate.
    pub fn fourier(&self) -> Result<DomainExpr> {
        self.time()?.fourier()
    }

    /// Evaluate the time aggregate over a sample vector.
    pub fn transient_response(&self, samples: &[f64]) -> Result<Vec<Complex64>> {
        self.time()?.evaluate(samples)
    }

    /// Evaluate the Fourier aggregate over a frequency sample vector.
    pub fn frequency_response(&self, samples: &[f64]) -> Result<Vec<Complex64>> {
        self.fourier()?.evaluate(samples)
    }

    // ------------------------------------------------------------------
    // Arithmetic

    /// Kind-wise sum with another value, returning a new superposition.
    ///
    /// A Laplace-domain operand forces decomposition first so the new
    /// transient does not coexist with a raw `t` entry.
    pub fn plus(&self, value: impl Into<Value>) -> Result<Superposition> {
        let value = value.into();
        let mut out = if value_carries_laplace(&value) {
            self.decompose()?.clone()
        } else {
            self.clone()
        };
        out.add_value(value)?;
        Ok(out)
    }

    /// Kind-wise difference with another value.
    pub fn minus(&self, value: impl Into<Value>) -> Result<Superposition> {
        let mut other = Superposition::with_symbols(self.quantity, self.symbols.clone());
        other.add_value(value.into())?;
        self.plus(other.negate())
    }

    /// Negate every stored component.
    pub fn negate(&self) -> Superposition {
        let mut out = Superposition::with_symbols(self.quantity, self.symbols.clone());
        for (kind, part) in &self.parts {
            out.parts.insert(kind.clone(), part.negate());
        }
        out
    }

    /// Multiply every component by a factor free of all domain variables.
    pub fn scale(&self, factor: &Expr) -> Result<Superposition> {
        let mut out = Superposition::with_symbols(self.quantity, self.symbols.clone());
        for (kind, part) in &self.parts {
            out.parts.insert(kind.clone(), part.scale(factor)?);
        }
        Ok(out)
    }

    /// Simplify every component's payload.
    pub fn simplified(&self) -> Superposition {
        let mut out = Superposition::with_symbols(self.quantity, self.symbols.clone());
        for (kind, part) in &self.parts {
            out.parts.insert(kind.clone(), part.simplified());
        }
        out
    }

    /// Rewrite every component's payload in expanded canonical form.
    pub fn canonical(&self) -> Superposition {
        let mut out = Superposition::with_symbols(self.quantity, self.symbols.clone());
        for (kind, part) in &self.parts {
            out.parts.insert(kind.clone(), part.canonical());
        }
        out
    }

    /// Value equality: compare decomposed forms as sets of (kind, payload)
    /// pairs, with payloads compared up to simplification.
    pub fn equals(&self, other: &Superposition) -> Result<bool> {
        if self.quantity != other.quantity {
            return Ok(false);
        }
        let a = self.decompose()?;
        let b = other.decompose()?;
        if a.parts.len() != b.parts.len() {
            return Ok(false);
        }
        for (kind, pa) in &a.parts {
            match b.parts.get(kind) {
                Some(pb) if equivalent(pa.expr(), pb.expr()) => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Predicates

    /// True if a subexpression occurs in any stored component.
    pub fn has(&self, subexpr: &Expr) -> bool {
        self.parts.values().any(|p| p.expr().contains(subexpr))
    }

    /// True if any stored component references the named symbol.
    pub fn has_symbol(&self, name: &str) -> bool {
        let name = canonical_name(name);
        self.parts
            .values()
            .any(|p| p.expr().free_symbols().iter().any(|n| *n == name))
    }

    pub fn has_dc(&self) -> Result<bool> {
        Ok(self.is_zero() || self.decompose()?.parts.contains_key(&Kind::Dc))
    }

    pub fn has_ac(&self) -> Result<bool> {
        Ok(self.decompose()?.parts.keys().any(Kind::is_ac))
    }

    pub fn has_transient(&self) -> Result<bool> {
        Ok(self.decompose()?.parts.contains_key(&Kind::STransient))
    }

    pub fn has_noise(&self) -> bool {
        self.parts.keys().any(Kind::is_noise)
    }

    /// True if the signal is a pure constant (a zero counts).
    pub fn is_dc(&self) -> Result<bool> {
        if self.is_zero() {
            return Ok(true);
        }
        let view = self.decompose()?;
        Ok(view.parts.len() == 1 && view.parts.contains_key(&Kind::Dc))
    }

    /// True if the signal is purely sinusoidal.
    pub fn is_ac(&self) -> Result<bool> {
        let view = self.decompose()?;
        Ok(!view.parts.is_empty() && view.parts.keys().all(Kind::is_ac))
    }

    /// True if the signal is a pure transient.
    pub fn is_transient(&self) -> Result<bool> {
        let view = self.decompose()?;
        Ok(view.parts.len() == 1 && view.parts.contains_key(&Kind::STransient))
    }

    /// True if the signal is a pure transient that vanishes for negative
    /// time.
    pub fn is_causal(&self) -> Result<bool> {
        if !self.is_transient()? {
            return Ok(false);
        }
        Ok(self.s()?.inference().causal)
    }

    pub fn is_noise_only(&self) -> bool {
        !self.parts.is_empty() && self.parts.keys().all(Kind::is_noise)
    }

    /// True if the decomposed signal holds more than one component.
    pub fn is_superposition(&self) -> Result<bool> {
        Ok(self.decompose()?.parts.len() > 1)
    }
}

impl fmt::Display for Superposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parts.is_empty() {
            return write!(f, "0");
        }
        for (i, (kind, part)) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{kind}: {part}")?;
        }
        Ok(())
    }
}

/// Classify free-symbol names into the domain of a raw value.
fn classify_domain(names: &[String]) -> Domain {
    let has = |name: &str| names.iter().any(|n| n == name);
    if has("s") {
        Domain::Laplace
    } else if has("omega") && has("t") {
        Domain::Time
    } else if has("omega") {
        Domain::AngularFourier
    } else if has("f") {
        Domain::Fourier
    } else {
        Domain::Time
    }
}

/// Map a wrapped value to its storage kind, coercing angular-frequency
/// payloads into phasors at the symbolic frequency.
fn classify_wrapped(part: DomainExpr) -> Result<(Kind, DomainExpr)> {
    match part.domain().clone() {
        Domain::Const => Ok((Kind::Dc, part)),
        Domain::Phasor { omega } => Ok((Kind::Ac(omega), part)),
        Domain::Laplace => Ok((Kind::STransient, part)),
        Domain::Time => Ok((Kind::TTransient, part)),
        Domain::Noise { nid } => Ok((Kind::Noise(nid), part)),
        Domain::AngularFourier => {
            let omega = Expr::symbol(OMEGA.clone());
            let coerced = DomainExpr::new(
                part.expr().clone(),
                Domain::Phasor {
                    omega: omega.clone(),
                },
                part.quantity(),
            )?;
            Ok((Kind::Ac(omega), coerced))
        }
        Domain::Fourier => Err(Error::Unclassifiable {
            what: "fourier-domain value",
            value: part.expr().to_string(),
        }),
    }
}

fn value_carries_laplace(value: &Value) -> bool {
    match value {
        Value::Wrapped(part) => matches!(part.domain(), Domain::Laplace),
        Value::Super(sup) => sup.parts.contains_key(&Kind::STransient),
        _ => false,
    }
}
