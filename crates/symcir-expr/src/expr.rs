//! Immutable symbolic expression tree with canonicalizing constructors.
//!
//! Expressions are kept in a canonical form at all times: sums and products
//! are flattened and sorted, numeric factors are folded, like terms and like
//! factors are collected, and integer powers of the imaginary unit are
//! reduced. Structural equality on canonical forms is therefore a usable
//! first-line equality test.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::symbol::Symbol;

/// Built-in function heads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Func {
    Sin,
    Cos,
    Exp,
    Log,
    Abs,
    Atan2,
    /// Unit step (zero for negative argument).
    Heaviside,
    DiracDelta,
    /// An undefined function auto-created while parsing, e.g. `v(t)`.
    User(String),
}

impl Func {
    /// Printable name of the function head.
    pub fn name(&self) -> &str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Abs => "abs",
            Func::Atan2 => "atan2",
            Func::Heaviside => "Heaviside",
            Func::DiracDelta => "DiracDelta",
            Func::User(name) => name,
        }
    }
}

/// A symbolic expression in canonical form.
///
/// Numeric atoms are finite `f64` values; NaN and infinities are rejected at
/// construction so `Eq` and `Hash` are well defined.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric constant.
    Num(f64),
    /// The imaginary unit.
    I,
    /// A named symbol.
    Sym(Symbol),
    /// Flattened n-ary sum with at least two terms.
    Add(Vec<Expr>),
    /// Flattened n-ary product with at least two factors.
    Mul(Vec<Expr>),
    /// Power with arbitrary base and exponent.
    Pow(Box<Expr>, Box<Expr>),
    /// Function application.
    Func(Func, Vec<Expr>),
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Expr::Num(n) => {
                0u8.hash(state);
                n.to_bits().hash(state);
            }
            Expr::I => 1u8.hash(state),
            Expr::Sym(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            Expr::Add(terms) => {
                3u8.hash(state);
                terms.hash(state);
            }
            Expr::Mul(factors) => {
                4u8.hash(state);
                factors.hash(state);
            }
            Expr::Pow(b, e) => {
                5u8.hash(state);
                b.hash(state);
                e.hash(state);
            }
            Expr::Func(f, args) => {
                6u8.hash(state);
                f.hash(state);
                args.hash(state);
            }
        }
    }
}

const NUM_EPS: f64 = 1e-12;

fn num(value: f64) -> Expr {
    debug_assert!(value.is_finite());
    // Snap near-integers produced by float arithmetic back to exact values.
    let rounded = value.round();
    if value != rounded && (value - rounded).abs() < NUM_EPS * rounded.abs().max(1.0) {
        Expr::Num(rounded)
    } else {
        Expr::Num(value)
    }
}

impl Expr {
    /// Numeric constant.
    pub fn number(value: f64) -> Expr {
        num(value)
    }

    /// The imaginary unit.
    pub fn imaginary_unit() -> Expr {
        Expr::I
    }

    /// Zero.
    pub fn zero() -> Expr {
        Expr::Num(0.0)
    }

    /// One.
    pub fn one() -> Expr {
        Expr::Num(1.0)
    }

    /// A symbol atom.
    pub fn symbol(sym: Symbol) -> Expr {
        Expr::Sym(sym)
    }

    /// True if this is exactly the numeric zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(n) if *n == 0.0)
    }

    /// True if this is exactly the numeric one.
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Num(n) if *n == 1.0)
    }

    /// The numeric value, if this is a numeric atom.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Expr::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// The numeric value of an integer atom, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Num(n) if n.fract() == 0.0 && n.abs() < 9e15 => Some(*n as i64),
            _ => None,
        }
    }

    /// Canonicalizing sum of terms.
    pub fn sum(terms: Vec<Expr>) -> Expr {
        let mut constant = 0.0;
        // (non-numeric part, accumulated numeric coefficient)
        let mut collected: Vec<(Expr, f64)> = Vec::new();

        let mut stack = terms;
        stack.reverse();
        while let Some(term) = stack.pop() {
            match term {
                Expr::Num(n) => constant += n,
                Expr::Add(inner) => {
                    for t in inner.into_iter().rev() {
                        stack.push(t);
                    }
                }
                other => {
                    let (coeff, rest) = other.coeff_split();
                    if let Some(entry) = collected.iter_mut().find(|(e, _)| *e == rest) {
                        entry.1 += coeff;
                    } else {
                        collected.push((rest, coeff));
                    }
                }
            }
        }

        let mut out: Vec<Expr> = Vec::new();
        for (rest, coeff) in collected {
            if coeff == 0.0 {
                continue;
            }
            if coeff == 1.0 {
                out.push(rest);
            } else {
                out.push(Expr::product(vec![num(coeff), rest]));
            }
        }
        if constant != 0.0 {
            out.push(num(constant));
        }

        out.sort_by(cmp_expr);
        match out.len() {
            0 => Expr::zero(),
            1 => out.into_iter().next().unwrap(),
            _ => Expr::Add(out),
        }
    }

    /// Canonicalizing product of factors.
    pub fn product(factors: Vec<Expr>) -> Expr {
        let mut constant = 1.0;
        let mut i_power: i64 = 0;
        // (base, numeric exponent) for collectible factors
        let mut powers: Vec<(Expr, f64)> = Vec::new();
        // factors with symbolic exponents pass through uncollected
        let mut opaque: Vec<Expr> = Vec::new();

        let mut stack = factors;
        stack.reverse();
        while let Some(factor) = stack.pop() {
            match factor {
                Expr::Num(n) => constant *= n,
                Expr::I => i_power += 1,
                Expr::Mul(inner) => {
                    for f in inner.into_iter().rev() {
                        stack.push(f);
                    }
                }
                Expr::Pow(base, exp) => match (*base, *exp) {
                    (Expr::I, e) => {
                        if let Some(k) = e.as_int() {
                            i_power += k;
                        } else {
                            opaque.push(Expr::Pow(Box::new(Expr::I), Box::new(e)));
                        }
                    }
                    (b, Expr::Num(e)) => merge_power(&mut powers, b, e),
                    (b, e) => opaque.push(Expr::Pow(Box::new(b), Box::new(e))),
                },
                other => merge_power(&mut powers, other, 1.0),
            }
        }

        if constant == 0.0 {
            return Expr::zero();
        }

        // i^k cycles with period four
        match i_power.rem_euclid(4) {
            0 => {}
            1 => opaque.push(Expr::I),
            2 => constant = -constant,
            3 => {
                constant = -constant;
                opaque.push(Expr::I);
            }
            _ => unreachable!(),
        }

        // Merge exponential factors: exp(a)^m * exp(b)^n -> exp(m*a + n*b).
        let mut exp_args: Vec<Expr> = Vec::new();
        powers.retain(|(base, exp)| {
            if let Expr::Func(Func::Exp, args) = base {
                exp_args.push(Expr::product(vec![num(*exp), args[0].clone()]));
                false
            } else {
                true
            }
        });

        let mut out: Vec<Expr> = Vec::new();
        if !exp_args.is_empty() {
            let merged = Expr::exp(Expr::sum(exp_args));
            match merged {
                Expr::Num(n) => constant *= n,
                f => out.push(f),
            }
        }
        for (base, exp) in powers {
            if exp == 0.0 {
                continue;
            }
            let factor = Expr::pow(base, num(exp));
            match factor {
                Expr::Num(n) => constant *= n,
                f => out.push(f),
            }
        }
        out.extend(opaque);

        if constant == 0.0 {
            return Expr::zero();
        }

        out.sort_by(cmp_expr);
        if constant != 1.0 {
            out.insert(0, num(constant));
        }
        match out.len() {
            0 => Expr::one(),
            1 => out.into_iter().next().unwrap(),
            _ => Expr::Mul(out),
        }
    }

    /// Canonicalizing power.
    pub fn pow(base: Expr, exp: Expr) -> Expr {
        if exp.is_zero() {
            return Expr::one();
        }
        if exp.is_one() {
            return base;
        }
        if base.is_zero() {
            // 0^e folds only for positive exponents; 0^-n stays symbolic.
            match exp.as_num() {
                Some(e) if e > 0.0 => return Expr::zero(),
                Some(_) => {}
                None => return Expr::zero(),
            }
        }
        if base.is_one() {
            return Expr::one();
        }

        if let (Some(b), Some(e)) = (base.as_num(), exp.as_num()) {
            // Fold only when the result is exact enough to trust.
            if e.fract() == 0.0 || b >= 0.0 {
                let v = b.powf(e);
                if v.is_finite() {
                    return num(v);
                }
            }
        }

        if let Expr::I = base {
            if let Some(k) = exp.as_int() {
                return match k.rem_euclid(4) {
                    0 => Expr::one(),
                    1 => Expr::I,
                    2 => num(-1.0),
                    3 => Expr::product(vec![num(-1.0), Expr::I]),
                    _ => unreachable!(),
                };
            }
        }

        // (x^a)^b folds when the combined exponent is safe: either a*b is an
        // integer reached through integer a, or the base is known positive.
        if let Expr::Pow(inner_base, inner_exp) = &base {
            if let (Some(a), Some(b)) = (inner_exp.as_num(), exp.as_num()) {
                let both_integer = a.fract() == 0.0 && b.fract() == 0.0;
                if both_integer || base_is_nonnegative(inner_base) {
                    return Expr::pow((**inner_base).clone(), num(a * b));
                }
            }
        }

        // Distribute integer powers over products.
        if let Expr::Mul(factors) = &base {
            if exp.as_int().is_some() {
                let parts = factors
                    .iter()
                    .map(|f| Expr::pow(f.clone(), exp.clone()))
                    .collect();
                return Expr::product(parts);
            }
        }

        Expr::Pow(Box::new(base), Box::new(exp))
    }

    /// Square root as a half power.
    pub fn sqrt(arg: Expr) -> Expr {
        Expr::pow(arg, num(0.5))
    }

    /// Reciprocal.
    pub fn recip(arg: Expr) -> Expr {
        Expr::pow(arg, num(-1.0))
    }

    /// Canonicalizing function application.
    pub fn func(head: Func, args: Vec<Expr>) -> Expr {
        if args.len() == 1 {
            if let Some(x) = args[0].as_num() {
                if let Some(folded) = fold_numeric(&head, x) {
                    return folded;
                }
            }
            if matches!(head, Func::Abs) && base_is_nonnegative(&args[0]) {
                return args.into_iter().next().unwrap();
            }
        }
        Expr::Func(head, args)
    }

    /// sin(x).
    pub fn sin(arg: Expr) -> Expr {
        Expr::func(Func::Sin, vec![arg])
    }

    /// cos(x).
    pub fn cos(arg: Expr) -> Expr {
        Expr::func(Func::Cos, vec![arg])
    }

    /// exp(x).
    pub fn exp(arg: Expr) -> Expr {
        Expr::func(Func::Exp, vec![arg])
    }

    /// abs(x).
    pub fn abs(arg: Expr) -> Expr {
        Expr::func(Func::Abs, vec![arg])
    }

    /// atan2(y, x).
    pub fn atan2(y: Expr, x: Expr) -> Expr {
        Expr::func(Func::Atan2, vec![y, x])
    }

    /// Unit step u(x).
    pub fn heaviside(arg: Expr) -> Expr {
        Expr::func(Func::Heaviside, vec![arg])
    }

    /// Dirac delta.
    pub fn dirac_delta(arg: Expr) -> Expr {
        Expr::func(Func::DiracDelta, vec![arg])
    }

    /// Split a term into its numeric coefficient and the remaining factor.
    ///
    /// `3*cos(t)` gives `(3.0, cos(t))`; a bare numeric gives `(n, 1)`.
    pub fn coeff_split(&self) -> (f64, Expr) {
        match self {
            Expr::Num(n) => (*n, Expr::one()),
            Expr::Mul(factors) => {
                if let Some(Expr::Num(n)) = factors.first() {
                    let rest: Vec<Expr> = factors[1..].to_vec();
                    (*n, Expr::product(rest))
                } else {
                    (1.0, self.clone())
                }
            }
            _ => (1.0, self.clone()),
        }
    }

    /// The additive terms of this expression (a single term for non-sums).
    pub fn terms(&self) -> Vec<Expr> {
        match self {
            Expr::Add(terms) => terms.clone(),
            other => vec![other.clone()],
        }
    }

    /// The multiplicative factors of this expression (a single factor for
    /// non-products).
    pub fn factors(&self) -> Vec<Expr> {
        match self {
            Expr::Mul(factors) => factors.clone(),
            other => vec![other.clone()],
        }
    }

    /// True if the expression references the given symbol.
    pub fn depends_on(&self, sym: &Symbol) -> bool {
        match self {
            Expr::Num(_) | Expr::I => false,
            Expr::Sym(s) => s == sym,
            Expr::Add(parts) | Expr::Mul(parts) | Expr::Func(_, parts) => {
                parts.iter().any(|p| p.depends_on(sym))
            }
            Expr::Pow(b, e) => b.depends_on(sym) || e.depends_on(sym),
        }
    }

    /// True if `other` occurs anywhere in this expression tree.
    pub fn contains(&self, other: &Expr) -> bool {
        if self == other {
            return true;
        }
        match self {
            Expr::Num(_) | Expr::I | Expr::Sym(_) => false,
            Expr::Add(parts) | Expr::Mul(parts) | Expr::Func(_, parts) => {
                parts.iter().any(|p| p.contains(other))
            }
            Expr::Pow(b, e) => b.contains(other) || e.contains(other),
        }
    }

    /// Names of all symbols referenced, sorted.
    pub fn free_symbols(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        self.collect_symbols(&mut names);
        names.into_iter().collect()
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) | Expr::I => {}
            Expr::Sym(s) => {
                out.insert(s.name().to_string());
            }
            Expr::Add(parts) | Expr::Mul(parts) => {
                for p in parts {
                    p.collect_symbols(out);
                }
            }
            Expr::Func(head, parts) => {
                if let Func::User(name) = head {
                    out.insert(name.clone());
                }
                for p in parts {
                    p.collect_symbols(out);
                }
            }
            Expr::Pow(b, e) => {
                b.collect_symbols(out);
                e.collect_symbols(out);
            }
        }
    }

    /// Substitute every occurrence of a symbol with a replacement expression,
    /// re-canonicalizing on the way back up.
    pub fn subs(&self, sym: &Symbol, replacement: &Expr) -> Expr {
        match self {
            Expr::Num(_) | Expr::I => self.clone(),
            Expr::Sym(s) => {
                if s == sym {
                    replacement.clone()
                } else {
                    self.clone()
                }
            }
            Expr::Add(parts) => {
                Expr::sum(parts.iter().map(|p| p.subs(sym, replacement)).collect())
            }
            Expr::Mul(parts) => {
                Expr::product(parts.iter().map(|p| p.subs(sym, replacement)).collect())
            }
            Expr::Pow(b, e) => Expr::pow(b.subs(sym, replacement), e.subs(sym, replacement)),
            Expr::Func(head, parts) => Expr::func(
                head.clone(),
                parts.iter().map(|p| p.subs(sym, replacement)).collect(),
            ),
        }
    }
}

fn merge_power(powers: &mut Vec<(Expr, f64)>, base: Expr, exp: f64) {
    if let Some(entry) = powers.iter_mut().find(|(b, _)| *b == base) {
        entry.1 += exp;
    } else {
        powers.push((base, exp));
    }
}

/// True when a base is structurally known to be non-negative.
fn base_is_nonnegative(expr: &Expr) -> bool {
    match expr {
        Expr::Num(n) => *n >= 0.0,
        Expr::Sym(s) => s.assumptions().positive,
        Expr::Func(Func::Abs | Func::Exp, _) => true,
        Expr::Pow(b, e) => matches!(e.as_int(), Some(k) if k % 2 == 0) || base_is_nonnegative(b),
        _ => false,
    }
}

/// Fold functions at exact numeric arguments.
///
/// Trig functions fold only at multiples of pi/2 so symbolic exactness is
/// preserved elsewhere (cos(3) stays cos(3)).
fn fold_numeric(head: &Func, x: f64) -> Option<Expr> {
    match head {
        Func::Sin | Func::Cos => {
            let quadrants = x / std::f64::consts::FRAC_PI_2;
            let k = quadrants.round();
            if (quadrants - k).abs() > 1e-9 {
                return None;
            }
            let k = k as i64;
            let value = match (head, k.rem_euclid(4)) {
                (Func::Sin, 0) => 0.0,
                (Func::Sin, 1) => 1.0,
                (Func::Sin, 2) => 0.0,
                (Func::Sin, 3) => -1.0,
                (Func::Cos, 0) => 1.0,
                (Func::Cos, 1) => 0.0,
                (Func::Cos, 2) => -1.0,
                (Func::Cos, 3) => 0.0,
                _ => unreachable!(),
            };
            Some(num(value))
        }
        Func::Exp if x == 0.0 => Some(Expr::one()),
        Func::Log if x == 1.0 => Some(Expr::zero()),
        Func::Abs => Some(num(x.abs())),
        Func::Heaviside if x > 0.0 => Some(Expr::one()),
        Func::Heaviside if x < 0.0 => Some(Expr::zero()),
        Func::DiracDelta if x != 0.0 => Some(Expr::zero()),
        _ => None,
    }
}

fn rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Num(_) => 0,
        Expr::I => 1,
        Expr::Sym(_) => 2,
        Expr::Pow(_, _) => 3,
        Expr::Func(_, _) => 4,
        Expr::Mul(_) => 5,
        Expr::Add(_) => 6,
    }
}

/// Deterministic total order used for canonical sorting.
pub fn cmp_expr(a: &Expr, b: &Expr) -> Ordering {
    match (a, b) {
        (Expr::Num(x), Expr::Num(y)) => x.total_cmp(y),
        (Expr::Sym(x), Expr::Sym(y)) => x.name().cmp(y.name()),
        (Expr::Pow(xb, xe), Expr::Pow(yb, ye)) => {
            cmp_expr(xb, yb).then_with(|| cmp_expr(xe, ye))
        }
        (Expr::Func(xf, xa), Expr::Func(yf, ya)) => xf
            .name()
            .cmp(yf.name())
            .then_with(|| cmp_expr_slices(xa, ya)),
        (Expr::Add(xs), Expr::Add(ys)) | (Expr::Mul(xs), Expr::Mul(ys)) => {
            cmp_expr_slices(xs, ys)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn cmp_expr_slices(xs: &[Expr], ys: &[Expr]) -> Ordering {
    for (x, y) in xs.iter().zip(ys.iter()) {
        let ord = cmp_expr(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    xs.len().cmp(&ys.len())
}

impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::sum(vec![self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum(vec![self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::product(vec![self, rhs])
    }
}

impl Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::product(vec![self, Expr::recip(rhs)])
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::product(vec![Expr::Num(-1.0), self])
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        num(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        num(value as f64)
    }
}

fn fmt_num(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

/// Precedence levels for infix display.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Add(_) => 1,
        Expr::Mul(_) => 2,
        Expr::Pow(_, _) => 3,
        _ => 4,
    }
}

fn fmt_child(expr: &Expr, parent_prec: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let negative_atom = matches!(expr, Expr::Num(n) if *n < 0.0);
    if precedence(expr) < parent_prec || negative_atom {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(n) => fmt_num(*n, f),
            Expr::I => f.write_str("j"),
            Expr::Sym(s) => write!(f, "{}", s),
            Expr::Add(terms) => {
                // Numeric constants render last ("s + 4"), independent of the
                // canonical term order used for comparison and hashing. A
                // negative leading term keeps the constant in front so a
                // difference reads "1 - x" rather than "-x + 1".
                let mut ordered: Vec<&Expr> =
                    terms.iter().filter(|t| !matches!(t, Expr::Num(_))).collect();
                let constants = terms.iter().filter(|t| matches!(t, Expr::Num(_)));
                if ordered.first().is_some_and(|t| t.coeff_split().0 < 0.0) {
                    ordered.splice(0..0, constants);
                } else {
                    ordered.extend(constants);
                }
                for (i, term) in ordered.into_iter().enumerate() {
                    let (coeff, rest) = term.coeff_split();
                    if i == 0 {
                        fmt_child(term, 1, f)?;
                    } else if coeff < 0.0 {
                        // Render negative terms with a binary minus.
                        f.write_str(" - ")?;
                        let positive = if coeff == -1.0 && !rest.is_one() {
                            rest
                        } else {
                            Expr::product(vec![Expr::Num(-coeff), rest])
                        };
                        fmt_child(&positive, 2, f)?;
                    } else {
                        f.write_str(" + ")?;
                        fmt_child(term, 2, f)?;
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                let mut numerator: Vec<Expr> = Vec::new();
                let mut denominator: Vec<Expr> = Vec::new();
                for factor in factors {
                    match factor {
                        Expr::Pow(b, e) => {
                            if let Some(ev) = e.as_num() {
                                if ev < 0.0 {
                                    denominator.push(Expr::pow((**b).clone(), Expr::Num(-ev)));
                                    continue;
                                }
                            }
                            numerator.push(factor.clone());
                        }
                        _ => numerator.push(factor.clone()),
                    }
                }

                if numerator.is_empty() {
                    f.write_str("1")?;
                } else {
                    for (i, factor) in numerator.iter().enumerate() {
                        if i > 0 {
                            f.write_str("*")?;
                        }
                        fmt_child(factor, 2, f)?;
                    }
                }
                for d in &denominator {
                    f.write_str("/")?;
                    fmt_child(d, 3, f)?;
                }
                Ok(())
            }
            Expr::Pow(base, exp) => {
                if let Some(e) = exp.as_num() {
                    if e == 0.5 {
                        return write!(f, "sqrt({})", base);
                    }
                    if e == -1.0 {
                        f.write_str("1/")?;
                        return fmt_child(base, 3, f);
                    }
                }
                fmt_child(base, 4, f)?;
                f.write_str("^")?;
                fmt_child(exp, 4, f)
            }
            Expr::Func(head, args) => {
                write!(f, "{}(", head.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Assumptions;

    fn sym(name: &str) -> Expr {
        Expr::symbol(Symbol::new(name, Assumptions::real()))
    }

    #[test]
    fn test_sum_collects_like_terms() {
        let x = sym("x");
        let e = x.clone() + x.clone() + Expr::from(3.0) + Expr::from(-1.0);
        assert_eq!(
            e,
            Expr::sum(vec![
                Expr::product(vec![Expr::from(2.0), x.clone()]),
                Expr::from(2.0)
            ])
        );
    }

    #[test]
    fn test_sum_drops_cancelled_terms() {
        let x = sym("x");
        let e = x.clone() - x.clone();
        assert!(e.is_zero());
    }

    #[test]
    fn test_product_collects_powers() {
        let x = sym("x");
        let e = x.clone() * x.clone() * x.clone();
        assert_eq!(e, Expr::pow(x, Expr::from(3.0)));
    }

    #[test]
    fn test_product_cancels_reciprocal() {
        let x = sym("x");
        let e = x.clone() * Expr::recip(x.clone());
        assert!(e.is_one());
    }

    #[test]
    fn test_imaginary_unit_squares_to_minus_one() {
        let e = Expr::I * Expr::I;
        assert_eq!(e, Expr::from(-1.0));
        let e = Expr::pow(Expr::I, Expr::from(3.0));
        assert_eq!(e, Expr::product(vec![Expr::from(-1.0), Expr::I]));
    }

    #[test]
    fn test_sqrt_of_square_of_positive_symbol() {
        let w = Expr::symbol(Symbol::new("w0", Assumptions::default()));
        let e = Expr::sqrt(Expr::pow(w.clone(), Expr::from(2.0)));
        assert_eq!(e, w);
    }

    #[test]
    fn test_trig_folds_only_at_quarter_turns() {
        assert!(Expr::sin(Expr::zero()).is_zero());
        assert!(Expr::cos(Expr::zero()).is_one());
        assert_eq!(
            Expr::cos(Expr::from(-std::f64::consts::FRAC_PI_2)),
            Expr::zero()
        );
        // cos(3) must stay symbolic
        assert_eq!(
            Expr::cos(Expr::from(3.0)),
            Expr::Func(Func::Cos, vec![Expr::Num(3.0)])
        );
    }

    #[test]
    fn test_coeff_split() {
        let x = sym("x");
        let e = Expr::from(3.0) * Expr::cos(x.clone());
        let (c, rest) = e.coeff_split();
        assert_eq!(c, 3.0);
        assert_eq!(rest, Expr::cos(x));
    }

    #[test]
    fn test_subs() {
        let s = Symbol::new("x", Assumptions::real());
        let e = Expr::symbol(s.clone()) * Expr::from(2.0) + Expr::from(1.0);
        let r = e.subs(&s, &Expr::from(3.0));
        assert_eq!(r, Expr::from(7.0));
    }

    #[test]
    fn test_free_symbols() {
        let e = sym("a") * Expr::cos(sym("t")) + sym("b");
        assert_eq!(e.free_symbols(), vec!["a", "b", "t"]);
    }

    #[test]
    fn test_display_division() {
        let s = sym("s");
        let e = Expr::recip(s.clone() + Expr::from(4.0));
        assert_eq!(e.to_string(), "1/(s + 4)");
        let e = Expr::from(5.0) / s;
        assert_eq!(e.to_string(), "5/s");
    }

    #[test]
    fn test_display_sum_constant_last() {
        let e = sym("s") + Expr::from(4.0);
        assert_eq!(e.to_string(), "s + 4");
        let e = sym("x") - Expr::from(5.0);
        assert_eq!(e.to_string(), "x - 5");
    }

    #[test]
    fn test_display_subtraction() {
        let x = sym("x");
        let e = Expr::from(1.0) - x;
        assert_eq!(e.to_string(), "1 - x");
    }
}
