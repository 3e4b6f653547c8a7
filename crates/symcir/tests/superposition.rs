//! End-to-end scenarios over the public surface.

use symcir::{
    Assumptions, Domain, DomainExpr, Error, Expr, Kind, Quantity, Superposition, Symbol,
    equivalent, registry,
};

fn t() -> Expr {
    Expr::symbol(registry::TIME.clone())
}

fn s() -> Expr {
    Expr::symbol(registry::LAPLACE.clone())
}

fn sym(name: &str) -> Expr {
    Expr::symbol(Symbol::new(name, Assumptions::default()))
}

#[test]
fn mixed_signal_decomposes_into_dc_ac_and_transient() {
    let v = Superposition::voltage_of("cos(3*t) + exp(-4*t) + 5").unwrap();

    assert_eq!(*v.dc().unwrap().expr(), Expr::from(5.0));

    let ac = v.ac().unwrap();
    assert_eq!(ac.len(), 1);
    let phasor = &ac[&Expr::from(3.0)];
    assert!(equivalent(phasor.expr(), &Expr::one()));

    let expected_s = Expr::recip(s() + Expr::from(4.0));
    assert!(equivalent(v.s().unwrap().expr(), &expected_s));

    let reconstructed = v.decompose().unwrap().time().unwrap();
    let original = Expr::cos(Expr::from(3.0) * t())
        + Expr::exp(Expr::from(-4.0) * t())
        + Expr::from(5.0);
    assert!(equivalent(reconstructed.expr(), &original));
}

#[test]
fn causal_transient_round_trips_through_laplace() {
    let v = Superposition::voltage_of("exp(-4*t)").unwrap();
    let image = v.laplace().unwrap();
    assert_eq!(*image.domain(), Domain::Laplace);

    let back = image.time().unwrap();
    assert!(equivalent(
        back.expr(),
        &Expr::exp(Expr::from(-4.0) * t())
    ));
}

#[test]
fn dc_voltage_through_resistor_gives_dc_current() {
    let v = Superposition::voltage_of(5.0).unwrap();
    let z = DomainExpr::new(sym("R"), Domain::Laplace, Quantity::Impedance).unwrap();

    let i = v.transfer_multiply(&z).unwrap();
    assert_eq!(i.quantity(), Quantity::Current);
    assert_eq!(i.kinds(), vec![Kind::Dc]);
    let expected = Expr::from(5.0) / sym("R");
    assert!(equivalent(i.dc().unwrap().expr(), &expected));

    // Division by the impedance is the same Ohm's-law application.
    let i2 = v.divide(z).unwrap();
    assert!(i.equals(&i2).unwrap());
}

#[test]
fn dc_through_capacitor_impedance_is_rejected() {
    // Z(s) = 1/(C*s) is a pole at dc: the current image at s = 0 has no
    // finite value, so the transfer must fail rather than carry a 1/0 term.
    let i = Superposition::current_of(5.0).unwrap();
    let z = DomainExpr::new(
        Expr::recip(sym("C") * s()),
        Domain::Laplace,
        Quantity::Impedance,
    )
    .unwrap();
    let err = i.transfer_multiply(&z).unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation { .. }));
}

#[test]
fn ac_voltage_through_rc_admittance_scales_per_frequency() {
    // Y(s) = C*s applied to cos(3t) + cos(5t): each phasor sees j*w*C.
    let c = sym("C");
    let y = DomainExpr::new(
        c.clone() * s(),
        Domain::Laplace,
        Quantity::Admittance,
    )
    .unwrap();

    let v = Superposition::voltage_of("cos(3*t) + cos(5*t)").unwrap();
    let i = v.transfer_multiply(&y).unwrap();

    assert_eq!(i.quantity(), Quantity::Current);
    let ac = i.ac().unwrap();
    assert_eq!(ac.len(), 2);
    let j = Expr::imaginary_unit();
    assert!(equivalent(
        ac[&Expr::from(3.0)].expr(),
        &(Expr::from(3.0) * j.clone() * c.clone())
    ));
    assert!(equivalent(
        ac[&Expr::from(5.0)].expr(),
        &(Expr::from(5.0) * j * c)
    ));
}

#[test]
fn noise_transfers_with_magnitude() {
    // A flat density a through Y(s) = C*s picks up |j*omega*C| = C*omega.
    let mut v = Superposition::voltage();
    v.add(
        DomainExpr::new(
            sym("a"),
            Domain::Noise {
                nid: "n1".to_string(),
            },
            Quantity::Voltage,
        )
        .unwrap(),
    )
    .unwrap();

    let y = DomainExpr::new(sym("C") * s(), Domain::Laplace, Quantity::Admittance).unwrap();
    let i = v.transfer_multiply(&y).unwrap();

    let out = i.get(&Kind::Noise("n1".to_string())).unwrap();
    let omega = Expr::symbol(registry::OMEGA.clone());
    let expected = sym("a") * sym("C") * Expr::abs(omega);
    assert!(equivalent(out.expr(), &expected));
}

#[test]
fn superposition_times_superposition_is_rejected() {
    let a = Superposition::voltage_of(5.0).unwrap();
    let b = Superposition::voltage_of("cos(3*t)").unwrap();

    let err = a.multiply(b.clone());
    assert!(matches!(
        err,
        Err(Error::UnsupportedOperation { op: "multiply", .. })
    ));

    let err = a.divide(b);
    assert!(matches!(
        err,
        Err(Error::UnsupportedOperation { op: "divide", .. })
    ));
}

#[test]
fn quadrature_noise_total() {
    let mut v = Superposition::voltage();
    for (nid, name) in [("n1", "a"), ("n2", "b")] {
        v.add(
            DomainExpr::new(
                sym(name),
                Domain::Noise {
                    nid: nid.to_string(),
                },
                Quantity::Voltage,
            )
            .unwrap(),
        )
        .unwrap();
    }

    let total = v.n().unwrap();
    let expected = Expr::sqrt(
        Expr::pow(sym("a"), Expr::from(2.0)) + Expr::pow(sym("b"), Expr::from(2.0)),
    );
    assert_eq!(*total.expr(), expected);
}

#[test]
fn shared_symbol_table_keeps_variants_aligned() {
    let mut v = Superposition::voltage_of("R1*cos(3*t)").unwrap();
    v.add("R_{1}*cos(3*t)").unwrap();

    let ac = v.ac().unwrap();
    let phasor = &ac[&Expr::from(3.0)];
    assert!(equivalent(phasor.expr(), &(Expr::from(2.0) * sym("R_1"))));
}

#[test]
fn transient_response_evaluates_time_aggregate() {
    let v = Superposition::voltage_of("5 + exp(-1*t)").unwrap();
    let samples = [0.0, 1.0];
    let out = v.transient_response(&samples).unwrap();
    assert!((out[0].re - 6.0).abs() < 1e-9);
    assert!((out[1].re - (5.0 + (-1.0f64).exp())).abs() < 1e-9);
    assert!(out[0].im.abs() < 1e-12);
}

#[test]
fn scaling_preserves_kind_structure() {
    let v = Superposition::voltage_of("cos(3*t) + 5").unwrap();
    let scaled = v.scale(&Expr::from(2.0)).unwrap();
    assert_eq!(*scaled.dc().unwrap().expr(), Expr::from(10.0));
    assert_eq!(scaled.ac_keys().unwrap(), vec![Expr::from(3.0)]);
}
