//! Command-line interface for symcir.
//!
//! Decomposes signal expressions into superposition components, transforms
//! them between domains, and applies impedance/admittance responses.

mod output;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use symcir::{Domain, DomainExpr, Quantity, Superposition, SymbolTable, registry};

use crate::output::{print_component, print_header, print_superposition};

#[derive(Parser)]
#[command(name = "symcir", version, about = "Symbolic linear-circuit signal analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, ValueEnum)]
enum QuantityArg {
    Voltage,
    Current,
}

impl From<QuantityArg> for Quantity {
    fn from(arg: QuantityArg) -> Self {
        match arg {
            QuantityArg::Voltage => Quantity::Voltage,
            QuantityArg::Current => Quantity::Current,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum DomainArg {
    Time,
    Laplace,
    Fourier,
}

#[derive(Subcommand)]
enum Command {
    /// Split a signal into dc, phasor, transient, and noise components
    Decompose {
        /// Signal expression, e.g. "cos(3*t) + exp(-4*t) + 5"
        expr: String,

        #[arg(long, value_enum, default_value_t = QuantityArg::Voltage)]
        quantity: QuantityArg,
    },

    /// Transform a signal into a target domain
    Transform {
        /// Signal expression
        expr: String,

        /// Target domain
        #[arg(long, value_enum)]
        to: DomainArg,

        #[arg(long, value_enum, default_value_t = QuantityArg::Voltage)]
        quantity: QuantityArg,
    },

    /// Evaluate the time-domain aggregate over a sample range
    Sample {
        /// Signal expression
        expr: String,

        /// Start time
        #[arg(long, default_value_t = 0.0)]
        start: f64,

        /// Stop time
        #[arg(long, default_value_t = 1.0)]
        stop: f64,

        /// Number of samples
        #[arg(long, default_value_t = 11)]
        points: usize,

        #[arg(long, value_enum, default_value_t = QuantityArg::Voltage)]
        quantity: QuantityArg,
    },

    /// Push a source through an impedance or admittance response
    Ohm {
        /// Source expression
        expr: String,

        /// Laplace-domain impedance, e.g. "R" or "1/(C*s)"
        #[arg(long, conflicts_with = "admittance")]
        impedance: Option<String>,

        /// Laplace-domain admittance, e.g. "C*s"
        #[arg(long)]
        admittance: Option<String>,

        #[arg(long, value_enum, default_value_t = QuantityArg::Voltage)]
        quantity: QuantityArg,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Decompose { expr, quantity } => run_decompose(&expr, quantity.into()),
        Command::Transform { expr, to, quantity } => run_transform(&expr, to, quantity.into()),
        Command::Sample {
            expr,
            start,
            stop,
            points,
            quantity,
        } => run_sample(&expr, start, stop, points, quantity.into()),
        Command::Ohm {
            expr,
            impedance,
            admittance,
            quantity,
        } => run_ohm(&expr, impedance, admittance, quantity.into()),
    }
}

fn run_decompose(src: &str, quantity: Quantity) -> Result<()> {
    print_header("Signal Decomposition");

    let sup = Superposition::of(quantity, src)?;
    let decomposed = sup.decompose()?;
    print_superposition(decomposed);

    println!("time aggregate:");
    print_component("x(t)", &decomposed.time()?);
    println!();
    Ok(())
}

fn run_transform(src: &str, to: DomainArg, quantity: Quantity) -> Result<()> {
    print_header("Domain Transform");

    let sup = Superposition::of(quantity, src)?;
    let (label, image) = match to {
        DomainArg::Time => ("x(t)", sup.time()?),
        DomainArg::Laplace => ("X(s)", sup.laplace()?),
        DomainArg::Fourier => ("X(f)", sup.fourier()?),
    };
    print_component(label, &image);
    println!();
    Ok(())
}

fn run_sample(src: &str, start: f64, stop: f64, points: usize, quantity: Quantity) -> Result<()> {
    if points < 2 || stop <= start {
        bail!("sample range must have at least two points with stop > start");
    }
    print_header("Transient Response");

    let sup = Superposition::of(quantity, src)?;
    let step = (stop - start) / (points - 1) as f64;
    let samples: Vec<f64> = (0..points).map(|i| start + step * i as f64).collect();
    let values = sup.transient_response(&samples)?;

    let units = sup.time()?.units();
    println!("  {:>12}  {:>16}", "t [s]", format!("x(t) [{units}]"));
    for (t, value) in samples.iter().zip(&values) {
        println!("  {t:>12.6}  {:>16.9}", value.re);
    }
    println!();
    Ok(())
}

fn run_ohm(
    src: &str,
    impedance: Option<String>,
    admittance: Option<String>,
    quantity: Quantity,
) -> Result<()> {
    print_header("Ohm's Law Transfer");

    let response = match (impedance, admittance) {
        (Some(z), None) => parse_response(&z, Quantity::Impedance)?,
        (None, Some(y)) => parse_response(&y, Quantity::Admittance)?,
        _ => bail!("exactly one of --impedance or --admittance is required"),
    };

    let source = Superposition::of(quantity, src)?;
    let result = source.transfer_multiply(&response)?;

    println!("{} components:", result.quantity().label());
    print_superposition(&result);
    Ok(())
}

fn parse_response(src: &str, quantity: Quantity) -> Result<DomainExpr> {
    let mut table = SymbolTable::new();
    let expr = registry::parse(src, &mut table)?;
    Ok(DomainExpr::new(expr, Domain::Laplace, quantity)?)
}
