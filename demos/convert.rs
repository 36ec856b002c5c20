use clap::Parser;
use log::{debug, info};
use num_bigint::BigUint;

use prop_basis::formula::Formula;
use prop_basis::operators::Basis;
use prop_basis::semantics::is_equivalent;

#[derive(Debug, Parser)]
#[command(author, version)]
#[command(about = "Convert propositional formulas into a restricted operator basis")]
struct Cli {
    /// Formulas to convert, e.g. "((p->q)+~T)".
    #[arg(value_name = "FORMULA", required = true)]
    formulas: Vec<String>,

    /// Target basis: not-and-or, not-and, nand, implies-not, implies-false, or all.
    #[arg(short, long, value_name = "NAME", default_value = "nand")]
    basis: String,

    /// Verify the result by truth table and basis containment.
    #[arg(long)]
    check: bool,

    /// Skip conversions whose result would have more nodes than this.
    #[arg(long, value_name = "INT")]
    max_size: Option<u64>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;
    debug!("args = {:?}", args);

    let bases: Vec<Basis> = if args.basis == "all" {
        Basis::ALL.to_vec()
    } else {
        vec![args.basis.parse()?]
    };

    for text in &args.formulas {
        let formula = Formula::parse(text)?;
        println!("{}", formula);

        for &basis in &bases {
            let predicted = basis.predicted_size(&formula);
            if let Some(max_size) = args.max_size {
                if predicted > BigUint::from(max_size) {
                    println!("  {:>13}: skipped ({} nodes > {})", basis, predicted, max_size);
                    continue;
                }
            }

            let converted = basis.convert(&formula);
            println!("  {:>13}: {}", basis, converted);

            if args.check {
                let contained = basis.contains(&converted);
                let equivalent = is_equivalent(&formula, &converted);
                info!(
                    "{}: size = {}, in basis = {}, equivalent = {}",
                    basis,
                    converted.size(),
                    contained,
                    equivalent
                );
                if !contained || !equivalent {
                    color_eyre::eyre::bail!("conversion of {} to {} failed the check", formula, basis);
                }
            }
        }
    }

    Ok(())
}
