//! Command-line interface for fill-fixtures
//!
//! # Usage Examples
//!
//! ```bash
//! # Five random values of a shape
//! fill-fixtures --shape order.yaml --count 5
//!
//! # Reproducible output with non-empty collections
//! fill-fixtures --shape order.yaml --seed 7 --min-size 1 --max-size 4 --never-absent
//!
//! # Show the effective configuration
//! fill-fixtures --shape order.yaml --config fill.yaml --print-config
//! ```
//!
//! Set `RUST_LOG=fill_engine=debug` to log the policy of each fill.

use clap::Parser;
use fill_fixtures::GenerateArgs;

#[derive(Parser)]
#[command(name = "fill-fixtures")]
#[command(about = "Populate values with zero or random data for test fixtures")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    args: GenerateArgs,
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.args.print_config {
        let config = cli.args.fill_config()?;
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    for value in fill_fixtures::generate(&cli.args)? {
        println!("{value}");
    }
    Ok(())
}
