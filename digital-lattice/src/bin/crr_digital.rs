//! crr-digital - price one barrier-conditioned cash-or-nothing option
//!
//! ```text
//! crr-digital --barrier 90 --barrier-type down-out --steps 500
//! crr-digital --barrier-type none --option-type put --monitoring discrete
//! ```
//!
//! Lattice settings come from an optional TOML file (`--config`); flags win
//! over the file.

use anyhow::{Context, Result};
use clap::Parser;
use digital_lattice::config::CliConfig;
use dl_core::Real;
use dl_instruments::{BarrierSpec, DigitalBarrierOption, OptionType, PricingEngine};
use dl_pricingengines::{BarrierMonitoring, BinomialDigitalEngine, MarketData};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// CRR binomial pricer for digital barrier options
#[derive(Parser, Debug)]
#[command(name = "crr-digital")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Spot price of the underlying
    #[arg(long, default_value_t = 100.0)]
    spot: Real,

    /// Strike price
    #[arg(long, default_value_t = 100.0)]
    strike: Real,

    /// Barrier level
    #[arg(long, default_value_t = 90.0)]
    barrier: Real,

    /// Barrier type (down-in, down-out, up-in, up-out, none)
    #[arg(long, default_value = "down-out")]
    barrier_type: String,

    /// Continuously compounded risk-free rate
    #[arg(long, default_value_t = 0.05, allow_negative_numbers = true)]
    rate: Real,

    /// Lognormal volatility
    #[arg(long, default_value_t = 0.2)]
    volatility: Real,

    /// Time to expiry in years
    #[arg(long, default_value_t = 1.0)]
    maturity: Real,

    /// Fixed cash amount paid in the money
    #[arg(long, default_value_t = 10.0)]
    payout: Real,

    /// Number of time steps
    #[arg(short = 'n', long, default_value_t = 200)]
    steps: usize,

    /// Option type (call or put)
    #[arg(short = 't', long, default_value = "call")]
    option_type: String,

    /// Barrier monitoring (node-reach or discrete); overrides the config file
    #[arg(short, long)]
    monitoring: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => CliConfig::default(),
    };

    let monitoring = match &cli.monitoring {
        Some(label) => label.parse().context("invalid --monitoring")?,
        None => config.monitoring()?.unwrap_or_default(),
    };

    let option_type: OptionType = cli.option_type.parse().context("invalid --option-type")?;
    let barrier = parse_barrier(&cli.barrier_type, cli.barrier).context("invalid barrier")?;
    let option = DigitalBarrierOption::new(option_type, cli.strike, cli.payout, barrier)
        .context("invalid contract")?;

    info!(
        spot = cli.spot,
        strike = cli.strike,
        barrier = %describe_barrier(barrier.as_ref()),
        steps = cli.steps,
        %monitoring,
        "pricing"
    );

    let market = MarketData {
        spot: cli.spot,
        rate: cli.rate,
        volatility: cli.volatility,
        maturity: cli.maturity,
    };
    let engine = BinomialDigitalEngine::new(market, cli.steps)
        .with_settings(config.lattice)
        .with_monitoring(monitoring);
    let results = engine.calculate(&option).context("valuation failed")?;

    println!(
        "Premium CRR ({}): {:.4}",
        contract_label(option_type, barrier.as_ref(), monitoring),
        results.npv
    );
    for key in ["delta", "gamma"] {
        if let Some(value) = results.result(key) {
            info!("{key}: {value:.6}");
        }
    }
    Ok(())
}

fn parse_barrier(label: &str, level: Real) -> dl_core::Result<Option<BarrierSpec>> {
    if label.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    BarrierSpec::parse(label, level).map(Some)
}

fn describe_barrier(barrier: Option<&BarrierSpec>) -> String {
    barrier.map_or_else(|| "none".to_string(), ToString::to_string)
}

fn contract_label(
    option_type: OptionType,
    barrier: Option<&BarrierSpec>,
    monitoring: BarrierMonitoring,
) -> String {
    let kind = option_type.to_string().to_lowercase();
    match barrier {
        Some(b) => format!("{b} cash-or-nothing {kind}, {monitoring}"),
        None => format!("cash-or-nothing {kind}"),
    }
}
