//! Vostok Customs — CLI calculator
//!
//! Headless driver over the customs engine: validates the vehicle fields
//! given as flags and prints the itemized cost breakdown.
//!
//! ```sh
//! # Run with default config (~/.config/vostok-customs/config.toml)
//! customs-calc --age under_3 --engine-type gasoline --capacity 4000 \
//!     --power 300 --price 5000000
//!
//! # Price in local currency with the fixed region fees applied
//! customs-calc --age 3-5 --engine-type diesel --capacity 2000 \
//!     --power 150 --price 30000000 --currency krw --region korea
//!
//! # Validate config without calculating
//! customs-calc --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, warn};

use vostok_customs::config::AppConfig;
use vostok_customs::{default_config_path, init_tracing, CustomsCalculator, RawVehicleInput};

/// Vehicle import customs cost calculator.
#[derive(Parser, Debug)]
#[command(
    name = "customs-calc",
    version,
    about = "Itemized import-customs cost for a vehicle",
    long_about = "Vostok Customs — computes duty, recycling fee, clearance fee and \
                  excise for a vehicle imported from China or Korea.\n\n\
                  Default config: ~/.config/vostok-customs/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CUSTOMS_CONFIG")]
    config: Option<PathBuf>,

    /// Age bracket (under_3 or 3-5).
    #[arg(long)]
    age: Option<String>,

    /// Engine type (gasoline, diesel, hybrid, electric).
    #[arg(long)]
    engine_type: Option<String>,

    /// Engine displacement in cc (not needed for electric).
    #[arg(long)]
    capacity: Option<String>,

    /// Engine power in hp.
    #[arg(long)]
    power: Option<String>,

    /// Declared price.
    #[arg(long)]
    price: Option<String>,

    /// Price currency (rub, cny, krw).
    #[arg(long)]
    currency: Option<String>,

    /// Purchase region (china or korea); applies the fixed region fees.
    #[arg(long)]
    region: Option<String>,

    /// Overseas work cost in RUB (ignored when --region is set).
    #[arg(long)]
    overseas_work: Option<String>,

    /// Agent commission in RUB.
    #[arg(long)]
    agent_fee: Option<String>,

    /// Port work cost in RUB (ignored when --region is set).
    #[arg(long)]
    port_work: Option<String>,

    /// Domestic delivery cost in RUB.
    #[arg(long)]
    delivery: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print the breakdown as JSON.
    #[arg(long)]
    json: bool,

    /// Validate the configuration file and exit without calculating.
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    if let Some(e) = load_error {
        if cli.config.is_some() {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
        // No usable file at the default location; built-in tariffs apply.
        warn!(
            "No config at {} ({}); using built-in defaults",
            config_path.display(),
            e
        );
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file     : {}", config_path.display());
        println!("   Clearance tiers : {}", config.tariffs.clearance_fee_schedule.len());
        println!("   Duty brackets   : {}", config.tariffs.duty_brackets_under3.len());
        println!("   EUR/RUB rate    : {}", config.tariffs.rates.eur_to_rub);
        println!("   Log level       : {}", config.logging.level);
        return ExitCode::SUCCESS;
    }

    // ── Collect raw fields ─────────────────────────────────────
    let (Some(age), Some(engine_type), Some(power), Some(price)) = (
        cli.age.clone(),
        cli.engine_type.clone(),
        cli.power.clone(),
        cli.price.clone(),
    ) else {
        eprintln!("--age, --engine-type, --power and --price are required (see --help)");
        return ExitCode::FAILURE;
    };

    let raw = RawVehicleInput {
        age,
        engine_type,
        engine_capacity: cli.capacity.clone().unwrap_or_default(),
        engine_power: power,
        price,
        currency: cli.currency.clone(),
        region: cli.region.clone(),
        overseas_work: cli.overseas_work.clone(),
        agent_fee: cli.agent_fee.clone(),
        port_work: cli.port_work.clone(),
        delivery: cli.delivery.clone(),
    };

    // ── Calculate ──────────────────────────────────────────────
    let calculator = CustomsCalculator::new(Arc::new(config.tariffs.clone()));
    let profile = match calculator.validate(&raw) {
        Ok(profile) => profile,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let result = match calculator.calculate(&profile) {
        Ok(result) => result,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("failed to serialize result: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for item in &result.items {
            println!("{:<30} {:>16.2}", item.label, item.amount_rub);
        }
    }

    ExitCode::SUCCESS
}
