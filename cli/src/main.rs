//! Marketplace delivery charges, command line.
//!
//! ```sh
//! # Run the REST API (default config: ~/.config/marketplace-delivery/config.toml)
//! delivery-cli serve --port 8080
//!
//! # Validate the config file
//! delivery-cli check
//!
//! # Price a parcel without a running server
//! delivery-cli quote --buyer-district Dhaka --buyer-upazilla Mirpur \
//!     --seller-district Dhaka --seller-upazilla Dhanmondi --weight 2.4
//!
//! # Print the example price table for a tariff exported from the admin panel
//! delivery-cli examples --settings tariff.json
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;

use marketplace_delivery::domain::delivery::example_calculations;
use marketplace_delivery::server::{init_tracing, ServerHandle};
use marketplace_delivery::{
    calculate_delivery_breakdown, default_config_path, Address, AppConfig, DeliverySettings,
    PackageWeight,
};

#[derive(Parser, Debug)]
#[command(
    name = "delivery-cli",
    version,
    about = "Location-based delivery charges for the marketplace"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, env = "DELIVERY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the REST API server.
    Serve {
        /// Override the listen port.
        #[arg(long)]
        port: Option<u16>,

        /// Override the log level (trace, debug, info, warn, error).
        #[arg(short, long)]
        log_level: Option<String>,
    },
    /// Validate the configuration file and exit.
    Check,
    /// Quote one parcel.
    Quote(QuoteArgs),
    /// Print the example price table.
    Examples {
        /// Tariff as a JSON object; overrides `[delivery.rates]`.
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct QuoteArgs {
    #[arg(long)]
    buyer_district: Option<String>,
    #[arg(long)]
    buyer_upazilla: Option<String>,
    /// Leave both seller fields out to price an unknown seller location.
    #[arg(long)]
    seller_district: Option<String>,
    #[arg(long)]
    seller_upazilla: Option<String>,
    /// Parcel weight in kilograms (default 1).
    #[arg(long)]
    weight: Option<Decimal>,
    /// Tariff as a JSON object; overrides `[delivery.rates]`.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);

    match cli.command {
        Command::Check => {
            let config = AppConfig::load(&config_path)?;
            let s = config.delivery.initial_settings();
            println!("✅ Configuration is valid");
            println!("   Config file    : {}", config_path.display());
            println!("   API address    : {}", config.server.address());
            println!("   Log level      : {}", config.logging.level);
            println!("   Currency       : {}", config.delivery.currency);
            println!(
                "   Intra-upazilla : {} + {}/kg",
                s.intra_upazilla_charge, s.intra_upazilla_extra_kg_charge
            );
            println!(
                "   Intra-district : {} + {}/kg",
                s.intra_district_charge, s.intra_district_extra_kg_charge
            );
            println!(
                "   Inter-district : {} + {}/kg",
                s.inter_district_charge, s.inter_district_extra_kg_charge
            );
            Ok(())
        }
        Command::Serve { port, log_level } => {
            let mut config = load_or_default(&config_path);
            if let Some(level) = log_level {
                config.logging.level = level;
            }
            init_tracing(&config);
            info!("Using configuration from {}", config_path.display());

            if let Some(port) = port {
                info!("CLI override: port = {}", port);
                config.server.port = port;
            }

            let handle = ServerHandle::start(config).await?;
            handle.install_signal_handler();
            info!("🚀 Press Ctrl+C to shutdown gracefully.");
            handle.wait().await;
            Ok(())
        }
        Command::Quote(args) => {
            let config = load_or_default(&config_path);
            let settings = resolve_settings(&config, args.settings.as_deref())?;

            let buyer = address(args.buyer_district, args.buyer_upazilla);
            let seller = match (args.seller_district, args.seller_upazilla) {
                (None, None) => None,
                (district, upazilla) => Some(address(district, upazilla)),
            };

            let b = calculate_delivery_breakdown(
                &buyer,
                seller.as_ref(),
                &settings,
                PackageWeight::new(args.weight),
            );

            println!("Tier      : {}", b.tier);
            println!("Weight    : {} kg", b.billable_weight_kg);
            println!("Base      : {:.2}", b.base_charge);
            println!(
                "Surcharge : {:.2} ({} x {:.2})",
                b.surcharge, b.extra_units, b.extra_kg_charge
            );
            println!("Total     : {}", b.format_total(&config.delivery.currency));
            Ok(())
        }
        Command::Examples { settings } => {
            let config = load_or_default(&config_path);
            let settings = resolve_settings(&config, settings.as_deref())?;

            println!("{:<16} {:>8} {:>12}", "tier", "kg", "charge");
            for row in example_calculations(&settings) {
                println!(
                    "{:<16} {:>8} {:>12}",
                    row.tier.to_string(),
                    row.weight_kg.to_string(),
                    row.breakdown.format_total(&config.delivery.currency)
                );
            }
            Ok(())
        }
    }
}

fn load_or_default(path: &Path) -> AppConfig {
    match AppConfig::load(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            // Runs before tracing is initialized.
            eprintln!("Failed to load config from {}: {}", path.display(), e);
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    }
}

fn resolve_settings(
    config: &AppConfig,
    settings_file: Option<&Path>,
) -> Result<DeliverySettings, Box<dyn std::error::Error>> {
    match settings_file {
        Some(path) => {
            let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            Ok(DeliverySettings::from_raw(&raw, &config.delivery.defaults))
        }
        None => Ok(config.delivery.initial_settings()),
    }
}

fn address(district: Option<String>, upazilla: Option<String>) -> Address {
    Address {
        district,
        upazilla,
        ..Default::default()
    }
}
