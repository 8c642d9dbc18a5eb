use clap::{Parser, Subcommand, ValueEnum};
use tariffcalc_core::{Language, ServiceKind, TariffType};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "tariffcalc")]
#[command(about = "Shipping tariff calculator")]
struct Cli {
    /// Display language for city names (uz, ru, en)
    #[arg(long, global = true, env = "TARIFFCALC_LANGUAGE")]
    lang: Option<Language>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check whether a tariff can be used between two cities
    Check {
        /// Origin city, in any supported language
        #[arg(long)]
        from: String,
        /// Destination city, in any supported language
        #[arg(long)]
        to: String,
        /// Tariff type (e.g. OFFICE_DOOR or office-door)
        #[arg(long)]
        tariff: TariffType,
    },
    /// Request a price quote
    Calculate {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        tariff: TariffType,
        /// Parcel weight in kilograms
        #[arg(long)]
        weight: f64,
    },
    /// List cities known to the backend
    Cities {
        /// Only show cities matching this name
        #[arg(long)]
        filter: Option<String>,
    },
    /// List warehouses or lockers
    Points {
        #[arg(value_enum)]
        kind: PointsKind,
        /// Only show points in this city
        #[arg(long)]
        city: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PointsKind {
    Warehouses,
    Lockers,
}

impl From<PointsKind> for ServiceKind {
    fn from(kind: PointsKind) -> Self {
        match kind {
            PointsKind::Warehouses => ServiceKind::Warehouse,
            PointsKind::Lockers => ServiceKind::Locker,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = tariffcalc_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let language = cli.lang.unwrap_or(config.language);
    tracing::debug!(env = %config.env, api = %config.api_base_url, %language, "starting");

    match cli.command {
        Commands::Check { from, to, tariff } => {
            commands::run_check(&config, language, &from, &to, tariff).await?;
        }
        Commands::Calculate {
            from,
            to,
            tariff,
            weight,
        } => {
            commands::run_calculate(&config, language, &from, &to, tariff, weight).await?;
        }
        Commands::Cities { filter } => {
            commands::run_cities(&config, language, filter.as_deref()).await?;
        }
        Commands::Points { kind, city } => {
            commands::run_points(&config, kind.into(), city.as_deref()).await?;
        }
    }

    Ok(())
}
