mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "adops-cli")]
#[command(about = "Ad-spend operations command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the commission leaderboard for a period
    Leaderboard {
        /// Period start (inclusive), e.g. 2025-08-01
        #[arg(long)]
        from: NaiveDate,
        /// Period end (inclusive), e.g. 2025-08-31
        #[arg(long)]
        to: NaiveDate,
        /// Include roster members with no entries as zero rows
        #[arg(long)]
        full_roster: bool,
    },
    /// Recompute and replace the cached commission records for a period
    Refresh {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Export daily entries as CSV
    Export {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = adops_core::load_app_config_from_env()?;
    let pool_config = adops_db::PoolConfig::from_app_config(&config);
    let pool = adops_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Leaderboard {
            from,
            to,
            full_roster,
        } => commands::run_leaderboard(&pool, &config, from, to, full_roster).await,
        Commands::Refresh { from, to } => commands::run_refresh(&pool, &config, from, to).await,
        Commands::Export { from, to, out } => {
            commands::run_export(&pool, from, to, out.as_deref()).await
        }
    }
}
