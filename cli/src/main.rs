//! PortfolioX - terminal dashboard for the portfolio-analytics backend
//!
//! One-shot subcommands render a single section and exit; `shell` keeps a
//! session open and takes commands interactively.

mod shell;
mod terminal;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use portfoliox_core::{ApiConfig, ClientSettings, PerformancePeriod, Section};
use portfoliox_engine::{DashboardSession, LoadOutcome};
use portfoliox_networking::PortfolioXClient;
use portfoliox_persistence::{
    derive_machine_key, ConfigStore, Database, MemoryConfigStore, SecretCipher,
    SqliteConfigStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use terminal::TerminalSink;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DATA_DIR_NAME: &str = "PortfolioX";
const DB_FILE_NAME: &str = "portfoliox.db";

#[derive(Parser)]
#[command(
    name = "portfoliox",
    version,
    about = "PortfolioX - portfolio analytics dashboard in the terminal"
)]
struct Cli {
    /// Directory holding the settings database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep settings in memory only; nothing is written to disk
    #[arg(long, global = true, default_value_t = false)]
    ephemeral: bool,

    /// Print view-models as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Totals over every portfolio plus recent activity
    Dashboard,
    /// Portfolio cards
    Portfolios,
    /// One portfolio's card
    Portfolio { id: i64 },
    /// Latest analysis of a portfolio
    Analytics {
        /// Portfolio id; without it the selection prompt is shown
        id: Option<i64>,
    },
    /// Ask the backend to analyze a portfolio
    Analyze {
        id: i64,

        /// Stay until the deferred analytics reload has run
        #[arg(long, default_value_t = false)]
        wait: bool,
    },
    /// Stored analysis history of a portfolio
    Performance {
        id: i64,

        /// 1m, 3m, 6m, 1y or all
        #[arg(long, default_value = "1y")]
        period: PerformancePeriod,
    },
    /// Recommendations from a portfolio's latest analysis
    Recommendations { id: i64 },
    /// Connection settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Probe the backend endpoints
    TestConnection,
    /// Forget stored connection settings
    Logout,
    /// Interactive session
    Shell,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the active settings (the token is never shown)
    Show,
    /// Validate and store new settings
    Save {
        #[arg(long)]
        base_url: String,

        #[arg(long)]
        token: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "portfoliox_cli=info,portfoliox_engine=info,portfoliox_networking=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn default_data_dir() -> PathBuf {
    dirs_next::data_local_dir()
        .map(|p| p.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn open_store(cli: &Cli) -> Result<Arc<dyn ConfigStore>> {
    if cli.ephemeral {
        tracing::info!("Using in-memory settings store");
        return Ok(Arc::new(MemoryConfigStore::new()));
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let key = derive_machine_key().context("Failed to derive machine encryption key")?;
    let cipher = SecretCipher::new(&key)?;
    let db_path = data_dir.join(DB_FILE_NAME);
    let db = Database::connect(&db_path)
        .await
        .with_context(|| format!("Failed to open settings database {}", db_path.display()))?;

    tracing::debug!("Settings database at {}", db_path.display());
    Ok(Arc::new(SqliteConfigStore::new(db, cipher)))
}

fn expect_applied(outcome: LoadOutcome, what: &str) -> Result<()> {
    match outcome {
        LoadOutcome::Failed => bail!("Failed to load {}", what),
        LoadOutcome::Applied | LoadOutcome::Stale => Ok(()),
    }
}

async fn run_command(session: &DashboardSession, command: Commands) -> Result<()> {
    match command {
        Commands::Dashboard => {
            expect_applied(session.navigate(Section::Dashboard).await, "dashboard")
        }
        Commands::Portfolios => {
            expect_applied(session.navigate(Section::Portfolios).await, "portfolios")
        }
        Commands::Portfolio { id } => {
            expect_applied(session.load_portfolio(id).await, "portfolio")
        }
        Commands::Analytics { id: Some(id) } => {
            expect_applied(session.select_portfolio(id).await, "analytics")
        }
        Commands::Analytics { id: None } => {
            expect_applied(session.navigate(Section::Analytics).await, "analytics")
        }
        Commands::Analyze { id, wait } => {
            session.select_portfolio(id).await;
            let handle = session.trigger_analysis().await?;
            if wait {
                handle.wait().await;
            } else {
                tracing::info!(
                    "Analysis requested for portfolio {}; run `portfoliox analytics {}` later for results",
                    handle.portfolio_id(),
                    handle.portfolio_id()
                );
            }
            Ok(())
        }
        Commands::Performance { id, period } => expect_applied(
            session.load_performance_for(id, period).await,
            "performance history",
        ),
        Commands::Recommendations { id } => expect_applied(
            session.load_recommendations(id).await,
            "recommendations",
        ),
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                session.navigate(Section::Settings).await;
                Ok(())
            }
            SettingsAction::Save { base_url, token } => {
                session
                    .save_settings(&base_url, token.as_deref().unwrap_or(""))
                    .await?;
                Ok(())
            }
        },
        Commands::TestConnection => {
            let report = session.test_connection().await;
            if !report.all_connected() {
                bail!(
                    "{} of {} endpoints unreachable",
                    report.failed().count(),
                    report.checks.len()
                );
            }
            Ok(())
        }
        Commands::Logout => {
            session.logout().await?;
            Ok(())
        }
        Commands::Shell => shell::run(session).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let store = open_store(&cli).await?;
    let settings = ClientSettings::default();
    let gateway = Arc::new(PortfolioXClient::new(ApiConfig::default(), &settings)?);
    let sink = Arc::new(TerminalSink::new(cli.json));
    let session = DashboardSession::new(gateway, sink, store, settings);

    match cli.command {
        Commands::Shell => {
            session.initialize().await;
            shell::run(&session).await
        }
        command => {
            session.restore_config().await;
            run_command(&session, command).await
        }
    }
}
