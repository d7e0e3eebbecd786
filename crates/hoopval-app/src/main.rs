// hoopval entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config
// 4. Load and merge both datasets
// 5. Run the requested command and print its report

use hoopval_app::commands::{self, Lookup};
use hoopval_app::session::{LoadState, Session};
use hoopval_core::config;
use hoopval_core::valuation::Assumptions;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "hoopval")]
#[command(about = "Player valuation and contract evaluation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find players by name
    Search {
        query: String,

        /// Maximum number of rows to print
        #[arg(short, long, default_value_t = 12)]
        limit: usize,
    },

    /// Value one player and project their contract
    Value {
        /// Player id or name
        query: String,

        /// Treat the query as an exact player id
        #[arg(long)]
        id: bool,

        #[command(flatten)]
        assumptions: AssumptionArgs,

        /// Print JSON instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Compare one player against one or more others
    Compare {
        first: String,

        #[arg(required = true)]
        others: Vec<String>,

        #[command(flatten)]
        assumptions: AssumptionArgs,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct AssumptionArgs {
    /// Games played
    #[arg(long, default_value_t = 70)]
    games: u32,

    /// Minutes per game
    #[arg(long, default_value_t = 30)]
    minutes: u32,

    /// Added to the impact score for production value
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    adjustment: f64,
}

impl AssumptionArgs {
    fn to_assumptions(&self) -> anyhow::Result<Assumptions> {
        Assumptions::new(self.games, self.minutes, self.adjustment).context("invalid assumptions")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing()?;
    info!("hoopval starting up");

    // 3. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: ${} salary cap, {} tiers, data from {} and {}",
        config.model.league.salary_cap,
        config.model.tiers.len(),
        config.data_paths.performance,
        config.data_paths.salaries
    );

    // 4. Load datasets
    let session = Session::load(config).await;
    if let LoadState::Failed(message) = session.state() {
        error!("Startup aborted: {}", message);
        anyhow::bail!("failed to load player data: {message}");
    }

    // 5. Run command
    let output = match &cli.command {
        Command::Search { query, limit } => commands::search(&session, query, *limit)?,
        Command::Value {
            query,
            id,
            assumptions,
            json,
        } => {
            let lookup = if *id { Lookup::Id } else { Lookup::Text };
            commands::value(&session, query, lookup, &assumptions.to_assumptions()?, *json)?
        }
        Command::Compare {
            first,
            others,
            assumptions,
            json,
        } => commands::compare(&session, first, others, &assumptions.to_assumptions()?, *json)?,
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("hoopval.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hoopval_core=info,hoopval_app=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
