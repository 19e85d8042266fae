mod diff;
mod migrate;
mod recipes;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use meal_planner_store::StoreConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meal-planner")]
#[command(about = "Meal planner database and recipe tools", long_about = None)]
struct Cli {
    /// SQLite database file (default: $MEAL_PLANNER_DB_PATH or data/meal_planner.db)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply, revert or inspect schema migrations
    Migrate {
        #[command(subcommand)]
        command: MigrateCommand,
    },
    /// Inspect or clear stored recipes
    Recipes {
        #[command(subcommand)]
        command: RecipesCommand,
    },
    /// Show the line diff between two recipes (Markdown, or JSON recipe drafts)
    Diff {
        before: PathBuf,
        after: PathBuf,
        /// Print the HTML review panel instead of a plain diff
        #[arg(long)]
        html: bool,
    },
}

#[derive(Subcommand)]
enum MigrateCommand {
    /// Upgrade to the head revision, or to --to
    Up {
        #[arg(long)]
        to: Option<String>,
    },
    /// Downgrade to --to, or remove everything with --base
    Down {
        #[arg(long, conflicts_with = "base", required_unless_present = "base")]
        to: Option<String>,
        #[arg(long)]
        base: bool,
    },
    /// Print the current revision
    Current,
    /// List all revisions in apply order
    History,
}

#[derive(Subcommand)]
enum RecipesCommand {
    /// Print every recipe row as stored
    Show,
    /// List recipes with their yields
    List,
    /// Report rows with non-UUID ids, missing timestamps or malformed lists
    Check,
    /// Delete every recipe
    DeleteAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn init_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn store_config(database: Option<PathBuf>) -> Result<StoreConfig> {
    let mut config = StoreConfig::from_env()?;
    if let Some(path) = database {
        config.database_path = path;
    }
    tracing::debug!(database = %config.database_path.display(), "Using database");
    Ok(config)
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { command } => {
            let config = store_config(cli.database)?;
            match command {
                MigrateCommand::Up { to } => migrate::up(&config, to.as_deref())?,
                MigrateCommand::Down { to, base } => {
                    migrate::down(&config, if base { None } else { to.as_deref() })?
                }
                MigrateCommand::Current => migrate::current(&config)?,
                MigrateCommand::History => migrate::history(&config)?,
            }
        }
        Commands::Recipes { command } => {
            let config = store_config(cli.database)?;
            match command {
                RecipesCommand::Show => recipes::show(&config)?,
                RecipesCommand::List => recipes::list(&config)?,
                RecipesCommand::Check => recipes::check(&config)?,
                RecipesCommand::DeleteAll { yes } => recipes::delete_all(&config, yes)?,
            }
        }
        Commands::Diff {
            before,
            after,
            html,
        } => {
            print!("{}", diff::run(&before, &after, html)?);
        }
    }

    Ok(())
}
