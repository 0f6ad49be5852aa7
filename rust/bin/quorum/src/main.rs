//! `quorum`: inspect a forum database from the command line.
//!
//! Usage:
//!   quorum [--config quorum.toml] [--data-dir DIR | --sqlite FILE] <command>

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use quorum_core::ServiceConfig;
use quorum_orm::Db;
use tracing::info;

/// Forum database tool.
#[derive(Parser, Debug)]
#[command(name = "quorum", about = "Query the Q&A forum database")]
struct Cli {
    /// Path to config file (TOML). Missing file means defaults.
    #[arg(long = "config", global = true, default_value = "quorum.toml")]
    config: PathBuf,

    /// Directory holding questions.db.
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Explicit SQLite file (overrides --data-dir).
    #[arg(long = "sqlite", global = true)]
    sqlite: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long = "log", global = true)]
    log: Option<String>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Output::Text)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the forum tables if missing.
    Init,

    /// Show a user with their questions and karma.
    User { id: i64 },

    /// Show a question with its author, likes and followers.
    Question { id: i64 },

    /// Most liked questions.
    TopLiked {
        #[arg(default_value_t = 10)]
        n: usize,
    },

    /// Most followed questions.
    TopFollowed {
        #[arg(default_value_t = 10)]
        n: usize,
    },

    /// Average karma of a user.
    Karma { user_id: i64 },

    /// Print the reply tree of a question.
    Thread { question_id: i64 },

    /// Run a dynamic finder, e.g. `find users find_by_fname_and_lname Ada Lovelace`.
    Find {
        /// Table: users, questions, replies, question_follows, question_likes.
        entity: String,
        /// Finder name, `find_by_<attr>[_and_<attr>...]`.
        finder: String,
        /// One argument per attribute. Integers and `null` are typed.
        args: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ServiceConfig::load(&cli.config)?.with_overrides(
        cli.data_dir.clone(),
        cli.sqlite.clone(),
        cli.log.clone(),
    );

    // Initialize logging.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.as_str().into()),
        )
        .init();

    let db_path = config.resolve_sqlite_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    info!("Opening {}", db_path.display());
    let db: Db = Arc::new(
        quorum_sql::SqliteStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    let out = cli.output;
    let rendered = match cli.command {
        Commands::Init => commands::init(&db)?,
        Commands::User { id } => commands::user(&db, id, out)?,
        Commands::Question { id } => commands::question(&db, id, out)?,
        Commands::TopLiked { n } => commands::top_liked(&db, n, out)?,
        Commands::TopFollowed { n } => commands::top_followed(&db, n, out)?,
        Commands::Karma { user_id } => commands::karma(&db, user_id, out)?,
        Commands::Thread { question_id } => commands::thread(&db, question_id, out)?,
        Commands::Find {
            entity,
            finder,
            args,
        } => commands::find(&db, &entity, &finder, &args, out)?,
    };
    println!("{rendered}");

    Ok(())
}
