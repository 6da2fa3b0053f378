mod config;
mod label_cmds;
mod note_cmds;
mod plan_cmds;
mod serve_cmd;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use daybook_store::JsonStore;

use config::DaybookConfig;

#[derive(Parser)]
#[command(name = "daybook", about = "Calendar notes with generated weekly plans")]
struct Cli {
    /// Data directory holding notes.json and labels.json (overrides DAYBOOK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a daybook config file
    Init {
        /// Oracle API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
        /// Seed the data directory with a few example notes
        #[arg(long)]
        sample_data: bool,
    },
    /// Start the HTTP server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Generate a plan for the next seven days and save it
    Plan {
        /// What the week should work towards (e.g. "prepare for the exam")
        goal: String,
    },
    /// Ask a question about the saved schedule
    Ask {
        question: String,
    },
    /// Parse a saved oracle reply and show how it maps onto this week (nothing is saved)
    Parse {
        /// Path to a text file holding the reply
        file: PathBuf,
    },
    /// Show note statistics
    Stats,
    /// Show the current seven-day window with its notes
    Week,
    /// Note management
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Date label management
    Label {
        #[command(subcommand)]
        command: LabelCommands,
    },
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Append a note to a date
    Add {
        /// Date as YYYY-MM-DD
        date: String,
        content: String,
    },
    /// List notes (all, or one month)
    List {
        #[arg(long, requires = "month")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        month: Option<u32>,
    },
    /// Delete one note, a whole date, or an inclusive date range
    Delete {
        /// Date as YYYY-MM-DD
        date: String,
        /// Zero-based index of the note to delete (omit to delete the date)
        #[arg(long, conflicts_with = "to")]
        index: Option<usize>,
        /// Last date of a range to delete, inclusive
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LabelCommands {
    /// Set the label of a date (creates or replaces it)
    Set {
        /// Date as YYYY-MM-DD
        date: String,
        /// Label text (ignored with --important)
        #[arg(required_unless_present = "important")]
        label: Option<String>,
        /// Hex color such as #ff6b6b
        #[arg(long)]
        color: Option<String>,
        /// Mark the date as an important deadline
        #[arg(long, conflicts_with = "color")]
        important: bool,
    },
    /// Delete the label of a date
    Delete {
        date: String,
        /// Only remove an important-deadline marking
        #[arg(long)]
        important: bool,
    },
    /// List labels (all, or one month)
    List {
        #[arg(long, requires = "month")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        month: Option<u32>,
    },
}

fn cmd_init(
    api_key: Option<String>,
    force: bool,
    sample_data: bool,
    cli_data_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let has_key = api_key.is_some();
    let cfg = config::ConfigFile {
        storage: config::StorageSection {
            data_dir: cli_data_dir.clone(),
        },
        oracle: config::OracleSection {
            api_key,
            ..Default::default()
        },
    };
    config::save_config_to(&cfg, &path)?;

    println!("Config written to {}", path.display());
    if let Some(dir) = &cli_data_dir {
        println!("  storage.data_dir = {}", dir.display());
    }
    if has_key {
        println!("  oracle.api_key = (set)");
    } else {
        println!("  oracle.api_key not set; plans and categories will use fallbacks.");
    }

    if sample_data {
        let resolved = DaybookConfig::resolve(cli_data_dir.as_deref())?;
        let store = open_store(&resolved)?;
        let today = chrono::Local::now().date_naive();
        if note_cmds::seed_sample_notes(&store, today)? {
            println!("Sample notes written to {}", store.notes_path().display());
        } else {
            println!("{} already exists; sample notes skipped.", store.notes_path().display());
        }
    }

    println!();
    println!("Next: run `daybook serve` and open http://127.0.0.1:5000");

    Ok(())
}

fn open_store(resolved: &DaybookConfig) -> anyhow::Result<JsonStore> {
    JsonStore::open(&resolved.store_config).with_context(|| {
        format!(
            "failed to open data directory {}",
            resolved.store_config.data_dir.display()
        )
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            api_key,
            force,
            sample_data,
        } => cmd_init(api_key, force, sample_data, cli.data_dir),
        command => run_command(command, cli.data_dir.as_deref()).await,
    }
}

async fn run_command(command: Commands, cli_data_dir: Option<&Path>) -> anyhow::Result<()> {
    let resolved = DaybookConfig::resolve(cli_data_dir)?;
    let store = open_store(&resolved)?;

    match command {
        Commands::Init { .. } => anyhow::bail!("init does not use the data directory"),
        Commands::Serve { bind, port } => {
            let oracle = resolved.build_oracle()?;
            let state = serve_cmd::AppState::new(store, oracle);
            serve_cmd::run_serve(state, &bind, port).await?;
        }
        Commands::Plan { goal } => {
            let oracle = resolved.build_oracle()?;
            plan_cmds::cmd_plan(&store, oracle, &goal).await?;
        }
        Commands::Ask { question } => {
            let oracle = resolved.build_oracle()?;
            plan_cmds::cmd_ask(&store, oracle.as_ref(), &question).await?;
        }
        Commands::Parse { file } => {
            plan_cmds::cmd_parse(&file)?;
        }
        Commands::Stats => {
            plan_cmds::cmd_stats(&store)?;
        }
        Commands::Week => {
            plan_cmds::cmd_week(&store)?;
        }
        Commands::Note { command } => {
            note_cmds::run_note_command(command, &store)?;
        }
        Commands::Label { command } => {
            label_cmds::run_label_command(command, &store)?;
        }
    }

    Ok(())
}
