//! bandtrack CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use bandtrack_core::config::load_config_from;

mod commands;

#[derive(Parser)]
#[command(
    name = "bandtrack",
    version,
    about = "Practice-test tracker for the IELTS Cambridge library"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Without a subcommand, show the view used last
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the countdown to the next test
    Status,

    /// Show the library, or the tests of one book
    Books {
        /// Book number (5-20)
        book: Option<u32>,
    },

    /// List tests with their planned dates
    Schedule {
        /// Include completed tests
        #[arg(long)]
        all: bool,
    },

    /// Record scores for a test, e.g. `bandtrack score b5-t1 ...`
    Score {
        /// Test id (b<book>-t<test>)
        id: String,

        /// Listening correct answers (0-40)
        #[arg(long)]
        listening: String,

        /// Reading correct answers (0-40)
        #[arg(long)]
        reading: String,

        /// Writing task 1 band (0-9, steps of 0.5)
        #[arg(long)]
        task1: String,

        /// Writing task 2 band (0-9, steps of 0.5)
        #[arg(long)]
        task2: String,
    },

    /// Mark a test's mistakes as reviewed, or unmark them
    Resolve {
        /// Test id (b<book>-t<test>)
        id: String,
    },

    /// Show band averages, targets and progression
    Stats,

    /// Write a self-contained HTML progress report
    Report {
        /// Output file
        #[arg(long, default_value = "bandtrack-report.html")]
        output: PathBuf,
    },

    /// Write a JSON backup of all progress
    Export {
        /// Output file (default: ielts_tracker_backup_<date>.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Replace all progress with a JSON backup
    Import {
        /// Backup file
        file: PathBuf,
    },

    /// Erase all progress and restart the schedule from today
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Keep the countdown on screen, refreshing periodically
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Create a starter bandtrack.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bandtrack=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // init must work next to a broken config file.
    if let Some(Commands::Init) = cli.command {
        return commands::init::execute();
    }

    let config = load_config_from(cli.config.as_deref())?;
    let mut tracker = commands::open_tracker(&config);

    match cli.command {
        None => commands::resume::execute(&tracker, &config),
        Some(Commands::Status) => commands::status::execute(&tracker),
        Some(Commands::Books { book }) => commands::books::execute(&mut tracker, book),
        Some(Commands::Schedule { all }) => commands::schedule::execute(&tracker, all),
        Some(Commands::Score {
            id,
            listening,
            reading,
            task1,
            task2,
        }) => commands::score::execute(&mut tracker, &id, &listening, &reading, &task1, &task2),
        Some(Commands::Resolve { id }) => commands::resolve::execute(&mut tracker, &id),
        Some(Commands::Stats) => commands::stats::execute(&mut tracker, &config),
        Some(Commands::Report { output }) => commands::report::execute(&tracker, &config, output),
        Some(Commands::Export { output }) => commands::export::execute(&tracker, output),
        Some(Commands::Import { file }) => commands::import::execute(&mut tracker, file),
        Some(Commands::Reset { yes }) => commands::reset::execute(&mut tracker, yes),
        Some(Commands::Watch { ticks }) => commands::watch::execute(&tracker, &config, ticks).await,
        Some(Commands::Init) => commands::init::execute(),
    }
}
