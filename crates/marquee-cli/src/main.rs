use clap::{ArgAction, Parser, Subcommand};
use media_acquire_config::PathManager;
use std::path::PathBuf;

mod app;
mod commands;
mod logging;
mod output;

use commands::{config, daemon, history, jobs, run};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "marquee - Keep your library stocked from trending, popular and upcoming lists")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler until interrupted
    #[command(long_about = "Schedule every configured list job (a media kind and list type with a cron expression and a non-zero quota) and run until Ctrl-C or SIGTERM. Each job runs once on startup unless --no-startup-run is given or [scheduler] run_on_startup is false.")]
    Daemon {
        /// Skip the initial run of every job
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_run: bool,

        /// Write logs to a daily-rotated file instead of stderr (default: logs/marquee.log)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        log_file: Option<Option<PathBuf>>,
    },
    /// Run one list job now
    #[command(long_about = "Fetch, filter and request one list outside the scheduler, then print the run report. Job keys look like movie-trending or show-popular.")]
    Run {
        /// Job key, e.g. movie-anticipated
        #[arg(value_name = "JOB_KEY")]
        job: String,
    },
    /// List configured jobs
    Jobs,
    /// Show recently acquired items
    History {
        /// Number of entries to show
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: usize,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks API keys)
    Show {
        /// Show API keys in full
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Print the configuration file path
    Path,
    /// Check the configuration for errors
    Validate,
    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file without asking
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

/// Only the daemon logs to a file; a bare `--log-file` picks the default location
fn log_file_for(command: &Commands, default: impl FnOnce() -> PathBuf) -> Option<PathBuf> {
    match command {
        Commands::Daemon {
            log_file: Some(path),
            ..
        } => Some(path.clone().unwrap_or_else(default)),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = log_file_for(&cli.command, || PathManager::default().daemon_log_file());
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Daemon { no_startup_run, .. } => {
            daemon::run_daemon(no_startup_run, &output).await
        }
        Commands::Run { job } => run::run_job(&job, &output).await,
        Commands::Jobs => jobs::list_jobs(&output),
        Commands::History { limit } => history::show_history(limit, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output),
    }
}
