use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "billfetch")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Drive an LLM-backed browser agent through a table of site login/download tasks",
    long_about = "Billfetch reads a CSV of sites with credentials and a per-site instruction, \
                  logs into each site with an LLM-driven browser agent, performs the instruction \
                  (typically downloading a bill), and writes a per-site Success/Failed table."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: read, validate, process every row, write results
    Run {
        /// Base directory holding input/ and output/
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Run identifier scoping the output subdirectory; generated when omitted
        #[arg(long)]
        run_id: Option<String>,

        /// Agent step budget per site
        #[arg(long, default_value_t = billfetch_agent::DEFAULT_MAX_STEPS)]
        max_steps: usize,

        /// Chat model driving the agent
        #[arg(long, env = "OPENAI_MODEL", default_value = billfetch_agent::DEFAULT_MODEL)]
        model: String,
    },

    /// Validate an input table without running any tasks
    Check {
        /// Path to the input CSV
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Run {
            dir,
            run_id,
            max_steps,
            model,
        } => commands::run::execute(&dir, run_id, max_steps, &model).await,
        Commands::Check { file } => commands::check::execute(&file),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("billfetch=debug,billfetch_core=debug,billfetch_agent=debug")
    } else {
        EnvFilter::new("billfetch=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
