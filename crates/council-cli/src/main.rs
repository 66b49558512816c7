mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use council_core::CouncilError;
use std::path::PathBuf;

/// Exit code when no pulse exists yet.
const EXIT_NO_PULSE: i32 = 2;
/// Exit code when the run finished but a role or the synthesis degraded.
const EXIT_DEGRADED: i32 = 3;

#[derive(Parser)]
#[command(
    name = "council",
    about = "Capture a daily pulse and run it past a council of advisory roles",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from context/)
    #[arg(long, global = true, env = "COUNCIL_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold directories, agent config and default prompt templates
    Init,

    /// Answer today's pulse questions
    Pulse,

    /// Run today's council: one-on-ones with each role, then the directive
    Run {
        /// Ask every role for a structured analysis instead of conversing
        #[arg(long)]
        batch: bool,
    },

    /// List roles and whether they are enabled
    Roles,
}

/// How a command finished, when it did not fail outright.
pub enum Outcome {
    Done,
    Degraded,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run { .. } | Commands::Pulse => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Pulse => cmd::pulse::run(&root, cli.json),
        Commands::Run { batch } => cmd::run::run(&root, batch, cli.json),
        Commands::Roles => cmd::roles::run(&root, cli.json),
    };

    match result {
        Ok(Outcome::Done) => {}
        Ok(Outcome::Degraded) => std::process::exit(EXIT_DEGRADED),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            let no_pulse = e
                .chain()
                .any(|cause| matches!(cause.downcast_ref::<CouncilError>(), Some(CouncilError::PulseNotFound { .. })));
            std::process::exit(if no_pulse { EXIT_NO_PULSE } else { 1 });
        }
    }
}
