mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, service::ServiceSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "los",
    about = "Little-Oven Setup: provision a Raspberry Pi one resumable step at a time",
    version,
    propagate_version = true
)]
struct Cli {
    /// Working root holding los.step, los.yaml and los.json
    /// (default: nearest directory with los.yaml, else the current directory)
    #[arg(long, global = true, env = "LOS_ROOT")]
    root: Option<PathBuf>,

    /// Override the base URL the global configuration is fetched from
    #[arg(long, global = true, env = "LOS_BASE_URL")]
    base_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run steps from the checkpoint until a reboot or completion (default)
    Run {
        /// Print what would be done; the checkpoint is not advanced
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the current step
    Status,

    /// List every step
    Steps,

    /// Remove the checkpoint so the next run starts at step 1
    Reset,

    /// Inspect and validate los.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Install or disable the boot-time service
    Service {
        #[command(subcommand)]
        subcommand: ServiceSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run { dry_run: false });

    let default_level = match &command {
        Commands::Run { .. } | Commands::Service { .. } => tracing::Level::INFO,
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
    let base_url = cli.base_url.as_deref();

    let result = match command {
        Commands::Run { dry_run } => cmd::run::run(&root, base_url, dry_run, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Steps => cmd::steps::run(&root, cli.json),
        Commands::Reset => cmd::reset::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, base_url, subcommand, cli.json),
        Commands::Service { subcommand } => cmd::service::run(&root, subcommand),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
