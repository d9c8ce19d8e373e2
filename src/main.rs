use anyhow::Result;
use clap::Parser;
use pipdeps::commands::{check, plan_delete, refresh};
use pipdeps::provider::PipSource;
use pipdeps::runtime::RealRuntime;
use std::path::PathBuf;

/// pipdeps - pip dependency bookkeeping
///
/// Snapshots the dependency graph of the installed packages and answers
/// which of them could be removed without breaking the rest.
///
/// Examples:
///   pipdeps refresh              # rebuild ./requirements.json
///   pipdeps check                # what did I install directly?
///   pipdeps plan-delete requests # what could go along with requests?
#[derive(Parser, Debug)]
#[command(author, version = env!("PIPDEPS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Snapshot file (defaults to ./requirements.json; also via PIPDEPS_SNAPSHOT)
    #[arg(
        long = "snapshot",
        short = 's',
        env = "PIPDEPS_SNAPSHOT",
        value_name = "PATH",
        global = true
    )]
    snapshot: Option<PathBuf>,

    /// pip executable used to query installed packages (also via PIPDEPS_PIP)
    #[arg(
        long = "pip",
        env = "PIPDEPS_PIP",
        value_name = "COMMAND",
        global = true,
        default_value = "pip"
    )]
    pip: String,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Rebuild the snapshot from the currently installed packages
    Refresh(RefreshArgs),

    /// Show what could be removed together with the given package
    PlanDelete(PlanDeleteArgs),

    /// List packages that nothing else depends on
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
struct RefreshArgs {}

#[derive(clap::Args, Debug)]
struct PlanDeleteArgs {
    /// The package to plan removal for
    #[arg(value_name = "PACKAGE")]
    package: String,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    match cli.command {
        Commands::Refresh(_args) => {
            let source = PipSource::new(cli.pip);
            refresh(&runtime, &source, cli.snapshot).await
        }
        Commands::PlanDelete(args) => plan_delete(&runtime, &args.package, cli.snapshot),
        Commands::Check(_args) => check(&runtime, cli.snapshot),
    }
}
