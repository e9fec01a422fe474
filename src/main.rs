use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use lotoforge::archive::HistoricalArchive;
use lotoforge::consts::DEFAULT_SIMULATED_DRAWS;
use lotoforge::error::LfResult;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Draw history as JSON (`{"1": [..]}`) or CSV (`contest,n1,..,n20`)
    #[arg(global = true, short, long)]
    archive: Option<String>,

    /// Use a simulated history when no archive file is given
    #[arg(global = true, long, num_args = 0..=1, value_name = "DRAWS")]
    simulate: Option<Option<usize>>,

    #[arg(global = true, short = 'S', long)]
    seed: Option<u64>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate tickets with one of the four strategies
    Generate(cmd::generate::GenerateArgs),
    /// Frequency, delay and feature statistics of the archive
    Analyze(cmd::analyze::AnalyzeArgs),
    /// Exact probability of every hit count
    Odds,
    /// Compare a ticket against the archive
    Check(cmd::check::CheckArgs),
}

fn load_archive(cli: &Cli) -> LfResult<HistoricalArchive> {
    if let Some(path) = &cli.archive {
        info!("📂 Loading archive: {}", path);
        return HistoricalArchive::load_from_file(path);
    }
    if let Some(n) = cli.simulate {
        let n = n.filter(|&n| n > 0).unwrap_or(DEFAULT_SIMULATED_DRAWS);
        warn!("⚠️  No archive file given. Using {} simulated draws.", n);
        return Ok(HistoricalArchive::simulate(n, cli.seed));
    }
    Ok(HistoricalArchive::new())
}

fn main() {
    // Parse raw matches first so explicit flags can be told apart from defaults.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let archive = load_archive(&cli).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });
    if archive.is_empty() {
        info!("No draw history loaded; history-based features are unavailable.");
    }

    let result = match &cli.command {
        Commands::Generate(args) => {
            let sub_matches = matches
                .subcommand_matches("generate")
                .unwrap_or(&matches);
            cmd::generate::run(args, &archive, cli.seed, sub_matches)
        }
        Commands::Analyze(args) => cmd::analyze::run(args, &archive),
        Commands::Odds => cmd::odds::run(),
        Commands::Check(args) => cmd::check::run(args, &archive),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
