use crate::reports;
use clap::{ArgMatches, Args, ValueEnum};
use lotoforge::analysis::{frequencies_and_delays, historical_statistics};
use lotoforge::archive::HistoricalArchive;
use lotoforge::config::{parse_number_list, BalanceCriteria, Config};
use lotoforge::consts::DEFAULT_STATS_WINDOW;
use lotoforge::error::{LfResult, LotoError};
use lotoforge::generator::balanced::{
    overall_percent, BalancedSearch, BatchOutcome, CancellationToken, SearchOptions,
};
use lotoforge::generator::{generate_filtered, generate_random, generate_weighted, FilterSet};
use lotoforge::types::Ticket;
use std::thread;
use std::time::{Duration, Instant};
use strum_macros::Display;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    Random,
    Weighted,
    Filtered,
    Balanced,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_enum)]
    pub strategy: Strategy,

    #[command(flatten)]
    pub config: Config,

    /// Numbers every filtered ticket must contain, e.g. "1,5,42"
    #[arg(long)]
    pub include: Option<String>,

    /// Numbers no filtered ticket may contain
    #[arg(long)]
    pub exclude: Option<String>,

    /// JSON file with balance criteria; explicit flags override it
    #[arg(long, conflicts_with = "suggest")]
    pub criteria_file: Option<String>,

    /// Derive balance ranges from the archive's recent draws
    #[arg(long, default_value_t = false)]
    pub suggest: bool,

    /// Draws used for suggested ranges
    #[arg(long, default_value_t = DEFAULT_STATS_WINDOW)]
    pub window: usize,

    /// Cancel balanced generation after this many seconds
    #[arg(short = 'T', long)]
    pub timeout: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(
    args: &GenerateArgs,
    archive: &HistoricalArchive,
    seed: Option<u64>,
    matches: &ArgMatches,
) -> LfResult<()> {
    args.config.generation.validate()?;
    let count = args.config.generation.count;
    let mut rng = match seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    };

    info!("🎲 Generating {} ticket(s) with the {} strategy", count, args.strategy);
    let start = Instant::now();

    let tickets = match args.strategy {
        Strategy::Random => generate_random(&mut rng, count),
        Strategy::Weighted => {
            let (freq, _) = frequencies_and_delays(&archive.draws());
            generate_weighted(&mut rng, &freq, count, args.config.generation.pool_size)?
        }
        Strategy::Filtered => {
            let include = parse_number_list(args.include.as_deref().unwrap_or(""), "include")?;
            let exclude = parse_number_list(args.exclude.as_deref().unwrap_or(""), "exclude")?;
            let filters = FilterSet::new(&mut rng, &include, &exclude)?;
            generate_filtered(&mut rng, &filters, count)?
        }
        Strategy::Balanced => {
            let criteria = resolve_criteria(args, archive, matches)?;
            match run_balanced(args, criteria, seed.map(|s| s.wrapping_add(1)), count)? {
                Some(tickets) => tickets,
                None => {
                    warn!("🛑 Generation cancelled. No tickets were produced.");
                    return Ok(());
                }
            }
        }
    };

    let elapsed = start.elapsed();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tickets)?);
    } else {
        reports::print_tickets(&tickets);
        println!("Generated {} ticket(s) in {:.3}s", tickets.len(), elapsed.as_secs_f32());
    }
    Ok(())
}

fn resolve_criteria(
    args: &GenerateArgs,
    archive: &HistoricalArchive,
    matches: &ArgMatches,
) -> LfResult<BalanceCriteria> {
    let mut criteria = match &args.criteria_file {
        Some(path) => {
            info!("⚖️  Loading criteria from: {}", path);
            BalanceCriteria::load_from_file(path)?
        }
        None => args.config.criteria.clone(),
    };

    if args.suggest {
        if archive.is_empty() {
            return Err(LotoError::NoData(
                "suggested criteria need a draw history (use --archive or --simulate)".into(),
            ));
        }
        let stats = historical_statistics(&archive.recent(args.window));
        criteria = BalanceCriteria::suggested(&stats)?;
        info!("📊 Ranges suggested from the last {} draws", stats.samples);
    }

    if args.criteria_file.is_some() || args.suggest {
        criteria.merge_from_cli(&args.config.criteria, matches);
    }
    criteria.validate()?;
    if !args.json {
        reports::print_criteria(&criteria);
    }
    Ok(criteria)
}

/// Runs the balanced batch on a worker thread. `None` means cancelled.
fn run_balanced(
    args: &GenerateArgs,
    criteria: BalanceCriteria,
    seed: Option<u64>,
    count: usize,
) -> LfResult<Option<Vec<Ticket>>> {
    args.config.search.validate()?;
    let search = BalancedSearch::new(
        criteria,
        SearchOptions::from(&args.config.search),
        CancellationToken::new(),
    )?;
    let token = search.cancellation_token();

    let handle = search.spawn(
        seed,
        count,
        |index: usize, total: usize, attempt: usize, budget: usize| {
            eprint!(
                "\r⏳ {:5.1}% | ticket {}/{} | attempt {}/{}   ",
                overall_percent(index, total, attempt, budget),
                index + 1,
                total,
                attempt,
                budget
            );
        },
    );

    let limit = args.timeout.map(Duration::from_secs);
    let start = Instant::now();
    while !handle.is_finished() {
        if let Some(limit) = limit {
            if start.elapsed() >= limit && !token.is_cancelled() {
                warn!("⏱️  Time limit of {}s reached, cancelling", limit.as_secs());
                token.cancel();
            }
        }
        thread::sleep(Duration::from_millis(20));
    }
    eprintln!();

    let outcome = handle
        .join()
        .map_err(|_| LotoError::Worker("balanced search thread panicked".into()))?;

    match outcome {
        BatchOutcome::Completed(batch) => {
            if !batch.fallbacks.is_empty() {
                warn!(
                    "{} of {} ticket(s) fell back to random combinations",
                    batch.fallbacks.len(),
                    count
                );
            }
            if !args.json {
                reports::print_batch_summary(&batch);
            }
            Ok(Some(batch.tickets))
        }
        BatchOutcome::Cancelled => Ok(None),
    }
}
