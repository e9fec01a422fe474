use crate::reports;
use clap::Args;
use lotoforge::analysis::{count_hits, hit_histogram};
use lotoforge::archive::HistoricalArchive;
use lotoforge::config::parse_number_list;
use lotoforge::error::{LfResult, LotoError};
use lotoforge::types::Ticket;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// The 50 ticket numbers, comma separated
    #[arg(short, long)]
    pub ticket: String,

    /// Contest to compare against (defaults to the latest)
    #[arg(short, long)]
    pub contest: Option<u32>,
}

pub fn run(args: &CheckArgs, archive: &HistoricalArchive) -> LfResult<()> {
    let numbers = parse_number_list(&args.ticket, "ticket")?;
    let ticket = Ticket::new(&numbers)?;

    if archive.is_empty() {
        return Err(LotoError::NoData(
            "checking a ticket needs a draw history (use --archive or --simulate)".into(),
        ));
    }

    let contest = match args.contest.or_else(|| archive.latest_contest()) {
        Some(c) => c,
        None => return Err(LotoError::NoData("archive has no contests".into())),
    };
    let draw = archive.get(contest).ok_or_else(|| {
        LotoError::validation("contest", format!("contest {} is not in the archive", contest))
    })?;

    println!("\nContest {}: {} hit(s)", contest, count_hits(&ticket, draw));

    let hist = hit_histogram(&ticket, &archive.draws());
    reports::print_hit_histogram(&hist, archive.len());
    Ok(())
}
