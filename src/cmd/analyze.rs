use crate::reports;
use clap::Args;
use lotoforge::analysis::{frequencies_and_delays, historical_statistics};
use lotoforge::archive::HistoricalArchive;
use lotoforge::config::BalanceCriteria;
use lotoforge::consts::DEFAULT_STATS_WINDOW;
use lotoforge::error::{LfResult, LotoError};
use serde_json::json;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Rows in the hot / cold / delay tables
    #[arg(short, long, default_value_t = 20)]
    pub top: usize,

    /// Recent draws used for feature statistics
    #[arg(long, default_value_t = DEFAULT_STATS_WINDOW)]
    pub window: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &AnalyzeArgs, archive: &HistoricalArchive) -> LfResult<()> {
    if archive.is_empty() {
        return Err(LotoError::NoData(
            "analysis needs a draw history (use --archive or --simulate)".into(),
        ));
    }

    let draws = archive.draws();
    let (freq, delay) = frequencies_and_delays(&draws);
    let stats = historical_statistics(&archive.recent(args.window));
    let suggested = BalanceCriteria::suggested(&stats)?;

    if args.json {
        let report = json!({
            "draws": draws.len(),
            "latest_contest": archive.latest_contest(),
            "frequencies": freq.iter().map(|(_, c)| c).collect::<Vec<u32>>(),
            "delays": delay.iter().map(|(_, d)| d).collect::<Vec<u32>>(),
            "statistics": stats,
            "suggested_criteria": suggested,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "\n📚 {} draws analysed (latest contest: {})",
        draws.len(),
        archive
            .latest_contest()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".into())
    );
    reports::print_frequency_report(&freq, &delay, args.top);
    reports::print_statistics(&stats);
    println!("\nSuggested balance criteria:");
    reports::print_criteria(&suggested);
    Ok(())
}
