use crate::reports;
use lotoforge::combinatorics::{binomial, hit_distribution};
use lotoforge::consts::{DRAW_SIZE, TICKET_SIZE, UNIVERSE};
use lotoforge::error::LfResult;

pub fn run() -> LfResult<()> {
    println!(
        "\n🎯 Hit probabilities for a {}-number ticket ({} combinations of {} drawn)",
        TICKET_SIZE,
        binomial(UNIVERSE as u64, DRAW_SIZE as i64),
        DRAW_SIZE
    );
    reports::print_odds(&hit_distribution());
    Ok(())
}
