use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use lotoforge::analysis::HistoricalStatistics;
use lotoforge::config::BalanceCriteria;
use lotoforge::consts::{DRAW_SIZE, GRID_WIDTH, PRIZE_TIERS};
use lotoforge::features::{longest_run, Feature, Features};
use lotoforge::generator::balanced::BalancedBatch;
use lotoforge::types::{DelayTable, FrequencyTable, Ticket};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, columns: std::ops::Range<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Prints each ticket as rows of ten two-digit numbers, followed by its features.
pub fn print_tickets(tickets: &[Ticket]) {
    for (i, ticket) in tickets.iter().enumerate() {
        let mut table = new_table();
        for row in ticket.numbers().chunks(GRID_WIDTH) {
            table.add_row(row.iter().map(|n| Cell::new(format!("{:02}", n))));
        }

        let f = Features::of(ticket.numbers());
        println!("\n🎫 Ticket {}", i + 1);
        println!("{}", table);
        println!(
            "   sum {} | even {} | odd {} | frame {} | core {} | prime {} | run {}",
            f.sum,
            f.even,
            f.odd,
            f.frame,
            f.core,
            f.prime,
            longest_run(ticket.numbers())
        );
    }
    println!();
}

pub fn print_criteria(criteria: &BalanceCriteria) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Min").add_attribute(Attribute::Bold),
        Cell::new("Max").add_attribute(Attribute::Bold),
    ]);
    for feature in Feature::iter() {
        let (lo, hi) = criteria.range(feature);
        table.add_row(vec![
            Cell::new(feature.to_string()),
            Cell::new(lo),
            Cell::new(hi),
        ]);
    }
    table.add_row(vec![
        Cell::new("max_consecutive"),
        Cell::new("-"),
        Cell::new(criteria.max_consecutive),
    ]);
    align_right(&mut table, 1..3);
    println!("{}", table);
}

pub fn print_batch_summary(batch: &BalancedBatch) {
    println!(
        "\n⚖️  {} ticket(s) after {} attempt(s), {} random fallback(s)",
        batch.tickets.len(),
        batch.attempts,
        batch.fallbacks.len()
    );
    for w in &batch.warnings {
        println!(
            "   ticket {}: no match in {} attempts",
            w.ticket_index + 1,
            w.attempts
        );
    }
    let hidden = batch.fallbacks.len().saturating_sub(batch.warnings.len());
    if hidden > 0 {
        println!("   ... and {} more", hidden);
    }
}

pub fn print_frequency_report(freq: &FrequencyTable, delay: &DelayTable, top: usize) {
    let hot = freq.hottest(top);
    let cold = freq.coldest(top);
    let late = delay.most_delayed(top);

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Hot").fg(Color::Red),
        Cell::new("Hits"),
        Cell::new("Cold").fg(Color::Cyan),
        Cell::new("Hits"),
        Cell::new("Delayed").fg(Color::Yellow),
        Cell::new("Draws"),
    ]);

    let pair = |v: &[(u8, u32)], i: usize| match v.get(i) {
        Some((n, c)) => (format!("{:02}", n), c.to_string()),
        None => (String::new(), String::new()),
    };

    for i in 0..hot.len().max(cold.len()).max(late.len()) {
        let (hn, hc) = pair(&hot, i);
        let (cn, cc) = pair(&cold, i);
        let (dn, dc) = pair(&late, i);
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(hn).fg(Color::Red),
            Cell::new(hc),
            Cell::new(cn).fg(Color::Cyan),
            Cell::new(cc),
            Cell::new(dn).fg(Color::Yellow),
            Cell::new(dc),
        ]);
    }
    align_right(&mut table, 0..7);
    println!("\n{}", table);
}

pub fn print_statistics(stats: &HistoricalStatistics) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(format!("Feature ({} draws)", stats.samples)).add_attribute(Attribute::Bold),
        Cell::new("Mean"),
        Cell::new("Std Dev"),
    ]);
    for (feature, stat) in &stats.features {
        table.add_row(vec![
            Cell::new(feature.to_string()),
            Cell::new(format!("{:.2}", stat.mean)),
            Cell::new(format!("{:.2}", stat.std_dev)),
        ]);
    }
    align_right(&mut table, 1..3);
    println!("\n{}", table);
}

pub fn print_odds(distribution: &BTreeMap<u8, f64>) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Hits").add_attribute(Attribute::Bold),
        Cell::new("Probability"),
        Cell::new("1 in"),
        Cell::new("Prize"),
    ]);
    for (&hits, &p) in distribution {
        let prize = PRIZE_TIERS.contains(&hits);
        let odds = if p > 0.0 {
            format!("{:.0}", 1.0 / p)
        } else {
            "-".into()
        };
        let mut hits_cell = Cell::new(hits);
        if prize {
            hits_cell = hits_cell.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            hits_cell,
            Cell::new(format!("{:.6e}", p)),
            Cell::new(odds),
            Cell::new(if prize { "★" } else { "" }),
        ]);
    }
    align_right(&mut table, 0..3);
    println!("\n{}", table);
}

pub fn print_hit_histogram(histogram: &[usize; DRAW_SIZE + 1], total: usize) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Hits").add_attribute(Attribute::Bold),
        Cell::new("Draws"),
        Cell::new("Share"),
    ]);
    let denom = total.max(1) as f64;
    for (hits, &n) in histogram.iter().enumerate() {
        if n == 0 {
            continue;
        }
        let mut hits_cell = Cell::new(hits);
        if PRIZE_TIERS.contains(&(hits as u8)) {
            hits_cell = hits_cell.fg(Color::Green);
        }
        table.add_row(vec![
            hits_cell,
            Cell::new(n),
            Cell::new(format!("{:.2}%", n as f64 / denom * 100.0)),
        ]);
    }
    align_right(&mut table, 0..3);
    println!("\n{}", table);
}
