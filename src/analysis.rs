use crate::consts::{DRAW_SIZE, UNIVERSE};
use crate::features::{Feature, Features};
use crate::types::{DelayTable, Draw, FrequencyTable, Ticket};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Frequency of every number plus the delay since its last appearance.
///
/// `draws` must be ordered oldest to newest. For an empty collection every
/// delay is 0 (the collection size).
pub fn frequencies_and_delays(draws: &[Draw]) -> (FrequencyTable, DelayTable) {
    let mut counts = [0u32; UNIVERSE];
    for draw in draws {
        for &n in draw.numbers() {
            counts[n as usize] += 1;
        }
    }

    let mut delays = [0u32; UNIVERSE];
    for (n, delay) in delays.iter_mut().enumerate() {
        *delay = draws
            .iter()
            .rev()
            .take_while(|d| !d.contains(n as u8))
            .count() as u32;
    }

    (
        FrequencyTable::from_counts(counts, draws.len()),
        DelayTable::from_delays(delays),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureStat {
    pub mean: f64,
    pub std_dev: f64,
}

/// Mean and population standard deviation of each draw feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoricalStatistics {
    pub samples: usize,
    pub features: BTreeMap<Feature, FeatureStat>,
}

impl HistoricalStatistics {
    pub fn is_empty(&self) -> bool {
        self.samples == 0 || self.features.is_empty()
    }

    pub fn get(&self, feature: Feature) -> Option<FeatureStat> {
        self.features.get(&feature).copied()
    }
}

pub fn historical_statistics(window: &[Draw]) -> HistoricalStatistics {
    if window.is_empty() {
        return HistoricalStatistics::default();
    }

    let per_draw: Vec<Features> = window.iter().map(|d| Features::of(d.numbers())).collect();
    let n = per_draw.len() as f64;

    let features = Feature::iter()
        .map(|feature| {
            let mean = per_draw.iter().map(|f| f.get(feature) as f64).sum::<f64>() / n;
            let var = per_draw
                .iter()
                .map(|f| {
                    let d = f.get(feature) as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / n;
            (
                feature,
                FeatureStat {
                    mean,
                    std_dev: var.sqrt(),
                },
            )
        })
        .collect();

    HistoricalStatistics {
        samples: window.len(),
        features,
    }
}

/// Numbers shared by a ticket and a draw.
pub fn count_hits(ticket: &Ticket, draw: &Draw) -> usize {
    draw.numbers().iter().filter(|&&n| ticket.contains(n)).count()
}

/// How many draws would have produced each hit count (index = hits).
pub fn hit_histogram(ticket: &Ticket, draws: &[Draw]) -> [usize; DRAW_SIZE + 1] {
    draws
        .par_iter()
        .fold(
            || [0usize; DRAW_SIZE + 1],
            |mut acc, draw| {
                acc[count_hits(ticket, draw)] += 1;
                acc
            },
        )
        .reduce(
            || [0usize; DRAW_SIZE + 1],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x += y;
                }
                a
            },
        )
}
