use crate::consts::{DRAW_SIZE, TICKET_SIZE, UNIVERSE};
use crate::error::{LfResult, LotoError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Checks that `numbers` holds `expected` distinct values in range and
/// returns them sorted.
fn sorted_distinct(numbers: &[u8], expected: usize) -> Result<Vec<u8>, String> {
    if numbers.len() != expected {
        return Err(format!(
            "expected {} numbers, got {}",
            expected,
            numbers.len()
        ));
    }
    let mut seen = [false; UNIVERSE];
    for &n in numbers {
        if n as usize >= UNIVERSE {
            return Err(format!("number {} is outside 0-{}", n, UNIVERSE - 1));
        }
        if seen[n as usize] {
            return Err(format!("number {} appears more than once", n));
        }
        seen[n as usize] = true;
    }
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    Ok(sorted)
}

/// One historical result: 20 distinct numbers, kept sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Draw([u8; DRAW_SIZE]);

impl Draw {
    pub fn new(numbers: &[u8]) -> LfResult<Self> {
        let sorted = sorted_distinct(numbers, DRAW_SIZE).map_err(LotoError::InvalidDraw)?;
        let mut arr = [0u8; DRAW_SIZE];
        arr.copy_from_slice(&sorted);
        Ok(Self(arr))
    }

    pub(crate) fn from_sorted_unchecked(numbers: [u8; DRAW_SIZE]) -> Self {
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.binary_search(&n).is_ok()
    }
}

/// A 50-number combination, kept sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticket(Vec<u8>);

impl Ticket {
    pub fn new(numbers: &[u8]) -> LfResult<Self> {
        sorted_distinct(numbers, TICKET_SIZE)
            .map(Self)
            .map_err(LotoError::InvalidTicket)
    }

    /// Builds a ticket from numbers the generators already know are valid.
    pub(crate) fn from_sorted_unchecked(numbers: Vec<u8>) -> Self {
        debug_assert_eq!(numbers.len(), TICKET_SIZE);
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.binary_search(&n).is_ok()
    }
}

impl<'de> Deserialize<'de> for Ticket {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<u8>::deserialize(deserializer)?;
        Ticket::new(&raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:02}", n)).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Occurrence count of every number across a collection of draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; UNIVERSE],
    draws: usize,
}

impl FrequencyTable {
    pub(crate) fn from_counts(counts: [u32; UNIVERSE], draws: usize) -> Self {
        Self { counts, draws }
    }

    pub fn get(&self, n: u8) -> u32 {
        self.counts[n as usize]
    }

    /// Number of draws the table was built from.
    pub fn total_draws(&self) -> usize {
        self.draws
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().enumerate().map(|(n, &c)| (n as u8, c))
    }

    /// Numbers ordered by descending frequency, ties by ascending number.
    pub fn ranked(&self) -> Vec<u8> {
        let mut order: Vec<u8> = (0..UNIVERSE as u8).collect();
        order.sort_by(|a, b| self.get(*b).cmp(&self.get(*a)));
        order
    }

    pub fn hottest(&self, k: usize) -> Vec<(u8, u32)> {
        self.ranked()
            .into_iter()
            .take(k)
            .map(|n| (n, self.get(n)))
            .collect()
    }

    pub fn coldest(&self, k: usize) -> Vec<(u8, u32)> {
        let mut order: Vec<u8> = (0..UNIVERSE as u8).collect();
        order.sort_by_key(|&n| self.get(n));
        order.into_iter().take(k).map(|n| (n, self.get(n))).collect()
    }
}

/// Draws since each number last appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayTable {
    delays: [u32; UNIVERSE],
}

impl DelayTable {
    pub(crate) fn from_delays(delays: [u32; UNIVERSE]) -> Self {
        Self { delays }
    }

    pub fn get(&self, n: u8) -> u32 {
        self.delays[n as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.delays.iter().enumerate().map(|(n, &d)| (n as u8, d))
    }

    pub fn most_delayed(&self, k: usize) -> Vec<(u8, u32)> {
        let mut order: Vec<u8> = (0..UNIVERSE as u8).collect();
        order.sort_by(|a, b| self.get(*b).cmp(&self.get(*a)));
        order.into_iter().take(k).map(|n| (n, self.get(n))).collect()
    }
}
