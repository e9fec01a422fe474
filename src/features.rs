use crate::consts::{is_frame, is_prime, CORE_COUNT, FRAME_COUNT, MAX_TICKET_SUM, PRIME_COUNT, TICKET_SIZE};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Derived properties of a combination that statistics and criteria refer to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Sum,
    Even,
    Odd,
    Frame,
    Core,
    Prime,
}

impl Feature {
    /// Structural limits of the feature over a 50-number ticket.
    pub fn domain(&self) -> (u32, u32) {
        match self {
            Self::Sum => (0, MAX_TICKET_SUM),
            Self::Even | Self::Odd => (0, TICKET_SIZE as u32),
            Self::Frame => (0, FRAME_COUNT as u32),
            Self::Core => (0, CORE_COUNT as u32),
            Self::Prime => (0, PRIME_COUNT as u32),
        }
    }

    /// Width multiplier (in standard deviations) used when suggesting ranges.
    pub fn suggestion_spread(&self) -> f64 {
        match self {
            Self::Sum => 2.0,
            _ => 1.0,
        }
    }
}

/// Feature values of one combination (a draw or a ticket).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    pub sum: u32,
    pub even: u32,
    pub odd: u32,
    pub frame: u32,
    pub core: u32,
    pub prime: u32,
}

impl Features {
    pub fn of(numbers: &[u8]) -> Self {
        let len = numbers.len() as u32;
        let mut f = Features::default();
        for &n in numbers {
            f.sum += n as u32;
            if n % 2 == 0 {
                f.even += 1;
            }
            if is_frame(n) {
                f.frame += 1;
            }
            if is_prime(n) {
                f.prime += 1;
            }
        }
        f.odd = len - f.even;
        f.core = len - f.frame;
        f
    }

    pub fn get(&self, feature: Feature) -> u32 {
        match feature {
            Feature::Sum => self.sum,
            Feature::Even => self.even,
            Feature::Odd => self.odd,
            Feature::Frame => self.frame,
            Feature::Core => self.core,
            Feature::Prime => self.prime,
        }
    }
}

#[inline]
pub fn sum(numbers: &[u8]) -> u32 {
    numbers.iter().map(|&n| n as u32).sum()
}

#[inline]
pub fn even_count(numbers: &[u8]) -> u32 {
    numbers.iter().filter(|&&n| n % 2 == 0).count() as u32
}

#[inline]
pub fn frame_count(numbers: &[u8]) -> u32 {
    numbers.iter().filter(|&&n| is_frame(n)).count() as u32
}

#[inline]
pub fn prime_count(numbers: &[u8]) -> u32 {
    numbers.iter().filter(|&&n| is_prime(n)).count() as u32
}

/// Length of the longest run of consecutive integers in a sorted slice.
pub fn longest_run(sorted: &[u8]) -> usize {
    let mut best = 0;
    let mut current = 0;
    let mut prev: Option<u8> = None;
    for &n in sorted {
        current = match prev {
            Some(p) if n == p.wrapping_add(1) => current + 1,
            _ => 1,
        };
        best = best.max(current);
        prev = Some(n);
    }
    best
}
