pub mod balanced;

use crate::consts::{TICKET_SIZE, UNIVERSE};
use crate::error::{LfResult, LotoError};
use crate::types::{FrequencyTable, Ticket};
use fastrand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Moves a uniform random `k`-subset of `pool` to its front (partial
/// Fisher-Yates) and returns it.
fn partial_shuffle<'a>(rng: &mut Rng, pool: &'a mut [u8], k: usize) -> &'a mut [u8] {
    let k = k.min(pool.len());
    for i in 0..k {
        let j = rng.usize(i..pool.len());
        pool.swap(i, j);
    }
    &mut pool[..k]
}

/// Uniform random `k`-subset of `pool`, sorted ascending.
pub fn sample_sorted(rng: &mut Rng, pool: &[u8], k: usize) -> Vec<u8> {
    let mut scratch = pool.to_vec();
    let mut picked = partial_shuffle(rng, &mut scratch, k).to_vec();
    picked.sort_unstable();
    picked
}

/// One uniform random ticket.
pub fn random_ticket(rng: &mut Rng) -> Ticket {
    let mut pool: [u8; UNIVERSE] = std::array::from_fn(|i| i as u8);
    let picked = partial_shuffle(rng, &mut pool, TICKET_SIZE);
    picked.sort_unstable();
    Ticket::from_sorted_unchecked(picked.to_vec())
}

pub fn generate_random(rng: &mut Rng, count: usize) -> Vec<Ticket> {
    (0..count).map(|_| random_ticket(rng)).collect()
}

/// The `pool_size` most frequent numbers, ties broken by ascending number.
pub fn weighted_pool(frequencies: &FrequencyTable, pool_size: usize) -> Vec<u8> {
    let mut ranked = frequencies.ranked();
    ranked.truncate(pool_size.min(UNIVERSE));
    ranked
}

/// Tickets drawn from the most frequent numbers. When the pool holds fewer
/// than 50 numbers, all of it is used and the rest is drawn from outside.
pub fn generate_weighted(
    rng: &mut Rng,
    frequencies: &FrequencyTable,
    count: usize,
    pool_size: usize,
) -> LfResult<Vec<Ticket>> {
    if frequencies.total_draws() == 0 {
        return Err(LotoError::NoData(
            "frequency-weighted generation needs at least one historical draw".into(),
        ));
    }

    let pool = weighted_pool(frequencies, pool_size);
    debug!("Weighted pool of {} numbers", pool.len());

    let outside: Vec<u8> = {
        let mut in_pool = [false; UNIVERSE];
        for &n in &pool {
            in_pool[n as usize] = true;
        }
        (0..UNIVERSE as u8)
            .filter(|&n| !in_pool[n as usize])
            .collect()
    };

    let tickets = (0..count)
        .map(|_| {
            let numbers = if pool.len() >= TICKET_SIZE {
                sample_sorted(rng, &pool, TICKET_SIZE)
            } else {
                let mut numbers = pool.clone();
                numbers.extend(sample_sorted(rng, &outside, TICKET_SIZE - pool.len()));
                numbers.sort_unstable();
                numbers
            };
            Ticket::from_sorted_unchecked(numbers)
        })
        .collect();
    Ok(tickets)
}

/// Numbers forced into and kept out of filtered tickets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub include: BTreeSet<u8>,
    pub exclude: BTreeSet<u8>,
}

impl FilterSet {
    /// Validates user filters. An include set larger than a ticket is cut
    /// down to 50 numbers chosen at random.
    pub fn new(rng: &mut Rng, include: &[u8], exclude: &[u8]) -> LfResult<Self> {
        for (field, list) in [("include", include), ("exclude", exclude)] {
            if let Some(&n) = list.iter().find(|&&n| n as usize >= UNIVERSE) {
                return Err(LotoError::validation(
                    field,
                    format!("{} is outside 0-{}", n, UNIVERSE - 1),
                ));
            }
        }

        let mut include: BTreeSet<u8> = include.iter().copied().collect();
        let exclude: BTreeSet<u8> = exclude.iter().copied().collect();

        let overlap: Vec<u8> = include.intersection(&exclude).copied().collect();
        if !overlap.is_empty() {
            return Err(LotoError::validation(
                "include",
                format!("numbers {:?} are both included and excluded", overlap),
            ));
        }

        if include.len() > TICKET_SIZE {
            warn!(
                "Include set has {} numbers; keeping a random {} of them",
                include.len(),
                TICKET_SIZE
            );
            let all: Vec<u8> = include.iter().copied().collect();
            include = sample_sorted(rng, &all, TICKET_SIZE).into_iter().collect();
        }

        let filters = Self { include, exclude };
        let needed = TICKET_SIZE - filters.include.len();
        let available = filters.candidates().len();
        if available < needed {
            return Err(LotoError::InsufficientCandidates { needed, available });
        }
        Ok(filters)
    }

    /// Numbers free to fill the rest of a ticket.
    pub fn candidates(&self) -> Vec<u8> {
        (0..UNIVERSE as u8)
            .filter(|n| !self.include.contains(n) && !self.exclude.contains(n))
            .collect()
    }
}

/// Tickets that contain every included number and no excluded one.
pub fn generate_filtered(rng: &mut Rng, filters: &FilterSet, count: usize) -> LfResult<Vec<Ticket>> {
    let mut tickets = Vec::with_capacity(count);
    for _ in 0..count {
        let mut chosen: Vec<u8> = filters.include.iter().copied().collect();
        let mut candidates = filters.candidates();
        while chosen.len() < TICKET_SIZE {
            if candidates.is_empty() {
                return Err(LotoError::InsufficientCandidates {
                    needed: TICKET_SIZE - filters.include.len(),
                    available: filters.candidates().len(),
                });
            }
            let idx = rng.usize(..candidates.len());
            chosen.push(candidates.swap_remove(idx));
        }
        chosen.truncate(TICKET_SIZE);
        chosen.sort_unstable();
        tickets.push(Ticket::from_sorted_unchecked(chosen));
    }
    Ok(tickets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::frequencies_and_delays;
    use crate::types::Draw;

    fn assert_valid(ticket: &Ticket) {
        let n = ticket.numbers();
        assert_eq!(n.len(), TICKET_SIZE);
        assert!(n.windows(2).all(|w| w[0] < w[1]));
        assert!(n.iter().all(|&x| (x as usize) < UNIVERSE));
    }

    #[test]
    fn test_random_tickets_are_valid() {
        let mut rng = Rng::with_seed(42);
        let tickets = generate_random(&mut rng, 20);
        assert_eq!(tickets.len(), 20);
        tickets.iter().for_each(assert_valid);
    }

    #[test]
    fn test_seed_reproducibility() {
        let a = generate_random(&mut Rng::with_seed(9), 3);
        let b = generate_random(&mut Rng::with_seed(9), 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_weighted_uses_pool_only() {
        let draws: Vec<Draw> = (0..5)
            .map(|_| Draw::new(&(0..20).collect::<Vec<u8>>()).unwrap())
            .collect();
        let (freq, _) = frequencies_and_delays(&draws);
        let pool = weighted_pool(&freq, 60);
        // 0..20 lead, then ties filled in number order
        assert_eq!(pool, (0..60).collect::<Vec<u8>>());

        let mut rng = Rng::with_seed(1);
        for ticket in generate_weighted(&mut rng, &freq, 10, 60).unwrap() {
            assert_valid(&ticket);
            assert!(ticket.numbers().iter().all(|&n| n < 60));
        }
    }

    #[test]
    fn test_weighted_small_pool_fills_shortfall() {
        let draws = vec![Draw::new(&(0..20).collect::<Vec<u8>>()).unwrap()];
        let (freq, _) = frequencies_and_delays(&draws);
        let mut rng = Rng::with_seed(3);
        for ticket in generate_weighted(&mut rng, &freq, 5, 20).unwrap() {
            assert_valid(&ticket);
            assert!((0..20).all(|n| ticket.contains(n)));
        }
    }

    #[test]
    fn test_weighted_refuses_empty_history() {
        let (freq, _) = frequencies_and_delays(&[]);
        let mut rng = Rng::with_seed(3);
        assert!(matches!(
            generate_weighted(&mut rng, &freq, 1, 60),
            Err(LotoError::NoData(_))
        ));
    }

    #[test]
    fn test_filter_validation() {
        let mut rng = Rng::with_seed(5);
        assert!(matches!(
            FilterSet::new(&mut rng, &[1, 2], &[2, 3]),
            Err(LotoError::Validation { .. })
        ));

        let exclude: Vec<u8> = (0..60).collect();
        assert!(matches!(
            FilterSet::new(&mut rng, &[], &exclude),
            Err(LotoError::InsufficientCandidates {
                needed: 50,
                available: 40
            })
        ));

        let include: Vec<u8> = (0..70).collect();
        let filters = FilterSet::new(&mut rng, &include, &[]).unwrap();
        assert_eq!(filters.include.len(), TICKET_SIZE);
        assert!(filters.include.iter().all(|&n| n < 70));
    }

    #[test]
    fn test_filtered_hard_stop_on_exhausted_pool() {
        let filters = FilterSet {
            include: BTreeSet::new(),
            exclude: (0..60).collect(),
        };
        let mut rng = Rng::with_seed(5);
        assert!(matches!(
            generate_filtered(&mut rng, &filters, 1),
            Err(LotoError::InsufficientCandidates { .. })
        ));
    }

    #[test]
    fn test_full_include_set() {
        let include: Vec<u8> = (25..75).collect();
        let mut rng = Rng::with_seed(5);
        let filters = FilterSet::new(&mut rng, &include, &[]).unwrap();
        let tickets = generate_filtered(&mut rng, &filters, 2).unwrap();
        assert_eq!(tickets[0].numbers(), include.as_slice());
    }
}
