/// Size of the number universe (0..=99).
pub const UNIVERSE: usize = 100;

/// Numbers on every ticket.
pub const TICKET_SIZE: usize = 50;

/// Numbers drawn per contest.
pub const DRAW_SIZE: usize = 20;

/// Hit counts that pay a prize.
pub const PRIZE_TIERS: [u8; 7] = [0, 15, 16, 17, 18, 19, 20];

/// Width of the grid used for the frame/core partition.
pub const GRID_WIDTH: usize = 10;

/// Numbers on the border of the 10x10 grid.
pub const FRAME_COUNT: usize = 36;

/// Numbers inside the border.
pub const CORE_COUNT: usize = UNIVERSE - FRAME_COUNT;

/// Primes below 100.
pub const PRIME_COUNT: usize = 25;

/// Largest possible sum of a ticket (50 + 51 + ... + 99).
pub const MAX_TICKET_SUM: u32 = 4950;

/// Default number of historical draws used for feature statistics.
pub const DEFAULT_STATS_WINDOW: usize = 500;

/// Default balanced search attempts per ticket.
pub const DEFAULT_ATTEMPT_BUDGET: usize = 20_000;

/// Default attempts between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

/// Default cap on surfaced exhaustion warnings per batch.
pub const DEFAULT_MAX_WARNINGS: usize = 5;

/// Default size of the frequency-weighted base pool.
pub const DEFAULT_WEIGHTED_POOL: usize = TICKET_SIZE + 10;

/// Default size of a simulated archive.
pub const DEFAULT_SIMULATED_DRAWS: usize = 10_000;

const fn build_frame_mask() -> [bool; UNIVERSE] {
    let mut mask = [false; UNIVERSE];
    let mut n = 0;
    while n < UNIVERSE {
        let row = n / GRID_WIDTH;
        let col = n % GRID_WIDTH;
        mask[n] = row == 0 || row == GRID_WIDTH - 1 || col == 0 || col == GRID_WIDTH - 1;
        n += 1;
    }
    mask
}

const fn build_prime_mask() -> [bool; UNIVERSE] {
    let mut mask = [true; UNIVERSE];
    mask[0] = false;
    mask[1] = false;
    let mut p = 2;
    while p * p < UNIVERSE {
        if mask[p] {
            let mut m = p * p;
            while m < UNIVERSE {
                mask[m] = false;
                m += p;
            }
        }
        p += 1;
    }
    mask
}

/// `FRAME_MASK[n]` is true when `n` sits on the border of the grid.
pub const FRAME_MASK: [bool; UNIVERSE] = build_frame_mask();

/// `PRIME_MASK[n]` is true when `n` is prime.
pub const PRIME_MASK: [bool; UNIVERSE] = build_prime_mask();

#[inline(always)]
pub fn is_frame(n: u8) -> bool {
    FRAME_MASK[n as usize]
}

#[inline(always)]
pub fn is_prime(n: u8) -> bool {
    PRIME_MASK[n as usize]
}
