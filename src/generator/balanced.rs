//! Rejection-sampling search for tickets that satisfy [`BalanceCriteria`].
//!
//! Each ticket is searched independently: draw a uniform random ticket,
//! check the criteria, repeat until accepted or the attempt budget runs out.
//! An exhausted search substitutes an unconstrained random ticket so a batch
//! always yields the requested number of tickets, unless it is cancelled, in
//! which case it yields none.

use super::random_ticket;
use crate::config::{BalanceCriteria, SearchParams};
use crate::consts::{DEFAULT_ATTEMPT_BUDGET, DEFAULT_MAX_WARNINGS, DEFAULT_PROGRESS_INTERVAL};
use crate::error::LfResult;
use crate::features::{self, Feature};
use crate::types::Ticket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Shared stop flag. Set once by the caller, polled by the search.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receives progress notifications during a balanced batch.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, ticket_index: usize, total: usize, attempt: usize, budget: usize);
}

impl<F> ProgressCallback for F
where
    F: Fn(usize, usize, usize, usize) + Send + Sync,
{
    fn on_progress(&self, ticket_index: usize, total: usize, attempt: usize, budget: usize) {
        self(ticket_index, total, attempt, budget)
    }
}

/// Callback that ignores every notification.
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _: usize, _: usize, _: usize, _: usize) {}
}

/// Overall batch progress in percent for a progress notification.
pub fn overall_percent(ticket_index: usize, total: usize, attempt: usize, budget: usize) -> f32 {
    if total == 0 || budget == 0 {
        return 0.0;
    }
    let done = ticket_index as f32 + attempt as f32 / budget as f32;
    (done / total as f32 * 100.0).min(100.0)
}

/// First criterion a candidate failed, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Sum,
    Parity,
    FrameCore,
    Consecutive,
    Prime,
}

/// Checks a sorted ticket against the criteria, short-circuiting on the
/// first failure: sum, parity, frame/core, consecutive run, primes.
pub fn evaluate(criteria: &BalanceCriteria, sorted: &[u8]) -> Result<(), Rejection> {
    let len = sorted.len() as u32;

    if !criteria.in_range(Feature::Sum, features::sum(sorted)) {
        return Err(Rejection::Sum);
    }

    let even = features::even_count(sorted);
    if !criteria.in_range(Feature::Even, even) || !criteria.in_range(Feature::Odd, len - even) {
        return Err(Rejection::Parity);
    }

    let frame = features::frame_count(sorted);
    if !criteria.in_range(Feature::Frame, frame) || !criteria.in_range(Feature::Core, len - frame)
    {
        return Err(Rejection::FrameCore);
    }

    if features::longest_run(sorted) > criteria.max_consecutive {
        return Err(Rejection::Consecutive);
    }

    if !criteria.in_range(Feature::Prime, features::prime_count(sorted)) {
        return Err(Rejection::Prime);
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub attempt_budget: usize,
    pub progress_interval: usize,
    pub max_warnings: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            attempt_budget: DEFAULT_ATTEMPT_BUDGET,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            max_warnings: DEFAULT_MAX_WARNINGS,
        }
    }
}

impl From<&SearchParams> for SearchOptions {
    fn from(params: &SearchParams) -> Self {
        Self {
            attempt_budget: params.attempts,
            progress_interval: params.progress_interval,
            max_warnings: params.max_warnings,
        }
    }
}

/// A ticket whose search ran out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustionWarning {
    pub ticket_index: usize,
    pub attempts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancedBatch {
    pub tickets: Vec<Ticket>,
    /// Surfaced warnings, capped per batch.
    pub warnings: Vec<ExhaustionWarning>,
    /// Every ticket index that received a random fallback.
    pub fallbacks: Vec<usize>,
    /// Candidates evaluated across the whole batch.
    pub attempts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed(BalancedBatch),
    Cancelled,
}

impl BatchOutcome {
    /// Tickets produced; empty when cancelled.
    pub fn into_tickets(self) -> Vec<Ticket> {
        match self {
            Self::Completed(batch) => batch.tickets,
            Self::Cancelled => Vec::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

enum TicketSearch {
    Accepted(Ticket, usize),
    Exhausted,
    Cancelled,
}

pub struct BalancedSearch {
    criteria: BalanceCriteria,
    options: SearchOptions,
    cancel: CancellationToken,
}

impl BalancedSearch {
    pub fn new(
        criteria: BalanceCriteria,
        options: SearchOptions,
        cancel: CancellationToken,
    ) -> LfResult<Self> {
        criteria.validate()?;
        for msg in criteria.feasibility_warnings() {
            warn!("⚠️  {}", msg);
        }
        let options = SearchOptions {
            attempt_budget: options.attempt_budget.max(1),
            progress_interval: options.progress_interval.max(1),
            ..options
        };
        Ok(Self {
            criteria,
            options,
            cancel,
        })
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn search_ticket<CB: ProgressCallback + ?Sized>(
        &self,
        rng: &mut fastrand::Rng,
        index: usize,
        total: usize,
        callback: &CB,
        attempts: &mut u64,
    ) -> TicketSearch {
        let opts = &self.options;
        for attempt in 0..opts.attempt_budget {
            let candidate = random_ticket(rng);
            *attempts += 1;

            if evaluate(&self.criteria, candidate.numbers()).is_ok() {
                return TicketSearch::Accepted(candidate, attempt + 1);
            }

            if attempt % opts.progress_interval == 0 {
                callback.on_progress(index, total, attempt, opts.attempt_budget);
                if self.cancel.is_cancelled() {
                    return TicketSearch::Cancelled;
                }
            }
        }
        TicketSearch::Exhausted
    }

    /// Runs a batch on the current thread.
    pub fn run<CB: ProgressCallback + ?Sized>(
        &self,
        rng: &mut fastrand::Rng,
        count: usize,
        callback: &CB,
    ) -> BatchOutcome {
        let opts = &self.options;
        let mut tickets = Vec::with_capacity(count);
        let mut warnings = Vec::new();
        let mut fallbacks = Vec::new();
        let mut attempts = 0u64;

        for index in 0..count {
            if self.cancel.is_cancelled() {
                info!("Balanced generation cancelled before ticket {}", index + 1);
                return BatchOutcome::Cancelled;
            }

            match self.search_ticket(rng, index, count, callback, &mut attempts) {
                TicketSearch::Accepted(ticket, tries) => {
                    debug!("Ticket {} accepted after {} attempts", index + 1, tries);
                    tickets.push(ticket);
                }
                TicketSearch::Exhausted => {
                    if warnings.len() < opts.max_warnings {
                        warn!(
                            "No balanced combination for ticket {} within {} attempts; using a random ticket. Consider relaxing the criteria.",
                            index + 1,
                            opts.attempt_budget
                        );
                        warnings.push(ExhaustionWarning {
                            ticket_index: index,
                            attempts: opts.attempt_budget,
                        });
                    }
                    fallbacks.push(index);
                    tickets.push(random_ticket(rng));
                }
                TicketSearch::Cancelled => {
                    info!("Balanced generation cancelled during ticket {}", index + 1);
                    return BatchOutcome::Cancelled;
                }
            }
        }

        BatchOutcome::Completed(BalancedBatch {
            tickets,
            warnings,
            fallbacks,
            attempts,
        })
    }

    /// Runs a batch on a worker thread.
    pub fn spawn<CB>(self, seed: Option<u64>, count: usize, callback: CB) -> JoinHandle<BatchOutcome>
    where
        CB: ProgressCallback + 'static,
    {
        thread::spawn(move || {
            let mut rng = match seed {
                Some(s) => fastrand::Rng::with_seed(s),
                None => fastrand::Rng::new(),
            };
            self.run(&mut rng, count, &callback)
        })
    }
}
