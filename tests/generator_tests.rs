use lotoforge::analysis::frequencies_and_delays;
use lotoforge::archive::HistoricalArchive;
use lotoforge::config::BalanceCriteria;
use lotoforge::consts::TICKET_SIZE;
use lotoforge::error::LotoError;
use lotoforge::generator::balanced::{
    evaluate, BalancedSearch, BatchOutcome, CancellationToken, NoProgress, Rejection,
    SearchOptions,
};
use lotoforge::generator::{generate_filtered, generate_random, generate_weighted, FilterSet};
use lotoforge::types::Ticket;
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Kind {
    Random,
    Weighted,
    Filtered,
    Balanced,
}

fn assert_valid(tickets: &[Ticket]) {
    for t in tickets {
        let n = t.numbers();
        assert_eq!(n.len(), TICKET_SIZE);
        assert!(n.windows(2).all(|w| w[0] < w[1]), "not sorted: {}", t);
        assert!(n.iter().all(|&x| x < 100));
    }
}

fn open_criteria() -> BalanceCriteria {
    BalanceCriteria {
        sum_min: 0,
        sum_max: 4950,
        even_min: 0,
        even_max: 50,
        odd_min: 0,
        odd_max: 50,
        frame_min: 0,
        frame_max: 50,
        core_min: 0,
        core_max: 50,
        prime_min: 0,
        prime_max: 50,
        max_consecutive: 50,
    }
}

fn unsatisfiable() -> BalanceCriteria {
    BalanceCriteria {
        even_min: 51,
        even_max: 51,
        ..open_criteria()
    }
}

fn options(budget: usize, interval: usize) -> SearchOptions {
    SearchOptions {
        attempt_budget: budget,
        progress_interval: interval,
        ..SearchOptions::default()
    }
}

#[rstest]
#[case(Kind::Random, 1)]
#[case(Kind::Random, 10)]
#[case(Kind::Weighted, 4)]
#[case(Kind::Filtered, 4)]
#[case(Kind::Balanced, 3)]
fn test_every_strategy_yields_valid_tickets(#[case] kind: Kind, #[case] count: usize) {
    let mut rng = fastrand::Rng::with_seed(42);
    let archive = HistoricalArchive::simulate(300, Some(42));

    let tickets = match kind {
        Kind::Random => generate_random(&mut rng, count),
        Kind::Weighted => {
            let (freq, _) = frequencies_and_delays(&archive.draws());
            generate_weighted(&mut rng, &freq, count, 60).unwrap()
        }
        Kind::Filtered => {
            let filters = FilterSet::new(&mut rng, &[7, 8], &[9]).unwrap();
            generate_filtered(&mut rng, &filters, count).unwrap()
        }
        Kind::Balanced => {
            let search =
                BalancedSearch::new(BalanceCriteria::default(), options(20_000, 500), CancellationToken::new())
                    .unwrap();
            search.run(&mut rng, count, &NoProgress).into_tickets()
        }
    };

    assert_eq!(tickets.len(), count);
    assert_valid(&tickets);
}

#[test]
fn test_filtered_include_and_exclude() {
    let mut rng = fastrand::Rng::with_seed(1);
    let filters = FilterSet::new(&mut rng, &[0, 1], &[2, 3]).unwrap();
    let tickets = generate_filtered(&mut rng, &filters, 1).unwrap();
    assert_eq!(tickets.len(), 1);
    let t = &tickets[0];
    assert!(t.contains(0) && t.contains(1));
    assert!(!t.contains(2) && !t.contains(3));
    assert_valid(&tickets);
}

#[test]
fn test_filtered_too_many_exclusions() {
    let mut rng = fastrand::Rng::with_seed(1);
    let exclude: Vec<u8> = (0..60).collect();
    match FilterSet::new(&mut rng, &[], &exclude) {
        Err(LotoError::InsufficientCandidates { needed, available }) => {
            assert_eq!(needed, 50);
            assert_eq!(available, 40);
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_filtered_oversized_include_is_sampled() {
    let mut rng = fastrand::Rng::with_seed(5);
    let include: Vec<u8> = (0..70).collect();
    let filters = FilterSet::new(&mut rng, &include, &[]).unwrap();
    assert_eq!(filters.include.len(), TICKET_SIZE);

    let tickets = generate_filtered(&mut rng, &filters, 2).unwrap();
    for t in &tickets {
        assert!(t.numbers().iter().all(|&n| n < 70));
    }
}

#[test]
fn test_filtered_overlap_is_rejected() {
    let mut rng = fastrand::Rng::with_seed(1);
    assert!(matches!(
        FilterSet::new(&mut rng, &[4, 5], &[5]),
        Err(LotoError::Validation { .. })
    ));
}

#[test]
fn test_weighted_uses_most_frequent_numbers() {
    let draws: Vec<_> = HistoricalArchive::simulate(100, Some(9)).draws();
    let (freq, _) = frequencies_and_delays(&draws);
    let pool: Vec<u8> = freq.ranked().into_iter().take(55).collect();

    let mut rng = fastrand::Rng::with_seed(2);
    let tickets = generate_weighted(&mut rng, &freq, 5, 55).unwrap();
    for t in &tickets {
        assert!(t.numbers().iter().all(|n| pool.contains(n)));
    }
}

#[test]
fn test_weighted_small_pool_is_topped_up() {
    let draws = HistoricalArchive::simulate(50, Some(4)).draws();
    let (freq, _) = frequencies_and_delays(&draws);
    let pool: Vec<u8> = freq.ranked().into_iter().take(30).collect();

    let mut rng = fastrand::Rng::with_seed(2);
    let tickets = generate_weighted(&mut rng, &freq, 3, 30).unwrap();
    assert_valid(&tickets);
    for t in &tickets {
        assert!(pool.iter().all(|&n| t.contains(n)));
    }
}

#[test]
fn test_weighted_needs_history() {
    let (freq, _) = frequencies_and_delays(&[]);
    let mut rng = fastrand::Rng::with_seed(2);
    assert!(matches!(
        generate_weighted(&mut rng, &freq, 1, 60),
        Err(LotoError::NoData(_))
    ));
}

#[test]
fn test_unsatisfiable_criteria_fall_back() {
    let search =
        BalancedSearch::new(unsatisfiable(), options(50, 10), CancellationToken::new()).unwrap();
    let mut rng = fastrand::Rng::with_seed(8);

    match search.run(&mut rng, 8, &NoProgress) {
        BatchOutcome::Completed(batch) => {
            assert_eq!(batch.tickets.len(), 8);
            assert_eq!(batch.fallbacks, (0..8).collect::<Vec<_>>());
            assert_eq!(batch.warnings.len(), 5);
            assert_eq!(batch.attempts, 8 * 50);
            assert_valid(&batch.tickets);
        }
        BatchOutcome::Cancelled => panic!("not cancelled"),
    }
}

#[test]
fn test_pre_cancelled_batch_is_empty() {
    let token = CancellationToken::new();
    token.cancel();
    let search = BalancedSearch::new(unsatisfiable(), options(100, 1), token).unwrap();

    let calls = AtomicUsize::new(0);
    let cb = |_: usize, _: usize, _: usize, _: usize| {
        calls.fetch_add(1, Ordering::SeqCst);
    };
    let mut rng = fastrand::Rng::with_seed(8);
    let outcome = search.run(&mut rng, 3, &cb);

    assert!(outcome.is_cancelled());
    assert!(outcome.into_tickets().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_cancel_from_progress_callback() {
    let token = CancellationToken::new();
    let search = BalancedSearch::new(unsatisfiable(), options(1_000, 100), token.clone()).unwrap();

    let calls = AtomicUsize::new(0);
    let cb = |_: usize, _: usize, _: usize, _: usize| {
        calls.fetch_add(1, Ordering::SeqCst);
        token.cancel();
    };
    let mut rng = fastrand::Rng::with_seed(8);

    assert!(search.run(&mut rng, 5, &cb).is_cancelled());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cancel_after_accepted_ticket_discards_batch() {
    // Roughly half of all tickets pass, so every ticket sees rejections.
    let criteria = BalanceCriteria {
        even_min: 25,
        even_max: 50,
        ..open_criteria()
    };
    let token = CancellationToken::new();
    let search = BalancedSearch::new(criteria, options(10_000, 1), token.clone()).unwrap();

    let cancelled_at = AtomicUsize::new(0);
    let cb = |index: usize, _: usize, _: usize, _: usize| {
        if index >= 1 && !token.is_cancelled() {
            cancelled_at.store(index, Ordering::SeqCst);
            token.cancel();
        }
    };
    let mut rng = fastrand::Rng::with_seed(21);
    let outcome = search.run(&mut rng, 50, &cb);

    // Ticket 0 was accepted before the stop request arrived.
    assert!(cancelled_at.load(Ordering::SeqCst) >= 1);
    assert!(outcome.is_cancelled());
    assert!(outcome.into_tickets().is_empty());
}

#[test]
fn test_progress_call_count() {
    let search =
        BalancedSearch::new(unsatisfiable(), options(1_000, 100), CancellationToken::new()).unwrap();

    let seen = std::sync::Mutex::new(Vec::new());
    let cb = |index: usize, total: usize, attempt: usize, budget: usize| {
        assert_eq!(total, 2);
        assert_eq!(budget, 1_000);
        seen.lock().unwrap().push((index, attempt));
    };
    let mut rng = fastrand::Rng::with_seed(8);
    let outcome = search.run(&mut rng, 2, &cb);
    assert!(!outcome.is_cancelled());

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 20);
    assert_eq!(seen[0], (0, 0));
    assert_eq!(seen[9], (0, 900));
    assert_eq!(seen[10], (1, 0));
}

#[test]
fn test_spawned_batch() {
    let search = BalancedSearch::new(open_criteria(), SearchOptions::default(), CancellationToken::new())
        .unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let handle = search.spawn(Some(99), 4, move |_: usize, _: usize, _: usize, _: usize| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let tickets = handle.join().unwrap().into_tickets();

    assert_eq!(tickets.len(), 4);
    assert_valid(&tickets);
    // Every candidate passes, so nothing is ever rejected.
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_spawned_batch_cancelled_from_outside() {
    let token = CancellationToken::new();
    let search = BalancedSearch::new(unsatisfiable(), options(usize::MAX, 10), token.clone()).unwrap();

    let handle = search.spawn(Some(1), 3, NoProgress);
    token.cancel();
    assert!(handle.join().unwrap().is_cancelled());
}

#[rstest]
#[case(3, Ok(()))]
#[case(2, Err(Rejection::Consecutive))]
fn test_run_cap(#[case] cap: usize, #[case] expected: Result<(), Rejection>) {
    // Longest run is 1, 2, 3.
    let mut numbers = vec![1u8, 2, 3];
    numbers.extend((5..100).step_by(2).take(47));
    assert_eq!(numbers.len(), 50);

    let criteria = BalanceCriteria {
        max_consecutive: cap,
        ..open_criteria()
    };
    assert_eq!(evaluate(&criteria, &numbers), expected);
}
