//! End-to-end runs of the tournament engine.
//!
//! Drives full round-robins through `TournamentEngine` and checks the
//! bookkeeping that ties pool, history and completion together.

use cat_tournament::stats::StatisticsConfig;
use cat_tournament::tournament::{
    CandidateId, CandidateInput, DataIntegrityError, EngineConfig, EngineError, TournamentEngine,
    TournamentState, total_possible_matches,
};

fn inputs(n: usize) -> Vec<CandidateInput> {
    (1..=n)
        .map(|i| CandidateInput::new(i as u64, format!("Cat {i}")))
        .collect()
}

/// Run until the engine stops suggesting pairs; the lower id always wins.
fn run_to_end(engine: &TournamentEngine, mut state: TournamentState) -> TournamentState {
    let mut clock = 0;
    while let Some((left, right)) = engine.next_pair(&state).unwrap() {
        assert!(!state.is_complete(), "pair offered after completion");
        clock += 250;
        let winner = left.id.clone().min(right.id.clone());
        state = engine
            .record_vote(&state, &left.id, &right.id, &winner, clock)
            .unwrap()
            .0;
    }
    state
}

#[test]
fn test_three_candidate_tournament() {
    let engine = TournamentEngine::new(EngineConfig::default()).unwrap();
    let state = engine
        .start(vec![
            CandidateInput::new("1", "Mochi"),
            CandidateInput::new("2", "Biscuit"),
            CandidateInput::new("3", "Pickle"),
        ])
        .unwrap();

    let state = run_to_end(&engine, state);
    let report = engine.summarize(&state, &StatisticsConfig::default());

    assert!(state.is_complete());
    assert_eq!(report.completed_matches, 3);
    assert_eq!(report.total_possible_matches, 3);
    assert_eq!(report.remaining_matches, 0);
    assert_eq!(report.completion_rate, 100.0);
    assert_eq!(report.standings[0].name, "Mochi");
    assert_eq!(report.standings[0].wins, 2);
}

#[test]
fn test_round_robin_terminates_after_every_pair() {
    let engine = TournamentEngine::new(EngineConfig::default().with_pairing_seed(42)).unwrap();

    for n in 0..=9 {
        let mut state = engine.start(inputs(n)).unwrap();
        let total = total_possible_matches(n);
        let mut clock = 0;

        for played in 0..total {
            assert!(!state.is_complete(), "complete early at {played}/{total} for n={n}");
            let (left, right) = engine.next_pair(&state).unwrap().unwrap();
            assert!(!state.history().has_played(&left.id, &right.id));
            clock += 1_000;
            state = engine
                .record_vote(&state, &left.id, &right.id, &right.id, clock)
                .unwrap()
                .0;
        }

        assert!(state.is_complete(), "not complete after {total} matches for n={n}");
        assert_eq!(state.history().completed_count(), total);
        assert!(engine.next_pair(&state).unwrap().is_none());
    }
}

#[test]
fn test_tallies_match_history() {
    let engine = TournamentEngine::new(EngineConfig::default().with_pairing_seed(7)).unwrap();
    let state = run_to_end(&engine, engine.start(inputs(6)).unwrap());

    for candidate in state.pool() {
        let involved = state.history().matches_for(&candidate.id).count() as u32;
        assert_eq!(candidate.matches_played(), involved, "{}", candidate.name);
        assert_eq!(candidate.matches_played(), 5);
    }
    let wins: u32 = state.pool().iter().map(|c| c.wins()).sum();
    assert_eq!(wins as usize, state.history().len());
}

#[test]
fn test_single_vote_touches_only_winner_and_loser() {
    let engine = TournamentEngine::new(EngineConfig::default()).unwrap();
    let state = engine.start(inputs(4)).unwrap();
    let (a, b): (CandidateId, CandidateId) = ("2".into(), "4".into());

    let (next, outcome) = engine.record_vote(&state, &a, &b, &b, 10).unwrap();

    assert_eq!(outcome.winner.wins(), 1);
    assert_eq!(outcome.winner.losses(), 0);
    assert_eq!(outcome.loser.losses(), 1);
    assert_eq!(outcome.loser.wins(), 0);
    for (before, after) in state.pool().iter().zip(next.pool()) {
        if before.id != a && before.id != b {
            assert_eq!(before, after);
        }
    }
}

#[test]
fn test_repeat_rounds_stop_at_max_rounds() {
    let config = EngineConfig::default()
        .with_repeat_rounds(Some(2))
        .with_pairing_seed(3);
    let engine = TournamentEngine::new(config).unwrap();
    let state = run_to_end(&engine, engine.start(inputs(4)).unwrap());

    assert!(state.is_complete());
    assert_eq!(state.history().len(), 12);
    for counts in state.history().pair_counts().values() {
        assert_eq!(*counts, 2);
    }
}

#[test]
fn test_resume_continues_where_it_left_off() {
    let engine = TournamentEngine::new(EngineConfig::default()).unwrap();
    let mut state = engine.start(inputs(4)).unwrap();
    for ts in 0..3 {
        let (left, right) = engine.next_pair(&state).unwrap().unwrap();
        state = engine
            .record_vote(&state, &left.id, &right.id, &left.id, ts)
            .unwrap()
            .0;
    }

    let json = serde_json::to_string(state.history()).unwrap();
    let (pool, _) = state.clone().into_parts();
    let resumed = engine
        .resume(pool, serde_json::from_str(&json).unwrap())
        .unwrap();

    assert_eq!(resumed, state);
    assert_eq!(
        engine.next_pair(&resumed).unwrap(),
        engine.next_pair(&state).unwrap()
    );
    let finished = run_to_end(&engine, resumed);
    assert_eq!(finished.history().len(), 6);
}

#[test]
fn test_replayed_pair_cannot_finish_round_robin() {
    let engine = TournamentEngine::new(EngineConfig::default()).unwrap();
    let mut state = engine.start(inputs(3)).unwrap();
    let (one, two): (CandidateId, CandidateId) = ("1".into(), "2".into());

    state = engine.record_vote(&state, &one, &two, &one, 0).unwrap().0;
    for ts in 1..3 {
        let err = engine.record_vote(&state, &one, &two, &one, ts).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DataIntegrity(DataIntegrityError::PairAlreadyPlayed { .. })
        ));
    }

    let report = engine.summarize(&state, &StatisticsConfig::default());
    assert!(!state.is_complete());
    assert_eq!(report.completed_matches, 1);
    assert_eq!(report.remaining_matches, 2);
    assert!(engine.next_pair(&state).unwrap().is_some());

    let finished = run_to_end(&engine, state);
    assert!(finished.is_complete());
    assert!(finished.history().has_played(&"1".into(), &"3".into()));
    assert!(finished.history().has_played(&"2".into(), &"3".into()));
}

#[test]
fn test_vote_rejected_once_complete() {
    let engine = TournamentEngine::new(EngineConfig::default()).unwrap();
    let state = run_to_end(&engine, engine.start(inputs(3)).unwrap());
    let err = engine
        .record_vote(&state, &"1".into(), &"2".into(), &"1".into(), i64::MAX)
        .unwrap_err();
    assert_eq!(err, EngineError::TournamentComplete);
    assert!(!err.is_recoverable());
}
