//! Round driver tests with a scripted learner

use std::collections::VecDeque;

use drill_core::{
    Annotation, Brush, Orientation, SessionError, TrainingSession, Variant, VariantId, START_FEN,
};
use trainer::{MoveSource, RoundDriver, RoundEvent, RoundOutcome};

/// Replays canned input and records what it was told.
#[derive(Default)]
struct Script {
    moves: VecDeque<&'static str>,
    opponent: Vec<String>,
    rejected: Vec<String>,
    hints: usize,
    completed: usize,
}

impl Script {
    fn new(moves: &[&'static str]) -> Self {
        Self {
            moves: moves.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl MoveSource for Script {
    fn next_move(&mut self, _position: &str, _ply: usize) -> Option<String> {
        self.moves.pop_front().map(str::to_string)
    }

    fn notify(&mut self, event: RoundEvent<'_>) {
        match event {
            RoundEvent::OpponentMoved { mv, .. } => self.opponent.push(mv.san.clone()),
            RoundEvent::Hints(h) => self.hints += h.len(),
            RoundEvent::Rejected { input } => self.rejected.push(input.to_string()),
            RoundEvent::Completed(_) => self.completed += 1,
        }
    }
}

fn session(lines: &[(&str, Orientation)]) -> TrainingSession {
    let variants = lines.iter().map(|(p, o)| Variant::new(*p, *o)).collect();
    TrainingSession::builder(variants)
        .with_seed(17)
        .build()
        .unwrap()
}

#[test]
fn test_clean_round_as_white() {
    let mut session = session(&[("1. e4 e5 2. Nf3 Nc6 3. Bb5", Orientation::White)]);
    let mut script = Script::new(&["e2e4", "Nf3", "Bb5"]);

    let outcome = RoundDriver::new(&mut session, Orientation::White)
        .play(&mut script)
        .unwrap();

    match outcome {
        RoundOutcome::Completed(c) => {
            assert!(c.succeeded);
            assert_eq!(c.variant, VariantId(0));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(script.opponent, vec!["e5", "Nc6"]);
    assert_eq!(script.completed, 1);
    assert_eq!(session.variants()[0].stats.times_played, 1);
}

#[test]
fn test_round_as_black_ending_on_learner_move() {
    let mut session = session(&[("1. e4 c5 2. Nf3 d6", Orientation::Black)]);
    let mut script = Script::new(&["c5", "d7d6"]);

    let outcome = RoundDriver::new(&mut session, Orientation::Black)
        .play(&mut script)
        .unwrap();

    assert!(matches!(outcome, RoundOutcome::Completed(ref c) if c.succeeded));
    assert_eq!(script.opponent, vec!["e4", "Nf3"]);
}

#[test]
fn test_mistakes_are_recorded() {
    let mut session = session(&[("1. d4 d5 2. c4", Orientation::White)]);
    let mut script = Script::new(&["e4", "zz", "d4", "c4"]);

    let outcome = RoundDriver::new(&mut session, Orientation::White)
        .play(&mut script)
        .unwrap();

    match outcome {
        RoundOutcome::Completed(c) => {
            assert!(!c.succeeded);
            assert_eq!(c.penalized, vec![VariantId(0)]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(script.rejected, vec!["e4", "zz"]);
    // two mistakes at the start position
    assert_eq!(session.variants()[0].stats.error_ema, 2.0);
}

#[test]
fn test_abandoned_round_changes_nothing() {
    let mut session = session(&[("1. d4 d5 2. c4", Orientation::White)]);
    let mut script = Script::new(&["e4"]);

    let outcome = RoundDriver::new(&mut session, Orientation::White)
        .play(&mut script)
        .unwrap();

    assert!(matches!(outcome, RoundOutcome::Abandoned));
    assert!(!session.had_errors());
    assert_eq!(session.variants()[0].stats.times_played, 0);
}

#[test]
fn test_prefix_line_resets_round() {
    let mut session = session(&[
        ("1. e4 e5", Orientation::White),
        ("1. e4 e5 2. Nf3", Orientation::White),
    ]);
    let mut script = Script::new(&["e4"]);

    let outcome = RoundDriver::new(&mut session, Orientation::White)
        .play(&mut script)
        .unwrap();

    assert!(matches!(
        outcome,
        RoundOutcome::Reset(SessionError::AmbiguousCompletion { count: 2, .. })
    ));
    assert!(session.variants().iter().all(|v| v.stats.times_played == 0));
}

#[test]
fn test_hints_are_shown_before_learner_moves() {
    let mut line = Variant::new("1. e4 e5 2. Nf3", Orientation::White);
    line.annotate(START_FEN, Annotation::arrow(Brush::Green, "e2", "e4"));
    let mut session = TrainingSession::builder(vec![line])
        .with_seed(3)
        .build()
        .unwrap();
    let mut script = Script::new(&["e4", "Nf3"]);

    RoundDriver::new(&mut session, Orientation::White)
        .play(&mut script)
        .unwrap();
    assert_eq!(script.hints, 1);
}
