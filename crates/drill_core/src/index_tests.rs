use super::*;
use crate::fen::START_FEN;
use crate::rules::ShakmatyRules;
use crate::variant::Orientation;

const MORPHY: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6";
const BERLIN: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 Nf6";

fn build(pgns: &[&str]) -> PositionIndex {
    let variants: Vec<Variant> = pgns
        .iter()
        .map(|p| Variant::new(*p, Orientation::White))
        .collect();
    PositionIndex::build(&ShakmatyRules, &variants).unwrap()
}

#[test]
fn test_single_variant_positions() {
    let index = build(&[MORPHY]);

    // Start position plus one position per move
    assert_eq!(index.len(), 7);
    assert_eq!(index.ply_count(VariantId(0)), 6);
    assert_eq!(index.lookup(START_FEN), &[VariantId(0)]);
    assert_eq!(
        index.lookup("r1bqkbnr/1ppp1ppp/p1n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4"),
        &[VariantId(0)]
    );
}

#[test]
fn test_every_prefix_is_indexed() {
    let rules = ShakmatyRules;
    let index = build(&[MORPHY]);
    let positions = rules.replay(&rules.parse_movetext(MORPHY)).unwrap();
    for fen in positions {
        assert_eq!(index.lookup(&fen), &[VariantId(0)], "missing {fen}");
    }
}

#[test]
fn test_shared_prefix() {
    let index = build(&[MORPHY, BERLIN]);
    let after_bb5 = "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";
    assert_eq!(index.lookup(after_bb5), &[VariantId(0), VariantId(1)]);
}

#[test]
fn test_flipped_move_order() {
    let index = build(&[MORPHY, "1. e4 e5 2. Bb5 Nc6 3. Nf3 Nf6"]);
    let after_bb5 = "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";
    assert_eq!(index.lookup(after_bb5), &[VariantId(0), VariantId(1)]);
}

#[test]
fn test_lookup_ignores_move_counters() {
    let index = build(&[MORPHY]);
    let after_bb5 = "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 17 40";
    assert!(index.is_known_position(after_bb5));
    assert!(!index.is_known_position(
        "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq - 0 1"
    ));
    assert!(index.lookup("8/8/8/8/8/8/8/8 w - - 0 1").is_empty());
}

#[test]
fn test_repeated_position_listed_once() {
    let index = build(&["1. Nf3 Nf6 2. Ng1 Ng8 3. e4"]);
    assert_eq!(index.lookup(START_FEN), &[VariantId(0)]);
}

#[test]
fn test_corrupt_variant_aborts_build() {
    let variants = vec![
        Variant::new(MORPHY, Orientation::White),
        Variant::new("1. e4 e5 2. Qxf7", Orientation::White),
    ];
    let err = PositionIndex::build(&ShakmatyRules, &variants).unwrap_err();
    match err {
        SessionError::CorruptVariant { variant, .. } => assert_eq!(variant, VariantId(1)),
        other => panic!("unexpected error: {other:?}"),
    }
}
