use super::*;
use crate::rules::ShakmatyRules;
use crate::variant::{Orientation, VariantStats};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MORPHY: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6";
const BERLIN: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 Nf6";
const AFTER_BB5: &str = "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";

fn setup(pgns: &[&str]) -> (Vec<Variant>, PositionIndex) {
    let variants: Vec<Variant> = pgns
        .iter()
        .map(|p| Variant::new(*p, Orientation::White))
        .collect();
    let index = PositionIndex::build(&ShakmatyRules, &variants).unwrap();
    (variants, index)
}

#[test]
fn test_sample_walks_in_order() {
    let p = [0.25, 0.25, 0.5];
    assert_eq!(sample(&p, 0.0), 0);
    assert_eq!(sample(&p, 0.25), 0);
    assert_eq!(sample(&p, 0.3), 1);
    assert_eq!(sample(&p, 0.75), 2);
    assert_eq!(sample(&p, 0.999), 2);
}

#[test]
fn test_sample_falls_back_to_last() {
    // Rounding can leave the sum slightly below the draw.
    let p = [0.3, 0.3, 0.3];
    assert_eq!(sample(&p, 0.95), 2);
}

#[test]
fn test_claims_at_shared_position() {
    let (variants, index) = setup(&[MORPHY, BERLIN]);
    let settings = WeightSettings::default();
    let selector = MoveSelector::new(&ShakmatyRules, &index, &variants, &settings);

    let claims = selector.claims(AFTER_BB5).unwrap();
    assert_eq!(claims.len(), 2);
    let sans: Vec<(VariantId, &str)> = claims.iter().map(|(v, m)| (*v, m.san.as_str())).collect();
    assert!(sans.contains(&(VariantId(0), "a6")));
    assert!(sans.contains(&(VariantId(1), "Nf6")));
}

#[test]
fn test_equal_weights_give_equal_probabilities() {
    let (variants, index) = setup(&[MORPHY, BERLIN]);
    let settings = WeightSettings::default();
    let selector = MoveSelector::new(&ShakmatyRules, &index, &variants, &settings);

    let candidates = selector.weigh(selector.claims(AFTER_BB5).unwrap());
    let total: f64 = candidates.iter().map(|c| c.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    for c in &candidates {
        assert!((c.probability - 0.5).abs() < 1e-12);
    }
}

#[test]
fn test_probabilities_follow_weights() {
    let (mut variants, _) = setup(&[MORPHY, BERLIN]);
    variants[0].stats = VariantStats {
        error_ema: 1.0,
        ..Default::default()
    };
    let index = PositionIndex::build(&ShakmatyRules, &variants).unwrap();
    let settings = WeightSettings::default();
    let selector = MoveSelector::new(&ShakmatyRules, &index, &variants, &settings);

    let candidates = selector.weigh(selector.claims(AFTER_BB5).unwrap());
    let morphy = candidates.iter().find(|c| c.variant == VariantId(0)).unwrap();
    // error factor 4 vs 1
    assert!((morphy.probability - 0.8).abs() < 1e-12);
}

#[test]
fn test_select_single_line_follows_it() {
    let (variants, index) = setup(&[MORPHY]);
    let settings = WeightSettings::default();
    let selector = MoveSelector::new(&ShakmatyRules, &index, &variants, &settings);
    let mut rng = StdRng::seed_from_u64(1);

    let rules = ShakmatyRules;
    let expected = rules.parse_movetext(MORPHY);
    let positions = rules.replay(&expected).unwrap();
    for (ply, san) in expected.iter().enumerate() {
        let selection = selector.select(&positions[ply], ply, &mut rng).unwrap();
        assert_eq!(&selection.mv().san, san);
        assert!(selection.is_picked(VariantId(0)));
    }
}

#[test]
fn test_select_at_leaf_fails() {
    let (variants, index) = setup(&[MORPHY]);
    let settings = WeightSettings::default();
    let selector = MoveSelector::new(&ShakmatyRules, &index, &variants, &settings);
    let leaf = "r1bqkbnr/1ppp1ppp/p1n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4";

    let err = selector
        .select(leaf, 6, &mut StdRng::seed_from_u64(3))
        .unwrap_err();
    assert!(matches!(err, SessionError::NoApplicableMove { ply: 6, .. }));
}

#[test]
fn test_same_seed_same_choice() {
    let (variants, index) = setup(&[MORPHY, BERLIN]);
    let settings = WeightSettings::default();
    let selector = MoveSelector::new(&ShakmatyRules, &index, &variants, &settings);

    let mut a = StdRng::seed_from_u64(42);
    let mut b = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let x = selector.select(AFTER_BB5, 5, &mut a).unwrap();
        let y = selector.select(AFTER_BB5, 5, &mut b).unwrap();
        assert_eq!(x.chosen().variant, y.chosen().variant);
    }
}

fn struggling(error_ema: f64) -> VariantStats {
    VariantStats {
        error_ema,
        ..Default::default()
    }
}

#[test]
fn test_overflowing_weights_stay_normalized() {
    let (mut variants, index) = setup(&[MORPHY, BERLIN]);
    variants[0].stats = struggling(10.0);
    variants[1].stats = struggling(10.0);
    let settings = WeightSettings {
        error_power: 400.0,
        ..Default::default()
    };
    let selector = MoveSelector::new(&ShakmatyRules, &index, &variants, &settings);

    let candidates = selector.weigh(selector.claims(AFTER_BB5).unwrap());
    assert!(candidates.iter().all(|c| c.factors.weight.is_infinite()));
    for c in &candidates {
        assert!((c.probability - 0.5).abs() < 1e-12);
    }

    let mut rng = StdRng::seed_from_u64(11);
    let picked_a6 = (0..200)
        .filter(|_| {
            let selection = selector.select(AFTER_BB5, 5, &mut rng).unwrap();
            selection.mv().san == "a6"
        })
        .count();
    assert!((60..=140).contains(&picked_a6), "a6 picked {picked_a6}/200");
}

#[test]
fn test_overflowing_weights_keep_their_ratio() {
    let (mut variants, index) = setup(&[MORPHY, BERLIN]);
    variants[0].stats = struggling(10.0);
    variants[1].stats = struggling(9.0);
    let settings = WeightSettings {
        error_power: 400.0,
        ..Default::default()
    };
    let selector = MoveSelector::new(&ShakmatyRules, &index, &variants, &settings);

    let candidates = selector.weigh(selector.claims(AFTER_BB5).unwrap());
    let total: f64 = candidates.iter().map(|c| c.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    let morphy = candidates.iter().find(|c| c.variant == VariantId(0)).unwrap();
    // (11/10)^400 in favour of the line with more errors
    assert!(morphy.probability > 0.999);
}
