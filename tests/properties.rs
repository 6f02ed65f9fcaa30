use std::sync::OnceLock;

use proptest::prelude::*;
use strain_pp::{osu::OsuDifficultyAttributes, Difficulty, OsuPerformance};

mod common;

static ATTRS: OnceLock<OsuDifficultyAttributes> = OnceLock::new();

fn attrs() -> OsuDifficultyAttributes {
    ATTRS
        .get_or_init(|| {
            Difficulty::new()
                .calculate(&common::zigzag(150))
                .unwrap()
        })
        .to_owned()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pp_is_non_negative_and_finite(
        acc in 0.0..=100.0_f64,
        misses in 0_u32..200,
        combo in prop::option::of(0_u32..2000),
        mods in prop::sample::select(vec![0_u32, 1, 8, 16, 64, 72, 128, 256, 1024, 4096]),
    ) {
        let mut perf = OsuPerformance::from(attrs())
            .mods(mods)
            .accuracy(acc)
            .misses(misses);

        if let Some(combo) = combo {
            perf = perf.combo(combo);
        }

        let attrs = perf.calculate().unwrap();

        for value in [attrs.pp, attrs.pp_aim, attrs.pp_speed, attrs.pp_acc, attrs.pp_flashlight] {
            prop_assert!(value.is_finite());
            prop_assert!(value >= 0.0);
        }

        prop_assert!(attrs.effective_miss_count >= f64::from(misses.min(attrs.n_objects())));
    }

    #[test]
    fn more_combo_never_hurts(
        n100 in 0_u32..30,
        misses in 0_u32..5,
        combo in 0_u32..500,
        extra in 1_u32..200,
    ) {
        let perf = |combo: u32| {
            OsuPerformance::from(attrs())
                .n100(n100)
                .n50(0)
                .misses(misses)
                .combo(combo)
                .calculate()
                .unwrap()
                .pp
        };

        prop_assert!(perf(combo + extra) >= perf(combo));
    }

    #[test]
    fn excess_combo_is_ignored(extra in 1_u32..10_000) {
        let max_combo = attrs().max_combo;

        let at_max = OsuPerformance::from(attrs()).combo(max_combo).calculate().unwrap();
        let above = OsuPerformance::from(attrs())
            .combo(max_combo + extra)
            .calculate()
            .unwrap();

        prop_assert_eq!(at_max, above);
    }
}
