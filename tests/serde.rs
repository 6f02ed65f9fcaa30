#![cfg(feature = "serde")]

use strain_pp::{
    osu::{OsuDifficultyAttributes, OsuPerformanceAttributes, OsuScoreState},
    Difficulty, GameMods, OsuPerformance,
};

mod common;

#[test]
fn attributes_round_trip() {
    let map = common::zigzag(60);

    let diff = Difficulty::new().mods(8 + 64).calculate(&map).unwrap();
    let json = serde_json::to_string(&diff).unwrap();
    let deserialized: OsuDifficultyAttributes = serde_json::from_str(&json).unwrap();

    common::assert_eq_float(deserialized.stars, diff.stars, "stars");
    common::assert_eq_float(deserialized.aim, diff.aim, "aim");
    common::assert_eq_float(deserialized.speed, diff.speed, "speed");
    assert_eq!(deserialized.max_combo, diff.max_combo);
    assert_eq!(deserialized.n_sliders, diff.n_sliders);
    assert_eq!(deserialized.mods, diff.mods);

    let perf = OsuPerformance::from(diff).accuracy(97.5).calculate().unwrap();
    let json = serde_json::to_string(&perf).unwrap();
    let deserialized: OsuPerformanceAttributes = serde_json::from_str(&json).unwrap();

    common::assert_eq_float(deserialized.pp, perf.pp, "pp");
    common::assert_eq_float(deserialized.pp_acc, perf.pp_acc, "pp_acc");
    common::assert_eq_float(deserialized.stars(), perf.stars(), "stars");
}

#[test]
fn mods_are_bits() {
    let mods = GameMods::from_bits(8 + 16);

    assert_eq!(serde_json::to_string(&mods).unwrap(), "24");
    assert_eq!(serde_json::from_str::<GameMods>("24").unwrap(), mods);
}

#[test]
fn score_state_fields() {
    let state: OsuScoreState = serde_json::from_str(
        r#"{"max_combo":500,"n300":400,"n100":20,"n50":3,"misses":2}"#,
    )
    .unwrap();

    assert_eq!(state.total_hits(), 425);
    assert!(serde_json::from_str::<OsuScoreState>(r#"{"max_combo":-1}"#).is_err());
}
