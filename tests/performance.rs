use strain_pp::{
    model::error::InvalidInput,
    osu::{OsuDifficultyAttributes, OsuPerformanceAttributes, OsuScoreState},
    Beatmap, CalcError, Difficulty, HitResultPriority, OsuPerformance,
};

use self::common::*;

mod common;

const HD: u32 = 8;
const HR: u32 = 16;
const DT: u32 = 64;

fn map() -> Beatmap {
    zigzag(200)
}

fn attrs(mods: u32) -> OsuDifficultyAttributes {
    Difficulty::new().mods(mods).calculate(&map()).unwrap()
}

fn fc_state(attrs: &OsuDifficultyAttributes) -> OsuScoreState {
    OsuScoreState {
        max_combo: attrs.max_combo,
        n300: attrs.n_objects(),
        n100: 0,
        n50: 0,
        misses: 0,
    }
}

fn calc(attrs: &OsuDifficultyAttributes, state: OsuScoreState) -> OsuPerformanceAttributes {
    OsuPerformance::from(attrs.clone())
        .state(state)
        .calculate()
        .unwrap()
}

#[test]
fn map_and_attributes_agree() {
    let map = map();

    let from_map = OsuPerformance::new(&map)
        .mods(HD + HR)
        .accuracy(98.5)
        .misses(2)
        .calculate()
        .unwrap();

    let from_attrs = OsuPerformance::from(attrs(HD + HR))
        .accuracy(98.5)
        .misses(2)
        .calculate()
        .unwrap();

    assert_eq!(from_map, from_attrs);

    let via_map = map.performance().mods(HD + HR).accuracy(98.5).misses(2);

    assert_eq!(via_map.calculate().unwrap(), from_map);
}

#[test]
fn full_combo_is_best() {
    let attrs = attrs(HD);
    let fc = calc(&attrs, fc_state(&attrs));

    assert!(fc.pp > 0.0);
    assert_eq_float(fc.effective_miss_count, 0.0, "effective_miss_count");

    let n_objects = attrs.n_objects();

    for n100 in [1, 5, 20] {
        for n50 in [0, 3] {
            let state = OsuScoreState {
                max_combo: attrs.max_combo,
                n300: n_objects - n100 - n50,
                n100,
                n50,
                misses: 0,
            };

            assert!(calc(&attrs, state).pp < fc.pp, "n100={n100} n50={n50}");
        }
    }
}

#[test]
fn monotonic_in_combo() {
    let attrs = attrs(0);
    let mut state = fc_state(&attrs);
    state.n300 -= 1;
    state.misses = 1;

    let mut prev = 0.0;

    for combo in (0..attrs.max_combo).step_by(17) {
        state.max_combo = combo;
        let pp = calc(&attrs, state).pp;

        assert!(pp >= prev, "combo {combo}: {pp} < {prev}");
        prev = pp;
    }
}

#[test]
fn monotonic_in_accuracy() {
    let attrs = attrs(DT);
    let mut prev = 0.0;

    for acc in [80.0, 85.0, 90.0, 93.0, 95.0, 97.0, 98.0, 99.0, 99.5, 100.0] {
        let pp = OsuPerformance::from(attrs.clone())
            .accuracy(acc)
            .misses(1)
            .calculate()
            .unwrap()
            .pp;

        assert!(pp >= prev, "acc {acc}: {pp} < {prev}");
        prev = pp;
    }
}

#[test]
fn combo_above_max_is_clamped() {
    let attrs = attrs(0);

    let clamped = OsuPerformance::from(attrs.clone())
        .combo(attrs.max_combo + 1000)
        .calculate()
        .unwrap();

    let max = OsuPerformance::from(attrs.clone())
        .combo(attrs.max_combo)
        .calculate()
        .unwrap();

    assert_eq!(clamped, max);

    let mut perf = OsuPerformance::from(attrs.clone())
        .combo(attrs.max_combo + 1000)
        .misses(3);

    let state = perf.generate_state().unwrap();

    assert_eq!(state.max_combo, attrs.max_combo - 3);
}

#[test]
fn miss_decreases_pp() {
    let attrs = attrs(HD);
    let fc = fc_state(&attrs);

    let with_miss = OsuScoreState {
        n300: fc.n300 - 1,
        misses: 1,
        ..fc
    };

    assert!(calc(&attrs, with_miss).pp < calc(&attrs, fc).pp);
}

#[test]
fn partial_play() {
    let map = map();

    let partial = OsuPerformance::new(&map)
        .passed_objects(50)
        .calculate()
        .unwrap();

    let full = OsuPerformance::new(&map).calculate().unwrap();

    assert_eq!(partial.n_objects(), 50);
    assert!(partial.pp < full.pp);
}

#[test]
fn priority_keeps_accuracy() {
    let attrs = attrs(0);

    let best = OsuPerformance::from(attrs.clone())
        .accuracy(95.0)
        .generate_state()
        .unwrap();

    let worst = OsuPerformance::from(attrs.clone())
        .accuracy(95.0)
        .hitresult_priority(HitResultPriority::WorstCase)
        .generate_state()
        .unwrap();

    assert_eq_float(best.accuracy(), worst.accuracy(), "accuracy");
    assert!(worst.n50 >= best.n50);
    assert!(worst.n100 <= best.n100);
    assert_eq!(best.total_hits(), attrs.n_objects());
    assert_eq!(worst.total_hits(), attrs.n_objects());
}

#[test]
fn rejects_invalid_accuracy() {
    let err = OsuPerformance::new(&map())
        .accuracy(101.0)
        .calculate()
        .unwrap_err();

    assert_eq!(err, CalcError::InvalidInput(InvalidInput::Accuracy(101.0)));
}

#[test]
fn rejects_invalid_attributes() {
    let mut attrs = attrs(0);
    attrs.aim = f64::INFINITY;

    let err = OsuPerformance::from(attrs).calculate().unwrap_err();

    assert_eq!(
        err,
        CalcError::InvalidInput(InvalidInput::DifficultyAttribute("aim"))
    );
}

#[test]
fn rejects_malformed_map() {
    let mut map = map();
    map.hit_objects.swap(3, 7);

    let err = OsuPerformance::new(&map).calculate().unwrap_err();

    assert!(matches!(
        err,
        CalcError::InvalidInput(InvalidInput::UnsortedObjects { .. })
    ));
}

#[test]
fn thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Beatmap>();
    assert_send_sync::<strain_pp::GameMods>();
    assert_send_sync::<Difficulty>();
    assert_send_sync::<OsuPerformance<'static>>();
    assert_send_sync::<OsuDifficultyAttributes>();
    assert_send_sync::<OsuPerformanceAttributes>();
    assert_send_sync::<CalcError>();
}

#[test]
fn slow_low_difficulty_map() {
    let mut map = map();
    map.ar = 0.0;
    map.od = 0.0;

    // EZ HT pushes AR and OD below zero
    let attrs = Difficulty::new().mods(2 + 256).calculate(&map).unwrap();

    assert!(attrs.ar < 0.0);
    assert!(attrs.od < 0.0);

    let perf = OsuPerformance::from(attrs).accuracy(97.0).calculate().unwrap();

    assert!(perf.pp > 0.0 && perf.pp.is_finite());
    assert!(perf.pp_acc.is_finite());
}
