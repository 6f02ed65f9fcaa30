use std::cmp;

use crate::{
    any::{difficulty::Difficulty, HitResultPriority},
    model::{
        beatmap::Beatmap,
        error::{CalcError, InvalidInput},
        mods::GameMods,
    },
    osu::{OsuDifficultyAttributes, OsuPerformanceAttributes, OsuScoreState},
    util::{
        float_ext::FloatExt,
        macros::{log_debug, log_warn},
        map_or_attrs::MapOrAttrs,
    },
};

use self::calculator::OsuPerformanceCalculator;

pub use self::calculator::PERFORMANCE_BASE_MULTIPLIER;

mod calculator;

/// Performance calculator on osu!standard maps.
///
/// # Example
///
/// ```
/// use strain_pp::{model::hit_object::{HitObject, Pos}, Beatmap, OsuPerformance};
///
/// let map = Beatmap::new(vec![
///     HitObject::circle(Pos::new(100.0, 100.0), 0.0),
///     HitObject::circle(Pos::new(300.0, 100.0), 300.0),
///     HitObject::circle(Pos::new(100.0, 300.0), 600.0),
///     HitObject::circle(Pos::new(300.0, 300.0), 900.0),
/// ]);
///
/// let attrs = OsuPerformance::new(&map)
///     .mods(8) // HD
///     .accuracy(97.0)
///     .misses(1)
///     .calculate()
///     .unwrap();
///
/// assert!(attrs.pp >= 0.0);
///
/// // Reuse the difficulty attributes for a different score
/// let fc = attrs.clone().performance().calculate().unwrap();
///
/// assert!(fc.pp >= attrs.pp);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct OsuPerformance<'map> {
    pub(crate) map_or_attrs: MapOrAttrs<'map>,
    pub(crate) mods: Option<GameMods>,
    pub(crate) acc: Option<f64>,
    pub(crate) combo: Option<u32>,
    pub(crate) n300: Option<u32>,
    pub(crate) n100: Option<u32>,
    pub(crate) n50: Option<u32>,
    pub(crate) misses: Option<u32>,
    pub(crate) passed_objects: Option<u32>,
    pub(crate) clock_rate: Option<f64>,
    pub(crate) hitresult_priority: HitResultPriority,
}

impl<'map> OsuPerformance<'map> {
    /// Create a new performance calculator for osu!standard maps.
    pub fn new(map: &'map Beatmap) -> Self {
        map.into()
    }

    /// Use the attributes of a previous calculation instead of
    /// recalculating them from a map.
    ///
    /// The attributes must have been calculated for the same mods, clock
    /// rate and amount of passed objects.
    pub fn attributes(mut self, attrs: impl Into<OsuDifficultyAttributes>) -> Self {
        self.map_or_attrs = MapOrAttrs::Attrs(attrs.into());

        self
    }

    /// Specify mods through their bit values or a [`GameMods`].
    ///
    /// Without mods, the mods stored in the difficulty attributes are used.
    ///
    /// See [https://github.com/ppy/osu-api/wiki#mods](https://github.com/ppy/osu-api/wiki#mods)
    pub fn mods(mut self, mods: impl Into<GameMods>) -> Self {
        self.mods = Some(mods.into());

        self
    }

    /// Specify the max combo of the play.
    pub const fn combo(mut self, combo: u32) -> Self {
        self.combo = Some(combo);

        self
    }

    /// Specify how hitresults should be generated.
    ///
    /// Defaults to [`HitResultPriority::BestCase`].
    pub const fn hitresult_priority(mut self, priority: HitResultPriority) -> Self {
        self.hitresult_priority = priority;

        self
    }

    /// Specify the amount of 300s of a play.
    pub const fn n300(mut self, n300: u32) -> Self {
        self.n300 = Some(n300);

        self
    }

    /// Specify the amount of 100s of a play.
    pub const fn n100(mut self, n100: u32) -> Self {
        self.n100 = Some(n100);

        self
    }

    /// Specify the amount of 50s of a play.
    pub const fn n50(mut self, n50: u32) -> Self {
        self.n50 = Some(n50);

        self
    }

    /// Specify the amount of misses of a play.
    pub const fn misses(mut self, n_misses: u32) -> Self {
        self.misses = Some(n_misses);

        self
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    ///
    /// If you want to calculate the performance after every few objects,
    /// reuse the difficulty attributes of the full map only if the amount
    /// of passed objects is the same.
    pub const fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.passed_objects = Some(passed_objects);

        self
    }

    /// Adjust the clock rate used in the calculation.
    ///
    /// If none is specified, it will take the clock rate based on the mods
    /// i.e. 1.5 for DT, 0.75 for HT and 1.0 otherwise.
    ///
    /// The clock rate must be positive and finite.
    pub const fn clock_rate(mut self, clock_rate: f64) -> Self {
        self.clock_rate = Some(clock_rate);

        self
    }

    /// Provide parameters through an [`OsuScoreState`].
    pub const fn state(mut self, state: OsuScoreState) -> Self {
        let OsuScoreState {
            max_combo,
            n300,
            n100,
            n50,
            misses,
        } = state;

        self.combo = Some(max_combo);
        self.n300 = Some(n300);
        self.n100 = Some(n100);
        self.n50 = Some(n50);
        self.misses = Some(misses);

        self
    }

    /// Specify the accuracy of a play between `0.0` and `100.0`.
    /// This will be used to generate matching hitresults.
    pub const fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc);

        self
    }

    fn check(&self) -> Result<(), CalcError> {
        if let Some(mods) = self.mods {
            if let Err(err) = mods.check() {
                log_debug!("rejected mods {mods}: {err}");

                return Err(err.into());
            }
        }

        if let Some(acc) = self.acc {
            if !(0.0..=100.0).contains(&acc) {
                log_debug!("rejected accuracy {acc}");

                return Err(InvalidInput::Accuracy(acc).into());
            }
        }

        if let Some(clock_rate) = self.clock_rate {
            if !(clock_rate.is_finite() && clock_rate > 0.0) {
                log_debug!("rejected clock rate {clock_rate}");

                return Err(InvalidInput::ClockRate(clock_rate).into());
            }
        }

        Ok(())
    }

    /// Create the [`OsuScoreState`] that will be used for performance
    /// calculation.
    ///
    /// Missing hitresults are generated so that they match the given
    /// accuracy as closely as possible. Without accuracy, the hitresults
    /// are filled in according to the [`HitResultPriority`].
    pub fn generate_state(&mut self) -> Result<OsuScoreState, CalcError> {
        self.check()?;

        let attrs = match self.map_or_attrs {
            MapOrAttrs::Map(map) => {
                let attrs = self.generate_attributes(map)?;

                self.map_or_attrs.insert_attrs(attrs)
            }
            MapOrAttrs::Attrs(ref attrs) => attrs,
        };

        if let Err(err) = check_attributes(attrs) {
            log_debug!("rejected difficulty attributes: {err}");

            return Err(err.into());
        }

        let attrs_max_combo = attrs.max_combo;
        let attrs_n_objects = attrs.n_objects();

        let n_objects = cmp::min(
            self.passed_objects.unwrap_or(attrs_n_objects),
            attrs_n_objects,
        );

        let given_hits: u64 = [self.n300, self.n100, self.n50, self.misses]
            .into_iter()
            .flatten()
            .map(u64::from)
            .sum();

        if given_hits > u64::from(n_objects) {
            log_warn!("{given_hits} hitresults were specified for only {n_objects} objects");
        }

        let n_misses = cmp::min(self.misses.unwrap_or(0), n_objects);
        let n_remaining = n_objects - n_misses;

        let priority = self.hitresult_priority;

        let mut n300 = self.n300.map_or(0, |n| cmp::min(n, n_remaining));
        let mut n100 = self.n100.map_or(0, |n| cmp::min(n, n_remaining - n300));
        let mut n50 = self.n50.map_or(0, |n| cmp::min(n, n_remaining - n300 - n100));

        let remaining = n_remaining - n300 - n100 - n50;

        if let Some(acc) = self.acc {
            let acc = acc / 100.0;
            let target_total = acc * 6.0 * f64::from(n_objects);

            match (self.n300, self.n100, self.n50) {
                (Some(_), Some(_), Some(_)) => match priority {
                    HitResultPriority::BestCase => n300 += remaining,
                    HitResultPriority::WorstCase => n50 += remaining,
                },
                (Some(_), Some(_), None) => n50 = remaining,
                (Some(_), None, Some(_)) => n100 = remaining,
                (None, Some(_), Some(_)) => n300 = remaining,
                (Some(_), None, None) => {
                    let mut best_dist = f64::MAX;

                    let raw_n100 = target_total - 6.0 * f64::from(n300) - f64::from(remaining);
                    let min_n100 = clamp_count(raw_n100.floor(), remaining);
                    let max_n100 = clamp_count(raw_n100.ceil(), remaining);

                    for new100 in min_n100..=max_n100 {
                        let new50 = remaining - new100;
                        let dist = (acc - accuracy(n300, new100, new50, n_misses)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n100 = new100;
                            n50 = new50;
                        }
                    }
                }
                (None, Some(_), None) => {
                    let mut best_dist = f64::MAX;

                    let raw_n300 =
                        (target_total - 2.0 * f64::from(n100) - f64::from(remaining)) / 5.0;
                    let min_n300 = clamp_count(raw_n300.floor(), remaining);
                    let max_n300 = clamp_count(raw_n300.ceil(), remaining);

                    for new300 in min_n300..=max_n300 {
                        let new50 = remaining - new300;
                        let dist = (acc - accuracy(new300, n100, new50, n_misses)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n300 = new300;
                            n50 = new50;
                        }
                    }
                }
                (None, None, Some(_)) => {
                    let mut best_dist = f64::MAX;

                    let raw_n300 =
                        (target_total - 2.0 * f64::from(remaining) - f64::from(n50)) / 4.0;
                    let min_n300 = clamp_count(raw_n300.floor(), remaining);
                    let max_n300 = clamp_count(raw_n300.ceil(), remaining);

                    for new300 in min_n300..=max_n300 {
                        let new100 = remaining - new300;
                        let dist = (acc - accuracy(new300, new100, n50, n_misses)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n300 = new300;
                            n100 = new100;
                        }
                    }
                }
                (None, None, None) => {
                    let mut best_dist = f64::MAX;

                    let raw_n300 = (target_total - f64::from(remaining)) / 5.0;
                    let min_n300 = clamp_count(raw_n300.floor(), remaining);
                    let max_n300 = clamp_count(raw_n300.ceil(), remaining);

                    for new300 in min_n300..=max_n300 {
                        let rest = remaining - new300;
                        let raw_n100 =
                            target_total - f64::from(remaining) - 5.0 * f64::from(new300);
                        let min_n100 = clamp_count(raw_n100.floor(), rest);
                        let max_n100 = clamp_count(raw_n100.ceil(), rest);

                        for new100 in min_n100..=max_n100 {
                            let new50 = rest - new100;
                            let dist = (acc - accuracy(new300, new100, new50, n_misses)).abs();

                            if dist < best_dist {
                                best_dist = dist;
                                n300 = new300;
                                n100 = new100;
                                n50 = new50;
                            }
                        }
                    }

                    // Both shifts keep the accuracy as is
                    match priority {
                        HitResultPriority::BestCase => {
                            // Shift n50 to n100 by sacrificing n300
                            let n = cmp::min(n300, n50 / 4);
                            n300 -= n;
                            n100 += 5 * n;
                            n50 -= 4 * n;
                        }
                        HitResultPriority::WorstCase => {
                            // Shift n100 to n50 by gaining n300
                            let n = n100 / 5;
                            n300 += n;
                            n100 -= 5 * n;
                            n50 += 4 * n;
                        }
                    }
                }
            }
        } else {
            match priority {
                HitResultPriority::BestCase => match (self.n300, self.n100, self.n50) {
                    (None, ..) => n300 = remaining,
                    (_, None, _) => n100 = remaining,
                    (.., None) => n50 = remaining,
                    _ => n300 += remaining,
                },
                HitResultPriority::WorstCase => match (self.n50, self.n100, self.n300) {
                    (None, ..) => n50 = remaining,
                    (_, None, _) => n100 = remaining,
                    (.., None) => n300 = remaining,
                    _ => n50 += remaining,
                },
            }
        }

        let max_possible_combo = attrs_max_combo.saturating_sub(n_misses);

        let max_combo = match self.combo {
            Some(combo) if combo > max_possible_combo => {
                log_warn!(
                    "combo {combo} exceeds the maximum possible combo {max_possible_combo}, clamping"
                );

                max_possible_combo
            }
            Some(combo) => combo,
            None => max_possible_combo,
        };

        Ok(OsuScoreState {
            max_combo,
            n300,
            n100,
            n50,
            misses: n_misses,
        })
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> Result<OsuPerformanceAttributes, CalcError> {
        let state = self.generate_state()?;

        let attrs = match self.map_or_attrs {
            MapOrAttrs::Attrs(attrs) => attrs,
            MapOrAttrs::Map(map) => self.generate_attributes(map)?,
        };

        let mods = self.mods.unwrap_or(attrs.mods);
        let effective_miss_count = calculate_effective_misses(&attrs, &state);

        let inner = OsuPerformanceCalculator::new(
            attrs,
            mods,
            state.accuracy(),
            state,
            effective_miss_count,
        );

        Ok(inner.calculate())
    }

    fn generate_attributes(&self, map: &Beatmap) -> Result<OsuDifficultyAttributes, CalcError> {
        let mut difficulty = Difficulty::new().mods(self.mods.unwrap_or_default());

        if let Some(passed_objects) = self.passed_objects {
            difficulty = difficulty.passed_objects(passed_objects);
        }

        if let Some(clock_rate) = self.clock_rate {
            difficulty = difficulty.clock_rate(clock_rate);
        }

        difficulty.calculate(map)
    }
}

/// Reject attributes that would poison the calculation.
// The great hit window closes at this OD.
const MAX_OD: f64 = 80.0 / 6.0;

fn check_attributes(attrs: &OsuDifficultyAttributes) -> Result<(), InvalidInput> {
    let ratings = [
        ("stars", attrs.stars),
        ("aim", attrs.aim),
        ("speed", attrs.speed),
        ("flashlight", attrs.flashlight),
        ("slider_factor", attrs.slider_factor),
        ("speed_note_count", attrs.speed_note_count),
    ];

    if let Some((name, _)) = ratings
        .into_iter()
        .find(|(_, value)| !value.is_valid_non_negative())
    {
        return Err(InvalidInput::DifficultyAttribute(name));
    }

    // Slow rates push AR and OD below zero
    let map_values = [("ar", attrs.ar), ("od", attrs.od), ("hp", attrs.hp)];

    if let Some((name, _)) = map_values.into_iter().find(|(_, value)| !value.is_finite()) {
        return Err(InvalidInput::DifficultyAttribute(name));
    }

    if attrs.od >= MAX_OD {
        return Err(InvalidInput::DifficultyAttribute("od"));
    }

    Ok(())
}

fn clamp_count(n: f64, max: u32) -> u32 {
    n.clamp(0.0, f64::from(max)) as u32
}

/// Estimate the amount of misses including slider breaks.
pub fn calculate_effective_misses(attrs: &OsuDifficultyAttributes, state: &OsuScoreState) -> f64 {
    // Guess the number of misses + slider breaks from combo
    let mut combo_based_miss_count = 0.0;

    if attrs.n_sliders > 0 {
        let full_combo_threshold = f64::from(attrs.max_combo) - 0.1 * f64::from(attrs.n_sliders);

        if f64::from(state.max_combo) < full_combo_threshold {
            combo_based_miss_count = full_combo_threshold / f64::from(state.max_combo).max(1.0);
        }
    }

    // Clamp miss count to maximum amount of possible breaks
    combo_based_miss_count = combo_based_miss_count.min(f64::from(
        state
            .n100
            .saturating_add(state.n50)
            .saturating_add(state.misses),
    ));

    combo_based_miss_count.max(f64::from(state.misses))
}

/// Accuracy between `0.0` and `1.0` of the given hitresults.
pub fn accuracy(n300: u32, n100: u32, n50: u32, misses: u32) -> f64 {
    OsuScoreState {
        max_combo: 0,
        n300,
        n100,
        n50,
        misses,
    }
    .accuracy()
}

impl<'map> From<&'map Beatmap> for OsuPerformance<'map> {
    fn from(map: &'map Beatmap) -> Self {
        Self {
            map_or_attrs: MapOrAttrs::Map(map),
            mods: None,
            acc: None,
            combo: None,
            n300: None,
            n100: None,
            n50: None,
            misses: None,
            passed_objects: None,
            clock_rate: None,
            hitresult_priority: HitResultPriority::default(),
        }
    }
}

impl From<OsuDifficultyAttributes> for OsuPerformance<'_> {
    fn from(attrs: OsuDifficultyAttributes) -> Self {
        Self {
            map_or_attrs: MapOrAttrs::Attrs(attrs),
            mods: None,
            acc: None,
            combo: None,
            n300: None,
            n100: None,
            n50: None,
            misses: None,
            passed_objects: None,
            clock_rate: None,
            hitresult_priority: HitResultPriority::default(),
        }
    }
}

impl From<OsuPerformanceAttributes> for OsuPerformance<'_> {
    fn from(attrs: OsuPerformanceAttributes) -> Self {
        attrs.difficulty.into()
    }
}
