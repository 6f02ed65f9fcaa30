use crate::{
    model::{
        beatmap::Beatmap,
        error::{CalcError, InvalidInput},
        mods::GameMods,
    },
    osu::{OsuDifficultyAttributes, OsuStrains},
    util::macros::log_debug,
};

pub mod object;
pub mod skills;

/// Difficulty calculator on osu!standard maps.
///
/// # Example
///
/// ```
/// use strain_pp::{model::hit_object::{HitObject, Pos}, Beatmap, Difficulty};
///
/// let map = Beatmap::new(vec![
///     HitObject::circle(Pos::new(100.0, 100.0), 0.0),
///     HitObject::circle(Pos::new(300.0, 100.0), 500.0),
///     HitObject::circle(Pos::new(100.0, 300.0), 1000.0),
/// ]);
///
/// let attrs = Difficulty::new()
///     .mods(8 + 64) // HDDT
///     .calculate(&map)
///     .unwrap();
///
/// assert_eq!(attrs.max_combo, 3);
/// assert!(attrs.stars > 0.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct Difficulty {
    mods: GameMods,
    passed_objects: Option<u32>,
    clock_rate: Option<f64>,
    ar: Option<ModsDependent>,
    cs: Option<ModsDependent>,
    hp: Option<ModsDependent>,
    od: Option<ModsDependent>,
}

/// A beatmap attribute that may or may not have mods applied already.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModsDependent {
    pub value: f32,
    pub with_mods: bool,
}

impl ModsDependent {
    pub const fn new(value: f32) -> Self {
        Self {
            value,
            with_mods: false,
        }
    }
}

impl Difficulty {
    /// Create a new difficulty calculator.
    pub const fn new() -> Self {
        Self {
            mods: GameMods::new(),
            passed_objects: None,
            clock_rate: None,
            ar: None,
            cs: None,
            hp: None,
            od: None,
        }
    }

    /// Specify mods through their bit values or a [`GameMods`].
    ///
    /// See [https://github.com/ppy/osu-api/wiki#mods](https://github.com/ppy/osu-api/wiki#mods)
    pub fn mods(self, mods: impl Into<GameMods>) -> Self {
        Self {
            mods: mods.into(),
            ..self
        }
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
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

    /// Override a beatmap's set AR.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn ar(mut self, ar: f32, with_mods: bool) -> Self {
        self.ar = Some(ModsDependent {
            value: ar,
            with_mods,
        });

        self
    }

    /// Override a beatmap's set CS.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn cs(mut self, cs: f32, with_mods: bool) -> Self {
        self.cs = Some(ModsDependent {
            value: cs,
            with_mods,
        });

        self
    }

    /// Override a beatmap's set HP.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn hp(mut self, hp: f32, with_mods: bool) -> Self {
        self.hp = Some(ModsDependent {
            value: hp,
            with_mods,
        });

        self
    }

    /// Override a beatmap's set OD.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn od(mut self, od: f32, with_mods: bool) -> Self {
        self.od = Some(ModsDependent {
            value: od,
            with_mods,
        });

        self
    }

    /// Perform the difficulty calculation.
    ///
    /// Fails if the mods cannot be combined or the map is malformed. Nothing
    /// is evaluated in that case.
    pub fn calculate(&self, map: &Beatmap) -> Result<OsuDifficultyAttributes, CalcError> {
        self.check(map)?;

        Ok(crate::osu::difficulty::difficulty(self, map))
    }

    /// Perform the difficulty calculation but instead of evaluating the skill
    /// strains, return them as is.
    ///
    /// Suitable to plot the difficulty of a map over time.
    pub fn strains(&self, map: &Beatmap) -> Result<OsuStrains, CalcError> {
        self.check(map)?;

        Ok(crate::osu::strains::strains(self, map))
    }

    fn check(&self, map: &Beatmap) -> Result<(), CalcError> {
        if let Err(err) = self.mods.check() {
            log_debug!("rejected mods {}: {err}", self.mods.bits());

            return Err(err.into());
        }

        if let Some(clock_rate) = self.clock_rate {
            if !(clock_rate.is_finite() && clock_rate > 0.0) {
                log_debug!("rejected clock rate {clock_rate}");

                return Err(InvalidInput::ClockRate(clock_rate).into());
            }
        }

        let overrides = [
            ("ar", self.ar),
            ("cs", self.cs),
            ("hp", self.hp),
            ("od", self.od),
        ];

        for (name, value) in overrides {
            if value.is_some_and(|value| !Beatmap::DIFFICULTY_RANGE.contains(&value.value)) {
                log_debug!("rejected {name} override");

                return Err(InvalidInput::BeatmapAttribute(name).into());
            }
        }

        if let Err(err) = map.check() {
            log_debug!("rejected beatmap: {err}");

            return Err(err.into());
        }

        Ok(())
    }

    pub(crate) const fn get_mods(&self) -> GameMods {
        self.mods
    }

    pub(crate) fn get_clock_rate(&self) -> f64 {
        self.clock_rate.unwrap_or_else(|| self.mods.clock_rate())
    }

    pub(crate) fn get_passed_objects(&self) -> usize {
        self.passed_objects.map_or(usize::MAX, |n| n as usize)
    }

    pub(crate) const fn get_ar(&self) -> Option<ModsDependent> {
        self.ar
    }

    pub(crate) const fn get_cs(&self) -> Option<ModsDependent> {
        self.cs
    }

    pub(crate) const fn get_hp(&self) -> Option<ModsDependent> {
        self.hp
    }

    pub(crate) const fn get_od(&self) -> Option<ModsDependent> {
        self.od
    }
}
