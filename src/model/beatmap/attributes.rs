use crate::{
    any::difficulty::{Difficulty, ModsDependent},
    model::mods::GameMods,
    util::difficulty::difficulty_range,
};

use super::Beatmap;

/// Summary struct for a [`Beatmap`]'s attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct BeatmapAttributes {
    /// The approach rate.
    pub ar: f64,
    /// The overall difficulty.
    pub od: f64,
    /// The circle size.
    pub cs: f64,
    /// The health drain rate
    pub hp: f64,
    /// The clock rate with respect to mods.
    pub clock_rate: f64,
    /// The hit windows for approach rate and overall difficulty.
    pub hit_windows: HitWindows,
}

/// AR and OD hit windows
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitWindows {
    /// Hit window for approach rate i.e. `TimePreempt` in milliseconds.
    pub ar: f64,
    /// Hit window for overall difficulty i.e. time to hit a 300 ("Great") in milliseconds.
    pub od: f64,
}

/// A builder for [`BeatmapAttributes`] and [`HitWindows`].
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct BeatmapAttributesBuilder {
    ar: ModsDependent,
    od: ModsDependent,
    cs: ModsDependent,
    hp: ModsDependent,
    mods: GameMods,
    clock_rate: Option<f64>,
}

impl BeatmapAttributesBuilder {
    pub(crate) const PREEMPT_MIN: f64 = 1800.0;
    pub(crate) const PREEMPT_MID: f64 = 1200.0;
    pub(crate) const PREEMPT_MAX: f64 = 450.0;

    const GREAT_MIN: f64 = 80.0;
    const GREAT_MID: f64 = 50.0;
    const GREAT_MAX: f64 = 20.0;

    /// Create a new [`BeatmapAttributesBuilder`].
    ///
    /// Attributes are set to `5.0`.
    pub const fn new() -> Self {
        Self {
            ar: ModsDependent::new(Beatmap::DEFAULT_DIFFICULTY),
            od: ModsDependent::new(Beatmap::DEFAULT_DIFFICULTY),
            cs: ModsDependent::new(Beatmap::DEFAULT_DIFFICULTY),
            hp: ModsDependent::new(Beatmap::DEFAULT_DIFFICULTY),
            mods: GameMods::new(),
            clock_rate: None,
        }
    }

    /// Use the given [`Beatmap`]'s attributes.
    pub const fn map(self, map: &Beatmap) -> Self {
        Self {
            ar: ModsDependent::new(map.ar),
            od: ModsDependent::new(map.od),
            cs: ModsDependent::new(map.cs),
            hp: ModsDependent::new(map.hp),
            ..self
        }
    }

    /// Specify the approach rate.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn ar(self, ar: f32, with_mods: bool) -> Self {
        Self {
            ar: ModsDependent {
                value: ar,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the overall difficulty.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn od(self, od: f32, with_mods: bool) -> Self {
        Self {
            od: ModsDependent {
                value: od,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the circle size.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn cs(self, cs: f32, with_mods: bool) -> Self {
        Self {
            cs: ModsDependent {
                value: cs,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the drain rate.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn hp(self, hp: f32, with_mods: bool) -> Self {
        Self {
            hp: ModsDependent {
                value: hp,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the mods.
    pub fn mods(self, mods: impl Into<GameMods>) -> Self {
        Self {
            mods: mods.into(),
            ..self
        }
    }

    /// Specify a custom clock rate.
    pub const fn clock_rate(self, clock_rate: f64) -> Self {
        Self {
            clock_rate: Some(clock_rate),
            ..self
        }
    }

    /// Specify all settings through [`Difficulty`].
    pub fn difficulty(self, difficulty: &Difficulty) -> Self {
        Self {
            ar: difficulty.get_ar().unwrap_or(self.ar),
            od: difficulty.get_od().unwrap_or(self.od),
            cs: difficulty.get_cs().unwrap_or(self.cs),
            hp: difficulty.get_hp().unwrap_or(self.hp),
            mods: difficulty.get_mods(),
            clock_rate: Some(difficulty.get_clock_rate()),
        }
    }

    fn mod_mult(&self, value: ModsDependent) -> f32 {
        if value.with_mods {
            value.value
        } else if self.mods.hr() {
            (value.value * 1.4).min(10.0)
        } else if self.mods.ez() {
            value.value * 0.5
        } else {
            value.value
        }
    }

    /// The approach rate after applying mods but before the clock rate.
    pub(crate) fn raw_ar(&self) -> f64 {
        f64::from(self.mod_mult(self.ar))
    }

    /// The overall difficulty after applying mods but before the clock rate.
    pub(crate) fn raw_od(&self) -> f64 {
        f64::from(self.mod_mult(self.od))
    }

    /// The circle size after applying mods.
    pub(crate) fn raw_cs(&self) -> f32 {
        let cs = self.cs.value;

        if self.cs.with_mods {
            cs
        } else if self.mods.hr() {
            (cs * 1.3).min(10.0)
        } else if self.mods.ez() {
            cs * 0.5
        } else {
            cs
        }
    }

    /// Calculate the AR and OD hit windows.
    pub fn hit_windows(&self) -> HitWindows {
        let clock_rate = self
            .clock_rate
            .unwrap_or_else(|| self.mods.clock_rate());

        let ar_clock_rate = if self.ar.with_mods { 1.0 } else { clock_rate };
        let od_clock_rate = if self.od.with_mods { 1.0 } else { clock_rate };

        let preempt = difficulty_range(
            self.raw_ar(),
            Self::PREEMPT_MIN,
            Self::PREEMPT_MID,
            Self::PREEMPT_MAX,
        ) / ar_clock_rate;

        let great = difficulty_range(
            self.raw_od(),
            Self::GREAT_MIN,
            Self::GREAT_MID,
            Self::GREAT_MAX,
        ) / od_clock_rate;

        HitWindows {
            ar: preempt,
            od: great,
        }
    }

    /// Calculate the [`BeatmapAttributes`].
    pub fn build(&self) -> BeatmapAttributes {
        let clock_rate = self
            .clock_rate
            .unwrap_or_else(|| self.mods.clock_rate());

        // HP
        let mut hp = self.hp.value;

        if !self.hp.with_mods {
            hp *= self.mods.od_ar_hp_multiplier() as f32;
        }

        hp = hp.min(10.0);

        let hit_windows = self.hit_windows();
        let HitWindows { ar, od } = hit_windows;

        // AR
        let ar = if ar > Self::PREEMPT_MID {
            (Self::PREEMPT_MIN - ar) / 120.0
        } else {
            (Self::PREEMPT_MID - ar) / 150.0 + 5.0
        };

        // OD
        let od = (Self::GREAT_MIN - od) / 6.0;

        BeatmapAttributes {
            ar,
            od,
            cs: f64::from(self.raw_cs()),
            hp: f64::from(hp),
            clock_rate,
            hit_windows,
        }
    }
}

impl From<&Beatmap> for BeatmapAttributesBuilder {
    fn from(map: &Beatmap) -> Self {
        Self::new().map(map)
    }
}

impl Default for BeatmapAttributesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
