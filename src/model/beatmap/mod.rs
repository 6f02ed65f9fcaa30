use std::{mem, ops::RangeInclusive};

use crate::{
    model::error::InvalidInput,
    osu::{slider_events, OsuPerformance},
    util::float_ext::FloatExt,
    Difficulty,
};

pub use self::attributes::{BeatmapAttributes, BeatmapAttributesBuilder, HitWindows};

use super::hit_object::{HitObject, HitObjectKind, Slider, Spinner};

mod attributes;

/// All beatmap data that is relevant for difficulty and performance
/// calculation.
///
/// Decoding `.osu` files is not part of this crate; the decoder is expected
/// to produce hit objects sorted by start time with all timestamps in
/// milliseconds and positions in osu!pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Beatmap {
    // General
    pub stack_leniency: f32,

    // Difficulty
    pub ar: f32,
    pub cs: f32,
    pub hp: f32,
    pub od: f32,

    // HitObjects
    pub hit_objects: Vec<HitObject>,
}

impl Beatmap {
    pub const DEFAULT_STACK_LENIENCY: f32 = 0.7;
    pub const DEFAULT_DIFFICULTY: f32 = 5.0;

    /// Valid values for AR, CS, HP, and OD, both on the map and as
    /// overrides.
    ///
    /// Above the upper bound the preempt time, the great hit window, or the
    /// circle radius would no longer be positive.
    pub const DIFFICULTY_RANGE: RangeInclusive<f32> = -20.0..=12.0;

    /// Create a [`Beatmap`] with default attributes for the given hit
    /// objects.
    pub const fn new(hit_objects: Vec<HitObject>) -> Self {
        Self {
            stack_leniency: Self::DEFAULT_STACK_LENIENCY,
            ar: Self::DEFAULT_DIFFICULTY,
            cs: Self::DEFAULT_DIFFICULTY,
            hp: Self::DEFAULT_DIFFICULTY,
            od: Self::DEFAULT_DIFFICULTY,
            hit_objects,
        }
    }

    /// Returns a [`BeatmapAttributesBuilder`] to calculate modified beatmap
    /// attributes.
    pub fn attributes(&self) -> BeatmapAttributesBuilder {
        BeatmapAttributesBuilder::new().map(self)
    }

    /// Create a difficulty calculator.
    pub const fn difficulty(&self) -> Difficulty {
        Difficulty::new()
    }

    /// Create a performance calculator for this [`Beatmap`].
    pub fn performance(&self) -> OsuPerformance<'_> {
        OsuPerformance::new(self)
    }

    /// Ensure that the map can be calculated.
    ///
    /// Hit objects must be sorted by start time, have finite times and
    /// positions, and non-negative durations. Sliders need a positive
    /// velocity, at most [`Slider::MAX_REPEATS`] repeats, and a tick distance
    /// of either `0.0` or at least [`Slider::MIN_TICK_DISTANCE`]. AR, CS, HP,
    /// and OD must lie within [`Beatmap::DIFFICULTY_RANGE`].
    ///
    /// An object equal in start time, position, and kind to its
    /// predecessor counts as a duplicate.
    pub fn check(&self) -> Result<(), InvalidInput> {
        let attrs = [
            ("ar", self.ar),
            ("cs", self.cs),
            ("hp", self.hp),
            ("od", self.od),
        ];

        if let Some(&(name, _)) = attrs
            .iter()
            .find(|(_, value)| !Self::DIFFICULTY_RANGE.contains(value))
        {
            return Err(InvalidInput::BeatmapAttribute(name));
        }

        if !self.stack_leniency.is_finite() {
            return Err(InvalidInput::BeatmapAttribute("stack_leniency"));
        }

        let mut prev: Option<&HitObject> = None;

        for (idx, h) in self.hit_objects.iter().enumerate() {
            if !(h.start_time.is_finite() && h.pos.x.is_finite() && h.pos.y.is_finite()) {
                return Err(InvalidInput::NonFiniteObject { idx });
            }

            match h.kind {
                HitObjectKind::Circle => {}
                HitObjectKind::Slider(ref slider) => {
                    if !(slider.velocity.is_finite() && slider.velocity > 0.0) {
                        return Err(InvalidInput::InvalidSliderVelocity { idx });
                    }

                    if !(slider.path.is_finite() && slider.tick_distance.is_finite()) {
                        return Err(InvalidInput::InvalidSliderPath { idx });
                    }

                    if slider.repeats > Slider::MAX_REPEATS {
                        return Err(InvalidInput::TooManyRepeats {
                            idx,
                            max: Slider::MAX_REPEATS,
                        });
                    }

                    let tick_distance = slider.tick_distance;

                    let no_ticks = FloatExt::eq(tick_distance, 0.0);

                    if tick_distance < Slider::MIN_TICK_DISTANCE && !no_ticks {
                        return Err(InvalidInput::TickDistance {
                            idx,
                            min: Slider::MIN_TICK_DISTANCE,
                        });
                    }

                    if slider_events::nested_count(slider) > slider_events::MAX_NESTED_OBJECTS {
                        return Err(InvalidInput::TooManyNestedObjects {
                            idx,
                            max: slider_events::MAX_NESTED_OBJECTS,
                        });
                    }
                }
                HitObjectKind::Spinner(Spinner { duration }) => {
                    if !duration.is_valid_non_negative() {
                        return Err(InvalidInput::NegativeDuration { idx });
                    }
                }
            }

            if let Some(prev) = prev {
                if h.start_time < prev.start_time {
                    return Err(InvalidInput::UnsortedObjects { idx });
                }

                let duplicate = FloatExt::eq(h.start_time, prev.start_time)
                    && h.pos == prev.pos
                    && mem::discriminant(&h.kind) == mem::discriminant(&prev.kind);

                if duplicate {
                    return Err(InvalidInput::DuplicateObject { idx });
                }
            }

            prev = Some(h);
        }

        Ok(())
    }
}

impl Default for Beatmap {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
