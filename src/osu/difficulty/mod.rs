use std::cmp;

use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mods::{GameMods, SkillEffect, SkillKind},
    },
    osu::{
        convert::convert_objects,
        difficulty::{
            object::{compute_slider_cursor_pos, OsuDifficultyObject},
            scaling_factor::ScalingFactor,
        },
        object::OsuObject,
        performance::PERFORMANCE_BASE_MULTIPLIER,
    },
    util::macros::log_trace,
};

use self::skills::{strain::OsuStrainSkill, OsuSkills};

use super::attributes::OsuDifficultyAttributes;

pub mod object;
pub mod scaling_factor;
pub mod skills;

const DIFFICULTY_MULTIPLIER: f64 = 0.0675;

const HD_FADE_IN_DURATION_MULTIPLIER: f64 = 0.4;
const HD_FADE_OUT_DURATION_MULTIPLIER: f64 = 0.3;

pub fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> OsuDifficultyAttributes {
    let DifficultyValues {
        skills:
            OsuSkills {
                aim,
                aim_no_sliders,
                speed,
                flashlight,
            },
        mut attrs,
    } = DifficultyValues::calculate(difficulty, map);

    // Nothing to evaluate, e.g. an empty map
    if attrs.n_objects() == 0 {
        return attrs;
    }

    let aim_difficulty_value = aim.difficulty_value();
    let aim_no_sliders_difficulty_value = aim_no_sliders.difficulty_value();
    let speed_relevant_note_count = speed.relevant_note_count();
    let speed_difficulty_value = speed.difficulty_value();
    let flashlight_difficulty_value = flashlight.difficulty_value();

    DifficultyValues::eval(
        &mut attrs,
        difficulty.get_mods(),
        aim_difficulty_value,
        aim_no_sliders_difficulty_value,
        speed_difficulty_value,
        speed_relevant_note_count,
        flashlight_difficulty_value,
    );

    attrs
}

pub struct DifficultyValues {
    pub skills: OsuSkills,
    pub attrs: OsuDifficultyAttributes,
}

impl DifficultyValues {
    pub fn calculate(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let mods = difficulty.get_mods();
        let take = difficulty.get_passed_objects();
        let clock_rate = difficulty.get_clock_rate();

        let map_attrs = map.attributes().difficulty(difficulty).build();
        let scaling_factor = ScalingFactor::new(map_attrs.cs);
        let time_preempt = map_attrs.hit_windows.ar * clock_rate;

        let mut attrs = OsuDifficultyAttributes {
            ar: map_attrs.ar,
            hp: map_attrs.hp,
            od: map_attrs.od,
            mods,
            ..Default::default()
        };

        let mut osu_objects = convert_objects(
            map,
            &scaling_factor,
            mods.hr(),
            time_preempt,
            take,
            &mut attrs,
        );

        for h in osu_objects.iter_mut() {
            compute_slider_cursor_pos(h, scaling_factor.radius);
        }

        let passed = &osu_objects[..cmp::min(osu_objects.len(), take)];
        let diff_objects = Self::create_difficulty_objects(clock_rate, &scaling_factor, passed);

        let mut skills = OsuSkills::new(mods, &scaling_factor, &map_attrs, time_preempt);

        for hit_object in diff_objects.iter() {
            skills.process(hit_object, &diff_objects);
        }

        Self { skills, attrs }
    }

    /// Process the difficulty values and store the results in `attrs`.
    pub fn eval(
        attrs: &mut OsuDifficultyAttributes,
        mods: GameMods,
        aim_difficulty_value: f64,
        aim_no_sliders_difficulty_value: f64,
        speed_difficulty_value: f64,
        speed_relevant_note_count: f64,
        flashlight_difficulty_value: f64,
    ) {
        let aim_rating = aim_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let aim_rating_no_sliders = aim_no_sliders_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let speed_rating = speed_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let flashlight_rating = flashlight_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;

        let slider_factor = if aim_rating > 0.0 {
            aim_rating_no_sliders / aim_rating
        } else {
            1.0
        };

        let aim_rating = mods.adjust_rating(SkillKind::Aim, aim_rating);
        let speed_rating = mods.adjust_rating(SkillKind::Speed, speed_rating);
        let flashlight_rating = mods.adjust_rating(SkillKind::Flashlight, flashlight_rating);

        let base_aim_performance = difficulty_to_performance(aim_rating);
        let base_speed_performance = difficulty_to_performance(speed_rating);

        let flashlight_enabled = mods.has_effect(SkillKind::Flashlight, SkillEffect::Enable);

        let base_flashlight_performance = if flashlight_enabled {
            flashlight_rating * flashlight_rating * 25.0
        } else {
            0.0
        };

        let base_performance = (base_aim_performance.powf(1.1)
            + base_speed_performance.powf(1.1)
            + base_flashlight_performance.powf(1.1))
        .powf(1.0 / 1.1);

        let star_rating = if base_performance > 0.00001 {
            PERFORMANCE_BASE_MULTIPLIER.cbrt()
                * 0.027
                * ((100_000.0 / 2.0_f64.powf(1.0 / 1.1) * base_performance).cbrt() + 4.0)
        } else {
            0.0
        };

        log_trace!(
            "aim={aim_rating} speed={speed_rating} flashlight={flashlight_rating} stars={star_rating}"
        );

        attrs.aim = aim_rating;
        attrs.speed = speed_rating;
        attrs.flashlight = flashlight_rating;
        attrs.slider_factor = slider_factor;
        attrs.stars = star_rating;
        attrs.speed_note_count = speed_relevant_note_count;
    }

    pub fn create_difficulty_objects<'a>(
        clock_rate: f64,
        scaling_factor: &ScalingFactor,
        osu_objects: &'a [OsuObject],
    ) -> Vec<OsuDifficultyObject<'a>> {
        // The first object has no difficulty object
        osu_objects
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, h)| {
                let last = &osu_objects[i - 1];
                let last_last = i.checked_sub(2).map(|j| &osu_objects[j]);

                OsuDifficultyObject::new(h, last, last_last, clock_rate, i - 1, scaling_factor)
            })
            .collect()
    }
}

/// The base performance of a skill rating.
pub fn difficulty_to_performance(difficulty: f64) -> f64 {
    (5.0 * (difficulty / DIFFICULTY_MULTIPLIER).max(1.0) - 4.0).powi(3) / 100_000.0
}
