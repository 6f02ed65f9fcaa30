use crate::{
    model::{
        beatmap::BeatmapAttributes,
        mods::{GameMods, SkillEffect, SkillKind},
    },
    osu::object::OsuObject,
};

use self::{aim::Aim, flashlight::Flashlight, speed::Speed, strain::OsuStrainSkill};

use super::{
    object::OsuDifficultyObject, scaling_factor::ScalingFactor, HD_FADE_IN_DURATION_MULTIPLIER,
};

pub mod aim;
pub mod flashlight;
pub mod speed;
pub mod strain;

pub struct OsuSkills {
    pub aim: Aim,
    pub aim_no_sliders: Aim,
    pub speed: Speed,
    pub flashlight: Flashlight,
}

impl OsuSkills {
    pub fn new(
        mods: GameMods,
        scaling_factor: &ScalingFactor,
        map_attrs: &BeatmapAttributes,
        time_preempt: f64,
    ) -> Self {
        let fade_out = mods.has_effect(SkillKind::Flashlight, SkillEffect::FadeOut);

        // Below 450ms the regular fade-in would not complete in time
        let time_fade_in = if fade_out {
            time_preempt * HD_FADE_IN_DURATION_MULTIPLIER
        } else {
            400.0 * (time_preempt / OsuObject::PREEMPT_MIN).min(1.0)
        };

        Self {
            aim: Aim::new(true),
            aim_no_sliders: Aim::new(false),
            speed: Speed::new(map_attrs.hit_windows.od),
            flashlight: Flashlight::new(
                fade_out,
                scaling_factor.radius,
                time_preempt,
                time_fade_in,
            ),
        }
    }

    pub fn process(&mut self, curr: &OsuDifficultyObject<'_>, objects: &[OsuDifficultyObject<'_>]) {
        self.aim.process(curr, objects);
        self.aim_no_sliders.process(curr, objects);
        self.speed.process(curr, objects);
        self.flashlight.process(curr, objects);
    }
}
