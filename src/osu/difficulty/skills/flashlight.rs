use crate::{
    any::difficulty::{
        object::{previous_start_time, IDifficultyObject},
        skills::{strain_decay, StrainSections},
    },
    osu::{difficulty::object::OsuDifficultyObject, object::OsuObjectKind},
};

use super::strain::OsuStrainSkill;

const SKILL_MULTIPLIER: f64 = 0.052;
const STRAIN_DECAY_BASE: f64 = 0.15;

/// Memorization difficulty with a limited field of view.
#[derive(Clone, Debug)]
pub struct Flashlight {
    curr_strain: f64,
    sections: StrainSections,
    has_hidden_mod: bool,
    scaling_factor: f64,
    time_preempt: f64,
    time_fade_in: f64,
}

impl Flashlight {
    pub fn new(fade_out: bool, radius: f64, time_preempt: f64, time_fade_in: f64) -> Self {
        Self {
            curr_strain: 0.0,
            sections: StrainSections::new(),
            has_hidden_mod: fade_out,
            scaling_factor: 52.0 / radius,
            time_preempt,
            time_fade_in,
        }
    }
}

impl OsuStrainSkill for Flashlight {
    fn sections(&self) -> &StrainSections {
        &self.sections
    }

    fn sections_mut(&mut self) -> &mut StrainSections {
        &mut self.sections
    }

    fn strain_value_at(
        &mut self,
        curr: &OsuDifficultyObject<'_>,
        objects: &[OsuDifficultyObject<'_>],
    ) -> f64 {
        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain += FlashlightEvaluator::evaluate_diff_of(
            curr,
            objects,
            self.has_hidden_mod,
            self.scaling_factor,
            self.time_preempt,
            self.time_fade_in,
        ) * SKILL_MULTIPLIER;

        self.curr_strain
    }

    fn calculate_initial_strain(
        &self,
        time: f64,
        curr: &OsuDifficultyObject<'_>,
        objects: &[OsuDifficultyObject<'_>],
    ) -> f64 {
        self.curr_strain
            * strain_decay(
                time - previous_start_time(curr, 0, objects),
                STRAIN_DECAY_BASE,
            )
    }

    // Peaks are summed up without reduction or weighting
    fn difficulty_value(&self) -> f64 {
        self.strain_peaks().into_iter().sum::<f64>() * Self::DIFFICULTY_MULTIPLIER
    }
}

struct FlashlightEvaluator;

impl FlashlightEvaluator {
    const MAX_OPACITY_BONUS: f64 = 0.4;
    const HIDDEN_BONUS: f64 = 0.2;

    const MIN_VELOCITY: f64 = 0.5;
    const SLIDER_MULTIPLIER: f64 = 1.3;

    const MIN_ANGLE_MULTIPLIER: f64 = 0.2;

    fn evaluate_diff_of(
        curr: &OsuDifficultyObject<'_>,
        objects: &[OsuDifficultyObject<'_>],
        hidden: bool,
        scaling_factor: f64,
        time_preempt: f64,
        time_fade_in: f64,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let osu_curr = curr;
        let osu_hit_obj = curr.base;

        let mut small_dist_nerf = 1.0;
        let mut cumulative_strain_time = 0.0;

        let mut result = 0.0;

        let mut last_obj = osu_curr;

        let mut angle_repeat_count = 0.0;

        // Iterating backwards in time from the current object
        for i in 0..curr.idx.min(10) {
            let Some(curr_obj) = curr.previous(i, objects) else {
                break;
            };

            let curr_hit_obj = curr_obj.base;

            if !curr_hit_obj.is_spinner() {
                let jump_dist = f64::from(
                    (osu_hit_obj.stacked_pos() - curr_hit_obj.stacked_end_pos()).length(),
                );

                cumulative_strain_time += last_obj.strain_time;

                // Objects within the flashlight radius are easily seen
                if i == 0 {
                    small_dist_nerf = (jump_dist / 75.0).min(1.0);
                }

                // Only the first object of a stack counts
                let stack_nerf = ((curr_obj.lazy_jump_dist / scaling_factor) / 25.0).min(1.0);

                let opacity_bonus = 1.0
                    + Self::MAX_OPACITY_BONUS
                        * (1.0
                            - osu_curr.opacity_at(
                                curr_hit_obj.start_time,
                                hidden,
                                time_preempt,
                                time_fade_in,
                            ));

                result += stack_nerf * opacity_bonus * scaling_factor * jump_dist
                    / cumulative_strain_time;

                if let Some((curr_obj_angle, osu_curr_angle)) = curr_obj.angle.zip(osu_curr.angle)
                {
                    // Objects further back count less for the nerf
                    if (curr_obj_angle - osu_curr_angle).abs() < 0.02 {
                        angle_repeat_count += (1.0 - 0.1 * i as f64).max(0.0);
                    }
                }
            }

            last_obj = curr_obj;
        }

        let base = small_dist_nerf * result;
        result = base * base;

        // No approach circles
        if hidden {
            result *= 1.0 + Self::HIDDEN_BONUS;
        }

        // Nerf patterns with repeated angles
        result *= Self::MIN_ANGLE_MULTIPLIER
            + (1.0 - Self::MIN_ANGLE_MULTIPLIER) / (angle_repeat_count + 1.0);

        let mut slider_bonus = 0.0;

        if let OsuObjectKind::Slider(ref slider) = osu_curr.base.kind {
            // Travel distance independent of circle size
            let pixel_travel_dist = osu_curr.travel_dist / scaling_factor;

            slider_bonus =
                ((pixel_travel_dist / osu_curr.travel_time - Self::MIN_VELOCITY).max(0.0)).sqrt();

            // Longer sliders require more memorization
            slider_bonus *= pixel_travel_dist;

            // Repeats require less memorization
            if slider.repeats > 0 {
                slider_bonus /= (slider.repeats + 1) as f64;
            }
        }

        result += slider_bonus * Self::SLIDER_MULTIPLIER;

        result
    }
}
