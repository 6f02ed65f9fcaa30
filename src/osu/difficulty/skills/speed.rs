use std::f64::consts::PI;

use crate::{
    any::difficulty::{
        object::{previous_start_time, IDifficultyObject},
        skills::{strain_decay, StrainSections},
    },
    osu::difficulty::object::OsuDifficultyObject,
};

use super::strain::OsuStrainSkill;

const SKILL_MULTIPLIER: f64 = 1375.0;
const STRAIN_DECAY_BASE: f64 = 0.3;

/// Speed difficulty, i.e. tapping speed and rhythm complexity.
#[derive(Clone, Debug)]
pub struct Speed {
    curr_strain: f64,
    curr_rhythm: f64,
    sections: StrainSections,
    object_strains: Vec<f64>,
    hit_window: f64,
}

impl Speed {
    /// `hit_window` is the clock-adjusted window of a 300.
    pub const fn new(hit_window: f64) -> Self {
        Self {
            curr_strain: 0.0,
            curr_rhythm: 0.0,
            sections: StrainSections::new(),
            object_strains: Vec::new(),
            hit_window,
        }
    }

    /// The amount of notes that are relevant to the difficulty, weighted by
    /// their strain relative to the highest one.
    pub fn relevant_note_count(&self) -> f64 {
        self.object_strains
            .iter()
            .copied()
            .max_by(f64::total_cmp)
            .filter(|&max_strain| max_strain > 0.0)
            .map_or(0.0, |max_strain| {
                self.object_strains.iter().fold(0.0, |sum, strain| {
                    sum + (1.0 + (-(strain / max_strain * 12.0 - 6.0)).exp()).recip()
                })
            })
    }
}

impl OsuStrainSkill for Speed {
    const REDUCED_SECTION_COUNT: usize = 5;
    const DIFFICULTY_MULTIPLIER: f64 = 1.04;

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
        self.curr_strain *= strain_decay(curr.strain_time, STRAIN_DECAY_BASE);
        self.curr_strain +=
            SpeedEvaluator::evaluate_diff_of(curr, objects, self.hit_window) * SKILL_MULTIPLIER;
        self.curr_rhythm = RhythmEvaluator::evaluate_diff_of(curr, objects, self.hit_window);

        let total_strain = self.curr_strain * self.curr_rhythm;
        self.object_strains.push(total_strain);

        total_strain
    }

    fn calculate_initial_strain(
        &self,
        time: f64,
        curr: &OsuDifficultyObject<'_>,
        objects: &[OsuDifficultyObject<'_>],
    ) -> f64 {
        (self.curr_strain * self.curr_rhythm)
            * strain_decay(
                time - previous_start_time(curr, 0, objects),
                STRAIN_DECAY_BASE,
            )
    }
}

struct SpeedEvaluator;

impl SpeedEvaluator {
    const SINGLE_SPACING_THRESHOLD: f64 = 125.0;
    // ~200 bpm
    const MIN_SPEED_BONUS: f64 = 75.0;
    const SPEED_BALANCING_FACTOR: f64 = 40.0;

    fn evaluate_diff_of(
        curr: &OsuDifficultyObject<'_>,
        objects: &[OsuDifficultyObject<'_>],
        hit_window: f64,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let osu_curr_obj = curr;
        let osu_prev_obj = curr.previous(0, objects);
        let osu_next_obj = curr.next(0, objects);

        let mut strain_time = curr.strain_time;
        let mut doubletapness = 1.0;

        // Nerf doubletappable doubles
        if let Some(osu_next_obj) = osu_next_obj {
            let curr_delta_time = osu_curr_obj.delta_time.max(1.0);
            let next_delta_time = osu_next_obj.delta_time.max(1.0);
            let delta_diff = (next_delta_time - curr_delta_time).abs();
            let speed_ratio = curr_delta_time / curr_delta_time.max(delta_diff);
            let window_ratio_base = (curr_delta_time / hit_window).min(1.0);
            let window_ratio = window_ratio_base * window_ratio_base;
            doubletapness = speed_ratio.powf(1.0 - window_ratio);
        }

        // Cap the delta to the 300 hit window. 0.93 keeps 260 bpm OD8 streams
        // from being nerfed too harshly.
        strain_time /= ((strain_time / hit_window) / 0.93).clamp(0.92, 1.0);

        let speed_bonus = if strain_time < Self::MIN_SPEED_BONUS {
            let base = (Self::MIN_SPEED_BONUS - strain_time) / Self::SPEED_BALANCING_FACTOR;

            1.0 + 0.75 * base * base
        } else {
            1.0
        };

        let travel_dist = osu_prev_obj.map_or(0.0, |obj| obj.travel_dist);
        let dist = Self::SINGLE_SPACING_THRESHOLD.min(travel_dist + osu_curr_obj.min_jump_dist);

        (speed_bonus + speed_bonus * (dist / Self::SINGLE_SPACING_THRESHOLD).powf(3.5))
            * doubletapness
            / strain_time
    }
}

struct RhythmEvaluator;

impl RhythmEvaluator {
    // 5 seconds of history at most
    const HISTORY_TIME_MAX: f64 = 5000.0;
    const RHYTHM_MULTIPLIER: f64 = 0.75;

    fn evaluate_diff_of(
        curr: &OsuDifficultyObject<'_>,
        objects: &[OsuDifficultyObject<'_>],
        hit_window: f64,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let mut prev_island_size: u32 = 0;

        let mut rhythm_complexity_sum = 0.0;
        let mut island_size: u32 = 1;
        // ratio of the current island's start to buff tighter rhythms
        let mut start_ratio = 0.0;

        let mut first_delta_switch = false;

        let historical_note_count = curr.idx.min(32);

        let mut rhythm_start = 0;

        while curr
            .previous(rhythm_start, objects)
            .filter(|prev| {
                rhythm_start + 2 < historical_note_count
                    && curr.start_time - prev.start_time < Self::HISTORY_TIME_MAX
            })
            .is_some()
        {
            rhythm_start += 1;
        }

        for i in (1..=rhythm_start).rev() {
            let Some(((curr_obj, prev_obj), last_obj)) = curr
                .previous(i - 1, objects)
                .zip(curr.previous(i, objects))
                .zip(curr.previous(i + 1, objects))
            else {
                break;
            };

            // scales notes from 0 to 1 from history to now, limited by either
            // time or object count
            let curr_historical_decay = ((Self::HISTORY_TIME_MAX
                - (curr.start_time - curr_obj.start_time))
                / Self::HISTORY_TIME_MAX)
                .min((historical_note_count - i) as f64 / historical_note_count as f64);

            let curr_delta = curr_obj.strain_time;
            let prev_delta = prev_obj.strain_time;
            let last_delta = last_obj.strain_time;

            let base = (PI / (prev_delta.min(curr_delta) / prev_delta.max(curr_delta))).sin();
            let curr_ratio = 1.0 + 6.0 * (base * base).min(0.5);

            let hit_window = if curr_obj.base.is_spinner() {
                0.0
            } else {
                hit_window
            };

            let window_penalty = (((prev_delta - curr_delta).abs() - hit_window * 0.3).max(0.0)
                / (hit_window * 0.3))
                .min(1.0);

            let mut effective_ratio = window_penalty * curr_ratio;

            if first_delta_switch {
                if !(prev_delta > 1.25 * curr_delta || prev_delta * 1.25 < curr_delta) {
                    // the island is still progressing
                    if island_size < 7 {
                        island_size += 1;
                    }
                } else {
                    // bpm change into a slider, easy acc window
                    if curr_obj.base.is_slider() {
                        effective_ratio *= 0.125;
                    }

                    // bpm change from a slider, typically easier than circle
                    // to circle
                    if prev_obj.base.is_slider() {
                        effective_ratio *= 0.25;
                    }

                    // repeated island size e.g. triplet to triplet
                    if prev_island_size == island_size {
                        effective_ratio *= 0.25;
                    }

                    // repeated island polarity e.g. 2 to 4 or 3 to 5
                    if prev_island_size % 2 == island_size % 2 {
                        effective_ratio *= 0.5;
                    }

                    // previous increase happened a note ago e.g. 1/1 -> 1/2 -> 1/4
                    if last_delta > prev_delta + 10.0 && prev_delta > curr_delta + 10.0 {
                        effective_ratio *= 0.125;
                    }

                    rhythm_complexity_sum += (effective_ratio * start_ratio).sqrt()
                        * curr_historical_decay
                        * f64::from(4 + island_size).sqrt()
                        / 2.0
                        * f64::from(4 + prev_island_size).sqrt()
                        / 2.0;

                    start_ratio = effective_ratio;
                    prev_island_size = island_size;

                    // slowing down, stop counting
                    if prev_delta * 1.25 < curr_delta {
                        first_delta_switch = false;
                    }

                    island_size = 1;
                }
            } else if prev_delta > 1.25 * curr_delta {
                // speeding up so an island starts
                first_delta_switch = true;
                start_ratio = effective_ratio;
                island_size = 1;
            }
        }

        // multiplier in [1, inf) to apply onto the strain
        (4.0 + rhythm_complexity_sum * Self::RHYTHM_MULTIPLIER).sqrt() / 2.0
    }
}
