use crate::{
    model::mods::{GameMods, SkillEffect, SkillKind},
    osu::{
        difficulty::difficulty_to_performance, OsuDifficultyAttributes, OsuPerformanceAttributes,
        OsuScoreState,
    },
};

// Keeps the final pp values scaled around what they used to be.
pub const PERFORMANCE_BASE_MULTIPLIER: f64 = 1.14;

pub(super) struct OsuPerformanceCalculator {
    attrs: OsuDifficultyAttributes,
    mods: GameMods,
    acc: f64,
    state: OsuScoreState,
    effective_miss_count: f64,
}

impl OsuPerformanceCalculator {
    pub const fn new(
        attrs: OsuDifficultyAttributes,
        mods: GameMods,
        acc: f64,
        state: OsuScoreState,
        effective_miss_count: f64,
    ) -> Self {
        Self {
            attrs,
            mods,
            acc,
            state,
            effective_miss_count,
        }
    }

    pub fn calculate(mut self) -> OsuPerformanceAttributes {
        let total_hits = self.state.total_hits();

        if total_hits == 0 {
            return OsuPerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        let total_hits = f64::from(total_hits);

        let mut multiplier = PERFORMANCE_BASE_MULTIPLIER;

        if self.mods.nf() {
            multiplier *= (1.0 - 0.02 * self.effective_miss_count).max(0.9);
        }

        if self.mods.so() {
            multiplier *= 1.0 - (f64::from(self.attrs.n_spinners) / total_hits).powf(0.85);
        }

        if self.mods.rx() {
            // Adding 100s and 50s to an approximated amount of combo breaks
            // may exceed the total amount of hits
            self.effective_miss_count = (self.effective_miss_count
                + f64::from(self.state.n100)
                + f64::from(self.state.n50))
            .min(total_hits);
        }

        let aim_value = self.compute_aim_value();
        let speed_value = self.compute_speed_value();
        let acc_value = self.compute_accuracy_value();
        let flashlight_value = self.compute_flashlight_value();

        let pp = (aim_value.powf(1.1)
            + speed_value.powf(1.1)
            + acc_value.powf(1.1)
            + flashlight_value.powf(1.1))
        .powf(1.0 / 1.1)
            * multiplier;

        OsuPerformanceAttributes {
            difficulty: self.attrs,
            pp_acc: acc_value,
            pp_aim: aim_value,
            pp_flashlight: flashlight_value,
            pp_speed: speed_value,
            pp,
            effective_miss_count: self.effective_miss_count,
        }
    }

    fn compute_aim_value(&self) -> f64 {
        let mut aim_value = difficulty_to_performance(self.attrs.aim);

        let total_hits = self.total_hits();
        let len_bonus = self.length_bonus();

        aim_value *= len_bonus;

        // A 3% reduction for any amount of misses and more relative to the
        // total amount of objects
        if self.effective_miss_count > 0.0 {
            aim_value *= 0.97
                * (1.0 - (self.effective_miss_count / total_hits).powf(0.775))
                    .powf(self.effective_miss_count);
        }

        aim_value *= self.get_combo_scaling_factor();

        let ar_factor = if self.mods.rx() {
            0.0
        } else if self.attrs.ar > 10.33 {
            0.3 * (self.attrs.ar - 10.33)
        } else if self.attrs.ar < 8.0 {
            0.05 * (8.0 - self.attrs.ar)
        } else {
            0.0
        };

        // Buff for longer maps with high AR
        aim_value *= 1.0 + ar_factor * len_bonus;

        // Rewards lower AR more than higher AR
        if self.mods.hd() {
            aim_value *= 1.0 + 0.04 * (12.0 - self.attrs.ar);
        }

        // 15% of sliders are assumed to be difficult
        let estimate_diff_sliders = f64::from(self.attrs.n_sliders) * 0.15;

        if self.attrs.n_sliders > 0 {
            let estimate_slider_ends_dropped = f64::from(
                (self.state.n100 + self.state.n50 + self.state.misses)
                    .min(self.attrs.max_combo.saturating_sub(self.state.max_combo)),
            )
            .clamp(0.0, estimate_diff_sliders);

            let slider_nerf_factor = (1.0 - self.attrs.slider_factor)
                * (1.0 - estimate_slider_ends_dropped / estimate_diff_sliders).powi(3)
                + self.attrs.slider_factor;

            aim_value *= slider_nerf_factor;
        }

        aim_value *= self.acc;
        aim_value *= 0.98 + self.attrs.od * self.attrs.od / 2500.0;

        aim_value
    }

    fn compute_speed_value(&self) -> f64 {
        if self.mods.rx() {
            return 0.0;
        }

        let mut speed_value = difficulty_to_performance(self.attrs.speed);

        let total_hits = self.total_hits();
        let len_bonus = self.length_bonus();

        speed_value *= len_bonus;

        if self.effective_miss_count > 0.0 {
            speed_value *= 0.97
                * (1.0 - (self.effective_miss_count / total_hits).powf(0.775))
                    .powf(self.effective_miss_count.powf(0.875));
        }

        speed_value *= self.get_combo_scaling_factor();

        let ar_factor = if self.attrs.ar > 10.33 {
            0.3 * (self.attrs.ar - 10.33)
        } else {
            0.0
        };

        speed_value *= 1.0 + ar_factor * len_bonus;

        if self.mods.hd() {
            speed_value *= 1.0 + 0.04 * (12.0 - self.attrs.ar);
        }

        // Accuracy of the speed-relevant notes assuming the worst case
        let n300 = f64::from(self.state.n300);
        let n100 = f64::from(self.state.n100);
        let n50 = f64::from(self.state.n50);

        let relevant_total_diff = total_hits - self.attrs.speed_note_count;
        let relevant_n300 = (n300 - relevant_total_diff).max(0.0);
        let relevant_n100 = (n100 - (relevant_total_diff - n300).max(0.0)).max(0.0);
        let relevant_n50 = (n50 - (relevant_total_diff - n300 - n100).max(0.0)).max(0.0);

        let relevant_acc = if self.attrs.speed_note_count > 0.0 {
            (relevant_n300 * 6.0 + relevant_n100 * 2.0 + relevant_n50)
                / (self.attrs.speed_note_count * 6.0)
        } else {
            0.0
        };

        speed_value *= (0.95 + self.attrs.od * self.attrs.od / 750.0)
            * ((self.acc + relevant_acc) / 2.0).powf((14.5 - self.attrs.od.max(8.0)) / 2.0);

        // Punish doubletapping through the amount of 50s
        let n50_threshold = total_hits / 500.0;

        if n50 >= n50_threshold {
            speed_value *= 0.99_f64.powf(n50 - n50_threshold);
        }

        speed_value
    }

    fn compute_accuracy_value(&self) -> f64 {
        if self.mods.rx() {
            return 0.0;
        }

        // Only circles are considered since sliders and spinners are
        // lenient on timing
        let n_circles = self.attrs.n_circles;

        let better_acc_percentage = if n_circles > 0 {
            let n_other = self.state.total_hits().saturating_sub(n_circles);

            // Negative accuracy is capped at zero
            if self.state.n300 < n_other {
                0.0
            } else {
                (f64::from(self.state.n300 - n_other) * 6.0
                    + f64::from(self.state.n100) * 2.0
                    + f64::from(self.state.n50))
                    / (f64::from(n_circles) * 6.0)
            }
        } else {
            0.0
        };

        let mut acc_value = 1.52163_f64.powf(self.attrs.od) * better_acc_percentage.powi(24) * 2.83;

        // Bonus for many circles
        acc_value *= (f64::from(n_circles) / 1000.0).powf(0.3).min(1.15);

        if self.mods.hd() {
            acc_value *= 1.08;
        }

        if self.mods.fl() {
            acc_value *= 1.02;
        }

        acc_value
    }

    fn compute_flashlight_value(&self) -> f64 {
        if !self.mods.has_effect(SkillKind::Flashlight, SkillEffect::Enable) {
            return 0.0;
        }

        let mut flashlight_value = self.attrs.flashlight * self.attrs.flashlight * 25.0;

        let total_hits = self.total_hits();

        if self.effective_miss_count > 0.0 {
            flashlight_value *= 0.97
                * (1.0 - (self.effective_miss_count / total_hits).powf(0.775))
                    .powf(self.effective_miss_count.powf(0.875));
        }

        flashlight_value *= self.get_combo_scaling_factor();

        // Account for shorter maps having a higher ratio of 0 combo/100 combo flashlight radius
        let len_factor = if total_hits > 200.0 {
            0.2 * ((total_hits - 200.0) / 200.0).min(1.0)
        } else {
            0.0
        };

        flashlight_value *= 0.7 + 0.1 * (total_hits / 200.0).min(1.0) + len_factor;

        flashlight_value *= 0.5 + self.acc / 2.0;
        flashlight_value *= 0.98 + self.attrs.od * self.attrs.od / 2500.0;

        flashlight_value
    }

    fn length_bonus(&self) -> f64 {
        let total_hits = self.total_hits();

        let mut len_bonus = 0.95 + 0.4 * (total_hits / 2000.0).min(1.0);

        if total_hits > 2000.0 {
            len_bonus += (total_hits / 2000.0).log10() * 0.5;
        }

        len_bonus
    }

    fn get_combo_scaling_factor(&self) -> f64 {
        if self.attrs.max_combo == 0 {
            1.0
        } else {
            (f64::from(self.state.max_combo).powf(0.8) / f64::from(self.attrs.max_combo).powf(0.8))
                .min(1.0)
        }
    }

    fn total_hits(&self) -> f64 {
        f64::from(self.state.total_hits())
    }
}
