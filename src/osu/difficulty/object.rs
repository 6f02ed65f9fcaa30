use crate::{
    any::difficulty::object::{HasStartTime, IDifficultyObject},
    model::hit_object::Pos,
    osu::object::{OsuObject, OsuObjectKind},
};

use super::{scaling_factor::ScalingFactor, HD_FADE_OUT_DURATION_MULTIPLIER};

pub struct OsuDifficultyObject<'a> {
    pub idx: usize,
    pub base: &'a OsuObject,
    pub start_time: f64,
    pub delta_time: f64,

    pub strain_time: f64,
    pub lazy_jump_dist: f64,
    pub min_jump_dist: f64,
    pub min_jump_time: f64,
    pub travel_dist: f64,
    pub travel_time: f64,
    pub angle: Option<f64>,
}

impl<'a> OsuDifficultyObject<'a> {
    pub const NORMALIZED_RADIUS: f64 = 50.0;

    pub const MIN_DELTA_TIME: f64 = 25.0;
    const MAX_SLIDER_RADIUS: f64 = Self::NORMALIZED_RADIUS * 2.4;
    const ASSUMED_SLIDER_RADIUS: f64 = Self::NORMALIZED_RADIUS * 1.8;

    pub fn new(
        hit_object: &'a OsuObject,
        last_object: &OsuObject,
        last_last_object: Option<&OsuObject>,
        clock_rate: f64,
        idx: usize,
        scaling_factor: &ScalingFactor,
    ) -> Self {
        let delta_time = (hit_object.start_time - last_object.start_time) / clock_rate;
        let start_time = hit_object.start_time / clock_rate;

        let strain_time = delta_time.max(Self::MIN_DELTA_TIME);

        let mut this = Self {
            idx,
            base: hit_object,
            start_time,
            delta_time,
            strain_time,
            lazy_jump_dist: 0.0,
            min_jump_dist: 0.0,
            min_jump_time: 0.0,
            travel_dist: 0.0,
            travel_time: 0.0,
            angle: None,
        };

        this.set_distances(last_object, last_last_object, clock_rate, scaling_factor);

        this
    }

    /// Opacity of the object at the given time, considering its fade-in and,
    /// with hidden, its fade-out.
    pub fn opacity_at(&self, time: f64, hidden: bool, time_preempt: f64, time_fade_in: f64) -> f64 {
        // Passed objects are considered invisible even though they stay
        // visible until their hit window has passed.
        if time > self.base.start_time {
            return 0.0;
        }

        let fade_in_start_time = self.base.start_time - time_preempt;
        let fade_in = ((time - fade_in_start_time) / time_fade_in).clamp(0.0, 1.0);

        if hidden {
            let fade_out_start_time = self.base.start_time - time_preempt + time_fade_in;
            let fade_out_duration = time_preempt * HD_FADE_OUT_DURATION_MULTIPLIER;

            fade_in.min(1.0 - ((time - fade_out_start_time) / fade_out_duration).clamp(0.0, 1.0))
        } else {
            fade_in
        }
    }

    fn set_distances(
        &mut self,
        last_object: &OsuObject,
        last_last_object: Option<&OsuObject>,
        clock_rate: f64,
        scaling_factor: &ScalingFactor,
    ) {
        if let OsuObjectKind::Slider(ref slider) = self.base.kind {
            self.travel_dist = slider.lazy_travel_dist;
            self.travel_time =
                (slider.lazy_travel_time / clock_rate).max(OsuDifficultyObject::MIN_DELTA_TIME);
        }

        if self.base.is_spinner() || last_object.is_spinner() {
            return;
        }

        let scaling_factor = scaling_factor.factor;

        let last_cursor_pos = Self::get_end_cursor_pos(last_object);

        self.lazy_jump_dist =
            f64::from((self.base.stacked_pos() - last_cursor_pos).length()) * scaling_factor;
        self.min_jump_time = self.strain_time;
        self.min_jump_dist = self.lazy_jump_dist;

        if last_object.is_slider() {
            let last_travel_time = (last_object.lazy_travel_time() / clock_rate)
                .max(OsuDifficultyObject::MIN_DELTA_TIME);
            self.min_jump_time =
                (self.strain_time - last_travel_time).max(OsuDifficultyObject::MIN_DELTA_TIME);

            // There are two possible jump paths: from the slider's tail or
            // from the lazy cursor position within the follow circle.
            let tail_jump_dist = f64::from(
                (last_object.stacked_end_pos() - self.base.stacked_pos()).length(),
            ) * scaling_factor;

            self.min_jump_dist = (self.lazy_jump_dist
                - (Self::MAX_SLIDER_RADIUS - Self::ASSUMED_SLIDER_RADIUS))
                .min(tail_jump_dist - Self::MAX_SLIDER_RADIUS)
                .max(0.0);
        }

        if let Some(last_last_object) = last_last_object.filter(|h| !h.is_spinner()) {
            let last_last_cursor_pos = Self::get_end_cursor_pos(last_last_object);

            let v1 = last_last_cursor_pos - last_object.stacked_pos();
            let v2 = self.base.stacked_pos() - last_cursor_pos;

            let dot = v1.dot(v2);
            let det = v1.x * v2.y - v1.y * v2.x;

            self.angle = Some(f64::from(det).atan2(f64::from(dot)).abs());
        }
    }

    fn get_end_cursor_pos(hit_object: &OsuObject) -> Pos {
        if let OsuObjectKind::Slider(ref slider) = hit_object.kind {
            slider.lazy_end_pos
        } else {
            hit_object.stacked_pos()
        }
    }
}

/// Follow a slider with a lazy cursor that only moves once an object would
/// leave the follow circle, accumulating the slider's lazy travel distance
/// and final cursor position.
pub fn compute_slider_cursor_pos(h: &mut OsuObject, radius: f64) {
    let stack_offset = h.stack_offset;
    let mut curr_cursor_pos = h.pos + stack_offset;

    let OsuObjectKind::Slider(ref mut slider) = h.kind else {
        return;
    };

    let scaling_factor = OsuDifficultyObject::NORMALIZED_RADIUS / radius;
    let last_idx = slider.nested_objects.len().saturating_sub(1);

    for (i, curr_movement_obj) in slider.nested_objects.iter().enumerate() {
        let mut curr_movement = curr_movement_obj.pos + stack_offset - curr_cursor_pos;
        let mut curr_movement_len = scaling_factor * f64::from(curr_movement.length());
        let mut required_movement = OsuDifficultyObject::ASSUMED_SLIDER_RADIUS;

        if i == last_idx {
            // The cursor doesn't need to reach the tail if the lazy end is
            // closer.
            let lazy_movement = slider.lazy_end_pos - curr_cursor_pos;

            if lazy_movement.length() < curr_movement.length() {
                curr_movement = lazy_movement;
            }

            curr_movement_len = scaling_factor * f64::from(curr_movement.length());
        } else if curr_movement_obj.is_repeat() {
            // Repeats must be hit more precisely.
            required_movement = OsuDifficultyObject::NORMALIZED_RADIUS;
        }

        if curr_movement_len > required_movement {
            let ratio = (curr_movement_len - required_movement) / curr_movement_len;
            curr_cursor_pos += curr_movement * ratio as f32;
            slider.lazy_travel_dist += curr_movement_len * ratio;
        }

        if i == last_idx {
            slider.lazy_end_pos = curr_cursor_pos;
        }
    }

    slider.lazy_travel_dist *= (1.0 + slider.repeats as f64 / 2.5).powf(1.0 / 2.5);
}

impl IDifficultyObject for OsuDifficultyObject<'_> {
    fn idx(&self) -> usize {
        self.idx
    }
}

impl HasStartTime for OsuDifficultyObject<'_> {
    fn start_time(&self) -> f64 {
        self.start_time
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::hit_object::{HitObject, Slider, SliderPath},
        osu::object::OsuObject,
    };

    use super::*;

    fn osu_object(h: &HitObject) -> OsuObject {
        OsuObject::new(h, &mut Vec::new())
    }

    #[test]
    fn timing_with_clock_rate() {
        let scaling_factor = ScalingFactor::new(5.0);
        let last = osu_object(&HitObject::circle(Pos::new(0.0, 0.0), 1000.0));
        let curr = osu_object(&HitObject::circle(Pos::new(0.0, 0.0), 1030.0));

        let diff_object = OsuDifficultyObject::new(&curr, &last, None, 1.5, 0, &scaling_factor);

        assert!((diff_object.delta_time - 20.0).abs() < 1e-9);
        assert!((diff_object.strain_time - 25.0).abs() < 1e-9);
        assert!(diff_object.angle.is_none());
    }

    #[test]
    fn jump_distance_is_normalized() {
        // cs 5 => radius 32
        let scaling_factor = ScalingFactor::new(5.0);
        let last = osu_object(&HitObject::circle(Pos::new(0.0, 0.0), 0.0));
        let curr = osu_object(&HitObject::circle(Pos::new(64.0, 0.0), 100.0));

        let diff_object = OsuDifficultyObject::new(&curr, &last, None, 1.0, 0, &scaling_factor);

        assert!((diff_object.lazy_jump_dist - 100.0).abs() < 1e-9);
        assert!((diff_object.min_jump_dist - 100.0).abs() < 1e-9);
    }

    #[test]
    fn right_angle() {
        let scaling_factor = ScalingFactor::new(5.0);
        let first = osu_object(&HitObject::circle(Pos::new(0.0, 0.0), 0.0));
        let second = osu_object(&HitObject::circle(Pos::new(100.0, 0.0), 100.0));
        let third = osu_object(&HitObject::circle(Pos::new(100.0, 100.0), 200.0));

        let diff_object =
            OsuDifficultyObject::new(&third, &second, Some(&first), 1.0, 1, &scaling_factor);

        let angle = diff_object.angle.unwrap();
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn spinners_have_no_distance() {
        let scaling_factor = ScalingFactor::new(5.0);
        let last = osu_object(&HitObject::spinner(Pos::new(0.0, 0.0), 0.0, 500.0));
        let curr = osu_object(&HitObject::circle(Pos::new(300.0, 0.0), 1000.0));

        let diff_object = OsuDifficultyObject::new(&curr, &last, None, 1.0, 0, &scaling_factor);

        assert!(diff_object.lazy_jump_dist.abs() < f64::EPSILON);
    }

    #[test]
    fn opacity() {
        let scaling_factor = ScalingFactor::new(5.0);
        let last = osu_object(&HitObject::circle(Pos::new(0.0, 0.0), 0.0));
        let curr = osu_object(&HitObject::circle(Pos::new(0.0, 0.0), 2000.0));
        let diff_object = OsuDifficultyObject::new(&curr, &last, None, 1.0, 0, &scaling_factor);

        // preempt 1200, fade in 400
        assert!(diff_object.opacity_at(500.0, false, 1200.0, 400.0).abs() < 1e-9);
        assert!((diff_object.opacity_at(1000.0, false, 1200.0, 400.0) - 0.5).abs() < 1e-9);
        assert!((diff_object.opacity_at(1900.0, false, 1200.0, 400.0) - 1.0).abs() < 1e-9);
        assert!(diff_object.opacity_at(2001.0, false, 1200.0, 400.0).abs() < 1e-9);

        // hidden fades out from 1280 over 360ms
        assert!(diff_object.opacity_at(1900.0, true, 1200.0, 480.0).abs() < 1e-9);
    }

    #[test]
    fn lazy_cursor_on_long_slider() {
        let slider = Slider {
            path: SliderPath::linear(Pos::new(300.0, 0.0)),
            repeats: 0,
            velocity: 1.0,
            tick_distance: 0.0,
        };

        let mut h = osu_object(&HitObject::slider(Pos::new(0.0, 0.0), 0.0, slider));

        if let OsuObjectKind::Slider(ref mut slider) = h.kind {
            slider.lazy_end_pos += h.pos + h.stack_offset;
        }

        compute_slider_cursor_pos(&mut h, 32.0);

        let OsuObjectKind::Slider(ref slider) = h.kind else {
            panic!("expected slider");
        };

        // the lazy end lies at 264px, the follow circle covers 90 normalized
        // i.e. 57.6px of it
        assert!((slider.lazy_end_pos.x - (264.0 - 57.6)).abs() < 1e-3);
        assert!((slider.lazy_travel_dist - (264.0 - 57.6) * 50.0 / 32.0).abs() < 1e-2);
    }
}
