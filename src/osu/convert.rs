use crate::model::beatmap::Beatmap;

use super::{
    attributes::OsuDifficultyAttributes,
    difficulty::scaling_factor::ScalingFactor,
    object::{OsuObject, OsuObjectKind},
};

/// Objects closer than this are considered stacked.
const STACK_DISTANCE: f32 = 3.0;

/// Prepare the map's hit objects for difficulty calculation and count the
/// first `take` of them into `attrs`.
///
/// All objects are converted because stacking of earlier objects depends on
/// later ones.
pub fn convert_objects(
    map: &Beatmap,
    scaling_factor: &ScalingFactor,
    hr: bool,
    time_preempt: f64,
    take: usize,
    attrs: &mut OsuDifficultyAttributes,
) -> Box<[OsuObject]> {
    let mut events_buf = Vec::new();

    let mut osu_objects: Box<[_]> = map
        .hit_objects
        .iter()
        .map(|h| OsuObject::new(h, &mut events_buf))
        .collect();

    for h in osu_objects.iter().take(take) {
        attrs.max_combo += 1;

        match h.kind {
            OsuObjectKind::Circle => attrs.n_circles += 1,
            OsuObjectKind::Slider(ref slider) => {
                attrs.n_sliders += 1;
                attrs.max_combo += slider.nested_objects.len() as u32;
            }
            OsuObjectKind::Spinner { .. } => attrs.n_spinners += 1,
        }
    }

    if hr {
        osu_objects
            .iter_mut()
            .for_each(OsuObject::reflect_vertically);
    }

    let stack_threshold = time_preempt * f64::from(map.stack_leniency);
    stacking(&mut osu_objects, stack_threshold);

    for h in osu_objects.iter_mut() {
        h.stack_offset = scaling_factor.stack_offset(h.stack_height);

        if let OsuObjectKind::Slider(ref mut slider) = h.kind {
            slider.lazy_end_pos += h.pos + h.stack_offset;
        }
    }

    osu_objects
}

/// Assign stack heights, walking backwards from the last object.
///
/// Circles below the end of a slider are stacked downwards (negative
/// height), everything else upwards.
fn stacking(hit_objects: &mut [OsuObject], stack_threshold: f64) {
    for i in (1..hit_objects.len()).rev() {
        let curr = &hit_objects[i];

        // objects that already belong to a stack were handled from its top
        if curr.stack_height != 0 || curr.is_spinner() {
            continue;
        }

        if curr.is_circle() {
            stack_below_circle(hit_objects, i, stack_threshold);
        } else if curr.is_slider() {
            stack_below_slider(hit_objects, i, stack_threshold);
        }
    }
}

fn stack_below_circle(hit_objects: &mut [OsuObject], i: usize, stack_threshold: f64) {
    let mut base_idx = i;

    for n in (0..i).rev() {
        if hit_objects[n].is_spinner() {
            continue;
        }

        let base = &hit_objects[base_idx];
        let prev = &hit_objects[n];

        if base.start_time - prev.end_time() > stack_threshold {
            break;
        }

        if prev.is_slider() && prev.end_pos().distance(base.pos) < STACK_DISTANCE {
            // circles below a slider's end are moved down and right
            let prev_end_pos = prev.end_pos();
            let offset = base.stack_height - prev.stack_height + 1;

            for h in hit_objects[n + 1..=i].iter_mut() {
                if prev_end_pos.distance(h.pos) < STACK_DISTANCE {
                    h.stack_height -= offset;
                }
            }

            // the slider itself is handled once the outer loop reaches it
            break;
        }

        if prev.pos.distance(base.pos) < STACK_DISTANCE {
            hit_objects[n].stack_height = hit_objects[base_idx].stack_height + 1;
            base_idx = n;
        }
    }
}

fn stack_below_slider(hit_objects: &mut [OsuObject], i: usize, stack_threshold: f64) {
    let mut base_idx = i;

    for n in (0..i).rev() {
        if hit_objects[n].is_spinner() {
            continue;
        }

        let base = &hit_objects[base_idx];
        let prev = &hit_objects[n];

        if base.start_time - prev.start_time > stack_threshold {
            break;
        }

        if prev.end_pos().distance(base.pos) < STACK_DISTANCE {
            hit_objects[n].stack_height = hit_objects[base_idx].stack_height + 1;
            base_idx = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::{HitObject, Pos, Slider, SliderPath};

    use super::*;

    fn convert(map: &Beatmap, hr: bool) -> (Box<[OsuObject]>, OsuDifficultyAttributes) {
        let mut attrs = OsuDifficultyAttributes::default();
        let scaling_factor = ScalingFactor::new(4.0);
        let objects = convert_objects(map, &scaling_factor, hr, 1200.0, usize::MAX, &mut attrs);

        (objects, attrs)
    }

    #[test]
    fn stacked_circles() {
        let map = Beatmap::new(vec![
            HitObject::circle(Pos::new(100.0, 100.0), 0.0),
            HitObject::circle(Pos::new(100.0, 100.0), 100.0),
            HitObject::circle(Pos::new(101.0, 101.0), 200.0),
            HitObject::circle(Pos::new(300.0, 300.0), 300.0),
        ]);

        let (objects, attrs) = convert(&map, false);
        let heights: Vec<_> = objects.iter().map(|h| h.stack_height).collect();

        assert_eq!(heights, [2, 1, 0, 0]);
        assert!(objects[0].stack_offset.x < objects[1].stack_offset.x);
        assert_eq!(attrs.n_circles, 4);
        assert_eq!(attrs.max_combo, 4);
    }

    #[test]
    fn stacks_expire() {
        let map = Beatmap::new(vec![
            HitObject::circle(Pos::new(100.0, 100.0), 0.0),
            HitObject::circle(Pos::new(100.0, 100.0), 5000.0),
        ]);

        let (objects, _) = convert(&map, false);

        assert!(objects.iter().all(|h| h.stack_height == 0));
    }

    #[test]
    fn circle_below_slider_end() {
        let slider = Slider {
            path: SliderPath::linear(Pos::new(100.0, 0.0)),
            repeats: 0,
            velocity: 1.0,
            tick_distance: 0.0,
        };

        let map = Beatmap::new(vec![
            HitObject::slider(Pos::new(100.0, 100.0), 0.0, slider),
            HitObject::circle(Pos::new(200.0, 100.0), 300.0),
        ]);

        let (objects, attrs) = convert(&map, false);

        assert_eq!(objects[0].stack_height, 0);
        assert_eq!(objects[1].stack_height, -1);
        assert_eq!(attrs.n_sliders, 1);
        // head, tail, and the circle
        assert_eq!(attrs.max_combo, 3);
    }

    #[test]
    fn hard_rock_reflection() {
        let map = Beatmap::new(vec![HitObject::circle(Pos::new(100.0, 100.0), 0.0)]);

        let (objects, _) = convert(&map, true);

        assert!((objects[0].pos.y - 284.0).abs() < f32::EPSILON);
    }

    #[test]
    fn passed_objects_are_counted() {
        let map = Beatmap::new(vec![
            HitObject::circle(Pos::new(0.0, 0.0), 0.0),
            HitObject::spinner(Pos::new(256.0, 192.0), 500.0, 1000.0),
        ]);

        let mut attrs = OsuDifficultyAttributes::default();
        let objects = convert_objects(&map, &ScalingFactor::new(4.0), false, 1200.0, 1, &mut attrs);

        assert_eq!(objects.len(), 2);
        assert_eq!(attrs.n_circles, 1);
        assert_eq!(attrs.n_spinners, 0);
    }
}
