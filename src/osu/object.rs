use crate::model::hit_object::{HitObject, HitObjectKind, Pos, Slider};

use super::{
    slider_events::{self, SliderEvent, SliderEventKind, SliderTiming},
    PLAYFIELD_HEIGHT,
};

/// A [`HitObject`] prepared for difficulty calculation.
pub struct OsuObject {
    pub pos: Pos,
    pub start_time: f64,
    pub stack_height: i32,
    pub stack_offset: Pos,
    pub kind: OsuObjectKind,
}

impl OsuObject {
    pub const OBJECT_RADIUS: f32 = 64.0;
    pub const PREEMPT_MIN: f64 = 450.0;

    pub fn new(h: &HitObject, events_buf: &mut Vec<SliderEvent>) -> Self {
        let kind = match h.kind {
            HitObjectKind::Circle => OsuObjectKind::Circle,
            HitObjectKind::Slider(ref slider) => {
                OsuObjectKind::Slider(OsuSlider::new(h.pos, h.start_time, slider, events_buf))
            }
            HitObjectKind::Spinner(spinner) => OsuObjectKind::Spinner {
                end_time: h.start_time + spinner.duration,
            },
        };

        Self {
            pos: h.pos,
            start_time: h.start_time,
            stack_height: 0,
            stack_offset: Pos::default(),
            kind,
        }
    }

    /// Mirror the object along the horizontal center of the playfield.
    pub fn reflect_vertically(&mut self) {
        fn reflect_y(y: &mut f32) {
            *y = PLAYFIELD_HEIGHT - *y;
        }

        reflect_y(&mut self.pos.y);

        if let OsuObjectKind::Slider(ref mut slider) = self.kind {
            // still relative to the head
            slider.lazy_end_pos.y = -slider.lazy_end_pos.y;

            for nested in slider.nested_objects.iter_mut() {
                reflect_y(&mut nested.pos.y);
            }
        }
    }

    pub const fn end_time(&self) -> f64 {
        match self.kind {
            OsuObjectKind::Circle => self.start_time,
            OsuObjectKind::Slider(ref slider) => slider.end_time,
            OsuObjectKind::Spinner { end_time } => end_time,
        }
    }

    pub fn stacked_pos(&self) -> Pos {
        self.pos + self.stack_offset
    }

    /// Position of the slider tail or, for other objects, the object itself.
    pub fn end_pos(&self) -> Pos {
        match self.kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => self.pos,
            OsuObjectKind::Slider(ref slider) => slider.tail().map_or(self.pos, |tail| tail.pos),
        }
    }

    pub fn stacked_end_pos(&self) -> Pos {
        self.end_pos() + self.stack_offset
    }

    pub fn lazy_travel_time(&self) -> f64 {
        match self.kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => 0.0,
            OsuObjectKind::Slider(ref slider) => slider.lazy_travel_time,
        }
    }

    pub const fn is_circle(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Circle)
    }

    pub const fn is_slider(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Slider(_))
    }

    pub const fn is_spinner(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Spinner { .. })
    }
}

pub enum OsuObjectKind {
    Circle,
    Slider(OsuSlider),
    Spinner { end_time: f64 },
}

pub struct OsuSlider {
    pub end_time: f64,
    pub repeats: usize,
    /// Where the cursor ends up when lazily following the slider.
    ///
    /// Relative to the head until the stack offset is known.
    pub lazy_end_pos: Pos,
    pub lazy_travel_dist: f64,
    /// Time from the head until the last nested object.
    pub lazy_travel_time: f64,
    /// Ticks, repeats, and the tail, sorted by start time.
    pub nested_objects: Vec<NestedSliderObject>,
}

impl OsuSlider {
    fn new(pos: Pos, start_time: f64, slider: &Slider, events_buf: &mut Vec<SliderEvent>) -> Self {
        let span_count = slider.span_count();
        let span_duration = slider.span_duration();
        let path = &slider.path;

        let timing = SliderTiming {
            start_time,
            span_duration,
            span_count,
            velocity: slider.velocity,
            tick_distance: slider.tick_distance,
            length: path.dist(),
        };

        slider_events::generate(&timing, events_buf);

        // the tail sits at the path end after an odd amount of spans
        let end_path_pos = if span_count % 2 == 0 {
            path.position_at(0.0)
        } else {
            path.position_at(1.0)
        };

        let mut nested_objects: Vec<_> = events_buf
            .iter()
            .map(|e| {
                let (pos, kind) = match e.kind {
                    SliderEventKind::Tick => {
                        (pos + path.position_at(e.path_progress), NestedSliderObjectKind::Tick)
                    }
                    SliderEventKind::Repeat => (
                        pos + path.position_at(e.path_progress),
                        NestedSliderObjectKind::Repeat,
                    ),
                    SliderEventKind::LastTick => (pos + end_path_pos, NestedSliderObjectKind::Tail),
                };

                NestedSliderObject {
                    pos,
                    start_time: e.time,
                    kind,
                }
            })
            .collect();

        nested_objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let lazy_travel_time = nested_objects
            .last()
            .map_or(0.0, |nested| nested.start_time - start_time);

        let mut end_time_min = lazy_travel_time / span_duration;

        if end_time_min % 2.0 >= 1.0 {
            end_time_min = 1.0 - end_time_min % 1.0;
        } else {
            end_time_min %= 1.0;
        }

        Self {
            end_time: start_time + slider.duration(),
            repeats: slider.repeats,
            lazy_end_pos: path.position_at(end_time_min),
            lazy_travel_dist: 0.0,
            lazy_travel_time,
            nested_objects,
        }
    }

    pub fn tail(&self) -> Option<&NestedSliderObject> {
        // very short sliders may have ticks after the tail
        self.nested_objects
            .iter()
            .rfind(|nested| matches!(nested.kind, NestedSliderObjectKind::Tail))
    }
}

pub struct NestedSliderObject {
    pub pos: Pos,
    pub start_time: f64,
    pub kind: NestedSliderObjectKind,
}

impl NestedSliderObject {
    pub const fn is_repeat(&self) -> bool {
        matches!(self.kind, NestedSliderObjectKind::Repeat)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NestedSliderObjectKind {
    Repeat,
    Tail,
    Tick,
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::SliderPath;

    use super::*;

    fn slider(repeats: usize) -> HitObject {
        let slider = Slider {
            path: SliderPath::linear(Pos::new(200.0, 0.0)),
            repeats,
            velocity: 0.5,
            tick_distance: 100.0,
        };

        HitObject::slider(Pos::new(100.0, 100.0), 1000.0, slider)
    }

    #[test]
    fn nested_objects_sorted() {
        let h = OsuObject::new(&slider(1), &mut Vec::new());

        let OsuObjectKind::Slider(ref slider) = h.kind else {
            panic!("expected slider");
        };

        let kinds: Vec<_> = slider.nested_objects.iter().map(|n| n.kind).collect();

        assert_eq!(
            kinds,
            [
                NestedSliderObjectKind::Tick,
                NestedSliderObjectKind::Repeat,
                NestedSliderObjectKind::Tick,
                NestedSliderObjectKind::Tail
            ]
        );

        // the tail of a slider with two spans is back at the head
        assert_eq!(h.end_pos(), Pos::new(100.0, 100.0));
        assert_eq!(slider.nested_objects[1].pos, Pos::new(300.0, 100.0));
        assert!((slider.lazy_travel_time - 764.0).abs() < 1e-9);
        assert!((h.end_time() - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn lazy_end_on_single_span() {
        let h = OsuObject::new(&slider(0), &mut Vec::new());

        let OsuObjectKind::Slider(ref slider) = h.kind else {
            panic!("expected slider");
        };

        // 364ms of 400ms travelled
        assert!((slider.lazy_end_pos.x - 182.0).abs() < 1e-3);
        assert_eq!(h.end_pos(), Pos::new(300.0, 100.0));
    }

    #[test]
    fn reflection() {
        let mut h = OsuObject::new(&slider(0), &mut Vec::new());
        h.reflect_vertically();

        assert!((h.pos.y - 284.0).abs() < f32::EPSILON);
        assert!((h.end_pos().y - 284.0).abs() < f32::EPSILON);
    }
}
