use crate::model::hit_object::Slider;

/// Sliders longer than this are treated as if they had this length when
/// generating ticks.
const MAX_LENGTH: f64 = 100_000.0;

/// Upper limit of nested objects for a single slider, head included.
pub const MAX_NESTED_OBJECTS: usize = 100_000;

/// osu!stable placed the final tick of a slider this many milliseconds
/// before its actual end.
const LEGACY_LAST_TICK_OFFSET: f64 = 36.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SliderEventKind {
    Tick,
    Repeat,
    LastTick,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SliderEvent {
    pub kind: SliderEventKind,
    pub span_idx: usize,
    pub time: f64,
    /// Progress along the path between `0.0` and `1.0`.
    pub path_progress: f64,
}

/// Timing information of a slider required to generate its events.
pub struct SliderTiming {
    pub start_time: f64,
    pub span_duration: f64,
    pub span_count: usize,
    pub velocity: f64,
    pub tick_distance: f64,
    pub length: f64,
}

/// Upper bound of the nested objects that a slider creates, head included.
pub fn nested_count(slider: &Slider) -> usize {
    let length = slider.path.dist().min(MAX_LENGTH);

    let ticks_per_span = if slider.tick_distance > 0.0 && length > 0.0 {
        (length / slider.tick_distance).floor() as usize
    } else {
        0
    };

    // ticks plus a repeat or the last tick per span
    slider
        .span_count()
        .saturating_mul(ticks_per_span.saturating_add(1))
        .saturating_add(1)
}

/// Fill `events` with the ticks, repeats, and the legacy last tick of a
/// slider in generation order, i.e. not necessarily sorted by time.
///
/// The slider head and tail are not included. No more than
/// [`MAX_NESTED_OBJECTS`] events are generated.
pub fn generate(timing: &SliderTiming, events: &mut Vec<SliderEvent>) {
    events.clear();

    let SliderTiming {
        start_time,
        span_duration,
        span_count,
        velocity,
        tick_distance,
        length,
    } = *timing;

    let span_count = span_count.max(1);
    let length = length.min(MAX_LENGTH);
    let tick_distance = tick_distance.clamp(0.0, length);
    let min_dist_from_end = velocity * 10.0;

    // leaves room for the last tick and the head
    let max_events = MAX_NESTED_OBJECTS - 2;

    for span_idx in 0..span_count {
        if events.len() >= max_events {
            break;
        }

        let span_start_time = start_time + span_idx as f64 * span_duration;
        let reversed = span_idx % 2 == 1;

        if tick_distance > 0.0 {
            let first_tick = events.len();
            let mut dist = tick_distance;

            while dist <= length && events.len() < max_events {
                if dist >= length - min_dist_from_end {
                    break;
                }

                let path_progress = dist / length;

                let time_progress = if reversed {
                    1.0 - path_progress
                } else {
                    path_progress
                };

                events.push(SliderEvent {
                    kind: SliderEventKind::Tick,
                    span_idx,
                    time: span_start_time + time_progress * span_duration,
                    path_progress,
                });

                dist += tick_distance;
            }

            // ticks on reversed spans are travelled back to front
            if reversed {
                events[first_tick..].reverse();
            }
        }

        if span_idx < span_count - 1 && events.len() < max_events {
            events.push(SliderEvent {
                kind: SliderEventKind::Repeat,
                span_idx,
                time: span_start_time + span_duration,
                path_progress: ((span_idx + 1) % 2) as f64,
            });
        }
    }

    let total_duration = span_count as f64 * span_duration;
    let final_span_idx = span_count - 1;
    let final_span_start_time = start_time + final_span_idx as f64 * span_duration;

    let final_span_end_time = f64::max(
        start_time + total_duration / 2.0,
        final_span_start_time + span_duration - LEGACY_LAST_TICK_OFFSET,
    );

    let mut final_progress = if span_duration > 0.0 {
        (final_span_end_time - final_span_start_time) / span_duration
    } else {
        1.0
    };

    if span_count % 2 == 0 {
        final_progress = 1.0 - final_progress;
    }

    events.push(SliderEvent {
        kind: SliderEventKind::LastTick,
        span_idx: final_span_idx,
        time: final_span_end_time,
        path_progress: final_progress,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(span_count: usize, tick_distance: f64) -> SliderTiming {
        // 200px at 0.5px/ms => 400ms per span
        SliderTiming {
            start_time: 1000.0,
            span_duration: 400.0,
            span_count,
            velocity: 0.5,
            tick_distance,
            length: 200.0,
        }
    }

    fn kinds(events: &[SliderEvent]) -> Vec<SliderEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn single_span() {
        let mut events = Vec::new();
        generate(&timing(1, 50.0), &mut events);

        assert_eq!(
            kinds(&events),
            [
                SliderEventKind::Tick,
                SliderEventKind::Tick,
                SliderEventKind::Tick,
                SliderEventKind::LastTick
            ]
        );

        let times: Vec<_> = events.iter().map(|e| e.time).collect();
        assert_eq!(times, [1100.0, 1200.0, 1300.0, 1364.0]);
    }

    #[test]
    fn reversed_ticks() {
        let mut events = Vec::new();
        generate(&timing(2, 100.0), &mut events);

        assert_eq!(
            kinds(&events),
            [
                SliderEventKind::Tick,
                SliderEventKind::Repeat,
                SliderEventKind::Tick,
                SliderEventKind::LastTick
            ]
        );

        assert!((events[1].time - 1400.0).abs() < f64::EPSILON);
        assert!((events[1].path_progress - 1.0).abs() < f64::EPSILON);

        // the tick at the path's center is passed halfway through the second span
        assert!((events[2].time - 1600.0).abs() < f64::EPSILON);
        assert!((events[2].path_progress - 0.5).abs() < f64::EPSILON);

        assert!((events[3].time - 1764.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ticks_near_end_are_skipped() {
        let mut events = Vec::new();

        // the second tick would be within `velocity * 10` of the end
        generate(&timing(1, 98.0), &mut events);

        assert_eq!(
            kinds(&events),
            [SliderEventKind::Tick, SliderEventKind::LastTick]
        );
    }

    #[test]
    fn repeats_without_ticks() {
        let mut events = Vec::new();
        generate(&timing(3, 0.0), &mut events);

        assert_eq!(
            kinds(&events),
            [
                SliderEventKind::Repeat,
                SliderEventKind::Repeat,
                SliderEventKind::LastTick
            ]
        );
    }

    #[test]
    fn event_count_is_capped() {
        let mut events = Vec::new();

        let timing = SliderTiming {
            start_time: 0.0,
            span_duration: 1000.0,
            span_count: usize::MAX,
            velocity: 1.0,
            tick_distance: 1.0,
            length: 1000.0,
        };

        generate(&timing, &mut events);

        assert_eq!(events.len(), MAX_NESTED_OBJECTS - 1);
        assert_eq!(events.last().map(|e| e.kind), Some(SliderEventKind::LastTick));
    }

    #[test]
    fn nested_count_bounds_events() {
        use crate::model::hit_object::{Pos, SliderPath};

        let slider = Slider {
            path: SliderPath::linear(Pos::new(200.0, 0.0)),
            repeats: 1,
            velocity: 0.5,
            tick_distance: 50.0,
        };

        let mut events = Vec::new();
        generate(&timing(2, 50.0), &mut events);

        // generated events plus the head
        assert!(events.len() + 1 <= nested_count(&slider));
        assert_eq!(nested_count(&slider), 2 * 5 + 1);
    }

    #[test]
    fn short_slider_last_tick() {
        let mut events = Vec::new();

        let timing = SliderTiming {
            start_time: 0.0,
            span_duration: 50.0,
            span_count: 1,
            velocity: 1.0,
            tick_distance: 0.0,
            length: 50.0,
        };

        generate(&timing, &mut events);

        // halfway point is later than `end - 36`
        assert!((events[0].time - 25.0).abs() < f64::EPSILON);
    }
}
