use std::cmp::Ordering;

pub use rosu_map::util::Pos;

/// All hitobject related data required for difficulty and performance
/// calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct HitObject {
    pub pos: Pos,
    pub start_time: f64,
    pub kind: HitObjectKind,
}

impl HitObject {
    /// Create a new circle.
    pub const fn circle(pos: Pos, start_time: f64) -> Self {
        Self {
            pos,
            start_time,
            kind: HitObjectKind::Circle,
        }
    }

    /// Create a new slider.
    pub const fn slider(pos: Pos, start_time: f64, slider: Slider) -> Self {
        Self {
            pos,
            start_time,
            kind: HitObjectKind::Slider(slider),
        }
    }

    /// Create a new spinner.
    pub const fn spinner(pos: Pos, start_time: f64, duration: f64) -> Self {
        Self {
            pos,
            start_time,
            kind: HitObjectKind::Spinner(Spinner { duration }),
        }
    }

    /// Whether the hitobject is a circle.
    pub const fn is_circle(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Circle)
    }

    /// Whether the hitobject is a slider.
    pub const fn is_slider(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Slider(_))
    }

    /// Whether the hitobject is a spinner.
    pub const fn is_spinner(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Spinner(_))
    }

    /// The end time of the object.
    pub fn end_time(&self) -> f64 {
        match &self.kind {
            HitObjectKind::Circle => self.start_time,
            HitObjectKind::Slider(slider) => self.start_time + slider.duration(),
            HitObjectKind::Spinner(Spinner { duration }) => self.start_time + *duration,
        }
    }
}

impl PartialOrd for HitObject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.start_time.partial_cmp(&other.start_time)
    }
}

/// Additional data for a [`HitObject`].
#[derive(Clone, Debug, PartialEq)]
pub enum HitObjectKind {
    Circle,
    Slider(Slider),
    Spinner(Spinner),
}

/// A slider.
#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    /// The path relative to the slider head.
    pub path: SliderPath,
    /// The amount of repeats i.e. `0` for a slider with a single span.
    pub repeats: usize,
    /// Travelling speed along the path in osu!pixels per millisecond.
    pub velocity: f64,
    /// Distance between two slider ticks in osu!pixels.
    ///
    /// A value of `0.0` disables ticks.
    pub tick_distance: f64,
}

impl Slider {
    /// Sliders with more repeats are rejected.
    pub const MAX_REPEATS: usize = 9000;

    /// Positive tick distances below this are rejected.
    pub const MIN_TICK_DISTANCE: f64 = 1.0;

    /// The amount of spans of the slider.
    pub const fn span_count(&self) -> usize {
        self.repeats.saturating_add(1)
    }

    /// The duration of a single span.
    pub fn span_duration(&self) -> f64 {
        self.path.dist() / self.velocity
    }

    /// The duration of the whole slider.
    pub fn duration(&self) -> f64 {
        self.span_count() as f64 * self.span_duration()
    }
}

/// A spinner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spinner {
    pub duration: f64,
}

/// A slider path approximated by straight segments.
///
/// Positions are relative to the slider head so the path always starts at
/// the origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SliderPath {
    points: Vec<Pos>,
    cumulative_lengths: Vec<f64>,
}

impl SliderPath {
    /// Create a path through the given points.
    ///
    /// If the first point is not the origin, the origin is prepended.
    pub fn new(points: impl IntoIterator<Item = Pos>) -> Self {
        let mut points: Vec<Pos> = points.into_iter().collect();

        if points.first().map_or(true, |first| first.length() > 0.0) {
            points.insert(0, Pos::default());
        }

        let mut cumulative_lengths = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative_lengths.push(total);

        for pair in points.windows(2) {
            total += f64::from(pair[0].distance(pair[1]));
            cumulative_lengths.push(total);
        }

        Self {
            points,
            cumulative_lengths,
        }
    }

    /// A straight path from the origin to `end`.
    pub fn linear(end: Pos) -> Self {
        Self::new([Pos::default(), end])
    }

    /// The points of the path, starting at the origin.
    pub fn points(&self) -> &[Pos] {
        &self.points
    }

    /// The total length of the path.
    pub fn dist(&self) -> f64 {
        self.cumulative_lengths.last().copied().unwrap_or(0.0)
    }

    /// The position at the given progress, clamped to `0.0..=1.0`.
    pub fn position_at(&self, progress: f64) -> Pos {
        let dist = self.dist();

        if self.points.len() < 2 || dist <= 0.0 || progress.is_nan() {
            return self.points.first().copied().unwrap_or_default();
        }

        let target = progress.clamp(0.0, 1.0) * dist;

        let idx = self
            .cumulative_lengths
            .partition_point(|&len| len < target)
            .clamp(1, self.points.len() - 1);

        let start = self.points[idx - 1];
        let end = self.points[idx];
        let start_len = self.cumulative_lengths[idx - 1];
        let segment_len = self.cumulative_lengths[idx] - start_len;

        if segment_len <= 0.0 {
            return start;
        }

        let t = ((target - start_len) / segment_len) as f32;

        start + (end - start) * t
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) && self.dist().is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_pos(actual: Pos, x: f32, y: f32) {
        assert!(
            (actual.x - x).abs() < 1e-4 && (actual.y - y).abs() < 1e-4,
            "expected ({x}, {y}), got {actual:?}"
        );
    }

    #[test]
    fn path_positions() {
        let path = SliderPath::new([Pos::new(100.0, 0.0), Pos::new(100.0, 50.0)]);

        assert_eq!(path.points().len(), 3);
        assert!((path.dist() - 150.0).abs() < 1e-9);
        assert_pos(path.position_at(0.0), 0.0, 0.0);
        assert_pos(path.position_at(0.5), 75.0, 0.0);
        assert_pos(path.position_at(1.0), 100.0, 50.0);
        assert_pos(path.position_at(2.0), 100.0, 50.0);
        assert_pos(path.position_at(-1.0), 0.0, 0.0);
    }

    #[test]
    fn empty_path() {
        let path = SliderPath::new([]);

        assert!(path.dist().abs() < f64::EPSILON);
        assert_pos(path.position_at(0.5), 0.0, 0.0);
    }

    #[test]
    fn slider_timing() {
        let slider = Slider {
            path: SliderPath::linear(Pos::new(200.0, 0.0)),
            repeats: 2,
            velocity: 0.5,
            tick_distance: 50.0,
        };

        assert_eq!(slider.span_count(), 3);
        assert!((slider.span_duration() - 400.0).abs() < 1e-9);

        let h = HitObject::slider(Pos::new(10.0, 10.0), 1000.0, slider);
        assert!((h.end_time() - 2200.0).abs() < 1e-9);
    }
}
