use crate::util::difficulty::lerp;

/// Length of a strain section in milliseconds.
pub const SECTION_LEN: f64 = 400.0;

/// Weight factor between consecutive sorted strain peaks.
pub const DECAY_WEIGHT: f64 = 0.9;

pub fn strain_decay(ms: f64, strain_decay_base: f64) -> f64 {
    f64::powf(strain_decay_base, ms / 1000.0)
}

/// Accumulates the peak strain of consecutive sections.
///
/// Sections are [`SECTION_LEN`] long and aligned to multiples of it. When a
/// new section starts, its peak is initialized with the decayed strain at
/// the section boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrainSections {
    curr_section_peak: f64,
    curr_section_end: f64,
    strain_peaks: Vec<f64>,
}

impl StrainSections {
    pub const fn new() -> Self {
        Self {
            curr_section_peak: 0.0,
            curr_section_end: 0.0,
            strain_peaks: Vec::new(),
        }
    }

    /// Align the end of the first section to the first processed object.
    pub fn init(&mut self, start_time: f64) {
        self.curr_section_end = (start_time / SECTION_LEN).ceil() * SECTION_LEN;
    }

    pub const fn curr_section_end(&self) -> f64 {
        self.curr_section_end
    }

    /// Whether an object at the given time lies past the current section.
    pub fn is_past_section(&self, time: f64) -> bool {
        time > self.curr_section_end
    }

    /// Store the current peak and start the next section with the given
    /// initial strain.
    ///
    /// `time` is the start time of the object that is about to be processed.
    pub fn start_new_section(&mut self, initial_strain: f64, time: f64) {
        self.strain_peaks.push(self.curr_section_peak);
        self.curr_section_peak = initial_strain;
        self.curr_section_end += SECTION_LEN;

        // A zero strain cannot decay further so the empty sections up to
        // `time` are skipped without storing their peaks.
        if self.curr_section_peak.abs() <= f64::EPSILON && time > self.curr_section_end {
            let remaining_iters = ((time - self.curr_section_end) / SECTION_LEN).ceil();
            self.curr_section_end += remaining_iters * SECTION_LEN;
        }
    }

    pub fn update_peak(&mut self, strain: f64) {
        self.curr_section_peak = self.curr_section_peak.max(strain);
    }

    /// All stored peaks including the current one.
    pub fn peaks(&self) -> Vec<f64> {
        let mut peaks = Vec::with_capacity(self.strain_peaks.len() + 1);
        peaks.extend_from_slice(&self.strain_peaks);
        peaks.push(self.curr_section_peak);

        peaks
    }
}

/// Weighted sum of the sorted peaks after reducing the highest
/// `reduced_section_count` of them to dampen difficulty spikes.
pub fn difficulty_value(
    current_strain_peaks: Vec<f64>,
    reduced_section_count: usize,
    reduced_strain_baseline: f64,
) -> f64 {
    let mut difficulty = 0.0;
    let mut weight = 1.0;

    // Zero sections don't contribute and only slow down the sort
    let mut peaks = current_strain_peaks;
    peaks.retain(|&peak| peak > 0.0);
    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    let peaks_iter = peaks.iter_mut().take(reduced_section_count);

    for (i, strain) in peaks_iter.enumerate() {
        let clamped = f64::from((i as f32 / reduced_section_count as f32).clamp(0.0, 1.0));
        let scale = f64::log10(lerp(1.0, 10.0, clamped));
        *strain *= lerp(reduced_strain_baseline, 1.0, scale);
    }

    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    for strain in peaks {
        difficulty += strain * weight;
        weight *= DECAY_WEIGHT;
    }

    difficulty
}
