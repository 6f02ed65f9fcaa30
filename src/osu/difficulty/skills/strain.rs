use crate::{
    any::difficulty::skills::{difficulty_value, StrainSections},
    osu::difficulty::object::OsuDifficultyObject,
};

/// A skill whose strain is accumulated over [`SECTION_LEN`] long sections.
///
/// [`SECTION_LEN`]: crate::any::difficulty::skills::SECTION_LEN
pub trait OsuStrainSkill: Sized {
    const REDUCED_SECTION_COUNT: usize = 10;
    const REDUCED_STRAIN_BASELINE: f64 = 0.75;
    const DIFFICULTY_MULTIPLIER: f64 = 1.06;

    fn sections(&self) -> &StrainSections;

    fn sections_mut(&mut self) -> &mut StrainSections;

    /// Update the running strain with `curr` and return it.
    fn strain_value_at(
        &mut self,
        curr: &OsuDifficultyObject<'_>,
        objects: &[OsuDifficultyObject<'_>],
    ) -> f64;

    /// The running strain decayed up until `time`.
    fn calculate_initial_strain(
        &self,
        time: f64,
        curr: &OsuDifficultyObject<'_>,
        objects: &[OsuDifficultyObject<'_>],
    ) -> f64;

    fn process(&mut self, curr: &OsuDifficultyObject<'_>, objects: &[OsuDifficultyObject<'_>]) {
        // The first object doesn't generate a strain so the first section
        // ends after it.
        if curr.idx == 0 {
            self.sections_mut().init(curr.start_time);
        }

        while self.sections().is_past_section(curr.start_time) {
            let section_end = self.sections().curr_section_end();
            let initial_strain = self.calculate_initial_strain(section_end, curr, objects);
            self.sections_mut()
                .start_new_section(initial_strain, curr.start_time);
        }

        let strain = self.strain_value_at(curr, objects);
        self.sections_mut().update_peak(strain);
    }

    /// The strain peaks of all sections so far.
    fn strain_peaks(&self) -> Vec<f64> {
        self.sections().peaks()
    }

    fn difficulty_value(&self) -> f64 {
        difficulty_value(
            self.strain_peaks(),
            Self::REDUCED_SECTION_COUNT,
            Self::REDUCED_STRAIN_BASELINE,
        ) * Self::DIFFICULTY_MULTIPLIER
    }
}
