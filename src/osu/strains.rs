use crate::{any::difficulty::Difficulty, model::beatmap::Beatmap};

use super::difficulty::{
    skills::{strain::OsuStrainSkill, OsuSkills},
    DifficultyValues,
};

/// The result of calculating the strains on a osu! map.
///
/// Suitable to plot the difficulty of a map over time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsuStrains {
    /// Strain peaks of the aim skill.
    pub aim: Vec<f64>,
    /// Strain peaks of the aim skill without sliders.
    pub aim_no_sliders: Vec<f64>,
    /// Strain peaks of the speed skill.
    pub speed: Vec<f64>,
    /// Strain peaks of the flashlight skill.
    pub flashlight: Vec<f64>,
}

impl OsuStrains {
    /// Time between two strains in ms.
    pub const SECTION_LEN: f64 = crate::any::difficulty::skills::SECTION_LEN;
}

pub fn strains(difficulty: &Difficulty, map: &Beatmap) -> OsuStrains {
    let DifficultyValues {
        skills:
            OsuSkills {
                aim,
                aim_no_sliders,
                speed,
                flashlight,
            },
        attrs: _,
    } = DifficultyValues::calculate(difficulty, map);

    OsuStrains {
        aim: aim.strain_peaks(),
        aim_no_sliders: aim_no_sliders.strain_peaks(),
        speed: speed.strain_peaks(),
        flashlight: flashlight.strain_peaks(),
    }
}
