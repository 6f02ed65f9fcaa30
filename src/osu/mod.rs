pub use self::{
    attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    performance::OsuPerformance,
    score_state::OsuScoreState,
    strains::OsuStrains,
};

mod attributes;
mod convert;
pub(crate) mod difficulty;
mod object;
pub(crate) mod performance;
mod score_state;
pub(crate) mod slider_events;
pub(crate) mod strains;

const PLAYFIELD_HEIGHT: f32 = 384.0;
