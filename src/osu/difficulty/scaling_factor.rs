use crate::{model::hit_object::Pos, osu::object::OsuObject};

use super::object::OsuDifficultyObject;

/// Fields around the scaling of hit objects.
///
/// All objects of a map share the same scaling so it's only stored once.
pub struct ScalingFactor {
    /// `NORMALIZED_RADIUS / radius` and then adjusted if `radius < 30`
    pub factor: f64,
    pub radius: f64,
    pub scale: f32,
}

impl ScalingFactor {
    pub fn new(cs: f64) -> Self {
        let scale = ((1.0 - 0.7 * (cs - 5.0) / 5.0) / 2.0) as f32;

        let radius = f64::from(OsuObject::OBJECT_RADIUS * scale);
        let factor = OsuDifficultyObject::NORMALIZED_RADIUS / radius;

        let factor_with_small_circle_bonus = if radius < 30.0 {
            factor * (1.0 + (30.0 - radius).min(5.0) / 50.0)
        } else {
            factor
        };

        Self {
            factor: factor_with_small_circle_bonus,
            radius,
            scale,
        }
    }

    pub fn stack_offset(&self, stack_height: i32) -> Pos {
        let stack_offset = stack_height as f32 * self.scale * -6.4;

        Pos::new(stack_offset, stack_offset)
    }
}
