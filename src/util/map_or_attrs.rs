use crate::{model::beatmap::Beatmap, osu::OsuDifficultyAttributes};

/// Either a borrowed [`Beatmap`] whose attributes still need to be
/// calculated or the attributes of a previous calculation.
#[derive(Clone, Debug, PartialEq)]
pub enum MapOrAttrs<'map> {
    Map(&'map Beatmap),
    Attrs(OsuDifficultyAttributes),
}

impl MapOrAttrs<'_> {
    /// Return a reference to the attributes.
    ///
    /// If `self` is of variant `Map`, store `attrs` in `self` first.
    pub fn insert_attrs(&mut self, attrs: OsuDifficultyAttributes) -> &OsuDifficultyAttributes {
        if let Self::Map(_) = self {
            *self = Self::Attrs(attrs);
        }

        match self {
            Self::Attrs(ref attrs) => attrs,
            Self::Map(_) => unreachable!("variant was replaced right before"),
        }
    }
}

impl<'map> From<&'map Beatmap> for MapOrAttrs<'map> {
    fn from(map: &'map Beatmap) -> Self {
        Self::Map(map)
    }
}

impl From<OsuDifficultyAttributes> for MapOrAttrs<'_> {
    fn from(attrs: OsuDifficultyAttributes) -> Self {
        Self::Attrs(attrs)
    }
}
