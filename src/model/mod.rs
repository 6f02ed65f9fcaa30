/// Beatmap related types.
pub mod beatmap;

/// Error types.
pub mod error;

/// Hitobject related types.
pub mod hit_object;

/// Gamemods related types.
pub mod mods;
