pub mod difficulty;
pub mod float_ext;
pub mod macros;
pub mod map_or_attrs;
