//! Library to calculate difficulty and performance attributes for
//! [osu!standard] beatmaps.
//!
//! ## Description
//!
//! Every hit object is compared to its predecessors to get the strain it puts
//! on the aim, speed, and flashlight skill of a player. The strains are
//! grouped into sections of 400ms whose peaks make up a skill's difficulty
//! and those combine into the star rating.
//!
//! Performance points then rate a play on a map by combining its difficulty
//! attributes with the play's combo and hitresults.
//!
//! Implemented are the osu!standard formulas as of the
//! [2022 rework](https://osu.ppy.sh/home/news/2022-09-30-changes-to-osu-sr-and-pp).
//!
//! ## Usage
//!
//! ```
//! use strain_pp::{
//!     model::hit_object::{HitObject, Pos},
//!     Beatmap, Difficulty, OsuPerformance,
//! };
//!
//! // Decoding is up to the caller, the map is built from its hit objects
//! let map = Beatmap::new(vec![
//!     HitObject::circle(Pos::new(64.0, 192.0), 0.0),
//!     HitObject::circle(Pos::new(256.0, 96.0), 250.0),
//!     HitObject::circle(Pos::new(448.0, 192.0), 500.0),
//!     HitObject::circle(Pos::new(256.0, 288.0), 750.0),
//! ]);
//!
//! // Calculate difficulty attributes
//! let diff_attrs = Difficulty::new()
//!     .mods(8 + 16) // HDHR
//!     .calculate(&map)
//!     .unwrap();
//!
//! let stars = diff_attrs.stars;
//!
//! // Calculate performance attributes
//! let perf_attrs = OsuPerformance::new(&map)
//!     // To speed up the calculation, we can re-use the previous
//!     // attributes.
//!     // **Note** that this should only be done if the map, mods, clock
//!     // rate, and amount of passed objects stay the same. Otherwise, the
//!     // resulting attributes will be incorrect.
//!     .attributes(diff_attrs)
//!     .mods(24) // HDHR, same as before
//!     .combo(3)
//!     .accuracy(99.2)
//!     .misses(1)
//!     .calculate()
//!     .unwrap();
//!
//! let pp = perf_attrs.pp();
//!
//! // Again, we re-use the previous attributes for maximum efficiency.
//! let max_pp = perf_attrs.performance()
//!     .mods(24) // Still the same
//!     .calculate()
//!     .unwrap()
//!     .pp();
//!
//! println!("Stars: {stars} | PP: {pp}/{max_pp}");
//! ```
//!
//! ## Features
//!
//! | Flag | Description | Dependencies
//! | - | - | -
//! | `default` | No features |
//! | `serde` | Attributes, score states, and strains implement `serde::Serialize` and `serde::Deserialize`. | [`serde`]
//! | `tracing` | Lossy adjustments of the input and rejected inputs are logged through `tracing`. If this feature is not enabled, nothing is logged. | [`tracing`]
//!
//! [osu!standard]: https://osu.ppy.sh/home
//! [`serde`]: https://docs.rs/serde
//! [`tracing`]: https://docs.rs/tracing

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::missing_const_for_fn, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::struct_excessive_bools,
    clippy::match_same_arms,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::explicit_iter_loop,
    clippy::similar_names,
    clippy::cast_possible_wrap
)]

#[doc(inline)]
pub use self::{
    any::{Difficulty, HitResultPriority},
    model::{beatmap::Beatmap, error::CalcError, mods::GameMods},
    osu::OsuPerformance,
};

/// Types shared by calculations.
pub mod any;

/// Types for osu!standard calculations.
pub mod osu;

/// Types used in and around this crate.
pub mod model;

mod util;
