/// All the ways that a difficulty or performance calculation can fail.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("invalid input")]
    InvalidInput(#[from] InvalidInput),
    #[error("invalid mod combination")]
    InvalidCombination(#[from] InvalidCombination),
}

/// Malformed data handed to a calculation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("hit object {idx} has a non-finite start time or position")]
    NonFiniteObject { idx: usize },
    #[error("hit object {idx} starts before its predecessor")]
    UnsortedObjects { idx: usize },
    #[error("hit object {idx} is a duplicate of its predecessor")]
    DuplicateObject { idx: usize },
    #[error("hit object {idx} has a negative or non-finite duration")]
    NegativeDuration { idx: usize },
    #[error("slider {idx} requires a positive and finite velocity")]
    InvalidSliderVelocity { idx: usize },
    #[error("slider {idx} has a non-finite path or tick distance")]
    InvalidSliderPath { idx: usize },
    #[error("slider {idx} has more than {max} repeats")]
    TooManyRepeats { idx: usize, max: usize },
    #[error("slider {idx} has a tick distance below {min} osu!pixels")]
    TickDistance { idx: usize, min: f64 },
    #[error("slider {idx} would create more than {max} nested objects")]
    TooManyNestedObjects { idx: usize, max: usize },
    #[error("beatmap attribute `{0}` is not finite or out of range")]
    BeatmapAttribute(&'static str),
    #[error("clock rate must be positive and finite, got {0}")]
    ClockRate(f64),
    #[error("accuracy must be between 0 and 100, got {0}")]
    Accuracy(f64),
    #[error("difficulty attribute `{0}` is not finite or out of range")]
    DifficultyAttribute(&'static str),
}

/// A modifier set that cannot be evaluated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCombination {
    #[error("`{0}` and `{1}` cannot be used together")]
    Incompatible(&'static str, &'static str),
    #[error("`{0}` was specified more than once")]
    Duplicate(&'static str),
    #[error("unknown mod acronym `{0}`")]
    UnknownAcronym(String),
    #[error("unknown mod bits {0:#x}")]
    UnknownBits(u32),
}
