pub use self::{
    difficulty::{Difficulty, ModsDependent},
    performance::HitResultPriority,
};

pub(crate) mod difficulty;
mod performance;
