/// While generating remaining hitresults, decide how they should be distributed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HitResultPriority {
    /// Prioritize good hitresults over bad ones
    #[default]
    BestCase,
    /// Prioritize bad hitresults over good ones
    WorstCase,
}
