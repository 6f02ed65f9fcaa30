/// A difficulty object that knows its position within the list of all
/// difficulty objects.
pub trait IDifficultyObject: Sized {
    fn idx(&self) -> usize;

    fn previous<'a>(&self, backwards_idx: usize, diff_objects: &'a [Self]) -> Option<&'a Self> {
        self.idx()
            .checked_sub(backwards_idx + 1)
            .and_then(|idx| diff_objects.get(idx))
    }

    fn next<'a>(&self, forwards_idx: usize, diff_objects: &'a [Self]) -> Option<&'a Self> {
        diff_objects.get(self.idx() + (forwards_idx + 1))
    }
}

pub trait HasStartTime {
    fn start_time(&self) -> f64;
}

/// Start time of the object `backwards_idx + 1` positions before `curr`, or
/// `0.0` if there is none.
pub fn previous_start_time<T>(curr: &T, backwards_idx: usize, diff_objects: &[T]) -> f64
where
    T: IDifficultyObject + HasStartTime,
{
    curr.previous(backwards_idx, diff_objects)
        .map_or(0.0, HasStartTime::start_time)
}
