/// Map a difficulty value in `0..=10` onto the given range where `5` maps
/// onto `mid`.
pub fn difficulty_range(difficulty: f64, min: f64, mid: f64, max: f64) -> f64 {
    if difficulty > 5.0 {
        mid + (max - mid) * (difficulty - 5.0) / 5.0
    } else if difficulty < 5.0 {
        mid - (mid - min) * (5.0 - difficulty) / 5.0
    } else {
        mid
    }
}

pub fn lerp(start: f64, end: f64, amount: f64) -> f64 {
    start + (end - start) * amount
}
