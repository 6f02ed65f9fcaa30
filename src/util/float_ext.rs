pub trait FloatExt: Sized {
    /// `self == other`
    fn eq(self, other: Self) -> bool;

    /// Whether the value is finite and not negative.
    fn is_valid_non_negative(self) -> bool;
}

macro_rules! impl_float_ext {
    ( $ty:ty ) => {
        impl FloatExt for $ty {
            fn eq(self, other: Self) -> bool {
                (self - other).abs() < <$ty>::EPSILON
            }

            fn is_valid_non_negative(self) -> bool {
                self.is_finite() && self >= 0.0
            }
        }
    };
}

impl_float_ext!(f32);
impl_float_ext!(f64);
