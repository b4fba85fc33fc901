use std::fmt::{Debug, Display};

use geo_traits::CoordTrait;
use num_traits::{Num, NumCast, ToPrimitive};

use crate::error::{KdTreeError, Result};

/// A trait for types that can be used for indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Distances are always
/// computed in `f64`, so only types every value of which `f64` represents exactly are accepted.
/// 64-bit integers are not:
///
/// ```compile_fail
/// use kd_index::kdtree::KdTree;
///
/// let tree = KdTree::<i64, 2>::new();
/// ```
pub trait IndexableNum:
    private::Sealed
    + Num
    + NumCast
    + ToPrimitive
    + PartialOrd
    + Copy
    + Debug
    + Display
    + Send
    + Sync
{
    /// This coordinate widened to `f64` for distance computations.
    #[inline]
    fn as_f64(self) -> f64 {
        // Every sealed implementor is a primitive, for which this conversion never fails.
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl IndexableNum for i8 {}
impl IndexableNum for u8 {}
impl IndexableNum for i16 {}
impl IndexableNum for u16 {}
impl IndexableNum for i32 {}
impl IndexableNum for u32 {}
impl IndexableNum for f32 {}
impl IndexableNum for f64 {}

/// Convert a caller-provided slice into a fixed-size point, rejecting any other length.
pub(crate) fn to_point<N: IndexableNum, const K: usize>(point: &[N]) -> Result<[N; K]> {
    as_point(point).copied()
}

/// Borrow a caller-provided slice as a fixed-size point, rejecting any other length.
pub(crate) fn as_point<N: IndexableNum, const K: usize>(point: &[N]) -> Result<&[N; K]> {
    point
        .try_into()
        .map_err(|_| KdTreeError::dimension_mismatch("point", point.len(), K))
}

/// Borrow a caller-provided slice as a fixed-size mask, rejecting any other length.
pub(crate) fn as_mask<const K: usize>(mask: &[bool]) -> Result<&[bool; K]> {
    mask.try_into()
        .map_err(|_| KdTreeError::dimension_mismatch("mask", mask.len(), K))
}

/// Copy a coordinate into a fixed-size point, rejecting coordinates with any other number of
/// dimensions.
pub(crate) fn coord_to_point<N: IndexableNum, const K: usize>(
    coord: &impl CoordTrait<T = N>,
) -> Result<[N; K]> {
    let dims = coord.dim().size();
    if dims != K {
        return Err(KdTreeError::dimension_mismatch("coordinate", dims, K));
    }
    Ok(std::array::from_fn(|i| coord.nth_or_panic(i)))
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for i8 {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for u16 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
