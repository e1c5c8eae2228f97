use std::fmt::Debug;

/// The scalar abstraction the simulation math is generic over.
///
/// World space computation uses f64 for precision, so all types in this
/// crate default their scalar to f64. f32 stays available for payloads
/// that do not need the extra bits.
pub trait Scalar: num_traits::Float + Debug + Default + Send + Sync + 'static {
  #[inline(always)]
  fn two() -> Self {
    Self::one() + Self::one()
  }
  #[inline(always)]
  fn half() -> Self {
    Self::one() / Self::two()
  }
}

impl Scalar for f32 {}
impl Scalar for f64 {}
