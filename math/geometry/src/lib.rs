mod box3;
mod intersection;
mod line_segment;
mod sphere;
mod triangle;

pub use box3::*;
pub use intersection::*;
pub use line_segment::*;
pub use sphere::*;
pub use triangle::*;

use simspace_algebra::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis3 {
  X,
  Y,
  Z,
}

impl Axis3 {
  pub const ALL: [Axis3; 3] = [Axis3::X, Axis3::Y, Axis3::Z];

  #[inline(always)]
  pub fn select<T: Copy>(self, v: Vec3<T>) -> T {
    match self {
      Axis3::X => v.x,
      Axis3::Y => v.y,
      Axis3::Z => v.z,
    }
  }
}

/// Pairwise intersection dispatch. The parameter slot carries query
/// configuration where a test needs one.
pub trait IntersectAble<Target, Result, Parameter = ()> {
  fn intersect(&self, other: &Target, param: &Parameter) -> Result;
}
