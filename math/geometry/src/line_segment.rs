use serde::{Deserialize, Serialize};
use simspace_algebra::*;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment<T = f64> {
  pub start: Vec3<T>,
  pub end: Vec3<T>,
}

impl<T: Scalar> LineSegment<T> {
  pub fn new(start: Vec3<T>, end: Vec3<T>) -> Self {
    Self { start, end }
  }

  #[inline]
  pub fn direction(&self) -> Vec3<T> {
    self.end - self.start
  }

  pub fn length(&self) -> T {
    self.direction().length()
  }

  pub fn center(&self) -> Vec3<T> {
    (self.start + self.end) * T::half()
  }

  pub fn closest_point_to(&self, point: Vec3<T>) -> Vec3<T> {
    let dir = self.direction();
    let l2 = dir.length2();
    if l2 == T::zero() {
      return self.start;
    }
    let t = (point - self.start).dot(dir) / l2;
    let t = t.max(T::zero()).min(T::one());
    self.start + dir * t
  }

  pub fn distance2_to_point(&self, point: Vec3<T>) -> T {
    self.closest_point_to(point).distance2(point)
  }

  pub fn apply_matrix(&self, mat: Mat4<T>) -> Self {
    Self::new(mat * self.start, mat * self.end)
  }
}
