use serde::{Deserialize, Serialize};
use simspace_algebra::*;

use crate::*;

/// Bounding sphere. A negative radius marks the empty sphere, which behaves
/// as the identity of `expand_by_sphere`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere<T = f64> {
  pub center: Vec3<T>,
  pub radius: T,
}

impl<T: Scalar> Default for Sphere<T> {
  fn default() -> Self {
    Self::empty()
  }
}

impl<T: Scalar> Sphere<T> {
  pub fn new(center: Vec3<T>, radius: T) -> Self {
    Self { center, radius }
  }

  pub fn empty() -> Self {
    Self {
      center: Vec3::zero(),
      radius: -T::one(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.radius < T::zero()
  }

  /// The smallest sphere circumscribing the box.
  pub fn from_box3(b: &Box3<T>) -> Self {
    if b.is_empty() {
      return Self::empty();
    }
    Self::new(b.center(), b.size().length() * T::half())
  }

  pub fn contains_point(&self, point: Vec3<T>) -> bool {
    !self.is_empty() && self.center.distance2(point) <= self.radius * self.radius
  }

  /// Whether the whole box lies inside the sphere, decided through the
  /// farthest corner.
  pub fn contains_box3(&self, b: &Box3<T>) -> bool {
    if self.is_empty() || b.is_empty() {
      return false;
    }
    self.contains_point(b.farthest_point_to(self.center))
  }

  /// Grows into the smallest sphere containing both inputs.
  pub fn expand_by_sphere(&mut self, other: &Self) {
    if other.is_empty() {
      return;
    }
    if self.is_empty() {
      *self = *other;
      return;
    }
    let d = self.center.distance(other.center);
    if d + other.radius <= self.radius {
      return;
    }
    if d + self.radius <= other.radius {
      *self = *other;
      return;
    }
    let radius = (d + self.radius + other.radius) * T::half();
    let t = (radius - self.radius) / d;
    self.center = self.center + (other.center - self.center) * t;
    self.radius = radius;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expand_keeps_the_larger_of_nested_spheres() {
    let big = Sphere::new(vec3(0.0, 0.0, 0.0), 10.0);
    let small = Sphere::new(vec3(1.0, 0.0, 0.0), 1.0);

    let mut s = big;
    s.expand_by_sphere(&small);
    assert_eq!(s, big);

    let mut s = small;
    s.expand_by_sphere(&big);
    assert_eq!(s, big);
  }

  #[test]
  fn expand_contains_both_inputs() {
    let a = Sphere::new(vec3(-2.0, 0.0, 0.0), 1.0);
    let b = Sphere::new(vec3(3.0, 0.0, 0.0), 2.0);
    let mut s = a;
    s.expand_by_sphere(&b);
    assert!(s.contains_point(vec3(-3.0, 0.0, 0.0)));
    assert!(s.contains_point(vec3(5.0, 0.0, 0.0)));
  }

  #[test]
  fn empty_sphere_is_the_expand_identity() {
    let a = Sphere::new(vec3(1.0, 2.0, 3.0), 4.0);
    let mut s = Sphere::empty();
    s.expand_by_sphere(&a);
    assert_eq!(s, a);
    let mut s = a;
    s.expand_by_sphere(&Sphere::empty());
    assert_eq!(s, a);
  }

  #[test]
  fn containment_uses_the_farthest_corner() {
    let s = Sphere::new(vec3(0.0, 0.0, 0.0), 2.0);
    let inside = Box3::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    let outside = Box3::new(vec3(0.0, 0.0, 0.0), vec3(2.0, 2.0, 2.0));
    assert!(s.contains_box3(&inside));
    assert!(!s.contains_box3(&outside));
  }
}
