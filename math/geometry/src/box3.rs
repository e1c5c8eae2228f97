use std::iter::FromIterator;

use serde::{Deserialize, Serialize};
use simspace_algebra::*;

use crate::*;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Box3<T = f64> {
  pub min: Vec3<T>,
  pub max: Vec3<T>,
}

impl<T: Scalar> Default for Box3<T> {
  fn default() -> Self {
    Self::empty()
  }
}

impl<T: Scalar> Box3<T> {
  pub fn new(min: Vec3<T>, max: Vec3<T>) -> Self {
    Self { min, max }
  }

  pub fn empty() -> Self {
    Self {
      min: Vec3::splat(T::infinity()),
      max: Vec3::splat(T::neg_infinity()),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
  }

  pub fn center(&self) -> Vec3<T> {
    (self.min + self.max) * T::half()
  }

  pub fn size(&self) -> Vec3<T> {
    self.max - self.min
  }

  pub fn expand_by_point(&mut self, point: Vec3<T>) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  pub fn expand_by_box(&mut self, other: &Self) {
    if other.is_empty() {
      return;
    }
    self.min = self.min.min(other.min);
    self.max = self.max.max(other.max);
  }

  /// Expands by the axis aligned cube circumscribing the sphere.
  pub fn expand_by_sphere(&mut self, sphere: &Sphere<T>) {
    if sphere.is_empty() {
      return;
    }
    let r = Vec3::splat(sphere.radius);
    self.min = self.min.min(sphere.center - r);
    self.max = self.max.max(sphere.center + r);
  }

  /// The axis with the largest extent. Empty boxes report X.
  pub fn broadest_axis(&self) -> Axis3 {
    let size = self.size();
    if size.x >= size.y && size.x >= size.z {
      Axis3::X
    } else if size.y >= size.z {
      Axis3::Y
    } else {
      Axis3::Z
    }
  }

  /// The corner farthest away from the given point.
  pub fn farthest_point_to(&self, point: Vec3<T>) -> Vec3<T> {
    #[inline(always)]
    fn pick<T: Scalar>(p: T, min: T, max: T) -> T {
      if (p - min).abs() >= (p - max).abs() {
        min
      } else {
        max
      }
    }
    Vec3::new(
      pick(point.x, self.min.x, self.max.x),
      pick(point.y, self.min.y, self.max.y),
      pick(point.z, self.min.z, self.max.z),
    )
  }

  pub fn distance2_to_point(&self, point: Vec3<T>) -> T {
    let closest = point.max(self.min).min(self.max);
    closest.distance2(point)
  }
}

impl<T: Scalar> FromIterator<Vec3<T>> for Box3<T> {
  fn from_iter<I: IntoIterator<Item = Vec3<T>>>(items: I) -> Self {
    let mut b = Self::empty();
    items.into_iter().for_each(|p| b.expand_by_point(p));
    b
  }
}

impl<T: Scalar> FromIterator<Box3<T>> for Box3<T> {
  fn from_iter<I: IntoIterator<Item = Box3<T>>>(items: I) -> Self {
    let mut b = Self::empty();
    items.into_iter().for_each(|o| b.expand_by_box(&o));
    b
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_box_ignores_nothing() {
    let b = Box3::<f64>::empty();
    assert!(b.is_empty());
    let mut grown = b;
    grown.expand_by_point(vec3(1.0, 2.0, 3.0));
    assert!(!grown.is_empty());
    assert_eq!(grown.min, grown.max);
  }

  #[test]
  fn farthest_point_is_a_corner() {
    let b = Box3::new(vec3(0.0, 0.0, 0.0), vec3(2.0, 2.0, 2.0));
    assert_eq!(b.farthest_point_to(vec3(0.1, 0.1, 1.9)), vec3(2.0, 2.0, 0.0));
  }

  #[test]
  fn broadest_axis_picks_largest_extent() {
    let b = Box3::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 3.0, 2.0));
    assert_eq!(b.broadest_axis(), Axis3::Y);
  }
}
