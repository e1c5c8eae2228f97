use std::fmt::Debug;
use std::{fmt, ops::*};

use serde::{Deserialize, Serialize};

use crate::*;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3<T = f64> {
  pub x: T,
  pub y: T,
  pub z: T,
}

pub fn vec3<T>(x: T, y: T, z: T) -> Vec3<T> {
  Vec3::new(x, y, z)
}

impl<T> Vec3<T> {
  #[inline(always)]
  pub fn new(x: T, y: T, z: T) -> Self {
    Self { x, y, z }
  }
}

impl<T: Copy> Vec3<T> {
  #[inline(always)]
  pub fn splat(v: T) -> Self {
    Self { x: v, y: v, z: v }
  }
}

impl<T: Scalar> Vec3<T> {
  #[inline(always)]
  pub fn zero() -> Self {
    Self::splat(T::zero())
  }

  #[inline]
  pub fn dot(self, other: Self) -> T {
    self.x * other.x + self.y * other.y + self.z * other.z
  }

  #[inline]
  pub fn cross(self, other: Self) -> Self {
    Self {
      x: self.y * other.z - self.z * other.y,
      y: self.z * other.x - self.x * other.z,
      z: self.x * other.y - self.y * other.x,
    }
  }

  #[inline]
  pub fn length2(self) -> T {
    self.dot(self)
  }

  #[inline]
  pub fn length(self) -> T {
    self.length2().sqrt()
  }

  #[inline]
  pub fn distance2(self, other: Self) -> T {
    (self - other).length2()
  }

  #[inline]
  pub fn distance(self, other: Self) -> T {
    (self - other).length()
  }

  /// Returns the zero vector for a zero length input.
  #[inline]
  pub fn normalize(self) -> Self {
    let l2 = self.length2();
    if l2 == T::zero() {
      return Self::zero();
    }
    self / l2.sqrt()
  }

  #[inline]
  pub fn min(self, other: Self) -> Self {
    Self {
      x: self.x.min(other.x),
      y: self.y.min(other.y),
      z: self.z.min(other.z),
    }
  }

  #[inline]
  pub fn max(self, other: Self) -> Self {
    Self {
      x: self.x.max(other.x),
      y: self.y.max(other.y),
      z: self.z.max(other.z),
    }
  }
}

impl<T: Add<T, Output = T>> Add for Vec3<T> {
  type Output = Self;
  #[inline]
  fn add(self, other: Self) -> Self {
    Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
  }
}

impl<T: Sub<T, Output = T>> Sub for Vec3<T> {
  type Output = Self;
  #[inline]
  fn sub(self, other: Self) -> Self {
    Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
  }
}

impl<T: Neg<Output = T>> Neg for Vec3<T> {
  type Output = Self;
  #[inline]
  fn neg(self) -> Self {
    Self::new(-self.x, -self.y, -self.z)
  }
}

impl<T: Mul<T, Output = T> + Copy> Mul<T> for Vec3<T> {
  type Output = Self;
  #[inline]
  fn mul(self, s: T) -> Self {
    Self::new(self.x * s, self.y * s, self.z * s)
  }
}

impl<T: Div<T, Output = T> + Copy> Div<T> for Vec3<T> {
  type Output = Self;
  #[inline]
  fn div(self, s: T) -> Self {
    Self::new(self.x / s, self.y / s, self.z / s)
  }
}

impl<T: Add<T, Output = T> + Copy> AddAssign for Vec3<T> {
  #[inline]
  fn add_assign(&mut self, other: Self) {
    *self = *self + other;
  }
}

impl<T: Sub<T, Output = T> + Copy> SubAssign for Vec3<T> {
  #[inline]
  fn sub_assign(&mut self, other: Self) {
    *self = *self - other;
  }
}

impl<T> fmt::Display for Vec3<T>
where
  T: Debug,
{
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "({:?}, {:?}, {:?})", self.x, self.y, self.z)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cross_follows_right_hand_rule() {
    let x = vec3(1.0, 0.0, 0.0);
    let y = vec3(0.0, 1.0, 0.0);
    assert_eq!(x.cross(y), vec3(0.0, 0.0, 1.0));
    assert_eq!(y.cross(x), vec3(0.0, 0.0, -1.0));
  }

  #[test]
  fn normalize_of_zero_stays_zero() {
    assert_eq!(Vec3::<f64>::zero().normalize(), Vec3::zero());
  }
}
