use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::*;

/// Column major 4x4 matrix. The letter names the column, the digit the row,
/// so the `d` column carries the translation of an affine transform.
#[repr(C)]
#[rustfmt::skip]
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mat4<T = f64> {
  pub a1: T, pub a2: T, pub a3: T, pub a4: T,
  pub b1: T, pub b2: T, pub b3: T, pub b4: T,
  pub c1: T, pub c2: T, pub c3: T, pub c4: T,
  pub d1: T, pub d2: T, pub d3: T, pub d4: T,
}

impl<T: Scalar> Default for Mat4<T> {
  fn default() -> Self {
    Self::identity()
  }
}

impl<T> Mat4<T> {
  #[rustfmt::skip]
  pub fn new(
    a1: T, a2: T, a3: T, a4: T,
    b1: T, b2: T, b3: T, b4: T,
    c1: T, c2: T, c3: T, c4: T,
    d1: T, d2: T, d3: T, d4: T,
  ) -> Self {
    Self {
      a1, a2, a3, a4,
      b1, b2, b3, b4,
      c1, c2, c3, c4,
      d1, d2, d3, d4,
    }
  }
}

impl<T: Copy> Mat4<T> {
  #[rustfmt::skip]
  pub fn to_array(self) -> [T; 16] {
    [
      self.a1, self.a2, self.a3, self.a4,
      self.b1, self.b2, self.b3, self.b4,
      self.c1, self.c2, self.c3, self.c4,
      self.d1, self.d2, self.d3, self.d4,
    ]
  }

  #[rustfmt::skip]
  pub fn from_array(m: [T; 16]) -> Self {
    Self::new(
      m[0], m[1], m[2], m[3],
      m[4], m[5], m[6], m[7],
      m[8], m[9], m[10], m[11],
      m[12], m[13], m[14], m[15],
    )
  }
}

impl<T: Scalar> Mat4<T> {
  #[rustfmt::skip]
  pub fn identity() -> Self {
    let o = T::one();
    let z = T::zero();
    Self::new(
      o, z, z, z,
      z, o, z, z,
      z, z, o, z,
      z, z, z, o,
    )
  }

  pub fn translation(v: Vec3<T>) -> Self {
    let mut m = Self::identity();
    m.d1 = v.x;
    m.d2 = v.y;
    m.d3 = v.z;
    m
  }

  pub fn scale(x: T, y: T, z: T) -> Self {
    let mut m = Self::identity();
    m.a1 = x;
    m.b2 = y;
    m.c3 = z;
    m
  }

  /// Rotation about a normalized-on-entry arbitrary axis. A degenerate axis
  /// or zero angle yields the identity.
  #[rustfmt::skip]
  pub fn rotation(axis: Vec3<T>, angle: T) -> Self {
    let axis = axis.normalize();
    if axis == Vec3::zero() || angle == T::zero() {
      return Self::identity();
    }
    let (s, c) = angle.sin_cos();
    let t = T::one() - c;
    let Vec3 { x, y, z } = axis;
    let zr = T::zero();
    let o = T::one();
    Self::new(
      t * x * x + c,     t * x * y + s * z, t * x * z - s * y, zr,
      t * x * y - s * z, t * y * y + c,     t * y * z + s * x, zr,
      t * x * z + s * y, t * y * z - s * x, t * z * z + c,     zr,
      zr,                zr,                zr,                o,
    )
  }

  pub fn position(&self) -> Vec3<T> {
    Vec3::new(self.d1, self.d2, self.d3)
  }

  /// Transforms a direction, ignoring translation.
  #[inline]
  pub fn transform_vector(&self, v: Vec3<T>) -> Vec3<T> {
    Vec3::new(
      self.a1 * v.x + self.b1 * v.y + self.c1 * v.z,
      self.a2 * v.x + self.b2 * v.y + self.c2 * v.z,
      self.a3 * v.x + self.b3 * v.y + self.c3 * v.z,
    )
  }

  pub fn inverse(&self) -> Option<Self> {
    let m = self.to_array();
    let mut inv = [T::zero(); 16];

    inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
      + m[9] * m[7] * m[14]
      + m[13] * m[6] * m[11]
      - m[13] * m[7] * m[10];
    inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
      - m[8] * m[7] * m[14]
      - m[12] * m[6] * m[11]
      + m[12] * m[7] * m[10];
    inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
      + m[8] * m[7] * m[13]
      + m[12] * m[5] * m[11]
      - m[12] * m[7] * m[9];
    inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
      - m[8] * m[6] * m[13]
      - m[12] * m[5] * m[10]
      + m[12] * m[6] * m[9];
    inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
      - m[9] * m[3] * m[14]
      - m[13] * m[2] * m[11]
      + m[13] * m[3] * m[10];
    inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
      + m[8] * m[3] * m[14]
      + m[12] * m[2] * m[11]
      - m[12] * m[3] * m[10];
    inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
      - m[8] * m[3] * m[13]
      - m[12] * m[1] * m[11]
      + m[12] * m[3] * m[9];
    inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
      + m[8] * m[2] * m[13]
      + m[12] * m[1] * m[10]
      - m[12] * m[2] * m[9];
    inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
      + m[5] * m[3] * m[14]
      + m[13] * m[2] * m[7]
      - m[13] * m[3] * m[6];
    inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
      - m[4] * m[3] * m[14]
      - m[12] * m[2] * m[7]
      + m[12] * m[3] * m[6];
    inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
      + m[4] * m[3] * m[13]
      + m[12] * m[1] * m[7]
      - m[12] * m[3] * m[5];
    inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
      - m[4] * m[2] * m[13]
      - m[12] * m[1] * m[6]
      + m[12] * m[2] * m[5];
    inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
      - m[5] * m[3] * m[10]
      - m[9] * m[2] * m[7]
      + m[9] * m[3] * m[6];
    inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
      + m[4] * m[3] * m[10]
      + m[8] * m[2] * m[7]
      - m[8] * m[3] * m[6];
    inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
      - m[4] * m[3] * m[9]
      - m[8] * m[1] * m[7]
      + m[8] * m[3] * m[5];
    inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
      + m[4] * m[2] * m[9]
      + m[8] * m[1] * m[6]
      - m[8] * m[2] * m[5];

    let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
    if det == T::zero() {
      return None;
    }
    let inv_det = T::one() / det;
    for v in inv.iter_mut() {
      *v = *v * inv_det;
    }
    Some(Self::from_array(inv))
  }
}

/// Point transform through the full homogeneous matrix.
impl<T: Scalar> Mul<Vec3<T>> for Mat4<T> {
  type Output = Vec3<T>;

  #[inline]
  fn mul(self, v: Vec3<T>) -> Vec3<T> {
    let w = self.a4 * v.x + self.b4 * v.y + self.c4 * v.z + self.d4;
    Vec3::new(
      self.a1 * v.x + self.b1 * v.y + self.c1 * v.z + self.d1,
      self.a2 * v.x + self.b2 * v.y + self.c2 * v.z + self.d2,
      self.a3 * v.x + self.b3 * v.y + self.c3 * v.z + self.d3,
    ) / w
  }
}

impl<T: Scalar> Mul for Mat4<T> {
  type Output = Self;

  fn mul(self, r: Self) -> Self {
    #[rustfmt::skip]
    #[inline(always)]
    fn col<T: Scalar>(s: &Mat4<T>, x: T, y: T, z: T, w: T) -> [T; 4] {
      [
        s.a1 * x + s.b1 * y + s.c1 * z + s.d1 * w,
        s.a2 * x + s.b2 * y + s.c2 * z + s.d2 * w,
        s.a3 * x + s.b3 * y + s.c3 * z + s.d3 * w,
        s.a4 * x + s.b4 * y + s.c4 * z + s.d4 * w,
      ]
    }
    let a = col(&self, r.a1, r.a2, r.a3, r.a4);
    let b = col(&self, r.b1, r.b2, r.b3, r.b4);
    let c = col(&self, r.c1, r.c2, r.c3, r.c4);
    let d = col(&self, r.d1, r.d2, r.d3, r.d4);
    #[rustfmt::skip]
    return Self::new(
      a[0], a[1], a[2], a[3],
      b[0], b[1], b[2], b[3],
      c[0], c[1], c[2], c[3],
      d[0], d[1], d[2], d[3],
    );
  }
}
