use serde::{Deserialize, Serialize};
use simspace_algebra::*;

use crate::*;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle<T = f64> {
  pub a: Vec3<T>,
  pub b: Vec3<T>,
  pub c: Vec3<T>,
}

impl<T: Scalar> Triangle<T> {
  pub fn new(a: Vec3<T>, b: Vec3<T>, c: Vec3<T>) -> Self {
    Self { a, b, c }
  }

  pub fn normal(&self) -> Vec3<T> {
    (self.b - self.a).cross(self.c - self.a).normalize()
  }

  pub fn to_box3(&self) -> Box3<T> {
    [self.a, self.b, self.c].into_iter().collect()
  }

  /// Closest point on the triangle to `point`, by Voronoi region
  /// classification.
  pub fn closest_point_to(&self, point: Vec3<T>) -> Vec3<T> {
    let ab = self.b - self.a;
    let ac = self.c - self.a;
    let ap = point - self.a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= T::zero() && d2 <= T::zero() {
      return self.a;
    }

    let bp = point - self.b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= T::zero() && d4 <= d3 {
      return self.b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= T::zero() && d1 >= T::zero() && d3 <= T::zero() {
      let v = d1 / (d1 - d3);
      return self.a + ab * v;
    }

    let cp = point - self.c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= T::zero() && d5 <= d6 {
      return self.c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= T::zero() && d2 >= T::zero() && d6 <= T::zero() {
      let w = d2 / (d2 - d6);
      return self.a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= T::zero() && (d4 - d3) >= T::zero() && (d5 - d6) >= T::zero() {
      let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
      return self.b + (self.c - self.b) * w;
    }

    let denom = T::one() / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    self.a + ab * v + ac * w
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tri() -> Triangle<f64> {
    Triangle::new(
      vec3(0.0, 0.0, 0.0),
      vec3(2.0, 0.0, 0.0),
      vec3(0.0, 2.0, 0.0),
    )
  }

  #[test]
  fn closest_point_inside_projects_onto_plane() {
    let p = tri().closest_point_to(vec3(0.5, 0.5, 3.0));
    assert_eq!(p, vec3(0.5, 0.5, 0.0));
  }

  #[test]
  fn closest_point_clamps_to_vertices_and_edges() {
    assert_eq!(
      tri().closest_point_to(vec3(-1.0, -1.0, 0.0)),
      vec3(0.0, 0.0, 0.0)
    );
    assert_eq!(
      tri().closest_point_to(vec3(1.0, -5.0, 0.0)),
      vec3(1.0, 0.0, 0.0)
    );
  }
}
