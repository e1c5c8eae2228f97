use simspace_algebra::*;

use crate::*;

impl<T: Scalar> IntersectAble<Sphere<T>, bool> for LineSegment<T> {
  fn intersect(&self, sphere: &Sphere<T>, _: &()) -> bool {
    !sphere.is_empty() && self.distance2_to_point(sphere.center) <= sphere.radius * sphere.radius
  }
}

impl<T: Scalar> IntersectAble<Box3<T>, bool> for LineSegment<T> {
  /// Slab test restricted to the [0, 1] segment parameter range.
  fn intersect(&self, b: &Box3<T>, _: &()) -> bool {
    if b.is_empty() {
      return false;
    }
    let dir = self.direction();
    let mut t_min = T::zero();
    let mut t_max = T::one();

    let mut axis = |start: T, d: T, min: T, max: T| -> bool {
      if d == T::zero() {
        return min <= start && start <= max;
      }
      let mut t1 = (min - start) / d;
      let mut t2 = (max - start) / d;
      if t1 > t2 {
        std::mem::swap(&mut t1, &mut t2);
      }
      t_min = t_min.max(t1);
      t_max = t_max.min(t2);
      t_min <= t_max
    };

    axis(self.start.x, dir.x, b.min.x, b.max.x)
      && axis(self.start.y, dir.y, b.min.y, b.max.y)
      && axis(self.start.z, dir.z, b.min.z, b.max.z)
  }
}

impl<T: Scalar> IntersectAble<Sphere<T>, bool> for Sphere<T> {
  fn intersect(&self, other: &Sphere<T>, _: &()) -> bool {
    if self.is_empty() || other.is_empty() {
      return false;
    }
    let r = self.radius + other.radius;
    self.center.distance2(other.center) <= r * r
  }
}

impl<T: Scalar> IntersectAble<Box3<T>, bool> for Sphere<T> {
  fn intersect(&self, b: &Box3<T>, _: &()) -> bool {
    !self.is_empty()
      && !b.is_empty()
      && b.distance2_to_point(self.center) <= self.radius * self.radius
  }
}

impl<T: Scalar> IntersectAble<Triangle<T>, bool> for Sphere<T> {
  fn intersect(&self, tri: &Triangle<T>, _: &()) -> bool {
    !self.is_empty()
      && tri.closest_point_to(self.center).distance2(self.center) <= self.radius * self.radius
  }
}

/// Segment against triangle, returning the hit point.
/// Moller-Trumbore restricted to the segment parameter range.
impl<T: Scalar> IntersectAble<Triangle<T>, Option<Vec3<T>>> for LineSegment<T> {
  fn intersect(&self, tri: &Triangle<T>, _: &()) -> Option<Vec3<T>> {
    let dir = self.direction();
    let e1 = tri.b - tri.a;
    let e2 = tri.c - tri.a;

    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < T::epsilon() {
      // parallel or degenerate
      return None;
    }
    let inv_det = T::one() / det;

    let tv = self.start - tri.a;
    let u = tv.dot(p) * inv_det;
    if u < T::zero() || u > T::one() {
      return None;
    }

    let q = tv.cross(e1);
    let v = dir.dot(q) * inv_det;
    if v < T::zero() || u + v > T::one() {
      return None;
    }

    let t = e2.dot(q) * inv_det;
    if t < T::zero() || t > T::one() {
      return None;
    }
    Some(self.start + dir * t)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn segment_hits_sphere_it_passes_through() {
    let seg = LineSegment::new(vec3(-10.0, 0.5, 0.0), vec3(10.0, 0.5, 0.0));
    assert!(seg.intersect(&Sphere::new(Vec3::zero(), 1.0), &()));
    assert!(!seg.intersect(&Sphere::new(vec3(0.0, 5.0, 0.0), 1.0), &()));
    assert!(!seg.intersect(&Sphere::empty(), &()));
  }

  #[test]
  fn short_segment_misses_distant_sphere() {
    let seg = LineSegment::new(vec3(-10.0, 0.0, 0.0), vec3(-5.0, 0.0, 0.0));
    assert!(!seg.intersect(&Sphere::new(Vec3::zero(), 1.0), &()));
  }

  #[test]
  fn segment_box_slab_test() {
    let b = Box3::new(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
    let through = LineSegment::new(vec3(-2.0, 0.0, 0.0), vec3(2.0, 0.0, 0.0));
    let beside = LineSegment::new(vec3(-2.0, 3.0, 0.0), vec3(2.0, 3.0, 0.0));
    let short = LineSegment::new(vec3(-4.0, 0.0, 0.0), vec3(-2.0, 0.0, 0.0));
    let inside = LineSegment::new(vec3(-0.5, 0.0, 0.0), vec3(0.5, 0.0, 0.0));
    assert!(through.intersect(&b, &()));
    assert!(!beside.intersect(&b, &()));
    assert!(!short.intersect(&b, &()));
    assert!(inside.intersect(&b, &()));
  }

  #[test]
  fn segment_triangle_hit_point() {
    let tri = Triangle::new(
      vec3(-1.0, -1.0, 0.0),
      vec3(1.0, -1.0, 0.0),
      vec3(-1.0, 1.0, 0.0),
    );
    let seg = LineSegment::new(vec3(0.0, 0.0, -1.0), vec3(0.0, 0.0, 1.0));
    assert_eq!(seg.intersect(&tri, &()), Some(vec3(0.0, 0.0, 0.0)));

    let miss = LineSegment::new(vec3(2.0, 2.0, -1.0), vec3(2.0, 2.0, 1.0));
    assert_eq!(miss.intersect(&tri, &()), None);

    let stops_short = LineSegment::new(vec3(0.0, 0.0, -3.0), vec3(0.0, 0.0, -1.0));
    assert_eq!(stops_short.intersect(&tri, &()), None);
  }
}
