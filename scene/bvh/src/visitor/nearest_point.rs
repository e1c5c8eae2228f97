use crate::*;

/// Finds the point of the graph closest to the search sphere center, among
/// everything within its radius.
///
/// The sphere shrinks to the best distance found so far, mirroring how
/// [`LineSegmentVisitor`] shortens its segment.
pub struct NearestPointVisitor {
  sphere: Sphere,
  time: f64,
  point: Vec3,
  found: bool,
}

impl NearestPointVisitor {
  pub fn new(sphere: Sphere, time: f64) -> Self {
    Self {
      sphere,
      time,
      point: Vec3::zero(),
      found: false,
    }
  }

  pub fn empty(&self) -> bool {
    !self.found
  }

  /// World space nearest point, meaningful only when not `empty`.
  pub fn point(&self) -> Vec3 {
    self.point
  }

  /// Distance of the best point found, the search radius while `empty`.
  pub fn distance(&self) -> f64 {
    self.sphere.radius
  }

  pub fn time(&self) -> f64 {
    self.time
  }
}

impl Visitor for NearestPointVisitor {
  fn group(&mut self, node: &NodeRef, group: &Group) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    group.traverse(self);
  }

  fn transform(&mut self, node: &NodeRef, transform: &Transform) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    let found = self.found;
    self.found = false;
    let sphere = self.sphere;
    self.sphere = transform.sphere_to_local(sphere);

    transform.traverse(self);

    if self.found {
      self.point = transform.point_to_world(self.point);
      self.sphere = Sphere::new(sphere.center, self.point.distance(sphere.center));
    } else {
      self.sphere = sphere;
      self.found = found;
    }
  }

  fn motion_transform(&mut self, node: &NodeRef, transform: &MotionTransform) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    let found = self.found;
    self.found = false;
    let sphere = self.sphere;
    self.sphere = transform.sphere_to_local(sphere, self.time);

    transform.traverse(self);

    if self.found {
      self.point = transform.pose_to_world(self.time) * self.point;
      self.sphere = Sphere::new(sphere.center, self.point.distance(sphere.center));
    } else {
      self.sphere = sphere;
      self.found = found;
    }
  }

  fn page_node(&mut self, node: &NodeRef, page: &PageNode) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    page.traverse(self);
  }

  fn line_geometry(&mut self, _: &NodeRef, _: &LineGeometry) {}

  fn static_geometry(&mut self, node: &NodeRef, geometry: &StaticGeometry) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    geometry.traverse(self);
  }
}

impl StaticVisitor for NearestPointVisitor {
  fn static_binary(&mut self, _: &StaticRef, binary: &StaticBinary, data: &StaticData) {
    if !self.sphere.intersect(&binary.bound, &()) {
      return;
    }
    // the closer half-space first, so its result shrinks the sphere before
    // the other side is tested
    binary.traverse_from_point(self, data, self.sphere.center);
  }

  fn static_triangle(&mut self, _: &StaticRef, triangle: &StaticTriangle, data: &StaticData) {
    let Some(surface) = triangle.triangle(data) else {
      return;
    };
    let point = surface.closest_point_to(self.sphere.center);
    let distance = point.distance(self.sphere.center);
    if distance > self.sphere.radius {
      return;
    }
    self.point = point;
    self.sphere.radius = distance;
    self.found = true;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn unit_triangle() -> NodeRef {
    let mut builder = StaticGeometryBuilder::new();
    builder.add_triangle(vec3(-1., -1., 0.), vec3(1., -1., 0.), vec3(-1., 1., 0.));
    builder.build().unwrap()
  }

  #[test]
  fn finds_the_closest_surface_point() {
    let leaf = unit_triangle();
    let mut visitor = NearestPointVisitor::new(Sphere::new(vec3(0., 0., -1.), 2.0), 0.0);
    leaf.accept(&mut visitor);
    assert!(!visitor.empty());
    assert!((visitor.point() - vec3(0., 0., 0.)).length() < 1e-12);
    assert!((visitor.distance() - 1.0).abs() < 1e-12);
  }

  #[test]
  fn out_of_radius_geometry_is_ignored() {
    let leaf = unit_triangle();
    let mut visitor = NearestPointVisitor::new(Sphere::new(vec3(0., 0., -5.), 2.0), 0.0);
    leaf.accept(&mut visitor);
    assert!(visitor.empty());
  }

  #[test]
  fn closer_geometry_shrinks_the_search() {
    let group = Group::new();
    let offset = Transform::with_to_world(Mat4::translation(vec3(0., 0., -0.5)));
    offset.add_child(&unit_triangle());
    group.add_child(&offset);
    group.add_child(&unit_triangle());

    let mut visitor = NearestPointVisitor::new(Sphere::new(vec3(0., 0., -0.4), 2.0), 0.0);
    group.accept(&mut visitor);
    assert!((visitor.point() - vec3(0., 0., -0.5)).length() < 1e-12);
    assert!((visitor.distance() - 0.1).abs() < 1e-12);
  }
}
