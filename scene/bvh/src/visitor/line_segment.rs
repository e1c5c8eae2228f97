use std::sync::Arc;

use crate::*;

/// Finds the closest triangle hit along a world space segment, evaluated
/// at one instant for moving parts of the graph.
///
/// The segment itself is the best-distance accumulator: every confirmed
/// hit shortens it to start..hit, so deeper and later siblings can only
/// ever report closer intersections and pruning tightens as the query
/// proceeds.
pub struct LineSegmentVisitor {
  segment: LineSegment,
  time: f64,
  point: Vec3,
  normal: Vec3,
  linear_velocity: Vec3,
  angular_velocity: Vec3,
  material: Option<Arc<dyn Material>>,
  id: NodeId,
  found: bool,
}

impl LineSegmentVisitor {
  pub fn new(segment: LineSegment, time: f64) -> Self {
    Self {
      segment,
      time,
      point: Vec3::zero(),
      normal: Vec3::zero(),
      linear_velocity: Vec3::zero(),
      angular_velocity: Vec3::zero(),
      material: None,
      id: NodeId::NONE,
      found: false,
    }
  }

  pub fn empty(&self) -> bool {
    !self.found
  }

  /// World space hit point, meaningful only when not `empty`.
  pub fn point(&self) -> Vec3 {
    self.point
  }

  pub fn normal(&self) -> Vec3 {
    self.normal
  }

  /// World space velocity of the hit surface point.
  pub fn linear_velocity(&self) -> Vec3 {
    self.linear_velocity
  }

  pub fn angular_velocity(&self) -> Vec3 {
    self.angular_velocity
  }

  pub fn material(&self) -> Option<&Arc<dyn Material>> {
    self.material.as_ref()
  }

  /// Id of the innermost motion transform above the hit, `NONE` for
  /// stationary geometry.
  pub fn id(&self) -> NodeId {
    self.id
  }

  pub fn segment(&self) -> LineSegment {
    self.segment
  }

  pub fn time(&self) -> f64 {
    self.time
  }
}

impl Visitor for LineSegmentVisitor {
  fn group(&mut self, node: &NodeRef, group: &Group) {
    if !self.segment.intersect(&node.bound(), &()) {
      return;
    }
    group.traverse(self);
  }

  fn transform(&mut self, node: &NodeRef, transform: &Transform) {
    if !self.segment.intersect(&node.bound(), &()) {
      return;
    }
    let found = self.found;
    self.found = false;
    let segment = self.segment;
    self.segment = transform.segment_to_local(segment);

    transform.traverse(self);

    if self.found {
      self.linear_velocity = transform.vector_to_world(self.linear_velocity);
      self.angular_velocity = transform.vector_to_world(self.angular_velocity);
      self.normal = transform.vector_to_world(self.normal);
      self.point = transform.point_to_world(self.point);
      self.segment = LineSegment::new(segment.start, self.point);
    } else {
      self.segment = segment;
      self.found = found;
    }
  }

  fn motion_transform(&mut self, node: &NodeRef, transform: &MotionTransform) {
    if !self.segment.intersect(&node.bound(), &()) {
      return;
    }
    let found = self.found;
    self.found = false;
    let segment = self.segment;
    self.segment = transform.segment_to_local(segment, self.time);

    transform.traverse(self);

    if self.found {
      let to_world = transform.pose_to_world(self.time);
      // surface velocity of the local contact region, rotated to world
      self.linear_velocity += transform.linear_velocity_at(self.segment.start);
      self.angular_velocity += transform.angular_velocity();
      self.linear_velocity = to_world.transform_vector(self.linear_velocity);
      self.angular_velocity = to_world.transform_vector(self.angular_velocity);
      self.normal = to_world.transform_vector(self.normal);
      self.point = to_world * self.point;
      self.segment = LineSegment::new(segment.start, self.point);
      if self.id.is_none() {
        self.id = transform.id();
      }
    } else {
      self.segment = segment;
      self.found = found;
    }
  }

  fn page_node(&mut self, node: &NodeRef, page: &PageNode) {
    if !self.segment.intersect(&node.bound(), &()) {
      return;
    }
    page.traverse(self);
  }

  fn line_geometry(&mut self, _: &NodeRef, _: &LineGeometry) {}

  fn static_geometry(&mut self, node: &NodeRef, geometry: &StaticGeometry) {
    if !self.segment.intersect(&node.bound(), &()) {
      return;
    }
    geometry.traverse(self);
  }
}

impl StaticVisitor for LineSegmentVisitor {
  fn static_binary(&mut self, _: &StaticRef, binary: &StaticBinary, data: &StaticData) {
    if !self.segment.intersect(&binary.bound, &()) {
      return;
    }
    // the child around the segment start first, its hit shortens the
    // segment before the other child is tested
    binary.traverse_from_point(self, data, self.segment.start);
  }

  fn static_triangle(&mut self, _: &StaticRef, triangle: &StaticTriangle, data: &StaticData) {
    let Some(surface) = triangle.triangle(data) else {
      return;
    };
    let Some(point) = self.segment.intersect(&surface, &()) else {
      return;
    };
    self.segment = LineSegment::new(self.segment.start, point);
    self.point = point;
    self.normal = surface.normal();
    self.linear_velocity = Vec3::zero();
    self.angular_velocity = Vec3::zero();
    self.material = triangle.material(data).cloned();
    self.id = NodeId::NONE;
    self.found = true;
  }
}
