use crate::*;

/// Accumulates an axis aligned box over everything it visits. Dynamic
/// nodes contribute the cube circumscribing their bounding sphere, static
/// nodes contribute exact boxes.
pub struct BoundingBoxVisitor {
  bound: Box3,
}

impl Default for BoundingBoxVisitor {
  fn default() -> Self {
    Self::new()
  }
}

impl BoundingBoxVisitor {
  pub fn new() -> Self {
    Self {
      bound: Box3::empty(),
    }
  }

  pub fn bounding_box(&self) -> Box3 {
    self.bound
  }

  fn expand_by_node(&mut self, node: &NodeRef) {
    self.bound.expand_by_sphere(&node.bound());
  }
}

impl Visitor for BoundingBoxVisitor {
  fn group(&mut self, node: &NodeRef, _: &Group) {
    self.expand_by_node(node);
  }

  fn transform(&mut self, node: &NodeRef, _: &Transform) {
    self.expand_by_node(node);
  }

  fn motion_transform(&mut self, node: &NodeRef, _: &MotionTransform) {
    self.expand_by_node(node);
  }

  fn page_node(&mut self, node: &NodeRef, _: &PageNode) {
    self.expand_by_node(node);
  }

  fn line_geometry(&mut self, node: &NodeRef, _: &LineGeometry) {
    self.expand_by_node(node);
  }

  fn static_geometry(&mut self, node: &NodeRef, _: &StaticGeometry) {
    self.expand_by_node(node);
  }
}

impl StaticVisitor for BoundingBoxVisitor {
  fn static_binary(&mut self, _: &StaticRef, binary: &StaticBinary, _: &StaticData) {
    self.bound.expand_by_box(&binary.bound);
  }

  fn static_triangle(&mut self, _: &StaticRef, triangle: &StaticTriangle, data: &StaticData) {
    if let Some(triangle) = triangle.triangle(data) {
      self.bound.expand_by_box(&triangle.to_box3());
    }
  }
}
