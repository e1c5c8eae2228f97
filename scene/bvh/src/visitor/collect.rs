use std::sync::Arc;

use crate::*;

/// Extracts the minimal subtree whose geometry intersects a sphere.
///
/// Transforms above surviving geometry are rebuilt with their parameters
/// (motion transforms keep their id), empty branches vanish, single child
/// composites collapse to the child and page nodes become plain groups, so
/// the result is a self contained still frame independent of the pager.
pub struct SubTreeCollector {
  sphere: Sphere,
  nodes: Vec<NodeRef>,
  static_node: Option<StaticRef>,
}

impl SubTreeCollector {
  pub fn new(sphere: Sphere) -> Self {
    Self {
      sphere,
      nodes: Vec::new(),
      static_node: None,
    }
  }

  /// The collected subtree: `None` when nothing intersected, the node
  /// itself for a single survivor, otherwise a fresh group.
  pub fn into_node(mut self) -> Option<NodeRef> {
    match self.nodes.len() {
      0 => None,
      1 => self.nodes.pop(),
      _ => {
        let group = Group::new();
        for child in &self.nodes {
          group.add_child(child);
        }
        Some(group)
      }
    }
  }

  /// Runs `traverse` against a fresh accumulator and hands the collected
  /// children back, with the caller's accumulator restored.
  fn collect_children(&mut self, traverse: impl FnOnce(&mut Self)) -> Vec<NodeRef> {
    let parent = std::mem::take(&mut self.nodes);
    traverse(self);
    std::mem::replace(&mut self.nodes, parent)
  }

  fn append_collapsed(&mut self, collected: Vec<NodeRef>) {
    match collected.len() {
      0 => {}
      1 => self.nodes.extend(collected),
      _ => {
        let group = Group::new();
        for child in &collected {
          group.add_child(child);
        }
        self.nodes.push(group);
      }
    }
  }
}

impl Visitor for SubTreeCollector {
  fn group(&mut self, node: &NodeRef, group: &Group) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    let collected = self.collect_children(|v| group.traverse(v));
    self.append_collapsed(collected);
  }

  fn transform(&mut self, node: &NodeRef, transform: &Transform) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    let sphere = self.sphere;
    self.sphere = transform.sphere_to_local(sphere);
    let collected = self.collect_children(|v| transform.traverse(v));
    self.sphere = sphere;

    if collected.is_empty() {
      return;
    }
    let rebuilt = transform.clone_empty();
    for child in &collected {
      rebuilt.add_child(child);
    }
    self.nodes.push(rebuilt);
  }

  fn motion_transform(&mut self, node: &NodeRef, transform: &MotionTransform) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    let sphere = self.sphere;
    // local selection at the reference pose; the sweep bound above already
    // admitted the whole validity window
    self.sphere = transform.sphere_to_local(sphere, transform.reference_time());
    let collected = self.collect_children(|v| transform.traverse(v));
    self.sphere = sphere;

    if collected.is_empty() {
      return;
    }
    let rebuilt = transform.clone_empty();
    for child in &collected {
      rebuilt.add_child(child);
    }
    self.nodes.push(rebuilt);
  }

  fn page_node(&mut self, node: &NodeRef, page: &PageNode) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    let collected = self.collect_children(|v| page.traverse(v));
    self.append_collapsed(collected);
  }

  fn line_geometry(&mut self, node: &NodeRef, _: &LineGeometry) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    self.nodes.push(node.clone());
  }

  fn static_geometry(&mut self, node: &NodeRef, geometry: &StaticGeometry) {
    if !self.sphere.intersect(&node.bound(), &()) {
      return;
    }
    geometry.traverse(self);
    if let Some(root) = self.static_node.take() {
      self.nodes.push(StaticGeometry::new(root, geometry.data().clone()));
    }
  }
}

impl StaticVisitor for SubTreeCollector {
  fn static_binary(&mut self, node: &StaticRef, binary: &StaticBinary, data: &StaticData) {
    if !self.sphere.intersect(&binary.bound, &()) {
      return;
    }
    if self.sphere.contains_box3(&binary.bound) {
      self.static_node = Some(node.clone());
      return;
    }

    binary.left().accept(self, data);
    let left = self.static_node.take();
    binary.right().accept(self, data);
    let right = self.static_node.take();

    self.static_node = match (left, right) {
      (Some(left), Some(right)) => Some(Arc::new(StaticNode::Binary(StaticBinary::new(
        binary.split_axis,
        left,
        right,
        data,
      )))),
      (side, None) | (None, side) => side,
    };
  }

  fn static_triangle(&mut self, node: &StaticRef, triangle: &StaticTriangle, data: &StaticData) {
    let Some(surface) = triangle.triangle(data) else {
      return;
    };
    if self.sphere.intersect(&surface, &()) {
      self.static_node = Some(node.clone());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn triangle_at(builder: &mut StaticGeometryBuilder, x: f64) {
    builder.add_triangle(
      vec3(x - 1., -1., 0.),
      vec3(x + 1., -1., 0.),
      vec3(x - 1., 1., 0.),
    );
  }

  #[test]
  fn collects_only_intersecting_triangles() {
    let mut builder = StaticGeometryBuilder::new();
    triangle_at(&mut builder, 0.0);
    triangle_at(&mut builder, 100.0);
    let leaf = builder.build().unwrap();

    let mut collector = SubTreeCollector::new(Sphere::new(Vec3::zero(), 2.0));
    leaf.accept(&mut collector);
    let collected = collector.into_node().unwrap();

    let mut probe = LineSegmentVisitor::new(
      LineSegment::new(vec3(0., 0., -1.), vec3(0., 0., 1.)),
      0.0,
    );
    collected.accept(&mut probe);
    assert!(!probe.empty());

    let mut probe = LineSegmentVisitor::new(
      LineSegment::new(vec3(100., 0., -1.), vec3(100., 0., 1.)),
      0.0,
    );
    collected.accept(&mut probe);
    assert!(probe.empty());
  }

  #[test]
  fn empty_intersection_collects_nothing() {
    let mut builder = StaticGeometryBuilder::new();
    triangle_at(&mut builder, 0.0);
    let leaf = builder.build().unwrap();

    let mut collector = SubTreeCollector::new(Sphere::new(vec3(50., 50., 50.), 1.0));
    leaf.accept(&mut collector);
    assert!(collector.into_node().is_none());
  }

  #[test]
  fn transforms_above_survivors_are_preserved() {
    let mut builder = StaticGeometryBuilder::new();
    triangle_at(&mut builder, 0.0);
    let shifted = Transform::with_to_world(Mat4::translation(vec3(10., 0., 0.)));
    shifted.add_child(&builder.build().unwrap());

    let mut collector = SubTreeCollector::new(Sphere::new(vec3(10., 0., 0.), 2.0));
    shifted.accept(&mut collector);
    let collected = collector.into_node().unwrap();
    assert!(collected.as_transform().is_some());

    let mut probe = LineSegmentVisitor::new(
      LineSegment::new(vec3(10., 0., -1.), vec3(10., 0., 1.)),
      0.0,
    );
    collected.accept(&mut probe);
    assert!((probe.point() - vec3(10., 0., 0.)).length() < 1e-12);
  }

  #[test]
  fn motion_transform_keeps_its_id() {
    let mut builder = StaticGeometryBuilder::new();
    triangle_at(&mut builder, 0.0);
    let moving = MotionTransform::new();
    moving.add_child(&builder.build().unwrap());
    let id = moving.as_motion_transform().unwrap().id();

    let mut collector = SubTreeCollector::new(Sphere::new(Vec3::zero(), 2.0));
    moving.accept(&mut collector);
    let collected = collector.into_node().unwrap();
    assert_eq!(collected.as_motion_transform().unwrap().id(), id);
  }

  #[test]
  fn fully_contained_static_subtrees_are_kept_whole() {
    let mut builder = StaticGeometryBuilder::new();
    triangle_at(&mut builder, 0.0);
    triangle_at(&mut builder, 3.0);
    let leaf = builder.build().unwrap();

    let mut collector = SubTreeCollector::new(Sphere::new(vec3(1.5, 0., 0.), 100.0));
    leaf.accept(&mut collector);
    let collected = collector.into_node().unwrap();
    let geometry = collected.as_static_geometry().unwrap();
    assert!(Arc::ptr_eq(
      geometry.root(),
      leaf.as_static_geometry().unwrap().root()
    ));
  }
}
