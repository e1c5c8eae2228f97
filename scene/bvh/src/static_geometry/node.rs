use std::sync::Arc;

use crate::*;

pub type StaticRef = Arc<StaticNode>;

/// The closed set of static subtree node kinds. Leaves only resolve their
/// geometry together with the data pool, hence the distinct dispatch
/// surface carrying `&StaticData`.
pub enum StaticNode {
  Binary(StaticBinary),
  Triangle(StaticTriangle),
}

impl StaticNode {
  pub fn accept<V: StaticVisitor>(self: &Arc<Self>, visitor: &mut V, data: &StaticData) {
    match &**self {
      StaticNode::Binary(n) => visitor.static_binary(self, n, data),
      StaticNode::Triangle(n) => visitor.static_triangle(self, n, data),
    }
  }

  pub fn bounding_box(&self, data: &StaticData) -> Box3 {
    match self {
      StaticNode::Binary(n) => n.bound,
      StaticNode::Triangle(n) => n
        .triangle(data)
        .map(|t| t.to_box3())
        .unwrap_or_else(Box3::empty),
    }
  }
}

/// Immutable interior node of a static subtree.
pub struct StaticBinary {
  pub split_axis: Axis3,
  pub bound: Box3,
  left: StaticRef,
  right: StaticRef,
}

impl StaticBinary {
  pub fn new(split_axis: Axis3, left: StaticRef, right: StaticRef, data: &StaticData) -> Self {
    let mut bound = left.bounding_box(data);
    bound.expand_by_box(&right.bounding_box(data));
    Self {
      split_axis,
      bound,
      left,
      right,
    }
  }

  pub fn left(&self) -> &StaticRef {
    &self.left
  }

  pub fn right(&self) -> &StaticRef {
    &self.right
  }

  /// Unconditional traversal of both children.
  pub fn traverse<V: StaticVisitor>(&self, visitor: &mut V, data: &StaticData) {
    self.left.accept(visitor, data);
    self.right.accept(visitor, data);
  }

  /// Visits the child whose split half-space contains `point` first, so
  /// point and ray queries can prune the second child against an already
  /// tightened search bound.
  pub fn traverse_from_point<V: StaticVisitor>(
    &self,
    visitor: &mut V,
    data: &StaticData,
    point: Vec3,
  ) {
    let mid = self.split_axis.select(self.bound.center());
    if self.split_axis.select(point) <= mid {
      self.left.accept(visitor, data);
      self.right.accept(visitor, data);
    } else {
      self.right.accept(visitor, data);
      self.left.accept(visitor, data);
    }
  }
}

/// Leaf referencing three pool vertices and one pool material.
#[derive(Debug, Copy, Clone)]
pub struct StaticTriangle {
  pub indices: [u32; 3],
  pub material: u32,
}

impl StaticTriangle {
  /// `None` when any vertex index is out of range.
  pub fn triangle(&self, data: &StaticData) -> Option<Triangle> {
    Some(Triangle::new(
      data.vertex(self.indices[0])?,
      data.vertex(self.indices[1])?,
      data.vertex(self.indices[2])?,
    ))
  }

  pub fn material<'a>(&self, data: &'a StaticData) -> Option<&'a Arc<dyn Material>> {
    data.material(self.material)
  }
}
