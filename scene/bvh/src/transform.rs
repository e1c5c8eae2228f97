use std::sync::Arc;

use parking_lot::RwLock;

use crate::*;

#[derive(Copy, Clone)]
pub(crate) struct TransformPose {
  to_world: Mat4,
  to_local: Mat4,
  to_world_amplification: f64,
  to_local_amplification: f64,
}

impl TransformPose {
  fn identity() -> Self {
    Self {
      to_world: Mat4::identity(),
      to_local: Mat4::identity(),
      to_world_amplification: 1.0,
      to_local_amplification: 1.0,
    }
  }
}

/// Upper bound on the length distortion of the linear part: the longest
/// transformed unit basis vector. Scaling a sphere radius by it is
/// conservative for any affine map and exact for similarity transforms.
pub(crate) fn amplification(m: &Mat4) -> f64 {
  let x = m.transform_vector(vec3(1.0, 0.0, 0.0)).length();
  let y = m.transform_vector(vec3(0.0, 1.0, 0.0)).length();
  let z = m.transform_vector(vec3(0.0, 0.0, 1.0)).length();
  x.max(y).max(z)
}

/// Static affine transform. Setting either matrix derives the other by
/// inversion (falling back to the identity for a singular input) and
/// refreshes both amplification factors.
pub struct Transform {
  pub(crate) base: NodeBase,
  pub(crate) children: ChildList,
  pose: RwLock<TransformPose>,
}

impl Transform {
  pub fn new() -> NodeRef {
    Arc::new(BvhNode::Transform(Transform {
      base: NodeBase::default(),
      children: ChildList::new(),
      pose: RwLock::new(TransformPose::identity()),
    }))
  }

  pub fn with_to_world(to_world: Mat4) -> NodeRef {
    let node = Self::new();
    if let BvhNode::Transform(t) = &*node {
      t.set_to_world(to_world);
    }
    node
  }

  /// Same matrices, no children. Used when rebuilding pruned subtrees.
  pub(crate) fn clone_empty(&self) -> NodeRef {
    let node = Self::new();
    if let BvhNode::Transform(t) = &*node {
      *t.pose.write() = *self.pose.read();
    }
    node
  }

  pub fn set_to_world(&self, to_world: Mat4) {
    let to_local = to_world.inverse().unwrap_or_else(Mat4::identity);
    self.set_pose(to_world, to_local);
  }

  pub fn set_to_local(&self, to_local: Mat4) {
    let to_world = to_local.inverse().unwrap_or_else(Mat4::identity);
    self.set_pose(to_world, to_local);
  }

  fn set_pose(&self, to_world: Mat4, to_local: Mat4) {
    *self.pose.write() = TransformPose {
      to_world,
      to_local,
      to_world_amplification: amplification(&to_world),
      to_local_amplification: amplification(&to_local),
    };
    self.base.invalidate();
  }

  pub fn to_world(&self) -> Mat4 {
    self.pose.read().to_world
  }

  pub fn to_local(&self) -> Mat4 {
    self.pose.read().to_local
  }

  pub fn to_world_amplification(&self) -> f64 {
    self.pose.read().to_world_amplification
  }

  pub fn to_local_amplification(&self) -> f64 {
    self.pose.read().to_local_amplification
  }

  pub fn point_to_world(&self, p: Vec3) -> Vec3 {
    self.pose.read().to_world * p
  }

  pub fn point_to_local(&self, p: Vec3) -> Vec3 {
    self.pose.read().to_local * p
  }

  pub fn vector_to_world(&self, v: Vec3) -> Vec3 {
    self.pose.read().to_world.transform_vector(v)
  }

  pub fn vector_to_local(&self, v: Vec3) -> Vec3 {
    self.pose.read().to_local.transform_vector(v)
  }

  pub fn segment_to_local(&self, segment: LineSegment) -> LineSegment {
    segment.apply_matrix(self.pose.read().to_local)
  }

  pub fn sphere_to_local(&self, sphere: Sphere) -> Sphere {
    let pose = self.pose.read();
    Sphere::new(
      pose.to_local * sphere.center,
      sphere.radius * pose.to_local_amplification,
    )
  }

  pub fn sphere_to_world(&self, sphere: Sphere) -> Sphere {
    let pose = self.pose.read();
    Sphere::new(
      pose.to_world * sphere.center,
      sphere.radius * pose.to_world_amplification,
    )
  }

  pub fn traverse<V: Visitor>(&self, visitor: &mut V) {
    self.children.traverse(visitor)
  }

  pub(crate) fn compute_bound(&self) -> Sphere {
    let local = self.children.union_bound();
    if local.is_empty() {
      return local;
    }
    self.sphere_to_world(local)
  }
}
