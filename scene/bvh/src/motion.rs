use std::sync::Arc;

use parking_lot::RwLock;

use crate::transform::amplification;
use crate::*;

#[derive(Copy, Clone)]
struct MotionState {
  to_world_reference: Mat4,
  to_local_reference: Mat4,
  to_world_amplification: f64,
  to_local_amplification: f64,
  reference_time: f64,
  start_time: f64,
  end_time: f64,
  linear_velocity: Vec3,
  angular_velocity: Vec3,
}

impl MotionState {
  fn identity() -> Self {
    Self {
      to_world_reference: Mat4::identity(),
      to_local_reference: Mat4::identity(),
      to_world_amplification: 1.0,
      to_local_amplification: 1.0,
      reference_time: 0.0,
      start_time: 0.0,
      end_time: 0.0,
      linear_velocity: Vec3::zero(),
      angular_velocity: Vec3::zero(),
    }
  }
}

/// Rotation matrix for an angular velocity integrated over `dt`.
fn rotation_of(angular_velocity: Vec3, dt: f64) -> Mat4 {
  Mat4::rotation(angular_velocity, angular_velocity.length() * dt)
}

/// Group moving rigidly with constant linear and angular velocity around a
/// reference pose, valid over `[start_time, end_time]`. Derived poses are
/// evaluated at arbitrary query times; the cached bound covers the whole
/// validity window.
pub struct MotionTransform {
  pub(crate) base: NodeBase,
  pub(crate) children: ChildList,
  id: NodeId,
  state: RwLock<MotionState>,
}

impl MotionTransform {
  pub fn new() -> NodeRef {
    Arc::new(BvhNode::MotionTransform(MotionTransform {
      base: NodeBase::default(),
      children: ChildList::new(),
      id: NodeId::next(),
      state: RwLock::new(MotionState::identity()),
    }))
  }

  /// Same parameters and id, no children. Used when rebuilding pruned
  /// subtrees, where the hit id must keep naming the original source.
  pub(crate) fn clone_empty(&self) -> NodeRef {
    Arc::new(BvhNode::MotionTransform(MotionTransform {
      base: NodeBase::default(),
      children: ChildList::new(),
      id: self.id,
      state: RwLock::new(*self.state.read()),
    }))
  }

  pub fn id(&self) -> NodeId {
    self.id
  }

  /// The amplification factors are taken from the reference pose and reused
  /// for every query time, which is exact only while the motion stays
  /// rigid. Revisit before allowing scaling motion.
  pub fn set_to_world_reference(&self, to_world: Mat4) {
    let to_local = to_world.inverse().unwrap_or_else(Mat4::identity);
    let mut state = self.state.write();
    state.to_world_reference = to_world;
    state.to_local_reference = to_local;
    state.to_world_amplification = amplification(&to_world);
    state.to_local_amplification = amplification(&to_local);
    drop(state);
    self.base.invalidate();
  }

  pub fn set_reference_time(&self, t: f64) {
    self.state.write().reference_time = t;
    self.base.invalidate();
  }

  pub fn set_start_time(&self, t: f64) {
    self.state.write().start_time = t;
    self.base.invalidate();
  }

  pub fn set_end_time(&self, t: f64) {
    self.state.write().end_time = t;
    self.base.invalidate();
  }

  pub fn set_linear_velocity(&self, v: Vec3) {
    self.state.write().linear_velocity = v;
    self.base.invalidate();
  }

  pub fn set_angular_velocity(&self, v: Vec3) {
    self.state.write().angular_velocity = v;
    self.base.invalidate();
  }

  pub fn to_world_reference(&self) -> Mat4 {
    self.state.read().to_world_reference
  }

  pub fn reference_time(&self) -> f64 {
    self.state.read().reference_time
  }

  pub fn start_time(&self) -> f64 {
    self.state.read().start_time
  }

  pub fn end_time(&self) -> f64 {
    self.state.read().end_time
  }

  pub fn linear_velocity(&self) -> Vec3 {
    self.state.read().linear_velocity
  }

  pub fn angular_velocity(&self) -> Vec3 {
    self.state.read().angular_velocity
  }

  /// Reference pose composed outward with the motion integrated over
  /// `t - reference_time`.
  pub fn pose_to_world(&self, t: f64) -> Mat4 {
    let state = self.state.read();
    if t == state.reference_time {
      return state.to_world_reference;
    }
    let dt = t - state.reference_time;
    Mat4::translation(state.linear_velocity * dt)
      * rotation_of(state.angular_velocity, dt)
      * state.to_world_reference
  }

  /// Exact inverse of [`pose_to_world`]: the motion integrated over
  /// `reference_time - t`, composed inward in the opposite order.
  ///
  /// [`pose_to_world`]: MotionTransform::pose_to_world
  pub fn pose_to_local(&self, t: f64) -> Mat4 {
    let state = self.state.read();
    if t == state.reference_time {
      return state.to_local_reference;
    }
    let dt = state.reference_time - t;
    state.to_local_reference
      * rotation_of(state.angular_velocity, dt)
      * Mat4::translation(state.linear_velocity * dt)
  }

  /// Rigid body velocity of a point in the local frame.
  pub fn linear_velocity_at(&self, point: Vec3) -> Vec3 {
    let state = self.state.read();
    state.linear_velocity + state.angular_velocity.cross(point)
  }

  pub fn segment_to_local(&self, segment: LineSegment, t: f64) -> LineSegment {
    segment.apply_matrix(self.pose_to_local(t))
  }

  /// Maps with the exact pose at `t` but the reference pose amplification;
  /// exact for the rigid motion this node expresses.
  pub fn sphere_to_local(&self, sphere: Sphere, t: f64) -> Sphere {
    let center = self.pose_to_local(t) * sphere.center;
    Sphere::new(center, sphere.radius * self.state.read().to_local_amplification)
  }

  pub fn traverse<V: Visitor>(&self, visitor: &mut V) {
    self.children.traverse(visitor)
  }

  /// Conservative sweep over the validity window: the children's bound
  /// center tracked at both window ends, padded by the tracked radius.
  /// Traversal uses exact per time poses, never this bound.
  pub(crate) fn compute_bound(&self) -> Sphere {
    let local = self.children.union_bound();
    if local.is_empty() {
      return local;
    }
    let (start, end, ampl) = {
      let state = self.state.read();
      (state.start_time, state.end_time, state.to_world_amplification)
    };
    let center_start = self.pose_to_world(start) * local.center;
    let center_end = self.pose_to_world(end) * local.center;
    let center = (center_start + center_end) * 0.5;
    let radius = center_start.distance(center_end) * 0.5 + local.radius * ampl;
    Sphere::new(center, radius)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn motion_of(node: &NodeRef) -> &MotionTransform {
    node.as_motion_transform().unwrap()
  }

  fn assert_identity(m: Mat4) {
    let probe = [
      vec3(1.0, 0.0, 0.0),
      vec3(0.0, 1.0, 0.0),
      vec3(0.0, 0.0, 1.0),
      vec3(3.0, -2.0, 7.0),
    ];
    for p in probe {
      assert!((m * p - p).length() < 1e-9, "not identity at {}", p);
    }
  }

  #[test]
  fn pose_pair_is_mutually_inverse_at_arbitrary_times() {
    let node = MotionTransform::new();
    let m = motion_of(&node);
    m.set_to_world_reference(
      Mat4::translation(vec3(100.0, -20.0, 3.0)) * Mat4::rotation(vec3(0.0, 1.0, 0.0), 0.4),
    );
    m.set_reference_time(2.0);
    m.set_linear_velocity(vec3(3.0, 1.0, -2.0));
    m.set_angular_velocity(vec3(0.5, 0.2, -1.0));

    for t in [-10.0, 0.0, 2.0, 3.7, 42.0] {
      assert_identity(m.pose_to_world(t) * m.pose_to_local(t));
      assert_identity(m.pose_to_local(t) * m.pose_to_world(t));
    }
  }

  #[test]
  fn point_velocity_is_rigid_body_velocity() {
    let node = MotionTransform::new();
    let m = motion_of(&node);
    m.set_linear_velocity(vec3(0.0, 0.0, 1.0));
    m.set_angular_velocity(vec3(1.0, 0.0, 0.0));
    assert_eq!(m.linear_velocity_at(vec3(0.0, 0.0, -1.0)), vec3(0.0, 1.0, 1.0));
  }

  #[test]
  fn sweep_bound_covers_the_window() {
    let node = MotionTransform::new();
    let m = motion_of(&node);
    m.set_linear_velocity(vec3(10.0, 0.0, 0.0));
    m.set_start_time(0.0);
    m.set_end_time(1.0);

    let mut builder = StaticGeometryBuilder::new();
    builder.add_triangle(
      vec3(-1.0, -1.0, 0.0),
      vec3(1.0, -1.0, 0.0),
      vec3(-1.0, 1.0, 0.0),
    );
    node.add_child(&builder.build().unwrap());

    let bound = node.bound();
    // child corners at both window ends
    assert!(bound.contains_point(vec3(-1.0, -1.0, 0.0)));
    assert!(bound.contains_point(vec3(11.0, -1.0, 0.0)));
  }
}
