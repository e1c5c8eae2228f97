use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::*;

pub type NodeRef = Arc<BvhNode>;

/// Process wide unique node id, used to tag motion transforms so a query
/// hit can name its moving source. Zero means "none".
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
  pub const NONE: Self = NodeId(0);

  pub fn next() -> Self {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    NodeId(COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn is_none(&self) -> bool {
    self.0 == 0
  }
}

impl Default for NodeId {
  fn default() -> Self {
    Self::NONE
  }
}

/// Shared bookkeeping of every dynamic node: the cached bounding sphere
/// (`None` marks it dirty) and the non owning back references used solely
/// to propagate invalidation, never for traversal or ownership.
pub struct NodeBase {
  bound: RwLock<Option<Sphere>>,
  parents: RwLock<SmallVec<[Weak<BvhNode>; 2]>>,
}

impl Default for NodeBase {
  fn default() -> Self {
    Self {
      bound: RwLock::new(None),
      parents: RwLock::new(SmallVec::new()),
    }
  }
}

impl NodeBase {
  /// Marks the cached bound dirty and ripples upward. Stops as soon as a
  /// node is already dirty, which keeps repeated invalidation amortized
  /// cheap on deep or shared graphs.
  pub(crate) fn invalidate(&self) {
    {
      let mut bound = self.bound.write();
      if bound.is_none() {
        return;
      }
      *bound = None;
    }
    for parent in self.parents.read().iter() {
      if let Some(parent) = parent.upgrade() {
        parent.invalidate_bound();
      }
    }
  }

  pub(crate) fn add_parent(&self, parent: &NodeRef) {
    let mut parents = self.parents.write();
    let ptr = Arc::as_ptr(parent);
    if parents.iter().any(|p| p.as_ptr() == ptr) {
      return;
    }
    parents.push(Arc::downgrade(parent));
  }

  pub(crate) fn remove_parent(&self, parent: *const BvhNode) {
    self.parents.write().retain(|p| p.as_ptr() != parent);
  }

  #[cfg(test)]
  pub(crate) fn bound_is_cached(&self) -> bool {
    self.bound.read().is_some()
  }
}

/// The closed set of dynamic node kinds. Visitors dispatch over exactly
/// these variants, so adding a kind is a compile error in every visitor.
pub enum BvhNode {
  Group(Group),
  Transform(Transform),
  MotionTransform(MotionTransform),
  Page(PageNode),
  LineGeometry(LineGeometry),
  StaticGeometry(StaticGeometry),
}

impl BvhNode {
  pub(crate) fn base(&self) -> &NodeBase {
    match self {
      BvhNode::Group(n) => &n.base,
      BvhNode::Transform(n) => &n.base,
      BvhNode::MotionTransform(n) => &n.base,
      BvhNode::Page(n) => &n.base,
      BvhNode::LineGeometry(n) => &n.base,
      BvhNode::StaticGeometry(n) => &n.base,
    }
  }

  fn child_list(&self) -> Option<&ChildList> {
    match self {
      BvhNode::Group(n) => Some(&n.children),
      BvhNode::Transform(n) => Some(&n.children),
      BvhNode::MotionTransform(n) => Some(&n.children),
      BvhNode::Page(n) => Some(&n.children),
      BvhNode::LineGeometry(_) | BvhNode::StaticGeometry(_) => None,
    }
  }

  fn compute_bound(&self) -> Sphere {
    match self {
      BvhNode::Group(n) => n.children.union_bound(),
      BvhNode::Transform(n) => n.compute_bound(),
      BvhNode::MotionTransform(n) => n.compute_bound(),
      BvhNode::Page(n) => n.fixed_bound(),
      BvhNode::LineGeometry(n) => n.compute_bound(),
      BvhNode::StaticGeometry(n) => n.compute_bound(),
    }
  }

  /// The cached bounding sphere, recomputed when dirty. Once clean it is a
  /// true superset of everything beneath this node.
  pub fn bound(&self) -> Sphere {
    if let Some(bound) = *self.base().bound.read() {
      return bound;
    }
    let bound = self.compute_bound();
    *self.base().bound.write() = Some(bound);
    bound
  }

  /// Page nodes keep their externally fixed bound: loading children must
  /// not change it and must not ripple invalidation upward.
  pub fn invalidate_bound(&self) {
    if matches!(self, BvhNode::Page(_)) {
      return;
    }
    self.base().invalidate();
  }

  /// Appends a child to a group like node. Duplicate children are ignored,
  /// leaves ignore the call entirely.
  pub fn add_child(self: &Arc<Self>, child: &NodeRef) {
    let Some(list) = self.child_list() else {
      return;
    };
    if !list.push_unique(child) {
      return;
    }
    child.base().add_parent(self);
    self.invalidate_bound();
  }

  pub fn remove_child(self: &Arc<Self>, child: &NodeRef) {
    let Some(list) = self.child_list() else {
      return;
    };
    if !list.remove(child) {
      return;
    }
    child.base().remove_parent(Arc::as_ptr(self));
    self.invalidate_bound();
  }

  /// Double dispatch entry point of every query.
  pub fn accept<V: Visitor>(self: &Arc<Self>, visitor: &mut V) {
    match &**self {
      BvhNode::Group(n) => visitor.group(self, n),
      BvhNode::Transform(n) => visitor.transform(self, n),
      BvhNode::MotionTransform(n) => visitor.motion_transform(self, n),
      BvhNode::Page(n) => visitor.page_node(self, n),
      BvhNode::LineGeometry(n) => visitor.line_geometry(self, n),
      BvhNode::StaticGeometry(n) => visitor.static_geometry(self, n),
    }
  }

  pub fn as_group(&self) -> Option<&Group> {
    match self {
      BvhNode::Group(n) => Some(n),
      _ => None,
    }
  }

  pub fn as_transform(&self) -> Option<&Transform> {
    match self {
      BvhNode::Transform(n) => Some(n),
      _ => None,
    }
  }

  pub fn as_motion_transform(&self) -> Option<&MotionTransform> {
    match self {
      BvhNode::MotionTransform(n) => Some(n),
      _ => None,
    }
  }

  pub fn as_page(&self) -> Option<&PageNode> {
    match self {
      BvhNode::Page(n) => Some(n),
      _ => None,
    }
  }

  pub fn as_static_geometry(&self) -> Option<&StaticGeometry> {
    match self {
      BvhNode::StaticGeometry(n) => Some(n),
      _ => None,
    }
  }
}

/// Children may outlive any one of their parents, so a dying parent must
/// deregister its back references explicitly.
impl Drop for BvhNode {
  fn drop(&mut self) {
    let me = self as *const BvhNode;
    if let Some(list) = self.child_list() {
      list.for_each(|child| child.base().remove_parent(me));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn leaf_triangle() -> NodeRef {
    let mut builder = StaticGeometryBuilder::new();
    builder.add_triangle(
      vec3(-1.0, -1.0, 0.0),
      vec3(1.0, -1.0, 0.0),
      vec3(-1.0, 1.0, 0.0),
    );
    builder.build().unwrap()
  }

  #[test]
  fn ids_are_unique_and_nonzero() {
    let a = NodeId::next();
    let b = NodeId::next();
    assert_ne!(a, b);
    assert!(!a.is_none());
    assert!(NodeId::NONE.is_none());
  }

  #[test]
  fn group_bound_contains_children() {
    let group = Group::new();
    let leaf = leaf_triangle();
    group.add_child(&leaf);
    let bound = group.bound();
    assert!(bound.contains_point(vec3(-1.0, -1.0, 0.0)));
    assert!(bound.contains_point(vec3(1.0, -1.0, 0.0)));
  }

  #[test]
  fn duplicate_children_are_ignored() {
    let group = Group::new();
    let leaf = leaf_triangle();
    group.add_child(&leaf);
    group.add_child(&leaf);
    assert_eq!(group.as_group().unwrap().num_children(), 1);
  }

  #[test]
  fn mutation_invalidates_ancestors() {
    let root = Group::new();
    let inner = Group::new();
    root.add_child(&inner);
    root.bound();
    assert!(root.base().bound_is_cached());

    inner.add_child(&leaf_triangle());
    assert!(!root.base().bound_is_cached());
    assert!(!root.bound().is_empty());
  }

  #[test]
  fn repeated_invalidation_is_idempotent() {
    let group = Group::new();
    group.add_child(&leaf_triangle());
    group.bound();

    group.invalidate_bound();
    assert!(!group.base().bound_is_cached());
    group.invalidate_bound();
    assert!(!group.base().bound_is_cached());
    assert!(!group.bound().is_empty());
  }

  #[test]
  fn invalidation_reaches_all_parents_of_a_shared_child() {
    let left = Group::new();
    let right = Group::new();
    let shared = Group::new();
    left.add_child(&shared);
    right.add_child(&shared);
    left.bound();
    right.bound();

    shared.add_child(&leaf_triangle());
    assert!(!left.base().bound_is_cached());
    assert!(!right.base().bound_is_cached());
  }

  #[test]
  fn removing_a_child_empties_the_bound() {
    let group = Group::new();
    let leaf = leaf_triangle();
    group.add_child(&leaf);
    assert!(!group.bound().is_empty());
    group.remove_child(&leaf);
    assert!(group.bound().is_empty());
  }

  #[test]
  fn dropped_parent_deregisters_its_back_reference() {
    let leaf = leaf_triangle();
    {
      let group = Group::new();
      group.add_child(&leaf);
      assert_eq!(leaf.base().parents.read().len(), 1);
    }
    assert!(leaf.base().parents.read().is_empty());
  }
}
