use std::sync::Arc;

use parking_lot::RwLock;

use crate::*;

/// Ordered, duplicate free list of shared children. A node may sit under
/// several parents, so the structure as a whole is a DAG.
pub(crate) struct ChildList(RwLock<Vec<NodeRef>>);

impl ChildList {
  pub fn new() -> Self {
    Self(RwLock::new(Vec::new()))
  }

  /// False when the child is already present.
  pub fn push_unique(&self, child: &NodeRef) -> bool {
    let mut children = self.0.write();
    if children.iter().any(|c| Arc::ptr_eq(c, child)) {
      return false;
    }
    children.push(child.clone());
    true
  }

  /// False when the child was not present.
  pub fn remove(&self, child: &NodeRef) -> bool {
    let mut children = self.0.write();
    let before = children.len();
    children.retain(|c| !Arc::ptr_eq(c, child));
    children.len() != before
  }

  /// Drains all children, deregistering the owner's back references.
  pub fn clear(&self, owner: *const BvhNode) {
    for child in self.0.write().drain(..) {
      child.base().remove_parent(owner);
    }
  }

  pub fn for_each(&self, mut f: impl FnMut(&NodeRef)) {
    for child in self.0.read().iter() {
      f(child);
    }
  }

  pub fn traverse<V: Visitor>(&self, visitor: &mut V) {
    for child in self.0.read().iter() {
      child.accept(visitor);
    }
  }

  pub fn union_bound(&self) -> Sphere {
    let mut bound = Sphere::empty();
    for child in self.0.read().iter() {
      bound.expand_by_sphere(&child.bound());
    }
    bound
  }

  pub fn len(&self) -> usize {
    self.0.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.read().is_empty()
  }

  pub fn get(&self, index: usize) -> Option<NodeRef> {
    self.0.read().get(index).cloned()
  }
}

/// Plain union-of-children interior node.
pub struct Group {
  pub(crate) base: NodeBase,
  pub(crate) children: ChildList,
}

impl Group {
  pub fn new() -> NodeRef {
    Arc::new(BvhNode::Group(Group {
      base: NodeBase::default(),
      children: ChildList::new(),
    }))
  }

  /// Dispatches the visitor to each child in insertion order.
  pub fn traverse<V: Visitor>(&self, visitor: &mut V) {
    self.children.traverse(visitor)
  }

  pub fn num_children(&self) -> usize {
    self.children.len()
  }

  pub fn child(&self, index: usize) -> Option<NodeRef> {
    self.children.get(index)
  }
}
