use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::*;

/// Producer of lazily loaded subtrees. The source also fixes the bound of
/// its page node for the entire lifetime of the node, loaded or not.
pub trait PageSource: Send + Sync + 'static {
  fn bound(&self) -> Sphere;

  /// A new load request for the given page node, or `None` when there is
  /// nothing to load. The request carries the node so `insert` can attach
  /// the result without further context.
  fn new_request(&self, node: NodeRef) -> Option<Box<dyn PageRequest>>;
}

/// One in-flight load. `load` runs on the pager thread and must not touch
/// the shared graph, `insert` runs on the caller thread and attaches the
/// loaded subtree.
pub trait PageRequest: Send + 'static {
  fn load(&mut self);
  fn insert(&mut self);
}

/// Interior node whose children appear and disappear under pager control.
/// Its bound comes from the source and never changes, so loading and
/// unloading never invalidates anything above it.
pub struct PageNode {
  pub(crate) base: NodeBase,
  pub(crate) children: ChildList,
  source: Box<dyn PageSource>,
  requested: AtomicBool,
  use_stamp: AtomicU64,
}

impl PageNode {
  pub fn new(source: Box<dyn PageSource>) -> NodeRef {
    Arc::new(BvhNode::Page(PageNode {
      base: NodeBase::default(),
      children: ChildList::new(),
      source,
      requested: AtomicBool::new(false),
      use_stamp: AtomicU64::new(0),
    }))
  }

  pub(crate) fn fixed_bound(&self) -> Sphere {
    self.source.bound()
  }

  pub fn traverse<V: Visitor>(&self, visitor: &mut V) {
    self.children.traverse(visitor)
  }

  pub fn num_children(&self) -> usize {
    self.children.len()
  }

  pub fn is_requested(&self) -> bool {
    self.requested.load(Ordering::Acquire)
  }

  /// Claims the node for loading. Returns `None` when a request is already
  /// pending or loaded, or when the source has nothing to give.
  pub(crate) fn begin_request(&self, node: &NodeRef) -> Option<Box<dyn PageRequest>> {
    if self.requested.swap(true, Ordering::AcqRel) {
      return None;
    }
    let request = self.source.new_request(node.clone());
    if request.is_none() {
      self.requested.store(false, Ordering::Release);
    }
    request
  }

  pub(crate) fn touch(&self, stamp: u64) {
    self.use_stamp.store(stamp, Ordering::Relaxed);
  }

  pub(crate) fn use_stamp(&self) -> u64 {
    self.use_stamp.load(Ordering::Relaxed)
  }

  /// Drops the loaded subtree and rearms the node for a future request.
  pub(crate) fn unload(&self, owner: *const BvhNode) {
    self.children.clear(owner);
    self.requested.store(false, Ordering::Release);
  }
}
