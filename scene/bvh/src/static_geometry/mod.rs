mod builder;
mod data;
mod node;

pub use builder::*;
pub use data::*;
pub use node::*;

use std::sync::Arc;

use crate::*;

/// Dynamic tree leaf pairing one immutable static subtree with its data
/// pool. Both halves never mutate after construction and may be read from
/// any thread.
pub struct StaticGeometry {
  pub(crate) base: NodeBase,
  root: StaticRef,
  data: Arc<StaticData>,
}

impl StaticGeometry {
  pub fn new(root: StaticRef, data: Arc<StaticData>) -> NodeRef {
    Arc::new(BvhNode::StaticGeometry(StaticGeometry {
      base: NodeBase::default(),
      root,
      data,
    }))
  }

  pub fn root(&self) -> &StaticRef {
    &self.root
  }

  pub fn data(&self) -> &Arc<StaticData> {
    &self.data
  }

  /// Enters the static dispatch surface at the root.
  pub fn traverse<V: StaticVisitor>(&self, visitor: &mut V) {
    self.root.accept(visitor, &self.data)
  }

  pub(crate) fn compute_bound(&self) -> Sphere {
    Sphere::from_box3(&self.root.bounding_box(&self.data))
  }
}
