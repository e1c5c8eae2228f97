use std::sync::Arc;

use crate::*;

/// Passive leaf tracking a single line segment, e.g. a carrier wire or
/// catapult. It never answers intersection or nearest point queries; it is
/// only carried through bounds and subtree collection so interested code
/// can find it in a collected subtree.
pub struct LineGeometry {
  pub(crate) base: NodeBase,
  segment: LineSegment,
}

impl LineGeometry {
  pub fn new(segment: LineSegment) -> NodeRef {
    Arc::new(BvhNode::LineGeometry(LineGeometry {
      base: NodeBase::default(),
      segment,
    }))
  }

  pub fn segment(&self) -> LineSegment {
    self.segment
  }

  pub(crate) fn compute_bound(&self) -> Sphere {
    Sphere::new(self.segment.center(), self.segment.length() * 0.5)
  }
}
