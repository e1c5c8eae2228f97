mod bounding_box;
mod collect;
mod line_segment;
mod nearest_point;

pub use bounding_box::*;
pub use collect::*;
pub use line_segment::*;
pub use nearest_point::*;

use crate::*;

/// Dispatch surface over the dynamic node kinds. There are no default
/// implementations on purpose: a new node kind breaks every visitor until
/// it decides how to handle it.
pub trait Visitor {
  fn group(&mut self, node: &NodeRef, group: &Group);
  fn transform(&mut self, node: &NodeRef, transform: &Transform);
  fn motion_transform(&mut self, node: &NodeRef, transform: &MotionTransform);
  fn page_node(&mut self, node: &NodeRef, page: &PageNode);
  fn line_geometry(&mut self, node: &NodeRef, geometry: &LineGeometry);
  fn static_geometry(&mut self, node: &NodeRef, geometry: &StaticGeometry);
}

/// Dispatch surface over the static node kinds. Static leaves only resolve
/// against the data pool, so it rides along in every call.
pub trait StaticVisitor {
  fn static_binary(&mut self, node: &StaticRef, binary: &StaticBinary, data: &StaticData);
  fn static_triangle(&mut self, node: &StaticRef, triangle: &StaticTriangle, data: &StaticData);
}
