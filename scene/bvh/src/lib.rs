//! Bounding volume hierarchy over static triangle soups and a dynamic,
//! time varying scene graph.
//!
//! The dynamic side is a shared ownership DAG of [`BvhNode`]s: groups,
//! affine transforms, time parameterized motion transforms, asynchronously
//! paged placeholders and leaf geometry. Every node carries a lazily
//! computed bounding sphere that is invalidated upward through non owning
//! back references on mutation.
//!
//! Queries are visitors: construct one with the query parameters, call
//! [`BvhNode::accept`], then read the result accessors. See
//! [`LineSegmentVisitor`], [`NearestPointVisitor`], [`BoundingBoxVisitor`]
//! and [`SubTreeCollector`].
//!
//! Structural mutation (child lists, transform setters, request insertion)
//! belongs to the tree owning thread; only [`PageRequest::load`] runs on
//! the pager worker and must stay away from the live tree.

mod group;
mod line_geometry;
mod motion;
mod node;
mod page;
mod pager;
mod static_geometry;
mod transform;
pub mod utils;
mod visitor;

pub use group::*;
pub use line_geometry::*;
pub use motion::*;
pub use node::*;
pub use page::*;
pub use pager::*;
pub use simspace_algebra::*;
pub use simspace_geometry::*;
pub use static_geometry::*;
pub use transform::*;
pub use visitor::*;
