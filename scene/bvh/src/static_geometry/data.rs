use std::any::Any;
use std::sync::Arc;

use crate::*;

/// Marker for adapter supplied surface materials. `Any` lets the query
/// issuer downcast a hit material back to its own type.
pub trait Material: Any + Send + Sync {}

/// Shared vertex and material pool of a static subtree. Append only while
/// building, frozen by [`StaticData::trim`], immutable and concurrently
/// readable afterwards.
pub struct StaticData {
  vertices: Vec<Vec3>,
  materials: Vec<Arc<dyn Material>>,
}

impl StaticData {
  pub(crate) fn new() -> Self {
    Self {
      vertices: Vec::new(),
      materials: Vec::new(),
    }
  }

  pub(crate) fn push_vertex(&mut self, v: Vec3) -> u32 {
    self.vertices.push(v);
    (self.vertices.len() - 1) as u32
  }

  pub(crate) fn push_material(&mut self, m: Arc<dyn Material>) -> u32 {
    self.materials.push(m);
    (self.materials.len() - 1) as u32
  }

  pub(crate) fn trim(&mut self) {
    self.vertices.shrink_to_fit();
    self.materials.shrink_to_fit();
  }

  /// Out of range lookups answer `None`, they never fail hard.
  pub fn vertex(&self, index: u32) -> Option<Vec3> {
    self.vertices.get(index as usize).copied()
  }

  pub fn material(&self, index: u32) -> Option<&Arc<dyn Material>> {
    self.materials.get(index as usize)
  }

  pub fn num_vertices(&self) -> usize {
    self.vertices.len()
  }

  pub fn num_materials(&self) -> usize {
    self.materials.len()
  }
}
