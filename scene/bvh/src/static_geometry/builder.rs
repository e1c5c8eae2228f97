use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::*;

struct BuildLeaf {
  triangle: StaticTriangle,
  bound: Box3,
  center: Vec3,
}

impl BuildLeaf {
  fn new(triangle: StaticTriangle, data: &StaticData) -> Option<Self> {
    let bound = triangle.triangle(data)?.to_box3();
    Some(Self {
      triangle,
      bound,
      center: bound.center(),
    })
  }
}

/// Accumulates a triangle soup and converts it into a balanced static
/// subtree. Vertices are deduplicated by exact value, materials by `Arc`
/// identity, triangles by their sorted vertex index triple.
pub struct StaticGeometryBuilder {
  data: StaticData,
  vertex_map: FxHashMap<[u64; 3], u32>,
  material_map: FxHashMap<usize, u32>,
  triangle_set: FxHashSet<[u32; 3]>,
  leaves: Vec<StaticTriangle>,
  current_material: u32,
}

impl Default for StaticGeometryBuilder {
  fn default() -> Self {
    Self::new()
  }
}

impl StaticGeometryBuilder {
  pub fn new() -> Self {
    Self {
      data: StaticData::new(),
      vertex_map: FxHashMap::default(),
      material_map: FxHashMap::default(),
      triangle_set: FxHashSet::default(),
      leaves: Vec::new(),
      current_material: u32::MAX,
    }
  }

  /// All triangles added afterwards reference this material. `None` leaves
  /// them without one.
  pub fn set_material(&mut self, material: Option<Arc<dyn Material>>) {
    let Some(material) = material else {
      self.current_material = u32::MAX;
      return;
    };
    let identity = Arc::as_ptr(&material) as *const () as usize;
    let index = *self
      .material_map
      .entry(identity)
      .or_insert_with(|| self.data.push_material(material));
    self.current_material = index;
  }

  fn insert_vertex(&mut self, v: Vec3) -> u32 {
    let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
    *self
      .vertex_map
      .entry(key)
      .or_insert_with(|| self.data.push_vertex(v))
  }

  /// Exact repeats (compared by sorted vertex index triple) are dropped.
  pub fn add_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
    let indices = [
      self.insert_vertex(a),
      self.insert_vertex(b),
      self.insert_vertex(c),
    ];
    let mut key = indices;
    key.sort_unstable();
    if !self.triangle_set.insert(key) {
      return;
    }
    self.leaves.push(StaticTriangle {
      indices,
      material: self.current_material,
    });
  }

  pub fn num_triangles(&self) -> usize {
    self.leaves.len()
  }

  /// Trims the pool and builds the tree. An empty soup yields `None`.
  pub fn build(mut self) -> Option<NodeRef> {
    let count = self.leaves.len();
    let leaves = std::mem::take(&mut self.leaves)
      .into_iter()
      .filter_map(|t| BuildLeaf::new(t, &self.data))
      .collect();
    let root = build_recursive(leaves, &self.data)?;
    self.data.trim();
    log::debug!("built static subtree over {} triangles", count);
    Some(StaticGeometry::new(root, Arc::new(self.data)))
  }
}


fn build_recursive(mut leaves: Vec<BuildLeaf>, data: &StaticData) -> Option<StaticRef> {
  if leaves.is_empty() {
    return None;
  }
  if leaves.len() == 1 {
    return Some(Arc::new(StaticNode::Triangle(leaves[0].triangle)));
  }

  let mut bound = Box3::empty();
  for leaf in leaves.iter() {
    bound.expand_by_box(&leaf.bound);
  }
  if bound.is_empty() {
    return None;
  }

  // center split on the broadest axis, retrying the remaining axes when a
  // side comes up empty
  let broadest = bound.broadest_axis();
  let mut split_axis = broadest;
  let mut left = Vec::new();
  let mut right = Vec::new();
  for axis in std::iter::once(broadest).chain(Axis3::ALL.into_iter().filter(|a| *a != broadest)) {
    let mid = axis.select(bound.center());
    (left, right) = leaves
      .drain(..)
      .partition(|leaf| axis.select(leaf.center) <= mid);
    split_axis = axis;
    if !left.is_empty() && !right.is_empty() {
      break;
    }
    leaves = if left.is_empty() {
      std::mem::take(&mut right)
    } else {
      std::mem::take(&mut left)
    };
  }

  if left.is_empty() || right.is_empty() {
    // every center split failed, so all leaves are back in the list and
    // coincident along each axis; sort and deal from both ends instead,
    // keeping each half spatially coherent along the axis
    leaves.sort_by(|a, b| {
      broadest
        .select(a.center)
        .total_cmp(&broadest.select(b.center))
    });
    split_axis = broadest;
    let mut remaining = std::collections::VecDeque::from(leaves);
    loop {
      let Some(front) = remaining.pop_front() else {
        break;
      };
      left.push(front);
      let Some(back) = remaining.pop_back() else {
        break;
      };
      right.push(back);
    }
  }

  let left = build_recursive(left, data);
  let right = build_recursive(right, data);
  match (left, right) {
    (Some(l), Some(r)) => Some(Arc::new(StaticNode::Binary(StaticBinary::new(
      split_axis, l, r, data,
    )))),
    // a lone side is promoted directly, no unary wrapper
    (Some(l), None) => Some(l),
    (None, Some(r)) => Some(r),
    (None, None) => None,
  }
}
