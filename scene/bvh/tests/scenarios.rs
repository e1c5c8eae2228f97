use std::sync::Arc;

use simspace_bvh::utils::generate_triangles_in_space;
use simspace_bvh::*;

fn unit_triangle() -> NodeRef {
  let mut builder = StaticGeometryBuilder::new();
  builder.add_triangle(vec3(-1., -1., 0.), vec3(1., -1., 0.), vec3(-1., 1., 0.));
  builder.build().unwrap()
}

fn probe(root: &NodeRef, time: f64) -> LineSegmentVisitor {
  let mut visitor =
    LineSegmentVisitor::new(LineSegment::new(vec3(0., 0., -1.), vec3(0., 0., 1.)), time);
  root.accept(&mut visitor);
  visitor
}

#[test]
fn plain_triangle_hit() {
  let visitor = probe(&unit_triangle(), 0.0);
  assert!(!visitor.empty());
  assert!((visitor.point() - vec3(0., 0., 0.)).length() < 1e-12);
  assert_eq!(visitor.linear_velocity(), Vec3::zero());
  assert_eq!(visitor.angular_velocity(), Vec3::zero());
  assert!(visitor.id().is_none());
}

#[test]
fn transform_pair_cancels_out_in_world_space() {
  let offset = vec3(1000., 1000., 1000.);
  let outer = Transform::with_to_world(Mat4::translation(offset));
  let inner = Transform::with_to_world(Mat4::translation(-offset));
  inner.add_child(&unit_triangle());
  outer.add_child(&inner);

  let visitor = probe(&outer, 0.0);
  assert!(!visitor.empty());
  assert!((visitor.point() - vec3(0., 0., 0.)).length() < 1e-9);
}

#[test]
fn motion_transform_hit_reports_surface_velocity() {
  let moving = MotionTransform::new();
  let m = moving.as_motion_transform().unwrap();
  m.set_angular_velocity(vec3(1., 0., 0.));
  m.set_linear_velocity(vec3(0., 0., 1.));
  moving.add_child(&unit_triangle());

  let visitor = probe(&moving, 0.0);
  assert!(!visitor.empty());
  assert!((visitor.point() - vec3(0., 0., 0.)).length() < 1e-12);
  assert!((visitor.linear_velocity() - vec3(0., 1., 1.)).length() < 1e-12);
  assert!((visitor.angular_velocity() - vec3(1., 0., 0.)).length() < 1e-12);
  assert_eq!(visitor.id(), m.id());
}

#[test]
fn nearest_point_on_a_plain_triangle() {
  let leaf = unit_triangle();
  let mut visitor = NearestPointVisitor::new(Sphere::new(vec3(0., 0., -1.), 2.0), 0.0);
  leaf.accept(&mut visitor);
  assert!(!visitor.empty());
  assert!((visitor.point() - vec3(0., 0., 0.)).length() < 1e-12);
}

#[test]
fn bounds_contain_every_triangle_of_a_random_soup() {
  let triangles = generate_triangles_in_space(256, 100., 2.);
  let mut builder = StaticGeometryBuilder::new();
  for t in triangles.iter() {
    builder.add_triangle(t.a, t.b, t.c);
  }
  let root = Group::new();
  root.add_child(&builder.build().unwrap());

  let bound = root.bound();
  for t in triangles.iter() {
    for corner in [t.a, t.b, t.c] {
      assert!(bound.center.distance(corner) <= bound.radius + 1e-9);
    }
  }
}

#[test]
fn duplicate_triangles_collapse_to_the_distinct_count() {
  let triangles = generate_triangles_in_space(128, 100., 2.);
  let mut builder = StaticGeometryBuilder::new();
  for t in triangles.iter().chain(triangles.iter()) {
    builder.add_triangle(t.a, t.b, t.c);
  }
  assert_eq!(builder.num_triangles(), triangles.len());

  struct CountLeaves(usize);
  impl StaticVisitor for CountLeaves {
    fn static_binary(&mut self, _: &StaticRef, binary: &StaticBinary, data: &StaticData) {
      binary.traverse(self, data);
    }
    fn static_triangle(&mut self, _: &StaticRef, _: &StaticTriangle, _: &StaticData) {
      self.0 += 1;
    }
  }

  let node = builder.build().unwrap();
  let mut count = CountLeaves(0);
  node.as_static_geometry().unwrap().traverse(&mut count);
  assert_eq!(count.0, triangles.len());
}

#[test]
fn hit_materials_come_back_by_identity() {
  #[derive(Debug)]
  struct Concrete;
  impl Material for Concrete {}

  let concrete: Arc<dyn Material> = Arc::new(Concrete);
  let mut builder = StaticGeometryBuilder::new();
  builder.set_material(Some(concrete.clone()));
  builder.add_triangle(vec3(-1., -1., 0.), vec3(1., -1., 0.), vec3(-1., 1., 0.));
  let leaf = builder.build().unwrap();

  let visitor = probe(&leaf, 0.0);
  assert!(Arc::ptr_eq(visitor.material().unwrap(), &concrete));
}

#[test]
fn queries_see_paged_content_after_update() {
  struct SoupSource;

  impl PageSource for SoupSource {
    fn bound(&self) -> Sphere {
      Sphere::new(Vec3::zero(), 3.0)
    }

    fn new_request(&self, node: NodeRef) -> Option<Box<dyn PageRequest>> {
      Some(Box::new(SoupRequest { node, loaded: None }))
    }
  }

  struct SoupRequest {
    node: NodeRef,
    loaded: Option<NodeRef>,
  }

  impl PageRequest for SoupRequest {
    fn load(&mut self) {
      let mut builder = StaticGeometryBuilder::new();
      builder.add_triangle(vec3(-1., -1., 0.), vec3(1., -1., 0.), vec3(-1., 1., 0.));
      self.loaded = builder.build();
    }

    fn insert(&mut self) {
      if let Some(subtree) = self.loaded.take() {
        self.node.add_child(&subtree);
      }
    }
  }

  let page = PageNode::new(Box::new(SoupSource));
  let mut pager = Pager::new();

  assert!(probe(&page, 0.0).empty());

  pager.use_page(&page);
  let visitor = probe(&page, 0.0);
  assert!(!visitor.empty());
  assert!((visitor.point() - vec3(0., 0., 0.)).length() < 1e-12);

  // expiry unloads the subtree again
  for _ in 0..4 {
    pager.update(1);
  }
  assert!(probe(&page, 0.0).empty());
}

#[test]
fn collected_subtree_answers_like_the_original() {
  let triangles = generate_triangles_in_space(128, 50., 2.);
  let mut builder = StaticGeometryBuilder::new();
  for t in triangles.iter() {
    builder.add_triangle(t.a, t.b, t.c);
  }
  let root = Group::new();
  root.add_child(&builder.build().unwrap());

  let sphere = Sphere::new(vec3(25., 25., 25.), 20.0);
  let mut collector = SubTreeCollector::new(sphere);
  root.accept(&mut collector);
  let collected = collector.into_node().unwrap();

  // nearest point queries inside the collection sphere agree
  for center in [vec3(25., 25., 25.), vec3(20., 30., 25.), vec3(30., 20., 20.)] {
    let mut full = NearestPointVisitor::new(Sphere::new(center, 5.0), 0.0);
    root.accept(&mut full);
    let mut partial = NearestPointVisitor::new(Sphere::new(center, 5.0), 0.0);
    collected.accept(&mut partial);
    assert_eq!(full.empty(), partial.empty());
    if !full.empty() {
      assert!((full.point() - partial.point()).length() < 1e-9);
    }
  }
}
