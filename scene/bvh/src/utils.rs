use crate::*;

/// Deterministic triangle soup for tests and benches: `count` triangles
/// with centers inside a `space_size` cube and edges on the order of
/// `triangle_size`.
pub fn generate_triangles_in_space(count: usize, space_size: f64, triangle_size: f64) -> Vec<Triangle> {
  use rand::prelude::*;
  use rand_chacha::ChaCha8Rng;

  const SEED: u64 = 0x6246A426A2424AC + 0x2;
  let mut rng = ChaCha8Rng::seed_from_u64(SEED);
  let mut random = || rng.gen::<f64>();

  (0..count)
    .map(|_| {
      let center = vec3(random(), random(), random()) * space_size;
      let mut corner = || (vec3(random(), random(), random()) - Vec3::splat(0.5)) * triangle_size;
      Triangle::new(center + corner(), center + corner(), center + corner())
    })
    .collect()
}
