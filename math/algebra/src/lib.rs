mod mat4;
mod scalar;
mod vec3;

pub use mat4::*;
pub use scalar::*;
pub use vec3::*;
