//! Bodies of the solar system, the camera that views them, and the
//! per-frame engine that moves, spins and labels them.

mod body;
mod camera;
pub mod catalog;
mod error;
mod raycast;
mod registry;

pub use body::{
    Body, BodyDef, BodyKind, COLLISION_MARGIN, KM_PER_AU, Label, OrbitLine, SceneObject, Spin,
};
pub use camera::{Camera, look_at_rotation};
pub use error::SpaceError;
pub use raycast::{Ray, RayHit, ray_sphere_hit, ray_sphere_intersect};
pub use registry::{BodyDistance, BodyRegistry, ChildUpdate};
