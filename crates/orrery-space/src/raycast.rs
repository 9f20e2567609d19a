//! Ray casting against body spheres.

use glam::DVec3;

/// A ray with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Returns `None` for a zero-length direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        Some(Self {
            origin,
            direction: direction.try_normalize()?,
        })
    }

    pub fn at(&self, distance: f64) -> DVec3 {
        self.origin + self.direction * distance
    }
}

/// One body hit by a ray.
#[derive(Clone, Debug, PartialEq)]
pub struct RayHit {
    pub name: String,
    /// Distance along the ray to the entry point.
    pub distance: f64,
    pub point: DVec3,
}

/// Both ray parameters where the ray crosses the sphere surface, nearest
/// first. `None` when the ray's line misses the sphere.
pub fn ray_sphere_intersect(ray: &Ray, center: DVec3, radius: f64) -> Option<(f64, f64)> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    Some((-b - sqrt_disc, -b + sqrt_disc))
}

/// Distance to the sphere's front face. Rays starting inside the sphere, or
/// pointing away from it, do not hit.
pub fn ray_sphere_hit(ray: &Ray, center: DVec3, radius: f64) -> Option<f64> {
    let (near, _) = ray_sphere_intersect(ray, center, radius)?;
    (near >= 0.0).then_some(near)
}
