//! The set of bodies and the per-frame operations over all of them.

use std::collections::HashMap;

use glam::DVec3;
use orrery_config::SizeScale;
use orrery_ephemeris::EphemerisStore;

use crate::body::{Body, OrbitLine};
use crate::camera::Camera;
use crate::catalog::SOLAR_SYSTEM;
use crate::error::SpaceError;
use crate::raycast::{Ray, RayHit, ray_sphere_hit};

/// Options for [`BodyRegistry::update_body_children`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildUpdate {
    pub show_labels: bool,
    /// Shift orbit trails by one day.
    pub advance_trails: bool,
    /// Days on either side of the current day an orbit trail covers.
    pub orbit_segments: u32,
}

/// Camera distance to one body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyDistance {
    pub name: String,
    pub distance: f64,
}

/// All bodies, keyed by name, iterated in insertion order.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    index: HashMap<String, usize>,
    populated: bool,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the solar system catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::DuplicateBody`] if the catalog repeats a name.
    pub fn solar_system() -> Result<Self, SpaceError> {
        let mut registry = Self::new();
        registry.populate(SOLAR_SYSTEM.iter().map(Body::from_def))?;
        Ok(registry)
    }

    /// Fill the registry. Allowed once.
    pub fn populate(&mut self, bodies: impl IntoIterator<Item = Body>) -> Result<(), SpaceError> {
        if self.populated {
            return Err(SpaceError::AlreadyPopulated);
        }
        let mut index = HashMap::new();
        let mut list = Vec::new();
        for body in bodies {
            if index.contains_key(&body.name) {
                return Err(SpaceError::DuplicateBody(body.name));
            }
            index.insert(body.name.clone(), list.len());
            list.push(body);
        }
        tracing::info!("Registered {} bodies", list.len());
        self.bodies = list;
        self.index = index;
        self.populated = true;
        Ok(())
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&Body, SpaceError> {
        self.index
            .get(name)
            .map(|&i| &self.bodies[i])
            .ok_or_else(|| SpaceError::UnknownBody(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Body, SpaceError> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.bodies[i]),
            None => Err(SpaceError::UnknownBody(name.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    /// Move every body to its stored position for `julian`. Bodies without
    /// an entry stay where they are.
    pub fn translate_bodies(&mut self, store: &EphemerisStore, julian: i64) {
        for body in &mut self.bodies {
            if let Some(position) = store.position_at(julian, body.ephemeris_index) {
                body.main.position = DVec3::from_array(position);
            }
        }
    }

    /// Spin every body by `delta` seconds.
    pub fn rotate_bodies(&mut self, delta: f64) {
        for body in &mut self.bodies {
            body.rotate(delta);
        }
    }

    /// Update labels and orbit trails. Call after bodies and camera have
    /// moved for the frame.
    pub fn update_body_children(
        &mut self,
        camera: &Camera,
        store: &EphemerisStore,
        julian: i64,
        options: ChildUpdate,
    ) {
        let lookahead = julian + i64::from(options.orbit_segments);
        for body in &mut self.bodies {
            if options.show_labels {
                body.update_label(camera);
            } else {
                body.label.visible = false;
            }

            if options.advance_trails
                && body.has_orbit_line
                && let Some(orbit) = body.orbit.as_mut()
            {
                let next = store
                    .position_at(lookahead, body.ephemeris_index)
                    .map(DVec3::from_array);
                orbit.shift(next);
            }
        }
    }

    /// Build orbit trails covering `julian - segments ..= julian + segments`.
    /// Days missing from the store repeat the nearest earlier vertex.
    pub fn create_orbits(
        &mut self,
        store: &EphemerisStore,
        julian: i64,
        segments: u32,
        visible: bool,
    ) {
        let segments = i64::from(segments);
        for body in self.bodies.iter_mut().filter(|b| b.has_orbit_line) {
            let known: Vec<Option<DVec3>> = (julian - segments..=julian + segments)
                .map(|day| {
                    store
                        .position_at(day, body.ephemeris_index)
                        .map(DVec3::from_array)
                })
                .collect();
            let mut last = known
                .iter()
                .flatten()
                .next()
                .copied()
                .unwrap_or(body.main.position);
            let vertices = known.into_iter().map(|p| {
                if let Some(p) = p {
                    last = p;
                }
                last
            });
            body.orbit = Some(OrbitLine::new(vertices, visible));
        }
        tracing::debug!("Created orbit lines around day {julian}");
    }

    pub fn set_orbits_visible(&mut self, visible: bool) {
        for orbit in self.bodies.iter_mut().filter_map(|b| b.orbit.as_mut()) {
            orbit.visible = visible;
        }
    }

    /// Rescale every body.
    pub fn apply_size_scale(&mut self, scale: SizeScale) {
        for body in &mut self.bodies {
            body.apply_size_scale(scale);
        }
        tracing::debug!("Applied size scale {scale}");
    }

    /// Distance from the named body's centre to `point`.
    pub fn distance(&self, name: &str, point: DVec3) -> Result<f64, SpaceError> {
        Ok(self.get(name)?.distance_to(point))
    }

    pub fn collision_distance(&self, name: &str) -> Result<f64, SpaceError> {
        Ok(self.get(name)?.collision_distance())
    }

    pub fn collideable_bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.collideable)
    }

    /// Distances to `point`, ascending; ties keep insertion order. `only`
    /// restricts the result to the named bodies.
    pub fn sorted_distances(&self, point: DVec3, only: Option<&[&str]>) -> Vec<BodyDistance> {
        let mut distances: Vec<BodyDistance> = self
            .bodies
            .iter()
            .filter(|b| only.is_none_or(|names| names.contains(&b.name.as_str())))
            .map(|b| BodyDistance {
                name: b.name.clone(),
                distance: b.distance_to(point),
            })
            .collect();
        distances.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        distances
    }

    /// Distance to the closest body centre.
    pub fn closest_distance(&self, point: DVec3, only: Option<&[&str]>) -> Option<f64> {
        self.sorted_distances(point, only)
            .first()
            .map(|d| d.distance)
    }

    /// Smallest distance from `point` to the surface of a collideable body.
    /// Negative inside a body.
    pub fn closest_surface_distance(&self, point: DVec3, only: Option<&[&str]>) -> Option<f64> {
        self.collideable_bodies()
            .filter(|b| only.is_none_or(|names| names.contains(&b.name.as_str())))
            .map(|b| b.distance_to(point) - b.scaled_radius())
            .min_by(f64::total_cmp)
    }

    /// Bodies hit by `ray`, nearest first.
    pub fn raycast(&self, ray: &Ray, collideable_only: bool) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .bodies
            .iter()
            .filter(|b| !collideable_only || b.collideable)
            .filter_map(|b| {
                let distance = ray_sphere_hit(ray, b.main.position, b.scaled_radius())?;
                Some(RayHit {
                    name: b.name.clone(),
                    distance,
                    point: ray.at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
