//! Astronomical bodies and the visual objects attached to them.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use glam::{DQuat, DVec3};
use orrery_config::SizeScale;

use crate::camera::Camera;

/// Kilometres per astronomical unit.
pub const KM_PER_AU: f64 = 149_597_870.7;

/// Collision distance as a multiple of the scaled radius.
pub const COLLISION_MARGIN: f64 = 1.1;

/// Labels are scaled by their distance to the camera divided by this.
const LABEL_SCALE_DIVISOR: f64 = 1000.0;

/// Bump scale per AU of radius per unit of size factor.
const BUMP_SCALE_FACTOR: f64 = 0.05;
/// Bump scale per AU of radius at the large size scale.
const BUMP_SCALE_LARGE: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
}

impl BodyKind {
    /// Scaled radius in AU every body of this kind gets at [`SizeScale::Large`].
    pub fn large_radius(self) -> f64 {
        match self {
            BodyKind::Star => 0.2,
            BodyKind::Planet => 0.1,
            BodyKind::Moon => 0.05,
        }
    }
}

/// Transform of a renderable object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObject {
    pub position: DVec3,
    pub rotation: DQuat,
    /// Uniform scale.
    pub scale: f64,
}

impl Default for SceneObject {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: 1.0,
        }
    }
}

/// A text label that floats between the body and the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Label {
    pub object: SceneObject,
    pub visible: bool,
}

/// A trail of past and future positions, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitLine {
    vertices: VecDeque<DVec3>,
    pub visible: bool,
}

impl OrbitLine {
    pub fn new(vertices: impl IntoIterator<Item = DVec3>, visible: bool) -> Self {
        Self {
            vertices: vertices.into_iter().collect(),
            visible,
        }
    }

    pub fn vertices(&self) -> impl ExactSizeIterator<Item = &DVec3> {
        self.vertices.iter()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn newest(&self) -> Option<DVec3> {
        self.vertices.back().copied()
    }

    /// Drop the oldest vertex and append `next`. A missing `next` repeats the
    /// newest vertex so the vertex count never changes.
    pub fn shift(&mut self, next: Option<DVec3>) {
        let Some(next) = next.or_else(|| self.newest()) else {
            return;
        };
        self.vertices.pop_front();
        self.vertices.push_back(next);
    }
}

/// Rotation about the body's own axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    /// Tilt of the spin axis away from +Y, in radians, about +X.
    pub tilt: f64,
    /// Radians per second. Negative for retrograde rotation.
    pub rate: f64,
    /// Current angle about the spin axis.
    pub angle: f64,
}

impl Spin {
    /// Spin from an axial tilt in degrees and a sidereal period in hours.
    /// One hour of rotation plays per second.
    pub fn from_period(tilt_deg: f64, period_hours: f64) -> Self {
        let rate = if period_hours == 0.0 {
            0.0
        } else {
            TAU / period_hours
        };
        Self {
            tilt: tilt_deg.to_radians(),
            rate,
            angle: 0.0,
        }
    }

    pub fn axis(&self) -> DVec3 {
        self.tilt_rotation() * DVec3::Y
    }

    fn tilt_rotation(&self) -> DQuat {
        DQuat::from_rotation_x(self.tilt)
    }

    /// Orientation for the current angle.
    pub fn orientation(&self) -> DQuat {
        self.tilt_rotation() * DQuat::from_rotation_y(self.angle)
    }

    pub fn advance(&mut self, delta: f64) {
        self.angle = (self.angle + self.rate * delta).rem_euclid(TAU);
    }
}

/// Static description of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDef {
    pub name: &'static str,
    pub kind: BodyKind,
    /// Physical radius in km.
    pub radius_km: f64,
    pub ephemeris_index: usize,
    pub collideable: bool,
    /// Beyond this camera distance the label is hidden.
    pub label_visible_distance: f64,
    pub has_bump_map: bool,
    pub has_orbit_line: bool,
    pub tilt_deg: f64,
    pub spin_period_hours: f64,
}

/// One astronomical body and its visual state.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub name: String,
    pub kind: BodyKind,
    pub radius_km: f64,
    pub ephemeris_index: usize,
    pub collideable: bool,
    pub label_visible_distance: f64,
    pub has_bump_map: bool,
    pub bump_scale: f64,
    pub has_orbit_line: bool,
    pub main: SceneObject,
    pub label: Label,
    /// Created once ephemeris data is available.
    pub orbit: Option<OrbitLine>,
    pub spin: Spin,
}

impl Body {
    pub fn from_def(def: &BodyDef) -> Self {
        let spin = Spin::from_period(def.tilt_deg, def.spin_period_hours);
        let mut body = Self {
            name: def.name.to_string(),
            kind: def.kind,
            radius_km: def.radius_km,
            ephemeris_index: def.ephemeris_index,
            collideable: def.collideable,
            label_visible_distance: def.label_visible_distance,
            has_bump_map: def.has_bump_map,
            bump_scale: 0.0,
            has_orbit_line: def.has_orbit_line,
            main: SceneObject {
                rotation: spin.orientation(),
                ..SceneObject::default()
            },
            label: Label::default(),
            orbit: None,
            spin,
        };
        body.apply_size_scale(SizeScale::default());
        body
    }

    /// Physical radius in AU.
    pub fn radius_au(&self) -> f64 {
        self.radius_km / KM_PER_AU
    }

    /// Rendered radius in AU.
    pub fn scaled_radius(&self) -> f64 {
        self.radius_au() * self.main.scale
    }

    /// Camera distance below which the camera counts as colliding.
    pub fn collision_distance(&self) -> f64 {
        self.scaled_radius() * COLLISION_MARGIN
    }

    pub fn position(&self) -> DVec3 {
        self.main.position
    }

    /// Distance from the body centre to `point`.
    pub fn distance_to(&self, point: DVec3) -> f64 {
        self.main.position.distance(point)
    }

    /// Re-derive the mesh scale and bump scale.
    pub fn apply_size_scale(&mut self, scale: SizeScale) {
        let radius = self.radius_au();
        match scale {
            SizeScale::Factor(factor) => {
                self.main.scale = factor;
                self.bump_scale = radius * factor * BUMP_SCALE_FACTOR;
            }
            SizeScale::Large => {
                self.main.scale = self.kind.large_radius() / radius;
                self.bump_scale = radius * BUMP_SCALE_LARGE;
            }
        }
    }

    /// Advance the spin by `delta` seconds.
    pub fn rotate(&mut self, delta: f64) {
        self.spin.advance(delta);
        self.main.rotation = self.spin.orientation();
    }

    /// Place the label between the body surface and the camera, facing the
    /// camera, or hide it when the camera is too far away.
    pub fn update_label(&mut self, camera: &Camera) {
        let distance = self.distance_to(camera.position);
        if distance > self.label_visible_distance {
            self.label.visible = false;
            return;
        }

        let radius = self.scaled_radius();
        let label_distance = (distance - radius) / 2.0;
        let towards_camera = (camera.position - self.main.position).normalize_or_zero();

        self.label.object.rotation = camera.rotation;
        self.label.object.position =
            self.main.position + towards_camera * (label_distance + radius);
        self.label.object.scale = label_distance / LABEL_SCALE_DIVISOR;
        self.label.visible = true;
    }
}
