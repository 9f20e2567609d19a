//! The bodies of the solar system, in ephemeris index order.

use crate::body::{BodyDef, BodyKind};

const fn planet(
    name: &'static str,
    radius_km: f64,
    ephemeris_index: usize,
    label_visible_distance: f64,
    has_bump_map: bool,
    tilt_deg: f64,
    spin_period_hours: f64,
) -> BodyDef {
    BodyDef {
        name,
        kind: BodyKind::Planet,
        radius_km,
        ephemeris_index,
        collideable: true,
        label_visible_distance,
        has_bump_map,
        has_orbit_line: true,
        tilt_deg,
        spin_period_hours,
    }
}

pub const SOLAR_SYSTEM: [BodyDef; 11] = [
    planet("Mercury", 2439.64, 0, 20.0, true, 0.03, 1407.6),
    planet("Venus", 6051.59, 1, 20.0, false, 177.4, -5832.5),
    planet("Earth", 6378.0, 2, 50.0, true, 23.44, 23.9345),
    planet("Mars", 3397.0, 3, 50.0, true, 25.19, 24.6229),
    planet("Jupiter", 71492.0, 4, 250.0, false, 3.13, 9.925),
    planet("Saturn", 60267.0, 5, 250.0, false, 26.73, 10.656),
    planet("Uranus", 25557.25, 6, 30.0, false, 97.77, -17.24),
    planet("Neptune", 24766.0, 7, 1000.0, false, 28.32, 16.11),
    planet("Pluto", 1148.07, 8, 1000.0, true, 122.53, -153.29),
    BodyDef {
        name: "Moon",
        kind: BodyKind::Moon,
        radius_km: 1737.0,
        ephemeris_index: 9,
        collideable: true,
        label_visible_distance: 20.0,
        has_bump_map: true,
        has_orbit_line: true,
        tilt_deg: 6.68,
        spin_period_hours: 655.7,
    },
    BodyDef {
        name: "Sun",
        kind: BodyKind::Star,
        radius_km: 696_000.0,
        ephemeris_index: 10,
        collideable: true,
        label_visible_distance: 1_000_000.0,
        has_bump_map: false,
        has_orbit_line: false,
        tilt_deg: 7.25,
        spin_period_hours: 609.12,
    },
];

/// The catalog entry for `name`.
pub fn find(name: &str) -> Option<&'static BodyDef> {
    SOLAR_SYSTEM.iter().find(|def| def.name == name)
}
