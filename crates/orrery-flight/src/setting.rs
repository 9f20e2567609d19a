//! User-changeable settings that need more than a stored value.

use std::fmt;
use std::str::FromStr;

use orrery_config::SizeScale;

use crate::error::FlightError;

/// A runtime setting change. Applied through
/// [`FlightController::apply_setting`](crate::FlightController::apply_setting),
/// which also runs the change hook.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Setting {
    /// Simulated days per frame; zero freezes time.
    BodiesSpeed(u32),
    RotateBodies(bool),
    ShowLabels(bool),
    ShowOrbits(bool),
    BodiesSizeScale(SizeScale),
    KeyboardSpeedMultiplier(f64),
    LookSpeed(f64),
}

impl Setting {
    pub fn key(&self) -> &'static str {
        match self {
            Setting::BodiesSpeed(_) => "bodies_speed",
            Setting::RotateBodies(_) => "rotate_bodies",
            Setting::ShowLabels(_) => "show_labels",
            Setting::ShowOrbits(_) => "show_orbits",
            Setting::BodiesSizeScale(_) => "bodies_size_scale",
            Setting::KeyboardSpeedMultiplier(_) => "keyboard_speed_multiplier",
            Setting::LookSpeed(_) => "look_speed",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key();
        match self {
            Setting::BodiesSpeed(v) => write!(f, "{key} = {v}"),
            Setting::RotateBodies(v) | Setting::ShowLabels(v) | Setting::ShowOrbits(v) => {
                write!(f, "{key} = {v}")
            }
            Setting::BodiesSizeScale(v) => write!(f, "{key} = {v}"),
            Setting::KeyboardSpeedMultiplier(v) | Setting::LookSpeed(v) => {
                write!(f, "{key} = {v}")
            }
        }
    }
}

/// Parses `key=value`.
impl FromStr for Setting {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FlightError::InvalidSetting(s.to_string());
        let (key, value) = s.split_once('=').ok_or_else(invalid)?;
        let value = value.trim();
        let setting = match key.trim() {
            "bodies_speed" => Setting::BodiesSpeed(value.parse().map_err(|_| invalid())?),
            "rotate_bodies" => Setting::RotateBodies(value.parse().map_err(|_| invalid())?),
            "show_labels" => Setting::ShowLabels(value.parse().map_err(|_| invalid())?),
            "show_orbits" => Setting::ShowOrbits(value.parse().map_err(|_| invalid())?),
            "bodies_size_scale" => {
                Setting::BodiesSizeScale(value.parse().map_err(|_| invalid())?)
            }
            "keyboard_speed_multiplier" => {
                Setting::KeyboardSpeedMultiplier(positive(value).ok_or_else(invalid)?)
            }
            "look_speed" => Setting::LookSpeed(positive(value).ok_or_else(invalid)?),
            _ => return Err(invalid()),
        };
        Ok(setting)
    }
}

fn positive(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        assert_eq!("bodies_speed=5".parse::<Setting>().unwrap(), Setting::BodiesSpeed(5));
        assert_eq!(
            "show_labels = false".parse::<Setting>().unwrap(),
            Setting::ShowLabels(false)
        );
        assert_eq!(
            "bodies_size_scale=large".parse::<Setting>().unwrap(),
            Setting::BodiesSizeScale(SizeScale::Large)
        );
        assert_eq!(
            "keyboard_speed_multiplier=2.5".parse::<Setting>().unwrap(),
            Setting::KeyboardSpeedMultiplier(2.5)
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["bodies_speed", "bodies_speed=-1", "look_speed=0", "warp=9"] {
            assert!(
                matches!(bad.parse::<Setting>(), Err(FlightError::InvalidSetting(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_display_shows_key_and_value() {
        let setting = Setting::BodiesSizeScale(SizeScale::Factor(100.0));
        assert_eq!(setting.to_string(), "bodies_size_scale = 100x");
    }
}
