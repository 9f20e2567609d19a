//! The four flight modes.

mod auto;
mod free;
mod menu;
mod orbit;

pub use auto::{AutoMode, AutoPhase, PAN_STEP, PanManeuver, TranslateManeuver};
pub use free::FreeMode;
pub use menu::MenuMode;
pub use orbit::OrbitMode;
