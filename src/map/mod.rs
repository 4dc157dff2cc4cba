//! The waypoint grid: board parsing, graph construction, and lookups.

pub mod builder;
pub mod direction;
pub mod parser;
pub mod waypoint;

pub use builder::MapDirectory;
pub use direction::Direction;
pub use parser::LevelLayout;
pub use waypoint::{Waypoint, WaypointId};
