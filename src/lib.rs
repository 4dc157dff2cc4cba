//! Grid-arena chase game logic, headless.
//!
//! The crate simulates waypoint-graph movement, ghost behavior, and round
//! scoring; an embedding layer supplies input commands and a frame delta and
//! renders whatever it likes from the resulting world.

pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod map;
pub mod pathfind;
pub mod systems;
