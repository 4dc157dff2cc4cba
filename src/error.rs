//! Centralized error types for the gameplay core.
//!
//! Configuration problems (bad board, duplicate grid positions, missing corner
//! or home waypoints) are fatal at level-load time; the level cannot start.
//! Pathfinding failure is deliberately NOT an error: an unreachable target
//! simply produces an empty path and the agent retries next tick.

use bevy_ecs::event::Event;
use glam::IVec2;

/// Main error type for the gameplay core.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Board parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for board parsing operations.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),

    #[error("Board has no player start position")]
    MissingPlayerStart,

    #[error("Board has no ghost-house entrance")]
    MissingHomeEntrance,

    #[error("Board has no ghost-house interior position")]
    MissingHomePlace,

    #[error("Portal endpoints must come in pairs, found {0}")]
    UnpairedPortal(usize),
}

/// Errors related to waypoint graph construction and lookups.
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    #[error("Duplicate grid position: {0}")]
    DuplicateGridPosition(IVec2),

    #[error("Corner waypoint not found at grid position {0}")]
    CornerNotFound(IVec2),

    #[error("No waypoint at grid position {0}")]
    WaypointNotFound(IVec2),

    #[error("Map has no waypoints")]
    Empty,

    #[error("Map has no non-corner waypoints for scatter wandering")]
    NoWanderTargets,
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
