//! This module contains all the constants used in the game.

/// Grid spacing between adjacent waypoints, in world units.
pub const WAYPOINT_STEP: i32 = 2;

/// Arrival tolerance used by all movement code, in world units.
pub const DISTANCE_THRESHOLD: f32 = 0.15;

/// Distance at which an eaten ghost drifting inside the house counts as home.
pub const HOME_EPSILON: f32 = 0.1;

/// The player's base movement speed, in world units per second.
pub const PLAYER_MOVE_SPEED: f32 = 5.0;

/// Distance at which a ghost switches from Scatter to Chase.
pub const CHASE_RANGE: f32 = 10.0;

// Ghost speeds are fixed fractions of the player's move speed.
pub const CHASE_SPEED_FACTOR: f32 = 0.75;
pub const SCATTER_SPEED_FACTOR: f32 = 0.75;
pub const FRIGHTENED_SPEED_FACTOR: f32 = 0.5;
pub const EATEN_SPEED_FACTOR: f32 = 1.5;

/// Total duration of the frightened window opened by a power pellet, in seconds.
pub const POWER_PELLET_DURATION: f32 = 10.0;
/// Seconds before deactivation at which the fade warning event fires.
pub const POWER_PELLET_WARNING_WINDOW: f32 = 3.0;

/// Delay between the player being caught and the death event firing, so an
/// external death animation has time to play.
pub const DEATH_EVENT_DELAY: f32 = 2.0;

/// Duration of the portal entry/exit visual effect, in seconds.
pub const PORTAL_EFFECT_DURATION: f32 = 2.0;

pub const PELLET_POINTS: u32 = 10;
pub const POWER_PELLET_POINTS: u32 = 50;
/// Points for the first ghost eaten in a frightened window; doubles per ghost.
pub const GHOST_BASE_POINTS: u32 = 200;

pub const STARTING_LIVES: u8 = 3;

// Collision radii, in world units.
pub const PLAYER_COLLIDER_RADIUS: f32 = 0.5;
pub const GHOST_COLLIDER_RADIUS: f32 = 0.5;
pub const PELLET_COLLIDER_RADIUS: f32 = 0.3;
pub const PORTAL_TRIGGER_RADIUS: f32 = 0.4;

/// The default arena, as rows of characters. One cell per waypoint position;
/// cells are [`WAYPOINT_STEP`] world units apart.
///
/// - `#` wall (no waypoint)
/// - `.` waypoint with a pellet
/// - `o` waypoint with a power pellet
/// - `*` waypoint without a pellet
/// - `x` blocked waypoint (present in the graph, excluded from search)
/// - `P` player start waypoint
/// - `E` ghost-house entrance waypoint
/// - `H` ghost-house interior (world position only, not part of the graph)
/// - `1` / `2` portal pair waypoints
/// - ` ` void
pub const RAW_BOARD: [&str; 13] = [
    "###############",
    "#.....*.*.....#",
    "#.##.##*##.##.#",
    "#o##.##E##.##o#",
    "#....##H##....#",
    "1.##.#####.##.2",
    "#.##...*...##.#",
    "#.##.#####.##.#",
    "#....#####....#",
    "#.##.......##.#",
    "#o##.##P##.##o#",
    "#......*......#",
    "###############",
];
