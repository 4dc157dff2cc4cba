#![allow(dead_code)]

use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use glam::IVec2;

use pacgrid::game::Game;
use pacgrid::map::{LevelLayout, MapDirectory, WaypointId};
use pacgrid::systems::components::{GameConfig, PlayerControlled, Position};

/// A small symmetric arena: power pellets in the pockets, ghost house in the
/// middle, player start on the bottom corridor.
pub const TEST_BOARD: [&str; 7] = [
    "#######",
    "#o...o#",
    "#.*E*.#",
    "#.#H#.#",
    "#..P..#",
    "#o...o#",
    "#######",
];

/// The small arena with a teleport pair on the middle row.
pub const PORTAL_BOARD: [&str; 7] = [
    "#######",
    "#*...*#",
    "#.*E*.#",
    "1.#H#.2",
    "#..P..#",
    "#*...*#",
    "#######",
];

/// An open 3x3 block above the spawn row, for route-shape assertions.
pub const GRID_BOARD: [&str; 7] = [
    "#####",
    "#...#",
    "#...#",
    "#...#",
    "#E#P#",
    "#H###",
    "#####",
];

/// A ring of blocked waypoints sealing off the center.
pub const BLOCKED_BOARD: [&str; 7] = [
    "#####",
    "#.x.#",
    "#x.x#",
    "#.x.#",
    "#E#P#",
    "#H###",
    "#####",
];

pub fn layout(rows: &[&str]) -> LevelLayout {
    LevelLayout::parse(rows, 2).expect("test board should parse")
}

pub fn map(rows: &[&str]) -> MapDirectory {
    MapDirectory::from_layout(&layout(rows)).expect("test board should build")
}

/// A config with a fixed wander seed so tests are reproducible.
pub fn seeded_config() -> GameConfig {
    GameConfig {
        rng_seed: Some(42),
        ..GameConfig::default()
    }
}

pub fn game(rows: &[&str]) -> Game {
    game_with(rows, seeded_config())
}

pub fn game_with(rows: &[&str], config: GameConfig) -> Game {
    Game::from_layout(&layout(rows), config).expect("test game should build")
}

/// Looks up the waypoint at grid `(x, y)`, panicking when the board has none.
pub fn wp(map: &MapDirectory, x: i32, y: i32) -> WaypointId {
    map.waypoint_at(IVec2::new(x, y))
        .unwrap_or_else(|| panic!("no waypoint at ({x}, {y})"))
}

pub fn player_entity(world: &mut World) -> Entity {
    world
        .query_filtered::<Entity, bevy_ecs::query::With<PlayerControlled>>()
        .single(world)
        .expect("exactly one player")
}

pub fn player_position(world: &mut World) -> Position {
    let entity = player_entity(world);
    *world.get::<Position>(entity).expect("player has a position")
}

/// Ticks the game `count` times at a fixed 100ms step.
pub fn run_ticks(game: &mut Game, count: usize) {
    for _ in 0..count {
        game.tick(0.1);
    }
}
