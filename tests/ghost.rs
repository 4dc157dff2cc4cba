use bevy_ecs::entity::Entity;
use glam::Vec2;
use speculoos::prelude::*;

use pacgrid::events::{GameCommand, RoundEvent};
use pacgrid::map::{Direction, MapDirectory, WaypointId};
use pacgrid::systems::components::{GameConfig, GameState, GhostAgent, GhostBehavior, Position, RoundState};

mod common;
use common::{game, game_with, player_entity, run_ticks, seeded_config, wp, GRID_BOARD, TEST_BOARD};

fn behaviors(game: &mut pacgrid::game::Game) -> Vec<GhostBehavior> {
    let mut query = game.world.query::<&GhostAgent>();
    query.iter(&game.world).map(|agent| agent.behavior).collect()
}

fn start_round(game: &mut pacgrid::game::Game) {
    game.queue_command(GameCommand::Move(Direction::Left));
    game.tick(0.1);
    assert_eq!(game.state(), GameState::Playing);
}

fn first_ghost(game: &mut pacgrid::game::Game) -> Entity {
    let mut query = game.world.query::<(Entity, &GhostAgent)>();
    query.iter(&game.world).next().expect("ghosts exist").0
}

fn place(game: &mut pacgrid::game::Game, entity: Entity, waypoint: WaypointId, world: Vec2) {
    let mut position = game.world.get_mut::<Position>(entity).expect("entity has a position");
    position.waypoint = waypoint;
    position.world = world;
}

#[test]
fn test_power_pellet_frightens_every_ghost() {
    let mut game = game(&TEST_BOARD);

    game.world.send_event(RoundEvent::PowerPelletActivated);
    game.tick(0.0);

    for behavior in behaviors(&mut game) {
        assert_eq!(behavior, GhostBehavior::Frightened);
    }
}

#[test]
fn test_fade_warning_reaches_frightened_ghosts() {
    let mut game = game(&TEST_BOARD);

    game.world.send_event(RoundEvent::PowerPelletActivated);
    game.tick(0.0);
    game.world.send_event(RoundEvent::PowerPelletFading);
    game.tick(0.0);

    let mut query = game.world.query::<&GhostAgent>();
    for agent in query.iter(&game.world) {
        assert!(agent.frightened_warning);
    }
}

#[test]
fn test_deactivation_restores_scatter() {
    let mut game = game(&TEST_BOARD);

    game.world.send_event(RoundEvent::PowerPelletActivated);
    game.tick(0.0);
    game.world.send_event(RoundEvent::PowerPelletDeactivated);
    game.tick(0.0);

    for behavior in behaviors(&mut game) {
        assert_eq!(behavior, GhostBehavior::Scatter);
    }
}

#[test]
fn test_eaten_ghost_ignores_power_pellet() {
    let mut game = game(&TEST_BOARD);

    let mut query = game.world.query::<&mut GhostAgent>();
    for mut agent in query.iter_mut(&mut game.world) {
        agent.change_behavior(GhostBehavior::Eaten);
    }

    game.world.send_event(RoundEvent::PowerPelletActivated);
    game.tick(0.0);

    for behavior in behaviors(&mut game) {
        assert_eq!(behavior, GhostBehavior::Eaten);
    }
}

#[test]
fn test_ghosts_chase_a_player_in_range() {
    let mut game = game(&TEST_BOARD);

    start_round(&mut game);
    game.tick(0.1);

    let player_waypoint = common::player_position(&mut game.world).waypoint;
    let mut query = game.world.query::<&GhostAgent>();
    for agent in query.iter(&game.world) {
        assert_eq!(agent.behavior, GhostBehavior::Chase);
        assert_eq!(agent.target, Some(player_waypoint));
    }
}

#[test]
fn test_ghosts_scatter_when_out_of_range() {
    let config = GameConfig {
        chase_range: 0.5,
        ..seeded_config()
    };
    let mut game = game_with(&TEST_BOARD, config);

    start_round(&mut game);
    game.tick(0.1);

    let mut query = game.world.query::<&GhostAgent>();
    let targets: Vec<_> = query.iter(&game.world).map(|agent| (agent.behavior, agent.target)).collect();
    let map = game.world.resource::<MapDirectory>();
    for (behavior, target) in targets {
        assert_eq!(behavior, GhostBehavior::Scatter);
        let target = target.expect("scatter always has a wander target");
        assert!(!map.is_corner(target));
        assert!(!map.waypoint(target).portal);
    }
}

#[test]
fn test_frightened_ghosts_head_for_a_corner() {
    let mut game = game(&TEST_BOARD);

    start_round(&mut game);
    game.world.send_event(RoundEvent::PowerPelletActivated);
    game.tick(0.1);
    game.tick(0.1);

    let mut query = game.world.query::<&GhostAgent>();
    let targets: Vec<_> = query.iter(&game.world).map(|agent| (agent.behavior, agent.target)).collect();
    let map = game.world.resource::<MapDirectory>();
    for (behavior, target) in targets {
        assert_eq!(behavior, GhostBehavior::Frightened);
        assert!(map.is_corner(target.expect("frightened always has a corner target")));
    }
}

#[test]
fn test_eaten_ghosts_come_back_out() {
    let mut game = game(&TEST_BOARD);

    start_round(&mut game);
    run_ticks(&mut game, 8);

    let mut query = game.world.query::<&mut GhostAgent>();
    for mut agent in query.iter_mut(&mut game.world) {
        agent.change_behavior(GhostBehavior::Eaten);
    }

    run_ticks(&mut game, 60);

    for behavior in behaviors(&mut game) {
        assert_ne!(behavior, GhostBehavior::Eaten);
    }
}

#[test]
fn test_wandering_is_reproducible_for_a_seed() {
    let mut first = game(&TEST_BOARD);
    let mut second = game(&TEST_BOARD);

    for game in [&mut first, &mut second] {
        start_round(game);
        run_ticks(game, 12);
    }

    let mut query = first.world.query::<(&GhostAgent, &Position)>();
    let lhs: Vec<_> = query
        .iter(&first.world)
        .map(|(agent, position)| (agent.behavior, agent.target, position.world))
        .collect();
    let mut query = second.world.query::<(&GhostAgent, &Position)>();
    let rhs: Vec<_> = query
        .iter(&second.world)
        .map(|(agent, position)| (agent.behavior, agent.target, position.world))
        .collect();

    assert_eq!(lhs, rhs);
}

#[test]
fn test_chase_hop_redirects_when_the_player_moves() {
    let mut game = game(&GRID_BOARD);
    let (center, above, below) = {
        let map = game.world.resource::<MapDirectory>();
        (wp(map, 4, 8), wp(map, 4, 10), wp(map, 4, 6))
    };

    let player = player_entity(&mut game.world);
    place(&mut game, player, above, Vec2::new(4.0, 10.0));
    let ghost = first_ghost(&mut game);
    place(&mut game, ghost, center, Vec2::new(4.0, 8.0));
    game.world.resource_mut::<RoundState>().state = GameState::Playing;

    game.tick(0.1);
    assert_eq!(game.world.get::<GhostAgent>(ghost).unwrap().hop, Some(above));

    // The player jumps behind the ghost mid-hop; the route follows suit
    // on the very next tick instead of finishing the stale hop first.
    place(&mut game, player, below, Vec2::new(4.0, 6.0));
    game.tick(0.1);

    assert_eq!(game.world.get::<GhostAgent>(ghost).unwrap().hop, Some(below));
    let position = game.world.get::<Position>(ghost).unwrap();
    assert_that!(position.world.y).is_close_to(8.0, 1e-4);
}

#[test]
fn test_chasing_ghost_advances_one_waypoint_per_arrival() {
    let mut game = game(&GRID_BOARD);
    let route: Vec<WaypointId> = {
        let map = game.world.resource::<MapDirectory>();
        vec![
            wp(map, 2, 6),
            wp(map, 2, 8),
            wp(map, 2, 10),
            wp(map, 4, 10),
            wp(map, 6, 10),
        ]
    };
    let far_corner = *route.last().unwrap();

    let player = player_entity(&mut game.world);
    place(&mut game, player, far_corner, Vec2::new(6.0, 10.0));
    let ghost = first_ghost(&mut game);
    place(&mut game, ghost, route[0], Vec2::new(2.0, 6.0));
    game.world.resource_mut::<RoundState>().state = GameState::Playing;

    let mut visited = vec![route[0]];
    for _ in 0..30 {
        game.tick(0.1);
        let waypoint = game.world.get::<Position>(ghost).unwrap().waypoint;
        if *visited.last().unwrap() != waypoint {
            visited.push(waypoint);
        }
    }

    // Every arrival lands exactly one grid neighbor further along.
    assert_eq!(visited, route);
    let map = game.world.resource::<MapDirectory>();
    for pair in visited.windows(2) {
        let gap = map.waypoint(pair[0]).manhattan_distance(map.waypoint(pair[1]));
        assert_eq!(gap, 2);
    }
}

#[test]
fn test_eaten_ghost_drifts_home_at_the_frightened_pace() {
    let mut game = game(&TEST_BOARD);
    let (entrance, entrance_world) = {
        let map = game.world.resource::<MapDirectory>();
        let entrance = map.spawn.home_entrance;
        (entrance, map.waypoint(entrance).world_position)
    };

    let ghost = first_ghost(&mut game);
    place(&mut game, ghost, entrance, entrance_world);
    game.world
        .get_mut::<GhostAgent>(ghost)
        .unwrap()
        .change_behavior(GhostBehavior::Eaten);
    game.world.resource_mut::<RoundState>().state = GameState::Playing;

    game.tick(0.1);

    // 2.5 units/s over a 0.1s tick, not the faster eaten travel speed.
    let position = game.world.get::<Position>(ghost).unwrap();
    assert_that!(position.world.y).is_close_to(entrance_world.y - 0.25, 1e-4);
    assert_eq!(
        game.world.get::<GhostAgent>(ghost).unwrap().behavior,
        GhostBehavior::Eaten
    );
}
