use bevy_ecs::entity::Entity;

use pacgrid::events::{CollisionEvent, GameCommand, GameEvent};
use pacgrid::systems::components::{
    GameState, GhostAgent, GhostBehavior, Pellet, PlayerState, Position, RoundState,
};

mod common;
use common::{game, game_with, player_entity, player_position, run_ticks, seeded_config, TEST_BOARD};

fn set_playing(game: &mut pacgrid::game::Game) {
    game.world.resource_mut::<RoundState>().state = GameState::Playing;
}

fn any_ghost(game: &mut pacgrid::game::Game) -> Entity {
    let mut query = game.world.query::<(Entity, &GhostAgent)>();
    query.iter(&game.world).next().expect("ghosts exist").0
}

fn any_pellet(game: &mut pacgrid::game::Game) -> Entity {
    let mut query = game.world.query::<(Entity, &Pellet)>();
    query.iter(&game.world).next().expect("pellets exist").0
}

fn plain_pellet(game: &mut pacgrid::game::Game) -> Entity {
    let mut query = game.world.query::<(Entity, &Pellet)>();
    query
        .iter(&game.world)
        .find(|(_, pellet)| !pellet.power)
        .expect("plain pellets exist")
        .0
}

/// A config with a short frightened window so expiry fits in a few ticks.
fn short_window_config() -> pacgrid::systems::components::GameConfig {
    pacgrid::systems::components::GameConfig {
        power_pellet_duration: 0.5,
        power_pellet_warning_window: 0.2,
        ..seeded_config()
    }
}

#[test]
fn test_pellet_scoring_accumulates() {
    let mut game = game(&TEST_BOARD);
    set_playing(&mut game);

    let pellet = any_pellet(&mut game);
    game.world.send_event(GameEvent::PelletCollected {
        pellet,
        points: 10,
        power: false,
    });
    game.tick(0.1);
    game.world.send_event(GameEvent::PelletCollected {
        pellet,
        points: 10,
        power: false,
    });
    game.tick(0.1);

    assert_eq!(game.score(), 20);
    assert!(!game.world.resource::<RoundState>().power_pellet_active);
}

#[test]
fn test_power_pellet_opens_and_closes_the_window() {
    let mut game = game_with(&TEST_BOARD, short_window_config());
    set_playing(&mut game);

    let pellet = any_pellet(&mut game);
    game.world.send_event(GameEvent::PelletCollected {
        pellet,
        points: 50,
        power: true,
    });
    game.tick(0.1);

    assert_eq!(game.score(), 50);
    assert!(game.world.resource::<RoundState>().power_pellet_active);

    // The activation event reaches the ghosts on the following tick.
    game.tick(0.1);
    let mut query = game.world.query::<&GhostAgent>();
    assert!(query
        .iter(&game.world)
        .all(|agent| agent.behavior == GhostBehavior::Frightened));

    // Fade warning at 0.3s, expiry at 0.5s, reaction one tick later.
    run_ticks(&mut game, 4);

    let round = game.world.resource::<RoundState>();
    assert!(!round.power_pellet_active);
    assert_eq!(round.ghosts_eaten, 0);
    let mut query = game.world.query::<&GhostAgent>();
    assert!(query
        .iter(&game.world)
        .all(|agent| agent.behavior != GhostBehavior::Frightened));
}

#[test]
fn test_retrigger_extends_the_window_and_keeps_the_streak() {
    let mut game = game_with(&TEST_BOARD, short_window_config());
    set_playing(&mut game);

    let pellet = any_pellet(&mut game);
    game.world.send_event(GameEvent::PelletCollected {
        pellet,
        points: 50,
        power: true,
    });
    game.tick(0.1);
    game.world.resource_mut::<RoundState>().ghosts_eaten = 2;

    // Retrigger at 0.3s pushes expiry out to 0.8s.
    run_ticks(&mut game, 2);
    game.world.send_event(GameEvent::PelletCollected {
        pellet,
        points: 50,
        power: true,
    });
    game.tick(0.1);

    // Past the original deadline the window is still open and the eaten
    // streak survives.
    run_ticks(&mut game, 2);
    let round = game.world.resource::<RoundState>();
    assert!(round.power_pellet_active);
    assert_eq!(round.ghosts_eaten, 2);

    run_ticks(&mut game, 4);
    let round = game.world.resource::<RoundState>();
    assert!(!round.power_pellet_active);
    assert_eq!(round.ghosts_eaten, 0);
}

#[test]
fn test_ghost_points_double_per_streak() {
    let mut game = game(&TEST_BOARD);
    set_playing(&mut game);

    let ghost = any_ghost(&mut game);
    for _ in 0..3 {
        game.world.send_event(GameEvent::GhostEaten { ghost, points: 200 });
    }
    game.tick(0.1);

    // 200 + 400 + 800.
    assert_eq!(game.score(), 1400);
    assert_eq!(game.world.resource::<RoundState>().ghosts_eaten, 3);
}

#[test]
fn test_player_death_costs_a_life_and_resets_the_level() {
    let mut game = game(&TEST_BOARD);
    set_playing(&mut game);
    let start = player_position(&mut game.world);

    let player = player_entity(&mut game.world);
    let ghost = any_ghost(&mut game);
    game.world.send_event(CollisionEvent(player, ghost));
    game.tick(0.1);

    let state = *game.world.get::<PlayerState>(player).unwrap();
    assert!(!state.alive);
    assert_eq!(game.lives(), 3, "life is lost when the death event fires, not on contact");

    // The death event fires after the 2 second delay; the reset reaches the
    // actors one tick later.
    run_ticks(&mut game, 21);
    assert_eq!(game.lives(), 2);
    assert_eq!(game.state(), GameState::Idle);

    game.tick(0.1);
    let state = *game.world.get::<PlayerState>(player).unwrap();
    assert!(state.alive);
    let position = player_position(&mut game.world);
    assert_eq!(position.waypoint, start.waypoint);
    assert_eq!(position.world, start.world);
}

#[test]
fn test_game_over_on_last_life() {
    let mut game = game(&TEST_BOARD);
    set_playing(&mut game);
    game.world.resource_mut::<RoundState>().lives = 1;

    let player = player_entity(&mut game.world);
    let ghost = any_ghost(&mut game);
    game.world.send_event(CollisionEvent(player, ghost));
    run_ticks(&mut game, 22);

    assert_eq!(game.lives(), 0);
    assert_eq!(game.state(), GameState::GameOver);
    let state = *game.world.get::<PlayerState>(player).unwrap();
    assert!(!state.alive);
}

#[test]
fn test_collecting_the_last_pellet_completes_the_level() {
    let mut game = game(&TEST_BOARD);
    set_playing(&mut game);

    // Strip the board down to a single plain pellet sitting on the player.
    let keep = plain_pellet(&mut game);
    let pellet_entities: Vec<Entity> = {
        let mut query = game.world.query::<(Entity, &Pellet)>();
        query.iter(&game.world).map(|(entity, _)| entity).collect()
    };
    for entity in pellet_entities {
        if entity != keep {
            game.world.despawn(entity);
        }
    }
    let player_world = player_position(&mut game.world).world;
    game.world.get_mut::<Position>(keep).unwrap().world = player_world;

    game.tick(0.1);

    assert_eq!(game.state(), GameState::LevelCompleted);
    assert_eq!(game.score(), 10);
}

#[test]
fn test_restart_restores_the_round() {
    let mut game = game(&TEST_BOARD);
    set_playing(&mut game);

    let pellet_count = {
        let mut query = game.world.query::<&Pellet>();
        query.iter(&game.world).count()
    };

    // Make a mess: score, a collected pellet, a lost life.
    let pellet = any_pellet(&mut game);
    game.world.send_event(GameEvent::PelletCollected {
        pellet,
        points: 10,
        power: false,
    });
    game.tick(0.1);
    game.world.despawn(pellet);
    game.world.resource_mut::<RoundState>().lives = 1;

    game.queue_command(GameCommand::Restart);
    game.tick(0.1);

    assert_eq!(game.score(), 0);
    assert_eq!(game.lives(), 3);
    assert_eq!(game.state(), GameState::Idle);
    let restored = {
        let mut query = game.world.query::<&Pellet>();
        query.iter(&game.world).count()
    };
    assert_eq!(restored, pellet_count);
}

#[test]
fn test_pause_and_resume() {
    let mut game = game(&TEST_BOARD);
    set_playing(&mut game);

    game.queue_command(GameCommand::Pause);
    game.tick(0.1);
    assert_eq!(game.state(), GameState::Paused);

    game.queue_command(GameCommand::Resume);
    game.tick(0.1);
    assert_eq!(game.state(), GameState::Playing);
}
