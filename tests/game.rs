use speculoos::prelude::*;

use pacgrid::events::GameCommand;
use pacgrid::game::Game;
use pacgrid::map::Direction;
use pacgrid::systems::components::GameState;

mod common;
use common::{game, player_position, run_ticks, TEST_BOARD};

/// Ticking a fresh game must build and run the full schedule; every
/// system initializes and an idle world stays untouched.
#[test]
fn test_new_game_ticks_while_idle() {
    let mut game = Game::new().expect("default level should load");

    run_ticks(&mut game, 5);

    assert_eq!(game.state(), GameState::Idle);
    assert_eq!(game.score(), 0);
}

#[test]
fn test_pellet_pickup_scores_through_a_full_tick() {
    let mut game = game(&TEST_BOARD);
    let start = player_position(&mut game.world);

    // The pellet one hop to the left is swallowed mid-hop; the score lands
    // the same tick the overlap is reported.
    game.queue_command(GameCommand::Move(Direction::Left));
    run_ticks(&mut game, 4);

    assert_eq!(game.score(), 10);
    let arrived = player_position(&mut game.world);
    assert_ne!(arrived.waypoint, start.waypoint);
    assert_that(&arrived.world.x).is_close_to(start.world.x - 2.0, 1e-4);
}
