use std::time::Duration;

use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use pacgrid::events::GameCommand;
use pacgrid::game::Game;
use pacgrid::map::Direction;
use pacgrid::systems::components::GameState;

/// Runs a short scripted round against the default board, printing the
/// resulting score and state. Mostly useful as a smoke test and a usage
/// sketch for embedders.
fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish()
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber)?;

    let mut game = Game::new()?;
    let tick = Duration::from_millis(16).as_secs_f32();

    // Walk the opening corridor, then let the simulation run for a while.
    let script = [
        (Direction::Right, 60),
        (Direction::Up, 120),
        (Direction::Left, 120),
        (Direction::Down, 120),
    ];

    for (direction, ticks) in script {
        game.queue_command(GameCommand::Move(direction));
        for _ in 0..ticks {
            game.tick(tick);
            if matches!(game.state(), GameState::GameOver | GameState::LevelCompleted) {
                break;
            }
        }
    }

    println!(
        "state={} score={} lives={}",
        game.state(),
        game.score(),
        game.lives()
    );
    Ok(())
}
