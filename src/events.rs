//! The event bus shared by every gameplay system.
//!
//! The bus is split into four streams: commands flow in from the external
//! UI/input layer, collision events flow from the trigger check to its
//! consumers, gameplay facts flow into the round director, and round
//! broadcasts flow back out to the agents and external sinks. Each stream is
//! its own `bevy_ecs` event type so no system ever reads and writes the same
//! buffer.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::Event;

use crate::map::Direction;

/// A request from the outside world (input layer, UI buttons).
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    /// The resolved directional intent for this tick.
    Move(Direction),
    Pause,
    Resume,
    /// Full reset: score, lives, actors, round state.
    Restart,
}

/// Two trigger volumes overlapped this tick.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionEvent(pub Entity, pub Entity);

/// A gameplay fact for the round director to score and act on.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The player picked up a pellet; `power` marks a power pellet.
    PelletCollected { pellet: Entity, points: u32, power: bool },
    /// A frightened ghost was caught by the player. `points` is the base
    /// value; the round director applies the doubling sequence.
    GhostEaten { ghost: Entity, points: u32 },
    /// The player's first committed move of a life.
    GameStarted,
}

/// A round-lifecycle broadcast from the director, consumed by the agents and
/// by external observers.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    /// A power pellet opened the frightened window.
    PowerPelletActivated,
    /// The frightened window is about to close; ghosts start flashing.
    PowerPelletFading,
    /// The frightened window closed.
    PowerPelletDeactivated,
    /// Fired after the death delay elapses, once per caught player.
    PlayerDied,
    /// Actors must restore their captured level-start state.
    LevelReset,
    LevelCompleted,
}
