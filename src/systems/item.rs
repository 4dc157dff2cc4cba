use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    system::{Commands, Query, Res},
};
use bevy_ecs::entity::Entity;
use tracing::debug;

use crate::{
    events::{CollisionEvent, GameEvent},
    systems::components::{Pellet, PlayerControlled, RoundState},
};

/// Converts player-pellet overlaps into pickups.
///
/// The pellet despawn is queued here and applied before the round director
/// runs, so its remaining-pellet count never includes this tick's pickups.
/// Scoring and the power-pellet window are the director's job.
pub fn item_system(
    round: Res<RoundState>,
    players: Query<Entity, With<PlayerControlled>>,
    pellets: Query<&Pellet>,
    mut collisions: EventReader<CollisionEvent>,
    mut commands: Commands,
    mut events: EventWriter<GameEvent>,
) {
    if !round.is_playing() {
        return;
    }

    for &CollisionEvent(a, b) in collisions.read() {
        let other = if players.contains(a) {
            b
        } else if players.contains(b) {
            a
        } else {
            continue;
        };
        let Ok(pellet) = pellets.get(other) else { continue };

        debug!(pellet = ?other, points = pellet.points, power = pellet.power, "Pellet collected");
        events.write(GameEvent::PelletCollected {
            pellet: other,
            points: pellet.points,
            power: pellet.power,
        });
        commands.entity(other).despawn();
    }
}
