use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::With,
    system::{Query, Res},
};
use tracing::trace;

use crate::{
    events::CollisionEvent,
    systems::components::{Collider, CollisionLayer, PlayerControlled, PlayerState, Position, RoundState},
};

/// Detects trigger overlaps between the player and everything else.
///
/// Collision is purely radial: two volumes overlap when the distance between
/// their world positions is within the sum of their radii. Only player-vs-X
/// pairs matter to gameplay, so that is all this checks. One event fires per
/// overlapping pair per tick; downstream consumers are idempotent about it.
pub fn collision_system(
    round: Res<RoundState>,
    players: Query<(Entity, &Position, &Collider, &PlayerState), With<PlayerControlled>>,
    others: Query<(Entity, &Position, &Collider)>,
    mut events: EventWriter<CollisionEvent>,
) {
    if !round.is_playing() {
        return;
    }

    for (player, player_position, player_collider, state) in players.iter() {
        if !state.alive {
            continue;
        }
        for (other, other_position, other_collider) in others.iter() {
            // Portals run their own trigger logic with enter/leave tracking.
            if other == player
                || other_collider.layer.contains(CollisionLayer::PLAYER)
                || other_collider.layer.contains(CollisionLayer::PORTAL)
            {
                continue;
            }
            let distance = player_position.world.distance(other_position.world);
            if player_collider.overlaps(other_collider, distance) {
                trace!(player = ?player, other = ?other, distance, "Trigger overlap");
                events.write(CollisionEvent(player, other));
            }
        }
    }
}
