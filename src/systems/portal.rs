use bevy_ecs::{
    entity::Entity,
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use tracing::info;

use crate::{
    map::{MapDirectory, WaypointId},
    systems::components::{Collider, GameConfig, GameClock, GameState, PlayerControlled, PlayerState, Portal, Position, RoundState},
    systems::timer::{TimerPurpose, TimerQueue},
};

/// Whether the teleport visual effect is currently live, for external
/// rendering. Set on every crossing, cleared by the effect timer.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PortalEffectState {
    pub active: bool,
}

/// Teleports the player between paired portal waypoints.
///
/// Crossing is trigger-based: entering a portal's volume snaps the player to
/// the paired exit. The exit portal remembers the player as incoming until
/// they leave its volume, so a crossing never bounces straight back. Ghosts
/// never use this path; their routes cross portals through the graph link.
pub fn portal_system(
    map: Res<MapDirectory>,
    config: Res<GameConfig>,
    clock: Res<GameClock>,
    round: Res<RoundState>,
    mut effect: ResMut<PortalEffectState>,
    mut timers: ResMut<TimerQueue>,
    mut portals: Query<(&mut Portal, &Position, &Collider)>,
    mut players: Query<(Entity, &mut Position, &mut PlayerState, &Collider), (With<PlayerControlled>, Without<Portal>)>,
) {
    if !matches!(round.state, GameState::Idle | GameState::Playing) {
        return;
    }
    let Ok((player, mut player_position, mut player_state, player_collider)) = players.single_mut() else {
        return;
    };

    // Resolve which portal, if any, the player is standing in first; the
    // teleport below mutates the exit portal's incoming set.
    let mut entered: Option<WaypointId> = None;
    for (mut portal, portal_position, portal_collider) in portals.iter_mut() {
        let distance = player_position.world.distance(portal_position.world);
        let overlapping = portal_collider.overlaps(player_collider, distance);

        if !overlapping {
            portal.incoming.retain(|&entity| entity != player);
        } else if !portal.incoming.contains(&player) && entered.is_none() {
            entered = Some(portal.exit);
        }
    }

    let Some(exit) = entered else { return };

    for (mut portal, _, _) in portals.iter_mut() {
        if portal.waypoint == exit {
            portal.incoming.push(player);
        }
    }

    player_position.waypoint = exit;
    player_position.world = map.waypoint(exit).world_position;
    // Dropping the in-flight hop lets the next movement tick carry the
    // player onward in the direction they were already heading.
    player_state.target = None;

    effect.active = true;
    timers.schedule(TimerPurpose::PortalEffect, clock.elapsed + config.portal_effect_duration);
    info!(exit_waypoint = exit, "Player crossed portal");
}
