use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use tracing::{debug, info, trace};

use crate::{
    constants::HOME_EPSILON,
    error::GameError,
    events::{CollisionEvent, GameEvent, RoundEvent},
    map::{MapDirectory, WaypointId},
    pathfind::SearchScratch,
    systems::components::{
        CollisionLayer, Collider, DeltaTime, GameConfig, GameClock, Ghost, GhostAgent, GhostBehavior, PlayerControlled,
        PlayerState, Position, RoundState, SpeedProfile, WanderRng,
    },
    systems::movement::step_towards,
    systems::timer::{TimerPurpose, TimerQueue},
};

/// Bounded draws when re-rolling a random target that landed on the ghost's
/// own waypoint.
const WANDER_REROLL_LIMIT: usize = 16;

/// Drives the ghost behavior machine: frightened-window reactions, the
/// chase-range check, per-behavior target selection, and route following.
///
/// Runs only while the round is playing; ghosts freeze in place otherwise.
pub fn ghost_system(
    map: Res<MapDirectory>,
    config: Res<GameConfig>,
    delta_time: Res<DeltaTime>,
    round: Res<RoundState>,
    mut rng: ResMut<WanderRng>,
    mut scratch: ResMut<SearchScratch>,
    mut events: EventReader<RoundEvent>,
    mut ghosts: Query<(&Ghost, &mut Position, &mut GhostAgent, &SpeedProfile)>,
    players: Query<&Position, (With<PlayerControlled>, Without<GhostAgent>)>,
) {
    // Frightened-window and reset reactions apply in any round state, so a
    // pause cannot swallow them.
    for event in events.read() {
        match event {
            RoundEvent::PowerPelletActivated => {
                for (ghost, _, mut agent, _) in ghosts.iter_mut() {
                    if agent.behavior != GhostBehavior::Eaten {
                        agent.change_behavior(GhostBehavior::Frightened);
                        trace!(ghost = %ghost, "Ghost frightened");
                    }
                }
            }
            RoundEvent::PowerPelletFading => {
                for (_, _, mut agent, _) in ghosts.iter_mut() {
                    if agent.behavior == GhostBehavior::Frightened {
                        agent.frightened_warning = true;
                    }
                }
            }
            RoundEvent::PowerPelletDeactivated => {
                for (ghost, _, mut agent, _) in ghosts.iter_mut() {
                    if agent.behavior == GhostBehavior::Frightened {
                        agent.change_behavior(GhostBehavior::Scatter);
                        trace!(ghost = %ghost, "Ghost recovered from frightened");
                    }
                }
            }
            RoundEvent::LevelReset => {
                for (ghost, mut position, mut agent, _) in ghosts.iter_mut() {
                    position.waypoint = agent.start_waypoint;
                    position.world = agent.start_world;
                    agent.change_behavior(GhostBehavior::Scatter);
                    debug!(ghost = %ghost, "Ghost restored to start waypoint");
                }
            }
            _ => {}
        }
    }

    if !round.is_playing() {
        return;
    }
    let Ok(player) = players.single() else { return };

    for (ghost, mut position, mut agent, speeds) in ghosts.iter_mut() {
        // Frightened and eaten ghosts ignore the player's proximity.
        if !matches!(agent.behavior, GhostBehavior::Frightened | GhostBehavior::Eaten) {
            let in_range = position.world.distance(player.world) <= config.chase_range;
            let wanted = if in_range { GhostBehavior::Chase } else { GhostBehavior::Scatter };
            if agent.behavior != wanted {
                agent.change_behavior(wanted);
                debug!(ghost = %ghost, behavior = %wanted, "Ghost behavior changed");
            }
        }

        match agent.behavior {
            GhostBehavior::Scatter => {
                if agent.target.is_none() || agent.target == Some(position.waypoint) {
                    agent.target = Some(reroll(position.waypoint, || map.random_wander_target(&mut rng.0)));
                }
            }
            GhostBehavior::Chase => {
                // The player's committed waypoint is the goal, refreshed
                // every tick.
                agent.target = Some(player.waypoint);
            }
            GhostBehavior::Frightened => {
                if agent.target.is_none() || agent.target == Some(position.waypoint) {
                    agent.target = Some(reroll(position.waypoint, || map.random_corner(&mut rng.0)));
                }
            }
            GhostBehavior::Eaten => {
                agent.target = Some(agent.home_entrance);
                if position.waypoint == agent.home_entrance && agent.hop.is_none() {
                    // Inside the house there is no graph; drift straight to
                    // the home spot at the slow frightened pace, then come
                    // back out scattering.
                    let speed = speeds.for_behavior(GhostBehavior::Frightened);
                    let home = agent.home_place;
                    if step_towards(&mut position.world, home, speed * delta_time.0, HOME_EPSILON) {
                        agent.change_behavior(GhostBehavior::Scatter);
                        info!(ghost = %ghost, "Ghost returned home");
                    }
                    continue;
                }
            }
        }

        follow_route(&map, &mut scratch, &mut position, &mut agent, speeds, delta_time.0);
    }
}

/// Draws targets until one differs from `current`, bounded so a degenerate
/// map cannot spin forever.
fn reroll(current: WaypointId, mut draw: impl FnMut() -> WaypointId) -> WaypointId {
    let mut pick = draw();
    for _ in 0..WANDER_REROLL_LIMIT {
        if pick != current {
            break;
        }
        pick = draw();
    }
    pick
}

/// Advances a ghost along the route to its current target, one hop at a time.
///
/// The route is refreshed every tick, so a moving target (the player's
/// waypoint under Chase) redirects the ghost mid-hop instead of waiting for
/// the next arrival. A pair of adjacent portal waypoints is crossed
/// instantly.
fn follow_route(
    map: &MapDirectory,
    scratch: &mut SearchScratch,
    position: &mut Position,
    agent: &mut GhostAgent,
    speeds: &SpeedProfile,
    delta: f32,
) {
    match agent.target {
        Some(target) if target != position.waypoint => {
            let path = scratch.find_path(map, position.waypoint, target);
            let Some(&next) = path.first() else {
                // No route; drop the target so the next tick picks a fresh
                // one, and stand still meanwhile.
                agent.target = None;
                agent.hop = None;
                return;
            };
            agent.hop = Some(next);
        }
        _ => {
            agent.target = None;
        }
    }

    let Some(hop) = agent.hop else { return };

    if map.waypoint(position.waypoint).portal && map.waypoint(hop).portal {
        position.waypoint = hop;
        position.world = map.waypoint(hop).world_position;
        agent.hop = None;
        return;
    }

    let hop_waypoint = map.waypoint(hop);
    let speed = speeds.for_behavior(agent.behavior);
    if step_towards(
        &mut position.world,
        hop_waypoint.world_position,
        speed * delta,
        hop_waypoint.distance_threshold,
    ) {
        position.waypoint = hop;
        agent.hop = None;
        if agent.target == Some(hop) {
            agent.target = None;
        }
    }
}

/// Resolves player/ghost contact out of this tick's collision events.
///
/// A frightened ghost is eaten and sent home; an eaten ghost passes through;
/// any other contact kills the player and schedules the delayed death event.
pub fn ghost_contact_system(
    config: Res<GameConfig>,
    clock: Res<GameClock>,
    round: Res<RoundState>,
    mut timers: ResMut<TimerQueue>,
    mut collisions: EventReader<CollisionEvent>,
    mut ghosts: Query<(Entity, &Ghost, &mut GhostAgent, &Collider)>,
    mut players: Query<(Entity, &mut PlayerState, &Collider), With<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
    mut errors: EventWriter<GameError>,
) {
    if !round.is_playing() {
        return;
    }
    let (player_entity, mut player_state, player_collider) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for ghost contact: {}",
                e
            )));
            return;
        }
    };
    debug_assert!(player_collider.layer.contains(CollisionLayer::PLAYER));

    for &CollisionEvent(a, b) in collisions.read() {
        let other = match (a == player_entity, b == player_entity) {
            (true, _) => b,
            (_, true) => a,
            _ => continue,
        };
        let Ok((ghost_entity, ghost, mut agent, _)) = ghosts.get_mut(other) else {
            continue;
        };

        match agent.behavior {
            GhostBehavior::Frightened => {
                agent.change_behavior(GhostBehavior::Eaten);
                events.write(GameEvent::GhostEaten {
                    ghost: ghost_entity,
                    points: config.ghost_base_points,
                });
                info!(ghost = %ghost, "Ghost eaten");
            }
            GhostBehavior::Eaten => {}
            _ => {
                if player_state.alive {
                    player_state.alive = false;
                    timers.schedule(TimerPurpose::PlayerDeath, clock.elapsed + config.death_delay);
                    info!(ghost = %ghost, "Player caught");
                }
            }
        }
    }
}
