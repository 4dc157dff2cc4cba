use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    system::{Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::{
    error::GameError,
    events::{GameCommand, GameEvent, RoundEvent},
    map::{Direction, MapDirectory},
    systems::components::{DeltaTime, GameConfig, GameState, InputIntent, PlayerControlled, PlayerState, Position, RoundState},
    systems::movement::step_towards,
};

/// Resolves player-facing commands into the persistent movement intent.
///
/// Movement commands overwrite [`InputIntent`] rather than queueing, matching
/// held-key input: only the latest direction matters. A movement command also
/// revives a dead player once the round has settled back to idle, and a level
/// reset restores the captured start state.
pub fn player_control_system(
    round: Res<RoundState>,
    mut intent: ResMut<InputIntent>,
    mut commands: EventReader<GameCommand>,
    mut round_events: EventReader<RoundEvent>,
    mut players: Query<(&mut PlayerState, &mut Position), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let (mut state, mut position) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player control: {}",
                e
            )));
            return;
        }
    };

    for event in round_events.read() {
        if matches!(event, RoundEvent::LevelReset) {
            position.waypoint = state.start_waypoint;
            position.world = state.start_world;
            state.reset();
            *intent = InputIntent(None);
            debug!("Player restored to start waypoint {}", state.start_waypoint);
        }
    }

    for command in commands.read() {
        if let GameCommand::Move(direction) = command {
            if !state.alive {
                // A keypress after the death sequence settles brings the
                // player back at the start waypoint.
                if round.state == GameState::Idle {
                    position.waypoint = state.start_waypoint;
                    position.world = state.start_world;
                    state.reset();
                    info!("Player revived at start waypoint {}", state.start_waypoint);
                }
                continue;
            }
            *intent = InputIntent(Some(*direction));
        }
    }
}

/// Moves the player one waypoint hop at a time.
///
/// While stopped, the current intent is tried first; if the adjacent waypoint
/// in that direction is missing or blocked, the last committed direction is
/// tried instead, so the player keeps sliding through corridors when a turn
/// is requested early. The first committed hop of a life announces the game
/// start.
pub fn player_movement_system(
    map: Res<MapDirectory>,
    config: Res<GameConfig>,
    delta_time: Res<DeltaTime>,
    round: Res<RoundState>,
    intent: Res<InputIntent>,
    mut players: Query<(&mut PlayerState, &mut Position), With<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
) {
    // Movement is live while idle so the first hop can start the round.
    if !matches!(round.state, GameState::Idle | GameState::Playing) {
        return;
    }

    for (mut state, mut position) in players.iter_mut() {
        if !state.alive {
            continue;
        }

        if state.target.is_none() {
            // A blocked neighbor counts as missing, so the missed-turn
            // fallback still fires next to a blocked cell.
            let passable = |direction: Direction| {
                map.neighbor_in_direction(position.waypoint, direction)
                    .filter(|&next| !map.waypoint(next).blocked)
                    .map(|next| (direction, next))
            };
            let committed = intent
                .0
                .and_then(passable)
                .or_else(|| state.moving_direction.and_then(passable));

            let Some((direction, next)) = committed else {
                continue;
            };

            state.target = Some(next);
            state.moving_direction = Some(direction);

            if !state.initial_move_done {
                state.initial_move_done = true;
                events.write(GameEvent::GameStarted);
            }
        }

        let Some(target) = state.target else { continue };
        let target_world = map.waypoint(target).world_position;
        let threshold = map.waypoint(target).distance_threshold;
        let distance = config.player_speed * delta_time.0;

        if step_towards(&mut position.world, target_world, distance, threshold) {
            position.waypoint = target;
            state.target = None;
        }
    }
}
