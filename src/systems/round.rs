//! The round director: score, lives, the frightened window, and the round
//! lifecycle state machine.
//!
//! Every other system emits facts (a pellet was collected, a ghost was
//! eaten); this one decides what they mean for the round. It is the only
//! writer of [`RoundState`].

use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, info, warn};

use crate::{
    constants::PELLET_COLLIDER_RADIUS,
    events::{GameCommand, GameEvent, RoundEvent},
    systems::components::{
        Collider, CollisionLayer, DeltaTime, GameClock, GameConfig, GameState, Pellet, PelletBundle, PelletSeeds,
        Position, RoundState,
    },
    systems::portal::PortalEffectState,
    systems::timer::{TimerPurpose, TimerQueue},
};

pub fn round_director_system(
    config: Res<GameConfig>,
    delta_time: Res<DeltaTime>,
    seeds: Res<PelletSeeds>,
    mut clock: ResMut<GameClock>,
    mut round: ResMut<RoundState>,
    mut timers: ResMut<TimerQueue>,
    mut portal_effect: ResMut<PortalEffectState>,
    mut commands_in: EventReader<GameCommand>,
    mut events_in: EventReader<GameEvent>,
    pellets: Query<(Entity, &Pellet)>,
    mut commands: Commands,
    mut events: EventWriter<RoundEvent>,
) {
    for command in commands_in.read() {
        match command {
            GameCommand::Pause => {
                if round.state == GameState::Playing {
                    round.state = GameState::Paused;
                    info!("Game paused");
                }
            }
            GameCommand::Resume => {
                if round.state == GameState::Paused {
                    round.state = GameState::Playing;
                    info!("Game resumed");
                }
            }
            GameCommand::Restart => {
                restart_round(&config, &seeds, &mut round, &mut timers, &mut portal_effect, &pellets, &mut commands);
                events.write(RoundEvent::LevelReset);
                info!("Game restarted");
            }
            GameCommand::Move(_) => {}
        }
    }

    for event in events_in.read() {
        match *event {
            GameEvent::GameStarted => {
                if round.state == GameState::Idle {
                    round.state = GameState::Playing;
                    info!("Round started");
                }
            }
            GameEvent::PelletCollected { points, power, .. } => {
                round.score += points;
                debug!(score = round.score, "Score updated");

                if power {
                    round.power_pellet_active = true;
                    events.write(RoundEvent::PowerPelletActivated);
                    // Retriggering mid-window pushes both deadlines out;
                    // the eaten counter keeps running.
                    timers.schedule(TimerPurpose::PowerPelletEnd, clock.elapsed + config.power_pellet_duration);
                    timers.schedule(
                        TimerPurpose::PowerPelletFade,
                        clock.elapsed + config.power_pellet_duration - config.power_pellet_warning_window,
                    );
                }

                // The collected pellet is already despawned by this point.
                if pellets.is_empty() {
                    round.state = GameState::LevelCompleted;
                    events.write(RoundEvent::LevelCompleted);
                    info!(score = round.score, "Level completed");
                }
            }
            GameEvent::GhostEaten { points, .. } => {
                let awarded = points << round.ghosts_eaten.min(8);
                round.score += awarded;
                round.ghosts_eaten += 1;
                info!(awarded, streak = round.ghosts_eaten, "Ghost eaten");
            }
        }
    }

    // Timers run against the game clock, which only advances mid-round, so
    // pending deadlines freeze across pauses and menus.
    if !round.is_playing() {
        return;
    }
    clock.elapsed += delta_time.0;

    for purpose in timers.fire_due(clock.elapsed) {
        match purpose {
            TimerPurpose::PowerPelletFade => {
                events.write(RoundEvent::PowerPelletFading);
            }
            TimerPurpose::PowerPelletEnd => {
                round.power_pellet_active = false;
                round.ghosts_eaten = 0;
                events.write(RoundEvent::PowerPelletDeactivated);
                debug!("Frightened window closed");
            }
            TimerPurpose::PlayerDeath => {
                round.lives = round.lives.saturating_sub(1);
                events.write(RoundEvent::PlayerDied);

                if round.lives == 0 {
                    round.state = GameState::GameOver;
                    info!(score = round.score, "Game over");
                } else {
                    round.state = GameState::Idle;
                    events.write(RoundEvent::LevelReset);
                    info!(lives = round.lives, "Player died, round reset");
                }
                // A death swallows any frightened window still open.
                round.power_pellet_active = false;
                round.ghosts_eaten = 0;
                timers.cancel(TimerPurpose::PowerPelletFade);
                timers.cancel(TimerPurpose::PowerPelletEnd);
            }
            TimerPurpose::PortalEffect => {
                portal_effect.active = false;
            }
        }
    }
}

fn restart_round(
    config: &GameConfig,
    seeds: &PelletSeeds,
    round: &mut RoundState,
    timers: &mut TimerQueue,
    portal_effect: &mut PortalEffectState,
    pellets: &Query<(Entity, &Pellet)>,
    commands: &mut Commands,
) {
    *round = RoundState::new(config.starting_lives);
    timers.clear();
    portal_effect.active = false;

    if seeds.0.is_empty() {
        warn!("No pellet seeds recorded, board will stay empty");
    }

    // Repopulate the board from the recorded spawn set.
    for (entity, _) in pellets.iter() {
        commands.entity(entity).despawn();
    }
    for seed in &seeds.0 {
        commands.spawn(PelletBundle {
            pellet: Pellet {
                points: seed.points,
                power: seed.power,
            },
            position: Position {
                waypoint: seed.waypoint,
                world: seed.world,
            },
            collider: Collider {
                radius: PELLET_COLLIDER_RADIUS,
                layer: CollisionLayer::PELLET,
            },
        });
    }
}
