//! This module contains the game shell: world construction, entity spawning,
//! and the externally driven tick loop.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::{schedule::Schedule, world::World};
use strum::IntoEnumIterator;
use tracing::{error, info};

use crate::constants::{
    self, GHOST_COLLIDER_RADIUS, PELLET_COLLIDER_RADIUS, PELLET_POINTS, PLAYER_COLLIDER_RADIUS, PORTAL_TRIGGER_RADIUS,
    POWER_PELLET_POINTS, WAYPOINT_STEP,
};
use crate::error::{GameError, GameResult, MapError};
use crate::events::{CollisionEvent, GameCommand, GameEvent, RoundEvent};
use crate::map::{LevelLayout, MapDirectory};
use crate::pathfind::SearchScratch;
use crate::systems::collision::collision_system;
use crate::systems::components::{
    Collider, CollisionLayer, DeltaTime, GameClock, GameConfig, GameState, Ghost, GhostAgent, GhostBehavior,
    GhostBundle, InputIntent, Pellet, PelletBundle, PelletSeed, PelletSeeds, PlayerBundle, PlayerControlled,
    PlayerState, Portal, Position, RoundState, SpeedProfile, WanderRng,
};
use crate::systems::ghost::{ghost_contact_system, ghost_system};
use crate::systems::item::item_system;
use crate::systems::player::{player_control_system, player_movement_system};
use crate::systems::portal::{portal_system, PortalEffectState};
use crate::systems::round::round_director_system;
use crate::systems::timer::TimerQueue;

/// The `Game` struct is the main entry point for the simulation.
///
/// It owns the ECS world and the tick schedule; the embedding layer drives it
/// by queueing commands and calling [`Game::tick`] with a frame delta.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Builds a game on the default board.
    pub fn new() -> GameResult<Game> {
        let layout = LevelLayout::parse(&constants::RAW_BOARD, WAYPOINT_STEP)?;
        Game::from_layout(&layout, GameConfig::default())
    }

    /// Builds a game on an arbitrary parsed layout.
    pub fn from_layout(layout: &LevelLayout, config: GameConfig) -> GameResult<Game> {
        let mut world = World::default();
        let mut schedule = Schedule::default();

        EventRegistry::register_event::<GameError>(&mut world);
        EventRegistry::register_event::<GameCommand>(&mut world);
        EventRegistry::register_event::<CollisionEvent>(&mut world);
        EventRegistry::register_event::<GameEvent>(&mut world);
        EventRegistry::register_event::<RoundEvent>(&mut world);

        let map = MapDirectory::from_layout(layout)?;

        spawn_player(&mut world, &map);
        spawn_ghosts(&mut world, &map, &config);
        let seeds = spawn_pellets(&mut world, &map, layout)?;
        spawn_portals(&mut world, &map);

        world.insert_resource(WanderRng::from_config(&config));
        world.insert_resource(map);
        world.insert_resource(config);
        world.insert_resource(SearchScratch::new());
        world.insert_resource(RoundState::new(config.starting_lives));
        world.insert_resource(TimerQueue::default());
        world.insert_resource(GameClock::default());
        world.insert_resource(DeltaTime(0f32));
        world.insert_resource(InputIntent::default());
        world.insert_resource(PortalEffectState::default());
        world.insert_resource(PelletSeeds(seeds));

        schedule.add_systems(
            (
                player_control_system,
                player_movement_system,
                ghost_system,
                portal_system,
                collision_system,
                item_system,
                ghost_contact_system,
                round_director_system,
            )
                .chain(),
        );

        info!(waypoints = world.resource::<MapDirectory>().waypoint_count(), "Game ready");
        Ok(Game { world, schedule })
    }

    /// Queues a command for the next tick.
    pub fn queue_command(&mut self, command: GameCommand) {
        self.world.send_event(command);
    }

    /// Runs one simulation step.
    ///
    /// Events written during the step stay readable for exactly one more
    /// tick, so systems earlier in the chain (and external observers) see
    /// them on the following run.
    pub fn tick(&mut self, delta_seconds: f32) {
        self.world.insert_resource(DeltaTime(delta_seconds));
        self.schedule.run(&mut self.world);

        for err in self
            .world
            .resource_mut::<Events<GameError>>()
            .drain()
            .collect::<Vec<_>>()
        {
            error!("Game error: {}", err);
        }

        self.world.resource_mut::<Events<GameCommand>>().update();
        self.world.resource_mut::<Events<CollisionEvent>>().update();
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<RoundEvent>>().update();
    }

    pub fn score(&self) -> u32 {
        self.world.resource::<RoundState>().score
    }

    pub fn lives(&self) -> u8 {
        self.world.resource::<RoundState>().lives
    }

    pub fn state(&self) -> GameState {
        self.world.resource::<RoundState>().state
    }
}

fn spawn_player(world: &mut World, map: &MapDirectory) {
    let start = map.spawn.player;
    let start_world = map.waypoint(start).world_position;

    world.spawn(PlayerBundle {
        player: PlayerControlled,
        position: Position {
            waypoint: start,
            world: start_world,
        },
        state: PlayerState::at_start(start, start_world),
        collider: Collider {
            radius: PLAYER_COLLIDER_RADIUS,
            layer: CollisionLayer::PLAYER,
        },
    });
}

fn spawn_ghosts(world: &mut World, map: &MapDirectory, config: &GameConfig) {
    let entrance = map.spawn.home_entrance;
    let home_place = map.spawn.home_place;

    for ghost in Ghost::iter() {
        world.spawn(GhostBundle {
            ghost,
            position: Position {
                waypoint: entrance,
                world: home_place,
            },
            agent: GhostAgent {
                behavior: GhostBehavior::Scatter,
                target: None,
                hop: None,
                frightened_warning: false,
                home_entrance: entrance,
                home_place,
                start_waypoint: entrance,
                start_world: home_place,
            },
            speeds: SpeedProfile::from_player_speed(config.player_speed),
            collider: Collider {
                radius: GHOST_COLLIDER_RADIUS,
                layer: CollisionLayer::GHOST,
            },
        });
    }
}

fn spawn_pellets(world: &mut World, map: &MapDirectory, layout: &LevelLayout) -> GameResult<Vec<PelletSeed>> {
    let mut seeds = Vec::with_capacity(layout.pellets.len());

    for &(grid, power) in &layout.pellets {
        let waypoint = map
            .waypoint_at(grid)
            .ok_or(GameError::Map(MapError::WaypointNotFound(grid)))?;
        let seed = PelletSeed {
            waypoint,
            world: map.waypoint(waypoint).world_position,
            points: if power { POWER_PELLET_POINTS } else { PELLET_POINTS },
            power,
        };
        seeds.push(seed);

        world.spawn(PelletBundle {
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
    Ok(seeds)
}

fn spawn_portals(world: &mut World, map: &MapDirectory) {
    let Some((here, there)) = map.portal_pair else { return };

    for (waypoint, exit) in [(here, there), (there, here)] {
        world.spawn((
            Portal {
                waypoint,
                exit,
                incoming: Vec::new(),
            },
            Position {
                waypoint,
                world: map.waypoint(waypoint).world_position,
            },
            Collider {
                radius: PORTAL_TRIGGER_RADIUS,
                layer: CollisionLayer::PORTAL,
            },
        ));
    }
}
