use bevy_ecs::{bundle::Bundle, component::Component, entity::Entity, resource::Resource};
use bitflags::bitflags;
use glam::Vec2;
use strum_macros::{Display, EnumIter};

use crate::constants::{
    CHASE_RANGE, CHASE_SPEED_FACTOR, DEATH_EVENT_DELAY, EATEN_SPEED_FACTOR, FRIGHTENED_SPEED_FACTOR, GHOST_BASE_POINTS,
    PLAYER_MOVE_SPEED, PORTAL_EFFECT_DURATION, POWER_PELLET_DURATION, POWER_PELLET_WARNING_WINDOW, SCATTER_SPEED_FACTOR,
    STARTING_LIVES,
};
use crate::map::{Direction, WaypointId};

/// A tag component for the entity controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// Where an actor is: the waypoint it last committed to, and its continuous
/// world position on the way there.
#[derive(Component, Debug, Clone, Copy)]
pub struct Position {
    pub waypoint: WaypointId,
    pub world: Vec2,
}

/// Movement and lifecycle state for the player.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerState {
    /// The last committed movement direction, kept for missed-turn fallback.
    pub moving_direction: Option<Direction>,
    /// The waypoint of an in-flight hop. `None` while stopped on a waypoint.
    pub target: Option<WaypointId>,
    pub alive: bool,
    /// Whether this life's first move has fired the game-started event.
    pub initial_move_done: bool,
    /// Captured level-start state, restored on a level reset.
    pub start_waypoint: WaypointId,
    pub start_world: Vec2,
}

impl PlayerState {
    pub fn at_start(start_waypoint: WaypointId, start_world: Vec2) -> Self {
        PlayerState {
            moving_direction: None,
            target: None,
            alive: true,
            initial_move_done: false,
            start_waypoint,
            start_world,
        }
    }

    /// Restores the captured level-start state.
    pub fn reset(&mut self) {
        *self = Self::at_start(self.start_waypoint, self.start_world);
    }
}

/// Which of the four ghosts this is. Purely identity: all ghosts share the
/// same behavior state machine.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Ghost {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

/// The behavior state of a ghost. Exactly one state is authoritative per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum GhostBehavior {
    /// Default state: wander toward random non-corner waypoints.
    #[default]
    Scatter,
    /// Player within chase range: target the player's waypoint every tick.
    Chase,
    /// Power pellet active: flee toward random corner waypoints.
    Frightened,
    /// Caught while frightened: return to the ghost house.
    Eaten,
}

/// Per-ghost behavior machine state.
#[derive(Component, Debug, Clone)]
pub struct GhostAgent {
    pub behavior: GhostBehavior,
    /// Current movement goal. Cleared on every behavior change so the next
    /// tick computes a fresh route.
    pub target: Option<WaypointId>,
    /// The waypoint of an in-flight hop. Held until arrival so a target
    /// change mid-hop cannot jitter the ghost between corridors.
    pub hop: Option<WaypointId>,
    /// Set while the frightened window is in its terminal warning phase;
    /// external rendering uses this for the color flash.
    pub frightened_warning: bool,
    /// The waypoint eaten ghosts path back to.
    pub home_entrance: WaypointId,
    /// World position inside the house that eaten ghosts drift to.
    pub home_place: Vec2,
    /// Captured level-start state, restored on a level reset.
    pub start_waypoint: WaypointId,
    pub start_world: Vec2,
}

impl GhostAgent {
    /// Switches behavior, invalidating any in-flight route plan.
    pub fn change_behavior(&mut self, behavior: GhostBehavior) {
        self.behavior = behavior;
        self.target = None;
        self.hop = None;
        self.frightened_warning = false;
    }
}

/// Movement speeds per behavior state, fixed at spawn as fractions of the
/// player's move speed.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpeedProfile {
    pub chase: f32,
    pub scatter: f32,
    pub frightened: f32,
    pub eaten: f32,
}

impl SpeedProfile {
    pub fn from_player_speed(player_speed: f32) -> Self {
        SpeedProfile {
            chase: player_speed * CHASE_SPEED_FACTOR,
            scatter: player_speed * SCATTER_SPEED_FACTOR,
            frightened: player_speed * FRIGHTENED_SPEED_FACTOR,
            eaten: player_speed * EATEN_SPEED_FACTOR,
        }
    }

    pub fn for_behavior(&self, behavior: GhostBehavior) -> f32 {
        match behavior {
            GhostBehavior::Chase => self.chase,
            GhostBehavior::Scatter => self.scatter,
            GhostBehavior::Frightened => self.frightened,
            GhostBehavior::Eaten => self.eaten,
        }
    }
}

bitflags! {
    /// Entity category for collision filtering.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CollisionLayer: u8 {
        const PLAYER = 1 << 0;
        const GHOST = 1 << 1;
        const PELLET = 1 << 2;
        const PORTAL = 1 << 3;
    }
}

/// A circular trigger volume around an entity's world position.
#[derive(Component, Debug, Clone, Copy)]
pub struct Collider {
    pub radius: f32,
    pub layer: CollisionLayer,
}

impl Collider {
    pub fn overlaps(&self, other: &Collider, distance: f32) -> bool {
        distance <= self.radius + other.radius
    }
}

/// A collectible pellet sitting on a waypoint.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pellet {
    pub points: u32,
    pub power: bool,
}

/// Where a pellet spawns, kept so a full restart can repopulate the board.
#[derive(Debug, Clone, Copy)]
pub struct PelletSeed {
    pub waypoint: WaypointId,
    pub world: Vec2,
    pub points: u32,
    pub power: bool,
}

/// The level's full pellet population at spawn time.
#[derive(Resource, Debug, Default)]
pub struct PelletSeeds(pub Vec<PelletSeed>);

/// One endpoint of a teleport pair.
#[derive(Component, Debug)]
pub struct Portal {
    /// The waypoint this portal sits on.
    pub waypoint: WaypointId,
    /// The waypoint of the paired exit portal.
    pub exit: WaypointId,
    /// Actors that arrived through the paired portal and have not yet left
    /// this trigger volume; they must not be bounced straight back.
    pub incoming: Vec<Entity>,
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub state: PlayerState,
    pub collider: Collider,
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub position: Position,
    pub agent: GhostAgent,
    pub speeds: SpeedProfile,
    pub collider: Collider,
}

#[derive(Bundle)]
pub struct PelletBundle {
    pub pellet: Pellet,
    pub position: Position,
    pub collider: Collider,
}

/// Coarse round lifecycle. Systems gate on this rather than being added and
/// removed from the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum GameState {
    /// Waiting for the player's first move of a life.
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
    LevelCompleted,
}

/// Score, lives, and the frightened-window bookkeeping for the current round.
#[derive(Resource, Debug, Clone, Copy)]
pub struct RoundState {
    pub state: GameState,
    pub score: u32,
    pub lives: u8,
    pub power_pellet_active: bool,
    /// Ghosts eaten since the frightened window opened; drives the doubling
    /// point sequence. Persists across a mid-window retrigger.
    pub ghosts_eaten: u32,
}

impl RoundState {
    pub fn new(lives: u8) -> Self {
        RoundState {
            state: GameState::Idle,
            score: 0,
            lives,
            power_pellet_active: false,
            ghosts_eaten: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new(STARTING_LIVES)
    }
}

/// Frame delta time in seconds, set by the external loop each tick.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DeltaTime(pub f32);

/// Simulation time in seconds. Advances only while the round is playing, so
/// scheduled timers freeze across pauses.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct GameClock {
    pub elapsed: f32,
}

/// The latest resolved directional intent. Persists until replaced, matching
/// held-key movement.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct InputIntent(pub Option<Direction>);

/// Tunable gameplay parameters. Defaults mirror [`crate::constants`].
#[derive(Resource, Debug, Clone, Copy)]
pub struct GameConfig {
    pub player_speed: f32,
    pub chase_range: f32,
    pub power_pellet_duration: f32,
    pub power_pellet_warning_window: f32,
    pub death_delay: f32,
    pub portal_effect_duration: f32,
    pub starting_lives: u8,
    pub ghost_base_points: u32,
    /// Seed for wander-target selection; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            player_speed: PLAYER_MOVE_SPEED,
            chase_range: CHASE_RANGE,
            power_pellet_duration: POWER_PELLET_DURATION,
            power_pellet_warning_window: POWER_PELLET_WARNING_WINDOW,
            death_delay: DEATH_EVENT_DELAY,
            portal_effect_duration: PORTAL_EFFECT_DURATION,
            starting_lives: STARTING_LIVES,
            ghost_base_points: GHOST_BASE_POINTS,
            rng_seed: None,
        }
    }
}

/// The RNG behind all wander-target selection. Seedable so ghost wandering is
/// reproducible in tests.
#[derive(Resource)]
pub struct WanderRng(pub rand::rngs::SmallRng);

impl WanderRng {
    pub fn from_config(config: &GameConfig) -> Self {
        use rand::SeedableRng;
        WanderRng(match config.rng_seed {
            Some(seed) => rand::rngs::SmallRng::seed_from_u64(seed),
            None => rand::rngs::SmallRng::from_os_rng(),
        })
    }
}
