//! Waypoint graph construction and queries.

use std::collections::HashMap;

use bevy_ecs::resource::Resource;
use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::constants::{DISTANCE_THRESHOLD, RAW_BOARD, WAYPOINT_STEP};
use crate::error::{GameResult, MapError};
use crate::map::direction::{Direction, DIRECTIONS};
use crate::map::parser::LevelLayout;
use crate::map::waypoint::{Waypoint, WaypointId};

/// Spawn metadata derived from the level layout.
pub struct SpawnPoints {
    /// The player's starting waypoint.
    pub player: WaypointId,
    /// The waypoint eaten ghosts path back to.
    pub home_entrance: WaypointId,
    /// World position inside the ghost house. Not a graph node; eaten ghosts
    /// drift here in a straight line from the entrance.
    pub home_place: glam::Vec2,
}

/// Owns every waypoint of the level, the grid-position index used to build
/// adjacency, and the four corner waypoints used by frightened wandering.
///
/// Built exactly once at level start; topology never changes during play.
#[derive(Resource)]
pub struct MapDirectory {
    waypoints: Vec<Waypoint>,
    grid_index: HashMap<IVec2, WaypointId>,
    corners: [WaypointId; 4],
    /// Non-corner, unblocked candidates for scatter wandering.
    wander_targets: Vec<WaypointId>,
    pub step: i32,
    pub spawn: SpawnPoints,
    pub portal_pair: Option<(WaypointId, WaypointId)>,
}

impl MapDirectory {
    /// Builds the directory for the default arena.
    pub fn new_default() -> GameResult<MapDirectory> {
        Self::from_layout(&LevelLayout::parse(&RAW_BOARD, WAYPOINT_STEP)?)
    }

    /// Builds the full waypoint graph from a parsed layout.
    ///
    /// Adjacency is computed from the grid index (four cardinal offsets of
    /// `±step`); portal links are authored, not computed, and bypass that
    /// rule. O(V) with O(1) neighbor lookups, run once per level.
    ///
    /// # Errors
    ///
    /// Duplicate grid positions, missing corner waypoints, and dangling
    /// player/home references are configuration errors that abort the load.
    pub fn from_layout(layout: &LevelLayout) -> GameResult<MapDirectory> {
        if layout.waypoints.is_empty() {
            return Err(MapError::Empty.into());
        }
        let step = layout.step;

        let mut waypoints: Vec<Waypoint> = layout
            .waypoints
            .iter()
            .map(|&world| Waypoint::new(world, DISTANCE_THRESHOLD))
            .collect();

        let mut grid_index = HashMap::with_capacity(waypoints.len());
        for (id, waypoint) in waypoints.iter().enumerate() {
            if grid_index.insert(waypoint.grid_position, id).is_some() {
                return Err(MapError::DuplicateGridPosition(waypoint.grid_position).into());
            }
        }

        for id in 0..waypoints.len() {
            let origin = waypoints[id].grid_position;
            for direction in DIRECTIONS {
                if let Some(&neighbor) = grid_index.get(&(origin + direction.offset(step))) {
                    waypoints[id].neighbors.push(neighbor);
                }
            }
        }

        for &grid in &layout.blocked {
            let id = *grid_index
                .get(&grid)
                .ok_or(MapError::WaypointNotFound(grid))?;
            waypoints[id].blocked = true;
        }

        // Portal links are two authored directed edges between non-adjacent nodes.
        let portal_pair = match layout.portal_pair {
            Some((entrance_grid, exit_grid)) => {
                let entrance = *grid_index
                    .get(&entrance_grid)
                    .ok_or(MapError::WaypointNotFound(entrance_grid))?;
                let exit = *grid_index
                    .get(&exit_grid)
                    .ok_or(MapError::WaypointNotFound(exit_grid))?;
                waypoints[entrance].portal = true;
                waypoints[exit].portal = true;
                waypoints[entrance].neighbors.push(exit);
                waypoints[exit].neighbors.push(entrance);
                Some((entrance, exit))
            }
            None => None,
        };

        let corners = Self::find_corners(&waypoints, &grid_index, step)?;

        let spawn = SpawnPoints {
            player: *grid_index
                .get(&layout.player_start)
                .ok_or(MapError::WaypointNotFound(layout.player_start))?,
            home_entrance: *grid_index
                .get(&layout.home_entrance)
                .ok_or(MapError::WaypointNotFound(layout.home_entrance))?,
            home_place: layout.home_place,
        };

        let wander_targets: Vec<WaypointId> = (0..waypoints.len())
            .filter(|&id| !corners.contains(&id) && !waypoints[id].blocked && !waypoints[id].portal)
            .collect();
        if wander_targets.is_empty() {
            return Err(MapError::NoWanderTargets.into());
        }

        debug!(
            waypoints = waypoints.len(),
            wander_targets = wander_targets.len(),
            has_portal = portal_pair.is_some(),
            "Waypoint graph built"
        );

        Ok(MapDirectory {
            waypoints,
            grid_index,
            corners,
            wander_targets,
            step,
            spawn,
            portal_pair,
        })
    }

    /// The four waypoints one step inside the extreme grid coordinates.
    fn find_corners(
        waypoints: &[Waypoint],
        grid_index: &HashMap<IVec2, WaypointId>,
        step: i32,
    ) -> GameResult<[WaypointId; 4]> {
        let min_x = waypoints.iter().map(|w| w.grid_position.x).min().unwrap_or(0) + step;
        let max_x = waypoints.iter().map(|w| w.grid_position.x).max().unwrap_or(0) - step;
        let min_y = waypoints.iter().map(|w| w.grid_position.y).min().unwrap_or(0) + step;
        let max_y = waypoints.iter().map(|w| w.grid_position.y).max().unwrap_or(0) - step;

        let mut corners = [0; 4];
        let positions = [
            IVec2::new(min_x, min_y),
            IVec2::new(min_x, max_y),
            IVec2::new(max_x, min_y),
            IVec2::new(max_x, max_y),
        ];
        for (slot, position) in corners.iter_mut().zip(positions) {
            *slot = *grid_index
                .get(&position)
                .ok_or(MapError::CornerNotFound(position))?;
        }
        Ok(corners)
    }

    /// Immutable access to a waypoint. Panics on an out-of-range id, which can
    /// only come from a startup-ordering bug, never from gameplay.
    pub fn waypoint(&self, id: WaypointId) -> &Waypoint {
        &self.waypoints[id]
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(id)
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Looks up a waypoint by exact grid position.
    pub fn waypoint_at(&self, grid: IVec2) -> Option<WaypointId> {
        self.grid_index.get(&grid).copied()
    }

    /// The grid neighbor one step away in `direction`, if any. Portal links
    /// are not cardinal offsets and never match here.
    pub fn neighbor_in_direction(&self, id: WaypointId, direction: Direction) -> Option<WaypointId> {
        let target = self.waypoints[id].grid_position + direction.offset(self.step);
        self.waypoints[id]
            .neighbors
            .iter()
            .copied()
            .find(|&neighbor| self.waypoints[neighbor].grid_position == target)
    }

    pub fn corners(&self) -> &[WaypointId; 4] {
        &self.corners
    }

    pub fn is_corner(&self, id: WaypointId) -> bool {
        self.corners.contains(&id)
    }

    /// A uniformly random corner waypoint, for frightened wandering.
    pub fn random_corner<R: Rng + ?Sized>(&self, rng: &mut R) -> WaypointId {
        *self.corners.choose(rng).expect("corner set is never empty")
    }

    /// A uniformly random non-corner waypoint, for scatter wandering.
    pub fn random_wander_target<R: Rng + ?Sized>(&self, rng: &mut R) -> WaypointId {
        *self
            .wander_targets
            .choose(rng)
            .expect("wander target set is never empty")
    }
}
