//! A* search over the waypoint graph.
//!
//! The search is the hot path of the game: it runs once per ghost per tick
//! while a route is stale. All per-search state lives in a [`SearchScratch`]
//! arena keyed by waypoint id and stamped with a generation counter, so a
//! search never allocates in steady state and never observes values left by a
//! previous run.

use bevy_ecs::resource::Resource;
use tracing::trace;

use crate::map::{MapDirectory, WaypointId};

const NO_WAYPOINT: WaypointId = usize::MAX;

/// Reusable per-search state: costs, back-pointers, open/closed membership.
///
/// One instance is shared by every search in the simulation; generation
/// stamping invalidates all of it at the start of each call.
#[derive(Resource, Default)]
pub struct SearchScratch {
    g: Vec<u32>,
    h: Vec<u32>,
    came_from: Vec<WaypointId>,
    opened: Vec<u32>,
    closed: Vec<u32>,
    open: Vec<WaypointId>,
    path: Vec<WaypointId>,
    generation: u32,
}

impl SearchScratch {
    pub fn new() -> SearchScratch {
        SearchScratch::default()
    }

    /// Finds a route from `start` to `goal`.
    ///
    /// The returned slice holds the waypoints from the node *after* `start`
    /// up to and including `goal`, in traversal order. It is empty when
    /// `start == goal` or when no route exists; an empty path is a normal
    /// outcome, never an error, and callers simply stand still for the tick.
    ///
    /// Costs are Manhattan distances in grid units measured from the fixed
    /// start (`g`) and goal (`h`); an edge between two portal waypoints costs
    /// zero. Ties on `f = g + h` resolve to the earliest-queued node, so
    /// results are deterministic. A node already queued is NOT relaxed when a
    /// cheaper route to it appears later; with portal shortcuts in play this
    /// can yield a path that is longer than optimal. Known limitation, kept
    /// deliberately.
    pub fn find_path(&mut self, map: &MapDirectory, start: WaypointId, goal: WaypointId) -> &[WaypointId] {
        self.path.clear();
        if start == goal {
            return &self.path;
        }

        self.reset(map.waypoint_count());
        self.g[start] = 0;
        self.h[start] = map.waypoint(start).manhattan_distance(map.waypoint(goal));
        self.came_from[start] = start;
        self.opened[start] = self.generation;
        self.open.push(start);

        while !self.open.is_empty() {
            let current = self.pop_best();
            self.closed[current] = self.generation;

            if current == goal {
                self.reconstruct(start, goal);
                return &self.path;
            }

            let current_is_portal = map.waypoint(current).portal;
            for index in 0..map.waypoint(current).neighbors.len() {
                let neighbor = map.waypoint(current).neighbors[index];
                let waypoint = map.waypoint(neighbor);
                if waypoint.blocked || self.closed[neighbor] == self.generation {
                    continue;
                }
                // First-seen cost and back-pointer stand; nodes already queued
                // are not updated.
                if self.opened[neighbor] == self.generation {
                    continue;
                }

                let (g, h) = if current_is_portal && waypoint.portal {
                    (0, 0)
                } else {
                    (
                        map.waypoint(start).manhattan_distance(waypoint),
                        map.waypoint(goal).manhattan_distance(waypoint),
                    )
                };
                self.g[neighbor] = g;
                self.h[neighbor] = h;
                self.came_from[neighbor] = current;
                self.opened[neighbor] = self.generation;
                self.open.push(neighbor);
            }
        }

        trace!(start, goal, "No route found");
        &self.path
    }

    /// Starts a fresh generation, growing the arenas to `capacity` waypoints.
    fn reset(&mut self, capacity: usize) {
        if self.g.len() < capacity {
            self.g.resize(capacity, 0);
            self.h.resize(capacity, 0);
            self.came_from.resize(capacity, NO_WAYPOINT);
            self.opened.resize(capacity, 0);
            self.closed.resize(capacity, 0);
        }
        self.open.clear();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Stamp wrap-around: flush stale stamps so nothing aliases.
            self.opened.fill(0);
            self.closed.fill(0);
            self.generation = 1;
        }
    }

    /// Removes and returns the open node with minimum `f = g + h`,
    /// preferring the earliest-queued node on ties.
    fn pop_best(&mut self) -> WaypointId {
        let mut best = 0;
        let mut best_f = u32::MAX;
        for (index, &id) in self.open.iter().enumerate() {
            let f = self.g[id] + self.h[id];
            if f < best_f {
                best = index;
                best_f = f;
            }
        }
        self.open.remove(best)
    }

    /// Walks back-pointers from `goal` to `start` and reverses the result.
    /// `start` itself is excluded from the path.
    fn reconstruct(&mut self, start: WaypointId, goal: WaypointId) {
        let mut current = goal;
        while current != start {
            self.path.push(current);
            current = self.came_from[current];
        }
        self.path.reverse();
    }
}
