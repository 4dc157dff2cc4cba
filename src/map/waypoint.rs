use glam::{IVec2, Vec2};
use smallvec::SmallVec;

/// A unique identifier for a waypoint, represented by its index in the
/// directory's dense storage.
pub type WaypointId = usize;

/// A node in the discrete movement grid graph.
///
/// Topology is immutable after level load. A* search state (`g`, `h`,
/// back-pointers) deliberately does NOT live here; it belongs to the
/// [`SearchScratch`](crate::pathfind::SearchScratch) arena of whichever search
/// is currently running, so the graph stays read-only during play.
#[derive(Debug, Clone)]
pub struct Waypoint {
    /// Integer grid coordinates, derived once from the world position.
    pub grid_position: IVec2,
    /// World-space coordinates used by movement code.
    pub world_position: Vec2,
    /// Adjacent waypoints. Cardinal grid neighbors plus any authored portal links.
    pub neighbors: SmallVec<[WaypointId; 4]>,
    /// Excludes this node from pathfinding entirely.
    pub blocked: bool,
    /// Marks a teleport-pair node; the edge between two portal nodes costs zero.
    pub portal: bool,
    /// Arrival tolerance in world units, shared by all movement code.
    pub distance_threshold: f32,
}

impl Waypoint {
    pub fn new(world_position: Vec2, distance_threshold: f32) -> Self {
        Waypoint {
            grid_position: world_position.round().as_ivec2(),
            world_position,
            neighbors: SmallVec::new(),
            blocked: false,
            portal: false,
            distance_threshold,
        }
    }

    /// Manhattan distance to another waypoint, in grid units.
    pub fn manhattan_distance(&self, other: &Waypoint) -> u32 {
        let delta = self.grid_position - other.grid_position;
        (delta.x.unsigned_abs() + delta.y.unsigned_abs()) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_position_rounds_world_position() {
        let wp = Waypoint::new(Vec2::new(3.9, -1.2), 0.15);
        assert_eq!(wp.grid_position, IVec2::new(4, -1));
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Waypoint::new(Vec2::new(0.0, 0.0), 0.15);
        let b = Waypoint::new(Vec2::new(4.0, 6.0), 0.15);
        assert_eq!(a.manhattan_distance(&b), 10);
        assert_eq!(b.manhattan_distance(&a), 10);
        assert_eq!(a.manhattan_distance(&a), 0);
    }
}
