//! Shared straight-line movement toward a world-space target.

use glam::Vec2;

/// Advances `world` by up to `distance` toward `target`.
///
/// Returns `true` on arrival: the position snaps to the target once the
/// remaining distance falls within `threshold`, so an actor never overshoots
/// or oscillates around its goal.
pub fn step_towards(world: &mut Vec2, target: Vec2, distance: f32, threshold: f32) -> bool {
    let offset = target - *world;
    let remaining = offset.length();

    if remaining <= threshold || remaining <= distance {
        *world = target;
        return true;
    }

    *world += offset / remaining * distance;
    false
}
