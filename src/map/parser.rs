//! ASCII board parsing.
//!
//! A board is a list of equal-width rows, one character per grid cell, with
//! cells [`step`](crate::constants::WAYPOINT_STEP) world units apart. The
//! bottom row of the board sits at world `y = 0` so `Up` means increasing `y`.

use glam::{IVec2, Vec2};

use crate::error::{GameResult, ParseError};

/// Everything the map builder needs to know about a level, extracted from the
/// raw board. World data only; no graph structure yet.
#[derive(Debug, Clone)]
pub struct LevelLayout {
    /// Grid spacing between adjacent waypoints, in world units.
    pub step: i32,
    /// World positions of every waypoint cell.
    pub waypoints: Vec<Vec2>,
    /// Grid positions of waypoints excluded from pathfinding.
    pub blocked: Vec<IVec2>,
    /// Grid position and power flag of every pellet.
    pub pellets: Vec<(IVec2, bool)>,
    /// Grid position of the player's starting waypoint.
    pub player_start: IVec2,
    /// Grid position of the ghost-house entrance waypoint.
    pub home_entrance: IVec2,
    /// World position of the ghost-house interior. Not part of the graph;
    /// eaten ghosts drift here in a straight line after reaching the entrance.
    pub home_place: Vec2,
    /// Authored portal pair, if the board has one. Traversal between the two
    /// endpoints costs zero.
    pub portal_pair: Option<(IVec2, IVec2)>,
}

impl LevelLayout {
    /// Parses a raw board into a layout.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unknown characters, a missing player
    /// start, a missing ghost house, or an unpaired portal endpoint.
    pub fn parse(rows: &[&str], step: i32) -> GameResult<LevelLayout> {
        let height = rows.len();
        let mut waypoints = Vec::new();
        let mut blocked = Vec::new();
        let mut pellets = Vec::new();
        let mut player_start = None;
        let mut home_entrance = None;
        let mut home_place = None;
        let mut portals = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            for (col_index, cell) in row.chars().enumerate() {
                let grid = IVec2::new(
                    col_index as i32 * step,
                    (height - 1 - row_index) as i32 * step,
                );
                let world = grid.as_vec2();

                match cell {
                    '#' | ' ' => continue,
                    '.' => {
                        waypoints.push(world);
                        pellets.push((grid, false));
                    }
                    'o' => {
                        waypoints.push(world);
                        pellets.push((grid, true));
                    }
                    '*' => waypoints.push(world),
                    'x' => {
                        waypoints.push(world);
                        blocked.push(grid);
                    }
                    'P' => {
                        waypoints.push(world);
                        player_start = Some(grid);
                    }
                    'E' => {
                        waypoints.push(world);
                        home_entrance = Some(grid);
                    }
                    'H' => home_place = Some(world),
                    '1' | '2' => {
                        waypoints.push(world);
                        portals.push(grid);
                    }
                    unknown => return Err(ParseError::UnknownCharacter(unknown).into()),
                }
            }
        }

        let portal_pair = match portals.len() {
            0 => None,
            2 => Some((portals[0], portals[1])),
            count => return Err(ParseError::UnpairedPortal(count).into()),
        };

        Ok(LevelLayout {
            step,
            waypoints,
            blocked,
            pellets,
            player_start: player_start.ok_or(ParseError::MissingPlayerStart)?,
            home_entrance: home_entrance.ok_or(ParseError::MissingHomeEntrance)?,
            home_place: home_place.ok_or(ParseError::MissingHomePlace)?,
            portal_pair,
        })
    }
}
