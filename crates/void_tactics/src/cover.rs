//! Cover search
//!
//! Candidates are walkable cells near the agent that the grid says the
//! threat cannot see. They are scored on the grid, then the best few are
//! confirmed with a physics ray from eye height to the threat's torso.

use crate::navigation::{NavCoord, NavGrid};
use crate::perception::{EYE_HEIGHT, TORSO_HEIGHT};
use glam::{Vec2, Vec3};
use void_collision::PhysicsQuery;

/// Candidates that get a physics confirmation ray
pub const VALIDATED_CANDIDATES: usize = 5;

/// A scored cover cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverCandidate {
    pub cell: NavCoord,
    pub score: f32,
}

/// Cover search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFinder {
    /// Chebyshev radius around the agent, in cells
    pub search_radius: i32,
    /// Minimum distance between cover and threat, in world units
    pub min_dist: f32,
}

impl CoverFinder {
    pub fn new(search_radius: i32, min_dist: f32) -> Self {
        Self {
            search_radius,
            min_dist,
        }
    }

    /// All grid-valid candidates, best first
    pub fn candidates(&self, grid: &NavGrid, agent_pos: Vec3, threat_pos: Vec3) -> Vec<CoverCandidate> {
        let agent_cell = grid.cell_of(agent_pos);
        let threat_cell = grid.cell_of(threat_pos);
        let min_cells = self.min_dist / grid.cell_size();

        let away = Vec2::new(
            (agent_cell.x - threat_cell.x) as f32,
            (agent_cell.z - threat_cell.z) as f32,
        )
        .normalize_or_zero();

        let r = self.search_radius;
        let mut candidates = Vec::new();
        for dz in -r..=r {
            for dx in -r..=r {
                let cell = NavCoord::new(agent_cell.x + dx, agent_cell.z + dz);
                if !grid.is_walkable(cell.x, cell.z) {
                    continue;
                }
                if grid.has_grid_los(cell, threat_cell) {
                    continue;
                }
                if cell != agent_cell && !grid.has_grid_los(agent_cell, cell) {
                    continue;
                }
                let d_threat = cell.distance(threat_cell);
                if d_threat < min_cells {
                    continue;
                }

                let d_agent = cell.distance(agent_cell);
                let away_dot = Vec2::new(dx as f32, dz as f32).normalize_or_zero().dot(away);
                let hugs_wall = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                    .iter()
                    .any(|&(nx, nz)| !grid.is_walkable(cell.x + nx, cell.z + nz));

                let score = 2.0 / (1.0 + d_agent)
                    + 1.5 * away_dot
                    + 0.1 * d_threat
                    + if hugs_wall { 1.5 } else { 0.0 };
                candidates.push(CoverCandidate { cell, score });
            }
        }

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates
    }

    /// Best confirmed cover position (cell center at ground Y).
    ///
    /// The top candidates are confirmed by a ray from the cell at eye height
    /// to the threat at torso height; a hit means something physical stands
    /// in between. Without physics the top candidate is taken as is. When
    /// none confirm, the next candidate after them is used unconfirmed.
    pub fn find_cover(
        &self,
        grid: &NavGrid,
        physics: Option<&dyn PhysicsQuery>,
        agent_pos: Vec3,
        threat_pos: Vec3,
    ) -> Option<Vec3> {
        let candidates = self.candidates(grid, agent_pos, threat_pos);
        let Some(best) = candidates.first() else {
            log::debug!("No cover candidates near {:?} against {:?}", agent_pos, threat_pos);
            return None;
        };

        let Some(physics) = physics else {
            return Some(grid.grid_to_world(best.cell));
        };

        let target = threat_pos + Vec3::Y * TORSO_HEIGHT;
        let confirmed = candidates
            .iter()
            .take(VALIDATED_CANDIDATES)
            .find(|c| {
                let eye = grid.grid_to_world(c.cell) + Vec3::Y * EYE_HEIGHT;
                !physics.segment_clear(eye, target)
            })
            .or_else(|| candidates.get(VALIDATED_CANDIDATES));

        match confirmed {
            Some(c) => {
                log::debug!("Cover at {:?} (score {:.2}) against {:?}", c.cell, c.score, threat_pos);
                Some(grid.grid_to_world(c.cell))
            }
            None => {
                log::debug!("Cover candidates near {:?} all exposed to {:?}", agent_pos, threat_pos);
                None
            }
        }
    }
}
