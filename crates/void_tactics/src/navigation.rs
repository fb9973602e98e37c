//! Navigation grid and pathfinding
//!
//! A flat walkability grid laid on the ground plane. Cell `(x, z)` covers
//! `[origin + x * cell, origin + (x + 1) * cell)` on each axis; anything
//! outside the grid reads as [`NavCell::Blocked`].

use crate::config::GridConfig;
use crate::debug::{Color, DebugSink};
use crate::error::{AiError, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::f32::consts::SQRT_2;
use void_collision::SceneEntity;

/// Walkability of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NavCell {
    #[default]
    Walkable,
    Blocked,
}

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NavCoord {
    pub x: i32,
    pub z: i32,
}

impl NavCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Euclidean distance in cells
    pub fn distance(self, other: NavCoord) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dz = (self.z - other.z) as f32;
        (dx * dx + dz * dz).sqrt()
    }

    /// Chebyshev distance in cells
    pub fn chebyshev(self, other: NavCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// Neighbor offsets: four cardinals first, then four diagonals
const NEIGHBORS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Octile distance
fn heuristic(a: NavCoord, b: NavCoord) -> f32 {
    let dx = (a.x - b.x).abs() as f32;
    let dz = (a.z - b.z).abs() as f32;
    dx.max(dz) + (SQRT_2 - 1.0) * dx.min(dz)
}

/// Open-set entry, ordered so the lowest `f` pops first
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    coord: NavCoord,
    g: f32,
    f: f32,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ties favour the node further along (larger g)
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
    }
}

/// 2D walkability grid on a fixed ground plane
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavGrid {
    width: i32,
    height: i32,
    cell_size: f32,
    origin_x: f32,
    origin_z: f32,
    ground_y: f32,
    cells: Vec<NavCell>,
    /// Enables [`NavGrid::debug_draw`]
    pub show_debug: bool,
}

impl NavGrid {
    /// Create a fully walkable grid
    pub fn new(width: i32, height: i32, cell_size: f32, origin_x: f32, origin_z: f32, ground_y: f32) -> Result<Self> {
        let mut grid = Self::default();
        grid.init(width, height, cell_size, origin_x, origin_z, ground_y)?;
        Ok(grid)
    }

    /// Create from a grid config block
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        Self::new(
            config.width,
            config.height,
            config.cell_size,
            config.origin_x,
            config.origin_z,
            config.ground_y,
        )
    }

    /// (Re)allocate `width * height` walkable cells
    pub fn init(&mut self, width: i32, height: i32, cell_size: f32, origin_x: f32, origin_z: f32, ground_y: f32) -> Result<()> {
        if width <= 0 || height <= 0 {
            return Err(AiError::InvalidGrid { width, height });
        }
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(AiError::InvalidCellSize(cell_size));
        }

        self.width = width;
        self.height = height;
        self.cell_size = cell_size;
        self.origin_x = origin_x;
        self.origin_z = origin_z;
        self.ground_y = ground_y;
        self.cells = vec![NavCell::Walkable; width as usize * height as usize];

        log::info!(
            "NavGrid initialized: {}x{}, cell_size={:.2}, origin=({:.1}, {:.1}), y={:.1}",
            width,
            height,
            cell_size,
            origin_x,
            origin_z,
            ground_y
        );
        Ok(())
    }

    /// Release all cells; every query afterwards reads Blocked
    pub fn shutdown(&mut self) {
        self.cells.clear();
        self.width = 0;
        self.height = 0;
        log::info!("NavGrid shut down");
    }

    // ==================== Accessors ====================

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin_x(&self) -> f32 {
        self.origin_x
    }

    pub fn origin_z(&self) -> f32 {
        self.origin_z
    }

    /// Y of the ground plane
    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    /// Row-major cell array (`z * width + x`)
    pub fn cells(&self) -> &[NavCell] {
        &self.cells
    }

    /// Number of blocked cells
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == NavCell::Blocked).count()
    }

    // ==================== Cell Access ====================

    pub fn in_bounds(&self, x: i32, z: i32) -> bool {
        x >= 0 && x < self.width && z >= 0 && z < self.height
    }

    fn index(&self, x: i32, z: i32) -> usize {
        z as usize * self.width as usize + x as usize
    }

    /// Set a cell; out-of-bounds writes are ignored
    pub fn set_cell(&mut self, x: i32, z: i32, cell: NavCell) {
        if self.in_bounds(x, z) {
            let index = self.index(x, z);
            self.cells[index] = cell;
        }
    }

    /// Read a cell; out-of-bounds reads are Blocked
    pub fn get_cell(&self, x: i32, z: i32) -> NavCell {
        if self.in_bounds(x, z) {
            self.cells[self.index(x, z)]
        } else {
            NavCell::Blocked
        }
    }

    pub fn is_walkable(&self, x: i32, z: i32) -> bool {
        self.get_cell(x, z) == NavCell::Walkable
    }

    fn walkable_at(&self, c: NavCoord) -> bool {
        self.is_walkable(c.x, c.z)
    }

    // ==================== World <-> Grid ====================

    /// Cell containing the world-space XZ point
    pub fn world_to_grid(&self, wx: f32, wz: f32) -> NavCoord {
        NavCoord {
            x: ((wx - self.origin_x) / self.cell_size).floor() as i32,
            z: ((wz - self.origin_z) / self.cell_size).floor() as i32,
        }
    }

    /// Cell containing `pos`, ignoring Y
    pub fn cell_of(&self, pos: Vec3) -> NavCoord {
        self.world_to_grid(pos.x, pos.z)
    }

    /// Cell center at ground Y
    pub fn grid_to_world(&self, coord: NavCoord) -> Vec3 {
        Vec3::new(
            self.origin_x + (coord.x as f32 + 0.5) * self.cell_size,
            self.ground_y,
            self.origin_z + (coord.z as f32 + 0.5) * self.cell_size,
        )
    }

    // ==================== Pathfinding ====================

    /// A* from `start` to `goal`, inclusive of both.
    ///
    /// Returns an empty path when either end is out of bounds, the goal is
    /// blocked, the goal is unreachable, or the search exceeds `2 * w * h`
    /// expansions.
    pub fn find_path(&self, start: NavCoord, goal: NavCoord, allow_diagonal: bool) -> Vec<NavCoord> {
        let max_iterations = (self.width as usize) * (self.height as usize) * 2;
        self.find_path_limited(start, goal, allow_diagonal, max_iterations)
    }

    /// [`find_path`](Self::find_path) with an explicit expansion budget
    pub fn find_path_limited(
        &self,
        start: NavCoord,
        goal: NavCoord,
        allow_diagonal: bool,
        max_iterations: usize,
    ) -> Vec<NavCoord> {
        if !self.in_bounds(start.x, start.z) || !self.in_bounds(goal.x, goal.z) {
            return Vec::new();
        }
        if !self.walkable_at(goal) {
            return Vec::new();
        }
        if start == goal {
            return vec![start];
        }

        let directions = if allow_diagonal { &NEIGHBORS[..] } else { &NEIGHBORS[..4] };

        let mut open = BinaryHeap::new();
        let mut g_score: HashMap<NavCoord, f32> = HashMap::new();
        let mut came_from: HashMap<NavCoord, NavCoord> = HashMap::new();

        g_score.insert(start, 0.0);
        open.push(OpenNode {
            coord: start,
            g: 0.0,
            f: heuristic(start, goal),
        });

        let mut iterations = 0;
        while let Some(current) = open.pop() {
            if iterations >= max_iterations {
                log::trace!("A* gave up after {} iterations ({:?} -> {:?})", iterations, start, goal);
                return Vec::new();
            }
            iterations += 1;

            if current.coord == goal {
                let mut path = vec![goal];
                let mut cursor = goal;
                while let Some(&prev) = came_from.get(&cursor) {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                log::trace!("A* found {} cells in {} iterations", path.len(), iterations);
                return path;
            }

            // Stale entry: a cheaper route was pushed after this one
            if g_score.get(&current.coord).is_some_and(|&g| current.g > g) {
                continue;
            }

            for (i, &(dx, dz)) in directions.iter().enumerate() {
                let next = NavCoord::new(current.coord.x + dx, current.coord.z + dz);
                if !self.walkable_at(next) {
                    continue;
                }

                let diagonal = i >= 4;
                if diagonal
                    && (!self.is_walkable(current.coord.x + dx, current.coord.z)
                        || !self.is_walkable(current.coord.x, current.coord.z + dz))
                {
                    continue;
                }

                let tentative = current.g + if diagonal { SQRT_2 } else { 1.0 };
                if g_score.get(&next).map_or(true, |&g| tentative < g) {
                    g_score.insert(next, tentative);
                    came_from.insert(next, current.coord);
                    open.push(OpenNode {
                        coord: next,
                        g: tentative,
                        f: tentative + heuristic(next, goal),
                    });
                }
            }
        }

        log::trace!("A* found no path {:?} -> {:?}", start, goal);
        Vec::new()
    }

    /// Path between world positions as smoothed cell centers at ground Y
    pub fn find_path_world(&self, start: Vec3, goal: Vec3, allow_diagonal: bool) -> Vec<Vec3> {
        let path = self.find_path(self.cell_of(start), self.cell_of(goal), allow_diagonal);
        self.smooth_path(&path)
            .into_iter()
            .map(|c| self.grid_to_world(c))
            .collect()
    }

    /// Drop intermediate waypoints that have grid LOS past them.
    ///
    /// Greedy: from each kept waypoint, jump to the farthest later waypoint
    /// still in sight.
    pub fn smooth_path(&self, path: &[NavCoord]) -> Vec<NavCoord> {
        if path.len() <= 2 {
            return path.to_vec();
        }

        let mut smoothed = vec![path[0]];
        let mut current = 0;
        while current < path.len() - 1 {
            let farthest = ((current + 2)..path.len())
                .rev()
                .find(|&test| self.has_grid_los(path[current], path[test]))
                .unwrap_or(current + 1);
            smoothed.push(path[farthest]);
            current = farthest;
        }
        smoothed
    }

    // ==================== Line of Sight ====================

    /// Supercover line of sight between two cells.
    ///
    /// Every cell the segment between the two cell centers touches must be
    /// walkable; the endpoints themselves are not tested. When the segment
    /// passes exactly through a cell corner, both cells sharing that corner
    /// count as touched. The result is symmetric in `a` and `b`.
    pub fn has_grid_los(&self, a: NavCoord, b: NavCoord) -> bool {
        let dx = b.x - a.x;
        let dz = b.z - a.z;
        let (nx, nz) = (dx.abs(), dz.abs());
        let (sx, sz) = (dx.signum(), dz.signum());

        let mut p = a;
        let (mut ix, mut iz) = (0, 0);
        while ix < nx || iz < nz {
            // Compare where the segment crosses the next vertical and
            // horizontal cell boundaries, in integer form
            let decision = (1 + 2 * ix) * nz - (1 + 2 * iz) * nx;
            if decision == 0 {
                if !self.is_walkable(p.x + sx, p.z) || !self.is_walkable(p.x, p.z + sz) {
                    return false;
                }
                p.x += sx;
                p.z += sz;
                ix += 1;
                iz += 1;
            } else if decision < 0 {
                p.x += sx;
                ix += 1;
            } else {
                p.z += sz;
                iz += 1;
            }

            if p != b && !self.walkable_at(p) {
                return false;
            }
        }
        true
    }

    /// [`NavGrid::has_grid_los`] between the cells containing two world points
    pub fn has_grid_los_world(&self, from: Vec3, to: Vec3) -> bool {
        self.has_grid_los(self.cell_of(from), self.cell_of(to))
    }

    // ==================== Obstacles ====================

    /// Block every cell whose center lies inside the XZ footprint.
    ///
    /// A footprint thinner than one cell on an axis still blocks the cell
    /// containing its center on that axis.
    pub fn block_box(&mut self, center: Vec3, half_extents: Vec3) {
        let (x0, x1) = self.center_span(center.x - half_extents.x, center.x + half_extents.x, self.origin_x);
        let (z0, z1) = self.center_span(center.z - half_extents.z, center.z + half_extents.z, self.origin_z);
        for z in z0..=z1 {
            for x in x0..=x1 {
                self.set_cell(x, z, NavCell::Blocked);
            }
        }
    }

    /// Inclusive range of cell indices whose centers lie in `[min, max]`
    fn center_span(&self, min: f32, max: f32, origin: f32) -> (i32, i32) {
        let lo = ((min - origin) / self.cell_size - 0.5).ceil() as i32;
        let hi = ((max - origin) / self.cell_size - 0.5).floor() as i32;
        if lo <= hi {
            (lo, hi)
        } else {
            let mid = (((min + max) * 0.5 - origin) / self.cell_size).floor() as i32;
            (mid, mid)
        }
    }

    /// Mark every cell walkable
    pub fn clear_grid(&mut self) {
        self.cells.fill(NavCell::Walkable);
    }

    /// Clear, then stamp every solid scene entity.
    ///
    /// Rotated entities are tested cell by cell against their oriented
    /// footprint, padded by half a cell.
    pub fn rebuild_from_entities(&mut self, entities: &[SceneEntity]) {
        self.clear_grid();
        for entity in entities.iter().filter(|e| e.is_solid()) {
            let half = entity.half_extents();
            if entity.has_rotation() {
                self.block_oriented(entity.position, half, entity);
            } else {
                self.block_box(entity.position, half);
            }
        }
        log::debug!(
            "NavGrid rebuilt from {} entities: {} of {} cells blocked",
            entities.len(),
            self.blocked_count(),
            self.cells.len()
        );
    }

    fn block_oriented(&mut self, center: Vec3, half: Vec3, entity: &SceneEntity) {
        let rot = entity.rotation_matrix();
        let axis_u = rot.x_axis;
        let axis_v = rot.z_axis;

        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
        let (mut min_z, mut max_z) = (f32::MAX, f32::MIN);
        for (su, sv) in corners {
            let p = center + axis_u * (su * half.x) + axis_v * (sv * half.z);
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_z = min_z.min(p.z);
            max_z = max_z.max(p.z);
        }

        let c0 = self.world_to_grid(min_x, min_z);
        let c1 = self.world_to_grid(max_x, max_z);
        let pad = self.cell_size * 0.5;

        for z in c0.z..=c1.z {
            for x in c0.x..=c1.x {
                let cell = self.grid_to_world(NavCoord::new(x, z));
                let dx = cell.x - center.x;
                let dz = cell.z - center.z;
                let proj_u = dx * axis_u.x + dz * axis_u.z;
                let proj_v = dx * axis_v.x + dz * axis_v.z;
                if proj_u.abs() <= half.x + pad && proj_v.abs() <= half.z + pad {
                    self.set_cell(x, z, NavCell::Blocked);
                }
            }
        }
    }

    // ==================== Debug ====================

    /// Grid lines and blocked-cell boxes, when `show_debug` is set
    pub fn debug_draw(&self, sink: &mut dyn DebugSink) {
        if !self.show_debug || self.cells.is_empty() {
            return;
        }

        let line_color = Color::rgba(0.4, 0.4, 0.4, 0.2);
        let blocked_color = Color::rgba(0.8, 0.2, 0.2, 0.5);
        let y = self.ground_y + 0.02;
        let total_w = self.width as f32 * self.cell_size;
        let total_h = self.height as f32 * self.cell_size;

        for x in 0..=self.width {
            let wx = self.origin_x + x as f32 * self.cell_size;
            sink.draw_line(
                Vec3::new(wx, y, self.origin_z),
                Vec3::new(wx, y, self.origin_z + total_h),
                line_color,
            );
        }
        for z in 0..=self.height {
            let wz = self.origin_z + z as f32 * self.cell_size;
            sink.draw_line(
                Vec3::new(self.origin_x, y, wz),
                Vec3::new(self.origin_x + total_w, y, wz),
                line_color,
            );
        }

        let half_cell = self.cell_size * 0.5;
        for z in 0..self.height {
            for x in 0..self.width {
                if self.cells[self.index(x, z)] == NavCell::Blocked {
                    let mut center = self.grid_to_world(NavCoord::new(x, z));
                    center.y = y;
                    sink.draw_box(center, Vec3::new(half_cell * 0.9, 0.05, half_cell * 0.9), blocked_color);
                }
            }
        }
    }

    /// Polyline through a grid path with start (green) and end (red) markers
    pub fn debug_draw_path(&self, sink: &mut dyn DebugSink, path: &[NavCoord], color: Color) {
        if path.len() < 2 {
            return;
        }
        let lift = |p: Vec3| Vec3::new(p.x, self.ground_y + 0.05, p.z);

        for pair in path.windows(2) {
            sink.draw_line(lift(self.grid_to_world(pair[0])), lift(self.grid_to_world(pair[1])), color);
        }

        let radius = self.cell_size * 0.2;
        let start = lift(self.grid_to_world(path[0]));
        let end = lift(self.grid_to_world(path[path.len() - 1]));
        sink.draw_sphere(start, radius, Color::GREEN.with_alpha(0.8), 8);
        sink.draw_sphere(end, radius, Color::RED.with_alpha(0.8), 8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::LineBuffer;
    use approx::assert_relative_eq;

    fn grid(w: i32, h: i32) -> NavGrid {
        NavGrid::new(w, h, 1.0, 0.0, 0.0, 0.0).unwrap()
    }

    /// Grid with a blocked column at x = 5, rows 1..=8
    fn walled() -> NavGrid {
        let mut g = grid(10, 10);
        for z in 1..9 {
            g.set_cell(5, z, NavCell::Blocked);
        }
        g
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            NavGrid::new(0, 4, 1.0, 0.0, 0.0, 0.0),
            Err(AiError::InvalidGrid { width: 0, height: 4 })
        ));
        assert!(matches!(
            NavGrid::new(4, 4, 0.0, 0.0, 0.0, 0.0),
            Err(AiError::InvalidCellSize(_))
        ));
    }

    #[test]
    fn test_cell_storage_matches_dimensions() {
        let mut g = grid(300, 7);
        assert_eq!(g.cells().len(), 2100);
        g.set_cell(299, 6, NavCell::Blocked);
        assert_eq!(g.cells()[2099], NavCell::Blocked);
        assert_eq!(g.blocked_count(), 1);
    }

    #[test]
    fn test_search_gives_up_past_expansion_budget() {
        let g = grid(30, 30);
        let (start, goal) = (NavCoord::new(0, 0), NavCoord::new(29, 29));
        assert!(g.find_path_limited(start, goal, true, 10).is_empty());
        assert_eq!(g.find_path_limited(start, goal, true, 1800).len(), 30);
        assert_eq!(g.find_path(start, goal, true).len(), 30);
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let mut g = grid(4, 4);
        assert_eq!(g.get_cell(-1, 0), NavCell::Blocked);
        assert_eq!(g.get_cell(4, 0), NavCell::Blocked);
        assert!(g.is_walkable(3, 3));

        // Ignored, no panic
        g.set_cell(10, 10, NavCell::Blocked);
        assert_eq!(g.blocked_count(), 0);
    }

    #[test]
    fn test_shutdown_blocks_everything() {
        let mut g = grid(4, 4);
        g.shutdown();
        assert!(!g.is_walkable(0, 0));
        assert!(g.find_path(NavCoord::new(0, 0), NavCoord::new(1, 1), true).is_empty());
    }

    #[test]
    fn test_world_grid_mapping() {
        let g = NavGrid::new(8, 8, 2.0, -4.0, 10.0, 1.5).unwrap();
        assert_eq!(g.world_to_grid(-4.0, 10.0), NavCoord::new(0, 0));
        assert_eq!(g.world_to_grid(-4.1, 10.0), NavCoord::new(-1, 0));
        assert_eq!(g.world_to_grid(0.9, 13.9), NavCoord::new(2, 1));

        let center = g.grid_to_world(NavCoord::new(2, 1));
        assert_relative_eq!(center.x, 1.0);
        assert_relative_eq!(center.y, 1.5);
        assert_relative_eq!(center.z, 13.0);
    }

    #[test]
    fn test_grid_to_world_round_trip_within_half_cell() {
        let g = NavGrid::new(16, 16, 0.5, -3.0, -3.0, 0.0).unwrap();
        for &(x, z) in &[(-2.9, -2.9), (0.0, 0.0), (1.26, -0.74), (4.99, 4.99)] {
            let back = g.grid_to_world(g.world_to_grid(x, z));
            assert!((back.x - x).abs() <= 0.25 + 1e-5);
            assert!((back.z - z).abs() <= 0.25 + 1e-5);
        }
    }

    #[test]
    fn test_path_start_equals_goal() {
        let g = grid(5, 5);
        let c = NavCoord::new(2, 3);
        assert_eq!(g.find_path(c, c, true), vec![c]);
    }

    #[test]
    fn test_open_grid_diagonal_path_length() {
        let g = grid(10, 10);
        let start = NavCoord::new(1, 1);
        let goal = NavCoord::new(8, 4);
        let path = g.find_path(start, goal, true);
        assert_eq!(path.len(), 8);
        assert_eq!(path[0], start);
        assert_eq!(*path.last().unwrap(), goal);
        for pair in path.windows(2) {
            assert_eq!(pair[0].chebyshev(pair[1]), 1);
        }
    }

    #[test]
    fn test_cardinal_only_path() {
        let g = grid(10, 10);
        let path = g.find_path(NavCoord::new(0, 0), NavCoord::new(3, 2), false);
        assert_eq!(path.len(), 6);
        for pair in path.windows(2) {
            let d = (pair[0].x - pair[1].x).abs() + (pair[0].z - pair[1].z).abs();
            assert_eq!(d, 1);
        }
    }

    #[test]
    fn test_no_corner_cutting() {
        let mut g = grid(2, 2);
        g.set_cell(1, 0, NavCell::Blocked);
        g.set_cell(0, 1, NavCell::Blocked);
        assert!(g.find_path(NavCoord::new(0, 0), NavCoord::new(1, 1), true).is_empty());
    }

    #[test]
    fn test_path_routes_around_wall() {
        let g = walled();
        let path = g.find_path(NavCoord::new(2, 5), NavCoord::new(8, 5), true);
        assert!(!path.is_empty());
        assert!(path.iter().all(|c| g.is_walkable(c.x, c.z)));
        assert!(path.iter().any(|c| c.z == 0 || c.z == 9));
    }

    #[test]
    fn test_blocked_or_unreachable_goal() {
        let mut g = walled();
        assert!(g.find_path(NavCoord::new(0, 0), NavCoord::new(5, 5), true).is_empty());
        assert!(g.find_path(NavCoord::new(0, 0), NavCoord::new(20, 5), true).is_empty());

        g.set_cell(5, 0, NavCell::Blocked);
        g.set_cell(5, 9, NavCell::Blocked);
        assert!(g.find_path(NavCoord::new(2, 5), NavCoord::new(8, 5), true).is_empty());
    }

    #[test]
    fn test_los_open_and_blocked() {
        let g = walled();
        assert!(g.has_grid_los(NavCoord::new(0, 0), NavCoord::new(9, 0)));
        assert!(!g.has_grid_los(NavCoord::new(2, 5), NavCoord::new(8, 5)));
        // Blocked endpoints are transparent
        assert!(g.has_grid_los(NavCoord::new(5, 4), NavCoord::new(5, 5)));
    }

    #[test]
    fn test_los_is_symmetric() {
        let mut g = grid(12, 12);
        for &(x, z) in &[(3, 4), (6, 6), (7, 2), (2, 9), (9, 9)] {
            g.set_cell(x, z, NavCell::Blocked);
        }
        for ax in 0..12 {
            for az in (0..12).step_by(3) {
                let a = NavCoord::new(ax, az);
                for b in [NavCoord::new(11, 7), NavCoord::new(0, 11), NavCoord::new(5, 0)] {
                    assert_eq!(g.has_grid_los(a, b), g.has_grid_los(b, a), "{:?} <-> {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_los_corner_crossing_is_blocked() {
        let mut g = grid(3, 3);
        g.set_cell(1, 0, NavCell::Blocked);
        // Both diagonals pass the corner shared with (1,0)
        assert!(!g.has_grid_los(NavCoord::new(0, 0), NavCoord::new(1, 1)));
        assert!(!g.has_grid_los(NavCoord::new(1, 1), NavCoord::new(0, 0)));
        assert!(!g.has_grid_los(NavCoord::new(0, 0), NavCoord::new(2, 2)));
        assert!(g.has_grid_los(NavCoord::new(0, 1), NavCoord::new(2, 1)));
    }

    #[test]
    fn test_smooth_path_straightens() {
        let g = grid(10, 10);
        let path = g.find_path(NavCoord::new(0, 0), NavCoord::new(9, 3), true);
        let smoothed = g.smooth_path(&path);
        assert_eq!(smoothed, vec![NavCoord::new(0, 0), NavCoord::new(9, 3)]);
    }

    #[test]
    fn test_smooth_path_keeps_corner() {
        let g = walled();
        let path = g.find_path(NavCoord::new(2, 5), NavCoord::new(8, 5), true);
        let smoothed = g.smooth_path(&path);
        assert!(smoothed.len() >= 3);
        assert!(smoothed.len() <= path.len());
        for pair in smoothed.windows(2) {
            assert!(g.has_grid_los(pair[0], pair[1]));
        }
    }

    #[test]
    fn test_find_path_world_returns_cell_centers() {
        let g = NavGrid::new(10, 10, 1.0, 0.0, 0.0, 2.0).unwrap();
        let path = g.find_path_world(Vec3::new(0.2, 0.0, 0.7), Vec3::new(6.9, 0.0, 0.1), true);
        assert_eq!(path.len(), 2);
        assert_relative_eq!(path[1].x, 6.5);
        assert_relative_eq!(path[1].z, 0.5);
        assert!(path.iter().all(|p| p.y == 2.0));
    }

    #[test]
    fn test_block_box_uses_cell_centers() {
        let mut g = grid(10, 10);
        g.block_box(Vec3::new(5.0, 0.0, 5.0), Vec3::new(1.0, 1.0, 0.4));
        // x centers 4.5 and 5.5 inside [4, 6]; z footprint [4.6, 5.4] holds no center
        assert!(!g.is_walkable(4, 5));
        assert!(!g.is_walkable(5, 5));
        assert!(g.is_walkable(3, 5));
        assert!(g.is_walkable(6, 5));
        assert!(g.is_walkable(4, 4));
        assert_eq!(g.blocked_count(), 2);
    }

    #[test]
    fn test_rebuild_skips_non_solid_and_is_idempotent() {
        let mut g = grid(10, 10);
        let mut hidden = SceneEntity::new_box("hidden", Vec3::new(1.5, 0.5, 1.5), Vec3::ONE);
        hidden.visible = false;
        let scene = vec![
            SceneEntity::new_box("wall", Vec3::new(5.5, 1.0, 5.0), Vec3::new(1.0, 2.0, 6.0)),
            SceneEntity::new_box("medkit", Vec3::new(8.5, 0.5, 8.5), Vec3::ONE).as_pickup(),
            hidden,
        ];

        g.rebuild_from_entities(&scene);
        let first = g.cells().to_vec();
        assert_eq!(g.blocked_count(), 6);
        assert!(g.is_walkable(8, 8));
        assert!(g.is_walkable(1, 1));

        g.rebuild_from_entities(&scene);
        assert_eq!(g.cells(), first.as_slice());
    }

    #[test]
    fn test_rebuild_rotated_entity() {
        let mut g = grid(20, 20);
        let beam = SceneEntity::new_box("beam", Vec3::new(10.0, 0.5, 10.0), Vec3::new(8.0, 1.0, 0.5))
            .with_rotation(Vec3::new(0.0, 45.0, 0.0));
        g.rebuild_from_entities(&[beam]);

        assert!(!g.is_walkable(10, 10));
        assert!(!g.is_walkable(12, 12) || !g.is_walkable(12, 7));
        // Far corners of the bounding rectangle stay open
        assert!(g.is_walkable(7, 7) || g.is_walkable(12, 12));
        assert!(g.blocked_count() > 4);
        assert!(g.blocked_count() < 64);
    }

    #[test]
    fn test_debug_draw_respects_flag() {
        let mut g = grid(3, 2);
        g.set_cell(1, 1, NavCell::Blocked);
        let mut buffer = LineBuffer::new();

        g.debug_draw(&mut buffer);
        assert!(buffer.is_empty());

        g.show_debug = true;
        g.debug_draw(&mut buffer);
        // 4 + 3 grid lines, one box of 12 edges
        assert_eq!(buffer.len(), 7 + 12);
    }

    #[test]
    fn test_debug_draw_path() {
        let g = grid(5, 5);
        let mut buffer = LineBuffer::new();
        let path = g.find_path(NavCoord::new(0, 0), NavCoord::new(3, 0), false);
        g.debug_draw_path(&mut buffer, &path, Color::CYAN);
        // 3 segments + 2 spheres of 8 segments x 3 circles
        assert_eq!(buffer.len(), 3 + 48);
    }
}
