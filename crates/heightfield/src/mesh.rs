//! Elevation grid to indexed triangle mesh.

use glam::Vec3;

use crate::config::MAX_GRID_VERTICES;
use crate::grid::ElevationGrid;

/// Indexed triangle mesh on a regular lattice.
///
/// Vertex `row * cols + col` sits at `(col * dx, row * dy, height)`. Each grid
/// cell contributes two triangles wound counter-clockwise seen from +z.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub rows: usize,
    pub cols: usize,
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TerrainMesh {
    /// Vertex positions as raw bytes, ready for a vertex buffer or a file.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Flat index list, three per triangle.
    pub fn indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }

    pub fn triangle_positions(&self, triangle: [u32; 3]) -> [Vec3; 3] {
        triangle.map(|i| self.vertices[i as usize])
    }

    /// Unit normal of a triangle, following its winding. Degenerate
    /// triangles give `Vec3::ZERO`.
    pub fn face_normal(&self, triangle: [u32; 3]) -> Vec3 {
        let [v0, v1, v2] = self.triangle_positions(triangle);
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }
}

/// Triangulates `grid` with spacing `(dx, dy)` and finds its anchor point.
///
/// The anchor is the vertex of maximum height; ties go to the first cell in
/// row-major order and NaN heights never win. Grids smaller than 2x2, or with
/// more than [`MAX_GRID_VERTICES`] cells, produce no triangles.
pub fn heightfield_to_mesh(grid: &ElevationGrid, dx: f64, dy: f64) -> (TerrainMesh, Vec3) {
    let (rows, cols) = grid.shape();
    let indexable = grid.as_slice().len() <= MAX_GRID_VERTICES;
    if !indexable {
        log::warn!("{rows}x{cols} grid exceeds u32 indices, meshing vertices only");
    }

    let mut vertices = Vec::with_capacity(rows * cols);
    let mut anchor_idx = 0;
    let mut anchor_height = f64::NEG_INFINITY;
    for row in 0..rows {
        for col in 0..cols {
            let h = grid.get(row, col);
            if h > anchor_height {
                anchor_height = h;
                anchor_idx = vertices.len();
            }
            vertices.push(Vec3::new(
                (col as f64 * dx) as f32,
                (row as f64 * dy) as f32,
                h as f32,
            ));
        }
    }

    let quad_rows = if indexable { rows.saturating_sub(1) } else { 0 };
    let quad_cols = cols.saturating_sub(1);
    let mut triangles = Vec::with_capacity(quad_rows * quad_cols * 2);
    for row in 0..quad_rows {
        for col in 0..quad_cols {
            let a = (row * cols + col) as u32;
            let b = a + 1;
            let c = a + cols as u32;
            let d = c + 1;

            triangles.push([a, b, c]);
            triangles.push([b, d, c]);
        }
    }

    let anchor = vertices.get(anchor_idx).copied().unwrap_or(Vec3::ZERO);
    (
        TerrainMesh {
            rows,
            cols,
            vertices,
            triangles,
        },
        anchor,
    )
}

/// Shifts vertices horizontally so faces steeper than `threshold` (rise over
/// run) become vertical walls instead of long slanted triangles.
///
/// A vertex whose `+x` neighbour is higher by more than `threshold * dx` moves
/// one cell towards it; a higher `-x` neighbour pulls it the other way. The
/// same applies along y. A steep diagonal neighbour `(+1, +1)` or `(-1, -1)`
/// adds a move on any axis that has none. Topology is unchanged.
pub fn apply_slope_threshold(
    mesh: &mut TerrainMesh,
    grid: &ElevationGrid,
    dx: f64,
    dy: f64,
    threshold: f64,
) {
    let (rows, cols) = grid.shape();
    if mesh.vertices.len() != rows * cols {
        log::warn!(
            "slope threshold skipped: mesh has {} vertices for a {}x{} grid",
            mesh.vertices.len(),
            rows,
            cols
        );
        return;
    }

    let limit_x = threshold * dx;
    let limit_y = threshold * dy;
    let limit_diag = threshold * dx.min(dy);
    let steep = |from: f64, to: f64, limit: f64| i32::from(to - from > limit);

    let mut moved = 0usize;
    for row in 0..rows {
        for col in 0..cols {
            let h = grid.get(row, col);
            let mut move_x = 0;
            let mut move_y = 0;
            let mut move_diag = 0;
            if col + 1 < cols {
                move_x += steep(h, grid.get(row, col + 1), limit_x);
            }
            if col > 0 {
                move_x -= steep(h, grid.get(row, col - 1), limit_x);
            }
            if row + 1 < rows {
                move_y += steep(h, grid.get(row + 1, col), limit_y);
            }
            if row > 0 {
                move_y -= steep(h, grid.get(row - 1, col), limit_y);
            }
            if row + 1 < rows && col + 1 < cols {
                move_diag += steep(h, grid.get(row + 1, col + 1), limit_diag);
            }
            if row > 0 && col > 0 {
                move_diag -= steep(h, grid.get(row - 1, col - 1), limit_diag);
            }

            let shift_x = if move_x != 0 { move_x } else { move_diag };
            let shift_y = if move_y != 0 { move_y } else { move_diag };
            if shift_x != 0 || shift_y != 0 {
                let v = &mut mesh.vertices[row * cols + col];
                v.x += (shift_x as f64 * dx) as f32;
                v.y += (shift_y as f64 * dy) as f32;
                moved += 1;
            }
        }
    }
    log::debug!("slope threshold {threshold}: moved {moved} vertices");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_grid(rows: usize, cols: usize, seed: u64) -> ElevationGrid {
        let mut rng = StdRng::seed_from_u64(seed);
        ElevationGrid::from_fn(rows, cols, |_, _| rng.gen_range(-1.0..1.0))
    }

    #[test]
    fn vertex_and_triangle_counts() {
        for (rows, cols) in [(2, 2), (2, 7), (5, 3), (100, 100), (13, 64)] {
            let (mesh, _) = heightfield_to_mesh(&ElevationGrid::zeros(rows, cols), 0.1, 0.1);
            assert_eq!(mesh.vertices.len(), rows * cols);
            assert_eq!(mesh.triangles.len(), 2 * (rows - 1) * (cols - 1));
            assert_eq!(mesh.indices().len(), 6 * (rows - 1) * (cols - 1));
        }
    }

    #[test]
    fn vertices_sit_on_the_lattice() {
        let grid = ElevationGrid::from_fn(3, 4, |row, col| (row * 4 + col) as f64);
        let (mesh, _) = heightfield_to_mesh(&grid, 0.5, 0.25);
        assert_eq!(mesh.vertices[0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[6], Vec3::new(1.0, 0.25, 6.0));
        assert_eq!(mesh.vertices[11], Vec3::new(1.5, 0.5, 11.0));
    }

    #[test]
    fn first_cell_triangles() {
        let (mesh, _) = heightfield_to_mesh(&ElevationGrid::zeros(3, 3), 1.0, 1.0);
        assert_eq!(mesh.triangles[0], [0, 1, 3]);
        assert_eq!(mesh.triangles[1], [1, 4, 3]);
        assert_eq!(mesh.triangles[2], [1, 2, 4]);
    }

    #[test]
    fn winding_faces_up_and_tiles_the_plane() {
        let (mesh, _) = heightfield_to_mesh(&random_grid(9, 12, 3), 0.1, 0.2);
        let mut area = 0.0;
        for &tri in &mesh.triangles {
            let [v0, v1, v2] = mesh.triangle_positions(tri);
            let z = (v1 - v0).cross(v2 - v0).z;
            assert!(z > 0.0, "triangle {tri:?} is wound clockwise");
            area += 0.5 * z as f64;
        }
        assert!((area - 8.0 * 11.0 * 0.1 * 0.2).abs() < 1e-4);
    }

    #[test]
    fn anchor_is_the_first_maximum() {
        let grid = ElevationGrid::from_vec(2, 3, vec![0.0, 2.0, 1.0, 2.0, 2.0, -1.0]).unwrap();
        let (_, anchor) = heightfield_to_mesh(&grid, 0.1, 0.1);
        assert_eq!(anchor, Vec3::new(0.1, 0.0, 2.0));
    }

    #[test]
    fn anchor_ignores_nan() {
        let grid = ElevationGrid::from_vec(2, 2, vec![f64::NAN, 0.5, 1.5, f64::NAN]).unwrap();
        let (_, anchor) = heightfield_to_mesh(&grid, 1.0, 1.0);
        assert_eq!(anchor, Vec3::new(0.0, 1.0, 1.5));
    }

    #[test]
    fn byte_views_match_lengths() {
        let (mesh, _) = heightfield_to_mesh(&ElevationGrid::zeros(4, 5), 1.0, 1.0);
        assert_eq!(mesh.vertex_bytes().len(), 20 * 12);
        assert_eq!(mesh.indices()[..6], [0, 1, 5, 1, 6, 5]);
    }

    #[test]
    fn slope_threshold_moves_cliff_vertices() {
        // A 1 m cliff between column 1 and column 2.
        let grid = ElevationGrid::from_fn(3, 4, |_, col| if col >= 2 { 1.0 } else { 0.0 });
        let (mut mesh, _) = heightfield_to_mesh(&grid, 0.1, 0.1);
        let before = mesh.clone();
        apply_slope_threshold(&mut mesh, &grid, 0.1, 0.1, 0.75);

        // the bottom of the cliff slides under the top
        assert_eq!(mesh.vertices[1].x, before.vertices[2].x);
        assert_eq!(mesh.vertices[1].z, 0.0);
        // flat vertices stay put
        assert_eq!(mesh.vertices[0], before.vertices[0]);
        assert_eq!(mesh.vertices[3], before.vertices[3]);
        assert_eq!(mesh.triangles, before.triangles);
    }

    #[test]
    fn gentle_slopes_are_untouched() {
        let grid = ElevationGrid::from_fn(4, 4, |row, col| (row + col) as f64 * 0.01);
        let (mut mesh, _) = heightfield_to_mesh(&grid, 0.1, 0.1);
        let before = mesh.clone();
        apply_slope_threshold(&mut mesh, &grid, 0.1, 0.1, 0.75);
        assert_eq!(mesh, before);
    }
}
