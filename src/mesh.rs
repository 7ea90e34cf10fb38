//! The dual surface mesh: one lat/lon grid, two vertex sets and one index buffer.
//!
//! Pole rows collapse to a single point on the sphere, so half of every pole-band
//! cell is dropped. See [`SurfaceMesh::skipped_degenerate`].

use std::collections::BTreeSet;

use glam::{DVec2, DVec3};
use rayon::prelude::*;

use crate::error::MeshError;
use crate::geo::{to_planar, to_spherical};

/// Twice-area threshold below which a triangle counts as collapsed
const DEGENERATE_EPS: f64 = 1e-14;

/// Triangulated lat/lon grid with two congruent vertex sets (flat map and sphere)
/// sharing one index buffer and one UV set.
///
/// Built once by [`DualMeshBuilder`]; the topology never changes afterwards.
#[derive(Clone, Debug)]
pub struct SurfaceMesh {
    rows: usize,
    cols: usize,
    vertices_planar: Vec<DVec3>,
    vertices_spherical: Vec<DVec3>,
    normals_planar: Vec<DVec3>,
    normals_spherical: Vec<DVec3>,
    uvs: Vec<DVec2>,
    indices: Vec<[u32; 3]>,
    skipped_degenerate: usize,
}

impl SurfaceMesh {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn vertices_planar(&self) -> &[DVec3] {
        &self.vertices_planar
    }

    pub fn vertices_spherical(&self) -> &[DVec3] {
        &self.vertices_spherical
    }

    pub fn normals_planar(&self) -> &[DVec3] {
        &self.normals_planar
    }

    pub fn normals_spherical(&self) -> &[DVec3] {
        &self.normals_spherical
    }

    pub fn uvs(&self) -> &[DVec2] {
        &self.uvs
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices_planar.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Pole-collapsed triangles dropped during the build
    pub fn skipped_degenerate(&self) -> usize {
        self.skipped_degenerate
    }

    /// Row-major index of the grid point at (row, col).
    #[inline(always)]
    pub fn vertex_index(&self, row: usize, col: usize) -> usize {
        row * (self.cols + 1) + col
    }

    /// Blend every vertex between map and globe into `out` (cleared first).
    /// This is the CPU equivalent of the morph shader.
    pub fn blend_vertices_into(&self, t: f64, out: &mut Vec<DVec3>) {
        out.clear();
        out.extend(
            self.vertices_planar
                .iter()
                .zip(&self.vertices_spherical)
                .map(|(p, s)| p.lerp(*s, t)),
        );
    }

    /// Unique undirected edges of the triangulation, sorted, for wireframe display.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut edges = BTreeSet::new();
        for &[a, b, c] in &self.indices {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                edges.insert(if u < v { (u, v) } else { (v, u) });
            }
        }
        edges.into_iter().collect()
    }

    /// Re-check the buffer invariants: equal per-vertex lengths and in-range indices.
    pub fn validate(&self) -> Result<(), MeshError> {
        let n = self.vertices_planar.len();
        let lengths = [
            ("vertices_spherical", self.vertices_spherical.len()),
            ("normals_planar", self.normals_planar.len()),
            ("normals_spherical", self.normals_spherical.len()),
            ("uvs", self.uvs.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(MeshError::LengthMismatch(format!(
                    "{name} has {len} entries, vertices_planar has {n}"
                )));
            }
        }

        for tri in &self.indices {
            for &index in tri {
                if index as usize >= n {
                    return Err(MeshError::IndexOutOfBounds { index, vertex_count: n });
                }
            }
        }

        Ok(())
    }
}

/// One grid point before the buffers are split apart
struct GridVertex {
    planar: DVec3,
    spherical: DVec3,
    uv: DVec2,
}

/// Builds a [`SurfaceMesh`] over the full globe.
///
/// Latitude is split into `rows` bands from +90° down to -90°, longitude into `cols`
/// bands from -180° to +180°. 20x40 reads well as a wireframe; texture and height
/// mapping want something closer to 150x150.
#[derive(Clone, Copy, Debug)]
pub struct DualMeshBuilder {
    rows: usize,
    cols: usize,
}

impl DualMeshBuilder {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn build(&self) -> Result<SurfaceMesh, MeshError> {
        let (rows, cols) = (self.rows, self.cols);
        let vertex_count = (rows + 1).saturating_mul(cols + 1);
        if rows < 2 || cols < 3 || vertex_count > u32::MAX as usize {
            return Err(MeshError::Resolution { rows, cols });
        }

        // Rows are independent; rayon's collect keeps them in order
        let grid: Vec<GridVertex> = (0..=rows)
            .into_par_iter()
            .flat_map_iter(|row| (0..=cols).map(move |col| grid_vertex(row, col, rows, cols)))
            .collect();

        let mut vertices_planar = Vec::with_capacity(vertex_count);
        let mut vertices_spherical = Vec::with_capacity(vertex_count);
        let mut normals_spherical = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);
        for v in grid {
            vertices_planar.push(v.planar);
            vertices_spherical.push(v.spherical);
            normals_spherical.push(v.spherical.normalize());
            uvs.push(v.uv);
        }
        // The flat map is always viewed face-on
        let normals_planar = vec![DVec3::Z; vertex_count];

        let stride = cols + 1;
        let mut indices = Vec::with_capacity(rows * cols * 2);
        let mut skipped_degenerate = 0;

        for row in 0..rows {
            for col in 0..cols {
                let tl = row * stride + col;
                let tr = tl + 1;
                let bl = tl + stride;
                let br = bl + 1;

                // Counter-clockwise in (lon, lat), which faces outward on the sphere
                for tri in [[bl, br, tr], [bl, tr, tl]] {
                    if is_degenerate(&vertices_planar, tri)
                        || is_degenerate(&vertices_spherical, tri)
                    {
                        skipped_degenerate += 1;
                        continue;
                    }
                    indices.push([tri[0] as u32, tri[1] as u32, tri[2] as u32]);
                }
            }
        }

        tracing::debug!(
            rows,
            cols,
            vertices = vertex_count,
            triangles = indices.len(),
            skipped_degenerate,
            "built dual mesh"
        );

        let mesh = SurfaceMesh {
            rows,
            cols,
            vertices_planar,
            vertices_spherical,
            normals_planar,
            normals_spherical,
            uvs,
            indices,
            skipped_degenerate,
        };
        mesh.validate()?;
        Ok(mesh)
    }
}

/// Grid point (row, col). End rows/columns are pinned to the exact range limits so the
/// poles and the ±180° seam are not perturbed by accumulated division error.
fn grid_vertex(row: usize, col: usize, rows: usize, cols: usize) -> GridVertex {
    let v = row as f64 / rows as f64;
    let u = col as f64 / cols as f64;

    let lat = if row == rows { -90.0 } else { 90.0 - 180.0 * v };
    let lon = if col == cols { 180.0 } else { -180.0 + 360.0 * u };

    GridVertex {
        planar: to_planar(lat, lon),
        spherical: to_spherical(lat, lon),
        uv: DVec2::new(u, v),
    }
}

#[inline(always)]
fn is_degenerate(vertices: &[DVec3], [a, b, c]: [usize; 3]) -> bool {
    let (a, b, c) = (vertices[a], vertices[b], vertices[c]);
    (b - a).cross(c - a).length() < DEGENERATE_EPS
}
