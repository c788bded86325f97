//! Mesh file writers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use heightfield::TerrainMesh;
use serde::{Deserialize, Serialize};

/// Output file format for exported terrains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Binary STL, little-endian.
    #[default]
    Stl,
    /// Wavefront OBJ, vertices and faces only.
    Obj,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
        }
    }
}

/// Writes `mesh` to `path` in `format`.
pub fn write_mesh(mesh: &TerrainMesh, format: ExportFormat, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let mut out = BufWriter::new(file);
    match format {
        ExportFormat::Stl => write_stl(mesh, &mut out),
        ExportFormat::Obj => write_obj(mesh, &mut out),
    }
    .with_context(|| format!("writing {:?}", path))?;
    out.flush()?;
    Ok(())
}

const STL_HEADER: &[u8] = b"terrain_export binary STL";

fn write_vec3(out: &mut impl Write, v: Vec3) -> std::io::Result<()> {
    for c in v.to_array() {
        out.write_all(&c.to_le_bytes())?;
    }
    Ok(())
}

/// 80-byte header, triangle count, then 50 bytes per facet.
pub fn write_stl(mesh: &TerrainMesh, out: &mut impl Write) -> Result<()> {
    let mut header = [0u8; 80];
    header[..STL_HEADER.len()].copy_from_slice(STL_HEADER);
    out.write_all(&header)?;

    let count = u32::try_from(mesh.triangles.len()).context("too many triangles for STL")?;
    out.write_all(&count.to_le_bytes())?;

    for &tri in &mesh.triangles {
        write_vec3(out, mesh.face_normal(tri))?;
        for v in mesh.triangle_positions(tri) {
            write_vec3(out, v)?;
        }
        out.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// One `v` line per vertex and one 1-based `f` line per triangle.
pub fn write_obj(mesh: &TerrainMesh, out: &mut impl Write) -> Result<()> {
    writeln!(out, "# {}x{} terrain", mesh.rows, mesh.cols)?;
    for v in &mesh.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for face in mesh.indices().chunks_exact(3) {
        writeln!(out, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use heightfield::{heightfield_to_mesh, ElevationGrid};

    fn small_mesh() -> TerrainMesh {
        let grid = ElevationGrid::from_fn(3, 4, |row, col| (row + col) as f64 * 0.1);
        heightfield_to_mesh(&grid, 0.5, 0.5).0
    }

    fn f32_at(bytes: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn stl_layout() {
        let mesh = small_mesh();
        let mut bytes = Vec::new();
        write_stl(&mesh, &mut bytes).unwrap();

        assert_eq!(bytes.len(), 84 + 50 * mesh.triangles.len());
        assert!(bytes.starts_with(STL_HEADER));
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        assert_eq!(count as usize, 12);

        // first facet: normal then vertex 0 at the origin
        assert!(f32_at(&bytes, 84 + 8) > 0.0);
        assert_eq!(f32_at(&bytes, 84 + 12), 0.0);
        assert_eq!(f32_at(&bytes, 84 + 16), 0.0);
        // second vertex of the first facet is vertex 1
        assert_eq!(f32_at(&bytes, 84 + 24), 0.5);
    }

    #[test]
    fn obj_lines() {
        let mesh = small_mesh();
        let mut bytes = Vec::new();
        write_obj(&mesh, &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 12);
        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces.len(), 12);
        assert_eq!(faces[0], "f 1 2 5");
        assert_eq!(faces[1], "f 2 6 5");
    }

    #[test]
    fn write_mesh_creates_the_file() {
        let dir = std::env::temp_dir().join("terrain_export_write_mesh");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("small.{}", ExportFormat::Obj.extension()));
        write_mesh(&small_mesh(), ExportFormat::Obj, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("# 3x4 terrain"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
