//! STL reading and writing.
//!
//! Region meshes are written as binary STL by default; ASCII is supported
//! for debugging and for hand-written fixtures.
//!
//! # Binary layout
//!
//! ```text
//! UINT8[80]    header
//! UINT32       triangle count
//! foreach triangle
//!     REAL32[3] facet normal
//!     REAL32[3] vertex 1
//!     REAL32[3] vertex 2
//!     REAL32[3] vertex 3
//!     UINT16    attribute byte count (0)
//! end
//! ```
//!
//! Loading does not weld vertices: every triangle contributes three fresh
//! vertices, so a loaded mesh has `3 * face_count` vertices.

// STL stores f32 coordinates and a u32 triangle count
#![allow(clippy::cast_possible_truncation)]

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, Point3, Vertex};
use tracing::debug;

use crate::error::{IoError, IoResult};

const HEADER_SIZE: usize = 80;
const TRIANGLE_SIZE: usize = 50;
const HEADER_TEXT: &[u8] = b"Binary STL generated by NeuroSim mesh-io";

/// Load a mesh from an STL file, detecting ASCII or binary content.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing path, and
/// [`IoError::InvalidContent`], [`IoError::InvalidHeader`] or
/// [`IoError::InvalidFaceCount`] for malformed content.
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes)?;
    let mesh = parse_stl(&bytes)?;
    debug!(path = %path.display(), faces = mesh.faces.len(), "Loaded STL");
    Ok(mesh)
}

fn parse_stl(bytes: &[u8]) -> IoResult<IndexedMesh> {
    if bytes.len() < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }
    if looks_ascii(bytes) {
        parse_ascii(BufReader::new(bytes))
    } else {
        parse_binary(bytes)
    }
}

/// ASCII files start with `solid`; binary headers that happen to start with
/// `solid` are told apart by their exact byte length or by NUL padding.
fn looks_ascii(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    if !String::from_utf8_lossy(head).trim_start().starts_with("solid") {
        return false;
    }
    if head.contains(&0) {
        return false;
    }
    match binary_face_count(bytes) {
        Some(count) => bytes.len() != HEADER_SIZE + 4 + count as usize * TRIANGLE_SIZE,
        None => true,
    }
}

fn binary_face_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn parse_binary(bytes: &[u8]) -> IoResult<IndexedMesh> {
    let face_count = binary_face_count(bytes).ok_or(IoError::InvalidHeader {
        expected: HEADER_SIZE + 4,
        got: bytes.len(),
    })?;

    let body = &bytes[HEADER_SIZE + 4..];
    let available = (body.len() / TRIANGLE_SIZE) as u32;
    if available < face_count {
        return Err(IoError::InvalidFaceCount {
            expected: face_count,
            got: available,
        });
    }

    let mut mesh = IndexedMesh::with_capacity(face_count as usize * 3, face_count as usize);
    for triangle in body.chunks_exact(TRIANGLE_SIZE).take(face_count as usize) {
        let base = mesh.vertices.len() as u32;
        for corner in 0..3 {
            let start = 12 + corner * 12;
            mesh.vertices.push(read_vertex(&triangle[start..start + 12]));
        }
        mesh.faces.push([base, base + 1, base + 2]);
    }
    Ok(mesh)
}

fn read_vertex(buf: &[u8]) -> Vertex {
    let f = |i: usize| f64::from(f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]));
    Vertex::from_coords(f(0), f(4), f(8))
}

fn parse_ascii<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut corners: Vec<Vertex> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => corners.clear(),
            "vertex" => {
                let coords: Vec<f64> = parts.take(3).map(str::parse).collect::<Result<_, _>>()?;
                if coords.len() != 3 {
                    return Err(IoError::invalid_content(format!("short vertex line: {line}")));
                }
                corners.push(Vertex::from_coords(coords[0], coords[1], coords[2]));
            }
            "endfacet" => {
                if corners.len() != 3 {
                    return Err(IoError::invalid_content(format!(
                        "facet with {} vertices",
                        corners.len()
                    )));
                }
                let base = mesh.vertices.len() as u32;
                mesh.vertices.append(&mut corners);
                mesh.faces.push([base, base + 1, base + 2]);
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(mesh)
}

/// Save a mesh to an STL file.
///
/// # Errors
///
/// Returns [`IoError::DanglingIndex`] if a face references a missing vertex,
/// or an I/O error if the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use mesh_io::save_stl;
/// use mesh_types::IndexedMesh;
///
/// let mesh = IndexedMesh::new();
/// save_stl(&mesh, "White_Matter.stl", true).unwrap();
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, binary: bool) -> IoResult<()> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    let mut writer = BufWriter::new(File::create(path)?);
    write_stl(mesh, &mut writer, binary, name)?;
    writer.flush()?;
    debug!(path = %path.display(), faces = mesh.faces.len(), binary, "Saved STL");
    Ok(())
}

/// Write a mesh as STL to any writer. `name` is used as the ASCII solid name.
///
/// # Errors
///
/// Returns [`IoError::DanglingIndex`] if a face references a missing vertex,
/// or an I/O error from the writer.
pub fn write_stl<W: Write>(mesh: &IndexedMesh, writer: &mut W, binary: bool, name: &str) -> IoResult<()> {
    let triangles = resolve_triangles(mesh)?;
    if binary {
        write_binary(&triangles, writer)
    } else {
        write_ascii(&triangles, writer, name)
    }
}

type Triangle = [Point3<f64>; 3];

fn resolve_triangles(mesh: &IndexedMesh) -> IoResult<Vec<Triangle>> {
    let vertex_count = mesh.vertices.len();
    mesh.faces
        .iter()
        .enumerate()
        .map(|(face, indices)| {
            let mut corners = [Point3::origin(); 3];
            for (corner, &index) in corners.iter_mut().zip(indices) {
                *corner = mesh
                    .vertices
                    .get(index as usize)
                    .ok_or(IoError::DanglingIndex {
                        face,
                        index,
                        vertex_count,
                    })?
                    .position;
            }
            Ok(corners)
        })
        .collect()
}

fn facet_normal([a, b, c]: &Triangle) -> [f64; 3] {
    let n = (b - a).cross(&(c - a));
    let len = n.norm();
    if len > f64::EPSILON {
        [n.x / len, n.y / len, n.z / len]
    } else {
        [0.0; 3]
    }
}

fn write_binary<W: Write>(triangles: &[Triangle], writer: &mut W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;
    writer.write_all(&(triangles.len() as u32).to_le_bytes())?;

    for triangle in triangles {
        for component in facet_normal(triangle) {
            writer.write_all(&(component as f32).to_le_bytes())?;
        }
        for p in triangle {
            for component in [p.x, p.y, p.z] {
                writer.write_all(&(component as f32).to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

fn write_ascii<W: Write>(triangles: &[Triangle], writer: &mut W, name: &str) -> IoResult<()> {
    writeln!(writer, "solid {name}")?;
    for triangle in triangles {
        let [nx, ny, nz] = facet_normal(triangle);
        writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
        writeln!(writer, "    outer loop")?;
        for p in triangle {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    Ok(())
}
