//! Flat array views of a mesh, for upload to rendering APIs.
//!
//! These functions expect a mesh prepared with
//! [`convert_to_renderable`](crate::transform::convert_to_renderable), where
//! one index addresses vertices, texture coordinates and normals alike.
//!
//! # Example
//!
//! ```
//! use mesh_obj::{data, read_obj, transform};
//!
//! let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
//! let obj = transform::convert_to_renderable(&read_obj(text.as_bytes()).unwrap());
//! assert_eq!(data::face_vertex_indices(&obj, 3).unwrap(), vec![0, 1, 2, 0, 2, 3]);
//! assert_eq!(data::vertices(&obj).len(), 12);
//! ```

use crate::error::{ObjError, ObjResult};
use crate::obj::{Obj, ObjSink};
use crate::types::{FloatTuple, ObjFace};

fn too_few_vertices(f: usize, face: &ObjFace, per_face: usize) -> ObjError {
    ObjError::InvalidFace {
        details: format!(
            "face {} has {} vertices, expected at least {}",
            f,
            face.num_vertices(),
            per_face
        ),
    }
}

fn collect_indices<F>(obj: &Obj, per_face: usize, what: &str, indices: F) -> ObjResult<Vec<u32>>
where
    F: Fn(&ObjFace) -> Option<&[u32]>,
{
    let mut out = Vec::with_capacity(obj.num_faces() * per_face);
    for (f, face) in obj.faces().iter().enumerate() {
        if face.num_vertices() < per_face {
            return Err(too_few_vertices(f, face, per_face));
        }
        let Some(values) = indices(face) else {
            return Err(ObjError::InvalidFace {
                details: format!("face {} has no {} indices", f, what),
            });
        };
        out.extend_from_slice(&values[..per_face]);
    }
    Ok(out)
}

/// The first `per_face` vertex indices of every face, concatenated.
///
/// Fails with [`ObjError::InvalidFace`] if a face has fewer vertices.
/// Additional vertices of larger faces are ignored.
pub fn face_vertex_indices(obj: &Obj, per_face: usize) -> ObjResult<Vec<u32>> {
    collect_indices(obj, per_face, "vertex", |face| Some(face.vertex_indices()))
}

/// Like [`face_vertex_indices`] for texture coordinate indices.
///
/// Every face must carry texture coordinate indices.
pub fn face_tex_coord_indices(obj: &Obj, per_face: usize) -> ObjResult<Vec<u32>> {
    collect_indices(obj, per_face, "texture coordinate", ObjFace::tex_coord_indices)
}

/// Like [`face_vertex_indices`] for normal indices.
///
/// Every face must carry normal indices.
pub fn face_normal_indices(obj: &Obj, per_face: usize) -> ObjResult<Vec<u32>> {
    collect_indices(obj, per_face, "normal", ObjFace::normal_indices)
}

/// Total number of face corners.
pub fn total_face_vertex_count(obj: &Obj) -> usize {
    obj.faces().iter().map(ObjFace::num_vertices).sum()
}

fn flatten(tuples: &[FloatTuple], dims: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(tuples.len() * dims);
    for t in tuples {
        out.extend((0..dims).map(|i| t.get_or_zero(i)));
    }
    out
}

/// Vertex positions as `x, y, z` triples; missing components are 0.
pub fn vertices(obj: &Obj) -> Vec<f32> {
    flatten(obj.vertices(), 3)
}

/// Normals as `x, y, z` triples; missing components are 0.
pub fn normals(obj: &Obj) -> Vec<f32> {
    flatten(obj.normals(), 3)
}

/// Texture coordinates with `dims` components each.
///
/// With `flip_v`, the second component is stored as `1 - v`.
pub fn tex_coords(obj: &Obj, dims: usize, flip_v: bool) -> Vec<f32> {
    let mut out = flatten(obj.tex_coords(), dims);
    if flip_v && dims >= 2 {
        for v in out.iter_mut().skip(1).step_by(dims) {
            *v = 1.0 - *v;
        }
    }
    out
}

fn check_len(what: &str, values: &[f32], stride: usize) -> ObjResult<usize> {
    if values.len() % stride != 0 {
        return Err(ObjError::InvalidFace {
            details: format!(
                "{} array length {} is not a multiple of {}",
                what,
                values.len(),
                stride
            ),
        });
    }
    Ok(values.len() / stride)
}

/// Build a mesh from indexed triangle data.
///
/// `vertices` and `normals` hold `x, y, z` triples, `tex_coords` holds
/// `u, v` pairs, and every three `indices` form one triangle that uses the
/// same index for all attributes present.
///
/// # Errors
///
/// [`ObjError::InvalidFace`] if an array length does not match its stride or
/// an index is out of range for any supplied array.
pub fn create_from_indexed_triangles(
    indices: &[u32],
    vertices: &[f32],
    tex_coords: Option<&[f32]>,
    normals: Option<&[f32]>,
) -> ObjResult<Obj> {
    if indices.len() % 3 != 0 {
        return Err(ObjError::InvalidFace {
            details: format!("{} indices do not form whole triangles", indices.len()),
        });
    }
    let num_vertices = check_len("vertex", vertices, 3)?;
    let num_tex_coords = tex_coords
        .map(|t| check_len("texture coordinate", t, 2))
        .transpose()?;
    let num_normals = normals.map(|n| check_len("normal", n, 3)).transpose()?;

    let limit = [Some(num_vertices), num_tex_coords, num_normals]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(0);
    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= limit) {
        return Err(ObjError::InvalidFace {
            details: format!("index {} out of range for {} elements", bad, limit),
        });
    }

    let mut obj = Obj::new();
    for v in vertices.chunks_exact(3) {
        obj.add_vertex(FloatTuple::new3(v[0], v[1], v[2]));
    }
    for t in tex_coords.unwrap_or(&[]).chunks_exact(2) {
        obj.add_tex_coord(FloatTuple::new2(t[0], t[1]));
    }
    for n in normals.unwrap_or(&[]).chunks_exact(3) {
        obj.add_normal(FloatTuple::new3(n[0], n[1], n[2]));
    }
    for tri in indices.chunks_exact(3) {
        let corners = tri.to_vec();
        obj.add_face(ObjFace::from_parts(
            corners.clone(),
            tex_coords.is_some().then(|| corners.clone()),
            normals.is_some().then(|| corners.clone()),
        ));
    }
    Ok(obj)
}
