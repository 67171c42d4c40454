//! Face and vertex normal computation.

use hashbrown::HashMap;
use nalgebra::Vector3;
use tracing::debug;

use crate::adjacency::ObjAdjacency;
use crate::obj::{Obj, ObjSink};
use crate::transform::{copy_pools, FaceMembership};
use crate::types::{FloatTuple, ObjFace};

/// Unit normal of a polygon face using Newell's method.
///
/// Works for non-planar polygons of any size. Returns `None` for faces with
/// fewer than three vertices and for faces whose normal has zero length.
pub fn face_normal(obj: &Obj, face: &ObjFace) -> Option<Vector3<f32>> {
    let n = face.num_vertices();
    if n < 3 {
        return None;
    }
    let mut normal = Vector3::<f32>::zeros();
    for i in 0..n {
        let p0 = obj.vertex(face.vertex_index(i) as usize).to_vector();
        let p1 = obj.vertex(face.vertex_index((i + 1) % n) as usize).to_vector();
        normal.x += (p0.y - p1.y) * (p0.z + p1.z);
        normal.y += (p0.z - p1.z) * (p0.x + p1.x);
        normal.z += (p0.x - p1.x) * (p0.y + p1.y);
    }
    let len_sq = normal.norm_squared();
    if len_sq > 0.0 {
        Some(normal / len_sq.sqrt())
    } else {
        None
    }
}

/// Give every face without normals one computed normal per vertex.
///
/// A vertex normal is the normalized sum of the normals of all faces using
/// that vertex. Faces that already have normals are copied unchanged, and
/// identical computed normals share one entry in the normal pool. A vertex
/// whose faces are all lines or points gets the zero normal.
pub fn add_computed_normals(input: &Obj) -> Obj {
    let mut output = Obj::new();
    add_computed_normals_into(input, &mut output);
    debug!(
        "Computed normals: {} -> {} normals",
        input.num_normals(),
        output.num_normals()
    );
    output
}

/// [`add_computed_normals`] into an arbitrary sink.
pub fn add_computed_normals_into<S: ObjSink>(input: &Obj, mut output: S) {
    let adjacency = ObjAdjacency::build(input.faces());
    let face_normals: Vec<Option<Vector3<f32>>> =
        input.faces().iter().map(|f| face_normal(input, f)).collect();

    let mut lookup: HashMap<FloatTuple, u32> = HashMap::new();
    for (i, &n) in input.normals().iter().enumerate() {
        lookup.entry(n).or_insert(i as u32);
    }
    let mut added: Vec<FloatTuple> = Vec::new();

    let mut faces = Vec::with_capacity(input.num_faces());
    for face in input.faces() {
        if face.contains_normal_indices() {
            faces.push(face.clone());
            continue;
        }
        let normal_indices = face
            .vertex_indices()
            .iter()
            .map(|&v| {
                let sum: Vector3<f32> = adjacency
                    .faces_for_vertex(v)
                    .unwrap_or(&[])
                    .iter()
                    .filter_map(|&f| face_normals[f as usize])
                    .sum();
                let normal = FloatTuple::normalized(sum.x, sum.y, sum.z);
                *lookup.entry(normal).or_insert_with(|| {
                    added.push(normal);
                    (input.num_normals() + added.len() - 1) as u32
                })
            })
            .collect();
        faces.push(ObjFace::from_parts(
            face.vertex_indices().to_vec(),
            face.tex_coord_indices().map(<[u32]>::to_vec),
            Some(normal_indices),
        ));
    }

    copy_pools(input, &mut output);
    for n in added {
        output.add_normal(n);
    }
    let membership = FaceMembership::of(input);
    let mut previous = None;
    for (f, face) in faces.into_iter().enumerate() {
        membership.activate(f, previous, &mut output);
        previous = Some(f);
        output.add_face(face);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_obj;
    use approx::assert_relative_eq;

    fn parse(text: &str) -> Obj {
        read_obj(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_face_normal_ccw_quad() {
        let obj = parse("v 0 0 0\nv 2 0 0\nv 2 2 0\nv 0 2 0\nf 1 2 3 4\n");
        let n = face_normal(&obj, obj.face(0)).expect("quad has a normal");
        assert_relative_eq!(n.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(n.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_face_normal_degenerate() {
        let obj = parse("v 0 0 0\nv 1 0 0\nv 2 0 0\nf 1 2 3\nf 1 2\n");
        assert!(face_normal(&obj, obj.face(0)).is_none());
        assert!(face_normal(&obj, obj.face(1)).is_none());
    }

    #[test]
    fn test_small_triangle_normal() {
        let obj = parse("v 0 0 0\nv 0.0001 0 0\nv 0 0.0001 0\nf 1 2 3\n");
        let n = face_normal(&obj, obj.face(0)).expect("small triangle has a normal");
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);

        let result = add_computed_normals(&obj);
        assert_eq!(result.num_normals(), 1);
        assert_relative_eq!(result.normal(0).z().unwrap(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_keeps_existing_normals() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0.5 1.5 1
vn 1 0 0
vn 0 1 0
vn 0 -1 0
f 1 2 3 4
f 4//1 3//2 5//3
";
        let obj = parse(text);
        let result = add_computed_normals(&obj);
        assert_eq!(result.num_normals(), 5);
        assert_eq!(result.face(0).normal_indices(), Some(&[3, 3, 4, 4][..]));
        assert_eq!(result.face(1), obj.face(1));
        assert_eq!(result.normal(3), FloatTuple::new3(0.0, 0.0, 1.0));

        // Shared vertices blend the square with the tilted triangle.
        let blended = result.normal(4);
        assert!(blended.y().unwrap() < 0.0);
        assert!(blended.z().unwrap() > 0.0);
        assert_relative_eq!(blended.to_vector().norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_lines_get_zero_normals() {
        let obj = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 2 0 0\nv 2 1 0\nf 1 2 3\nf 2 4\nf 3 5\n");
        let result = add_computed_normals(&obj);
        assert_eq!(result.num_normals(), 2);
        assert_eq!(result.face(0).normal_indices(), Some(&[0, 0, 0][..]));
        assert_eq!(result.face(1).normal_indices(), Some(&[0, 1][..]));
        assert_eq!(result.face(2).normal_indices(), Some(&[0, 1][..]));
        assert_eq!(result.normal(1), FloatTuple::new3(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_membership_is_preserved() {
        let obj = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\ng tri\nusemtl m\nf 1 2 3\n");
        let result = add_computed_normals(&obj);
        assert_eq!(result.group("tri").unwrap().face_indices(), &[0]);
        assert_eq!(result.material_group("m").unwrap().face_indices(), &[0]);
    }
}
