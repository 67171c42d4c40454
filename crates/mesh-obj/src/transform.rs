//! Mesh transforms.
//!
//! Every transform reads an [`Obj`] and builds a new mesh; the input is never
//! modified. The `*_into` variants write into any [`ObjSink`] instead of a
//! fresh [`Obj`]. Faces keep the groups and material they had in the input.
//!
//! # Example
//!
//! ```
//! use mesh_obj::{read_obj, transform};
//!
//! let obj = read_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n".as_bytes()).unwrap();
//! let triangles = transform::triangulate(&obj);
//! assert_eq!(triangles.num_faces(), 2);
//! assert_eq!(triangles.face(1).vertex_indices(), &[0, 2, 3]);
//! ```

use hashbrown::HashMap;
use tracing::debug;

use crate::obj::{Obj, ObjGroup, ObjSink};
use crate::types::{FloatTuple, ObjFace};

/// Group names and material of every face of a mesh.
pub(crate) struct FaceMembership<'a> {
    groups: Vec<Vec<&'a str>>,
    materials: Vec<Option<&'a str>>,
}

impl<'a> FaceMembership<'a> {
    pub(crate) fn of(obj: &'a Obj) -> Self {
        let mut groups: Vec<Vec<&'a str>> = vec![Vec::new(); obj.num_faces()];
        for group in obj.groups() {
            for &f in group.face_indices() {
                groups[f as usize].push(group.name());
            }
        }
        let mut materials: Vec<Option<&'a str>> = vec![None; obj.num_faces()];
        for group in obj.material_groups() {
            for &f in group.face_indices() {
                materials[f as usize] = Some(group.name());
            }
        }
        Self { groups, materials }
    }

    fn same(&self, a: usize, b: usize) -> bool {
        self.groups[a] == self.groups[b] && self.materials[a] == self.materials[b]
    }

    /// Activate the groups and material of input face `face` on `sink`,
    /// unless they equal those of the previously emitted face `previous`.
    pub(crate) fn activate<S: ObjSink>(&self, face: usize, previous: Option<usize>, sink: &mut S) {
        if previous.is_some_and(|p| self.same(p, face)) {
            return;
        }
        let names: Vec<String> = self.groups[face].iter().map(|n| n.to_string()).collect();
        sink.set_active_groups(&names);
        sink.set_active_material(self.materials[face]);
    }
}

/// Copy material libraries and all element pools of `input` to `output`.
pub(crate) fn copy_pools<S: ObjSink>(input: &Obj, output: &mut S) {
    if !input.mtl_file_names().is_empty() {
        output.set_mtl_file_names(input.mtl_file_names());
    }
    for &v in input.vertices() {
        output.add_vertex(v);
    }
    for &vt in input.tex_coords() {
        output.add_tex_coord(vt);
    }
    for &vn in input.normals() {
        output.add_normal(vn);
    }
}

/// Emit `faces` (parallel to the input faces) with the input membership.
fn emit_faces<S: ObjSink>(input: &Obj, faces: Vec<ObjFace>, output: &mut S) {
    let membership = FaceMembership::of(input);
    let mut previous = None;
    for (f, face) in faces.into_iter().enumerate() {
        membership.activate(f, previous, output);
        previous = Some(f);
        output.add_face(face);
    }
}

fn log_result(what: &str, input: &Obj, output: &Obj) {
    debug!(
        "{}: {} -> {} vertices, {} -> {} faces",
        what,
        input.num_vertices(),
        output.num_vertices(),
        input.num_faces(),
        output.num_faces()
    );
}

/// Split every face with more than three vertices into a triangle fan around
/// its first vertex.
pub fn triangulate(input: &Obj) -> Obj {
    let mut output = Obj::new();
    triangulate_into(input, &mut output);
    log_result("Triangulate", input, &output);
    output
}

/// [`triangulate`] into an arbitrary sink.
pub fn triangulate_into<S: ObjSink>(input: &Obj, mut output: S) {
    copy_pools(input, &mut output);
    let membership = FaceMembership::of(input);
    let mut previous = None;
    for (f, face) in input.faces().iter().enumerate() {
        membership.activate(f, previous, &mut output);
        previous = Some(f);

        let n = face.num_vertices();
        if n <= 3 {
            output.add_face(face.clone());
            continue;
        }
        for i in 1..n - 1 {
            output.add_face(face.select(&[0, i, i + 1]));
        }
    }
}

#[derive(Clone, Copy)]
enum Attribute {
    TexCoord,
    Normal,
}

impl Attribute {
    fn indices(self, face: &ObjFace) -> Option<&[u32]> {
        match self {
            Attribute::TexCoord => face.tex_coord_indices(),
            Attribute::Normal => face.normal_indices(),
        }
    }
}

/// Duplicate vertices so that each vertex is used with one attribute index.
fn make_attribute_unique_into<S: ObjSink>(
    input: &Obj,
    attribute: Attribute,
    index_mapping: Option<&mut Vec<u32>>,
    mut output: S,
) {
    let mut vertices: Vec<FloatTuple> = input.vertices().to_vec();
    let mut mapping: Vec<u32> = (0..input.num_vertices() as u32).collect();

    // Attribute index claimed by each original vertex, and the duplicates
    // created for every further pairing.
    let mut claimed: HashMap<u32, u32> = HashMap::new();
    let mut duplicates: HashMap<(u32, u32), u32> = HashMap::new();

    let mut faces = Vec::with_capacity(input.num_faces());
    for face in input.faces() {
        let Some(attributes) = attribute.indices(face) else {
            faces.push(face.clone());
            continue;
        };

        let mut vertex_indices = Vec::with_capacity(face.num_vertices());
        for (&v, &a) in face.vertex_indices().iter().zip(attributes) {
            let index = match claimed.get(&v).copied() {
                None => {
                    claimed.insert(v, a);
                    v
                }
                Some(owner) if owner == a => v,
                Some(_) => *duplicates.entry((v, a)).or_insert_with(|| {
                    vertices.push(input.vertex(v as usize));
                    mapping.push(v);
                    (vertices.len() - 1) as u32
                }),
            };
            vertex_indices.push(index);
        }
        faces.push(ObjFace::from_parts(
            vertex_indices,
            face.tex_coord_indices().map(<[u32]>::to_vec),
            face.normal_indices().map(<[u32]>::to_vec),
        ));
    }

    if !input.mtl_file_names().is_empty() {
        output.set_mtl_file_names(input.mtl_file_names());
    }
    for v in vertices {
        output.add_vertex(v);
    }
    for &vt in input.tex_coords() {
        output.add_tex_coord(vt);
    }
    for &vn in input.normals() {
        output.add_normal(vn);
    }
    emit_faces(input, faces, &mut output);

    if let Some(out) = index_mapping {
        *out = mapping;
    }
}

/// Duplicate vertices that are used with more than one texture coordinate.
///
/// Afterwards every vertex index is paired with exactly one texture
/// coordinate index. The first pairing seen keeps the original vertex;
/// later pairings get new vertices appended to the pool.
///
/// If `index_mapping` is given, it receives for every output vertex the
/// index of the input vertex it was copied from.
pub fn make_tex_coords_unique(input: &Obj, index_mapping: Option<&mut Vec<u32>>) -> Obj {
    let mut output = Obj::new();
    make_tex_coords_unique_into(input, index_mapping, &mut output);
    log_result("Make tex coords unique", input, &output);
    output
}

/// [`make_tex_coords_unique`] into an arbitrary sink.
pub fn make_tex_coords_unique_into<S: ObjSink>(
    input: &Obj,
    index_mapping: Option<&mut Vec<u32>>,
    output: S,
) {
    make_attribute_unique_into(input, Attribute::TexCoord, index_mapping, output);
}

/// Duplicate vertices that are used with more than one normal.
///
/// Works like [`make_tex_coords_unique`], keyed by normal index.
pub fn make_normals_unique(input: &Obj, index_mapping: Option<&mut Vec<u32>>) -> Obj {
    let mut output = Obj::new();
    make_normals_unique_into(input, index_mapping, &mut output);
    log_result("Make normals unique", input, &output);
    output
}

/// [`make_normals_unique`] into an arbitrary sink.
pub fn make_normals_unique_into<S: ObjSink>(
    input: &Obj,
    index_mapping: Option<&mut Vec<u32>>,
    output: S,
) {
    make_attribute_unique_into(input, Attribute::Normal, index_mapping, output);
}

fn zero_like(t: FloatTuple) -> FloatTuple {
    FloatTuple::from_slice(&[0.0; 4][..t.dimensions()]).unwrap_or(FloatTuple::new3(0.0, 0.0, 0.0))
}

/// Re-index the mesh so one index addresses the vertex, texture coordinate
/// and normal pools alike.
///
/// Each distinct (vertex, texture coordinate, normal) triple becomes one
/// output vertex, in first-seen order. When only some faces carry texture
/// coordinates or normals, the other vertices get a zero placeholder so the
/// pools stay the same length.
pub fn make_vertex_indexed(input: &Obj) -> Obj {
    let mut output = Obj::new();
    make_vertex_indexed_into(input, &mut output);
    log_result("Make vertex indexed", input, &output);
    output
}

/// [`make_vertex_indexed`] into an arbitrary sink.
pub fn make_vertex_indexed_into<S: ObjSink>(input: &Obj, mut output: S) {
    let tex_placeholder = input.tex_coords().first().copied().map(zero_like);
    let normal_placeholder = input.normals().first().copied().map(zero_like);

    let mut vertices = Vec::new();
    let mut tex_coords = Vec::new();
    let mut normals = Vec::new();
    let mut lookup: HashMap<(u32, Option<u32>, Option<u32>), u32> = HashMap::new();

    let mut faces = Vec::with_capacity(input.num_faces());
    for face in input.faces() {
        let mut indices = Vec::with_capacity(face.num_vertices());
        for i in 0..face.num_vertices() {
            let key = (
                face.vertex_index(i),
                face.tex_coord_index(i),
                face.normal_index(i),
            );
            let index = *lookup.entry(key).or_insert_with(|| {
                vertices.push(input.vertex(key.0 as usize));
                if let Some(t) = key.1.map(|t| input.tex_coord(t as usize)).or(tex_placeholder) {
                    tex_coords.push(t);
                }
                if let Some(n) = key.2.map(|n| input.normal(n as usize)).or(normal_placeholder) {
                    normals.push(n);
                }
                (vertices.len() - 1) as u32
            });
            indices.push(index);
        }
        let tex = face.contains_tex_coord_indices().then(|| indices.clone());
        let norm = face.contains_normal_indices().then(|| indices.clone());
        faces.push(ObjFace::from_parts(indices, tex, norm));
    }

    if !input.mtl_file_names().is_empty() {
        output.set_mtl_file_names(input.mtl_file_names());
    }
    for v in vertices {
        output.add_vertex(v);
    }
    for vt in tex_coords {
        output.add_tex_coord(vt);
    }
    for vn in normals {
        output.add_normal(vn);
    }
    emit_faces(input, faces, &mut output);
}

/// Prepare a mesh for indexed triangle rendering: triangulate, make texture
/// coordinates and normals unique, then single-index all attributes.
pub fn convert_to_renderable(input: &Obj) -> Obj {
    let triangles = triangulate(input);
    let tex_unique = make_tex_coords_unique(&triangles, None);
    let normals_unique = make_normals_unique(&tex_unique, None);
    let output = make_vertex_indexed(&normals_unique);
    log_result("Convert to renderable", input, &output);
    output
}

/// Extract faces of `input` into `output`, renumbering all pools densely in
/// first-use order.
pub(crate) fn extract_faces_into<S: ObjSink>(
    input: &Obj,
    membership: &FaceMembership<'_>,
    face_indices: &[u32],
    index_mapping: Option<&mut Vec<u32>>,
    mut output: S,
) {
    fn local(
        index: u32,
        lookup: &mut HashMap<u32, u32>,
        order: &mut Vec<u32>,
    ) -> u32 {
        *lookup.entry(index).or_insert_with(|| {
            order.push(index);
            (order.len() - 1) as u32
        })
    }

    let mut vertex_lookup = HashMap::new();
    let mut tex_lookup = HashMap::new();
    let mut normal_lookup = HashMap::new();
    let mut vertex_order = Vec::new();
    let mut tex_order = Vec::new();
    let mut normal_order = Vec::new();

    let mut faces = Vec::with_capacity(face_indices.len());
    for &f in face_indices {
        let face = input.face(f as usize);
        let vertices = face
            .vertex_indices()
            .iter()
            .map(|&v| local(v, &mut vertex_lookup, &mut vertex_order))
            .collect();
        let tex = face.tex_coord_indices().map(|t| {
            t.iter()
                .map(|&i| local(i, &mut tex_lookup, &mut tex_order))
                .collect()
        });
        let normals = face.normal_indices().map(|n| {
            n.iter()
                .map(|&i| local(i, &mut normal_lookup, &mut normal_order))
                .collect()
        });
        faces.push((f as usize, ObjFace::from_parts(vertices, tex, normals)));
    }

    if !input.mtl_file_names().is_empty() {
        output.set_mtl_file_names(input.mtl_file_names());
    }
    for &v in &vertex_order {
        output.add_vertex(input.vertex(v as usize));
    }
    for &t in &tex_order {
        output.add_tex_coord(input.tex_coord(t as usize));
    }
    for &n in &normal_order {
        output.add_normal(input.normal(n as usize));
    }
    let mut previous = None;
    for (f, face) in faces {
        membership.activate(f, previous, &mut output);
        previous = Some(f);
        output.add_face(face);
    }

    if let Some(out) = index_mapping {
        *out = vertex_order;
    }
}

/// Build a standalone mesh from the faces of `group`.
///
/// Only the elements referenced by those faces are kept, renumbered densely
/// in first-use order. If `index_mapping` is given, it receives for every
/// output vertex the index of the input vertex it came from.
pub fn group_to_obj(input: &Obj, group: &ObjGroup, index_mapping: Option<&mut Vec<u32>>) -> Obj {
    let mut output = Obj::new();
    group_to_obj_into(input, group, index_mapping, &mut output);
    debug!(
        "Group '{}' to OBJ: {} faces, {} vertices",
        group.name(),
        output.num_faces(),
        output.num_vertices()
    );
    output
}

/// [`group_to_obj`] into an arbitrary sink.
pub fn group_to_obj_into<S: ObjSink>(
    input: &Obj,
    group: &ObjGroup,
    index_mapping: Option<&mut Vec<u32>>,
    output: S,
) {
    let membership = FaceMembership::of(input);
    extract_faces_into(input, &membership, group.face_indices(), index_mapping, output);
}

/// Append all elements of `input` to `output`.
///
/// Face indices are offset by the current pool sizes of `output`, and the
/// faces join the same groups and materials as in `input`. Material library
/// names not yet present in `output` are appended.
pub fn add(input: &Obj, output: &mut Obj) {
    let vertex_offset = output.num_vertices() as u32;
    let tex_offset = output.num_tex_coords() as u32;
    let normal_offset = output.num_normals() as u32;

    let mut names = output.mtl_file_names().to_vec();
    let before = names.len();
    for name in input.mtl_file_names() {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    if names.len() != before {
        output.set_mtl_file_names(&names);
    }

    for &v in input.vertices() {
        output.add_vertex(v);
    }
    for &vt in input.tex_coords() {
        output.add_tex_coord(vt);
    }
    for &vn in input.normals() {
        output.add_normal(vn);
    }

    let shift = |indices: &[u32], offset: u32| -> Vec<u32> {
        indices.iter().map(|&i| i + offset).collect()
    };
    let membership = FaceMembership::of(input);
    let mut previous = None;
    for (f, face) in input.faces().iter().enumerate() {
        membership.activate(f, previous, output);
        previous = Some(f);
        output.add_face(ObjFace::from_parts(
            shift(face.vertex_indices(), vertex_offset),
            face.tex_coord_indices().map(|t| shift(t, tex_offset)),
            face.normal_indices().map(|n| shift(n, normal_offset)),
        ));
    }
    debug!(
        "Added {} faces; mesh now has {} faces",
        input.num_faces(),
        output.num_faces()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::{EventSink, ObjEvent};
    use crate::reader::read_obj;

    const SQUARE_AND_TRIANGLE: &str = "\
v 0 0 0
v 4 0 0
v 4 4 0
v 0 4 0
v 2 6 0
f 1 2 3 4
f 4 3 5
";

    const SQUARE_AND_TRIANGLE_IN_TWO_GROUPS: &str = "\
v 0 0 0
v 4 0 0
v 4 4 0
v 0 4 0
v 2 6 0
g group0
f 1 2 3 4
g group1
f 4 3 5
";

    const TWO_TRIANGLES_ONE_IN_DEFAULT_GROUP: &str = "\
v 0 0 0
v 4 0 0
v 4 4 0
v 0 4 0
f 1 2 3
g group0
f 1 3 4
";

    const FOUR_TRIANGLES_IN_MIXED_GROUPS: &str = "\
mtllib twoMaterialsA.mtl
v 0 0 0
v 4 0 0
v 4 4 0
v 0 4 0
v 8 0 0
v 8 4 0
g group0
usemtl material0
f 1 2 3
usemtl material1
f 1 3 4
g group1
usemtl material2
f 2 5 3
usemtl material3
f 5 6 3
";

    const TWO_TRIANGLES_WITH_AMBIGUOUS_TEX_COORDS: &str = "\
v 0 0 0
v 4 0 0
v 4 4 0
v 0 4 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3
f 1/4 3/3 4/4
";

    const SQUARE_TEXTURED: &str = "\
v 0 0 0
v 4 0 0
v 4 4 0
v 0 4 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    fn parse(text: &str) -> Obj {
        read_obj(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_triangulate_square_and_triangle() {
        let obj = parse(SQUARE_AND_TRIANGLE);
        let tri = triangulate(&obj);
        assert_eq!(tri.num_faces(), 3);
        assert_eq!(tri.num_vertices(), 5);
        assert_eq!(tri.num_groups(), 1);
        assert_eq!(tri.num_material_groups(), 0);
        assert_eq!(tri.face(0).vertex_indices(), &[0, 1, 2]);
        assert_eq!(tri.face(1).vertex_indices(), &[0, 2, 3]);
        assert_eq!(tri.face(2).vertex_indices(), &[3, 2, 4]);
    }

    #[test]
    fn test_triangulate_is_idempotent() {
        let obj = parse(FOUR_TRIANGLES_IN_MIXED_GROUPS);
        let once = triangulate(&parse(SQUARE_AND_TRIANGLE_IN_TWO_GROUPS));
        let twice = triangulate(&once);
        assert_eq!(once.faces(), twice.faces());
        assert_eq!(once.groups(), twice.groups());

        let same = triangulate(&obj);
        assert_eq!(same.faces(), obj.faces());
        assert_eq!(same.material_groups(), obj.material_groups());
    }

    #[test]
    fn test_triangulate_keeps_membership_and_attributes() {
        let obj = parse(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\n\
             g quad\nusemtl red\nf 1/1/1 2/1/1 3/1/1 4/1/1\n",
        );
        let tri = triangulate(&obj);
        assert_eq!(tri.group("quad").unwrap().face_indices(), &[0, 1]);
        assert_eq!(tri.material_group("red").unwrap().face_indices(), &[0, 1]);
        assert_eq!(tri.face(1).tex_coord_indices(), Some(&[0, 0, 0][..]));
        assert_eq!(tri.face(1).normal_indices(), Some(&[0, 0, 0][..]));
    }

    #[test]
    fn test_make_tex_coords_unique() {
        let obj = parse(TWO_TRIANGLES_WITH_AMBIGUOUS_TEX_COORDS);
        let mut mapping = Vec::new();
        let unique = make_tex_coords_unique(&obj, Some(&mut mapping));
        assert_eq!(unique.num_faces(), 2);
        assert_eq!(unique.num_vertices(), 5);
        assert_eq!(unique.num_tex_coords(), 4);
        assert_eq!(unique.num_normals(), 0);
        assert_eq!(unique.num_groups(), 1);
        assert_eq!(unique.num_material_groups(), 0);
        assert_eq!(unique.face(1).vertex_indices(), &[4, 2, 3]);
        assert_eq!(mapping, vec![0, 1, 2, 3, 0]);
        assert_eq!(unique.vertex(4), obj.vertex(0));
    }

    #[test]
    fn test_make_normals_unique() {
        let obj = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvn 0 0 -1\n\
             f 1//1 2//1 3//1\nf 1//2 3//2 2//2\n",
        );
        let unique = make_normals_unique(&obj, None);
        assert_eq!(unique.num_vertices(), 6);
        assert_eq!(unique.face(1).vertex_indices(), &[3, 4, 5]);
        assert_eq!(unique.face(1).normal_indices(), Some(&[1, 1, 1][..]));
    }

    #[test]
    fn test_make_vertex_indexed() {
        let obj = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\n\
             f 1/3/1 2/2/1 3/1/1\nf 3/1/1 2/2/1 1/1/1\n",
        );
        let indexed = make_vertex_indexed(&obj);
        assert_eq!(indexed.num_vertices(), 4);
        assert_eq!(indexed.num_tex_coords(), 4);
        assert_eq!(indexed.num_normals(), 4);

        for f in 0..obj.num_faces() {
            let before = obj.face(f);
            let after = indexed.face(f);
            for i in 0..before.num_vertices() {
                let k = after.vertex_index(i) as usize;
                assert_eq!(after.tex_coord_index(i), Some(k as u32));
                assert_eq!(after.normal_index(i), Some(k as u32));
                assert_eq!(indexed.vertex(k), obj.vertex(before.vertex_index(i) as usize));
                assert_eq!(
                    indexed.tex_coord(k),
                    obj.tex_coord(before.tex_coord_index(i).unwrap() as usize)
                );
                assert_eq!(
                    indexed.normal(k),
                    obj.normal(before.normal_index(i).unwrap() as usize)
                );
            }
        }
    }

    #[test]
    fn test_make_vertex_indexed_pads_missing_attributes() {
        let obj = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.5 0.5\nf 1/1 2/1 3/1\nf 3 2 1\n");
        let indexed = make_vertex_indexed(&obj);
        assert_eq!(indexed.num_vertices(), 6);
        assert_eq!(indexed.num_tex_coords(), 6);
        assert_eq!(indexed.tex_coord(3), FloatTuple::new2(0.0, 0.0));
        assert!(!indexed.face(1).contains_tex_coord_indices());
    }

    #[test]
    fn test_convert_to_renderable() {
        let obj = parse(SQUARE_TEXTURED);
        let renderable = convert_to_renderable(&obj);
        assert_eq!(renderable.num_faces(), 2);
        assert_eq!(renderable.num_vertices(), 4);
        assert_eq!(renderable.num_tex_coords(), 4);
        assert_eq!(renderable.num_normals(), 0);
        assert_eq!(renderable.num_groups(), 1);
        assert_eq!(renderable.num_material_groups(), 0);
    }

    #[test]
    fn test_group_to_obj() {
        let obj = parse(SQUARE_AND_TRIANGLE_IN_TWO_GROUPS);
        assert_eq!(obj.num_groups(), 3);

        let group0 = group_to_obj(&obj, obj.group("group0").unwrap(), None);
        assert_eq!(group0.num_faces(), 1);
        assert_eq!(group0.num_vertices(), 4);
        assert_eq!(group0.num_groups(), 2);
        assert_eq!(group0.num_material_groups(), 0);

        let mut mapping = Vec::new();
        let group1 = group_to_obj(&obj, obj.group("group1").unwrap(), Some(&mut mapping));
        assert_eq!(group1.num_faces(), 1);
        assert_eq!(group1.num_vertices(), 3);
        assert_eq!(group1.num_groups(), 2);
        assert_eq!(group1.face(0).vertex_indices(), &[0, 1, 2]);
        assert_eq!(mapping, vec![3, 2, 4]);
    }

    #[test]
    fn test_group_to_obj_with_event_sink() {
        let obj = parse(SQUARE_AND_TRIANGLE_IN_TWO_GROUPS);
        let mut vertices = 0;
        let mut faces = 0;
        group_to_obj_into(
            &obj,
            obj.group("group1").unwrap(),
            None,
            EventSink::new(|e| match e {
                ObjEvent::Vertex(_) => vertices += 1,
                ObjEvent::Face(_) => faces += 1,
                _ => {}
            }),
        );
        assert_eq!(vertices, 3);
        assert_eq!(faces, 1);
    }

    #[test]
    fn test_add_same_twice() {
        let obj = parse(TWO_TRIANGLES_ONE_IN_DEFAULT_GROUP);
        assert_eq!(obj.num_groups(), 2);

        let mut combined = Obj::new();
        add(&obj, &mut combined);
        add(&obj, &mut combined);
        assert_eq!(combined.num_faces(), 4);
        assert_eq!(combined.num_vertices(), 8);
        assert_eq!(combined.num_groups(), 2);
        assert_eq!(combined.num_material_groups(), 0);
        assert_eq!(combined.group("default").unwrap().face_indices(), &[0, 2]);
        assert_eq!(combined.face(3).vertex_indices(), &[4, 6, 7]);
    }

    #[test]
    fn test_add_different() {
        let obj0 = parse(TWO_TRIANGLES_ONE_IN_DEFAULT_GROUP);
        let obj1 = parse(SQUARE_AND_TRIANGLE_IN_TWO_GROUPS);
        let mut combined = Obj::new();
        add(&obj0, &mut combined);
        add(&obj1, &mut combined);
        assert_eq!(combined.num_faces(), 4);
        assert_eq!(combined.num_vertices(), 9);
        assert_eq!(combined.num_groups(), 3);
        assert_eq!(combined.num_material_groups(), 0);
    }

    #[test]
    fn test_add_with_material_groups() {
        let obj = parse(FOUR_TRIANGLES_IN_MIXED_GROUPS);
        assert_eq!(obj.num_groups(), 3);
        assert_eq!(obj.num_material_groups(), 4);

        let mut combined = Obj::new();
        add(&obj, &mut combined);
        add(&obj, &mut combined);
        assert_eq!(combined.num_faces(), 8);
        assert_eq!(combined.num_vertices(), 12);
        assert_eq!(combined.num_groups(), 3);
        assert_eq!(combined.num_material_groups(), 4);
        assert_eq!(combined.mtl_file_names(), &["twoMaterialsA.mtl".to_string()]);
        assert_eq!(
            combined.material_group("material3").unwrap().face_indices(),
            &[3, 7]
        );
    }
}
