//! Splitting one mesh into several.
//!
//! Every part is a standalone [`Obj`] holding only the elements its faces
//! use, renumbered densely in first-use order.

use hashbrown::HashSet;
use tracing::debug;

use crate::obj::Obj;
use crate::transform::{extract_faces_into, FaceMembership};

fn extract(input: &Obj, membership: &FaceMembership<'_>, face_indices: &[u32]) -> Obj {
    let mut part = Obj::new();
    extract_faces_into(input, membership, face_indices, None, &mut part);
    part
}

/// One mesh per non-empty group, in group order.
pub fn split_by_groups(input: &Obj) -> Vec<Obj> {
    let membership = FaceMembership::of(input);
    let parts: Vec<Obj> = input
        .groups()
        .iter()
        .filter(|g| !g.is_empty())
        .map(|g| extract(input, &membership, g.face_indices()))
        .collect();
    debug!("Split by groups: {} parts", parts.len());
    parts
}

/// One mesh per material group, in order of first use.
///
/// Faces without a material are not part of any result.
pub fn split_by_material_groups(input: &Obj) -> Vec<Obj> {
    let membership = FaceMembership::of(input);
    let parts: Vec<Obj> = input
        .material_groups()
        .iter()
        .filter(|g| !g.is_empty())
        .map(|g| extract(input, &membership, g.face_indices()))
        .collect();
    debug!("Split by material groups: {} parts", parts.len());
    parts
}

/// Split into consecutive runs of faces that use at most `max_vertices`
/// distinct vertices each.
///
/// Faces are never divided, so a single face with more vertices than the
/// limit ends up alone in its own part.
pub fn split_by_max_vertices(input: &Obj, max_vertices: usize) -> Vec<Obj> {
    let membership = FaceMembership::of(input);
    let mut parts = Vec::new();
    let mut chunk: Vec<u32> = Vec::new();
    let mut used: HashSet<u32> = HashSet::new();

    for (f, face) in input.faces().iter().enumerate() {
        let new_vertices = face
            .vertex_indices()
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|v| !used.contains(*v))
            .count();
        if !chunk.is_empty() && used.len() + new_vertices > max_vertices {
            parts.push(extract(input, &membership, &chunk));
            chunk.clear();
            used.clear();
        }
        chunk.push(f as u32);
        used.extend(face.vertex_indices().iter().copied());
    }
    if !chunk.is_empty() {
        parts.push(extract(input, &membership, &chunk));
    }
    debug!(
        "Split by max vertices ({}): {} parts",
        max_vertices,
        parts.len()
    );
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_obj;

    const SQUARE: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

    const TWO_GROUPS: &str = "\
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

    const FOUR_TRIANGLES_IN_MIXED_GROUPS: &str = "\
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
f 2 4 3
g group1
usemtl material2
f 3 4 5
usemtl material3
f 4 6 5
";

    fn parse(text: &str) -> Obj {
        read_obj(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_split_by_groups() {
        let parts = split_by_groups(&parse(TWO_GROUPS));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].num_vertices(), 4);
        assert_eq!(parts[1].num_vertices(), 3);
        assert!(parts[1].group("group1").is_some());

        assert_eq!(split_by_groups(&parse(SQUARE)).len(), 1);
    }

    #[test]
    fn test_split_by_material_groups() {
        let parts = split_by_material_groups(&parse(FOUR_TRIANGLES_IN_MIXED_GROUPS));
        assert_eq!(parts.len(), 4);
        for part in &parts {
            assert_eq!(part.num_faces(), 1);
            assert_eq!(part.num_vertices(), 3);
            assert_eq!(part.num_material_groups(), 1);
        }
        assert_eq!(parts[3].material_groups()[0].name(), "material3");

        assert!(split_by_material_groups(&parse(SQUARE)).is_empty());
    }

    #[test]
    fn test_split_parts_cover_every_membership() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
g a b
usemtl m
f 1 2 3
g b
f 3 2 1
usemtl
f 1 3 2
";
        let obj = parse(text);
        let memberships: usize = obj.groups().iter().map(|g| g.num_faces()).sum();
        assert_eq!(memberships, 5);

        let parts = split_by_groups(&obj);
        assert_eq!(parts.len(), 3);
        let faces: usize = parts.iter().map(Obj::num_faces).sum();
        assert_eq!(faces, memberships);

        let with_material = (0..obj.num_faces() as u32)
            .filter(|&f| obj.material_groups().iter().any(|g| g.face_indices().contains(&f)))
            .count();
        assert_eq!(with_material, 2);
        let faces: usize = split_by_material_groups(&obj).iter().map(Obj::num_faces).sum();
        assert_eq!(faces, with_material);
    }

    #[test]
    fn test_split_by_material_groups_skips_unassigned_faces() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nusemtl a\nf 1 2 3\nusemtl b\nf 3 2 1\n";
        let parts = split_by_material_groups(&parse(text));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].num_faces(), 1);
    }

    #[test]
    fn test_split_by_max_vertices() {
        let parts = split_by_max_vertices(&parse(FOUR_TRIANGLES_IN_MIXED_GROUPS), 4);
        assert_eq!(parts.len(), 2);
        for part in &parts {
            assert!(part.num_vertices() <= 4);
            assert_eq!(part.num_faces(), 2);
        }
        assert!(parts[1].group("group1").is_some());
        assert!(parts[1].group("group0").is_none());
    }

    #[test]
    fn test_split_oversized_face_stays_whole() {
        let parts = split_by_max_vertices(&parse(SQUARE), 3);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].num_vertices(), 4);
    }
}
