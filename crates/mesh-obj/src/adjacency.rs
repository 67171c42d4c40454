//! Face topology queries via adjacency maps.

use hashbrown::HashMap;

use crate::types::ObjFace;

/// Vertex-to-face and edge-to-face lookups for polygon faces.
///
/// Faces may have any number of vertices. A face with two vertices (a line)
/// contributes one edge; a single-vertex face contributes none.
#[derive(Debug, Clone, Default)]
pub struct ObjAdjacency {
    /// Maps vertex index → faces using this vertex, once per use.
    pub vertex_to_faces: HashMap<u32, Vec<u32>>,

    /// Maps edge (min_idx, max_idx) → faces sharing this edge.
    pub edge_to_faces: HashMap<(u32, u32), Vec<u32>>,
}

impl ObjAdjacency {
    /// Build adjacency maps from a face list.
    pub fn build(faces: &[ObjFace]) -> Self {
        let mut vertex_to_faces: HashMap<u32, Vec<u32>> = HashMap::new();
        let mut edge_to_faces: HashMap<(u32, u32), Vec<u32>> = HashMap::new();

        for (face_idx, face) in faces.iter().enumerate() {
            let face_idx = face_idx as u32;
            let indices = face.vertex_indices();

            for &v in indices {
                vertex_to_faces.entry(v).or_default().push(face_idx);
            }

            let num_edges = match indices.len() {
                0 | 1 => 0,
                2 => 1,
                n => n,
            };
            for i in 0..num_edges {
                let a = indices[i];
                let b = indices[(i + 1) % indices.len()];
                if a == b {
                    continue;
                }
                let edge_key = if a < b { (a, b) } else { (b, a) };
                edge_to_faces.entry(edge_key).or_default().push(face_idx);
            }
        }

        Self {
            vertex_to_faces,
            edge_to_faces,
        }
    }

    /// Edges used by exactly one face.
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.boundary_edges().count()
    }

    /// Count edges shared by more than two faces.
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }

    /// At most two faces per edge.
    pub fn is_manifold(&self) -> bool {
        self.edge_to_faces.values().all(|faces| faces.len() <= 2)
    }

    /// No edge with only one face.
    pub fn is_watertight(&self) -> bool {
        self.edge_to_faces.values().all(|faces| faces.len() >= 2)
    }

    /// Faces adjacent to a vertex, in face order.
    pub fn faces_for_vertex(&self, vertex_idx: u32) -> Option<&[u32]> {
        self.vertex_to_faces.get(&vertex_idx).map(|v| v.as_slice())
    }

    /// Faces adjacent to an edge. The edge is canonicalized (min, max).
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[u32]> {
        let edge_key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
        self.edge_to_faces.get(&edge_key).map(|v| v.as_slice())
    }
}
