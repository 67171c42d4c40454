//! Mesh validation and reporting.

use nalgebra::Point3;
use tracing::{debug, warn};

use crate::adjacency::ObjAdjacency;
use crate::obj::Obj;
use crate::types::ObjFace;

/// Validation report for an OBJ mesh.
#[derive(Debug, Clone)]
pub struct ObjReport {
    pub vertex_count: usize,
    pub tex_coord_count: usize,
    pub normal_count: usize,
    pub face_count: usize,

    /// Number of groups, including the default group.
    pub group_count: usize,

    pub material_group_count: usize,

    /// Bounding box of the 3D vertices as (min_corner, max_corner).
    pub bounds: Option<(Point3<f32>, Point3<f32>)>,

    /// Faces referencing a vertex, texture coordinate or normal that does
    /// not exist.
    pub out_of_range_face_count: usize,

    /// Faces with fewer than three vertices (points and lines).
    pub degenerate_face_count: usize,

    /// Number of edges used by exactly one face.
    pub boundary_edge_count: usize,

    /// Number of edges used by more than two faces.
    pub non_manifold_edge_count: usize,
}

impl ObjReport {
    /// Every face index refers to an existing element.
    pub fn is_valid(&self) -> bool {
        self.out_of_range_face_count == 0
    }

    pub fn is_watertight(&self) -> bool {
        self.boundary_edge_count == 0
    }

    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }
}

impl std::fmt::Display for ObjReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "OBJ Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Tex coords: {}", self.tex_coord_count)?;
        writeln!(f, "  Normals: {}", self.normal_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(
            f,
            "  Groups: {} (material groups: {})",
            self.group_count, self.material_group_count
        )?;

        if let Some((min, max)) = &self.bounds {
            writeln!(
                f,
                "  Bounds: [{:.1}, {:.1}, {:.1}] to [{:.1}, {:.1}, {:.1}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }

        writeln!(
            f,
            "  Valid: {} (out-of-range faces: {})",
            if self.is_valid() { "yes" } else { "NO" },
            self.out_of_range_face_count
        )?;
        writeln!(f, "  Degenerate faces: {}", self.degenerate_face_count)?;
        writeln!(
            f,
            "  Boundary edges: {}, non-manifold edges: {}",
            self.boundary_edge_count, self.non_manifold_edge_count
        )?;

        Ok(())
    }
}

fn in_range(indices: Option<&[u32]>, count: usize) -> bool {
    indices.map_or(true, |indices| indices.iter().all(|&i| (i as usize) < count))
}

fn face_in_range(obj: &Obj, face: &ObjFace) -> bool {
    in_range(Some(face.vertex_indices()), obj.num_vertices())
        && in_range(face.tex_coord_indices(), obj.num_tex_coords())
        && in_range(face.normal_indices(), obj.num_normals())
}

/// Validate a mesh and return a report.
pub fn validate_obj(obj: &Obj) -> ObjReport {
    let adjacency = ObjAdjacency::build(obj.faces());

    let out_of_range_face_count = obj
        .faces()
        .iter()
        .filter(|face| !face_in_range(obj, face))
        .count();
    let degenerate_face_count = obj
        .faces()
        .iter()
        .filter(|face| face.num_vertices() < 3)
        .count();

    let report = ObjReport {
        vertex_count: obj.num_vertices(),
        tex_coord_count: obj.num_tex_coords(),
        normal_count: obj.num_normals(),
        face_count: obj.num_faces(),
        group_count: obj.num_groups(),
        material_group_count: obj.num_material_groups(),
        bounds: obj.bounds(),
        out_of_range_face_count,
        degenerate_face_count,
        boundary_edge_count: adjacency.boundary_edge_count(),
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
    };

    if !report.is_valid() {
        warn!(
            "{} faces reference elements that do not exist",
            out_of_range_face_count
        );
    }
    if degenerate_face_count > 0 {
        warn!("{} faces have fewer than 3 vertices", degenerate_face_count);
    }

    debug!("{}", report);

    report
}
