//! Wavefront OBJ and MTL support.
//!
//! This crate reads, builds, transforms and writes OBJ meshes and their MTL
//! material libraries:
//!
//! - **Reading/Writing**: streaming OBJ and MTL readers, canonical writers
//! - **Model**: [`Obj`] with vertex, texture coordinate and normal pools,
//!   polygon faces, groups and material groups; [`Mtl`] materials with
//!   texture map options
//! - **Transforms**: triangulation, attribute unification, single-indexing,
//!   computed normals, splitting and merging
//! - **Data**: flat arrays for rendering APIs
//!
//! # Example
//!
//! ```
//! use mesh_obj::{read_obj, transform, write_obj};
//!
//! let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\ng quad\nf 1 2 3 4\n";
//! let obj = read_obj(text.as_bytes()).unwrap();
//!
//! let triangles = transform::triangulate(&obj);
//! assert_eq!(triangles.group("quad").unwrap().num_faces(), 2);
//!
//! let mut out = Vec::new();
//! write_obj(&triangles, &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().ends_with("g quad\nf 1 2 3\nf 1 3 4\n"));
//! ```

mod error;
mod mtl;
mod obj;
mod texture;
mod types;

pub mod adjacency;
pub mod data;
pub mod io;
pub mod normals;
pub mod reader;
pub mod split;
pub mod transform;
pub mod validate;
pub mod writer;

// Re-export core types at crate root
pub use error::{ObjError, ObjResult};
pub use mtl::{IlluminationMode, MapSlot, Mtl};
pub use obj::{EventSink, Obj, ObjEvent, ObjGroup, ObjSink, DEFAULT_GROUP_NAME};
pub use texture::{ImfChannel, TextureOptions, TextureOptionsBuilder, TextureType};
pub use types::{FloatTuple, ObjFace};

pub use adjacency::ObjAdjacency;

// Re-export commonly used functions
pub use io::{load_mtl, load_obj, load_obj_with, save_mtls, save_obj, ObjFormat};
pub use normals::{add_computed_normals, face_normal};
pub use reader::{parse_texture_options, read_mtls, read_obj, read_obj_into, read_obj_with, ReadOptions};
pub use split::{split_by_groups, split_by_material_groups, split_by_max_vertices};
pub use validate::{validate_obj, ObjReport};
pub use writer::{texture_options_string, write_mtls, write_obj};

// Convenience methods on Obj
impl Obj {
    /// Load an OBJ file.
    pub fn load(path: impl AsRef<std::path::Path>) -> ObjResult<Self> {
        io::load_obj(path.as_ref())
    }

    /// Save the mesh as an OBJ file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> ObjResult<()> {
        io::save_obj(self, path.as_ref())
    }

    /// Validate the mesh and return a report of any issues.
    pub fn validate(&self) -> ObjReport {
        validate::validate_obj(self)
    }
}
