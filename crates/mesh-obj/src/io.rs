//! Path-based loading and saving of OBJ and MTL files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::info;

use crate::error::{ObjError, ObjResult};
use crate::mtl::Mtl;
use crate::obj::Obj;
use crate::reader::{read_mtls, read_obj_with, ReadOptions};
use crate::writer::{write_mtls, write_obj};

/// File formats handled by the path helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjFormat {
    Obj,
    Mtl,
}

impl ObjFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "obj" => Some(ObjFormat::Obj),
                "mtl" => Some(ObjFormat::Mtl),
                _ => None,
            })
    }
}

fn expect_format(path: &Path, format: ObjFormat) -> ObjResult<()> {
    match ObjFormat::from_path(path) {
        Some(found) if found == format => Ok(()),
        _ => Err(ObjError::UnsupportedFormat {
            extension: path.extension().and_then(|e| e.to_str()).map(String::from),
        }),
    }
}

fn open(path: &Path) -> ObjResult<BufReader<File>> {
    let file = File::open(path).map_err(|e| ObjError::IoRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufReader::new(file))
}

fn create(path: &Path) -> ObjResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| ObjError::IoWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Attach the path to stream errors raised while reading.
fn read_context(path: &Path) -> impl FnOnce(ObjError) -> ObjError + '_ {
    move |e| match e {
        ObjError::Io { source } => ObjError::IoRead {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}

/// Attach the path to stream errors raised while writing.
fn write_context(path: &Path) -> impl FnOnce(ObjError) -> ObjError + '_ {
    move |e| match e {
        ObjError::Io { source } => ObjError::IoWrite {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}

/// Load an OBJ file with default options.
pub fn load_obj(path: &Path) -> ObjResult<Obj> {
    load_obj_with(path, &ReadOptions::default())
}

/// Load an OBJ file.
///
/// The path must have an `.obj` extension (any case).
pub fn load_obj_with(path: &Path, options: &ReadOptions) -> ObjResult<Obj> {
    expect_format(path, ObjFormat::Obj)?;
    info!("Loading OBJ from {:?}", path);

    let obj = read_obj_with(open(path)?, options).map_err(read_context(path))?;

    info!(
        "Loaded OBJ: {} vertices, {} faces, {} groups",
        obj.num_vertices(),
        obj.num_faces(),
        obj.num_groups()
    );
    Ok(obj)
}

/// Save a mesh as an OBJ file.
pub fn save_obj(obj: &Obj, path: &Path) -> ObjResult<()> {
    expect_format(path, ObjFormat::Obj)?;
    info!("Saving OBJ to {:?}", path);

    write_obj(obj, create(path)?).map_err(write_context(path))?;

    info!(
        "Saved OBJ: {} vertices, {} faces",
        obj.num_vertices(),
        obj.num_faces()
    );
    Ok(())
}

/// Load all materials of an MTL file.
pub fn load_mtl(path: &Path) -> ObjResult<Vec<Mtl>> {
    expect_format(path, ObjFormat::Mtl)?;
    info!("Loading MTL from {:?}", path);

    let mtls = read_mtls(open(path)?).map_err(read_context(path))?;

    info!("Loaded {} materials", mtls.len());
    Ok(mtls)
}

/// Save materials as an MTL file.
pub fn save_mtls(mtls: &[Mtl], path: &Path) -> ObjResult<()> {
    expect_format(path, ObjFormat::Mtl)?;
    info!("Saving {} materials to {:?}", mtls.len(), path);

    write_mtls(mtls, create(path)?).map_err(write_context(path))
}
