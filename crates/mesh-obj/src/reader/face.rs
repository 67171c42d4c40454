//! Face token parsing and OBJ index resolution.
//!
//! A face token is `v`, `v/vt`, `v//vn` or `v/vt/vn`. Positive indices are
//! 1-based; negative indices count back from the end of the pool as it stood
//! before the face was read.

use crate::error::{ObjError, ObjResult};
use crate::types::ObjFace;

/// Number of elements added to each pool so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolCounts {
    pub vertices: usize,
    pub tex_coords: usize,
    pub normals: usize,
}

/// Resolve a raw OBJ index against a pool of `count` elements.
///
/// `1..=count` maps to `0..count`, `-count..=-1` maps to `0..count`.
/// Zero, out-of-range values and references into an empty pool fail.
pub fn resolve_index(raw: i64, count: usize, pool: &str) -> ObjResult<u32> {
    if raw == 0 {
        return Err(ObjError::MalformedIndex {
            line: 0,
            details: format!("{} index 0 is not valid (indices start at 1)", pool),
        });
    }
    if count == 0 {
        return Err(ObjError::MissingContext {
            line: 0,
            details: format!("face references a {} but none has been defined", pool),
        });
    }
    let count_i = count as i64;
    let resolved = if raw < 0 { count_i + raw } else { raw - 1 };
    if resolved < 0 || resolved >= count_i || resolved > u32::MAX as i64 {
        return Err(ObjError::MalformedIndex {
            line: 0,
            details: format!(
                "{} index {} is out of range ({} defined)",
                pool, raw, count
            ),
        });
    }
    Ok(resolved as u32)
}

fn parse_index(token: &str) -> ObjResult<i64> {
    token.parse::<i64>().map_err(|_| ObjError::MalformedNumber {
        line: 0,
        details: format!("'{}' is not a face index", token),
    })
}

/// Parse the vertex tokens of an `f` line (without the `f` itself).
///
/// A texture coordinate or normal array is only kept when every token of
/// the face provides it.
pub(crate) fn parse_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    counts: &PoolCounts,
) -> ObjResult<ObjFace> {
    let mut vertices = Vec::new();
    let mut tex_coords = Vec::new();
    let mut normals = Vec::new();

    for token in tokens {
        let mut parts = token.split('/');
        let v = parts.next().unwrap_or("");
        let vt = parts.next().filter(|s| !s.is_empty());
        let vn = parts.next().filter(|s| !s.is_empty());
        if parts.next().is_some() {
            return Err(ObjError::MalformedIndex {
                line: 0,
                details: format!("face token '{}' has too many components", token),
            });
        }
        if v.is_empty() {
            return Err(ObjError::MalformedIndex {
                line: 0,
                details: format!("face token '{}' has no vertex index", token),
            });
        }

        vertices.push(resolve_index(parse_index(v)?, counts.vertices, "vertex")?);
        tex_coords.push(match vt {
            Some(t) => Some(resolve_index(
                parse_index(t)?,
                counts.tex_coords,
                "texture coordinate",
            )?),
            None => None,
        });
        normals.push(match vn {
            Some(n) => Some(resolve_index(parse_index(n)?, counts.normals, "normal")?),
            None => None,
        });
    }

    if vertices.is_empty() {
        return Err(ObjError::TruncatedInput {
            line: 0,
            details: "face has no vertices".to_string(),
        });
    }

    let tex_coords: Option<Vec<u32>> = tex_coords.into_iter().collect();
    let normals: Option<Vec<u32>> = normals.into_iter().collect();
    Ok(ObjFace::from_parts(vertices, tex_coords, normals))
}
