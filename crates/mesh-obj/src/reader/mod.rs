//! Line-oriented readers for OBJ and MTL text.
//!
//! Both readers consume an already-open [`std::io::BufRead`] one logical line
//! at a time. A physical line ending in `\` is joined with the next one; if
//! the input ends while a continuation is pending, the partial line is
//! dropped and reading ends normally.
//!
//! The first malformed line aborts the read with an [`ObjError`] carrying
//! the line number. Unknown directives are ignored.

mod face;
mod lines;
mod mtl;
mod obj;

pub use face::{resolve_index, PoolCounts};
pub use mtl::{parse_texture_options, read_mtls};
pub use obj::{read_obj, read_obj_into, read_obj_with, ReadOptions};

use crate::error::{ObjError, ObjResult};

/// Parse one float token.
pub(crate) fn parse_f32(token: &str) -> ObjResult<f32> {
    token.parse::<f32>().map_err(|_| ObjError::MalformedNumber {
        line: 0,
        details: format!("'{}' is not a number", token),
    })
}

/// Parse the next float token, failing if there is none.
pub(crate) fn next_f32<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> ObjResult<f32> {
    let token = tokens.next().ok_or_else(|| ObjError::TruncatedInput {
        line: 0,
        details: format!("missing {}", what),
    })?;
    parse_f32(token)
}

/// Parse between `min` and `max` leading float tokens; extra tokens are ignored.
pub(crate) fn read_floats<'a>(
    tokens: impl Iterator<Item = &'a str>,
    min: usize,
    max: usize,
    what: &str,
) -> ObjResult<Vec<f32>> {
    let values = tokens
        .take(max)
        .map(parse_f32)
        .collect::<ObjResult<Vec<f32>>>()?;
    if values.len() < min {
        return Err(ObjError::TruncatedInput {
            line: 0,
            details: format!("{} needs at least {} values, got {}", what, min, values.len()),
        });
    }
    Ok(values)
}

/// Text after the leading keyword of a trimmed line.
pub(crate) fn remainder<'a>(line: &'a str, keyword: &str) -> &'a str {
    line.get(keyword.len()..).unwrap_or("").trim()
}
