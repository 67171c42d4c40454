//! OBJ geometry reader.

use std::io::BufRead;

use tracing::{debug, trace};

use super::face::{parse_face, PoolCounts};
use super::lines::LogicalLines;
use super::{read_floats, remainder};
use crate::error::{ObjError, ObjResult};
use crate::obj::{Obj, ObjSink};
use crate::types::FloatTuple;

/// Options controlling how OBJ text is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReadOptions {
    /// Store `1 - v` instead of `v` for texture coordinates with at least
    /// two components (OpenGL-style origin).
    pub flip_v_tex_coords: bool,
}

/// Read an OBJ document into a new [`Obj`].
///
/// # Example
///
/// ```
/// let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
/// let obj = mesh_obj::read_obj(text.as_bytes()).unwrap();
/// assert_eq!(obj.num_faces(), 1);
/// assert_eq!(obj.face(0).vertex_indices(), &[0, 1, 2, 3]);
/// ```
pub fn read_obj<R: BufRead>(reader: R) -> ObjResult<Obj> {
    read_obj_with(reader, &ReadOptions::default())
}

/// Read an OBJ document into a new [`Obj`] using `options`.
pub fn read_obj_with<R: BufRead>(reader: R, options: &ReadOptions) -> ObjResult<Obj> {
    let mut obj = Obj::new();
    read_obj_into(reader, options, &mut obj)?;
    debug!(
        "Read OBJ: {} vertices, {} tex coords, {} normals, {} faces, {} groups, {} material groups",
        obj.num_vertices(),
        obj.num_tex_coords(),
        obj.num_normals(),
        obj.num_faces(),
        obj.num_groups(),
        obj.num_material_groups()
    );
    Ok(obj)
}

/// Read an OBJ document and push every element into `sink`.
///
/// Indices in faces are resolved against the number of elements seen so far,
/// so the sink receives zero-based, validated faces.
pub fn read_obj_into<R: BufRead, S: ObjSink>(
    reader: R,
    options: &ReadOptions,
    mut sink: S,
) -> ObjResult<()> {
    let mut counts = PoolCounts::default();

    for line in LogicalLines::new(reader) {
        let line = line?;
        read_directive(&line.text, options, &mut counts, &mut sink)
            .map_err(|e| e.at_line(line.number))?;
    }
    Ok(())
}

fn read_directive<S: ObjSink>(
    text: &str,
    options: &ReadOptions,
    counts: &mut PoolCounts,
    sink: &mut S,
) -> ObjResult<()> {
    if text.is_empty() || text.starts_with('#') {
        return Ok(());
    }
    let mut tokens = text.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(());
    };

    match keyword.to_ascii_lowercase().as_str() {
        "v" => {
            let values = read_floats(tokens, 1, 4, "vertex")?;
            sink.add_vertex(tuple(&values)?);
            counts.vertices += 1;
        }
        "vt" => {
            let mut values = read_floats(tokens, 1, 3, "texture coordinate")?;
            if options.flip_v_tex_coords && values.len() >= 2 {
                values[1] = 1.0 - values[1];
            }
            sink.add_tex_coord(tuple(&values)?);
            counts.tex_coords += 1;
        }
        "vn" => {
            let values = read_floats(tokens, 1, 3, "normal")?;
            sink.add_normal(tuple(&values)?);
            counts.normals += 1;
        }
        "f" => {
            let face = parse_face(tokens, counts)?;
            sink.add_face(face);
        }
        "g" => {
            let names: Vec<String> = tokens.map(str::to_string).collect();
            sink.set_active_groups(&names);
        }
        "usemtl" => {
            let name = remainder(text, keyword);
            sink.set_active_material((!name.is_empty()).then_some(name));
        }
        "mtllib" => {
            let name = remainder(text, keyword);
            if !name.is_empty() {
                sink.set_mtl_file_names(&[name.to_string()]);
            }
        }
        other => {
            trace!("Ignoring OBJ directive '{}'", other);
        }
    }
    Ok(())
}

fn tuple(values: &[f32]) -> ObjResult<FloatTuple> {
    FloatTuple::from_slice(values).ok_or_else(|| ObjError::TruncatedInput {
        line: 0,
        details: "expected 1 to 4 values".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::{EventSink, ObjEvent};

    const QUAD: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

    #[test]
    fn test_read_quad() {
        let obj = read_obj(QUAD.as_bytes()).unwrap();
        assert_eq!(obj.num_vertices(), 4);
        assert_eq!(obj.num_faces(), 1);
        let face = obj.face(0);
        assert_eq!(face.vertex_indices(), &[0, 1, 2, 3]);
        assert!(!face.contains_tex_coord_indices());
        assert!(!face.contains_normal_indices());
        assert_eq!(obj.num_groups(), 1);
        assert_eq!(obj.group("default").unwrap().face_indices(), &[0]);
        assert_eq!(obj.num_material_groups(), 0);
    }

    #[test]
    fn test_read_attributes_and_dimensions() {
        let text = "v 1 2 3 0.5\nvt 0.25\nvt 0.5 0.75\nvn 0 0 1\nf 1/2/1 1/1/1 1/2/1\n";
        let obj = read_obj(text.as_bytes()).unwrap();
        assert_eq!(obj.vertex(0), FloatTuple::new4(1.0, 2.0, 3.0, 0.5));
        assert_eq!(obj.tex_coord(0), FloatTuple::new1(0.25));
        assert_eq!(obj.tex_coord(1), FloatTuple::new2(0.5, 0.75));
        assert_eq!(obj.normal(0), FloatTuple::new3(0.0, 0.0, 1.0));
        assert_eq!(obj.face(0).tex_coord_indices(), Some(&[1, 0, 1][..]));
    }

    #[test]
    fn test_flip_v_tex_coords() {
        let options = ReadOptions {
            flip_v_tex_coords: true,
        };
        let obj = read_obj_with("vt 0.5 0.25\nvt 0.3\n".as_bytes(), &options).unwrap();
        assert_eq!(obj.tex_coord(0), FloatTuple::new2(0.5, 0.75));
        assert_eq!(obj.tex_coord(1), FloatTuple::new1(0.3));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let obj = read_obj("V 0 0 0\nV 1 0 0\nV 0 1 0\nF 1 2 3\n".as_bytes()).unwrap();
        assert_eq!(obj.num_vertices(), 3);
        assert_eq!(obj.num_faces(), 1);
    }

    #[test]
    fn test_groups_materials_and_libraries() {
        let text = "\
mtllib my materials.mtl
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
g first second
usemtl red
f 1 2 3
g second
f 3 2 1
usemtl
f 1 3 2
";
        let obj = read_obj(text.as_bytes()).unwrap();
        assert_eq!(obj.mtl_file_names(), &["my materials.mtl".to_string()]);
        assert_eq!(obj.num_groups(), 3);
        assert_eq!(obj.group("default").unwrap().face_indices(), &[0]);
        assert_eq!(obj.group("first").unwrap().face_indices(), &[1]);
        assert_eq!(obj.group("second").unwrap().face_indices(), &[1, 2, 3]);
        assert_eq!(obj.num_material_groups(), 1);
        assert_eq!(obj.material_group("red").unwrap().face_indices(), &[1, 2]);
    }

    #[test]
    fn test_later_mtllib_replaces_earlier() {
        let obj = read_obj("mtllib a.mtl\nv 0 0 0\nmtllib b.mtl\n".as_bytes()).unwrap();
        assert_eq!(obj.mtl_file_names(), &["b.mtl".to_string()]);

        let obj = read_obj("mtllib a.mtl\nmtllib\n".as_bytes()).unwrap();
        assert_eq!(obj.mtl_file_names(), &["a.mtl".to_string()]);
    }

    #[test]
    fn test_comments_blank_lines_and_unknown_directives() {
        let text = "# header\n\no object\ns 1\nv 0 0 0\nvp 0.5\n";
        let obj = read_obj(text.as_bytes()).unwrap();
        assert_eq!(obj.num_vertices(), 1);
        assert_eq!(obj.num_faces(), 0);
    }

    #[test]
    fn test_negative_indices() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 1 1 0\nf -4 -2 -1\n";
        let obj = read_obj(text.as_bytes()).unwrap();
        assert_eq!(obj.face(0).vertex_indices(), &[0, 1, 2]);
        assert_eq!(obj.face(1).vertex_indices(), &[0, 2, 3]);
    }

    #[test]
    fn test_line_continuation() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 \\\n  2 3\n";
        let obj = read_obj(text.as_bytes()).unwrap();
        assert_eq!(obj.face(0).vertex_indices(), &[0, 1, 2]);

        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 \\  \n 2 3\n";
        let obj = read_obj(text.as_bytes()).unwrap();
        assert_eq!(obj.face(0).vertex_indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = read_obj("v 0 0 0\nv 1 x 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::MalformedNumber { line: 2, .. }));

        let err = read_obj("v 0 0 0\n\nf 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::MalformedIndex { line: 3, .. }));

        let err = read_obj("vt\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::TruncatedInput { line: 1, .. }));

        let err = read_obj("v 0 0 0\nf 1/1 1/1 1/1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::MissingContext { line: 2, .. }));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_read_into_event_sink() {
        let mut events = Vec::new();
        let text = "mtllib a.mtl\ng box\nv 0 0 0\nf 1\n";
        read_obj_into(
            text.as_bytes(),
            &ReadOptions::default(),
            EventSink::new(|e| events.push(e)),
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                ObjEvent::MtlFileNames(vec!["a.mtl".to_string()]),
                ObjEvent::ActiveGroups(vec!["box".to_string()]),
                ObjEvent::Vertex(FloatTuple::new3(0.0, 0.0, 0.0)),
                ObjEvent::Face(crate::types::ObjFace::from_vertices(vec![0])),
            ]
        );
    }
}
