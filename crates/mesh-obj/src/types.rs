//! Core value types: float tuples and faces.

use std::fmt;
use std::hash::{Hash, Hasher};

use nalgebra::{Point3, Vector3};

use crate::error::{ObjError, ObjResult};

/// An immutable tuple of 1 to 4 floats.
///
/// Used for vertex positions, texture coordinates, normals and colors.
/// Equality and hashing compare the exact bit patterns of the components,
/// so tuples can serve as deduplication keys.
#[derive(Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<f32>", into = "Vec<f32>")
)]
pub struct FloatTuple {
    values: [f32; 4],
    dimensions: u8,
}

impl FloatTuple {
    /// Create a 1-dimensional tuple.
    #[inline]
    pub fn new1(x: f32) -> Self {
        Self {
            values: [x, 0.0, 0.0, 0.0],
            dimensions: 1,
        }
    }

    /// Create a 2-dimensional tuple.
    #[inline]
    pub fn new2(x: f32, y: f32) -> Self {
        Self {
            values: [x, y, 0.0, 0.0],
            dimensions: 2,
        }
    }

    /// Create a 3-dimensional tuple.
    #[inline]
    pub fn new3(x: f32, y: f32, z: f32) -> Self {
        Self {
            values: [x, y, z, 0.0],
            dimensions: 3,
        }
    }

    /// Create a 4-dimensional tuple.
    #[inline]
    pub fn new4(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self {
            values: [x, y, z, w],
            dimensions: 4,
        }
    }

    /// Create a tuple from a slice of 1 to 4 values.
    ///
    /// Returns `None` for an empty slice or more than 4 values.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        if values.is_empty() || values.len() > 4 {
            return None;
        }
        let mut data = [0.0; 4];
        data[..values.len()].copy_from_slice(values);
        Some(Self {
            values: data,
            dimensions: values.len() as u8,
        })
    }

    /// Create a 3-dimensional unit tuple pointing along (x, y, z).
    ///
    /// A zero-length input yields (0, 0, 0).
    pub fn normalized(x: f32, y: f32, z: f32) -> Self {
        let v = Vector3::new(x, y, z);
        let len = v.norm();
        if len > 0.0 {
            let n = v / len;
            Self::new3(n.x, n.y, n.z)
        } else {
            Self::new3(0.0, 0.0, 0.0)
        }
    }

    /// Number of components (1 to 4).
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions as usize
    }

    /// Component `i`, if `i < dimensions()`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<f32> {
        (i < self.dimensions()).then(|| self.values[i])
    }

    #[inline]
    pub fn x(&self) -> Option<f32> {
        self.get(0)
    }

    #[inline]
    pub fn y(&self) -> Option<f32> {
        self.get(1)
    }

    #[inline]
    pub fn z(&self) -> Option<f32> {
        self.get(2)
    }

    #[inline]
    pub fn w(&self) -> Option<f32> {
        self.get(3)
    }

    /// The components as a slice of length `dimensions()`.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values[..self.dimensions()]
    }

    /// Component `i`, or 0 when the tuple is too short.
    #[inline]
    pub(crate) fn get_or_zero(&self, i: usize) -> f32 {
        self.get(i).unwrap_or(0.0)
    }

    /// Interpret the first three components as a point (missing ones are 0).
    pub fn to_point(&self) -> Point3<f32> {
        Point3::new(self.get_or_zero(0), self.get_or_zero(1), self.get_or_zero(2))
    }

    /// Interpret the first three components as a vector (missing ones are 0).
    pub fn to_vector(&self) -> Vector3<f32> {
        Vector3::new(self.get_or_zero(0), self.get_or_zero(1), self.get_or_zero(2))
    }
}

impl PartialEq for FloatTuple {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for FloatTuple {}

impl Hash for FloatTuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimensions.hash(state);
        for v in self.as_slice() {
            v.to_bits().hash(state);
        }
    }
}

impl fmt::Debug for FloatTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FloatTuple").field(&self.as_slice()).finish()
    }
}

/// Components separated by single spaces, e.g. `1 0.5 -2`.
impl fmt::Display for FloatTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<f32>> for FloatTuple {
    type Error = String;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
            .ok_or_else(|| format!("expected 1 to 4 components, got {}", values.len()))
    }
}

impl From<FloatTuple> for Vec<f32> {
    fn from(tuple: FloatTuple) -> Self {
        tuple.as_slice().to_vec()
    }
}

/// One polygonal face of an OBJ mesh.
///
/// Holds zero-based indices into the vertex pool and, optionally, parallel
/// arrays of texture coordinate and normal indices. A face with fewer than
/// three vertices is allowed (OBJ files use them for lines).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjFace {
    vertex_indices: Vec<u32>,
    tex_coord_indices: Option<Vec<u32>>,
    normal_indices: Option<Vec<u32>>,
}

impl ObjFace {
    /// Create a face, checking that the optional arrays match the vertex count.
    pub fn new(
        vertex_indices: Vec<u32>,
        tex_coord_indices: Option<Vec<u32>>,
        normal_indices: Option<Vec<u32>>,
    ) -> ObjResult<Self> {
        let n = vertex_indices.len();
        for (what, indices) in [
            ("texture coordinate", &tex_coord_indices),
            ("normal", &normal_indices),
        ] {
            if let Some(indices) = indices {
                if indices.len() != n {
                    return Err(ObjError::InvalidFace {
                        details: format!(
                            "{} {} indices for {} vertices",
                            indices.len(),
                            what,
                            n
                        ),
                    });
                }
            }
        }
        Ok(Self {
            vertex_indices,
            tex_coord_indices,
            normal_indices,
        })
    }

    /// Create a face from vertex indices only.
    pub fn from_vertices(vertex_indices: Vec<u32>) -> Self {
        Self {
            vertex_indices,
            tex_coord_indices: None,
            normal_indices: None,
        }
    }

    /// Build a face whose index arrays are known to be parallel.
    pub(crate) fn from_parts(
        vertex_indices: Vec<u32>,
        tex_coord_indices: Option<Vec<u32>>,
        normal_indices: Option<Vec<u32>>,
    ) -> Self {
        debug_assert!(tex_coord_indices
            .as_ref()
            .map_or(true, |t| t.len() == vertex_indices.len()));
        debug_assert!(normal_indices
            .as_ref()
            .map_or(true, |n| n.len() == vertex_indices.len()));
        Self {
            vertex_indices,
            tex_coord_indices,
            normal_indices,
        }
    }

    /// Number of vertices of this face.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertex_indices.len()
    }

    #[inline]
    pub fn vertex_index(&self, i: usize) -> u32 {
        self.vertex_indices[i]
    }

    #[inline]
    pub fn tex_coord_index(&self, i: usize) -> Option<u32> {
        self.tex_coord_indices.as_ref().map(|t| t[i])
    }

    #[inline]
    pub fn normal_index(&self, i: usize) -> Option<u32> {
        self.normal_indices.as_ref().map(|n| n[i])
    }

    #[inline]
    pub fn vertex_indices(&self) -> &[u32] {
        &self.vertex_indices
    }

    #[inline]
    pub fn tex_coord_indices(&self) -> Option<&[u32]> {
        self.tex_coord_indices.as_deref()
    }

    #[inline]
    pub fn normal_indices(&self) -> Option<&[u32]> {
        self.normal_indices.as_deref()
    }

    #[inline]
    pub fn contains_tex_coord_indices(&self) -> bool {
        self.tex_coord_indices.is_some()
    }

    #[inline]
    pub fn contains_normal_indices(&self) -> bool {
        self.normal_indices.is_some()
    }

    /// Face corners `picks` of this face as a new face (all index arrays).
    pub(crate) fn select(&self, picks: &[usize]) -> Self {
        Self {
            vertex_indices: picks.iter().map(|&i| self.vertex_indices[i]).collect(),
            tex_coord_indices: self
                .tex_coord_indices
                .as_ref()
                .map(|t| picks.iter().map(|&i| t[i]).collect()),
            normal_indices: self
                .normal_indices
                .as_ref()
                .map(|n| picks.iter().map(|&i| n[i]).collect()),
        }
    }
}

/// The face as an OBJ `f` line with 1-based indices, e.g. `f 1/1 2/2 3/3`.
impl fmt::Display for ObjFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("f")?;
        for i in 0..self.num_vertices() {
            write!(f, " {}", self.vertex_indices[i] + 1)?;
            match (self.tex_coord_index(i), self.normal_index(i)) {
                (Some(t), Some(n)) => write!(f, "/{}/{}", t + 1, n + 1)?,
                (Some(t), None) => write!(f, "/{}", t + 1)?,
                (None, Some(n)) => write!(f, "//{}", n + 1)?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}
