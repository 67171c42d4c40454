//! The in-memory OBJ mesh and the sink interface readers write into.
//!
//! An [`Obj`] is built incrementally: callers select the active group names
//! and the active material, then append vertices, texture coordinates,
//! normals and faces. Each appended face joins whatever groups and material
//! are active at that moment.
//!
//! # Example
//!
//! ```
//! use mesh_obj::{FloatTuple, Obj, ObjFace, ObjSink};
//!
//! let mut obj = Obj::new();
//! obj.add_vertex(FloatTuple::new3(0.0, 0.0, 0.0));
//! obj.add_vertex(FloatTuple::new3(1.0, 0.0, 0.0));
//! obj.add_vertex(FloatTuple::new3(0.0, 1.0, 0.0));
//! obj.set_active_groups(&["base".to_string()]);
//! obj.set_active_material(Some("red"));
//! obj.add_face(ObjFace::from_vertices(vec![0, 1, 2]));
//!
//! assert_eq!(obj.group("base").map(|g| g.num_faces()), Some(1));
//! assert_eq!(obj.material_group("red").map(|g| g.num_faces()), Some(1));
//! ```

use hashbrown::HashMap;
use nalgebra::Point3;

use crate::types::{FloatTuple, ObjFace};

/// Name of the group that faces belong to when no `g` directive is active.
pub const DEFAULT_GROUP_NAME: &str = "default";

/// A named set of faces (a geometry group or a material group).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjGroup {
    name: String,
    face_indices: Vec<u32>,
}

impl ObjGroup {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            face_indices: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_faces(&self) -> usize {
        self.face_indices.len()
    }

    /// Index (into the owning mesh) of the `i`-th face of this group.
    pub fn face_index(&self, i: usize) -> u32 {
        self.face_indices[i]
    }

    /// Face indices in the order the faces were added.
    pub fn face_indices(&self) -> &[u32] {
        &self.face_indices
    }

    pub fn is_empty(&self) -> bool {
        self.face_indices.is_empty()
    }
}

/// Receiver of mesh elements.
///
/// The OBJ reader and the mesh transforms write through this interface, so
/// the same code can fill an [`Obj`] or stream elements to a callback
/// ([`EventSink`]).
pub trait ObjSink {
    fn add_vertex(&mut self, vertex: FloatTuple);

    fn add_tex_coord(&mut self, tex_coord: FloatTuple);

    fn add_normal(&mut self, normal: FloatTuple);

    /// Append a face; it joins the currently active groups and material.
    fn add_face(&mut self, face: ObjFace);

    /// Replace the active group names. An empty list selects the default group.
    fn set_active_groups(&mut self, names: &[String]);

    /// Set the material for subsequent faces; `None` means no material.
    fn set_active_material(&mut self, name: Option<&str>);

    fn set_mtl_file_names(&mut self, names: &[String]);
}

impl<S: ObjSink + ?Sized> ObjSink for &mut S {
    fn add_vertex(&mut self, vertex: FloatTuple) {
        (**self).add_vertex(vertex)
    }

    fn add_tex_coord(&mut self, tex_coord: FloatTuple) {
        (**self).add_tex_coord(tex_coord)
    }

    fn add_normal(&mut self, normal: FloatTuple) {
        (**self).add_normal(normal)
    }

    fn add_face(&mut self, face: ObjFace) {
        (**self).add_face(face)
    }

    fn set_active_groups(&mut self, names: &[String]) {
        (**self).set_active_groups(names)
    }

    fn set_active_material(&mut self, name: Option<&str>) {
        (**self).set_active_material(name)
    }

    fn set_mtl_file_names(&mut self, names: &[String]) {
        (**self).set_mtl_file_names(names)
    }
}

/// A mutable OBJ mesh.
///
/// Groups and material groups keep the order in which they were first used.
/// The default group always exists; material groups only exist once a face
/// has been added while they were active.
#[derive(Debug, Clone, PartialEq)]
pub struct Obj {
    vertices: Vec<FloatTuple>,
    tex_coords: Vec<FloatTuple>,
    normals: Vec<FloatTuple>,
    faces: Vec<ObjFace>,

    groups: Vec<ObjGroup>,
    group_lookup: HashMap<String, usize>,
    material_groups: Vec<ObjGroup>,
    material_lookup: HashMap<String, usize>,

    mtl_file_names: Vec<String>,

    /// Groups that receive appended faces.
    active_groups: Vec<usize>,
    active_material: Option<usize>,

    /// Most recently requested names, applied or not.
    requested_groups: Vec<String>,
    requested_material: Option<String>,

    /// Requests waiting for the next face.
    pending_groups: Option<Vec<String>>,
    pending_material: Option<Option<String>>,

    /// Face index -> group names activated right before that face.
    activated_groups: HashMap<u32, Vec<String>>,
    /// Face index -> material switch right before that face (`None` clears).
    activated_materials: HashMap<u32, Option<String>>,
}

impl Default for Obj {
    fn default() -> Self {
        Self::new()
    }
}

impl Obj {
    /// Create an empty mesh containing only the (empty) default group.
    pub fn new() -> Self {
        let mut group_lookup = HashMap::new();
        group_lookup.insert(DEFAULT_GROUP_NAME.to_string(), 0);
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
            groups: vec![ObjGroup::new(DEFAULT_GROUP_NAME)],
            group_lookup,
            material_groups: Vec::new(),
            material_lookup: HashMap::new(),
            mtl_file_names: Vec::new(),
            active_groups: vec![0],
            active_material: None,
            requested_groups: vec![DEFAULT_GROUP_NAME.to_string()],
            requested_material: None,
            pending_groups: None,
            pending_material: None,
            activated_groups: HashMap::new(),
            activated_materials: HashMap::new(),
        }
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_tex_coords(&self) -> usize {
        self.tex_coords.len()
    }

    #[inline]
    pub fn num_normals(&self) -> usize {
        self.normals.len()
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of groups, including the default group.
    #[inline]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn num_material_groups(&self) -> usize {
        self.material_groups.len()
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> FloatTuple {
        self.vertices[i]
    }

    #[inline]
    pub fn tex_coord(&self, i: usize) -> FloatTuple {
        self.tex_coords[i]
    }

    #[inline]
    pub fn normal(&self, i: usize) -> FloatTuple {
        self.normals[i]
    }

    #[inline]
    pub fn face(&self, i: usize) -> &ObjFace {
        &self.faces[i]
    }

    pub fn vertices(&self) -> &[FloatTuple] {
        &self.vertices
    }

    pub fn tex_coords(&self) -> &[FloatTuple] {
        &self.tex_coords
    }

    pub fn normals(&self) -> &[FloatTuple] {
        &self.normals
    }

    pub fn faces(&self) -> &[ObjFace] {
        &self.faces
    }

    pub fn groups(&self) -> &[ObjGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&ObjGroup> {
        self.group_lookup.get(name).map(|&i| &self.groups[i])
    }

    pub fn material_groups(&self) -> &[ObjGroup] {
        &self.material_groups
    }

    pub fn material_group(&self, name: &str) -> Option<&ObjGroup> {
        self.material_lookup.get(name).map(|&i| &self.material_groups[i])
    }

    pub fn mtl_file_names(&self) -> &[String] {
        &self.mtl_file_names
    }

    /// Group names that were activated right before face `face` was added,
    /// or `None` if the active groups did not change at that face.
    pub fn activated_group_names(&self, face: usize) -> Option<&[String]> {
        self.activated_groups
            .get(&(face as u32))
            .map(|names| names.as_slice())
    }

    /// Material activated right before face `face` was added, if any.
    pub fn activated_material_name(&self, face: usize) -> Option<&str> {
        self.activated_material(face).flatten()
    }

    /// Material switch recorded at face `face`: `Some(None)` when the
    /// material was cleared there, `None` when nothing changed.
    pub fn activated_material(&self, face: usize) -> Option<Option<&str>> {
        self.activated_materials
            .get(&(face as u32))
            .map(|name| name.as_deref())
    }

    /// Axis-aligned bounding box of all 3D vertices.
    /// Returns (min_corner, max_corner) or None if there is no 3D vertex.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut points = self
            .vertices
            .iter()
            .filter(|v| v.dimensions() >= 3)
            .map(FloatTuple::to_point);

        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Some((min, max))
    }

    fn group_slot(&mut self, name: &str) -> usize {
        if let Some(&i) = self.group_lookup.get(name) {
            return i;
        }
        let i = self.groups.len();
        self.groups.push(ObjGroup::new(name));
        self.group_lookup.insert(name.to_string(), i);
        i
    }

    fn material_slot(&mut self, name: &str) -> usize {
        if let Some(&i) = self.material_lookup.get(name) {
            return i;
        }
        let i = self.material_groups.len();
        self.material_groups.push(ObjGroup::new(name));
        self.material_lookup.insert(name.to_string(), i);
        i
    }
}

impl ObjSink for Obj {
    fn add_vertex(&mut self, vertex: FloatTuple) {
        self.vertices.push(vertex);
    }

    fn add_tex_coord(&mut self, tex_coord: FloatTuple) {
        self.tex_coords.push(tex_coord);
    }

    fn add_normal(&mut self, normal: FloatTuple) {
        self.normals.push(normal);
    }

    fn add_face(&mut self, face: ObjFace) {
        let index = self.faces.len() as u32;

        if let Some(names) = self.pending_groups.take() {
            self.active_groups = names.iter().map(|n| self.group_slot(n)).collect();
            self.activated_groups.insert(index, names);
        }
        if let Some(material) = self.pending_material.take() {
            self.active_material = match material {
                Some(name) => {
                    let slot = self.material_slot(&name);
                    self.activated_materials.insert(index, Some(name));
                    Some(slot)
                }
                None => {
                    if self.active_material.is_some() {
                        self.activated_materials.insert(index, None);
                    }
                    None
                }
            };
        }

        for &g in &self.active_groups {
            self.groups[g].face_indices.push(index);
        }
        if let Some(m) = self.active_material {
            self.material_groups[m].face_indices.push(index);
        }
        self.faces.push(face);
    }

    fn set_active_groups(&mut self, names: &[String]) {
        let mut unique: Vec<String> = Vec::with_capacity(names.len().max(1));
        for name in names {
            if !unique.contains(name) {
                unique.push(name.clone());
            }
        }
        if unique.is_empty() {
            unique.push(DEFAULT_GROUP_NAME.to_string());
        }
        if unique == self.requested_groups {
            return;
        }
        self.requested_groups = unique.clone();
        self.pending_groups = Some(unique);
    }

    fn set_active_material(&mut self, name: Option<&str>) {
        if self.requested_material.as_deref() == name {
            return;
        }
        self.requested_material = name.map(str::to_string);
        self.pending_material = Some(self.requested_material.clone());
    }

    fn set_mtl_file_names(&mut self, names: &[String]) {
        self.mtl_file_names = names.to_vec();
    }
}

/// One element delivered to an [`EventSink`] callback.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjEvent {
    Vertex(FloatTuple),
    TexCoord(FloatTuple),
    Normal(FloatTuple),
    Face(ObjFace),
    ActiveGroups(Vec<String>),
    ActiveMaterial(Option<String>),
    MtlFileNames(Vec<String>),
}

/// An [`ObjSink`] that forwards every element to a closure instead of
/// storing it.
pub struct EventSink<F> {
    callback: F,
}

impl<F: FnMut(ObjEvent)> EventSink<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }

    pub fn into_inner(self) -> F {
        self.callback
    }
}

impl<F: FnMut(ObjEvent)> ObjSink for EventSink<F> {
    fn add_vertex(&mut self, vertex: FloatTuple) {
        (self.callback)(ObjEvent::Vertex(vertex));
    }

    fn add_tex_coord(&mut self, tex_coord: FloatTuple) {
        (self.callback)(ObjEvent::TexCoord(tex_coord));
    }

    fn add_normal(&mut self, normal: FloatTuple) {
        (self.callback)(ObjEvent::Normal(normal));
    }

    fn add_face(&mut self, face: ObjFace) {
        (self.callback)(ObjEvent::Face(face));
    }

    fn set_active_groups(&mut self, names: &[String]) {
        (self.callback)(ObjEvent::ActiveGroups(names.to_vec()));
    }

    fn set_active_material(&mut self, name: Option<&str>) {
        (self.callback)(ObjEvent::ActiveMaterial(name.map(str::to_string)));
    }

    fn set_mtl_file_names(&mut self, names: &[String]) {
        (self.callback)(ObjEvent::MtlFileNames(names.to_vec()));
    }
}
