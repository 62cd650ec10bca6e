//! Drawing elements: components, links and areas.

use indexmap::IndexSet;

use topolink_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use super::{ElementId, VertexId, connection::ConnectionPoints};

/// What an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A box with named connection points.
    Component,
    /// An open polyline. A bundle link carries other links along it.
    Link { bundle: bool },
    /// A closed polygon.
    Area,
}

impl ElementKind {
    /// Returns `true` for links and areas.
    pub fn owns_vertices(self) -> bool {
        matches!(self, Self::Link { .. } | Self::Area)
    }

    /// Smallest vertex count an element of this kind may have.
    pub fn min_vertices(self) -> usize {
        match self {
            Self::Component => 0,
            Self::Link { .. } => 2,
            Self::Area => 3,
        }
    }
}

/// A drawing element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    name: Id,
    db_id: Option<u64>,
    kind: ElementKind,
    position: Point,
    size: Size,
    points: ConnectionPoints,
    vertices: Vec<VertexId>,
    attached: IndexSet<VertexId>,
}

impl Element {
    pub(crate) fn new(id: ElementId, name: Id, kind: ElementKind) -> Self {
        Self {
            id,
            name,
            db_id: None,
            kind,
            position: Point::default(),
            size: Size::default(),
            points: ConnectionPoints::default(),
            vertices: Vec::new(),
            attached: IndexSet::new(),
        }
    }

    pub(crate) fn with_geometry(mut self, position: Point, size: Size) -> Self {
        self.position = position;
        self.size = size;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn db_id(&self) -> Option<u64> {
        self.db_id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_bundle(&self) -> bool {
        matches!(self.kind, ElementKind::Link { bundle: true })
    }

    pub fn is_area(&self) -> bool {
        self.kind == ElementKind::Area
    }

    /// Center of a component. Links and areas report the origin.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Bounds of a component's box.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_center(self.position, self.size)
    }

    pub fn points(&self) -> &ConnectionPoints {
        &self.points
    }

    /// Vertices in order. Empty for components.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Vertices attached to this bundle.
    pub fn attached_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.attached.iter().copied()
    }

    pub(crate) fn set_db_id(&mut self, db_id: Option<u64>) {
        self.db_id = db_id;
    }

    pub(crate) fn set_name(&mut self, name: Id) {
        self.name = name;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn points_mut(&mut self) -> &mut ConnectionPoints {
        &mut self.points
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut Vec<VertexId> {
        &mut self.vertices
    }

    pub(crate) fn attach(&mut self, vertex: VertexId) {
        self.attached.insert(vertex);
    }

    pub(crate) fn detach(&mut self, vertex: VertexId) {
        self.attached.shift_remove(&vertex);
    }

    /// Drops the reverse indexes, which are rebuilt as anchors are restored.
    pub(crate) fn clear_reverse_indexes(&mut self) {
        self.attached.clear();
        for point in self.points.iter_mut() {
            point.clear_connections();
        }
    }
}
