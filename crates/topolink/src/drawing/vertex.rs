use topolink_core::{
    geometry::{Point, SegmentVector},
    identifier::Id,
};

use super::{Anchor, ElementId, VertexId, connection::ConnectionPoint};

/// An editable point of a link or an area.
#[derive(Debug, Clone)]
pub struct Vertex {
    id: VertexId,
    owner: ElementId,
    index: usize,
    anchor: Anchor,
    point: ConnectionPoint,
    revision: u64,
    segment: Option<SegmentVector>,
}

impl Vertex {
    pub(crate) fn new(id: VertexId, owner: ElementId, index: usize) -> Self {
        Self {
            id,
            owner,
            index,
            anchor: Anchor::Unset,
            point: ConnectionPoint::new(Id::new("vertex"), Point::default()),
            revision: 0,
            segment: None,
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Element that owns this vertex.
    pub fn owner(&self) -> ElementId {
        self.owner
    }

    /// Position within the owner's vertex sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// The point other vertices connect to.
    pub fn point(&self) -> &ConnectionPoint {
        &self.point
    }

    /// Bumped on every change affecting this vertex's coordinates.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Cached vector of the bundle segment starting at this vertex.
    pub fn segment(&self) -> Option<SegmentVector> {
        self.segment
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn replace_anchor(&mut self, anchor: Anchor) -> Anchor {
        std::mem::replace(&mut self.anchor, anchor)
    }

    pub(crate) fn point_mut(&mut self) -> &mut ConnectionPoint {
        &mut self.point
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }

    pub(crate) fn set_segment(&mut self, segment: Option<SegmentVector>) -> bool {
        let changed = self.segment != segment;
        self.segment = segment;
        changed
    }
}

// The revision counter only ever grows, so it is left out of equality.
impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.owner == other.owner
            && self.index == other.index
            && self.anchor == other.anchor
            && self.point == other.point
            && self.segment == other.segment
    }
}
