//! Vertex anchors and coordinate resolution.
//!
//! A vertex stores *how* to find its coordinate, not the coordinate itself:
//!
//! 1. a connection resolves to the live position of the target point (for a
//!    vertex-owned point, the target vertex's own resolved coordinate);
//! 2. a bundle attachment resolves along the cached segment vector of its
//!    base vertex, clamped to the segment;
//! 3. a position on a self-loop link is relative to the link's head vertex;
//! 4. any other position is used verbatim;
//! 5. an unset anchor falls back to the drawing center.
//!
//! Every anchor change bumps the revision of the vertex and of every vertex
//! whose coordinate depends on it, refreshing their cached connection point
//! positions and bundle segment vectors on the way.

use std::collections::VecDeque;

use log::{debug, trace, warn};

use topolink_core::geometry::{Point, SegmentVector};

use super::{ConnectionRef, Drawing, ElementId, ElementKind, Vertex, VertexId};
use crate::error::{Result, TopolinkError};

/// Longest anchor chain followed before giving up on a cycle.
const MAX_RESOLVE_DEPTH: usize = 64;

/// Visits allowed per vertex while propagating a change.
const PROPAGATION_VISITS: usize = 8;

/// Logical position of a vertex.
///
/// # Examples
///
/// ```
/// # use topolink::drawing::Anchor;
/// # use topolink_core::geometry::Point;
/// let anchor = Anchor::Position(Point::new(4.0, 2.0));
/// assert!(anchor.is_position());
/// assert!(anchor.connection().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Anchor {
    /// Placeholder while an element is being built.
    #[default]
    Unset,
    Position(Point),
    Connection(ConnectionRef),
    Bundle(BundleAttachment),
}

impl Anchor {
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    pub fn is_position(&self) -> bool {
        matches!(self, Self::Position(_))
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    pub fn is_bundle(&self) -> bool {
        matches!(self, Self::Bundle(_))
    }

    pub fn connection(&self) -> Option<ConnectionRef> {
        match self {
            Self::Connection(target) => Some(*target),
            _ => None,
        }
    }

    pub fn bundle(&self) -> Option<BundleAttachment> {
        match self {
            Self::Bundle(attachment) => Some(*attachment),
            _ => None,
        }
    }
}

/// Place on a bundle: a distance along the segment that starts at `base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BundleAttachment {
    base: VertexId,
    distance: f32,
}

impl BundleAttachment {
    pub fn new(base: VertexId, distance: f32) -> Self {
        Self { base, distance }
    }

    pub fn base(&self) -> VertexId {
        self.base
    }

    /// Stored distance. May exceed the current segment length.
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

impl Drawing {
    /// Resolved coordinate of a vertex.
    pub fn coords(&self, id: VertexId) -> Result<Point> {
        let vertex = self.vertex(id)?;
        Ok(self.resolve(vertex, 0))
    }

    pub(crate) fn resolve(&self, vertex: &Vertex, depth: usize) -> Point {
        if depth > MAX_RESOLVE_DEPTH {
            warn!(vertex:% = vertex.id(); "Anchor chain does not terminate, using drawing center");
            return self.center();
        }
        match vertex.anchor() {
            Anchor::Connection(target) => self
                .connection_position(*target, depth + 1)
                .unwrap_or_else(|| self.center()),
            Anchor::Bundle(attachment) => self.bundle_position(attachment),
            Anchor::Position(position) => match self.loop_head(vertex) {
                Some(head) => self.resolve(head, depth + 1).add_point(*position),
                None => *position,
            },
            Anchor::Unset => self.center(),
        }
    }

    fn connection_position(&self, target: ConnectionRef, depth: usize) -> Option<Point> {
        match target {
            ConnectionRef::Element { element, point } => self
                .elements
                .get(&element)?
                .points()
                .get(point)
                .map(|point| point.position()),
            ConnectionRef::Vertex(id) => self
                .vertices
                .get(&id)
                .map(|vertex| self.resolve(vertex, depth)),
        }
    }

    fn bundle_position(&self, attachment: &BundleAttachment) -> Point {
        let segment = self
            .vertices
            .get(&attachment.base)
            .and_then(Vertex::segment);
        match segment {
            Some(segment) => segment.point_at(attachment.distance),
            None => {
                trace!(base:% = attachment.base; "Bundle segment not initialized");
                self.center()
            }
        }
    }

    /// Element owning the target of a connection.
    pub(crate) fn connection_host(&self, target: ConnectionRef) -> Option<ElementId> {
        match target {
            ConnectionRef::Element { element, .. } => Some(element),
            ConnectionRef::Vertex(id) => self.vertices.get(&id).map(Vertex::owner),
        }
    }

    /// Head vertex of a self-loop link, for interior vertices of that link.
    fn loop_head(&self, vertex: &Vertex) -> Option<&Vertex> {
        let element = self.elements.get(&vertex.owner())?;
        let sequence = element.vertices();
        let last = sequence.len().checked_sub(1)?;
        if vertex.index() == 0 || vertex.index() == last {
            return None;
        }
        self.loop_head_of(vertex.owner())
    }

    fn loop_head_of(&self, owner: ElementId) -> Option<&Vertex> {
        let element = self.elements.get(&owner)?;
        if !matches!(element.kind(), ElementKind::Link { .. }) {
            return None;
        }
        let sequence = element.vertices();
        if sequence.len() < 3 {
            return None;
        }
        let head = self.vertices.get(sequence.first()?)?;
        let tail = self.vertices.get(sequence.last()?)?;
        let head_host = self.connection_host(head.anchor().connection()?)?;
        let tail_host = self.connection_host(tail.anchor().connection()?)?;
        (head_host == tail_host && head_host != owner).then_some(head)
    }

    /// Coordinate free positions of `owner` are relative to, if it is a self-loop.
    pub(crate) fn loop_origin(&self, owner: ElementId) -> Option<Point> {
        self.loop_head_of(owner)
            .map(|head| self.resolve(head, 0))
    }

    /// Position anchor storing `absolute` for a vertex of `owner`.
    pub fn position_anchor(&self, owner: ElementId, absolute: Point) -> Anchor {
        match self.loop_origin(owner) {
            Some(origin) => Anchor::Position(absolute.sub_point(origin)),
            None => Anchor::Position(absolute),
        }
    }

    /// Position anchor placing vertex `id` at `absolute`. Endpoints always
    /// store the coordinate verbatim.
    pub(crate) fn vertex_position_anchor(&self, id: VertexId, absolute: Point) -> Result<Anchor> {
        let vertex = self.vertex(id)?;
        let stored = match self.loop_head(vertex) {
            Some(head) => absolute.sub_point(self.resolve(head, 0)),
            None => absolute,
        };
        Ok(Anchor::Position(stored))
    }

    /// Validates and applies a new anchor.
    ///
    /// Toggling a link into or out of a self-loop converts its interior free
    /// positions so that they keep their coordinates. Detaching a bundle
    /// endpoint that still carries attachments requests its re-alignment.
    pub(crate) fn set_anchor(&mut self, id: VertexId, anchor: Anchor) -> Result<()> {
        self.validate_anchor(id, &anchor)?;

        let vertex = self.vertex(id)?;
        if *vertex.anchor() == anchor {
            return Ok(());
        }
        let owner = vertex.owner();
        let origin_before = self.loop_origin(owner);

        let previous = self.write_anchor(id, anchor)?;

        let origin_after = self.loop_origin(owner);
        if origin_before.is_some() != origin_after.is_some() {
            self.convert_loop_positions(owner, origin_before, origin_after)?;
        }

        if previous.is_connection() && !anchor.is_connection() && self.is_bundle_endpoint(id) {
            let element = self.element(owner)?;
            if element.attached_vertices().next().is_some() {
                debug!(vertex:% = id; "Bundle endpoint detached, re-alignment requested");
                self.realign_requests.insert(id);
            }
        }
        Ok(())
    }

    /// Applies an anchor without validation or side effects. Used to replay
    /// recorded states, which may pass through intermediate configurations.
    pub(crate) fn restore_anchor(&mut self, id: VertexId, anchor: Anchor) -> Result<()> {
        if *self.vertex(id)?.anchor() != anchor {
            self.write_anchor(id, anchor)?;
        }
        Ok(())
    }

    fn write_anchor(&mut self, id: VertexId, anchor: Anchor) -> Result<Anchor> {
        let previous = self.vertex_mut(id)?.replace_anchor(anchor);
        self.record_anchor(id, previous);
        self.unregister(id, &previous);
        self.register(id, &anchor);
        debug!(vertex:% = id, from:? = previous, to:? = anchor; "Anchor changed");
        self.propagate([id]);
        Ok(previous)
    }

    fn validate_anchor(&self, id: VertexId, anchor: &Anchor) -> Result<()> {
        let vertex = self.vertex(id)?;
        let invalid = |reason| TopolinkError::InvalidAnchor { vertex: id, reason };

        match anchor {
            Anchor::Unset => Err(invalid("anchors cannot be cleared")),
            Anchor::Position(position) => {
                if position.x().is_finite() && position.y().is_finite() {
                    Ok(())
                } else {
                    Err(invalid("coordinates must be finite"))
                }
            }
            Anchor::Connection(ConnectionRef::Element { element, point }) => {
                let host = self.element(*element)?;
                let target = host.points().get(*point).ok_or_else(|| {
                    TopolinkError::UnknownConnectionPoint {
                        host: host.name(),
                        point: point.to_string(),
                    }
                })?;
                if target.accepts(id) {
                    Ok(())
                } else {
                    Err(TopolinkError::InactiveConnectionPoint {
                        host: host.name(),
                        point: *point,
                    })
                }
            }
            Anchor::Connection(ConnectionRef::Vertex(target)) => {
                if *target == id {
                    return Err(invalid("a vertex cannot connect to itself"));
                }
                let target = self.vertex(*target)?;
                if target.point().accepts(id) {
                    Ok(())
                } else {
                    Err(TopolinkError::InactiveConnectionPoint {
                        host: self.element(target.owner())?.name(),
                        point: target.point().name(),
                    })
                }
            }
            Anchor::Bundle(attachment) => {
                if !matches!(self.element(vertex.owner())?.kind(), ElementKind::Link { .. }) {
                    return Err(invalid("only link vertices attach to bundles"));
                }
                if !attachment.distance.is_finite() {
                    return Err(invalid("bundle distance must be finite"));
                }
                let base = self.vertex(attachment.base)?;
                let bundle = self.element(base.owner())?;
                if !bundle.is_bundle() {
                    return Err(TopolinkError::NotABundle(bundle.name()));
                }
                if base.owner() == vertex.owner() {
                    return Err(invalid("a bundle cannot carry its own vertices"));
                }
                if base.index() + 1 >= bundle.vertices().len() {
                    return Err(TopolinkError::UnknownBundleSegment {
                        bundle: bundle.name(),
                        index: base.index(),
                    });
                }
                Ok(())
            }
        }
    }

    fn register(&mut self, id: VertexId, anchor: &Anchor) {
        match anchor {
            Anchor::Connection(ConnectionRef::Element { element, point }) => {
                if let Some(point) = self
                    .elements
                    .get_mut(element)
                    .and_then(|element| element.points_mut().get_mut(*point))
                {
                    point.register(id);
                }
            }
            Anchor::Connection(ConnectionRef::Vertex(target)) => {
                if let Some(target) = self.vertices.get_mut(target) {
                    target.point_mut().register(id);
                }
            }
            Anchor::Bundle(attachment) => {
                let owner = self.vertices.get(&attachment.base).map(Vertex::owner);
                if let Some(bundle) = owner.and_then(|owner| self.elements.get_mut(&owner)) {
                    bundle.attach(id);
                }
            }
            Anchor::Position(_) | Anchor::Unset => {}
        }
    }

    pub(crate) fn unregister(&mut self, id: VertexId, anchor: &Anchor) {
        match anchor {
            Anchor::Connection(ConnectionRef::Element { element, point }) => {
                if let Some(point) = self
                    .elements
                    .get_mut(element)
                    .and_then(|element| element.points_mut().get_mut(*point))
                {
                    point.unregister(id);
                }
            }
            Anchor::Connection(ConnectionRef::Vertex(target)) => {
                if let Some(target) = self.vertices.get_mut(target) {
                    target.point_mut().unregister(id);
                }
            }
            Anchor::Bundle(attachment) => {
                let owner = self.vertices.get(&attachment.base).map(Vertex::owner);
                if let Some(bundle) = owner.and_then(|owner| self.elements.get_mut(&owner)) {
                    bundle.detach(id);
                }
            }
            Anchor::Position(_) | Anchor::Unset => {}
        }
    }

    pub(super) fn convert_loop_positions(
        &mut self,
        owner: ElementId,
        before: Option<Point>,
        after: Option<Point>,
    ) -> Result<()> {
        let interior: Vec<(VertexId, Point)> = {
            let sequence = self.element(owner)?.vertices();
            let last = sequence.len().saturating_sub(1);
            sequence
                .iter()
                .filter_map(|id| self.vertices.get(id))
                .filter(|vertex| vertex.index() != 0 && vertex.index() != last)
                .filter_map(|vertex| match vertex.anchor() {
                    Anchor::Position(stored) => Some((vertex.id(), *stored)),
                    _ => None,
                })
                .collect()
        };
        for (id, stored) in interior {
            let absolute = before.map_or(stored, |origin| origin.add_point(stored));
            let converted = after.map_or(absolute, |origin| absolute.sub_point(origin));
            self.write_anchor(id, Anchor::Position(converted))?;
        }
        Ok(())
    }

    pub(crate) fn is_bundle_endpoint(&self, id: VertexId) -> bool {
        let Some(vertex) = self.vertices.get(&id) else {
            return false;
        };
        let Some(element) = self.elements.get(&vertex.owner()) else {
            return false;
        };
        element.is_bundle()
            && (vertex.index() == 0 || vertex.index() + 1 == element.vertices().len())
    }

    /// Recomputes caches of the given vertices and of everything that depends
    /// on them, bumping revisions along the way.
    pub(crate) fn propagate(&mut self, seeds: impl IntoIterator<Item = VertexId>) {
        let mut queue: VecDeque<(VertexId, bool)> =
            seeds.into_iter().map(|id| (id, true)).collect();
        let limit = (self.vertices.len() + 1) * PROPAGATION_VISITS;
        let mut visits = 0;

        while let Some((id, forced)) = queue.pop_front() {
            visits += 1;
            if visits > limit {
                warn!(vertex:% = id; "Coordinate propagation did not settle");
                break;
            }
            let Some(vertex) = self.vertices.get(&id) else {
                continue;
            };
            let owner = vertex.owner();
            let index = vertex.index();
            let position = self.resolve(vertex, 0);
            let moved = vertex.point().position() != position;

            let mut dependents: Vec<VertexId> = Vec::new();
            if let Some(vertex) = self.vertices.get_mut(&id) {
                vertex.bump_revision();
                vertex.point_mut().set_position(position);
                if moved || forced {
                    dependents.extend(vertex.point().connected_vertices());
                }
            }
            if moved || forced {
                if index == 0 && self.loop_head_of(owner).is_some() {
                    dependents.extend(self.interior_vertices(owner));
                }
                if self.elements.get(&owner).is_some_and(|e| e.is_bundle()) {
                    let prev = index
                        .checked_sub(1)
                        .and_then(|i| self.vertex_at(owner, i));
                    for base in prev.into_iter().chain(Some(id)) {
                        if self.refresh_segment(base) {
                            dependents.extend(self.attached_at(owner, base));
                        }
                    }
                }
            }
            trace!(vertex:% = id, moved, dependents = dependents.len(); "Propagated");
            queue.extend(dependents.into_iter().map(|id| (id, false)));
        }
    }

    pub(crate) fn vertex_at(&self, owner: ElementId, index: usize) -> Option<VertexId> {
        self.elements
            .get(&owner)
            .and_then(|element| element.vertices().get(index).copied())
    }

    fn interior_vertices(&self, owner: ElementId) -> Vec<VertexId> {
        self.elements
            .get(&owner)
            .map(|element| {
                let sequence = element.vertices();
                let end = sequence.len().saturating_sub(1);
                sequence.get(1..end).unwrap_or_default().to_vec()
            })
            .unwrap_or_default()
    }

    /// Vector of the bundle segment starting at `base`, if both ends are set.
    pub(crate) fn compute_segment(&self, base: VertexId) -> Option<SegmentVector> {
        let start = self.vertices.get(&base)?;
        let next = self.vertex_at(start.owner(), start.index() + 1)?;
        let end = self.vertices.get(&next)?;
        if !start.anchor().is_set() || !end.anchor().is_set() {
            return None;
        }
        Some(SegmentVector::between(
            self.resolve(start, 0),
            self.resolve(end, 0),
        ))
    }

    fn refresh_segment(&mut self, base: VertexId) -> bool {
        let segment = self.compute_segment(base);
        self.vertices
            .get_mut(&base)
            .is_some_and(|vertex| vertex.set_segment(segment))
    }

    /// Vertices attached to `bundle` on the segment starting at `base`.
    pub(crate) fn attached_at(&self, bundle: ElementId, base: VertexId) -> Vec<VertexId> {
        let Some(element) = self.elements.get(&bundle) else {
            return Vec::new();
        };
        element
            .attached_vertices()
            .filter(|id| {
                self.vertices
                    .get(id)
                    .and_then(|vertex| vertex.anchor().bundle())
                    .is_some_and(|attachment| attachment.base == base)
            })
            .collect()
    }
}
