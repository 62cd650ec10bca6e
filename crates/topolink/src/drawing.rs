//! The drawing arena: elements, vertices and their stacking order.
//!
//! # Overview
//!
//! A [`Drawing`] owns every [`Element`] and every [`Vertex`], keyed by
//! [`ElementId`] and [`VertexId`]. Vertices refer to their owner and to the
//! targets of their [`Anchor`] by id only; the reverse direction is kept in
//! the connection points (connected vertices) and in bundle links (attached
//! vertices) and is maintained by every anchor change.
//!
//! The mutators on `Drawing` are raw: they keep the model consistent but do
//! not record undo history on their own. The [`Editor`](crate::Editor) wraps
//! them in operations.
//!
//! # Examples
//!
//! ```
//! # use topolink::drawing::{Anchor, ConnectionPoint, ConnectionRef, Drawing};
//! # use topolink_core::{direction::Direction, geometry::{Point, Size}, identifier::Id};
//! let mut drawing = Drawing::default();
//! let router = drawing
//!     .add_component(Id::new("router"), Point::new(100.0, 100.0), Size::new(40.0, 40.0))
//!     .unwrap();
//! drawing
//!     .add_connection_point(router, ConnectionPoint::new(Id::new("east"), Point::new(20.0, 0.0)))
//!     .unwrap();
//!
//! let link = drawing
//!     .add_link(
//!         Id::new("uplink"),
//!         false,
//!         vec![
//!             Anchor::Connection(ConnectionRef::Element { element: router, point: Id::new("east") }),
//!             Anchor::Position(Point::new(300.0, 120.0)),
//!         ],
//!     )
//!     .unwrap();
//!
//! let head = drawing.element(link).unwrap().vertices()[0];
//! assert_eq!(drawing.coords(head).unwrap(), Point::new(120.0, 100.0));
//! ```

mod anchor;
mod bundle;
mod connection;
mod element;
mod ids;
mod journal;
mod reference;
mod structure;
mod vertex;

pub use anchor::{Anchor, BundleAttachment};
pub use connection::{ConnectionPoint, ConnectionPoints, ConnectionRef};
pub use element::{Element, ElementKind};
pub use ids::{ElementId, VertexId};
pub use journal::AnchorChanges;
pub use structure::{ElementRecord, VertexRecord};
pub use vertex::Vertex;

pub(crate) use journal::Journal;

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info};

use topolink_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::{
    error::{Result, TopolinkError},
    zorder::ZOrderMap,
};

/// Canvas used when a drawing is created without one.
const DEFAULT_CANVAS: Size = Size::new(2000.0, 2000.0);

/// Elements and vertices of one diagram.
#[derive(Debug, Clone)]
pub struct Drawing {
    canvas: Bounds,
    elements: IndexMap<ElementId, Element>,
    names: HashMap<Id, ElementId>,
    db_ids: HashMap<u64, ElementId>,
    vertices: IndexMap<VertexId, Vertex>,
    z_order: ZOrderMap<ElementId>,
    next_element: u32,
    next_vertex: u64,
    journal: Option<Journal>,
    blinks: IndexSet<VertexId>,
    realign_requests: IndexSet<VertexId>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new(Bounds::new_from_top_left(Point::default(), DEFAULT_CANVAS))
    }
}

impl PartialEq for Drawing {
    fn eq(&self, other: &Self) -> bool {
        self.canvas == other.canvas
            && self.elements == other.elements
            && self.names == other.names
            && self.db_ids == other.db_ids
            && self.vertices == other.vertices
            && self.z_order == other.z_order
    }
}

impl Drawing {
    /// Creates an empty drawing on the given canvas.
    pub fn new(canvas: Bounds) -> Self {
        Self {
            canvas,
            elements: IndexMap::new(),
            names: HashMap::new(),
            db_ids: HashMap::new(),
            vertices: IndexMap::new(),
            z_order: ZOrderMap::new(),
            next_element: 0,
            next_vertex: 0,
            journal: None,
            blinks: IndexSet::new(),
            realign_requests: IndexSet::new(),
        }
    }

    /// Logical bounds; vertices are never aligned outside them.
    pub fn canvas(&self) -> Bounds {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Bounds) {
        self.canvas = canvas;
    }

    /// Fallback coordinate for anchors that cannot be resolved.
    pub fn center(&self) -> Point {
        self.canvas.center()
    }

    /// Bounds of every component box and resolved vertex.
    pub fn content_bounds(&self) -> Option<Bounds> {
        let components = self
            .elements
            .values()
            .filter(|element| element.kind() == ElementKind::Component)
            .map(Element::bounds);
        let vertices = Bounds::from_points(
            self.vertices
                .values()
                .filter(|vertex| vertex.anchor().is_set())
                .map(|vertex| self.resolve(vertex, 0)),
        );
        components
            .chain(vertices)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    pub fn element(&self, id: ElementId) -> Result<&Element> {
        self.elements
            .get(&id)
            .ok_or(TopolinkError::UnknownElement(id))
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.elements
            .get_mut(&id)
            .ok_or(TopolinkError::UnknownElement(id))
    }

    /// Looks an element up by name.
    pub fn element_id(&self, name: Id) -> Result<ElementId> {
        self.names
            .get(&name)
            .copied()
            .ok_or(TopolinkError::UnknownElementName(name))
    }

    pub fn element_by_db_id(&self, db_id: u64) -> Option<&Element> {
        self.db_ids.get(&db_id).and_then(|id| self.elements.get(id))
    }

    /// Elements in creation order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn vertex(&self, id: VertexId) -> Result<&Vertex> {
        self.vertices
            .get(&id)
            .ok_or(TopolinkError::UnknownVertex(id))
    }

    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> Result<&mut Vertex> {
        self.vertices
            .get_mut(&id)
            .ok_or(TopolinkError::UnknownVertex(id))
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Vertices of every element, in creation order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn z_order(&self) -> &ZOrderMap<ElementId> {
        &self.z_order
    }

    pub(crate) fn z_order_mut(&mut self) -> &mut ZOrderMap<ElementId> {
        &mut self.z_order
    }

    /// Predecessor and successor of a vertex. Areas wrap around.
    pub fn neighbors(&self, id: VertexId) -> Result<(Option<VertexId>, Option<VertexId>)> {
        let vertex = self.vertex(id)?;
        let element = self.element(vertex.owner())?;
        let sequence = element.vertices();
        let count = sequence.len();
        let index = vertex.index();

        if element.is_area() {
            if count < 2 {
                return Ok((None, None));
            }
            let prev = sequence[(index + count - 1) % count];
            let next = sequence[(index + 1) % count];
            // A two-vertex polygon has one neighbour on both sides.
            if prev == next {
                return Ok((Some(prev), None));
            }
            return Ok((Some(prev), Some(next)));
        }

        let prev = index.checked_sub(1).map(|i| sequence[i]);
        let next = sequence.get(index + 1).copied();
        Ok((prev, next))
    }

    /// Registers a component.
    pub fn add_component(&mut self, name: Id, position: Point, size: Size) -> Result<ElementId> {
        self.check_name(name, None)?;
        let id = self.allocate_element_id();
        let element =
            Element::new(id, name, ElementKind::Component).with_geometry(position, size);
        self.insert_element(element);
        info!(element:% = id, name:% = name; "Component added");
        Ok(id)
    }

    /// Adds a connection point to a component.
    ///
    /// The point's position is taken as an offset from the component center.
    pub fn add_connection_point(&mut self, component: ElementId, point: ConnectionPoint) -> Result<()> {
        let element = self.element_mut(component)?;
        if element.kind() != ElementKind::Component {
            return Err(TopolinkError::NotAComponent(element.name()));
        }
        let name = point.name();
        let mut point = point;
        point.set_position(element.position().add_point(point.position()));
        if !element.points_mut().add(point) {
            return Err(TopolinkError::DuplicateConnectionPoint {
                host: element.name(),
                point: name,
            });
        }
        Ok(())
    }

    /// Creates a link with one vertex per anchor.
    pub fn add_link(&mut self, name: Id, bundle: bool, anchors: Vec<Anchor>) -> Result<ElementId> {
        self.add_vertex_owner(name, ElementKind::Link { bundle }, anchors)
    }

    /// Creates an area with one vertex per anchor.
    pub fn add_area(&mut self, name: Id, anchors: Vec<Anchor>) -> Result<ElementId> {
        self.add_vertex_owner(name, ElementKind::Area, anchors)
    }

    /// Assigns or clears the database id of an element.
    pub fn set_db_id(&mut self, id: ElementId, db_id: Option<u64>) -> Result<()> {
        let taken = db_id
            .and_then(|db_id| self.db_ids.get(&db_id))
            .is_some_and(|owner| *owner != id);
        if let (true, Some(db_id)) = (taken, db_id) {
            return Err(TopolinkError::DuplicateDbId(db_id));
        }
        let element = self.element_mut(id)?;
        let previous = element.db_id();
        element.set_db_id(db_id);
        if let Some(previous) = previous {
            self.db_ids.remove(&previous);
        }
        if let Some(db_id) = db_id {
            self.db_ids.insert(db_id, id);
        }
        Ok(())
    }

    /// Renames an element, returning the previous name.
    pub fn rename_element(&mut self, id: ElementId, name: Id) -> Result<Id> {
        self.check_name(name, Some(id))?;
        let element = self.element_mut(id)?;
        let previous = element.name();
        element.set_name(name);
        self.names.remove(&previous);
        self.names.insert(name, id);
        debug!(element:% = id, from:% = previous, to:% = name; "Element renamed");
        Ok(previous)
    }

    /// Moves a component and everything connected to it by `delta`.
    pub fn move_component(&mut self, id: ElementId, delta: Point) -> Result<()> {
        let position = self.element(id)?.position().add_point(delta);
        self.set_component_position(id, position)
    }

    /// Places a component's center, carrying its connection points along.
    pub fn set_component_position(&mut self, id: ElementId, position: Point) -> Result<()> {
        let element = self.element_mut(id)?;
        if element.kind() != ElementKind::Component {
            return Err(TopolinkError::NotAComponent(element.name()));
        }
        let previous = element.position();
        if previous == position {
            return Ok(());
        }
        element.set_position(position);
        element.points_mut().translate(position.sub_point(previous));
        let connected = element.points().connected_vertices();
        self.record_component(id, previous);
        self.propagate(connected);
        Ok(())
    }

    /// Vertex coordinates flagged by failed alignments since the last call.
    pub fn take_blinks(&mut self) -> Vec<VertexId> {
        self.blinks.drain(..).collect()
    }

    pub(crate) fn blink(&mut self, id: VertexId) {
        self.blinks.insert(id);
    }

    pub(crate) fn take_realign_requests(&mut self) -> Vec<VertexId> {
        self.realign_requests.drain(..).collect()
    }

    fn add_vertex_owner(&mut self, name: Id, kind: ElementKind, anchors: Vec<Anchor>) -> Result<ElementId> {
        if anchors.len() < kind.min_vertices() {
            return Err(TopolinkError::TooFewVertices {
                owner: name,
                minimum: kind.min_vertices(),
            });
        }
        self.check_name(name, None)?;

        let id = self.allocate_element_id();
        let mut element = Element::new(id, name, kind);
        for index in 0..anchors.len() {
            let vertex_id = self.allocate_vertex_id();
            self.vertices
                .insert(vertex_id, Vertex::new(vertex_id, id, index));
            element.vertices_mut().push(vertex_id);
        }
        let vertex_ids = element.vertices().to_vec();
        self.insert_element(element);

        // Endpoints first: once both are known, a self-loop reads its
        // interior positions as head-relative, exactly as given.
        let last = vertex_ids.len().saturating_sub(1);
        let mut ordered: Vec<(VertexId, Anchor)> = vertex_ids.into_iter().zip(anchors).collect();
        ordered.sort_by_key(|(vertex, _)| {
            let index = self.vertices.get(vertex).map_or(0, Vertex::index);
            (index != 0 && index != last, index)
        });
        for (vertex, anchor) in ordered {
            if !anchor.is_set() {
                continue;
            }
            if let Err(err) = self.set_anchor(vertex, anchor) {
                self.remove_element(id)?;
                return Err(err);
            }
        }
        info!(element:% = id, name:% = name, kind:?; "Element added");
        Ok(id)
    }

    fn check_name(&self, name: Id, renaming: Option<ElementId>) -> Result<()> {
        if name.is_empty() {
            return Err(TopolinkError::EmptyName);
        }
        match self.names.get(&name) {
            Some(owner) if Some(*owner) != renaming => Err(TopolinkError::DuplicateName(name)),
            _ => Ok(()),
        }
    }

    fn insert_element(&mut self, element: Element) {
        let id = element.id();
        self.names.insert(element.name(), id);
        if let Some(db_id) = element.db_id() {
            self.db_ids.insert(db_id, id);
        }
        self.elements.insert(id, element);
        self.z_order.add(id, None);
    }

    fn allocate_element_id(&mut self) -> ElementId {
        let id = ElementId::new(self.next_element);
        self.next_element += 1;
        id
    }

    fn allocate_vertex_id(&mut self) -> VertexId {
        let id = VertexId::new(self.next_vertex);
        self.next_vertex += 1;
        id
    }

    fn renumber(&mut self, owner: ElementId) {
        let Some(element) = self.elements.get(&owner) else {
            return;
        };
        for (index, id) in element.vertices().iter().enumerate() {
            if let Some(vertex) = self.vertices.get_mut(id) {
                vertex.set_index(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use topolink_core::direction::Direction;

    use super::*;

    fn component(drawing: &mut Drawing, name: &str, center: Point) -> ElementId {
        let id = drawing
            .add_component(Id::new(name), center, Size::new(20.0, 20.0))
            .unwrap();
        drawing
            .add_connection_point(
                id,
                ConnectionPoint::new(Id::new("east"), Point::new(10.0, 0.0))
                    .with_direction(Direction::new(0.0)),
            )
            .unwrap();
        id
    }

    #[test]
    fn test_names_must_be_unique_and_non_empty() {
        let mut drawing = Drawing::default();
        component(&mut drawing, "a", Point::default());

        assert!(matches!(
            drawing.add_component(Id::new("a"), Point::default(), Size::default()),
            Err(TopolinkError::DuplicateName(_))
        ));
        assert!(matches!(
            drawing.add_component(Id::new(""), Point::default(), Size::default()),
            Err(TopolinkError::EmptyName)
        ));
    }

    #[test]
    fn test_db_ids_are_unique() {
        let mut drawing = Drawing::default();
        let a = component(&mut drawing, "a", Point::default());
        let b = component(&mut drawing, "b", Point::default());

        drawing.set_db_id(a, Some(42)).unwrap();
        assert!(matches!(
            drawing.set_db_id(b, Some(42)),
            Err(TopolinkError::DuplicateDbId(42))
        ));
        assert_eq!(drawing.element_by_db_id(42).unwrap().id(), a);

        drawing.set_db_id(a, None).unwrap();
        drawing.set_db_id(b, Some(42)).unwrap();
        assert_eq!(drawing.element_by_db_id(42).unwrap().id(), b);
    }

    #[test]
    fn test_rename_updates_lookup() {
        let mut drawing = Drawing::default();
        let a = component(&mut drawing, "a", Point::default());
        component(&mut drawing, "b", Point::default());

        assert_eq!(drawing.rename_element(a, Id::new("c")).unwrap(), Id::new("a"));
        assert_eq!(drawing.element_id(Id::new("c")).unwrap(), a);
        assert!(drawing.element_id(Id::new("a")).is_err());
        assert!(drawing.rename_element(a, Id::new("b")).is_err());
        assert!(drawing.rename_element(a, Id::new("c")).is_ok());
    }

    #[test]
    fn test_connection_point_offsets_follow_component() {
        let mut drawing = Drawing::default();
        let a = component(&mut drawing, "a", Point::new(50.0, 50.0));
        let east = drawing.element(a).unwrap().points().get(Id::new("east")).unwrap();
        assert_eq!(east.position(), Point::new(60.0, 50.0));

        drawing.move_component(a, Point::new(5.0, 5.0)).unwrap();
        let east = drawing.element(a).unwrap().points().get(Id::new("east")).unwrap();
        assert_eq!(east.position(), Point::new(65.0, 55.0));
    }

    #[test]
    fn test_link_needs_two_vertices() {
        let mut drawing = Drawing::default();
        let err = drawing
            .add_link(Id::new("l"), false, vec![Anchor::Position(Point::default())])
            .unwrap_err();
        assert!(matches!(err, TopolinkError::TooFewVertices { minimum: 2, .. }));
    }

    #[test]
    fn test_neighbors_wrap_for_areas() {
        let mut drawing = Drawing::default();
        let area = drawing
            .add_area(
                Id::new("zone"),
                vec![
                    Anchor::Position(Point::new(0.0, 0.0)),
                    Anchor::Position(Point::new(10.0, 0.0)),
                    Anchor::Position(Point::new(10.0, 10.0)),
                ],
            )
            .unwrap();
        let ids = drawing.element(area).unwrap().vertices().to_vec();

        assert_eq!(drawing.neighbors(ids[0]).unwrap(), (Some(ids[2]), Some(ids[1])));
        assert_eq!(drawing.neighbors(ids[2]).unwrap(), (Some(ids[1]), Some(ids[0])));
    }

    #[test]
    fn test_neighbors_stop_at_link_ends() {
        let mut drawing = Drawing::default();
        let link = drawing
            .add_link(
                Id::new("l"),
                false,
                vec![
                    Anchor::Position(Point::new(0.0, 0.0)),
                    Anchor::Position(Point::new(10.0, 0.0)),
                ],
            )
            .unwrap();
        let ids = drawing.element(link).unwrap().vertices().to_vec();
        assert_eq!(drawing.neighbors(ids[0]).unwrap(), (None, Some(ids[1])));
        assert_eq!(drawing.neighbors(ids[1]).unwrap(), (Some(ids[0]), None));
    }

    #[test]
    fn test_failed_anchor_rolls_back_element() {
        let mut drawing = Drawing::default();
        let result = drawing.add_link(
            Id::new("l"),
            false,
            vec![
                Anchor::Position(Point::new(0.0, 0.0)),
                Anchor::Connection(ConnectionRef::Element {
                    element: ElementId::new(99),
                    point: Id::new("x"),
                }),
            ],
        );
        assert!(result.is_err());
        assert!(drawing.element_id(Id::new("l")).is_err());
        assert_eq!(drawing.vertices().count(), 0);
        assert!(drawing.z_order().is_empty());
    }

    #[test]
    fn test_content_bounds() {
        let mut drawing = Drawing::default();
        component(&mut drawing, "a", Point::new(50.0, 50.0));
        drawing
            .add_link(
                Id::new("l"),
                false,
                vec![
                    Anchor::Position(Point::new(0.0, 200.0)),
                    Anchor::Position(Point::new(300.0, 200.0)),
                ],
            )
            .unwrap();

        let bounds = drawing.content_bounds().unwrap();
        assert_eq!(bounds.min_x(), 0.0);
        assert_eq!(bounds.min_y(), 40.0);
        assert_eq!(bounds.max_x(), 300.0);
        assert_eq!(bounds.max_y(), 200.0);
    }
}
