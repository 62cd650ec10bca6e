//! Connection points and the per-element registry holding them.
//!
//! A connection point is the place a vertex can be anchored to. Points are
//! owned by components (a named table) or by vertices (exactly one each), and
//! every point keeps the set of vertices currently anchored to it so that
//! moves can be propagated and deletions can detach them.

use indexmap::{IndexMap, IndexSet};

use topolink_core::{direction::Direction, geometry::Point, identifier::Id};
use topolink_parser::PointRef;

use super::{Drawing, ElementId, VertexId};

/// Target of a connection anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionRef {
    /// A named point of a component.
    Element { element: ElementId, point: Id },
    /// The point owned by another vertex.
    Vertex(VertexId),
}

/// An attachment point with an optional preferred direction.
///
/// # Examples
///
/// ```
/// # use topolink::drawing::ConnectionPoint;
/// # use topolink_core::{direction::Direction, geometry::Point, identifier::Id};
/// let point = ConnectionPoint::new(Id::new("eth0"), Point::new(10.0, 0.0))
///     .with_direction(Direction::new(90.0))
///     .with_exclusive(true);
///
/// assert!(point.is_active());
/// assert_eq!(point.direction(), Some(Direction::new(90.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPoint {
    name: Id,
    direction: Option<Direction>,
    position: Point,
    exclusive: bool,
    connected: IndexSet<VertexId>,
}

impl ConnectionPoint {
    pub fn new(name: Id, position: Point) -> Self {
        Self {
            name,
            direction: None,
            position,
            exclusive: false,
            connected: IndexSet::new(),
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// An exclusive point accepts a single connected vertex.
    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Live coordinate of the point.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Returns `false` for an exclusive point that already has a vertex.
    pub fn is_active(&self) -> bool {
        !(self.exclusive && !self.connected.is_empty())
    }

    /// Returns `true` if `vertex` may be anchored here.
    pub fn accepts(&self, vertex: VertexId) -> bool {
        self.is_active() || self.connected.contains(&vertex)
    }

    pub fn connected_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.connected.iter().copied()
    }

    pub fn is_connected(&self, vertex: VertexId) -> bool {
        self.connected.contains(&vertex)
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn register(&mut self, vertex: VertexId) {
        self.connected.insert(vertex);
    }

    pub(crate) fn unregister(&mut self, vertex: VertexId) {
        self.connected.shift_remove(&vertex);
    }

    pub(crate) fn clear_connections(&mut self) {
        self.connected.clear();
    }
}

/// Named connection points of one component, addressable by name or ordinal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionPoints {
    points: IndexMap<Id, ConnectionPoint>,
}

impl ConnectionPoints {
    /// Adds a point. Returns `false` if the name is taken.
    pub(crate) fn add(&mut self, point: ConnectionPoint) -> bool {
        if self.points.contains_key(&point.name) {
            return false;
        }
        self.points.insert(point.name, point);
        true
    }

    pub fn get(&self, name: Id) -> Option<&ConnectionPoint> {
        self.points.get(&name)
    }

    pub(crate) fn get_mut(&mut self, name: Id) -> Option<&mut ConnectionPoint> {
        self.points.get_mut(&name)
    }

    /// Resolves a reference from an anchor string to the point's name.
    ///
    /// A numeric reference matches a point literally named that number
    /// before it is taken as a position in the table.
    pub fn lookup(&self, point: &PointRef) -> Option<Id> {
        match point {
            PointRef::Name(name) => self.points.contains_key(name).then_some(*name),
            PointRef::Ordinal(index) => {
                let literal = Id::new(&index.to_string());
                if self.points.contains_key(&literal) {
                    Some(literal)
                } else {
                    self.points.get_index(*index).map(|(name, _)| *name)
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionPoint> {
        self.points.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ConnectionPoint> {
        self.points.values_mut()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Moves every point by `delta`.
    pub(crate) fn translate(&mut self, delta: Point) {
        for point in self.points.values_mut() {
            point.position = point.position.add_point(delta);
        }
    }

    /// Vertices connected to any point, in point order.
    pub fn connected_vertices(&self) -> Vec<VertexId> {
        self.points
            .values()
            .flat_map(|point| point.connected.iter().copied())
            .collect()
    }
}

impl Drawing {
    /// Nearest connection point within `radius` of `position` that would
    /// accept `vertex`.
    ///
    /// Points owned by the vertex's own element are skipped, so a dragged
    /// vertex never snaps onto its siblings.
    pub fn connection_point_at(&self, position: Point, radius: f32, vertex: VertexId) -> Option<ConnectionRef> {
        let owner = self.vertices.get(&vertex)?.owner();
        let component_points = self
            .elements
            .values()
            .filter(|element| element.id() != owner)
            .flat_map(|element| {
                element.points().iter().map(move |point| {
                    (
                        ConnectionRef::Element {
                            element: element.id(),
                            point: point.name(),
                        },
                        point,
                    )
                })
            });
        let vertex_points = self
            .vertices
            .values()
            .filter(|other| other.owner() != owner)
            .map(|other| (ConnectionRef::Vertex(other.id()), other.point()));

        component_points
            .chain(vertex_points)
            .filter(|(_, point)| point.accepts(vertex))
            .map(|(target, point)| (target, point.position().distance(position)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(target, _)| target)
    }
}
