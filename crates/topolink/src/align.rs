//! Alignment of vertices against their neighbours.
//!
//! # Overview
//!
//! [`Drawing::align`] moves a single free vertex so that the segments around
//! it become straight or right-angled:
//!
//! - **endpoint**: with one neighbour, snap onto the neighbour's x or y when
//!   the segment is already close to vertical or horizontal;
//! - **bundle**: a bundle-attached vertex whose outside neighbour is off the
//!   bundle slides along its segment to line up with that neighbour;
//! - **directional**: next to a connection with a preferred direction, move
//!   onto that direction's ray, level with the other neighbour;
//! - **corner**: between two free neighbours, take the nearer of the two
//!   right-angle corners.
//!
//! A move that would leave the canvas is dropped. A move onto a neighbour is
//! pulled back on one axis. Failures never raise errors: the vertex stays
//! put and the affected vertices are recorded as blinks.

use log::{debug, warn};

use topolink_core::{
    direction::{Direction, Heading},
    geometry::{EPSILON, Point},
};

use crate::{
    drawing::{Anchor, BundleAttachment, ConnectionRef, Drawing, ElementId, ElementKind, VertexId},
    error::Result,
};

/// Why an alignment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignMode {
    /// Requested by the user; may cascade to neighbours.
    Normal,
    /// Cascaded from a neighbour's alignment.
    PostAlign,
    /// Follows a drag.
    PostMove,
}

/// Outcome of aligning one vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    moved: bool,
    cascade: Vec<VertexId>,
}

impl Alignment {
    fn unchanged() -> Self {
        Self::default()
    }

    /// Returns `true` if the vertex moved.
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Vertices to re-align after a normal-mode move.
    pub fn cascade(&self) -> &[VertexId] {
        &self.cascade
    }
}

#[derive(Debug, Clone, Copy)]
struct Neighbor {
    id: VertexId,
    position: Point,
    anchor: Anchor,
    direction: Option<Direction>,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Position(Point),
    Attachment(BundleAttachment),
}

#[derive(Debug)]
enum Decision {
    Move(Target),
    Stay,
    Fail(Vec<VertexId>),
}

impl Drawing {
    /// Aligns a vertex. Returns whether it moved and what to cascade to.
    ///
    /// `ratio` is the endpoint straightening threshold: the smaller axis
    /// delta may be at most `ratio` times the larger one.
    pub fn align(&mut self, id: VertexId, mode: AlignMode, ratio: f32) -> Result<Alignment> {
        let vertex = self.vertex(id)?;
        let anchor = *vertex.anchor();
        if anchor.is_connection() {
            if mode == AlignMode::Normal {
                warn!(vertex:% = id; "Connected vertices cannot be aligned");
                self.blink(id);
            }
            return Ok(Alignment::unchanged());
        }
        let original = self.resolve(vertex, 0);

        let (prev, next) = self.neighbors(id)?;
        let neighbors = [prev, next]
            .into_iter()
            .flatten()
            .map(|neighbor| self.describe_neighbor(neighbor))
            .collect::<Result<Vec<_>>>()?;

        let decision = match (anchor, neighbors.as_slice()) {
            (_, []) => Decision::Stay,
            (Anchor::Bundle(attachment), _) => self.bundle_decision(attachment, &neighbors)?,
            (_, [neighbor]) => endpoint_target(original, neighbor.position, ratio)
                .map_or(Decision::Stay, |point| Decision::Move(Target::Position(point))),
            (_, [before, after, ..]) => corner_decision(id, original, before, after),
        };

        let target = match decision {
            Decision::Move(target) => target,
            Decision::Stay => {
                debug!(vertex:% = id, mode:?; "Nothing to align");
                return Ok(Alignment::unchanged());
            }
            Decision::Fail(blinks) => {
                warn!(vertex:% = id; "No valid alignment target");
                for blink in blinks {
                    self.blink(blink);
                }
                return Ok(Alignment::unchanged());
            }
        };

        if !self.apply_target(id, original, target, &neighbors)? {
            return Ok(Alignment::unchanged());
        }

        let cascade = if mode == AlignMode::Normal {
            self.cascade_targets(id, &neighbors)?
        } else {
            Vec::new()
        };
        debug!(vertex:% = id, mode:?, cascade = cascade.len(); "Vertex aligned");
        Ok(Alignment {
            moved: true,
            cascade,
        })
    }

    /// Vertices of an element that alignment applies to.
    ///
    /// Areas align every vertex. Links skip connected vertices, and bundles
    /// also take the vertices attached to them.
    pub fn would_align(&self, owner: ElementId) -> Result<Vec<VertexId>> {
        let element = self.element(owner)?;
        let vertices = element.vertices().iter().copied();
        let set = match element.kind() {
            ElementKind::Area => vertices.collect(),
            ElementKind::Link { bundle } => {
                let mut set: Vec<VertexId> = vertices
                    .filter(|id| {
                        self.vertex(*id)
                            .is_ok_and(|vertex| !vertex.anchor().is_connection())
                    })
                    .collect();
                if bundle {
                    set.extend(element.attached_vertices());
                }
                set
            }
            ElementKind::Component => Vec::new(),
        };
        Ok(set)
    }

    fn describe_neighbor(&self, id: VertexId) -> Result<Neighbor> {
        let vertex = self.vertex(id)?;
        let anchor = *vertex.anchor();
        let direction = match anchor.connection() {
            Some(ConnectionRef::Element { element, point }) => self
                .element(element)?
                .points()
                .get(point)
                .and_then(|point| point.direction()),
            Some(ConnectionRef::Vertex(target)) => self.vertex(target)?.point().direction(),
            None => None,
        };
        Ok(Neighbor {
            id,
            position: self.resolve(vertex, 0),
            anchor,
            direction,
        })
    }

    fn bundle_decision(&self, attachment: BundleAttachment, neighbors: &[Neighbor]) -> Result<Decision> {
        let bundle = self.vertex(attachment.base())?.owner();
        let inside = |neighbor: &&Neighbor| {
            neighbor.anchor.bundle().is_some_and(|other| {
                self.vertex(other.base())
                    .is_ok_and(|base| base.owner() == bundle)
            })
        };
        let outside: Vec<&Neighbor> = neighbors.iter().filter(|n| !inside(n)).collect();
        let [outside] = outside.as_slice() else {
            return Ok(Decision::Stay);
        };

        let Some(segment) = self.vertex(attachment.base())?.segment() else {
            return Ok(Decision::Stay);
        };
        let offset = outside.position.sub_point(segment.start());
        let (target, axis_cos) = match (segment.is_horizontal(), segment.is_vertical()) {
            (true, false) => (offset.x(), segment.cos()),
            (false, true) => (offset.y(), segment.sin()),
            _ => return Ok(Decision::Stay),
        };

        // The projected offset of a distance `d` is `d * axis_cos`, so the
        // distance matching the outside neighbour does not depend on where
        // the vertex sits now.
        Ok(Decision::Move(Target::Attachment(BundleAttachment::new(
            attachment.base(),
            segment.clamp_distance(target / axis_cos),
        ))))
    }

    fn apply_target(
        &mut self,
        id: VertexId,
        original: Point,
        target: Target,
        neighbors: &[Neighbor],
    ) -> Result<bool> {
        match target {
            Target::Position(point) => {
                let point = nudge_off_neighbors(point, original, neighbors);
                if !self.canvas().contains(point) {
                    warn!(vertex:% = id, x = point.x(), y = point.y(); "Alignment would leave the canvas");
                    self.blink(id);
                    return Ok(false);
                }
                if point.is_near(original) {
                    return Ok(false);
                }
                let anchor = self.vertex_position_anchor(id, point)?;
                self.set_anchor(id, anchor)?;
            }
            Target::Attachment(attachment) => {
                let current = match self.vertex(id)?.anchor().bundle() {
                    Some(current) => self.effective_distance(&current)?,
                    None => return Ok(false),
                };
                if (current - attachment.distance()).abs() <= EPSILON {
                    return Ok(false);
                }
                let segment = self.vertex(attachment.base())?.segment();
                let point = segment.map_or(original, |segment| segment.point_at(attachment.distance()));
                if !self.canvas().contains(point) {
                    warn!(vertex:% = id; "Alignment would leave the canvas");
                    self.blink(id);
                    return Ok(false);
                }
                self.set_anchor(id, Anchor::Bundle(attachment))?;
            }
        }
        Ok(true)
    }

    fn cascade_targets(&self, id: VertexId, neighbors: &[Neighbor]) -> Result<Vec<VertexId>> {
        let mut targets: Vec<VertexId> = neighbors.iter().map(|neighbor| neighbor.id).collect();
        let vertex = self.vertex(id)?;
        let owner = vertex.owner();
        if !self.element(owner)?.is_bundle() {
            return Ok(targets);
        }

        for attached in self.attached_at(owner, id) {
            let Some(attachment) = self.vertex(attached)?.anchor().bundle() else {
                continue;
            };
            if self.effective_distance(&attachment)? <= EPSILON {
                targets.push(attached);
            }
        }
        let prev = vertex
            .index()
            .checked_sub(1)
            .and_then(|index| self.vertex_at(owner, index));
        if let Some(prev) = prev {
            let length = self.vertex(prev)?.segment().map(|segment| segment.length());
            for attached in self.attached_at(owner, prev) {
                let Some(attachment) = self.vertex(attached)?.anchor().bundle() else {
                    continue;
                };
                let distance = self.effective_distance(&attachment)?;
                if length.is_some_and(|length| (length - distance).abs() <= EPSILON) {
                    targets.push(attached);
                }
            }
        }
        Ok(targets)
    }
}

/// Straightens the segment to `neighbor` if it is nearly axis-aligned.
fn endpoint_target(original: Point, neighbor: Point, ratio: f32) -> Option<Point> {
    let dx = (neighbor.x() - original.x()).abs();
    let dy = (neighbor.y() - original.y()).abs();
    if dx <= dy {
        (dx <= ratio * dy).then(|| original.with_x(neighbor.x()))
    } else {
        (dy <= ratio * dx).then(|| original.with_y(neighbor.y()))
    }
}

fn corner_decision(id: VertexId, original: Point, before: &Neighbor, after: &Neighbor) -> Decision {
    match (before.direction, after.direction) {
        (Some(direction), None) => match ray_target(before.position, direction, after.position) {
            Some(point) => Decision::Move(Target::Position(point)),
            None => Decision::Fail(vec![id, before.id]),
        },
        (None, Some(direction)) => match ray_target(after.position, direction, before.position) {
            Some(point) => Decision::Move(Target::Position(point)),
            None => Decision::Fail(vec![id, after.id]),
        },
        (Some(first), Some(second)) => ray_target(before.position, first, after.position)
            .or_else(|| ray_target(after.position, second, before.position))
            .map_or_else(
                || Decision::Fail(vec![id, before.id, after.id]),
                |point| Decision::Move(Target::Position(point)),
            ),
        (None, None) => Decision::Move(Target::Position(l_corner(original, before.position, after.position))),
    }
}

/// Right-angle corner between two free neighbours.
///
/// Both corners give the same path between the neighbours, so the one
/// closer to the vertex wins. Neighbours on a common axis keep the vertex on
/// that line instead.
fn l_corner(original: Point, before: Point, after: Point) -> Point {
    if (before.y() - after.y()).abs() <= EPSILON {
        return original.with_y(before.y());
    }
    if (before.x() - after.x()).abs() <= EPSILON {
        return original.with_x(before.x());
    }
    let first = Point::new(before.x(), after.y());
    let second = Point::new(after.x(), before.y());
    if original.distance(first) <= original.distance(second) {
        first
    } else {
        second
    }
}

/// Point on the ray from `origin` along `direction` that lines up with
/// `other` on the ray's dominant axis. `None` if that point is not ahead of
/// the origin.
fn ray_target(origin: Point, direction: Direction, other: Point) -> Option<Point> {
    match direction.heading() {
        Some(Heading::East) => (other.x() > origin.x()).then(|| origin.with_x(other.x())),
        Some(Heading::West) => (other.x() < origin.x()).then(|| origin.with_x(other.x())),
        Some(Heading::North) => (other.y() < origin.y()).then(|| origin.with_y(other.y())),
        Some(Heading::South) => (other.y() > origin.y()).then(|| origin.with_y(other.y())),
        None => {
            let unit = direction.unit();
            if unit.x().abs() >= unit.y().abs() {
                let t = (other.x() - origin.x()) / unit.x();
                (t > EPSILON).then(|| Point::new(other.x(), origin.y() + t * unit.y()))
            } else {
                let t = (other.y() - origin.y()) / unit.y();
                (t > EPSILON).then(|| Point::new(origin.x() + t * unit.x(), other.y()))
            }
        }
    }
}

/// Pulls a target that lands on a neighbour back to the original coordinate
/// on the axis where it moved least.
fn nudge_off_neighbors(point: Point, original: Point, neighbors: &[Neighbor]) -> Point {
    if !neighbors.iter().any(|neighbor| point.is_near(neighbor.position)) {
        return point;
    }
    let dx = (point.x() - original.x()).abs();
    let dy = (point.y() - original.y()).abs();
    match (dx > EPSILON, dy > EPSILON) {
        (true, true) if dx <= dy => point.with_x(original.x()),
        (true, true) | (false, true) => point.with_y(original.y()),
        (true, false) => point.with_x(original.x()),
        (false, false) => original,
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use topolink_core::{
        geometry::{Bounds, Size},
        identifier::Id,
    };

    use super::*;
    use crate::drawing::ConnectionPoint;

    const RATIO: f32 = 0.2;

    fn free_link(drawing: &mut Drawing, name: &str, points: &[(f32, f32)]) -> Vec<VertexId> {
        let link = drawing
            .add_link(
                Id::new(name),
                false,
                points
                    .iter()
                    .map(|(x, y)| Anchor::Position(Point::new(*x, *y)))
                    .collect(),
            )
            .unwrap();
        drawing.element(link).unwrap().vertices().to_vec()
    }

    fn oriented_host(drawing: &mut Drawing, name: &str, point: Point, degrees: f32) -> ElementId {
        let id = drawing
            .add_component(Id::new(name), point, Size::new(10.0, 10.0))
            .unwrap();
        drawing
            .add_connection_point(
                id,
                ConnectionPoint::new(Id::new("p"), Point::default())
                    .with_direction(Direction::new(degrees)),
            )
            .unwrap();
        id
    }

    fn at(element: ElementId) -> Anchor {
        Anchor::Connection(ConnectionRef::Element {
            element,
            point: Id::new("p"),
        })
    }

    #[test]
    fn test_endpoint_straightens_nearly_vertical_segment() {
        let mut drawing = Drawing::default();
        let ids = free_link(&mut drawing, "l", &[(100.0, 100.0), (105.0, 200.0)]);

        let alignment = drawing.align(ids[0], AlignMode::Normal, RATIO).unwrap();

        assert!(alignment.moved());
        assert_eq!(drawing.coords(ids[0]).unwrap(), Point::new(105.0, 100.0));
        assert_eq!(alignment.cascade(), &[ids[1]]);
    }

    #[test]
    fn test_endpoint_leaves_diagonal_segment() {
        let mut drawing = Drawing::default();
        let ids = free_link(&mut drawing, "l", &[(100.0, 100.0), (160.0, 200.0)]);
        assert!(!drawing.align(ids[0], AlignMode::Normal, RATIO).unwrap().moved());
    }

    #[test]
    fn test_endpoint_alignment_is_idempotent() {
        let mut drawing = Drawing::default();
        let ids = free_link(&mut drawing, "l", &[(100.0, 100.0), (200.0, 110.0)]);

        assert!(drawing.align(ids[0], AlignMode::Normal, RATIO).unwrap().moved());
        let first = drawing.coords(ids[0]).unwrap();
        assert!(!drawing.align(ids[0], AlignMode::Normal, RATIO).unwrap().moved());
        assert_eq!(drawing.coords(ids[0]).unwrap(), first);
    }

    #[test]
    fn test_connected_vertex_blinks_in_normal_mode_only() {
        let mut drawing = Drawing::default();
        let host = oriented_host(&mut drawing, "h", Point::new(50.0, 50.0), 0.0);
        let link = drawing
            .add_link(Id::new("l"), false, vec![at(host), Anchor::Position(Point::new(90.0, 90.0))])
            .unwrap();
        let head = drawing.element(link).unwrap().vertices()[0];

        assert!(!drawing.align(head, AlignMode::PostAlign, RATIO).unwrap().moved());
        assert!(drawing.take_blinks().is_empty());

        assert!(!drawing.align(head, AlignMode::Normal, RATIO).unwrap().moved());
        assert_eq!(drawing.take_blinks(), vec![head]);
    }

    #[test]
    fn test_corner_picks_nearest_candidate() {
        let mut drawing = Drawing::default();
        let ids = free_link(&mut drawing, "l", &[(0.0, 0.0), (90.0, 20.0), (100.0, 100.0)]);

        assert!(drawing.align(ids[1], AlignMode::Normal, RATIO).unwrap().moved());
        assert_eq!(drawing.coords(ids[1]).unwrap(), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_corner_between_collinear_neighbours_stays_on_line() {
        let mut drawing = Drawing::default();
        let ids = free_link(&mut drawing, "l", &[(0.0, 50.0), (40.0, 60.0), (100.0, 50.0)]);

        assert!(drawing.align(ids[1], AlignMode::Normal, RATIO).unwrap().moved());
        assert_eq!(drawing.coords(ids[1]).unwrap(), Point::new(40.0, 50.0));
    }

    #[test]
    fn test_directional_follows_predecessor_ray() {
        let mut drawing = Drawing::default();
        let a = oriented_host(&mut drawing, "a", Point::new(100.0, 80.0), 0.0);
        let b = oriented_host(&mut drawing, "b", Point::new(140.0, 120.0), 180.0);
        let link = drawing
            .add_link(
                Id::new("l"),
                false,
                vec![at(a), Anchor::Position(Point::new(120.0, 80.0)), at(b)],
            )
            .unwrap();
        let middle = drawing.element(link).unwrap().vertices()[1];

        assert!(drawing.align(middle, AlignMode::Normal, RATIO).unwrap().moved());
        assert_eq!(drawing.coords(middle).unwrap(), Point::new(140.0, 80.0));
        assert!(!drawing.align(middle, AlignMode::Normal, RATIO).unwrap().moved());
    }

    #[test]
    fn test_directional_falls_back_to_successor_ray() {
        let mut drawing = Drawing::default();
        // A points away from B, so only B's ray can reach A's level.
        let a = oriented_host(&mut drawing, "a", Point::new(100.0, 80.0), 180.0);
        let b = oriented_host(&mut drawing, "b", Point::new(140.0, 120.0), 90.0);
        let link = drawing
            .add_link(
                Id::new("l"),
                false,
                vec![at(a), Anchor::Position(Point::new(120.0, 100.0)), at(b)],
            )
            .unwrap();
        let middle = drawing.element(link).unwrap().vertices()[1];

        assert!(drawing.align(middle, AlignMode::Normal, RATIO).unwrap().moved());
        assert_eq!(drawing.coords(middle).unwrap(), Point::new(140.0, 80.0));
    }

    #[test]
    fn test_directional_without_intersection_blinks() {
        let mut drawing = Drawing::default();
        let a = oriented_host(&mut drawing, "a", Point::new(100.0, 80.0), 180.0);
        let link = drawing
            .add_link(
                Id::new("l"),
                false,
                vec![
                    at(a),
                    Anchor::Position(Point::new(150.0, 100.0)),
                    Anchor::Position(Point::new(200.0, 120.0)),
                ],
            )
            .unwrap();
        let ids = drawing.element(link).unwrap().vertices().to_vec();

        assert!(!drawing.align(ids[1], AlignMode::Normal, RATIO).unwrap().moved());
        assert_eq!(drawing.take_blinks(), vec![ids[1], ids[0]]);
    }

    #[test]
    fn test_oblique_ray() {
        let target = ray_target(Point::new(0.0, 0.0), Direction::new(45.0), Point::new(50.0, 0.0)).unwrap();
        assert_approx_eq!(f32, target.x(), 50.0);
        assert_approx_eq!(f32, target.y(), -50.0, epsilon = 1e-3);

        assert!(ray_target(Point::new(0.0, 0.0), Direction::new(45.0), Point::new(-50.0, 0.0)).is_none());
    }

    #[test]
    fn test_move_outside_canvas_is_suppressed() {
        let mut drawing = Drawing::new(Bounds::new_from_top_left(Point::default(), Size::new(100.0, 100.0)));
        let ids = free_link(&mut drawing, "l", &[(50.0, 50.0), (52.0, 500.0)]);

        assert!(!drawing.align(ids[1], AlignMode::Normal, RATIO).unwrap().moved());
        assert_eq!(drawing.take_blinks(), vec![ids[1]]);
    }

    #[test]
    fn test_nudge_keeps_segment_non_degenerate() {
        let neighbor = Neighbor {
            id: VertexId::new(0),
            position: Point::new(100.0, 0.0),
            anchor: Anchor::Position(Point::new(100.0, 0.0)),
            direction: None,
        };
        let nudged = nudge_off_neighbors(Point::new(100.0, 0.0), Point::new(90.0, 30.0), &[neighbor]);
        assert_eq!(nudged, Point::new(90.0, 0.0));
    }

    #[test]
    fn test_bundle_alignment_lines_up_with_outside_neighbour() {
        let mut drawing = Drawing::default();
        let trunk = drawing
            .add_link(
                Id::new("trunk"),
                true,
                vec![
                    Anchor::Position(Point::new(0.0, 0.0)),
                    Anchor::Position(Point::new(200.0, 0.0)),
                ],
            )
            .unwrap();
        let base = drawing.element(trunk).unwrap().vertices()[0];
        let ids = free_link(&mut drawing, "branch", &[(40.0, 0.0), (75.0, 120.0)]);
        drawing.attach_to_bundle(ids[0], base, 40.0).unwrap();

        assert!(drawing.align(ids[0], AlignMode::Normal, RATIO).unwrap().moved());
        assert_eq!(drawing.coords(ids[0]).unwrap(), Point::new(75.0, 0.0));
    }

    #[test]
    fn test_bundle_alignment_on_reversed_segment_from_any_distance() {
        for start in [0.0, 40.0, 180.0] {
            let mut drawing = Drawing::default();
            let trunk = drawing
                .add_link(
                    Id::new("trunk"),
                    true,
                    vec![
                        Anchor::Position(Point::new(200.0, 0.0)),
                        Anchor::Position(Point::new(0.0, 0.0)),
                    ],
                )
                .unwrap();
            let base = drawing.element(trunk).unwrap().vertices()[0];
            let ids = free_link(&mut drawing, "branch", &[(200.0, 0.0), (75.0, 120.0)]);
            drawing.attach_to_bundle(ids[0], base, start).unwrap();

            drawing.align(ids[0], AlignMode::Normal, RATIO).unwrap();
            assert_eq!(drawing.coords(ids[0]).unwrap(), Point::new(75.0, 0.0), "from {start}");
            assert_approx_eq!(
                f32,
                drawing.vertex(ids[0]).unwrap().anchor().bundle().unwrap().distance(),
                125.0
            );
        }
    }

    #[test]
    fn test_bundle_alignment_ignores_diagonal_segments() {
        let mut drawing = Drawing::default();
        let trunk = drawing
            .add_link(
                Id::new("trunk"),
                true,
                vec![
                    Anchor::Position(Point::new(0.0, 0.0)),
                    Anchor::Position(Point::new(100.0, 100.0)),
                ],
            )
            .unwrap();
        let base = drawing.element(trunk).unwrap().vertices()[0];
        let ids = free_link(&mut drawing, "branch", &[(10.0, 10.0), (75.0, 20.0)]);
        drawing.attach_to_bundle(ids[0], base, 10.0).unwrap();

        assert!(!drawing.align(ids[0], AlignMode::Normal, RATIO).unwrap().moved());
    }

    #[test]
    fn test_would_align_sets() {
        let mut drawing = Drawing::default();
        let host = oriented_host(&mut drawing, "h", Point::new(0.0, 0.0), 0.0);
        let link = drawing
            .add_link(
                Id::new("l"),
                false,
                vec![at(host), Anchor::Position(Point::new(50.0, 50.0))],
            )
            .unwrap();
        let area = drawing
            .add_area(
                Id::new("zone"),
                vec![
                    Anchor::Connection(ConnectionRef::Vertex(drawing.element(link).unwrap().vertices()[1])),
                    Anchor::Position(Point::new(10.0, 0.0)),
                    Anchor::Position(Point::new(10.0, 10.0)),
                ],
            )
            .unwrap();

        assert_eq!(drawing.would_align(link).unwrap().len(), 1);
        assert_eq!(drawing.would_align(area).unwrap().len(), 3);
    }
}
