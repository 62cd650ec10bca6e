//! Conversion between live anchors and their textual references.

use topolink_parser::{AnchorRef, PointRef, parse_anchor};

use super::{Anchor, BundleAttachment, ConnectionRef, Drawing, ElementKind, VertexId};
use crate::error::{Result, TopolinkError};

impl Drawing {
    /// Resolves a parsed reference against the elements of this drawing.
    ///
    /// `host:point` names a component point (by name or ordinal) or, for a
    /// link or area host, the point of the vertex with that ordinal.
    pub fn resolve_anchor_ref(&self, reference: &AnchorRef) -> Result<Anchor> {
        match reference {
            AnchorRef::Position(position) => Ok(Anchor::Position(*position)),
            AnchorRef::Connection { host, point } => {
                let element = self.element(self.element_id(*host)?)?;
                let unknown = || TopolinkError::UnknownConnectionPoint {
                    host: *host,
                    point: point.to_string(),
                };
                match (element.kind(), point) {
                    (ElementKind::Component, _) => {
                        let name = element.points().lookup(point).ok_or_else(unknown)?;
                        Ok(Anchor::Connection(ConnectionRef::Element {
                            element: element.id(),
                            point: name,
                        }))
                    }
                    (_, PointRef::Ordinal(index)) => {
                        let vertex = element.vertices().get(*index).ok_or_else(unknown)?;
                        Ok(Anchor::Connection(ConnectionRef::Vertex(*vertex)))
                    }
                    (_, PointRef::Name(_)) => Err(unknown()),
                }
            }
            AnchorRef::Bundle {
                bundle,
                after_vertex,
                distance,
            } => {
                let element = self.element(self.element_id(*bundle)?)?;
                if !element.is_bundle() {
                    return Err(TopolinkError::NotABundle(*bundle));
                }
                let base = element
                    .vertices()
                    .get(*after_vertex)
                    .filter(|_| after_vertex + 1 < element.vertices().len())
                    .ok_or(TopolinkError::UnknownBundleSegment {
                        bundle: *bundle,
                        index: *after_vertex,
                    })?;
                Ok(Anchor::Bundle(BundleAttachment::new(*base, *distance)))
            }
        }
    }

    /// Parses and resolves an anchor reference in one go.
    pub fn parse_anchor_ref(&self, source: &str) -> Result<Anchor> {
        let reference = parse_anchor(source)?;
        self.resolve_anchor_ref(&reference)
    }

    /// Textual reference of a vertex's anchor, `None` while unset.
    ///
    /// Positions are written as stored, so interior vertices of a self-loop
    /// come out relative to the loop's head.
    pub fn anchor_ref(&self, id: VertexId) -> Result<Option<AnchorRef>> {
        let reference = match *self.vertex(id)?.anchor() {
            Anchor::Unset => None,
            Anchor::Position(position) => Some(AnchorRef::Position(position)),
            Anchor::Connection(ConnectionRef::Element { element, point }) => {
                Some(AnchorRef::Connection {
                    host: self.element(element)?.name(),
                    point: PointRef::Name(point),
                })
            }
            Anchor::Connection(ConnectionRef::Vertex(target)) => {
                let target = self.vertex(target)?;
                Some(AnchorRef::Connection {
                    host: self.element(target.owner())?.name(),
                    point: PointRef::Ordinal(target.index()),
                })
            }
            Anchor::Bundle(attachment) => {
                let base = self.vertex(attachment.base())?;
                Some(AnchorRef::Bundle {
                    bundle: self.element(base.owner())?.name(),
                    after_vertex: base.index(),
                    distance: attachment.distance(),
                })
            }
        };
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use topolink_core::{
        geometry::{Point, Size},
        identifier::Id,
    };

    use super::*;
    use crate::drawing::ConnectionPoint;

    fn sample() -> Drawing {
        let mut drawing = Drawing::default();
        let host = drawing
            .add_component(Id::new("router1"), Point::new(100.0, 100.0), Size::new(40.0, 40.0))
            .unwrap();
        drawing
            .add_connection_point(host, ConnectionPoint::new(Id::new("eth0"), Point::new(20.0, 0.0)))
            .unwrap();
        drawing
            .add_link(
                Id::new("trunk"),
                true,
                vec![
                    Anchor::Position(Point::new(0.0, 0.0)),
                    Anchor::Position(Point::new(100.0, 0.0)),
                ],
            )
            .unwrap();
        drawing
    }

    #[test]
    fn test_component_point_by_name_and_ordinal() {
        let drawing = sample();
        let by_name = drawing.parse_anchor_ref("router1:eth0").unwrap();
        let by_ordinal = drawing.parse_anchor_ref("router1:0").unwrap();
        assert_eq!(by_name, by_ordinal);
    }

    #[test]
    fn test_vertex_point_by_ordinal() {
        let drawing = sample();
        let anchor = drawing.parse_anchor_ref("trunk:1").unwrap();
        let tail = drawing
            .element(drawing.element_id(Id::new("trunk")).unwrap())
            .unwrap()
            .vertices()[1];
        assert_eq!(anchor, Anchor::Connection(ConnectionRef::Vertex(tail)));
    }

    #[test]
    fn test_bundle_segment_must_exist() {
        let drawing = sample();
        assert!(drawing.parse_anchor_ref("@trunk:0:10").is_ok());
        assert!(matches!(
            drawing.parse_anchor_ref("@trunk:1:10"),
            Err(TopolinkError::UnknownBundleSegment { index: 1, .. })
        ));
        assert!(matches!(
            drawing.parse_anchor_ref("@router1:0:10"),
            Err(TopolinkError::NotABundle(_))
        ));
    }

    #[test]
    fn test_unknown_references() {
        let drawing = sample();
        assert!(matches!(
            drawing.parse_anchor_ref("ghost:eth0"),
            Err(TopolinkError::UnknownElementName(_))
        ));
        assert!(matches!(
            drawing.parse_anchor_ref("router1:eth9"),
            Err(TopolinkError::UnknownConnectionPoint { .. })
        ));
        assert!(matches!(
            drawing.parse_anchor_ref("trunk:uplink"),
            Err(TopolinkError::UnknownConnectionPoint { .. })
        ));
        assert!(matches!(
            drawing.parse_anchor_ref("(1, "),
            Err(TopolinkError::Parse(_))
        ));
    }

    #[test]
    fn test_anchor_ref_round_trip() {
        let mut drawing = sample();
        let link = drawing
            .add_link(
                Id::new("branch"),
                false,
                vec![
                    drawing.parse_anchor_ref("@trunk:0:25").unwrap(),
                    drawing.parse_anchor_ref("router1:eth0").unwrap(),
                ],
            )
            .unwrap();
        let ids = drawing.element(link).unwrap().vertices().to_vec();

        assert_eq!(drawing.anchor_ref(ids[0]).unwrap().unwrap().to_string(), "@trunk:0:25");
        assert_eq!(drawing.anchor_ref(ids[1]).unwrap().unwrap().to_string(), "router1:eth0");
    }

    #[test]
    fn test_numeric_point_names_round_trip() {
        let mut drawing = Drawing::default();
        let switch = drawing
            .add_component(Id::new("sw"), Point::new(0.0, 0.0), Size::new(40.0, 40.0))
            .unwrap();
        for (name, x) in [("1", -20.0), ("2", 20.0), ("010", 0.0)] {
            drawing
                .add_connection_point(switch, ConnectionPoint::new(Id::new(name), Point::new(x, 0.0)))
                .unwrap();
        }
        let link = drawing
            .add_link(
                Id::new("cable"),
                false,
                vec![
                    drawing.parse_anchor_ref("sw:1").unwrap(),
                    drawing.parse_anchor_ref("sw:2").unwrap(),
                    Anchor::Connection(ConnectionRef::Element {
                        element: switch,
                        point: Id::new("010"),
                    }),
                ],
            )
            .unwrap();

        for vertex in drawing.element(link).unwrap().vertices().to_vec() {
            let anchor = *drawing.vertex(vertex).unwrap().anchor();
            let written = drawing.anchor_ref(vertex).unwrap().unwrap().to_string();
            assert_eq!(drawing.parse_anchor_ref(&written).unwrap(), anchor, "{written}");
        }
        assert_eq!(
            drawing.parse_anchor_ref("sw:1").unwrap(),
            Anchor::Connection(ConnectionRef::Element {
                element: switch,
                point: Id::new("1"),
            })
        );
    }
}
