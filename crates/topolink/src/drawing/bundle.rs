//! Raw anchor mutators: positions, connections and bundle attachments.
//!
//! A link vertex attached to a bundle sits at a distance along one segment
//! of the bundle. The distance is clamped to the segment when attaching, and
//! re-clamped whenever it is resolved, so a bundle that gets shorter never
//! throws its attachments off the segment.

use log::debug;

use topolink_core::geometry::Point;

use super::{Anchor, BundleAttachment, ConnectionRef, Drawing, VertexId};
use crate::error::Result;

impl Drawing {
    /// Pins a vertex at an absolute coordinate.
    pub fn set_position(&mut self, id: VertexId, position: Point) -> Result<()> {
        let anchor = self.vertex_position_anchor(id, position)?;
        self.set_anchor(id, anchor)
    }

    /// Anchors a vertex to a connection point.
    pub fn connect(&mut self, id: VertexId, target: ConnectionRef) -> Result<()> {
        debug!(vertex:% = id, target:?; "Connecting vertex");
        self.set_anchor(id, Anchor::Connection(target))
    }

    /// Turns a connection or bundle attachment into a position at the
    /// vertex's current coordinate. Positions are left alone.
    pub fn detach(&mut self, id: VertexId) -> Result<()> {
        let vertex = self.vertex(id)?;
        if vertex.anchor().is_position() {
            return Ok(());
        }
        let position = self.resolve(vertex, 0);
        self.set_position(id, position)
    }

    /// Attaches a link vertex to the bundle segment starting at `base`.
    ///
    /// Returns the distance actually stored, clamped to the segment.
    pub fn attach_to_bundle(&mut self, id: VertexId, base: VertexId, distance: f32) -> Result<f32> {
        let distance = match self.vertex(base)?.segment() {
            Some(segment) => segment.clamp_distance(distance),
            None => distance,
        };
        self.set_anchor(id, Anchor::Bundle(BundleAttachment::new(base, distance)))?;
        Ok(distance)
    }

    /// Distance of an attachment after clamping to its segment.
    pub fn effective_distance(&self, attachment: &BundleAttachment) -> Result<f32> {
        let base = self.vertex(attachment.base())?;
        Ok(base
            .segment()
            .map_or(attachment.distance(), |segment| {
                segment.clamp_distance(attachment.distance())
            }))
    }

    /// Attachment reached by sliding `attachment` along its segment by the
    /// projection of `delta`.
    pub fn slide_along_bundle(
        &self,
        attachment: &BundleAttachment,
        delta: Point,
    ) -> Result<BundleAttachment> {
        let base = self.vertex(attachment.base())?;
        let distance = match base.segment() {
            Some(segment) => {
                segment.clamp_distance(attachment.distance() + segment.project(delta))
            }
            None => attachment.distance(),
        };
        Ok(BundleAttachment::new(attachment.base(), distance))
    }

    /// Attachment on the segment starting at `base` nearest to `point`, or
    /// `None` if `base` starts no initialized segment.
    pub(crate) fn project_onto_segment(&self, base: VertexId, point: Point) -> Option<BundleAttachment> {
        let segment = self.compute_segment(base)?;
        let distance = segment.clamp_distance(segment.project(point.sub_point(segment.start())));
        Some(BundleAttachment::new(base, distance))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use topolink_core::identifier::Id;

    use super::*;
    use crate::{drawing::ElementId, error::TopolinkError};

    fn trunk(drawing: &mut Drawing) -> ElementId {
        drawing
            .add_link(
                Id::new("trunk"),
                true,
                vec![
                    Anchor::Position(Point::new(0.0, 0.0)),
                    Anchor::Position(Point::new(100.0, 0.0)),
                ],
            )
            .unwrap()
    }

    fn branch(drawing: &mut Drawing, name: &str) -> Vec<VertexId> {
        let link = drawing
            .add_link(
                Id::new(name),
                false,
                vec![
                    Anchor::Position(Point::new(50.0, 100.0)),
                    Anchor::Position(Point::new(50.0, 200.0)),
                ],
            )
            .unwrap();
        drawing.element(link).unwrap().vertices().to_vec()
    }

    #[test]
    fn test_attach_clamps_to_segment() {
        let mut drawing = Drawing::default();
        let bundle = trunk(&mut drawing);
        let base = drawing.element(bundle).unwrap().vertices()[0];
        let branch = branch(&mut drawing, "branch");

        let distance = drawing.attach_to_bundle(branch[0], base, 150.0).unwrap();

        assert_approx_eq!(f32, distance, 100.0);
        assert_eq!(drawing.coords(branch[0]).unwrap(), Point::new(100.0, 0.0));
        assert_eq!(
            drawing.element(bundle).unwrap().attached_vertices().collect::<Vec<_>>(),
            vec![branch[0]]
        );
    }

    #[test]
    fn test_attach_to_plain_link_fails() {
        let mut drawing = Drawing::default();
        let plain = branch(&mut drawing, "plain");
        let other = branch(&mut drawing, "other");

        let err = drawing.attach_to_bundle(other[0], plain[0], 10.0).unwrap_err();
        assert!(matches!(err, TopolinkError::NotABundle(_)));
    }

    #[test]
    fn test_attachment_follows_bundle() {
        let mut drawing = Drawing::default();
        let bundle = trunk(&mut drawing);
        let ids = drawing.element(bundle).unwrap().vertices().to_vec();
        let branch = branch(&mut drawing, "branch");
        drawing.attach_to_bundle(branch[0], ids[0], 50.0).unwrap();

        drawing.set_position(ids[1], Point::new(0.0, 100.0)).unwrap();

        assert_eq!(drawing.coords(branch[0]).unwrap(), Point::new(0.0, 50.0));
    }

    #[test]
    fn test_shortened_bundle_reclamps() {
        let mut drawing = Drawing::default();
        let bundle = trunk(&mut drawing);
        let ids = drawing.element(bundle).unwrap().vertices().to_vec();
        let branch = branch(&mut drawing, "branch");
        drawing.attach_to_bundle(branch[0], ids[0], 80.0).unwrap();

        drawing.set_position(ids[1], Point::new(40.0, 0.0)).unwrap();

        assert_eq!(drawing.coords(branch[0]).unwrap(), Point::new(40.0, 0.0));
        let attachment = drawing.vertex(branch[0]).unwrap().anchor().bundle().unwrap();
        assert_approx_eq!(f32, drawing.effective_distance(&attachment).unwrap(), 40.0);
    }

    #[test]
    fn test_slide_clamps_at_start() {
        let mut drawing = Drawing::default();
        let bundle = trunk(&mut drawing);
        let base = drawing.element(bundle).unwrap().vertices()[0];

        let slid = drawing
            .slide_along_bundle(&BundleAttachment::new(base, 100.0), Point::new(-200.0, 0.0))
            .unwrap();
        assert_approx_eq!(f32, slid.distance(), 0.0);
    }

    #[test]
    fn test_detach_keeps_coordinate() {
        let mut drawing = Drawing::default();
        let bundle = trunk(&mut drawing);
        let base = drawing.element(bundle).unwrap().vertices()[0];
        let branch = branch(&mut drawing, "branch");
        drawing.attach_to_bundle(branch[0], base, 30.0).unwrap();

        drawing.detach(branch[0]).unwrap();

        assert_eq!(
            drawing.vertex(branch[0]).unwrap().anchor(),
            &Anchor::Position(Point::new(30.0, 0.0))
        );
        assert_eq!(drawing.element(bundle).unwrap().attached_vertices().count(), 0);
    }

    #[test]
    fn test_detaching_loaded_endpoint_requests_realign() {
        let mut drawing = Drawing::default();
        let host = drawing
            .add_component(Id::new("host"), Point::new(0.0, 0.0), topolink_core::geometry::Size::new(10.0, 10.0))
            .unwrap();
        drawing
            .add_connection_point(host, crate::drawing::ConnectionPoint::new(Id::new("p"), Point::default()))
            .unwrap();
        let bundle = trunk(&mut drawing);
        let ids = drawing.element(bundle).unwrap().vertices().to_vec();
        drawing
            .connect(ids[0], ConnectionRef::Element { element: host, point: Id::new("p") })
            .unwrap();
        let branch = branch(&mut drawing, "branch");
        drawing.attach_to_bundle(branch[0], ids[0], 30.0).unwrap();

        drawing.detach(ids[0]).unwrap();

        assert_eq!(drawing.take_realign_requests(), vec![ids[0]]);
    }
}
