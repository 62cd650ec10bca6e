//! Structural edits: inserting and removing vertices and elements.
//!
//! Removals first turn every outside reference to the removed part into a
//! plain anchor (through the regular anchor path, so an open journal records
//! it) and then unlink the part, returning a record that restores it exactly.

use log::{debug, info};

use topolink_core::geometry::Point;

use super::{Anchor, BundleAttachment, Drawing, Element, ElementId, ElementKind, Vertex, VertexId};
use crate::error::{Result, TopolinkError};

/// A removed vertex, enough to put it back in place.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexRecord {
    vertex: Vertex,
}

impl VertexRecord {
    pub fn id(&self) -> VertexId {
        self.vertex.id()
    }

    pub fn owner(&self) -> ElementId {
        self.vertex.owner()
    }
}

/// A removed element with its vertices and stacking position.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    element: Element,
    vertices: Vec<Vertex>,
    z_index: i64,
}

impl ElementRecord {
    pub fn id(&self) -> ElementId {
        self.element.id()
    }
}

impl Drawing {
    /// Inserts a vertex into segment `segment` of a link or area.
    ///
    /// Segment `i` runs from vertex `i` to vertex `i + 1`; the last segment of
    /// an area closes the polygon. The new vertex gets index `segment + 1`.
    /// On a bundle, attachments beyond the new vertex move to the new segment.
    pub fn insert_vertex(&mut self, owner: ElementId, segment: usize, anchor: Anchor) -> Result<VertexId> {
        let element = self.element(owner)?;
        let kind = element.kind();
        if !kind.owns_vertices() {
            return Err(TopolinkError::NotAVertexOwner(element.name()));
        }
        let count = element.vertices().len();
        let valid = match kind {
            ElementKind::Area => segment < count,
            _ => segment + 1 < count,
        };
        if !valid {
            return Err(TopolinkError::UnknownSegment {
                owner: element.name(),
                index: segment,
            });
        }
        let base = element.vertices()[segment];
        let carried: Vec<(VertexId, f32)> = if element.is_bundle() {
            self.attached_at(owner, base)
                .into_iter()
                .filter_map(|id| {
                    let attachment = self.vertices.get(&id)?.anchor().bundle()?;
                    Some((id, self.effective_distance(&attachment).ok()?))
                })
                .collect()
        } else {
            Vec::new()
        };

        let id = self.allocate_vertex_id();
        self.vertices.insert(id, Vertex::new(id, owner, segment + 1));
        self.element_mut(owner)?
            .vertices_mut()
            .insert(segment + 1, id);
        self.renumber(owner);

        if let Err(err) = self.set_anchor(id, anchor) {
            self.unlink_vertex(id)?;
            return Err(err);
        }

        if !carried.is_empty() {
            let split = self.coords(base)?.distance(self.coords(id)?);
            for (attached, distance) in carried {
                if distance > split {
                    self.set_anchor(
                        attached,
                        Anchor::Bundle(BundleAttachment::new(id, distance - split)),
                    )?;
                }
            }
        }

        let sequence = self.element(owner)?.vertices().to_vec();
        self.propagate(sequence);
        debug!(vertex:% = id, owner:% = owner, segment; "Vertex inserted");
        Ok(id)
    }

    /// Removes a vertex, detaching whatever was connected to it.
    ///
    /// Bundle attachments on the segments next to the vertex are projected
    /// onto the segment that replaces them.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<VertexRecord> {
        let vertex = self.vertex(id)?;
        let owner = vertex.owner();
        let index = vertex.index();
        let element = self.element(owner)?;
        let kind = element.kind();
        if element.vertices().len() <= kind.min_vertices() {
            return Err(TopolinkError::TooFewVertices {
                owner: element.name(),
                minimum: kind.min_vertices(),
            });
        }
        let is_bundle = element.is_bundle();
        let prev = index.checked_sub(1).and_then(|i| self.vertex_at(owner, i));

        let connected: Vec<VertexId> = vertex.point().connected_vertices().collect();
        for dependent in connected {
            self.detach(dependent)?;
        }

        let mut carried: Vec<(VertexId, Point)> = Vec::new();
        if is_bundle {
            let mut affected = self.attached_at(owner, id);
            if let Some(prev) = prev {
                affected.extend(self.attached_at(owner, prev));
            }
            for attached in affected {
                carried.push((attached, self.coords(attached)?));
                self.detach(attached)?;
            }
        }

        let origin_before = self.loop_origin(owner);
        let record = self.unlink_vertex(id)?;
        let origin_after = self.loop_origin(owner);
        if origin_before.is_some() != origin_after.is_some() {
            self.convert_loop_positions(owner, origin_before, origin_after)?;
        }

        let new_base = prev.or_else(|| self.vertex_at(owner, 0));
        for (attached, position) in carried {
            let attachment = new_base.and_then(|base| self.project_onto_segment(base, position));
            if let Some(attachment) = attachment {
                self.set_anchor(attached, Anchor::Bundle(attachment))?;
            }
        }

        debug!(vertex:% = id, owner:% = owner; "Vertex removed");
        Ok(record)
    }

    /// Puts a removed vertex back at its index with its anchor.
    pub(crate) fn restore_vertex(&mut self, record: &VertexRecord) -> Result<()> {
        let owner = record.owner();
        let index = record.vertex.index();
        let element = self.element_mut(owner)?;
        let position = index.min(element.vertices().len());
        element.vertices_mut().insert(position, record.id());

        self.vertices.insert(record.id(), blank_copy(&record.vertex));
        self.renumber(owner);
        self.restore_anchor(record.id(), *record.vertex.anchor())?;

        let sequence = self.element(owner)?.vertices().to_vec();
        self.propagate(sequence);
        Ok(())
    }

    /// Removes an element and its vertices.
    ///
    /// Vertices of other elements anchored to this one are detached first.
    pub fn remove_element(&mut self, id: ElementId) -> Result<ElementRecord> {
        let element = self.element(id)?;
        let own: Vec<VertexId> = element.vertices().to_vec();

        let mut outside: Vec<VertexId> = element.points().connected_vertices();
        outside.extend(element.attached_vertices());
        for vertex in &own {
            outside.extend(self.vertex(*vertex)?.point().connected_vertices());
        }
        outside.retain(|vertex| !own.contains(vertex));
        outside.dedup();
        for vertex in outside {
            if self.contains_vertex(vertex) {
                self.detach(vertex)?;
            }
        }

        let mut vertices = Vec::with_capacity(own.len());
        for vertex in &own {
            let anchor = *self.vertex(*vertex)?.anchor();
            self.unregister(*vertex, &anchor);
        }
        for vertex in &own {
            if let Some(vertex) = self.vertices.shift_remove(vertex) {
                vertices.push(vertex);
            }
        }

        let element = self
            .elements
            .shift_remove(&id)
            .ok_or(TopolinkError::UnknownElement(id))?;
        self.names.remove(&element.name());
        if let Some(db_id) = element.db_id() {
            self.db_ids.remove(&db_id);
        }
        let z_index = self.z_order.remove(id).unwrap_or_default();

        info!(element:% = id, name:% = element.name(); "Element removed");
        Ok(ElementRecord {
            element,
            vertices,
            z_index,
        })
    }

    /// Puts a removed element back with its vertices and stacking position.
    pub(crate) fn restore_element(&mut self, record: &ElementRecord) -> Result<()> {
        let mut element = record.element.clone();
        self.check_name(element.name(), None)?;
        element.clear_reverse_indexes();

        let id = element.id();
        self.names.insert(element.name(), id);
        if let Some(db_id) = element.db_id() {
            self.db_ids.insert(db_id, id);
        }
        self.elements.insert(id, element);
        self.z_order.add(id, Some(record.z_index));

        for vertex in &record.vertices {
            self.vertices.insert(vertex.id(), blank_copy(vertex));
        }
        for vertex in &record.vertices {
            self.restore_anchor(vertex.id(), *vertex.anchor())?;
        }
        self.propagate(record.vertices.iter().map(Vertex::id));
        Ok(())
    }

    /// Snapshot of a live vertex, for replaying its insertion.
    pub(crate) fn vertex_record(&self, id: VertexId) -> Result<VertexRecord> {
        Ok(VertexRecord {
            vertex: self.vertex(id)?.clone(),
        })
    }

    /// Snapshot of a live element, for replaying its creation.
    pub(crate) fn element_record(&self, id: ElementId) -> Result<ElementRecord> {
        let element = self.element(id)?.clone();
        let vertices = element
            .vertices()
            .iter()
            .map(|vertex| self.vertex(*vertex).cloned())
            .collect::<Result<Vec<_>>>()?;
        let z_index = self.z_order.persistent_index(id).unwrap_or_default();
        Ok(ElementRecord {
            element,
            vertices,
            z_index,
        })
    }

    /// Removes a vertex from the arena and its owner without touching
    /// anything that refers to it.
    pub(crate) fn unlink_vertex(&mut self, id: VertexId) -> Result<VertexRecord> {
        let vertex = self
            .vertices
            .shift_remove(&id)
            .ok_or(TopolinkError::UnknownVertex(id))?;
        self.unregister(id, vertex.anchor());
        let owner = vertex.owner();
        self.element_mut(owner)?
            .vertices_mut()
            .retain(|other| *other != id);
        self.renumber(owner);

        let sequence = self.element(owner)?.vertices().to_vec();
        self.propagate(sequence);
        Ok(VertexRecord { vertex })
    }
}

/// Copy of a vertex without anchor, connections or caches, ready to have its
/// anchor replayed.
fn blank_copy(vertex: &Vertex) -> Vertex {
    let mut copy = Vertex::new(vertex.id(), vertex.owner(), vertex.index());
    copy.point_mut().set_position(vertex.point().position());
    copy
}

#[cfg(test)]
mod tests {
    use topolink_core::{geometry::Size, identifier::Id};

    use super::*;
    use crate::drawing::{ConnectionPoint, ConnectionRef};

    fn polyline(drawing: &mut Drawing, name: &str, bundle: bool, points: &[(f32, f32)]) -> ElementId {
        drawing
            .add_link(
                Id::new(name),
                bundle,
                points
                    .iter()
                    .map(|(x, y)| Anchor::Position(Point::new(*x, *y)))
                    .collect(),
            )
            .unwrap()
    }

    #[test]
    fn test_insert_renumbers() {
        let mut drawing = Drawing::default();
        let link = polyline(&mut drawing, "l", false, &[(0.0, 0.0), (100.0, 0.0)]);
        let id = drawing
            .insert_vertex(link, 0, Anchor::Position(Point::new(50.0, 0.0)))
            .unwrap();

        let sequence = drawing.element(link).unwrap().vertices().to_vec();
        assert_eq!(sequence[1], id);
        assert_eq!(drawing.vertex(sequence[2]).unwrap().index(), 2);
    }

    #[test]
    fn test_insert_rejects_missing_segment() {
        let mut drawing = Drawing::default();
        let link = polyline(&mut drawing, "l", false, &[(0.0, 0.0), (100.0, 0.0)]);
        assert!(matches!(
            drawing.insert_vertex(link, 1, Anchor::Position(Point::default())),
            Err(TopolinkError::UnknownSegment { index: 1, .. })
        ));
    }

    #[test]
    fn test_insert_closes_area() {
        let mut drawing = Drawing::default();
        let area = drawing
            .add_area(
                Id::new("a"),
                vec![
                    Anchor::Position(Point::new(0.0, 0.0)),
                    Anchor::Position(Point::new(10.0, 0.0)),
                    Anchor::Position(Point::new(10.0, 10.0)),
                ],
            )
            .unwrap();
        let id = drawing
            .insert_vertex(area, 2, Anchor::Position(Point::new(0.0, 10.0)))
            .unwrap();
        assert_eq!(drawing.vertex(id).unwrap().index(), 3);
    }

    #[test]
    fn test_insert_moves_far_attachments_to_new_segment() {
        let mut drawing = Drawing::default();
        let bundle = polyline(&mut drawing, "trunk", true, &[(0.0, 0.0), (100.0, 0.0)]);
        let base = drawing.element(bundle).unwrap().vertices()[0];
        let branch = polyline(&mut drawing, "b", false, &[(80.0, 50.0), (80.0, 100.0)]);
        let attached = drawing.element(branch).unwrap().vertices()[0];
        drawing.attach_to_bundle(attached, base, 80.0).unwrap();

        let middle = drawing
            .insert_vertex(bundle, 0, Anchor::Position(Point::new(50.0, 0.0)))
            .unwrap();

        assert_eq!(
            drawing.vertex(attached).unwrap().anchor(),
            &Anchor::Bundle(BundleAttachment::new(middle, 30.0))
        );
        assert_eq!(drawing.coords(attached).unwrap(), Point::new(80.0, 0.0));
    }

    #[test]
    fn test_remove_detaches_connected_vertices() {
        let mut drawing = Drawing::default();
        let first = polyline(&mut drawing, "first", false, &[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]);
        let middle = drawing.element(first).unwrap().vertices()[1];
        let second = polyline(&mut drawing, "second", false, &[(0.0, 100.0), (100.0, 100.0)]);
        let head = drawing.element(second).unwrap().vertices()[0];
        drawing.connect(head, ConnectionRef::Vertex(middle)).unwrap();

        drawing.remove_vertex(middle).unwrap();

        assert_eq!(
            drawing.vertex(head).unwrap().anchor(),
            &Anchor::Position(Point::new(50.0, 0.0))
        );
        assert!(!drawing.contains_vertex(middle));
    }

    #[test]
    fn test_remove_respects_minimum() {
        let mut drawing = Drawing::default();
        let link = polyline(&mut drawing, "l", false, &[(0.0, 0.0), (100.0, 0.0)]);
        let head = drawing.element(link).unwrap().vertices()[0];
        assert!(matches!(
            drawing.remove_vertex(head),
            Err(TopolinkError::TooFewVertices { minimum: 2, .. })
        ));
    }

    #[test]
    fn test_remove_and_restore_vertex() {
        let mut drawing = Drawing::default();
        let link = polyline(&mut drawing, "l", false, &[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);
        let before = drawing.clone();
        let middle = drawing.element(link).unwrap().vertices()[1];

        let record = drawing.remove_vertex(middle).unwrap();
        assert_eq!(drawing.element(link).unwrap().vertices().len(), 2);

        drawing.restore_vertex(&record).unwrap();
        assert_eq!(drawing, before);
    }

    #[test]
    fn test_remove_bundle_vertex_reprojects_attachments() {
        let mut drawing = Drawing::default();
        let bundle = polyline(&mut drawing, "trunk", true, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        let corner = drawing.element(bundle).unwrap().vertices()[1];
        let branch = polyline(&mut drawing, "b", false, &[(150.0, 50.0), (200.0, 50.0)]);
        let attached = drawing.element(branch).unwrap().vertices()[0];
        drawing.attach_to_bundle(attached, corner, 50.0).unwrap();

        drawing.remove_vertex(corner).unwrap();

        let attachment = drawing.vertex(attached).unwrap().anchor().bundle().unwrap();
        assert_eq!(attachment.base(), drawing.element(bundle).unwrap().vertices()[0]);
        assert!(drawing.element(bundle).unwrap().attached_vertices().any(|v| v == attached));
    }

    #[test]
    fn test_remove_and_restore_component() {
        let mut drawing = Drawing::default();
        let host = drawing
            .add_component(Id::new("host"), Point::new(100.0, 100.0), Size::new(40.0, 40.0))
            .unwrap();
        drawing
            .add_connection_point(host, ConnectionPoint::new(Id::new("p"), Point::new(20.0, 0.0)))
            .unwrap();
        drawing.set_db_id(host, Some(9)).unwrap();
        let link = polyline(&mut drawing, "l", false, &[(0.0, 0.0), (50.0, 50.0)]);
        let head = drawing.element(link).unwrap().vertices()[0];
        drawing
            .connect(head, ConnectionRef::Element { element: host, point: Id::new("p") })
            .unwrap();

        drawing.begin_journal();
        let record = drawing.remove_element(host).unwrap();
        let changes = drawing.end_journal();

        assert_eq!(
            drawing.vertex(head).unwrap().anchor(),
            &Anchor::Position(Point::new(120.0, 100.0))
        );
        assert!(drawing.element_by_db_id(9).is_none());

        drawing.restore_element(&record).unwrap();
        changes.apply_before(&mut drawing).unwrap();

        let point = drawing.element(host).unwrap().points().get(Id::new("p")).unwrap();
        assert!(point.is_connected(head));
        assert_eq!(drawing.element_by_db_id(9).unwrap().id(), host);
        assert_eq!(drawing.z_order().persistent_index(host), Some(0));
    }
}
