//! Concrete editor operations.

use topolink_core::identifier::Id;

use super::EditorOperation;
use crate::{
    drawing::{AnchorChanges, Drawing, ElementId, ElementRecord, VertexRecord},
    error::Result,
    zorder::ZOrderSnapshot,
};

/// Any sequence of anchor and component moves.
///
/// Opening the operation starts the drawing's journal; committing closes it
/// and keeps the before/after pairs.
#[derive(Debug)]
pub struct AnchorOperation {
    label: &'static str,
    changes: AnchorChanges,
}

impl AnchorOperation {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            changes: AnchorChanges::default(),
        }
    }

    /// Wraps changes that were journaled outside of the undo stack.
    pub fn from_changes(label: &'static str, changes: AnchorChanges) -> Self {
        Self { label, changes }
    }

    pub fn changes(&self) -> &AnchorChanges {
        &self.changes
    }
}

impl EditorOperation for AnchorOperation {
    fn label(&self) -> &'static str {
        self.label
    }

    fn on_start(&mut self, drawing: &mut Drawing) {
        if self.changes.is_empty() {
            drawing.begin_journal();
        }
    }

    fn on_commit(&mut self, drawing: &mut Drawing) {
        if drawing.is_journaling() {
            self.changes = drawing.end_journal();
        }
    }

    fn on_cancel(&mut self, drawing: &mut Drawing) -> Result<()> {
        if !drawing.is_journaling() {
            return Ok(());
        }
        let changes = drawing.end_journal();
        changes.apply_before(drawing)
    }

    fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    fn exec(&self, drawing: &mut Drawing) -> Result<()> {
        self.changes.apply_after(drawing)
    }

    fn undo(&self, drawing: &mut Drawing) -> Result<()> {
        self.changes.apply_before(drawing)
    }
}

/// Insertion or removal of a single vertex, with the anchor changes the
/// edit caused on other vertices.
#[derive(Debug)]
pub enum VertexOperation {
    Inserted {
        record: VertexRecord,
        changes: AnchorChanges,
    },
    Removed {
        record: VertexRecord,
        changes: AnchorChanges,
    },
}

impl EditorOperation for VertexOperation {
    fn label(&self) -> &'static str {
        match self {
            Self::Inserted { .. } => "insert vertex",
            Self::Removed { .. } => "delete vertex",
        }
    }

    fn exec(&self, drawing: &mut Drawing) -> Result<()> {
        match self {
            Self::Inserted { record, changes } => {
                drawing.restore_vertex(record)?;
                changes.apply_after(drawing)
            }
            Self::Removed { record, changes } => {
                changes.apply_after(drawing)?;
                drawing.unlink_vertex(record.id())?;
                Ok(())
            }
        }
    }

    fn undo(&self, drawing: &mut Drawing) -> Result<()> {
        match self {
            Self::Inserted { record, changes } => {
                changes.apply_before(drawing)?;
                drawing.unlink_vertex(record.id())?;
                Ok(())
            }
            Self::Removed { record, changes } => {
                drawing.restore_vertex(record)?;
                changes.apply_before(drawing)
            }
        }
    }
}

/// Creation or deletion of a whole element.
#[derive(Debug)]
pub enum ElementOperation {
    Added(ElementRecord),
    Removed {
        record: ElementRecord,
        changes: AnchorChanges,
    },
}

impl EditorOperation for ElementOperation {
    fn label(&self) -> &'static str {
        match self {
            Self::Added(_) => "add element",
            Self::Removed { .. } => "delete element",
        }
    }

    fn exec(&self, drawing: &mut Drawing) -> Result<()> {
        match self {
            Self::Added(record) => drawing.restore_element(record),
            Self::Removed { record, changes } => {
                changes.apply_after(drawing)?;
                drawing.remove_element(record.id())?;
                Ok(())
            }
        }
    }

    fn undo(&self, drawing: &mut Drawing) -> Result<()> {
        match self {
            Self::Added(record) => {
                drawing.remove_element(record.id())?;
                Ok(())
            }
            Self::Removed { record, changes } => {
                drawing.restore_element(record)?;
                changes.apply_before(drawing)
            }
        }
    }
}

#[derive(Debug)]
pub struct RenameOperation {
    element: ElementId,
    before: Id,
    after: Id,
}

impl RenameOperation {
    pub fn new(element: ElementId, before: Id, after: Id) -> Self {
        Self {
            element,
            before,
            after,
        }
    }
}

impl EditorOperation for RenameOperation {
    fn label(&self) -> &'static str {
        "rename"
    }

    fn is_noop(&self) -> bool {
        self.before == self.after
    }

    fn exec(&self, drawing: &mut Drawing) -> Result<()> {
        drawing.rename_element(self.element, self.after)?;
        Ok(())
    }

    fn undo(&self, drawing: &mut Drawing) -> Result<()> {
        drawing.rename_element(self.element, self.before)?;
        Ok(())
    }
}

/// A change of stacking order, stored as whole snapshots.
#[derive(Debug)]
pub struct ZOrderOperation {
    label: &'static str,
    before: ZOrderSnapshot<ElementId>,
    after: ZOrderSnapshot<ElementId>,
}

impl ZOrderOperation {
    /// Captures the current order as the "before" state.
    pub fn new(label: &'static str, drawing: &Drawing) -> Self {
        let before = drawing.z_order().snapshot();
        Self {
            label,
            after: before.clone(),
            before,
        }
    }
}

impl EditorOperation for ZOrderOperation {
    fn label(&self) -> &'static str {
        self.label
    }

    fn on_commit(&mut self, drawing: &mut Drawing) {
        self.after = drawing.z_order().snapshot();
    }

    fn on_cancel(&mut self, drawing: &mut Drawing) -> Result<()> {
        drawing.z_order_mut().restore(&self.before);
        Ok(())
    }

    fn is_noop(&self) -> bool {
        self.before == self.after
    }

    fn exec(&self, drawing: &mut Drawing) -> Result<()> {
        drawing.z_order_mut().restore(&self.after);
        Ok(())
    }

    fn undo(&self, drawing: &mut Drawing) -> Result<()> {
        drawing.z_order_mut().restore(&self.before);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use topolink_core::geometry::{Point, Size};

    use super::*;
    use crate::{
        drawing::{Anchor, ConnectionPoint, ConnectionRef},
        history::UndoStack,
    };

    fn two_links() -> (Drawing, ElementId, ElementId) {
        let mut drawing = Drawing::default();
        let a = drawing
            .add_link(
                Id::new("a"),
                false,
                vec![
                    Anchor::Position(Point::new(0.0, 0.0)),
                    Anchor::Position(Point::new(100.0, 0.0)),
                ],
            )
            .unwrap();
        let b = drawing
            .add_link(
                Id::new("b"),
                false,
                vec![
                    Anchor::Position(Point::new(0.0, 50.0)),
                    Anchor::Position(Point::new(100.0, 50.0)),
                ],
            )
            .unwrap();
        (drawing, a, b)
    }

    #[test]
    fn test_anchor_operation_undo_redo() {
        let (mut drawing, a, b) = two_links();
        let head = drawing.element(b).unwrap().vertices()[0];
        let tail = drawing.element(a).unwrap().vertices()[1];
        let before = drawing.clone();
        let mut stack = UndoStack::new(10);

        stack
            .start_operation(Box::new(AnchorOperation::new("connect")), &mut drawing)
            .unwrap();
        drawing.connect(head, ConnectionRef::Vertex(tail)).unwrap();
        assert!(stack.commit_operation(&mut drawing).unwrap());
        let after = drawing.clone();

        stack.undo(&mut drawing).unwrap();
        assert_eq!(drawing, before);
        assert!(!drawing.vertex(tail).unwrap().point().is_connected(head));

        stack.redo(&mut drawing).unwrap();
        assert_eq!(drawing, after);
        assert!(drawing.vertex(tail).unwrap().point().is_connected(head));
    }

    #[test]
    fn test_anchor_operation_cancel_reverts() {
        let (mut drawing, a, _) = two_links();
        let head = drawing.element(a).unwrap().vertices()[0];
        let before = drawing.clone();
        let mut stack = UndoStack::new(10);

        stack
            .start_operation(Box::new(AnchorOperation::new("move")), &mut drawing)
            .unwrap();
        drawing.set_position(head, Point::new(40.0, 40.0)).unwrap();
        stack.cancel_operation(&mut drawing).unwrap();

        assert_eq!(drawing, before);
        assert!(!drawing.is_journaling());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_unchanged_anchor_operation_is_dropped() {
        let (mut drawing, _, _) = two_links();
        let mut stack = UndoStack::new(10);
        stack
            .start_operation(Box::new(AnchorOperation::new("noop")), &mut drawing)
            .unwrap();
        assert!(!stack.commit_operation(&mut drawing).unwrap());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_vertex_insertion_undo_redo() {
        let (mut drawing, a, _) = two_links();
        let before = drawing.clone();

        drawing.begin_journal();
        let id = drawing
            .insert_vertex(a, 0, Anchor::Position(Point::new(50.0, 20.0)))
            .unwrap();
        let changes = drawing.end_journal();
        let record = drawing.vertex_record(id).unwrap();
        let after = drawing.clone();
        let operation = VertexOperation::Inserted { record, changes };

        operation.undo(&mut drawing).unwrap();
        assert_eq!(drawing, before);
        operation.exec(&mut drawing).unwrap();
        assert_eq!(drawing, after);
    }

    #[test]
    fn test_element_removal_undo_redo() {
        let mut drawing = Drawing::default();
        let host = drawing
            .add_component(Id::new("host"), Point::new(200.0, 200.0), Size::new(20.0, 20.0))
            .unwrap();
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
        drawing
            .add_connection_point(host, ConnectionPoint::new(Id::new("p"), Point::new(10.0, 0.0)))
            .unwrap();
        let head = drawing.element(link).unwrap().vertices()[0];
        drawing
            .connect(head, ConnectionRef::Element { element: host, point: Id::new("p") })
            .unwrap();
        let before = drawing.clone();

        drawing.begin_journal();
        let record = drawing.remove_element(host).unwrap();
        let changes = drawing.end_journal();
        let after = drawing.clone();
        let operation = ElementOperation::Removed { record, changes };

        operation.undo(&mut drawing).unwrap();
        assert_eq!(drawing, before);
        operation.exec(&mut drawing).unwrap();
        assert_eq!(drawing, after);
    }

    #[test]
    fn test_rename_operation() {
        let (mut drawing, a, _) = two_links();
        let before = drawing.rename_element(a, Id::new("uplink")).unwrap();
        let operation = RenameOperation::new(a, before, Id::new("uplink"));

        operation.undo(&mut drawing).unwrap();
        assert_eq!(drawing.element(a).unwrap().name(), "a");
        operation.exec(&mut drawing).unwrap();
        assert_eq!(drawing.element_id(Id::new("uplink")).unwrap(), a);
    }

    #[test]
    fn test_z_order_operation() {
        let (mut drawing, a, b) = two_links();
        let mut stack = UndoStack::new(10);

        stack
            .start_operation(Box::new(ZOrderOperation::new("raise", &drawing)), &mut drawing)
            .unwrap();
        drawing.z_order_mut().move_to_top(a);
        stack.commit_operation(&mut drawing).unwrap();
        assert_eq!(drawing.z_order().ordered(), vec![b, a]);

        stack.undo(&mut drawing).unwrap();
        assert_eq!(drawing.z_order().ordered(), vec![a, b]);
    }
}
