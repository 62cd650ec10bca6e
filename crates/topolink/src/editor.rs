//! The editing facade: a drawing, its undo history and pending alignments.
//!
//! # Overview
//!
//! [`Editor`] wraps the raw [`Drawing`] mutators in undoable operations and
//! drives alignment:
//!
//! - anchor edits (`set_position`, `connect`, `detach`, `attach_to_bundle`,
//!   `move_component`) are journaled into one [`AnchorOperation`] each;
//! - structural edits (vertices and elements) record dedicated operations;
//! - alignment goes through the [`TaskQueue`] and is settled in batches, so
//!   cascades never recurse;
//! - the drag gesture lives in [`drag`] and keeps its state between events.
//!
//! # Examples
//!
//! ```
//! # use topolink::{Editor, config::EditorConfig, drawing::{Anchor, Drawing}};
//! # use topolink_core::{geometry::Point, identifier::Id};
//! let mut editor = Editor::new(Drawing::default(), EditorConfig::default());
//! let link = editor
//!     .add_link(
//!         Id::new("l"),
//!         false,
//!         vec![
//!             Anchor::Position(Point::new(0.0, 0.0)),
//!             Anchor::Position(Point::new(100.0, 8.0)),
//!         ],
//!     )
//!     .unwrap();
//!
//! let tail = editor.drawing().element(link).unwrap().vertices()[1];
//! editor.align_vertex(tail, topolink::AlignMode::Normal).unwrap();
//! assert_eq!(editor.drawing().coords(tail).unwrap(), Point::new(100.0, 0.0));
//!
//! editor.undo().unwrap();
//! assert_eq!(editor.drawing().coords(tail).unwrap(), Point::new(100.0, 8.0));
//! ```

mod capture;
mod drag;

pub use capture::PointerCapture;
pub use drag::DragConstraint;

use log::{debug, error, info, trace, warn};

use topolink_core::{
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    align::AlignMode,
    config::EditorConfig,
    drawing::{
        Anchor, AnchorChanges, ConnectionPoint, ConnectionRef, Drawing, ElementId, VertexId,
    },
    error::{ErrorKind, Result, TopolinkError},
    history::{
        AnchorOperation, ElementOperation, RenameOperation, UndoStack, VertexOperation,
        ZOrderOperation,
    },
    schedule::{AlignTask, TaskQueue},
    zorder::ZOrderMap,
};

/// Errors routed away from the caller by [`Editor::report`].
#[derive(Debug, Default)]
pub struct ErrorSink {
    count: usize,
    last: Option<String>,
}

impl ErrorSink {
    pub fn record(&mut self, err: &TopolinkError) {
        self.count += 1;
        self.last = Some(err.to_string());
    }

    /// Number of errors recorded so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

/// A drawing being edited.
#[derive(Debug)]
pub struct Editor {
    drawing: Drawing,
    history: UndoStack,
    queue: TaskQueue,
    config: EditorConfig,
    drag: Option<drag::DragState>,
    capture: PointerCapture<VertexId>,
    errors: ErrorSink,
}

impl Editor {
    pub fn new(drawing: Drawing, config: EditorConfig) -> Self {
        Self {
            drawing,
            history: UndoStack::new(config.history_depth()),
            queue: TaskQueue::new(),
            config,
            drag: None,
            capture: PointerCapture::default(),
            errors: ErrorSink::default(),
        }
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn into_drawing(self) -> Drawing {
        self.drawing
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn errors(&self) -> &ErrorSink {
        &self.errors
    }

    /// Vertex currently holding the pointer, if any.
    pub fn pointer_holder(&self) -> Option<VertexId> {
        self.capture.holder()
    }

    /// Alignment tasks waiting for the next [`settle`](Self::settle).
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Vertices flagged by failed alignments since the last call.
    pub fn take_blinks(&mut self) -> Vec<VertexId> {
        self.drawing.take_blinks()
    }

    /// Logs and records a failed result, returning the value on success.
    ///
    /// Meant for event handlers that have no caller to hand errors to.
    pub fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                match err.kind() {
                    ErrorKind::Structural | ErrorKind::Invariant => {
                        warn!(kind:? = err.kind(); "Edit rejected: {err}");
                    }
                    _ => error!(kind:? = err.kind(); "Edit failed: {err}"),
                }
                self.errors.record(&err);
                None
            }
        }
    }

    /// Adds a component with its connection points.
    pub fn add_component(
        &mut self,
        name: Id,
        position: Point,
        size: Size,
        points: Vec<ConnectionPoint>,
    ) -> Result<ElementId> {
        self.ensure_idle()?;
        let id = self.drawing.add_component(name, position, size)?;
        for point in points {
            if let Err(err) = self.drawing.add_connection_point(id, point) {
                self.drawing.remove_element(id)?;
                return Err(err);
            }
        }
        self.record_added(id)
    }

    pub fn add_link(&mut self, name: Id, bundle: bool, anchors: Vec<Anchor>) -> Result<ElementId> {
        self.ensure_idle()?;
        let id = self.drawing.add_link(name, bundle, anchors)?;
        self.record_added(id)
    }

    pub fn add_area(&mut self, name: Id, anchors: Vec<Anchor>) -> Result<ElementId> {
        self.ensure_idle()?;
        let id = self.drawing.add_area(name, anchors)?;
        self.record_added(id)
    }

    /// Deletes an element, detaching everything anchored to it.
    pub fn delete_element(&mut self, id: ElementId) -> Result<()> {
        let (record, changes) = self.structural(|drawing| drawing.remove_element(id))?;
        self.history
            .record(Box::new(ElementOperation::Removed { record, changes }), &mut self.drawing)?;
        info!(element:% = id; "Element deleted");
        self.settle()?;
        Ok(())
    }

    pub fn rename_element(&mut self, id: ElementId, name: Id) -> Result<()> {
        self.ensure_idle()?;
        let before = self.drawing.rename_element(id, name)?;
        self.history
            .record(Box::new(RenameOperation::new(id, before, name)), &mut self.drawing)?;
        Ok(())
    }

    /// Moves a component and everything connected to it by `delta`.
    pub fn move_component(&mut self, id: ElementId, delta: Point) -> Result<()> {
        self.journaled("move component", |drawing| drawing.move_component(id, delta))
    }

    /// Inserts a vertex at `position` into segment `segment` of a link or area.
    pub fn create_vertex(&mut self, owner: ElementId, segment: usize, position: Point) -> Result<VertexId> {
        let position = position.snap_to_grid(self.config.grid_step());
        let anchor = self.drawing.position_anchor(owner, position);
        let (id, changes) =
            self.structural(|drawing| drawing.insert_vertex(owner, segment, anchor))?;
        let record = self.drawing.vertex_record(id)?;
        self.history
            .record(Box::new(VertexOperation::Inserted { record, changes }), &mut self.drawing)?;
        info!(vertex:% = id, owner:% = owner, segment; "Vertex created");
        Ok(id)
    }

    pub fn delete_vertex(&mut self, id: VertexId) -> Result<()> {
        let (record, changes) = self.structural(|drawing| drawing.remove_vertex(id))?;
        self.history
            .record(Box::new(VertexOperation::Removed { record, changes }), &mut self.drawing)?;
        info!(vertex:% = id; "Vertex deleted");
        self.settle()?;
        Ok(())
    }

    pub fn set_position(&mut self, id: VertexId, position: Point) -> Result<()> {
        let position = position.snap_to_grid(self.config.grid_step());
        self.journaled("move vertex", |drawing| drawing.set_position(id, position))
    }

    pub fn connect(&mut self, id: VertexId, target: ConnectionRef) -> Result<()> {
        self.journaled("connect", |drawing| drawing.connect(id, target))
    }

    pub fn detach(&mut self, id: VertexId) -> Result<()> {
        self.journaled("detach", |drawing| drawing.detach(id))
    }

    /// Attaches a link vertex to a bundle. Returns the stored distance.
    pub fn attach_to_bundle(&mut self, id: VertexId, base: VertexId, distance: f32) -> Result<f32> {
        self.journaled("attach to bundle", |drawing| {
            drawing.attach_to_bundle(id, base, distance)
        })
    }

    /// Aligns one vertex and whatever it cascades to.
    ///
    /// Returns `true` if anything moved.
    pub fn align_vertex(&mut self, id: VertexId, mode: AlignMode) -> Result<bool> {
        self.drawing.vertex(id)?;
        self.queue.push(AlignTask::new(id, mode));
        self.settle()
    }

    /// Aligns every vertex alignment applies to on `owner`.
    pub fn align_all_vertices(&mut self, owner: ElementId) -> Result<bool> {
        for id in self.drawing.would_align(owner)? {
            self.queue.push(AlignTask::new(id, AlignMode::PostAlign));
        }
        info!(element:% = owner, tasks = self.queue.len(); "Aligning element");
        self.settle()
    }

    /// Runs queued alignments until the queue is empty or the configured
    /// number of rounds is spent. Returns `true` if anything moved.
    ///
    /// Work runs inside the open operation if there is one, and otherwise in
    /// an "align" operation of its own that is only recorded when something
    /// moved.
    pub fn settle(&mut self) -> Result<bool> {
        self.pull_realign_requests();
        if self.queue.is_empty() {
            return Ok(false);
        }

        let owns_operation = !self.history.is_open();
        if owns_operation {
            self.history
                .start_operation(Box::new(AnchorOperation::new("align")), &mut self.drawing)?;
        }
        let outcome = self.run_batches();
        if !owns_operation {
            return outcome;
        }

        match outcome {
            Ok(true) => {
                self.history.commit_operation(&mut self.drawing)?;
                Ok(true)
            }
            Ok(false) => {
                self.history.cancel_operation(&mut self.drawing)?;
                Ok(false)
            }
            Err(err) => {
                self.history.cancel_operation(&mut self.drawing)?;
                Err(err)
            }
        }
    }

    pub fn move_up(&mut self, id: ElementId) -> Result<bool> {
        self.reorder("move up", id, |z_order, id| z_order.move_up(id))
    }

    pub fn move_down(&mut self, id: ElementId) -> Result<bool> {
        self.reorder("move down", id, |z_order, id| z_order.move_down(id))
    }

    pub fn move_to_top(&mut self, id: ElementId) -> Result<bool> {
        self.reorder("move to top", id, |z_order, id| z_order.move_to_top(id))
    }

    pub fn move_to_bottom(&mut self, id: ElementId) -> Result<bool> {
        self.reorder("move to bottom", id, |z_order, id| z_order.move_to_bottom(id))
    }

    pub fn move_to(&mut self, id: ElementId, target: i64) -> Result<bool> {
        self.reorder("move to", id, |z_order, id| z_order.move_to(id, target))
    }

    /// Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_no_drag()?;
        self.queue.clear();
        self.history.undo(&mut self.drawing)
    }

    /// Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_no_drag()?;
        self.queue.clear();
        self.history.redo(&mut self.drawing)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.history.is_open() {
            return Err(TopolinkError::OperationInProgress);
        }
        self.ensure_no_drag()
    }

    fn ensure_no_drag(&self) -> Result<()> {
        match self.drag {
            Some(_) => Err(TopolinkError::OperationInProgress),
            None => Ok(()),
        }
    }

    fn record_added(&mut self, id: ElementId) -> Result<ElementId> {
        let record = self.drawing.element_record(id)?;
        self.history
            .record(Box::new(ElementOperation::Added(record)), &mut self.drawing)?;
        Ok(id)
    }

    /// Runs an anchor edit as one undoable operation, together with the
    /// alignments it requests.
    fn journaled<T>(
        &mut self,
        label: &'static str,
        edit: impl FnOnce(&mut Drawing) -> Result<T>,
    ) -> Result<T> {
        self.ensure_idle()?;
        self.history
            .start_operation(Box::new(AnchorOperation::new(label)), &mut self.drawing)?;
        let outcome = edit(&mut self.drawing).and_then(|value| {
            self.settle()?;
            Ok(value)
        });
        match outcome {
            Ok(value) => {
                self.history.commit_operation(&mut self.drawing)?;
                Ok(value)
            }
            Err(err) => {
                self.history.cancel_operation(&mut self.drawing)?;
                Err(err)
            }
        }
    }

    /// Runs a structural edit with the journal open, returning the anchor
    /// changes it caused. A failed edit is rolled back.
    fn structural<T>(&mut self, edit: impl FnOnce(&mut Drawing) -> Result<T>) -> Result<(T, AnchorChanges)> {
        self.ensure_idle()?;
        self.drawing.begin_journal();
        match edit(&mut self.drawing) {
            Ok(value) => Ok((value, self.drawing.end_journal())),
            Err(err) => {
                let changes = self.drawing.end_journal();
                changes.apply_before(&mut self.drawing)?;
                Err(err)
            }
        }
    }

    fn reorder(
        &mut self,
        label: &'static str,
        id: ElementId,
        change: impl FnOnce(&mut ZOrderMap<ElementId>, ElementId) -> bool,
    ) -> Result<bool> {
        self.drawing.element(id)?;
        self.ensure_idle()?;
        let operation = ZOrderOperation::new(label, &self.drawing);
        self.history
            .start_operation(Box::new(operation), &mut self.drawing)?;
        if change(self.drawing.z_order_mut(), id) {
            self.history.commit_operation(&mut self.drawing)?;
            debug!(element:% = id, operation = label; "Stacking order changed");
            Ok(true)
        } else {
            self.history.cancel_operation(&mut self.drawing)?;
            Ok(false)
        }
    }

    fn pull_realign_requests(&mut self) {
        for id in self.drawing.take_realign_requests() {
            self.queue.push(AlignTask::new(id, AlignMode::PostAlign));
        }
    }

    fn run_batches(&mut self) -> Result<bool> {
        let ratio = self.config.align_ratio();
        let mut moved = false;

        for round in 0..self.config.settle_rounds() {
            self.pull_realign_requests();
            if self.queue.is_empty() {
                return Ok(moved);
            }
            let batch = self.queue.drain_batch();
            trace!(round, tasks = batch.len(); "Settling alignment batch");

            for pass in 0..2 {
                for task in &batch {
                    if !self.drawing.contains_vertex(task.vertex()) {
                        continue;
                    }
                    // Only the first pass may warn or cascade.
                    let mode = match (pass, task.mode()) {
                        (0, mode) => mode,
                        (_, AlignMode::Normal) => AlignMode::PostAlign,
                        (_, mode) => mode,
                    };
                    let alignment = self.drawing.align(task.vertex(), mode, ratio)?;
                    if !alignment.moved() {
                        continue;
                    }
                    moved = true;
                    if self.config.auto_align() {
                        for id in alignment.cascade() {
                            self.queue.push(AlignTask::new(*id, AlignMode::PostAlign));
                        }
                    }
                }
            }
        }

        self.pull_realign_requests();
        if !self.queue.is_empty() {
            warn!(pending = self.queue.len(); "Alignment did not settle, dropping remaining tasks");
            self.queue.clear();
        }
        Ok(moved)
    }
}
