//! Undo/redo history of editor operations.
//!
//! # Overview
//!
//! Every edit is an [`EditorOperation`]. The [`UndoStack`] holds a linear
//! history and at most one *open* operation:
//!
//! ```text
//!   Idle ──start_operation──► Open ──commit_operation──► Idle (pushed)
//!                              │
//!                              └────cancel_operation───► Idle (discarded)
//! ```
//!
//! Committing runs [`EditorOperation::on_commit`] so the operation can take
//! its "after" snapshot, pushes it and drops the redo tail. Operations that
//! turn out to change nothing are not pushed.

mod operation;

pub use operation::{
    AnchorOperation, ElementOperation, RenameOperation, VertexOperation, ZOrderOperation,
};

use std::fmt;

use log::{debug, info};

use crate::{
    drawing::Drawing,
    error::{Result, TopolinkError},
};

/// A reversible unit of editing.
pub trait EditorOperation: fmt::Debug {
    /// Short human-readable name, e.g. for an "Undo move" menu entry.
    fn label(&self) -> &'static str;

    /// Called when the operation is opened, before any mutation.
    fn on_start(&mut self, _drawing: &mut Drawing) {}

    /// Called when the operation is committed; captures the "after" state.
    fn on_commit(&mut self, _drawing: &mut Drawing) {}

    /// Called when the operation is discarded while open.
    fn on_cancel(&mut self, _drawing: &mut Drawing) -> Result<()> {
        Ok(())
    }

    /// Returns `true` if committing would record nothing.
    fn is_noop(&self) -> bool {
        false
    }

    /// Re-applies the "after" state.
    fn exec(&self, drawing: &mut Drawing) -> Result<()>;

    /// Restores the "before" state.
    fn undo(&self, drawing: &mut Drawing) -> Result<()>;
}

/// Linear history of committed operations plus the currently open one.
pub struct UndoStack {
    history: Vec<Box<dyn EditorOperation>>,
    cursor: usize,
    open: Option<Box<dyn EditorOperation>>,
    max_depth: usize,
}

impl fmt::Debug for UndoStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoStack")
            .field("len", &self.history.len())
            .field("cursor", &self.cursor)
            .field("open", &self.open.as_ref().map(|op| op.label()))
            .finish()
    }
}

impl UndoStack {
    /// Creates a stack that keeps at most `max_depth` committed operations.
    pub fn new(max_depth: usize) -> Self {
        Self {
            history: Vec::new(),
            cursor: 0,
            open: None,
            max_depth,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Number of committed operations, including undone ones.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.history.len()
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.cursor
            .checked_sub(1)
            .map(|index| self.history[index].label())
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.history.get(self.cursor).map(|op| op.label())
    }

    /// Opens an operation.
    ///
    /// # Errors
    ///
    /// Returns [`TopolinkError::OperationInProgress`] if one is already open.
    pub fn start_operation(
        &mut self,
        mut operation: Box<dyn EditorOperation>,
        drawing: &mut Drawing,
    ) -> Result<()> {
        if self.open.is_some() {
            return Err(TopolinkError::OperationInProgress);
        }
        debug!(operation = operation.label(); "Operation started");
        operation.on_start(drawing);
        self.open = Some(operation);
        Ok(())
    }

    /// Commits the open operation and drops the redo tail.
    ///
    /// Returns `false` if the operation changed nothing and was not recorded.
    pub fn commit_operation(&mut self, drawing: &mut Drawing) -> Result<bool> {
        let mut operation = self.open.take().ok_or(TopolinkError::NoOpenOperation)?;
        operation.on_commit(drawing);
        if operation.is_noop() {
            debug!(operation = operation.label(); "Operation changed nothing");
            return Ok(false);
        }

        info!(operation = operation.label(); "Operation committed");
        self.history.truncate(self.cursor);
        self.history.push(operation);
        if self.history.len() > self.max_depth {
            let excess = self.history.len() - self.max_depth;
            self.history.drain(..excess);
        }
        self.cursor = self.history.len();
        Ok(true)
    }

    /// Discards the open operation.
    pub fn cancel_operation(&mut self, drawing: &mut Drawing) -> Result<()> {
        let mut operation = self.open.take().ok_or(TopolinkError::NoOpenOperation)?;
        debug!(operation = operation.label(); "Operation cancelled");
        operation.on_cancel(drawing)
    }

    /// Opens, executes and commits an operation.
    pub fn exec_and_commit(
        &mut self,
        operation: Box<dyn EditorOperation>,
        drawing: &mut Drawing,
    ) -> Result<bool> {
        self.start_operation(operation, drawing)?;
        let executed = match &self.open {
            Some(operation) => operation.exec(drawing),
            None => Err(TopolinkError::NoOpenOperation),
        };
        if let Err(err) = executed {
            self.cancel_operation(drawing)?;
            return Err(err);
        }
        self.commit_operation(drawing)
    }

    /// Records an operation whose effect has already been applied.
    pub fn record(
        &mut self,
        operation: Box<dyn EditorOperation>,
        drawing: &mut Drawing,
    ) -> Result<bool> {
        self.start_operation(operation, drawing)?;
        self.commit_operation(drawing)
    }

    /// Undoes the last committed operation. Returns `false` at the start of
    /// history.
    pub fn undo(&mut self, drawing: &mut Drawing) -> Result<bool> {
        if self.open.is_some() {
            return Err(TopolinkError::OperationInProgress);
        }
        let Some(index) = self.cursor.checked_sub(1) else {
            return Ok(false);
        };
        let operation = &self.history[index];
        info!(operation = operation.label(); "Undo");
        operation.undo(drawing)?;
        self.cursor = index;
        Ok(true)
    }

    /// Re-applies the next undone operation. Returns `false` at the end of
    /// history.
    pub fn redo(&mut self, drawing: &mut Drawing) -> Result<bool> {
        if self.open.is_some() {
            return Err(TopolinkError::OperationInProgress);
        }
        let Some(operation) = self.history.get(self.cursor) else {
            return Ok(false);
        };
        info!(operation = operation.label(); "Redo");
        operation.exec(drawing)?;
        self.cursor += 1;
        Ok(true)
    }
}
