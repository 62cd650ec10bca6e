//! The vertex drag gesture.
//!
//! A press captures the pointer and remembers where the gesture started.
//! Nothing changes until the pointer has travelled the configured drag
//! threshold; a release before that is a click and leaves no trace. Past the
//! threshold the gesture opens a "move vertex" operation, lifts the owning
//! element above everything else and moves the vertex with the pointer. The
//! release drops it (optionally onto a connection point), commits, and
//! queues the vertex and its neighbours for alignment.

use log::{debug, info};

use topolink_core::geometry::Point;

use super::Editor;
use crate::{
    align::AlignMode,
    drawing::{Anchor, ConnectionRef, ElementId, VertexId},
    error::{Result, TopolinkError},
    history::AnchorOperation,
    schedule::AlignTask,
};

/// How the pointer motion is applied to the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragConstraint {
    #[default]
    Free,
    Horizontal,
    Vertical,
    /// Slide a bundle-attached vertex along its segment.
    AlongBundle,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct DragState {
    vertex: VertexId,
    owner: ElementId,
    mouse: Point,
    position: Point,
    anchor: Anchor,
    constraint: DragConstraint,
    active: bool,
}

impl Editor {
    /// Starts a drag of `vertex` with the pointer at `mouse`.
    pub fn begin_drag(&mut self, vertex: VertexId, mouse: Point, constraint: DragConstraint) -> Result<()> {
        self.ensure_idle()?;
        let target = self.drawing.vertex(vertex)?;
        let anchor = *target.anchor();
        let constraint = if constraint == DragConstraint::AlongBundle && !anchor.is_bundle() {
            debug!(vertex:% = vertex; "Vertex is not on a bundle, dragging freely");
            DragConstraint::Free
        } else {
            constraint
        };

        if let Some(previous) = self.capture.capture(vertex) {
            debug!(vertex:% = vertex, previous:% = previous; "Pointer taken over");
        }
        self.drag = Some(DragState {
            vertex,
            owner: target.owner(),
            mouse,
            position: self.drawing.coords(vertex)?,
            anchor,
            constraint,
            active: false,
        });
        Ok(())
    }

    /// Follows the pointer.
    pub fn drag_to(&mut self, mouse: Point) -> Result<()> {
        let Some(mut state) = self.drag else {
            return Err(TopolinkError::NoDragInProgress);
        };
        if !state.active {
            if mouse.distance(state.mouse) < self.config.drag_threshold() {
                return Ok(());
            }
            self.history.start_operation(
                Box::new(AnchorOperation::new("move vertex")),
                &mut self.drawing,
            )?;
            self.drawing.z_order_mut().bring_to_top(state.owner);
            state.active = true;
            self.drag = Some(state);
            debug!(vertex:% = state.vertex; "Drag started");
        }

        if let Err(err) = self.apply_drag(&state, mouse) {
            self.abort_drag(&state)?;
            return Err(err);
        }
        Ok(())
    }

    /// Ends the drag at `mouse`, connecting the vertex to `drop` if given.
    ///
    /// Returns `false` for a click, which changes nothing. A drop that fails
    /// reverts the whole gesture.
    pub fn end_drag(&mut self, mouse: Point, drop: Option<ConnectionRef>) -> Result<bool> {
        let state = self.drag.take().ok_or(TopolinkError::NoDragInProgress)?;
        self.capture.release(state.vertex);
        if !state.active {
            debug!(vertex:% = state.vertex; "Click, nothing moved");
            return Ok(false);
        }

        let dropped = self.apply_drag(&state, mouse).and_then(|()| match drop {
            Some(target) => self.drawing.connect(state.vertex, target),
            None => Ok(()),
        });
        if let Err(err) = dropped {
            self.abort_drag(&state)?;
            return Err(err);
        }
        self.drawing.z_order_mut().return_from_top(state.owner);
        let committed = self.history.commit_operation(&mut self.drawing)?;
        info!(vertex:% = state.vertex, connected = drop.is_some(); "Vertex dragged");

        if committed && self.config.auto_align() {
            let (prev, next) = self.drawing.neighbors(state.vertex)?;
            for id in [Some(state.vertex), prev, next].into_iter().flatten() {
                self.queue.push(AlignTask::new(id, AlignMode::PostMove));
            }
            self.settle()?;
        }
        Ok(committed)
    }

    /// Abandons the drag and restores the vertex.
    pub fn cancel_drag(&mut self) -> Result<()> {
        let state = self.drag.take().ok_or(TopolinkError::NoDragInProgress)?;
        self.capture.release(state.vertex);
        if state.active {
            self.abort_drag(&state)?;
        }
        debug!(vertex:% = state.vertex; "Drag cancelled");
        Ok(())
    }

    /// Connection point the dragged vertex would snap onto at `mouse`.
    pub fn drop_target(&self, mouse: Point, radius: f32) -> Option<ConnectionRef> {
        let state = self.drag?;
        self.drawing.connection_point_at(mouse, radius, state.vertex)
    }

    fn apply_drag(&mut self, state: &DragState, mouse: Point) -> Result<()> {
        let delta = mouse.sub_point(state.mouse);
        if let (DragConstraint::AlongBundle, Some(attachment)) = (state.constraint, state.anchor.bundle()) {
            let slid = self.drawing.slide_along_bundle(&attachment, delta)?;
            self.drawing
                .attach_to_bundle(state.vertex, slid.base(), slid.distance())?;
            return Ok(());
        }

        let delta = match state.constraint {
            DragConstraint::Horizontal => delta.with_y(0.0),
            DragConstraint::Vertical => delta.with_x(0.0),
            DragConstraint::Free | DragConstraint::AlongBundle => delta,
        };
        let position = state
            .position
            .add_point(delta)
            .snap_to_grid(self.config.grid_step());
        self.drawing.set_position(state.vertex, position)
    }

    fn abort_drag(&mut self, state: &DragState) -> Result<()> {
        self.drag = None;
        self.capture.release(state.vertex);
        self.drawing.z_order_mut().return_from_top(state.owner);
        self.history.cancel_operation(&mut self.drawing)
    }
}
