//! Recording of anchor and component changes for undo.
//!
//! While a journal is open the drawing remembers the first prior value of
//! every vertex anchor and component position it changes. Closing the journal
//! pairs those values with the current ones into [`AnchorChanges`], which can
//! then replay the edit in either direction.

use indexmap::IndexMap;

use topolink_core::geometry::Point;

use super::{Anchor, Drawing, ElementId, VertexId};
use crate::error::Result;

#[derive(Debug, Default, Clone)]
pub(crate) struct Journal {
    anchors: IndexMap<VertexId, Anchor>,
    components: IndexMap<ElementId, Point>,
}

/// Before and after values of every anchor and component an edit touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorChanges {
    anchors: Vec<(VertexId, Anchor, Anchor)>,
    components: Vec<(ElementId, Point, Point)>,
}

impl AnchorChanges {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty() && self.components.is_empty()
    }

    /// Vertices whose anchor changed.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.anchors.iter().map(|(id, _, _)| *id)
    }

    pub(crate) fn apply_before(&self, drawing: &mut Drawing) -> Result<()> {
        for (id, before, _) in &self.components {
            drawing.set_component_position(*id, *before)?;
        }
        for (id, before, _) in &self.anchors {
            if drawing.contains_vertex(*id) {
                drawing.restore_anchor(*id, *before)?;
            }
        }
        Ok(())
    }

    pub(crate) fn apply_after(&self, drawing: &mut Drawing) -> Result<()> {
        for (id, _, after) in &self.components {
            drawing.set_component_position(*id, *after)?;
        }
        for (id, _, after) in &self.anchors {
            if drawing.contains_vertex(*id) {
                drawing.restore_anchor(*id, *after)?;
            }
        }
        Ok(())
    }
}

impl Drawing {
    /// Starts recording changes, discarding any previous journal.
    pub(crate) fn begin_journal(&mut self) {
        self.journal = Some(Journal::default());
    }

    /// Stops recording and pairs the recorded values with the current state.
    ///
    /// Entries whose value ended up unchanged are dropped.
    pub(crate) fn end_journal(&mut self) -> AnchorChanges {
        let journal = self.journal.take().unwrap_or_default();

        let anchors = journal
            .anchors
            .into_iter()
            .filter_map(|(id, before)| {
                let after = self
                    .vertices
                    .get(&id)
                    .map(|vertex| *vertex.anchor())
                    .unwrap_or_default();
                (before != after).then_some((id, before, after))
            })
            .collect();
        let components = journal
            .components
            .into_iter()
            .filter_map(|(id, before)| {
                let after = self.elements.get(&id)?.position();
                (before != after).then_some((id, before, after))
            })
            .collect();

        AnchorChanges {
            anchors,
            components,
        }
    }

    /// Drops the journal without producing changes.
    pub(crate) fn discard_journal(&mut self) {
        self.journal = None;
    }

    pub(crate) fn is_journaling(&self) -> bool {
        self.journal.is_some()
    }

    pub(super) fn record_anchor(&mut self, id: VertexId, previous: Anchor) {
        if let Some(journal) = &mut self.journal {
            journal.anchors.entry(id).or_insert(previous);
        }
    }

    pub(super) fn record_component(&mut self, id: ElementId, previous: Point) {
        if let Some(journal) = &mut self.journal {
            journal.components.entry(id).or_insert(previous);
        }
    }
}
