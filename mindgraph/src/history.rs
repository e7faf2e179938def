use crate::model::MindMapNode;
use serde::{Deserialize, Serialize};

/// A full, independent copy of the node collection at one instant.
pub type Snapshot = Vec<MindMapNode>;

/// Both stacks are bounded; the oldest entry is evicted on overflow.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Create,
    Delete,
    Update,
    Move,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Engine revision at record time. Monotonic, not wall clock.
    #[serde(rename = "timestamp")]
    pub stamp: u64,
    #[serde(rename = "nodesBefore")]
    pub before: Snapshot,
    #[serde(rename = "nodesAfter")]
    pub after: Snapshot,
}

/// Linear-history undo/redo over full snapshots, with drag batching.
///
/// While a drag is open, position writes bypass `record`; the pre-drag
/// snapshot sits in the scratch slot and `end_drag` collapses the whole
/// gesture into at most one `Move` entry.
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    drag_origin: Option<Snapshot>,
}

/// Field-wise equality on the fields a drag can affect (id/x/y/text/parent).
/// Width/height and style churn from the renderer must not fabricate moves.
pub fn snapshots_equal(a: &Snapshot, b: &Snapshot) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(n1, n2)| {
        n1.id == n2.id
            && n1.x == n2.x
            && n1.y == n2.y
            && n1.text == n2.text
            && n1.parent_id == n2.parent_id
    })
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Push a new entry. Any new action invalidates the redo branch.
    pub fn record(&mut self, kind: EntryKind, stamp: u64, before: Snapshot, after: Snapshot) {
        self.undo.push(HistoryEntry {
            kind,
            stamp,
            before,
            after,
        });
        if self.undo.len() > HISTORY_LIMIT {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Pop the newest undo entry, push its complement onto redo, and
    /// return the snapshot the caller must restore.
    pub fn undo(&mut self, current: &Snapshot, stamp: u64) -> Option<Snapshot> {
        let entry = self.undo.pop()?;
        self.redo.push(HistoryEntry {
            kind: entry.kind,
            stamp,
            before: current.clone(),
            after: entry.after,
        });
        Some(entry.before)
    }

    /// Symmetric counterpart of [`History::undo`].
    pub fn redo(&mut self, current: &Snapshot, stamp: u64) -> Option<Snapshot> {
        let entry = self.redo.pop()?;
        let restore = entry.after.clone();
        self.undo.push(HistoryEntry {
            kind: entry.kind,
            stamp,
            before: current.clone(),
            after: entry.after,
        });
        Some(restore)
    }

    /// Open the drag window, capturing the pre-drag snapshot. A second
    /// call while a drag is open keeps the original origin.
    pub fn begin_drag(&mut self, current: &Snapshot) {
        if self.drag_origin.is_none() {
            self.drag_origin = Some(current.clone());
        }
    }

    pub fn drag_active(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Close the drag window. Records exactly one `Move` entry when
    /// something actually changed; a no-movement drag leaves no trace.
    /// Calling without a matching `begin_drag` is a no-op.
    pub fn end_drag(&mut self, current: &Snapshot, stamp: u64) -> bool {
        let origin = match self.drag_origin.take() {
            Some(s) => s,
            None => return false,
        };
        if snapshots_equal(&origin, current) {
            return false;
        }
        self.record(EntryKind::Move, stamp, origin, current.clone());
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn undo_entries(&self) -> &[HistoryEntry] {
        &self.undo
    }

    pub fn redo_entries(&self) -> &[HistoryEntry] {
        &self.redo
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.drag_origin = None;
    }
}
