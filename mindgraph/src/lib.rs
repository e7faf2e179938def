pub mod model;
pub mod history;
pub mod ports;
pub mod algorithms {
    pub mod navigate;
    pub mod relative;
    pub mod spread;
    pub mod visibility;
}
mod json;
mod outline;

pub use json::{DocError, HISTORY_KEY, NODES_KEY};

use algorithms::navigate::navigate_impl;
use algorithms::relative::{relative_depths_impl, resolve_relative_impl};
use algorithms::spread::auto_spread_impl;
use algorithms::visibility::{depth_impl, is_visible_impl, visible_nodes_impl};
use history::{snapshots_equal, EntryKind, History, Snapshot};
use model::{
    Direction, MindMapNode, NodeId, NodeStyle, CHILD_JITTER, CHILD_OFFSET, CHILD_RADIUS,
    SIBLING_GAP, SIBLING_JITTER,
};
use ports::{KeyValueStore, MemoryStore, Viewport};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::f32::consts::PI;

/// The mind-map engine: canonical node collection, selection/focus,
/// fold and navigation-lock levels, snapshot history, and the injected
/// persistence and viewport ports.
///
/// Nodes live in a creation-ordered arena with an id -> index map;
/// sibling order everywhere (demote targets, outline export, bulk ops)
/// is arena order. All shared state is owned here: collaborators read
/// through the query methods and mutate through the operation methods,
/// each of which runs to completion and leaves the tree invariants
/// intact (exactly one root, acyclic parent links, no dangling parents).
pub struct MindMap {
    pub(crate) nodes: Vec<MindMapNode>,
    pub(crate) index: HashMap<NodeId, usize>,
    pub(crate) focused: Option<NodeId>,
    pub(crate) selected: HashSet<NodeId>,
    pub(crate) fold_level: Option<u32>,
    pub(crate) lock_level: Option<u32>,
    pub(crate) history: History,
    pub(crate) store: Box<dyn KeyValueStore>,
    pub(crate) viewport: Viewport,
    pub(crate) rng: SmallRng,
    next_seq: u64,
    revision: u64,
    loaded_from_store: bool,
}

impl MindMap {
    pub fn new() -> Self {
        MindMap::with_store(Box::new(MemoryStore::new()), Viewport::default())
    }

    /// Build an engine over a host-provided store and viewport. If the
    /// store holds a nodes entry it is loaded verbatim and history is
    /// forced empty; corrupt entries are logged and ignored.
    pub fn with_store(store: Box<dyn KeyValueStore>, viewport: Viewport) -> Self {
        let mut m = MindMap {
            nodes: Vec::new(),
            index: HashMap::new(),
            focused: None,
            selected: HashSet::new(),
            fold_level: None,
            lock_level: None,
            history: History::new(),
            store,
            viewport,
            rng: SmallRng::from_entropy(),
            next_seq: 0,
            revision: 0,
            loaded_from_store: false,
        };
        if json::load_impl(&mut m) {
            m.loaded_from_store = true;
        }
        m
    }

    /// Reseed the placement/layout RNG. Layout tests pin this.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    // ---- queries ------------------------------------------------------

    pub fn node(&self, id: &str) -> Option<&MindMapNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[MindMapNode] {
        &self.nodes
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = &MindMapNode> {
        self.nodes.iter()
    }

    pub(crate) fn node_at(&self, i: usize) -> &MindMapNode {
        &self.nodes[i]
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> Option<&MindMapNode> {
        self.nodes.iter().find(|n| n.parent_id.is_none())
    }

    /// Monotonic change counter: bumped by every observable mutation,
    /// untouched by rejected operations. Consumers poll this instead of
    /// subscribing to a signal graph.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Multi-selected ids in creation order.
    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| self.selected.contains(&n.id))
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn fold_level(&self) -> Option<u32> {
        self.fold_level
    }

    pub fn lock_level(&self) -> Option<u32> {
        self.lock_level
    }

    pub fn loaded_from_store(&self) -> bool {
        self.loaded_from_store
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn depth(&self, id: &str) -> Option<u32> {
        depth_impl(self, id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        is_visible_impl(self, id)
    }

    pub fn visible_nodes(&self) -> Vec<NodeId> {
        visible_nodes_impl(self)
    }

    /// True when the walk up from `node_id` reaches `ancestor_id`, or
    /// the two are equal.
    pub fn is_descendant(&self, node_id: &str, ancestor_id: &str) -> bool {
        if node_id == ancestor_id {
            return true;
        }
        let mut cur = match self.node(node_id) {
            Some(n) => n,
            None => return false,
        };
        while let Some(pid) = &cur.parent_id {
            if pid == ancestor_id {
                return true;
            }
            cur = match self.node(pid) {
                Some(p) => p,
                None => return false,
            };
        }
        false
    }

    /// Visible (parent, child) id pairs for connection drawing.
    pub fn connections(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes
            .iter()
            .filter_map(|n| {
                let pid = n.parent_id.as_ref()?;
                if is_visible_impl(self, &n.id) {
                    Some((pid.clone(), n.id.clone()))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Bounding box (min_x, min_y, max_x, max_y) over all nodes, using
    /// the default size wherever none is set. `None` when empty.
    pub fn bounding_box(&self) -> Option<(f32, f32, f32, f32)> {
        let mut bbox: Option<(f32, f32, f32, f32)> = None;
        for n in &self.nodes {
            let (w, h) = n.size();
            let b = (n.x, n.y, n.x + w, n.y + h);
            bbox = Some(match bbox {
                None => b,
                Some((x0, y0, x1, y1)) => (x0.min(b.0), y0.min(b.1), x1.max(b.2), y1.max(b.3)),
            });
        }
        bbox
    }

    /// Case-insensitive substring search over node text, creation order,
    /// capped at `limit` hits.
    pub fn search(&self, query: &str, limit: usize) -> Vec<NodeId> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.nodes
            .iter()
            .filter(|n| n.text.to_lowercase().contains(&needle))
            .take(limit)
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_len(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.history.redo_len()
    }

    // ---- internal plumbing --------------------------------------------

    /// Fresh session-unique id. Also called by the import codecs.
    pub fn generate_id(&mut self) -> NodeId {
        self.next_seq += 1;
        format!("node-{}-{}", self.next_seq, self.rng.gen_range(0..1000))
    }

    fn snapshot(&self) -> Snapshot {
        self.nodes.clone()
    }

    pub(crate) fn rebuild_index(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Finish a historied mutation: bump the revision, record the entry
    /// stamped with it, and write through to the store.
    fn record_and_save(&mut self, kind: EntryKind, before: Snapshot) {
        self.touch();
        let after = self.snapshot();
        self.history.record(kind, self.revision, before, after);
        json::save_impl(self);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot;
        self.rebuild_index();
        if self
            .focused
            .as_ref()
            .map_or(false, |f| !self.index.contains_key(f))
        {
            self.focused = None;
        }
        let index = &self.index;
        self.selected.retain(|id| index.contains_key(id));
    }

    /// Bulk replace used by the import codecs: swap in a pre-validated
    /// node set, focus the root, and record one history entry.
    pub(crate) fn replace_all(&mut self, nodes: Vec<MindMapNode>, kind: EntryKind) {
        log::debug!("bulk replace: {} nodes in", nodes.len());
        let before = self.snapshot();
        self.nodes = nodes;
        self.rebuild_index();
        self.selected.clear();
        self.focused = self.root().map(|r| r.id.clone());
        self.record_and_save(kind, before);
    }

    /// Bulk-operation targets: the multi-select set when non-empty
    /// (creation order), else the single given node.
    fn operation_targets(&self, fallback: &str) -> Vec<NodeId> {
        if self.selected.is_empty() {
            vec![fallback.to_string()]
        } else {
            self.selected_ids()
        }
    }

    fn subtree_ids(&self, root_id: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| self.is_descendant(&n.id, root_id))
            .map(|n| n.id.clone())
            .collect()
    }

    fn remove_nodes(&mut self, doomed: &HashSet<NodeId>) {
        self.nodes.retain(|n| !doomed.contains(&n.id));
        self.rebuild_index();
        if self.focused.as_ref().map_or(false, |f| doomed.contains(f)) {
            self.focused = None;
        }
        self.selected.retain(|id| !doomed.contains(id));
    }

    // ---- structural mutations -----------------------------------------

    /// Create the root at the viewport center. Rejected when a root
    /// already exists.
    pub fn create_root(&mut self) -> Option<NodeId> {
        if self.root().is_some() {
            return None;
        }
        let before = self.snapshot();
        let (cx, cy) = self.viewport.center();
        let id = self.generate_id();
        self.nodes.push(MindMapNode {
            id: id.clone(),
            text: String::new(),
            x: cx - 75.0,
            y: cy - 25.0,
            parent_id: None,
            width: None,
            height: None,
            style: None,
            is_collapsed: false,
        });
        self.index.insert(id.clone(), self.nodes.len() - 1);
        self.focused = Some(id.clone());
        self.selected.clear();
        self.record_and_save(EntryKind::Create, before);
        Some(id)
    }

    /// Create a child of `parent_id`, inheriting its style. With a
    /// direction hint the node lands past the parent extent on that axis
    /// with perpendicular jitter; without one it lands on a random
    /// compass point around the parent.
    pub fn create_child(&mut self, parent_id: &str, direction: Option<Direction>) -> Option<NodeId> {
        let parent = self.node(parent_id)?.clone();
        let before = self.snapshot();
        let (pw, ph) = parent.size();
        let (x, y) = match direction {
            Some(dir) => {
                let jitter = (self.rng.gen::<f32>() - 0.5) * CHILD_JITTER;
                match dir {
                    Direction::Right => (parent.x + pw + CHILD_OFFSET, parent.y + jitter),
                    Direction::Left => (parent.x - pw - CHILD_OFFSET, parent.y + jitter),
                    Direction::Bottom => (parent.x + jitter, parent.y + ph + CHILD_OFFSET),
                    Direction::Top => (parent.x + jitter, parent.y - ph - CHILD_OFFSET),
                }
            }
            None => {
                let angle = self.rng.gen_range(0..8) as f32 * (PI / 4.0);
                (
                    parent.x + angle.cos() * CHILD_RADIUS - 50.0,
                    parent.y + angle.sin() * CHILD_RADIUS - 20.0,
                )
            }
        };
        let id = self.generate_id();
        self.nodes.push(MindMapNode {
            id: id.clone(),
            text: String::new(),
            x,
            y,
            parent_id: Some(parent.id.clone()),
            width: None,
            height: None,
            style: parent.style.clone(),
            is_collapsed: false,
        });
        self.index.insert(id.clone(), self.nodes.len() - 1);
        self.focused = Some(id.clone());
        self.selected.clear();
        self.record_and_save(EntryKind::Create, before);
        Some(id)
    }

    /// Create a sibling of `sibling_id` under the same parent, stacked
    /// along the axis orthogonal to the branch direction. Rejected for
    /// the root (no parent to share).
    pub fn create_sibling(&mut self, sibling_id: &str) -> Option<NodeId> {
        let sibling = self.node(sibling_id)?.clone();
        let parent_id = sibling.parent_id.clone()?;
        let parent = self.node(&parent_id)?.clone();
        let before = self.snapshot();

        let dx = sibling.x - parent.x;
        let dy = sibling.y - parent.y;
        let (mut x, mut y) = (sibling.x, sibling.y);
        if dx.abs() > dy.abs() {
            // Horizontal branch: stack siblings vertically.
            y += SIBLING_GAP;
        } else {
            // Vertical branch: stack horizontally, wider for text width.
            x += SIBLING_GAP * 2.0;
        }
        let jitter = (self.rng.gen::<f32>() - 0.5) * SIBLING_JITTER;
        x += jitter;
        y += jitter;

        let id = self.generate_id();
        self.nodes.push(MindMapNode {
            id: id.clone(),
            text: String::new(),
            x,
            y,
            parent_id: Some(parent.id),
            width: None,
            height: None,
            style: sibling.style.clone(),
            is_collapsed: false,
        });
        self.index.insert(id.clone(), self.nodes.len() - 1);
        self.focused = Some(id.clone());
        self.selected.clear();
        self.record_and_save(EntryKind::Create, before);
        Some(id)
    }

    /// Delete `id` and every node whose parent walk reaches it. The
    /// root is never deleted.
    pub fn delete_subtree(&mut self, id: &str) -> bool {
        match self.node(id) {
            Some(n) if n.parent_id.is_some() => {}
            _ => return false,
        }
        let before = self.snapshot();
        let doomed: HashSet<NodeId> = self.subtree_ids(id).into_iter().collect();
        self.remove_nodes(&doomed);
        self.record_and_save(EntryKind::Delete, before);
        true
    }

    /// Delete the multi-selection (else the given node), subtrees
    /// included, in one history entry. Root targets are skipped; the
    /// whole call is a no-op if nothing deletable remains.
    pub fn delete_selected(&mut self, focused_id: &str) -> bool {
        let targets = self.operation_targets(focused_id);
        let mut doomed: HashSet<NodeId> = HashSet::new();
        for t in &targets {
            match self.node(t) {
                Some(n) if n.parent_id.is_some() => {
                    doomed.extend(self.subtree_ids(t));
                }
                _ => {}
            }
        }
        if doomed.is_empty() {
            return false;
        }
        let before = self.snapshot();
        self.remove_nodes(&doomed);
        self.focused = None;
        self.selected.clear();
        self.record_and_save(EntryKind::Delete, before);
        true
    }

    /// Move a node under a new parent. Rejected for the root, unknown
    /// ids, and any target inside the node's own subtree.
    pub fn reparent(&mut self, id: &str, new_parent_id: &str) -> bool {
        if id == new_parent_id || self.node(new_parent_id).is_none() {
            return false;
        }
        match self.node(id) {
            Some(n) if n.parent_id.is_some() => {}
            _ => return false,
        }
        if self.is_descendant(new_parent_id, id) {
            return false;
        }
        let before = self.snapshot();
        if let Some(i) = self.index_of(id) {
            self.nodes[i].parent_id = Some(new_parent_id.to_string());
        }
        self.record_and_save(EntryKind::Update, before);
        true
    }

    /// Make the node a sibling of its own parent. No-op when the parent
    /// is the root: the single-root invariant would break.
    pub fn promote(&mut self, id: &str) -> bool {
        let parent_id = match self.node(id).and_then(|n| n.parent_id.clone()) {
            Some(p) => p,
            None => return false,
        };
        let grandparent = match self.node(&parent_id).and_then(|n| n.parent_id.clone()) {
            Some(g) => g,
            None => return false,
        };
        self.reparent(id, &grandparent)
    }

    /// Make the node a child of its immediately preceding sibling in
    /// creation order. No-op for the root and for first siblings.
    pub fn demote(&mut self, id: &str) -> bool {
        let parent_id = match self.node(id).and_then(|n| n.parent_id.clone()) {
            Some(p) => p,
            None => return false,
        };
        let siblings: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(parent_id.as_str()))
            .map(|n| n.id.clone())
            .collect();
        let pos = match siblings.iter().position(|s| s == id) {
            Some(p) => p,
            None => return false,
        };
        if pos == 0 {
            return false;
        }
        let target = siblings[pos - 1].clone();
        self.reparent(id, &target)
    }

    /// Replace the whole map with a fresh, centered root.
    pub fn reset(&mut self) -> NodeId {
        let before = self.snapshot();
        let (cx, cy) = self.viewport.center();
        let id = self.generate_id();
        self.nodes = vec![MindMapNode {
            id: id.clone(),
            text: String::new(),
            x: cx - 75.0,
            y: cy - 25.0,
            parent_id: None,
            width: None,
            height: None,
            style: None,
            is_collapsed: false,
        }];
        self.rebuild_index();
        self.focused = Some(id.clone());
        self.selected.clear();
        self.record_and_save(EntryKind::Delete, before);
        id
    }

    // ---- in-place mutations -------------------------------------------

    pub fn update_node_text(&mut self, id: &str, text: &str) -> bool {
        let i = match self.index_of(id) {
            Some(i) => i,
            None => return false,
        };
        if self.nodes[i].text == text {
            return false;
        }
        let before = self.snapshot();
        self.nodes[i].text = text.to_string();
        self.record_and_save(EntryKind::Update, before);
        true
    }

    /// Move a node. When the node is part of a multi-selection the delta
    /// translates the whole set rigidly. Mid-drag calls persist nodes
    /// but leave history to `end_drag`; outside a drag each call records
    /// one `Move` entry.
    pub fn update_node_position(&mut self, id: &str, x: f32, y: f32) -> bool {
        let i = match self.index_of(id) {
            Some(i) => i,
            None => return false,
        };
        let (ox, oy) = (self.nodes[i].x, self.nodes[i].y);
        if ox == x && oy == y {
            return false;
        }
        let before = if self.history.drag_active() {
            None
        } else {
            Some(self.snapshot())
        };
        if self.selected.len() > 1 && self.selected.contains(id) {
            let (dx, dy) = (x - ox, y - oy);
            let selected = &self.selected;
            for n in self.nodes.iter_mut() {
                if selected.contains(&n.id) {
                    n.x += dx;
                    n.y += dy;
                }
            }
        } else {
            self.nodes[i].x = x;
            self.nodes[i].y = y;
        }
        match before {
            Some(b) => self.record_and_save(EntryKind::Move, b),
            None => {
                self.touch();
                json::save_nodes_impl(self);
            }
        }
        true
    }

    /// Merge a partial style over the multi-selection (else the given
    /// node).
    pub fn update_node_style(&mut self, id: &str, patch: &NodeStyle) -> bool {
        let targets: Vec<usize> = self
            .operation_targets(id)
            .iter()
            .filter_map(|t| self.index_of(t))
            .collect();
        if targets.is_empty() {
            return false;
        }
        let before = self.snapshot();
        for i in targets {
            self.nodes[i]
                .style
                .get_or_insert_with(NodeStyle::default)
                .merge(patch);
        }
        self.record_and_save(EntryKind::Update, before);
        true
    }

    // ---- fold & lock ---------------------------------------------------

    pub fn toggle_collapse(&mut self, id: &str) -> bool {
        let i = match self.index_of(id) {
            Some(i) => i,
            None => return false,
        };
        let before = self.snapshot();
        self.nodes[i].is_collapsed = !self.nodes[i].is_collapsed;
        self.record_and_save(EntryKind::Update, before);
        true
    }

    /// Recompute every collapse flag as `depth >= level`. An active
    /// navigation lock deeper than the new level is cleared first (its
    /// depth is about to become invisible).
    pub fn set_global_collapse_level(&mut self, level: u32) -> bool {
        if self.lock_level.map_or(false, |lock| level < lock) {
            self.lock_level = None;
        }
        let depths: Vec<Option<u32>> = self
            .nodes
            .iter()
            .map(|n| depth_impl(self, &n.id))
            .collect();
        let before = self.snapshot();
        let mut changed = false;
        for (i, d) in depths.into_iter().enumerate() {
            let collapsed = d.map_or(false, |d| d >= level);
            if self.nodes[i].is_collapsed != collapsed {
                self.nodes[i].is_collapsed = collapsed;
                changed = true;
            }
        }
        self.fold_level = Some(level);
        if changed {
            self.record_and_save(EntryKind::Update, before);
        } else {
            self.touch();
        }
        changed
    }

    /// Clear every collapse flag and the global fold level.
    pub fn expand_all(&mut self) -> bool {
        let before = self.snapshot();
        let mut changed = false;
        for n in self.nodes.iter_mut() {
            if n.is_collapsed {
                n.is_collapsed = false;
                changed = true;
            }
        }
        self.fold_level = None;
        if changed {
            self.record_and_save(EntryKind::Update, before);
        } else {
            self.touch();
        }
        changed
    }

    /// Constrain directional navigation to one depth, or clear with
    /// `None`. Rejected when the depth is already folded away.
    pub fn set_navigation_lock_level(&mut self, level: Option<u32>) -> bool {
        if let (Some(lock), Some(fold)) = (level, self.fold_level) {
            if lock > fold {
                return false;
            }
        }
        self.lock_level = level;
        self.touch();
        true
    }

    // ---- selection & focus --------------------------------------------

    /// Single select focuses `id` and collapses the multi-set to it;
    /// multi select toggles membership and focuses `id` either way.
    pub fn select_node(&mut self, id: &str, multi: bool) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if multi {
            if !self.selected.remove(id) {
                self.selected.insert(id.to_string());
            }
        } else {
            self.selected.clear();
            self.selected.insert(id.to_string());
        }
        self.focused = Some(id.to_string());
        self.touch();
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.focused = None;
        self.touch();
    }

    pub fn select_all(&mut self) {
        self.selected = self.nodes.iter().map(|n| n.id.clone()).collect();
        let focus_valid = self
            .focused
            .as_ref()
            .map_or(false, |f| self.index.contains_key(f));
        if !focus_valid {
            self.focused = self.nodes.first().map(|n| n.id.clone());
        }
        self.touch();
    }

    /// Multi-select a node and its whole subtree, focusing the node.
    pub fn select_subtree(&mut self, id: &str) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        self.selected = self.subtree_ids(id).into_iter().collect();
        self.focused = Some(id.to_string());
        self.touch();
        true
    }

    /// Move focus to the best candidate in `direction`. The multi-select
    /// set is never altered by navigation.
    pub fn navigate(&mut self, current_id: &str, direction: Direction) -> Option<NodeId> {
        let target = navigate_impl(self, current_id, direction)?;
        self.focused = Some(target.clone());
        self.touch();
        Some(target)
    }

    // ---- relative command surface -------------------------------------

    /// `n < 0`: focus the ancestor |n| steps up. `n > 0`: multi-select
    /// the node plus descendants within n levels. `n == 0`: focus `id`.
    pub fn select_relative(&mut self, id: &str, n: i32) -> bool {
        let target = match resolve_relative_impl(self, id, n) {
            Some(t) => t,
            None => return false,
        };
        if n > 0 {
            self.selected = relative_depths_impl(self, &target)
                .into_iter()
                .filter(|&(_, d)| d <= n as u32)
                .map(|(nid, _)| nid)
                .collect();
        }
        self.focused = Some(target);
        self.touch();
        true
    }

    /// The global-level rule rooted at the resolved node: each node in
    /// its subtree gets `is_collapsed = rel_depth >= max(n, 0)`.
    pub fn collapse_relative(&mut self, id: &str, n: i32) -> bool {
        let target = match resolve_relative_impl(self, id, n) {
            Some(t) => t,
            None => return false,
        };
        let level = n.max(0) as u32;
        let rel = relative_depths_impl(self, &target);
        let before = self.snapshot();
        let mut changed = false;
        for (nid, d) in rel {
            let collapsed = d >= level;
            if let Some(i) = self.index_of(&nid) {
                if self.nodes[i].is_collapsed != collapsed {
                    self.nodes[i].is_collapsed = collapsed;
                    changed = true;
                }
            }
        }
        if changed {
            self.record_and_save(EntryKind::Update, before);
        }
        changed
    }

    /// Delete every descendant of the resolved node at relative depth
    /// >= max(n, 1). The node itself (and so the root) always survives.
    pub fn prune_relative(&mut self, id: &str, n: i32) -> bool {
        let target = match resolve_relative_impl(self, id, n) {
            Some(t) => t,
            None => return false,
        };
        let level = n.max(1) as u32;
        let doomed: HashSet<NodeId> = relative_depths_impl(self, &target)
            .into_iter()
            .filter(|&(_, d)| d >= level)
            .map(|(nid, _)| nid)
            .collect();
        if doomed.is_empty() {
            return false;
        }
        let before = self.snapshot();
        self.remove_nodes(&doomed);
        self.record_and_save(EntryKind::Delete, before);
        true
    }

    // ---- history -------------------------------------------------------

    /// Open the drag window: subsequent position updates bypass history
    /// until `end_drag`.
    pub fn start_drag(&mut self) {
        let current = self.snapshot();
        self.history.begin_drag(&current);
    }

    /// Close the drag window, recording at most one `Move` entry.
    pub fn end_drag(&mut self) -> bool {
        let current = self.snapshot();
        if self.history.end_drag(&current, self.revision + 1) {
            self.revision += 1;
            json::save_impl(self);
            return true;
        }
        false
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        let snapshot = match self.history.undo(&current, self.revision + 1) {
            Some(s) => s,
            None => return false,
        };
        self.revision += 1;
        self.restore(snapshot);
        json::save_impl(self);
        true
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        let snapshot = match self.history.redo(&current, self.revision + 1) {
            Some(s) => s,
            None => return false,
        };
        self.revision += 1;
        self.restore(snapshot);
        json::save_impl(self);
        true
    }

    // ---- layout --------------------------------------------------------

    /// Recompute the whole layout radially from the root. One history
    /// entry for the entire pass; intermediate positions never hit the
    /// stacks.
    pub fn auto_spread(&mut self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        log::debug!("auto-spread over {} nodes", self.nodes.len());
        let before = self.snapshot();
        auto_spread_impl(self);
        if snapshots_equal(&before, &self.nodes) {
            return false;
        }
        self.record_and_save(EntryKind::Move, before);
        true
    }

    // ---- documents -----------------------------------------------------

    /// Versioned document export. Timestamps come from the host.
    pub fn to_document(
        &self,
        title: &str,
        created: Option<&str>,
        modified: Option<&str>,
    ) -> serde_json::Value {
        json::to_document_impl(self, title, created, modified)
    }

    /// Versioned document import: full validation, then bulk replace
    /// and root focus. Failures leave the map untouched.
    pub fn from_document(&mut self, text: &str) -> Result<(), DocError> {
        json::from_document_impl(self, text)
    }

    /// Indented-outline export (mermaid `mindmap` dialect).
    pub fn to_outline(&self) -> String {
        outline::to_outline_impl(self)
    }

    /// Indented-outline import: fresh ids, scattered positions, bulk
    /// replace and root focus.
    pub fn from_outline(&mut self, text: &str) -> Result<(), DocError> {
        outline::from_outline_impl(self, text)
    }
}

impl Default for MindMap {
    fn default() -> Self {
        MindMap::new()
    }
}
