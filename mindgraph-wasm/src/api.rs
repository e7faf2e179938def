use crate::error;
use crate::MindMap;
use mindgraph::model::{Direction, NodeStyle};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse_direction(s: &str) -> Option<Direction> {
    match s {
        "top" | "up" => Some(Direction::Top),
        "bottom" | "down" => Some(Direction::Bottom),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}

fn to_js<T: serde::Serialize + ?Sized>(v: &T) -> JsValue {
    serde_wasm_bindgen::to_value(v).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
impl MindMap {
    /// Opens over browser localStorage when available, an in-memory
    /// store otherwise.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> MindMap {
        crate::MindMap::rs_new(width, height)
    }

    pub fn revision(&self) -> u64 {
        self.rs_revision()
    }
    pub fn node_count(&self) -> u32 {
        self.inner.node_count() as u32
    }
    pub fn loaded_from_store(&self) -> bool {
        self.inner.loaded_from_store()
    }
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.inner
            .set_viewport(mindgraph::ports::Viewport { width, height });
    }
    pub fn set_seed(&mut self, seed: u64) {
        self.inner.set_seed(seed);
    }

    // Reads
    pub fn get_nodes(&self) -> JsValue {
        to_js(self.inner.nodes())
    }
    pub fn get_node(&self, id: &str) -> JsValue {
        match self.inner.node(id) {
            Some(n) => to_js(n),
            None => JsValue::NULL,
        }
    }
    pub fn visible_nodes(&self) -> JsValue {
        to_js(&self.inner.visible_nodes())
    }
    pub fn connections(&self) -> JsValue {
        to_js(&self.inner.connections())
    }
    pub fn bounding_box(&self) -> JsValue {
        match self.inner.bounding_box() {
            Some((x0, y0, x1, y1)) => crate::interop::arr_f32(&[x0, y0, x1, y1]).into(),
            None => JsValue::NULL,
        }
    }
    pub fn search(&self, query: &str, limit: u32) -> JsValue {
        to_js(&self.inner.search(query, limit as usize))
    }
    pub fn is_visible(&self, id: &str) -> bool {
        self.inner.is_visible(id)
    }

    // Creation
    pub fn create_root(&mut self) -> Option<String> {
        self.inner.create_root()
    }
    pub fn create_child(&mut self, parent_id: &str, direction: Option<String>) -> Option<String> {
        let dir = match direction.as_deref() {
            Some(d) => Some(parse_direction(d)?),
            None => None,
        };
        self.inner.create_child(parent_id, dir)
    }
    pub fn create_child_res(&mut self, parent_id: &str, direction: Option<String>) -> JsValue {
        if self.inner.node(parent_id).is_none() {
            return error::unknown_node(parent_id);
        }
        let dir = match direction.as_deref() {
            Some(d) => match parse_direction(d) {
                Some(dir) => Some(dir),
                None => return error::invalid_direction(d),
            },
            None => None,
        };
        match self.inner.create_child(parent_id, dir) {
            Some(id) => error::ok(JsValue::from_str(&id)),
            None => error::unknown_node(parent_id),
        }
    }
    pub fn create_sibling(&mut self, sibling_id: &str) -> Option<String> {
        self.inner.create_sibling(sibling_id)
    }
    pub fn create_sibling_res(&mut self, sibling_id: &str) -> JsValue {
        if self.inner.node(sibling_id).is_none() {
            return error::unknown_node(sibling_id);
        }
        match self.inner.create_sibling(sibling_id) {
            Some(id) => error::ok(JsValue::from_str(&id)),
            None => error::rejected("root_sibling", "the root has no siblings"),
        }
    }

    // Structure
    pub fn delete_subtree(&mut self, id: &str) -> bool {
        self.inner.delete_subtree(id)
    }
    pub fn delete_selected(&mut self, focused_id: &str) -> bool {
        self.inner.delete_selected(focused_id)
    }
    pub fn reparent(&mut self, id: &str, new_parent_id: &str) -> bool {
        self.inner.reparent(id, new_parent_id)
    }
    pub fn reparent_res(&mut self, id: &str, new_parent_id: &str) -> JsValue {
        if self.inner.node(id).is_none() {
            return error::unknown_node(id);
        }
        if self.inner.node(new_parent_id).is_none() {
            return error::unknown_node(new_parent_id);
        }
        if self.inner.reparent(id, new_parent_id) {
            error::ok(JsValue::TRUE)
        } else {
            error::rejected("invalid_reparent", "root moves and cycles are rejected")
        }
    }
    pub fn promote(&mut self, id: &str) -> bool {
        self.inner.promote(id)
    }
    pub fn demote(&mut self, id: &str) -> bool {
        self.inner.demote(id)
    }
    pub fn reset(&mut self) -> String {
        self.inner.reset()
    }

    // Content
    pub fn update_node_text(&mut self, id: &str, text: &str) -> bool {
        self.inner.update_node_text(id, text)
    }
    pub fn update_node_position(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.inner.update_node_position(id, x, y)
    }
    pub fn update_node_position_res(&mut self, id: &str, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if self.inner.node(id).is_none() {
            return error::unknown_node(id);
        }
        error::ok(JsValue::from_bool(self.inner.update_node_position(id, x, y)))
    }
    pub fn update_node_style(&mut self, id: &str, style: JsValue) -> JsValue {
        let patch: NodeStyle = match serde_wasm_bindgen::from_value(style) {
            Ok(p) => p,
            Err(e) => return error::err("invalid_style", e.to_string(), None),
        };
        error::ok(JsValue::from_bool(self.inner.update_node_style(id, &patch)))
    }

    // Collapse and lock
    pub fn toggle_collapse(&mut self, id: &str) -> bool {
        self.inner.toggle_collapse(id)
    }
    pub fn set_global_collapse_level(&mut self, level: u32) -> bool {
        self.inner.set_global_collapse_level(level)
    }
    pub fn expand_all(&mut self) -> bool {
        self.inner.expand_all()
    }
    pub fn set_navigation_lock_level(&mut self, level: Option<u32>) -> bool {
        self.inner.set_navigation_lock_level(level)
    }
    pub fn fold_level(&self) -> Option<u32> {
        self.inner.fold_level()
    }
    pub fn lock_level(&self) -> Option<u32> {
        self.inner.lock_level()
    }

    // Selection and focus
    pub fn select_node(&mut self, id: &str, multi: bool) -> bool {
        self.inner.select_node(id, multi)
    }
    pub fn clear_selection(&mut self) {
        self.inner.clear_selection()
    }
    pub fn select_all(&mut self) {
        self.inner.select_all()
    }
    pub fn select_subtree(&mut self, id: &str) -> bool {
        self.inner.select_subtree(id)
    }
    pub fn selected_ids(&self) -> JsValue {
        to_js(&self.inner.selected_ids())
    }
    pub fn focused(&self) -> Option<String> {
        self.inner.focused().map(|s| s.to_string())
    }

    // Navigation
    pub fn navigate(&mut self, current_id: &str, direction: &str) -> Option<String> {
        let dir = parse_direction(direction)?;
        self.inner.navigate(current_id, dir)
    }
    pub fn navigate_res(&mut self, current_id: &str, direction: &str) -> JsValue {
        let dir = match parse_direction(direction) {
            Some(d) => d,
            None => return error::invalid_direction(direction),
        };
        if self.inner.node(current_id).is_none() {
            return error::unknown_node(current_id);
        }
        match self.inner.navigate(current_id, dir) {
            Some(id) => error::ok(JsValue::from_str(&id)),
            None => error::ok(JsValue::NULL),
        }
    }

    // Relative (count-prefixed) commands
    pub fn select_relative(&mut self, id: &str, n: i32) -> bool {
        self.inner.select_relative(id, n)
    }
    pub fn collapse_relative(&mut self, id: &str, n: i32) -> bool {
        self.inner.collapse_relative(id, n)
    }
    pub fn prune_relative(&mut self, id: &str, n: i32) -> bool {
        self.inner.prune_relative(id, n)
    }

    // History
    pub fn start_drag(&mut self) {
        self.inner.start_drag()
    }
    pub fn end_drag(&mut self) -> bool {
        self.inner.end_drag()
    }
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }
    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }
    pub fn undo_depth(&self) -> u32 {
        self.inner.undo_len() as u32
    }
    pub fn redo_depth(&self) -> u32 {
        self.inner.redo_len() as u32
    }

    // Layout
    pub fn auto_spread(&mut self) -> bool {
        self.inner.auto_spread()
    }

    // Documents
    pub fn to_document(
        &self,
        title: &str,
        created: Option<String>,
        modified: Option<String>,
    ) -> JsValue {
        to_js(&self
            .inner
            .to_document(title, created.as_deref(), modified.as_deref()))
    }
    pub fn from_document_res(&mut self, text: &str) -> JsValue {
        match self.inner.from_document(text) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::err("invalid_document", e.to_string(), None),
        }
    }
    pub fn to_outline(&self) -> String {
        self.inner.to_outline()
    }
    pub fn from_outline_res(&mut self, text: &str) -> JsValue {
        match self.inner.from_outline(text) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::err("invalid_outline", e.to_string(), None),
        }
    }
}
