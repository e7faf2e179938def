use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod storage;

#[wasm_bindgen]
pub struct MindMap {
    pub(crate) inner: mindgraph::MindMap,
}

impl MindMap {
    pub fn rs_new(width: f32, height: f32) -> MindMap {
        let viewport = mindgraph::ports::Viewport { width, height };
        let inner = match storage::LocalStorageStore::open() {
            Some(store) => mindgraph::MindMap::with_store(Box::new(store), viewport),
            None => mindgraph::MindMap::with_store(
                Box::new(mindgraph::ports::MemoryStore::new()),
                viewport,
            ),
        };
        MindMap { inner }
    }

    pub fn rs_revision(&self) -> u64 {
        self.inner.revision()
    }
}
