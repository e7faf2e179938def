use mindgraph::ports::KeyValueStore;
use web_sys::Storage;

/// `KeyValueStore` backed by browser localStorage. Write failures
/// (quota, private mode) are reported to the console and swallowed;
/// the in-memory state stays authoritative.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// `None` outside a window context or when localStorage is blocked.
    pub fn open() -> Option<LocalStorageStore> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(LocalStorageStore { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            web_sys::console::warn_1(&format!("localStorage write failed for '{key}'").into());
        }
    }

    fn remove(&self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}
