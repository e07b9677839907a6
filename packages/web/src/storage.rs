use tracing::debug;
use ui::LanguageStore;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Persisted language in `localStorage`. Storage may be disabled (private
/// mode, blocked cookies); reads then come back empty and writes are lost.
pub struct LocalStore {
    key: String,
}

impl LocalStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }
}

impl LanguageStore for LocalStore {
    fn load(&self) -> Option<String> {
        local_storage().and_then(|s| s.get_item(&self.key).ok().flatten())
    }

    fn save(&self, code: &str) {
        match local_storage() {
            Some(s) => {
                if let Err(e) = s.set_item(&self.key, code) {
                    debug!("storage.save: set_item failed: {e:?}");
                }
            }
            None => debug!("storage.save: localStorage unavailable"),
        }
    }
}
