//! Session persistence in the browser's local storage.

use chemviz::models::Session;
use chemviz::session::{session_from_fields, SessionError, SessionStore, TOKEN_KEY, USERNAME_KEY};

/// Keeps the session under the `token` and `username` keys
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageSessionStore;

impl LocalStorageSessionStore {
    fn storage(&self) -> Result<web_sys::Storage, SessionError> {
        web_sys::window()
            .ok_or_else(|| SessionError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| SessionError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| SessionError::Unavailable("local storage disabled".to_string()))
    }
}

fn storage_error(e: wasm_bindgen::JsValue) -> SessionError {
    SessionError::Unavailable(format!("{:?}", e))
}

impl SessionStore for LocalStorageSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let storage = self.storage()?;
        let token = storage.get_item(TOKEN_KEY).map_err(storage_error)?;
        let username = storage.get_item(USERNAME_KEY).map_err(storage_error)?;
        Ok(session_from_fields(token, username))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let storage = self.storage()?;
        storage.set_item(TOKEN_KEY, &session.token).map_err(storage_error)?;
        storage.set_item(USERNAME_KEY, &session.username).map_err(storage_error)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let storage = self.storage()?;
        storage.remove_item(TOKEN_KEY).map_err(storage_error)?;
        storage.remove_item(USERNAME_KEY).map_err(storage_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_roundtrip() {
        let store = LocalStorageSessionStore;
        store.save(&Session::new("abc123", "alice")).unwrap();
        assert_eq!(store.load().unwrap(), Some(Session::new("abc123", "alice")));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[wasm_bindgen_test]
    fn test_single_field_is_no_session() {
        let store = LocalStorageSessionStore;
        store.clear().unwrap();
        store.storage().unwrap().set_item(TOKEN_KEY, "orphan").unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }
}
