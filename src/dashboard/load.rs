//! Fetch lifecycle shared by the data views.

use crate::api::ClientResult;

/// Where a view's fetch stands
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    /// User-facing message; the view offers a retry
    Failed(String),
}

impl<T> LoadState<T> {
    /// Resolve a finished fetch, preferring the server's message over `fallback`
    pub fn settle(result: ClientResult<T>, fallback: &str) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(e) => {
                tracing::warn!("Load failed: {}", e);
                LoadState::Failed(e.user_message(fallback))
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientError;

    #[test]
    fn test_settle() {
        let state = LoadState::settle(Ok(3), "fallback");
        assert_eq!(state.loaded(), Some(&3));

        let state: LoadState<u8> =
            LoadState::settle(Err(ClientError::Network("refused".into())), "Backend down");
        assert_eq!(state.error(), Some("Backend down"));

        let state: LoadState<u8> =
            LoadState::settle(Err(ClientError::Fetch(Some("Invalid token.".into()))), "Backend down");
        assert_eq!(state.error(), Some("Invalid token."));
        assert!(!state.is_loading());
    }
}
