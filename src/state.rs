use std::sync::Arc;

use crate::{config::Config, store::QuestionStore};
use axum::extract::FromRef;

pub type SharedStore = Arc<dyn QuestionStore>;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Config,
}

impl AppState {
    pub fn new(store: impl QuestionStore + 'static, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
