use std::sync::Arc;

use trellis_store::FormStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FormStore>,
}
