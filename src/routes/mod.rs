use std::sync::Arc;

use axum::Router;

use crate::StatusPage;

mod status;

// ---

pub fn router(page: Arc<StatusPage>) -> Router {
    // ---
    Router::new()
        .merge(status::router())
        .with_state(page)
}
