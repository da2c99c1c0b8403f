//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;

use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
pub(crate) fn create_router(state: &Arc<AppState>) -> Router {
    static_files::static_router(state).layer(
        ServiceBuilder::new()
            .layer(security::content_type_options_layer())
            .layer(security::frame_options_layer()),
    )
}
