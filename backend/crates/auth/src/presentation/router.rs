//! Auth Router

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Auth routes, relative to the `/api/auth` mount point
pub fn auth_router<R>(repo: Arc<R>, config: AuthConfig) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo,
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .with_state(state)
}
