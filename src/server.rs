use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::{Res, api, config, types::SharedAuthState};

/// Serves the authorization callback on an already bound listener.
///
/// Runs until the task is aborted by the authorization flow.
pub async fn start_api_server(
    listener: TcpListener,
    callback_path: &str,
    state: SharedAuthState,
) -> Res<()> {
    let app = router(callback_path, state);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(callback_path: &str, state: SharedAuthState) -> Router {
    Router::new()
        .route(config::HEALTH_PATH, get(api::health))
        .route(callback_path, get(api::callback).layer(Extension(state)))
}
