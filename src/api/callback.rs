use axum::{Extension, extract::Query, response::Html};
use serde::Deserialize;

use crate::{types::SharedAuthState, warning};

/// Query parameters Spotify appends to the redirect URI.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(shared_state): Extension<SharedAuthState>,
) -> Html<&'static str> {
    let mut lock = shared_state.lock().await;
    let Some(auth_state) = lock.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if auth_state.outcome.is_some() {
        return Html("<h4>Authorization already handled.</h4>");
    }

    if params.state.as_deref() != Some(auth_state.state.as_str()) {
        warning!("Ignoring authorization callback with mismatching state.");
        return Html("<h4>State mismatch, request ignored.</h4>");
    }

    if let Some(error) = params.error {
        auth_state.outcome = Some(Err(format!("Spotify denied access: {error}")));
        return Html("<h4>Login failed.</h4>");
    }

    match params.code {
        Some(code) => {
            auth_state.outcome = Some(Ok(code));
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        None => {
            auth_state.outcome = Some(Err("callback carried no authorization code".into()));
            Html("<h4>Missing authorization code.</h4>")
        }
    }
}
