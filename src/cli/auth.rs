use std::path::Path;

use crate::{
    config::{self, Credentials, Endpoints},
    error,
    management::TokenManager,
    spotify, success,
    types::Grant,
    warning,
};

/// What ended up in the token cache after authorizing.
#[derive(Debug, PartialEq, Eq)]
enum CacheOutcome {
    Cached,
    SaveFailed,
    BareToken,
}

// the cache is cleared before authorizing, so a file on disk is the new grant
fn cache_outcome(grant: &Grant, cache: &Path) -> CacheOutcome {
    match grant {
        Grant::Raw(_) => CacheOutcome::BareToken,
        Grant::Structured(_) if cache.is_file() => CacheOutcome::Cached,
        Grant::Structured(_) => CacheOutcome::SaveFailed,
    }
}

pub async fn auth(credentials: &Credentials, endpoints: &Endpoints) {
    let manager = TokenManager::new(config::token_cache_path());
    if let Err(e) = manager.clear().await {
        error!("Cannot remove cached token. Err: {}", e);
    }

    let grant = match spotify::auth::authorize(credentials, endpoints, &manager).await {
        Ok(grant) => grant,
        Err(e) => error!("Authentication failed. Err: {}", e),
    };

    match cache_outcome(&grant, manager.path()) {
        CacheOutcome::Cached => success!(
            "Authentication successful! Token cached at {}",
            manager.path().display()
        ),
        CacheOutcome::SaveFailed => warning!(
            "Authentication successful, but the token could not be cached at {}",
            manager.path().display()
        ),
        CacheOutcome::BareToken => success!(
            "Authentication successful! Spotify returned a bare token, which is not cached."
        ),
    }
}
