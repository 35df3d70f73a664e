use std::path::{Path, PathBuf};

use crate::{
    Res,
    scopes::Scopes,
    types::{Grant, Token},
    warning,
};

/// Reads and writes the cached authorization grant.
pub struct TokenManager {
    path: PathBuf,
}

impl TokenManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenManager { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached grant, `None` when no cache file exists yet.
    ///
    /// A file that cannot be parsed is reported and treated as absent so the
    /// caller falls back to a fresh authorization.
    pub async fn load(&self) -> Res<Option<Grant>> {
        if !self.path.is_file() {
            return Ok(None);
        }

        let content = async_fs::read_to_string(&self.path).await?;
        match Grant::parse(&content) {
            Ok(grant) => Ok(Some(grant)),
            Err(e) => {
                warning!(
                    "Ignoring unreadable token cache {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    /// The cached grant if it can serve a session asking for `scopes`.
    ///
    /// Raw cached tokens carry no scope information and are reused as they
    /// are. Structured grants must cover every requested scope; a grant
    /// without a recorded scope is accepted. Expiry is not checked here.
    pub async fn load_usable(&self, scopes: &Scopes) -> Res<Option<Grant>> {
        let Some(grant) = self.load().await? else {
            return Ok(None);
        };

        match &grant {
            Grant::Raw(_) => Ok(Some(grant)),
            Grant::Structured(token) => {
                let scope_ok = token
                    .scope
                    .as_deref()
                    .map(|granted| scopes.covered_by(granted))
                    .unwrap_or(true);
                if !scope_ok {
                    warning!("Cached token lacks some requested scopes, authorizing again.");
                    return Ok(None);
                }
                Ok(Some(grant))
            }
        }
    }

    pub async fn persist(&self, token: &Token) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Res<()> {
        if self.path.is_file() {
            async_fs::remove_file(&self.path).await?;
        }
        Ok(())
    }
}
