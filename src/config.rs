//! Configuration management for queueseed.
//!
//! Credentials and endpoint overrides come from environment variables. A
//! `.env` file in the local data directory is loaded first so users never
//! have to hardcode secrets in scripts:
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (endpoints and cache path only)

use std::{
    env, fmt,
    net::{SocketAddr, ToSocketAddrs},
    path::PathBuf,
};

use reqwest::Url;

use crate::{Res, error::Error, scopes::Scopes};

/// Spotify's authorize page, overridable with `SPOTIFY_API_AUTH_URL`.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
/// Spotify's token endpoint, overridable with `SPOTIFY_API_TOKEN_URL`.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
/// Base of the Web API, overridable with `SPOTIFY_API_URL`.
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Path the local callback server reserves for its health check.
pub const HEALTH_PATH: &str = "/health";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives at:
/// - Linux: `~/.local/share/queueseed/.env`
/// - macOS: `~/Library/Application Support/queueseed/.env`
/// - Windows: `%LOCALAPPDATA%/queueseed/.env`
///
/// A missing file is fine, variables may already be exported in the shell.
/// Values already present in the environment are never overwritten.
///
/// # Returns
///
/// `Ok(())` once the file has been applied or found missing.
///
/// # Errors
///
/// Fails when the directory cannot be created or the file exists but cannot
/// be parsed.
///
/// # Example
///
/// ```
/// use queueseed::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("cannot load {}: {}", path.display(), e)))?;
    }
    Ok(())
}

fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("queueseed");
    path
}

/// Reads a mandatory environment variable.
///
/// # Arguments
///
/// * `key` - Name of the variable
///
/// # Errors
///
/// Returns [`Error::Config`] naming the variable when it is unset or not
/// valid unicode.
fn required(key: &str) -> Res<String> {
    env::var(key).map_err(|_| Error::Config(format!("{key} must be set")))
}

/// Where the cached authorization grant is stored.
///
/// `SPOTIFY_TOKEN_CACHE_PATH` wins over the default
/// `<local data dir>/queueseed/cache/token.json`. An empty value counts as
/// unset.
///
/// # Returns
///
/// The path of the cache file. The file itself may not exist yet.
///
/// # Example
///
/// ```
/// let manager = TokenManager::new(config::token_cache_path());
/// ```
pub fn token_cache_path() -> PathBuf {
    match env::var("SPOTIFY_TOKEN_CACHE_PATH") {
        Ok(p) if !p.is_empty() => PathBuf::from(p),
        _ => data_dir().join("cache").join("token.json"),
    }
}

/// A pre-issued access token from `SPOTIFY_ACCESS_TOKEN`, if any.
///
/// Such a token skips the cache and the browser flow entirely. It is used
/// as is: nothing checks its scopes or expiry.
///
/// # Returns
///
/// `None` when the variable is unset or blank.
pub fn access_token_override() -> Option<String> {
    env::var("SPOTIFY_ACCESS_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
}

/// Application credentials plus the scopes a session asks for.
///
/// Immutable once built; the secret is kept out of `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scopes: Scopes,
}

impl Credentials {
    /// Bundles application credentials with the scopes to request.
    ///
    /// # Arguments
    ///
    /// * `client_id` - Client id of the Spotify application
    /// * `client_secret` - Client secret of the Spotify application
    /// * `redirect_uri` - Redirect URI registered for the application; the
    ///   local callback server listens on its host, port and path
    /// * `scopes` - Scopes a session asks for
    ///
    /// # Example
    ///
    /// ```
    /// let creds = Credentials::new(
    ///     "client-id",
    ///     "client-secret",
    ///     "http://127.0.0.1:9090/callback",
    ///     Scopes::parse("user-read-playback-state playlist-modify-public")?,
    /// );
    /// ```
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        scopes: Scopes,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes,
        }
    }

    /// Reads `SPOTIFY_API_AUTH_CLIENT_ID`, `SPOTIFY_API_AUTH_CLIENT_SECRET`,
    /// `SPOTIFY_API_REDIRECT_URI` and `SPOTIFY_API_AUTH_SCOPE`.
    ///
    /// Call [`load_env`] first so values from the `.env` file are visible.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when one of the variables is missing
    /// - [`Error::InvalidScope`] when the scope list names an unknown scope
    pub fn from_env() -> Res<Self> {
        Ok(Self::new(
            required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            required("SPOTIFY_API_REDIRECT_URI")?,
            Scopes::parse(&required("SPOTIFY_API_AUTH_SCOPE")?)?,
        ))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Base URLs of the Spotify accounts service and Web API.
///
/// Everything that talks to Spotify takes its URLs from here, so a local
/// stand-in server can replace the real service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Spotify defaults, each overridable by `SPOTIFY_API_AUTH_URL`,
    /// `SPOTIFY_API_TOKEN_URL` and `SPOTIFY_API_URL`.
    ///
    /// A trailing slash on the API URL is dropped.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_url: env::var("SPOTIFY_API_AUTH_URL").unwrap_or(defaults.auth_url),
            token_url: env::var("SPOTIFY_API_TOKEN_URL").unwrap_or(defaults.token_url),
            api_url: env::var("SPOTIFY_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
        }
    }
}

/// The socket address the local callback server has to listen on so that
/// Spotify's redirect reaches it.
///
/// # Arguments
///
/// * `redirect_uri` - The redirect URI registered with Spotify
///
/// # Returns
///
/// The first address the URI's host resolves to, with the URI's port or the
/// scheme's default port.
///
/// # Errors
///
/// Fails with [`Error::Config`] when the redirect URI cannot be parsed, has
/// no host, or the host does not resolve.
///
/// # Example
///
/// ```
/// let addr = callback_addr("http://127.0.0.1:9090/callback")?;
/// assert_eq!(addr.port(), 9090);
/// ```
pub fn callback_addr(redirect_uri: &str) -> Res<SocketAddr> {
    let url = Url::parse(redirect_uri)
        .map_err(|e| Error::Config(format!("invalid redirect uri '{redirect_uri}': {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::Config(format!("redirect uri '{redirect_uri}' has no host")))?;
    let port = url.port_or_known_default().unwrap_or(80);
    let host = host.trim_start_matches('[').trim_end_matches(']');

    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| Error::Config(format!("cannot resolve callback host '{host}'")))
}

/// Path component Spotify redirects to, `/` when the URI has none.
///
/// # Arguments
///
/// * `redirect_uri` - The redirect URI registered with Spotify
///
/// # Errors
///
/// Fails with [`Error::Config`] when the URI cannot be parsed or its path is
/// [`HEALTH_PATH`], which the callback server already serves.
///
/// # Example
///
/// ```
/// assert_eq!(callback_path("http://127.0.0.1:9090/callback")?, "/callback");
/// ```
pub fn callback_path(redirect_uri: &str) -> Res<String> {
    let url = Url::parse(redirect_uri)
        .map_err(|e| Error::Config(format!("invalid redirect uri '{redirect_uri}': {e}")))?;
    let path = url.path().trim_end_matches('/');
    if path == HEALTH_PATH {
        return Err(Error::Config(format!(
            "redirect uri '{redirect_uri}' must not use the reserved path {HEALTH_PATH}"
        )));
    }
    Ok(url.path().to_string())
}
