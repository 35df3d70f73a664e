use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Url};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    Res, config,
    config::{Credentials, Endpoints},
    error::Error,
    info,
    management::TokenManager,
    server::start_api_server,
    spotify::{ClientCredentials, SpotifyClient, client::api_error},
    types::{AccessToken, AuthorizationState, Grant, SharedAuthState, Token},
    utils, warning,
};

/// How long the interactive flow waits for the browser to come back.
pub const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds an authorized Spotify client for the given credentials.
///
/// The bearer token comes from the first source that has one:
/// 1. `SPOTIFY_ACCESS_TOKEN`, a raw pre-issued token
/// 2. the token cache, refreshed when it has expired
/// 3. the interactive authorization code flow in the browser
///
/// Whichever shape the grant has, it is normalized to a bare access token
/// before the client is built.
///
/// # Arguments
///
/// * `credentials` - Application credentials and the scopes to request
/// * `endpoints` - Accounts service and Web API base URLs
///
/// # Returns
///
/// A [`SpotifyClient`] acting for the user who granted access.
///
/// # Errors
///
/// Failures of the token exchange propagate unchanged; nothing is retried.
/// The interactive flow also fails when the callback server cannot bind,
/// the user denies access, or no callback arrives within
/// [`AUTHORIZATION_TIMEOUT`].
///
/// # Example
///
/// ```
/// let creds = Credentials::from_env()?;
/// let spotify = create_session(&creds, &Endpoints::from_env()).await?;
/// println!("Next in Queue: {}", queue::get_next_in_queue(&spotify).await);
/// ```
pub async fn create_session(credentials: &Credentials, endpoints: &Endpoints) -> Res<SpotifyClient> {
    if let Some(raw) = config::access_token_override() {
        return Ok(session_from_grant(Grant::Raw(raw), credentials, endpoints));
    }

    let manager = TokenManager::new(config::token_cache_path());
    create_session_with(credentials, endpoints, &manager).await
}

/// [`create_session`] against an explicit token cache, ignoring
/// `SPOTIFY_ACCESS_TOKEN`.
///
/// # Arguments
///
/// * `credentials` - Application credentials and the scopes to request
/// * `endpoints` - Accounts service and Web API base URLs
/// * `manager` - Token cache to read from and write fresh grants to
///
/// # Errors
///
/// Same as [`create_session`], plus I/O errors of the token cache.
pub async fn create_session_with(
    credentials: &Credentials,
    endpoints: &Endpoints,
    manager: &TokenManager,
) -> Res<SpotifyClient> {
    let grant = match cached_grant(credentials, endpoints, manager).await? {
        Some(grant) => grant,
        None => authorize(credentials, endpoints, manager).await?,
    };

    Ok(session_from_grant(grant, credentials, endpoints))
}

/// Normalizes the grant and binds the resulting token to a client.
///
/// The client also gets the application credentials so it can fetch an app
/// token for endpoints that need no user context.
///
/// # Example
///
/// ```
/// let spotify = session_from_grant(Grant::Raw("BQD...".into()), &creds, &endpoints);
/// ```
pub fn session_from_grant(
    grant: Grant,
    credentials: &Credentials,
    endpoints: &Endpoints,
) -> SpotifyClient {
    let token = AccessToken::from(grant);
    SpotifyClient::new(
        token,
        ClientCredentials::new(credentials, endpoints),
        endpoints,
    )
}

/// A cached grant that can serve this session, refreshing it if needed.
///
/// # Cache Handling
///
/// - Raw cached tokens are reused as they are
/// - Structured grants lacking a requested scope are skipped
/// - Expired structured grants with a refresh token are refreshed once and
///   the refreshed grant is saved back to the cache
/// - Expired structured grants without a refresh token are skipped
///
/// # Returns
///
/// `None` when the caller has to authorize interactively.
///
/// # Errors
///
/// Only cache I/O errors. A failed refresh is reported through `warning!`
/// and treated as "no cache".
pub async fn cached_grant(
    credentials: &Credentials,
    endpoints: &Endpoints,
    manager: &TokenManager,
) -> Res<Option<Grant>> {
    let Some(grant) = manager.load_usable(credentials.scopes()).await? else {
        return Ok(None);
    };

    let token = match grant {
        Grant::Structured(token) if token.is_expired() => token,
        usable => return Ok(Some(usable)),
    };

    let Some(refresh) = token.refresh_token.clone() else {
        info!("Cached token expired, authorizing again.");
        return Ok(None);
    };

    match refresh_token(credentials, endpoints, &token, &refresh).await {
        Ok(fresh) => {
            manager.persist(&fresh).await?;
            Ok(Some(Grant::Structured(fresh)))
        }
        Err(e) => {
            warning!("Failed to refresh cached token: {}", e);
            Ok(None)
        }
    }
}

/// Exchanges a refresh token for a new grant.
///
/// Spotify may omit the refresh token and scope from the response; the
/// previous values are carried over then.
///
/// # Arguments
///
/// * `credentials` - Application credentials used for client authentication
/// * `endpoints` - Provides the token endpoint
/// * `previous` - The expired grant being replaced
/// * `refresh_token` - Refresh token of `previous`
///
/// # Errors
///
/// - [`Error::Api`] when the accounts service rejects the refresh
/// - [`Error::MalformedResponse`] when the response is not a token object
/// - [`Error::Http`] on transport failures
pub async fn refresh_token(
    credentials: &Credentials,
    endpoints: &Endpoints,
    previous: &Token,
    refresh_token: &str,
) -> Res<Token> {
    let grant = request_token(
        &Client::new(),
        &endpoints.token_url,
        credentials.client_id(),
        credentials.client_secret(),
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await?;

    let mut fresh = match grant {
        Grant::Structured(token) => token,
        Grant::Raw(_) => {
            return Err(Error::MalformedResponse(
                "token refresh did not return a structured grant".into(),
            ));
        }
    };
    if fresh.refresh_token.is_none() {
        fresh.refresh_token = previous.refresh_token.clone();
    }
    if fresh.scope.is_none() {
        fresh.scope = previous.scope.clone();
    }
    Ok(fresh)
}

/// Runs the interactive authorization code flow.
///
/// # Authentication Flow
///
/// 1. **State**: a random `state` value ties the callback to this attempt
/// 2. **Server Start**: the callback server binds the redirect URI's address
///    before anything else happens
/// 3. **Browser Launch**: the authorize page opens in the default browser;
///    when that fails the URL is printed instead
/// 4. **Callback**: a spinner runs until the callback handler records the
///    code or a denial, or [`AUTHORIZATION_TIMEOUT`] passes
/// 5. **Token Exchange**: the code is exchanged for a grant
/// 6. **Persistence**: structured grants are written to the token cache
///
/// # Returns
///
/// The grant as the token endpoint returned it.
///
/// # Errors
///
/// - [`Error::Config`] when the redirect URI cannot be served locally
/// - [`Error::Io`] when the callback address cannot be bound
/// - [`Error::Auth`] on denial or timeout
/// - any error of [`exchange_code`]
///
/// A failure to save the grant is only reported through `warning!`.
pub async fn authorize(
    credentials: &Credentials,
    endpoints: &Endpoints,
    manager: &TokenManager,
) -> Res<Grant> {
    let state = utils::generate_state();
    let auth_url = authorize_url(credentials, endpoints, &state)?;

    let shared_state: SharedAuthState = Arc::new(Mutex::new(Some(AuthorizationState {
        state,
        outcome: None,
    })));

    // bind before the browser opens so the redirect cannot beat us
    let addr = config::callback_addr(credentials.redirect_uri())?;
    let callback_path = config::callback_path(credentials.redirect_uri())?;
    let listener = TcpListener::bind(addr).await?;

    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(listener, &callback_path, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let code = wait_for_code(&shared_state, AUTHORIZATION_TIMEOUT).await;
    server.abort();
    let code = code?;

    let grant = exchange_code(credentials, endpoints, &code).await?;
    if let Grant::Structured(token) = &grant {
        if let Err(e) = manager.persist(token).await {
            warning!("Failed to save token to cache: {}", e);
        }
    }

    Ok(grant)
}

/// The accounts service URL the user has to visit to grant access.
///
/// # Arguments
///
/// * `credentials` - Supplies client id, redirect URI and scopes
/// * `endpoints` - Provides the authorize page URL
/// * `state` - Opaque value echoed back on the callback
///
/// # Errors
///
/// [`Error::Config`] when the authorize URL cannot be parsed.
///
/// # Example
///
/// ```
/// let url = authorize_url(&creds, &Endpoints::default(), "xyz")?;
/// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...&state=xyz
/// ```
pub fn authorize_url(credentials: &Credentials, endpoints: &Endpoints, state: &str) -> Res<Url> {
    let scope = credentials.scopes().to_param();
    Url::parse_with_params(
        &endpoints.auth_url,
        &[
            ("client_id", credentials.client_id()),
            ("response_type", "code"),
            ("redirect_uri", credentials.redirect_uri()),
            ("scope", scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| Error::Config(format!("invalid authorize url '{}': {}", endpoints.auth_url, e)))
}

/// Polls the shared state until the callback handler recorded an outcome.
async fn wait_for_code(shared_state: &SharedAuthState, max_wait: Duration) -> Res<String> {
    use std::time::Instant;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization in the browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let start = Instant::now();
    while start.elapsed() < max_wait {
        let outcome = {
            let lock = shared_state.lock().await;
            lock.as_ref().and_then(|s| s.outcome.clone())
        };
        if let Some(outcome) = outcome {
            pb.finish_and_clear();
            return outcome.map_err(Error::Auth);
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    pb.finish_and_clear();
    Err(Error::Auth(format!(
        "no authorization callback within {} seconds",
        max_wait.as_secs()
    )))
}

/// Exchanges an authorization code for a grant.
///
/// # Arguments
///
/// * `credentials` - Client id and secret plus the redirect URI the code was
///   issued for
/// * `endpoints` - Provides the token endpoint
/// * `code` - Code delivered to the callback
///
/// # Errors
///
/// - [`Error::Api`] when the accounts service rejects the code
/// - [`Error::MalformedResponse`] when the body is neither a token object
///   nor a bare token
/// - [`Error::Http`] on transport failures
pub async fn exchange_code(
    credentials: &Credentials,
    endpoints: &Endpoints,
    code: &str,
) -> Res<Grant> {
    request_token(
        &Client::new(),
        &endpoints.token_url,
        credentials.client_id(),
        credentials.client_secret(),
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri()),
        ],
    )
    .await
}

/// POSTs a form to the token endpoint with HTTP Basic client authentication.
///
/// Structured grants are stamped with the time they were received.
pub(crate) async fn request_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    form: &[(&str, &str)],
) -> Res<Grant> {
    let response = http
        .post(token_url)
        .basic_auth(client_id, Some(client_secret))
        .form(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(api_error(status, &body));
    }

    Ok(match Grant::parse(&body)? {
        Grant::Structured(token) => Grant::Structured(token.stamped()),
        raw => raw,
    })
}
