use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    Res,
    config::{Credentials, Endpoints},
    error::Error,
    spotify::{SpotifyApi, auth},
    types::{
        AccessToken, ApiErrorBody, AuthErrorBody, CurrentlyPlaying, Grant, PlaylistTracksPage,
        QueueResponse, RecommendationBatch, SeedTracks, Token, TrackId, User,
    },
};

/// App-level credentials for endpoints that need no user context.
///
/// The client credentials token is fetched on first use and kept until it
/// expires.
pub struct ClientCredentials {
    http: Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    cached: Mutex<Option<Token>>,
}

impl ClientCredentials {
    /// Prepares app-level access for the given application.
    ///
    /// Nothing is requested until [`ClientCredentials::access_token`] is
    /// first called.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Client id and secret of the application
    /// * `endpoints` - Provides the token endpoint
    pub fn new(credentials: &Credentials, endpoints: &Endpoints) -> Self {
        Self {
            http: Client::new(),
            client_id: credentials.client_id().to_string(),
            client_secret: credentials.client_secret().to_string(),
            token_url: endpoints.token_url.clone(),
            cached: Mutex::new(None),
        }
    }

    /// The app's access token, fetched with the client credentials grant.
    ///
    /// The first call asks the token endpoint; later calls reuse the token
    /// until it expires. Concurrent callers wait on the same fetch.
    ///
    /// # Errors
    ///
    /// - [`Error::Api`] when the accounts service rejects the credentials
    /// - [`Error::MalformedResponse`] when the response cannot be read
    /// - [`Error::Http`] on transport failures
    pub async fn access_token(&self) -> Res<AccessToken> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(AccessToken::new(token.access_token.clone()));
            }
        }

        let grant = auth::request_token(
            &self.http,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
            &[("grant_type", "client_credentials")],
        )
        .await?;

        let token = match grant {
            Grant::Structured(token) => token.stamped(),
            Grant::Raw(access_token) => Token {
                access_token,
                token_type: None,
                refresh_token: None,
                scope: None,
                expires_in: None,
                obtained_at: None,
            },
        };
        let access = AccessToken::new(token.access_token.clone());
        *cached = Some(token);
        Ok(access)
    }
}

/// Authenticated handle to the Spotify Web API.
///
/// Carries the user's bearer token for user endpoints and the app's
/// [`ClientCredentials`] for catalog endpoints. Built by
/// [`auth::create_session`]; the endpoint methods live in the `player`,
/// `playlist` and `recommendations` modules.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: AccessToken,
    app: ClientCredentials,
}

impl SpotifyClient {
    /// Binds a user token and app credentials to a Web API base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - The user's access token
    /// * `app` - App-level credentials for endpoints without user context
    /// * `endpoints` - Provides the Web API base URL; a trailing slash is
    ///   dropped
    pub fn new(token: AccessToken, app: ClientCredentials, endpoints: &Endpoints) -> Self {
        Self {
            http: Client::new(),
            api_url: endpoints.api_url.trim_end_matches('/').to_string(),
            token,
            app,
        }
    }

    /// The user's access token this client sends.
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Request builder carrying the user's bearer token.
    pub(crate) fn user_request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(self.token.as_str())
    }

    /// Request builder carrying the app's client credentials token.
    pub(crate) async fn app_request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Res<RequestBuilder> {
        let token = self.app.access_token().await?;
        Ok(self
            .http
            .request(method, self.url(path))
            .bearer_auth(token.as_str()))
    }
}

/// Sends the request and decodes a JSON body.
///
/// # Errors
///
/// - [`Error::Http`] on transport failures
/// - [`Error::Api`] on any non-2xx status
/// - [`Error::MalformedResponse`] when the body does not decode into `T`
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Res<T> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    decode(status, &body)
}

/// Like [`send_json`], but `204 No Content` yields `None`.
///
/// A successful response with an empty body counts as no content too.
pub(crate) async fn send_optional_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Res<Option<T>> {
    let response = request.send().await?;
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let body = response.text().await?;
    if status.is_success() && body.trim().is_empty() {
        return Ok(None);
    }
    decode(status, &body).map(Some)
}

/// Decodes a response body, mapping error statuses to [`Error::Api`].
pub(crate) fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Res<T> {
    if !status.is_success() {
        return Err(api_error(status, body));
    }
    serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))
}

/// Turns an error response into [`Error::Api`], keeping Spotify's message
/// when the body has one.
///
/// # Message Sources
///
/// - Web API errors: `{"error": {"status": 404, "message": "..."}}`
/// - Accounts service errors: `{"error": "...", "error_description": "..."}`
/// - any other body verbatim, or the status reason when the body is empty
pub(crate) fn api_error(status: StatusCode, body: &str) -> Error {
    let message = if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        parsed.error.message
    } else if let Ok(parsed) = serde_json::from_str::<AuthErrorBody>(body) {
        match parsed.error_description {
            Some(desc) => format!("{}: {}", parsed.error, desc),
            None => parsed.error,
        }
    } else if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        body.trim().to_string()
    };

    Error::Api { status, message }
}

impl SpotifyApi for SpotifyClient {
    async fn current_user(&self) -> Res<User> {
        self.get_current_user().await
    }

    async fn recommendations(&self, seeds: &SeedTracks, limit: u32) -> Res<RecommendationBatch> {
        self.get_recommendations(seeds, limit).await
    }

    async fn add_tracks_to_playlist(
        &self,
        user: &User,
        playlist_id: &str,
        tracks: &[TrackId],
    ) -> Res<String> {
        self.add_tracks(user, playlist_id, tracks).await
    }

    async fn queue(&self) -> Res<QueueResponse> {
        self.get_queue().await
    }

    async fn currently_playing(&self) -> Res<Option<CurrentlyPlaying>> {
        self.get_currently_playing().await
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Res<PlaylistTracksPage> {
        self.get_playlist_tracks(playlist_id).await
    }

    async fn genre_seeds(&self) -> Res<Vec<String>> {
        self.get_genre_seeds().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_web_api_message() {
        let body = r#"{"error":{"status":404,"message":"Invalid playlist Id"}}"#;
        match api_error(StatusCode::NOT_FOUND, body) {
            Error::Api { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Invalid playlist Id");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn api_error_keeps_accounts_service_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#;
        let err = api_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.to_string(),
            "Spotify responded with 400 Bad Request: invalid_grant: Invalid authorization code"
        );
    }

    #[test]
    fn api_error_falls_back_to_reason_phrase() {
        let err = api_error(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(err.to_string().ends_with("Too Many Requests"));
    }

    #[test]
    fn decode_reports_malformed_bodies() {
        let err = decode::<User>(StatusCode::OK, "{\"nope\":1}").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}
