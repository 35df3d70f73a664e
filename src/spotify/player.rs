use reqwest::Method;

use crate::{
    Res,
    spotify::{
        SpotifyClient,
        client::{send_json, send_optional_json},
    },
    types::{CurrentlyPlaying, QueueResponse},
};

impl SpotifyClient {
    /// Fetches the user's playback queue.
    ///
    /// Calls `GET /me/player/queue`.
    ///
    /// Needs the `user-read-playback-state` or `user-read-currently-playing`
    /// scope. Spotify answers with an empty queue, not an error, when nothing
    /// is lined up.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Api`] on any non-2xx status, e.g. a missing scope
    /// - [`crate::Error::MalformedResponse`] when the body cannot be decoded
    /// - [`crate::Error::Http`] on transport failures
    pub async fn get_queue(&self) -> Res<QueueResponse> {
        send_json(self.user_request(Method::GET, "/me/player/queue")).await
    }

    /// Fetches the item playing right now together with its context.
    ///
    /// Calls `GET /me/player/currently-playing`.
    ///
    /// # Returns
    ///
    /// `None` when no device is playing anything (`204 No Content`).
    ///
    /// # Errors
    ///
    /// Same as [`SpotifyClient::get_queue`].
    pub async fn get_currently_playing(&self) -> Res<Option<CurrentlyPlaying>> {
        send_optional_json(self.user_request(Method::GET, "/me/player/currently-playing")).await
    }
}
