//! Read-only helpers around what the user is listening to.

use std::error::Error as StdError;

use crate::{
    Res,
    error::{Error, QueuePeekError},
    spotify::SpotifyApi,
    types::Track,
    utils, warning,
};

/// Returned by [`get_next_in_queue`] when the queue cannot be read.
pub const NOTHING_NEXT: &str = "Nothing is next, no current queue perhaps.";

/// Name of the first entry in the playback queue.
pub async fn fetch_next_in_queue<A: SpotifyApi>(api: &A) -> Result<String, QueuePeekError> {
    let queue = api.queue().await?;
    queue
        .queue
        .into_iter()
        .next()
        .map(|item| item.name)
        .ok_or(QueuePeekError::Empty)
}

/// Name of the next track in the queue, or [`NOTHING_NEXT`].
///
/// Never fails: network errors, an empty queue and unexpected payloads are
/// reported through `warning!` and replaced by the fallback text.
pub async fn get_next_in_queue<A: SpotifyApi>(api: &A) -> String {
    match fetch_next_in_queue(api).await {
        Ok(name) => name,
        Err(e) => {
            warning!("Cannot peek at the queue: {}", failure_chain(&e));
            warning!("Trace: {:?}", e);
            NOTHING_NEXT.to_string()
        }
    }
}

/// The failure's message followed by every underlying cause, one per line.
pub fn failure_chain(err: &QueuePeekError) -> String {
    let mut chain = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        chain.push_str(&format!("\n  caused by: {inner}"));
        cause = inner.source();
    }
    chain
}

/// Name of the item playing right now, `None` when nothing plays.
pub async fn current_track_name<A: SpotifyApi>(api: &A) -> Res<Option<String>> {
    Ok(api
        .currently_playing()
        .await?
        .and_then(|playing| playing.item)
        .map(|item| item.name))
}

/// Id of the playlist the current playback was started from.
///
/// `None` when nothing plays or playback comes from an album, artist or
/// other non-playlist context.
pub async fn current_playlist_id<A: SpotifyApi>(api: &A) -> Res<Option<String>> {
    Ok(api
        .currently_playing()
        .await?
        .and_then(|playing| playing.context)
        .and_then(|ctx| utils::playlist_id_from_context_uri(&ctx.uri).map(str::to_string)))
}

/// Tracks of the playlist currently playing (first page only).
pub async fn current_playlist_tracks<A: SpotifyApi>(api: &A) -> Res<Vec<Track>> {
    let playlist_id = current_playlist_id(api)
        .await?
        .ok_or(Error::NoPlaylistContext)?;

    let page = api.playlist_tracks(&playlist_id).await?;
    Ok(page.items.into_iter().filter_map(|item| item.track).collect())
}
