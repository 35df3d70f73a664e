use rand::{Rng, distr::Alphanumeric};

use crate::{Res, error::Error};

/// Random value for the `state` parameter of the authorization request.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Extracts a bare id from whatever the user copied out of Spotify.
///
/// Accepts the id itself, a `spotify:<kind>:<id>` URI or an
/// `https://open.spotify.com/<kind>/<id>?si=...` link.
pub fn parse_spotify_id(input: &str, kind: &str) -> Res<String> {
    let input = input.trim();
    let invalid = || Error::Config(format!("'{input}' is not a Spotify {kind} id, URI or link"));

    let id = if let Some(rest) = input.strip_prefix("spotify:") {
        rest.strip_prefix(kind)
            .and_then(|r| r.strip_prefix(':'))
            .ok_or_else(invalid)?
    } else if input.starts_with("http://") || input.starts_with("https://") {
        let marker = format!("/{kind}/");
        let start = input.find(&marker).ok_or_else(invalid)? + marker.len();
        let rest = &input[start..];
        rest.split(['?', '#', '/']).next().unwrap_or_default()
    } else {
        input
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    Ok(id.to_string())
}

/// Playlist id from a playback context URI such as
/// `spotify:playlist:37i9dQZF1DXcBWIGoYBM5M`.
///
/// Album, artist and other contexts yield `None`.
pub fn playlist_id_from_context_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix("spotify:playlist:")
        .filter(|id| !id.is_empty())
}
