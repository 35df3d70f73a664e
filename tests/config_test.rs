use std::net::{Ipv4Addr, SocketAddr};

use queueseed::{
    Error,
    config::{DEFAULT_API_URL, Endpoints, callback_addr, callback_path},
    scopes::{Scopes, VALID_SCOPES},
    types::TrackId,
    utils::{generate_state, parse_spotify_id, playlist_id_from_context_uri},
};

#[test]
fn test_catalog_has_every_scope_once() {
    assert_eq!(VALID_SCOPES.len(), 19);
    assert_eq!(VALID_SCOPES[0], "ugc-image-upload");
    assert_eq!(VALID_SCOPES[18], "user-read-private");
    for (i, scope) in VALID_SCOPES.iter().enumerate() {
        assert!(!VALID_SCOPES[i + 1..].contains(scope), "{scope} repeated");
    }
}

#[test]
fn test_catalog_slice_matches_playlist_scopes() {
    let scopes = Scopes::from_catalog(7..10).unwrap();
    assert_eq!(
        scopes.to_param(),
        "playlist-read-collaborative playlist-modify-private playlist-modify-public"
    );
    assert!(Scopes::from_catalog(15..25).is_err());
}

#[test]
fn test_single_scope_and_sequence_are_equivalent() {
    let single = Scopes::try_from("user-read-currently-playing").unwrap();
    let seq = Scopes::try_from(vec!["user-read-currently-playing".to_string()]).unwrap();
    assert_eq!(single, seq);
    assert_eq!(single.to_string(), "user-read-currently-playing");
}

#[test]
fn test_unknown_scope_is_rejected() {
    let err = Scopes::parse("streaming user-read-everything").unwrap_err();
    assert!(matches!(err, Error::InvalidScope(ref s) if s == "user-read-everything"));
}

#[test]
fn test_scope_parsing_accepts_commas_and_whitespace() {
    let scopes = Scopes::parse(" streaming,user-top-read\tstreaming \n").unwrap();
    assert_eq!(scopes.iter().collect::<Vec<_>>(), vec!["streaming", "user-top-read"]);
    assert!(Scopes::parse("").unwrap().is_empty());
}

#[test]
fn test_scope_coverage() {
    let wanted = Scopes::parse("streaming user-top-read").unwrap();
    assert!(wanted.covered_by("user-top-read streaming user-read-email"));
    assert!(!wanted.covered_by("streaming"));
    assert!(Scopes::default().covered_by(""));
}

#[test]
fn test_callback_addr_from_redirect_uri() {
    assert_eq!(
        callback_addr("http://127.0.0.1:9090").unwrap(),
        SocketAddr::from((Ipv4Addr::LOCALHOST, 9090))
    );
    assert_eq!(
        callback_addr("http://127.0.0.1/callback").unwrap().port(),
        80
    );
    assert!(matches!(
        callback_addr("not a uri"),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_callback_path_defaults_to_root() {
    assert_eq!(callback_path("http://127.0.0.1:9090").unwrap(), "/");
    assert_eq!(
        callback_path("http://127.0.0.1:9090/callback").unwrap(),
        "/callback"
    );
}

#[test]
fn test_callback_path_cannot_shadow_health_route() {
    for uri in ["http://127.0.0.1:9090/health", "http://127.0.0.1:9090/health/"] {
        assert!(matches!(callback_path(uri), Err(Error::Config(_))), "{uri}");
    }
    assert_eq!(
        callback_path("http://127.0.0.1:9090/health-check").unwrap(),
        "/health-check"
    );
}

#[test]
fn test_default_endpoints() {
    let endpoints = Endpoints::default();
    assert_eq!(endpoints.api_url, DEFAULT_API_URL);
    assert!(endpoints.token_url.ends_with("/api/token"));
}

#[test]
fn test_parse_spotify_ids() {
    let id = "2rRFvUBPDKuARVvvsI7Jjk";
    assert_eq!(parse_spotify_id(id, "playlist").unwrap(), id);
    assert_eq!(
        parse_spotify_id("spotify:playlist:2rRFvUBPDKuARVvvsI7Jjk", "playlist").unwrap(),
        id
    );
    assert_eq!(
        parse_spotify_id(
            "https://open.spotify.com/playlist/2rRFvUBPDKuARVvvsI7Jjk?si=abc123",
            "playlist"
        )
        .unwrap(),
        id
    );
    assert!(parse_spotify_id("spotify:track:78Y9lEFTSCHpnPPLfQ8UXp", "playlist").is_err());
    assert!(parse_spotify_id("https://example.com/track/x", "playlist").is_err());
    assert!(parse_spotify_id("", "track").is_err());
}

#[test]
fn test_playlist_id_from_context() {
    assert_eq!(
        playlist_id_from_context_uri("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M"),
        Some("37i9dQZF1DXcBWIGoYBM5M")
    );
    assert_eq!(playlist_id_from_context_uri("spotify:album:abc"), None);
    assert_eq!(playlist_id_from_context_uri("spotify:playlist:"), None);
}

#[test]
fn test_track_uri() {
    assert_eq!(
        TrackId::new("78Y9lEFTSCHpnPPLfQ8UXp").uri(),
        "spotify:track:78Y9lEFTSCHpnPPLfQ8UXp"
    );
}

#[test]
fn test_generate_state() {
    let state = generate_state();
    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}
