use tabled::Table;

use crate::{
    config::{Credentials, Endpoints},
    error, info, queue,
    types::TrackTableRow,
    warning,
};

pub async fn current(credentials: &Credentials, endpoints: &Endpoints) {
    let client = super::session(credentials, endpoints).await;

    match queue::current_track_name(&client).await {
        Ok(Some(name)) => info!("Now playing: {}", name),
        Ok(None) => {
            info!("Nothing is playing right now.");
            return;
        }
        Err(e) => error!("Cannot read current playback. Err: {}", e),
    }

    match queue::current_playlist_id(&client).await {
        Ok(Some(id)) => info!("Playing from playlist: {}", id),
        Ok(None) => info!("Not playing from a playlist."),
        Err(e) => warning!("Cannot read playback context. Err: {}", e),
    }
}

pub async fn tracks(credentials: &Credentials, endpoints: &Endpoints) {
    let client = super::session(credentials, endpoints).await;

    let tracks = match queue::current_playlist_tracks(&client).await {
        Ok(tracks) => tracks,
        Err(e) => error!("Cannot list playlist tracks. Err: {}", e),
    };

    if tracks.is_empty() {
        info!("The playlist has no tracks.");
        return;
    }

    let rows: Vec<TrackTableRow> = tracks.iter().map(TrackTableRow::from).collect();
    println!("{}", Table::new(rows));
}
