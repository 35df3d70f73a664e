use crate::{
    config::{Credentials, Endpoints},
    error,
    spotify::SpotifyApi,
};

pub async fn genres(credentials: &Credentials, endpoints: &Endpoints) {
    let client = super::session(credentials, endpoints).await;

    match client.genre_seeds().await {
        Ok(genres) => {
            for genre in genres {
                println!("{genre}");
            }
        }
        Err(e) => error!("Cannot fetch genre seeds. Err: {}", e),
    }
}
