//! # CLI Module
//!
//! User-facing commands of the `queueseed` binary. Each command builds (or
//! refreshes) an authorized session, calls into the library and reports the
//! outcome with the crate's output macros.
//!
//! ## Commands
//!
//! - [`auth`] - Forces a fresh browser authorization and caches the grant
//! - [`next`] - Prints the name of the next entry in the playback queue
//! - [`current`] - Prints the current track and the playlist it plays from
//! - [`tracks`] - Lists the tracks of the playlist currently playing
//! - [`seed`] - Seeds a playlist with recommendations, optionally in sweeps
//! - [`genres`] - Lists the genres usable as recommendation seeds
//! - [`scopes`] - Lists the permission scope catalog
//!
//! ## Error Handling
//!
//! Commands never return errors. Failures that leave nothing useful to do
//! end the process through `error!`; the queue peek prints its fallback
//! text instead.
//!
//! ## Usage
//!
//! ```bash
//! queueseed auth
//! queueseed next
//! queueseed seed 2rRFvUBPDKuARVvvsI7Jjk --seed 78Y9lEFTSCHpnPPLfQ8UXp --repeat 45
//! ```

mod auth;
mod current;
mod genres;
mod queue;
mod scopes;
mod seed;

pub use auth::auth;
pub use current::current;
pub use current::tracks;
pub use genres::genres;
pub use queue::next;
pub use scopes::scopes;
pub use seed::seed;

use crate::{
    config::{Credentials, Endpoints},
    error,
    spotify::{SpotifyClient, auth::create_session},
};

/// Session for a command, exiting with a message when none can be built.
async fn session(credentials: &Credentials, endpoints: &Endpoints) -> SpotifyClient {
    match create_session(credentials, endpoints).await {
        Ok(client) => client,
        Err(e) => error!("Cannot authorize with Spotify. Err: {}", e),
    }
}
