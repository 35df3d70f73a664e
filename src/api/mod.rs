//! # API Module
//!
//! HTTP endpoints of the short-lived local server that receives Spotify's
//! authorization redirect.
//!
//! ## Endpoints
//!
//! - [`callback`] - Records the authorization code (or the denial) for the
//!   waiting authorization flow after checking the `state` parameter. The
//!   route path is taken from the configured redirect URI.
//! - [`health`] - Reports name and version, handy to check the redirect
//!   host/port is reachable.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use queueseed::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::{CallbackParams, callback};
pub use health::health;
