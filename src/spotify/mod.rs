//! # Spotify Integration Module
//!
//! This module is the integration layer between setlistify and Spotify. It
//! covers the OAuth2 authorization-code grant, credential refresh, and the
//! handful of Web API endpoints a setlist import needs.
//!
//! ## Architecture
//!
//! ```text
//! CLI / PlaylistImporter
//!          ↓
//! ApiClient (typed helpers: search, tracks, me, playlists)
//!          ↓
//! ApiClient::request  ──(stale credential)──>  TokenExchanger::refresh
//!          ↓                                          ↓
//! Spotify Web API                              accounts token endpoint
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - [`auth::TokenExchanger`] (authorization-code and refresh
//!   grants) and [`auth::authorize`], the browser-based sign-in flow built on
//!   [`crate::server::RedirectListener`].
//! - [`client`] - [`client::ApiClient`], the single choke point for
//!   authenticated calls. It refreshes a stale credential before sending and
//!   turns every failure into `None`.
//! - `tracks` - search, track lookup and current-user helpers.
//! - `playlist` - playlist creation and batch track attach, plus the
//!   [`crate::management::MusicService`] implementation used by the importer.
//!
//! ## API Coverage
//!
//! - `GET /v1/search` - Track search (`track:<title> artist:<artist>`)
//! - `GET /v1/tracks/{id}` - Track details
//! - `GET /v1/me` - Current user
//! - `POST /v1/users/{user_id}/playlists` - Create a playlist
//! - `POST /v1/playlists/{playlist_id}/tracks` - Add tracks to a playlist
//! - `POST /api/token` - Token exchange and refresh
//!
//! ## Error Handling
//!
//! Nothing here panics or propagates ordinary API errors. Token grants report
//! `bool`, resource calls report `Option`, and each failure is printed with
//! `warning!`. A token revoked out of band keeps failing until the user signs
//! in again; refresh only happens when the credential is close to expiry.

pub mod auth;
pub mod client;
mod playlist;
mod tracks;

pub use auth::TokenExchanger;
pub use client::{ApiClient, HttpMethod};
