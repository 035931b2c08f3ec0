//! # CLI Module
//!
//! The command-line layer of setlistify. It wires configuration, the Spotify
//! client and the setlist.fm client together for each user command, renders
//! progress and results, and is the only place that exits the process on
//! fatal conditions.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the browser sign-in flow and stores the credential
//! - [`setlist`] - Shows a setlist from setlist.fm
//! - [`import`] - Creates a Spotify playlist from a setlist
//! - [`search`], [`track`], [`me`] - Direct Spotify lookups
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (commands, spinners, tables)
//!     ↓
//! TaskRunner (fetch / import tasks, status channel)
//!     ↓
//! PlaylistImporter · SetlistFmClient
//!     ↓
//! ApiClient → TokenExchanger → CredentialStore
//! ```
//!
//! Long-running work (setlist fetch, import) runs on [`crate::tasks`] tasks;
//! the command drains their [`crate::tasks::StatusEvent`]s into a spinner
//! until the task's handle resolves.
//!
//! ## Usage Patterns
//!
//! ```bash
//! setlistify auth                          # Sign in with Spotify
//! setlistify setlist 63de4613              # Inspect a setlist
//! setlistify import 63de4613               # Import it as a playlist
//! setlistify import 63de4613 --name "Hollywood Bowl '64"
//! setlistify search --title "Help!" --artist "The Beatles"
//! ```

mod auth;
mod import;
mod lookup;
mod setlist;

use std::sync::Arc;

use indicatif::ProgressBar;
use tokio::{
    sync::{Mutex, mpsc::UnboundedReceiver},
    task::JoinHandle,
};

use crate::{
    config::Config,
    error, info,
    management::CredentialStore,
    spotify::{ApiClient, auth::authorize},
    tasks::StatusEvent,
    warning,
};

pub use auth::auth;
pub use import::import;
pub use lookup::me;
pub use lookup::search;
pub use lookup::track;
pub use setlist::setlist;

/// Builds a Spotify client from the stored credential, signing in first when
/// there is none.
pub(crate) async fn connect(config: &Config) -> ApiClient {
    let mut store = CredentialStore::new(&config.token_path);
    let loaded = store.load().await;
    let client = ApiClient::from_config(config, Arc::new(Mutex::new(store)));

    if !loaded {
        info!("No stored Spotify session, starting authorization.");
        match authorize(client.exchanger(), &config.auth_url, config.callback_port()).await {
            Ok(true) => {}
            Ok(false) => error!("Authentication failed or timed out."),
            Err(e) => error!(
                "Cannot listen for the Spotify redirect on port {}: {}",
                config.callback_port(),
                e
            ),
        }
    }

    client
}

/// Waits for a task while rendering its status events on `pb`.
pub(crate) async fn drive<T>(
    mut handle: JoinHandle<T>,
    events: &mut UnboundedReceiver<StatusEvent>,
    pb: &ProgressBar,
) -> Option<T> {
    let result = loop {
        tokio::select! {
            Some(event) = events.recv() => show_event(pb, &event),
            result = &mut handle => break result,
        }
    };

    while let Ok(event) = events.try_recv() {
        show_event(pb, &event);
    }

    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warning!("Task join error: {}", e);
            None
        }
    }
}

fn show_event(pb: &ProgressBar, event: &StatusEvent) {
    match event {
        StatusEvent::FetchStarted { setlist_id } => {
            pb.set_message(format!("Loading setlist {setlist_id}..."))
        }
        StatusEvent::SetlistLoaded(setlist) => pb.set_message(format!(
            "Loaded {} songs of {}",
            setlist.songs.len(),
            setlist.artist
        )),
        StatusEvent::SetlistFailed { setlist_id } => {
            pb.set_message(format!("Could not load setlist {setlist_id}"))
        }
        StatusEvent::ImportStarted { playlist_name } => {
            pb.set_message(format!("Creating playlist {playlist_name}..."))
        }
        StatusEvent::ImportProgress(progress) => pb.set_message(format!(
            "Searched {}/{} songs, {} matched...",
            progress.index, progress.total, progress.matched
        )),
        StatusEvent::ImportFinished(outcome) => pb.set_message(format!(
            "Matched {} of {} songs",
            outcome.matched_count, outcome.total_count
        )),
    }
}
