use std::future::Future;

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    types::{ExternalSong, ImportOutcome, ImportProgress, ResolvedTrack},
    utils, warning,
};

/// Playlist operations an import needs from the music service.
pub trait MusicService {
    /// Creates an empty playlist and returns its id.
    fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> impl Future<Output = Option<String>> + Send;

    fn find_track(&self, title: &str, artist: &str)
    -> impl Future<Output = Option<ResolvedTrack>> + Send;

    /// Adds all tracks to the playlist in a single call.
    fn attach_tracks(
        &self,
        playlist_id: &str,
        tracks: &[ResolvedTrack],
    ) -> impl Future<Output = bool> + Send;
}

/// Reconciles a list of songs into a new playlist.
pub struct PlaylistImporter<S> {
    service: S,
    progress: Option<UnboundedSender<ImportProgress>>,
}

impl<S: MusicService> PlaylistImporter<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            progress: None,
        }
    }

    /// Posts an [`ImportProgress`] after every searched song.
    pub fn with_progress(mut self, progress: UnboundedSender<ImportProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Creates `playlist_name`, resolves `songs` in order and attaches the
    /// matches in one batch.
    ///
    /// Songs without a match are skipped. The import fails when the playlist
    /// cannot be created, when nothing matched, or when the batch attach
    /// fails.
    pub async fn import(
        &self,
        playlist_name: &str,
        fallback_artist: &str,
        songs: &[ExternalSong],
    ) -> ImportOutcome {
        let total_count = songs.len();
        let description = utils::playlist_description(fallback_artist);

        let Some(playlist_id) = self
            .service
            .create_playlist(playlist_name, &description)
            .await
        else {
            warning!("Failed to create playlist {}", playlist_name);
            return ImportOutcome {
                playlist_id: None,
                total_count,
                matched_count: 0,
                success: false,
            };
        };

        let mut resolved: Vec<ResolvedTrack> = Vec::with_capacity(total_count);
        for (index, song) in songs.iter().enumerate() {
            let artist = utils::artist_for(song, fallback_artist);
            match self.service.find_track(&song.title, artist).await {
                Some(track) => resolved.push(track),
                None => warning!("No match for \"{}\" by {}", song.title, artist),
            }
            self.report(ImportProgress {
                index: index + 1,
                total: total_count,
                matched: resolved.len(),
            });
        }

        let matched_count = resolved.len();
        if resolved.is_empty() {
            warning!("None of the {} songs matched, nothing to add.", total_count);
            return ImportOutcome {
                playlist_id: Some(playlist_id),
                total_count,
                matched_count,
                success: false,
            };
        }

        let success = self.service.attach_tracks(&playlist_id, &resolved).await;
        if !success {
            warning!("Failed to add tracks to playlist {}", playlist_name);
        }

        ImportOutcome {
            playlist_id: Some(playlist_id),
            total_count,
            matched_count,
            success,
        }
    }

    fn report(&self, progress: ImportProgress) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(progress);
        }
    }
}
