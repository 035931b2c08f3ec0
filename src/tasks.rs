//! Background execution of setlist fetches and imports.
//!
//! Each action runs as a tokio task whose `JoinHandle` the caller can await or
//! abort. Progress and results are posted as [`StatusEvent`]s on a channel the
//! front end drains. At most one fetch and one import run at a time; starting a
//! second one of the same kind fails with [`TaskError::Busy`].

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use thiserror::Error;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

use crate::{
    management::{MusicService, PlaylistImporter},
    setlistfm::SetlistSource,
    types::{ExternalSong, ImportOutcome, ImportProgress, Setlist},
    utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Fetch,
    Import,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Fetch => write!(f, "setlist fetch"),
            TaskKind::Import => write!(f, "playlist import"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("a {0} is already running")]
    Busy(TaskKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    FetchStarted { setlist_id: String },
    SetlistLoaded(Setlist),
    SetlistFailed { setlist_id: String },
    ImportStarted { playlist_name: String },
    ImportProgress(ImportProgress),
    ImportFinished(ImportOutcome),
}

/// Input of one import task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub playlist_name: String,
    pub fallback_artist: String,
    pub songs: Vec<ExternalSong>,
}

impl ImportRequest {
    /// Import of a whole setlist, named after it unless `playlist_name` is
    /// given.
    pub fn from_setlist(setlist: &Setlist, playlist_name: Option<String>) -> Self {
        Self {
            playlist_name: playlist_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| utils::playlist_name_suggestion(setlist)),
            fallback_artist: setlist.artist.clone(),
            songs: utils::songs_from_setlist(setlist),
        }
    }
}

/// Releases the in-flight flag when the task ends, panics or is aborted.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>, kind: TaskKind) -> Result<Self, TaskError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(Arc::clone(flag)))
            .map_err(|_| TaskError::Busy(kind))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct TaskRunner {
    events: UnboundedSender<StatusEvent>,
    fetch: Arc<AtomicBool>,
    import: Arc<AtomicBool>,
}

impl TaskRunner {
    pub fn new() -> (Self, UnboundedReceiver<StatusEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let runner = Self {
            events,
            fetch: Arc::new(AtomicBool::new(false)),
            import: Arc::new(AtomicBool::new(false)),
        };
        (runner, rx)
    }

    pub fn is_running(&self, kind: TaskKind) -> bool {
        match kind {
            TaskKind::Fetch => self.fetch.load(Ordering::Acquire),
            TaskKind::Import => self.import.load(Ordering::Acquire),
        }
    }

    pub fn spawn_fetch<S>(
        &self,
        source: Arc<S>,
        setlist_id: String,
    ) -> Result<JoinHandle<Option<Setlist>>, TaskError>
    where
        S: SetlistSource + Send + Sync + 'static,
    {
        let guard = InFlight::acquire(&self.fetch, TaskKind::Fetch)?;
        let events = self.events.clone();

        Ok(tokio::spawn(async move {
            let _guard = guard;
            let _ = events.send(StatusEvent::FetchStarted {
                setlist_id: setlist_id.clone(),
            });

            let setlist = source.fetch(&setlist_id).await;
            let event = match &setlist {
                Some(setlist) => StatusEvent::SetlistLoaded(setlist.clone()),
                None => StatusEvent::SetlistFailed { setlist_id },
            };
            let _ = events.send(event);
            setlist
        }))
    }

    pub fn spawn_import<S>(
        &self,
        service: S,
        request: ImportRequest,
    ) -> Result<JoinHandle<ImportOutcome>, TaskError>
    where
        S: MusicService + Send + Sync + 'static,
    {
        let guard = InFlight::acquire(&self.import, TaskKind::Import)?;
        let events = self.events.clone();

        Ok(tokio::spawn(async move {
            let _guard = guard;
            let _ = events.send(StatusEvent::ImportStarted {
                playlist_name: request.playlist_name.clone(),
            });

            let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
            let importer = PlaylistImporter::new(service).with_progress(progress_tx);

            let progress_events = events.clone();
            let forward = async move {
                while let Some(progress) = progress_rx.recv().await {
                    let _ = progress_events.send(StatusEvent::ImportProgress(progress));
                }
            };
            let run = async move {
                let outcome = importer
                    .import(
                        &request.playlist_name,
                        &request.fallback_artist,
                        &request.songs,
                    )
                    .await;
                // closes the progress channel so `forward` finishes
                drop(importer);
                outcome
            };

            let (outcome, ()) = tokio::join!(run, forward);
            let _ = events.send(StatusEvent::ImportFinished(outcome.clone()));
            outcome
        }))
    }
}
