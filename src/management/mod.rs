mod auth;
mod import;

pub use auth::CredentialStore;
pub use auth::StoreError;
pub use import::MusicService;
pub use import::PlaylistImporter;
