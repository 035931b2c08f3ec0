use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::Config,
    error,
    management::CredentialStore,
    spotify::{TokenExchanger, auth::authorize},
};

/// Signs in again, overwriting any stored credential.
pub async fn auth(config: &Config) {
    let store = Arc::new(Mutex::new(CredentialStore::new(&config.token_path)));
    let exchanger = TokenExchanger::from_config(config, store);

    match authorize(&exchanger, &config.auth_url, config.callback_port()).await {
        Ok(true) => {}
        Ok(false) => error!("Authentication failed or timed out."),
        Err(e) => error!(
            "Cannot listen for the Spotify redirect on port {}: {}",
            config.callback_port(),
            e
        ),
    }
}
