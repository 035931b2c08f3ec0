use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    info,
    management::CredentialStore,
    server::RedirectListener,
    success,
    types::{AuthorizationRequest, Credential, TokenResponse},
    utils, warning,
};

/// How long the authorization flow waits for the browser redirect.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token endpoint answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed token response: {0}")]
    Malformed(String),
    #[error("no stored credential to refresh")]
    NoCredential,
}

/// Performs the authorization-code and refresh-token grants and writes the
/// results into the shared [`CredentialStore`].
///
/// Both grants return `false` on any failure and leave the stored credential
/// untouched in that case.
#[derive(Debug, Clone)]
pub struct TokenExchanger {
    client: Client,
    token_url: String,
    request: AuthorizationRequest,
    store: Arc<Mutex<CredentialStore>>,
}

impl TokenExchanger {
    pub fn new(
        request: AuthorizationRequest,
        token_url: impl Into<String>,
        store: Arc<Mutex<CredentialStore>>,
    ) -> Self {
        Self {
            client: Client::new(),
            token_url: token_url.into(),
            request,
            store,
        }
    }

    pub fn from_config(config: &Config, store: Arc<Mutex<CredentialStore>>) -> Self {
        let request = AuthorizationRequest {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
        };
        Self::new(request, config.token_url.clone(), store)
    }

    pub fn store(&self) -> &Arc<Mutex<CredentialStore>> {
        &self.store
    }

    pub fn authorization_request(&self) -> &AuthorizationRequest {
        &self.request
    }

    /// Exchanges a one-time authorization code for a credential.
    pub async fn exchange_authorization_code(&self, code: &str) -> bool {
        match self.request_authorization_token(code).await {
            Ok(credential) => {
                self.store.lock().await.update(credential).await;
                true
            }
            Err(e) => {
                warning!("Authorization code exchange failed: {}", e);
                false
            }
        }
    }

    /// Renews the access token with the stored refresh token.
    pub async fn refresh(&self) -> bool {
        match self.refresh_credential().await {
            Ok(()) => true,
            Err(e) => {
                warning!("Token refresh failed: {}", e);
                false
            }
        }
    }

    async fn request_authorization_token(&self, code: &str) -> Result<Credential, ExchangeError> {
        let response = self
            .post_grant(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.request.redirect_uri),
                ("client_id", &self.request.client_id),
                ("client_secret", &self.request.client_secret),
            ])
            .await?;

        let refresh_token = response
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ExchangeError::Malformed("missing refresh_token".to_string()))?;

        Ok(Credential {
            access_token: response.access_token,
            refresh_token,
            expires_in: response.expires_in,
            token_type: response.token_type,
            issued_at: utils::now_ms(),
        })
    }

    async fn refresh_credential(&self) -> Result<(), ExchangeError> {
        let refresh_token = self
            .store
            .lock()
            .await
            .current()
            .map(|c| c.refresh_token.clone())
            .ok_or(ExchangeError::NoCredential)?;

        let response = self
            .post_grant(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &refresh_token),
                ("client_id", &self.request.client_id),
                ("client_secret", &self.request.client_secret),
            ])
            .await?;

        let mut store = self.store.lock().await;
        let previous = store.current().ok_or(ExchangeError::NoCredential)?;
        let credential = Credential {
            access_token: response.access_token,
            // the provider may keep the old refresh token
            refresh_token: response
                .refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| previous.refresh_token.clone()),
            expires_in: response.expires_in,
            token_type: response.token_type,
            issued_at: utils::now_ms(),
        };
        store.update(credential).await;
        Ok(())
    }

    async fn post_grant(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ExchangeError> {
        let response = self.client.post(&self.token_url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(ExchangeError::Status { status, body });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ExchangeError::Malformed(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(ExchangeError::Malformed("empty access_token".to_string()));
        }
        Ok(token)
    }
}

/// Builds the provider URL the user opens to grant access.
pub fn authorize_url(auth_url: &str, request: &AuthorizationRequest) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}",
        client_id = urlencoding::encode(&request.client_id),
        redirect_uri = urlencoding::encode(&request.redirect_uri),
        scope = urlencoding::encode(&request.scope),
    )
}

/// Runs the complete authorization-code flow.
///
/// 1. Binds the local redirect receiver on `port`
/// 2. Opens the authorize URL in the default browser
/// 3. Waits up to [`AUTH_TIMEOUT`] for the redirect to deliver a code
/// 4. Exchanges the code and stores the credential
///
/// The listener is closed before returning. A bind failure is returned as an
/// error; every other failure yields `Ok(false)`.
pub async fn authorize(
    exchanger: &TokenExchanger,
    auth_url: &str,
    port: u16,
) -> std::io::Result<bool> {
    let (listener, code_rx) = RedirectListener::bind_channel(port).await?;

    let url = authorize_url(auth_url, exchanger.authorization_request());
    if webbrowser::open(&url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        );
    }
    info!(
        "Waiting for the Spotify redirect on {}...",
        listener.local_addr()
    );

    let code = tokio::time::timeout(AUTH_TIMEOUT, code_rx).await;
    listener.close().await;

    let code = match code {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => {
            warning!("Redirect listener closed before a code arrived.");
            return Ok(false);
        }
        Err(_) => {
            warning!("No authorization redirect within {}s.", AUTH_TIMEOUT.as_secs());
            return Ok(false);
        }
    };

    info!("Authorization code received. Requesting access token...");
    let authorized = exchanger.exchange_authorization_code(&code).await;
    if authorized {
        success!("Authentication successful!");
    }
    Ok(authorized)
}
