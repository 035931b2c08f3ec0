use std::sync::Arc;

use axum::{Extension, http::Uri, response::Html};

use crate::{info, server::RedirectState, utils};

const CONFIRMATION_HTML: &str =
    "<h2>Authorization successful!</h2><p>You can close this window.</p>";

/// Answers every request on the redirect port.
///
/// Requests without a `code` (favicon probes and the like) get the same page
/// and leave the listener waiting.
pub async fn callback(
    uri: Uri,
    Extension(shared): Extension<Arc<RedirectState>>,
) -> Html<&'static str> {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    if let Some(code) = utils::extract_code(target) {
        if !shared.deliver(code) {
            info!("Ignoring repeated authorization redirect.");
        }
    }

    Html(CONFIRMATION_HTML)
}
