use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use axum::{Extension, Router};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use crate::{api, warning};

/// How long `close` waits for open browser connections before aborting.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub type CodeCallback = Box<dyn FnOnce(String) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Idle,
    Listening,
    CodeReceived,
    Closed,
}

/// State shared between the listener handle and the request handler.
pub struct RedirectState {
    callback: Mutex<Option<CodeCallback>>,
    state: Mutex<ListenerState>,
}

impl RedirectState {
    fn new(callback: CodeCallback) -> Self {
        Self {
            callback: Mutex::new(Some(callback)),
            state: Mutex::new(ListenerState::Idle),
        }
    }

    /// Hands the code to the callback if it was not consumed yet.
    ///
    /// Returns false for every code after the first one and after teardown.
    /// The callback runs on the listener task and must not block.
    pub fn deliver(&self, code: String) -> bool {
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match callback {
            Some(callback) => {
                self.set_state(ListenerState::CodeReceived);
                callback(code);
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> ListenerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: ListenerState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn close(&self) {
        drop(
            self.callback
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );
        self.set_state(ListenerState::Closed);
    }
}

/// Local receiver for the OAuth authorization redirect.
///
/// Serves every path on `127.0.0.1:<port>` until its owner closes it or drops
/// it. A callback that never fired before teardown is dropped uncalled.
pub struct RedirectListener {
    addr: SocketAddr,
    shared: Arc<RedirectState>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RedirectListener {
    /// Binds the port and starts accepting on a separate task.
    ///
    /// Failing to bind is the one hard error of the authorization flow.
    pub async fn bind<F>(port: u16, on_code: F) -> std::io::Result<Self>
    where
        F: FnOnce(String) + Send + 'static,
    {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port)).await?;
        let addr = listener.local_addr()?;

        let shared = Arc::new(RedirectState::new(Box::new(on_code)));
        let app = Router::new()
            .fallback(api::callback)
            .layer(Extension(Arc::clone(&shared)));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                warning!("Redirect listener stopped: {}", e);
            }
        });
        shared.set_state(ListenerState::Listening);

        Ok(Self {
            addr,
            shared,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Binds the port and returns a receiver resolving to the first code.
    ///
    /// The receiver errors if the listener is torn down before a code arrives.
    pub async fn bind_channel(port: u16) -> std::io::Result<(Self, oneshot::Receiver<String>)> {
        let (tx, rx) = oneshot::channel();
        let listener = Self::bind(port, move |code| {
            let _ = tx.send(code);
        })
        .await?;
        Ok((listener, rx))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn state(&self) -> ListenerState {
        self.shared.state()
    }

    /// Stops accepting and releases the port.
    pub async fn close(mut self) {
        self.signal_shutdown();
        if let Some(handle) = self.handle.take() {
            let abort = handle.abort_handle();
            // idle keep-alive connections from the browser can hold the
            // graceful shutdown open
            if tokio::time::timeout(SHUTDOWN_GRACE, handle).await.is_err() {
                abort.abort();
            }
        }
    }

    fn signal_shutdown(&mut self) {
        self.shared.close();
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for RedirectListener {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}
