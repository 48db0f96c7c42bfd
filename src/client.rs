use crate::config::ClientConfig;
use crate::qrcode::QrCodeDisplay;
use log::{debug, info};
use qqcore::cookies::{CookieJar, CookieSource};
use qqcore::net::HttpClient;
use qqcore::payload::PayloadError;
use qqcore::tokens::TokenSet;
use qqcore::types::events::{CoreEventBus, Event, EventHandler};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock, watch};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),
    #[error("unknown token `{0}`")]
    UnknownToken(String),
    #[error("client is not logged in")]
    NotLoggedIn,
    #[error("failed to display QR code: {0}")]
    QrDisplay(#[source] anyhow::Error),
    #[error("session was shut down")]
    Cancelled,
}

/// One WebQQ session: cookie jar, token set and the transport they travel over.
///
/// Sessions are independent; several may run in one process.
pub struct Client {
    pub(crate) http_client: Arc<dyn HttpClient>,
    pub(crate) config: ClientConfig,

    pub(crate) cookies: Mutex<CookieJar>,
    pub(crate) tokens: RwLock<TokenSet>,

    pub(crate) event_bus: CoreEventBus,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl Client {
    pub fn new(http_client: Arc<dyn HttpClient>, config: ClientConfig) -> Arc<Self> {
        let (shutdown_tx, _) = watch::channel(false);
        Arc::new(Self {
            http_client,
            config,
            cookies: Mutex::new(CookieJar::new()),
            tokens: RwLock::new(TokenSet::new()),
            event_bus: CoreEventBus::new(),
            shutdown_tx,
        })
    }

    pub fn add_event_handler(&self, handler: Arc<dyn EventHandler>) {
        self.event_bus.add_handler(handler);
    }

    pub(crate) fn dispatch_event(&self, event: Event) {
        self.event_bus.dispatch(&event);
    }

    /// Replaces the cookie jar.
    pub async fn set_cookies(&self, source: impl Into<CookieSource>) {
        self.cookies.lock().await.set(source);
    }

    pub async fn merge_cookies(&self, source: impl Into<CookieSource>) {
        self.cookies.lock().await.merge(source);
    }

    /// The `Cookie` header sent with every request.
    pub async fn cookie_header(&self) -> String {
        self.cookies.lock().await.header()
    }

    pub async fn get_cookie(&self, name: &str) -> Option<String> {
        self.cookies.lock().await.get(name).map(str::to_string)
    }

    /// Value of a session token by wire name (`uin`, `ptwebqq`, `vfwebqq`,
    /// `psessionid`). A known token that is not set yet reads as empty.
    pub async fn get_token(&self, name: &str) -> Result<String, ClientError> {
        self.tokens
            .read()
            .await
            .get(name)
            .map(str::to_string)
            .ok_or_else(|| ClientError::UnknownToken(name.to_string()))
    }

    /// Snapshot of the token set.
    pub async fn tokens(&self) -> TokenSet {
        self.tokens.read().await.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.tokens.read().await.is_complete()
    }

    /// Token snapshot for calls that need a finished login.
    pub(crate) async fn require_tokens(&self) -> Result<TokenSet, ClientError> {
        let tokens = self.tokens.read().await;
        if !tokens.is_complete() {
            return Err(ClientError::NotLoggedIn);
        }
        Ok(tokens.clone())
    }

    /// Stops the scan wait and the poll loop. The session cannot be restarted.
    pub fn shutdown(&self) {
        info!(target: "Client", "Shutting down session");
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Runs `fut` unless the session is shut down first.
    pub(crate) async fn cancellable<T, F>(&self, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if *shutdown_rx.borrow_and_update() {
            return Err(ClientError::Cancelled);
        }
        tokio::select! {
            res = fut => res,
            _ = shutdown_rx.wait_for(|stopped| *stopped) => Err(ClientError::Cancelled),
        }
    }

    /// Sleeps for `duration` unless the session is shut down first.
    pub(crate) async fn pause(&self, duration: std::time::Duration) -> Result<(), ClientError> {
        if duration.is_zero() {
            return if self.is_shutdown() {
                Err(ClientError::Cancelled)
            } else {
                Ok(())
            };
        }
        self.cancellable(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }

    /// Logs in, fetches the roster and then polls for messages until shutdown.
    pub async fn run(&self, display: &dyn QrCodeDisplay) -> Result<(), ClientError> {
        self.login(display).await?;

        if self.config.fetch_roster {
            let roster = self.fetch_roster().await?;
            debug!(target: "Client/Roster", "{roster:#?}");
        }

        self.run_poll_loop().await
    }
}
