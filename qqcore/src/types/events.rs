use crate::poll::PollIdleReason;
use crate::qrlogin::QrStatus;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
pub enum Event {
    /// The QR code image was fetched and handed to the display.
    QrCodeReady { size: usize },
    /// One answer of the scan status endpoint.
    QrScanStatus(QrStatus),
    LoggedIn { uin: String },
    RosterFetched,
    /// Text of an inbound message.
    Message(String),
    /// A poll iteration that delivered nothing, and why.
    PollIdle(PollIdleReason),
}

pub trait EventHandler: Send + Sync {
    fn handle_event(&self, event: &Event);
}

#[derive(Default, Clone)]
pub struct CoreEventBus {
    handlers: Arc<RwLock<Vec<Arc<dyn EventHandler>>>>,
}

impl CoreEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&self, handler: Arc<dyn EventHandler>) {
        self.handlers
            .write()
            .expect("RwLock should not be poisoned")
            .push(handler);
    }

    pub fn dispatch(&self, event: &Event) {
        for handler in self
            .handlers
            .read()
            .expect("RwLock should not be poisoned")
            .iter()
        {
            handler.handle_event(event);
        }
    }
}
