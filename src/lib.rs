// Re-export core modules for compatibility
pub use qqcore::{codec, cookies, net, payload, poll, qrlogin, tokens, urls};

pub mod types {
    pub use qqcore::types::events;
}

pub mod client;
pub mod config;
pub mod login;
pub mod poll_loop;
pub mod qrcode;
pub mod request;
pub mod roster;

#[cfg(test)]
pub(crate) mod test_utils;

pub use client::{Client, ClientError};
pub use config::ClientConfig;
pub use qrcode::{FileQrCodeDisplay, QrCodeDisplay};
pub use roster::Roster;
