pub mod codec;
pub mod cookies;
pub mod net;
pub mod payload;
pub mod poll;
pub mod qrlogin;
pub mod request;
pub mod tokens;
pub mod types;
pub mod urls;
