//! Decoding of the QR scan status endpoint.
//!
//! The endpoint answers with a JavaScript call rather than JSON:
//!
//! ```text
//! ptuiCB('66','0','','0','二维码未失效。', '');
//! ptuiCB('0','0','https://ptlogin2.qq.com/check_sig?...','0','登录成功！', 'nick');
//! ```
//!
//! Only the quoted arguments matter. The first is a status code, the third is
//! the one-time confirmation URL once the code has been scanned and accepted.

use crate::payload::PayloadError;
use once_cell::sync::Lazy;
use regex::Regex;

static QUOTED_ARG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'[^,]*'").expect("quoted argument pattern is valid"));

pub const STATUS_CONFIRMED: &str = "0";
pub const STATUS_EXPIRED: &str = "65";
pub const STATUS_WAITING: &str = "66";
pub const STATUS_SCANNED: &str = "67";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrStatus {
    /// Not scanned yet, or scanned but not confirmed on the phone.
    Pending { code: String, message: String },
    /// Scanned and confirmed; the URL finishes the login.
    Scanned { confirm_url: String },
    Expired { message: String },
    Other { code: String, message: String },
}

/// Quoted arguments of a script-call body, quotes removed, in order.
pub fn quoted_arguments(body: &str) -> Vec<String> {
    QUOTED_ARG
        .find_iter(body)
        .map(|m| {
            let s = m.as_str();
            s[1..s.len() - 1].to_string()
        })
        .collect()
}

pub fn parse_qr_status(body: &str) -> Result<QrStatus, PayloadError> {
    let args = quoted_arguments(body);
    let Some(code) = args.first() else {
        return Err(PayloadError::Script(body.to_string()));
    };
    let message = args.get(4).cloned().unwrap_or_default();

    Ok(match code.as_str() {
        STATUS_CONFIRMED => match args.get(2) {
            Some(url) if !url.is_empty() => QrStatus::Scanned {
                confirm_url: url.clone(),
            },
            _ => return Err(PayloadError::Script(body.to_string())),
        },
        STATUS_WAITING | STATUS_SCANNED => QrStatus::Pending {
            code: code.clone(),
            message,
        },
        STATUS_EXPIRED => QrStatus::Expired { message },
        _ => QrStatus::Other {
            code: code.clone(),
            message,
        },
    })
}
