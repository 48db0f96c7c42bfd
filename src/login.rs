//! QR code login.
//!
//! The handshake is a fixed sequence of calls; every step needs a cookie or a
//! token produced by the one before it:
//!
//! 0. seed tracking cookies, visit the login page (sets `qrsig`)
//! 1. download the QR code
//! 2. poll the scan status until the code is confirmed on the phone
//! 3. follow the confirmation URL once (302, sets `ptwebqq`)
//! 4. exchange `ptwebqq` for `vfwebqq`
//! 5. open the session (`uin`, `psessionid`)
//!
//! Any failure aborts the login. Nothing is retried except the scan wait.

use crate::client::{Client, ClientError};
use crate::qrcode::QrCodeDisplay;
use log::{debug, info, warn};
use qqcore::codec;
use qqcore::payload::{PayloadError, parse_json, result_string};
use qqcore::qrlogin::{QrStatus, parse_qr_status};
use qqcore::request::{ApiRequest, StatusPredicate};
use qqcore::tokens::TokenName;
use qqcore::types::events::Event;
use qqcore::urls;
use serde_json::json;
use std::time::Instant;

const QRSIG_COOKIE: &str = "qrsig";
const PTWEBQQ_COOKIE: &str = "ptwebqq";

impl Client {
    /// Runs the whole handshake. On success the token set is complete.
    pub async fn login(&self, display: &dyn QrCodeDisplay) -> Result<(), ClientError> {
        info!(target: "Client/Login", "(0/5) Starting login, preparing to download QR code");
        self.prepare_login().await?;

        let qr_code = self.fetch_qr_code().await?;
        display
            .show(&qr_code)
            .await
            .map_err(ClientError::QrDisplay)?;
        self.dispatch_event(Event::QrCodeReady {
            size: qr_code.len(),
        });
        info!(target: "Client/Login", "(1/5) QR code downloaded, waiting for scan");

        // The code is useless once the wait ends, whether it was scanned or not.
        let scanned = self.wait_for_scan().await;
        if let Err(e) = display.dismiss().await {
            warn!(target: "Client/Login", "Failed to dismiss QR code: {e:?}");
        }
        let confirm_url = scanned?;
        info!(target: "Client/Login", "(2/5) QR code scanned");

        self.confirm_login(&confirm_url).await?;
        info!(target: "Client/Login", "(3/5) Got ptwebqq");

        self.fetch_vfwebqq().await?;
        info!(target: "Client/Login", "(4/5) Got vfwebqq");

        let uin = self.open_session().await?;
        info!(target: "Client/Login", "(5/5) Got psessionid and uin");

        self.dispatch_event(Event::LoggedIn { uin });
        Ok(())
    }

    /// Seeds `pgv_info`/`pgv_pvid` and visits the login page for `qrsig`.
    pub(crate) async fn prepare_login(&self) -> Result<(), ClientError> {
        self.set_cookies([
            ("pgv_info", format!("ssid=s{}", codec::rand_pgv())),
            ("pgv_pvid", codec::rand_pgv()),
        ])
        .await;
        self.cancellable(self.execute(ApiRequest::get(urls::LOGIN_PREPARE)))
            .await?;
        Ok(())
    }

    pub(crate) async fn fetch_qr_code(&self) -> Result<Vec<u8>, ClientError> {
        let response = self
            .cancellable(self.execute(ApiRequest::get(urls::QR_CODE)))
            .await?;
        Ok(response.body)
    }

    /// Polls the scan status until the code is confirmed and returns the
    /// confirmation URL. Only a shutdown ends the wait early.
    pub(crate) async fn wait_for_scan(&self) -> Result<String, ClientError> {
        let qrsig = self
            .get_cookie(QRSIG_COOKIE)
            .await
            .ok_or_else(|| PayloadError::MissingCookie(QRSIG_COOKIE.to_string()))?;
        let ptqrtoken = codec::hash33(&qrsig);
        let started = Instant::now();

        loop {
            let url = urls::ptqrlogin(ptqrtoken, started.elapsed().as_millis());
            let response = self
                .cancellable(
                    self.execute(ApiRequest::get(url).referer(urls::PTQRLOGIN_REFERER)),
                )
                .await?;
            let body = response.body_string();
            debug!(target: "Client/Login", "Scan status: {body}");

            let status = parse_qr_status(&body)?;
            self.dispatch_event(Event::QrScanStatus(status.clone()));
            match status {
                QrStatus::Scanned { confirm_url } => return Ok(confirm_url),
                QrStatus::Expired { message } => {
                    warn!(target: "Client/Login", "QR code expired: {message}");
                }
                QrStatus::Pending { .. } | QrStatus::Other { .. } => {}
            }

            self.pause(self.config.qr_poll_interval).await?;
        }
    }

    /// Follows the one-time confirmation URL. The server answers 302 and sets
    /// `ptwebqq`; any other status fails the login.
    pub(crate) async fn confirm_login(&self, confirm_url: &str) -> Result<(), ClientError> {
        self.cancellable(
            self.execute(
                ApiRequest::get(confirm_url)
                    .referer(urls::PTLOGIN4_REFERER)
                    .accept(StatusPredicate::Exactly(302))
                    .no_redirects(),
            ),
        )
        .await?;

        let ptwebqq = self
            .get_cookie(PTWEBQQ_COOKIE)
            .await
            .filter(|v| !v.is_empty())
            .ok_or_else(|| PayloadError::MissingCookie(PTWEBQQ_COOKIE.to_string()))?;
        self.store_token(TokenName::Ptwebqq, ptwebqq).await;
        Ok(())
    }

    pub(crate) async fn fetch_vfwebqq(&self) -> Result<(), ClientError> {
        let ptwebqq = self.tokens.read().await.ptwebqq.clone();
        let response = self
            .cancellable(
                self.execute(ApiRequest::get(urls::vfwebqq(&ptwebqq)).referer(urls::VFWEBQQ_REFERER)),
            )
            .await?;
        let body = parse_json(&response.body)?;
        debug!(target: "Client/Login", "getvfwebqq: {body}");

        let vfwebqq = result_string(&body, "vfwebqq")?;
        self.store_token(TokenName::Vfwebqq, vfwebqq).await;
        Ok(())
    }

    /// Opens the session and returns the account's `uin`.
    pub(crate) async fn open_session(&self) -> Result<String, ClientError> {
        let ptwebqq = self.tokens.read().await.ptwebqq.clone();
        let payload = json!({
            "ptwebqq": ptwebqq,
            "clientid": self.config.client_id,
            "psessionid": "",
            "status": "online",
        });
        let response = self
            .cancellable(
                self.execute(
                    ApiRequest::post(urls::LOGIN2, payload)
                        .origin(urls::LOGIN2_ORIGIN)
                        .referer(urls::LOGIN2_REFERER),
                ),
            )
            .await?;
        let body = parse_json(&response.body)?;
        debug!(target: "Client/Login", "login2: {body}");

        let uin = result_string(&body, "uin")?;
        let psessionid = result_string(&body, "psessionid")?;
        self.store_token(TokenName::Uin, uin.clone()).await;
        self.store_token(TokenName::Psessionid, psessionid).await;
        Ok(uin)
    }

    async fn store_token(&self, name: TokenName, value: String) {
        if !self.tokens.write().await.fill(name, value) {
            warn!(target: "Client/Login", "Token {name} already set, keeping the existing value");
        }
    }
}
