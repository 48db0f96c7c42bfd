use crate::client::{Client, ClientError};
use log::{debug, info};
use qqcore::poll::{PollIdleReason, PollMessage, decode_poll_body};
use qqcore::request::{ApiRequest, LONG_POLL_STATUSES, StatusPredicate};
use qqcore::types::events::Event;
use qqcore::urls;
use serde_json::json;

const GATEWAY_TIMEOUT: u16 = 504;

impl Client {
    /// Issues one long-poll request.
    ///
    /// The server holds the request until a message arrives or its own timeout
    /// fires (504). A 504 and a 200 without a message body both come back as
    /// [`PollMessage::Empty`]; the [`Event::PollIdle`] event tells them apart.
    pub async fn poll_once(&self) -> Result<PollMessage, ClientError> {
        let tokens = self.require_tokens().await?;
        let payload = json!({
            "ptwebqq": tokens.ptwebqq,
            "clientid": self.config.client_id,
            "psessionid": tokens.psessionid,
            "key": "",
        });
        let response = self
            .execute(
                ApiRequest::post(urls::POLL, payload)
                    .origin(urls::MSG_ORIGIN)
                    .referer(urls::REFERER_151105)
                    .accept(StatusPredicate::AnyOf(LONG_POLL_STATUSES)),
            )
            .await?;

        if response.status_code == GATEWAY_TIMEOUT {
            self.dispatch_event(Event::PollIdle(PollIdleReason::Timeout));
            return Ok(PollMessage::Empty);
        }

        match decode_poll_body(&response.body) {
            Ok(message) => Ok(message),
            Err(e) => {
                debug!(target: "Client/Poll", "Ignoring poll response without message: {e}");
                self.dispatch_event(Event::PollIdle(PollIdleReason::Malformed(e.to_string())));
                Ok(PollMessage::Empty)
            }
        }
    }

    /// Polls until the session is shut down, dispatching every message as an
    /// [`Event::Message`].
    ///
    /// Returns `Ok(())` on shutdown. Transport failures and statuses other than
    /// 200/504 end the loop with the error.
    pub async fn run_poll_loop(&self) -> Result<(), ClientError> {
        info!(target: "Client/Poll", "Starting to receive messages");

        loop {
            match self.cancellable(self.poll_once()).await {
                Ok(message) => {
                    if let Some(text) = message.text() {
                        info!(target: "Client/Poll", "{text}");
                        self.dispatch_event(Event::Message(text));
                    }
                }
                Err(ClientError::Cancelled) => break,
                Err(e) => return Err(e),
            }

            match self.pause(self.config.poll_min_interval).await {
                Ok(()) => {}
                Err(ClientError::Cancelled) => break,
                Err(e) => return Err(e),
            }
        }

        debug!(target: "Client/Poll", "Shutdown signaled, exiting poll loop.");
        Ok(())
    }
}
