//! Buddy, group and discussion lists.
//!
//! Each call returns the decoded response body as-is.

use crate::client::{Client, ClientError};
use log::info;
use qqcore::codec::hash_u;
use qqcore::payload::parse_json;
use qqcore::request::ApiRequest;
use qqcore::tokens::TokenSet;
use qqcore::types::events::Event;
use qqcore::urls;
use serde_json::{Value, json};

/// Everything fetched right after login.
#[derive(Debug, Clone)]
pub struct Roster {
    pub buddies: Value,
    pub online_buddies: Value,
    pub discussions: Value,
    pub groups: Value,
}

fn list_payload(tokens: &TokenSet) -> Value {
    json!({
        "vfwebqq": tokens.vfwebqq,
        "hash": hash_u(&tokens.uin, &tokens.ptwebqq),
    })
}

impl Client {
    pub async fn get_buddy(&self) -> Result<Value, ClientError> {
        let tokens = self.require_tokens().await?;
        info!(target: "Client/Roster", "Fetching buddy list");
        self.fetch_json(
            ApiRequest::post(urls::GET_BUDDY, list_payload(&tokens)).referer(urls::REFERER_130916),
        )
        .await
    }

    pub async fn get_online_buddies(&self) -> Result<Value, ClientError> {
        let tokens = self.require_tokens().await?;
        info!(target: "Client/Roster", "Fetching online buddies");
        self.fetch_json(
            ApiRequest::get(urls::online_buddies(&tokens.vfwebqq, &tokens.psessionid))
                .referer(urls::REFERER_151105),
        )
        .await
    }

    pub async fn get_group(&self) -> Result<Value, ClientError> {
        let tokens = self.require_tokens().await?;
        info!(target: "Client/Roster", "Fetching group list");
        self.fetch_json(
            ApiRequest::post(urls::GET_GROUP, list_payload(&tokens)).referer(urls::REFERER_130916),
        )
        .await
    }

    pub async fn get_discu(&self) -> Result<Value, ClientError> {
        let tokens = self.require_tokens().await?;
        info!(target: "Client/Roster", "Fetching discussion list");
        self.fetch_json(
            ApiRequest::post(
                urls::get_discu(&tokens.vfwebqq, &tokens.psessionid),
                list_payload(&tokens),
            )
            .referer(urls::REFERER_130916),
        )
        .await
    }

    /// Fetches all four lists concurrently. Fails if any of them fails.
    pub async fn fetch_roster(&self) -> Result<Roster, ClientError> {
        self.require_tokens().await?;
        let (buddies, online_buddies, discussions, groups) = self
            .cancellable(async {
                tokio::try_join!(
                    self.get_buddy(),
                    self.get_online_buddies(),
                    self.get_discu(),
                    self.get_group(),
                )
            })
            .await?;
        self.dispatch_event(Event::RosterFetched);
        Ok(Roster {
            buddies,
            online_buddies,
            discussions,
            groups,
        })
    }

    async fn fetch_json(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let response = self.execute(request).await?;
        Ok(parse_json(&response.body)?)
    }
}
