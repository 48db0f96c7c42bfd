use qqcore::urls;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub user_agent: String,
    pub client_id: u64,
    /// Delay between two scan status checks.
    pub qr_poll_interval: Duration,
    /// Minimum delay between two long-poll requests. Zero re-issues immediately.
    pub poll_min_interval: Duration,
    /// Fetch the buddy, group and discussion lists between login and polling.
    pub fetch_roster: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: urls::USER_AGENT.to_string(),
            client_id: urls::CLIENT_ID,
            qr_poll_interval: Duration::from_secs(1),
            poll_min_interval: Duration::ZERO,
            fetch_roster: true,
        }
    }
}
