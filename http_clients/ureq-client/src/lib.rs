use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use qqcore::net::{HttpClient, HttpRequest, HttpResponse};
use std::time::Duration;

/// Default per-request timeout. The long-poll endpoint holds requests for
/// roughly a minute before answering 504, so this has to be longer than that.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client implementation using `ureq` for synchronous HTTP requests.
/// Since `ureq` is blocking, all requests are wrapped in `tokio::task::spawn_blocking`.
///
/// Error statuses are returned as responses, not errors; the caller decides
/// which statuses it accepts.
#[derive(Debug, Clone)]
pub struct UreqHttpClient {
    following: ureq::Agent,
    not_following: ureq::Agent,
}

impl UreqHttpClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            following: build_agent(timeout, true),
            not_following: build_agent(timeout, false),
        }
    }
}

impl Default for UreqHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn build_agent(timeout: Duration, follow_redirects: bool) -> ureq::Agent {
    let mut builder = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout));
    if !follow_redirects {
        builder = builder.max_redirects(0).max_redirects_will_error(false);
    }
    builder.build().into()
}

#[async_trait]
impl HttpClient for UreqHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let agent = if request.follow_redirects {
            self.following.clone()
        } else {
            self.not_following.clone()
        };

        // Since ureq is blocking, we must use spawn_blocking
        tokio::task::spawn_blocking(move || {
            debug!(target: "Client/Http", "--> {} {}", request.method, request.url);
            let response = match request.method.as_str() {
                "GET" => {
                    let mut req = agent.get(&request.url);
                    for (key, value) in &request.headers {
                        req = req.header(key, value);
                    }
                    req.call()?
                }
                "POST" => {
                    let mut req = agent.post(&request.url);
                    for (key, value) in &request.headers {
                        req = req.header(key, value);
                    }
                    if let Some(body) = request.body {
                        req.send(&body[..])?
                    } else {
                        req.send(&[])?
                    }
                }
                method => {
                    return Err(anyhow::anyhow!("Unsupported HTTP method: {}", method));
                }
            };

            let status_code = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();

            let mut body = response.into_body();
            let body_bytes = body.read_to_vec()?;
            debug!(
                target: "Client/Http",
                "<-- {} {} ({} bytes)",
                status_code,
                request.url,
                body_bytes.len()
            );

            Ok(HttpResponse {
                status_code,
                headers,
                body: body_bytes,
            })
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_method_is_an_error() {
        let client = UreqHttpClient::new();
        let mut request = HttpRequest::get("http://127.0.0.1:9/");
        request.method = "DELETE".to_string();
        let err = client.execute(request).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported HTTP method"));
    }

    #[tokio::test]
    async fn connection_failure_surfaces_as_error() {
        let client = UreqHttpClient::with_timeout(Duration::from_secs(2));
        // Port 9 (discard) is closed on test machines.
        let result = client.execute(HttpRequest::get("http://127.0.0.1:9/")).await;
        assert!(result.is_err());
    }
}
