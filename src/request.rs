use crate::client::{Client, ClientError};
use log::{debug, warn};
use qqcore::net::{HttpRequest, HttpResponse};
use qqcore::request::{ApiRequest, FORM_CONTENT_TYPE, Method};

impl Client {
    /// Sends one API call with the session's `Cookie` and `User-Agent` headers.
    ///
    /// Cookies set by the response are merged into the jar before the status is
    /// checked against the call's predicate, so the caller always sees them.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<HttpResponse, ClientError> {
        let http_request = self.build_http_request(&request).await;

        let response = self.http_client.execute(http_request).await.map_err(|e| {
            warn!(target: "Client/Http", "Request to {} failed: {e:?}", request.url);
            ClientError::Transport(e)
        })?;

        debug!(
            target: "Client/Http",
            "{} {} -> {}",
            match request.method {
                Method::Get => "GET",
                Method::Post => "POST",
            },
            request.url,
            response.status_code
        );

        let set_cookie = response.set_cookie_lines();
        if !set_cookie.is_empty() {
            self.merge_cookies(set_cookie).await;
        }

        if !request.accept.accepts(response.status_code) {
            return Err(ClientError::UnexpectedStatus {
                status: response.status_code,
                url: request.url,
            });
        }

        Ok(response)
    }

    async fn build_http_request(&self, request: &ApiRequest) -> HttpRequest {
        let mut http_request = match request.method {
            Method::Get => HttpRequest::get(&request.url),
            Method::Post => HttpRequest::post(&request.url),
        };

        if let Some(body) = request.form_body() {
            http_request = http_request
                .with_header("Content-Type", FORM_CONTENT_TYPE)
                .with_header("Content-Length", body.len().to_string())
                .with_body(body.into_bytes());
        }

        http_request = http_request
            .with_header("Cookie", self.cookie_header().await)
            .with_header("User-Agent", &self.config.user_agent);
        for (key, value) in &request.headers {
            http_request = http_request.with_header(key, value);
        }

        http_request.with_redirects(request.follow_redirects)
    }
}
