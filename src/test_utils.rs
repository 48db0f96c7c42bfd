use crate::qrcode::QrCodeDisplay;
use qqcore::net::{HttpClient, HttpRequest, HttpResponse};
use qqcore::types::events::{Event, EventHandler};
use std::sync::Mutex;

/// Scripted transport. Each queued response is bound to a URL fragment and is
/// served once, to the first request whose URL contains it. Every request is
/// recorded.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    script: Mutex<Vec<(String, HttpResponse)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url_fragment: &str, response: HttpResponse) {
        self.script
            .lock()
            .unwrap()
            .push((url_fragment.to_string(), response));
    }

    pub fn respond_json(&self, url_fragment: &str, body: serde_json::Value) {
        self.respond(
            url_fragment,
            HttpResponse::empty(200).with_body(body.to_string()),
        );
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests whose URL contains `url_fragment`.
    pub fn requests_to(&self, url_fragment: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.contains(url_fragment))
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, anyhow::Error> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);

        let mut script = self.script.lock().unwrap();
        match script.iter().position(|(fragment, _)| url.contains(fragment)) {
            Some(index) => Ok(script.remove(index).1),
            None => Err(anyhow::anyhow!("no scripted response for {url}")),
        }
    }
}

/// QR display that remembers what it was shown.
#[derive(Debug, Default)]
pub struct RecordingQrDisplay {
    pub shown: Mutex<Vec<Vec<u8>>>,
    pub dismissed: Mutex<bool>,
}

#[async_trait::async_trait]
impl QrCodeDisplay for RecordingQrDisplay {
    async fn show(&self, png: &[u8]) -> anyhow::Result<()> {
        self.shown.lock().unwrap().push(png.to_vec());
        Ok(())
    }

    async fn dismiss(&self) -> anyhow::Result<()> {
        *self.dismissed.lock().unwrap() = true;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct EventRecorder {
    pub events: Mutex<Vec<Event>>,
}

impl EventRecorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl EventHandler for EventRecorder {
    fn handle_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}
