use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use webqq_rust::net::{HttpClient, HttpRequest, HttpResponse};
use webqq_rust::qrlogin::QrStatus;
use webqq_rust::types::events::{Event, EventHandler};
use webqq_rust::{Client, ClientConfig, ClientError, QrCodeDisplay};

/// Serves canned responses by URL fragment; the last response of a route is
/// repeated once the others are used up.
#[derive(Default)]
struct CannedServer {
    routes: Mutex<Vec<(&'static str, Vec<HttpResponse>)>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl CannedServer {
    fn route(&self, fragment: &'static str, responses: Vec<HttpResponse>) {
        self.routes.lock().unwrap().push((fragment, responses));
    }

    fn seen(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpClient for CannedServer {
    async fn execute(&self, request: HttpRequest) -> anyhow::Result<HttpResponse> {
        let url = request.url.clone();
        self.seen.lock().unwrap().push(request);
        let mut routes = self.routes.lock().unwrap();
        let (_, responses) = routes
            .iter_mut()
            .find(|(fragment, _)| url.contains(fragment))
            .ok_or_else(|| anyhow::anyhow!("unrouted request {url}"))?;
        if responses.len() > 1 {
            Ok(responses.remove(0))
        } else {
            responses
                .first()
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("route for {url} is exhausted"))
        }
    }
}

struct NullDisplay;

#[async_trait::async_trait]
impl QrCodeDisplay for NullDisplay {
    async fn show(&self, png: &[u8]) -> anyhow::Result<()> {
        assert!(!png.is_empty());
        Ok(())
    }
}

/// Records events and ends the session after the first message.
struct FirstMessage {
    client: Arc<Client>,
    events: Mutex<Vec<Event>>,
}

impl EventHandler for FirstMessage {
    fn handle_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
        if matches!(event, Event::Message(_)) {
            self.client.shutdown();
        }
    }
}

fn ok(body: impl Into<Vec<u8>>) -> HttpResponse {
    HttpResponse::empty(200).with_body(body)
}

fn server() -> Arc<CannedServer> {
    let server = Arc::new(CannedServer::default());
    server.route(
        "/cgi-bin/xlogin?",
        vec![HttpResponse::empty(200).with_header("Set-Cookie", "qrsig=SIG; PATH=/; DOMAIN=ptlogin2.qq.com;")],
    );
    server.route("/ptqrshow?", vec![ok(&b"\x89PNG"[..])]);
    server.route(
        "/ptqrlogin?",
        vec![
            ok("ptuiCB('66','0','','0','二维码未失效。', '');"),
            ok("ptuiCB('0','0','https://ptlogin2.web2.qq.com/check_sig?ptsigx=1','0','登录成功！', 'me');"),
        ],
    );
    server.route(
        "/check_sig",
        vec![HttpResponse::empty(302).with_header("Set-Cookie", "ptwebqq=PT; PATH=/; DOMAIN=qq.com;")],
    );
    server.route(
        "/api/getvfwebqq",
        vec![ok(json!({"retcode": 0, "result": {"vfwebqq": "VF"}}).to_string())],
    );
    server.route(
        "/channel/login2",
        vec![ok(json!({"retcode": 0, "result": {"uin": 42, "psessionid": "PS"}}).to_string())],
    );
    for fragment in [
        "get_user_friends2",
        "get_online_buddies2",
        "get_discus_list",
        "get_group_name_list_mask2",
    ] {
        server.route(fragment, vec![ok(json!({"retcode": 0, "result": []}).to_string())]);
    }
    server.route(
        "/channel/poll2",
        vec![
            HttpResponse::empty(504),
            ok(json!({"retcode": 0, "errmsg": ""}).to_string()),
            ok(json!({"result": [{"value": {"content": [["font", {}], "hi", ["face", 1], "there"]}}]})
                .to_string()),
        ],
    );
    server
}

#[tokio::test]
async fn run_logs_in_fetches_roster_and_receives_a_message() {
    let server = server();
    let client = Client::new(
        server.clone(),
        ClientConfig {
            qr_poll_interval: Duration::ZERO,
            ..ClientConfig::default()
        },
    );
    let recorder = Arc::new(FirstMessage {
        client: client.clone(),
        events: Mutex::new(Vec::new()),
    });
    client.add_event_handler(recorder.clone());

    client.run(&NullDisplay).await.unwrap();

    let tokens = client.tokens().await;
    assert_eq!(
        (tokens.uin.as_str(), tokens.ptwebqq.as_str(), tokens.vfwebqq.as_str(), tokens.psessionid.as_str()),
        ("42", "PT", "VF", "PS")
    );

    let events = recorder.events.lock().unwrap().clone();
    assert!(events.iter().any(|e| matches!(e, Event::QrScanStatus(QrStatus::Pending { .. }))));
    assert!(events.iter().any(|e| matches!(e, Event::RosterFetched)));
    assert!(matches!(events.last(), Some(Event::Message(text)) if text == "hi there"));

    let seen = server.seen();
    let roster_at = seen.iter().position(|r| r.url.contains("get_user_friends2")).unwrap();
    let login_at = seen.iter().position(|r| r.url.contains("/channel/login2")).unwrap();
    let first_poll = seen.iter().position(|r| r.url.contains("/channel/poll2")).unwrap();
    assert!(login_at < roster_at && roster_at < first_poll);
    assert_eq!(seen.iter().filter(|r| r.url.contains("/channel/poll2")).count(), 3);
}

#[tokio::test]
async fn get_token_is_available_through_the_public_api() {
    let client = Client::new(Arc::new(CannedServer::default()), ClientConfig::default());
    assert_eq!(client.get_token("psessionid").await.unwrap(), "");
    assert!(matches!(
        client.get_token("nope").await,
        Err(ClientError::UnknownToken(_))
    ));
}

#[tokio::test]
async fn shutdown_before_run_cancels_login() {
    let server = server();
    let client = Client::new(server.clone(), ClientConfig::default());
    client.shutdown();

    assert!(matches!(
        client.run(&NullDisplay).await,
        Err(ClientError::Cancelled)
    ));
    assert!(server.seen().is_empty());
}
