//! End-to-end pipeline tests against mock HTTP targets

use cmpbench_core::{
    BenchError, BenchmarkRunner, Identity, IdentitySource, Pagination, RequestGenerator,
    RunSettings, Target, TargetRegistry,
};
use cmpbench_http::{GeneratedRequest, HttpClient, HttpError, HttpManager, RawResponse};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const USER_IDS: &str = r#"[{"id":1},{"id":2},{"id":3}]"#;

fn settings(requests_per_target: usize, workers: usize) -> RunSettings {
    RunSettings {
        requests_per_target,
        workers,
        seed: None,
        log_bodies: false,
    }
}

fn http_client() -> Arc<dyn HttpClient> {
    Arc::new(HttpManager::new().expect("client builds"))
}

async fn mount_user_ids(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/user_ids"))
        .respond_with(ResponseTemplate::new(200).set_body_string(USER_IDS))
        .mount(server)
        .await;
}

async fn mount_items(server: &MockServer, item_path: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(item_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"id":1,"name":"widget"}]"#)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

fn target_on(server: &MockServer, name: &str, item_path: &str) -> Target {
    Target::new(name, &server.uri(), item_path, Pagination::default()).unwrap()
}

fn identity_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/api/v1/user_ids", server.uri())).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn fetch_then_batch_of_five_against_items() {
    let server = MockServer::start().await;
    mount_user_ids(&server).await;
    mount_items(&server, "/items", Duration::ZERO).await;

    let client = http_client();
    let identities = IdentitySource::new(client.clone(), identity_url(&server))
        .fetch_identities()
        .await
        .unwrap();
    assert_eq!(identities, vec![Identity(1), Identity(2), Identity(3)]);

    let generator = RequestGenerator::new(identities);
    let target = target_on(&server, "items", "/items");
    let mut runner = BenchmarkRunner::new(client, settings(5, 2));

    let result = runner.run_target(&generator, &target, 5, 2).await.unwrap();
    assert_eq!(result.requests, 5);

    let offsets: HashSet<String> = (0..10).map(|b| (b * 10).to_string()).collect();
    let item_requests: Vec<Request> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/items")
        .collect();

    assert_eq!(item_requests.len(), 5);
    for request in &item_requests {
        let user_id = request.headers.get("x-user-id").unwrap().to_str().unwrap();
        assert!(["1", "2", "3"].contains(&user_id));
        assert_eq!(
            request.headers.get("content-type").unwrap().to_str().unwrap(),
            "application/json"
        );

        let offset = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "offset")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(offsets.contains(&offset));
    }
}

/// Responds with the identity header it received
struct EchoIdentity;

impl Respond for EchoIdentity {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let user_id = request
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("missing")
            .to_string();
        ResponseTemplate::new(200).set_body_string(user_id)
    }
}

/// Reads bodies as they pass through so the test can inspect them
struct RecordingClient {
    inner: HttpManager,
    bodies: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl HttpClient for RecordingClient {
    async fn execute(&self, request: GeneratedRequest) -> Result<RawResponse, HttpError> {
        let response = self.inner.execute(request).await?;
        let status = response.status();
        let body = response.read_all().await?;
        self.bodies
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(&body).into_owned());
        Ok(RawResponse::from_bytes(status, body))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn echoed_identities_come_from_the_fetched_set() {
    let server = MockServer::start().await;
    mount_user_ids(&server).await;
    Mock::given(method("GET"))
        .and(path("/echo"))
        .respond_with(EchoIdentity)
        .mount(&server)
        .await;

    let client = Arc::new(RecordingClient {
        inner: HttpManager::new().unwrap(),
        bodies: Mutex::new(Vec::new()),
    });
    let registry = TargetRegistry::new(vec![target_on(&server, "echo", "/echo")]);
    let source = IdentitySource::new(client.clone(), identity_url(&server));
    let mut runner = BenchmarkRunner::new(client.clone(), settings(200, 8));

    let report = runner.run_all(&registry, &source).await.unwrap();
    assert_eq!(report.len(), 1);

    let bodies = client.bodies.lock().unwrap();
    // First body is the identity list itself
    assert_eq!(bodies.len(), 201);
    let allowed: HashSet<&str> = ["1", "2", "3"].into_iter().collect();
    for echoed in bodies.iter().skip(1) {
        assert!(allowed.contains(echoed.as_str()), "unexpected identity {echoed}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_targets_report_faster_first() {
    let fast = MockServer::start().await;
    let slow = MockServer::start().await;
    mount_user_ids(&fast).await;
    mount_items(&fast, "/api/v1/items", Duration::ZERO).await;
    mount_items(&slow, "/api/v1/items", Duration::from_millis(20)).await;

    // Slow target first so ordering comes from the sort, not registry order
    let registry = TargetRegistry::new(vec![
        target_on(&slow, "slow", "/api/v1/items"),
        target_on(&fast, "fast", "/api/v1/items"),
    ]);
    let client = http_client();
    let source = IdentitySource::new(client.clone(), identity_url(&fast));
    let mut runner = BenchmarkRunner::new(client, settings(100, 10));

    let report = runner.run_all(&registry, &source).await.unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(report.results()[0].name, "fast");
    assert_eq!(report.results()[1].name, "slow");
    assert!(report.results().iter().all(|r| r.requests == 100));

    let printed = report.to_string();
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("      fast: "));
    assert!(lines[1].starts_with("      slow: "));
}

#[tokio::test]
async fn malformed_identity_list_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user_ids"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let source = IdentitySource::new(http_client(), identity_url(&server));
    let err = source.fetch_identities().await.unwrap_err();
    assert!(matches!(err, BenchError::IdentityParse(_)));
}

#[tokio::test]
async fn empty_identity_list_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user_ids"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let source = IdentitySource::new(http_client(), identity_url(&server));
    assert!(matches!(
        source.fetch_identities().await,
        Err(BenchError::NoIdentities)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unreachable_target_aborts_the_run() {
    let server = MockServer::start().await;
    mount_user_ids(&server).await;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_port = listener.local_addr().unwrap().port();
    drop(listener);

    let registry = TargetRegistry::new(vec![Target::new(
        "down",
        &format!("http://127.0.0.1:{}", closed_port),
        "/api/v1/items",
        Pagination::default(),
    )
    .unwrap()]);
    let client = http_client();
    let source = IdentitySource::new(client.clone(), identity_url(&server));
    let mut runner = BenchmarkRunner::new(client, settings(20, 4));

    let err = runner.run_all(&registry, &source).await.unwrap_err();
    match err {
        BenchError::Target { target, source } => {
            assert_eq!(target, "down");
            assert!(matches!(*source, BenchError::Http(HttpError::NetworkError(_))));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
