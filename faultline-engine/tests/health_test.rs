use faultline_engine::{HealthProbe, ReadinessProbe};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn probe_for(url: String, timeout_ms: u64) -> HealthProbe {
    HealthProbe::new(
        reqwest::Client::new(),
        url,
        Duration::from_millis(timeout_ms),
        Duration::from_millis(50),
    )
}

#[tokio::test]
async fn test_ready_when_status_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/actuator/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "UP" })))
        .mount(&server)
        .await;

    let probe = probe_for(format!("{}/actuator/health", server.uri()), 2000);
    assert!(probe.wait_ready().await);
}

#[tokio::test]
async fn test_becomes_ready_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/actuator/health"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/actuator/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "UP" })))
        .mount(&server)
        .await;

    let probe = probe_for(format!("{}/actuator/health", server.uri()), 5000);
    assert!(probe.wait_ready().await);
}

#[tokio::test]
async fn test_not_ready_when_status_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/actuator/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "DOWN" })))
        .mount(&server)
        .await;

    let probe = probe_for(format!("{}/actuator/health", server.uri()), 300);
    let started = Instant::now();
    assert!(!probe.wait_ready().await);
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_unreachable_times_out() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let probe = probe_for(format!("http://{}/actuator/health", address), 300);
    assert!(!probe.wait_ready().await);
    assert_eq!(probe.timeout(), Duration::from_millis(300));
}

#[tokio::test]
async fn test_hung_endpoint_respects_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "UP" }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let probe = probe_for(format!("{}/actuator/health", server.uri()), 300);
    let started = Instant::now();
    assert!(!probe.wait_ready().await);
    assert!(started.elapsed() < Duration::from_secs(3));
}
