//! Poll cycle tests

mod common;

use common::RecordingSink;
use pihole_statsd_exporter::agent::{poll_once, run, CycleOutcome, PREFIX};
use pihole_statsd_exporter::flatten::DispatchReport;
use pihole_statsd_exporter::pihole::types::SessionToken;
use pihole_statsd_exporter::pihole::{PiholeClient, Session};
use serde_json::json;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> PiholeClient {
    let base_url = Url::parse(&format!("{}/api/", server.uri())).unwrap();
    PiholeClient::new(Session::new(
        base_url,
        SessionToken::new(),
        reqwest::Client::new(),
    ))
}

#[test]
fn test_root_prefix() {
    assert_eq!(PREFIX, "pihole");
}

#[tokio::test]
async fn test_cycle_emits_flattened_summary() {
    // Given: A Pi-hole returning a nested summary
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queries": {"total": 100, "replies": {"IP": 60}},
            "took": 0.002
        })))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let sink = RecordingSink::new();

    // When: Running one cycle
    let outcome = poll_once(&client, &sink).await;

    // Then: Every leaf is sent under the root prefix
    assert_eq!(
        outcome,
        CycleOutcome::Emitted(DispatchReport {
            emitted: 3,
            rejected: 0
        })
    );
    let gauges = sink.gauges();
    assert!(gauges.contains(&("pihole.queries.total".to_string(), json!(100))));
    assert!(gauges.contains(&("pihole.queries.replies.IP".to_string(), json!(60))));
    assert!(gauges.contains(&("pihole.took".to_string(), json!(0.002))));
}

#[tokio::test]
async fn test_server_error_skips_cycle() {
    // Given: A Pi-hole answering 500
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let sink = RecordingSink::new();

    // When: Running one cycle
    let outcome = poll_once(&client, &sink).await;

    // Then: The cycle is skipped without emitting anything
    assert_eq!(outcome, CycleOutcome::Skipped);
    assert!(sink.gauges().is_empty());
}

#[tokio::test]
async fn test_loop_survives_failures_and_keeps_polling() {
    // Given: A Pi-hole that always fails
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let sink = RecordingSink::new();

    // When: Letting the loop run for a while
    let result =
        tokio::time::timeout(Duration::from_millis(500), run(&client, &sink, Duration::from_millis(50)))
            .await;

    // Then: It is still running and has polled more than once
    assert!(result.is_err(), "loop should never return");
    let requests = server.received_requests().await.unwrap();
    assert!(requests.len() >= 2, "expected repeated polls, got {}", requests.len());
    assert!(sink.gauges().is_empty());
}
