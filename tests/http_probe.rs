//! Liveness probing against a local mock HTTP server
//!
//! Coverage:
//! - HEAD success
//! - HEAD rejected, ranged GET accepted
//! - Server errors on both requests
//! - Slow server hitting the probe deadline

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use channel_reconciler::config::ProbeConfig;
use channel_reconciler::errors::ProbeError;
use channel_reconciler::models::AddressFamily;
use channel_reconciler::services::{LivenessProbe, StreamProber};

fn prober() -> StreamProber {
    StreamProber::new(&ProbeConfig {
        request_timeout: Duration::from_millis(500),
        deadline: Duration::from_secs(2),
        ..ProbeConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn head_success_is_reachable_over_ipv4() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/live.m3u8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = prober()
        .probe(&format!("{}/live.m3u8", server.uri()))
        .await;
    assert_eq!(result.unwrap(), AddressFamily::Ipv4);
}

#[tokio::test]
async fn rejected_head_falls_back_to_ranged_get() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/live.m3u8"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/live.m3u8"))
        .and(header("range", "bytes=0-1023"))
        .respond_with(ResponseTemplate::new(206).set_body_string("#EXTM3U\n"))
        .expect(1)
        .mount(&server)
        .await;

    let result = prober()
        .probe(&format!("{}/live.m3u8", server.uri()))
        .await;
    assert_eq!(result.unwrap(), AddressFamily::Ipv4);
}

#[tokio::test]
async fn server_error_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(path("/live.m3u8"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let result = prober()
        .probe(&format!("{}/live.m3u8", server.uri()))
        .await;
    assert!(matches!(result, Err(ProbeError::Status { status: 500 })));
}

#[tokio::test]
async fn redirect_to_live_stream_is_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/old.m3u8"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/new.m3u8"),
        )
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/new.m3u8"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = prober()
        .probe(&format!("{}/old.m3u8", server.uri()))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn slow_server_hits_the_deadline() {
    let server = MockServer::start().await;
    Mock::given(path("/slow.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let prober = StreamProber::new(&ProbeConfig {
        request_timeout: Duration::from_millis(200),
        deadline: Duration::from_millis(300),
        ..ProbeConfig::default()
    })
    .unwrap();

    let result = prober
        .probe(&format!("{}/slow.m3u8", server.uri()))
        .await;
    assert!(matches!(result, Err(ProbeError::Timeout { .. })));
}
