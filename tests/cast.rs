//! Cast orchestration scenario tests

use std::sync::Arc;
use std::time::Duration;

use cast_gateway::{CastOrchestrator, CastRequest, CastStatus};
use tokio_test::assert_ok;

mod common;
use common::{DeviceScript, MockTransport, registry_with};

fn request(devices: &[&str]) -> CastRequest {
    CastRequest {
        devices: devices.iter().map(ToString::to_string).collect(),
        url: "http://10.0.0.2:8080/frontend/tv-view.html".to_string(),
        content_type: "text/html".to_string(),
        title: "Ranking de Vendas".to_string(),
    }
}

fn orchestrator(
    registry: cast_gateway::SharedRegistry,
    transport: Arc<MockTransport>,
) -> CastOrchestrator {
    CastOrchestrator::new(registry, transport, Duration::ZERO)
}

#[tokio::test]
async fn successful_cast_reports_device_name() {
    let registry = registry_with(&[("abc-123", "LivingRoomTV")]).await;
    let transport = MockTransport::new();
    let orch = orchestrator(registry, transport);

    let outcomes = tokio_test::assert_ok!(orch.cast(request(&["abc-123"])).await);

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].id, "abc-123");
    assert_eq!(outcomes[0].status, CastStatus::Success);
    assert_eq!(outcomes[0].message, "Transmitido para LivingRoomTV");
}

#[tokio::test]
async fn connect_refusal_reports_connection_error() {
    let registry = registry_with(&[("abc-123", "LivingRoomTV")]).await;
    let transport =
        MockTransport::with_scripts([("abc-123", DeviceScript::RefuseConnection)]);
    let orch = orchestrator(registry, transport);

    let outcomes = orch.cast(request(&["abc-123"])).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, CastStatus::ConnectionError);
}

#[tokio::test]
async fn one_outcome_per_requested_device() {
    let registry = registry_with(&[("a", "TV A"), ("b", "TV B"), ("c", "TV C")]).await;
    let transport = MockTransport::with_scripts([
        ("b", DeviceScript::RefuseConnection),
        ("c", DeviceScript::FailLaunch),
    ]);
    let orch = orchestrator(registry, transport);

    let outcomes = orch
        .cast(request(&["a", "b", "c", "missing"]))
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 4);
    // outcomes come back in request order regardless of completion order
    assert_eq!(outcomes[0].id, "a");
    assert_eq!(outcomes[0].status, CastStatus::Success);
    assert_eq!(outcomes[1].status, CastStatus::ConnectionError);
    assert_eq!(outcomes[2].status, CastStatus::Failure);
    assert_eq!(outcomes[3].status, CastStatus::NotFound);
}

#[tokio::test]
async fn one_device_failing_does_not_affect_the_other() {
    let registry = registry_with(&[("a", "TV A"), ("b", "TV B")]).await;
    let transport = MockTransport::with_scripts([("a", DeviceScript::RefuseConnection)]);
    let orch = orchestrator(registry, transport);

    let outcomes = orch.cast(request(&["a", "b"])).await.unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].status, CastStatus::ConnectionError);
    assert_eq!(outcomes[1].status, CastStatus::Success);
    assert_eq!(outcomes[1].message, "Transmitido para TV B");
}

#[tokio::test]
async fn unknown_device_never_reaches_the_transport() {
    let registry = registry_with(&[]).await;
    let transport = MockTransport::new();
    let orch = orchestrator(registry, transport.clone());

    let outcomes = orch.cast(request(&["ghost"])).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, CastStatus::NotFound);
    assert_eq!(transport.connect_count(), 0);
}

#[tokio::test]
async fn empty_request_is_rejected_without_transport_calls() {
    let registry = registry_with(&[("a", "TV A")]).await;
    let transport = MockTransport::new();
    let orch = orchestrator(registry, transport.clone());

    let err = orch.cast(request(&[])).await.unwrap_err();

    assert!(matches!(err, cast_gateway::Error::InvalidRequest(_)));
    assert_eq!(transport.connect_count(), 0);
}

#[tokio::test]
async fn quit_failure_is_not_terminal() {
    let registry = registry_with(&[("a", "TV A")]).await;
    let transport = MockTransport::with_scripts([("a", DeviceScript::FailQuit)]);
    let orch = orchestrator(registry, transport);

    let outcomes = orch.cast(request(&["a"])).await.unwrap();

    // quit is best-effort preparation; the launch still goes through
    assert_eq!(outcomes[0].status, CastStatus::Success);
}

#[tokio::test]
async fn launch_failure_reports_failure_with_message() {
    let registry = registry_with(&[("a", "TV A")]).await;
    let transport = MockTransport::with_scripts([("a", DeviceScript::FailLaunch)]);
    let orch = orchestrator(registry, transport);

    let outcomes = orch.cast(request(&["a"])).await.unwrap();

    assert_eq!(outcomes[0].status, CastStatus::Failure);
    assert!(outcomes[0].message.contains("launch rejected"));
}
