//! Offline queue behaviour against a mocked submission endpoint
//!
//! wiremock stands in for the orientation API so delivery, retry and
//! idempotency can be checked without a network.

use safety_orientation::config::SubmissionConfig;
use safety_orientation::offline::{
    FileQueueStore, OrientationSubmission, QuizSubmission, SubmitOutcome,
};
use safety_orientation::orientation::WorkerInfo;
use safety_orientation::{HttpSubmissionClient, OfflineQueue, SubmissionPayload, WorkerStatus};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> SubmissionConfig {
    SubmissionConfig {
        endpoint: format!("{}/api/orientation", server.uri()),
        max_retries: 1,
        base_delay_ms: 1,
        requests_per_second: 100,
        ..SubmissionConfig::default()
    }
}

fn queue_at(dir: &TempDir, server: &MockServer) -> OfflineQueue {
    let client = HttpSubmissionClient::new(&config_for(server)).unwrap();
    OfflineQueue::new(
        Arc::new(FileQueueStore::new(dir.path().join("pending-submissions"))),
        Arc::new(client),
        4,
    )
}

fn orientation_payload() -> SubmissionPayload {
    SubmissionPayload::Orientation(OrientationSubmission {
        session_id: Some("session_1769610600000_k3j9x2m1q".to_string()),
        worker_info: WorkerInfo {
            full_name: "John Smith".to_string(),
            hire_date: "2026-01-28".to_string(),
            supervisor_name: "Mike Johnson".to_string(),
            site_id: "milestone".to_string(),
            status_type: WorkerStatus::NewToPosition,
            emergency_contact_name: "Mary Smith".to_string(),
            emergency_contact_phone: "555-0111".to_string(),
            emergency_contact_relationship: "Spouse".to_string(),
        },
        quiz_attempts: 1,
        signature_data: "data:image/png;base64,AAAA".to_string(),
        completed_at: Utc::now(),
    })
}

fn quiz_payload() -> SubmissionPayload {
    SubmissionPayload::Quiz(QuizSubmission {
        session_id: None,
        attempt_number: 1,
        score: 10,
        total: 10,
        passed: true,
        answered_at: Utc::now(),
    })
}

#[tokio::test]
async fn test_queued_submission_is_delivered_once_endpoint_recovers() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;

    let outage = Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount_as_scoped(&server)
        .await;
    let queue = queue_at(&dir, &server);
    let outcome = queue.submit_or_enqueue(orientation_payload()).await.unwrap();
    let SubmitOutcome::Queued(id) = outcome else {
        panic!("submission should have been queued during the outage");
    };
    drop(outage);

    // a fresh process sees the entry on disk
    let queue = queue_at(&dir, &server);
    assert_eq!(queue.list_pending().await.unwrap().len(), 1);

    Mock::given(method("POST"))
        .and(path("/api/orientation"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let report = queue.drain().await.unwrap();
    assert_eq!(report.delivered, vec![id.clone()]);
    assert!(report.failed.is_empty());
    assert!(queue.list_pending().await.unwrap().is_empty());

    let requests = server.received_requests().await.unwrap();
    let delivered = requests.last().unwrap();
    assert_eq!(
        delivered.headers.get("Idempotency-Key").unwrap().to_str().unwrap(),
        id
    );
    let body: Value = serde_json::from_slice(&delivered.body).unwrap();
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["payload"]["type"], "orientation");
    assert_eq!(body["payload"]["data"]["workerInfo"]["fullName"], "John Smith");
}

#[tokio::test]
async fn test_rejected_entries_stay_queued() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let queue = queue_at(&dir, &server);
    let first = queue.enqueue(quiz_payload()).await.unwrap();
    let second = queue.enqueue(orientation_payload()).await.unwrap();

    let report = queue.drain().await.unwrap();
    assert!(report.delivered.is_empty());
    assert_eq!(report.failed.len(), 2);

    let mut remaining: Vec<String> = queue
        .list_pending()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    remaining.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(remaining, expected);
}

#[tokio::test]
async fn test_empty_queue_drains_without_requests() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = queue_at(&dir, &server).drain().await.unwrap();
    assert_eq!(report.attempted(), 0);
}
