//! Integration tests for the remote Presidio backend against a mock server

use mockito::{Matcher, Server};
use piiguard::adapters::engine::AnonymizationBackend;
use piiguard::adapters::presidio::PresidioClient;
use piiguard::anonymization::config::AnonymizationStrategy;
use piiguard::anonymization::models::{
    AnalyzeRequest, AnonymizeRequest, DeanonymizeEntity, DeanonymizeRequest, EntitySpan,
};
use piiguard::config::{secret_string, RemoteEngineConfig};
use piiguard::core::service::AnonymizationService;
use piiguard::domain::{PiiGuardError, RemoteError};
use serde_json::json;
use std::sync::Arc;

const SAMPLE: &str = "Contact John Doe at john@example.com";

fn client(url: &str, api_key: Option<&str>) -> PresidioClient {
    let config = RemoteEngineConfig {
        analyzer_url: url.to_string(),
        analyzer_api_key: api_key.map(|k| secret_string(k.to_string())),
        anonymizer_url: url.to_string(),
        anonymizer_api_key: api_key.map(|k| secret_string(k.to_string())),
    };
    PresidioClient::new(&config).unwrap()
}

fn analyzer_results() -> String {
    json!([
        {"entity_type": "PERSON", "start": 8, "end": 16, "score": 0.85},
        {"entity_type": "EMAIL_ADDRESS", "start": 20, "end": 36, "score": 1.0}
    ])
    .to_string()
}

#[tokio::test]
async fn test_default_threshold_is_omitted() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"text": SAMPLE, "language": "en"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(analyzer_results())
        .create_async()
        .await;

    let spans = client(&server.url(), None)
        .analyze(&AnalyzeRequest::new(SAMPLE))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].text, "John Doe");
    assert_eq!(spans[1].text, "john@example.com");
}

#[tokio::test]
async fn test_custom_threshold_and_entities_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze")
        .match_header("authorization", "Bearer secret-key")
        .match_body(Matcher::Json(json!({
            "text": SAMPLE,
            "language": "en",
            "entities": ["EMAIL_ADDRESS"],
            "score_threshold": 0.9
        })))
        .with_status(200)
        .with_body(analyzer_results())
        .create_async()
        .await;

    let mut request = AnalyzeRequest::new(SAMPLE);
    request.entities = Some(vec!["EMAIL_ADDRESS".to_string()]);
    request.score_threshold = 0.9;

    let spans = client(&server.url(), Some("secret-key"))
        .analyze(&request)
        .await
        .unwrap();

    mock.assert_async().await;
    // The PERSON result is below the threshold and dropped locally
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].entity_type, "EMAIL_ADDRESS");
}

#[tokio::test]
async fn test_out_of_range_span_is_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_body(json!([{"entity_type": "PERSON", "start": 30, "end": 99, "score": 0.9}]).to_string())
        .create_async()
        .await;

    let err = client(&server.url(), None)
        .analyze(&AnalyzeRequest::new(SAMPLE))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PiiGuardError::Remote(RemoteError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_server_error_maps_to_remote_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/analyze")
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;

    let err = client(&server.url(), None)
        .analyze(&AnalyzeRequest::new(SAMPLE))
        .await
        .unwrap_err();
    match err {
        PiiGuardError::Remote(RemoteError::ServerError { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client(&server.url(), None)
        .analyze(&AnalyzeRequest::new(SAMPLE))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PiiGuardError::Remote(RemoteError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_anonymize_through_service() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_body(analyzer_results())
        .create_async()
        .await;
    let anonymize = server
        .mock("POST", "/anonymize")
        .match_body(Matcher::PartialJson(json!({
            "text": SAMPLE,
            "anonymizers": {"DEFAULT": {"type": "replace", "new_value": "[REDACTED]"}}
        })))
        .with_status(200)
        .with_body(
            json!({
                "text": "Contact [REDACTED] at [REDACTED]",
                "items": [
                    {"start": 22, "end": 32, "entity_type": "EMAIL_ADDRESS", "text": "[REDACTED]", "operator": "replace"},
                    {"start": 8, "end": 18, "entity_type": "PERSON", "text": "[REDACTED]", "operator": "replace"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = AnonymizationService::new(Arc::new(client(&server.url(), None)));
    let response = service
        .anonymize(&AnonymizeRequest::new(SAMPLE, AnonymizationStrategy::Redact))
        .await
        .unwrap();

    anonymize.assert_async().await;
    assert_eq!(response.text, "Contact [REDACTED] at [REDACTED]");
    assert_eq!(response.entities.len(), 2);
    assert_eq!(response.items[0].start, 8);
    assert_eq!(response.items[1].start, 22);
    assert_eq!(response.items[0].operator, AnonymizationStrategy::Replace);
}

#[tokio::test]
async fn test_replace_sends_type_labels() {
    let mut server = Server::new_async().await;
    let anonymize = server
        .mock("POST", "/anonymize")
        .match_body(Matcher::Json(json!({
            "text": SAMPLE,
            "analyzer_results": [
                {"entity_type": "PERSON", "start": 8, "end": 16, "score": 0.85}
            ],
            "anonymizers": {
                "PERSON": {"type": "replace", "new_value": "PERSON"}
            }
        })))
        .with_status(200)
        .with_body(json!({"text": "Contact PERSON at john@example.com", "items": []}).to_string())
        .create_async()
        .await;

    let spans = vec![EntitySpan::new("PERSON", 8, 16, "John Doe", 0.85)];
    let outcome = client(&server.url(), None)
        .anonymize(&AnonymizeRequest::new(SAMPLE, AnonymizationStrategy::Replace), &spans)
        .await
        .unwrap();

    anonymize.assert_async().await;
    assert_eq!(outcome.text, "Contact PERSON at john@example.com");
    assert!(outcome.generated_key.is_none());
}

#[tokio::test]
async fn test_replace_without_spans_sends_no_anonymizers() {
    let mut server = Server::new_async().await;
    let anonymize = server
        .mock("POST", "/anonymize")
        .match_body(Matcher::Json(json!({
            "text": "Nothing here",
            "analyzer_results": []
        })))
        .with_status(200)
        .with_body(json!({"text": "Nothing here", "items": []}).to_string())
        .create_async()
        .await;

    let outcome = client(&server.url(), None)
        .anonymize(
            &AnonymizeRequest::new("Nothing here", AnonymizationStrategy::Replace),
            &[],
        )
        .await
        .unwrap();

    anonymize.assert_async().await;
    assert_eq!(outcome.text, "Nothing here");
}

#[tokio::test]
async fn test_deanonymize_sends_decrypt_operator() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/deanonymize")
        .match_body(Matcher::Json(json!({
            "text": "Mail abc",
            "anonymizer_results": [{"entity_type": "EMAIL_ADDRESS", "start": 5, "end": 8}],
            "deanonymizers": {"DEFAULT": {"type": "decrypt", "key": "0123456789abcdef"}}
        })))
        .with_status(200)
        .with_body(
            json!({
                "text": "Mail a@example.com",
                "items": [{"start": 5, "end": 18, "entity_type": "EMAIL_ADDRESS", "text": "a@example.com", "operator": "decrypt"}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let outcome = client(&server.url(), None)
        .deanonymize(&DeanonymizeRequest {
            text: "Mail abc".to_string(),
            entities: vec![DeanonymizeEntity {
                entity_type: "EMAIL_ADDRESS".to_string(),
                start: 5,
                end: 8,
            }],
            key: "0123456789abcdef".to_string(),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(outcome.text, "Mail a@example.com");
    assert_eq!(outcome.items[0].operator, AnonymizationStrategy::Encrypt);
}

#[tokio::test]
async fn test_health_check_probes_both_services() {
    let mut server = Server::new_async().await;
    let health = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("ok")
        .expect(2)
        .create_async()
        .await;

    client(&server.url(), None).health_check().await.unwrap();
    health.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_service_fails() {
    // Nothing listens on port 9 on a test machine
    let err = client("http://127.0.0.1:9", None)
        .health_check()
        .await
        .unwrap_err();
    assert!(matches!(err, PiiGuardError::Remote(_)));
}
