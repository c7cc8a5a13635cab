//! End-to-end tests of the in-process detection and replacement pipeline

use piiguard::adapters::local::LocalBackend;
use piiguard::anonymization::config::{AnonymizationStrategy, OperatorConfig, OperatorOverrides};
use piiguard::anonymization::models::{
    AnalyzeRequest, AnonymizeRequest, DeanonymizeEntity, DeanonymizeRequest,
};
use piiguard::config::{secret_string, EngineConfig};
use piiguard::core::service::AnonymizationService;
use piiguard::domain::PiiGuardError;
use std::sync::Arc;
use test_case::test_case;

const SAMPLE: &str = "Contact John Doe at john@example.com";

fn service() -> AnonymizationService {
    let config = EngineConfig {
        hash_key: Some(secret_string("integration-hash-key".to_string())),
        ..EngineConfig::default()
    };
    let backend = LocalBackend::from_config(&config).unwrap();
    AnonymizationService::new(Arc::new(backend))
}

fn chars(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}

#[tokio::test]
async fn test_reference_example_replace() {
    let response = service()
        .anonymize(&AnonymizeRequest::new(SAMPLE, AnonymizationStrategy::Replace))
        .await
        .unwrap();

    assert_eq!(response.text, "Contact PERSON at EMAIL_ADDRESS");
    assert_eq!(response.entities.len(), 2);
    assert_eq!(response.entities[0].entity_type, "PERSON");
    assert_eq!(response.entities[0].text, "John Doe");
    assert_eq!(response.entities[1].entity_type, "EMAIL_ADDRESS");
    assert_eq!(response.entities[1].text, "john@example.com");
}

#[tokio::test]
async fn test_entities_index_input_and_items_index_output() {
    let response = service()
        .anonymize(&AnonymizeRequest::new(SAMPLE, AnonymizationStrategy::Mask))
        .await
        .unwrap();

    for entity in &response.entities {
        assert!(entity.start < entity.end);
        assert_eq!(chars(SAMPLE, entity.start, entity.end), entity.text);
    }
    for item in &response.items {
        assert_eq!(chars(&response.text, item.start, item.end), item.text);
        assert_eq!(item.operator, AnonymizationStrategy::Mask);
    }
}

#[tokio::test]
async fn test_codepoint_offsets_with_multibyte_text() {
    let text = "Grüße an José – mail: jose@example.com";
    let response = service().analyze(&AnalyzeRequest::new(text)).await.unwrap();

    let email = response
        .entities
        .iter()
        .find(|e| e.entity_type == "EMAIL_ADDRESS")
        .unwrap();
    assert_eq!(email.text, "jose@example.com");
    assert_eq!(chars(text, email.start, email.end), "jose@example.com");
    assert_eq!(email.end, text.chars().count());
}

#[test_case(AnonymizationStrategy::Replace, "Mail EMAIL_ADDRESS" ; "replace")]
#[test_case(AnonymizationStrategy::Redact, "Mail [REDACTED]" ; "redact")]
#[test_case(AnonymizationStrategy::Mask, "Mail ********" ; "mask")]
#[tokio::test]
async fn test_strategy_output(strategy: AnonymizationStrategy, expected: &str) {
    let response = service()
        .anonymize(&AnonymizeRequest::new("Mail a@example.com", strategy))
        .await
        .unwrap();
    assert_eq!(response.text, expected);
}

#[tokio::test]
async fn test_hash_is_stable_per_key() {
    let service = service();
    let request = AnonymizeRequest::new("Mail a@example.com", AnonymizationStrategy::Hash);
    let first = service.anonymize(&request).await.unwrap();
    let second = service.anonymize(&request).await.unwrap();

    assert_eq!(first.text, second.text);
    let digest = first.text.trim_start_matches("Mail ");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_threshold_filters_low_scores() {
    let text = "Server 10.0.0.1 and mail a@example.com";
    let mut request = AnalyzeRequest::new(text);
    request.score_threshold = 0.9;

    let response = service().analyze(&request).await.unwrap();
    assert!(response.entities.iter().all(|e| e.score >= 0.9));
    assert!(response
        .entities
        .iter()
        .any(|e| e.entity_type == "EMAIL_ADDRESS"));
}

#[tokio::test]
async fn test_entity_filter() {
    let mut request = AnalyzeRequest::new(SAMPLE);
    request.entities = Some(vec!["EMAIL_ADDRESS".to_string()]);

    let response = service().analyze(&request).await.unwrap();
    assert_eq!(response.entities.len(), 1);
    assert_eq!(response.entities[0].entity_type, "EMAIL_ADDRESS");
}

#[tokio::test]
async fn test_unsupported_language_is_validation_error() {
    let mut request = AnalyzeRequest::new(SAMPLE);
    request.language = "xx".to_string();

    let err = service().analyze(&request).await.unwrap_err();
    assert!(matches!(err, PiiGuardError::Validation(_)));
}

#[tokio::test]
async fn test_checksum_validators() {
    let text = "Card 4111 1111 1111 1111, bad card 4111 1111 1111 1112, SSN 123-45-6789";
    let response = service().analyze(&AnalyzeRequest::new(text)).await.unwrap();

    let cards: Vec<&str> = response
        .entities
        .iter()
        .filter(|e| e.entity_type == "CREDIT_CARD")
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(cards, vec!["4111 1111 1111 1111"]);
    assert!(response
        .entities
        .iter()
        .any(|e| e.entity_type == "US_SSN" && e.text == "123-45-6789"));
}

#[tokio::test]
async fn test_per_entity_overrides() {
    let mut overrides = OperatorOverrides::new();
    let mut email = OperatorConfig::new(AnonymizationStrategy::Replace);
    email.new_value = Some("<email>".to_string());
    overrides.insert("EMAIL_ADDRESS".to_string(), email);

    let mut request = AnonymizeRequest::new(SAMPLE, AnonymizationStrategy::Redact);
    request.anonymizers = Some(overrides);

    let response = service().anonymize(&request).await.unwrap();
    assert_eq!(response.text, "Contact [REDACTED] at <email>");
}

#[tokio::test]
async fn test_encrypt_then_deanonymize_round_trip() {
    let service = service();
    let response = service
        .anonymize(&AnonymizeRequest::new(SAMPLE, AnonymizationStrategy::Encrypt))
        .await
        .unwrap();
    let key = response.encryption_key.clone().unwrap();
    assert!(!response.text.contains("john@example.com"));

    let restored = service
        .deanonymize(&DeanonymizeRequest {
            text: response.text.clone(),
            entities: response
                .items
                .iter()
                .map(|i| DeanonymizeEntity {
                    entity_type: i.entity_type.clone(),
                    start: i.start,
                    end: i.end,
                })
                .collect(),
            key,
        })
        .await
        .unwrap();
    assert_eq!(restored.text, SAMPLE);
}

#[tokio::test]
async fn test_deanonymize_with_wrong_key_fails() {
    let service = service();
    let mut request = AnonymizeRequest::new("Mail a@example.com", AnonymizationStrategy::Encrypt);
    request.encryption_key = Some("right-key".to_string());
    let response = service.anonymize(&request).await.unwrap();
    assert!(response.encryption_key.is_none());

    let item = &response.items[0];
    let result = service
        .deanonymize(&DeanonymizeRequest {
            text: response.text.clone(),
            entities: vec![DeanonymizeEntity {
                entity_type: item.entity_type.clone(),
                start: item.start,
                end: item.end,
            }],
            key: "wrong-key".to_string(),
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_text_has_no_entities() {
    let response = service()
        .anonymize(&AnonymizeRequest::new("", AnonymizationStrategy::Replace))
        .await
        .unwrap();
    assert_eq!(response.text, "");
    assert!(response.entities.is_empty());
    assert!(response.items.is_empty());
}
