//! Remote analyzer/anonymizer client
//!
//! Speaks the Presidio REST contract. Requests are never retried; a failed
//! call fails the caller's request.

use super::models::{
    AnalyzerRequest, AnalyzerResult, AnonymizerItem, AnonymizerRequest, AnonymizerResponse,
    AnonymizerSpan, DeanonymizerRequest, RemoteOperator,
};
use crate::adapters::engine::AnonymizationBackend;
use crate::anonymization::anonymizer::generated_key_in;
use crate::anonymization::config::{
    resolve_operator, AnonymizationStrategy, OperatorConfig, DEFAULT_OPERATOR_KEY,
};
use crate::anonymization::engine::{DeanonymizeOutcome, ReplacementOutcome};
use crate::anonymization::models::{
    AnalyzeRequest, AnonymizeRequest, CharIndex, DeanonymizeRequest, EngineInfo, EntitySpan,
    ReplacedItem, DEFAULT_SCORE_THRESHOLD,
};
use crate::config::{RemoteEngineConfig, SecretString};
use crate::domain::{PiiGuardError, RemoteError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Engine name reported for the remote backend
pub const REMOTE_ENGINE_NAME: &str = "presidio-external";

/// Remote engine version reported by the info endpoints
pub const REMOTE_ENGINE_VERSION: &str = "2.2.33";

/// Fixed timeout for every remote call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Entity types advertised for the remote engine
const REMOTE_ENTITIES: [&str; 17] = [
    "PERSON",
    "EMAIL_ADDRESS",
    "PHONE_NUMBER",
    "CREDIT_CARD",
    "US_SSN",
    "US_PASSPORT",
    "US_DRIVER_LICENSE",
    "US_BANK_NUMBER",
    "IBAN_CODE",
    "IP_ADDRESS",
    "URL",
    "LOCATION",
    "DATE_TIME",
    "NRP",
    "MEDICAL_LICENSE",
    "CRYPTO",
    "UK_NHS",
];

/// Client for a Presidio-compatible analyzer and anonymizer pair
pub struct PresidioClient {
    analyzer_url: String,
    analyzer_api_key: Option<SecretString>,
    anonymizer_url: String,
    anonymizer_api_key: Option<SecretString>,
    client: Client,
}

impl PresidioClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns [`PiiGuardError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &RemoteEngineConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                PiiGuardError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            analyzer_url: config.analyzer_url.trim_end_matches('/').to_string(),
            analyzer_api_key: config.analyzer_api_key.clone(),
            anonymizer_url: config.anonymizer_url.trim_end_matches('/').to_string(),
            anonymizer_api_key: config.anonymizer_api_key.clone(),
            client,
        })
    }

    fn with_auth(request: RequestBuilder, api_key: Option<&SecretString>) -> RequestBuilder {
        match api_key {
            Some(key) if !key.expose_secret().is_empty() => {
                request.bearer_auth(key.expose_secret().as_str())
            }
            _ => request,
        }
    }

    /// POST `body` as JSON and decode the JSON reply
    async fn post_json<B, T>(&self, url: &str, api_key: Option<&SecretString>, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = Self::with_auth(self.client.post(url).json(body), api_key);
        let response = request.send().await.map_err(RemoteError::from)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let err = if status.is_server_error() {
                RemoteError::ServerError {
                    status: status.as_u16(),
                    message,
                }
            } else {
                RemoteError::ClientError {
                    status: status.as_u16(),
                    message,
                }
            };
            return Err(err.into());
        }

        let body = response.text().await.map_err(RemoteError::from)?;
        serde_json::from_str(&body).map_err(|e| {
            PiiGuardError::Remote(RemoteError::InvalidResponse(format!(
                "Failed to parse response from {url}: {e}"
            )))
        })
    }

    /// GET `{base}/health`
    async fn probe(&self, base: &str, api_key: Option<&SecretString>) -> Result<()> {
        let url = format!("{base}/health");
        let response = Self::with_auth(self.client.get(&url), api_key)
            .send()
            .await
            .map_err(RemoteError::from)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::ServerError {
                status: status.as_u16(),
                message: format!("Health probe {url} failed"),
            }
            .into())
        }
    }

    /// Operators to send with an anonymize call, or `None` when nothing needs sending
    ///
    /// The remote `replace` default is `<TYPE>`, so every detected type that
    /// resolves to a bare replacement gets its label sent as `new_value`.
    /// Returns the key generated for `encrypt` when the caller supplied none.
    fn remote_operators(
        request: &AnonymizeRequest,
        entities: &[EntitySpan],
    ) -> Result<(Option<HashMap<String, RemoteOperator>>, Option<String>)> {
        let overrides = request.anonymizers.as_ref();
        let mut generated_key = None;
        let mut key_for = |op: &mut OperatorConfig| -> Result<()> {
            if op.strategy == AnonymizationStrategy::Encrypt && op.key.is_none() {
                op.key = Some(match request.encryption_key {
                    Some(ref key) => key.clone(),
                    None => generated_key_in(&mut generated_key)?,
                });
            }
            Ok(())
        };

        let mut operators = HashMap::new();
        if request.anonymization_mode != AnonymizationStrategy::Replace
            || overrides.is_some_and(|o| !o.is_empty())
        {
            let mut default_op =
                resolve_operator(request.anonymization_mode, overrides, DEFAULT_OPERATOR_KEY);
            key_for(&mut default_op)?;
            operators.insert(
                DEFAULT_OPERATOR_KEY.to_string(),
                RemoteOperator::from_operator(&default_op),
            );

            for (entity_type, op) in overrides.into_iter().flatten() {
                if entity_type == DEFAULT_OPERATOR_KEY {
                    continue;
                }
                let mut op = op.clone();
                key_for(&mut op)?;
                operators.insert(entity_type.clone(), RemoteOperator::from_operator(&op));
            }
        }

        for span in entities {
            let op = resolve_operator(request.anonymization_mode, overrides, &span.entity_type);
            if op.strategy == AnonymizationStrategy::Replace && op.new_value.is_none() {
                operators.insert(
                    span.entity_type.clone(),
                    RemoteOperator::label(&span.entity_type),
                );
            }
        }

        Ok(((!operators.is_empty()).then_some(operators), generated_key))
    }

    fn items_from_remote(
        items: Vec<AnonymizerItem>,
        fallback: impl Fn(&str) -> AnonymizationStrategy,
    ) -> Vec<ReplacedItem> {
        let mut items: Vec<ReplacedItem> = items
            .into_iter()
            .map(|item| {
                let operator = parse_operator(&item.operator)
                    .unwrap_or_else(|| fallback(&item.entity_type));
                ReplacedItem {
                    entity_type: item.entity_type,
                    start: item.start,
                    end: item.end,
                    text: item.text,
                    operator,
                }
            })
            .collect();
        items.sort_by_key(|i| i.start);
        items
    }
}

fn parse_operator(name: &str) -> Option<AnonymizationStrategy> {
    AnonymizationStrategy::all()
        .into_iter()
        .find(|s| s.as_str() == name)
}

#[async_trait]
impl AnonymizationBackend for PresidioClient {
    fn name(&self) -> &str {
        "remote"
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<EntitySpan>> {
        let url = format!("{}/analyze", self.analyzer_url);
        let body = AnalyzerRequest {
            text: &request.text,
            language: &request.language,
            entities: request.entity_filter(),
            score_threshold: (request.score_threshold != DEFAULT_SCORE_THRESHOLD)
                .then_some(request.score_threshold),
        };

        tracing::debug!(url = %url, text_len = request.text.len(), "Calling remote analyzer");
        let results: Vec<AnalyzerResult> = self
            .post_json(&url, self.analyzer_api_key.as_ref(), &body)
            .await?;

        let index = CharIndex::new(&request.text);
        let mut spans = Vec::with_capacity(results.len());
        for result in results {
            let text = index.slice(result.start, result.end).ok_or_else(|| {
                PiiGuardError::Remote(RemoteError::InvalidResponse(format!(
                    "{} span [{}, {}) is outside the text (length {})",
                    result.entity_type,
                    result.start,
                    result.end,
                    index.char_len()
                )))
            })?;
            if result.start >= result.end {
                return Err(RemoteError::InvalidResponse(format!(
                    "{} span [{}, {}) is empty",
                    result.entity_type, result.start, result.end
                ))
                .into());
            }
            if result.score < request.score_threshold {
                continue;
            }
            spans.push(EntitySpan::new(
                result.entity_type,
                result.start,
                result.end,
                text,
                result.score,
            ));
        }

        Ok(spans)
    }

    async fn anonymize(
        &self,
        request: &AnonymizeRequest,
        entities: &[EntitySpan],
    ) -> Result<ReplacementOutcome> {
        let started = Instant::now();
        let url = format!("{}/anonymize", self.anonymizer_url);
        let (anonymizers, generated_key) = Self::remote_operators(request, entities)?;

        let body = AnonymizerRequest {
            text: &request.text,
            analyzer_results: entities
                .iter()
                .map(|e| AnonymizerSpan {
                    entity_type: &e.entity_type,
                    start: e.start,
                    end: e.end,
                    score: Some(e.score),
                })
                .collect(),
            anonymizers,
        };

        tracing::debug!(url = %url, spans = entities.len(), "Calling remote anonymizer");
        let response: AnonymizerResponse = self
            .post_json(&url, self.anonymizer_api_key.as_ref(), &body)
            .await?;

        let items = Self::items_from_remote(response.items, |entity_type| {
            resolve_operator(
                request.anonymization_mode,
                request.anonymizers.as_ref(),
                entity_type,
            )
            .strategy
        });

        Ok(ReplacementOutcome {
            text: response.text,
            items,
            elapsed: started.elapsed(),
            generated_key,
        })
    }

    async fn deanonymize(&self, request: &DeanonymizeRequest) -> Result<DeanonymizeOutcome> {
        let url = format!("{}/deanonymize", self.anonymizer_url);
        let mut deanonymizers = HashMap::new();
        deanonymizers.insert(
            DEFAULT_OPERATOR_KEY.to_string(),
            RemoteOperator::decrypt(&request.key),
        );

        let body = DeanonymizerRequest {
            text: &request.text,
            anonymizer_results: request
                .entities
                .iter()
                .map(|e| AnonymizerSpan {
                    entity_type: &e.entity_type,
                    start: e.start,
                    end: e.end,
                    score: None,
                })
                .collect(),
            deanonymizers,
        };

        let response: AnonymizerResponse = self
            .post_json(&url, self.anonymizer_api_key.as_ref(), &body)
            .await?;

        Ok(DeanonymizeOutcome {
            text: response.text,
            items: Self::items_from_remote(response.items, |_| AnonymizationStrategy::Encrypt),
        })
    }

    async fn engine_info(&self) -> Result<EngineInfo> {
        Ok(EngineInfo {
            name: REMOTE_ENGINE_NAME.to_string(),
            version: REMOTE_ENGINE_VERSION.to_string(),
            supported_entities: REMOTE_ENTITIES.iter().map(|e| e.to_string()).collect(),
            supported_languages: vec!["en".to_string()],
        })
    }

    async fn health_check(&self) -> Result<()> {
        self.probe(&self.analyzer_url, self.analyzer_api_key.as_ref())
            .await?;
        self.probe(&self.anonymizer_url, self.anonymizer_api_key.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::OperatorOverrides;

    fn spans() -> Vec<EntitySpan> {
        vec![
            EntitySpan::new("PERSON", 8, 16, "John Doe", 0.85),
            EntitySpan::new("EMAIL_ADDRESS", 20, 36, "john@example.com", 1.0),
        ]
    }

    #[test]
    fn test_replace_without_spans_sends_no_operators() {
        let request = AnonymizeRequest::new("hi", AnonymizationStrategy::Replace);
        let (operators, key) = PresidioClient::remote_operators(&request, &[]).unwrap();
        assert!(operators.is_none());
        assert!(key.is_none());
    }

    #[test]
    fn test_replace_sends_bare_labels_per_type() {
        let request = AnonymizeRequest::new("hi", AnonymizationStrategy::Replace);
        let (operators, _) = PresidioClient::remote_operators(&request, &spans()).unwrap();
        let operators = operators.unwrap();
        assert_eq!(operators.len(), 2);
        assert_eq!(operators["PERSON"].kind, "replace");
        assert_eq!(operators["PERSON"].new_value.as_deref(), Some("PERSON"));
        assert_eq!(
            operators["EMAIL_ADDRESS"].new_value.as_deref(),
            Some("EMAIL_ADDRESS")
        );
    }

    #[test]
    fn test_replace_override_with_value_kept() {
        let mut request = AnonymizeRequest::new("hi", AnonymizationStrategy::Mask);
        let mut overrides = OperatorOverrides::new();
        let mut named = OperatorConfig::new(AnonymizationStrategy::Replace);
        named.new_value = Some("someone".to_string());
        overrides.insert("PERSON".to_string(), named);
        overrides.insert(
            "EMAIL_ADDRESS".to_string(),
            OperatorConfig::new(AnonymizationStrategy::Replace),
        );
        request.anonymizers = Some(overrides);

        let (operators, _) = PresidioClient::remote_operators(&request, &spans()).unwrap();
        let operators = operators.unwrap();
        assert_eq!(operators["DEFAULT"].kind, "mask");
        assert_eq!(operators["PERSON"].new_value.as_deref(), Some("someone"));
        assert_eq!(
            operators["EMAIL_ADDRESS"].new_value.as_deref(),
            Some("EMAIL_ADDRESS")
        );
    }

    #[test]
    fn test_encrypt_without_key_generates_one() {
        let request = AnonymizeRequest::new("hi", AnonymizationStrategy::Encrypt);
        let (operators, key) = PresidioClient::remote_operators(&request, &spans()).unwrap();
        let operators = operators.unwrap();
        let key = key.unwrap();
        assert_eq!(operators["DEFAULT"].kind, "encrypt");
        assert_eq!(operators["DEFAULT"].key.as_deref(), Some(key.as_str()));
        assert!(!operators.contains_key("PERSON"));
    }

    #[test]
    fn test_overrides_forwarded() {
        let mut request = AnonymizeRequest::new("hi", AnonymizationStrategy::Hash);
        let mut overrides = OperatorOverrides::new();
        overrides.insert(
            "PERSON".to_string(),
            OperatorConfig::new(AnonymizationStrategy::Redact),
        );
        request.anonymizers = Some(overrides);

        let (operators, _) = PresidioClient::remote_operators(&request, &spans()).unwrap();
        let operators = operators.unwrap();
        assert_eq!(operators["DEFAULT"].kind, "hash");
        assert_eq!(operators["PERSON"].kind, "replace");
        assert_eq!(operators["PERSON"].new_value.as_deref(), Some("[REDACTED]"));
    }

    #[test]
    fn test_parse_operator() {
        assert_eq!(parse_operator("mask"), Some(AnonymizationStrategy::Mask));
        assert_eq!(parse_operator("custom"), None);
    }
}
