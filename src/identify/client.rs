use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::capture::CapturedPhoto;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_MODEL: &str = "llama3.2-vision";

/// Model stays loaded for 5 minutes after the last request
const DEFAULT_KEEP_ALIVE: &str = "5m";

/// Vision models are slow on CPU-only hosts, allow plenty of time
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Instruction sent with the two coin photos. The reply must be a
/// single JSON object so the payload extractor can find it.
const IDENTIFY_PROMPT: &str = r#"You are a numismatics expert. The two attached photos show the front and back of one physical coin. Identify and appraise it.

Respond with a single JSON object and nothing else, using exactly these keys:
{
  "name": "common collector name of the coin",
  "year": 1921,
  "country": "country of origin",
  "denomination": "face value, e.g. 1 Dollar",
  "estimatedValue": 42.50,
  "composition": "metals, primary first, e.g. Silver / Copper",
  "description": "two or three sentences about the coin",
  "conditionEstimate": "e.g. Good, Fine, Very Fine, Uncirculated",
  "isRare": false,
  "rarityDetails": "why it is rare, empty string if it is not",
  "sources": ["https://reference-urls-if-known"]
}

If the year cannot be read, use null. estimatedValue is a plain number in US dollars."#;

/// Identification failures, all retryable from the add wizard
#[derive(Debug, Clone, Error)]
pub enum IdentifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Identification service returned HTTP {0}")]
    Api(u16),

    #[error("No identification payload found in the model reply")]
    NoPayload,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    format: String,
    keep_alive: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Client for the AI vision service that identifies coins.
///
/// Talks to an Ollama-compatible chat endpoint running a vision model.
/// Endpoint and model can be overridden through the environment.
#[derive(Clone)]
pub struct IdentifyClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl IdentifyClient {
    /// Create a client from COIN_CATALOG_OLLAMA_URL and
    /// COIN_CATALOG_MODEL, falling back to a local Ollama instance.
    pub fn from_env() -> Self {
        let base_url = std::env::var("COIN_CATALOG_OLLAMA_URL")
            .unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let model =
            std::env::var("COIN_CATALOG_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        IdentifyClient {
            http_client,
            base_url,
            model,
        }
    }

    /// Identify a coin from photos of its two faces.
    ///
    /// Returns the JSON payload the model produced; the caller runs it
    /// through the record normalizer, which tolerates missing or
    /// oddly-typed fields. Exactly one outcome is delivered per call.
    pub async fn identify(
        &self,
        front: &CapturedPhoto,
        back: &CapturedPhoto,
    ) -> Result<Value, IdentifyError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: IDENTIFY_PROMPT.to_string(),
                images: Some(vec![BASE64.encode(&front.jpeg), BASE64.encode(&back.jpeg)]),
            }],
            stream: false,
            format: "json".to_string(),
            keep_alive: DEFAULT_KEEP_ALIVE.to_string(),
        };

        let url = format!("{}/api/chat", self.base_url);
        println!("🔍 Identifying coin via {} ({})", url, self.model);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| IdentifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentifyError::Api(status.as_u16()));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| IdentifyError::Network(e.to_string()))?;

        extract_payload(&chat.message.content)
    }
}

/// Pull the identification JSON object out of the model reply.
///
/// Replies are requested in JSON format but models still wrap the
/// object in prose now and then, so fall back to the substring between
/// the first '{' and the last '}'. Only total absence of an object is
/// a failure.
pub fn extract_payload(text: &str) -> Result<Value, IdentifyError> {
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    let start = text.find('{').ok_or(IdentifyError::NoPayload)?;
    let end = text.rfind('}').ok_or(IdentifyError::NoPayload)?;
    if end <= start {
        return Err(IdentifyError::NoPayload);
    }

    serde_json::from_str::<Value>(&text[start..=end]).map_err(|_| IdentifyError::NoPayload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_json() {
        let payload = extract_payload(r#"{"name": "Morgan Dollar", "year": 1921}"#).unwrap();
        assert_eq!(payload["name"], "Morgan Dollar");
        assert_eq!(payload["year"], 1921);
    }

    #[test]
    fn test_extract_json_wrapped_in_prose() {
        let reply = "Sure! Here is the identification:\n{\"name\": \"Sovereign\", \"isRare\": true}\nLet me know if you need more.";
        let payload = extract_payload(reply).unwrap();
        assert_eq!(payload["name"], "Sovereign");
        assert_eq!(payload["isRare"], true);
    }

    #[test]
    fn test_extract_fails_without_payload() {
        assert!(matches!(
            extract_payload("I could not identify this coin."),
            Err(IdentifyError::NoPayload)
        ));
        assert!(matches!(extract_payload(""), Err(IdentifyError::NoPayload)));
        assert!(matches!(
            extract_payload("} backwards {"),
            Err(IdentifyError::NoPayload)
        ));
    }

    #[test]
    fn test_extract_tolerates_nested_braces() {
        let reply = r#"Result: {"name": "Thaler", "details": {"mint": "Vienna"}} done"#;
        let payload = extract_payload(reply).unwrap();
        assert_eq!(payload["details"]["mint"], "Vienna");
    }
}
