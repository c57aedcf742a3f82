//! Plan adapters: one capability object per LLM backend.
//!
//! Uses enum dispatch instead of trait objects because async methods
//! are not dyn-compatible. Each adapter reads its credentials and host
//! from the environment exactly once, at construction — the rest of the
//! crate never touches `std::env`.
//!
//! The chain order is fixed: `openai-responses`, then
//! `bedrock-converse`, then `ollama`. An adapter with missing
//! configuration reports `is_enabled() == false` and is skipped.

use hearth_types::enums::PlanScope;
use hearth_types::plan::PlanItem;

use crate::error::PlanError;

/// Rationale attached to items produced by a provider.
const LLM_RATIONALE: &str = "llm_plan";

/// Sampling temperature used by every provider.
const PLAN_TEMPERATURE: f64 = 0.4;

/// Output token cap for the OpenAI Responses call.
const MAX_OUTPUT_TOKENS: u32 = 500;

/// An LLM backend that can turn a prompt into plan items.
pub enum PlanAdapter {
    /// OpenAI Responses API.
    OpenAiResponses(OpenAiResponsesAdapter),
    /// Amazon Bedrock converse-style proxy.
    BedrockConverse(BedrockConverseAdapter),
    /// Local Ollama instance.
    Ollama(OllamaAdapter),
}

impl PlanAdapter {
    /// Build the full adapter chain from the environment, in fallback
    /// order.
    pub fn discover() -> Vec<Self> {
        vec![
            Self::OpenAiResponses(OpenAiResponsesAdapter::from_env()),
            Self::BedrockConverse(BedrockConverseAdapter::from_env()),
            Self::Ollama(OllamaAdapter::from_env()),
        ]
    }

    /// Provider key for logging and plan item attribution.
    pub const fn provider(&self) -> &'static str {
        match self {
            Self::OpenAiResponses(_) => "openai-responses",
            Self::BedrockConverse(_) => "bedrock-converse",
            Self::Ollama(_) => "ollama",
        }
    }

    /// Whether this adapter has the configuration it needs.
    pub const fn is_enabled(&self) -> bool {
        match self {
            Self::OpenAiResponses(adapter) => adapter.api_key.is_some(),
            Self::BedrockConverse(adapter) => {
                adapter.url.is_some() && adapter.model.is_some()
            }
            Self::Ollama(adapter) => adapter.host.is_some(),
        }
    }

    /// Send the prompt to the backend and wrap its answer in plan items.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] if the adapter is not enabled, the HTTP
    /// call fails, or the response carries no text.
    pub async fn generate_plan(&self, prompt: &str) -> Result<Vec<PlanItem>, PlanError> {
        let text = match self {
            Self::OpenAiResponses(adapter) => adapter.complete(prompt).await?,
            Self::BedrockConverse(adapter) => adapter.complete(prompt).await?,
            Self::Ollama(adapter) => adapter.complete(prompt).await?,
        };
        Ok(vec![PlanItem {
            scope: PlanScope::Group,
            intent: text,
            rationale: String::from(LLM_RATIONALE),
            provider: String::from(self.provider()),
        }])
    }
}

// ---------------------------------------------------------------------------
// OpenAI Responses API
// ---------------------------------------------------------------------------

/// Adapter for the OpenAI Responses API (`POST /v1/responses`).
pub struct OpenAiResponsesAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiResponsesAdapter {
    /// Construct from explicit values (tests and embedding).
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    /// Construct from `OPENAI_API_KEY` and `OPENAI_RESPONSES_MODEL`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("OPENAI_RESPONSES_MODEL")
                .unwrap_or_else(|_| String::from("gpt-4o-mini")),
            String::from("https://api.openai.com"),
        )
    }

    /// Send the prompt and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String, PlanError> {
        const PROVIDER: &str = "openai-responses";
        let api_key = self.api_key.as_ref().ok_or(PlanError::Transport {
            provider: PROVIDER,
            message: String::from("adapter not enabled"),
        })?;

        let url = format!("{}/v1/responses", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "input": prompt,
            "temperature": PLAN_TEMPERATURE,
            "max_output_tokens": MAX_OUTPUT_TOKENS,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| PlanError::Transport {
                provider: PROVIDER,
                message: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unable to read error body"));
            return Err(PlanError::Transport {
                provider: PROVIDER,
                message: format!("returned {status}: {error_body}"),
            });
        }

        let json: serde_json::Value =
            response.json().await.map_err(|e| PlanError::Transport {
                provider: PROVIDER,
                message: format!("response parse failed: {e}"),
            })?;

        extract_openai_output_text(&json)
    }
}

/// Extract the plan text from an OpenAI Responses API reply.
///
/// Prefers the `output_text` convenience field, falling back to the
/// first text block of the first output item.
fn extract_openai_output_text(json: &serde_json::Value) -> Result<String, PlanError> {
    if let Some(text) = json.get("output_text").and_then(serde_json::Value::as_str) {
        return Ok(text.to_owned());
    }
    json.get("output")
        .and_then(|output| output.get(0))
        .and_then(|item| item.get("content"))
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(PlanError::MissingContent {
            provider: "openai-responses",
        })
}

// ---------------------------------------------------------------------------
// Bedrock converse proxy
// ---------------------------------------------------------------------------

/// Adapter for a Bedrock converse-style HTTP proxy.
///
/// The proxy accepts `{modelId, inputText}` and optionally requires an
/// `Authorization` header supplied via `BEDROCK_CONVERSE_AUTH`.
pub struct BedrockConverseAdapter {
    client: reqwest::Client,
    url: Option<String>,
    model: Option<String>,
    auth: Option<String>,
}

impl BedrockConverseAdapter {
    /// Construct from explicit values (tests and embedding).
    pub fn new(url: Option<String>, model: Option<String>, auth: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            model,
            auth,
        }
    }

    /// Construct from `BEDROCK_CONVERSE_URL`, `BEDROCK_CONVERSE_MODEL`,
    /// and `BEDROCK_CONVERSE_AUTH`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("BEDROCK_CONVERSE_URL").ok(),
            std::env::var("BEDROCK_CONVERSE_MODEL").ok(),
            std::env::var("BEDROCK_CONVERSE_AUTH").ok(),
        )
    }

    /// Send the prompt and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String, PlanError> {
        const PROVIDER: &str = "bedrock-converse";
        let (Some(url), Some(model)) = (self.url.as_ref(), self.model.as_ref()) else {
            return Err(PlanError::Transport {
                provider: PROVIDER,
                message: String::from("adapter not enabled"),
            });
        };

        let body = serde_json::json!({
            "modelId": model,
            "inputText": prompt,
        });

        let mut request = self.client.post(url).json(&body);
        if let Some(auth) = &self.auth {
            request = request.header("Authorization", auth);
        }

        let response = request.send().await.map_err(|e| PlanError::Transport {
            provider: PROVIDER,
            message: format!("request failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unable to read error body"));
            return Err(PlanError::Transport {
                provider: PROVIDER,
                message: format!("returned {status}: {error_body}"),
            });
        }

        let json: serde_json::Value =
            response.json().await.map_err(|e| PlanError::Transport {
                provider: PROVIDER,
                message: format!("response parse failed: {e}"),
            })?;

        extract_bedrock_text(&json)
    }
}

/// Extract the plan text from a converse-proxy reply.
///
/// Accepts the converse shape (`output.message.content[0].text`), the
/// Titan text shape (`results[0].outputText`), and a bare `outputText`.
fn extract_bedrock_text(json: &serde_json::Value) -> Result<String, PlanError> {
    let converse = json
        .get("output")
        .and_then(|output| output.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(serde_json::Value::as_str);
    if let Some(text) = converse {
        return Ok(text.to_owned());
    }

    let titan = json
        .get("results")
        .and_then(|results| results.get(0))
        .and_then(|result| result.get("outputText"))
        .and_then(serde_json::Value::as_str);
    if let Some(text) = titan {
        return Ok(text.to_owned());
    }

    json.get("outputText")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(PlanError::MissingContent {
            provider: "bedrock-converse",
        })
}

// ---------------------------------------------------------------------------
// Ollama
// ---------------------------------------------------------------------------

/// Adapter for a local Ollama instance (`POST {host}/api/generate`).
pub struct OllamaAdapter {
    client: reqwest::Client,
    host: Option<String>,
    model: String,
}

impl OllamaAdapter {
    /// Construct from explicit values (tests and embedding).
    pub fn new(host: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            host,
            model,
        }
    }

    /// Construct from `OLLAMA_HOST` and `OLLAMA_PLAN_MODEL`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("OLLAMA_HOST").ok(),
            std::env::var("OLLAMA_PLAN_MODEL").unwrap_or_else(|_| String::from("llama3")),
        )
    }

    /// Send the prompt and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String, PlanError> {
        const PROVIDER: &str = "ollama";
        let host = self.host.as_ref().ok_or(PlanError::Transport {
            provider: PROVIDER,
            message: String::from("adapter not enabled"),
        })?;

        let url = format!("{host}/api/generate");
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": PLAN_TEMPERATURE },
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlanError::Transport {
                provider: PROVIDER,
                message: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unable to read error body"));
            return Err(PlanError::Transport {
                provider: PROVIDER,
                message: format!("returned {status}: {error_body}"),
            });
        }

        let json: serde_json::Value =
            response.json().await.map_err(|e| PlanError::Transport {
                provider: PROVIDER,
                message: format!("response parse failed: {e}"),
            })?;

        json.get("response")
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or(PlanError::MissingContent { provider: PROVIDER })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disabled_chain() -> Vec<PlanAdapter> {
        vec![
            PlanAdapter::OpenAiResponses(OpenAiResponsesAdapter::new(
                None,
                String::from("gpt-4o-mini"),
                String::from("https://api.openai.com"),
            )),
            PlanAdapter::BedrockConverse(BedrockConverseAdapter::new(None, None, None)),
            PlanAdapter::Ollama(OllamaAdapter::new(None, String::from("llama3"))),
        ]
    }

    #[test]
    fn chain_order_is_fixed() {
        let chain = disabled_chain();
        let providers: Vec<&str> = chain.iter().map(PlanAdapter::provider).collect();
        assert_eq!(
            providers,
            vec!["openai-responses", "bedrock-converse", "ollama"]
        );
    }

    #[test]
    fn adapters_without_config_are_disabled() {
        for adapter in disabled_chain() {
            assert!(!adapter.is_enabled(), "{} should be disabled", adapter.provider());
        }
    }

    #[test]
    fn adapters_with_config_are_enabled() {
        let openai = PlanAdapter::OpenAiResponses(OpenAiResponsesAdapter::new(
            Some(String::from("sk-test")),
            String::from("gpt-4o-mini"),
            String::from("https://api.openai.com"),
        ));
        assert!(openai.is_enabled());

        let bedrock = PlanAdapter::BedrockConverse(BedrockConverseAdapter::new(
            Some(String::from("https://proxy.example/converse")),
            Some(String::from("amazon.titan-text-express-v1")),
            None,
        ));
        assert!(bedrock.is_enabled());

        let ollama = PlanAdapter::Ollama(OllamaAdapter::new(
            Some(String::from("http://localhost:11434")),
            String::from("llama3"),
        ));
        assert!(ollama.is_enabled());
    }

    #[test]
    fn bedrock_needs_both_url_and_model() {
        let url_only = PlanAdapter::BedrockConverse(BedrockConverseAdapter::new(
            Some(String::from("https://proxy.example")),
            None,
            None,
        ));
        assert!(!url_only.is_enabled());
    }

    #[test]
    fn extract_openai_prefers_output_text() {
        let json = serde_json::json!({
            "output_text": "gather first, hunt second",
            "output": [{"content": [{"type": "output_text", "text": "ignored"}]}]
        });
        assert_eq!(
            extract_openai_output_text(&json).ok(),
            Some(String::from("gather first, hunt second"))
        );
    }

    #[test]
    fn extract_openai_falls_back_to_output_blocks() {
        let json = serde_json::json!({
            "output": [{"content": [{"type": "output_text", "text": "from blocks"}]}]
        });
        assert_eq!(
            extract_openai_output_text(&json).ok(),
            Some(String::from("from blocks"))
        );
    }

    #[test]
    fn extract_openai_missing_is_error() {
        let json = serde_json::json!({"error": "rate_limit"});
        assert!(extract_openai_output_text(&json).is_err());
    }

    #[test]
    fn extract_bedrock_accepts_converse_shape() {
        let json = serde_json::json!({
            "output": {"message": {"content": [{"text": "plan text"}]}}
        });
        assert_eq!(
            extract_bedrock_text(&json).ok(),
            Some(String::from("plan text"))
        );
    }

    #[test]
    fn extract_bedrock_accepts_titan_shape() {
        let json = serde_json::json!({
            "results": [{"outputText": "titan plan"}]
        });
        assert_eq!(
            extract_bedrock_text(&json).ok(),
            Some(String::from("titan plan"))
        );
    }

    #[test]
    fn extract_bedrock_missing_is_error() {
        let json = serde_json::json!({"results": []});
        assert!(extract_bedrock_text(&json).is_err());
    }

    #[tokio::test]
    async fn disabled_adapter_reports_transport_error() {
        let adapter = PlanAdapter::Ollama(OllamaAdapter::new(None, String::from("llama3")));
        let result = adapter.generate_plan("prompt").await;
        assert!(matches!(result, Err(PlanError::Transport { .. })));
    }
}
