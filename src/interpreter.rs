use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Filters;

/// Turns a free-text shopping sentence into a validated filter set. The
/// live implementation talks to an external language model; tests plug in
/// deterministic stubs.
#[async_trait]
pub trait SentenceInterpreter: Send + Sync {
    async fn interpret(&self, sentence: &str) -> Result<Filters>;
}

const INSTRUCTION: &str = "Extract search parameters from the user's sentence. \
Convert all lengths to centimetres, as integers, and put them into the output. \
Leave every field the user did not specify unset. \
If the user names a specific product or brand, put it into product_name prefixed \
with its category noun: 'Give me sofas named JENNY' becomes product_name 'sofas JENNY'. \
For material, shape, style, textile and pattern pick only values from the allowed \
enumerations, matching descriptive words to the closest value. \
If a color is given, pattern must stay unset.";

/// Schema-constrained chat completion against the OpenRouter API.
pub struct OpenRouterInterpreter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    refusal: Option<String>,
}

impl OpenRouterInterpreter {
    pub fn new(client: reqwest::Client, api_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    /// The filter model's JSON schema, handed to the model so its output
    /// cannot leave the contract.
    fn response_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Filters)).unwrap_or_else(|_| json!({"type": "object"}))
    }
}

#[async_trait]
impl SentenceInterpreter for OpenRouterInterpreter {
    async fn interpret(&self, sentence: &str) -> Result<Filters> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": INSTRUCTION},
                {"role": "user", "content": sentence},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "filters",
                    "strict": true,
                    "schema": Self::response_schema(),
                },
            },
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let completion: ChatCompletion = response.json().await?;
        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| Error::Normalization("completion carried no choices".to_string()))?;

        if let Some(refusal) = message.refusal.filter(|text| !text.is_empty()) {
            return Err(Error::InterpretationRefused(refusal));
        }

        let content = message
            .content
            .ok_or_else(|| Error::Normalization("completion carried no content".to_string()))?;
        debug!("Model output: {}", content);

        let filters: Filters = serde_json::from_str(&content)
            .map_err(|e| Error::Validation(format!("model output does not match the filter schema: {e}")))?;
        filters.validated()
    }
}
