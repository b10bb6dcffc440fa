//! Gemini provider
//!
//! Gemini has no system role and calls the assistant role "model", so the
//! history is re-shaped on the way in. JSON output is requested through the
//! response mime type; the caller still parses defensively.

use reqwest::Client as HttpClient;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{Message, Role},
    services::providers::GenerativeBackend,
};

const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone)]
pub struct GeminiBackend {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GeminiBackend {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(
        &self,
        system: &str,
        messages: &[Message],
        temperature: f32,
    ) -> AppResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, GEMINI_MODEL
        );

        let contents: Vec<Value> = messages
            .iter()
            .map(|message| {
                json!({
                    "role": match message.role {
                        Role::Assistant => "model",
                        Role::User => "user",
                    },
                    "parts": [{ "text": message.content }]
                })
            })
            .collect();

        let body = json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": contents,
            "generationConfig": {
                "temperature": temperature,
                "response_mime_type": "application/json"
            }
        });

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Upstream(format!(
                "Gemini API returned status {}",
                status
            )));
        }

        let data: Value = response.json().await?;
        data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::Upstream("Gemini returned no content".to_string()))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
