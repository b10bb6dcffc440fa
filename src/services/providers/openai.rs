//! OpenAI provider

use reqwest::Client as HttpClient;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{Message, Role},
    services::providers::GenerativeBackend,
};

const OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct OpenAiBackend {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for OpenAiBackend {
    async fn generate(
        &self,
        system: &str,
        messages: &[Message],
        temperature: f32,
    ) -> AppResult<String> {
        let url = format!("{}/v1/chat/completions", self.api_url);

        let mut chat_messages = vec![json!({ "role": "system", "content": system })];
        chat_messages.extend(messages.iter().map(|message| {
            json!({
                "role": match message.role {
                    Role::Assistant => "assistant",
                    Role::User => "user",
                },
                "content": message.content
            })
        }));

        let body = json!({
            "model": OPENAI_MODEL,
            "messages": chat_messages,
            "temperature": temperature
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Upstream(format!(
                "OpenAI API returned status {}",
                status
            )));
        }

        let data: Value = response.json().await?;
        data["choices"][0]["message"]["content"]
            .as_str()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::Upstream("OpenAI returned no content".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
