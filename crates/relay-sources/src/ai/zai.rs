//! Chat completions from chat.z.ai.
//!
//! A guest token is fetched first; the completion is requested as a stream
//! and its `data:` lines are folded into a single answer.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::validate;

pub const DEFAULT_MODEL: &str = "glm-4.5";
const FE_VERSION: &str = "prod-fe-1.0.52";

/// Public model names and the upstream ids they map to.
pub const MODELS: [(&str, &str); 7] = [
    ("glm-4.5", "0727-360B-API"),
    ("glm-4.5-air", "0727-106B-API"),
    ("glm-4-32b", "main_chat"),
    ("glm-4.1v-9b-thinking", "GLM-4.1V-Thinking-FlashX"),
    ("z1-rumination", "deep-research"),
    ("z1-32b", "zero"),
    ("glm-4-flash", "glm-4-flash"),
];

/// Looks up the upstream id for a public model name.
pub fn model_id(name: &str) -> Option<&'static str> {
    MODELS
        .iter()
        .find(|(public, _)| *public == name)
        .map(|(_, id)| *id)
}

#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub question: String,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub search: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct Auth {
    token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Zai {
    http: HttpClient,
    base: String,
}

impl Zai {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "zai", model = req.model.as_deref().unwrap_or(DEFAULT_MODEL)))]
    pub async fn chat(&self, req: &ChatRequest) -> Result<ChatAnswer> {
        let question = validate::non_empty(&req.question, "question")?;
        let model_name = req.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let model = model_id(model_name).ok_or_else(|| {
            let names: Vec<_> = MODELS.iter().map(|(n, _)| *n).collect();
            SourceError::invalid(format!("Available models: {}", names.join(", ")))
        })?;

        let (body, cookies) = self
            .http
            .text_with_cookies(self.http.get(format!("{}/api/v1/auths/", self.base)))
            .await?;
        let token = serde_json::from_str::<Auth>(&body)
            .map_err(|e| SourceError::parse(e.to_string()))?
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SourceError::upstream("zai", "guest token missing"))?;

        let mut messages = Vec::new();
        if let Some(system) = req.system_prompt.as_deref().filter(|s| !s.trim().is_empty()) {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": question }));

        let mut payload = json!({
            "messages": messages,
            "model": model,
            "chat_id": "local",
            "id": uuid::Uuid::new_v4().to_string(),
            "stream": true,
        });
        if req.search {
            payload["mcp_servers"] = json!(["deep-web-search"]);
        }

        let request = self
            .http
            .post(format!("{}/api/chat/completions", self.base))
            .header("authorization", format!("Bearer {}", token))
            .header("cookie", cookies)
            .header("x-fe-version", FE_VERSION)
            .json(&payload);
        let stream = self.http.text(request).await?;

        let text = collect_stream(&stream);
        debug!(chars = text.len(), "Completion received");
        if text.is_empty() {
            return Err(SourceError::upstream("zai", "empty completion"));
        }
        Ok(ChatAnswer { text })
    }
}

/// Joins `delta_content` of every answer event, skipping reasoning.
fn collect_stream(stream: &str) -> String {
    stream
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .filter(|data| !data.is_empty() && *data != "[DONE]")
        .filter_map(|data| serde_json::from_str::<Value>(data).ok())
        .filter(|event| event.pointer("/data/phase").and_then(Value::as_str) != Some("thinking"))
        .filter_map(|event| {
            event
                .pointer("/data/delta_content")
                .and_then(Value::as_str)
                .map(String::from)
        })
        .collect()
}
