//! Client for the hosted text-generation endpoint used by the multiple-choice playbook.
//!
//! One POST per call, `{inputs, parameters}` in, `[{generated_text}]` out. The whole exchange
//! (send + body read) runs under a deadline; on expiry the future is dropped, which aborts the
//! in-flight request. No retries here, the caller decides what to do on failure.
//!
//! NOTE: the API key is never logged.

use std::time::Instant;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::GenerationCfg;
use crate::error::GenerationError;
use crate::util::trunc_for_log;

pub const DEFAULT_API_URL: &str =
  "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2";

#[derive(Clone)]
pub struct TextGenClient {
  pub client: reqwest::Client,
  pub api_key: String,
  pub api_url: String,
  pub params: GenerationCfg,
}

impl TextGenClient {
  pub fn new(api_key: String, api_url: String, params: GenerationCfg) -> Self {
    Self { client: reqwest::Client::new(), api_key, api_url, params }
  }

  /// Construct the client if we find HF_API_KEY (or HUGGINGFACE_API_KEY); otherwise return None.
  pub fn from_env(params: GenerationCfg) -> Option<Self> {
    let api_key = std::env::var("HF_API_KEY")
      .or_else(|_| std::env::var("HUGGINGFACE_API_KEY"))
      .ok()
      .filter(|k| !k.trim().is_empty())?;
    let api_url = std::env::var("HF_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
    Some(Self::new(api_key, api_url, params))
  }

  /// Generate a completion for `prompt`. Returns the first `generated_text`, trimmed.
  #[instrument(level = "info", skip(self, prompt), fields(prompt_len = prompt.len(), timeout_secs = self.params.timeout_secs))]
  pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
    let start = Instant::now();
    let result = match tokio::time::timeout(self.params.timeout(), self.request(prompt)).await {
      Ok(r) => r,
      Err(_) => Err(GenerationError::Timeout),
    };
    let elapsed = start.elapsed();
    match &result {
      Ok(text) => info!(?elapsed, text_len = text.len(), "Text generation succeeded"),
      Err(e) => warn!(?elapsed, error = %e, "Text generation failed"),
    }
    result
  }

  async fn request(&self, prompt: &str) -> Result<String, GenerationError> {
    let req = GenerationRequest {
      inputs: prompt,
      parameters: GenerationParams {
        max_new_tokens: self.params.max_new_tokens,
        temperature: self.params.temperature,
        top_p: self.params.top_p,
        return_full_text: false,
      },
    };

    let res = self.client.post(&self.api_url)
      .header(USER_AGENT, "skillshare-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(GenerationError::from_transport)?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      let message = extract_provider_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(GenerationError::Upstream { status, message });
    }

    let bytes = res.bytes().await.map_err(GenerationError::from_transport)?;
    let body: Vec<GeneratedItem> = serde_json::from_slice(&bytes)?;
    body
      .into_iter()
      .next()
      .and_then(|item| item.generated_text)
      .map(|t| t.trim().to_string())
      .filter(|t| !t.is_empty())
      .ok_or(GenerationError::EmptyGeneration)
  }
}

// --- DTOs ---

#[derive(Serialize)]
struct GenerationRequest<'a> {
  inputs: &'a str,
  parameters: GenerationParams,
}

#[derive(Serialize)]
struct GenerationParams {
  max_new_tokens: u32,
  temperature: f32,
  top_p: f32,
  return_full_text: bool,
}

#[derive(Deserialize)]
struct GeneratedItem {
  #[serde(default)]
  generated_text: Option<String>,
}

/// Provider errors come back as `{"error": "..."}`.
fn extract_provider_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EObj { error: String }
  serde_json::from_str::<EObj>(body).ok().map(|e| e.error)
}

#[cfg(test)]
pub(crate) mod tests {
  use std::{
    sync::{Arc, Mutex},
    time::Duration,
  };

  use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
  };
  use serde_json::{json, Value};
  use tokio::net::TcpListener;

  use super::*;

  /// What the mock upstream answers, plus what it saw.
  #[derive(Clone)]
  pub(crate) struct Upstream {
    pub status: StatusCode,
    pub body: Value,
    pub delay: Duration,
    pub seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
  }

  impl Upstream {
    pub(crate) fn ok(body: Value) -> Self {
      Self { status: StatusCode::OK, body, delay: Duration::ZERO, seen: Arc::default() }
    }
  }

  async fn handle(State(up): State<Upstream>, headers: HeaderMap, Json(req): Json<Value>) -> impl IntoResponse {
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).map(String::from);
    up.seen.lock().unwrap().push((auth, req));
    tokio::time::sleep(up.delay).await;
    (up.status, Json(up.body.clone()))
  }

  /// Serve `up` on an ephemeral port; returns the endpoint URL.
  pub(crate) async fn spawn_upstream(up: Upstream) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/generate", post(handle)).with_state(up);
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/generate")
  }

  fn client(url: String, timeout_secs: u64) -> TextGenClient {
    let params = GenerationCfg { timeout_secs, ..GenerationCfg::default() };
    TextGenClient::new("secret-key".into(), url, params)
  }

  #[tokio::test]
  async fn returns_first_generated_text_and_sends_expected_request() {
    let up = Upstream::ok(json!([{ "generated_text": "  Q\nA) x  " }, { "generated_text": "second" }]));
    let seen = up.seen.clone();
    let url = spawn_upstream(up).await;

    let text = client(url, 5).generate("Zgodovina").await.unwrap();
    assert_eq!(text, "Q\nA) x");

    let seen = seen.lock().unwrap();
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer secret-key"));
    assert_eq!(body["inputs"], "Zgodovina");
    assert_eq!(body["parameters"]["max_new_tokens"], 500);
    assert_eq!(body["parameters"]["return_full_text"], false);
    assert!(body["parameters"]["top_p"].is_number());
  }

  #[tokio::test]
  async fn non_success_status_is_upstream_error() {
    let mut up = Upstream::ok(json!({ "error": "Model is currently loading" }));
    up.status = StatusCode::SERVICE_UNAVAILABLE;
    let url = spawn_upstream(up).await;

    match client(url, 5).generate("p").await {
      Err(GenerationError::Upstream { status, message }) => {
        assert_eq!(status.as_u16(), 503);
        assert_eq!(message, "Model is currently loading");
      }
      other => panic!("unexpected: {other:?}"),
    }
  }

  #[tokio::test]
  async fn missing_or_blank_text_is_empty_generation() {
    for body in [json!([]), json!([{ "generated_text": "   " }]), json!([{ "other": 1 }])] {
      let url = spawn_upstream(Upstream::ok(body)).await;
      let err = client(url, 5).generate("p").await.unwrap_err();
      assert!(matches!(err, GenerationError::EmptyGeneration), "got {err:?}");
    }
  }

  #[tokio::test]
  async fn slow_upstream_times_out() {
    let mut up = Upstream::ok(json!([{ "generated_text": "late" }]));
    up.delay = Duration::from_secs(3);
    let url = spawn_upstream(up).await;

    let err = client(url, 1).generate("p").await.unwrap_err();
    assert!(matches!(err, GenerationError::Timeout), "got {err:?}");
  }

  #[tokio::test]
  async fn unreachable_upstream_is_request_error() {
    let err = client("http://127.0.0.1:1/generate".into(), 5).generate("p").await.unwrap_err();
    assert!(matches!(err, GenerationError::Request(_)), "got {err:?}");
  }
}
