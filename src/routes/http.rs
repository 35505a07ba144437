//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic result info.

use std::sync::Arc;

use axum::{extract::{rejection::JsonRejection, State}, response::IntoResponse, Json};
use tracing::{info, instrument, warn};

use crate::error::PlaybookError;
use crate::logic::{generate_exercise_guarded, generate_open_exercise};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_topics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(TopicsOut { topics: state.bank.topics().to_vec() })
}

/// Always 200: a body that does not parse is treated as an empty prompt.
#[instrument(level = "info", skip(state, body))]
pub async fn http_post_exercise(
  State(state): State<Arc<AppState>>,
  body: Result<Json<GenerateIn>, JsonRejection>,
) -> Json<ExerciseOut> {
  let prompt = match body {
    Ok(Json(b)) => b.prompt,
    Err(e) => {
      warn!(target: "playbook", error = %e, "Unreadable exercise request; treating as empty prompt");
      String::new()
    }
  };
  let prompt_len = prompt.len();
  let (ex, origin) = generate_exercise_guarded(state, prompt).await;
  info!(target: "playbook", prompt_len, origin = origin.as_str(), correct = %ex.correct_answer, "HTTP exercise served");
  Json(ex)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_open_exercise(
  State(state): State<Arc<AppState>>,
  body: Result<Json<OpenExerciseIn>, JsonRejection>,
) -> Result<Json<OpenExerciseOut>, PlaybookError> {
  let Json(body) = body.map_err(|e| PlaybookError::MalformedInput(e.body_text()))?;
  let (ex, origin) = generate_open_exercise(&state, body).await?;
  info!(target: "playbook", origin = origin.as_str(), "HTTP open exercise served");
  Ok(Json(ex))
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
  };
  use serde_json::{json, Value};
  use tower::ServiceExt;

  use crate::bank::ExerciseBank;
  use crate::config::{GenerationCfg, Prompts};
  use crate::routes::build_router;
  use crate::state::AppState;
  use crate::textgen::TextGenClient;

  use super::*;

  fn app(textgen: Option<TextGenClient>) -> Router {
    build_router(Arc::new(AppState::from_parts(ExerciseBank::builtin(), Prompts::default(), textgen, None)))
  }

  async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let req = Request::post(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body))
      .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  fn assert_exercise_shape(v: &Value) {
    assert!(v["question"].is_string());
    assert_eq!(v["options"].as_array().map(Vec::len), Some(4));
    assert!(matches!(v["correctAnswer"].as_str(), Some("A" | "B" | "C" | "D")));
    assert!(v["explanation"].is_string());
  }

  #[tokio::test]
  async fn health_is_ok() {
    let res = app(None).oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn topics_are_listed_in_catalog_order() {
    let res = app(None).oneshot(Request::get("/api/v1/topics").body(Body::empty()).unwrap()).await.unwrap();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["topics"][0]["subject"], "Matematika");
    assert_eq!(v["topics"][0]["categories"][0], "Kvadratne enačbe");
  }

  #[tokio::test]
  async fn matched_prompt_returns_predefined_exercise() {
    let body = json!({ "prompt": "Generiraj vajo. Predmet: Matematika. Kategorija: Kvadratne enačbe." }).to_string();
    let (status, v) = post_json(app(None), "/api/v1/playbook/exercise", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_exercise_shape(&v);
    let expected = serde_json::to_value(&ExerciseBank::builtin().exercises_for("Matematika", "Kvadratne enačbe")[0]).unwrap();
    assert_eq!(v, expected);
  }

  #[tokio::test]
  async fn unreachable_provider_still_returns_200() {
    let tg = TextGenClient::new("k".into(), "http://127.0.0.1:1/x".into(), GenerationCfg::default());
    let body = json!({ "prompt": "Vaja iz zgodovine" }).to_string();
    let (status, v) = post_json(app(Some(tg)), "/api/v1/playbook/exercise", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_exercise_shape(&v);
  }

  #[tokio::test]
  async fn garbage_body_is_treated_as_empty_prompt() {
    let (status, v) = post_json(app(None), "/api/v1/playbook/exercise", "not json".into()).await;
    assert_eq!(status, StatusCode::OK);
    assert_exercise_shape(&v);
    let (status, _) = post_json(app(None), "/api/v1/playbook/exercise", "{}".into()).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn open_exercise_missing_category_is_400() {
    let body = json!({ "subject": "Matematika" }).to_string();
    let (status, v) = post_json(app(None), "/api/v1/playbook/open-exercise", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].as_str().unwrap().contains("category"));
  }

  #[tokio::test]
  async fn open_exercise_returns_question_and_solution() {
    let body = json!({ "subject": "Programiranje", "category": "Python" }).to_string();
    let (status, v) = post_json(app(None), "/api/v1/playbook/open-exercise", body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(v["question"].as_str().unwrap().contains("sodih"));
    assert!(v["solution"].as_str().unwrap().contains("def "));
  }
}
