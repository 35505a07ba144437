//! Core playbook behaviors used by the HTTP handlers.
//!
//! Multiple choice: prompt match → text generation + parse → generic fallback.
//! Open answer: validate → chat completion → predefined → generic.
//! Neither path ever surfaces a provider failure to the client.

use std::{future::Future, sync::Arc};

use tracing::{error, info, instrument, warn};

use crate::domain::{Exercise, ExerciseOrigin, OpenExercise};
use crate::error::PlaybookError;
use crate::matcher::{match_prompt, match_topic};
use crate::parser::parse_generated;
use crate::protocol::OpenExerciseIn;
use crate::seeds::generic_open_exercise;
use crate::state::AppState;
use crate::util::fill_template;

pub const DEFAULT_DIFFICULTY: &str = "srednja";

/// Multiple-choice pipeline. Always yields a usable exercise.
#[instrument(level = "info", skip(state, prompt), fields(prompt_len = prompt.len()))]
pub async fn generate_exercise(state: &AppState, prompt: &str) -> (Exercise, ExerciseOrigin) {
  // 1) Predefined content, no network.
  if let Some(ex) = match_prompt(&state.bank, prompt) {
    info!(target: "playbook", source = "predefined", "Prompt matched predefined exercise");
    return (ex, ExerciseOrigin::Predefined);
  }

  // 2) External generation, only with a configured credential.
  if let Some(tg) = &state.textgen {
    let input = fill_template(&state.prompts.generation_template, &[("prompt", prompt)]);
    match tg.generate(&input).await {
      Ok(text) => {
        let parsed = parse_generated(&text);
        if parsed.is_complete() {
          info!(target: "playbook", source = "generated", "Generated exercise parsed");
        } else {
          warn!(target: "playbook", source = "generated", gaps = ?parsed.gaps, "Generated exercise had gaps; filled by policy");
        }
        return (parsed.exercise, ExerciseOrigin::Generated);
      }
      Err(e) => {
        error!(target: "playbook", error = %e, "Text generation failed; using fallback");
      }
    }
  } else {
    warn!(target: "playbook", "HF_API_KEY not set; using fallback");
  }

  // 3) Generic fallback.
  let ex = state.bank.fallback();
  warn!(target: "playbook", source = "fallback", "Serving fallback exercise");
  (ex, ExerciseOrigin::Fallback)
}

/// Run `fut` on its own task. A panic inside is logged and reported as `None`.
pub async fn guarded<T, F>(fut: F) -> Option<T>
where
  T: Send + 'static,
  F: Future<Output = T> + Send + 'static,
{
  match tokio::spawn(fut).await {
    Ok(v) => Some(v),
    Err(e) => {
      error!(target: "playbook", error = %e, "Playbook task failed unexpectedly");
      None
    }
  }
}

/// `generate_exercise` behind the panic boundary: an unexpected failure still yields
/// the generic fallback.
pub async fn generate_exercise_guarded(state: Arc<AppState>, prompt: String) -> (Exercise, ExerciseOrigin) {
  let task_state = state.clone();
  match guarded(async move { generate_exercise(&task_state, &prompt).await }).await {
    Some(out) => out,
    None => (state.bank.fallback(), ExerciseOrigin::Fallback),
  }
}

fn required(field: &str, value: Option<String>) -> Result<String, PlaybookError> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
    .ok_or_else(|| PlaybookError::MalformedInput(format!("missing {field}")))
}

/// Open-answer pipeline. Only malformed input is an error.
#[instrument(level = "info", skip(state, body))]
pub async fn generate_open_exercise(state: &AppState, body: OpenExerciseIn) -> Result<(OpenExercise, ExerciseOrigin), PlaybookError> {
  let subject = required("subject", body.subject)?;
  let category = required("category", body.category)?;
  let difficulty = body
    .difficulty
    .map(|d| d.trim().to_string())
    .filter(|d| !d.is_empty())
    .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string());

  if let Some(oa) = &state.openai {
    match oa.generate_open_exercise(&state.prompts, &subject, &category, &difficulty).await {
      Ok(ex) => {
        info!(target: "playbook", %subject, %category, source = "generated", "Open exercise generated");
        return Ok((ex, ExerciseOrigin::Generated));
      }
      Err(e) => error!(target: "playbook", %subject, %category, error = %e, "OpenAI open exercise failed; using predefined content"),
    }
  }

  Ok(open_exercise_local(state, &subject, &category))
}

/// Predefined open exercise for the pair (first entry), else for the catalog pair the
/// names resolve to, else a generic one built from the names.
fn open_exercise_local(state: &AppState, subject: &str, category: &str) -> (OpenExercise, ExerciseOrigin) {
  if let Some(ex) = state.bank.open_exercises_for(subject, category).first() {
    return (ex.clone(), ExerciseOrigin::Predefined);
  }
  let key = format!("{subject} {category}");
  if let Some(m) = match_topic(&state.bank, &key).filter(|m| m.category_in_prompt) {
    if let Some(ex) = state.bank.open_exercises_for(m.subject, m.category).first() {
      return (ex.clone(), ExerciseOrigin::Predefined);
    }
  }
  warn!(target: "playbook", %subject, %category, source = "fallback", "No predefined open exercise; serving generic one");
  (generic_open_exercise(subject, category), ExerciseOrigin::Fallback)
}
