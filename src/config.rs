//! Loading playbook configuration (prompts, generation parameters, extra exercises) from TOML.
//!
//! See `PlaybookConfig`, `Prompts` and `GenerationCfg` for the expected schema. Every section
//! is optional; a missing or broken file simply means built-in defaults.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::AnswerLetter;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PlaybookConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub generation: GenerationCfg,
  #[serde(default)]
  pub exercises: Vec<ExerciseCfg>,
}

/// Predefined multiple-choice exercise accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ExerciseCfg {
  pub subject: String,
  pub category: String,
  pub question: String,
  pub options: [String; 4],
  pub correct_answer: AnswerLetter,
  #[serde(default)]
  pub explanation: String,
}

/// Parameters sent to the text-generation provider with every request.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationCfg {
  pub max_new_tokens: u32,
  pub temperature: f32,
  pub top_p: f32,
  pub timeout_secs: u64,
}

impl Default for GenerationCfg {
  fn default() -> Self {
    Self { max_new_tokens: 500, temperature: 0.7, top_p: 0.95, timeout_secs: 30 }
  }
}

impl GenerationCfg {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Prompt templates. `{prompt}`, `{subject}`, `{category}` and `{difficulty}` are substituted.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  // Multiple choice (text-generation provider)
  pub generation_template: String,
  // Open answer (chat-completion provider)
  pub open_system: String,
  pub open_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      generation_template: "{prompt}\n\nOdgovori natanko v tej obliki:\nVprašanje\nA) možnost\nB) možnost\nC) možnost\nD) možnost\nPravilen: <črka>\nRazlaga".into(),
      open_system: "You are a tutor who writes short practice exercises in Slovenian. Respond ONLY with strict JSON.".into(),
      open_user_template: "Subject: {subject}\nCategory: {category}\nDifficulty: {difficulty}\nWrite one open-answer exercise. Return JSON with fields: question, solution. The solution must show the worked steps.".into(),
    }
  }
}

/// Attempt to load `PlaybookConfig` from PLAYBOOK_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_playbook_config_from_env() -> Option<PlaybookConfig> {
  let path = std::env::var("PLAYBOOK_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_playbook_config(&s) {
      Ok(cfg) => {
        info!(target: "skillshare_backend", %path, exercises = cfg.exercises.len(), "Loaded playbook config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "skillshare_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "skillshare_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_playbook_config(s: &str) -> Result<PlaybookConfig, toml::de::Error> {
  toml::from_str::<PlaybookConfig>(s)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_yields_defaults() {
    let cfg = parse_playbook_config("").unwrap();
    assert_eq!(cfg.generation.max_new_tokens, 500);
    assert_eq!(cfg.generation.timeout(), Duration::from_secs(30));
    assert!(cfg.prompts.generation_template.contains("{prompt}"));
    assert!(cfg.exercises.is_empty());
  }

  #[test]
  fn partial_sections_keep_remaining_defaults() {
    let cfg = parse_playbook_config(
      r#"
[generation]
timeout_secs = 5

[prompts]
open_system = "custom"

[[exercises]]
subject = "Zgodovina"
category = "Antika"
question = "Kdo je bil Cezar?"
options = ["Rimski vojskovodja", "Grški filozof", "Egipčanski faraon", "Perzijski kralj"]
correct_answer = "A"
"#,
    )
    .unwrap();
    assert_eq!(cfg.generation.timeout_secs, 5);
    assert_eq!(cfg.generation.top_p, 0.95);
    assert_eq!(cfg.prompts.open_system, "custom");
    assert!(!cfg.prompts.open_user_template.is_empty());
    assert_eq!(cfg.exercises[0].correct_answer, AnswerLetter::A);
    assert!(cfg.exercises[0].explanation.is_empty());
  }

  #[test]
  fn exercise_with_three_options_is_rejected() {
    let err = parse_playbook_config(
      r#"
[[exercises]]
subject = "S"
category = "C"
question = "Q"
options = ["a", "b", "c"]
correct_answer = "A"
"#,
    );
    assert!(err.is_err());
  }
}
