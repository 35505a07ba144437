//! In-memory exercise bank: topic catalog + predefined stores.
//!
//! Built once at startup from the built-in seeds plus any `[[exercises]]` entries from the
//! TOML config. Read-only afterwards; shared across requests behind `Arc<AppState>`.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::ExerciseCfg;
use crate::domain::{Exercise, OpenExercise, Topic};
use crate::seeds::{hard_fallback_exercise, seed_exercises, seed_open_exercises, seed_topics};

type PairMap<T> = HashMap<String, HashMap<String, Vec<T>>>;

#[derive(Clone, Debug, Default)]
pub struct ExerciseBank {
  topics: Vec<Topic>,
  exercises: PairMap<Exercise>,
  open_exercises: PairMap<OpenExercise>,
}

impl ExerciseBank {
  /// Empty bank (no topics, no exercises). Only the hard fallback is reachable.
  #[cfg(test)]
  pub fn empty() -> Self {
    Self::default()
  }

  /// Built-in catalog and exercises.
  pub fn builtin() -> Self {
    let mut bank = Self { topics: seed_topics(), ..Self::default() };
    for (subject, category, ex) in seed_exercises() {
      bank.push_exercise(&subject, &category, ex);
    }
    for (subject, category, ex) in seed_open_exercises() {
      bank.open_exercises.entry(subject).or_default().entry(category).or_default().push(ex);
    }
    bank
  }

  /// Built-in content extended with configured exercises. Configured entries for a known pair
  /// are appended after the built-ins, so selection stays stable; unknown pairs extend the catalog.
  pub fn with_configured(extra: &[ExerciseCfg]) -> Self {
    let mut bank = Self::builtin();
    for cfg in extra {
      let subject = cfg.subject.trim();
      let category = cfg.category.trim();
      if subject.is_empty() || category.is_empty() || cfg.question.trim().is_empty() {
        warn!(target: "playbook", %subject, %category, "Skipping configured exercise: missing subject, category or question.");
        continue;
      }
      let ex = Exercise {
        question: cfg.question.clone(),
        options: cfg.options.clone(),
        correct_answer: cfg.correct_answer,
        explanation: cfg.explanation.clone(),
      };
      bank.push_exercise(subject, category, ex);
    }

    for t in &bank.topics {
      let count: usize = bank
        .exercises
        .get(&t.subject)
        .map(|cats| cats.values().map(Vec::len).sum())
        .unwrap_or(0);
      info!(target: "playbook", subject = %t.subject, categories = t.categories.len(), exercises = count, "Startup exercise inventory");
    }
    bank
  }

  /// Insert an exercise, registering the subject/category in the catalog if new.
  pub fn push_exercise(&mut self, subject: &str, category: &str, ex: Exercise) {
    match self.topics.iter_mut().find(|t| t.subject == subject) {
      Some(t) => {
        if !t.categories.iter().any(|c| c == category) {
          t.categories.push(category.to_string());
        }
      }
      None => self.topics.push(Topic {
        subject: subject.to_string(),
        categories: vec![category.to_string()],
      }),
    }
    self
      .exercises
      .entry(subject.to_string())
      .or_default()
      .entry(category.to_string())
      .or_default()
      .push(ex);
  }

  pub fn topics(&self) -> &[Topic] {
    &self.topics
  }

  /// Predefined exercises for a pair; empty slice when absent.
  pub fn exercises_for(&self, subject: &str, category: &str) -> &[Exercise] {
    self
      .exercises
      .get(subject)
      .and_then(|cats| cats.get(category))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn open_exercises_for(&self, subject: &str, category: &str) -> &[OpenExercise] {
    self
      .open_exercises
      .get(subject)
      .and_then(|cats| cats.get(category))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Fallback selector: first exercise of the first non-empty category of the first subject
  /// in catalog order. Falls through to the hard fallback when the bank holds nothing.
  pub fn fallback(&self) -> Exercise {
    self
      .topics
      .iter()
      .flat_map(|t| t.categories.iter().map(move |c| (t.subject.as_str(), c.as_str())))
      .find_map(|(s, c)| self.exercises_for(s, c).first())
      .cloned()
      .unwrap_or_else(hard_fallback_exercise)
  }
}
