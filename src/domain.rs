//! Domain models used by the backend: topics, exercises (multiple choice and open answer),
//! answer letters and the origin tag attached to every served exercise.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A subject and its ordered categories, as shown to the user for selection.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Topic {
  pub subject: String,
  pub categories: Vec<String>,
}

/// Letter of a multiple-choice option. Always indexes one of the four options.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AnswerLetter {
  #[default]
  A,
  B,
  C,
  D,
}

impl AnswerLetter {
  pub const ALL: [AnswerLetter; 4] = [AnswerLetter::A, AnswerLetter::B, AnswerLetter::C, AnswerLetter::D];

  pub fn index(self) -> usize {
    match self {
      AnswerLetter::A => 0,
      AnswerLetter::B => 1,
      AnswerLetter::C => 2,
      AnswerLetter::D => 3,
    }
  }

  /// Case-insensitive; anything outside A–D is rejected.
  pub fn from_char(ch: char) -> Option<Self> {
    match ch.to_ascii_uppercase() {
      'A' => Some(AnswerLetter::A),
      'B' => Some(AnswerLetter::B),
      'C' => Some(AnswerLetter::C),
      'D' => Some(AnswerLetter::D),
      _ => None,
    }
  }
}

impl fmt::Display for AnswerLetter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      AnswerLetter::A => "A",
      AnswerLetter::B => "B",
      AnswerLetter::C => "C",
      AnswerLetter::D => "D",
    };
    f.write_str(s)
  }
}

/// Multiple-choice exercise. Exactly four options; `correct_answer` points at one of them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
  pub question: String,
  pub options: [String; 4],
  pub correct_answer: AnswerLetter,
  #[serde(default)]
  pub explanation: String,
}

/// Open-answer exercise (question + worked solution). Served by a separate endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenExercise {
  pub question: String,
  pub solution: String,
}

/// Where did the served exercise come from?
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseOrigin {
  Predefined, // prompt matched the built-in/configured store
  Generated,  // produced by the text-generation provider
  Fallback,   // generic exercise (last resort)
}

impl ExerciseOrigin {
  pub fn as_str(self) -> &'static str {
    match self {
      ExerciseOrigin::Predefined => "predefined",
      ExerciseOrigin::Generated => "generated",
      ExerciseOrigin::Fallback => "fallback",
    }
  }
}
