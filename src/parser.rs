//! Lenient line-oriented parser for model completions.
//!
//! Expected shape (loosely): a question line, four option lines `A) ..` to `D) ..`, a
//! correct-answer line (`Pravilen: B`) and an explanation. Anything missing is filled by a
//! fixed policy and reported as a `Gap`, so the result always has four options and a valid letter.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{AnswerLetter, Exercise};

/// Letter marker + delimiter at line start: `A)`, `b.`, `(C)`, `[D]`, `A:`.
static OPTION_LINE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[(\[]?\s*([A-Da-d])\s*[).:\]]\s*(.*)$").expect("option regex"));

/// Correct-answer marker, anywhere in the line.
static ANSWER_MARKER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)\b(?:pravil\w*|correct\w*|answer)").expect("answer regex"));

static QUESTION_LABEL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)^(?:vprašanje|question)\s*[:\-]\s*").expect("question label regex"));

static EXPLANATION_LABEL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)^(?:razlaga|pojasnilo|explanation)\s*[:\-]\s*").expect("explanation label regex"));

pub const QUESTION_PLACEHOLDER: &str = "Vprašanje ni na voljo.";
pub const DEFAULT_ANSWER: AnswerLetter = AnswerLetter::A;

/// A field that was filled by policy instead of taken from the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gap {
  Question,
  Option(AnswerLetter),
  CorrectAnswer,
  Explanation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedExercise {
  pub exercise: Exercise,
  pub gaps: Vec<Gap>,
}

impl ParsedExercise {
  pub fn is_complete(&self) -> bool {
    self.gaps.is_empty()
  }
}

pub fn option_placeholder(letter: AnswerLetter) -> String {
  format!("Možnost {}", letter.index() + 1)
}

fn option_line(line: &str) -> Option<(AnswerLetter, &str)> {
  let caps = OPTION_LINE.captures(line)?;
  let letter = caps.get(1)?.as_str().chars().next().and_then(AnswerLetter::from_char)?;
  Some((letter, caps.get(2).map_or("", |m| m.as_str().trim())))
}

/// Letter following a correct-answer marker, e.g. "Pravilni odgovor: C" → C.
fn answer_line(line: &str) -> Option<AnswerLetter> {
  let m = ANSWER_MARKER.find(line)?;
  line[m.end()..]
    .split(|c: char| !c.is_alphanumeric())
    .filter(|tok| tok.chars().count() == 1)
    .find_map(|tok| tok.chars().next().and_then(AnswerLetter::from_char))
}

/// Parse a completion into a multiple-choice exercise. Never fails.
pub fn parse_generated(text: &str) -> ParsedExercise {
  let mut question: Option<String> = None;
  let mut options: [Option<String>; 4] = Default::default();
  let mut answer: Option<AnswerLetter> = None;
  let mut explanation: Vec<&str> = Vec::new();

  // Set when the first line is a bare "Vprašanje:" label; the question is the next plain line.
  let mut question_follows = false;

  let lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
  for (i, line) in lines.enumerate() {
    if let Some((letter, body)) = option_line(line) {
      let slot = &mut options[letter.index()];
      if slot.is_none() && !body.is_empty() {
        *slot = Some(body.to_string());
        continue;
      }
    }
    // The first plain line is the question, even if it mentions "answer" or "pravilen".
    if i == 0 {
      let q = QUESTION_LABEL.replace(line, "").trim().to_string();
      question_follows = q.is_empty();
      question = Some(q).filter(|q| !q.is_empty());
      continue;
    }
    if answer.is_none() {
      if let Some(letter) = answer_line(line) {
        answer = Some(letter);
        continue;
      }
    }
    if question_follows {
      question_follows = false;
      question = Some(line.to_string());
      continue;
    }
    explanation.push(line);
  }

  let mut gaps = Vec::new();

  let question = match question.filter(|q| !q.is_empty()) {
    Some(q) => q,
    None => {
      gaps.push(Gap::Question);
      QUESTION_PLACEHOLDER.to_string()
    }
  };

  let options = AnswerLetter::ALL.map(|letter| match options[letter.index()].take() {
    Some(o) => o,
    None => {
      gaps.push(Gap::Option(letter));
      option_placeholder(letter)
    }
  });

  let correct_answer = answer.unwrap_or_else(|| {
    gaps.push(Gap::CorrectAnswer);
    DEFAULT_ANSWER
  });

  let explanation = match explanation.split_first() {
    Some((first, rest)) => {
      let first = EXPLANATION_LABEL.replace(first, "");
      std::iter::once(first.trim())
        .chain(rest.iter().copied())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
    None => String::new(),
  };
  if explanation.is_empty() {
    gaps.push(Gap::Explanation);
  }

  ParsedExercise {
    exercise: Exercise { question, options, correct_answer, explanation },
    gaps,
  }
}
