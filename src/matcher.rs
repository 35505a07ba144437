//! Prompt matcher: recovers a (subject, category) pair from free text by keyword lookup.
//!
//! Ordered scan, first match wins, case-sensitive substring comparison against catalog names.

use crate::bank::ExerciseBank;
use crate::domain::Exercise;

/// A catalog pair recovered from a prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicMatch<'a> {
  pub subject: &'a str,
  pub category: &'a str,
  /// False when no category appeared in the prompt and the subject's first category was used.
  pub category_in_prompt: bool,
}

/// Find the first subject contained in `prompt`, then the first of its categories contained
/// in `prompt`, defaulting to the subject's first category. `None` when no subject matches
/// or the matched subject has no categories.
pub fn match_topic<'a>(bank: &'a ExerciseBank, prompt: &str) -> Option<TopicMatch<'a>> {
  let topic = bank.topics().iter().find(|t| prompt.contains(t.subject.as_str()))?;
  let (category, category_in_prompt) = match topic.categories.iter().find(|c| prompt.contains(c.as_str())) {
    Some(c) => (c, true),
    None => (topic.categories.first()?, false),
  };
  Some(TopicMatch { subject: &topic.subject, category, category_in_prompt })
}

/// Predefined exercise for the prompt, if any. Selection rule: the first stored exercise
/// for the matched pair. `None` means "no match" and routes the caller to generation.
pub fn match_prompt(bank: &ExerciseBank, prompt: &str) -> Option<Exercise> {
  let m = match_topic(bank, prompt)?;
  bank.exercises_for(m.subject, m.category).first().cloned()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::AnswerLetter;

  fn ex(q: &str) -> Exercise {
    Exercise {
      question: q.into(),
      options: ["a".into(), "b".into(), "c".into(), "d".into()],
      correct_answer: AnswerLetter::A,
      explanation: String::new(),
    }
  }

  #[test]
  fn subject_and_category_select_first_of_pair() {
    let bank = ExerciseBank::builtin();
    let prompt = "Ustvari vajo za predmet Matematika, kategorija Kvadratne enačbe, težavnost srednja.";
    let got = match_prompt(&bank, prompt).expect("match");
    let pool = bank.exercises_for("Matematika", "Kvadratne enačbe");
    assert!(pool.contains(&got));
    assert_eq!(got, pool[0]);
  }

  #[test]
  fn subject_without_category_uses_first_category() {
    let bank = ExerciseBank::builtin();
    let m = match_topic(&bank, "Nekaj iz predmeta Fizika prosim").expect("subject");
    assert_eq!(m.subject, "Fizika");
    assert_eq!(m.category, "Newtonovi zakoni");
    assert!(!m.category_in_prompt);

    let got = match_prompt(&bank, "Nekaj iz predmeta Fizika prosim").expect("match");
    assert_eq!(got, bank.exercises_for("Fizika", "Newtonovi zakoni")[0]);
  }

  #[test]
  fn unknown_subject_is_no_match() {
    let bank = ExerciseBank::builtin();
    assert!(match_prompt(&bank, "Vaja iz zgodovine, Antika").is_none());
    assert!(match_prompt(&bank, "").is_none());
  }

  #[test]
  fn matching_is_case_sensitive() {
    let bank = ExerciseBank::builtin();
    assert!(match_prompt(&bank, "matematika kvadratne enačbe").is_none());
  }

  #[test]
  fn first_subject_in_catalog_order_wins() {
    let bank = ExerciseBank::builtin();
    // Both subjects present; Matematika precedes Fizika in the catalog.
    let m = match_topic(&bank, "Fizika ali Matematika? Elektrika.").expect("match");
    assert_eq!(m.subject, "Matematika");
    assert_eq!(m.category, "Kvadratne enačbe");
  }

  #[test]
  fn configured_subject_matches_without_category() {
    let mut bank = ExerciseBank::empty();
    bank.push_exercise("Zgodovina", "Antika", ex("Q"));
    assert!(match_prompt(&bank, "Zgodovina: Srednji vek").is_some());
    assert!(match_prompt(&bank, "Geografija").is_none());
  }

  #[test]
  fn repeated_calls_return_same_exercise() {
    let bank = ExerciseBank::builtin();
    let prompt = "Programiranje / Algoritmi";
    assert_eq!(match_prompt(&bank, prompt), match_prompt(&bank, prompt));
  }
}
