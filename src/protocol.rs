//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Exercise, OpenExercise, Topic};

/// Multiple-choice request. The prompt is free text; subject/category are recovered from it.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateIn {
    #[serde(default)]
    pub prompt: String,
}

/// `{question, options, correctAnswer, explanation}`
pub type ExerciseOut = Exercise;

/// Open-answer request. Fields are optional on the wire so that missing ones
/// surface as a 400 with a readable message instead of a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
pub struct OpenExerciseIn {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// `{question, solution}`
pub type OpenExerciseOut = OpenExercise;

#[derive(Serialize)]
pub struct TopicsOut {
    pub topics: Vec<Topic>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}
