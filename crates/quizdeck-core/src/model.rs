//! Core data model types for quizdeck.
//!
//! These are the types fetched from the quiz service and shared by the
//! session, review and leaderboard state machines. All of them are
//! immutable once fetched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// The fixed answer domain of a binary (true/false) question.
pub const BINARY_ANSWERS: [&str; 2] = ["True", "False"];

/// A quiz as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Server-assigned identifier.
    pub id: String,
    /// Optional display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Questions in presentation order.
    pub questions: Vec<Question>,
    /// Flashcards generated alongside the questions (may be empty).
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

impl Quiz {
    /// Title to show in headers; falls back to "Quiz".
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Quiz")
    }
}

/// Kind of question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Two-valued: the answer is one of [`BINARY_ANSWERS`].
    Binary,
    /// The answer is one of the question's options.
    MultipleChoice,
}

impl QuestionKind {
    /// Parse the kind string used on the wire.
    pub fn from_wire(kind: &str) -> Option<Self> {
        match kind {
            "true_false" => Some(QuestionKind::Binary),
            "multiple_choice" => Some(QuestionKind::MultipleChoice),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Binary => write!(f, "true/false"),
            QuestionKind::MultipleChoice => write!(f, "multiple choice"),
        }
    }
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The prompt shown to the player.
    pub prompt: String,
    /// Binary or multiple-choice.
    pub kind: QuestionKind,
    /// Options in display order (multiple-choice only).
    #[serde(default)]
    pub options: Vec<String>,
    /// The correct answer, compared case-sensitively.
    pub answer: String,
}

impl Question {
    /// Build a binary question, checking the answer against [`BINARY_ANSWERS`].
    pub fn binary(prompt: impl Into<String>, answer: impl Into<String>) -> Result<Self, QuizError> {
        let question = Self {
            prompt: prompt.into(),
            kind: QuestionKind::Binary,
            options: Vec::new(),
            answer: answer.into(),
        };
        question.validate()?;
        Ok(question)
    }

    /// Build a multiple-choice question, checking the answer is among the options.
    pub fn multiple_choice<S: Into<String>>(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        answer: impl Into<String>,
    ) -> Result<Self, QuizError> {
        let question = Self {
            prompt: prompt.into(),
            kind: QuestionKind::MultipleChoice,
            options: options.into_iter().map(Into::into).collect(),
            answer: answer.into(),
        };
        question.validate()?;
        Ok(question)
    }

    /// Check the kind/answer invariant.
    pub fn validate(&self) -> Result<(), QuizError> {
        match self.kind {
            QuestionKind::Binary => {
                if !BINARY_ANSWERS.contains(&self.answer.as_str()) {
                    return Err(QuizError::MalformedResponse(format!(
                        "true/false question {:?} has answer {:?}",
                        self.prompt, self.answer
                    )));
                }
            }
            QuestionKind::MultipleChoice => {
                if self.options.is_empty() {
                    return Err(QuizError::MalformedResponse(format!(
                        "multiple choice question {:?} has no options",
                        self.prompt
                    )));
                }
                if !self.options.contains(&self.answer) {
                    return Err(QuizError::MalformedResponse(format!(
                        "answer {:?} is not one of the options of {:?}",
                        self.answer, self.prompt
                    )));
                }
            }
        }
        Ok(())
    }

    /// The choices a player picks from, in display order.
    pub fn choices(&self) -> Vec<&str> {
        match self.kind {
            QuestionKind::Binary => BINARY_ANSWERS.to_vec(),
            QuestionKind::MultipleChoice => self.options.iter().map(String::as_str).collect(),
        }
    }

    /// Case-sensitive exact comparison against the correct answer.
    pub fn is_correct(&self, selection: &str) -> bool {
        selection == self.answer
    }
}

/// A term/definition pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

/// A quiz listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentQuizSummary {
    pub quiz_id: String,
    pub content_name: String,
    /// Creation timestamp as sent by the server.
    pub created_at: String,
}

impl RecentQuizSummary {
    /// The creation timestamp, if the server sent RFC 3339.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// One leaderboard row as sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: i64,
}

/// Question mix requested when creating a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    Mix,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple_choice"),
            QuestionType::TrueFalse => write!(f, "true_false"),
            QuestionType::Mix => write!(f, "mix"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "multiple_choice" | "mc" => Ok(QuestionType::MultipleChoice),
            "true_false" | "tf" => Ok(QuestionType::TrueFalse),
            "mix" | "mixed" => Ok(QuestionType::Mix),
            other => Err(format!(
                "unknown question type '{other}' (expected multiple_choice, true_false or mix)"
            )),
        }
    }
}

/// Bounds on the generation knobs accepted by the service.
pub const MAX_QUESTIONS: u32 = 50;
pub const MIN_OPTIONS: u32 = 2;
pub const MAX_OPTIONS: u32 = 6;

/// Body of a quiz creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateQuizRequest {
    /// Source text the questions are generated from.
    pub text: String,
    pub question_type: QuestionType,
    pub num_options: u32,
    pub num_questions: u32,
    pub include_flashcards: bool,
    /// Display name of the quiz.
    pub content_name: String,
    /// Requesting user.
    pub user_id: String,
}

impl CreateQuizRequest {
    /// Reject requests the service would only fail on.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.text.trim().is_empty() {
            return Err(QuizError::InvalidRequest("source text is empty".into()));
        }
        if self.content_name.trim().is_empty() {
            return Err(QuizError::InvalidRequest("quiz name is empty".into()));
        }
        if self.user_id.trim().is_empty() {
            return Err(QuizError::InvalidRequest("no signed-in user".into()));
        }
        if !(1..=MAX_QUESTIONS).contains(&self.num_questions) {
            return Err(QuizError::InvalidRequest(format!(
                "question count must be between 1 and {MAX_QUESTIONS}"
            )));
        }
        if self.question_type != QuestionType::TrueFalse
            && !(MIN_OPTIONS..=MAX_OPTIONS).contains(&self.num_options)
        {
            return Err(QuizError::InvalidRequest(format!(
                "option count must be between {MIN_OPTIONS} and {MAX_OPTIONS}"
            )));
        }
        Ok(())
    }
}
