//! Wire shapes of the quiz service and their validation into domain types.
//!
//! Responses are first decoded into these structs, then checked. Anything
//! that does not fit becomes [`QuizError::MalformedResponse`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use quizdeck_core::error::QuizError;
use quizdeck_core::model::{
    Flashcard, LeaderboardEntry, Question, QuestionKind, Quiz, BINARY_ANSWERS,
};

/// Decode a response body, naming the endpoint on failure.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, QuizError> {
    serde_json::from_str(body)
        .map_err(|e| QuizError::MalformedResponse(format!("{endpoint}: {e}")))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateQuizResponse {
    pub quiz_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitScoreRequest<'a> {
    pub quiz_id: &'a str,
    pub player_name: &'a str,
    pub score: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizResponse {
    pub quiz_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub questions: Vec<WireQuestion>,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlashcardsResponse {
    #[allow(dead_code)]
    pub quiz_id: String,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardResponse {
    #[allow(dead_code)]
    pub quiz_id: String,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(alias = "detail", alias = "message")]
    pub error: String,
}

impl QuizResponse {
    pub fn into_quiz(self) -> Result<Quiz, QuizError> {
        let questions = self
            .questions
            .into_iter()
            .map(WireQuestion::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Quiz {
            id: self.quiz_id,
            title: self.title,
            questions,
            flashcards: self.flashcards,
        })
    }
}

impl WireQuestion {
    pub fn into_question(self) -> Result<Question, QuizError> {
        let kind = QuestionKind::from_wire(&self.kind).ok_or_else(|| {
            QuizError::MalformedResponse(format!(
                "question {:?} has unknown type {:?}",
                self.question, self.kind
            ))
        })?;
        let question = match kind {
            QuestionKind::Binary => Question {
                prompt: self.question,
                kind,
                options: Vec::new(),
                answer: canonical_binary(&self.answer).unwrap_or(self.answer),
            },
            QuestionKind::MultipleChoice => Question {
                prompt: self.question,
                kind,
                options: self.options.unwrap_or_default(),
                answer: self.answer,
            },
        };
        question.validate()?;
        Ok(question)
    }
}

/// Map "true"/"FALSE"/... onto the fixed binary answer spelling.
fn canonical_binary(answer: &str) -> Option<String> {
    BINARY_ANSWERS
        .iter()
        .find(|a| a.eq_ignore_ascii_case(answer.trim()))
        .map(|a| a.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_and_validates_quiz() {
        let body = r#"{
            "quiz_id": "q1",
            "title": "Cells",
            "questions": [
                {"question": "Mitochondria make ATP", "type": "true_false", "answer": "true"},
                {"question": "Powerhouse?", "type": "multiple_choice",
                 "options": ["Nucleus", "Mitochondria"], "answer": "Mitochondria"}
            ]
        }"#;
        let quiz = decode::<QuizResponse>("quiz", body)
            .unwrap()
            .into_quiz()
            .unwrap();
        assert_eq!(quiz.id, "q1");
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].kind, QuestionKind::Binary);
        assert_eq!(quiz.questions[0].answer, "True");
        assert_eq!(quiz.questions[1].options.len(), 2);
        assert!(quiz.flashcards.is_empty());
    }

    #[test]
    fn rejects_unknown_question_type() {
        let q = WireQuestion {
            question: "Explain".into(),
            kind: "essay".into(),
            options: None,
            answer: "anything".into(),
        };
        assert!(matches!(
            q.into_question(),
            Err(QuizError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_answer_outside_options() {
        let q = WireQuestion {
            question: "Pick".into(),
            kind: "multiple_choice".into(),
            options: Some(vec!["A".into(), "B".into()]),
            answer: "C".into(),
        };
        assert!(q.into_question().is_err());
    }

    #[test]
    fn rejects_non_binary_answer() {
        let q = WireQuestion {
            question: "Is it?".into(),
            kind: "true_false".into(),
            options: None,
            answer: "maybe".into(),
        };
        assert!(q.into_question().is_err());
    }

    #[test]
    fn missing_questions_field_is_malformed() {
        let err = decode::<QuizResponse>("quiz", r#"{"quiz_id": "q1"}"#).unwrap_err();
        assert!(err.to_string().contains("quiz"));
    }

    #[test]
    fn submit_body_uses_camel_case() {
        let body = serde_json::to_value(SubmitScoreRequest {
            quiz_id: "q1",
            player_name: "Bo",
            score: 3,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"quizId": "q1", "playerName": "Bo", "score": 3})
        );
    }

    #[test]
    fn error_body_aliases() {
        let e: ErrorBody = serde_json::from_str(r#"{"detail": "not found"}"#).unwrap();
        assert_eq!(e.error, "not found");
    }
}
