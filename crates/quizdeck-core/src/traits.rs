//! Core trait definitions for the quiz service and the views driven by it.
//!
//! `QuizApi` is implemented by the HTTP gateway and the in-memory mock in
//! `quizdeck-client`. `SessionObserver` is implemented by whatever renders a
//! running quiz session.

use async_trait::async_trait;

use crate::error::QuizError;
use crate::model::{CreateQuizRequest, Flashcard, LeaderboardEntry, Quiz, RecentQuizSummary};
use crate::session::{AnswerOutcome, QuizSession};

// ---------------------------------------------------------------------------
// Quiz service trait
// ---------------------------------------------------------------------------

/// Remote quiz service. Every call is a fresh request: no retries, no cache.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Ask the service to generate a quiz; returns its identifier.
    async fn create_quiz(&self, request: &CreateQuizRequest) -> Result<String, QuizError>;

    /// Fetch a quiz with its questions.
    async fn get_quiz(&self, quiz_id: &str) -> Result<Quiz, QuizError>;

    /// Fetch the flashcards generated for a quiz.
    async fn get_flashcards(&self, quiz_id: &str) -> Result<Vec<Flashcard>, QuizError>;

    /// Most recently created quizzes across all users.
    async fn get_recent_quizzes(&self) -> Result<Vec<RecentQuizSummary>, QuizError>;

    /// Quizzes created by one user.
    async fn get_user_quizzes(&self, user_id: &str) -> Result<Vec<RecentQuizSummary>, QuizError>;

    /// Leaderboard rows in server order.
    async fn get_leaderboard(&self, quiz_id: &str) -> Result<Vec<LeaderboardEntry>, QuizError>;

    /// Record a finished session's score.
    async fn submit_score(
        &self,
        quiz_id: &str,
        player_name: &str,
        score: u32,
    ) -> Result<(), QuizError>;
}

// ---------------------------------------------------------------------------
// Session observer trait
// ---------------------------------------------------------------------------

/// Rendering hooks for a running quiz session.
pub trait SessionObserver: Send + Sync {
    /// A question became current (also fired for the first one).
    fn on_question(&self, session: &QuizSession);
    /// The countdown moved; `remaining` is in time units.
    fn on_tick(&self, remaining: u32);
    /// The current question was evaluated.
    fn on_answered(&self, session: &QuizSession, outcome: &AnswerOutcome);
    /// The input was not understood or not allowed right now.
    fn on_rejected(&self, reason: &str);
    /// The session reached its terminal state.
    fn on_completed(&self, score: u32, total: usize);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_question(&self, _: &QuizSession) {}
    fn on_tick(&self, _: u32) {}
    fn on_answered(&self, _: &QuizSession, _: &AnswerOutcome) {}
    fn on_rejected(&self, _: &str) {}
    fn on_completed(&self, _: u32, _: usize) {}
}
