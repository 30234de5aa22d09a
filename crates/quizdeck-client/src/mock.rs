//! In-memory quiz service for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizdeck_core::error::QuizError;
use quizdeck_core::model::{
    CreateQuizRequest, Flashcard, LeaderboardEntry, Question, Quiz, RecentQuizSummary,
};
use quizdeck_core::traits::QuizApi;

/// A recorded score submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub quiz_id: String,
    pub player_name: String,
    pub score: u32,
}

/// A mock quiz service for exercising sessions and views without a server.
///
/// Submitted scores are appended to the quiz's leaderboard, so a result view
/// fetched after a run sees them.
#[derive(Default)]
pub struct MockQuizApi {
    quizzes: Mutex<HashMap<String, Quiz>>,
    leaderboards: Mutex<HashMap<String, Vec<LeaderboardEntry>>>,
    /// Newest first, with the creating user.
    recent: Mutex<Vec<(String, RecentQuizSummary)>>,
    submissions: Mutex<Vec<Submission>>,
    last_create: Mutex<Option<CreateQuizRequest>>,
    fail_submissions: bool,
    call_count: AtomicU32,
}

impl MockQuizApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `quiz` under its own id.
    pub fn with_quiz(self, quiz: Quiz) -> Self {
        self.quizzes.lock().unwrap().insert(quiz.id.clone(), quiz);
        self
    }

    pub fn with_leaderboard(self, quiz_id: &str, entries: Vec<LeaderboardEntry>) -> Self {
        self.leaderboards
            .lock()
            .unwrap()
            .insert(quiz_id.to_string(), entries);
        self
    }

    pub fn with_recent(self, user_id: &str, summary: RecentQuizSummary) -> Self {
        self.recent
            .lock()
            .unwrap()
            .push((user_id.to_string(), summary));
        self
    }

    /// Make every score submission fail with a server error.
    pub fn failing_submissions(mut self) -> Self {
        self.fail_submissions = true;
        self
    }

    /// Get the number of calls made to this service.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn last_create(&self) -> Option<CreateQuizRequest> {
        self.last_create.lock().unwrap().clone()
    }

    fn record_call(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn not_found(what: &str, id: &str) -> QuizError {
        QuizError::Server {
            status: 404,
            message: format!("{what} {id} not found"),
        }
    }
}

#[async_trait]
impl QuizApi for MockQuizApi {
    async fn create_quiz(&self, request: &CreateQuizRequest) -> Result<String, QuizError> {
        self.record_call();
        request.validate()?;
        *self.last_create.lock().unwrap() = Some(request.clone());

        let mut quizzes = self.quizzes.lock().unwrap();
        let quiz_id = format!("mock-{}", quizzes.len() + 1);
        let questions = (1..=request.num_questions)
            .map(|i| Question::binary(format!("Statement {i} is true"), "True"))
            .collect::<Result<Vec<_>, _>>()?;
        let flashcards = if request.include_flashcards {
            vec![Flashcard {
                term: request.content_name.clone(),
                definition: request.text.clone(),
            }]
        } else {
            Vec::new()
        };
        quizzes.insert(
            quiz_id.clone(),
            Quiz {
                id: quiz_id.clone(),
                title: Some(request.content_name.clone()),
                questions,
                flashcards,
            },
        );
        self.recent.lock().unwrap().insert(
            0,
            (
                request.user_id.clone(),
                RecentQuizSummary {
                    quiz_id: quiz_id.clone(),
                    content_name: request.content_name.clone(),
                    created_at: "2025-01-01T00:00:00Z".into(),
                },
            ),
        );
        Ok(quiz_id)
    }

    async fn get_quiz(&self, quiz_id: &str) -> Result<Quiz, QuizError> {
        self.record_call();
        self.quizzes
            .lock()
            .unwrap()
            .get(quiz_id)
            .cloned()
            .ok_or_else(|| Self::not_found("quiz", quiz_id))
    }

    async fn get_flashcards(&self, quiz_id: &str) -> Result<Vec<Flashcard>, QuizError> {
        self.record_call();
        self.quizzes
            .lock()
            .unwrap()
            .get(quiz_id)
            .map(|q| q.flashcards.clone())
            .ok_or_else(|| Self::not_found("quiz", quiz_id))
    }

    async fn get_recent_quizzes(&self) -> Result<Vec<RecentQuizSummary>, QuizError> {
        self.record_call();
        Ok(self
            .recent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn get_user_quizzes(&self, user_id: &str) -> Result<Vec<RecentQuizSummary>, QuizError> {
        self.record_call();
        Ok(self
            .recent
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn get_leaderboard(&self, quiz_id: &str) -> Result<Vec<LeaderboardEntry>, QuizError> {
        self.record_call();
        Ok(self
            .leaderboards
            .lock()
            .unwrap()
            .get(quiz_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit_score(
        &self,
        quiz_id: &str,
        player_name: &str,
        score: u32,
    ) -> Result<(), QuizError> {
        self.record_call();
        if self.fail_submissions {
            return Err(QuizError::Server {
                status: 503,
                message: "score service unavailable".into(),
            });
        }
        self.submissions.lock().unwrap().push(Submission {
            quiz_id: quiz_id.to_string(),
            player_name: player_name.to_string(),
            score,
        });
        self.leaderboards
            .lock()
            .unwrap()
            .entry(quiz_id.to_string())
            .or_default()
            .push(LeaderboardEntry {
                player_name: player_name.to_string(),
                score: i64::from(score),
            });
        Ok(())
    }
}
