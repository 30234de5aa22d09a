//! HTTP gateway to the quiz service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use quizdeck_core::error::QuizError;
use quizdeck_core::model::{CreateQuizRequest, Flashcard, LeaderboardEntry, Quiz, RecentQuizSummary};
use quizdeck_core::traits::QuizApi;

use crate::schema::{
    decode, CreateQuizResponse, ErrorBody, FlashcardsResponse, LeaderboardResponse, QuizResponse,
    SubmitScoreRequest,
};

pub const DEFAULT_BASE_URL: &str = "https://quizserverfire-production.up.railway.app/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Quiz service client. One fresh request per call; no retries, no cache.
pub struct HttpQuizApi {
    base_url: String,
    token: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpQuizApi {
    pub fn new(base_url: Option<String>, timeout_secs: u64) -> Result<Self, QuizError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| QuizError::Network(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout_secs,
            client,
        })
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, QuizError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                QuizError::Network(format!("request timed out after {}s", self.timeout_secs))
            } else {
                QuizError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(QuizError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn read<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, QuizError> {
        let body = response
            .text()
            .await
            .map_err(|e| QuizError::Network(format!("failed to read response: {e}")))?;
        decode(endpoint, &body)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, path: &str) -> Result<T, QuizError> {
        let response = self.send(self.client.get(self.url(path))).await?;
        Self::read(endpoint, response).await
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Response, QuizError> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }
}

/// Check an identifier before splicing it into a path.
fn segment(id: &str) -> Result<&str, QuizError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
        return Err(QuizError::InvalidRequest(format!("invalid identifier {id:?}")));
    }
    Ok(id)
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    #[instrument(skip(self, request), fields(content_name = %request.content_name))]
    async fn create_quiz(&self, request: &CreateQuizRequest) -> Result<String, QuizError> {
        request.validate()?;
        let response = self.post_json("/create_content", request).await?;
        let created: CreateQuizResponse = Self::read("create_content", response).await?;
        tracing::info!(quiz_id = %created.quiz_id, "quiz created");
        Ok(created.quiz_id)
    }

    #[instrument(skip(self))]
    async fn get_quiz(&self, quiz_id: &str) -> Result<Quiz, QuizError> {
        let id = segment(quiz_id)?;
        let quiz: QuizResponse = self.get_json("quiz", &format!("/quiz/{id}")).await?;
        quiz.into_quiz()
    }

    #[instrument(skip(self))]
    async fn get_flashcards(&self, quiz_id: &str) -> Result<Vec<Flashcard>, QuizError> {
        let id = segment(quiz_id)?;
        let cards: FlashcardsResponse = self
            .get_json("flashcards", &format!("/flashcards/{id}"))
            .await?;
        Ok(cards.flashcards)
    }

    #[instrument(skip(self))]
    async fn get_recent_quizzes(&self) -> Result<Vec<RecentQuizSummary>, QuizError> {
        self.get_json("recent", "/recent").await
    }

    #[instrument(skip(self))]
    async fn get_user_quizzes(&self, user_id: &str) -> Result<Vec<RecentQuizSummary>, QuizError> {
        let id = segment(user_id)?;
        self.get_json("recent/user", &format!("/recent/user/{id}"))
            .await
    }

    #[instrument(skip(self))]
    async fn get_leaderboard(&self, quiz_id: &str) -> Result<Vec<LeaderboardEntry>, QuizError> {
        let id = segment(quiz_id)?;
        let board: LeaderboardResponse = self
            .get_json("leaderboard", &format!("/leaderboard/{id}"))
            .await?;
        Ok(board.leaderboard)
    }

    #[instrument(skip(self))]
    async fn submit_score(
        &self,
        quiz_id: &str,
        player_name: &str,
        score: u32,
    ) -> Result<(), QuizError> {
        let body = SubmitScoreRequest {
            quiz_id,
            player_name,
            score,
        };
        // The acknowledgement body carries nothing we use.
        self.post_json("/submit_score", &body).await?;
        Ok(())
    }
}
