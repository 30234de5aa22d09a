//! End-to-end flows over the in-memory quiz service.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use quizdeck_client::mock::MockQuizApi;
use quizdeck_client::{AuthContext, SessionStore, View};
use quizdeck_core::leaderboard::Leaderboard;
use quizdeck_core::model::{
    CreateQuizRequest, Flashcard, LeaderboardEntry, Question, QuestionType, Quiz,
};
use quizdeck_core::review::FlashcardReview;
use quizdeck_core::runner::{QuizRunner, RunnerConfig, SessionEvent};
use quizdeck_core::traits::{NoopObserver, QuizApi};

fn two_question_quiz() -> Quiz {
    Quiz {
        id: "q-cells".into(),
        title: Some("Cells".into()),
        questions: vec![
            Question::multiple_choice(
                "Which organelle makes ATP?",
                ["Nucleus", "Mitochondria", "Ribosome"],
                "Mitochondria",
            )
            .unwrap(),
            Question::binary("Plant cells have walls", "True").unwrap(),
        ],
        flashcards: vec![
            Flashcard {
                term: "ATP".into(),
                definition: "Energy currency of the cell".into(),
            },
            Flashcard {
                term: "Ribosome".into(),
                definition: "Builds proteins".into(),
            },
            Flashcard {
                term: "Nucleus".into(),
                definition: "Holds DNA".into(),
            },
        ],
    }
}

fn runner(api: Arc<MockQuizApi>) -> QuizRunner {
    QuizRunner::new(
        api,
        RunnerConfig {
            time_budget: 30,
            tick_interval: Duration::from_secs(1),
        },
    )
}

#[tokio::test(start_paused = true)]
async fn answer_then_time_out_then_see_leaderboard() {
    let api = Arc::new(MockQuizApi::new().with_quiz(two_question_quiz()).with_leaderboard(
        "q-cells",
        vec![LeaderboardEntry {
            player_name: "Al".into(),
            score: 2,
        }],
    ));

    let (tx, rx) = mpsc::channel(8);
    tx.send(SessionEvent::Choose(2)).await.unwrap();
    tx.send(SessionEvent::Advance).await.unwrap();
    tx.send(SessionEvent::Advance).await.unwrap();

    let driver = tokio::spawn(async move {
        // Second question is left alone until the countdown runs out.
        tokio::time::sleep(Duration::from_secs(45)).await;
        tx.send(SessionEvent::Advance).await.unwrap();
    });

    let outcome = runner(api.clone())
        .run("q-cells", "Bo", rx, &NoopObserver)
        .await
        .unwrap();
    driver.await.unwrap();

    assert!(outcome.completed);
    assert!(outcome.submitted);
    assert_eq!(outcome.score, 1);
    assert_eq!(outcome.total, 2);

    let board = Leaderboard::rank_non_empty(
        "q-cells",
        api.get_leaderboard("q-cells").await.unwrap(),
    )
    .unwrap();
    assert_eq!(board.leader().unwrap().player_name, "Al");
    let mine = board.find_player("Bo").unwrap();
    assert_eq!(mine.rank, 2);
    assert_eq!(mine.score, 1);
}

#[tokio::test(start_paused = true)]
async fn failed_submission_still_completes() {
    let api = Arc::new(
        MockQuizApi::new()
            .with_quiz(two_question_quiz())
            .failing_submissions(),
    );

    let (tx, rx) = mpsc::channel(8);
    for event in [
        SessionEvent::Choose(2),
        SessionEvent::Advance,
        SessionEvent::Advance,
        SessionEvent::Select("True".into()),
        SessionEvent::Advance,
        SessionEvent::Advance,
    ] {
        tx.send(event).await.unwrap();
    }

    let outcome = runner(api.clone())
        .run("q-cells", "Bo", rx, &NoopObserver)
        .await
        .unwrap();
    assert!(outcome.completed);
    assert!(!outcome.submitted);
    assert_eq!(outcome.score, 2);
    assert!(api.get_leaderboard("q-cells").await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_quiz_fails_to_load() {
    let api = Arc::new(MockQuizApi::new());
    let (_tx, rx) = mpsc::channel(1);
    let err = runner(api)
        .run("missing", "Bo", rx, &NoopObserver)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn create_then_review_flashcards() {
    let mut auth = AuthContext::load(SessionStore::in_memory());
    assert!(auth.require(View::CreateQuiz).is_err());
    let identity = auth.login("Ada").unwrap();

    let api = MockQuizApi::new();
    let quiz_id = api
        .create_quiz(&CreateQuizRequest {
            text: "Osmosis moves water across membranes.".into(),
            question_type: QuestionType::TrueFalse,
            num_options: 2,
            num_questions: 2,
            include_flashcards: true,
            content_name: "Osmosis".into(),
            user_id: identity.user_id.clone(),
        })
        .await
        .unwrap();

    let mine = api.get_user_quizzes(&identity.user_id).await.unwrap();
    assert_eq!(mine[0].quiz_id, quiz_id);

    let cards = api.get_flashcards(&quiz_id).await.unwrap();
    let mut review = FlashcardReview::new(cards).unwrap();
    assert_eq!(review.visible_text(), "Osmosis");
    review.flip();
    assert_eq!(review.visible_text(), "Osmosis moves water across membranes.");
}

#[tokio::test]
async fn mastered_cards_are_skipped_when_hidden() {
    let api = MockQuizApi::new().with_quiz(two_question_quiz());
    let cards = api.get_flashcards("q-cells").await.unwrap();

    let mut review = FlashcardReview::new(cards).unwrap();
    review.next();
    review.toggle_mastered();
    review.previous();
    review.toggle_show_mastered();

    assert_eq!(review.next(), 2);
    assert_eq!(review.next(), 0);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        assert_ne!(review.shuffle(&mut rng), 1);
    }
}

#[tokio::test]
async fn empty_flashcards_are_an_empty_result() {
    let mut quiz = two_question_quiz();
    quiz.flashcards.clear();
    let api = MockQuizApi::new().with_quiz(quiz);

    let err = FlashcardReview::new(api.get_flashcards("q-cells").await.unwrap()).unwrap_err();
    assert!(err.is_empty_result());
}
