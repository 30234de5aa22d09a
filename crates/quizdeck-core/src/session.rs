//! Quiz session state machine.
//!
//! A session walks a fixed question list: `Loading`, then each question is
//! first unanswered and then answered, and after the last one the session is
//! `Completed`. Everything here is synchronous; the countdown task and the
//! score submission live in [`crate::runner`].

use crate::error::QuizError;
use crate::model::{Question, Quiz};

/// Countdown budget per question, in time units (seconds by default).
pub const QUESTION_TIME_BUDGET: u32 = 30;

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    InProgress { index: usize, answered: bool },
    Completed,
}

/// Result of evaluating one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// 0-based question index.
    pub index: usize,
    /// What the player had selected, if anything.
    pub selection: Option<String>,
    pub correct_answer: String,
    pub correct: bool,
    /// Evaluation was forced by the countdown.
    pub timed_out: bool,
}

/// What an input did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Not allowed in the current phase; nothing changed.
    Ignored,
    /// The selection buffer was updated.
    Selected,
    /// The countdown moved without expiring.
    Ticked { remaining: u32 },
    /// The current question was evaluated.
    Evaluated(AnswerOutcome),
    /// Moved to the next question with a fresh countdown.
    NextQuestion { index: usize },
    /// Terminal; carries the score to submit. Returned at most once.
    Completed { score: u32 },
}

/// One player's traversal of a quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz_id: String,
    title: Option<String>,
    questions: Vec<Question>,
    phase: SessionPhase,
    selection: Option<String>,
    correct: u32,
    evaluations: usize,
    remaining: u32,
    time_budget: u32,
    last_outcome: Option<AnswerOutcome>,
}

impl QuizSession {
    /// A session waiting for its quiz to be fetched.
    pub fn new(quiz_id: impl Into<String>) -> Self {
        Self {
            quiz_id: quiz_id.into(),
            title: None,
            questions: Vec::new(),
            phase: SessionPhase::Loading,
            selection: None,
            correct: 0,
            evaluations: 0,
            remaining: QUESTION_TIME_BUDGET,
            time_budget: QUESTION_TIME_BUDGET,
            last_outcome: None,
        }
    }

    /// Override the per-question countdown budget (minimum 1).
    pub fn with_time_budget(mut self, budget: u32) -> Self {
        self.time_budget = budget.max(1);
        self.remaining = self.time_budget;
        self
    }

    /// Convenience: a session already started on `quiz`.
    pub fn start(quiz: Quiz) -> Result<Self, QuizError> {
        let mut session = Self::new(quiz.id.clone());
        session.load(quiz)?;
        Ok(session)
    }

    /// `Loading -> InProgress(0, unanswered)`.
    ///
    /// A quiz without questions leaves the session in `Loading` and reports
    /// an empty result.
    pub fn load(&mut self, quiz: Quiz) -> Result<(), QuizError> {
        if self.phase != SessionPhase::Loading {
            return Err(QuizError::InvalidRequest(format!(
                "session for quiz {} is already loaded",
                self.quiz_id
            )));
        }
        if quiz.questions.is_empty() {
            return Err(QuizError::EmptyResult("questions"));
        }
        self.title = quiz.title;
        self.questions = quiz.questions;
        self.phase = SessionPhase::InProgress {
            index: 0,
            answered: false,
        };
        self.selection = None;
        self.remaining = self.time_budget;
        Ok(())
    }

    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Quiz")
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Number of correct answers so far.
    pub fn score(&self) -> u32 {
        self.correct
    }

    /// Number of questions evaluated so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn time_budget(&self) -> u32 {
        self.time_budget
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            SessionPhase::InProgress { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.questions.get(i))
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.phase, SessionPhase::InProgress { answered: true, .. })
    }

    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    /// Fraction of the quiz reached, counting the current question.
    pub fn progress(&self) -> f64 {
        match self.phase {
            SessionPhase::Loading => 0.0,
            SessionPhase::InProgress { index, .. } => (index + 1) as f64 / self.total() as f64,
            SessionPhase::Completed => 1.0,
        }
    }

    /// Record a selection while the current question is unanswered.
    ///
    /// Only one of the current question's `choices()` is accepted.
    pub fn select(&mut self, answer: impl Into<String>) -> Transition {
        let answer = answer.into();
        let SessionPhase::InProgress {
            answered: false, ..
        } = self.phase
        else {
            return Transition::Ignored;
        };
        let offered = self
            .current_question()
            .is_some_and(|q| q.choices().iter().any(|c| *c == answer));
        if !offered {
            tracing::debug!(%answer, "selection is not one of the choices");
            return Transition::Ignored;
        }
        self.selection = Some(answer);
        Transition::Selected
    }

    /// Select the `choice`-th (1-based) choice of the current question.
    pub fn select_choice(&mut self, choice: usize) -> Transition {
        let picked = self
            .current_question()
            .and_then(|q| q.choices().get(choice.wrapping_sub(1)).map(|c| c.to_string()));
        match picked {
            Some(answer) => self.select(answer),
            None => Transition::Ignored,
        }
    }

    /// The explicit "next" action.
    ///
    /// Unanswered with a selection: evaluate. Unanswered without one: no-op.
    /// Answered: move on, or complete after the last question.
    pub fn advance(&mut self) -> Transition {
        match self.phase {
            SessionPhase::InProgress {
                answered: false, ..
            } => {
                if self.selection.is_none() {
                    return Transition::Ignored;
                }
                self.evaluate(false)
            }
            SessionPhase::InProgress {
                index,
                answered: true,
            } => {
                if index + 1 < self.questions.len() {
                    let next = index + 1;
                    self.phase = SessionPhase::InProgress {
                        index: next,
                        answered: false,
                    };
                    self.selection = None;
                    self.remaining = self.time_budget;
                    Transition::NextQuestion { index: next }
                } else {
                    self.phase = SessionPhase::Completed;
                    Transition::Completed {
                        score: self.correct,
                    }
                }
            }
            SessionPhase::Loading | SessionPhase::Completed => Transition::Ignored,
        }
    }

    /// One countdown step. Reaching zero forces evaluation.
    pub fn tick(&mut self) -> Transition {
        match self.phase {
            SessionPhase::InProgress {
                answered: false, ..
            } => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.evaluate(true)
                } else {
                    Transition::Ticked {
                        remaining: self.remaining,
                    }
                }
            }
            _ => Transition::Ignored,
        }
    }

    /// Countdown expiry: evaluate with whatever is selected, even nothing.
    pub fn expire(&mut self) -> Transition {
        match self.phase {
            SessionPhase::InProgress {
                answered: false, ..
            } => {
                self.remaining = 0;
                self.evaluate(true)
            }
            _ => Transition::Ignored,
        }
    }

    fn evaluate(&mut self, timed_out: bool) -> Transition {
        let SessionPhase::InProgress { index, .. } = self.phase else {
            return Transition::Ignored;
        };
        let question = &self.questions[index];
        let correct = self
            .selection
            .as_deref()
            .is_some_and(|s| question.is_correct(s));
        if correct {
            self.correct += 1;
        }
        self.evaluations += 1;
        self.phase = SessionPhase::InProgress {
            index,
            answered: true,
        };
        let outcome = AnswerOutcome {
            index,
            selection: self.selection.clone(),
            correct_answer: question.answer.clone(),
            correct,
            timed_out,
        };
        tracing::debug!(
            quiz_id = %self.quiz_id,
            index,
            correct,
            timed_out,
            "question evaluated"
        );
        self.last_outcome = Some(outcome.clone());
        Transition::Evaluated(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_question_quiz() -> Quiz {
        Quiz {
            id: "quiz-1".into(),
            title: Some("Letters".into()),
            questions: vec![
                Question::multiple_choice("First?", ["A", "B"], "A").unwrap(),
                Question::multiple_choice("Second?", ["C", "D"], "D").unwrap(),
            ],
            flashcards: vec![],
        }
    }

    fn quiz_of(n: usize) -> Quiz {
        Quiz {
            id: "quiz-n".into(),
            title: None,
            questions: (0..n)
                .map(|i| Question::binary(format!("Statement {i}"), "True").unwrap())
                .collect(),
            flashcards: vec![],
        }
    }

    #[test]
    fn two_question_scenario() {
        let mut session = QuizSession::start(two_question_quiz()).unwrap();
        assert_eq!(session.remaining(), QUESTION_TIME_BUDGET);

        assert_eq!(session.select("A"), Transition::Selected);
        match session.advance() {
            Transition::Evaluated(outcome) => assert!(outcome.correct),
            other => panic!("expected evaluation, got {other:?}"),
        }
        assert_eq!(session.score(), 1);
        assert_eq!(session.advance(), Transition::NextQuestion { index: 1 });

        session.select("C");
        match session.advance() {
            Transition::Evaluated(outcome) => {
                assert!(!outcome.correct);
                assert_eq!(outcome.correct_answer, "D");
            }
            other => panic!("expected evaluation, got {other:?}"),
        }
        assert_eq!(session.score(), 1);

        assert_eq!(session.advance(), Transition::Completed { score: 1 });
        assert!(session.is_completed());
        // Completion is reported exactly once.
        assert_eq!(session.advance(), Transition::Ignored);
    }

    #[test]
    fn advance_without_selection_is_a_no_op() {
        let mut session = QuizSession::start(two_question_quiz()).unwrap();
        assert_eq!(session.advance(), Transition::Ignored);
        assert_eq!(
            session.phase(),
            SessionPhase::InProgress {
                index: 0,
                answered: false
            }
        );
        assert_eq!(session.evaluations(), 0);
    }

    #[test]
    fn countdown_expiry_without_selection_counts_incorrect() {
        let mut session = QuizSession::start(two_question_quiz()).unwrap().with_time_budget(3);
        assert_eq!(session.tick(), Transition::Ticked { remaining: 2 });
        assert_eq!(session.tick(), Transition::Ticked { remaining: 1 });
        match session.tick() {
            Transition::Evaluated(outcome) => {
                assert!(outcome.timed_out);
                assert!(!outcome.correct);
                assert_eq!(outcome.selection, None);
            }
            other => panic!("expected forced evaluation, got {other:?}"),
        }
        assert_eq!(session.score(), 0);
        assert!(session.is_answered());
        // The countdown is stopped once answered.
        assert_eq!(session.tick(), Transition::Ignored);
        assert_eq!(session.advance(), Transition::NextQuestion { index: 1 });
        assert_eq!(session.remaining(), 3);
    }

    #[test]
    fn countdown_expiry_uses_held_selection() {
        let mut session = QuizSession::start(two_question_quiz()).unwrap();
        session.select("A");
        match session.expire() {
            Transition::Evaluated(outcome) => {
                assert!(outcome.correct);
                assert!(outcome.timed_out);
            }
            other => panic!("expected forced evaluation, got {other:?}"),
        }
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn selection_is_frozen_after_evaluation() {
        let mut session = QuizSession::start(two_question_quiz()).unwrap();
        session.select("B");
        session.advance();
        assert_eq!(session.select("A"), Transition::Ignored);
        assert_eq!(session.selection(), Some("B"));
    }

    #[test]
    fn select_rejects_text_outside_the_choices() {
        let mut session = QuizSession::start(quiz_of(1)).unwrap();
        assert_eq!(session.select("true"), Transition::Ignored);
        assert_eq!(session.select("Yes"), Transition::Ignored);
        assert_eq!(session.selection(), None);
        assert_eq!(session.advance(), Transition::Ignored);

        assert_eq!(session.select("True"), Transition::Selected);
        match session.advance() {
            Transition::Evaluated(outcome) => assert!(outcome.correct),
            other => panic!("expected evaluation, got {other:?}"),
        }
    }

    #[test]
    fn select_choice_maps_to_options() {
        let mut session = QuizSession::start(two_question_quiz()).unwrap();
        assert_eq!(session.select_choice(2), Transition::Selected);
        assert_eq!(session.selection(), Some("B"));
        assert_eq!(session.select_choice(0), Transition::Ignored);
        assert_eq!(session.select_choice(3), Transition::Ignored);
    }

    #[test]
    fn empty_quiz_stays_loading() {
        let mut session = QuizSession::new("empty");
        let err = session.load(quiz_of(0)).unwrap_err();
        assert!(err.is_empty_result());
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert_eq!(session.advance(), Transition::Ignored);
        assert_eq!(session.tick(), Transition::Ignored);
    }

    #[test]
    fn loading_twice_is_rejected() {
        let mut session = QuizSession::start(quiz_of(1)).unwrap();
        assert!(session.load(quiz_of(1)).is_err());
    }

    #[test]
    fn n_questions_take_n_evaluations() {
        for n in 1..=6 {
            let mut session = QuizSession::start(quiz_of(n)).unwrap();
            let mut evaluated = 0;
            loop {
                if !session.is_answered() {
                    // Alternate between answering and letting the clock run out.
                    if evaluated % 2 == 0 {
                        session.select("True");
                    }
                    let t = if session.selection().is_some() {
                        session.advance()
                    } else {
                        session.expire()
                    };
                    assert!(matches!(t, Transition::Evaluated(_)));
                    evaluated += 1;
                }
                if let Transition::Completed { .. } = session.advance() {
                    break;
                }
            }
            assert_eq!(evaluated, n);
            assert_eq!(session.evaluations(), n);
        }
    }

    #[test]
    fn score_is_monotonic_and_bounded() {
        let mut session = QuizSession::start(quiz_of(5)).unwrap();
        let answers = ["True", "False", "True", "True", "False"];
        let mut previous = 0;
        for answer in answers {
            session.select(answer);
            session.advance();
            let index = session.current_index().unwrap();
            let bonus = u32::from(session.last_outcome().is_some_and(|o| o.correct));
            assert!(session.score() >= previous);
            assert!(session.score() <= index as u32 + bonus);
            previous = session.score();
            session.advance();
        }
        assert!(session.is_completed());
        assert_eq!(session.score(), 3);
    }

    #[test]
    fn progress_tracks_current_question() {
        let mut session = QuizSession::start(quiz_of(4)).unwrap();
        assert_eq!(session.progress(), 0.25);
        session.expire();
        session.advance();
        assert_eq!(session.progress(), 0.5);
    }
}
