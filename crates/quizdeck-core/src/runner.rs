//! Quiz session runner.
//!
//! Owns one [`QuizSession`] and its [`Countdown`], and processes player
//! events and countdown ticks one at a time. The countdown is restarted on
//! every question change and cancelled on every way out of the unanswered
//! state: evaluation, completion, quit, or the runner going away.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::instrument;

use crate::error::QuizError;
use crate::session::{QuizSession, Transition, QUESTION_TIME_BUDGET};
use crate::timer::Countdown;
use crate::traits::{QuizApi, SessionObserver};

/// Input from the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Select an answer by its text.
    Select(String),
    /// Select the n-th (1-based) choice of the current question.
    Choose(usize),
    /// The "next" action.
    Advance,
    /// Leave the quiz without finishing it.
    Quit,
}

/// Configuration for the runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Countdown budget per question, in ticks.
    pub time_budget: u32,
    /// Wall-clock length of one tick.
    pub tick_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            time_budget: QUESTION_TIME_BUDGET,
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub quiz_id: String,
    pub score: u32,
    pub total: usize,
    /// The last question was passed; `false` when the player quit.
    pub completed: bool,
    /// The score submission call succeeded.
    pub submitted: bool,
}

/// Drives a quiz session against the quiz service.
pub struct QuizRunner {
    api: Arc<dyn QuizApi>,
    config: RunnerConfig,
}

impl QuizRunner {
    pub fn new(api: Arc<dyn QuizApi>, config: RunnerConfig) -> Self {
        Self { api, config }
    }

    /// Fetch the quiz and move a fresh session out of `Loading`.
    pub async fn load(&self, quiz_id: &str) -> Result<QuizSession, QuizError> {
        let quiz = self.api.get_quiz(quiz_id).await?;
        let mut session = QuizSession::new(quiz_id).with_time_budget(self.config.time_budget);
        session.load(quiz)?;
        Ok(session)
    }

    /// Run a whole session until completion or until the player quits.
    ///
    /// Fetch failures are returned. A failed score submission is logged and
    /// reported through [`QuizOutcome::submitted`], never as an error.
    #[instrument(skip(self, events, observer))]
    pub async fn run(
        &self,
        quiz_id: &str,
        player_name: &str,
        mut events: mpsc::Receiver<SessionEvent>,
        observer: &dyn SessionObserver,
    ) -> Result<QuizOutcome, QuizError> {
        let mut session = self.load(quiz_id).await?;
        tracing::info!(questions = session.total(), "quiz loaded");

        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::new(self.config.tick_interval);

        observer.on_question(&session);
        countdown.start(0, tick_tx.clone());

        loop {
            let transition = tokio::select! {
                event = events.recv() => {
                    let event = event.unwrap_or(SessionEvent::Quit);
                    if event == SessionEvent::Quit {
                        countdown.cancel();
                        tracing::info!(score = session.score(), "quiz abandoned");
                        return Ok(QuizOutcome {
                            quiz_id: quiz_id.to_string(),
                            score: session.score(),
                            total: session.total(),
                            completed: false,
                            submitted: false,
                        });
                    }
                    let transition = apply(&mut session, &event);
                    if transition == Transition::Ignored {
                        observer.on_rejected(rejection_reason(&session, &event));
                    }
                    transition
                }
                Some(tick) = tick_rx.recv() => {
                    if session.current_index() == Some(tick.index) {
                        session.tick()
                    } else {
                        tracing::trace!(stale = tick.index, "discarding stale tick");
                        Transition::Ignored
                    }
                }
            };

            match transition {
                Transition::Ignored | Transition::Selected => {}
                Transition::Ticked { remaining } => observer.on_tick(remaining),
                Transition::Evaluated(outcome) => {
                    countdown.cancel();
                    observer.on_answered(&session, &outcome);
                }
                Transition::NextQuestion { index } => {
                    observer.on_question(&session);
                    countdown.start(index, tick_tx.clone());
                }
                Transition::Completed { score } => {
                    countdown.cancel();
                    let submitted = self.submit(quiz_id, player_name, score).await;
                    observer.on_completed(score, session.total());
                    return Ok(QuizOutcome {
                        quiz_id: quiz_id.to_string(),
                        score,
                        total: session.total(),
                        completed: true,
                        submitted,
                    });
                }
            }
        }
    }

    /// Submit a final score. Failures are logged and swallowed so the
    /// results view is always reachable.
    async fn submit(&self, quiz_id: &str, player_name: &str, score: u32) -> bool {
        match self.api.submit_score(quiz_id, player_name, score).await {
            Ok(()) => {
                tracing::info!(quiz_id, player_name, score, "score submitted");
                true
            }
            Err(e) => {
                tracing::warn!(quiz_id, error = %e, "failed to submit score");
                false
            }
        }
    }
}

fn apply(session: &mut QuizSession, event: &SessionEvent) -> Transition {
    match event {
        SessionEvent::Select(answer) => session.select(answer.as_str()),
        SessionEvent::Choose(n) => session.select_choice(*n),
        SessionEvent::Advance => session.advance(),
        SessionEvent::Quit => Transition::Ignored,
    }
}

/// Why `event` changed nothing.
fn rejection_reason(session: &QuizSession, event: &SessionEvent) -> &'static str {
    match event {
        SessionEvent::Select(_) | SessionEvent::Choose(_) if session.is_answered() => {
            "already answered, press enter for the next question"
        }
        SessionEvent::Select(_) | SessionEvent::Choose(_) => "not a valid choice",
        SessionEvent::Advance | SessionEvent::Quit => "select an answer first",
    }
}
