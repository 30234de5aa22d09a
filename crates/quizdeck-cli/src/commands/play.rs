//! The `quizdeck play` command.

use anyhow::{bail, Result};
use tokio::sync::mpsc;

use quizdeck_client::auth::View;
use quizdeck_core::runner::{QuizRunner, SessionEvent};
use quizdeck_core::session::{AnswerOutcome, QuizSession};
use quizdeck_core::traits::SessionObserver;

use super::{stdin_lines, Context};

/// Console renderer for a running session.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_question(&self, session: &QuizSession) {
        let (Some(index), Some(question)) = (session.current_index(), session.current_question())
        else {
            return;
        };
        println!(
            "\nQuestion {}/{}  (score {}, {}s)",
            index + 1,
            session.total(),
            session.score(),
            session.remaining()
        );
        println!("{}", question.prompt);
        for (i, choice) in question.choices().iter().enumerate() {
            println!("  {}. {choice}", i + 1);
        }
        println!("Type a number to select, enter to submit, q to quit.");
    }

    fn on_tick(&self, remaining: u32) {
        if remaining % 10 == 0 || remaining <= 5 {
            println!("  {remaining}s left");
        }
    }

    fn on_answered(&self, _session: &QuizSession, outcome: &AnswerOutcome) {
        if outcome.correct {
            println!("Correct!");
        } else if outcome.timed_out && outcome.selection.is_none() {
            println!("Time's up! The answer was: {}", outcome.correct_answer);
        } else {
            println!("Wrong. The answer was: {}", outcome.correct_answer);
        }
        println!("Press enter for the next question.");
    }

    fn on_rejected(&self, reason: &str) {
        println!("  ({reason})");
    }

    fn on_completed(&self, score: u32, total: usize) {
        println!("\nQuiz complete! You scored {score}/{total}.");
    }
}

/// Map one typed line onto a session input.
fn parse_event(line: &str) -> SessionEvent {
    let line = line.trim();
    if line.is_empty() {
        return SessionEvent::Advance;
    }
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return SessionEvent::Quit;
    }
    match line.parse::<usize>() {
        Ok(n) => SessionEvent::Choose(n),
        Err(_) => SessionEvent::Select(line.to_string()),
    }
}

pub async fn execute(ctx: &mut Context, quiz_id: &str, player: Option<String>) -> Result<()> {
    ctx.require(View::Quiz)?;
    let mut lines = stdin_lines();

    let player = match player.or_else(|| ctx.auth.player_name().map(str::to_string)) {
        Some(name) => name,
        None => {
            println!("Enter your name for the leaderboard:");
            match lines.recv().await {
                Some(name) => name,
                None => bail!("no player name given"),
            }
        }
    };
    let player = ctx.auth.set_player_name(&player)?;

    let api = ctx.api()?;
    let runner = QuizRunner::new(api.clone(), ctx.config.runner_config());

    let (tx, rx) = mpsc::channel(16);
    let forward = tokio::spawn(async move {
        while let Some(line) = lines.recv().await {
            if tx.send(parse_event(&line)).await.is_err() {
                break;
            }
        }
    });

    let outcome = runner.run(quiz_id, &player, rx, &ConsoleObserver).await;
    forward.abort();
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) if e.is_empty_result() => {
            println!("This quiz has no questions.");
            println!("Try another one: quizdeck recent");
            return Ok(());
        }
        Err(e) => {
            let message = e.user_message("load quiz");
            return Err(anyhow::Error::new(e).context(message));
        }
    };

    if !outcome.completed {
        println!("\nQuiz abandoned at {}/{}.", outcome.score, outcome.total);
        return Ok(());
    }
    if !outcome.submitted {
        println!("(Your score could not be submitted.)");
    }

    println!();
    super::result::show(api.as_ref(), quiz_id, &player, Some(outcome.total)).await;
    Ok(())
}
