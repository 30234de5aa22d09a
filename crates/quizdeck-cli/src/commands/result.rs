//! The `quizdeck result` command and the post-quiz results view.

use anyhow::Result;

use quizdeck_client::auth::View;
use quizdeck_core::leaderboard::Leaderboard;
use quizdeck_core::traits::QuizApi;

use super::leaderboard::{print_empty, print_leaderboard};
use super::Context;

pub async fn execute(ctx: &Context, quiz_id: &str, player: Option<String>) -> Result<()> {
    ctx.require(View::Result)?;
    let player = player
        .or_else(|| ctx.auth.player_name().map(str::to_string))
        .unwrap_or_default();
    let api = ctx.api()?;
    show(api.as_ref(), quiz_id, &player, None).await;
    Ok(())
}

/// Render the results view. Fetch failures are reported inline so the view
/// is always reachable; `total` stands in for the question count when the
/// quiz itself cannot be fetched.
pub async fn show(api: &dyn QuizApi, quiz_id: &str, player: &str, total: Option<usize>) {
    let (quiz, entries) =
        futures::future::join(api.get_quiz(quiz_id), api.get_leaderboard(quiz_id)).await;

    let total = match quiz {
        Ok(quiz) => {
            println!("Results: {}", quiz.display_title());
            Some(quiz.questions.len())
        }
        Err(e) => {
            tracing::warn!(quiz_id, error = %e, "failed to fetch quiz for results");
            println!("Results for quiz {quiz_id}");
            total
        }
    };

    let entries = match entries {
        Ok(entries) => entries,
        Err(e) => {
            println!("{}", e.user_message("fetch results"));
            println!("Try again: quizdeck result {quiz_id}");
            return;
        }
    };

    let board = Leaderboard::rank(quiz_id, entries);
    match board.find_player(player) {
        Some(mine) => {
            let total = total.map_or_else(|| "?".to_string(), |n| n.to_string());
            println!(
                "Your score: {}/{total} (rank {} of {})",
                mine.score,
                mine.rank,
                board.len()
            );
        }
        None if !player.is_empty() => println!("No score recorded for {player}."),
        None => {}
    }
    if board.is_empty() {
        print_empty(quiz_id);
    } else {
        print_leaderboard(&board, Some(player));
    }
}
