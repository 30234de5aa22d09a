//! The `quizdeck leaderboard` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizdeck_client::auth::View;
use quizdeck_core::leaderboard::Leaderboard;
use quizdeck_core::traits::QuizApi;

use super::Context;

pub async fn execute(ctx: &Context, quiz_id: &str) -> Result<()> {
    ctx.require(View::Leaderboard)?;
    let api = ctx.api()?;

    let entries = api.get_leaderboard(quiz_id).await.map_err(|e| {
        let message = e.user_message("fetch leaderboard");
        anyhow::Error::new(e).context(message)
    })?;
    match Leaderboard::rank_non_empty(quiz_id, entries) {
        Ok(board) => print_leaderboard(&board, None),
        Err(e) if e.is_empty_result() => print_empty(quiz_id),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Render the ranked table, marking `highlight`'s row.
pub fn print_leaderboard(board: &Leaderboard, highlight: Option<&str>) {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Player", "Score"]);

    for entry in &board.entries {
        let name = if highlight == Some(entry.player_name.as_str()) {
            format!("{} (you)", entry.player_name)
        } else {
            entry.player_name.clone()
        };
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(name),
            Cell::new(entry.score),
        ]);
    }

    println!("{table}");
}

pub fn print_empty(quiz_id: &str) {
    println!("No scores yet for quiz {quiz_id}.");
    println!("Be the first: quizdeck play {quiz_id}");
}
