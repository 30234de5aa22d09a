//! The `quizdeck home` command: the dashboard a signed-in user lands on.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizdeck_client::auth::View;
use quizdeck_core::model::Flashcard;
use quizdeck_core::traits::QuizApi;

use super::recent::print_quizzes;
use super::Context;

const RECENT_SHOWN: usize = 3;
const PREVIEW_CARDS: usize = 4;

/// Fetch failures are logged and leave their section empty.
pub async fn execute(ctx: &Context) -> Result<()> {
    let identity = ctx.require(View::Home)?;
    let api = ctx.api()?;
    show(api.as_ref(), &identity.user_name).await;
    Ok(())
}

pub async fn show(api: &dyn QuizApi, user_name: &str) {
    println!("Welcome, {user_name}!");

    let recent = match api.get_recent_quizzes().await {
        Ok(quizzes) => quizzes,
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch recent quizzes");
            println!("{}", e.user_message("fetch quizzes"));
            return;
        }
    };
    let Some(newest) = recent.first() else {
        println!("No quizzes yet.");
        println!("Create one: quizdeck create --name <QUIZ> --file notes.txt");
        return;
    };

    println!("\nRecent quizzes");
    print_quizzes(&recent[..recent.len().min(RECENT_SHOWN)]);

    match api.get_flashcards(&newest.quiz_id).await {
        Ok(cards) if cards.is_empty() => {}
        Ok(cards) => {
            println!("\nFlashcards from {}", newest.content_name);
            print_preview(&cards[..cards.len().min(PREVIEW_CARDS)]);
            println!("Review them all: quizdeck flashcards {}", newest.quiz_id);
        }
        Err(e) => {
            tracing::warn!(quiz_id = %newest.quiz_id, error = %e, "failed to fetch flashcard preview");
        }
    }
    println!("Play the newest quiz: quizdeck play {}", newest.quiz_id);
}

fn print_preview(cards: &[Flashcard]) {
    let mut table = Table::new();
    table.set_header(vec!["Term", "Definition"]);
    for card in cards {
        table.add_row(vec![Cell::new(&card.term), Cell::new(&card.definition)]);
    }
    println!("{table}");
}
