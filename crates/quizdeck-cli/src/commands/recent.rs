//! The `quizdeck recent` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizdeck_client::auth::View;
use quizdeck_core::model::RecentQuizSummary;
use quizdeck_core::traits::QuizApi;

use super::Context;

pub async fn execute(ctx: &Context, mine: bool, limit: usize) -> Result<()> {
    let identity = ctx.require(View::RecentQuizzes)?;
    let api = ctx.api()?;

    let quizzes = if mine {
        api.get_user_quizzes(&identity.user_id).await
    } else {
        api.get_recent_quizzes().await
    }
    .map_err(|e| {
        let message = e.user_message("fetch quizzes");
        anyhow::Error::new(e).context(message)
    })?;

    if quizzes.is_empty() {
        if mine {
            println!("You have not created any quizzes yet.");
        } else {
            println!("No quizzes yet.");
        }
        println!("Create one: quizdeck create --name <QUIZ> --file notes.txt");
        return Ok(());
    }

    print_quizzes(&quizzes[..quizzes.len().min(limit)]);
    Ok(())
}

pub fn print_quizzes(quizzes: &[RecentQuizSummary]) {
    let mut table = Table::new();
    table.set_header(vec!["Quiz ID", "Name", "Created"]);

    for quiz in quizzes {
        let created = quiz
            .created_at_utc()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| quiz.created_at.clone());
        table.add_row(vec![
            Cell::new(&quiz.quiz_id),
            Cell::new(&quiz.content_name),
            Cell::new(created),
        ]);
    }

    println!("{table}");
}
