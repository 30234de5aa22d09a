//! The `quizdeck create` command.

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use quizdeck_client::auth::View;
use quizdeck_core::model::{CreateQuizRequest, QuestionType};
use quizdeck_core::traits::QuizApi;

use super::Context;

pub struct CreateArgs {
    pub name: String,
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub question_type: Option<QuestionType>,
    pub num_questions: Option<u32>,
    pub num_options: Option<u32>,
    pub flashcards: bool,
}

pub async fn execute(ctx: &Context, args: CreateArgs) -> Result<()> {
    let identity = ctx.require(View::CreateQuiz)?;

    let text = match (args.text, &args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("provide --text or --file"),
    };

    let defaults = &ctx.config.create;
    let request = CreateQuizRequest {
        text,
        question_type: args.question_type.unwrap_or(defaults.question_type),
        num_options: args.num_options.unwrap_or(defaults.num_options),
        num_questions: args.num_questions.unwrap_or(defaults.num_questions),
        include_flashcards: args.flashcards || defaults.include_flashcards,
        content_name: args.name.trim().to_string(),
        user_id: identity.user_id,
    };

    eprintln!(
        "Generating {} {} questions for \"{}\"...",
        request.num_questions, request.question_type, request.content_name
    );

    let api = ctx.api()?;
    let quiz_id = api.create_quiz(&request).await.map_err(|e| {
        let message = e.user_message("create quiz");
        anyhow::Error::new(e).context(message)
    })?;

    println!("Created quiz {quiz_id}");
    println!("\nNext steps:");
    println!("  quizdeck play {quiz_id}");
    if request.include_flashcards {
        println!("  quizdeck flashcards {quiz_id}");
    }
    Ok(())
}
