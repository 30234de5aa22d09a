//! The `quizdeck flashcards` command.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizdeck_client::auth::View;
use quizdeck_core::review::{Face, FlashcardReview, MasteryChange};
use quizdeck_core::traits::QuizApi;

use super::{stdin_lines, Context};

const KEYS: &str = "[n]ext [p]rev [f]lip [m]astered [h]ide/show mastered [s]huffle [q]uit";

pub async fn execute(ctx: &Context, quiz_id: &str) -> Result<()> {
    ctx.require(View::Flashcards)?;
    let api = ctx.api()?;

    let cards = api.get_flashcards(quiz_id).await.map_err(|e| {
        let message = e.user_message("load flashcards");
        anyhow::Error::new(e).context(message)
    })?;
    let mut review = match FlashcardReview::new(cards) {
        Ok(review) => review,
        Err(e) if e.is_empty_result() => {
            println!("No flashcards available for quiz {quiz_id}.");
            println!("Create a quiz with --flashcards, or play this one: quizdeck play {quiz_id}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut rng = StdRng::from_entropy();
    let mut lines = stdin_lines();
    render(&review);

    while let Some(line) = lines.recv().await {
        match line.trim().to_ascii_lowercase().as_str() {
            "n" | "" => {
                review.next();
            }
            "p" => {
                review.previous();
            }
            "f" => {
                review.flip();
            }
            "m" => {
                if review.toggle_mastered() == MasteryChange::Mastered {
                    println!("*** Mastered! ***");
                }
            }
            "h" => {
                if review.toggle_show_mastered() {
                    println!("Showing all cards");
                } else {
                    println!("Hiding mastered cards");
                }
            }
            "s" => {
                review.shuffle(&mut rng);
            }
            "q" => break,
            other => {
                println!("Unknown key {other:?}. {KEYS}");
                continue;
            }
        }
        render(&review);
    }

    println!(
        "\nMastered {}/{} cards.",
        review.mastered_count(),
        review.len()
    );
    Ok(())
}

fn render(review: &FlashcardReview) {
    let side = match review.face() {
        Face::Term => "Term",
        Face::Definition => "Definition",
    };
    let mark = if review.current_is_mastered() { " [mastered]" } else { "" };
    println!(
        "\nCard {}/{}{mark}  ({:.0}% mastered)",
        review.index() + 1,
        review.len(),
        review.progress() * 100.0
    );
    println!("{side}: {}", review.visible_text());
    println!("{KEYS}");
}
