//! quizdeck CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use quizdeck_core::model::QuestionType;

mod commands;

#[derive(Parser)]
#[command(name = "quizdeck", version, about = "Take AI-generated quizzes and review flashcards")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quiz service base URL (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter quizdeck.toml
    Init,

    /// Sign in under a display name
    Login {
        #[arg(long)]
        name: String,
    },

    /// Sign out and forget the cached identity and token
    Logout,

    /// Show the signed-in identity and player name
    Whoami,

    /// Show the newest quizzes and a flashcard preview
    Home,

    /// Generate a quiz from source text
    Create {
        /// Quiz name
        #[arg(long)]
        name: String,

        /// Source text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// Read source text from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// multiple_choice, true_false or mix
        #[arg(long)]
        question_type: Option<QuestionType>,

        #[arg(long)]
        num_questions: Option<u32>,

        /// Options per multiple-choice question
        #[arg(long)]
        num_options: Option<u32>,

        /// Also generate flashcards
        #[arg(long)]
        flashcards: bool,
    },

    /// Take a quiz
    Play {
        quiz_id: String,

        /// Player name shown on the leaderboard
        #[arg(long)]
        player: Option<String>,
    },

    /// Review the flashcards of a quiz
    Flashcards { quiz_id: String },

    /// Show your score and the leaderboard for a quiz
    Result {
        quiz_id: String,

        #[arg(long)]
        player: Option<String>,
    },

    /// Show the ranked leaderboard for a quiz
    Leaderboard { quiz_id: String },

    /// List recently created quizzes
    Recent {
        /// Only quizzes you created
        #[arg(long)]
        mine: bool,

        /// Max rows to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

impl Commands {
    /// Whether the command talks to the quiz service.
    fn calls_api(&self) -> bool {
        !matches!(self, Commands::Init | Commands::Logout | Commands::Whoami)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizdeck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        command => run(command, cli.config, cli.base_url).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(command: Commands, config: Option<PathBuf>, base_url: Option<String>) -> anyhow::Result<()> {
    let mut ctx =
        commands::Context::load(config.as_deref(), base_url, command.calls_api()).await?;

    match command {
        Commands::Init => commands::init::execute(),
        Commands::Login { name } => commands::login::execute(&mut ctx, &name).await,
        Commands::Logout => commands::logout::execute(&mut ctx),
        Commands::Whoami => commands::whoami::execute(&ctx),
        Commands::Home => commands::home::execute(&ctx).await,
        Commands::Create {
            name,
            text,
            file,
            question_type,
            num_questions,
            num_options,
            flashcards,
        } => {
            commands::create::execute(
                &ctx,
                commands::create::CreateArgs {
                    name,
                    text,
                    file,
                    question_type,
                    num_questions,
                    num_options,
                    flashcards,
                },
            )
            .await
        }
        Commands::Play { quiz_id, player } => {
            commands::play::execute(&mut ctx, &quiz_id, player).await
        }
        Commands::Flashcards { quiz_id } => commands::flashcards::execute(&ctx, &quiz_id).await,
        Commands::Result { quiz_id, player } => {
            commands::result::execute(&ctx, &quiz_id, player).await
        }
        Commands::Leaderboard { quiz_id } => commands::leaderboard::execute(&ctx, &quiz_id).await,
        Commands::Recent { mine, limit } => commands::recent::execute(&ctx, mine, limit).await,
    }
}
