//! The `quizdeck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizdeck.toml").exists() {
        println!("quizdeck.toml already exists, skipping.");
    } else {
        std::fs::write("quizdeck.toml", SAMPLE_CONFIG)?;
        println!("Created quizdeck.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizdeck login --name <NAME>");
    println!("  2. Run: quizdeck create --name <QUIZ> --file notes.txt");
    println!("  3. Run: quizdeck play <QUIZ_ID>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdeck configuration

base_url = "https://quizserverfire-production.up.railway.app/api"
timeout_secs = 30

# Seconds per question
question_time_secs = 30
tick_interval_ms = 1000

# Bearer token for the quiz service
# auth_token = "${QUIZDECK_TOKEN}"

[create]
question_type = "multiple_choice"
num_questions = 5
num_options = 4
include_flashcards = false
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizdeck.toml");
        std::fs::write(&path, SAMPLE_CONFIG).unwrap();

        let config = quizdeck_client::load_config_from(Some(&path)).unwrap();
        assert_eq!(config.question_time_secs, 30);
        assert_eq!(config.create.num_options, 4);
        assert!(config.auth_token.is_none() || std::env::var("QUIZDECK_TOKEN").is_ok());
    }
}
