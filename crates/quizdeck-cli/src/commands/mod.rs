//! Subcommands and the state they share.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use quizdeck_client::auth::{AuthContext, Identity, NoTokenProvider, StaticTokenProvider, View};
use quizdeck_client::config::{create_api, load_config_from, QuizdeckConfig};
use quizdeck_client::{HttpQuizApi, SessionStore};

pub mod create;
pub mod flashcards;
pub mod home;
pub mod init;
pub mod leaderboard;
pub mod login;
pub mod logout;
pub mod play;
pub mod recent;
pub mod result;
pub mod whoami;

/// Configuration and signed-in state, loaded once per invocation.
pub struct Context {
    pub config: QuizdeckConfig,
    pub auth: AuthContext,
}

impl Context {
    /// Load config and the stored session. With `refresh_token`, the
    /// configured token is mirrored into the session store first.
    pub async fn load(
        config_path: Option<&Path>,
        base_url: Option<String>,
        refresh_token: bool,
    ) -> Result<Self> {
        let mut config = load_config_from(config_path)?;
        if let Some(url) = base_url {
            config.base_url = url;
        }
        tracing::debug!(?config, "configuration loaded");

        let store = SessionStore::open(config.session_path())?;
        let mut auth = AuthContext::load(store);
        if refresh_token {
            match &config.auth_token {
                Some(token) => auth.refresh_token(&StaticTokenProvider::new(token)).await?,
                None => auth.refresh_token(&NoTokenProvider).await?,
            };
        }

        Ok(Self { config, auth })
    }

    pub fn api(&self) -> Result<Arc<HttpQuizApi>> {
        let token = self.auth.token().map(str::to_string);
        Ok(Arc::new(create_api(&self.config, token)?))
    }

    /// Identity for a protected view.
    pub fn require(&self, view: View) -> Result<Identity> {
        self.auth.require(view)
    }
}

/// Lines typed on stdin, read on a dedicated thread.
///
/// The channel closes at end of input.
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}
