//! Signed-in identity, cached player name and bearer token.
//!
//! An [`AuthContext`] is built once at program start from the
//! [`SessionStore`] and handed to every command.

use anyhow::{bail, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::store::{keys, SessionStore};

/// Source of bearer tokens for the quiz service.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when signed out of the provider.
    async fn token(&self) -> Result<Option<String>>;
}

/// Hands out one fixed token.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<Option<String>> {
        Ok(Some(self.token.clone()).filter(|t| !t.is_empty()))
    }
}

/// Never has a token.
pub struct NoTokenProvider;

#[async_trait]
impl TokenProvider for NoTokenProvider {
    async fn token(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub user_name: String,
}

/// Screens reachable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    SignIn,
    Home,
    CreateQuiz,
    Quiz,
    Flashcards,
    Result,
    Leaderboard,
    RecentQuizzes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

impl View {
    pub fn access(self) -> Access {
        match self {
            View::Landing | View::SignIn => Access::Public,
            _ => Access::Protected,
        }
    }
}

/// What the route guard decided for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Public view while signed in.
    RedirectHome,
    /// Protected view while signed out.
    RedirectSignIn,
}

pub struct AuthContext {
    store: SessionStore,
}

impl AuthContext {
    pub fn load(store: SessionStore) -> Self {
        Self { store }
    }

    pub fn identity(&self) -> Option<Identity> {
        let user_id = self.store.get(keys::USER_ID)?;
        let user_name = self.store.get(keys::USER_NAME)?;
        Some(Identity {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity().is_some()
    }

    /// Sign in under `user_name` with a freshly generated user id.
    pub fn login(&mut self, user_name: &str) -> Result<Identity> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            bail!("user name must not be empty");
        }
        let identity = Identity {
            user_id: Uuid::new_v4().simple().to_string(),
            user_name: user_name.to_string(),
        };
        self.store.set(keys::USER_ID, &identity.user_id)?;
        self.store.set(keys::USER_NAME, &identity.user_name)?;
        tracing::info!(user_id = %identity.user_id, "signed in");
        Ok(identity)
    }

    /// Forget identity and token. The cached player name is kept.
    pub fn logout(&mut self) -> Result<()> {
        self.store.remove(keys::USER_ID)?;
        self.store.remove(keys::USER_NAME)?;
        self.store.remove(keys::AUTH_TOKEN)?;
        tracing::info!("signed out");
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.store.get(keys::AUTH_TOKEN)
    }

    /// Mirror the provider's current token into the store.
    pub async fn refresh_token(&mut self, provider: &dyn TokenProvider) -> Result<Option<String>> {
        match provider.token().await {
            Ok(Some(token)) => {
                self.store.set(keys::AUTH_TOKEN, &token)?;
                Ok(Some(token))
            }
            Ok(None) => {
                self.store.remove(keys::AUTH_TOKEN)?;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed");
                self.store.remove(keys::AUTH_TOKEN)?;
                Ok(None)
            }
        }
    }

    pub fn player_name(&self) -> Option<&str> {
        self.store.get(keys::PLAYER_NAME)
    }

    pub fn set_player_name(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            bail!("player name must not be empty");
        }
        self.store.set(keys::PLAYER_NAME, name)?;
        Ok(name.to_string())
    }

    pub fn guard(&self, view: View) -> RouteDecision {
        match (view.access(), self.is_signed_in()) {
            (Access::Public, true) => RouteDecision::RedirectHome,
            (Access::Protected, false) => RouteDecision::RedirectSignIn,
            _ => RouteDecision::Allow,
        }
    }

    /// Identity for a protected view, or an error telling the user to sign in.
    pub fn require(&self, view: View) -> Result<Identity> {
        match (self.guard(view), self.identity()) {
            (RouteDecision::Allow, Some(identity)) => Ok(identity),
            _ => bail!("not signed in; run `quizdeck login --name <NAME>` first"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl TokenProvider for FailingProvider {
        async fn token(&self) -> Result<Option<String>> {
            bail!("provider offline")
        }
    }

    fn context() -> AuthContext {
        AuthContext::load(SessionStore::in_memory())
    }

    #[test]
    fn login_and_logout() {
        let mut auth = context();
        assert!(!auth.is_signed_in());

        let identity = auth.login("  Ada ").unwrap();
        assert_eq!(identity.user_name, "Ada");
        assert_eq!(identity.user_id.len(), 32);
        assert_eq!(auth.identity(), Some(identity));

        auth.set_player_name("Ada L").unwrap();
        auth.logout().unwrap();
        assert!(auth.identity().is_none());
        assert_eq!(auth.player_name(), Some("Ada L"));
    }

    #[test]
    fn login_generates_distinct_ids() {
        let a = context().login("x").unwrap();
        let b = context().login("x").unwrap();
        assert_ne!(a.user_id, b.user_id);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut auth = context();
        assert!(auth.login("   ").is_err());
        assert!(auth.set_player_name("").is_err());
        assert_eq!(auth.player_name(), None);
    }

    #[test]
    fn route_guard() {
        let mut auth = context();
        assert_eq!(auth.guard(View::Landing), RouteDecision::Allow);
        assert_eq!(auth.guard(View::Quiz), RouteDecision::RedirectSignIn);
        assert!(auth.require(View::Leaderboard).is_err());

        auth.login("Bo").unwrap();
        assert_eq!(auth.guard(View::SignIn), RouteDecision::RedirectHome);
        assert_eq!(auth.guard(View::Flashcards), RouteDecision::Allow);
        assert_eq!(auth.require(View::Result).unwrap().user_name, "Bo");
    }

    #[tokio::test]
    async fn token_refresh_mirrors_provider() {
        let mut auth = context();

        let token = auth
            .refresh_token(&StaticTokenProvider::new("tok"))
            .await
            .unwrap();
        assert_eq!(token.as_deref(), Some("tok"));
        assert_eq!(auth.token(), Some("tok"));

        auth.refresh_token(&FailingProvider).await.unwrap();
        assert_eq!(auth.token(), None);

        auth.refresh_token(&StaticTokenProvider::new("tok")).await.unwrap();
        auth.refresh_token(&NoTokenProvider).await.unwrap();
        assert_eq!(auth.token(), None);
    }
}
