//! The `quizdeck login` command.

use anyhow::Result;

use quizdeck_client::auth::{RouteDecision, View};

use super::Context;

pub async fn execute(ctx: &mut Context, name: &str) -> Result<()> {
    if ctx.auth.guard(View::SignIn) == RouteDecision::RedirectHome {
        if let Some(identity) = ctx.auth.identity() {
            println!(
                "Already signed in as {}; run `quizdeck logout` to switch.\n",
                identity.user_name
            );
            return super::home::execute(ctx).await;
        }
    }

    let identity = ctx.auth.login(name)?;
    if ctx.auth.player_name().is_none() {
        ctx.auth.set_player_name(&identity.user_name)?;
    }
    println!("Signed in as {} ({})", identity.user_name, identity.user_id);
    Ok(())
}
