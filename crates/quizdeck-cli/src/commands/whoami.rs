//! The `quizdeck whoami` command.

use anyhow::Result;

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    match ctx.auth.identity() {
        Some(identity) => {
            println!("User:   {} ({})", identity.user_name, identity.user_id);
            println!("Player: {}", ctx.auth.player_name().unwrap_or("-"));
            println!(
                "Token:  {}",
                if ctx.auth.token().is_some() { "present" } else { "none" }
            );
        }
        None => println!("Not signed in. Run `quizdeck login --name <NAME>`."),
    }
    Ok(())
}
