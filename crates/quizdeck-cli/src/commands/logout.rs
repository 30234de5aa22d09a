//! The `quizdeck logout` command.

use anyhow::Result;

use super::Context;

pub fn execute(ctx: &mut Context) -> Result<()> {
    if !ctx.auth.is_signed_in() {
        println!("Not signed in.");
        return Ok(());
    }
    ctx.auth.logout()?;
    println!("Signed out.");
    Ok(())
}
