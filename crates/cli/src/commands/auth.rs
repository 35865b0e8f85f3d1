//! Sign-in commands.

use clap::Args;

use gophic_client::auth::OAuthCallback;
use gophic_client::session::{KEY_USER_EMAIL, KEY_USER_NAME, KEY_USER_PICTURE_URL};

use super::Context;

/// Arguments for `gophic callback`
#[derive(Debug, Args)]
pub struct CallbackArgs {
    /// Full redirect URL the browser landed on after signing in
    pub url: String,
}

pub async fn login(ctx: &Context) -> anyhow::Result<()> {
    let url = ctx.api.google_login_url().await?;
    println!("Open this URL in a browser to sign in:");
    println!();
    println!("  {url}");
    println!();
    println!("Then run `gophic callback '<redirect url>'` with the page you land on.");
    Ok(())
}

pub fn callback(ctx: &Context, args: &CallbackArgs) -> anyhow::Result<()> {
    let identity = OAuthCallback::from_url(&args.url)?;
    identity.store(ctx.session.as_ref())?;
    println!("Signed in as {} <{}>", identity.name, identity.email);
    Ok(())
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.session.clear_identity()?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> anyhow::Result<()> {
    if ctx.session.auth_token().is_none() {
        println!("Not signed in");
        return Ok(());
    }

    let name = ctx.session.get(KEY_USER_NAME).unwrap_or_default();
    let email = ctx.session.get(KEY_USER_EMAIL).unwrap_or_default();
    println!("{name} <{email}>");
    if let Some(picture) = ctx.session.get(KEY_USER_PICTURE_URL) {
        println!("Picture: {picture}");
    }
    Ok(())
}
