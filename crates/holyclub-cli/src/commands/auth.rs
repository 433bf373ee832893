//! Session commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use holyclub_core::{Credential, TokenStore};
use holyclub_http::RefreshOutcome;

use crate::output;
use crate::session::{CliSession, SessionConfig};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Exchange a browser session cookie for a token
    Login(LoginArgs),

    /// End the session
    Logout,

    /// Display the signed-in user
    Whoami(WhoamiArgs),

    /// Ask the backend for a new token
    Refresh,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Session cookie from a browser login, as NAME=VALUE (repeatable)
    #[arg(long = "cookie", value_name = "NAME=VALUE")]
    pub cookies: Vec<String>,

    /// Store this token directly instead of exchanging a cookie
    #[arg(long, conflicts_with = "cookies")]
    pub token: Option<String>,
}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(cmd: AuthCommand, config: &SessionConfig) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login(args, config).await,
        AuthSubcommand::Logout => logout(config).await,
        AuthSubcommand::Whoami(args) => whoami(args, config).await,
        AuthSubcommand::Refresh => refresh(config).await,
    }
}

async fn login(args: LoginArgs, config: &SessionConfig) -> Result<()> {
    let session = CliSession::open(config)?;

    if let Some(token) = args.token {
        let credential = Credential::parse(&token).context("Token is empty or malformed")?;
        session
            .store()
            .set(credential)
            .context("Failed to save token")?;
        output::success("Token stored");
        return Ok(());
    }

    for cookie in &args.cookies {
        if !cookie.contains('=') {
            bail!("Invalid cookie '{}', expected NAME=VALUE", cookie);
        }
        session.cookies().add(cookie);
    }

    eprintln!("{}", "Logging in...".dimmed());

    session
        .club()
        .exchange_token()
        .await
        .context("Failed to login")?;
    session.save()?;

    output::success("Logged in successfully");
    output::field("Backend", session.club().api().as_str());

    Ok(())
}

async fn logout(config: &SessionConfig) -> Result<()> {
    let session = CliSession::open(config)?;

    session.club().logout().await.context("Failed to logout")?;
    session.save()?;

    output::success("Logged out");
    Ok(())
}

async fn whoami(args: WhoamiArgs, config: &SessionConfig) -> Result<()> {
    let session = CliSession::open_logged_in(config)?;

    let me = session
        .club()
        .me()
        .await
        .context("Failed to load profile");
    session.save()?;
    let me = me?;

    if args.json {
        return output::json_pretty(&me);
    }

    output::field("Nickname", &me.nickname);
    if let Some(id) = me.id {
        output::field("ID", &id.to_string());
    }
    if let Some(created) = &me.created_at {
        output::field("Joined", created);
    }
    if let Some(picture) = &me.profile {
        output::field("Picture", &session.club().file_url(picture));
    }

    Ok(())
}

async fn refresh(config: &SessionConfig) -> Result<()> {
    let session = CliSession::open(config)?;

    eprintln!("{}", "Refreshing token...".dimmed());

    let outcome = session.club().fetch().refresh().await;
    session.save()?;

    match outcome {
        RefreshOutcome::Renewed(_) => output::success("Token refreshed"),
        RefreshOutcome::SoftFail(Some(_)) => output::success("Token restored from session cookie"),
        RefreshOutcome::SoftFail(None) => bail!("Refresh declined and no session cookie is set"),
        RefreshOutcome::ForceLogout => bail!("The server ended the session"),
        RefreshOutcome::Failed => bail!("Failed to refresh token"),
    }

    Ok(())
}
