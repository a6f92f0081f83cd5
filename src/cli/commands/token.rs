use anyhow::Context;
use clap::Args;

use crate::auth::{Claims, TokenVerifier};
use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "Subject placed in the token's sub claim")]
    pub subject: String,

    #[arg(long, help = "Lifetime in hours (defaults to JWT_EXPIRY_HOURS)")]
    pub hours: Option<i64>,
}

pub fn handle(args: TokenArgs, config: &AppConfig) -> anyhow::Result<()> {
    let hours = args
        .hours
        .unwrap_or(config.security.jwt_expiry_hours as i64);
    let ttl = chrono::Duration::try_hours(hours)
        .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
        .context("token lifetime out of range")?;

    let verifier = TokenVerifier::new(&config.security.jwt_secret)?;
    let claims = Claims::new(args.subject, ttl);
    println!("{}", verifier.issue(&claims)?);
    Ok(())
}
