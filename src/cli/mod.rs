pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "webtoon-api")]
#[command(about = "Webtoon API - CRUD service for webtoon records")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Print a signed bearer token for the write routes")]
    Token(commands::token::TokenArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args, config).await,
        Some(Commands::Token(args)) => commands::token::handle(args, &config),
        None => commands::serve::handle(commands::serve::ServeArgs::default(), config).await,
    }
}
