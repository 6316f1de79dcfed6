mod calendar;
mod config;
mod generate;
mod github;
mod icons;
mod streak;
mod svg;
mod theme;
mod tiles;

use anyhow::{bail, Result};
use clap::Parser;
use config::{Args, Config};
use github::{fetch_viewer_login, GitHubClient};
use log::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = Args::parse();
    if args.token.is_none() {
        args.token = std::env::var("GITHUB_TOKEN").ok();
    }
    let config = Config::try_from(args)?;

    let client = GitHubClient::new(config.token.clone(), config.retry)
        .with_endpoints(config.graphql_url.clone(), config.api_url.clone());

    let login = match &config.username {
        Some(login) => login.clone(),
        None => fetch_viewer_login(&client).await?,
    };

    let cards = config.selection.cards();
    let mut failed = Vec::new();
    for card in cards {
        match generate::generate(card, &client, &config, &login).await {
            Ok(_) => {}
            Err(err) => {
                error!("Failed to generate {} card: {:#}", card, err);
                failed.push(card.as_str());
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} card(s) failed: {}", failed.len(), failed.join(", "));
    }

    info!("Done! SVGs saved to {}", config.output.display());
    Ok(())
}
