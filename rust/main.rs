mod config;
mod error;
#[cfg(test)]
mod http_stub;
mod logger;
mod models;
mod poller;
mod practicum;
mod telegram;
mod validate;
mod verdict;

use std::future::Future;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::ConfigError;
use crate::poller::Poller;
use crate::practicum::{HomeworkSource, PracticumClient};
use crate::telegram::{Messenger, Notifier, TelegramMessenger};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logging()?;

    run(Config::from_env(), build_poller, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Halts on an incomplete environment; otherwise builds the poller and runs it until `shutdown`.
async fn run<S, M, B, F>(config: Result<Config, ConfigError>, build: B, shutdown: F) -> Result<()>
where
    S: HomeworkSource,
    M: Messenger,
    B: FnOnce(&Config) -> Result<Poller<S, M>>,
    F: Future<Output = ()>,
{
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            if let ConfigError::MissingCredentials(names) = &err {
                for name in names {
                    tracing::error!(variable = *name, "Required environment variable is not set");
                }
            }
            tracing::error!(error = %err, "Environment is incomplete, stopping the bot");
            return Err(err.into());
        }
    };

    tracing::info!(?config, "Starting homework status bot");

    let mut poller = build(&config)?;
    poller.run_until(shutdown).await;

    tracing::info!("Homework status bot stopped");
    Ok(())
}

fn build_poller(config: &Config) -> Result<Poller<PracticumClient, TelegramMessenger>> {
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let source = PracticumClient::from_config(http.clone(), config);
    let notifier = Notifier::new(
        TelegramMessenger::from_config(http, config),
        config.telegram_chat_id.clone(),
    );

    Ok(Poller::new(source, notifier, config.retry_period))
}
