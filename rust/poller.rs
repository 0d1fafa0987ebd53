//! The polling state machine.
//!
//! Every cycle walks `Fetching -> Validating -> Formatting -> Comparing ->
//! Notifying` and then sleeps for a fixed period. Any failure before
//! `Comparing` abandons the cycle without touching [`PollState`]; the loop
//! always falls through to the same sleep, so failures are retried at the
//! regular cadence.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;

use crate::error::CycleError;
use crate::practicum::HomeworkSource;
use crate::telegram::{Messenger, Notifier};
use crate::validate::check_response;
use crate::verdict::format_status;

/// State carried between cycles. Owned by the [`Poller`] alone.
#[derive(Debug, Default)]
pub struct PollState {
    /// Last message handed to the notifier.
    last_message: Option<String>,
    /// `from_date` used by the most recent cycle.
    cursor: i64,
}

impl PollState {
    #[cfg(test)]
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    #[cfg(test)]
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Stores `message` if it differs from the held one. Returns whether it changed.
    fn record(&mut self, message: &str) -> bool {
        if self.last_message.as_deref() == Some(message) {
            return false;
        }
        self.last_message = Some(message.to_string());
        true
    }
}

#[derive(Debug)]
pub enum CycleOutcome {
    /// Status changed; `delivered` is false when the messenger failed.
    Notified { message: String, delivered: bool },
    Unchanged,
    Failed(CycleError),
}

pub struct Poller<S, M> {
    source: S,
    notifier: Notifier<M>,
    retry_period: Duration,
    state: PollState,
}

impl<S, M> Poller<S, M>
where
    S: HomeworkSource,
    M: Messenger,
{
    pub fn new(source: S, notifier: Notifier<M>, retry_period: Duration) -> Self {
        Self {
            source,
            notifier,
            retry_period,
            state: PollState::default(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Polls forever, sleeping `retry_period` after every cycle, until `shutdown` resolves.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!(
            retry_period_secs = self.retry_period.as_secs(),
            "Starting homework status polling"
        );

        loop {
            match self.run_cycle(Utc::now().timestamp()).await {
                CycleOutcome::Failed(err) => tracing::error!(error = %err, "Poll cycle failed"),
                CycleOutcome::Notified { message, delivered } => {
                    tracing::debug!(%message, delivered, cursor = self.state.cursor, "Poll cycle notified")
                }
                CycleOutcome::Unchanged => {}
            }

            tokio::select! {
                _ = tokio::time::sleep(self.retry_period) => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping poller");
                    return;
                }
            }
        }
    }

    /// Runs one fetch-validate-format-compare-notify pass with `now` as the cursor.
    pub async fn run_cycle(&mut self, now: i64) -> CycleOutcome {
        let message = match self.fetch_message(now).await {
            Ok(message) => message,
            Err(err) => return CycleOutcome::Failed(err),
        };
        self.state.cursor = now;

        if !self.state.record(&message) {
            tracing::debug!("Homework status unchanged");
            return CycleOutcome::Unchanged;
        }

        tracing::info!(%message, "Homework status changed");
        let delivered = self.notifier.notify(&message).await.is_ok();
        CycleOutcome::Notified { message, delivered }
    }

    async fn fetch_message(&self, cursor: i64) -> Result<String, CycleError> {
        let payload = self.source.fetch(cursor).await?;
        let record = check_response(&payload)?;
        format_status(&record)
    }

    #[cfg(test)]
    fn source(&self) -> &S {
        &self.source
    }

    #[cfg(test)]
    fn notifier(&self) -> &Notifier<M> {
        &self.notifier
    }
}
