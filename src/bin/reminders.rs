//! Runs the daily Slack reminder pass.
//!
//! Usage:
//!
//! ```text
//! corkboard-reminders [--once]
//! ```
//!
//! Without arguments the process sleeps until `CORKBOARD_REMINDER_HOUR`
//! local time, runs one pass, and repeats every day. `--once` runs a single
//! pass immediately and exits. Logging honours `RUST_LOG`.

use chrono::{Local, NaiveDateTime};
use corkboard::config::Settings;
use corkboard::reminder::adapters::SlackClient;
use corkboard::reminder::services::ReminderService;
use corkboard::store::adapters::PostgresStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Wait used when the next run time cannot be computed.
const RETRY_AFTER: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let store = Arc::new(PostgresStore::connect(&settings.database_url)?);
    let slack = Arc::new(SlackClient::new(
        settings.slack.client_id.clone(),
        settings.slack.client_secret.clone(),
    )?);
    let service = ReminderService::new(store, slack);

    if std::env::args().skip(1).any(|arg| arg == "--once") {
        run_pass(&service).await;
        return Ok(());
    }

    loop {
        let wait = until_next_run(Local::now().naive_local(), settings.reminder_hour);
        info!(wait_secs = wait.as_secs(), "waiting for the next reminder pass");
        tokio::time::sleep(wait).await;
        run_pass(&service).await;
    }
}

async fn run_pass(service: &ReminderService<PostgresStore>) {
    let today = Local::now().date_naive();
    if let Err(err) = service.run(today).await {
        error!(%today, error = %err, "reminder pass failed");
    }
}

/// Time from `now` until the next `hour:00`, today if still ahead, else
/// tomorrow.
fn until_next_run(now: NaiveDateTime, hour: u32) -> Duration {
    let date = now.date();
    date.and_hms_opt(hour, 0, 0)
        .filter(|run| *run > now)
        .or_else(|| date.succ_opt().and_then(|next| next.and_hms_opt(hour, 0, 0)))
        .and_then(|run| (run - now).to_std().ok())
        .unwrap_or(RETRY_AFTER)
}
