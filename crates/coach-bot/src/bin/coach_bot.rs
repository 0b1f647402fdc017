use std::sync::Arc;

use coach_bot::CoachConfig;
use database::Database;
use message_listener::{stdin_messages, ConsoleSender, MessageProcessor};
use openai_brain::OpenAiBrain;
use orchestrator::{Orchestrator, WeeklyReminder};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = CoachConfig::from_env()?;
    info!("Opening database at {}", config.sqlite_url);
    let database = Database::connect(&config.sqlite_url).await?;
    database.migrate().await?;

    let brain = Arc::new(OpenAiBrain::from_env()?);
    let orchestrator = Arc::new(Orchestrator::new(brain, database.clone(), config.memory));

    let sender = Arc::new(ConsoleSender::stdout());

    let reminder = WeeklyReminder::new(database.clone(), Arc::clone(&sender), config.reminders);
    let reminder_task = tokio::spawn(async move { reminder.run().await });

    info!("Coach is running. Type `@user_id text` lines, Ctrl+D to quit.");
    let processor = MessageProcessor::with_defaults(orchestrator, sender);

    tokio::select! {
        () = processor.run(stdin_messages()) => info!("Input closed"),
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received");
        }
    }

    reminder_task.abort();
    database.close().await;
    Ok(())
}
