//! Library Desk - terminal circulation client
//!
//! Connects to the library REST API and runs the desk in the terminal.

use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_desk::{
    config::AppConfig,
    services,
    terminal::{self, TerminalUi},
    ui::Ui,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Logs go to stderr so they never interleave with the desk output
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_desk={}", config.logging.level).into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }

    tracing::info!("Starting Library Desk v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using API at {}", config.api.base_url);

    let ui = TerminalUi::new(io::stdin().lock(), io::stdout());
    let mut desk = services::connect(&config, ui);

    let report = desk.bootstrap().await;
    for (step, error) in report.failures() {
        desk.ui_mut()
            .alert(&format!("Could not load {}: {}", step, error.user_message()));
    }
    desk.ui_mut().show_active()?;

    terminal::run(&mut desk).await?;

    tracing::info!("Library Desk stopped");
    Ok(())
}
