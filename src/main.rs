use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{info, warn};

use hr_chat_client::config::Settings;
use hr_chat_client::services::input_loop::{self, QUIT_COMMAND};
use hr_chat_client::services::renderer::TerminalSink;
use hr_chat_client::services::session_store::FileStore;
use hr_chat_client::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(settings.log_level)
        .init();

    let store = Arc::new(FileStore::new(settings.store_path.clone()));
    let sink = Arc::new(TerminalSink::stdout(settings.locale));
    let state = AppState::new(&settings, store, sink)?;

    if let Err(e) = state.client.health().await {
        warn!(url = %settings.base_url, error = %e, "health check failed; continuing anyway");
    }

    println!(
        "💬 HR chat on {} (session {}). Type {QUIT_COMMAND} to leave.",
        settings.base_url,
        state.client.session_id()
    );

    let summary = input_loop::run(BufReader::new(tokio::io::stdin()), state.client.clone()).await;
    info!(?summary, "chat session ended");
    Ok(())
}
