mod app;
mod commands;

use anyhow::Result;
use app::App;
use pdf_chat::{ChatConfig, RagClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ChatConfig::from_env()?;
    let client = RagClient::new(&config);
    log::info!("Using RAG endpoint {}", client.endpoint());

    App::new(Arc::new(client)).run().await
}
