use pdf_chat::*;
use std::env;

// cargo run -p pdf_chat --example ask -- <file.pdf> "<question>"
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(path), Some(question)) = (args.next(), args.next()) else {
        eprintln!("usage: ask <file.pdf> <question>");
        std::process::exit(2);
    };

    let config = ChatConfig::from_env()?;
    let client = RagClient::new(&config);
    println!("🔍 Asking {}", client.endpoint());

    let incoming = IncomingFile::from_path(&path).await?;
    let Some(file) = UploadIntake::new().pick_file(Some(&incoming)).await? else {
        return Ok(());
    };
    let store = ConversationStore::new().apply(StoreAction::AttachFile(file));

    let mut orchestrator = RequestOrchestrator::new();
    let mut input = question;
    let (store, outcome) = orchestrator.send(&client, &store, &mut input).await;

    if let Some(SendOutcome::Failed(reason)) = &outcome {
        eprintln!("Request failed: {}", reason);
    }
    for message in &store.active().messages {
        println!("{}", message_renderer::render_message(message));
    }

    Ok(())
}
