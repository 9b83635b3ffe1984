use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use pdf_chat::*;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Debug, Clone)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Clone)]
struct MockRag {
    received: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
    reply: fn() -> Response,
}

async fn rag(State(mock): State<MockRag>, mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            data,
        });
    }
    mock.received.lock().unwrap().push(fields);
    (mock.reply)()
}

async fn spawn_mock(reply: fn() -> Response) -> (ChatConfig, Arc<Mutex<Vec<Vec<ReceivedField>>>>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/rag", post(rag)).with_state(MockRag {
        received: received.clone(),
        reply,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ChatConfig::from_endpoint(Some(&format!("http://{}/rag", addr))).unwrap();
    (config, received)
}

async fn store_with_pdf(dir: &TempDir, name: &str, content: &[u8]) -> ConversationStore {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();

    let incoming = IncomingFile::from_path(&path).await.unwrap();
    let file = UploadIntake::new()
        .pick_file(Some(&incoming))
        .await
        .unwrap()
        .unwrap();

    ConversationStore::new().apply(StoreAction::AttachFile(file))
}

fn last_text(store: &ConversationStore) -> String {
    store.active().messages.last().unwrap().text.clone()
}

#[tokio::test]
async fn test_answer_from_endpoint() {
    let (config, received) =
        spawn_mock(|| Json(json!({ "davIa": "This is a summary." })).into_response()).await;
    let client = RagClient::new(&config);
    let dir = TempDir::new().unwrap();
    let store = store_with_pdf(&dir, "report.pdf", b"%PDF-1.7 test").await;

    let mut orchestrator = RequestOrchestrator::new();
    let mut input = "Summarize page 1".to_string();
    let (store, outcome) = orchestrator.send(&client, &store, &mut input).await;

    assert_eq!(
        outcome,
        Some(SendOutcome::Answered("This is a summary.".to_string()))
    );
    assert_eq!(last_text(&store), "This is a summary.");
    assert!(!orchestrator.is_loading());

    let requests = received.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let fields = &requests[0];

    let ask = fields.iter().find(|f| f.name == "ask").unwrap();
    assert_eq!(ask.data, b"Summarize page 1");

    let file = fields.iter().find(|f| f.name == "file").unwrap();
    assert_eq!(file.file_name.as_deref(), Some("report.pdf"));
    assert_eq!(file.content_type.as_deref(), Some(PDF_CONTENT_TYPE));
    assert_eq!(file.data, b"%PDF-1.7 test");
}

#[tokio::test]
async fn test_server_error_becomes_apology() {
    let (config, received) =
        spawn_mock(|| (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()).await;
    let client = RagClient::new(&config);
    let dir = TempDir::new().unwrap();
    let store = store_with_pdf(&dir, "report.pdf", b"%PDF").await;

    let mut orchestrator = RequestOrchestrator::new();
    let mut input = "Summarize page 1".to_string();
    let (store, outcome) = orchestrator.send(&client, &store, &mut input).await;

    assert!(matches!(outcome, Some(SendOutcome::Failed(_))));
    assert_eq!(last_text(&store), REQUEST_FAILED);
    assert!(!last_text(&store).contains("boom"));
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_answer_field_falls_back() {
    let (config, _received) =
        spawn_mock(|| Json(json!({ "answer": "wrong key" })).into_response()).await;
    let client = RagClient::new(&config);
    let dir = TempDir::new().unwrap();
    let store = store_with_pdf(&dir, "report.pdf", b"%PDF").await;

    let mut input = "What is this?".to_string();
    let (store, _) = RequestOrchestrator::new()
        .send(&client, &store, &mut input)
        .await;

    assert_eq!(last_text(&store), UNABLE_TO_PROCESS);
}

#[tokio::test]
async fn test_wrong_shape_json_falls_back() {
    let replies: [fn() -> Response; 3] = [
        || Json(json!({ "davIa": 42 })).into_response(),
        || Json(json!("hello")).into_response(),
        || Json(json!([1, 2])).into_response(),
    ];

    for reply in replies {
        let (config, _received) = spawn_mock(reply).await;
        let client = RagClient::new(&config);
        let dir = TempDir::new().unwrap();
        let store = store_with_pdf(&dir, "report.pdf", b"%PDF").await;

        let mut input = "Summarize page 1".to_string();
        let (store, outcome) = RequestOrchestrator::new()
            .send(&client, &store, &mut input)
            .await;

        assert_eq!(
            outcome,
            Some(SendOutcome::Answered(UNABLE_TO_PROCESS.to_string()))
        );
        assert_eq!(last_text(&store), UNABLE_TO_PROCESS);
    }
}

#[tokio::test]
async fn test_malformed_json_is_failure() {
    let (config, _received) = spawn_mock(|| "not json".into_response()).await;
    let client = RagClient::new(&config);
    let dir = TempDir::new().unwrap();
    let store = store_with_pdf(&dir, "report.pdf", b"%PDF").await;

    let mut input = "What is this?".to_string();
    let (store, outcome) = RequestOrchestrator::new()
        .send(&client, &store, &mut input)
        .await;

    assert!(matches!(outcome, Some(SendOutcome::Failed(_))));
    assert_eq!(last_text(&store), REQUEST_FAILED);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ChatConfig::from_endpoint(Some(&format!("http://{}/rag", addr))).unwrap();
    let client = RagClient::new(&config);
    let dir = TempDir::new().unwrap();
    let store = store_with_pdf(&dir, "report.pdf", b"%PDF").await;

    let mut orchestrator = RequestOrchestrator::new();
    let mut input = "Anyone there?".to_string();
    let (store, outcome) = orchestrator.send(&client, &store, &mut input).await;

    assert!(matches!(outcome, Some(SendOutcome::Failed(_))));
    assert_eq!(last_text(&store), REQUEST_FAILED);
    assert!(!orchestrator.is_loading());
}

#[tokio::test]
async fn test_no_file_never_reaches_endpoint() {
    let (config, received) =
        spawn_mock(|| Json(json!({ "davIa": "should not be asked" })).into_response()).await;
    let client = RagClient::new(&config);

    let mut orchestrator = RequestOrchestrator::new();
    let mut input = "What is this about?".to_string();
    let (store, outcome) = orchestrator
        .send(&client, &ConversationStore::new(), &mut input)
        .await;

    assert_eq!(outcome, Some(SendOutcome::Skipped));
    assert_eq!(last_text(&store), UPLOAD_FIRST);
    assert!(!orchestrator.is_loading());
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_pick_is_never_attached() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.pdf");
    std::fs::File::create(&path)
        .unwrap()
        .set_len(6 * 1024 * 1024)
        .unwrap();

    let incoming = IncomingFile::from_path(&path).await.unwrap();
    let store = ConversationStore::new();
    let result = UploadIntake::new().pick_file(Some(&incoming)).await;

    let store = match result {
        Ok(Some(file)) => store.apply(StoreAction::AttachFile(file)),
        Ok(None) => store,
        Err(e) => {
            assert!(matches!(e, IntakeError::TooLarge { .. }));
            store
        }
    };

    assert!(!store.active().has_file());
    assert_eq!(store.active().messages.len(), 1);
}
