pub mod config;
pub mod conversation_store;
pub mod error;
pub mod message_renderer;
pub mod models;
pub mod rag_client;
pub mod request_orchestrator;
pub mod upload_intake;

pub use config::ChatConfig;
pub use conversation_store::{ConversationStore, StoreAction};
pub use error::IntakeError;
pub use message_renderer::MessageRenderer;
pub use models::*;
pub use rag_client::{RagBackend, RagClient};
pub use request_orchestrator::{PendingRequest, RequestOrchestrator, RequestState, SendOutcome};
pub use upload_intake::{IncomingFile, IntakeSource, UploadIntake};
