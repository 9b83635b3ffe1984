use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Nouvelle discussion";
pub const GREETING: &str = "Bonjour ! Je suis votre assistant IA. Téléchargez un PDF pour commencer à recevoir des questions sur son contenu.";
pub const UPLOAD_FIRST: &str = "Please upload a PDF first to ask questions about its content.";
pub const UNABLE_TO_PROCESS: &str = "Unable to process your request";
pub const REQUEST_FAILED: &str =
    "Sorry, there was an error processing your request. Please try again.";

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
pub const TITLE_MAX_GRAPHEMES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
        }
    }
}

/// A PDF held in memory for the lifetime of the conversation it is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub attached_file: Option<AttachedFile>,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            attached_file: None,
            messages: vec![Message::bot(GREETING)],
        }
    }

    pub fn has_file(&self) -> bool {
        self.attached_file.is_some()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Sidebar entry: what the conversation list shows for each thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub active: bool,
}

/// Body returned by the RAG endpoint.
#[derive(Debug, Deserialize)]
pub struct RagReply {
    #[serde(rename = "davIa", default)]
    pub dav_ia: Option<String>,
}

impl RagReply {
    /// Answer carried by any well-formed JSON body. Bodies of another shape,
    /// including a non-string `davIa`, yield the fixed fallback text.
    pub fn answer_from_value(body: Value) -> String {
        match serde_json::from_value::<RagReply>(body) {
            Ok(reply) => reply.answer_or_fallback(),
            Err(e) => {
                log::warn!("Unexpected RAG response shape: {}", e);
                UNABLE_TO_PROCESS.to_string()
            }
        }
    }

    pub fn answer_or_fallback(self) -> String {
        match self.dav_ia {
            Some(answer) if !answer.is_empty() => answer,
            _ => UNABLE_TO_PROCESS.to_string(),
        }
    }
}

pub fn title_from_filename(filename: &str) -> String {
    filename.graphemes(true).take(TITLE_MAX_GRAPHEMES).collect()
}
