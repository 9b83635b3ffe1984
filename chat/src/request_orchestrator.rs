use crate::conversation_store::{ConversationStore, StoreAction};
use crate::models::*;
use crate::rag_client::RagBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Sending,
}

/// How a send ended: no file to ask about, an answer, or a transport/application failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Skipped,
    Answered(String),
    Failed(String),
}

impl SendOutcome {
    /// Text of the bot message this outcome produces. Failure reasons are never shown.
    pub fn reply_text(&self) -> &str {
        match self {
            SendOutcome::Skipped => UPLOAD_FIRST,
            SendOutcome::Answered(answer) => answer,
            SendOutcome::Failed(_) => REQUEST_FAILED,
        }
    }
}

/// A question that left `Idle`, bound to the conversation it was asked in.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub conversation_id: String,
    pub question: String,
    pub file: Option<AttachedFile>,
}

#[derive(Debug)]
pub struct RequestOrchestrator {
    state: RequestState,
}

impl RequestOrchestrator {
    pub fn new() -> Self {
        Self {
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == RequestState::Sending
    }

    /// Leaves `Idle` if the input holds a question: appends it as a user message,
    /// clears the input and raises the loading flag. Returns `None` otherwise,
    /// leaving both the store and the input untouched.
    pub fn begin(
        &mut self,
        store: &ConversationStore,
        input: &mut String,
    ) -> Option<(ConversationStore, PendingRequest)> {
        if self.state == RequestState::Sending {
            log::warn!("A request is already in flight, ignoring send");
            return None;
        }

        let question = input.trim().to_string();
        if question.is_empty() {
            return None;
        }
        input.clear();

        let active = store.active();
        let request = PendingRequest {
            conversation_id: active.id.clone(),
            question: question.clone(),
            file: active.attached_file.clone(),
        };

        self.state = RequestState::Sending;
        let store = store.apply(StoreAction::AppendMessage(Message::user(question)));

        Some((store, request))
    }

    /// Appends the bot reply for `outcome` and returns to `Idle`.
    pub fn finish(
        &mut self,
        store: &ConversationStore,
        request: &PendingRequest,
        outcome: &SendOutcome,
    ) -> ConversationStore {
        self.state = RequestState::Idle;

        store.apply(StoreAction::AppendMessageTo {
            conversation_id: request.conversation_id.clone(),
            message: Message::bot(outcome.reply_text()),
        })
    }

    /// Runs a whole send in place. Returns the new store and, if the send
    /// left `Idle`, its outcome.
    pub async fn send<B>(
        &mut self,
        backend: &B,
        store: &ConversationStore,
        input: &mut String,
    ) -> (ConversationStore, Option<SendOutcome>)
    where
        B: RagBackend + ?Sized,
    {
        let Some((store, request)) = self.begin(store, input) else {
            return (store.clone(), None);
        };

        let outcome = dispatch(backend, &request).await;
        let store = self.finish(&store, &request, &outcome);

        (store, Some(outcome))
    }
}

impl Default for RequestOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Performs the network side of a send. Never fails: errors become `SendOutcome::Failed`.
pub async fn dispatch<B>(backend: &B, request: &PendingRequest) -> SendOutcome
where
    B: RagBackend + ?Sized,
{
    let Some(file) = &request.file else {
        log::info!("No PDF attached to {}, skipping RAG call", request.conversation_id);
        return SendOutcome::Skipped;
    };

    match backend.ask(&request.question, file).await {
        Ok(answer) => SendOutcome::Answered(answer),
        Err(e) => {
            log::error!("RAG request failed: {:#}", e);
            SendOutcome::Failed(e.to_string())
        }
    }
}
