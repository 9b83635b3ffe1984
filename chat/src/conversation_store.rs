use crate::models::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum StoreAction {
    Create,
    Select(String),
    AttachFile(AttachedFile),
    RemoveFile,
    AppendMessage(Message),
    AppendMessageTo { conversation_id: String, message: Message },
    Delete(String),
}

/// Immutable snapshot of every conversation plus the active id.
///
/// Cloning is cheap: the conversation list sits behind an `Arc` and every
/// action produces a fresh list instead of editing the shared one, so a clone
/// taken before an action keeps observing the old state.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    conversations: Arc<Vec<Conversation>>,
    active_id: String,
}

impl ConversationStore {
    pub fn new() -> Self {
        let first = Conversation::new();
        let active_id = first.id.clone();
        Self {
            conversations: Arc::new(vec![first]),
            active_id,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> &Conversation {
        self.get(&self.active_id)
            .unwrap_or(&self.conversations[0])
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn can_delete(&self) -> bool {
        self.conversations.len() > 1
    }

    pub fn summaries(&self) -> Vec<ConversationSummary> {
        self.conversations
            .iter()
            .map(|c| ConversationSummary {
                id: c.id.clone(),
                title: c.title.clone(),
                message_count: c.messages.len(),
                active: c.id == self.active_id,
            })
            .collect()
    }

    pub fn apply(&self, action: StoreAction) -> Self {
        reduce(self, action)
    }

    fn map_conversation<F>(&self, id: &str, update: F) -> Self
    where
        F: FnOnce(&Conversation) -> Conversation,
    {
        let mut conversations = self.conversations.as_ref().clone();
        if let Some(slot) = conversations.iter_mut().find(|c| c.id == id) {
            *slot = update(slot);
        }

        Self {
            conversations: Arc::new(conversations),
            active_id: self.active_id.clone(),
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn reduce(state: &ConversationStore, action: StoreAction) -> ConversationStore {
    match action {
        StoreAction::Create => {
            let conversation = Conversation::new();
            let active_id = conversation.id.clone();
            let mut conversations = state.conversations.as_ref().clone();
            conversations.push(conversation);

            log::info!("Created conversation {}", active_id);
            ConversationStore {
                conversations: Arc::new(conversations),
                active_id,
            }
        }
        StoreAction::Select(id) => {
            if state.get(&id).is_none() {
                log::warn!("Ignoring selection of unknown conversation {}", id);
                return state.clone();
            }
            ConversationStore {
                conversations: Arc::clone(&state.conversations),
                active_id: id,
            }
        }
        StoreAction::AttachFile(file) => {
            log::info!("Attaching {} ({} bytes) to {}", file.name, file.size, state.active_id);
            state.map_conversation(&state.active_id, |c| {
                let mut messages = c.messages.clone();
                messages.push(Message::bot(format!("PDF uploaded: {}", file.name)));
                Conversation {
                    id: c.id.clone(),
                    title: title_from_filename(&file.name),
                    attached_file: Some(file),
                    messages,
                }
            })
        }
        StoreAction::RemoveFile => state.map_conversation(&state.active_id, |c| Conversation {
            attached_file: None,
            ..c.clone()
        }),
        StoreAction::AppendMessage(message) => {
            let active_id = state.active_id.clone();
            append_to(state, &active_id, message)
        }
        StoreAction::AppendMessageTo {
            conversation_id,
            message,
        } => append_to(state, &conversation_id, message),
        StoreAction::Delete(id) => {
            let remaining: Vec<Conversation> = state
                .conversations
                .iter()
                .filter(|c| c.id != id)
                .cloned()
                .collect();

            if remaining.is_empty() {
                log::warn!("Refusing to delete the only conversation");
                return state.clone();
            }
            if remaining.len() == state.conversations.len() {
                return state.clone();
            }

            let active_id = remaining[0].id.clone();
            log::info!("Deleted conversation {}", id);
            ConversationStore {
                conversations: Arc::new(remaining),
                active_id,
            }
        }
    }
}

fn append_to(state: &ConversationStore, id: &str, message: Message) -> ConversationStore {
    if state.get(id).is_none() {
        log::warn!("Dropping message for missing conversation {}", id);
        return state.clone();
    }
    state.map_conversation(id, |c| {
        let mut messages = c.messages.clone();
        messages.push(message);
        Conversation {
            messages,
            ..c.clone()
        }
    })
}
