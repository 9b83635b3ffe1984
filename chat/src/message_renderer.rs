use crate::models::*;

pub const EMPTY_STATE: &str = "Démarrer une nouvelle conversation";
pub const LOADING_INDICATOR: &str = "• • •";
pub const PROMPT_WITH_FILE: &str = "Posez une question à propos de votre PDF...";
pub const PROMPT_WITHOUT_FILE: &str = "Téléchargez un PDF pour commencer";

const BOT_LABEL: &str = "🤖 ";
const USER_LABEL: &str = "🧑 ";
const USER_INDENT: &str = "        ";

pub fn render_message(message: &Message) -> String {
    match message.sender {
        Sender::Bot => prefix_lines(BOT_LABEL, "   ", &message.text),
        Sender::User => prefix_lines(
            &format!("{}{}", USER_INDENT, USER_LABEL),
            &format!("{}   ", USER_INDENT),
            &message.text,
        ),
    }
}

fn prefix_lines(first: &str, rest: &str, text: &str) -> String {
    let mut out = String::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(if i == 0 { first } else { rest });
        out.push_str(line);
    }
    if out.is_empty() {
        out.push_str(first.trim_end());
    }
    out
}

/// Full view of a message log: empty-state banner, every message, loading dots.
pub fn render_transcript(messages: &[Message], is_loading: bool) -> String {
    let mut lines = Vec::new();

    if messages.len() == 1 {
        lines.push(format!("── {} ──", EMPTY_STATE));
    }
    lines.extend(messages.iter().map(render_message));
    if is_loading {
        lines.push(loading_line());
    }

    lines.join("\n")
}

fn loading_line() -> String {
    format!("{}{}", BOT_LABEL, LOADING_INDICATOR)
}

pub fn render_conversation_list(summaries: &[ConversationSummary]) -> String {
    summaries
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{} {}. {} ({} messages)",
                if s.active { "▶" } else { " " },
                i + 1,
                s.title,
                s.message_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn prompt_hint(conversation: &Conversation) -> String {
    match &conversation.attached_file {
        Some(file) => format!("[📄 {}] {}", file.name, PROMPT_WITH_FILE),
        None => PROMPT_WITHOUT_FILE.to_string(),
    }
}

/// Keeps the terminal scrolled to the newest content of the active conversation.
///
/// The only state is how far into which conversation's log has already been
/// printed, and whether the loading dots are the last thing on screen.
/// Switching conversations re-renders the whole log.
#[derive(Debug, Default)]
pub struct MessageRenderer {
    conversation_id: Option<String>,
    shown: usize,
    loading_shown: bool,
}

impl MessageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns what must be printed to bring the view up to date, or `None`
    /// if neither the log nor the loading state has changed since the last call.
    pub fn render_update(&mut self, conversation: &Conversation, is_loading: bool) -> Option<String> {
        let switched = self.conversation_id.as_deref() != Some(conversation.id.as_str());
        let messages = &conversation.messages;

        let output = if switched || self.shown > messages.len() {
            render_transcript(messages, is_loading)
        } else if self.shown < messages.len() {
            let mut lines: Vec<String> = messages[self.shown..].iter().map(render_message).collect();
            if is_loading {
                lines.push(loading_line());
            }
            lines.join("\n")
        } else if is_loading && !self.loading_shown {
            loading_line()
        } else {
            return None;
        };

        self.conversation_id = Some(conversation.id.clone());
        self.shown = messages.len();
        self.loading_shown = is_loading;
        Some(output)
    }

    /// Forgets the scroll position so the next update redraws the whole log.
    pub fn reset(&mut self) {
        self.conversation_id = None;
        self.shown = 0;
        self.loading_shown = false;
    }
}
