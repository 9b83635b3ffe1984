use crate::commands::{self, Command, HELP};
use anyhow::Result;
use pdf_chat::message_renderer;
use pdf_chat::request_orchestrator::dispatch;
use pdf_chat::*;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

type Reply = (PendingRequest, SendOutcome);

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    store: ConversationStore,
    orchestrator: RequestOrchestrator,
    intake: UploadIntake,
    renderer: MessageRenderer,
    backend: Arc<dyn RagBackend>,
    replies_tx: mpsc::UnboundedSender<Reply>,
    replies_rx: mpsc::UnboundedReceiver<Reply>,
}

impl App {
    pub fn new(backend: Arc<dyn RagBackend>) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            store: ConversationStore::new(),
            orchestrator: RequestOrchestrator::new(),
            intake: UploadIntake::new(),
            renderer: MessageRenderer::new(),
            backend,
            replies_tx,
            replies_rx,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        println!("PDF Assistant  (/help pour l'aide)\n");
        self.refresh();
        self.print_hint();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if self.handle(commands::parse(&line)).await == Flow::Quit {
                        break;
                    }
                }
                Some((request, outcome)) = self.replies_rx.recv() => {
                    self.complete(request, outcome);
                }
            }
        }

        log::info!("Session closed");
        Ok(())
    }

    async fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Ask(mut input) => self.send(&mut input),
            Command::Attach(path) => self.attach(&path, IntakeSource::Picker).await,
            Command::Drop(path) => self.attach(&path, IntakeSource::Drop).await,
            Command::Detach => {
                if self.store.active().has_file() {
                    self.store = self.store.apply(StoreAction::RemoveFile);
                    self.print_hint();
                }
            }
            Command::New => {
                self.store = self.store.apply(StoreAction::Create);
                self.refresh();
                self.print_hint();
            }
            Command::List => {
                println!(
                    "{}",
                    message_renderer::render_conversation_list(&self.store.summaries())
                );
            }
            Command::Switch(index) => match self.id_at(index) {
                Some(id) => {
                    self.store = self.store.apply(StoreAction::Select(id));
                    self.refresh();
                    self.print_hint();
                }
                None => notice(&format!("Pas de discussion n°{}", index + 1)),
            },
            Command::Delete(index) => self.delete(index),
            Command::Help => println!("{}", HELP),
            Command::Quit => return Flow::Quit,
            Command::Invalid(message) => notice(&message),
        }
        Flow::Continue
    }

    fn send(&mut self, input: &mut String) {
        if self.orchestrator.is_loading() {
            notice("Une requête est déjà en cours, patientez...");
            return;
        }

        let Some((store, request)) = self.orchestrator.begin(&self.store, input) else {
            return;
        };
        self.store = store;
        self.refresh();

        let backend = Arc::clone(&self.backend);
        let replies = self.replies_tx.clone();
        tokio::spawn(async move {
            let outcome = dispatch(backend.as_ref(), &request).await;
            if replies.send((request, outcome)).is_err() {
                log::warn!("Reply arrived after the session closed");
            }
        });
    }

    fn complete(&mut self, request: PendingRequest, outcome: SendOutcome) {
        self.store = self.orchestrator.finish(&self.store, &request, &outcome);

        if request.conversation_id == self.store.active_id() {
            self.refresh();
        } else if let Some(origin) = self.store.get(&request.conversation_id) {
            notice(&format!("Nouvelle réponse dans « {} »", origin.title));
        }
    }

    async fn attach(&mut self, path: &Path, source: IntakeSource) {
        if source == IntakeSource::Drop {
            self.intake.drag_enter();
            self.intake.drag_over();
        }

        let incoming = match IncomingFile::from_path(path).await {
            Ok(incoming) => incoming,
            Err(e) => {
                self.intake.drag_leave();
                notice(&e.to_string());
                return;
            }
        };

        let result = match source {
            IntakeSource::Drop => self.intake.drop_files(&[incoming]).await,
            IntakeSource::Picker => self.intake.pick_file(Some(&incoming)).await,
        };

        match result {
            Ok(Some(file)) => {
                self.store = self.store.apply(StoreAction::AttachFile(file));
                self.refresh();
                self.print_hint();
            }
            Ok(None) => {}
            Err(e) => notice(&e.to_string()),
        }
    }

    fn delete(&mut self, index: Option<usize>) {
        let id = match index {
            Some(index) => match self.id_at(index) {
                Some(id) => id,
                None => return notice(&format!("Pas de discussion n°{}", index + 1)),
            },
            None => self.store.active_id().to_string(),
        };

        if !self.store.can_delete() {
            notice("Impossible de supprimer la seule discussion.");
            return;
        }

        self.store = self.store.apply(StoreAction::Delete(id));
        self.refresh();
        self.print_hint();
    }

    fn id_at(&self, index: usize) -> Option<String> {
        self.store.conversations().get(index).map(|c| c.id.clone())
    }

    fn refresh(&mut self) {
        let is_loading = self.orchestrator.is_loading();
        if let Some(update) = self.renderer.render_update(self.store.active(), is_loading) {
            println!("{}", update);
        }
    }

    fn print_hint(&self) {
        println!("› {}", message_renderer::prompt_hint(self.store.active()));
    }
}

fn notice(message: &str) {
    eprintln!("⚠ {}", message);
}
