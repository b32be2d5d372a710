use crate::backend::{BackendClient, BackendError};
use crate::chat::ChatEntry;
use crate::event::AppEvent;
use eframe::egui;
use std::sync::mpsc;
use tokio::runtime::Handle;
use tracing::{debug, error, info};

/// Single-shot question against `/basic-llm`.
pub async fn ask_basic_llm(client: &BackendClient, query: String) -> Result<ChatEntry, BackendError> {
    let reply = client.basic_llm(&query).await?;
    Ok(ChatEntry::new(query, reply.response))
}

/// `/init` followed by one `/step/{id}`; keeps only the first solution.
pub async fn solve_with_agents(
    client: &BackendClient,
    query: String,
) -> Result<ChatEntry, BackendError> {
    let init = client.init_workflow(&query).await?;
    let workflow_id = init.workflow_id()?;
    debug!(workflow_id, "workflow initialised");

    let step = client.step_workflow(workflow_id).await?;
    debug!(workflow_id, solutions = step.solutions().len(), "workflow stepped");

    Ok(ChatEntry::new(query, step.first_solution()))
}

#[derive(Clone)]
struct Notifier {
    tx: mpsc::Sender<AppEvent>,
    repaint: Option<egui::Context>,
}

impl Notifier {
    fn emit(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            debug!("event channel closed, dropping result");
            return;
        }
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }
}

/// Releases the multi-agent loading flag when dropped.
struct SettleOnDrop(Notifier);

impl Drop for SettleOnDrop {
    fn drop(&mut self) {
        self.0.emit(AppEvent::MultiAgentSettled);
    }
}

/// Runs request handlers on the tokio runtime and reports back over the
/// UI event channel.
#[derive(Clone)]
pub struct Dispatcher {
    client: BackendClient,
    notifier: Notifier,
    runtime_handle: Handle,
}

impl Dispatcher {
    pub fn new(client: BackendClient, tx: mpsc::Sender<AppEvent>, runtime_handle: Handle) -> Self {
        Self {
            client,
            notifier: Notifier { tx, repaint: None },
            runtime_handle,
        }
    }

    /// Wakes the UI after each event so results show without user input.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.notifier.repaint = Some(ctx);
        self
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn ask_basic_llm(&self, query: String) {
        let client = self.client.clone();
        let notifier = self.notifier.clone();

        self.runtime_handle.spawn(async move {
            info!(chars = query.len(), "basic llm request");
            let event = match ask_basic_llm(&client, query.clone()).await {
                Ok(entry) => AppEvent::BasicAnswered(entry),
                Err(err) => {
                    error!(error = %err, "basic llm request failed");
                    AppEvent::BasicFailed {
                        query,
                        error: err.to_string(),
                    }
                }
            };
            notifier.emit(event);
        });
    }

    /// The caller must already have set the loading flag; `MultiAgentSettled`
    /// follows the outcome event.
    pub fn solve_with_agents(&self, query: String) {
        let client = self.client.clone();
        let notifier = self.notifier.clone();
        let settle = SettleOnDrop(self.notifier.clone());

        self.runtime_handle.spawn(async move {
            let _settle = settle;
            info!(chars = query.len(), "multi-agent request");
            let event = match solve_with_agents(&client, query.clone()).await {
                Ok(entry) => AppEvent::MultiAgentSolved(entry),
                Err(err) => {
                    error!(error = %err, "multi-agent request failed");
                    AppEvent::MultiAgentFailed {
                        query,
                        error: err.to_string(),
                    }
                }
            };
            notifier.emit(event);
        });
    }
}
