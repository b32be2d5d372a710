use crate::chat::ChatEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    BasicAnswered(ChatEntry),
    BasicFailed { query: String, error: String },
    MultiAgentSolved(ChatEntry),
    MultiAgentFailed { query: String, error: String },
    /// Sent once per multi-agent request after its outcome, even if the task panicked.
    MultiAgentSettled,
}
