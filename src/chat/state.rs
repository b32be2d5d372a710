use super::{ChatEntry, ChatHistory};

pub const MULTI_AGENT_IDLE_LABEL: &str = "Ask MultiAgent";
pub const MULTI_AGENT_PENDING_LABEL: &str = "Processing...";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetInput(String),
    AppendBasic(ChatEntry),
    AppendMulti(ChatEntry),
    SetLoading(bool),
}

/// Everything the chat window shows. Only `reduce` changes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    input: String,
    basic: ChatHistory,
    multi_agent: ChatHistory,
    loading: bool,
}

impl ChatState {
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::SetInput(text) => self.input = text,
            Action::AppendBasic(entry) => self.basic.push(entry),
            Action::AppendMulti(entry) => self.multi_agent.push(entry),
            Action::SetLoading(loading) => self.loading = loading,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn basic(&self) -> &ChatHistory {
        &self.basic
    }

    pub fn multi_agent(&self) -> &ChatHistory {
        &self.multi_agent
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn multi_agent_enabled(&self) -> bool {
        !self.loading
    }

    pub fn multi_agent_label(&self) -> &'static str {
        if self.loading {
            MULTI_AGENT_PENDING_LABEL
        } else {
            MULTI_AGENT_IDLE_LABEL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn appends_keep_insertion_order_per_history() {
        let mut state = ChatState::default();
        state.reduce(Action::AppendBasic(ChatEntry::new("2+2", Some(json!("4")))));
        state.reduce(Action::AppendMulti(ChatEntry::new("plan", Some(json!("Plan A")))));
        state.reduce(Action::AppendBasic(ChatEntry::new("3+3", Some(json!("6")))));

        let queries: Vec<&str> = state
            .basic()
            .entries()
            .iter()
            .map(|entry| entry.query.as_str())
            .collect();
        assert_eq!(queries, vec!["2+2", "3+3"]);
        assert_eq!(state.multi_agent().len(), 1);
    }

    #[test]
    fn input_survives_appends() {
        let mut state = ChatState::default();
        state.reduce(Action::SetInput("2+2".to_string()));
        state.reduce(Action::AppendBasic(ChatEntry::new("2+2", Some(json!("4")))));

        assert_eq!(state.input(), "2+2");
    }

    #[test]
    fn multi_agent_control_disabled_iff_loading() {
        let mut state = ChatState::default();
        assert!(state.multi_agent_enabled());
        assert_eq!(state.multi_agent_label(), MULTI_AGENT_IDLE_LABEL);

        state.reduce(Action::SetLoading(true));
        assert!(state.is_loading());
        assert!(!state.multi_agent_enabled());
        assert_eq!(state.multi_agent_label(), MULTI_AGENT_PENDING_LABEL);

        state.reduce(Action::SetLoading(false));
        assert!(state.multi_agent_enabled());
        assert_eq!(state.multi_agent_label(), MULTI_AGENT_IDLE_LABEL);
    }

    #[test]
    fn loading_does_not_touch_histories() {
        let mut state = ChatState::default();
        state.reduce(Action::AppendMulti(ChatEntry::new("plan", None)));
        let before = state.multi_agent().clone();

        state.reduce(Action::SetLoading(true));
        state.reduce(Action::SetLoading(false));

        assert_eq!(state.multi_agent(), &before);
        assert!(state.basic().is_empty());
    }
}
