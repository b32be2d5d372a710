use serde::{Deserialize, Serialize};
use serde_json::Value;

mod state;

pub use state::{Action, ChatState};

/// One answered question. `response` is `None` when the backend returned no
/// usable answer (no `response` field, or an empty solution list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl ChatEntry {
    pub fn new(query: impl Into<String>, response: Option<Value>) -> Self {
        Self {
            query: query.into(),
            response,
        }
    }

    /// Plain-text form of the response for the basic column.
    pub fn response_text(&self) -> String {
        match &self.response {
            None | Some(Value::Null) | Some(Value::Bool(_)) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Append-only list of entries in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatHistory {
    entries: Vec<ChatEntry>,
}

impl ChatHistory {
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_text_flattens_values() {
        assert_eq!(ChatEntry::new("q", Some(json!("4"))).response_text(), "4");
        assert_eq!(ChatEntry::new("q", None).response_text(), "");
        assert_eq!(ChatEntry::new("q", Some(Value::Null)).response_text(), "");
        assert_eq!(ChatEntry::new("q", Some(json!(true))).response_text(), "");
        assert_eq!(ChatEntry::new("q", Some(json!(false))).response_text(), "");
        assert_eq!(ChatEntry::new("q", Some(json!(42))).response_text(), "42");
        assert_eq!(
            ChatEntry::new("q", Some(json!({ "plan": 1 }))).response_text(),
            r#"{"plan":1}"#
        );
    }

    #[test]
    fn absent_response_is_omitted_when_serialised() {
        let entry = ChatEntry::new("schedule a meeting", None);
        assert_eq!(
            serde_json::to_value(&entry).expect("entry serialises"),
            json!({ "query": "schedule a meeting" })
        );
    }
}
