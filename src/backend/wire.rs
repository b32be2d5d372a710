use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::BackendError;

/// Shape of the JSON body sent to `/basic-llm`, `/init` and `/step/{id}`.
///
/// `Direct` sends the fields the backend reads (`{"prompt": ..}` and
/// `{"problem": ..}`, no body for a step). `LegacyEnvelope` reproduces the
/// fetch-style options object the first web client posted as the body, with the
/// real payload serialised into a string under `body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BodyFormat {
    #[default]
    Direct,
    LegacyEnvelope,
}

impl BodyFormat {
    pub fn prompt_body(self, prompt: &str) -> Value {
        self.wrap(json!({ "prompt": prompt }))
    }

    pub fn problem_body(self, problem: &str) -> Value {
        self.wrap(json!({ "problem": problem }))
    }

    pub fn step_body(self) -> Option<Value> {
        match self {
            Self::Direct => None,
            Self::LegacyEnvelope => Some(json!({ "method": "POST" })),
        }
    }

    fn wrap(self, payload: Value) -> Value {
        match self {
            Self::Direct => payload,
            Self::LegacyEnvelope => json!({
                "method": "POST",
                "headers": { "Content-Type": "application/json" },
                "body": payload.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicLlmReply {
    #[serde(default)]
    pub response: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitReply {
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub state: Option<Value>,
}

impl InitReply {
    pub fn workflow_id(&self) -> Result<&str, BackendError> {
        self.workflow_id
            .as_deref()
            .ok_or(BackendError::MissingField("workflow_id"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub state: Option<WorkflowState>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowState {
    #[serde(default)]
    pub solutions: Option<Vec<Value>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl StepReply {
    /// Solutions in backend order; empty when `state` or `solutions` is absent.
    pub fn solutions(&self) -> &[Value] {
        self.state
            .as_ref()
            .and_then(|state| state.solutions.as_deref())
            .unwrap_or(&[])
    }

    pub fn first_solution(&self) -> Option<Value> {
        self.solutions().first().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn direct_bodies_carry_only_the_payload() {
        assert_eq!(BodyFormat::Direct.prompt_body("2+2"), json!({ "prompt": "2+2" }));
        assert_eq!(
            BodyFormat::Direct.problem_body("schedule a meeting"),
            json!({ "problem": "schedule a meeting" })
        );
        assert_eq!(BodyFormat::Direct.step_body(), None);
    }

    #[test]
    fn legacy_envelope_nests_serialised_payload() {
        assert_eq!(
            BodyFormat::LegacyEnvelope.prompt_body("2+2"),
            json!({
                "method": "POST",
                "headers": { "Content-Type": "application/json" },
                "body": "{\"prompt\":\"2+2\"}",
            })
        );
        assert_eq!(
            BodyFormat::LegacyEnvelope.step_body(),
            Some(json!({ "method": "POST" }))
        );
    }

    #[test]
    fn step_reply_keeps_solution_order() {
        let reply: StepReply = serde_json::from_value(json!({
            "workflow_id": "abc123",
            "state": {
                "problem": "schedule a meeting",
                "solutions": ["Plan A", "Plan B"],
                "iteration": 3
            }
        }))
        .expect("step reply should decode");

        assert_eq!(reply.solutions(), &[json!("Plan A"), json!("Plan B")]);
        assert_eq!(reply.first_solution(), Some(json!("Plan A")));
        let state = reply.state.as_ref().expect("state present");
        assert_eq!(state.rest.get("iteration"), Some(&json!(3)));
    }

    #[test]
    fn missing_or_null_solutions_are_empty() {
        for body in [
            json!({ "state": {} }),
            json!({ "state": { "solutions": null } }),
            json!({}),
            json!({ "state": null }),
        ] {
            let reply: StepReply =
                serde_json::from_value(body.clone()).expect("step reply should decode");
            assert!(reply.solutions().is_empty(), "{body}");
            assert_eq!(reply.first_solution(), None);
        }
    }

    #[test]
    fn init_reply_without_id_is_an_error() {
        let reply: InitReply =
            serde_json::from_value(json!({ "state": {} })).expect("init reply should decode");
        assert!(matches!(
            reply.workflow_id(),
            Err(BackendError::MissingField("workflow_id"))
        ));
    }
}
