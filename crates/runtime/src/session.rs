//! Session management and the tool-calling loop.

use crate::conversation::History;
use crate::gateway::Gateway;
use crate::registry::{tool_specs, ToolSpec};
use crate::tools::ToolHost;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use store::ReservationStore;
use uuid::Uuid;

/// A unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user's conversation: history, tool host, and the gateway.
///
/// A session owns its history and reservation store exclusively; serving
/// multiple users means one `Session` per user, never a shared one.
pub struct Session<G: Gateway> {
    pub id: SessionId,
    history: History,
    tools: ToolHost,
    gateway: G,
    specs: Vec<ToolSpec>,
}

impl<G: Gateway> Session<G> {
    /// Create a session with the given system prompt, tool host, and gateway.
    pub fn new(system_prompt: impl Into<String>, tools: ToolHost, gateway: G) -> Self {
        Self {
            id: SessionId::new(),
            history: History::new(system_prompt),
            tools,
            gateway,
            specs: tool_specs(),
        }
    }

    /// Process one user message and return the assistant's reply.
    ///
    /// At most two model round-trips happen per call: one to let the model
    /// answer or request tools, and — only when tools were requested — one
    /// more over the extended history to phrase the final reply. Tool chains
    /// deeper than that are deliberately unsupported.
    pub async fn chat(&mut self, user_input: &str) -> Result<String> {
        self.history.push_user(user_input);

        let reply = self
            .gateway
            .complete(self.history.turns(), &self.specs)
            .await
            .ok_or(Error::NoResponse)?;

        if reply.tool_calls.is_empty() {
            let content = reply.content.clone();
            self.history.push_assistant(reply);
            return Ok(content);
        }

        let calls = reply.tool_calls.clone();
        self.history.push_assistant(reply);

        // Dispatch in the order the model listed the calls; each result
        // becomes a tool turn, failures included.
        for call in &calls {
            let output = self.tools.dispatch(call);
            self.history
                .push_tool(call.id.as_str(), call.name.as_str(), output)?;
        }

        let followup = self
            .gateway
            .complete(self.history.turns(), &self.specs)
            .await
            .ok_or(Error::NoFollowup)?;

        let content = followup.content.clone();
        self.history.push_assistant(followup);
        Ok(content)
    }

    /// The session's bookings, for display.
    pub fn reservations(&self) -> &ReservationStore {
        self.tools.reservations()
    }

    /// Read access to the tool host (catalog lookups, direct views).
    pub fn tools(&self) -> &ToolHost {
        &self.tools
    }

    /// The conversation so far.
    pub fn history(&self) -> &History {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{AssistantTurn, ToolCallRequest, Turn};
    use serde_json::json;
    use std::sync::Mutex;
    use store::{Catalog, Restaurant};

    /// Scripted gateway: pops one canned reply per round-trip and records
    /// how many turns each request carried.
    struct ScriptedGateway {
        replies: Mutex<Vec<Option<AssistantTurn>>>,
        seen_turn_counts: Mutex<Vec<usize>>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Option<AssistantTurn>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen_turn_counts: Mutex::new(Vec::new()),
            }
        }
    }

    impl Gateway for ScriptedGateway {
        async fn complete(&self, turns: &[Turn], _tools: &[ToolSpec]) -> Option<AssistantTurn> {
            self.seen_turn_counts.lock().unwrap().push(turns.len());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_restaurants(vec![Restaurant {
            id: 2,
            name: "Dragon Wok".into(),
            cuisine: "Chinese".into(),
            location: "Indiranagar".into(),
            capacity: 20,
            rating: 4.8,
            tags: vec![],
        }])
    }

    fn session(replies: Vec<Option<AssistantTurn>>) -> Session<ScriptedGateway> {
        Session::new(
            "You are a booking assistant.",
            ToolHost::new(catalog()),
            ScriptedGateway::new(replies),
        )
    }

    fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCallRequest {
        ToolCallRequest {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    #[tokio::test]
    async fn plain_reply_takes_one_round_trip() {
        let mut session = session(vec![Some(AssistantTurn::text("Hello! How can I help?"))]);

        let reply = session.chat("hi").await.unwrap();
        assert_eq!(reply, "Hello! How can I help?");

        // system + user + assistant, nothing else.
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.gateway.seen_turn_counts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tool_calls_produce_ordered_tool_turns_and_a_followup() {
        let mut session = session(vec![
            Some(AssistantTurn {
                content: String::new(),
                tool_calls: vec![
                    tool_call("call_1", "search_restaurants", json!({"cuisine": "Chinese"})),
                    tool_call("call_2", "recommend_restaurants", json!({})),
                ],
            }),
            Some(AssistantTurn::text("Here are your options.")),
        ]);

        let reply = session.chat("find chinese food").await.unwrap();
        assert_eq!(reply, "Here are your options.");

        let turns = session.history().turns();
        // system, user, assistant-with-calls, two tool turns, final assistant.
        assert_eq!(turns.len(), 6);
        match (&turns[3], &turns[4]) {
            (
                Turn::Tool { tool_call_id: first, .. },
                Turn::Tool { tool_call_id: second, .. },
            ) => {
                assert_eq!(first, "call_1");
                assert_eq!(second, "call_2");
            }
            other => panic!("expected two tool turns, got {other:?}"),
        }
        assert!(matches!(&turns[5], Turn::Assistant { tool_calls, .. } if tool_calls.is_empty()));

        // The second round-trip saw the extended history.
        let counts = session.gateway.seen_turn_counts.lock().unwrap();
        assert_eq!(*counts, vec![2, 5]);
    }

    #[tokio::test]
    async fn reservation_made_through_the_loop_lands_in_the_store() {
        let mut session = session(vec![
            Some(AssistantTurn {
                content: String::new(),
                tool_calls: vec![tool_call(
                    "call_1",
                    "make_reservation",
                    json!({
                        "restaurant_id": 2,
                        "date": "2024-08-15",
                        "time": "19:00",
                        "num_guests": 2,
                        "name": "John"
                    }),
                )],
            }),
            Some(AssistantTurn::text("Booked!")),
        ]);

        session.chat("book dragon wok").await.unwrap();
        assert_eq!(session.reservations().len(), 1);
        let booked = session.reservations().iter().next().unwrap();
        assert_eq!(booked.restaurant_id, 2);
        assert_eq!(booked.name, "John");
    }

    #[tokio::test]
    async fn unknown_tool_still_answers_the_call_and_continues() {
        let mut session = session(vec![
            Some(AssistantTurn {
                content: String::new(),
                tool_calls: vec![
                    tool_call("call_1", "order_delivery", json!({})),
                    tool_call("call_2", "recommend_restaurants", json!({})),
                ],
            }),
            Some(AssistantTurn::text("done")),
        ]);

        session.chat("deliver food").await.unwrap();

        let turns = session.history().turns();
        match &turns[3] {
            Turn::Tool { content, .. } => assert_eq!(content, "Unknown tool: order_delivery"),
            other => panic!("expected tool turn, got {other:?}"),
        }
        assert!(matches!(&turns[4], Turn::Tool { .. }));
    }

    #[tokio::test]
    async fn missing_first_response_is_distinct() {
        let mut session = session(vec![None]);
        let err = session.chat("hi").await.unwrap_err();
        assert!(matches!(err, Error::NoResponse));
    }

    #[tokio::test]
    async fn missing_followup_is_distinct() {
        let mut session = session(vec![
            Some(AssistantTurn {
                content: String::new(),
                tool_calls: vec![tool_call("call_1", "recommend_restaurants", json!({}))],
            }),
            None,
        ]);

        let err = session.chat("recommend").await.unwrap_err();
        assert!(matches!(err, Error::NoFollowup));
    }
}
