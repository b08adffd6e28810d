//! Conversation turns and the append-only history.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Correlates the eventual tool turn back to this call.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Argument payload as parsed JSON.
    pub arguments: Value,
}

/// An assistant reply, before it is appended to history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantTurn {
    pub content: String,
    /// Tool calls the model wants executed, in the order it listed them.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
}

impl AssistantTurn {
    /// Create a plain-text assistant turn with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }
}

/// One entry in the conversation, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Turn {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(default)]
        tool_calls: Vec<ToolCallRequest>,
    },
    Tool {
        tool_call_id: String,
        name: String,
        content: String,
    },
}

impl From<AssistantTurn> for Turn {
    fn from(turn: AssistantTurn) -> Self {
        Turn::Assistant {
            content: turn.content,
            tool_calls: turn.tool_calls,
        }
    }
}

/// Ordered, append-only conversation history for one session.
///
/// The system turn occurs exactly once, first. Tool turns must answer a
/// pending call from the immediately-preceding assistant turn; [`History`]
/// rejects anything else at push time rather than letting an incoherent
/// transcript reach the model.
#[derive(Debug, Clone)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    /// Create a history seeded with the system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::System {
                content: system_prompt.into(),
            }],
        }
    }

    /// Append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::User {
            content: content.into(),
        });
    }

    /// Append an assistant turn, with any pending tool calls it carries.
    pub fn push_assistant(&mut self, turn: AssistantTurn) {
        self.turns.push(turn.into());
    }

    /// Append a tool turn answering the call `tool_call_id`.
    ///
    /// The call id must be pending: declared by the nearest preceding
    /// assistant turn and not already answered by a tool turn after it.
    pub fn push_tool(
        &mut self,
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<()> {
        let tool_call_id = tool_call_id.into();
        if !self.is_pending(&tool_call_id) {
            return Err(Error::OrphanToolTurn {
                call_id: tool_call_id,
            });
        }
        self.turns.push(Turn::Tool {
            tool_call_id,
            name: name.into(),
            content: content.into(),
        });
        Ok(())
    }

    /// Whether `call_id` was requested by the nearest preceding assistant
    /// turn and has not yet been answered.
    fn is_pending(&self, call_id: &str) -> bool {
        let mut answered = Vec::new();
        for turn in self.turns.iter().rev() {
            match turn {
                Turn::Tool { tool_call_id, .. } => answered.push(tool_call_id.as_str()),
                Turn::Assistant { tool_calls, .. } => {
                    return tool_calls
                        .iter()
                        .any(|c| c.id == call_id && !answered.contains(&call_id));
                }
                _ => return false,
            }
        }
        false
    }

    /// The ordered turns, system turn first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Total number of turns, including the system turn.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
