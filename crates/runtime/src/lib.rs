//! GoodFoods runtime — the tool-calling conversation loop.
//!
//! This crate turns free-text chat into validated reservation operations and
//! back into natural language. It is organized around these concepts:
//!
//! - **Session**: one user's conversation. Owns the append-only history and
//!   the session-scoped reservation store, and runs the fixed
//!   two-round-trip tool loop.
//! - **Gateway**: a trait abstracting the remote chat-completion endpoint.
//!   Transport failures degrade to assistant text instead of erroring.
//! - **ToolHost**: the four deterministic tools (search, recommend, reserve,
//!   cancel) and the typed dispatch boundary in front of them.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{OpenAiGateway, Session, ToolHost};
//! use store::Catalog;
//!
//! # async fn example() -> runtime::Result<()> {
//! let catalog = Catalog::load("restaurants.json")?;
//! let gateway = OpenAiGateway::new(Some("gsk_...".into()));
//! let mut session = Session::new("You are a booking assistant.", ToolHost::new(catalog), gateway);
//!
//! let reply = session.chat("Find Chinese food in Indiranagar").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod conversation;
mod error;
mod gateway;
mod registry;
mod session;
mod tools;

// Conversation types
pub use conversation::{AssistantTurn, History, ToolCallRequest, Turn};

// Error types
pub use error::{Error, Result};

// Gateway
pub use gateway::{Gateway, OpenAiGateway};

// Tool registry
pub use registry::{tool_specs, ToolSpec};

// Session management
pub use session::{Session, SessionId};

// Tool layer
pub use tools::{CancelArgs, ReserveArgs, SearchArgs, ToolHost};
