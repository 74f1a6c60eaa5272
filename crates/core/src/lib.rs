//! # Sommelier Core
//!
//! Domain types, traits, and error definitions for the Sommelier wine
//! concierge. This crate has **no framework dependencies**: it defines the
//! model every other crate implements against.
//!
//! The three context tools (knowledge, weather, web search) and the LLM
//! provider are traits here; concrete clients live in `sommelier-tools` and
//! `sommelier-providers`, so the agent can be tested with stubs.

pub mod context;
pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use context::{ContextLabel, ContextResult};
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use tool::{KnowledgeLookup, Location, WeatherLookup, WebSearch};
