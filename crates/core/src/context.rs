//! The single piece of retrieved context injected into a prompt.

use serde::{Deserialize, Serialize};

/// Which tool produced the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextLabel {
    WineKnowledge,
    Weather,
    WebSearch,
}

impl ContextLabel {
    /// Heading placed in front of the context body in the prompt.
    pub fn heading(&self) -> &'static str {
        match self {
            ContextLabel::WineKnowledge => "Wine Business Information",
            ContextLabel::Weather => "Weather Information",
            ContextLabel::WebSearch => "Web Search Results",
        }
    }
}

/// Output of the context router, consumed immediately by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextResult {
    pub label: ContextLabel,
    pub body: String,
}

impl ContextResult {
    pub fn new(label: ContextLabel, body: impl Into<String>) -> Self {
        Self {
            label,
            body: body.into(),
        }
    }

    /// `"<heading>: <body>"`, the form embedded in the user turn.
    pub fn render(&self) -> String {
        format!("{}: {}", self.label.heading(), self.body)
    }
}
