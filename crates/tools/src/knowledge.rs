//! The winery's business document.
//!
//! Loaded once at startup and never mutated. A missing or unreadable file
//! does not stop the server: the document degrades to a sentence saying so,
//! and that sentence is what the concierge sees as context.

use async_trait::async_trait;
use sommelier_core::error::ToolError;
use sommelier_core::tool::KnowledgeLookup;
use std::path::Path;
use tracing::{info, warn};

const MISSING_FILE: &str = "Wine business information file not found.";
const UNAVAILABLE: &str = "Wine business information is not available.";
const MAX_MATCHING_LINES: usize = 10;

/// Immutable in-memory copy of the business information file.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    document: String,
}

impl KnowledgeStore {
    /// Read the document at `path`.
    pub fn load(path: &Path) -> Self {
        let document = match std::fs::read_to_string(path) {
            Ok(text) => {
                info!(path = %path.display(), bytes = text.len(), "Loaded wine business information");
                text
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Wine business information file not found");
                MISSING_FILE.to_string()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read wine business information");
                format!("Error loading wine business information: {e}")
            }
        };
        Self { document }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            document: text.into(),
        }
    }

    /// The whole document.
    pub fn full_info(&self) -> String {
        if self.document.is_empty() {
            return UNAVAILABLE.into();
        }
        self.document.clone()
    }

    /// Lines containing `query`, case-insensitively, at most ten, in
    /// document order.
    pub fn search(&self, query: &str) -> String {
        if self.document.is_empty() {
            return UNAVAILABLE.into();
        }

        let needle = query.to_lowercase();
        let matches: Vec<&str> = self
            .document
            .split('\n')
            .filter(|line| line.to_lowercase().contains(&needle))
            .take(MAX_MATCHING_LINES)
            .collect();

        if matches.is_empty() {
            format!("No specific information found for '{query}' in our wine business database.")
        } else {
            matches.join("\n")
        }
    }
}

#[async_trait]
impl KnowledgeLookup for KnowledgeStore {
    async fn lookup(&self, query: &str) -> Result<String, ToolError> {
        Ok(self.search(query))
    }

    async fn full_info(&self) -> Result<String, ToolError> {
        Ok(KnowledgeStore::full_info(self))
    }
}
