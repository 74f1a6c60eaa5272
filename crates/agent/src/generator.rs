//! Prompt assembly and the single completion call per request.

use sommelier_core::context::ContextResult;
use sommelier_core::message::Message;
use sommelier_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns a message and its context into the concierge's reply.
pub struct ResponseGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    winery_name: String,
}

impl ResponseGenerator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            winery_name: "Napa Valley Premium Winery".into(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_winery_name(mut self, name: impl Into<String>) -> Self {
        self.winery_name = name.into();
        self
    }

    /// The concierge persona.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a knowledgeable and friendly wine concierge for {}.\n\
Your role is to help customers with information about:\n\
1. Our wines, prices, and tasting notes\n\
2. Tasting room hours and reservations\n\
3. Events and experiences\n\
4. Current weather in Napa Valley\n\
5. General wine knowledge and recommendations\n\
6. Any current wine-related news or information through web search\n\
\n\
Always be helpful, professional, and enthusiastic about wine. Be conversational and engaging, \
as if you're a sommelier helping customers in person.\n\
\n\
When you need information, I'll provide it through tools. Just focus on giving great responses.",
            self.winery_name
        )
    }

    /// The user turn: question, labelled context, and style instruction.
    pub fn user_turn(message: &str, context: &ContextResult) -> String {
        format!(
            "User question: {message}\n\
\n\
Available Information:\n\
{}\n\
\n\
Please provide a helpful, engaging response as a wine concierge. Use the information above if relevant.\n\
Keep your response conversational and friendly.",
            context.render()
        )
    }

    pub fn build_request(&self, message: &str, context: &ContextResult) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(self.system_prompt()),
                Message::user(Self::user_turn(message, context)),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Ask the completion API for a reply. Failures come back as an apology.
    pub async fn generate(&self, message: &str, context: &ContextResult) -> String {
        let request = self.build_request(message, context);
        debug!(provider = self.provider.name(), model = %self.model, "Generating response");

        match self.provider.complete(request).await {
            Ok(response) => response.message.content,
            Err(e) => {
                warn!(error = %e, "Completion failed");
                format!(
                    "I apologize, but I'm having trouble processing your request right now. Please try again. Error: {e}"
                )
            }
        }
    }
}
