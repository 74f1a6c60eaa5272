//! Keyword routing: one message in, exactly one piece of context out.
//!
//! Rules are checked in order and the first whose keyword set appears in the
//! lower-cased message wins. Anything unmatched falls back to the business
//! document, the same tool the first rule uses.

use sommelier_core::context::{ContextLabel, ContextResult};
use sommelier_core::tool::{KnowledgeLookup, Location, WeatherLookup, WebSearch};
use std::sync::Arc;
use tracing::{debug, warn};

/// Which tool answers a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Knowledge,
    Weather,
    WebSearch,
}

impl RouteTarget {
    pub fn label(&self) -> ContextLabel {
        match self {
            RouteTarget::Knowledge => ContextLabel::WineKnowledge,
            RouteTarget::Weather => ContextLabel::Weather,
            RouteTarget::WebSearch => ContextLabel::WebSearch,
        }
    }
}

/// A keyword set and the tool it selects.
#[derive(Debug)]
pub struct RoutingRule {
    pub keywords: &'static [&'static str],
    pub target: RouteTarget,
}

impl RoutingRule {
    /// `lowered` must already be lower-case.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Routing rules in precedence order.
pub const RULES: &[RoutingRule] = &[
    RoutingRule {
        keywords: &[
            "wine",
            "tasting",
            "vineyard",
            "bottle",
            "price",
            "hours",
            "reservation",
            "event",
            "cabernet",
            "chardonnay",
            "merlot",
            "pinot",
        ],
        target: RouteTarget::Knowledge,
    },
    RoutingRule {
        keywords: &["weather", "temperature", "rain", "sunny", "climate"],
        target: RouteTarget::Weather,
    },
    RoutingRule {
        keywords: &["news", "latest", "recent", "current", "search", "find", "trend"],
        target: RouteTarget::WebSearch,
    },
];

/// Target used when no rule matches.
pub const FALLBACK: RouteTarget = RouteTarget::Knowledge;

const TOOL_UNAVAILABLE: &str = "I'm having trouble accessing some information right now.";

/// Pick the tool for `message`.
pub fn classify(message: &str) -> RouteTarget {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map_or(FALLBACK, |rule| rule.target)
}

/// Dispatches each message to one of the three context tools.
pub struct ContextRouter {
    knowledge: Arc<dyn KnowledgeLookup>,
    weather: Arc<dyn WeatherLookup>,
    search: Arc<dyn WebSearch>,
    weather_location: Location,
    max_results: usize,
}

impl ContextRouter {
    pub fn new(
        knowledge: Arc<dyn KnowledgeLookup>,
        weather: Arc<dyn WeatherLookup>,
        search: Arc<dyn WebSearch>,
        weather_location: Location,
    ) -> Self {
        Self {
            knowledge,
            weather,
            search,
            weather_location,
            max_results: 3,
        }
    }

    /// Number of search hits requested per web search.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Fetch context for `message`. Never fails: a tool error becomes a
    /// notice in the body. A blank message gets the whole business document.
    pub async fn route(&self, message: &str) -> ContextResult {
        let target = classify(message);
        debug!(?target, "Routing message");

        let body = match target {
            RouteTarget::Knowledge if message.trim().is_empty() => self.knowledge.full_info().await,
            RouteTarget::Knowledge => self.knowledge.lookup(message).await,
            RouteTarget::Weather => self.weather.current_weather(&self.weather_location).await,
            RouteTarget::WebSearch => self.search.search(message, self.max_results).await,
        };

        let body = body.unwrap_or_else(|e| {
            warn!(?target, error = %e, "Context tool failed");
            TOOL_UNAVAILABLE.to_string()
        });

        ContextResult::new(target.label(), body)
    }
}
