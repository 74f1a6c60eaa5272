//! The wine concierge agent.
//!
//! Each message goes through a fixed pipeline:
//!
//! 1. **Route**: keyword rules pick one tool (business document, weather,
//!    or web search)
//! 2. **Fetch**: that tool returns context text, or a notice if it failed
//! 3. **Generate**: persona + context + message go to the completion API
//!    in a single call
//!
//! There is no conversation memory and no tool-calling loop; every request
//! stands alone.

pub mod generator;
pub mod router;
pub mod service;

#[cfg(test)]
mod test_helpers;

pub use generator::ResponseGenerator;
pub use router::{ContextRouter, RouteTarget, RoutingRule, classify};
pub use service::ChatService;
