//! Insight collaborator: natural-language Q&A over a generated profile.

mod chat;
mod provider;

pub use chat::{ChatCompletionsProvider, InsightConfig, InsightConfigBuilder};
pub use provider::InsightProvider;
