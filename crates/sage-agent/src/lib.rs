pub mod gemini;
pub mod planner;
pub mod provider;
pub mod resolver;

pub use gemini::GeminiClient;
pub use planner::{PlanGenerator, PlanError};
pub use provider::{GenerativeProvider, ProviderError};
pub use resolver::{resolve_model, ResolveError};
