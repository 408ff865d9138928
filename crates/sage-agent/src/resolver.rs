//! Startup model resolution — find a model identifier the provider accepts.
//!
//! Runs once before the gateway starts serving. Candidates from a fixed
//! preference list are probed in order with a trivial generation request;
//! if none works, the provider's model catalog is scanned for anything that
//! looks generation-capable. No retries — each candidate gets one attempt.

use tracing::{info, warn};

use crate::provider::GenerativeProvider;

/// Known generation-capable models, newest to most compatible.
pub const KNOWN_GENERATIVE_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-001",
    "gemini-pro",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-flash-latest",
    "gemini-pro-latest",
];

const PROBE_PROMPT: &str = "Hello, this is a test message.";

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no usable generative model found ({probed} candidates probed)")]
    Exhausted { probed: usize },
}

/// Probe candidates against the provider until one accepts a test request.
///
/// Safe to re-run at any time; the only side effects are outbound calls.
pub async fn resolve_model(
    provider: &dyn GenerativeProvider,
) -> Result<String, ResolveError> {
    let mut probed = 0;

    info!(provider = %provider.name(), "probing known generative models");
    for candidate in KNOWN_GENERATIVE_MODELS {
        probed += 1;
        if probe(provider, candidate).await {
            return Ok(candidate.to_string());
        }
    }

    // None of the known models worked — fall back to the provider's catalog
    // and try any entry whose name suggests generation capability.
    warn!("known models exhausted, falling back to model catalog");
    match provider.list_models().await {
        Ok(models) => {
            for model in models {
                if !looks_generative(&model) {
                    continue;
                }
                probed += 1;
                if probe(provider, &model).await {
                    return Ok(model);
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "model catalog fetch failed");
        }
    }

    Err(ResolveError::Exhausted { probed })
}

async fn probe(provider: &dyn GenerativeProvider, model: &str) -> bool {
    match provider.generate(model, PROBE_PROMPT).await {
        Ok(_) => {
            info!(model, "model accepted test request");
            true
        }
        Err(e) => {
            warn!(model, error = %e, "model rejected test request");
            false
        }
    }
}

fn looks_generative(model: &str) -> bool {
    model.contains("gemini") && !model.contains("embedding")
}
