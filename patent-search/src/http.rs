//! Shared HTTP client with User-Agent rotation.
//!
//! One [`reqwest::Client`] serves the REST backends, the static page
//! provider and every artifact download of a run.

use crate::config::CollectConfig;
use crate::error::CollectError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, one picked per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] for collection requests.
///
/// The client has:
/// - Cookie store enabled (Google consent pages)
/// - Finite timeout from config
/// - Redirects followed up to 10 hops (artifact links often bounce through a CDN)
/// - Random User-Agent from the rotation list (or custom if configured)
///
/// # Errors
///
/// Returns [`CollectError::Http`] if the client cannot be constructed.
pub fn build_client(config: &CollectConfig) -> Result<reqwest::Client, CollectError> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(user_agent_for(config))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| CollectError::Http(format!("failed to build HTTP client: {e}")))
}

/// The configured User-Agent, or one drawn from the rotation list.
fn user_agent_for(config: &CollectConfig) -> String {
    match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    }
}

/// Select a random User-Agent string from the rotation list.
fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // USER_AGENTS is a non-empty const array
        .unwrap_or(USER_AGENTS[0])
}
