//! OpenAI-backed service setup.
//!
//! The pipeline only sees `Fn(String) -> Future<Output = Result<String,
//! String>>`; the agents built from this client are adapted into that shape
//! at the call site, which keeps the pipeline testable without a network.

use rig::providers::openai;

use crate::errors::CliError;

/// Environment variable holding the service API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Reads the service API key from the environment.
///
/// # Errors
///
/// Returns [`CliError::MissingApiKey`] when the variable is unset, so the
/// run aborts before any file is touched.
pub fn api_key_from_env() -> Result<String, CliError> {
    std::env::var(API_KEY_ENV).map_err(|_| CliError::MissingApiKey)
}

/// Builds the OpenAI client for the given API key.
#[must_use]
pub fn openai_client(api_key: &str) -> openai::Client {
    openai::Client::new(api_key).expect("valid OpenAI API key")
}
