//! Library root for `greeter-bot`.
//!
//! Greeter-bot is a small Slack bot that listens over socket mode and:
//! - Says hello back to anyone whose message contains "hello"
//! - Offers help whenever it is mentioned, or relays the mention to a Dify app
//!   when one is configured
//!
//! Listeners are explicit `(trigger, handler)` registrations dispatched in order,
//! and the chat platform sits behind a trait so the dispatch logic can be tested
//! without Slack.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the greeter-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the chat client and listeners
/// - Starts the socket mode listener, which blocks until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting greeter-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
