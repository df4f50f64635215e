//! Event handling and user interactions for greeter-bot.
//!
//! This module provides functionality for handling chat events:
//! - Registering listeners and dispatching events to them
//! - The reply capability handed to each listener
//! - The greeting listeners themselves

pub mod greetings;
pub mod inbound;
pub mod listeners;
pub mod say;
