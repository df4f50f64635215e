//! Core components, types, and utilities for the greeter-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Reply templates and their rendering.
//! - Common types and result handling.

pub mod config;
pub mod replies;
pub mod types;
