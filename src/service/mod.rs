//! Service integrations for external APIs and clients.
//!
//! Each service module defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod answer;
pub mod chat;
