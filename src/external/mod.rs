//! Outbound integrations with streaming platforms.

pub mod broadcast;
pub mod client;
