//! Data access for the viewer → channel directory.
//!
//! The directory is the only persisted lookup the scheduler needs. It is
//! abstracted behind [`ChannelDirectory`] so alternative backends can be
//! plugged into [`Repositories`] without touching the services.

mod channel_directory;

pub use channel_directory::{
    ChannelDirectory, DirectoryError, RegisteredChannel, StaticChannelDirectory,
};

use std::sync::Arc;

/// Aggregates all repositories for convenient access.
///
/// Cloning is cheap; every repository is behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub channels: Arc<dyn ChannelDirectory>,
}

impl Repositories {
    /// Creates a new Repositories instance around the given directory.
    pub fn new(channels: Arc<dyn ChannelDirectory>) -> Self {
        Self { channels }
    }
}
