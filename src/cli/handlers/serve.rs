//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;
use crate::state::AppState;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Run the server, or only validate when `dry_run` is set.
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config.clone()).run().await?;
        Ok(())
    }

    /// Validate configuration and build the application state without
    /// binding a socket.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());

        let state = AppState::new(&self.config)?;
        for (platform, configured) in state.services.providers.credential_status() {
            if configured {
                println!("✓ {} credentials are configured", platform);
            } else {
                println!("✗ {} credentials are missing; its channels will fail", platform);
            }
        }
        println!(
            "✓ {} viewer(s) registered in the channel directory",
            self.config.directory.viewers.len()
        );

        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
