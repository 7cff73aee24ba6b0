//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{FetchCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;
use crate::state::AppState;

/// Execute a CLI command with the given settings
///
/// No subcommand means `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match cli.command_or_default() {
        Commands::Serve { dry_run, .. } => {
            warn_privileged_bind(&settings);
            ServeCommandHandler::new(settings).execute(dry_run).await
        }
        Commands::Fetch {
            viewer_id,
            partial,
            pretty,
        } => {
            let state = AppState::new(&settings)?;
            FetchCommandHandler::new(state)
                .execute(&viewer_id, partial, pretty)
                .await
        }
    }
}

fn warn_privileged_bind(settings: &Settings) {
    if settings.server.port < 1024 && settings.server.host == "0.0.0.0" {
        tracing::warn!(
            port = settings.server.port,
            "Binding to 0.0.0.0 on a privileged port typically requires root privileges"
        );
    }
}
