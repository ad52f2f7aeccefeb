//! `docpub validate` command implementation.

use std::path::PathBuf;

use clap::Args;
use docpub_config::Config;
use docpub_confluence::validate_page;

use crate::error::CliError;
use crate::output::Output;

use super::confluence_client;

/// Arguments for the validate command.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    /// Page ID to validate.
    page_id: String,

    /// Expected content fingerprint (hex SHA-256) to compare against.
    #[arg(long)]
    expected_hash: Option<String>,

    /// Path to configuration file (default: auto-discover docpub.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let (client, _) = confluence_client(&config)?;

        let report = validate_page(&client, &self.page_id, self.expected_hash.as_deref())?;
        output.result(&serde_json::to_string_pretty(&report)?);

        if report.fingerprint_matches == Some(false) {
            output.warning("Live content does not match the stored content hash.");
        }
        if report.content_matches_expected == Some(false) {
            output.warning("Live content does not match the expected hash.");
        }

        Ok(())
    }
}
