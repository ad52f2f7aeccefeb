//! `docpub find` command implementation.

use std::path::PathBuf;

use clap::Args;
use docpub_cache::PageIdCache;
use docpub_config::{CliSettings, Config};
use docpub_confluence::{Located, locate};

use crate::error::CliError;
use crate::output::Output;

use super::confluence_client;

/// Arguments for the find command.
#[derive(Args)]
pub(crate) struct FindArgs {
    /// Page title to look up.
    title: String,

    /// Restrict the lookup to children of this page.
    #[arg(long)]
    parent_id: Option<String>,

    /// Override the target space key.
    #[arg(long)]
    space: Option<String>,

    /// Path to configuration file (default: auto-discover docpub.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl FindArgs {
    /// Execute the find command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or the remote lookup fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            space_key: self.space.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let (client, conf) = confluence_client(&config)?;

        let mut cache = PageIdCache::load(config.docs_resolved.cache_file.clone());
        let located = locate(
            &client,
            &mut cache,
            &conf.space_key,
            &self.title,
            self.parent_id.as_deref(),
        )?;

        let result = match located {
            Located::Found(page) => serde_json::json!({
                "found": true,
                "page_id": page.id,
                "title": page.title,
                "version": page.version.number,
                "url": page.web_url(&conf.base_url),
            }),
            Located::NotFound => serde_json::json!({ "found": false }),
        };
        output.result(&serde_json::to_string_pretty(&result)?);

        Ok(())
    }
}
