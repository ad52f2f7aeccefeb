//! `docpub publish` command implementation.

use std::path::PathBuf;

use clap::Args;
use docpub_cache::PageIdCache;
use docpub_config::{CliSettings, Config};
use docpub_confluence::{HierarchyOptions, HierarchyPublisher, PublishAction, PublishReport};
use docpub_docs::discover_tree;

use crate::error::CliError;
use crate::output::Output;

use super::confluence_client;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Directory containing documentation files (overrides config).
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Override the target space key.
    #[arg(long)]
    space: Option<String>,

    /// Preview changes without publishing.
    #[arg(long)]
    dry_run: bool,

    /// Path to configuration file (default: auto-discover docpub.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or discovery fails, or if any
    /// page in the batch failed to publish.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.docs_dir.clone(),
            space_key: self.space.clone(),
            cache_file: None,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let (client, conf) = confluence_client(&config)?;

        let root = discover_tree(
            &config.docs_resolved.source_dir,
            &config.publishing,
            &config.hierarchy,
        )?;
        output.info(&format!(
            "Publishing {} documents to space {}",
            root.count(),
            conf.space_key
        ));
        if self.dry_run {
            output.highlight("[DRY RUN] No changes will be made.");
        }

        let mut cache = PageIdCache::load(config.docs_resolved.cache_file.clone());

        let options = HierarchyOptions {
            use_existing_pages: config.publishing.use_existing_pages,
            labels: config.publishing.labels.clone(),
            dry_run: self.dry_run,
        };
        let publisher = HierarchyPublisher::new(&client, &conf.space_key, options)
            .with_base_url(&conf.base_url);
        let results = publisher.publish_tree(&root, &mut cache);

        output.result(&serde_json::to_string_pretty(&results)?);
        print_summary(&output, &results, self.dry_run);

        let failed = count(&results, PublishAction::Error);
        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} of {} pages failed to publish",
                results.len()
            )));
        }
        Ok(())
    }
}

fn count(results: &[PublishReport], action: PublishAction) -> usize {
    results.iter().filter(|r| r.action == action).count()
}

fn print_summary(output: &Output, results: &[PublishReport], dry_run: bool) {
    let summary = format!(
        "{} created, {} updated, {} skipped, {} failed",
        count(results, PublishAction::Created),
        count(results, PublishAction::Updated),
        count(results, PublishAction::Skipped),
        count(results, PublishAction::Error),
    );

    if dry_run {
        output.highlight(&format!("[DRY RUN] Would result in: {summary}"));
    } else if count(results, PublishAction::Error) > 0 {
        output.warning(&format!("Publishing finished with failures: {summary}"));
    } else {
        output.success(&format!("Publishing complete: {summary}"));
    }
}
