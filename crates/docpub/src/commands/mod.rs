//! CLI command implementations.

mod find;
mod publish;
mod validate;

pub(crate) use find::FindArgs;
pub(crate) use publish::PublishArgs;
pub(crate) use validate::ValidateArgs;

use docpub_config::{Config, ConfluenceConfig};
use docpub_confluence::ConfluenceClient;

use crate::error::CliError;

/// Build a Confluence client from validated configuration.
fn confluence_client(config: &Config) -> Result<(ConfluenceClient, &ConfluenceConfig), CliError> {
    let conf = config.require_confluence()?;
    let client = ConfluenceClient::new(&conf.base_url, &conf.username, &conf.api_token);
    Ok((client, conf))
}
