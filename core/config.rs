/*!
This module defines the `Config` struct, read from an optional YAML file, and the rules for combining it with command line options into [`ClientOptions`](../client/struct.ClientOptions.html).
*/

use crate::{
	client::{ClientOptions, DEFAULT_API_URL},
	schema::SchemaRevision,
};
use anyhow::{Context, Result};
use pima_deps::{serde_yaml, url::Url};
use std::{path::Path, time::Duration};

#[derive(Debug, Default, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub api_url: Option<Url>,
	pub schema: Option<SchemaRevision>,
	pub timeout_secs: Option<u64>,
}

impl Config {
	pub fn load(path: &Path) -> Result<Config> {
		let config = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read config file {}", path.display()))?;
		let config = serde_yaml::from_str(&config)
			.with_context(|| format!("failed to parse config file {}", path.display()))?;
		Ok(config)
	}
}

/// Options given on the command line. Each one overrides the config file.
#[derive(Debug, Default)]
pub struct ClientOverrides {
	pub api_url: Option<Url>,
	pub schema: Option<SchemaRevision>,
	pub timeout_secs: Option<u64>,
}

impl ClientOptions {
	/// Resolve each option from the overrides, then the config file, then the built in default. Without an explicit timeout the schema revision's default timeout applies.
	pub fn resolve(overrides: ClientOverrides, config: Option<&Config>) -> Result<ClientOptions> {
		let url = match overrides
			.api_url
			.or_else(|| config.and_then(|config| config.api_url.clone()))
		{
			Some(url) => url,
			None => Url::parse(DEFAULT_API_URL).context("invalid default api url")?,
		};
		let schema = overrides
			.schema
			.or_else(|| config.and_then(|config| config.schema))
			.unwrap_or_default();
		let timeout_secs = overrides
			.timeout_secs
			.or_else(|| config.and_then(|config| config.timeout_secs));
		// A zero timeout would fail every request before it is sent.
		if timeout_secs == Some(0) {
			anyhow::bail!("the timeout must be at least 1 second");
		}
		let timeout = timeout_secs
			.map(Duration::from_secs)
			.unwrap_or_else(|| schema.default_timeout());
		Ok(ClientOptions {
			url,
			schema,
			timeout,
		})
	}
}
