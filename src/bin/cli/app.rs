use anyhow::{Context, Result};

use batnoter_lib::{ClientConfig, NoteApiClient, NoteStore};

/// Shared application state for CLI commands
pub struct App {
    pub store: NoteStore,
}

impl App {
    /// Initialize from the default config location, with an optional
    /// server override from the command line.
    pub fn new(server_override: Option<&str>) -> Result<Self> {
        let path = ClientConfig::default_path().context("Failed to locate config directory")?;
        let config = ClientConfig::load_or_default(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        let server_url = server_override.unwrap_or(&config.server_url);
        let token = config.token.context(
            "No API token configured; set BATNOTER_TOKEN or add `token` to the config file",
        )?;

        let api = NoteApiClient::new(server_url, &token)
            .with_context(|| format!("Invalid server URL '{}'", server_url))?;

        Ok(Self {
            store: NoteStore::new(api),
        })
    }
}
