use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::prelude::*;
use crate::settings::PanelSettings;

/// Where configuration documents come from
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns the raw text of the document called `name`
    async fn fetch(&self, name: &str) -> Result<String, BridgeError>;

    /// Human readable location, for log messages
    fn describe(&self, name: &str) -> String;
}

/// Fetches documents from the simulator's static file root
pub struct HttpDocumentSource {
    client: reqwest::Client,
    settings: PanelSettings,
}

impl HttpDocumentSource {
    pub fn new(client: reqwest::Client, settings: PanelSettings) -> Self {
        Self { client, settings }
    }

    pub fn from_settings(
        settings: &PanelSettings,
    ) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self::new(client, settings.clone()))
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, name: &str) -> Result<String, BridgeError> {
        let url = self.settings.url(name);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Status {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    fn describe(&self, name: &str) -> String {
        self.settings.url(name)
    }
}

/// Reads documents from a local directory
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn fetch(&self, name: &str) -> Result<String, BridgeError> {
        let path = self.root.join(name);
        trace!("reading {}", path.display());
        Ok(tokio::fs::read_to_string(path).await?)
    }

    fn describe(&self, name: &str) -> String {
        self.root.join(name).display().to_string()
    }
}
