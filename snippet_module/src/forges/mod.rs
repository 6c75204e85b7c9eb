//! Forge adapters.
//!
//! Each adapter turns a [`SnippetReference`] into raw file text:
//! - `github`: repository blobs, ref/path split via branch and tag listing
//! - `gitlab`: GitLab and Heptapod projects (same v4 API), same ref/path split
//! - `gist`: gist files addressed by slugified anchor
//! - `bitbucket`: repository blobs pinned to an explicit commit
//!
//! All adapters share one pooled [`reqwest::Client`] owned by [`ForgeClient`].

mod bitbucket;
mod gist;
mod github;
mod gitlab;
mod refs;

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ForgeConfig;
use crate::error::SnippetError;
use crate::patterns::{Forge, SnippetReference};

pub use refs::split_revision_path;

const USER_AGENT: &str = concat!("snippet-bot/", env!("CARGO_PKG_VERSION"));

/// Descriptor of one GET request: absolute URL plus extra headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, headers: Vec<(&'static str, String)>) -> Self {
        Self {
            url: url.into(),
            headers,
        }
    }
}

/// A reference after ref/path disambiguation, ready for a single fetch.
///
/// `file_path` is the display form; only `source.url` carries encoded values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFileRef {
    pub revision: String,
    pub file_path: String,
    pub source: FetchRequest,
}

/// Raw contents of a resolved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub display_path: String,
    pub contents: String,
}

/// HTTP front for every forge adapter.
#[derive(Debug, Clone)]
pub struct ForgeClient {
    config: Arc<ForgeConfig>,
    client: Client,
}

impl ForgeClient {
    pub fn new(config: ForgeConfig) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(config, client)
    }

    pub fn with_client(config: ForgeConfig, client: Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Fetch the file a reference points at.
    ///
    /// `Ok(None)` means the reference resolved to nothing (a gist without the
    /// requested file); missing repositories, refs or files are errors.
    pub async fn resolve(
        &self,
        reference: &SnippetReference,
    ) -> Result<Option<ResolvedFile>, SnippetError> {
        match reference.forge {
            Forge::GitHub => github::resolve(self, reference).await.map(Some),
            Forge::GitLab | Forge::Heptapod => gitlab::resolve(self, reference).await.map(Some),
            Forge::Gist => gist::resolve(self, reference).await,
            Forge::Bitbucket => bitbucket::resolve(self, reference).await.map(Some),
        }
    }

    pub(crate) async fn get_text(&self, request: &FetchRequest) -> Result<String, SnippetError> {
        debug!("forge GET {}", request.url);

        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        let response = builder.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SnippetError::NotFound(request.url.clone()));
        }
        if !status.is_success() {
            return Err(SnippetError::Status {
                status,
                url: request.url.clone(),
            });
        }

        Ok(response.text().await?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        request: &FetchRequest,
    ) -> Result<T, SnippetError> {
        let body = self.get_text(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Percent-encode a value used as one URL path component, including `/` and `.`.
pub(crate) fn encode_component(value: &str) -> String {
    urlencoding::encode(value).replace('.', "%2E")
}

/// Percent-encode each `/`-separated segment, keeping the separators.
pub(crate) fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
