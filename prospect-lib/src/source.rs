//! Data sources for dashboard datasets.

use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use datagrid::{ApiResponse, DataSource, LoadError};
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::SourceError;

/// Where a dataset is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The dashboard API. Dataset endpoints are resolved against `base`.
    Http { base: Url, token: Option<String> },
    /// A JSON file on disk.
    File(PathBuf),
}

impl Origin {
    /// API origin. A trailing `/` is added to the base so that endpoints
    /// resolve below it.
    pub fn http(base: &str, token: Option<String>) -> Result<Self, SourceError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self::Http { base, token })
    }
}

/// Fetches a dataset with `GET <url>`.
///
/// The body is the `{ success, result, message }` envelope. A bearer token
/// is sent when one is configured; non-2xx responses become
/// [`SourceError::Http`].
#[derive(Debug, Clone)]
pub struct HttpSource<R> {
    client: Client,
    url: Url,
    token: Option<String>,
    _record: PhantomData<fn() -> R>,
}

impl<R> HttpSource<R> {
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
            token: None,
            _record: PhantomData,
        }
    }

    /// Parse `url` and create a source.
    pub fn parse(url: &str) -> Result<Self, SourceError> {
        Ok(Self::new(Url::parse(url)?))
    }

    /// Use a shared HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Send `Authorization: Bearer <token>`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl<R: DeserializeOwned> HttpSource<R> {
    async fn request(&self) -> Result<ApiResponse<R>, SourceError> {
        debug!("GET {}", self.url);
        let mut request = self.client.get(self.url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(SourceError::http(status.as_u16(), message));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl<R> DataSource for HttpSource<R>
where
    R: DeserializeOwned + Send + 'static,
{
    type Record = R;

    async fn fetch(&self) -> Result<ApiResponse<R>, LoadError> {
        self.request().await.map_err(|e| {
            warn!("Fetching {} failed: {e}", self.url);
            LoadError::from(e)
        })
    }
}

/// Reads a dataset from a JSON file.
///
/// The file holds either the response envelope or a bare array of records.
#[derive(Debug, Clone)]
pub struct FileSource<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> FileSource<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl<R: DeserializeOwned> FileSource<R> {
    async fn read(&self) -> Result<ApiResponse<R>, SourceError> {
        debug!("Reading {}", self.path.display());
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        match serde_json::from_slice::<ApiResponse<R>>(&bytes) {
            Ok(envelope) => Ok(envelope),
            Err(envelope_err) => match serde_json::from_slice::<Vec<R>>(&bytes) {
                Ok(records) => Ok(ApiResponse::ok(records)),
                Err(_) => Err(envelope_err.into()),
            },
        }
    }
}

#[async_trait]
impl<R> DataSource for FileSource<R>
where
    R: DeserializeOwned + Send + 'static,
{
    type Record = R;

    async fn fetch(&self) -> Result<ApiResponse<R>, LoadError> {
        self.read().await.map_err(|e| {
            warn!("{e}");
            LoadError::from(e)
        })
    }
}
