use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;

use super::{decode_list, Note, NoteStore, StoreError};
use crate::config::{Endpoints, StoreOptions};

/// Blocking client for the PHP-style note store: every operation is a GET
/// against `<base>/<endpoint>` with form-encoded query parameters.
#[derive(Debug, Clone)]
pub struct HttpNoteStore {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
}

impl HttpNoteStore {
    pub fn new(base_url: &str, options: &StoreOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout())
            .user_agent(concat!("notebook-tui/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Url::parse(&base_url).with_context(|| format!("parsing note store url {base_url}"))?;
        tracing::debug!(%base_url, "note store client ready");
        Ok(Self {
            client,
            base_url,
            endpoints: options.endpoints.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, StoreError> {
        let raw = format!("{}{}", self.base_url, endpoint.trim_start_matches('/'));
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|err| StoreError::InvalidUrl {
            url: raw,
            reason: err.to_string(),
        })
    }

    fn query(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, StoreError> {
        let url = self.endpoint_url(endpoint, params)?;
        tracing::debug!(endpoint, "note store request");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| StoreError::Connection {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let status = response.status();
        let body = response.text().map_err(|source| StoreError::Read {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(StoreError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl NoteStore for HttpNoteStore {
    fn list(&self) -> Result<Vec<Note>, StoreError> {
        let body = self.query(&self.endpoints.list, &[])?;
        decode_list(&self.endpoints.list, &body)
    }

    fn create(&self, title: &str, content: &str) -> Result<(), StoreError> {
        self.query(
            &self.endpoints.create,
            &[("title", title), ("content", content)],
        )?;
        tracing::info!("note created");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.query(&self.endpoints.delete, &[("id", id)])?;
        tracing::info!(id, "note deleted");
        Ok(())
    }

    fn update(&self, note: &Note) -> Result<(), StoreError> {
        self.query(
            &self.endpoints.update,
            &[
                ("id", note.id.as_str()),
                ("title", note.title.as_str()),
                ("content", note.content.as_str()),
            ],
        )?;
        tracing::info!(id = %note.id, "note updated");
        Ok(())
    }
}
