use reqwest::{Client, StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::models::{Note, NotePage, SearchParams};

/// Client for the notes REST API.
pub struct NoteApiClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Authentication failed")]
    AuthFailed,
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl NoteApiClient {
    /// Create a new API client for the given server, authenticating every
    /// request with the bearer token.
    pub fn new(base_url: &str, token: &str) -> Result<Self, ApiError> {
        // Normalize URL - ensure no trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
        })
    }

    /// Build the full URL for an endpoint under the API prefix.
    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, endpoint)
    }

    /// Map non-success statuses to errors, passing the response through
    /// otherwise.
    async fn check(
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, ApiError> {
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::AuthFailed),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(what.to_string())),
            status if !status.is_success() => Err(ApiError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
            _ => Ok(response),
        }
    }

    /// List the notes directly under a directory path.
    pub async fn get_notes(&self, path: &str) -> Result<Vec<Note>, ApiError> {
        log::debug!("fetching notes under '{}'", path);
        let response = self
            .client
            .get(self.url("notes"))
            .query(&[("path", path)])
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::check(response, path).await?;
        Ok(response.json().await?)
    }

    /// Fetch a single note with its content.
    pub async fn get_note(&self, path: &str) -> Result<Note, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("notes/{}", encode_path(path))))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::check(response, path).await?;
        Ok(response.json().await?)
    }

    /// Create or update a note. `sha` must be the current blob sha when
    /// updating an existing note.
    pub async fn save_note(
        &self,
        path: &str,
        content: &str,
        sha: Option<&str>,
    ) -> Result<Note, ApiError> {
        log::debug!("saving note '{}'", path);
        let response = self
            .client
            .post(self.url(&format!("notes/{}", encode_path(path))))
            .bearer_auth(&self.token)
            .json(&json!({ "sha": sha, "content": content }))
            .send()
            .await?;
        let response = Self::check(response, path).await?;
        Ok(response.json().await?)
    }

    /// Delete a note identified by its path and current blob sha.
    pub async fn delete_note(&self, path: &str, sha: &str) -> Result<(), ApiError> {
        log::debug!("deleting note '{}'", path);
        let response = self
            .client
            .delete(self.url(&format!("notes/{}", encode_path(path))))
            .bearer_auth(&self.token)
            .json(&json!({ "sha": sha }))
            .send()
            .await?;
        Self::check(response, path).await?;
        Ok(())
    }

    /// Fetch the flat listing of the whole repository tree (no contents).
    pub async fn get_notes_tree(&self) -> Result<Vec<Note>, ApiError> {
        log::debug!("fetching notes tree");
        let response = self
            .client
            .get(self.url("tree/notes"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::check(response, "tree").await?;
        Ok(response.json().await?)
    }

    /// Search notes, optionally scoped to a path, returning one page of
    /// results.
    pub async fn search_notes(&self, params: &SearchParams) -> Result<NotePage, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page) = params.page {
            query.push(("page", page.to_string()));
        }
        if let Some(path) = &params.path {
            query.push(("path", path.clone()));
        }
        if let Some(q) = &params.query {
            query.push(("query", q.clone()));
        }

        let response = self
            .client
            .get(self.url("search/notes"))
            .query(&query)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::check(response, "search").await?;
        Ok(response.json().await?)
    }
}

/// Percent-encode each path segment, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_non_http_url() {
        assert!(matches!(
            NoteApiClient::new("ftp://example.com", "t"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let client = NoteApiClient::new("https://example.com/", "t").unwrap();
        assert_eq!(client.url("tree/notes"), "https://example.com/api/v1/tree/notes");
    }

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(encode_path("a/b c.md"), "a/b%20c.md");
        assert_eq!(encode_path("plain.md"), "plain.md");
    }
}
