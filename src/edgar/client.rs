// src/edgar/client.rs
use crate::utils::error::EdgarError;
use reqwest::header;
use std::time::Duration;

// SEC requires a User-Agent with contact details; overridable via config.
pub const DEFAULT_USER_AGENT: &str = "S1Prospector/1.0 (contact@yourfirm.com)";
// SEC asks for 10 requests/second max. Be conservative. >100ms delay.
const EDGAR_REQUEST_DELAY_MS: u64 = 150;
const INDEX_PAGE_TIMEOUT: Duration = Duration::from_secs(30);
const FILING_DOC_TIMEOUT: Duration = Duration::from_secs(60);

/// Thin EDGAR HTTP client. Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    http: reqwest::Client,
    request_delay: Duration,
}

impl EdgarClient {
    /// Creates a reqwest client configured for EDGAR interaction.
    pub fn new(user_agent: &str) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent) // Set the required User-Agent
            .build()?;

        Ok(Self {
            http,
            request_delay: Duration::from_millis(EDGAR_REQUEST_DELAY_MS),
        })
    }

    /// Overrides the politeness delay applied before every request.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Fetches a filing index page (the `-index.htm` listing).
    pub async fn fetch_index_page(&self, url: &str) -> Result<String, EdgarError> {
        self.get_text(url, INDEX_PAGE_TIMEOUT).await
    }

    /// Downloads a specific filing document from its URL.
    pub async fn download_filing_doc(&self, url: &str) -> Result<String, EdgarError> {
        self.get_text(url, FILING_DOC_TIMEOUT).await
    }

    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, EdgarError> {
        tracing::debug!("GET {} (timeout {:?})", url, timeout);

        // --- Basic Rate Limiting ---
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let response = self.http.get(url)
            // SEC uses various content types, but often text/html for filings
            .header(header::ACCEPT, "text/html,application/xhtml+xml,text/plain,*/*")
            .timeout(timeout)
            .send()
            .await?; // Propagates reqwest::Error as EdgarError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
                return Err(EdgarError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(EdgarError::FilingDocNotFound(url.to_string()));
            }
            return Err(EdgarError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> EdgarClient {
        EdgarClient::new("test-agent test@example.com")
            .unwrap()
            .with_request_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_download_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/doc.htm")
            .match_header("user-agent", "test-agent test@example.com")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let body = client()
            .download_filing_doc(&format!("{}/doc.htm", server.url()))
            .await
            .unwrap();

        assert_eq!(body, "<html>ok</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/forbidden").with_status(403).create_async().await;
        server.mock("GET", "/missing").with_status(404).create_async().await;
        server.mock("GET", "/broken").with_status(502).create_async().await;

        let c = client();
        let forbidden = c.fetch_index_page(&format!("{}/forbidden", server.url())).await;
        assert!(matches!(forbidden, Err(EdgarError::RateLimited)));

        let missing = c.fetch_index_page(&format!("{}/missing", server.url())).await;
        assert!(matches!(missing, Err(EdgarError::FilingDocNotFound(_))));

        let broken = c.fetch_index_page(&format!("{}/broken", server.url())).await;
        assert!(matches!(broken, Err(EdgarError::Http(s)) if s.as_u16() == 502));
    }
}
