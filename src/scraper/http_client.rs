use crate::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use tracing::debug;

/// One GET of one page, sent under the given identity.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get(&self, url: &str, identity: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// No timeout, retry or cookie jar: each request stands alone.
    pub fn new() -> Result<Self> {
        let inner = reqwest::Client::builder()
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl PageSource for HttpClient {
    async fn get(&self, url: &str, identity: &str) -> Result<Vec<u8>, FetchError> {
        debug!("GET {} as {:?}", url, identity);

        let resp = self
            .inner
            .get(url)
            .header(USER_AGENT, identity)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = resp.bytes().await?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn sends_identity_header() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/matches/1/x")
                    .header("user-agent", "agent-007");
                then.status(200).body("<html><body><p>ok</p></body></html>");
            })
            .await;

        let client = HttpClient::new().unwrap();
        let body = client
            .get(&server.url("/matches/1/x"), "agent-007")
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(String::from_utf8(body).unwrap().contains("ok"));
    }

    #[tokio::test]
    async fn cookies_are_not_carried_between_identities() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/matches/1/x");
                then.status(200)
                    .header("set-cookie", "sid=abc; Path=/")
                    .body("<html><body><p>1</p></body></html>");
            })
            .await;
        let replayed = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/matches/2/x")
                    .header_exists("cookie");
                then.status(200).body("<html><body><p>2</p></body></html>");
            })
            .await;

        let client = HttpClient::new().unwrap();
        client.get(&server.url("/matches/1/x"), "agent-a").await.unwrap();

        // Only a request carrying a cookie matches; without one the server 404s.
        let second = client.get(&server.url("/matches/2/x"), "agent-b").await;
        assert!(matches!(second, Err(FetchError::Status(s)) if s.as_u16() == 404));
        assert_eq!(replayed.hits_async().await, 0);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/matches/2/x");
                then.status(404);
            })
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get(&server.url("/matches/2/x"), "agent")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status(s) if s.as_u16() == 404));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let client = HttpClient::new().unwrap();
        // Port 9 (discard) on loopback is not served in test environments.
        let err = client
            .get("http://127.0.0.1:9/matches/3/x", "agent")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
