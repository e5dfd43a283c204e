use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use url::Url;

/// Carries a serialized form payload to the submission endpoint and
/// returns the raw response body. Network-level failures surface as
/// errors; the pipeline degrades them to the generic `error` outcome.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, endpoint: &str, payload: &[(String, String)])
    -> anyhow::Result<String>;
}

/// HTTP transport: POST of URL-encoded fields, single token body back.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: None,
        })
    }

    /// Relative endpoints (the common case for page documents) are
    /// resolved against this base.
    pub fn with_base_url(base_url: Url) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: Some(base_url),
        })
    }

    fn resolve(&self, endpoint: &str) -> anyhow::Result<Url> {
        if let Ok(url) = Url::parse(endpoint) {
            return Ok(url);
        }
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("relative endpoint needs a base url: {endpoint}"))?;
        base.join(endpoint)
            .with_context(|| format!("resolve endpoint {endpoint} against {base}"))
    }
}

fn build_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("build submission http client")
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn submit(
        &self,
        endpoint: &str,
        payload: &[(String, String)],
    ) -> anyhow::Result<String> {
        let url = self.resolve(endpoint)?;
        let response = self
            .client
            .post(url.clone())
            .form(payload)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("submission endpoint returned {status}: {url}");
        }

        response
            .text()
            .await
            .with_context(|| format!("read submission response body: {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_endpoint_needs_no_base() {
        let transport = HttpTransport::new().unwrap();
        let url = transport.resolve("https://example.com/mail.php").unwrap();
        assert_eq!(url.as_str(), "https://example.com/mail.php");
    }

    #[test]
    fn relative_endpoint_resolves_against_base() {
        let base = Url::parse("https://example.com/site/").unwrap();
        let transport = HttpTransport::with_base_url(base).unwrap();
        let url = transport.resolve("assets/php/mail.php").unwrap();
        assert_eq!(url.as_str(), "https://example.com/site/assets/php/mail.php");
    }

    #[test]
    fn relative_endpoint_without_base_is_an_error() {
        let transport = HttpTransport::new().unwrap();
        let err = transport.resolve("assets/php/mail.php").unwrap_err();
        assert!(err.to_string().contains("base url"));
    }
}
