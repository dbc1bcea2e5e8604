use std::time::Duration;

use futures_util::StreamExt;

use crate::payload::parse_terms;
use crate::FetchFailure;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_bytes: 1024 * 1024,
        }
    }
}

/// Remote collaborator that lists trending search terms.
#[async_trait::async_trait]
pub trait TrendsFetcher: Send + Sync {
    /// Fetches up to `max` terms. The result may be longer; callers truncate.
    async fn fetch_terms(&self, max: usize) -> Result<Vec<String>, FetchFailure>;
}

/// `GET <base>/api/trends?max=<n>` over reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTrendsFetcher {
    settings: FetchSettings,
}

impl ReqwestTrendsFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchFailure> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchFailure::Network(err.to_string()))
    }

    fn trends_url(&self, max: usize) -> Result<reqwest::Url, FetchFailure> {
        let endpoint = format!("{}/api/trends", self.settings.base_url.trim_end_matches('/'));
        let mut url = reqwest::Url::parse(&endpoint)
            .map_err(|err| FetchFailure::InvalidUrl(err.to_string()))?;
        url.query_pairs_mut().append_pair("max", &max.to_string());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl TrendsFetcher for ReqwestTrendsFetcher {
    async fn fetch_terms(&self, max: usize) -> Result<Vec<String>, FetchFailure> {
        let url = self.trends_url(max)?;
        let client = self.build_client()?;

        let response = client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::HttpStatus(status.as_u16()));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchFailure::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchFailure::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(next_len),
                });
            }
            body.extend_from_slice(&chunk);
        }

        parse_terms(&body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        return FetchFailure::Timeout;
    }
    FetchFailure::Network(err.to_string())
}
