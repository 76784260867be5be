use reqwest::Client;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::FetchConfig;
use crate::errors::{AppError, AppResult, SourceError, SourceResult};
use crate::utils::url::UrlUtils;

/// HTTP client used by the source adapters
///
/// One GET per source, no retries. Bodies are always decoded as UTF-8
/// regardless of the advertised charset, since upstream lists frequently
/// omit or misreport it.
#[derive(Clone)]
pub struct StandardHttpClient {
    client: Client,
}

impl StandardHttpClient {
    pub fn new(config: &FetchConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(AppError::Http)?;
        Ok(Self { client })
    }

    /// Fetch URL and return its body as text
    pub async fn fetch_text(
        &self,
        source_name: &str,
        url: &str,
        headers: &BTreeMap<String, String>,
        query: &BTreeMap<String, String>,
    ) -> SourceResult<String> {
        debug!(
            "Fetching source '{}' from: {}",
            source_name,
            UrlUtils::obfuscate_credentials(url)
        );

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| {
            SourceError::fetch(
                source_name,
                UrlUtils::obfuscate_credentials(&e.to_string()),
            )
        })?;

        if !response.status().is_success() {
            return Err(SourceError::Http {
                status: response.status().as_u16(),
                url: UrlUtils::obfuscate_credentials(url),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::fetch(source_name, format!("Failed to read response: {e}")))?;

        let content = String::from_utf8_lossy(&bytes).into_owned();
        debug!(
            "Fetched {} characters of text content for source '{}'",
            content.len(),
            source_name
        );
        Ok(content)
    }
}
