//! Source handler factory
//!
//! Maps a configured source format to its handler. New formats are added
//! here without touching the pipeline.

use std::sync::Arc;

use super::json_api::JsonApiHandler;
use super::m3u::M3uSourceHandler;
use super::plain::PlainListHandler;
use super::traits::SourceHandler;
use crate::config::{Config, SourceConfig, SourceFormat};
use crate::utils::StandardHttpClient;

pub struct SourceHandlerFactory;

impl SourceHandlerFactory {
    /// Create the handler for one source
    pub fn create_handler(
        source: &SourceConfig,
        client: &StandardHttpClient,
    ) -> Arc<dyn SourceHandler> {
        let source = source.clone();
        let client = client.clone();
        match source.format {
            SourceFormat::Plain => Arc::new(PlainListHandler::new(source, client)),
            SourceFormat::M3u => Arc::new(M3uSourceHandler::new(source, client)),
            SourceFormat::JsonApi => Arc::new(JsonApiHandler::new(source, client)),
        }
    }

    /// Handlers for every enabled source, in declaration order
    pub fn create_handlers(
        config: &Config,
        client: &StandardHttpClient,
    ) -> Vec<Arc<dyn SourceHandler>> {
        config
            .enabled_sources()
            .map(|source| Self::create_handler(source, client))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;

    #[test]
    fn test_create_handlers_skips_disabled_sources() {
        let mut disabled =
            SourceConfig::new("old", "https://a.example/old.m3u", SourceFormat::M3u);
        disabled.enabled = false;
        let mut api = SourceConfig::new("api", "https://a.example/api", SourceFormat::JsonApi);
        api.channel_name = Some("西充综合".to_string());

        let config = Config {
            sources: vec![
                SourceConfig::new("list", "https://a.example/list.txt", SourceFormat::Plain),
                disabled,
                api,
            ],
            ..Config::default()
        };
        let client = StandardHttpClient::new(&FetchConfig::default()).unwrap();

        let handlers = SourceHandlerFactory::create_handlers(&config, &client);
        let formats: Vec<_> = handlers.iter().map(|h| h.format()).collect();
        assert_eq!(formats, vec![SourceFormat::Plain, SourceFormat::JsonApi]);
        assert_eq!(handlers[1].source().name, "api");
    }
}
