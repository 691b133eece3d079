use crate::error::{KrantError, Result};
use crate::types::{Document, DocumentMetadata, FetchStrategy, NewsConfig};
use serde::Deserialize;
use std::future::Future;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;

const EXPORT_BASE: &str = "https://docs.google.com/document/d";

/// Retrieves the body behind a URL.
pub trait Transport {
    fn get(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(KrantError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[derive(Deserialize)]
struct ProxyEnvelope {
    contents: Option<String>,
}

pub struct DocumentFetcher<T = HttpTransport> {
    transport: T,
    proxy_base: Url,
}

impl DocumentFetcher<HttpTransport> {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        Self::with_transport(HttpTransport::new(config)?, config)
    }
}

impl<T: Transport> DocumentFetcher<T> {
    pub fn with_transport(transport: T, config: &NewsConfig) -> Result<Self> {
        Ok(Self {
            transport,
            proxy_base: Url::parse(&config.proxy_base)?,
        })
    }

    /// Loads a document by id, trying the direct export first and the proxy
    /// export second. A source naming an existing local file is read from disk.
    pub async fn load(&self, source_id: &str) -> Result<Document> {
        if Self::is_local_file(source_id) {
            return Self::load_from_file(source_id).await;
        }

        let export = Self::export_url(source_id)?;
        let mut attempts = Vec::new();

        for strategy in [FetchStrategy::Direct, FetchStrategy::Proxy] {
            info!("Fetching '{}' via {}", source_id, strategy);

            match self.attempt(strategy, &export).await {
                Ok(markup) => {
                    info!("Loaded {} bytes via {}", markup.len(), strategy);
                    return Ok(Self::document(source_id, strategy, markup));
                }
                Err(e) => {
                    warn!("{} failed, trying next: {}", strategy, e);
                    attempts.push(format!("{}: {}", strategy, e));
                }
            }
        }

        Err(KrantError::LoadFailure {
            source_id: source_id.to_string(),
            attempts,
        })
    }

    async fn attempt(&self, strategy: FetchStrategy, export: &Url) -> Result<String> {
        let body = match strategy {
            FetchStrategy::Direct => self.transport.get(export).await?,
            FetchStrategy::Proxy => {
                let raw = self.transport.get(&self.proxy_url(export)).await?;
                let envelope: ProxyEnvelope = serde_json::from_str(&raw)?;
                envelope.contents.unwrap_or_default()
            }
            FetchStrategy::LocalFile => {
                return Err(KrantError::InvalidConfig {
                    reason: "local files are not fetched over the network".to_string(),
                })
            }
        };

        if body.trim().is_empty() {
            return Err(KrantError::EmptyBody {
                strategy: strategy.to_string(),
            });
        }

        Ok(body)
    }

    pub fn export_url(doc_id: &str) -> Result<Url> {
        let mut url = Url::parse(EXPORT_BASE)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(doc_id)
            .push("export");
        url.query_pairs_mut().append_pair("format", "html");
        Ok(url)
    }

    pub fn proxy_url(&self, export: &Url) -> Url {
        let mut url = self.proxy_base.clone();
        url.query_pairs_mut().append_pair("url", export.as_str());
        url
    }

    fn is_local_file(source: &str) -> bool {
        let path = Path::new(source);
        path.is_file()
    }

    async fn load_from_file(file_path: &str) -> Result<Document> {
        info!("Reading local document: {}", file_path);

        let markup = fs::read_to_string(file_path).await?;
        if markup.trim().is_empty() {
            return Err(KrantError::LoadFailure {
                source_id: file_path.to_string(),
                attempts: vec![KrantError::EmptyBody {
                    strategy: FetchStrategy::LocalFile.to_string(),
                }
                .to_string()],
            });
        }

        Ok(Self::document(file_path, FetchStrategy::LocalFile, markup))
    }

    fn document(source_id: &str, strategy: FetchStrategy, markup: String) -> Document {
        let metadata = DocumentMetadata {
            source_id: source_id.to_string(),
            strategy,
            fetched_at: chrono::Utc::now().to_rfc3339(),
            bytes: markup.len(),
        };

        Document { markup, metadata }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned bodies keyed by URL and records every request.
    #[derive(Default)]
    pub(crate) struct StubTransport {
        pub responses: HashMap<String, String>,
        pub requests: Mutex<Vec<String>>,
    }

    impl StubTransport {
        pub fn with(mut self, url: &Url, body: &str) -> Self {
            self.responses.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl Transport for StubTransport {
        async fn get(&self, url: &Url) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url.as_str())
                .cloned()
                .ok_or(KrantError::HttpStatus { status: 404 })
        }
    }

    fn export(id: &str) -> Url {
        DocumentFetcher::<StubTransport>::export_url(id).unwrap()
    }

    fn proxy(id: &str) -> Url {
        let fetcher =
            DocumentFetcher::with_transport(StubTransport::default(), &NewsConfig::default())
                .unwrap();
        fetcher.proxy_url(&export(id))
    }

    #[test]
    fn test_export_url_format() {
        assert_eq!(
            export("abc123").as_str(),
            "https://docs.google.com/document/d/abc123/export?format=html"
        );
    }

    #[test]
    fn test_proxy_url_wraps_export() {
        let url = proxy("abc123");
        assert!(url.as_str().starts_with("https://api.allorigins.win/get?url="));

        let wrapped: Vec<_> = url.query_pairs().collect();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].1, export("abc123").as_str());
    }

    #[tokio::test]
    async fn test_direct_strategy_wins() {
        let transport = StubTransport::default()
            .with(&export("doc"), "<p>direct</p>")
            .with(&proxy("doc"), r#"{"contents":"<p>proxy</p>"}"#);
        let fetcher = DocumentFetcher::with_transport(transport, &NewsConfig::default()).unwrap();

        let document = fetcher.load("doc").await.unwrap();
        assert_eq!(document.markup, "<p>direct</p>");
        assert_eq!(document.metadata.strategy, FetchStrategy::Direct);
        assert_eq!(fetcher.transport.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_proxy_on_empty_body() {
        let transport = StubTransport::default()
            .with(&export("doc"), "   \n")
            .with(&proxy("doc"), r#"{"contents":"<p>proxy</p>","status":{"http_code":200}}"#);
        let fetcher = DocumentFetcher::with_transport(transport, &NewsConfig::default()).unwrap();

        let document = fetcher.load("doc").await.unwrap();
        assert_eq!(document.markup, "<p>proxy</p>");
        assert_eq!(document.metadata.strategy, FetchStrategy::Proxy);

        let requests = fetcher.transport.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), &[export("doc").to_string(), proxy("doc").to_string()]);
    }

    #[tokio::test]
    async fn test_both_strategies_failing_is_load_failure() {
        let transport = StubTransport::default().with(&proxy("doc"), r#"{"contents":null}"#);
        let fetcher = DocumentFetcher::with_transport(transport, &NewsConfig::default()).unwrap();

        match fetcher.load("doc").await {
            Err(KrantError::LoadFailure { source_id, attempts }) => {
                assert_eq!(source_id, "doc");
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].contains("404"));
                assert!(attempts[1].contains("empty"));
            }
            other => panic!("expected load failure, got {:?}", other.map(|d| d.markup)),
        }
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_a_strategy_failure() {
        let transport = StubTransport::default().with(&proxy("doc"), "<html>not json</html>");
        let fetcher = DocumentFetcher::with_transport(transport, &NewsConfig::default()).unwrap();

        assert!(matches!(
            fetcher.load("doc").await,
            Err(KrantError::LoadFailure { .. })
        ));
    }
}
