use crate::error::{KrantError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const DEFAULT_COLLAPSE_THRESHOLD: u32 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PROXY_BASE: &str = "https://api.allorigins.win/get";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchStrategy {
    Direct,
    Proxy,
    LocalFile,
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FetchStrategy::Direct => "direct export",
            FetchStrategy::Proxy => "proxy export",
            FetchStrategy::LocalFile => "local file",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source_id: String,
    pub strategy: FetchStrategy,
    pub fetched_at: String,
    pub bytes: usize,
}

/// Raw markup of one load cycle.
#[derive(Debug, Clone)]
pub struct Document {
    pub markup: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// 1-based position in the document.
    pub index: usize,
    pub markup: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitOutcome {
    /// Split on the delimiter with this pattern source.
    Delimited(String),
    /// No delimiter matched; the whole document is one section.
    WholeDocument,
}

/// Ordered sections of a document. Never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionList {
    sections: Vec<Section>,
    outcome: SplitOutcome,
}

impl SectionList {
    /// Builds a list from fragments in document order, falling back to a
    /// single empty section so the list is never empty.
    pub(crate) fn from_fragments(fragments: Vec<String>, outcome: SplitOutcome) -> Self {
        let mut sections: Vec<Section> = fragments
            .into_iter()
            .enumerate()
            .map(|(idx, markup)| Section {
                index: idx + 1,
                markup,
            })
            .collect();

        if sections.is_empty() {
            sections.push(Section {
                index: 1,
                markup: String::new(),
            });
        }

        Self { sections, outcome }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn outcome(&self) -> &SplitOutcome {
        &self.outcome
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        index.checked_sub(1).and_then(|i| self.sections.get(i))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedArticle {
    /// Plain title text; escape before embedding in markup.
    pub title: String,
    pub body_markup: String,
    pub collapsed: bool,
    pub section_index: usize,
}

impl RenderedArticle {
    pub fn expand_visible(&self) -> bool {
        self.collapsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavControl {
    Previous(usize),
    Page { number: usize, active: bool },
    Next(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub page: usize,
    pub total_pages: usize,
    pub articles: Vec<RenderedArticle>,
    /// `None` when there is only one page.
    pub navigation: Option<Vec<NavControl>>,
}

#[derive(Debug, Clone)]
pub struct PublishResult {
    pub pages_written: usize,
    pub output_files: Vec<PathBuf>,
    pub metadata_file: Option<PathBuf>,
    /// Only the failure page was written.
    pub failed: bool,
}

#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub page_size: usize,
    pub collapse_threshold: u32,
    pub timeout: Duration,
    pub proxy_base: String,
    /// Literal delimiter tried before the built-in patterns.
    pub custom_delimiter: Option<String>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            collapse_threshold: DEFAULT_COLLAPSE_THRESHOLD,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy_base: DEFAULT_PROXY_BASE.to_string(),
            custom_delimiter: None,
        }
    }
}

impl NewsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(KrantError::InvalidConfig {
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(KrantError::InvalidConfig {
                reason: "Request timeout must be greater than 0".to_string(),
            });
        }

        if self.custom_delimiter.as_deref().is_some_and(str::is_empty) {
            return Err(KrantError::InvalidConfig {
                reason: "Custom delimiter must not be empty".to_string(),
            });
        }

        url::Url::parse(&self.proxy_base)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = NewsConfig::default();
        assert_eq!(config.page_size, 6);
        assert_eq!(config.collapse_threshold, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let config = NewsConfig {
            page_size: 0,
            ..NewsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(KrantError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_bad_proxy_base_is_rejected() {
        let config = NewsConfig {
            proxy_base: "not a url".to_string(),
            ..NewsConfig::default()
        };
        assert!(matches!(config.validate(), Err(KrantError::InvalidUrl(_))));
    }

    #[test]
    fn test_section_lookup_is_one_based() {
        let list = SectionList::from_fragments(
            vec!["a".to_string(), "b".to_string()],
            SplitOutcome::WholeDocument,
        );
        assert!(list.get(0).is_none());
        assert_eq!(list.get(2).map(|s| s.markup.as_str()), Some("b"));
        assert!(list.get(3).is_none());
    }
}
