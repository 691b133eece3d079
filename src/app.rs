use crate::error::{KrantError, Result};
use crate::services::{
    ArticleRenderer, DocumentFetcher, HeightMeter, Paginator, Popup, PopupTarget,
    SectionSplitter, TextLayoutMeter, Transport,
};
use crate::types::{Document, DocumentMetadata, NewsConfig, PageView, RenderedArticle, SectionList};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub enum LoadState {
    Idle,
    Loaded(DocumentMetadata),
    Failed {
        source_id: String,
        attempts: Vec<String>,
    },
}

impl LoadState {
    /// The load failure behind a [`LoadState::Failed`] state.
    pub fn failure(&self) -> Option<KrantError> {
        match self {
            LoadState::Failed {
                source_id,
                attempts,
            } => Some(KrantError::LoadFailure {
                source_id: source_id.clone(),
                attempts: attempts.clone(),
            }),
            _ => None,
        }
    }
}

/// Owns the loaded sections, the current page and the popup.
pub struct NewsController {
    config: NewsConfig,
    splitter: SectionSplitter,
    renderer: ArticleRenderer,
    meter: Box<dyn HeightMeter>,
    sections: Option<SectionList>,
    state: LoadState,
    current_page: usize,
    articles: Vec<RenderedArticle>,
    popup: Popup,
}

impl NewsController {
    pub fn new(config: NewsConfig) -> Result<Self> {
        let meter = TextLayoutMeter::new()?;
        Self::with_meter(config, Box::new(meter))
    }

    pub fn with_meter(config: NewsConfig, meter: Box<dyn HeightMeter>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            splitter: SectionSplitter::new(config.custom_delimiter.as_deref())?,
            renderer: ArticleRenderer::new(config.collapse_threshold)?,
            config,
            meter,
            sections: None,
            state: LoadState::Idle,
            current_page: 1,
            articles: Vec::new(),
            popup: Popup::new(),
        })
    }

    /// Fetches, splits and shows the first page. A load failure is kept as
    /// [`LoadState::Failed`] and not returned.
    pub async fn load<T: Transport>(
        &mut self,
        fetcher: &DocumentFetcher<T>,
        source_id: &str,
    ) -> &LoadState {
        match fetcher.load(source_id).await {
            Ok(document) => self.load_document(document),
            Err(e) => {
                error!("Error loading news: {}", e);
                self.sections = None;
                self.articles.clear();
                self.current_page = 1;
                let attempts = match e {
                    KrantError::LoadFailure { attempts, .. } => attempts,
                    other => vec![other.to_string()],
                };
                self.state = LoadState::Failed {
                    source_id: source_id.to_string(),
                    attempts,
                };
            }
        }

        &self.state
    }

    /// Replaces any previous sections with those of `document`.
    pub fn load_document(&mut self, document: Document) {
        let sections = self.splitter.split(&document.markup);
        info!(
            "Loaded {} sections from '{}'",
            sections.len(),
            document.metadata.source_id
        );

        self.sections = Some(sections);
        self.state = LoadState::Loaded(document.metadata);
        self.popup.close();
        self.show_page(1);
    }

    /// Renders the sections of `page` and measures them. Does not touch
    /// controller state.
    pub fn articles_for(&self, page: usize) -> Vec<RenderedArticle> {
        let Some(sections) = &self.sections else {
            return Vec::new();
        };

        Paginator::page_slice(sections, page, self.config.page_size)
            .iter()
            .map(|section| {
                let mut article = self.renderer.render_section(section);
                self.renderer.settle(&mut article, self.meter.as_ref());
                article
            })
            .collect()
    }

    pub fn show_page(&mut self, page: usize) {
        self.current_page = page;
        self.articles = self.articles_for(page);
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.show_page(self.current_page + 1);
        }
    }

    pub fn previous_page(&mut self) {
        if self.current_page > 1 {
            self.show_page(self.current_page - 1);
        }
    }

    /// Opens the popup with the full body of a section on the current page.
    pub fn expand(&mut self, section_index: usize) -> Result<()> {
        let article = self
            .articles
            .iter()
            .find(|a| a.section_index == section_index)
            .ok_or(KrantError::SectionNotFound {
                index: section_index,
            })?;

        self.popup.open(&article.title, &article.body_markup);
        Ok(())
    }

    pub fn close_popup(&mut self) {
        self.popup.close();
    }

    pub fn popup_click(&mut self, target: PopupTarget) {
        self.popup.click(target);
    }

    pub fn total_pages(&self) -> usize {
        self.sections
            .as_ref()
            .map(|s| Paginator::total_pages(s.len(), self.config.page_size))
            .unwrap_or(0)
    }

    pub fn view(&self) -> PageView {
        let total_pages = self.total_pages();
        PageView {
            page: self.current_page,
            total_pages,
            articles: self.articles.clone(),
            navigation: Paginator::navigation(self.current_page, total_pages),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn articles(&self) -> &[RenderedArticle] {
        &self.articles
    }

    pub fn sections(&self) -> Option<&SectionList> {
        self.sections.as_ref()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn config(&self) -> &NewsConfig {
        &self.config
    }
}
