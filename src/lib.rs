//! # Krant
//!
//! Turns a publicly shared Google Doc into paginated news articles. The
//! document is fetched (directly, then through a CORS proxy), split into
//! sections on the first delimiter that matches, and rendered one page at a
//! time with collapsible articles and a single popup overlay.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use krant::{DocumentFetcher, HtmlPresenter, NewsConfig, NewsController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NewsConfig::default();
//!     let fetcher = DocumentFetcher::new(&config)?;
//!
//!     let mut app = NewsController::new(config)?;
//!     app.load(&fetcher, "14rLBJRSTqLEH2twnbMiieLuTG6G9DLQNZL_8eHO5z40").await;
//!
//!     app.show_page(2);
//!     let html = HtmlPresenter::default().page(&app.view(), app.popup());
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod error;
pub mod presenter;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use app::{LoadState, NewsController};
pub use error::{KrantError, Result};
pub use presenter::HtmlPresenter;
pub use services::{
    ArticleRenderer, DocumentFetcher, HeightMeter, Paginator, Popup, PopupTarget,
    SectionSplitter, SitePublisher, TextLayoutMeter, Transport,
};
pub use types::{
    Document, DocumentMetadata, FetchStrategy, NavControl, NewsConfig, PageView,
    RenderedArticle, Section, SectionList, SplitOutcome,
};
