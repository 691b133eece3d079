pub mod fetcher;
pub mod paginator;
pub mod popup;
pub mod publisher;
pub mod renderer;
pub mod splitter;

pub use fetcher::{DocumentFetcher, HttpTransport, Transport};
pub use paginator::Paginator;
pub use popup::{Overlay, Popup, PopupTarget, ScrollState};
pub use publisher::SitePublisher;
pub use renderer::{ArticleRenderer, HeightMeter, TextLayoutMeter};
pub use splitter::SectionSplitter;
