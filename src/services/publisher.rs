use crate::app::{LoadState, NewsController};
use crate::error::{KrantError, Result};
use crate::presenter::HtmlPresenter;
use crate::types::PublishResult;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

const INDEX_FILE: &str = "index.html";
const METADATA_FILE: &str = "krant-metadata.json";

/// Writes controller pages to a directory as a static site.
pub struct SitePublisher;

impl SitePublisher {
    /// Writes `page-{n}.html` for every page, `index.html` and the metadata
    /// file. Leaves the controller on page 1.
    pub async fn publish(
        app: &mut NewsController,
        presenter: &HtmlPresenter,
        output_dir: &Path,
    ) -> Result<PublishResult> {
        let metadata = match app.state() {
            LoadState::Loaded(metadata) => metadata.clone(),
            LoadState::Failed { source_id, .. } => {
                return Self::publish_failure(source_id, presenter, output_dir).await;
            }
            LoadState::Idle => {
                return Err(KrantError::OutputDirectory {
                    reason: "No document has been loaded".to_string(),
                })
            }
        };

        Self::ensure_output_directory(output_dir).await?;

        let total_pages = app.total_pages();
        let mut output_files = Vec::new();
        let mut sections_meta = Vec::new();

        info!(
            "Publishing {} pages for '{}' to {}",
            total_pages,
            metadata.source_id,
            output_dir.display()
        );

        for page in 1..=total_pages {
            app.show_page(page);
            let html = presenter.page(&app.view(), app.popup());

            let path = output_dir.join(HtmlPresenter::page_href(page));
            Self::write_file(&path, &html).await?;
            debug!("Wrote page {} with {} articles", page, app.articles().len());

            if page == 1 {
                let index = output_dir.join(INDEX_FILE);
                Self::write_file(&index, &html).await?;
                output_files.push(index);
            }
            output_files.push(path);

            sections_meta.extend(app.articles().iter().map(|article| {
                serde_json::json!({
                    "section": article.section_index,
                    "page": page,
                    "title": article.title,
                    "collapsed": article.collapsed,
                })
            }));
        }

        app.show_page(1);

        let metadata_path = output_dir.join(METADATA_FILE);
        let split_outcome = app.sections().map(|s| s.outcome().clone());
        let metadata_json = serde_json::json!({
            "document": metadata,
            "split": split_outcome,
            "total_sections": sections_meta.len(),
            "total_pages": total_pages,
            "page_size": app.config().page_size,
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "sections": sections_meta,
        });
        let json_content = serde_json::to_string_pretty(&metadata_json)?;
        Self::write_file(&metadata_path, &json_content).await?;
        info!("Generated metadata file: {}", metadata_path.display());

        Ok(PublishResult {
            pages_written: total_pages,
            output_files,
            metadata_file: Some(metadata_path),
            failed: false,
        })
    }

    /// Writes an `index.html` holding only the failure block.
    pub async fn publish_failure(
        source_id: &str,
        presenter: &HtmlPresenter,
        output_dir: &Path,
    ) -> Result<PublishResult> {
        Self::ensure_output_directory(output_dir).await?;

        let index = output_dir.join(INDEX_FILE);
        Self::write_file(&index, &presenter.failure_page(source_id)).await?;
        info!("Wrote failure page for '{}'", source_id);

        Ok(PublishResult {
            pages_written: 0,
            output_files: vec![index],
            metadata_file: None,
            failed: true,
        })
    }

    async fn ensure_output_directory(output_dir: &Path) -> Result<()> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).await.map_err(|e| {
                KrantError::OutputDirectory {
                    reason: format!("Failed to create output directory: {}", e),
                }
            })?;
            info!("Created output directory: {}", output_dir.display());
        }
        Ok(())
    }

    async fn write_file(path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).await.map_err(|e| KrantError::OutputDirectory {
            reason: format!("Failed to write {}: {}", path.display(), e),
        })
    }
}
