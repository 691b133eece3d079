mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands, RenderArgs, ValidateArgs};
use krant::app::{LoadState, NewsController};
use krant::error::{KrantError, Result};
use krant::presenter::HtmlPresenter;
use krant::services::{DocumentFetcher, Paginator, SitePublisher};
use krant::types::{NewsConfig, SplitOutcome};
use std::path::Path;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Render(args) => handle_render_command(args, &cli.output).await,
        Commands::Analyze(args) => handle_analyze_command(args).await,
        Commands::Validate(args) => handle_validate_command(args).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn load_controller(config: NewsConfig, source: &str) -> Result<NewsController> {
    let fetcher = DocumentFetcher::new(&config)?;
    let mut app = NewsController::new(config)?;
    app.load(&fetcher, source).await;
    Ok(app)
}

async fn handle_render_command(args: &RenderArgs, output_dir: &Path) -> Result<()> {
    info!("Rendering '{}' into {}", args.source, output_dir.display());

    // Check if output directory exists and handle force flag
    if output_dir.exists() && !args.force {
        let entries = std::fs::read_dir(output_dir).map_err(|e| KrantError::OutputDirectory {
            reason: format!("Cannot read output directory: {}", e),
        })?;

        if entries.count() > 0 {
            return Err(KrantError::OutputDirectory {
                reason: "Output directory is not empty. Use --force to overwrite.".to_string(),
            });
        }
    }

    let mut app = load_controller(NewsConfig::from(&args.layout), &args.source).await?;
    let presenter = HtmlPresenter::new(&args.title);
    let result = SitePublisher::publish(&mut app, &presenter, output_dir).await?;

    if let Some(failure) = app.state().failure() {
        info!("Wrote failure page to {}", output_dir.display());
        return Err(failure);
    }

    info!(
        "Successfully rendered {} pages for '{}':",
        result.pages_written, args.source
    );
    for output_file in &result.output_files {
        info!("  - {}", output_file.display());
    }
    if let Some(metadata_file) = &result.metadata_file {
        info!("  - {} (metadata)", metadata_file.display());
    }

    Ok(())
}

async fn handle_analyze_command(args: &AnalyzeArgs) -> Result<()> {
    info!("Analyzing '{}'", args.source);

    let config = NewsConfig::from(&args.layout);
    let page_size = config.page_size;
    let mut app = load_controller(config, &args.source).await?;

    if let Some(failure) = app.state().failure() {
        return Err(failure);
    }

    let Some(sections) = app.sections().cloned() else {
        return Err(KrantError::LoadFailure {
            source_id: args.source.clone(),
            attempts: Vec::new(),
        });
    };
    let total_pages = app.total_pages();

    println!("\n=== Analysis for '{}' ===", args.source);
    if let LoadState::Loaded(metadata) = app.state() {
        println!("Fetched via: {}", metadata.strategy);
        println!("Document size: {} bytes", metadata.bytes);
    }
    match sections.outcome() {
        SplitOutcome::Delimited(pattern) => println!("Split on: {}", pattern),
        SplitOutcome::WholeDocument => println!("Split on: (no delimiter matched)"),
    }
    println!("Total sections: {}", sections.len());
    println!("Page size: {}", page_size);
    println!("Total pages: {}", total_pages);

    let mut pages = Vec::new();
    for page in 1..=total_pages {
        app.show_page(page);
        let range = Paginator::page_range(page, sections.len(), page_size);

        if args.detailed {
            println!("\nPage {}: sections {}-{}", page, range.start + 1, range.end);
            for article in app.articles() {
                let marker = if article.collapsed { " [collapsed]" } else { "" };
                println!("  {:>3}. {}{}", article.section_index, article.title, marker);
            }
        }

        pages.push(app.view());
    }

    let collapsed = pages
        .iter()
        .flat_map(|view| &view.articles)
        .filter(|article| article.collapsed)
        .count();
    println!("\nCollapsed sections: {}", collapsed);

    // Write JSON output if requested
    if let Some(json_path) = &args.json_output {
        let json_content = serde_json::to_string_pretty(&serde_json::json!({
            "source": args.source,
            "split": sections.outcome(),
            "total_sections": sections.len(),
            "total_pages": total_pages,
            "pages": pages,
        }))
        .context("Failed to serialize analysis results")?;

        tokio::fs::write(json_path, json_content)
            .await
            .context("Failed to write JSON analysis file")?;

        info!("Analysis results written to: {}", json_path.display());
    }

    Ok(())
}

async fn handle_validate_command(args: &ValidateArgs) -> Result<()> {
    info!("Validating {} sources", args.sources.len());

    let config = NewsConfig::from(&args.layout);
    config.validate()?;
    let fetcher = DocumentFetcher::new(&config)?;

    let mut invalid_sources = Vec::new();

    for source in &args.sources {
        match fetcher.load(source).await {
            Ok(document) => {
                info!(
                    "✓ Valid: {} ({} bytes via {})",
                    source, document.metadata.bytes, document.metadata.strategy
                );
            }
            Err(e) => {
                error!("✗ Invalid: {} - {}", source, e);
                invalid_sources.push((source, e.to_string()));
            }
        }
    }

    println!("\n=== Validation Summary ===");
    println!(
        "Valid sources: {}/{}",
        args.sources.len() - invalid_sources.len(),
        args.sources.len()
    );

    if !invalid_sources.is_empty() {
        println!("Invalid sources:");
        let invalid_count = invalid_sources.len();
        for (source, error) in invalid_sources {
            println!("  - {}: {}", source, error);
        }
        return Err(KrantError::InvalidConfig {
            reason: format!("{} sources failed validation", invalid_count),
        });
    }

    println!("All sources are reachable!");
    Ok(())
}
