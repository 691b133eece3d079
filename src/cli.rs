use clap::{Args, Parser, Subcommand};
use krant::types::{
    NewsConfig, DEFAULT_COLLAPSE_THRESHOLD, DEFAULT_PAGE_SIZE, DEFAULT_PROXY_BASE,
    DEFAULT_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "krant")]
#[command(about = "Render a shared Google Doc as paginated news articles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output directory for rendered pages
    #[arg(short, long, global = true, default_value = "./site")]
    pub output: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a document and write every page as HTML
    Render(RenderArgs),

    /// Show how a document splits into sections and pages
    Analyze(AnalyzeArgs),

    /// Check that documents can be loaded
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct LayoutArgs {
    /// Sections shown per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Height above which an article is collapsed
    #[arg(long, default_value_t = DEFAULT_COLLAPSE_THRESHOLD)]
    pub threshold: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Proxy endpoint used when the direct export fails
    #[arg(long, value_name = "URL", default_value = DEFAULT_PROXY_BASE)]
    pub proxy: String,

    /// Custom section delimiter, tried before the built-in ones
    #[arg(long, value_name = "TEXT")]
    pub delimiter: Option<String>,
}

impl From<&LayoutArgs> for NewsConfig {
    fn from(args: &LayoutArgs) -> Self {
        NewsConfig {
            page_size: args.page_size,
            collapse_threshold: args.threshold,
            timeout: Duration::from_secs(args.timeout),
            proxy_base: args.proxy.clone(),
            custom_delimiter: args.delimiter.clone(),
        }
    }
}

#[derive(Args)]
pub struct RenderArgs {
    /// Google Doc id or path to a local HTML export
    #[arg(required = true, value_name = "SOURCE")]
    pub source: String,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Title shown in the page header
    #[arg(long, default_value = "The Krant")]
    pub title: String,

    /// Force overwrite existing output files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Google Doc id or path to a local HTML export
    #[arg(required = true, value_name = "SOURCE")]
    pub source: String,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Output analysis to JSON file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Show per-page section details
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Google Doc ids or paths to local HTML exports
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    #[command(flatten)]
    pub layout: LayoutArgs,
}
