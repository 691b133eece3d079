use crate::error::Result;
use crate::types::{SectionList, SplitOutcome};
use regex::Regex;
use tracing::{debug, info};

pub struct SectionSplitter {
    delimiters: Vec<Regex>,
    body_pattern: Regex,
}

impl SectionSplitter {
    pub fn new(custom_delimiter: Option<&str>) -> Result<Self> {
        // Priority is declaration order, not match count
        let mut delimiters = vec![
            Regex::new(r"---+")?, // horizontal-rule style
            Regex::new(r"===")?,  // underline style
            Regex::new(r"###")?,  // heading-marker style
        ];

        if let Some(marker) = custom_delimiter {
            delimiters.insert(0, Regex::new(&regex::escape(marker))?);
        }

        let body_pattern = Regex::new(r"(?is)<body\b[^>]*>(.*?)(?:</body\s*>|\z)")?;

        Ok(Self {
            delimiters,
            body_pattern,
        })
    }

    /// Splits raw markup into sections using the first delimiter that
    /// matches anywhere. Never returns an empty list.
    pub fn split(&self, raw_markup: &str) -> SectionList {
        let content = self.body_content(raw_markup);

        for delimiter in &self.delimiters {
            if !delimiter.is_match(content) {
                continue;
            }

            let fragments: Vec<String> = delimiter
                .split(content)
                .filter(|fragment| !fragment.trim().is_empty())
                .map(str::to_string)
                .collect();

            if fragments.is_empty() {
                debug!("Delimiter '{}' left only blank fragments", delimiter.as_str());
                break;
            }

            info!(
                "Split document into {} sections on '{}'",
                fragments.len(),
                delimiter.as_str()
            );
            return SectionList::from_fragments(
                fragments,
                SplitOutcome::Delimited(delimiter.as_str().to_string()),
            );
        }

        info!("No delimiter matched, treating document as a single section");
        SectionList::from_fragments(vec![content.trim().to_string()], SplitOutcome::WholeDocument)
    }

    fn body_content<'a>(&self, raw_markup: &'a str) -> &'a str {
        self.body_pattern
            .captures(raw_markup)
            .and_then(|captures| captures.get(1))
            .map(|body| body.as_str())
            .unwrap_or(raw_markup)
    }
}
