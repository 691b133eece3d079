use crate::error::Result;
use crate::types::{RenderedArticle, Section};
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::Regex;
use tracing::debug;

/// Measures the laid-out height of an article body.
pub trait HeightMeter {
    fn measure(&self, body_markup: &str) -> u32;
}

/// Estimates height from wrapped text lines, for targets without a layout
/// engine.
#[derive(Debug, Clone)]
pub struct TextLayoutMeter {
    pub chars_per_line: usize,
    pub line_height: u32,
    pub block_gap: u32,
    pub image_height: u32,
    block_break: Regex,
    tag: Regex,
    image: Regex,
}

impl TextLayoutMeter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            chars_per_line: 60,
            line_height: 24,
            block_gap: 16,
            image_height: 200,
            block_break: Regex::new(
                r"(?i)<br\s*/?>|</(p|h[1-6]|li|div|tr|blockquote|pre|table|ul|ol)\s*>",
            )?,
            tag: Regex::new(r"(?s)<[^>]*>")?,
            image: Regex::new(r"(?i)<img\b")?,
        })
    }
}

impl HeightMeter for TextLayoutMeter {
    fn measure(&self, body_markup: &str) -> u32 {
        let with_breaks = self.block_break.replace_all(body_markup, "\n");
        let text = decode_entities(&self.tag.replace_all(&with_breaks, ""));
        let per_line = self.chars_per_line.max(1);

        let text_height: u32 = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let wrapped = line.chars().count().div_ceil(per_line) as u32;
                wrapped * self.line_height + self.block_gap
            })
            .sum();

        let images = self.image.find_iter(body_markup).count() as u32;
        text_height + images * self.image_height
    }
}

pub struct ArticleRenderer {
    collapse_threshold: u32,
    heading_pattern: Regex,
    paragraph_pattern: Regex,
    tag_pattern: Regex,
}

impl ArticleRenderer {
    pub fn new(collapse_threshold: u32) -> Result<Self> {
        Ok(Self {
            collapse_threshold,
            heading_pattern: Regex::new(r"(?is)<h[1-6]\b[^>]*>(.*?)</h[1-6]\s*>")?,
            paragraph_pattern: Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>")?,
            tag_pattern: Regex::new(r"(?s)<[^>]*>")?,
        })
    }

    /// First phase: derive the title and body. The article starts expanded
    /// until [`ArticleRenderer::settle`] measures it.
    pub fn render(&self, markup: &str, index: usize) -> RenderedArticle {
        let fragment = markup.trim();

        let (title, body_markup) = if let Some((title, range)) =
            self.first_element(&self.heading_pattern, fragment)
        {
            (title, remove_range(fragment, range))
        } else if let Some((title, range)) = self.first_element(&self.paragraph_pattern, fragment) {
            (title, remove_range(fragment, range))
        } else {
            (format!("Section {}", index), fragment.to_string())
        };

        debug!("Rendered section {} titled '{}'", index, title);

        RenderedArticle {
            title,
            body_markup,
            collapsed: false,
            section_index: index,
        }
    }

    pub fn render_section(&self, section: &Section) -> RenderedArticle {
        self.render(&section.markup, section.index)
    }

    /// Second phase: once the body is laid out, collapse it when it is taller
    /// than the threshold.
    pub fn settle(&self, article: &mut RenderedArticle, meter: &dyn HeightMeter) {
        let height = meter.measure(&article.body_markup);
        article.collapsed = height > self.collapse_threshold;

        if article.collapsed {
            debug!(
                "Section {} collapsed ({} > {})",
                article.section_index, height, self.collapse_threshold
            );
        }
    }

    /// Text and byte range of the first element matched by `pattern`, or
    /// `None` when there is no such element or its text is blank.
    fn first_element(
        &self,
        pattern: &Regex,
        fragment: &str,
    ) -> Option<(String, std::ops::Range<usize>)> {
        let captures = pattern.captures(fragment)?;
        let element = captures.get(0)?;
        let text = self.text_content(captures.get(1)?.as_str());
        (!text.is_empty()).then(|| (text, element.range()))
    }

    pub fn text_content(&self, markup: &str) -> String {
        let stripped = self.tag_pattern.replace_all(markup, "");
        decode_entities(&stripped)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn remove_range(fragment: &str, range: std::ops::Range<usize>) -> String {
    let mut body = String::with_capacity(fragment.len() - range.len());
    body.push_str(&fragment[..range.start]);
    body.push_str(&fragment[range.end..]);
    body.trim().to_string()
}

/// Decodes character references in exported document text, leaving the
/// text as-is when it holds a malformed reference.
pub fn decode_entities(text: &str) -> String {
    match unescape_with(text, resolve_html5_entity) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHeight(u32);

    impl HeightMeter for FixedHeight {
        fn measure(&self, _body_markup: &str) -> u32 {
            self.0
        }
    }

    fn renderer() -> ArticleRenderer {
        ArticleRenderer::new(300).unwrap()
    }

    #[test]
    fn test_heading_becomes_title_and_is_removed() {
        let article = renderer().render("<h2>Foo</h2><p>Bar</p>", 1);
        assert_eq!(article.title, "Foo");
        assert_eq!(article.body_markup, "<p>Bar</p>");
        assert!(!article.body_markup.contains("Foo"));
    }

    #[test]
    fn test_heading_found_anywhere_in_fragment() {
        let article = renderer().render(
            r#"<p>Intro</p><div><h4 class="c2"><span>Deep</span> news</h4></div>"#,
            3,
        );
        assert_eq!(article.title, "Deep news");
        assert_eq!(article.body_markup, "<p>Intro</p><div></div>");
    }

    #[test]
    fn test_paragraph_fallback_removes_used_paragraph() {
        let article = renderer().render("<p>Baz</p><p>More text</p>", 2);
        assert_eq!(article.title, "Baz");
        assert_eq!(article.body_markup, "<p>More text</p>");
    }

    #[test]
    fn test_blank_first_heading_falls_back_to_paragraph() {
        let article = renderer().render("<h2></h2><p>Lead</p><p>More</p>", 2);
        assert_eq!(article.title, "Lead");
        assert_eq!(article.body_markup, "<h2></h2><p>More</p>");
    }

    #[test]
    fn test_blank_first_paragraph_gives_synthetic_title() {
        let article = renderer().render(r#"<p class="c0"><span></span></p><p>Second para</p>"#, 5);
        assert_eq!(article.title, "Section 5");
        assert_eq!(
            article.body_markup,
            r#"<p class="c0"><span></span></p><p>Second para</p>"#
        );
    }

    #[test]
    fn test_synthetic_title_leaves_body_untouched() {
        let article = renderer().render("  <ul><li>Item</li></ul> ", 7);
        assert_eq!(article.title, "Section 7");
        assert_eq!(article.body_markup, "<ul><li>Item</li></ul>");
        assert_eq!(article.section_index, 7);
    }

    #[test]
    fn test_title_text_is_decoded_plain_text() {
        let article = renderer().render("<h1>Fish &amp; Chips &lt;b&gt;</h1>", 1);
        assert_eq!(article.title, "Fish & Chips <b>");
    }

    #[test]
    fn test_settle_collapses_tall_articles() {
        let renderer = renderer();

        let mut tall = renderer.render("<h2>T</h2><p>Body</p>", 1);
        renderer.settle(&mut tall, &FixedHeight(301));
        assert!(tall.collapsed);
        assert!(tall.expand_visible());

        let mut short = renderer.render("<h2>T</h2><p>Body</p>", 2);
        renderer.settle(&mut short, &FixedHeight(300));
        assert!(!short.collapsed);
        assert!(!short.expand_visible());
    }

    #[test]
    fn test_text_layout_meter_grows_with_content() {
        let meter = TextLayoutMeter::new().unwrap();

        let short = meter.measure("<p>One line</p>");
        assert_eq!(short, 24 + 16);

        let long_body = "<p>word </p>".repeat(20);
        assert!(meter.measure(&long_body) > 300);

        let wrapped = format!("<p>{}</p>", "x".repeat(121));
        assert_eq!(meter.measure(&wrapped), 3 * 24 + 16);

        assert_eq!(meter.measure(r#"<img src="a.png">"#), 200);
    }

    #[test]
    fn test_named_html_entities_in_titles() {
        let article = renderer().render("<h2>Rock &mdash; Roll &hellip; &rsquo;</h2><p>x</p>", 1);
        assert_eq!(article.title, "Rock \u{2014} Roll \u{2026} \u{2019}");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#8217;s &#x41;"), "\u{2019}s A");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }
}
