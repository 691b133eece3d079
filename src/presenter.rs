//! HTML presentation of controller views.
//!
//! Produces the markup for article blocks, the pagination block, the shared
//! popup overlay and the failure block. Pages are self-contained documents
//! that link to each other as `page-{n}.html`.

use crate::services::Popup;
use crate::types::{NavControl, PageView, RenderedArticle};

const PROVENANCE: &str = "From Google Doc";

#[derive(Debug, Clone)]
pub struct HtmlPresenter {
    site_title: String,
}

impl Default for HtmlPresenter {
    fn default() -> Self {
        Self::new("The Krant")
    }
}

impl HtmlPresenter {
    pub fn new(site_title: &str) -> Self {
        Self {
            site_title: site_title.to_string(),
        }
    }

    pub fn page_href(page: usize) -> String {
        format!("page-{}.html", page)
    }

    /// Full HTML document for one page of articles.
    pub fn page(&self, view: &PageView, popup: &Popup) -> String {
        let mut body = String::new();

        body.push_str("<main id=\"news-grid\" class=\"news-grid\">\n");
        for article in &view.articles {
            body.push_str(&self.article(article));
        }
        body.push_str("</main>\n");

        body.push_str(&self.pagination(view.navigation.as_deref()));
        body.push_str(&self.overlay(popup));

        self.document(&body, popup.is_open())
    }

    /// Full HTML document explaining that `source_id` could not be loaded.
    pub fn failure_page(&self, source_id: &str) -> String {
        let body = format!(
            "<main id=\"news-grid\" class=\"news-grid\">\n{}</main>\n",
            self.failure(source_id)
        );
        self.document(&body, false)
    }

    pub fn article(&self, article: &RenderedArticle) -> String {
        let index = article.section_index;
        let mut classes = String::from("content expandable-content");
        if article.collapsed {
            classes.push_str(" collapsed");
        }
        let button_style = if article.expand_visible() {
            "display: block;"
        } else {
            "display: none;"
        };

        format!(
            r#"<article class="news-article">
  <h3>{title}</h3>
  <div class="{classes}" id="content-{index}">
    {body}
  </div>
  <button class="expand-btn" id="expand-{index}" data-section="{index}" style="{button_style}">Read Full Article</button>
  <div class="news-meta">Section {index} • {provenance}</div>
</article>
"#,
            title = escape_html(&article.title),
            classes = classes,
            index = index,
            body = article.body_markup,
            button_style = button_style,
            provenance = PROVENANCE,
        )
    }

    /// Pagination block, or an empty string when navigation is hidden.
    pub fn pagination(&self, navigation: Option<&[NavControl]>) -> String {
        let Some(controls) = navigation else {
            return String::new();
        };

        let mut output = String::from("<nav id=\"pagination\" class=\"pagination\">\n");
        output.push_str("<div class=\"pagination-controls\">");

        for control in controls {
            let link = match *control {
                NavControl::Previous(target) => {
                    format!(r#"<a class="nav-btn" href="{}">Previous</a>"#, Self::page_href(target))
                }
                NavControl::Page { number, active } => format!(
                    r#"<a class="page-btn{}" href="{}">{}</a>"#,
                    if active { " active" } else { "" },
                    Self::page_href(number),
                    number
                ),
                NavControl::Next(target) => {
                    format!(r#"<a class="nav-btn" href="{}">Next</a>"#, Self::page_href(target))
                }
            };
            output.push_str(&link);
        }

        output.push_str("</div>\n</nav>\n");
        output
    }

    /// The single overlay element; hidden unless the popup is open.
    pub fn overlay(&self, popup: &Popup) -> String {
        let (title, body) = popup
            .overlay()
            .filter(|o| o.visible)
            .map(|o| (escape_html(&o.title), o.body_markup.as_str()))
            .unwrap_or_default();
        let display = if popup.is_open() { "flex" } else { "none" };

        format!(
            r#"<div id="article-popup" class="popup-overlay" style="display: {display};">
  <div class="popup-content">
    <button class="popup-close">&times;</button>
    <div class="popup-header"><h2 id="popup-title">{title}</h2></div>
    <div class="popup-body" id="popup-body">{body}</div>
  </div>
</div>
"#,
            display = display,
            title = title,
            body = body,
        )
    }

    pub fn failure(&self, source_id: &str) -> String {
        format!(
            r#"<article class="news-article">
  <h3>Unable to Load Content</h3>
  <div class="content">
    <p>We're having trouble loading content from the Google Doc. Please ensure:</p>
    <ul>
      <li>The document is publicly accessible</li>
      <li>Each page in the document represents a news section</li>
      <li>Your browser allows cross-origin requests</li>
    </ul>
    <p>Document ID: {}</p>
  </div>
  <div class="news-meta">Error • Check document permissions</div>
</article>
"#,
            escape_html(source_id)
        )
    }

    fn document(&self, body: &str, scroll_locked: bool) -> String {
        let scroll = if scroll_locked {
            " style=\"overflow: hidden;\""
        } else {
            ""
        };

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title}</title>\n<style>{css}</style>\n</head>\n<body{scroll}>\n\
             <header class=\"header\"><h1>{title}</h1></header>\n{body}<script>{script}</script>\n\
             </body>\n</html>\n",
            title = escape_html(&self.site_title),
            css = CSS_STYLES,
            scroll = scroll,
            body = body,
            script = POPUP_SCRIPT,
        )
    }
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS_STYLES: &str = r#"
body { font-family: Georgia, serif; margin: 0; background: #fafafa; color: #222; }
.header { padding: 1rem 2rem; background: #fff; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
.news-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1.5rem; padding: 2rem; }
.news-article { background: #fff; padding: 1.5rem; border-radius: 4px; }
.content.collapsed { max-height: 300px; overflow: hidden; }
.news-meta { margin-top: 1rem; font-size: 0.85rem; color: #777; }
.pagination-controls { display: flex; gap: 0.5rem; justify-content: center; padding: 1rem; }
.page-btn.active { font-weight: bold; text-decoration: underline; }
.popup-overlay { position: fixed; inset: 0; background: rgba(0,0,0,0.6); align-items: center; justify-content: center; }
.popup-content { background: #fff; max-width: 800px; max-height: 85vh; overflow-y: auto; padding: 2rem; position: relative; }
.popup-close { position: absolute; top: 0.5rem; right: 0.5rem; }
"#;

const POPUP_SCRIPT: &str = r#"
(function () {
  var popup = document.getElementById('article-popup');
  function close() { popup.style.display = 'none'; document.body.style.overflow = 'auto'; }
  document.querySelectorAll('.expand-btn').forEach(function (btn) {
    btn.addEventListener('click', function () {
      var article = btn.closest('.news-article');
      document.getElementById('popup-title').textContent = article.querySelector('h3').textContent;
      document.getElementById('popup-body').innerHTML = article.querySelector('.content').innerHTML;
      popup.style.display = 'flex';
      document.body.style.overflow = 'hidden';
    });
  });
  popup.addEventListener('click', function (e) { if (e.target === popup) close(); });
  popup.querySelector('.popup-close').addEventListener('click', close);
})();
"#;
