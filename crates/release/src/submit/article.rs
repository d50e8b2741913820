use crate::resource::ResourceStore;
use crate::source_control::SourceControl;

use super::{Article, SubmitError};

/// Shortest description, changelog or custom license accepted, in characters
pub const MIN_ARTICLE_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArticleFormat {
    Text,
    Markdown,
}

impl ArticleFormat {
    fn parse(format: &str) -> Option<Self> {
        match format {
            "txt" => Some(ArticleFormat::Text),
            "md" => Some(ArticleFormat::Markdown),
            _ => None,
        }
    }
}

/// Where an article is stored and what it is called in rejection messages
pub(crate) struct ArticleTarget<'a> {
    pub store: &'a ResourceStore,
    pub scm: &'a dyn SourceControl,
    pub token: &'a str,
    /// Repository full name, used as markdown rendering context
    pub context: &'a str,
}

impl ArticleTarget<'_> {
    /// Check an article's length, render it, and store it as a resource.
    /// Plain text is stored HTML-escaped; markdown is stored as rendered HTML.
    pub async fn store(&self, article: &Article, field: &str) -> Result<i64, SubmitError> {
        if article.text.chars().count() < MIN_ARTICLE_LENGTH {
            return Err(SubmitError::invalid(format!(
                "Please write a proper {field} for your plugin! Your {field} is far too short!"
            )));
        }

        let format = ArticleFormat::parse(&article.format).ok_or_else(|| {
            SubmitError::invalid(format!(
                "Param '{field}' has unknown type '{}'",
                article.format
            ))
        })?;

        let id = match format {
            ArticleFormat::Text => {
                self.store
                    .store("txt", "text/plain", escape_html(&article.text))
                    .await?
            }
            ArticleFormat::Markdown => {
                let html = self
                    .scm
                    .render_markdown(&article.text, self.context, self.token)
                    .await
                    .map_err(SubmitError::Upstream)?;
                self.store.store("html", "text/html", html).await?
            }
        };
        Ok(id)
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_article_format() {
        assert_eq!(ArticleFormat::parse("md"), Some(ArticleFormat::Markdown));
        assert_eq!(ArticleFormat::parse("txt"), Some(ArticleFormat::Text));
        assert_eq!(ArticleFormat::parse("html"), None);
    }
}
