//! HTML rendering of content blocks

use super::highlight::{html_escape, CodeHighlighter};
use super::ContentBlock;
use crate::config::HighlightConfig;

/// Renders post bodies to HTML
pub struct ContentRenderer {
    highlighter: CodeHighlighter,
}

impl ContentRenderer {
    pub fn new(config: &HighlightConfig) -> Self {
        Self {
            highlighter: CodeHighlighter::with_options(&config.theme, config.line_number),
        }
    }

    /// Render blocks in document order
    pub fn render(&self, blocks: &[ContentBlock]) -> String {
        let mut html = String::new();
        for block in blocks {
            html.push_str(&self.render_block(block));
            html.push('\n');
        }
        html
    }

    fn render_block(&self, block: &ContentBlock) -> String {
        let text = html_escape(block.text().unwrap_or_default());
        match block {
            ContentBlock::Paragraph { .. } => format!(r#"<p class="paragraph">{}</p>"#, text),
            ContentBlock::Heading2 { .. } => format!(r#"<h2 class="heading2">{}</h2>"#, text),
            ContentBlock::Heading3 { .. } => format!(r#"<h3 class="heading3">{}</h3>"#, text),
            ContentBlock::Quote { .. } => {
                format!(r#"<blockquote class="quote">{}</blockquote>"#, text)
            }
            ContentBlock::Code { text, language } => self
                .highlighter
                .highlight(text.as_deref().unwrap_or_default(), language.as_deref()),
        }
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new(&HighlightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_render_text_blocks() {
        let renderer = ContentRenderer::default();
        let html = renderer.render(&[
            ContentBlock::Heading2 { text: text("Title") },
            ContentBlock::Heading3 { text: text("Sub") },
            ContentBlock::Paragraph {
                text: text("a < b"),
            },
            ContentBlock::Quote { text: None },
        ]);

        assert!(html.contains(r#"<h2 class="heading2">Title</h2>"#));
        assert!(html.contains(r#"<h3 class="heading3">Sub</h3>"#));
        assert!(html.contains(r#"<p class="paragraph">a &lt; b</p>"#));
        assert!(html.contains(r#"<blockquote class="quote"></blockquote>"#));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = ContentRenderer::default();
        let html = renderer.render(&[ContentBlock::Code {
            text: text("let x = 1;\n"),
            language: text("rust"),
        }]);
        assert!(html.contains("lang-rust"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(ContentRenderer::default().render(&[]), "");
    }
}
