//! Syntax highlighting for code blocks

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{highlighted_html_for_string, styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Code highlighter backed by syntect's bundled syntaxes and themes
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl CodeHighlighter {
    /// Create a new highlighter
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Highlight a code block. `lang` is the language name Notion attaches
    /// to code blocks (e.g. "rust", "javascript", "plain text").
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = normalize_language(lang);
        let class = slug::slugify(&lang);

        let Some(theme) = self.theme() else {
            return plain_block(code, &class);
        };
        let syntax = self.syntax_for(&lang);

        if self.line_numbers {
            return match self.highlight_lines(code, syntax, theme) {
                Some(lines) => with_line_numbers(&lines, &class),
                None => plain_block(code, &class),
            };
        }

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => format!(
                r#"<figure class="highlight code lang-{}">{}</figure>"#,
                class, highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", class, e);
                plain_block(code, &class)
            }
        }
    }

    /// Highlight each source line separately, keeping its line ending
    fn highlight_lines(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Option<Vec<String>> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        LinesWithEndings::from(code)
            .map(|line| {
                let regions = highlighter.highlight_line(line, &self.syntax_set).ok()?;
                styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()
            })
            .collect()
    }

    fn syntax_for(&self, lang: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Gutter and code cells with one row per source line
fn with_line_numbers(lines: &[String], class: &str) -> String {
    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<figure class="highlight code lang-{}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        class,
        gutter,
        lines.concat()
    )
}

fn plain_block(code: &str, class: &str) -> String {
    format!(
        r#"<pre class="code lang-{}"><code class="language-{}">{}</code></pre>"#,
        class,
        class,
        html_escape(code)
    )
}

/// Lowercased language token, "text" when absent or plain
fn normalize_language(lang: Option<&str>) -> String {
    match lang.map(|l| l.trim().to_lowercase()) {
        Some(l) if !l.is_empty() && l != "plain text" => l,
        _ => "text".to_string(),
    }
}

/// Simple HTML escaping
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
