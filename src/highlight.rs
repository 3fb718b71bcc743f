use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntaxTheme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::html::escape_text;

/// Style used when a code theme names one syntect does not ship.
pub const FALLBACK_STYLE: &str = "InspiredGitHub";

/// Language passed for untagged fences; highlighted as plain text.
pub const PLAIN_TEXT: &str = "text";

/// Produces inline-styled HTML for a code block body, without any `<pre>` wrapper.
pub trait CodeHighlighter {
    fn highlight(&self, code: &str, language: &str, style: &str) -> String;
}

impl<H: CodeHighlighter + ?Sized> CodeHighlighter for &H {
    fn highlight(&self, code: &str, language: &str, style: &str) -> String {
        (**self).highlight(code, language, style)
    }
}

/// Escapes the code and adds no colors.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl CodeHighlighter for PlainHighlighter {
    fn highlight(&self, code: &str, _language: &str, _style: &str) -> String {
        escape_text(code)
    }
}

pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

static SHARED: LazyLock<SyntectHighlighter> = LazyLock::new(SyntectHighlighter::new);

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    /// Process-wide instance; the syntax and theme sets are loaded on first use.
    pub fn shared() -> &'static SyntectHighlighter {
        &SHARED
    }

    pub fn style_names(&self) -> Vec<&str> {
        self.themes.themes.keys().map(String::as_str).collect()
    }

    fn find_syntax(&self, language: &str, code: &str) -> &SyntaxReference {
        let language = language.trim();
        if language.is_empty() || language.eq_ignore_ascii_case(PLAIN_TEXT) {
            return self.syntaxes.find_syntax_plain_text();
        }
        self.syntaxes
            .find_syntax_by_token(language)
            .or_else(|| {
                let first_line = code.lines().next().unwrap_or_default();
                self.syntaxes.find_syntax_by_first_line(first_line)
            })
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    fn find_style(&self, style: &str) -> Option<&SyntaxTheme> {
        self.themes.themes.get(style).or_else(|| {
            tracing::debug!(style, fallback = FALLBACK_STYLE, "unknown highlight style");
            self.themes.themes.get(FALLBACK_STYLE)
        })
    }

    fn try_highlight(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &SyntaxTheme,
    ) -> Result<String, syntect::Error> {
        let mut lines = HighlightLines::new(syntax, theme);
        let mut html = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let regions = lines.highlight_line(line, &self.syntaxes)?;
            html.push_str(&styled_line_to_highlighted_html(
                &regions[..],
                IncludeBackground::No,
            )?);
        }
        Ok(html)
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str, style: &str) -> String {
        let syntax = self.find_syntax(language, code);
        let Some(theme) = self.find_style(style) else {
            return escape_text(code);
        };
        match self.try_highlight(code, syntax, theme) {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(language, %err, "highlighting failed, emitting plain code");
                escape_text(code)
            }
        }
    }
}
