//! Final markup for blocks that were held back from the Markdown parser.

use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::STANDARD};
use regex::Regex;

use crate::highlight::{CodeHighlighter, PLAIN_TEXT};
use crate::html::{escape_attr, escape_text};
use crate::profiles::CodeTheme;
use crate::theme::Theme;
use crate::vault::ProtectedBlock;

/// Text shown until a browser-side renderer replaces the diagram placeholder.
pub const MERMAID_PENDING_TEXT: &str = "Mermaid 图表渲染中…";

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Renders one vaulted block for reinsertion into the parsed HTML.
pub struct BlockRenderer<'a, H: ?Sized> {
    pub highlighter: &'a H,
    pub theme: &'a Theme,
    pub code_theme: &'a CodeTheme,
}

impl<H: CodeHighlighter + ?Sized> BlockRenderer<'_, H> {
    pub fn render(&self, block: &ProtectedBlock) -> String {
        match block {
            ProtectedBlock::Code { language, source } => {
                let lexer = if language.is_empty() { PLAIN_TEXT } else { language.as_str() };
                let highlighted = self.highlighter.highlight(source, lexer, self.code_theme.style);
                code_block(language, &highlighted)
            }
            ProtectedBlock::Mermaid { source } => mermaid_block(source, self.theme),
            ProtectedBlock::Slider { raw } => {
                slider_block(raw, &self.theme.styles.border_radius).unwrap_or_else(|| {
                    tracing::debug!("'<!...>' block without images restored verbatim");
                    block.original()
                })
            }
        }
    }
}

pub fn code_block(language: &str, highlighted: &str) -> String {
    format!(
        r#"<pre class="code-block" data-lang="{}"><code>{highlighted}</code></pre>"#,
        escape_attr(language)
    )
}

/// A deferred diagram: the source travels base64-encoded in `data-mermaid`.
pub fn mermaid_block(source: &str, theme: &Theme) -> String {
    let styles = &theme.styles;
    format!(
        r#"<div class="md2-mermaid" data-mermaid="{}" style="margin: 16px 0; padding: 16px; text-align: center; border: 1px dashed {}; border-radius: {}; background: {}; color: {}; font-size: 0.9em;">{}</div>"#,
        STANDARD.encode(source.as_bytes()),
        theme.accent(),
        styles.border_radius,
        styles.blockquote_bg,
        styles.secondary_text(),
        escape_text(MERMAID_PENDING_TEXT),
    )
}

/// Horizontally scrolling 16:9 gallery, or `None` if `raw` holds no images.
pub fn slider_block(raw: &str, border_radius: &str) -> Option<String> {
    let slides: Vec<String> = IMAGE_RE
        .captures_iter(raw)
        .map(|caps| {
            format!(
                r#"<div style="flex: 0 0 100%; scroll-snap-align: start;"><img data-slider-img="true" src="{}" alt="{}" style="display: block; width: 100%; aspect-ratio: 16/9; object-fit: fill; border-radius: {border_radius}; margin: 0;"></div>"#,
                escape_attr(caps[2].trim()),
                escape_attr(&caps[1]),
            )
        })
        .collect();

    if slides.is_empty() {
        return None;
    }

    Some(format!(
        r#"<section style="width: 100%; overflow-x: auto; -webkit-overflow-scrolling: touch; margin: 16px 0; scroll-snap-type: x mandatory; border-radius: {border_radius};"><div style="display: flex;">{}</div></section>"#,
        slides.concat()
    ))
}
