//! Markdown to inline-styled HTML, end to end.

use pulldown_cmark::{Event, Options, Parser, html};
use serde::{Deserialize, Serialize};

use crate::blocks::BlockRenderer;
use crate::highlight::{CodeHighlighter, SyntectHighlighter};
use crate::inliner::inline_styles;
use crate::math::{MathColors, MathRenderer, MathmlRenderer, substitute_formulas};
use crate::profiles::{
    Background, CodeTheme, DEFAULT_BACKGROUND, DEFAULT_CODE_THEME, DEFAULT_FONT_SIZE, FontSize,
};
use crate::style::ResolvedStyles;
use crate::theme::{DEFAULT_THEME, Theme};
use crate::vault::{BlockKind, PlaceholderVault};

/// Catalog identifiers for one conversion. Unknown ids fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub theme: String,
    pub code_theme: String,
    pub font_size: String,
    pub background: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            code_theme: DEFAULT_CODE_THEME.to_string(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

/// Result of one conversion, with the identifiers actually used.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub html: String,
    pub theme: String,
    pub code_theme: String,
    pub font_size: String,
    pub background: String,
}

impl Conversion {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct Converter<M, H> {
    math: M,
    highlighter: H,
}

impl<M: MathRenderer, H: CodeHighlighter> Converter<M, H> {
    pub fn new(math: M, highlighter: H) -> Self {
        Self { math, highlighter }
    }

    pub fn convert(&self, markdown: &str, options: &ConvertOptions) -> Conversion {
        let theme = Theme::resolve(&options.theme);
        self.convert_with_theme(markdown, &theme, options)
    }

    /// Like [`Converter::convert`] but with an already loaded theme, such as
    /// one read from a custom theme file. `options.theme` is ignored.
    pub fn convert_with_theme(
        &self,
        markdown: &str,
        theme: &Theme,
        options: &ConvertOptions,
    ) -> Conversion {
        let code_theme = CodeTheme::resolve(&options.code_theme);
        let font_size = FontSize::resolve(&options.font_size);
        let background = Background::resolve(&options.background);

        let html = self.render(markdown, theme, &code_theme, &font_size);

        Conversion {
            html,
            theme: theme.id.clone(),
            code_theme: code_theme.id.to_string(),
            font_size: font_size.id.to_string(),
            background: background.id.to_string(),
        }
    }

    fn render(
        &self,
        markdown: &str,
        theme: &Theme,
        code_theme: &CodeTheme,
        font_size: &FontSize,
    ) -> String {
        let markdown = substitute_formulas(markdown, &self.math, &MathColors::from_theme(theme));

        let mut vault = PlaceholderVault::new();
        let markdown = vault.extract_sliders(&markdown);
        let markdown = vault.extract_code_blocks(&markdown);
        tracing::debug!(
            theme = %theme.id,
            code = vault.count(BlockKind::Code),
            mermaid = vault.count(BlockKind::Mermaid),
            sliders = vault.count(BlockKind::Slider),
            "protected blocks"
        );

        let parsed = markdown_to_html(&markdown);

        let blocks = BlockRenderer {
            highlighter: &self.highlighter,
            theme,
            code_theme,
        };
        let restored = vault.restore(&parsed, |block| blocks.render(block));

        let styles = ResolvedStyles::resolve(theme, code_theme, font_size);
        inline_styles(&restored, &styles)
    }
}

impl Default for Converter<MathmlRenderer, &'static SyntectHighlighter> {
    fn default() -> Self {
        Self::new(MathmlRenderer::default(), SyntectHighlighter::shared())
    }
}

/// Converts with the local math renderer and the shared syntect highlighter.
pub fn convert_markdown(markdown: &str, options: &ConvertOptions) -> Conversion {
    Converter::default().convert(markdown, options)
}

/// CommonMark plus tables; single newlines become `<br />`.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::PlainHighlighter;
    use crate::math::NoMathRenderer;
    use crate::vault::contains_token;

    struct FixedMath;

    impl MathRenderer for FixedMath {
        fn render(&self, _latex: &str, _colors: &MathColors) -> Option<String> {
            Some("data:image/png;base64,AAAA".to_string())
        }
    }

    fn offline() -> Converter<NoMathRenderer, PlainHighlighter> {
        Converter::new(NoMathRenderer, PlainHighlighter)
    }

    fn styles_for(options: &ConvertOptions) -> ResolvedStyles {
        ResolvedStyles::resolve(
            &Theme::resolve(&options.theme),
            &CodeTheme::resolve(&options.code_theme),
            &FontSize::resolve(&options.font_size),
        )
    }

    #[test]
    fn soft_breaks_become_hard_breaks() {
        assert_eq!(markdown_to_html("a\nb"), "<p>a<br />\nb</p>\n");
    }

    #[test]
    fn title_and_inline_math_without_renderer() {
        let options = ConvertOptions::default();
        let out = offline().convert("# Title\n\nHello $x+1$ world.", &options).html;
        let styles = styles_for(&options);
        assert!(out.contains(&format!(r#"<h1 style="{}">Title</h1>"#, styles.h1)));
        assert!(styles.h1.contains("border-bottom: 2px solid #3f3f3f"));
        assert!(out.contains("<code style=\"background: #f5f5f5; padding: 2px 4px; border-radius: 2px;\">x+1</code>"));
        assert!(out.contains(&format!(r#"<p style="{}">Hello "#, styles.paragraph)));
        assert!(!out.contains('$'));
    }

    #[test]
    fn title_and_inline_math_with_renderer() {
        let converter = Converter::new(FixedMath, PlainHighlighter);
        let out = converter
            .convert("# Title\n\nHello $x+1$ world.", &ConvertOptions::default())
            .html;
        assert!(out.contains(r#"<img src="data:image/png;base64,AAAA" data-math="inline""#));
        assert_eq!(out.matches("data-math").count(), 1);
        assert!(!out.contains('$'));
    }

    #[test]
    fn single_python_fence() {
        let options = ConvertOptions::default();
        let out = offline().convert("```python\nprint(1)\n```", &options).html;
        let code_theme = CodeTheme::resolve(&options.code_theme);
        assert_eq!(out.matches(r#"<pre class="code-block" data-lang="python""#).count(), 1);
        assert_eq!(out.matches("<code").count(), 1);
        assert!(out.contains(&format!("background-color: {};", code_theme.bg)));
        assert!(out.contains(&format!("color: {};", code_theme.text_color)));
        assert!(out.contains("print(1)"));
        assert!(!out.contains("CODEBLOCKPLACEHOLDER"));
    }

    #[test]
    fn dollar_inside_fence_is_code_not_math() {
        let converter = Converter::new(FixedMath, PlainHighlighter);
        let out = converter
            .convert("```bash\necho $HOME and $PATH\n```", &ConvertOptions::default())
            .html;
        assert!(out.contains("echo $HOME and $PATH"));
        assert!(!out.contains("data-math"));
    }

    #[test]
    fn mixed_blocks_leave_no_tokens() {
        let markdown = "intro\n\n```rust\nfn a() {}\n```\n\n```mermaid\ngraph TD\nA-->B\n```\n\n<![one](1.png)\n![two](2.png)>\n\n```\nplain\n```\n";
        let out = offline().convert(markdown, &ConvertOptions::default()).html;
        assert_eq!(out.matches(r#"<pre class="code-block""#).count(), 2);
        assert_eq!(out.matches("md2-mermaid").count(), 1);
        assert_eq!(out.matches("data-slider-img").count(), 2);
        assert_eq!(out.matches("scroll-snap-type").count(), 1);
        assert!(!contains_token(&out));
    }

    #[test]
    fn html_comments_survive_as_comments() {
        let out = offline()
            .convert("text\n\n<!-- keep me -->\n\nmore", &ConvertOptions::default())
            .html;
        assert!(out.contains("<!-- keep me -->"));
        assert!(!contains_token(&out));
    }

    #[test]
    fn plain_markdown_only_gains_styles() {
        let options = ConvertOptions::default();
        let styles = styles_for(&options);
        let out = offline().convert("Hello *world*\n\n- a\n- b", &options).html;
        let expected = format!(
            "<section style=\"{}\">\n<p style=\"{}\">Hello <em>world</em></p>\n<ul style=\"{}\">\n<li style=\"{}\">a</li>\n<li style=\"{}\">b</li>\n</ul>\n\n</section>",
            styles.wrapper, styles.paragraph, styles.list, styles.list_item, styles.list_item
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn conversion_is_deterministic() {
        let options = ConvertOptions {
            theme: "cyberpunk".to_string(),
            ..ConvertOptions::default()
        };
        let markdown = "# T\n\n| a | b |\n|---|:-:|\n| 1 | 2 |\n| 3 | 4 |\n\n> quote";
        let first = offline().convert(markdown, &options);
        let second = offline().convert(markdown, &options);
        assert_eq!(first.html, second.html);
    }

    #[test]
    fn tables_are_striped_in_full_conversion() {
        let options = ConvertOptions::default();
        let styles = styles_for(&options);
        let markdown = "| h |\n|---|\n| r0 |\n| r1 |\n| r2 |\n| r3 |";
        let out = offline().convert(markdown, &options).html;
        assert!(out.contains(&format!(r#"<td style="{}">r0</td>"#, styles.td_even)));
        assert!(out.contains(&format!(r#"<td style="{}">r1</td>"#, styles.td_odd)));
        assert!(out.contains(&format!(r#"<td style="{}">r2</td>"#, styles.td_even)));
        assert!(out.contains(&format!(r#"<td style="{}">r3</td>"#, styles.td_odd)));
        assert!(out.contains(&format!(r#"<th style="{} text-align: left;">h</th>"#, styles.th)));
    }

    #[test]
    fn unknown_identifiers_are_reported_as_defaults() {
        let options = ConvertOptions {
            theme: "nope".to_string(),
            code_theme: "nope".to_string(),
            font_size: "huge".to_string(),
            background: "stars".to_string(),
        };
        let conversion = offline().convert("x", &options);
        assert_eq!(conversion.theme, DEFAULT_THEME);
        assert_eq!(conversion.code_theme, DEFAULT_CODE_THEME);
        assert_eq!(conversion.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(conversion.background, DEFAULT_BACKGROUND);
    }

    #[test]
    fn conversion_serializes_resolved_ids() {
        let json = offline().convert("x", &ConvertOptions::default()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["theme"], "default");
        assert_eq!(value["background"], "warm");
        assert!(value["html"].as_str().unwrap().starts_with("<section"));
    }

    #[test]
    fn custom_theme_is_used_verbatim() {
        let theme = Theme::from_toml(
            r##"
name = "Custom"
colors = ["#123456", "#654321", "#abcdef"]
description = "test"

[styles]
bg_color = "#ffffff"
blockquote_bg = "#eeeeee"
code_bg = "#eeeeee"
h1_style = "ribbon"
"##,
        )
        .unwrap();
        let out = offline()
            .convert_with_theme("# Hi", &theme, &ConvertOptions::default())
            .html;
        assert!(out.contains("box-shadow: 4px 4px 0 #abcdef"));
    }
}
