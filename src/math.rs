//! LaTeX formula substitution.
//!
//! Formulas are replaced in the raw Markdown before any other pass. Each one
//! becomes an `<img>` carrying a data URI from a [`MathRenderer`], or a plain
//! `<code>` fallback when rendering fails.

use std::num::NonZeroUsize;
use std::sync::LazyLock;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use latex2mathml::{DisplayStyle, latex_to_mathml};
use lru::LruCache;
use parking_lot::Mutex;
use regex::{Captures, Regex};

use crate::color::HexColor;
use crate::html::escape_text;
use crate::theme::Theme;
use crate::vault::map_outside_fences;

pub const CODECOGS_ENDPOINT: &str = "https://latex.codecogs.com/png.latex";
pub const DEFAULT_DPI: u32 = 150;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Mozilla/5.0";

const BLOCK_IMG_STYLE: &str = "display: block; margin: 16px auto; max-width: 100%;";
const INLINE_IMG_STYLE: &str =
    "display: inline-block; vertical-align: middle; margin: 0 2px; max-height: 1.5em;";
const BLOCK_FALLBACK_STYLE: &str =
    "text-align: center; margin: 16px 0; padding: 12px; background: #f5f5f5; border-radius: 4px;";
const INLINE_FALLBACK_STYLE: &str = "background: #f5f5f5; padding: 2px 4px; border-radius: 2px;";

static BLOCK_MATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").unwrap());

/// Colors a renderer should use so formulas blend into the page.
#[derive(Debug, Clone)]
pub struct MathColors {
    pub background: HexColor,
    pub text: String,
}

impl MathColors {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            background: theme.styles.bg_color.clone(),
            text: theme
                .styles
                .text_color
                .clone()
                .unwrap_or_else(|| "#333333".to_string()),
        }
    }
}

/// Turns a LaTeX formula into an image data URI, or `None` if it cannot.
pub trait MathRenderer {
    fn render(&self, latex: &str, colors: &MathColors) -> Option<String>;
}

impl<R: MathRenderer + ?Sized> MathRenderer for &R {
    fn render(&self, latex: &str, colors: &MathColors) -> Option<String> {
        (**self).render(latex, colors)
    }
}

impl<R: MathRenderer + ?Sized> MathRenderer for Box<R> {
    fn render(&self, latex: &str, colors: &MathColors) -> Option<String> {
        (**self).render(latex, colors)
    }
}

/// Never renders; every formula takes the text fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMathRenderer;

impl MathRenderer for NoMathRenderer {
    fn render(&self, _latex: &str, _colors: &MathColors) -> Option<String> {
        None
    }
}

/// Fetches PNG renderings from the CodeCogs web service.
pub struct CodeCogsRenderer {
    agent: ureq::Agent,
    endpoint: String,
    dpi: u32,
}

impl CodeCogsRenderer {
    pub fn new(endpoint: impl Into<String>, dpi: u32, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            endpoint: endpoint.into(),
            dpi,
        }
    }

    pub fn request_url(&self, latex: &str, colors: &MathColors) -> String {
        let latex = if colors.background.is_dark() {
            format!("\\color{{white}}{{{latex}}}")
        } else {
            latex.to_string()
        };
        format!(
            "{}?\\dpi{{{}}}{}",
            self.endpoint,
            self.dpi,
            urlencoding::encode(&latex)
        )
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, ureq::Error> {
        let mut response = self.agent.get(url).header("User-Agent", USER_AGENT).call()?;
        response.body_mut().read_to_vec()
    }
}

impl Default for CodeCogsRenderer {
    fn default() -> Self {
        Self::new(
            CODECOGS_ENDPOINT,
            DEFAULT_DPI,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }
}

impl MathRenderer for CodeCogsRenderer {
    fn render(&self, latex: &str, colors: &MathColors) -> Option<String> {
        let url = self.request_url(latex, colors);
        match self.fetch(&url) {
            Ok(bytes) if !bytes.is_empty() => {
                Some(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
            }
            Ok(_) => {
                tracing::warn!(latex, "math service returned an empty image");
                None
            }
            Err(err) => {
                tracing::warn!(latex, %err, "math service request failed");
                None
            }
        }
    }
}

/// Local rendering: MathML wrapped in an SVG `foreignObject`.
#[derive(Debug, Clone, Copy)]
pub struct MathmlRenderer {
    pub font_size: f32,
}

impl Default for MathmlRenderer {
    fn default() -> Self {
        Self { font_size: 16.0 }
    }
}

impl MathmlRenderer {
    pub fn to_svg(&self, latex: &str, colors: &MathColors) -> Result<String, String> {
        let mathml = latex_to_mathml(latex, DisplayStyle::Inline)
            .map_err(|e| format!("LaTeX parse error: {:?}", e))?;

        // No layout engine here, so size the box from the source length.
        let rows = latex.lines().count().max(1) as f32;
        let columns = latex.lines().map(|l| l.chars().count()).max().unwrap_or(1).max(1) as f32;
        let width = (columns * self.font_size * 0.6 + 8.0).ceil();
        let height = (rows * self.font_size * 1.8 + 8.0).ceil();

        Ok(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><foreignObject width="100%" height="100%"><div xmlns="http://www.w3.org/1999/xhtml" style="color: {}; font-size: {}px; text-align: center;">{mathml}</div></foreignObject></svg>"#,
            colors.text, self.font_size,
        ))
    }
}

impl MathRenderer for MathmlRenderer {
    fn render(&self, latex: &str, colors: &MathColors) -> Option<String> {
        match self.to_svg(latex, colors) {
            Ok(svg) => Some(format!(
                "data:image/svg+xml;base64,{}",
                STANDARD.encode(svg.as_bytes())
            )),
            Err(err) => {
                tracing::debug!(latex, %err, "local math rendering failed");
                None
            }
        }
    }
}

/// Tries `primary`, then `secondary`.
pub struct FallbackRenderer<P, S> {
    pub primary: P,
    pub secondary: S,
}

impl<P: MathRenderer, S: MathRenderer> MathRenderer for FallbackRenderer<P, S> {
    fn render(&self, latex: &str, colors: &MathColors) -> Option<String> {
        self.primary
            .render(latex, colors)
            .or_else(|| self.secondary.render(latex, colors))
    }
}

/// Formula, background digits and text color, all lowercased.
type CacheKey = (String, String, String);

/// Remembers successful renderings so repeated formulas are fetched once.
pub struct CachedRenderer<R> {
    inner: R,
    cache: Mutex<LruCache<CacheKey, String>>,
}

impl<R> CachedRenderer<R> {
    pub fn new(inner: R, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl<R: MathRenderer> MathRenderer for CachedRenderer<R> {
    fn render(&self, latex: &str, colors: &MathColors) -> Option<String> {
        let key = (
            latex.to_string(),
            colors.background.digits().to_ascii_lowercase(),
            colors.text.trim().to_ascii_lowercase(),
        );
        if let Some(hit) = self.cache.lock().get(&key) {
            return Some(hit.clone());
        }
        let rendered = self.inner.render(latex, colors)?;
        self.cache.lock().put(key, rendered.clone());
        Some(rendered)
    }
}

/// Replaces `$$...$$` and `$...$` formulas outside fenced code.
pub fn substitute_formulas<R: MathRenderer + ?Sized>(
    markdown: &str,
    renderer: &R,
    colors: &MathColors,
) -> String {
    let mut rendered = 0usize;
    let mut fallbacks = 0usize;
    let mut render = |latex: &str| {
        let src = renderer.render(latex, colors);
        if src.is_some() {
            rendered += 1;
        } else {
            fallbacks += 1;
        }
        src
    };

    let output = map_outside_fences(markdown, |segment| {
        let segment = BLOCK_MATH_RE
            .replace_all(segment, |caps: &Captures| {
                let latex = caps[1].trim();
                block_formula(latex, render(latex))
            })
            .into_owned();
        replace_inline_spans(&segment, |latex| {
            let latex = latex.trim();
            inline_formula(latex, render(latex))
        })
    });

    if rendered + fallbacks > 0 {
        tracing::debug!(rendered, fallbacks, "substituted math formulas");
    }
    output
}

fn block_formula(latex: &str, src: Option<String>) -> String {
    match src {
        Some(src) => block_image(&src),
        None => format!(
            r#"<div style="{BLOCK_FALLBACK_STYLE}"><code>{}</code></div>"#,
            escape_text(latex)
        ),
    }
}

fn inline_formula(latex: &str, src: Option<String>) -> String {
    match src {
        Some(src) if latex.contains('\n') => block_image(&src),
        Some(src) => format!(
            r#"<img src="{src}" data-math="inline" style="{INLINE_IMG_STYLE}" alt="math">"#
        ),
        None => format!(
            r#"<code style="{INLINE_FALLBACK_STYLE}">{}</code>"#,
            escape_text(latex)
        ),
    }
}

fn block_image(src: &str) -> String {
    format!("\n<img src=\"{src}\" data-math=\"block\" style=\"{BLOCK_IMG_STYLE}\" alt=\"math\">\n")
}

/// Finds `$...$` spans whose delimiters are not part of a `$$` pair and
/// replaces each with `replace(content)`. Content may span lines.
fn replace_inline_spans(text: &str, mut replace: impl FnMut(&str) -> String) -> String {
    let bytes = text.as_bytes();
    let is_single = |i: usize| {
        bytes[i] == b'$' && (i == 0 || bytes[i - 1] != b'$') && bytes.get(i + 1) != Some(&b'$')
    };

    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    let mut i = 0;
    while i < bytes.len() {
        if !is_single(i) {
            i += 1;
            continue;
        }
        let Some(close) = (i + 2..bytes.len()).find(|&j| is_single(j)) else {
            break;
        };
        output.push_str(&text[last..i]);
        output.push_str(&replace(&text[i + 1..close]));
        last = close + 1;
        i = close + 1;
    }
    output.push_str(&text[last..]);
    output
}
