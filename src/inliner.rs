//! Rewrites parser output so every element carries its own `style` attribute.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::style::ResolvedStyles;

const CODE_INNER_OPEN: &str = "<code-inner>";
const CODE_INNER_MARK: &str = r#" data-code-inner="true""#;

static BLOCK_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<pre class="code-block" data-lang="([^"]*)"><code>"#).unwrap()
});
static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<table>(.*?)</table>").unwrap());
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<tr>(.*?)</tr>").unwrap());
static CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(th|td)(?:\s+style="text-align:\s*(\w+);?")?>"#).unwrap()
});
static SECTION_WRAPPERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?(?:thead|tbody)>\s*").unwrap());
static OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(h[1-6]|pre|p|blockquote|code|ul|ol|li|hr|img)(\s[^>]*)?>").unwrap()
});

/// Applies `styles` to parsed and restored HTML and wraps it in the page section.
pub fn inline_styles(html: &str, styles: &ResolvedStyles) -> String {
    let html = mark_block_code(html);
    let html = restyle_tables(&html, styles);
    let html = style_open_tags(&html, styles);
    let html = unmark_block_code(&html, styles);
    wrap(&html, styles)
}

fn mark_block_code(html: &str) -> String {
    BLOCK_CODE_RE
        .replace_all(html, |caps: &Captures| {
            format!(
                r#"<pre class="code-block" data-lang="{}"{CODE_INNER_MARK}>{CODE_INNER_OPEN}"#,
                &caps[1]
            )
        })
        .into_owned()
}

fn unmark_block_code(html: &str, styles: &ResolvedStyles) -> String {
    html.replace(
        CODE_INNER_OPEN,
        &format!(r#"<code style="{}">"#, styles.code_in_block),
    )
    .replace("</code-inner>", "</code>")
}

fn restyle_tables(html: &str, styles: &ResolvedStyles) -> String {
    TABLE_RE
        .replace_all(html, |caps: &Captures| {
            let body = SECTION_WRAPPERS_RE.replace_all(&caps[1], "");
            let mut data_row = 0usize;
            let rows = ROW_RE.replace_all(&body, |row: &Captures| {
                let cells = &row[1];
                let styled = if cells.contains("<th") {
                    style_cells(cells, |align| {
                        format!("{} text-align: {};", styles.th, align.unwrap_or("left"))
                    })
                } else {
                    let base = styles.data_cell(data_row);
                    data_row += 1;
                    style_cells(cells, |align| match align {
                        Some(align) => format!("{base} text-align: {align};"),
                        None => base.to_string(),
                    })
                };
                format!("<tr>{styled}</tr>")
            });
            format!(r#"<table style="{}">{rows}</table>"#, styles.table)
        })
        .into_owned()
}

fn style_cells(cells: &str, style: impl Fn(Option<&str>) -> String) -> String {
    CELL_RE
        .replace_all(cells, |caps: &Captures| {
            let align = caps.get(2).map(|m| m.as_str());
            format!(r#"<{} style="{}">"#, &caps[1], style(align))
        })
        .into_owned()
}

fn style_for<'s>(tag: &str, styles: &'s ResolvedStyles) -> &'s str {
    match tag {
        "h1" => &styles.h1,
        "h2" => &styles.h2,
        "h3" | "h4" | "h5" | "h6" => &styles.h3,
        "p" => &styles.paragraph,
        "blockquote" => &styles.blockquote,
        "code" => &styles.inline_code,
        "pre" => &styles.code_block,
        "ul" | "ol" => &styles.list,
        "li" => &styles.list_item,
        "hr" => &styles.hr,
        _ => &styles.image,
    }
}

fn style_open_tags(html: &str, styles: &ResolvedStyles) -> String {
    OPEN_TAG_RE
        .replace_all(html, |caps: &Captures| {
            let tag = &caps[1];
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            if attrs.contains("style=") || attrs.contains("data-slider-img") {
                return caps[0].to_string();
            }
            let (attrs, close) = match attrs.trim_end().strip_suffix('/') {
                Some(attrs) => (attrs.trim_end(), " />"),
                None => (attrs, ">"),
            };
            format!(r#"<{tag}{attrs} style="{}"{close}"#, style_for(tag, styles))
        })
        .into_owned()
}

fn wrap(content: &str, styles: &ResolvedStyles) -> String {
    format!("<section style=\"{}\">\n{content}\n</section>", styles.wrapper)
}
