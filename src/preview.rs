//! Standalone preview document around a converted fragment.

use crate::html::escape_text;
use crate::profiles::Background;

const GRID_PATTERN: &str = "background-image: linear-gradient(rgba(0, 0, 0, 0.04) 1px, transparent 1px), linear-gradient(90deg, rgba(0, 0, 0, 0.04) 1px, transparent 1px); background-size: 20px 20px;";

/// CSS for the page body behind the article.
pub fn body_style(background: &Background) -> String {
    let mut style = format!(
        "margin: 0; padding: 24px 12px; background-color: {};",
        background.color
    );
    if background.id == "grid" {
        style.push(' ');
        style.push_str(GRID_PATTERN);
    }
    style
}

/// Wraps `fragment` in a complete HTML document for viewing in a browser.
pub fn preview_document(fragment: &str, title: &str, background: &Background) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body style="{body}">
<div style="max-width: 677px; margin: 0 auto;">
{fragment}
</div>
</body>
</html>
"#,
        title = escape_text(title),
        body = body_style(background),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_background_colors_the_body() {
        let doc = preview_document("<section>x</section>", "t", &Background::resolve("warm"));
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("background-color: #FDF6E3;"));
        assert!(doc.contains("<section>x</section>"));
        assert!(!doc.contains("background-size"));
    }

    #[test]
    fn grid_background_adds_pattern() {
        let style = body_style(&Background::resolve("grid"));
        assert!(style.contains("background-color: #FFFFFF;"));
        assert!(style.contains("background-size: 20px 20px;"));
    }

    #[test]
    fn none_background_is_transparent() {
        let background = Background::resolve("none");
        assert!(background.is_transparent());
        assert!(body_style(&background).contains("background-color: transparent;"));
    }

    #[test]
    fn title_is_escaped() {
        let doc = preview_document("", "a < b", &Background::default());
        assert!(doc.contains("<title>a &lt; b</title>"));
    }
}
