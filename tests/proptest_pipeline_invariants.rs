use md2html::math::NoMathRenderer;
use md2html::vault::contains_token;
use md2html::{ConvertOptions, Converter, HexColor, PlainHighlighter, Theme};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Block {
    Text(String),
    Code { language: String, body: String },
    Mermaid(String),
    Slider(Vec<(String, String)>),
}

impl Block {
    fn to_markdown(&self) -> String {
        match self {
            Block::Text(text) => text.clone(),
            Block::Code { language, body } => format!("```{language}\n{body}\n```"),
            Block::Mermaid(body) => format!("```mermaid\n{body}\n```"),
            Block::Slider(images) => {
                let images: Vec<String> = images
                    .iter()
                    .map(|(alt, url)| format!("![{alt}]({url})"))
                    .collect();
                format!("<{}>", images.join("\n"))
            }
        }
    }
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        "[a-zA-Z][a-zA-Z ]{0,30}".prop_map(Block::Text),
        (
            prop::sample::select(vec!["rust", "python", "js", ""]),
            "[a-z][a-z =;]{0,20}"
        )
            .prop_map(|(language, body)| Block::Code {
                language: language.to_string(),
                body,
            }),
        "[A-Z]-->[A-Z]".prop_map(|edge| Block::Mermaid(format!("graph TD\n{edge}"))),
        prop::collection::vec(("[a-z]{1,8}", "[a-z]{1,8}\\.png"), 1..4).prop_map(Block::Slider),
    ]
}

fn offline() -> Converter<NoMathRenderer, PlainHighlighter> {
    Converter::new(NoMathRenderer, PlainHighlighter)
}

fn theme_id() -> impl Strategy<Value = String> {
    prop::sample::select(Theme::list_builtins()).prop_map(str::to_string)
}

proptest! {
    #[test]
    fn every_protected_block_is_restored_once(
        blocks in prop::collection::vec(block(), 0..12),
        theme in theme_id(),
    ) {
        let markdown = blocks
            .iter()
            .map(Block::to_markdown)
            .collect::<Vec<_>>()
            .join("\n\n");
        let code = blocks.iter().filter(|b| matches!(b, Block::Code { .. })).count();
        let mermaid = blocks.iter().filter(|b| matches!(b, Block::Mermaid(_))).count();
        let sliders = blocks.iter().filter(|b| matches!(b, Block::Slider(_))).count();
        let images: usize = blocks
            .iter()
            .map(|b| match b {
                Block::Slider(images) => images.len(),
                _ => 0,
            })
            .sum();

        let options = ConvertOptions { theme, ..ConvertOptions::default() };
        let html = offline().convert(&markdown, &options).html;

        prop_assert_eq!(html.matches("<pre class=\"code-block\"").count(), code);
        prop_assert_eq!(html.matches("class=\"md2-mermaid\"").count(), mermaid);
        prop_assert_eq!(html.matches("scroll-snap-type").count(), sliders);
        prop_assert_eq!(html.matches("data-slider-img=\"true\"").count(), images);
        prop_assert!(!contains_token(&html));
    }

    #[test]
    fn conversion_is_repeatable(
        blocks in prop::collection::vec(block(), 0..8),
        theme in theme_id(),
    ) {
        let markdown = blocks
            .iter()
            .map(Block::to_markdown)
            .collect::<Vec<_>>()
            .join("\n\n");
        let options = ConvertOptions { theme, ..ConvertOptions::default() };
        let first = offline().convert(&markdown, &options).html;
        let second = offline().convert(&markdown, &options).html;
        prop_assert_eq!(first, second);
    }

    #[test]
    fn dark_classification_matches_luminance(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let color = HexColor::parse(&format!("#{r:02x}{g:02x}{b:02x}")).unwrap();
        let luminance = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
        prop_assert_eq!(color.is_dark(), luminance < 128.0);
        prop_assert_eq!(color.rgb().triple(), (r, g, b));
        prop_assert_eq!(md2html::color::is_dark(&format!("{r:02X}{g:02X}{b:02X}")).unwrap(), luminance < 128.0);
    }

    #[test]
    fn malformed_hex_is_rejected(s in "#?[0-9a-fA-F]{0,5}|#?[0-9a-fA-F]{7,9}|#?[g-z]{6}") {
        prop_assert!(HexColor::parse(&s).is_err());
    }
}

#[test]
fn dark_theme_headers_use_gradient() {
    for theme in Theme::builtins() {
        let options = ConvertOptions { theme: theme.id.clone(), ..ConvertOptions::default() };
        let html = offline().convert("| a |\n|---|\n| 1 |", &options).html;
        let gradient = format!(
            "background: linear-gradient(135deg, {}, {}); color: #ffffff;",
            theme.primary(),
            theme.secondary()
        );
        if theme.is_dark() {
            assert!(html.contains(&gradient), "{}", theme.id);
        }
    }
}
