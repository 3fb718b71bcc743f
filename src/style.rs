//! Theme style resolution: one CSS declaration string per element class.
//!
//! Everything here is a pure function of the theme, code theme and font size,
//! so the same inputs always yield byte-identical styles.

use crate::color::HexColor;
use crate::profiles::{CodeTheme, FontSize};
use crate::theme::{H1Variant, H2Variant, H3Variant, Theme};

const H1_BASE: &str = "margin: 28px 0 18px; font-size: 1.75em; font-weight: 700; letter-spacing: 0.5px;";
const H2_BASE: &str = "margin: 22px 0 14px; font-size: 1.4em; font-weight: 600; letter-spacing: 0.3px;";
const H3_BASE: &str = "margin: 18px 0 10px; font-size: 1.15em; font-weight: 600; letter-spacing: 0.2px;";

const FONT_STACK: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif";
const MONO_STACK: &str = "'Menlo', 'Monaco', 'Courier New', monospace";
const WHITE: &str = "#ffffff";

/// The three palette colors plus the theme's corner radius.
#[derive(Debug, Clone, Copy)]
pub struct Palette<'a> {
    pub primary: &'a HexColor,
    pub secondary: &'a HexColor,
    pub accent: &'a HexColor,
    pub radius: &'a str,
}

impl<'a> Palette<'a> {
    pub fn of(theme: &'a Theme) -> Self {
        Self {
            primary: theme.primary(),
            secondary: theme.secondary(),
            accent: theme.accent(),
            radius: &theme.styles.border_radius,
        }
    }
}

pub fn h1_style(variant: H1Variant, p: Palette<'_>) -> String {
    let Palette {
        primary: c1,
        secondary: c2,
        accent: c3,
        radius,
    } = p;
    let rgb1 = c1.rgb();
    match variant {
        H1Variant::BottomBorder => format!(
            "{H1_BASE} padding-bottom: 12px; border-bottom: 2px solid {c1}; color: {c1}; position: relative;"
        ),
        H1Variant::DoubleBottom => format!(
            "{H1_BASE} padding: 14px 20px; border: 2px solid {c1}; border-bottom: 4px double {c1}; color: {c1}; text-align: center; background: linear-gradient(to bottom, transparent 0%, rgba({rgb1}, 0.03) 100%);"
        ),
        H1Variant::Background => format!(
            "{H1_BASE} padding: 14px 20px; background: linear-gradient(135deg, {c1}, {c2}); color: #fff; border-radius: {radius}; box-shadow: 0 4px 15px rgba({rgb1}, 0.3);"
        ),
        H1Variant::Neon => format!(
            "{H1_BASE} padding: 14px 20px; color: {c1}; text-shadow: 0 0 10px {c1}, 0 0 30px {c1}, 0 0 50px {c2}; border: 1px solid {c1}; border-radius: {radius}; background: rgba({rgb1}, 0.05); box-shadow: inset 0 0 20px rgba({rgb1}, 0.1), 0 0 30px rgba({rgb1}, 0.2);"
        ),
        H1Variant::GradientBottom => format!(
            "{H1_BASE} padding-bottom: 12px; background: linear-gradient(90deg, {c1}, {c2}, {c3}) left bottom / 100% 3px no-repeat; color: {c1};"
        ),
        H1Variant::Ribbon => format!(
            "{H1_BASE} padding: 12px 24px; background: linear-gradient(135deg, {c1}, {c2}); color: #fff; border-radius: 0 {radius} {radius} 0; box-shadow: 4px 4px 0 {c3}; margin-left: -4px;"
        ),
        H1Variant::WaveBottom => format!(
            "{H1_BASE} padding-bottom: 12px; color: {c1}; background: linear-gradient(90deg, {c1} 0%, {c2} 50%, transparent 50%) left bottom / 8px 3px repeat-x; background-position: 0 100%;"
        ),
        H1Variant::LeafDeco => format!(
            "{H1_BASE} padding: 10px 0 10px 20px; border-left: 4px solid {c1}; color: {c1}; background: linear-gradient(90deg, rgba({rgb1}, 0.08) 0%, transparent 100%); border-radius: 0 {radius} {radius} 0;"
        ),
        H1Variant::ThinBottom => format!(
            "{H1_BASE} padding-bottom: 10px; color: {c1}; font-weight: 400; border-bottom: 1px solid rgba({rgb1}, 0.2);"
        ),
        H1Variant::LeftBottom => format!(
            "{H1_BASE} padding: 12px 16px; border-left: 4px solid {c1}; border-bottom: 1px solid {c1}; color: {c1}; background: linear-gradient(90deg, rgba({rgb1}, 0.05) 0%, transparent 100%);"
        ),
        H1Variant::Government => format!(
            "{H1_BASE} padding: 16px 20px 14px; border-top: 3px solid {c1}; border-bottom: 1px solid {c1}; color: {c1}; text-align: center; background: rgba({}, 0.06);",
            c3.rgb()
        ),
        H1Variant::Finance => format!(
            "{H1_BASE} padding: 14px 20px; background: linear-gradient(135deg, {c1} 0%, {c2} 100%); border-left: 6px solid {c3}; color: #fff; border-radius: {radius};"
        ),
    }
}

pub fn h2_style(variant: H2Variant, p: Palette<'_>) -> String {
    let Palette {
        primary: c1,
        secondary: c2,
        accent: c3,
        radius,
    } = p;
    let rgb1 = c1.rgb();
    let rgb2 = c2.rgb();
    match variant {
        H2Variant::LeftBorder => {
            format!("{H2_BASE} padding-left: 14px; border-left: 3px solid {c2}; color: {c1};")
        }
        H2Variant::DoubleLeft => format!(
            "{H2_BASE} padding-left: 16px; border-left: 4px double {c1}; color: {c1}; background: linear-gradient(90deg, rgba({rgb1}, 0.05) 0%, transparent 30%);"
        ),
        H2Variant::Background => format!(
            "{H2_BASE} padding: 10px 16px; background: {c2}; color: #fff; border-radius: {radius}; display: inline-block;"
        ),
        H2Variant::GradientBg => format!(
            "{H2_BASE} padding: 10px 18px; background: linear-gradient(90deg, {c2}, {c3}); color: #fff; border-radius: {radius}; box-shadow: 0 0 15px rgba({rgb2}, 0.3);"
        ),
        H2Variant::ThickLeft => format!(
            "{H2_BASE} padding: 8px 0 8px 18px; border-left: 5px solid {c2}; color: {c1}; background: linear-gradient(90deg, rgba({rgb2}, 0.1) 0%, transparent 50%);"
        ),
        H2Variant::GradientBottom => format!(
            "{H2_BASE} padding: 10px 16px; background: linear-gradient(90deg, {c2}, {c3}); color: #fff; border-radius: {radius};"
        ),
        H2Variant::ThinLeft => format!(
            "{H2_BASE} padding-left: 12px; border-left: 2px solid {c2}; color: {c1}; font-weight: 400;"
        ),
        H2Variant::LeftBottom => format!(
            "{H2_BASE} padding: 8px 12px; border-left: 3px solid {c2}; border-bottom: 1px solid {c2}; color: {c1};"
        ),
        H2Variant::DoubleBottom => format!(
            "{H2_BASE} padding-bottom: 8px; border-bottom: 3px double {c2}; color: {c1};"
        ),
        H2Variant::Government => format!(
            "{H2_BASE} padding: 8px 14px; border-left: 4px solid {c1}; border-bottom: 1px solid rgba({rgb1}, 0.3); color: {c1};"
        ),
        H2Variant::Finance => format!(
            "{H2_BASE} padding: 8px 16px; border-left: 4px solid {c3}; background: rgba({rgb2}, 0.08); color: {c1}; border-radius: 0 {radius} {radius} 0;"
        ),
    }
}

pub fn h3_style(variant: H3Variant, p: Palette<'_>) -> String {
    let Palette {
        primary: c1,
        accent: c3,
        ..
    } = p;
    match variant {
        H3Variant::Plain => format!("{H3_BASE} color: {c1};"),
        H3Variant::BottomBorder => format!(
            "{H3_BASE} padding-bottom: 6px; border-bottom: 2px solid {c3}; color: {c1};"
        ),
        H3Variant::LeftBorder => format!(
            "{H3_BASE} padding-left: 10px; border-left: 3px solid {c3}; color: {c1};"
        ),
        H3Variant::DottedBottom => format!(
            "{H3_BASE} padding-bottom: 6px; border-bottom: 2px dotted {c3}; color: {c1};"
        ),
        H3Variant::DashedBottom => format!(
            "{H3_BASE} padding-bottom: 6px; border-bottom: 2px dashed {c3}; color: {c1};"
        ),
    }
}

/// Heading style for a raw variant key; unknown keys use the level's default.
pub fn heading_style_for_key(level: u8, key: &str, p: Palette<'_>) -> String {
    match level {
        1 => h1_style(H1Variant::from_key(key), p),
        2 => h2_style(H2Variant::from_key(key), p),
        _ => h3_style(H3Variant::from_key(key), p),
    }
}

/// Table header background and text color, before the dark-page override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPaint {
    pub background: String,
    pub color: String,
}

impl HeaderPaint {
    fn new(background: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            color: color.into(),
        }
    }
}

pub fn table_header_paint(theme: &Theme) -> HeaderPaint {
    let primary = theme.primary();
    let secondary = theme.secondary();
    let gradient = format!("linear-gradient(135deg, {primary}, {secondary})");

    if theme.is_dark() {
        return HeaderPaint::new(gradient, WHITE);
    }

    match theme.styles.h1_style {
        H1Variant::Neon => HeaderPaint::new(gradient, WHITE),
        H1Variant::DoubleBottom => HeaderPaint::new(primary.as_str(), WHITE),
        H1Variant::ThinBottom => HeaderPaint::new(
            format!("rgba({}, 0.15)", secondary.rgb()),
            secondary.as_str(),
        ),
        H1Variant::LeafDeco | H1Variant::WaveBottom => HeaderPaint::new(primary.as_str(), WHITE),
        H1Variant::Ribbon | H1Variant::Background | H1Variant::GradientBottom => {
            HeaderPaint::new(gradient, WHITE)
        }
        H1Variant::LeftBottom => HeaderPaint::new(secondary.as_str(), WHITE),
        H1Variant::Government => HeaderPaint::new(primary.as_str(), WHITE),
        H1Variant::Finance => HeaderPaint::new(gradient, WHITE),
        H1Variant::BottomBorder => HeaderPaint::new(secondary.as_str(), WHITE),
    }
}

/// Every per-element style string for one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyles {
    pub wrapper: String,
    pub h1: String,
    pub h2: String,
    pub h3: String,
    pub paragraph: String,
    pub blockquote: String,
    pub inline_code: String,
    pub code_block: String,
    pub code_in_block: String,
    pub table: String,
    pub th: String,
    pub td_even: String,
    pub td_odd: String,
    pub list: String,
    pub list_item: String,
    pub hr: String,
    pub image: String,
}

impl ResolvedStyles {
    pub fn resolve(theme: &Theme, code_theme: &CodeTheme, font: &FontSize) -> Self {
        let styles = &theme.styles;
        let palette = Palette::of(theme);
        let primary = theme.primary();
        let secondary = theme.secondary();
        let accent = theme.accent();
        let bg = &styles.bg_color;
        let radius = &styles.border_radius;
        let shadow = &styles.shadow;
        let text = styles.text_color();
        let secondary_text = styles.secondary_text();

        let inline_code_color = if styles.code_bg.is_dark() {
            WHITE.to_string()
        } else {
            primary.to_string()
        };

        let dark = theme.is_dark();
        let (border, table_bg, td_odd_bg, td_even_bg) = if dark {
            (
                "rgba(255, 255, 255, 0.2)".to_string(),
                bg.to_string(),
                bg.to_string(),
                "rgba(255, 255, 255, 0.08)".to_string(),
            )
        } else {
            (
                secondary.to_string(),
                "transparent".to_string(),
                "transparent".to_string(),
                format!("rgba({}, 0.08)", accent.rgb()),
            )
        };
        let header = table_header_paint(theme);

        Self {
            wrapper: format!(
                "background-color: {bg}; padding: 20px; font-family: {FONT_STACK}; font-size: {}; color: {text}; line-height: 1.8; word-wrap: break-word; border-radius: {radius}; box-shadow: {shadow};",
                font.base
            ),
            h1: h1_style(styles.h1_style, palette),
            h2: h2_style(styles.h2_style, palette),
            h3: h3_style(styles.h3_style, palette),
            paragraph: format!("margin: 12px 0; text-align: justify; color: {text};"),
            blockquote: format!(
                "margin: 15px 0; padding: 10px 15px; border-left: 4px solid {accent}; background-color: {}; color: {secondary_text}; border-radius: {radius};",
                styles.blockquote_bg
            ),
            inline_code: format!(
                "padding: 2px 6px; background-color: {}; border-radius: 3px; font-family: {MONO_STACK}; font-size: 0.9em; color: {inline_code_color};",
                styles.code_bg
            ),
            code_block: format!(
                "margin: 15px 0; padding: 15px; background-color: {}; border-radius: {radius}; overflow-x: auto; font-family: {MONO_STACK}; font-size: 0.85em; line-height: 1.6; color: {};",
                code_theme.bg, code_theme.text_color
            ),
            code_in_block: "background: transparent; padding: 0; color: inherit;".to_string(),
            table: format!(
                "width: 100%; margin: 15px 0; border-collapse: collapse; border: 1px solid {border}; border-radius: {radius}; overflow: hidden; box-shadow: {shadow}; background-color: {table_bg};"
            ),
            th: format!(
                "padding: 12px 14px; background: {}; color: {}; font-weight: bold; border: 1px solid {secondary};",
                header.background, header.color
            ),
            td_even: format!(
                "padding: 10px 14px; border: 1px solid {border}; color: {text}; background-color: {td_even_bg};"
            ),
            td_odd: format!(
                "padding: 10px 14px; border: 1px solid {border}; color: {text}; background-color: {td_odd_bg};"
            ),
            list: format!("margin: 10px 0; padding-left: 25px; color: {text};"),
            list_item: format!("margin: 5px 0; color: {text};"),
            hr: format!(
                "margin: 20px 0; border: none; height: 2px; background: linear-gradient(to right, {primary}, {secondary}); border-radius: 2px;"
            ),
            image: format!(
                "max-width: 100%; height: auto; display: block; margin: 15px auto; border-radius: {radius};"
            ),
        }
    }

    /// Style for `h1`..`h6`; levels past 3 share the `h3` style.
    pub fn heading(&self, level: u8) -> &str {
        match level {
            1 => &self.h1,
            2 => &self.h2,
            _ => &self.h3,
        }
    }

    /// Data cell style for the zero-based data row index.
    pub fn data_cell(&self, row: usize) -> &str {
        if row % 2 == 0 { &self.td_even } else { &self.td_odd }
    }
}
