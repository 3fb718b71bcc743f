//! Code-highlight themes, font-size profiles and page backgrounds.
//!
//! These are flat lookup tables; unknown identifiers resolve to the documented
//! default entry instead of failing.

use serde::Serialize;

pub const DEFAULT_CODE_THEME: &str = "github";
pub const DEFAULT_FONT_SIZE: &str = "medium";
pub const DEFAULT_BACKGROUND: &str = "warm";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeTheme {
    #[serde(skip)]
    pub id: &'static str,
    pub name: &'static str,
    /// syntect theme used for token colors.
    pub style: &'static str,
    pub bg: &'static str,
    pub text_color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontSize {
    #[serde(skip)]
    pub id: &'static str,
    pub base: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Background {
    #[serde(skip)]
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub desc: &'static str,
}

pub const CODE_THEMES: &[CodeTheme] = &[
    CodeTheme {
        id: "github",
        name: "GitHub",
        style: "InspiredGitHub",
        bg: "#f6f8fa",
        text_color: "#24292e",
    },
    CodeTheme {
        id: "monokai",
        name: "Monokai",
        style: "base16-mocha.dark",
        bg: "#272822",
        text_color: "#f8f8f2",
    },
    CodeTheme {
        id: "dracula",
        name: "Dracula",
        style: "base16-eighties.dark",
        bg: "#282a36",
        text_color: "#f8f8f2",
    },
    CodeTheme {
        id: "atom-one-dark",
        name: "Atom One Dark",
        style: "base16-ocean.dark",
        bg: "#282c34",
        text_color: "#abb2bf",
    },
    CodeTheme {
        id: "atom-one-light",
        name: "Atom One Light",
        style: "base16-ocean.light",
        bg: "#fafafa",
        text_color: "#383a42",
    },
    CodeTheme {
        id: "vs",
        name: "Visual Studio",
        style: "InspiredGitHub",
        bg: "#ffffff",
        text_color: "#393939",
    },
    CodeTheme {
        id: "xcode",
        name: "Xcode",
        style: "Solarized (light)",
        bg: "#ffffff",
        text_color: "#000000",
    },
    CodeTheme {
        id: "stackoverflow-light",
        name: "StackOverflow Light",
        style: "InspiredGitHub",
        bg: "#f6f8fa",
        text_color: "#24292e",
    },
];

pub const FONT_SIZES: &[FontSize] = &[
    FontSize {
        id: "small",
        base: "14px",
        name: "小号字体(14px)",
        desc: "信息密度高，适合精细阅读",
    },
    FontSize {
        id: "medium",
        base: "15px",
        name: "中号字体(15px)",
        desc: "日常阅读，平衡视觉",
    },
    FontSize {
        id: "large",
        base: "16px",
        name: "大号字体(16px)",
        desc: "舒适阅读，视觉友好",
    },
];

pub const BACKGROUNDS: &[Background] = &[
    Background {
        id: "warm",
        name: "温暖米色",
        color: "#FDF6E3",
        desc: "经典微信风格",
    },
    Background {
        id: "grid",
        name: "方格白底",
        color: "#FFFFFF",
        desc: "简约方格纹理",
    },
    Background {
        id: "none",
        name: "无背景",
        color: "transparent",
        desc: "透明背景",
    },
];

fn lookup<T: Copy>(
    table: &'static [T],
    id: &str,
    default_id: &'static str,
    kind: &'static str,
    key: impl Fn(&T) -> &'static str,
) -> T {
    let wanted = id.trim();
    if let Some(found) = table.iter().find(|&entry| key(entry) == wanted) {
        return *found;
    }
    tracing::warn!(kind, id = wanted, fallback = default_id, "unknown profile id");
    *table
        .iter()
        .find(|&entry| key(entry) == default_id)
        .expect("default profile must be present")
}

impl CodeTheme {
    pub fn resolve(id: &str) -> Self {
        lookup(CODE_THEMES, id, DEFAULT_CODE_THEME, "code_theme", |t| t.id)
    }
}

impl Default for CodeTheme {
    fn default() -> Self {
        Self::resolve(DEFAULT_CODE_THEME)
    }
}

impl FontSize {
    pub fn resolve(id: &str) -> Self {
        lookup(FONT_SIZES, id, DEFAULT_FONT_SIZE, "font_size", |f| f.id)
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::resolve(DEFAULT_FONT_SIZE)
    }
}

impl Background {
    pub fn resolve(id: &str) -> Self {
        lookup(BACKGROUNDS, id, DEFAULT_BACKGROUND, "background", |b| b.id)
    }

    pub fn is_transparent(&self) -> bool {
        self.color.eq_ignore_ascii_case("transparent")
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::resolve(DEFAULT_BACKGROUND)
    }
}
